// Demo parameters for the thread-safe singleton race.

use std::time::Duration;

pub const DEFAULT_LABELS: [&str; 2] = ["FOO", "BAR"];

#[derive(Debug, Clone, PartialEq)]
pub struct RaceConfig {
    pub labels: Vec<String>,
    pub start_delay: Duration,
    pub build_delay: Duration,
}

impl RaceConfig {
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            labels: labels.into_iter().map(Into::into).collect(),
            start_delay: Duration::ZERO,
            build_delay: Duration::ZERO,
        }
    }

    /// Every worker sleeps this long after the barrier releases it.
    pub fn start_delay(mut self, delay: Duration) -> Self {
        self.start_delay = delay;
        self
    }

    /// The winning constructor sleeps this long before returning, which keeps
    /// the other workers waiting on the lock.
    pub fn build_delay(mut self, delay: Duration) -> Self {
        self.build_delay = delay;
        self
    }
}

impl Default for RaceConfig {
    fn default() -> Self {
        Self::new(DEFAULT_LABELS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RaceConfig::default();
        assert_eq!(config.labels, vec!["FOO".to_string(), "BAR".to_string()]);
        assert_eq!(config.start_delay, Duration::ZERO);
        assert_eq!(config.build_delay, Duration::ZERO);
    }

    #[test]
    fn test_builder_values() {
        let config = RaceConfig::new(["a", "b", "c"])
            .start_delay(Duration::from_millis(5))
            .build_delay(Duration::from_millis(20));
        assert_eq!(config.labels.len(), 3);
        assert_eq!(config.start_delay, Duration::from_millis(5));
        assert_eq!(config.build_delay, Duration::from_millis(20));
    }
}
