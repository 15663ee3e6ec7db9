// Pattern 2b: Thread-safe Singleton
// Double-checked locking: a lock-free read on the fast path, and a mutex that
// serializes the check-and-create step on first access. The first
// construction parameter wins; later ones are dropped without running.

use crate::config::RaceConfig;
use crate::error::PatternError;
use crate::report::Check;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Barrier, Mutex, OnceLock, PoisonError};
use std::thread;
use tracing::{debug, trace};

pub const RACE_HEADER: &str = "If you see the same value, then singleton was reused (yay!)\n\
                               If you see different values, then 2 singletons were created (booo!!)\n\n\
                               RESULT:\n";
pub const RACE_REUSED: &str = "Singleton was reused, every thread saw the same instance.";
pub const RACE_DUPLICATED: &str = "Singleton failed, threads saw different instances.";

// ============================================================================
// Generic holder
// ============================================================================

/// Lazily created, process-wide instance of `T`. Usable in a `static`.
#[derive(Debug)]
pub struct SingletonCell<T> {
    instance: OnceLock<T>,
    lock: Mutex<()>,
    constructions: AtomicUsize,
}

impl<T> SingletonCell<T> {
    pub const fn new() -> Self {
        Self {
            instance: OnceLock::new(),
            lock: Mutex::new(()),
            constructions: AtomicUsize::new(0),
        }
    }

    /// Returns the instance, running `init` only if nobody has created it yet.
    pub fn get_or_create<F>(&self, init: F) -> &T
    where
        F: FnOnce() -> T,
    {
        if let Some(instance) = self.instance.get() {
            trace!("singleton fast path");
            return instance;
        }

        // A panicking constructor poisons the lock but leaves the cell empty,
        // so the next caller may simply try again.
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(instance) = self.instance.get() {
            return instance;
        }

        let attempt = self.constructions.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(attempt, "constructing thread-safe singleton");
        let value = init();

        // Only lock holders write the cell, and it was empty under the lock,
        // so this stores `value`.
        self.instance.get_or_init(move || value)
    }

    pub fn get(&self) -> Option<&T> {
        self.instance.get()
    }

    pub fn is_created(&self) -> bool {
        self.instance.get().is_some()
    }

    /// Number of times a constructor was started.
    pub fn constructions(&self) -> usize {
        self.constructions.load(Ordering::SeqCst)
    }
}

impl<T> Default for SingletonCell<T> {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Labelled singleton
// ============================================================================

static INSTANCE: SingletonCell<Singleton> = SingletonCell::new();

#[derive(Debug, PartialEq, Eq)]
pub struct Singleton {
    value: String,
}

impl Singleton {
    fn new(value: &str) -> Self {
        Self {
            value: value.to_string(),
        }
    }

    /// `value` is only used by the call that actually creates the instance.
    pub fn get_instance(value: &str) -> &'static Singleton {
        INSTANCE.get_or_create(|| Singleton::new(value))
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn some_business_logic(&self) -> String {
        format!("singleton '{}' handled the request", self.value)
    }
}

// ============================================================================
// Race driver
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observation {
    pub label: String,
    pub value: String,
    pub address: usize,
}

#[derive(Debug, Clone)]
pub struct RaceOutcome {
    pub observations: Vec<Observation>,
    pub constructions: usize,
}

impl RaceOutcome {
    /// Every worker saw the same instance.
    pub fn is_consistent(&self) -> bool {
        self.observations
            .windows(2)
            .all(|pair| pair[0].address == pair[1].address && pair[0].value == pair[1].value)
    }

    /// The retained construction value, only when every worker agrees on it.
    pub fn winner(&self) -> Option<&str> {
        if !self.is_consistent() {
            return None;
        }
        self.observations.first().map(|o| o.value.as_str())
    }

    pub fn verdict(&self) -> Check {
        Check::new(self.is_consistent(), RACE_REUSED, RACE_DUPLICATED)
    }
}

/// Releases one worker per label at once; each asks `cell` for the instance
/// using its own label as the construction parameter.
pub fn race_on(
    cell: &SingletonCell<Singleton>,
    config: &RaceConfig,
) -> Result<RaceOutcome, PatternError> {
    if config.labels.is_empty() {
        return Err(PatternError::EmptyRace);
    }

    let barrier = Barrier::new(config.labels.len());
    let observations = thread::scope(|s| {
        let handles: Vec<_> = config
            .labels
            .iter()
            .map(|label| {
                let barrier = &barrier;
                let handle = s.spawn(move || {
                    barrier.wait();
                    if !config.start_delay.is_zero() {
                        thread::sleep(config.start_delay);
                    }
                    let instance = cell.get_or_create(|| {
                        if !config.build_delay.is_zero() {
                            thread::sleep(config.build_delay);
                        }
                        Singleton::new(label)
                    });
                    Observation {
                        label: label.clone(),
                        value: instance.value().to_string(),
                        address: instance as *const Singleton as usize,
                    }
                });
                (label, handle)
            })
            .collect();

        handles
            .into_iter()
            .map(|(label, handle)| {
                handle
                    .join()
                    .map_err(|_| PatternError::worker_panicked(label.as_str()))
            })
            .collect::<Result<Vec<_>, _>>()
    })?;

    Ok(RaceOutcome {
        observations,
        constructions: cell.constructions(),
    })
}

/// Races against the process-wide instance behind [`Singleton::get_instance`].
pub fn race(config: &RaceConfig) -> Result<RaceOutcome, PatternError> {
    race_on(&INSTANCE, config)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::panic::{self, AssertUnwindSafe};
    use std::sync::atomic::AtomicBool;
    use std::time::Duration;

    #[test]
    fn test_first_value_wins() {
        let cell = SingletonCell::new();
        let ran_second = AtomicBool::new(false);

        let first = cell.get_or_create(|| Singleton::new("first"));
        let second = cell.get_or_create(|| {
            ran_second.store(true, Ordering::SeqCst);
            Singleton::new("second")
        });

        assert!(std::ptr::eq(first, second));
        assert_eq!(second.value(), "first");
        assert!(!ran_second.load(Ordering::SeqCst));
        assert_eq!(cell.constructions(), 1);
    }

    #[test]
    fn test_cell_states() {
        let cell: SingletonCell<u32> = SingletonCell::default();
        assert!(!cell.is_created());
        assert!(cell.get().is_none());

        cell.get_or_create(|| 7);
        assert!(cell.is_created());
        assert_eq!(cell.get(), Some(&7));
    }

    #[test]
    fn test_global_instance_is_shared() {
        let a = Singleton::get_instance("FOO");
        let b = Singleton::get_instance("BAR");
        assert!(std::ptr::eq(a, b));
        assert_eq!(a.value(), b.value());
        assert!(a.some_business_logic().contains(a.value()));
    }

    #[test]
    fn test_concurrent_race_constructs_once() {
        let cell = SingletonCell::new();
        let labels: Vec<String> = (0..16).map(|i| format!("worker-{i}")).collect();
        let config = RaceConfig::new(labels.clone());

        let outcome = race_on(&cell, &config).unwrap();

        assert_eq!(outcome.observations.len(), 16);
        assert_eq!(outcome.constructions, 1);
        assert!(outcome.is_consistent());
        assert!(outcome.verdict().passed);

        let winner = outcome.winner().unwrap();
        assert!(labels.iter().any(|label| label == winner));
        assert_eq!(cell.get().map(Singleton::value), Some(winner));
    }

    #[test]
    fn test_slow_constructor_under_contention() {
        let cell = SingletonCell::new();
        let labels: Vec<String> = (0..8).map(|i| format!("slow-{i}")).collect();
        let config = RaceConfig::new(labels.clone()).build_delay(Duration::from_millis(20));

        let outcome = race_on(&cell, &config).unwrap();

        assert_eq!(outcome.constructions, 1);
        assert!(outcome.is_consistent());
        let winner = outcome.winner().unwrap();
        assert!(labels.iter().any(|label| label == winner));
    }

    #[test]
    fn test_constructor_runs_once_while_others_wait() {
        let cell: SingletonCell<usize> = SingletonCell::new();
        let barrier = Barrier::new(6);
        let started = AtomicUsize::new(0);

        let seen: Vec<usize> = thread::scope(|s| {
            let handles: Vec<_> = (0..6)
                .map(|i| {
                    let (cell, barrier, started) = (&cell, &barrier, &started);
                    s.spawn(move || {
                        barrier.wait();
                        *cell.get_or_create(|| {
                            started.fetch_add(1, Ordering::SeqCst);
                            thread::sleep(Duration::from_millis(20));
                            i
                        })
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(started.load(Ordering::SeqCst), 1);
        assert_eq!(cell.constructions(), 1);
        assert!(seen.windows(2).all(|pair| pair[0] == pair[1]));
    }

    #[test]
    fn test_global_race_is_consistent() {
        let outcome = race(&RaceConfig::default()).unwrap();
        assert!(outcome.is_consistent());
        assert_eq!(outcome.constructions, 1);
        assert!(std::ptr::eq(
            Singleton::get_instance("other"),
            outcome.observations[0].address as *const Singleton
        ));
    }

    #[test]
    fn test_empty_race_rejected() {
        let cell = SingletonCell::new();
        let config = RaceConfig::new(Vec::<String>::new());
        assert_eq!(race_on(&cell, &config).unwrap_err(), PatternError::EmptyRace);
    }

    #[test]
    fn test_recovers_after_panicking_constructor() {
        let cell: SingletonCell<u32> = SingletonCell::new();

        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            cell.get_or_create(|| panic!("constructor failed"));
        }));
        assert!(result.is_err());
        assert!(!cell.is_created());

        assert_eq!(*cell.get_or_create(|| 42), 42);
        assert_eq!(cell.constructions(), 2);
    }

    #[test]
    fn test_inconsistent_outcome_fails_verdict() {
        let outcome = RaceOutcome {
            observations: vec![
                Observation {
                    label: "FOO".into(),
                    value: "FOO".into(),
                    address: 1,
                },
                Observation {
                    label: "BAR".into(),
                    value: "BAR".into(),
                    address: 2,
                },
            ],
            constructions: 2,
        };
        assert!(!outcome.is_consistent());
        assert_eq!(outcome.winner(), None);
        assert_eq!(outcome.verdict().message(), RACE_DUPLICATED);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn test_all_observers_agree(labels in proptest::collection::vec("[a-z]{1,8}", 1..8)) {
            let cell = SingletonCell::new();
            let outcome = race_on(&cell, &RaceConfig::new(labels.clone())).unwrap();

            prop_assert!(outcome.is_consistent());
            prop_assert_eq!(outcome.constructions, 1);
            let winner = outcome.winner().unwrap();
            prop_assert!(labels.iter().any(|label| label == winner));
        }
    }
}
