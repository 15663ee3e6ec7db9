// Pass/fail diagnostics printed by the demo clients.

use colored::Colorize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Check {
    pub passed: bool,
    pass_message: &'static str,
    fail_message: &'static str,
}

impl Check {
    pub fn new(passed: bool, pass_message: &'static str, fail_message: &'static str) -> Self {
        Self {
            passed,
            pass_message,
            fail_message,
        }
    }

    pub fn message(&self) -> &'static str {
        if self.passed {
            self.pass_message
        } else {
            self.fail_message
        }
    }

    pub fn colored(&self) -> String {
        if self.passed {
            self.message().green().to_string()
        } else {
            self.message().red().to_string()
        }
    }
}

impl fmt::Display for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

#[derive(Debug, Default, Clone)]
pub struct Report {
    checks: Vec<Check>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, check: Check) -> &mut Self {
        self.checks.push(check);
        self
    }

    pub fn checks(&self) -> &[Check] {
        &self.checks
    }

    pub fn all_passed(&self) -> bool {
        self.checks.iter().all(|check| check.passed)
    }

    /// One sentence per line, no coloring.
    pub fn render(&self) -> String {
        self.checks
            .iter()
            .map(Check::message)
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn print(&self) {
        for check in &self.checks {
            println!("{}", check.colored());
        }
    }
}
