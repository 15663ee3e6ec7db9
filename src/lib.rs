//! # Creational Patterns: Prototype and Singleton
//!
//! Runnable demos for two creational patterns, written the Rust way.
//!
//! ## Pattern 1: Prototype
//! - Deep clone with `Rc` components
//! - Re-linking a back-reference (`Weak`) to the new root
//! - Layered cloning (base values + extension values)
//!
//! ## Pattern 2: Singleton
//! - Non-synchronized access (`thread_local!` + `OnceCell`)
//! - Thread-safe access (double-checked locking over `OnceLock` + `Mutex`)
//!
//! Run individual demos with:
//! ```bash
//! cargo run --bin prototype
//! cargo run --bin singleton
//! cargo run --bin singleton_thread_safe
//! RUST_LOG=debug cargo run --bin singleton_thread_safe
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod prototype;
pub mod report;
pub mod singleton;
pub mod singleton_sync;

pub use config::RaceConfig;
pub use error::PatternError;
pub use report::{Check, Report};
