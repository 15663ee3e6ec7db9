// Pattern 2a: Singleton without synchronization
// One lazily created, process-wide instance behind a single access point.
// The check and the store are two separate atomic steps with no lock between
// them: callers racing on first access can each construct an instance (the
// losers leak). Single-threaded or externally serialized access always sees
// one instance.

use crate::report::Check;
use std::ptr;
use std::sync::atomic::{AtomicPtr, AtomicUsize, Ordering};
use tracing::debug;

pub const SAME_INSTANCE: &str = "Singleton works, both variables contain the same instance.";
pub const DIFFERENT_INSTANCES: &str = "Singleton failed, variables contain different instances.";

static INSTANCE: AtomicPtr<Singleton> = AtomicPtr::new(ptr::null_mut());
static NEXT_ID: AtomicUsize = AtomicUsize::new(1);

#[derive(Debug)]
pub struct Singleton {
    id: usize,
}

impl Singleton {
    /// Creates the instance on first call; returns the same one afterwards.
    pub fn instance() -> &'static Singleton {
        let current = INSTANCE.load(Ordering::Acquire);
        if !current.is_null() {
            // SAFETY: non-null values only ever come from `Box::into_raw`
            // below and are never freed.
            return unsafe { &*current };
        }

        let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
        debug!(id, "creating non-synchronized singleton");
        let created = Box::into_raw(Box::new(Singleton { id }));
        INSTANCE.store(created, Ordering::Release);

        // SAFETY: `created` was just leaked from a `Box` and is never freed.
        unsafe { &*created }
    }

    /// Unique per construction across the whole process.
    pub fn id(&self) -> usize {
        self.id
    }

    pub fn some_business_logic(&self) -> String {
        format!("singleton #{} handled the request", self.id)
    }
}

pub fn run_demo() -> Check {
    let s1 = Singleton::instance();
    let s2 = Singleton::instance();
    Check::new(ptr::eq(s1, s2), SAME_INSTANCE, DIFFERENT_INSTANCES)
}
