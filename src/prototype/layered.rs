// Layered cloning: an extension type clones its base layer first, then the
// fields it adds on top.

use crate::report::Check;
use tracing::debug;

pub const COPY_EQUALS_ORIGINAL: &str = "The original object is equal to the copied object!";
pub const COPY_DIFFERS_FROM_ORIGINAL: &str = "The copied object differs from the original!";

pub trait CloneLayer {
    fn clone_layer(&self) -> Self;
}

#[derive(Debug, PartialEq, Eq)]
pub struct BaseValues {
    pub int_value: i64,
    pub string_value: String,
}

impl BaseValues {
    pub fn new(int_value: i64, string_value: impl Into<String>) -> Self {
        Self {
            int_value,
            string_value: string_value.into(),
        }
    }
}

impl Default for BaseValues {
    fn default() -> Self {
        Self::new(1, "Value")
    }
}

impl CloneLayer for BaseValues {
    fn clone_layer(&self) -> Self {
        let copy = Self {
            int_value: self.int_value,
            string_value: self.string_value.clone(),
        };
        debug!("values defined in the base layer have been cloned");
        copy
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct SubValues {
    pub base: BaseValues,
    pub bool_value: bool,
}

impl SubValues {
    pub fn new(int_value: i64, string_value: impl Into<String>) -> Self {
        Self {
            base: BaseValues::new(int_value, string_value),
            bool_value: true,
        }
    }
}

impl CloneLayer for SubValues {
    fn clone_layer(&self) -> Self {
        let base = self.base.clone_layer();
        debug!("values defined in the extension layer have been cloned");
        Self {
            base,
            bool_value: self.bool_value,
        }
    }
}

pub fn run_demo() -> Check {
    let original = SubValues::new(2, "Value2");
    let copy = original.clone_layer();
    Check::new(copy == original, COPY_EQUALS_ORIGINAL, COPY_DIFFERS_FROM_ORIGINAL)
}
