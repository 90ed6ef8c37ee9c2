use std::sync::{Arc, RwLock};

use crate::color::HsvRange;

/// HSV thresholds shared between the worker and whoever tunes them.
///
/// The worker reads once per frame; writers may update at any time.
#[derive(Clone, Debug, Default)]
pub struct ThresholdHandle(Arc<RwLock<HsvRange>>);

impl ThresholdHandle {
    pub fn new(range: HsvRange) -> Self {
        Self(Arc::new(RwLock::new(range)))
    }

    pub fn get(&self) -> HsvRange {
        match self.0.read() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    pub fn set(&self, range: HsvRange) {
        match self.0.write() {
            Ok(mut guard) => *guard = range,
            Err(poisoned) => *poisoned.into_inner() = range,
        }
    }
}
