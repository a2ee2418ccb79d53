use std::sync::Mutex;

use mesarun::progress::ProgressSink;

/// Progress sink that keeps every status it receives.
#[derive(Debug, Default)]
pub struct RecordingSink {
    updates: Mutex<Vec<String>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn updates(&self) -> Vec<String> {
        self.updates.lock().unwrap().clone()
    }
}

impl ProgressSink for RecordingSink {
    fn update(&self, status: &str) {
        self.updates.lock().unwrap().push(status.to_string());
    }
}
