//! Diagnostic sink that keeps what it is given

use std::sync::Mutex;

use faultline_core::ErrorValue;
use faultline_server::DiagnosticSink;

#[derive(Default)]
pub struct RecordingSink {
    records: Mutex<Vec<ErrorValue>>,
}

impl RecordingSink {
    pub fn count(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    pub fn messages(&self) -> Vec<String> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .map(|error| error.message().to_owned())
            .collect()
    }

    pub fn last(&self) -> Option<ErrorValue> {
        self.records.lock().unwrap().last().cloned()
    }
}

impl DiagnosticSink for RecordingSink {
    fn record(&self, error: &ErrorValue) {
        self.records.lock().unwrap().push(error.clone());
    }
}
