//! Progress reporting on stderr

use docqa_core::IngestProgress;
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};

/// Single-line progress reporter for ingestion
pub struct ProgressReporter {
    label: &'static str,
    shown: AtomicBool,
}

impl ProgressReporter {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            shown: AtomicBool::new(false),
        }
    }

    pub fn set_message(&self, msg: &str) {
        self.shown.store(true, Ordering::Relaxed);
        eprint!("\r{:<60}", msg);
        io::stderr().flush().ok();
    }

    pub fn report(&self, progress: &IngestProgress) {
        self.set_message(&format!(
            "{}: batch {}/{}, {}/{} chunks",
            self.label,
            progress.batch,
            progress.total_batches,
            progress.stored_chunks,
            progress.total_chunks
        ));
    }

    /// End the progress line, if one was drawn
    pub fn finish(&self) {
        if self.shown.load(Ordering::Relaxed) {
            eprintln!();
        }
    }
}
