use tracing::info;

use crate::workflow::Stage;

/// Receives stage progress from the orchestrator. Display is the implementor's business.
pub trait ProgressReporter: Send + Sync {
    fn report(&self, stage: Stage, percent: u8);
}

/// Default reporter: one `info!` line per update.
pub struct TracingProgress;

impl ProgressReporter for TracingProgress {
    fn report(&self, stage: Stage, percent: u8) {
        info!("Workflow progress: {} ({}%)", stage.as_str(), percent);
    }
}

/// Keeps every update in order.
#[cfg(test)]
#[derive(Default)]
pub struct RecordingProgress {
    updates: std::sync::Mutex<Vec<(Stage, u8)>>,
}

#[cfg(test)]
impl RecordingProgress {
    pub fn updates(&self) -> Vec<(Stage, u8)> {
        self.updates
            .lock()
            .map(|updates| updates.clone())
            .unwrap_or_default()
    }
}

#[cfg(test)]
impl ProgressReporter for RecordingProgress {
    fn report(&self, stage: Stage, percent: u8) {
        if let Ok(mut updates) = self.updates.lock() {
            updates.push((stage, percent));
        }
    }
}
