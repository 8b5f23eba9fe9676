//! Progress handler trait and events

use crate::validation::ArtifactKind;
use std::path::PathBuf;
use std::time::Duration;

/// Events emitted while a generation run advances
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// Run started
    Started { project_path: PathBuf },

    /// Project scan finished
    ScanComplete {
        files: usize,
        context_chars: usize,
        truncated: bool,
        scan_time: Duration,
    },

    /// Language and framework inferred
    Classified { classification: String },

    /// Model request started
    GenerationStarted { artifact: ArtifactKind, repair: bool },

    /// Model returned text
    GenerationComplete {
        artifact: ArtifactKind,
        response_chars: usize,
        response_time: Duration,
    },

    /// Model call failed
    GenerationFailed { artifact: ArtifactKind, error: String },

    /// Artifact written to disk
    ArtifactSaved { artifact: ArtifactKind, path: PathBuf },

    /// Validation finished
    ValidationComplete {
        artifact: ArtifactKind,
        ok: bool,
        error: Option<String>,
    },

    /// Operator was asked whether to attempt a repair
    RepairOffered { path: PathBuf },

    /// Operator declined the repair
    RepairDeclined { path: PathBuf },

    /// Run finished
    Completed { success: bool, total_time: Duration },

    /// Run aborted by a fatal error
    Failed { error: String },
}

/// Trait for handling progress events during a run
pub trait ProgressHandler: Send + Sync {
    fn on_progress(&self, event: &ProgressEvent);
}

/// No-op handler that ignores all events
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpHandler;

impl ProgressHandler for NoOpHandler {
    fn on_progress(&self, _event: &ProgressEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingHandler {
        count: Arc<AtomicUsize>,
    }

    impl ProgressHandler for CountingHandler {
        fn on_progress(&self, _event: &ProgressEvent) {
            self.count.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_noop_handler() {
        NoOpHandler.on_progress(&ProgressEvent::Started {
            project_path: PathBuf::from("/test"),
        });
    }

    #[test]
    fn test_progress_events() {
        let count = Arc::new(AtomicUsize::new(0));
        let handler = CountingHandler {
            count: count.clone(),
        };

        handler.on_progress(&ProgressEvent::Started {
            project_path: PathBuf::from("/test"),
        });
        handler.on_progress(&ProgressEvent::GenerationStarted {
            artifact: ArtifactKind::Dockerfile,
            repair: false,
        });
        handler.on_progress(&ProgressEvent::Completed {
            success: true,
            total_time: Duration::from_secs(5),
        });

        assert_eq!(count.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_event_debug() {
        let event = ProgressEvent::RepairOffered {
            path: PathBuf::from("Dockerfile"),
        };
        assert!(format!("{:?}", event).contains("RepairOffered"));
    }
}
