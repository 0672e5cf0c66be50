use std::sync::atomic::{AtomicU64, Ordering};

/// Told whenever the persisted scores change so the candidate list can be redrawn.
pub trait RenderNotifier: Send + Sync {
    fn scores_changed(&self);
}

/// Publishes a monotonically increasing revision. The UI polls `/api/scores`
/// and re-renders when the revision moves.
#[derive(Debug, Default)]
pub struct RevisionNotifier {
    revision: AtomicU64,
}

impl RevisionNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn revision(&self) -> u64 {
        self.revision.load(Ordering::SeqCst)
    }
}

impl RenderNotifier for RevisionNotifier {
    fn scores_changed(&self) {
        self.revision.fetch_add(1, Ordering::SeqCst);
    }
}

/// For contexts without a UI, such as the CLI.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNotifier;

impl RenderNotifier for NoopNotifier {
    fn scores_changed(&self) {}
}
