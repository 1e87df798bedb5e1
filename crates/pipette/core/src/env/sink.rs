use std::sync::Arc;

use crate::action::CandidateAction;

/// Host commands that make or clear the active selection.
pub trait SelectionSink: Send + Sync {
    /// Makes `action` the active selection.
    fn select(&self, action: Arc<dyn CandidateAction>);

    /// Clears the active selection.
    fn deselect(&self);
}
