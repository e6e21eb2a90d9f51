//! Session lifecycle phase.
//!
//! A session starts in [`SessionPhase::Loading`] while persisted settings and
//! history are read, and moves to [`SessionPhase::Ready`] once both loads have
//! finished. There is no way back.

/// Lifecycle phase of a calculator session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SessionPhase {
    /// Persisted state is being read. Evaluation is suppressed and the
    /// outcome stays empty.
    #[default]
    Loading,

    /// Settings and history are loaded; every text change is evaluated.
    Ready,
}

impl SessionPhase {
    #[must_use]
    pub const fn is_ready(self) -> bool {
        matches!(self, Self::Ready)
    }
}
