//! Mount detection state machine
//!
//! The engine inserts its canvas into the page at some point after init
//! hands control to the frame loop. The shell watches DOM mutations until
//! the canvas shows up, then tears the loading screen down exactly once.
//! The browser glue (observer attach/disconnect) lives in the binary; this
//! module is the decision logic it runs on every mutation.

/// Lifecycle of the mount watch. Transitions once, irreversibly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MountWatch {
    /// Observer attached, canvas not yet seen
    #[default]
    Watching,
    /// Canvas seen, loading screen dismissed, observer disconnected
    Done,
}

/// What a single mutation callback should do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MountCheck {
    /// First time the surface is present: dismiss loading and stop watching
    Mounted,
    /// Surface not in the document yet: stay attached, warn and move on
    SurfaceAbsent,
    /// Watch already concluded: nothing to do
    Concluded,
}

impl MountWatch {
    pub fn new() -> Self {
        Self::Watching
    }

    /// Advance the watch for one observed mutation.
    ///
    /// Yields `Mounted` at most once over the whole lifetime of the watch;
    /// every call after that is `Concluded` regardless of surface presence.
    pub fn on_mutation(&mut self, surface_present: bool) -> MountCheck {
        match (*self, surface_present) {
            (MountWatch::Watching, true) => {
                *self = MountWatch::Done;
                MountCheck::Mounted
            }
            (MountWatch::Watching, false) => MountCheck::SurfaceAbsent,
            (MountWatch::Done, _) => MountCheck::Concluded,
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self, MountWatch::Done)
    }
}
