use std::time::Duration;

/// How a frame that failed to load counts toward readiness.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// A failure never counts; the gate stays closed for the rest of the mount.
    Stall,
    /// A failure counts as accounted for; its slot stays empty.
    #[default]
    Account,
    /// A failure counts as accounted for and its slot gets a solid placeholder frame.
    Placeholder,
}

impl FailurePolicy {
    /// Whether every one of `total` frames is accounted for under this policy.
    pub fn all_accounted(self, loaded: usize, failed: usize, total: usize) -> bool {
        match self {
            Self::Stall => loaded >= total,
            Self::Account | Self::Placeholder => loaded + failed >= total,
        }
    }
}

/// The two readiness signals and what they combine to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlaybackState {
    pub images_ready: bool,
    pub min_time_ready: bool,
    pub visible: bool,
}

/// `visible = images_ready AND min_time_ready`.
pub fn is_visible(images_ready: bool, min_time_ready: bool) -> bool {
    images_ready && min_time_ready
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GateTransition {
    Unchanged,
    BecameVisible,
}

/// Monotonic two-flag gate. Each flag is set independently, in either order, and the
/// visible state is recomputed after every change. Once visible it never closes.
#[derive(Clone, Debug, Default)]
pub struct ReadinessGate {
    state: PlaybackState,
    visible_at: Option<Duration>,
}

impl ReadinessGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_visible(&self) -> bool {
        self.state.visible
    }

    /// Host time at which the gate opened.
    pub fn visible_at(&self) -> Option<Duration> {
        self.visible_at
    }

    pub fn mark_images_ready(&mut self, now: Duration) -> GateTransition {
        self.state.images_ready = true;
        self.recompute(now)
    }

    pub fn mark_min_time_ready(&mut self, now: Duration) -> GateTransition {
        self.state.min_time_ready = true;
        self.recompute(now)
    }

    fn recompute(&mut self, now: Duration) -> GateTransition {
        if self.state.visible {
            return GateTransition::Unchanged;
        }
        if is_visible(self.state.images_ready, self.state.min_time_ready) {
            self.state.visible = true;
            self.visible_at = Some(now);
            return GateTransition::BecameVisible;
        }
        GateTransition::Unchanged
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/gate.rs"]
mod tests;
