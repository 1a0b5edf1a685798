//! Preview countdown gate.
//!
//! Free users get a short preview of gated content. The countdown only runs
//! while the content plays; reaching zero locks playback until the user's
//! entitlement changes. The gate never looks at transactions, only at the
//! entitlement record, so a pending or failed payment can never unlock it.
//!
//! ```text
//! Counting(t) --pause--> Paused(t) --play--> Counting(t)
//! Counting(1) --tick--> Expired
//! any locked  --entitlement grants--> Unlocked
//! ```

use serde::Serialize;

use crate::domain::foundation::ContentId;

use super::UserEntitlement;

/// Preview length when nothing else is configured.
pub const DEFAULT_PREVIEW_SECONDS: u32 = 60;

/// Where the gate is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatePhase {
    /// Locked, preview time left. Decrements on ticks while playing.
    Counting { remaining: u32 },
    /// Locked, countdown held.
    Paused { remaining: u32 },
    /// Locked, preview used up.
    Expired,
    /// Full access.
    Unlocked,
}

impl GatePhase {
    pub fn is_locked(&self) -> bool {
        !matches!(self, GatePhase::Unlocked)
    }
}

/// Snapshot handed to the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntitlementState {
    pub has_access: bool,
    pub preview_seconds_remaining: u32,
    pub is_playing: bool,
    pub is_paused: bool,
    pub has_expired: bool,
}

/// Something the host UI should react to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateEvent {
    /// Access granted; dismiss any paywall.
    Unlocked { content_id: ContentId },
    /// Preview used up; stop playback and prompt for payment.
    Expired { content_id: ContentId },
    /// Gate re-evaluated for newly selected content.
    ContentSwitched { content_id: ContentId, has_access: bool },
}

/// Result of one countdown tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Nothing changed (not playing, paused, expired or unlocked).
    Idle,
    /// One second consumed.
    Counted { remaining: u32 },
    /// The last second was consumed.
    Expired,
}

/// Countdown state machine for one preview session.
#[derive(Debug, Clone)]
pub struct EntitlementGate {
    content_id: ContentId,
    entitlement: UserEntitlement,
    preview_seconds: u32,
    phase: GatePhase,
    is_playing: bool,
}

impl EntitlementGate {
    /// Opens the gate for `content_id`.
    ///
    /// Starts unlocked if the entitlement already grants the content,
    /// otherwise counting from `preview_seconds` with playback stopped.
    pub fn open(content_id: ContentId, entitlement: UserEntitlement, preview_seconds: u32) -> Self {
        let phase = Self::initial_phase(&content_id, &entitlement, preview_seconds);
        Self {
            content_id,
            entitlement,
            preview_seconds,
            phase,
            is_playing: false,
        }
    }

    fn initial_phase(
        content_id: &ContentId,
        entitlement: &UserEntitlement,
        preview_seconds: u32,
    ) -> GatePhase {
        if entitlement.grants(content_id) {
            GatePhase::Unlocked
        } else if preview_seconds == 0 {
            GatePhase::Expired
        } else {
            GatePhase::Counting {
                remaining: preview_seconds,
            }
        }
    }

    pub fn phase(&self) -> GatePhase {
        self.phase
    }

    /// True while playback is consuming preview time.
    pub fn is_counting(&self) -> bool {
        self.is_playing && matches!(self.phase, GatePhase::Counting { .. })
    }

    pub fn content_id(&self) -> &ContentId {
        &self.content_id
    }

    pub fn entitlement(&self) -> &UserEntitlement {
        &self.entitlement
    }

    pub fn state(&self) -> EntitlementState {
        let (remaining, is_paused, has_expired) = match self.phase {
            GatePhase::Counting { remaining } => (remaining, false, false),
            GatePhase::Paused { remaining } => (remaining, true, false),
            GatePhase::Expired => (0, false, true),
            GatePhase::Unlocked => (self.preview_seconds, false, false),
        };
        EntitlementState {
            has_access: self.phase == GatePhase::Unlocked,
            preview_seconds_remaining: remaining,
            is_playing: self.is_playing,
            is_paused,
            has_expired,
        }
    }

    /// Starts or resumes playback. Returns false if the preview has expired.
    pub fn play(&mut self) -> bool {
        match self.phase {
            GatePhase::Expired => return false,
            GatePhase::Paused { remaining } => {
                self.phase = GatePhase::Counting { remaining };
            }
            GatePhase::Counting { .. } | GatePhase::Unlocked => {}
        }
        self.is_playing = true;
        true
    }

    /// Pauses playback, holding the countdown.
    pub fn pause(&mut self) {
        if let GatePhase::Counting { remaining } = self.phase {
            self.phase = GatePhase::Paused { remaining };
        }
        self.is_playing = false;
    }

    /// Advances the countdown by one second.
    pub fn tick(&mut self) -> TickOutcome {
        let GatePhase::Counting { remaining } = self.phase else {
            return TickOutcome::Idle;
        };
        if !self.is_playing {
            return TickOutcome::Idle;
        }
        let remaining = remaining.saturating_sub(1);
        if remaining == 0 {
            self.phase = GatePhase::Expired;
            self.is_playing = false;
            TickOutcome::Expired
        } else {
            self.phase = GatePhase::Counting { remaining };
            TickOutcome::Counted { remaining }
        }
    }

    /// Records a new entitlement snapshot, unlocking if it now grants access.
    pub fn apply_entitlement(&mut self, entitlement: UserEntitlement) -> Option<GateEvent> {
        let grants = entitlement.grants(&self.content_id);
        self.entitlement = entitlement;
        if grants {
            self.unlock()
        } else {
            None
        }
    }

    /// Moves any locked phase straight to `Unlocked`.
    ///
    /// Returns the event only on the actual transition, so callers fire
    /// unlock callbacks once.
    pub fn unlock(&mut self) -> Option<GateEvent> {
        if !self.phase.is_locked() {
            return None;
        }
        self.phase = GatePhase::Unlocked;
        Some(GateEvent::Unlocked {
            content_id: self.content_id.clone(),
        })
    }

    /// Re-targets the gate at another item and resets the preview.
    pub fn switch_content(&mut self, content_id: ContentId) -> GateEvent {
        self.phase = Self::initial_phase(&content_id, &self.entitlement, self.preview_seconds);
        self.is_playing = false;
        self.content_id = content_id;
        GateEvent::ContentSwitched {
            content_id: self.content_id.clone(),
            has_access: self.phase == GatePhase::Unlocked,
        }
    }

    /// Event to raise when `tick` reports expiry.
    pub fn expired_event(&self) -> GateEvent {
        GateEvent::Expired {
            content_id: self.content_id.clone(),
        }
    }
}
