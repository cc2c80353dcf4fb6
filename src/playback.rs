//! Running/Paused control and frame scheduling bookkeeping
//!
//! The host (browser `requestAnimationFrame` or the native ticker) owns the
//! actual callbacks. `Animator` decides when a frame is wanted, remembers the
//! single pending request, and refuses to tick for any callback that is not
//! the pending one, so an orphaned frame never advances the simulation.

use serde::{Deserialize, Serialize};

use crate::sim::{Bounds, SimState};

/// Whether the animation is advancing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PlaybackState {
    #[default]
    Running,
    Paused,
}

impl PlaybackState {
    pub fn toggled(self) -> Self {
        match self {
            PlaybackState::Running => PlaybackState::Paused,
            PlaybackState::Paused => PlaybackState::Running,
        }
    }
}

/// Identifies one frame request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameToken(u64);

/// Handle returned by the host scheduler (the rAF request id in browsers)
pub type HostFrameId = i32;

/// What the host should do after a frame callback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Ticked; request another frame
    Continue,
    /// Nothing more to do until the next control action
    Halt,
}

#[derive(Debug, Clone, Copy)]
struct PendingFrame {
    token: FrameToken,
    host_id: Option<HostFrameId>,
}

/// Drives a [`SimState`] from host frame callbacks
#[derive(Debug)]
pub struct Animator {
    sim: SimState,
    state: PlaybackState,
    pending: Option<PendingFrame>,
    next_token: u64,
}

impl Animator {
    pub fn new(sim: SimState) -> Self {
        Self {
            sim,
            state: PlaybackState::Running,
            pending: None,
            next_token: 0,
        }
    }

    pub fn sim(&self) -> &SimState {
        &self.sim
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == PlaybackState::Running
    }

    /// Running, nothing in flight, and something to move
    pub fn wants_frame(&self) -> bool {
        self.is_running() && self.pending.is_none() && !self.sim.balls().is_empty()
    }

    /// Reserve the next frame. Returns `None` if no frame should be scheduled.
    pub fn request_frame(&mut self) -> Option<FrameToken> {
        if !self.wants_frame() {
            return None;
        }
        let token = FrameToken(self.next_token);
        self.next_token += 1;
        self.pending = Some(PendingFrame {
            token,
            host_id: None,
        });
        Some(token)
    }

    /// Record the host handle for a reserved frame so it can be cancelled
    pub fn frame_scheduled(&mut self, token: FrameToken, host_id: HostFrameId) {
        match self.pending.as_mut() {
            Some(pending) if pending.token == token => pending.host_id = Some(host_id),
            _ => log::debug!("Host id {} for stale frame {:?}", host_id, token),
        }
    }

    /// Host frame callback: advance one tick if `token` is the pending frame
    pub fn on_frame(&mut self, token: FrameToken) -> FrameOutcome {
        match self.pending {
            Some(pending) if pending.token == token => self.pending = None,
            _ => {
                log::debug!("Ignoring stale frame {:?}", token);
                return FrameOutcome::Halt;
            }
        }

        if !self.is_running() {
            return FrameOutcome::Halt;
        }

        self.sim.advance();

        if self.wants_frame() {
            FrameOutcome::Continue
        } else {
            FrameOutcome::Halt
        }
    }

    /// Flip Running/Paused. Returns a host frame to cancel when pausing.
    pub fn toggle(&mut self) -> Option<HostFrameId> {
        self.state = self.state.toggled();
        log::info!("Playback {:?}", self.state);
        match self.state {
            PlaybackState::Paused => self.take_pending(),
            PlaybackState::Running => None,
        }
    }

    /// Drop the pending frame without touching Running/Paused, for page
    /// teardown or a failed request. Returns a host frame to cancel, if any.
    pub fn cancel_pending(&mut self) -> Option<HostFrameId> {
        self.take_pending()
    }

    fn take_pending(&mut self) -> Option<HostFrameId> {
        self.pending.take().and_then(|p| p.host_id)
    }

    /// Spawn the initial set of balls (first mount)
    pub fn initialize(&mut self, bounds: Option<Bounds>) {
        self.sim.initialize(bounds);
    }

    pub fn reset(&mut self) {
        self.sim.reset();
    }

    pub fn add_ball(&mut self) {
        self.sim.add_ball();
    }

    pub fn resize(&mut self, bounds: Option<Bounds>) {
        self.sim.resize(bounds);
    }
}
