//! Frame scheduling
//!
//! The designer repaints once per frame tick for as long as the view is open,
//! and additionally right after any mutation. `FrameLoop` holds that contract
//! explicitly: the host calls `tick` from its animation-frame callback (or
//! lets `run_timer` drive it) and stops rescheduling once `tick` reports
//! `Stopped`.

use std::time::Duration;

/// Whether the host should schedule another frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// A frame was painted; schedule the next one
    Continue,
    /// The view was torn down; do not reschedule
    Stopped,
}

/// Frame loop state for one open view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameLoop {
    running: bool,
    redraw_requested: bool,
    frames: u64,
}

impl FrameLoop {
    pub fn new() -> Self {
        Self {
            running: true,
            redraw_requested: true,
            frames: 0,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Frames painted so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Ask for a paint before the next tick (after a mutation)
    pub fn request_redraw(&mut self) {
        if self.running {
            self.redraw_requested = true;
        }
    }

    /// Consume a pending redraw request
    pub fn take_redraw_request(&mut self) -> bool {
        std::mem::take(&mut self.redraw_requested)
    }

    /// Account for one frame. Returns `Stopped` once the loop has been stopped.
    pub fn tick(&mut self) -> FrameOutcome {
        if !self.running {
            return FrameOutcome::Stopped;
        }
        self.redraw_requested = false;
        self.frames += 1;
        FrameOutcome::Continue
    }

    /// Tear down; later ticks report `Stopped`
    pub fn stop(&mut self) {
        if self.running {
            log::debug!("Frame loop stopped after {} frames", self.frames);
        }
        self.running = false;
        self.redraw_requested = false;
    }
}

impl Default for FrameLoop {
    fn default() -> Self {
        Self::new()
    }
}

/// Drive `on_frame` on a fixed timer until it returns `Stopped`.
///
/// For hosts without a native animation-frame callback.
pub async fn run_timer<F>(interval: Duration, mut on_frame: F) -> u64
where
    F: FnMut() -> FrameOutcome,
{
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    let mut frames = 0;
    loop {
        ticker.tick().await;
        if on_frame() == FrameOutcome::Stopped {
            break;
        }
        frames += 1;
    }
    log::debug!("Frame timer exited after {} frames", frames);
    frames
}
