//! Per-frame render/update cycle
//!
//! The driver is `Idle` until [`FrameDriver::schedule`] asks the window for
//! a first redraw. From then on each [`FrameDriver::tick`] draws the scene,
//! applies this frame's mutations and requests the next redraw, so frame N
//! shows the state produced by frame N-1.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{debug, trace, warn};

use crate::bootstrap::Stage;
use crate::core::WindowContext;
use crate::error::{Result, SceneError};
use crate::frame::FrameInfo;
use crate::renderer::Renderer;

/// Increment applied per frame by the stock animations
pub const DEFAULT_RATE: f32 = 0.001;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    /// No frame callback pending
    Idle,
    /// A redraw has been requested from the window
    Scheduled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// Fixed state change applied once per frame, after drawing
#[derive(Debug, Clone, PartialEq)]
pub enum FrameMutation {
    /// Add `rate` radians to the named node's yaw (y) and roll (z)
    Spin { target: String, rate: f32 },
    /// Add `rate` to the scale of every node in the scene on `axis`
    Grow { axis: Axis, rate: f32 },
}

impl FrameMutation {
    pub fn spin(target: impl Into<String>, rate: f32) -> Self {
        Self::Spin {
            target: target.into(),
            rate,
        }
    }

    /// Name of the node this mutation needs, if any
    pub fn target(&self) -> Option<&str> {
        match self {
            FrameMutation::Spin { target, .. } => Some(target),
            FrameMutation::Grow { .. } => None,
        }
    }

    fn apply(&self, stage: &mut Stage) -> Result<()> {
        match self {
            FrameMutation::Spin { target, rate } => {
                let node = stage.scene.get_by_name_mut(target)?;
                node.transform.rotation.y += *rate;
                node.transform.rotation.z += *rate;
            }
            FrameMutation::Grow { axis, rate } => {
                stage.scene.traverse_mut(|node| match axis {
                    Axis::X => node.transform.scale.x += *rate,
                    Axis::Y => node.transform.scale.y += *rate,
                    Axis::Z => node.transform.scale.z += *rate,
                });
            }
        }
        Ok(())
    }
}

/// How long [`FrameDriver::run`] keeps going
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Stop after this many ticks
    Ticks(u64),
    /// Stop once the cancellation token is tripped
    UntilCancelled,
}

/// Shared stop flag for a running frame loop
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

#[derive(Debug, Clone)]
pub struct FrameDriver {
    state: DriverState,
    mutations: Vec<FrameMutation>,
    ticks: u64,
}

impl FrameDriver {
    pub fn new(mutations: Vec<FrameMutation>) -> Self {
        Self {
            state: DriverState::Idle,
            mutations,
            ticks: 0,
        }
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn mutations(&self) -> &[FrameMutation] {
        &self.mutations
    }

    /// Ticks completed since construction
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Request the first frame; no-op when already scheduled
    pub fn schedule(&mut self, window: &dyn WindowContext) {
        if self.state == DriverState::Scheduled {
            debug!("frame driver already scheduled");
            return;
        }
        self.state = DriverState::Scheduled;
        window.request_redraw();
        debug!("frame driver scheduled with {} mutation(s)", self.mutations.len());
    }

    /// Run one frame: draw, mutate, update controls, reschedule
    ///
    /// On error the driver drops back to `Idle` and the error is returned.
    pub fn tick<R: Renderer + ?Sized>(
        &mut self,
        stage: &mut Stage,
        renderer: &mut R,
        window: &dyn WindowContext,
        frame: FrameInfo,
    ) -> Result<()> {
        if self.state != DriverState::Scheduled {
            return Err(SceneError::NotScheduled);
        }

        if let Err(err) = self.step(stage, renderer) {
            warn!("frame {} aborted: {}", frame.number, err);
            self.state = DriverState::Idle;
            return Err(err);
        }

        self.ticks += 1;
        trace!("frame {} done at {:.3}s", frame.number, frame.time);
        window.request_redraw();
        Ok(())
    }

    fn step<R: Renderer + ?Sized>(&self, stage: &mut Stage, renderer: &mut R) -> Result<()> {
        renderer.render(&stage.scene, &stage.camera)?;

        // A frame's mutations land together or not at all
        for target in self.mutations.iter().filter_map(FrameMutation::target) {
            stage.scene.get_by_name(target)?;
        }
        for mutation in &self.mutations {
            mutation.apply(stage)?;
        }

        if let Some(controls) = stage.controls.as_mut() {
            controls.update(&mut stage.camera);
        }
        Ok(())
    }

    /// Drive ticks from `frames` until `mode` is satisfied, the token is
    /// cancelled or the frame source runs dry; returns the ticks executed
    pub fn run<R, I>(
        &mut self,
        stage: &mut Stage,
        renderer: &mut R,
        window: &dyn WindowContext,
        frames: I,
        mode: RunMode,
        cancel: &CancellationToken,
    ) -> Result<u64>
    where
        R: Renderer + ?Sized,
        I: IntoIterator<Item = FrameInfo>,
    {
        self.schedule(window);

        let mut executed = 0;
        for frame in frames {
            if cancel.is_cancelled() {
                debug!("frame loop cancelled after {} tick(s)", executed);
                break;
            }
            if let RunMode::Ticks(limit) = mode {
                if executed >= limit {
                    break;
                }
            }
            self.tick(stage, renderer, window, frame)?;
            executed += 1;
        }
        Ok(executed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_driver_is_idle() {
        let driver = FrameDriver::new(vec![FrameMutation::spin("plane-1", DEFAULT_RATE)]);
        assert_eq!(driver.state(), DriverState::Idle);
        assert_eq!(driver.ticks(), 0);
        assert_eq!(driver.mutations().len(), 1);
    }

    #[test]
    fn test_cancellation_token_is_shared() {
        let token = CancellationToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());

        token.cancel();
        assert!(clone.is_cancelled());
    }

    #[test]
    fn test_only_spin_names_a_target() {
        assert_eq!(FrameMutation::spin("plane-1", 0.1).target(), Some("plane-1"));
        assert_eq!(FrameMutation::Grow { axis: Axis::X, rate: 0.1 }.target(), None);
    }

    #[test]
    fn test_spin_constructor() {
        assert_eq!(
            FrameMutation::spin("a", 0.5),
            FrameMutation::Spin { target: "a".into(), rate: 0.5 }
        );
    }
}
