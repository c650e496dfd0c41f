use std::cell::Cell;
use std::f32::consts::FRAC_PI_2;
use std::rc::Rc;

use mesh_scenes::camera::PerspectiveCamera;
use mesh_scenes::controls::Controls;
use mesh_scenes::core::{DisplayContext, HeadlessWindow, WindowContext};
use mesh_scenes::driver::{Axis, CancellationToken, DriverState, FrameDriver, FrameMutation, RunMode, DEFAULT_RATE};
use mesh_scenes::frame::FrameInfo;
use mesh_scenes::primitives::make_box;
use mesh_scenes::renderer::{Renderer, SoftwareRenderer};
use mesh_scenes::{bootstrap, AppConfig, Result, Scene, SceneError, Stage};

/// Records the plane's yaw as seen at render time
#[derive(Default)]
struct RecordingRenderer {
    seen: Vec<f32>,
    fail_at: Option<usize>,
    cancel_after: Option<(usize, CancellationToken)>,
    clear_color: u32,
}

impl Renderer for RecordingRenderer {
    fn render(&mut self, scene: &Scene, _camera: &PerspectiveCamera) -> Result<()> {
        if self.fail_at == Some(self.seen.len()) {
            return Err(SceneError::Render("device lost".into()));
        }

        let yaw = scene.find_by_name("plane-1").map_or(f32::NAN, |node| node.transform.rotation.y);
        self.seen.push(yaw);

        if let Some((after, token)) = &self.cancel_after {
            if self.seen.len() == *after {
                token.cancel();
            }
        }
        Ok(())
    }

    fn clear_color(&self) -> u32 {
        self.clear_color
    }

    fn set_clear_color(&mut self, color: u32) {
        self.clear_color = color;
    }
}

struct CountingControls {
    updates: Rc<Cell<u32>>,
}

impl Controls for CountingControls {
    fn update(&mut self, camera: &mut PerspectiveCamera) {
        self.updates.set(self.updates.get() + 1);
        camera.position.x += 1.0;
    }
}

fn frames() -> impl Iterator<Item = FrameInfo> {
    (0u64..).map(|n| FrameInfo::new(n, n as f32 / 60.0, 1.0 / 60.0))
}

fn mesh_animation(viewport: DisplayContext) -> (Stage, FrameDriver, HeadlessWindow) {
    let window = HeadlessWindow::new(viewport);
    let (stage, driver) = bootstrap(&AppConfig::default(), viewport, &window).unwrap();
    (stage, driver, window)
}

#[cfg(test)]
mod frame_driver_tests {
    use super::*;

    #[test]
    fn test_thousand_ticks_match_closed_form() {
        let viewport = DisplayContext::new(8, 6);
        let (mut stage, mut driver, window) = mesh_animation(viewport);
        let mut renderer = SoftwareRenderer::new(viewport, 0x000000);

        for frame in frames().take(1000) {
            driver.tick(&mut stage, &mut renderer, &window, frame).unwrap();
        }

        let expected = 1000.0 * DEFAULT_RATE;
        let plane = stage.scene.get_by_name("plane-1").unwrap();
        assert!((plane.transform.rotation.y - expected).abs() < 1e-4);
        assert!((plane.transform.rotation.z - expected).abs() < 1e-4);
        assert!((plane.transform.rotation.x - FRAC_PI_2).abs() < 1e-6);

        let mut visited = 0;
        stage.scene.traverse(|node| {
            visited += 1;
            assert!((node.transform.scale.x - (1.0 + expected)).abs() < 1e-4);
            assert_eq!(node.transform.scale.y, 1.0);
        });
        assert_eq!(visited, 3);

        assert_eq!(driver.ticks(), 1000);
        assert_eq!(renderer.frames_drawn(), 1000);
        assert_eq!(driver.state(), DriverState::Scheduled);
    }

    #[test]
    fn test_render_sees_previous_frame_state() {
        let (mut stage, mut driver, window) = mesh_animation(DisplayContext::new(4, 4));
        let mut renderer = RecordingRenderer::default();

        for frame in frames().take(3) {
            driver.tick(&mut stage, &mut renderer, &window, frame).unwrap();
        }

        assert_eq!(renderer.seen.len(), 3);
        assert_eq!(renderer.seen[0], 0.0);
        assert!((renderer.seen[1] - DEFAULT_RATE).abs() < 1e-7);
        assert!((renderer.seen[2] - 2.0 * DEFAULT_RATE).abs() < 1e-7);
    }

    #[test]
    fn test_each_tick_requests_a_redraw() {
        let (mut stage, mut driver, window) = mesh_animation(DisplayContext::new(4, 4));
        assert_eq!(window.redraw_requests(), 1);

        let mut renderer = RecordingRenderer::default();
        for frame in frames().take(4) {
            driver.tick(&mut stage, &mut renderer, &window, frame).unwrap();
        }
        assert_eq!(window.redraw_requests(), 5);
    }

    #[test]
    fn test_tick_before_schedule_fails() {
        let window = HeadlessWindow::new(DisplayContext::new(4, 4));
        let mut stage = Stage::new(Scene::new(), PerspectiveCamera::for_viewport(&window.dimensions()));
        let mut driver = FrameDriver::new(Vec::new());
        let mut renderer = RecordingRenderer::default();

        let err = driver
            .tick(&mut stage, &mut renderer, &window, FrameInfo::new(0, 0.0, 0.0))
            .unwrap_err();
        assert_eq!(err, SceneError::NotScheduled);
        assert!(renderer.seen.is_empty());
        assert_eq!(window.redraw_requests(), 0);
    }

    #[test]
    fn test_missing_spin_target_stops_the_loop() {
        let window = HeadlessWindow::new(DisplayContext::new(4, 4));
        let mut scene = Scene::new();
        scene.add(make_box(1.0, 1.0, 1.0).unwrap().with_name("cube"));
        let mut stage = Stage::new(scene, PerspectiveCamera::for_viewport(&window.dimensions()));

        let mut driver = FrameDriver::new(vec![
            FrameMutation::Grow { axis: Axis::Y, rate: DEFAULT_RATE },
            FrameMutation::spin("plane-1", DEFAULT_RATE),
        ]);
        driver.schedule(&window);

        let mut renderer = RecordingRenderer::default();
        let err = driver
            .tick(&mut stage, &mut renderer, &window, FrameInfo::new(0, 0.0, 0.0))
            .unwrap_err();

        assert_eq!(err, SceneError::NodeNotFound("plane-1".into()));
        assert_eq!(driver.state(), DriverState::Idle);
        assert_eq!(renderer.seen.len(), 1);
        // The grow listed before the failing spin was not applied
        let cube = stage.scene.get_by_name("cube").unwrap();
        assert_eq!(cube.transform.scale.y, 1.0);
        // Only the schedule call asked for a frame
        assert_eq!(window.redraw_requests(), 1);

        let again = driver.tick(&mut stage, &mut renderer, &window, FrameInfo::new(1, 0.1, 0.1));
        assert_eq!(again, Err(SceneError::NotScheduled));
    }

    #[test]
    fn test_render_failure_skips_mutations() {
        let (mut stage, mut driver, window) = mesh_animation(DisplayContext::new(4, 4));
        let mut renderer = RecordingRenderer {
            fail_at: Some(0),
            ..RecordingRenderer::default()
        };

        let err = driver
            .tick(&mut stage, &mut renderer, &window, FrameInfo::new(0, 0.0, 0.0))
            .unwrap_err();

        assert!(matches!(err, SceneError::Render(_)));
        assert_eq!(driver.state(), DriverState::Idle);
        let plane = stage.scene.get_by_name("plane-1").unwrap();
        assert_eq!(plane.transform.rotation.y, 0.0);
        assert_eq!(plane.transform.scale.x, 1.0);
    }

    #[test]
    fn test_controls_update_once_per_tick() {
        let (mut stage, mut driver, window) = mesh_animation(DisplayContext::new(4, 4));
        let updates = Rc::new(Cell::new(0));
        stage.controls = Some(Box::new(CountingControls { updates: updates.clone() }));
        let start_x = stage.camera.position.x;

        let mut renderer = RecordingRenderer::default();
        for frame in frames().take(7) {
            driver.tick(&mut stage, &mut renderer, &window, frame).unwrap();
        }

        assert_eq!(updates.get(), 7);
        assert!((stage.camera.position.x - (start_x + 7.0)).abs() < 1e-5);
    }

    #[test]
    fn test_run_stops_after_tick_budget() {
        let (mut stage, mut driver, window) = mesh_animation(DisplayContext::new(4, 4));
        let mut renderer = RecordingRenderer::default();

        let ticks = driver
            .run(&mut stage, &mut renderer, &window, frames(), RunMode::Ticks(5), &CancellationToken::new())
            .unwrap();

        assert_eq!(ticks, 5);
        assert_eq!(renderer.seen.len(), 5);
        // Already scheduled by bootstrap, so run adds no extra request
        assert_eq!(window.redraw_requests(), 6);
    }

    #[test]
    fn test_run_until_cancelled() {
        let (mut stage, mut driver, window) = mesh_animation(DisplayContext::new(4, 4));
        let token = CancellationToken::new();
        let mut renderer = RecordingRenderer {
            cancel_after: Some((3, token.clone())),
            ..RecordingRenderer::default()
        };

        let ticks = driver
            .run(&mut stage, &mut renderer, &window, frames(), RunMode::UntilCancelled, &token)
            .unwrap();

        assert_eq!(ticks, 3);
        assert!(token.is_cancelled());
    }

    #[test]
    fn test_run_ends_with_frame_source() {
        let (mut stage, mut driver, window) = mesh_animation(DisplayContext::new(4, 4));
        let mut renderer = RecordingRenderer::default();

        let ticks = driver
            .run(
                &mut stage,
                &mut renderer,
                &window,
                frames().take(4),
                RunMode::UntilCancelled,
                &CancellationToken::new(),
            )
            .unwrap();
        assert_eq!(ticks, 4);
    }

    #[test]
    fn test_run_schedules_idle_driver() {
        let window = HeadlessWindow::new(DisplayContext::new(4, 4));
        let mut stage = Stage::new(Scene::new(), PerspectiveCamera::for_viewport(&window.dimensions()));
        let mut driver = FrameDriver::new(Vec::new());
        let mut renderer = RecordingRenderer::default();

        let ticks = driver
            .run(&mut stage, &mut renderer, &window, frames(), RunMode::Ticks(2), &CancellationToken::new())
            .unwrap();

        assert_eq!(ticks, 2);
        assert_eq!(driver.state(), DriverState::Scheduled);
        assert_eq!(window.redraw_requests(), 3);
    }

    #[test]
    fn test_run_propagates_errors() {
        let (mut stage, mut driver, window) = mesh_animation(DisplayContext::new(4, 4));
        let mut renderer = RecordingRenderer {
            fail_at: Some(2),
            ..RecordingRenderer::default()
        };

        let result = driver.run(
            &mut stage,
            &mut renderer,
            &window,
            frames(),
            RunMode::Ticks(10),
            &CancellationToken::new(),
        );

        assert!(matches!(result, Err(SceneError::Render(_))));
        assert_eq!(driver.ticks(), 2);
        assert_eq!(driver.state(), DriverState::Idle);
    }
}
