use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info};
use winit::application::ApplicationHandler;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use mesh_scenes::cli::Cli;
use mesh_scenes::core::{draw_fps, DisplayContext, HeadlessWindow, SurfaceRenderer, WindowContext, WinitController};
use mesh_scenes::frame::{FpsCounter, FrameInfo, FrameIterator};
use mesh_scenes::{bootstrap, AppConfig, CancellationToken, FrameDriver, RunMode, SoftwareRenderer, Stage};

const INITIAL_WINDOW_WIDTH: u32 = 1280;
const INITIAL_WINDOW_HEIGHT: u32 = 720;

/// Window-bound state, created once the event loop is live
struct Running {
    window: Arc<Window>,
    renderer: SurfaceRenderer,
    stage: Stage,
    driver: FrameDriver,
}

impl Running {
    fn start(event_loop: &ActiveEventLoop, config: &AppConfig) -> Result<Self> {
        let window = Arc::new(
            event_loop.create_window(
                Window::default_attributes()
                    .with_title(format!("Mesh Scenes - {}", config.scene))
                    .with_inner_size(winit::dpi::LogicalSize::new(INITIAL_WINDOW_WIDTH, INITIAL_WINDOW_HEIGHT)),
            )?,
        );

        let viewport = window.dimensions();
        let renderer = SurfaceRenderer::new(window.clone(), viewport, config.clear_color, config.show_ui)?;
        let (stage, driver) = bootstrap(config, viewport, &*window)?;

        Ok(Self {
            window,
            renderer,
            stage,
            driver,
        })
    }
}

struct App {
    config: AppConfig,
    running: Option<Running>,
    controller: WinitController,
    fps: FpsCounter,
    frame_number: u64,
    start_time: Instant,
    last_frame_time: Instant,
    cancel: CancellationToken,
    failure: Option<anyhow::Error>,
}

impl App {
    fn new(config: AppConfig) -> Self {
        let now = Instant::now();
        Self {
            config,
            running: None,
            controller: WinitController::new(),
            fps: FpsCounter::new(),
            frame_number: 0,
            start_time: now,
            last_frame_time: now,
            cancel: CancellationToken::new(),
            failure: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        error!("{:#}", err);
        self.failure = Some(err);
        self.cancel.cancel();
        event_loop.exit();
    }

    fn next_frame(&mut self) -> FrameInfo {
        let now = Instant::now();
        let delta = now.duration_since(self.last_frame_time).as_secs_f32();
        self.last_frame_time = now;

        let frame = FrameInfo::new(self.frame_number, now.duration_since(self.start_time).as_secs_f32(), delta);
        self.frame_number += 1;

        if let Some(fps) = self.fps.tick(delta) {
            info!("FPS: {:.1}", fps);
        }
        frame
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        if self.cancel.is_cancelled() {
            return;
        }

        let frame = self.next_frame();
        let fps = self.fps.fps();
        let Some(Running {
            window,
            renderer,
            stage,
            driver,
        }) = self.running.as_mut()
        else {
            return;
        };

        let mut result = Ok(());
        if let Some(overlay) = renderer.overlay_mut() {
            let gui = stage.gui.as_ref();
            let scene = &mut stage.scene;
            overlay.run(&**window, |ctx| {
                draw_fps(ctx, fps);
                if let Some(gui) = gui {
                    if let Err(err) = gui.show(ctx, scene) {
                        result = Err(err);
                    }
                }
            });
        }

        if let Some(controls) = stage.controls.as_mut() {
            controls.handle_input(&self.controller);
        }

        let result = result.and_then(|()| driver.tick(stage, renderer, &**window, frame));
        self.controller.reset_deltas();

        if let Err(err) = result {
            self.fail(event_loop, anyhow::Error::new(err).context(format!("frame {}", frame.number)));
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.running.is_some() {
            return;
        }

        match Running::start(event_loop, &self.config) {
            Ok(running) => self.running = Some(running),
            Err(err) => self.fail(event_loop, err.context("failed to start")),
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        // Let egui handle the event first
        if let Some(running) = self.running.as_mut() {
            if running.renderer.handle_event(&running.window, &event) {
                self.controller.process_consumed_event(&event);
                return;
            }
        }
        self.controller.process_event(&event);

        match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => {
                info!("shutting down after {} frames", self.frame_number);
                self.cancel.cancel();
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if let Some(running) = self.running.as_mut() {
                    running.renderer.resize(size.width, size.height);
                }
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }
}

fn run_headless(config: &AppConfig) -> Result<()> {
    let viewport = DisplayContext::validated(config.width, config.height)?;
    let window = HeadlessWindow::new(viewport);
    let (mut stage, mut driver) = bootstrap(config, viewport, &window)?;
    let mut renderer = SoftwareRenderer::new(viewport, config.clear_color);

    let mode = config.frames.map_or(RunMode::UntilCancelled, RunMode::Ticks);
    let started = Instant::now();
    let ticks = driver.run(
        &mut stage,
        &mut renderer,
        &window,
        FrameIterator::new(),
        mode,
        &CancellationToken::new(),
    )?;

    info!(
        "headless run finished: {} frames in {:.2}s",
        ticks,
        started.elapsed().as_secs_f32()
    );
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = cli.resolve().context("loading configuration")?;

    if cli.headless {
        return run_headless(&config);
    }

    let event_loop = EventLoop::new()?;
    let mut app = App::new(config);

    info!("Mesh Scenes - drag to orbit, scroll to zoom, Escape to quit");
    event_loop.run_app(&mut app)?;

    match app.failure.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
