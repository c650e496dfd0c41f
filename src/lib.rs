pub mod bootstrap;
pub mod camera;
pub mod cli;
pub mod config;
pub mod controls;
pub mod core;
pub mod driver;
pub mod error;
pub mod frame;
pub mod gui;
pub mod math;
pub mod primitives;
pub mod renderer;
pub mod scene;
pub mod scenes;

pub use bootstrap::{bootstrap, Stage};
pub use camera::PerspectiveCamera;
pub use config::{AppConfig, SceneKind};
pub use driver::{CancellationToken, DriverState, FrameDriver, FrameMutation, RunMode};
pub use error::{Result, SceneError};
pub use renderer::{Renderer, SoftwareRenderer};
pub use scene::{Scene, SceneNode, Transform};
