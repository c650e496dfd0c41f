pub mod controller;
pub mod display_context;
pub mod gpu_context;
pub mod input_adapter;
pub mod surface_renderer;
pub mod ui_overlay;
pub mod window;

pub use controller::{Button, Controller};
pub use display_context::DisplayContext;
pub use gpu_context::GpuContext;
pub use input_adapter::WinitController;
pub use surface_renderer::{SurfaceRenderer, SURFACE_CONTAINER};
pub use ui_overlay::{draw_fps, UiOverlay};
pub use window::{HeadlessWindow, WindowContext};
