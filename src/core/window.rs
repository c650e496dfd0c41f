use std::cell::Cell;

use super::display_context::DisplayContext;

/// Host surface the frame loop draws into and reschedules against
pub trait WindowContext {
    /// Current inner size in physical pixels
    fn dimensions(&self) -> DisplayContext;

    /// Ask the host to deliver another frame callback
    fn request_redraw(&self);
}

impl WindowContext for winit::window::Window {
    fn dimensions(&self) -> DisplayContext {
        let size = self.inner_size();
        DisplayContext::new(size.width, size.height)
    }

    fn request_redraw(&self) {
        winit::window::Window::request_redraw(self);
    }
}

/// Window stand-in for offscreen runs; counts redraw requests
#[derive(Debug)]
pub struct HeadlessWindow {
    viewport: DisplayContext,
    redraws: Cell<u64>,
}

impl HeadlessWindow {
    pub fn new(viewport: DisplayContext) -> Self {
        Self {
            viewport,
            redraws: Cell::new(0),
        }
    }

    pub fn redraw_requests(&self) -> u64 {
        self.redraws.get()
    }
}

impl WindowContext for HeadlessWindow {
    fn dimensions(&self) -> DisplayContext {
        self.viewport
    }

    fn request_redraw(&self) {
        self.redraws.set(self.redraws.get() + 1);
    }
}
