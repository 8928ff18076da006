use crate::error::PlotResult;
use crate::render::{RenderFrame, Renderer};

/// Headless renderer that validates frames and records what it was given.
#[derive(Debug, Default)]
pub struct NullRenderer {
    pub frames_rendered: u64,
    pub last_line_count: usize,
    pub last_circle_count: usize,
    pub last_text_count: usize,
}

impl Renderer for NullRenderer {
    fn render(&mut self, frame: &RenderFrame) -> PlotResult<()> {
        frame.validate()?;
        self.frames_rendered += 1;
        self.last_line_count = frame.lines().count();
        self.last_circle_count = frame.circles().count();
        self.last_text_count = frame.texts().count();
        Ok(())
    }
}
