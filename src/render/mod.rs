mod frame;
mod null_renderer;
mod primitives;

pub use frame::{DrawCommand, RenderFrame};
pub use null_renderer::NullRenderer;
pub use primitives::{CirclePrimitive, Color, LinePrimitive, TextHAlign, TextPrimitive};

use crate::error::PlotResult;

/// Contract implemented by any drawing surface.
///
/// Backends receive a fully materialized `RenderFrame`, so canvas code stays
/// isolated from series state and axis layout.
pub trait Renderer {
    fn render(&mut self, frame: &RenderFrame) -> PlotResult<()>;
}

#[cfg(feature = "cairo-backend")]
mod cairo_backend;
#[cfg(feature = "cairo-backend")]
pub use cairo_backend::{CairoContextRenderer, CairoRenderStats, CairoRenderer};
