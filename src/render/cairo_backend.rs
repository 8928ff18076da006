use cairo::{Context, Format, ImageSurface};
use pango::FontDescription;
use std::f64::consts::TAU;

use crate::error::{PlotError, PlotResult};
use crate::render::{
    CirclePrimitive, Color, DrawCommand, LinePrimitive, RenderFrame, Renderer, TextHAlign,
    TextPrimitive,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CairoRenderStats {
    pub lines_drawn: usize,
    pub circles_drawn: usize,
    pub texts_drawn: usize,
}

/// Renderers that can also paint into a caller-owned Cairo context, such as
/// a toolkit draw callback.
pub trait CairoContextRenderer {
    fn render_on_cairo_context(&mut self, context: &Context, frame: &RenderFrame)
    -> PlotResult<()>;
}

/// Cairo + Pango + PangoCairo renderer backend.
///
/// Renders either offscreen into an owned image surface through
/// `Renderer::render`, or in place through `CairoContextRenderer`.
#[derive(Debug)]
pub struct CairoRenderer {
    surface: ImageSurface,
    clear_color: Color,
    last_stats: CairoRenderStats,
}

impl CairoRenderer {
    pub fn new(width: i32, height: i32) -> PlotResult<Self> {
        if width <= 0 || height <= 0 {
            return Err(PlotError::InvalidViewport {
                width: width.max(0) as u32,
                height: height.max(0) as u32,
            });
        }

        let surface = ImageSurface::create(Format::ARgb32, width, height)
            .map_err(|err| map_backend_error("failed to create cairo surface", err))?;
        Ok(Self {
            surface,
            clear_color: Color::rgb(1.0, 1.0, 1.0),
            last_stats: CairoRenderStats::default(),
        })
    }

    #[must_use]
    pub fn surface(&self) -> &ImageSurface {
        &self.surface
    }

    pub fn set_clear_color(&mut self, color: Color) -> PlotResult<()> {
        color.validate()?;
        self.clear_color = color;
        Ok(())
    }

    #[must_use]
    pub fn last_stats(&self) -> CairoRenderStats {
        self.last_stats
    }

    /// Writes the current surface as PNG.
    pub fn write_png(&self, writer: &mut impl std::io::Write) -> PlotResult<()> {
        self.surface
            .write_to_png(writer)
            .map_err(|err| PlotError::Backend(format!("failed to encode png: {err}")))
    }

    fn render_with_context(&mut self, context: &Context, frame: &RenderFrame) -> PlotResult<()> {
        frame.validate()?;

        apply_color(context, self.clear_color);
        context
            .paint()
            .map_err(|err| map_backend_error("failed to clear surface", err))?;

        let mut stats = CairoRenderStats::default();
        for command in &frame.commands {
            match command {
                DrawCommand::Line(line) => {
                    stroke_line(context, line)?;
                    stats.lines_drawn += 1;
                }
                DrawCommand::Circle(circle) => {
                    fill_circle(context, circle)?;
                    stats.circles_drawn += 1;
                }
                DrawCommand::Text(text) => {
                    show_text(context, text)?;
                    stats.texts_drawn += 1;
                }
            }
        }

        self.last_stats = stats;
        Ok(())
    }
}

impl Renderer for CairoRenderer {
    fn render(&mut self, frame: &RenderFrame) -> PlotResult<()> {
        let context = Context::new(&self.surface)
            .map_err(|err| map_backend_error("failed to create cairo context", err))?;
        self.render_with_context(&context, frame)
    }
}

impl CairoContextRenderer for CairoRenderer {
    fn render_on_cairo_context(
        &mut self,
        context: &Context,
        frame: &RenderFrame,
    ) -> PlotResult<()> {
        self.render_with_context(context, frame)
    }
}

fn stroke_line(context: &Context, line: &LinePrimitive) -> PlotResult<()> {
    apply_color(context, line.color);
    context.set_line_width(line.stroke_width);
    context.move_to(line.x1, line.y1);
    context.line_to(line.x2, line.y2);
    context
        .stroke()
        .map_err(|err| map_backend_error("failed to stroke line", err))
}

fn fill_circle(context: &Context, circle: &CirclePrimitive) -> PlotResult<()> {
    apply_color(context, circle.color);
    context.new_sub_path();
    context.arc(circle.cx, circle.cy, circle.radius, 0.0, TAU);
    context
        .fill()
        .map_err(|err| map_backend_error("failed to fill circle", err))
}

fn show_text(context: &Context, text: &TextPrimitive) -> PlotResult<()> {
    let layout = pangocairo::functions::create_layout(context);
    let font_description = FontDescription::from_string(&format!("Sans {}", text.font_size_px));
    layout.set_font_description(Some(&font_description));
    layout.set_text(&text.text);

    let (text_width, _text_height) = layout.pixel_size();
    let offset_x = match text.h_align {
        TextHAlign::Left => 0.0,
        TextHAlign::Center => -f64::from(text_width) / 2.0,
        TextHAlign::Right => -f64::from(text_width),
    };
    let baseline = f64::from(layout.baseline()) / f64::from(pango::SCALE);

    context
        .save()
        .map_err(|err| map_backend_error("failed to save context", err))?;
    context.translate(text.x, text.y);
    if text.rotation_deg != 0.0 {
        context.rotate(text.rotation_deg.to_radians());
    }
    apply_color(context, text.color);
    context.move_to(offset_x, -baseline);
    pangocairo::functions::show_layout(context, &layout);
    context
        .restore()
        .map_err(|err| map_backend_error("failed to restore context", err))
}

fn apply_color(context: &Context, color: Color) {
    context.set_source_rgba(color.red, color.green, color.blue, color.alpha);
}

fn map_backend_error(prefix: &str, err: cairo::Error) -> PlotError {
    PlotError::Backend(format!("{prefix}: {err}"))
}
