use serde::{Deserialize, Serialize};

use crate::core::Viewport;
use crate::error::{PlotError, PlotResult};
use crate::render::{CirclePrimitive, LinePrimitive, TextPrimitive};

/// One drawing instruction. Commands are painted in order, so later entries
/// end up on top.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DrawCommand {
    Line(LinePrimitive),
    Circle(CirclePrimitive),
    Text(TextPrimitive),
}

impl DrawCommand {
    pub fn validate(&self) -> PlotResult<()> {
        match self {
            Self::Line(line) => line.validate(),
            Self::Circle(circle) => circle.validate(),
            Self::Text(text) => text.validate(),
        }
    }
}

/// Backend-agnostic scene for one chart draw pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderFrame {
    pub viewport: Viewport,
    pub commands: Vec<DrawCommand>,
}

impl RenderFrame {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            commands: Vec::new(),
        }
    }

    pub fn push_line(&mut self, line: LinePrimitive) {
        self.commands.push(DrawCommand::Line(line));
    }

    pub fn push_circle(&mut self, circle: CirclePrimitive) {
        self.commands.push(DrawCommand::Circle(circle));
    }

    pub fn push_text(&mut self, text: TextPrimitive) {
        self.commands.push(DrawCommand::Text(text));
    }

    pub fn lines(&self) -> impl Iterator<Item = &LinePrimitive> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Line(line) => Some(line),
            _ => None,
        })
    }

    pub fn circles(&self) -> impl Iterator<Item = &CirclePrimitive> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Circle(circle) => Some(circle),
            _ => None,
        })
    }

    pub fn texts(&self) -> impl Iterator<Item = &TextPrimitive> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Text(text) => Some(text),
            _ => None,
        })
    }

    pub fn validate(&self) -> PlotResult<()> {
        if !self.viewport.is_valid() {
            return Err(PlotError::InvalidViewport {
                width: self.viewport.width,
                height: self.viewport.height,
            });
        }

        for command in &self.commands {
            command.validate()?;
        }

        Ok(())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
