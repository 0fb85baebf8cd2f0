use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::status::StatusBoard;

use super::color::Color;
use super::error::DisplayError;
use super::text::TextRenderer;

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DrawOp {
    pub x: i32,
    pub y: i32,
    pub color: Color,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Frame {
    pub sequence: u64,
    pub presented_at: DateTime<Utc>,
    pub width_px: i32,
    pub height_px: i32,
    pub ops: Vec<DrawOp>,
}

/// Monospace text sink with a fixed glyph advance. Presented frames go to the
/// status board so the dashboard can mirror the panel.
pub struct VirtualDisplay {
    width_px: i32,
    height_px: i32,
    glyph_width_px: i32,
    pending: Vec<DrawOp>,
    sequence: u64,
    status: StatusBoard,
}

impl VirtualDisplay {
    pub fn new(width_px: i32, height_px: i32, glyph_width_px: i32, status: StatusBoard) -> Self {
        Self {
            width_px,
            height_px,
            glyph_width_px,
            pending: Vec::new(),
            sequence: 0,
            status,
        }
    }
}

impl TextRenderer for VirtualDisplay {
    fn measure(&self, text: &str) -> i32 {
        text.chars().count() as i32 * self.glyph_width_px
    }

    fn draw_at(&mut self, x: i32, y: i32, color: Color, text: &str) -> Result<(), DisplayError> {
        if y < 0 || y > self.height_px {
            return Err(DisplayError::Draw(format!(
                "baseline {} outside 0..={}",
                y, self.height_px
            )));
        }
        self.pending.push(DrawOp {
            x,
            y,
            color,
            text: text.to_string(),
        });
        Ok(())
    }

    fn clear(&mut self) -> Result<(), DisplayError> {
        self.pending.clear();
        Ok(())
    }

    fn present(&mut self) -> Result<(), DisplayError> {
        self.sequence += 1;
        let frame = Frame {
            sequence: self.sequence,
            presented_at: Utc::now(),
            width_px: self.width_px,
            height_px: self.height_px,
            ops: std::mem::take(&mut self.pending),
        };
        log::trace!("frame {} with {} ops", frame.sequence, frame.ops.len());
        self.status.publish_frame(frame);
        Ok(())
    }
}
