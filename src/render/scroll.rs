use std::time::Duration;

use serde::Deserialize;

use super::error::DisplayError;
use super::text::{place_x, Line, TextRenderer, ViewportSpec};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollTiming {
    pub hold: Duration,
    pub step: Duration,
    pub step_px: i32,
    pub pause: Duration,
}

impl ScrollTiming {
    pub const STANDARD: ScrollTiming = ScrollTiming {
        hold: Duration::from_millis(1600),
        step: Duration::from_millis(80),
        step_px: 1,
        pause: Duration::from_millis(200),
    };

    /// Faster stepping that reads smoothly on camera.
    pub const CAMERA: ScrollTiming = ScrollTiming {
        hold: Duration::from_millis(1200),
        step: Duration::from_millis(16),
        step_px: 1,
        pause: Duration::from_millis(200),
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollProfile {
    #[default]
    Standard,
    Camera,
}

impl ScrollProfile {
    pub fn timing(&self) -> ScrollTiming {
        match self {
            ScrollProfile::Standard => ScrollTiming::STANDARD,
            ScrollProfile::Camera => ScrollTiming::CAMERA,
        }
    }
}

/// Where the active scrolling line is in its cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Held,
    Scrolling { offset: i32 },
    HeldEnd,
    Pause,
}

#[derive(Debug, Clone)]
struct PlacedLine {
    line: Line,
    width: i32,
}

/// Maps lines of arbitrary length onto a fixed-width viewport over time.
///
/// Lines that fit are drawn in place every frame. Lines that do not fit take
/// turns scrolling: hold at the start, advance `step_px` per `step` until
/// the tail reaches the right edge, hold there, pause with the line hidden,
/// then hand over to the next scrolling line. When everything fits a single
/// frame is presented and later calls draw nothing.
#[derive(Debug)]
pub struct ScrollRenderer {
    viewport: ViewportSpec,
    timing: ScrollTiming,
    lines: Vec<PlacedLine>,
    scrolling: Vec<usize>,
    cursor: usize,
    phase: Phase,
    presented_static: bool,
}

impl ScrollRenderer {
    pub fn new(viewport: ViewportSpec, timing: ScrollTiming) -> Self {
        Self {
            viewport,
            timing,
            lines: Vec::new(),
            scrolling: Vec::new(),
            cursor: 0,
            phase: Phase::Held,
            presented_static: false,
        }
    }

    #[cfg(test)]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Offset of the active scrolling line, zero when nothing scrolls.
    pub fn offset(&self) -> i32 {
        match self.phase {
            Phase::Held | Phase::Pause => 0,
            Phase::Scrolling { offset } => offset,
            Phase::HeldEnd => self.active_span(),
        }
    }

    #[cfg(test)]
    pub fn is_static(&self) -> bool {
        self.scrolling.is_empty()
    }

    /// Distance line `index` travels, zero for lines that fit.
    pub fn scroll_span(&self, index: usize) -> i32 {
        self.lines
            .get(index)
            .map(|l| (l.width - self.viewport.width_px).max(0))
            .unwrap_or(0)
    }

    /// Replaces the lines to show. Returns true when the text changed and the
    /// scroll cycle restarted; style-only changes just force a redraw.
    pub fn set_lines<M: TextRenderer + ?Sized>(&mut self, lines: Vec<Line>, measure: &M) -> bool {
        let same_text = self.lines.len() == lines.len()
            && self.lines.iter().zip(&lines).all(|(p, l)| p.line.text == l.text);

        if same_text {
            if self.lines.iter().zip(&lines).any(|(p, l)| p.line != *l) {
                for (placed, line) in self.lines.iter_mut().zip(lines) {
                    placed.line = line;
                }
                self.presented_static = false;
            }
            return false;
        }

        self.lines = lines
            .into_iter()
            .map(|line| PlacedLine {
                width: measure.measure(&line.text),
                line,
            })
            .collect();
        self.scrolling = self
            .lines
            .iter()
            .enumerate()
            .filter(|(_, l)| l.width > self.viewport.width_px)
            .map(|(i, _)| i)
            .collect();
        self.cursor = 0;
        self.phase = Phase::Held;
        self.presented_static = false;
        true
    }

    /// Draws and presents the current frame, then advances the cycle.
    /// Returns how long the frame should stay up, or `None` when nothing will
    /// change until new lines arrive.
    pub fn draw_frame<R: TextRenderer + ?Sized>(
        &mut self,
        target: &mut R,
    ) -> Result<Option<Duration>, DisplayError> {
        if self.scrolling.is_empty() {
            if !self.presented_static {
                self.compose(target, None)?;
                self.presented_static = true;
            }
            return Ok(None);
        }

        let active = self.scrolling[self.cursor];
        let shown = match self.phase {
            Phase::Pause => None,
            _ => Some(self.offset()),
        };
        self.compose(target, Some((active, shown)))?;

        let span = self.active_span();
        let step_px = self.timing.step_px.max(1);
        let (next, hold) = match self.phase {
            Phase::Held => (
                Phase::Scrolling {
                    offset: step_px.min(span),
                },
                self.timing.hold,
            ),
            Phase::Scrolling { offset } if offset >= span => (Phase::HeldEnd, self.timing.step),
            Phase::Scrolling { offset } => (
                Phase::Scrolling {
                    offset: (offset + step_px).min(span),
                },
                self.timing.step,
            ),
            Phase::HeldEnd => (Phase::Pause, self.timing.hold),
            Phase::Pause => {
                self.cursor = (self.cursor + 1) % self.scrolling.len();
                (Phase::Held, self.timing.pause)
            }
        };
        log::trace!("scroll {:?} -> {:?}", self.phase, next);
        self.phase = next;
        Ok(Some(hold))
    }

    fn active_span(&self) -> i32 {
        self.scrolling
            .get(self.cursor)
            .map(|&i| self.scroll_span(i))
            .unwrap_or(0)
    }

    /// `active` is the scrolling line in its cycle and its offset, `None`
    /// offset hiding it.
    fn compose<R: TextRenderer + ?Sized>(
        &self,
        target: &mut R,
        active: Option<(usize, Option<i32>)>,
    ) -> Result<(), DisplayError> {
        target.clear()?;
        for (i, placed) in self.lines.iter().enumerate() {
            let x = if placed.width <= self.viewport.width_px {
                place_x(placed.line.align, placed.width, &self.viewport)
            } else {
                match active {
                    Some((index, Some(offset))) if index == i => -offset,
                    Some((index, None)) if index == i => continue,
                    _ => 0,
                }
            };
            target.draw_at(x, placed.line.y, placed.line.color, &placed.line.text)?;
        }
        target.present()
    }
}
