// File: crates/datechart-core/src/render.rs
// Summary: Renderer contract and the per-draw frame handed to backends.

use anyhow::Result;

use crate::color::Color;
use crate::geometry::{Point, Rect, Size};
use crate::types::Margin;

/// Tooltip content for one bar.
#[derive(Clone, Debug, PartialEq)]
pub struct Label {
    pub date: String,
    pub value: String,
}

impl Label {
    pub fn rows(&self) -> [(&'static str, &str); 2] {
        [("Date", self.date.as_str()), ("Avg Count", self.value.as_str())]
    }

    /// One `Name: value` row per line.
    pub fn text(&self) -> String {
        self.rows()
            .iter()
            .map(|(k, v)| format!("{k}: {v}"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Everything a backend needs to draw one bar. Rects are in plot
/// coordinates; translate by the frame margin to get container pixels.
#[derive(Clone, Debug, PartialEq)]
pub struct BarGeometry {
    pub index: usize,
    /// Full-height hit area behind the bar.
    pub background: Rect,
    pub foreground: Rect,
    pub fill: Color,
    pub stroke: Color,
    pub active: bool,
    pub label: Label,
}

/// A complete chart picture. Backends replace whatever they drew before.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    /// Outer size: plot plus margins.
    pub size: Size,
    pub margin: Margin,
    pub plot: Size,
    pub bars: Vec<BarGeometry>,
    /// Whether a click handler is attached to the bars.
    pub clickable: bool,
}

/// Rendering backend for the date chart.
pub trait Renderer {
    /// Pixel size of the hosting container; the chart's default plot size is
    /// this minus its margins.
    fn container_size(&self) -> Size;

    /// Discard the previous picture and draw `frame`.
    fn render(&mut self, frame: &Frame) -> Result<()>;

    /// Show a tooltip near `anchor` (container pixels).
    fn show_label(&mut self, _label: &Label, _anchor: Point) {}

    fn hide_label(&mut self) {}
}

/// Backend that draws nothing but remembers what it was asked to draw.
#[derive(Clone, Debug, Default)]
pub struct NullRenderer {
    pub size: Size,
    pub frames_rendered: usize,
    pub last_bar_count: usize,
    pub label: Option<(Label, Point)>,
}

impl NullRenderer {
    pub fn new(width: f32, height: f32) -> Self {
        Self { size: Size::new(width, height), ..Self::default() }
    }
}

impl Renderer for NullRenderer {
    fn container_size(&self) -> Size {
        self.size
    }

    fn render(&mut self, frame: &Frame) -> Result<()> {
        self.frames_rendered += 1;
        self.last_bar_count = frame.bars.len();
        Ok(())
    }

    fn show_label(&mut self, label: &Label, anchor: Point) {
        self.label = Some((label.clone(), anchor));
    }

    fn hide_label(&mut self) {
        self.label = None;
    }
}
