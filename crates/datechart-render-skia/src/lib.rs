// File: crates/datechart-render-skia/src/lib.rs
// Summary: Skia renderer: rasterizes date chart frames and hover labels to PNG bytes.

use anyhow::{anyhow, Result};
use datechart_core::{Color, Frame, Label, Point, Rect, Renderer, Size};
use skia_safe as skia;
use tracing::{trace, warn};

const BAR_BACKGROUND: Color = Color::rgb(40, 40, 45);
const ACTIVE_BACKGROUND: Color = Color::rgb(70, 70, 80);
const LABEL_BACKGROUND: Color = Color::rgba(20, 20, 24, 230);
const LABEL_TEXT: Color = Color::rgb(235, 235, 245);
const LABEL_FONT_SIZE: f32 = 12.0;

/// CPU raster backend. Every render and label change repaints the whole
/// picture into a fresh surface and re-encodes the PNG.
pub struct SkiaRenderer {
    container: Size,
    background: skia::Color,
    frame: Option<Frame>,
    label: Option<(Label, Point)>,
    png: Vec<u8>,
}

impl SkiaRenderer {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            container: Size::new(width, height),
            background: skia::Color::from_argb(255, 18, 18, 20), // near-black
            frame: None,
            label: None,
            png: Vec::new(),
        }
    }

    pub fn with_background(mut self, color: Color) -> Self {
        self.background = to_skia(color);
        self
    }

    /// PNG of the last picture; empty until the first frame.
    pub fn png(&self) -> &[u8] {
        &self.png
    }

    pub fn write_png(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        if self.png.is_empty() {
            return Err(anyhow!("nothing rendered yet"));
        }
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, &self.png)?;
        Ok(())
    }

    fn repaint(&mut self) -> Result<()> {
        let Some(frame) = &self.frame else { return Ok(()) };
        self.png = rasterize(frame, self.label.as_ref(), self.background)?;
        trace!(bytes = self.png.len(), "repainted chart png");
        Ok(())
    }
}

impl Renderer for SkiaRenderer {
    fn container_size(&self) -> Size {
        self.container
    }

    fn render(&mut self, frame: &Frame) -> Result<()> {
        self.frame = Some(frame.clone());
        self.label = None;
        self.repaint()
    }

    fn show_label(&mut self, label: &Label, anchor: Point) {
        self.label = Some((label.clone(), anchor));
        if let Err(err) = self.repaint() {
            warn!(error = %err, "label repaint failed");
        }
    }

    fn hide_label(&mut self) {
        if self.label.take().is_some() {
            if let Err(err) = self.repaint() {
                warn!(error = %err, "label repaint failed");
            }
        }
    }
}

// ---- helpers ----------------------------------------------------------------

fn to_skia(c: Color) -> skia::Color {
    skia::Color::from_argb(c.a, c.r, c.g, c.b)
}

fn to_rect(r: Rect) -> skia::Rect {
    skia::Rect::from_xywh(r.left, r.top, r.width, r.height)
}

fn rasterize(frame: &Frame, label: Option<&(Label, Point)>, background: skia::Color) -> Result<Vec<u8>> {
    let w = frame.size.width.ceil().max(1.0) as i32;
    let h = frame.size.height.ceil().max(1.0) as i32;
    let mut surface = skia::surfaces::raster_n32_premul((w, h))
        .ok_or_else(|| anyhow!("failed to create raster surface"))?;
    let canvas = surface.canvas();
    canvas.clear(background);

    canvas.save();
    canvas.translate((frame.margin.left, frame.margin.top));

    let mut back = skia::Paint::default();
    back.set_style(skia::paint::Style::Fill);

    let mut fill = skia::Paint::default();
    fill.set_style(skia::paint::Style::Fill);

    let mut stroke = skia::Paint::default();
    stroke.set_anti_alias(true);
    stroke.set_style(skia::paint::Style::Stroke);
    stroke.set_stroke_width(1.0);

    for bar in &frame.bars {
        back.set_color(to_skia(if bar.active { ACTIVE_BACKGROUND } else { BAR_BACKGROUND }));
        canvas.draw_rect(to_rect(bar.background), &back);

        fill.set_color(to_skia(bar.fill));
        canvas.draw_rect(to_rect(bar.foreground), &fill);
        stroke.set_color(to_skia(bar.stroke));
        canvas.draw_rect(to_rect(bar.foreground), &stroke);
    }
    canvas.restore();

    if let Some((label, anchor)) = label {
        draw_label(canvas, label, *anchor);
    }

    let image = surface.image_snapshot();
    #[allow(deprecated)]
    let data = image
        .encode_to_data(skia::EncodedImageFormat::PNG)
        .ok_or_else(|| anyhow!("encode PNG failed"))?;
    Ok(data.as_bytes().to_vec())
}

/// Tooltip box above `anchor`, one line per label row.
fn draw_label(canvas: &skia::Canvas, label: &Label, anchor: Point) {
    let mut font = skia::Font::default();
    font.set_size(LABEL_FONT_SIZE);

    let lines: Vec<String> = label.rows().iter().map(|(k, v)| format!("{k}: {v}")).collect();
    let line_h = LABEL_FONT_SIZE + 4.0;
    let pad = 6.0;
    let text_w = lines
        .iter()
        .map(|l| font.measure_str(l, None).0)
        .fold(0.0f32, f32::max);
    let box_w = text_w + pad * 2.0;
    let box_h = line_h * lines.len() as f32 + pad * 2.0;
    let left = (anchor.x - box_w * 0.5).max(0.0);
    let top = (anchor.y - box_h - 4.0).max(0.0);

    let mut bg = skia::Paint::default();
    bg.set_anti_alias(true);
    bg.set_color(to_skia(LABEL_BACKGROUND));
    canvas.draw_rect(skia::Rect::from_xywh(left, top, box_w, box_h), &bg);

    let mut text = skia::Paint::default();
    text.set_anti_alias(true);
    text.set_color(to_skia(LABEL_TEXT));
    for (i, line) in lines.iter().enumerate() {
        let baseline = top + pad + line_h * (i as f32 + 1.0) - 4.0;
        canvas.draw_str(line, (left + pad, baseline), &font, &text);
    }
}
