// File: crates/datechart-core/src/svg.rs
// Summary: Renderer that serializes frames to a standalone SVG document.

use std::fmt::Write as _;

use anyhow::Result;

use crate::geometry::{Point, Size};
use crate::render::{Frame, Label, Renderer};

/// Keeps the latest frame and tooltip; [`SvgRenderer::to_svg`] builds the
/// document from scratch each time.
#[derive(Clone, Debug, Default)]
pub struct SvgRenderer {
    container: Size,
    frame: Option<Frame>,
    label: Option<(Label, Point)>,
}

impl SvgRenderer {
    pub fn new(width: f32, height: f32) -> Self {
        Self { container: Size::new(width, height), frame: None, label: None }
    }

    pub fn frame(&self) -> Option<&Frame> {
        self.frame.as_ref()
    }

    /// Empty string until the first frame is rendered.
    pub fn to_svg(&self) -> String {
        let Some(frame) = &self.frame else { return String::new() };
        let mut out = String::new();
        let _ = writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}">"#,
            frame.size.width, frame.size.height
        );
        let _ = writeln!(
            out,
            r#"  <g transform="translate({},{})">"#,
            frame.margin.left, frame.margin.top
        );
        for bar in &frame.bars {
            let class = if bar.active { "bar active" } else { "bar" };
            let cursor = if frame.clickable { r#" cursor="pointer""# } else { "" };
            let _ = writeln!(
                out,
                r#"    <g class="{class}" data-index="{}" transform="translate({},0)"{cursor}>"#,
                bar.index, bar.background.left
            );
            let _ = writeln!(
                out,
                r#"      <rect class="background-bar" width="{}" height="{}"/>"#,
                bar.background.width, bar.background.height
            );
            let _ = writeln!(
                out,
                r#"      <rect class="foreground-bar" fill="{}" stroke="{}" width="{}" height="{}" y="{}"/>"#,
                bar.fill, bar.stroke, bar.foreground.width, bar.foreground.height, bar.foreground.top
            );
            let _ = writeln!(out, "      <title>{}</title>", escape(&bar.label.text()));
            out.push_str("    </g>\n");
        }
        out.push_str("  </g>\n");
        if let Some((label, anchor)) = &self.label {
            let _ = writeln!(
                out,
                r#"  <g class="chart-hover-label" transform="translate({},{})">"#,
                anchor.x, anchor.y
            );
            for (i, (k, v)) in label.rows().iter().enumerate() {
                let _ = writeln!(
                    out,
                    r#"    <text y="{}">{}: {}</text>"#,
                    -14.0 * (label.rows().len() - i) as f32,
                    escape(k),
                    escape(v)
                );
            }
            out.push_str("  </g>\n");
        }
        out.push_str("</svg>\n");
        out
    }

    pub fn write_to(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_svg())?;
        Ok(())
    }
}

impl Renderer for SvgRenderer {
    fn container_size(&self) -> Size {
        self.container
    }

    fn render(&mut self, frame: &Frame) -> Result<()> {
        self.frame = Some(frame.clone());
        self.label = None;
        Ok(())
    }

    fn show_label(&mut self, label: &Label, anchor: Point) {
        self.label = Some((label.clone(), anchor));
    }

    fn hide_label(&mut self) {
        self.label = None;
    }
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_until_rendered() {
        assert_eq!(SvgRenderer::new(100.0, 50.0).to_svg(), "");
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(escape(r#"<a & "b">"#), "&lt;a &amp; &quot;b&quot;&gt;");
    }
}
