// File: crates/datechart-core/src/chart.rs
// Summary: DateChart presenter: owns bucketed state, sizing and colors, and builds frames for a renderer.

use tracing::{debug, trace, warn};

use crate::bucket::{bucket, Bucketed};
use crate::color::{Color, ColorScale, SqrtColorScale};
use crate::config::ChartConfig;
use crate::error::ChartResult;
use crate::format::{DateFormatter, OrdinalDateFormatter};
use crate::geometry::{Point, Rect, Size};
use crate::render::{BarGeometry, Frame, Label, NullRenderer, Renderer};
use crate::scale::{normalize, LinearScale};
use crate::series::DateSeries;
use crate::types::{non_negative, Margin, Sample, DEFAULT_MAX_BUCKETS, DEFAULT_THRESHOLD, MIN_HEIGHT};

/// A bucket ready for display: `x` is the formatted date of `timestamp`.
#[derive(Clone, Debug, PartialEq)]
pub struct DateBucket {
    pub timestamp: f64,
    pub x: String,
    pub y: f64,
    /// Number of input samples merged into this bucket.
    pub count: usize,
}

/// Bucketed data plus the input extremes used for bar height and color.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChartState {
    pub buckets: Vec<DateBucket>,
    pub min: f64,
    pub max: f64,
    pub range: f64,
}

impl ChartState {
    fn from_bucketed(out: &Bucketed, formatter: &dyn DateFormatter) -> Self {
        Self {
            buckets: out
                .buckets
                .iter()
                .map(|b| DateBucket { timestamp: b.x, x: formatter.format(b.x), y: b.y, count: b.count })
                .collect(),
            min: out.min,
            max: out.max,
            range: out.range(),
        }
    }
}

pub type ClickHandler = Box<dyn FnMut(&DateBucket)>;

/// The last frame handed to the container and the buckets behind its bars.
struct Drawn {
    frame: Frame,
    buckets: Vec<DateBucket>,
}

/// Bar chart of bucketed values over dates.
///
/// Width, height, color stops and the click handler redraw immediately when
/// set; data, margin and the active index take effect on the next draw.
/// Drawing without data or without a container does nothing. Pointer and
/// click handling act on the bars last drawn, not on pending data.
pub struct DateChart<R = NullRenderer> {
    container: Option<R>,
    state: Option<ChartState>,
    drawn: Option<Drawn>,
    margin: Margin,
    width: f32,
    height: f32,
    color_scale: Box<dyn ColorScale>,
    formatter: Box<dyn DateFormatter>,
    active_index: Option<usize>,
    on_click: Option<ClickHandler>,
}

/// Scales shared by every bar of one draw.
struct Layout {
    x: LinearScale,
    y: LinearScale,
    bar_width: f32,
    height: f32,
    min: f64,
    range: f64,
}

impl<R: Renderer> DateChart<R> {
    /// Plot size is the container size minus the default margins.
    pub fn new(container: R) -> Self {
        let mut chart = Self::detached();
        chart.container = Some(container);
        chart.fit_to_container();
        chart
    }

    /// A chart with no container: it computes geometry but never draws.
    pub fn detached() -> Self {
        Self {
            container: None,
            state: None,
            drawn: None,
            margin: Margin::default(),
            width: 0.0,
            height: 0.0,
            color_scale: Box::new(SqrtColorScale::default()),
            formatter: Box::new(OrdinalDateFormatter),
            active_index: None,
            on_click: None,
        }
    }

    pub fn with_config(container: R, config: ChartConfig) -> ChartResult<Self> {
        let scale = SqrtColorScale::new(config.color_stops)?;
        let mut chart = Self::detached();
        chart.container = Some(container);
        chart.color_scale = Box::new(scale);
        chart.margin = Margin::new(config.margin.top, config.margin.right, config.margin.bottom, config.margin.left);
        chart.fit_to_container();
        if let Some(w) = config.width {
            chart.width = non_negative(w);
        }
        if let Some(h) = config.height {
            chart.height = non_negative(h);
        }
        Ok(chart)
    }

    // ---- container ---------------------------------------------------------

    pub fn container(&self) -> Option<&R> {
        self.container.as_ref()
    }

    pub fn container_mut(&mut self) -> Option<&mut R> {
        self.container.as_mut()
    }

    pub fn attach(&mut self, container: R) -> &mut Self {
        self.container = Some(container);
        self.drawn = None;
        self
    }

    pub fn detach(&mut self) -> Option<R> {
        self.drawn = None;
        self.container.take()
    }

    /// Resize the plot to the container minus margins and redraw.
    pub fn fit_to_container(&mut self) -> &mut Self {
        if let Some(c) = &self.container {
            let Size { width, height } = c.container_size();
            self.width = non_negative(width - self.margin.hsum());
            self.height = non_negative(height - self.margin.vsum());
        }
        self.update();
        self
    }

    // ---- data --------------------------------------------------------------

    /// Current state, `None` until data is set.
    pub fn data(&self) -> Option<&ChartState> {
        self.state.as_ref()
    }

    pub fn buckets(&self) -> &[DateBucket] {
        self.state.as_ref().map(|s| s.buckets.as_slice()).unwrap_or(&[])
    }

    pub fn is_populated(&self) -> bool {
        !self.buckets().is_empty()
    }

    /// Replace the chart data. Does not redraw. An active index past the new
    /// bucket count is cleared.
    pub fn set_data(&mut self, series: &DateSeries) -> &mut Self {
        self.set_samples(&series.samples())
    }

    /// Like [`set_data`](Self::set_data) for samples already in epoch millis.
    pub fn set_samples(&mut self, samples: &[Sample]) -> &mut Self {
        let out = bucket(samples, DEFAULT_THRESHOLD, DEFAULT_MAX_BUCKETS);
        debug!(
            samples = samples.len(),
            buckets = out.buckets.len(),
            min = out.min,
            max = out.max,
            "chart data replaced"
        );
        if self.active_index.is_some_and(|i| i >= out.buckets.len()) {
            debug!(index = ?self.active_index, "active index out of range, cleared");
            self.active_index = None;
        }
        self.state = Some(ChartState::from_bucketed(&out, self.formatter.as_ref()));
        self
    }

    // ---- geometry ----------------------------------------------------------

    pub fn margin(&self) -> Margin {
        self.margin
    }

    /// Does not redraw.
    pub fn set_margin(&mut self, margin: Margin) -> &mut Self {
        self.margin = Margin::new(margin.top, margin.right, margin.bottom, margin.left);
        self
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn set_width(&mut self, width: f32) -> &mut Self {
        self.width = non_negative(width);
        self.update();
        self
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn set_height(&mut self, height: f32) -> &mut Self {
        self.height = non_negative(height);
        self.update();
        self
    }

    // ---- styling -----------------------------------------------------------

    pub fn color_scale(&self) -> &dyn ColorScale {
        self.color_scale.as_ref()
    }

    /// Square-root gradient through `stops`; needs at least two. On error
    /// the previous scale is kept.
    pub fn set_color_stops(&mut self, stops: Vec<Color>) -> ChartResult<&mut Self> {
        let scale = SqrtColorScale::new(stops)?;
        Ok(self.set_color_scale(scale))
    }

    pub fn set_color_scale(&mut self, scale: impl ColorScale + 'static) -> &mut Self {
        self.color_scale = Box::new(scale);
        self.update();
        self
    }

    /// Reformats the current buckets. Does not redraw.
    pub fn set_date_formatter(&mut self, formatter: impl DateFormatter + 'static) -> &mut Self {
        self.formatter = Box::new(formatter);
        if let Some(state) = &mut self.state {
            for b in &mut state.buckets {
                b.x = self.formatter.format(b.timestamp);
            }
        }
        self
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active_index
    }

    /// Highlight one bar on subsequent draws. Does not redraw.
    pub fn set_active_index(&mut self, index: Option<usize>) -> &mut Self {
        self.active_index = index;
        self
    }

    // ---- interaction -------------------------------------------------------

    pub fn has_click_handler(&self) -> bool {
        self.on_click.is_some()
    }

    pub fn set_click(&mut self, handler: impl FnMut(&DateBucket) + 'static) -> &mut Self {
        self.on_click = Some(Box::new(handler));
        self.update();
        self
    }

    pub fn clear_click(&mut self) -> &mut Self {
        self.on_click = None;
        self.update();
        self
    }

    /// Run the click handler for drawn bar `index`. Returns whether it ran.
    pub fn activate(&mut self, index: usize) -> bool {
        let Some(bucket) = self.drawn.as_ref().and_then(|d| d.buckets.get(index)) else {
            return false;
        };
        let Some(handler) = self.on_click.as_mut() else {
            return false;
        };
        debug!(index, date = %bucket.x, "bar activated");
        handler(bucket);
        true
    }

    /// Index of the drawn bar under container pixel `(px, py)`. Neighbouring
    /// bars overlap; the later (top-most) one wins.
    pub fn bar_at(&self, px: f32, py: f32) -> Option<usize> {
        let frame = &self.drawn.as_ref()?.frame;
        let p = Point::new(px - frame.margin.left, py - frame.margin.top);
        frame
            .bars
            .iter()
            .rev()
            .find(|b| b.background.contains(p) || b.foreground.contains(p))
            .map(|b| b.index)
    }

    /// Show the label of drawn bar `index` through the renderer, or hide it.
    pub fn hover(&mut self, index: Option<usize>) {
        let Some(container) = self.container.as_mut() else { return };
        let shown = self.drawn.as_ref().and_then(|d| {
            let bar = d.frame.bars.get(index?)?;
            let anchor = bar.foreground.translate(d.frame.margin.left, d.frame.margin.top).top_center();
            Some((&bar.label, anchor))
        });
        match shown {
            Some((label, anchor)) => container.show_label(label, anchor),
            None => container.hide_label(),
        }
    }

    pub fn pointer_moved(&mut self, px: f32, py: f32) {
        let index = self.bar_at(px, py);
        self.hover(index);
    }

    pub fn pointer_clicked(&mut self, px: f32, py: f32) -> bool {
        match self.bar_at(px, py) {
            Some(i) => self.activate(i),
            None => false,
        }
    }

    // ---- drawing -----------------------------------------------------------

    /// Redraw from scratch with the current state.
    pub fn draw(&mut self) -> &mut Self {
        self.update();
        self
    }

    fn layout(&self) -> Option<Layout> {
        let state = self.state.as_ref()?;
        let n = state.buckets.len();
        if n == 0 {
            return None;
        }
        let bar_width = if n > 1 { self.width / (n - 1) as f32 } else { self.width };
        Some(Layout {
            x: LinearScale::new((0.0, n as f64), (0.0, self.width)),
            y: LinearScale::new((0.0, state.max), (self.height, 0.0)),
            bar_width,
            height: self.height,
            min: state.min,
            range: state.range,
        })
    }

    fn bar_with(&self, layout: &Layout, index: usize, b: &DateBucket) -> BarGeometry {
        let left = layout.x.to_px(index as f64);
        // Values below zero sit on the baseline.
        let top = layout.y.to_px(b.y).clamp(0.0, layout.height);
        BarGeometry {
            index,
            background: Rect::from_ltwh(left, 0.0, layout.bar_width, layout.height),
            foreground: Rect::from_ltwh(left, top, layout.bar_width, layout.height - top + MIN_HEIGHT),
            fill: self.color_scale.map(normalize(b.y, layout.min, layout.range)),
            stroke: Color::BLACK,
            active: self.active_index == Some(index),
            label: Label { date: b.x.clone(), value: b.y.to_string() },
        }
    }

    /// Geometry of bar `index` in plot coordinates.
    pub fn bar(&self, index: usize) -> Option<BarGeometry> {
        let layout = self.layout()?;
        let b = self.buckets().get(index)?;
        Some(self.bar_with(&layout, index, b))
    }

    /// Geometry of every bar in plot coordinates; empty without data.
    pub fn bars(&self) -> Vec<BarGeometry> {
        let Some(layout) = self.layout() else { return Vec::new() };
        self.buckets()
            .iter()
            .enumerate()
            .map(|(i, b)| self.bar_with(&layout, i, b))
            .collect()
    }

    /// The picture a draw would hand to the renderer, `None` without data.
    pub fn frame(&self) -> Option<Frame> {
        let bars = self.bars();
        if bars.is_empty() {
            return None;
        }
        Some(Frame {
            size: Size::new(self.width + self.margin.hsum(), self.height + self.margin.vsum()),
            margin: self.margin,
            plot: Size::new(self.width, self.height),
            bars,
            clickable: self.on_click.is_some(),
        })
    }

    fn update(&mut self) {
        if self.container.is_none() {
            trace!("draw skipped: no container");
            return;
        }
        let Some(frame) = self.frame() else {
            trace!("draw skipped: no data");
            return;
        };
        let Some(container) = self.container.as_mut() else { return };
        match container.render(&frame) {
            Ok(()) => {
                trace!(bars = frame.bars.len(), "chart drawn");
                let buckets = self.buckets().to_vec();
                self.drawn = Some(Drawn { frame, buckets });
            }
            Err(err) => {
                warn!(error = %err, "chart render failed");
                self.drawn = None;
            }
        }
    }
}
