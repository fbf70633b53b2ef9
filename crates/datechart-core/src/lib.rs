// File: crates/datechart-core/src/lib.rs
// Summary: Core library entry point; exports bucketing, scales and the date chart model.

pub mod bucket;
pub mod chart;
pub mod color;
pub mod config;
pub mod error;
pub mod format;
pub mod geometry;
pub mod render;
pub mod scale;
pub mod series;
pub mod svg;
pub mod telemetry;
pub mod types;

pub use bucket::{bucket, Bucket, Bucketed};
pub use chart::{ChartState, ClickHandler, DateBucket, DateChart};
pub use color::{Color, ColorScale, SqrtColorScale};
pub use config::ChartConfig;
pub use error::{ChartError, ChartResult};
pub use format::{DateFormatter, OrdinalDateFormatter, PatternDateFormatter};
pub use geometry::{Point, Rect, Size};
pub use render::{BarGeometry, Frame, Label, NullRenderer, Renderer};
pub use series::DateSeries;
pub use svg::SvgRenderer;
pub use types::{Margin, Sample, DEFAULT_MAX_BUCKETS, DEFAULT_THRESHOLD, MIN_HEIGHT};
