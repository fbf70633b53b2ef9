// File: crates/demo/src/main.rs
// Summary: Demo loads a date/bandwidth CSV, buckets it and renders the bar chart to PNG and SVG.

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use datechart_core::{ChartConfig, DateChart, DateSeries, SvgRenderer};
use datechart_render_skia::SkiaRenderer;
use std::path::{Path, PathBuf};
use tracing::info;

const CONTAINER: (f32, f32) = (960.0, 320.0);

fn main() -> Result<()> {
    let _ = datechart_core::telemetry::init_default_tracing();

    // Usage: datechart-demo [data.csv] [config.json]
    let mut args = std::env::args().skip(1);
    let input = PathBuf::from(
        args.next()
            .unwrap_or_else(|| "crates/demo/data/bandwidth.csv".to_string()),
    );
    let config = match args.next() {
        Some(p) => ChartConfig::from_path(&p).with_context(|| format!("failed to load config '{p}'"))?,
        None => ChartConfig::default(),
    };

    let series = load_bandwidth_csv(&input)
        .with_context(|| format!("failed to load CSV '{}'", input.display()))?;
    if series.is_empty() {
        anyhow::bail!("no rows loaded, check headers/delimiter.");
    }
    println!("Loaded {} rows from {}", series.len(), input.display());

    // PNG through Skia, with the tallest bar hovered so the label shows.
    let mut png = DateChart::with_config(SkiaRenderer::new(CONTAINER.0, CONTAINER.1), config.clone())?;
    png.set_data(&series);
    png.set_click(|b| info!(date = %b.x, value = b.y, "bar clicked"));
    let tallest = png
        .buckets()
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.y.total_cmp(&b.1.y))
        .map(|(i, _)| i);
    png.set_active_index(tallest).draw();
    png.hover(tallest);
    let out_png = out_name_with(&input, "png");
    png.container()
        .context("renderer detached")?
        .write_png(&out_png)?;
    println!("Wrote {}", out_png.display());

    // Same chart as SVG markup.
    let mut svg = DateChart::with_config(SvgRenderer::new(CONTAINER.0, CONTAINER.1), config)?;
    svg.set_data(&series).set_active_index(tallest).draw();
    let out_svg = out_name_with(&input, "svg");
    svg.container()
        .context("renderer detached")?
        .write_to(&out_svg)?;
    println!("Wrote {}", out_svg.display());

    for b in png.buckets() {
        println!("{:>16}  {:>12.2}  ({} samples)", b.x, b.y, b.count);
    }
    // Simulate a click on the first bar.
    png.activate(0);
    Ok(())
}

/// Produce output file name like target/out/datechart_<stem>.<ext>
fn out_name_with(input: &Path, ext: &str) -> PathBuf {
    let stem = input.file_stem().and_then(|s| s.to_str()).unwrap_or("chart");
    let mut out = PathBuf::from("target/out");
    std::fs::create_dir_all(&out).ok();
    out.push(format!("datechart_{stem}.{ext}"));
    out
}

/// Load a CSV with a date column and a numeric bandwidth column.
fn load_bandwidth_csv(path: &Path) -> Result<DateSeries> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;

    let headers = rdr
        .headers()?
        .iter()
        .map(|h| h.trim().to_lowercase())
        .collect::<Vec<_>>();
    info!(?headers, "csv headers");

    let idx = |names: &[&str]| -> Option<usize> {
        headers.iter().position(|h| names.contains(&h.as_str()))
    };
    let i_date = idx(&["date", "time", "timestamp", "datetime", "day"])
        .context("no date column (date/time/timestamp/datetime/day)")?;
    let i_value = idx(&["bandwidth", "bandwidths", "value", "count", "y"])
        .context("no value column (bandwidth/value/count/y)")?;

    let mut dates = Vec::new();
    let mut values = Vec::new();
    for (row, rec) in rdr.records().enumerate() {
        let rec = rec?;
        let date = rec.get(i_date).and_then(parse_date);
        let value = rec.get(i_value).and_then(|s| s.trim().parse::<f64>().ok());
        match (date, value) {
            (Some(d), Some(v)) => {
                dates.push(d);
                values.push(v);
            }
            _ => println!("Skipping row {}: unparseable date or value", row + 1),
        }
    }
    Ok(DateSeries::new(dates, values)?)
}

/// RFC 3339, `YYYY-MM-DD`, or an epoch number (seconds or milliseconds).
fn parse_date(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d.and_hms_opt(0, 0, 0)?.and_utc());
    }
    if let Ok(n) = s.parse::<i64>() {
        if n > 10_i64.pow(11) {
            return DateTime::from_timestamp_millis(n);
        } // epoch ms
        return DateTime::from_timestamp(n, 0);
    }
    None
}
