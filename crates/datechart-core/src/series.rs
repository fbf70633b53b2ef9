// File: crates/datechart-core/src/series.rs
// Summary: Input record for the chart: index-aligned dates and bandwidth values.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};
use crate::types::Sample;

/// Dates and values are index aligned. The public fields allow building the
/// record directly; [`DateSeries::new`] enforces equal lengths.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DateSeries {
    pub dates: Vec<DateTime<Utc>>,
    pub bandwidths: Vec<f64>,
}

impl DateSeries {
    pub fn new(dates: Vec<DateTime<Utc>>, bandwidths: Vec<f64>) -> ChartResult<Self> {
        if dates.len() != bandwidths.len() {
            return Err(ChartError::LengthMismatch { dates: dates.len(), values: bandwidths.len() });
        }
        Ok(Self { dates, bandwidths })
    }

    /// Parse the `{"dates": [...], "bandwidths": [...]}` record.
    pub fn from_json(json: &str) -> ChartResult<Self> {
        let raw: DateSeries = serde_json::from_str(json)?;
        Self::new(raw.dates, raw.bandwidths)
    }

    pub fn len(&self) -> usize { self.dates.len().min(self.bandwidths.len()) }
    pub fn is_empty(&self) -> bool { self.len() == 0 }

    /// Pair dates with values as `(epoch millis, value)` samples. Unpaired
    /// trailing entries are ignored.
    pub fn samples(&self) -> Vec<Sample> {
        self.dates
            .iter()
            .zip(&self.bandwidths)
            .map(|(d, &v)| Sample::new(d.timestamp_millis() as f64, v))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn rejects_mismatched_lengths() {
        let d = Utc.with_ymd_and_hms(2015, 1, 1, 0, 0, 0).unwrap();
        let err = DateSeries::new(vec![d, d], vec![1.0]).unwrap_err();
        assert!(matches!(err, ChartError::LengthMismatch { dates: 2, values: 1 }));
    }

    #[test]
    fn parses_json_record() {
        let s = DateSeries::from_json(
            r#"{"dates": ["2015-01-01T00:00:00Z", "2015-01-02T00:00:00Z"], "bandwidths": [3, 4.5]}"#,
        )
        .unwrap();
        let samples = s.samples();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0], Sample::new(1_420_070_400_000.0, 3.0));
        assert_eq!(samples[1].x - samples[0].x, 86_400_000.0);
    }

    #[test]
    fn json_length_mismatch_is_an_error() {
        let r = DateSeries::from_json(r#"{"dates": ["2015-01-01T00:00:00Z"], "bandwidths": []}"#);
        assert!(matches!(r, Err(ChartError::LengthMismatch { .. })));
    }
}
