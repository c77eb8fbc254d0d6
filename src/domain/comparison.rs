//! Pairs the primary closing-price series with an optional comparison overlay.
//!
//! Each series keeps its own trading calendar: there is no interpolation and
//! no truncation to shared dates.

use crate::domain::ohlcv::PriceSeries;
use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub struct LineSeries {
    pub label: String,
    pub points: Vec<(NaiveDate, f64)>,
}

impl LineSeries {
    pub fn closes(label: impl Into<String>, series: &PriceSeries) -> Self {
        Self {
            label: label.into(),
            points: series
                .observations()
                .iter()
                .map(|o| (o.date, o.close))
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonView {
    pub primary: LineSeries,
    /// `None` when no comparison ticker is selected.
    pub overlay: Option<LineSeries>,
}

impl ComparisonView {
    /// Earliest and latest date plotted by either series.
    pub fn date_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        let dates = self
            .primary
            .points
            .iter()
            .chain(self.overlay.iter().flat_map(|o| o.points.iter()))
            .map(|(d, _)| *d);
        let (mut min, mut max) = (None::<NaiveDate>, None::<NaiveDate>);
        for d in dates {
            min = Some(min.map_or(d, |m| m.min(d)));
            max = Some(max.map_or(d, |m| m.max(d)));
        }
        min.zip(max)
    }
}

pub fn align(
    primary: (&str, &PriceSeries),
    secondary: Option<(&str, &PriceSeries)>,
) -> ComparisonView {
    ComparisonView {
        primary: LineSeries::closes(primary.0, primary.1),
        overlay: secondary.map(|(label, series)| LineSeries::closes(label, series)),
    }
}
