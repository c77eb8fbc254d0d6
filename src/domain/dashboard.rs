//! Pure recomputation of the full dashboard from one parameter tuple.
//!
//! `compute_dashboard` fetches fresh price series, derives RSI and MACD,
//! aligns the comparison overlay and describes the three charts. Provider
//! failures degrade the affected chart to a "no data" notice; only invalid
//! parameters escape as errors.

use crate::domain::comparison::{align, ComparisonView};
use crate::domain::error::DashboardError;
use crate::domain::indicator::{
    calculate_macd_default, calculate_rsi, IndicatorSeries, MacdSeries, DEFAULT_RSI_PERIOD,
};
use crate::domain::ohlcv::PriceSeries;
use crate::domain::parameters::{DashboardParameters, LookbackPeriod, Theme};
use crate::domain::ticker::{Ticker, TickerCatalog};
use crate::ports::data_port::PriceSeriesProvider;
use chrono::NaiveDate;

pub const PRICE_CHART_HEIGHT: u32 = 500;
pub const INDICATOR_CHART_HEIGHT: u32 = 300;
pub const RSI_OVERBOUGHT: f64 = 70.0;
pub const RSI_OVERSOLD: f64 = 30.0;

/// Semantic colour slot; the renderer maps it to a concrete colour per theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeriesColor {
    Primary,
    Comparison,
    Rsi,
    Overbought,
    Oversold,
    MacdLine,
    MacdSignal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineStyle {
    pub color: SeriesColor,
    pub dashed: bool,
}

impl LineStyle {
    pub fn solid(color: SeriesColor) -> Self {
        Self {
            color,
            dashed: false,
        }
    }

    pub fn dashed(color: SeriesColor) -> Self {
        Self {
            color,
            dashed: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub label: String,
    pub style: LineStyle,
    /// `None` samples are gaps in the drawn line.
    pub points: Vec<(NaiveDate, Option<f64>)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub title: String,
    pub x_axis_title: String,
    pub y_axis_title: String,
    pub height: u32,
    pub y_range: Option<(f64, f64)>,
    pub series: Vec<ChartSeries>,
    pub theme: Theme,
    pub notices: Vec<String>,
}

impl ChartSpec {
    fn new(title: &str, y_axis_title: &str, height: u32, theme: Theme) -> Self {
        Self {
            title: title.to_string(),
            x_axis_title: "Date".to_string(),
            y_axis_title: y_axis_title.to_string(),
            height,
            y_range: None,
            series: Vec::new(),
            theme,
            notices: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardOutput {
    pub parameters: DashboardParameters,
    pub title_text: String,
    pub summary_text: String,
    pub comparison: ComparisonView,
    pub rsi: IndicatorSeries,
    pub macd: MacdSeries,
    pub price_view: ChartSpec,
    pub rsi_view: ChartSpec,
    pub macd_view: ChartSpec,
}

pub fn compute_dashboard(
    params: &DashboardParameters,
    provider: &dyn PriceSeriesProvider,
    catalog: &TickerCatalog,
) -> Result<DashboardOutput, DashboardError> {
    params.validate(catalog)?;
    let primary_name = catalog.display_name(&params.primary)?;
    let secondary_name = match &params.secondary {
        Some(ticker) => Some((ticker, catalog.display_name(ticker)?)),
        None => None,
    };

    let (primary, primary_missing) = fetch_or_empty(provider, &params.primary, params.lookback);
    let secondary = secondary_name.map(|(ticker, name)| {
        let (series, missing) = fetch_or_empty(provider, ticker, params.lookback);
        (ticker, name, series, missing)
    });

    let rsi = calculate_rsi(&primary, DEFAULT_RSI_PERIOD);
    let macd = calculate_macd_default(&primary);
    let comparison = align(
        (primary_name, &primary),
        secondary
            .as_ref()
            .map(|(_, name, series, _)| (*name, series)),
    );

    let mut price_view = price_chart(&comparison, params.theme);
    let mut rsi_view = rsi_chart(&rsi, params.theme);
    let mut macd_view = macd_chart(&macd, params.theme);

    if primary_missing {
        let notice = no_data_notice(&params.primary);
        for view in [&mut price_view, &mut rsi_view, &mut macd_view] {
            view.notices.push(notice.clone());
        }
    }
    if let Some((ticker, _, _, true)) = &secondary {
        price_view
            .notices
            .push(format!("{} (comparison)", no_data_notice(ticker)));
    }

    log::info!(
        "recomputed dashboard for {} ({} bars, {} defined RSI points)",
        params.primary,
        primary.len(),
        rsi.defined_count()
    );

    Ok(DashboardOutput {
        parameters: params.clone(),
        title_text: primary_name.to_string(),
        summary_text: summary_text(&params.primary, &primary),
        comparison,
        rsi,
        macd,
        price_view,
        rsi_view,
        macd_view,
    })
}

/// Provider failures become an empty series plus a flag.
fn fetch_or_empty(
    provider: &dyn PriceSeriesProvider,
    ticker: &Ticker,
    period: LookbackPeriod,
) -> (PriceSeries, bool) {
    match provider.fetch(ticker, period) {
        Ok(series) => {
            let missing = series.is_empty();
            (series, missing)
        }
        Err(e) => {
            log::warn!("no price data for {} over {}: {}", ticker, period, e);
            (PriceSeries::empty(ticker.as_str()), true)
        }
    }
}

fn no_data_notice(ticker: &Ticker) -> String {
    format!("No data available for {}", ticker)
}

pub fn summary_text(ticker: &Ticker, series: &PriceSeries) -> String {
    match series.last() {
        Some(last) => format!(
            "Last price: {:.2} TL | Volume: {}",
            last.close,
            format_thousands(last.volume)
        ),
        None => no_data_notice(ticker),
    }
}

pub fn format_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

fn line_points(points: &[(NaiveDate, f64)]) -> Vec<(NaiveDate, Option<f64>)> {
    points.iter().map(|&(d, v)| (d, Some(v))).collect()
}

fn indicator_points(series: &IndicatorSeries) -> Vec<(NaiveDate, Option<f64>)> {
    series.values.iter().map(|p| (p.date, p.value)).collect()
}

fn price_chart(comparison: &ComparisonView, theme: Theme) -> ChartSpec {
    let mut chart = ChartSpec::new("Price Comparison", "Price (TL)", PRICE_CHART_HEIGHT, theme);
    chart.series.push(ChartSeries {
        label: comparison.primary.label.clone(),
        style: LineStyle::solid(SeriesColor::Primary),
        points: line_points(&comparison.primary.points),
    });
    if let Some(overlay) = &comparison.overlay {
        chart.series.push(ChartSeries {
            label: overlay.label.clone(),
            style: LineStyle::solid(SeriesColor::Comparison),
            points: line_points(&overlay.points),
        });
    }
    chart
}

fn rsi_chart(rsi: &IndicatorSeries, theme: Theme) -> ChartSpec {
    let mut chart = ChartSpec::new(
        "RSI (Relative Strength Index)",
        "RSI Value",
        INDICATOR_CHART_HEIGHT,
        theme,
    );
    chart.y_range = Some((0.0, 100.0));
    let reference = |level: f64| -> Vec<(NaiveDate, Option<f64>)> {
        rsi.values.iter().map(|p| (p.date, Some(level))).collect()
    };
    chart.series = vec![
        ChartSeries {
            label: "RSI".to_string(),
            style: LineStyle::solid(SeriesColor::Rsi),
            points: indicator_points(rsi),
        },
        ChartSeries {
            label: "Overbought".to_string(),
            style: LineStyle::dashed(SeriesColor::Overbought),
            points: reference(RSI_OVERBOUGHT),
        },
        ChartSeries {
            label: "Oversold".to_string(),
            style: LineStyle::dashed(SeriesColor::Oversold),
            points: reference(RSI_OVERSOLD),
        },
    ];
    chart
}

fn macd_chart(macd: &MacdSeries, theme: Theme) -> ChartSpec {
    let mut chart = ChartSpec::new(
        "MACD (Moving Average Convergence Divergence)",
        "MACD Value",
        INDICATOR_CHART_HEIGHT,
        theme,
    );
    chart.series = vec![
        ChartSeries {
            label: "MACD".to_string(),
            style: LineStyle::solid(SeriesColor::MacdLine),
            points: indicator_points(&macd.line),
        },
        ChartSeries {
            label: "Signal".to_string(),
            style: LineStyle::solid(SeriesColor::MacdSignal),
            points: indicator_points(&macd.signal),
        },
    ];
    chart
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ohlcv::PriceObservation;

    struct FixedProvider(Vec<f64>);

    impl PriceSeriesProvider for FixedProvider {
        fn fetch(
            &self,
            ticker: &Ticker,
            _period: LookbackPeriod,
        ) -> Result<PriceSeries, DashboardError> {
            let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
            let observations = self
                .0
                .iter()
                .enumerate()
                .map(|(i, &close)| PriceObservation {
                    date: start + chrono::Duration::days(i as i64),
                    open: close,
                    high: close,
                    low: close,
                    close,
                    volume: 1_234_567,
                })
                .collect();
            Ok(PriceSeries::new(ticker.as_str(), observations))
        }
    }

    fn params() -> DashboardParameters {
        DashboardParameters::new(Ticker::parse("THYAO.IS").unwrap())
    }

    #[test]
    fn format_thousands_groups_digits() {
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(999), "999");
        assert_eq!(format_thousands(1_000), "1,000");
        assert_eq!(format_thousands(1_234_567), "1,234,567");
        assert_eq!(format_thousands(12_345_678_901), "12,345,678,901");
    }

    #[test]
    fn summary_reports_last_close_and_volume() {
        let provider = FixedProvider(vec![10.0, 12.346]);
        let output =
            compute_dashboard(&params(), &provider, &TickerCatalog::bist_default()).unwrap();
        assert_eq!(output.summary_text, "Last price: 12.35 TL | Volume: 1,234,567");
        assert_eq!(output.title_text, "Türk Hava Yolları A.O.");
    }

    #[test]
    fn summary_reports_no_data_for_empty_series() {
        let provider = FixedProvider(vec![]);
        let output =
            compute_dashboard(&params(), &provider, &TickerCatalog::bist_default()).unwrap();
        assert_eq!(output.summary_text, "No data available for THYAO.IS");
        assert_eq!(output.price_view.notices, vec!["No data available for THYAO.IS"]);
    }

    #[test]
    fn chart_heights_favour_price() {
        let provider = FixedProvider(vec![10.0; 30]);
        let output =
            compute_dashboard(&params(), &provider, &TickerCatalog::bist_default()).unwrap();
        assert!(output.price_view.height > output.rsi_view.height);
        assert_eq!(output.rsi_view.height, output.macd_view.height);
    }

    #[test]
    fn rsi_chart_has_reference_lines_across_dates() {
        let provider = FixedProvider(vec![10.0, 11.0, 10.5, 12.0]);
        let output =
            compute_dashboard(&params(), &provider, &TickerCatalog::bist_default()).unwrap();

        let rsi_view = &output.rsi_view;
        assert_eq!(rsi_view.y_range, Some((0.0, 100.0)));
        let overbought = &rsi_view.series[1];
        let oversold = &rsi_view.series[2];
        assert!(overbought.style.dashed && oversold.style.dashed);
        assert_eq!(overbought.points.len(), 4);
        assert!(overbought.points.iter().all(|(_, v)| *v == Some(70.0)));
        assert!(oversold.points.iter().all(|(_, v)| *v == Some(30.0)));
        // too short for RSI(14): an empty line, no notice
        assert!(rsi_view.series[0].points.iter().all(|(_, v)| v.is_none()));
        assert!(rsi_view.notices.is_empty());
    }

    #[test]
    fn unknown_ticker_is_rejected() {
        let provider = FixedProvider(vec![10.0]);
        let mut p = params();
        p.primary = Ticker::parse("AAPL").unwrap();
        let result = compute_dashboard(&p, &provider, &TickerCatalog::bist_default());
        assert!(matches!(result, Err(DashboardError::InvalidParameter { .. })));
    }
}
