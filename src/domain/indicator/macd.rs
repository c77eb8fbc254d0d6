//! MACD (Moving Average Convergence Divergence) indicator.
//!
//! MACD Line = EMA(fast) - EMA(slow)
//! Signal Line = EMA(signal) of MACD Line
//!
//! Default parameters: fast=12, slow=26, signal=9
//! Both lines are defined from the first bar since the span EMA seeds
//! immediately.

use crate::domain::indicator::{ema_values, IndicatorPoint, IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::PriceSeries;

pub const DEFAULT_FAST: usize = 12;
pub const DEFAULT_SLOW: usize = 26;
pub const DEFAULT_SIGNAL: usize = 9;

#[derive(Debug, Clone, PartialEq)]
pub struct MacdSeries {
    pub line: IndicatorSeries,
    pub signal: IndicatorSeries,
}

pub fn calculate_macd(
    series: &PriceSeries,
    fast: usize,
    slow: usize,
    signal_span: usize,
) -> MacdSeries {
    let line_type = IndicatorType::MacdLine { fast, slow };
    let signal_type = IndicatorType::MacdSignal {
        fast,
        slow,
        signal: signal_span,
    };

    if fast == 0 || slow == 0 || signal_span == 0 {
        return MacdSeries {
            line: IndicatorSeries::undefined(line_type, series),
            signal: IndicatorSeries::undefined(signal_type, series),
        };
    }

    let closes = series.closes();
    let macd_line: Vec<f64> = ema_values(&closes, fast)
        .into_iter()
        .zip(ema_values(&closes, slow))
        .map(|(f, s)| f - s)
        .collect();
    let signal_line = ema_values(&macd_line, signal_span);

    MacdSeries {
        line: to_series(line_type, series, &macd_line),
        signal: to_series(signal_type, series, &signal_line),
    }
}

pub fn calculate_macd_default(series: &PriceSeries) -> MacdSeries {
    calculate_macd(series, DEFAULT_FAST, DEFAULT_SLOW, DEFAULT_SIGNAL)
}

fn to_series(indicator_type: IndicatorType, series: &PriceSeries, raw: &[f64]) -> IndicatorSeries {
    IndicatorSeries {
        indicator_type,
        values: series
            .observations()
            .iter()
            .zip(raw)
            .map(|(obs, &v)| IndicatorPoint {
                date: obs.date,
                value: Some(v),
            })
            .collect(),
    }
}
