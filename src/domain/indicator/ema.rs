//! Exponential Moving Average indicator (span convention).
//!
//! alpha = 2/(span+1), seeded with the first close, then
//! EMA[i] = C[i]*alpha + EMA[i-1]*(1-alpha).
//! Defined from the first bar onward; there is no warmup.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::PriceSeries;

pub fn calculate_ema(series: &PriceSeries, span: usize) -> IndicatorSeries {
    let indicator_type = IndicatorType::Ema(span);
    if span == 0 {
        return IndicatorSeries::undefined(indicator_type, series);
    }

    let values = series
        .observations()
        .iter()
        .zip(ema_values(&series.closes(), span))
        .map(|(obs, ema)| IndicatorPoint {
            date: obs.date,
            value: Some(ema),
        })
        .collect();

    IndicatorSeries {
        indicator_type,
        values,
    }
}

/// Raw EMA over `input`. Empty when `input` is empty or `span` is zero.
pub fn ema_values(input: &[f64], span: usize) -> Vec<f64> {
    if span == 0 {
        return Vec::new();
    }

    let alpha = 2.0 / (span as f64 + 1.0);
    let mut values = Vec::with_capacity(input.len());
    let mut iter = input.iter();
    let Some(&first) = iter.next() else {
        return values;
    };

    let mut ema = first;
    values.push(ema);
    for &x in iter {
        ema = x * alpha + ema * (1.0 - alpha);
        values.push(ema);
    }
    values
}
