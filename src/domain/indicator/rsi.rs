//! RSI (Relative Strength Index) indicator implementation.
//!
//! Uses simple rolling means of gain/loss over the trailing `period` price
//! changes (not Wilder's smoothing):
//! - gain = max(change, 0), loss = max(-change, 0)
//! - avg_gain/avg_loss = mean over the last `period` changes
//!
//! Formula: RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//! If avg_loss == 0: RSI = 100
//!
//! Warmup: first `period` bars are undefined (bar 0 has no change, then
//! `period - 1` more bars fill the window).

use crate::domain::indicator::{minimum_history, IndicatorPoint, IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::PriceSeries;

pub const DEFAULT_RSI_PERIOD: usize = 14;

pub fn calculate_rsi(series: &PriceSeries, period: usize) -> IndicatorSeries {
    let indicator_type = IndicatorType::Rsi(period);
    if period == 0 || series.len() < minimum_history(indicator_type) {
        return IndicatorSeries::undefined(indicator_type, series);
    }

    let closes = series.closes();
    let (gains, losses): (Vec<f64>, Vec<f64>) = closes
        .windows(2)
        .map(|w| {
            let change = w[1] - w[0];
            (change.max(0.0), (-change).max(0.0))
        })
        .unzip();

    // change j sits between bars j and j + 1
    let values = series
        .observations()
        .iter()
        .enumerate()
        .map(|(i, obs)| {
            let value = if i < period {
                None
            } else {
                let window = (i - period)..i;
                let avg_gain = gains[window.clone()].iter().sum::<f64>() / period as f64;
                let avg_loss = losses[window].iter().sum::<f64>() / period as f64;
                Some(rsi_from_averages(avg_gain, avg_loss))
            };
            IndicatorPoint {
                date: obs.date,
                value,
            }
        })
        .collect();

    IndicatorSeries {
        indicator_type,
        values,
    }
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        100.0
    } else {
        100.0 - (100.0 / (1.0 + avg_gain / avg_loss))
    }
}
