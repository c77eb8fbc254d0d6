//! Chart rendering port trait.

use crate::domain::dashboard::ChartSpec;

/// Turns one chart description into an opaque renderable figure.
pub trait ChartRenderer {
    fn render(&self, chart: &ChartSpec) -> String;
}
