//! Price data access port trait.

use crate::domain::error::DashboardError;
use crate::domain::ohlcv::PriceSeries;
use crate::domain::parameters::LookbackPeriod;
use crate::domain::ticker::Ticker;

pub trait PriceSeriesProvider {
    /// Daily observations for `ticker` over `period`, strictly date-ordered
    /// with non-trading days absent. Fails with `DashboardError::Provider`
    /// when the ticker is unknown to the source or the source is unreachable.
    fn fetch(&self, ticker: &Ticker, period: LookbackPeriod)
    -> Result<PriceSeries, DashboardError>;
}

impl<P: PriceSeriesProvider + ?Sized> PriceSeriesProvider for &P {
    fn fetch(
        &self,
        ticker: &Ticker,
        period: LookbackPeriod,
    ) -> Result<PriceSeries, DashboardError> {
        (**self).fetch(ticker, period)
    }
}
