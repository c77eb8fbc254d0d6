//! Reactive glue: maps each parameter change to a freshly computed dashboard.
//!
//! Recomputation is synchronous and total. The controller is Idle between
//! calls and Recomputing only inside [`DashboardController::apply`] or
//! [`DashboardController::replace`]; both take `&mut self`, so no caller can
//! observe the intermediate state or a half-built output. A change is
//! validated before any provider call; a rejected change leaves the previous
//! parameters and output in place. For callers that recompute on worker threads,
//! [`SequencedPublisher`] orders publication by request sequence number so a
//! slow, older request can never replace a newer result.

use crate::domain::dashboard::{compute_dashboard, DashboardOutput};
use crate::domain::error::DashboardError;
use crate::domain::parameters::{DashboardParameters, ParameterChange};
use crate::domain::ticker::TickerCatalog;
use crate::ports::data_port::PriceSeriesProvider;
use std::sync::Mutex;

pub struct DashboardController<P: PriceSeriesProvider> {
    provider: P,
    catalog: TickerCatalog,
    parameters: DashboardParameters,
    output: DashboardOutput,
    sequence: u64,
}

impl<P: PriceSeriesProvider> DashboardController<P> {
    /// Validates `initial` and performs the first recomputation.
    pub fn new(
        provider: P,
        catalog: TickerCatalog,
        initial: DashboardParameters,
    ) -> Result<Self, DashboardError> {
        let output = compute_dashboard(&initial, &provider, &catalog)?;
        Ok(Self {
            provider,
            catalog,
            parameters: initial,
            output,
            sequence: 1,
        })
    }

    pub fn apply(&mut self, change: &ParameterChange) -> Result<&DashboardOutput, DashboardError> {
        let next = self
            .parameters
            .with_change(change, &self.catalog)
            .inspect_err(|e| log::warn!("rejected parameter change {:?}: {}", change, e))?;
        self.replace(next)
    }

    /// Replaces the whole parameter tuple and publishes the new output.
    pub fn replace(
        &mut self,
        parameters: DashboardParameters,
    ) -> Result<&DashboardOutput, DashboardError> {
        parameters.validate(&self.catalog)?;

        let output = compute_dashboard(&parameters, &self.provider, &self.catalog)?;
        self.sequence += 1;
        log::debug!("published dashboard #{}", self.sequence);
        self.parameters = parameters;
        self.output = output;
        Ok(&self.output)
    }

    pub fn output(&self) -> &DashboardOutput {
        &self.output
    }

    pub fn parameters(&self) -> &DashboardParameters {
        &self.parameters
    }

    pub fn catalog(&self) -> &TickerCatalog {
        &self.catalog
    }

    /// Number of outputs published so far, including the initial one.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }
}

/// Handed out by [`SequencedPublisher::begin`] in event order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestTicket(u64);

impl RequestTicket {
    pub fn sequence(&self) -> u64 {
        self.0
    }
}

#[derive(Default)]
struct PublisherState {
    issued: u64,
    published: Option<(RequestTicket, DashboardOutput)>,
}

/// Last-writer-wins publication keyed on request order, not completion order.
#[derive(Default)]
pub struct SequencedPublisher {
    state: Mutex<PublisherState>,
}

impl SequencedPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues the ticket for a new parameter-change event.
    pub fn begin(&self) -> RequestTicket {
        let mut state = self.lock();
        state.issued += 1;
        RequestTicket(state.issued)
    }

    /// Publishes `output` unless a newer request has already been published.
    pub fn publish(&self, ticket: RequestTicket, output: DashboardOutput) -> bool {
        let mut state = self.lock();
        match &state.published {
            Some((current, _)) if *current >= ticket => {
                log::debug!(
                    "dropping stale dashboard #{} (showing #{})",
                    ticket.0,
                    current.0
                );
                false
            }
            _ => {
                state.published = Some((ticket, output));
                true
            }
        }
    }

    pub fn latest(&self) -> Option<(RequestTicket, DashboardOutput)> {
        self.lock().published.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, PublisherState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ohlcv::{PriceObservation, PriceSeries};
    use crate::domain::parameters::{LookbackPeriod, Theme};
    use crate::domain::ticker::Ticker;
    use chrono::NaiveDate;
    use std::cell::Cell;

    struct CountingProvider {
        calls: Cell<usize>,
    }

    impl PriceSeriesProvider for CountingProvider {
        fn fetch(
            &self,
            ticker: &Ticker,
            _period: LookbackPeriod,
        ) -> Result<PriceSeries, DashboardError> {
            self.calls.set(self.calls.get() + 1);
            let observations = (1..=20)
                .map(|d| PriceObservation {
                    date: NaiveDate::from_ymd_opt(2024, 4, d).unwrap(),
                    open: 10.0,
                    high: 10.0,
                    low: 10.0,
                    close: 10.0 + (d % 4) as f64,
                    volume: 500,
                })
                .collect();
            Ok(PriceSeries::new(ticker.as_str(), observations))
        }
    }

    fn controller() -> DashboardController<CountingProvider> {
        DashboardController::new(
            CountingProvider {
                calls: Cell::new(0),
            },
            TickerCatalog::bist_default(),
            DashboardParameters::new(Ticker::parse("ASELS.IS").unwrap()),
        )
        .unwrap()
    }

    #[test]
    fn new_computes_initial_output() {
        let c = controller();
        assert_eq!(c.sequence(), 1);
        assert_eq!(c.provider.calls.get(), 1);
        assert_eq!(c.output().parameters.primary.as_str(), "ASELS.IS");
    }

    #[test]
    fn apply_recomputes_and_publishes() {
        let mut c = controller();
        let output = c
            .apply(&ParameterChange::Theme("dark".into()))
            .unwrap()
            .clone();

        assert_eq!(output.parameters.theme, Theme::Dark);
        assert_eq!(c.output(), &output);
        assert_eq!(c.sequence(), 2);
        assert_eq!(c.provider.calls.get(), 2);
    }

    #[test]
    fn invalid_change_keeps_previous_output_without_fetching() {
        let mut c = controller();
        let before = c.output().clone();

        let err = c.apply(&ParameterChange::Lookback("5y".into())).unwrap_err();

        assert!(matches!(err, DashboardError::InvalidParameter { .. }));
        assert_eq!(c.output(), &before);
        assert_eq!(c.parameters().lookback, LookbackPeriod::ThreeMonths);
        assert_eq!(c.provider.calls.get(), 1);
        assert_eq!(c.sequence(), 1);
    }

    #[test]
    fn secondary_selection_fetches_twice() {
        let mut c = controller();
        c.apply(&ParameterChange::Secondary(Some("EREGL.IS".into())))
            .unwrap();
        assert_eq!(c.provider.calls.get(), 3);
        assert!(c.output().comparison.overlay.is_some());
    }

    #[test]
    fn publisher_rejects_older_ticket_after_newer() {
        let c = controller();
        let publisher = SequencedPublisher::new();
        let first = publisher.begin();
        let second = publisher.begin();

        assert!(publisher.publish(second, c.output().clone()));
        assert!(!publisher.publish(first, c.output().clone()));
        assert_eq!(publisher.latest().unwrap().0, second);
    }

    #[test]
    fn publisher_accepts_in_order_completions() {
        let c = controller();
        let publisher = SequencedPublisher::new();
        assert!(publisher.latest().is_none());

        let first = publisher.begin();
        assert!(publisher.publish(first, c.output().clone()));
        let second = publisher.begin();
        assert!(publisher.publish(second, c.output().clone()));
        assert_eq!(publisher.latest().unwrap().0.sequence(), 2);
    }
}
