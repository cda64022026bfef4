//! Sticky two-provider failover for the stock-quote path.
//!
//! Exactly two interchangeable quote providers back the price/PE fetch.
//! Rather than hammering a throttling provider, the orchestrator keeps a
//! sticky preference and flips it whenever the preferred side reports
//! throttling, so the next ticker starts with the provider that was
//! healthy last. The chain path has a single provider and bypasses this
//! layer entirely.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::errors::{ChainDataError, RetryClass};
use crate::models::StockQuote;
use crate::provider::QuoteProvider;

/// Which of the two quote providers is currently preferred.
///
/// An explicit value owned by the orchestrator, not process-global state;
/// it persists for the life of the batch run and is only ever changed on
/// a throttling signal.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum FailoverState {
    #[default]
    PreferPrimary,
    PreferSecondary,
}

impl FailoverState {
    fn flipped(self) -> Self {
        match self {
            Self::PreferPrimary => Self::PreferSecondary,
            Self::PreferSecondary => Self::PreferPrimary,
        }
    }
}

/// Chooses between two interchangeable quote providers, switching sticky
/// preference on throttling.
pub struct QuoteFailover {
    primary: Arc<dyn QuoteProvider>,
    secondary: Arc<dyn QuoteProvider>,
    state: FailoverState,
    cooldown: Duration,
}

impl QuoteFailover {
    /// Create an orchestrator preferring `primary`, with the default
    /// 6-second switch cooldown.
    pub fn new(primary: Arc<dyn QuoteProvider>, secondary: Arc<dyn QuoteProvider>) -> Self {
        Self::with_cooldown(primary, secondary, Duration::from_secs(6))
    }

    /// Create an orchestrator with an explicit switch cooldown.
    pub fn with_cooldown(
        primary: Arc<dyn QuoteProvider>,
        secondary: Arc<dyn QuoteProvider>,
        cooldown: Duration,
    ) -> Self {
        Self {
            primary,
            secondary,
            state: FailoverState::default(),
            cooldown,
        }
    }

    /// The current sticky preference.
    pub fn state(&self) -> FailoverState {
        self.state
    }

    fn preferred(&self) -> Arc<dyn QuoteProvider> {
        match self.state {
            FailoverState::PreferPrimary => Arc::clone(&self.primary),
            FailoverState::PreferSecondary => Arc::clone(&self.secondary),
        }
    }

    /// Fetch a quote from the preferred provider, failing over on
    /// throttling.
    ///
    /// Success and non-retryable errors return immediately with the
    /// preference unchanged. A throttling signal flips the preference,
    /// waits out the cooldown, and tries the other side; the loop runs
    /// until one side produces a non-retryable outcome.
    pub async fn fetch(&mut self, ticker: &str) -> Result<StockQuote, ChainDataError> {
        loop {
            let provider = self.preferred();

            match provider.quote(ticker).await {
                Ok(quote) => return Ok(quote),
                Err(e) if e.retry_class() == RetryClass::Backoff => {
                    self.state = self.state.flipped();
                    info!(
                        from = provider.id(),
                        "quote provider is throttling, switching preference"
                    );
                    tokio::time::sleep(self.cooldown).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Throttling {
        id: &'static str,
        calls: AtomicUsize,
    }

    impl Throttling {
        fn new(id: &'static str) -> Arc<Self> {
            Arc::new(Self {
                id,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl QuoteProvider for Throttling {
        fn id(&self) -> &'static str {
            self.id
        }

        async fn quote(&self, _ticker: &str) -> Result<StockQuote, ChainDataError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(ChainDataError::Throttled {
                provider: self.id.to_string(),
            })
        }
    }

    struct Healthy {
        id: &'static str,
        price: f64,
        calls: AtomicUsize,
    }

    impl Healthy {
        fn new(id: &'static str, price: f64) -> Arc<Self> {
            Arc::new(Self {
                id,
                price,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl QuoteProvider for Healthy {
        fn id(&self) -> &'static str {
            self.id
        }

        async fn quote(&self, _ticker: &str) -> Result<StockQuote, ChainDataError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(StockQuote::new(self.price, Utc::now()))
        }
    }

    struct Broken;

    #[async_trait]
    impl QuoteProvider for Broken {
        fn id(&self) -> &'static str {
            "broken"
        }

        async fn quote(&self, _ticker: &str) -> Result<StockQuote, ChainDataError> {
            Err(ChainDataError::MissingField {
                field: "c".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn test_switches_to_secondary_and_sticks() {
        let primary = Throttling::new("primary");
        let secondary = Healthy::new("secondary", 42.5);

        let mut failover = QuoteFailover::with_cooldown(
            primary.clone(),
            secondary.clone(),
            Duration::ZERO,
        );

        let quote = failover.fetch("AAPL").await.unwrap();
        assert_eq!(quote.price, 42.5);
        assert_eq!(failover.state(), FailoverState::PreferSecondary);
        assert_eq!(primary.calls.load(Ordering::SeqCst), 1);

        // The next call starts at secondary; no redundant primary attempt.
        failover.fetch("MSFT").await.unwrap();
        assert_eq!(primary.calls.load(Ordering::SeqCst), 1);
        assert_eq!(secondary.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_success_leaves_preference_unchanged() {
        let primary = Healthy::new("primary", 10.0);
        let secondary = Healthy::new("secondary", 20.0);

        let mut failover =
            QuoteFailover::with_cooldown(primary.clone(), secondary.clone(), Duration::ZERO);

        let quote = failover.fetch("AAPL").await.unwrap();
        assert_eq!(quote.price, 10.0);
        assert_eq!(failover.state(), FailoverState::PreferPrimary);
        assert_eq!(secondary.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_fatal_error_returns_without_switching() {
        let mut failover = QuoteFailover::with_cooldown(
            Arc::new(Broken),
            Healthy::new("secondary", 20.0),
            Duration::ZERO,
        );

        let err = failover.fetch("AAPL").await.unwrap_err();
        assert!(matches!(err, ChainDataError::MissingField { .. }));
        assert_eq!(failover.state(), FailoverState::PreferPrimary);
    }

    #[tokio::test]
    async fn test_alternates_while_both_throttle() {
        let primary = Throttling::new("primary");
        let secondary = Throttling::new("secondary");

        let mut failover = QuoteFailover::with_cooldown(
            primary.clone(),
            secondary.clone(),
            Duration::from_millis(1),
        );

        // Bound the loop for the test by racing it against a timeout; both
        // sides throttling means the orchestrator keeps alternating.
        let fetch = failover.fetch("AAPL");
        let result =
            tokio::time::timeout(Duration::from_millis(50), fetch).await;
        assert!(result.is_err(), "expected the failover loop to still be running");

        assert!(primary.calls.load(Ordering::SeqCst) >= 2);
        assert!(secondary.calls.load(Ordering::SeqCst) >= 2);
    }
}
