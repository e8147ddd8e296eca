//! Concurrent fan-out of one search to every configured provider.

use skyfare_core::{FlightOffer, FlightProvider, FlightSearch, ProviderError};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// A provider that failed during a fan-out, kept for diagnostics only.
#[derive(Debug, Clone)]
pub struct ProviderFailure {
    pub provider: String,
    pub error: ProviderError,
}

#[derive(Debug, Default)]
pub struct FanOutResult {
    /// Merged offers in completion order. Callers must not rely on the order.
    pub offers: Vec<FlightOffer>,
    pub failures: Vec<ProviderFailure>,
    /// Providers that reported back before the deadline, successfully or not.
    pub completed: usize,
    /// The deadline elapsed before every provider reported.
    pub timed_out: bool,
}

pub struct FlightAggregator {
    providers: Vec<Arc<dyn FlightProvider>>,
    deadline: Duration,
}

impl FlightAggregator {
    pub fn new(providers: Vec<Arc<dyn FlightProvider>>, deadline: Duration) -> Self {
        Self { providers, deadline }
    }

    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// Query every provider concurrently and merge whatever succeeds.
    ///
    /// Each provider runs in its own task and reports on a channel drained
    /// here. A failing provider never cancels its siblings. When the
    /// deadline passes, or this future is dropped, the unfinished tasks are
    /// aborted and only offers already received are returned.
    pub async fn fetch_all(&self, search: &FlightSearch) -> FanOutResult {
        info!(
            "Fanning out {}->{} on {} to {} providers",
            search.origin,
            search.destination,
            search.departure_date,
            self.providers.len()
        );

        let (tx, mut rx) = mpsc::channel(self.providers.len().max(1));
        let mut tasks = JoinSet::new();

        for provider in &self.providers {
            let provider = Arc::clone(provider);
            let search = search.clone();
            let tx = tx.clone();

            tasks.spawn(async move {
                let result = provider.fetch(&search).await;
                // Closed receiver: the caller stopped waiting.
                let _ = tx.send((provider.name().to_string(), result)).await;
            });
        }
        drop(tx);

        let mut outcome = FanOutResult::default();
        if timeout(self.deadline, collect(&mut rx, &mut outcome)).await.is_err() {
            outcome.timed_out = true;
            warn!(
                "Fan-out deadline of {:?} reached with {}/{} providers reported",
                self.deadline,
                outcome.completed,
                self.providers.len()
            );
        }
        tasks.abort_all();

        info!(
            "Fan-out finished: {} offers, {} provider failures",
            outcome.offers.len(),
            outcome.failures.len()
        );
        outcome
    }
}

async fn collect(
    rx: &mut mpsc::Receiver<(String, Result<Vec<FlightOffer>, ProviderError>)>,
    outcome: &mut FanOutResult,
) {
    while let Some((provider, result)) = rx.recv().await {
        outcome.completed += 1;
        match result {
            Ok(offers) => {
                debug!("Provider {} returned {} offers", provider, offers.len());
                outcome.offers.extend(offers);
            }
            Err(error) => {
                warn!("Provider {} failed: {}", provider, error);
                outcome.failures.push(ProviderFailure { provider, error });
            }
        }
    }
}
