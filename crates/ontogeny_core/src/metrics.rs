//! Lifecycle metrics for the genome/brain pipeline.
//!
//! Structured logging and counters for monitoring how many genomes are
//! built, crossed over and grown during a run.

use std::sync::atomic::{AtomicU64, Ordering};

/// Process-wide counters for the pipeline's lifecycle events.
#[derive(Debug, Default)]
pub struct Metrics {
    births: AtomicU64,
    crossovers: AtomicU64,
    mutations: AtomicU64,
    updates: AtomicU64,
}

impl Metrics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one brain growth.
    pub fn record_birth(&self, neurons: usize, synapses: usize) {
        let births = self.births.fetch_add(1, Ordering::Relaxed) + 1;
        if births.is_multiple_of(1000) {
            tracing::info!(births, neurons, synapses, "growth milestone");
        }
    }

    /// Records one crossover.
    pub fn record_crossover(&self) {
        self.crossovers.fetch_add(1, Ordering::Relaxed);
    }

    /// Records one mutation pass.
    pub fn record_mutation(&self) {
        self.mutations.fetch_add(1, Ordering::Relaxed);
    }

    /// Records one brain update step.
    pub fn record_update(&self) {
        self.updates.fetch_add(1, Ordering::Relaxed);
    }

    #[must_use]
    pub fn births(&self) -> u64 {
        self.births.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn crossovers(&self) -> u64 {
        self.crossovers.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn updates(&self) -> u64 {
        self.updates.load(Ordering::Relaxed)
    }
}

/// Initialize tracing subscriber for logging.
pub fn init_logging() {
    tracing::subscriber::set_global_default(
        tracing_subscriber::FmtSubscriber::builder()
            .with_max_level(tracing::Level::INFO)
            .finish(),
    )
    .ok();
}
