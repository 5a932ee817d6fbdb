//! Harness defaults.

/// Defaults for the benchmark harness.
#[derive(Clone, Debug)]
pub struct HarnessConfig {
    /// Distinct card numbers generated for each dataset.
    pub sizes: Vec<usize>,
    /// Charges drawn against each dataset's cards.
    pub charges: usize,
    /// Seed for the charge generator; `None` draws one from the OS.
    pub seed: Option<u64>,
    /// Partitions used by the partitioned strategy.
    pub threads: usize,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            sizes: vec![2_000_000, 4_000_000, 6_000_000],
            charges: 1_000_000,
            seed: None,
            threads: threads_from_env(),
        }
    }
}

/// `THREADS` from the environment, else the number of logical CPUs.
pub fn threads_from_env() -> usize {
    std::env::var("THREADS")
        .ok()
        .and_then(|value| value.parse().ok())
        .filter(|&threads| threads > 0)
        .unwrap_or_else(num_cpus::get)
}
