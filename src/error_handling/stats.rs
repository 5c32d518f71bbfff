//! Run statistics.
//!
//! Summarizes the results of a run: how many endpoints were healthy, expiring
//! soon or failed, with failures broken down by category.

use std::collections::HashMap;

use log::info;
use strum::IntoEnumIterator;

use super::types::FailureCategory;
use crate::probe::ProbeResult;

/// Counters for one run, built from its probe results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeStats {
    /// Endpoints attempted
    pub total: usize,
    /// Certificates outside the expiry threshold
    pub healthy: usize,
    /// Certificates inside the expiry threshold
    pub expiring_soon: usize,
    failures: HashMap<FailureCategory, usize>,
}

impl ProbeStats {
    /// Tallies a slice of results.
    pub fn from_results(results: &[ProbeResult]) -> Self {
        let mut failures: HashMap<FailureCategory, usize> =
            FailureCategory::iter().map(|category| (category, 0)).collect();
        let mut healthy = 0;
        let mut expiring_soon = 0;

        for result in results {
            match result {
                ProbeResult::Healthy { .. } => healthy += 1,
                ProbeResult::ExpiringSoon { .. } => expiring_soon += 1,
                ProbeResult::ConnectionFailure { category, .. } => {
                    *failures.entry(*category).or_insert(0) += 1;
                }
            }
        }

        ProbeStats {
            total: results.len(),
            healthy,
            expiring_soon,
            failures,
        }
    }

    /// Number of failures in one category.
    pub fn failure_count(&self, category: FailureCategory) -> usize {
        self.failures.get(&category).copied().unwrap_or(0)
    }

    /// Number of failures across all categories.
    pub fn total_failures(&self) -> usize {
        self.failures.values().sum()
    }
}

/// Logs the end-of-run summary.
pub fn log_probe_statistics(stats: &ProbeStats) {
    info!(
        "Checked {} endpoint(s): {} healthy, {} expiring soon, {} failed",
        stats.total,
        stats.healthy,
        stats.expiring_soon,
        stats.total_failures()
    );
    for category in FailureCategory::iter() {
        let count = stats.failure_count(category);
        if count > 0 {
            info!("   {}: {}", category, count);
        }
    }
}
