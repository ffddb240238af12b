//! Benchmark aggregation and reporting
//!
//! The executor's benchmark collects per-instance and per-operator-type
//! statistics into a [`BenchmarkReport`]. The report text is diagnostic only
//! and goes through `tracing`; the machine-consumable result is the vector of
//! per-iteration-averaged times the executor returns.

use tracing::info;

use crate::cost::CostEstimate;

/// Per-operator-type accumulator preserving traversal order
///
/// Values aggregate across iterations; ordering for the report is descending
/// by value with ties broken by the order types were first seen.
#[derive(Debug, Default, Clone)]
pub struct TypeTotals {
    entries: Vec<(String, f64)>,
}

impl TypeTotals {
    pub fn new() -> Self {
        TypeTotals::default()
    }

    pub fn add(&mut self, op_type: &str, value: f64) {
        if let Some(entry) = self.entries.iter_mut().find(|(ty, _)| ty == op_type) {
            entry.1 += value;
        } else {
            self.entries.push((op_type.to_string(), value));
        }
    }

    /// Entries in descending value order; stable, so equal values keep
    /// traversal order.
    pub fn sorted_desc(&self) -> Vec<(String, f64)> {
        let mut sorted = self.entries.clone();
        sorted.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        sorted
    }

    pub fn total(&self) -> f64 {
        self.entries.iter().map(|(_, v)| v).sum()
    }

    /// Percentage of the total per type, in descending value order; all
    /// zeros when the total is zero.
    pub fn percentages(&self) -> Vec<(String, f64)> {
        let total = self.total();
        self.sorted_desc()
            .into_iter()
            .map(|(ty, v)| {
                let percent = if total > 0.0 { 100.0 * v / total } else { 0.0 };
                (ty, percent)
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Identity of one instance as shown in the report
#[derive(Debug, Clone)]
pub struct OpLine {
    /// Display name: operator name, else first output, else placeholder
    pub name: String,
    pub op_type: String,
}

/// Aggregated timing and cost statistics from a detailed benchmark
#[derive(Debug, Default)]
pub struct BenchmarkReport {
    pub main_runs: u64,
    /// Identities of the instances, in execution order
    pub ops: Vec<OpLine>,
    /// Total elapsed milliseconds per instance, across all main runs
    pub time_per_op_ms: Vec<f64>,
    /// Cost estimate per instance, where the type had a registered model
    pub cost_per_op: Vec<Option<CostEstimate>>,
    pub time_per_type: TypeTotals,
    pub flops_per_type: TypeTotals,
    pub memory_per_type: TypeTotals,
    pub param_bytes_per_type: TypeTotals,
}

impl BenchmarkReport {
    pub fn new(main_runs: u64) -> Self {
        BenchmarkReport {
            main_runs,
            ..BenchmarkReport::default()
        }
    }

    /// Mean milliseconds per iteration for each instance
    pub fn mean_time_per_op(&self) -> Vec<f32> {
        let runs = self.main_runs.max(1) as f64;
        self.time_per_op_ms
            .iter()
            .map(|ms| (ms / runs) as f32)
            .collect()
    }

    /// Emit the diagnostic report through tracing
    pub fn log(&self) {
        let runs = self.main_runs.max(1) as f64;
        for (idx, line) in self.ops.iter().enumerate() {
            let mean_ms = self.time_per_op_ms[idx] / runs;
            let mut extras = String::new();
            if let Some(cost) = &self.cost_per_op[idx] {
                if cost.flops > 0 {
                    let gflop = 1.0e-9 * cost.flops as f64;
                    // throughput derived from the averaged per-op time
                    let gflops = if mean_ms > 0.0 { gflop / (mean_ms * 1.0e-3) } else { 0.0 };
                    extras.push_str(&format!(" ({gflop} GFLOP, {gflops} GFLOPS)"));
                }
                if cost.bytes_moved > 0 {
                    extras.push_str(&format!(" ({} MB)", 1.0e-6 * cost.bytes_moved as f64));
                }
                if cost.params_bytes > 0 {
                    extras.push_str(&format!(" ({} MB)", 1.0e-6 * cost.params_bytes as f64));
                }
            }
            info!(
                "Operator #{idx} ({}, {}) {} ms/iter{extras}",
                line.name, line.op_type, mean_ms
            );
        }

        self.log_metric("Time", "ms", 1.0 / runs, &self.time_per_type);
        self.log_metric("FLOP", "GFLOP", 1.0e-9, &self.flops_per_type);
        self.log_metric("Feature Memory", "MB", 1.0e-6, &self.memory_per_type);
        self.log_metric("Parameter Memory", "MB", 1.0e-6, &self.param_bytes_per_type);
    }

    fn log_metric(&self, metric: &str, unit: &str, normalizer: f64, totals: &TypeTotals) {
        info!("{metric} per operator type:");
        let sorted = totals.sorted_desc();
        let total: f64 = sorted.iter().map(|(_, v)| v * normalizer).sum();
        for (op_type, value) in &sorted {
            let value = value * normalizer;
            let percent = if total > 0.0 { 100.0 * value / total } else { 0.0 };
            info!("{value:>15.6} {unit}. {percent:>10.6}%. {op_type}");
        }
        info!("{total:>15.6} {unit} in Total");
    }
}
