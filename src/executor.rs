//! Strictly sequential executor over a statically defined operator graph
//!
//! The executor is built once from a [`NetDef`] plus a workspace handle and
//! then drives every operator instance, in construction-fixed order, each
//! time [`SequentialExecutor::run`] is called. Failure handling follows two
//! call paths over one internal result type:
//! - `run` / `run_async` surface an operator failure as `false`; the caller
//!   decides what happens next (`try_run` exposes the typed error).
//! - `benchmark` tolerates no failing instance: any failure inside it, and
//!   any negative run count, panics.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, error, info};

use crate::benchmark::{BenchmarkReport, OpLine};
use crate::cost::CostModelRegistry;
use crate::error::NetResult;
use crate::graph::NetDef;
use crate::observer::NetObserver;
use crate::operator::{DefRef, OperatorInstance};
use crate::profiling::{ProfiledRange, ProfilingConfig, RUN_COLOR};
use crate::registry::OperatorRegistry;
use crate::workspace::SharedWorkspace;

/// Sequential execution engine for one operator graph
///
/// Owns one [`OperatorInstance`] per descriptor, in descriptor order; the
/// instance list never changes after construction.
pub struct SequentialExecutor {
    name: String,
    instances: Vec<OperatorInstance>,
    observers: Vec<Box<dyn NetObserver>>,
    profiling: ProfilingConfig,
    cost_models: Arc<CostModelRegistry>,
}

impl SequentialExecutor {
    /// Build an executor from a graph descriptor and a workspace handle.
    ///
    /// Operators lacking an explicit device placement inherit the net's
    /// default: the instance is built from a synthesized descriptor copy it
    /// exclusively owns. Otherwise the instance keeps shared ownership of
    /// the graph plus its index. Any instantiation failure aborts
    /// construction; a corrupt graph is never tolerated.
    pub fn new(
        net: Arc<NetDef>,
        workspace: SharedWorkspace,
        registry: &OperatorRegistry,
    ) -> NetResult<Self> {
        debug!(net = %net.name, ops = net.ops.len(), "constructing sequential executor");
        let mut instances = Vec::with_capacity(net.ops.len());
        for (idx, op_def) in net.ops.iter().enumerate() {
            let def_ref = if op_def.device.is_none() && net.device.is_some() {
                let mut synthesized = op_def.clone();
                synthesized.device = net.device;
                DefRef::Owned(Box::new(synthesized))
            } else {
                DefRef::Shared {
                    net: Arc::clone(&net),
                    index: idx,
                }
            };
            let kernel = registry.create_operator(def_ref.def(), &workspace, idx)?;
            instances.push(OperatorInstance::new(kernel, def_ref, workspace.clone()));
        }
        Ok(SequentialExecutor {
            name: net.name.clone(),
            instances,
            observers: Vec::new(),
            profiling: ProfilingConfig::default(),
            cost_models: Arc::new(CostModelRegistry::new()),
        })
    }

    /// Set the instrumentation configuration for scoped profiling ranges
    pub fn with_profiling(mut self, profiling: ProfilingConfig) -> Self {
        self.profiling = profiling;
        self
    }

    /// Inject the cost-model registry consulted during detailed benchmarks
    pub fn with_cost_models(mut self, cost_models: Arc<CostModelRegistry>) -> Self {
        self.cost_models = cost_models;
        self
    }

    /// Attach a lifecycle observer
    pub fn attach_observer(&mut self, observer: Box<dyn NetObserver>) {
        self.observers.push(observer);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn num_operators(&self) -> usize {
        self.instances.len()
    }

    pub fn instances(&self) -> &[OperatorInstance] {
        &self.instances
    }

    /// Execute every instance exactly once, in order.
    ///
    /// Observer policy on failure: the start notification has already fired,
    /// the stop notification is skipped. Already-completed work is not
    /// undone.
    pub fn try_run(&mut self) -> NetResult<()> {
        for observer in &mut self.observers {
            observer.on_net_start(&self.name);
        }
        debug!(net = %self.name, "running net");
        for instance in &mut self.instances {
            let def = instance.def();
            debug!(op = %def.display_name(), op_type = %def.op_type, "running operator");
            let _range = ProfiledRange::new(&self.profiling, def, RUN_COLOR);
            if let Err(err) = instance.run() {
                let dump = serde_json::to_string(instance.def())
                    .unwrap_or_else(|_| "<unserializable descriptor>".to_string());
                error!(%err, descriptor = %dump, "operator failed");
                return Err(err);
            }
        }
        for observer in &mut self.observers {
            observer.on_net_stop(&self.name);
        }
        Ok(())
    }

    /// Boolean surface over [`try_run`](Self::try_run)
    pub fn run(&mut self) -> bool {
        self.try_run().is_ok()
    }

    /// Synchronous alias of [`run`](Self::run).
    ///
    /// In a broader family of execution strategies this is the hook a
    /// parallel variant would override; the sequential strategy collapses it
    /// to `run`: identical blocking behavior, return value and side effects,
    /// nothing left running in the background.
    pub fn run_async(&mut self) -> bool {
        self.run()
    }

    /// Measure wall-clock cost, and optionally per-operator detail, across
    /// repeated runs.
    ///
    /// Runs `warmup_runs` untimed iterations, then `main_runs` timed ones.
    /// With `run_individual`, every instance is additionally timed on its
    /// own each iteration, and on the first iteration cost estimates are
    /// computed for each type with a registered cost model; the detailed
    /// tables are emitted through `tracing`.
    ///
    /// Returns the mean total milliseconds per iteration, followed (in
    /// detail mode only) by each instance's mean milliseconds per
    /// iteration.
    ///
    /// # Panics
    ///
    /// Negative `warmup_runs` or `main_runs`, and any operator failure
    /// during the benchmark, are fatal.
    pub fn benchmark(
        &mut self,
        warmup_runs: i64,
        main_runs: i64,
        run_individual: bool,
    ) -> Vec<f32> {
        info!("Starting benchmark.");
        assert!(
            warmup_runs >= 0,
            "number of warmup runs should be non-negative, provided {warmup_runs}"
        );
        assert!(
            main_runs >= 0,
            "number of main runs should be non-negative, provided {main_runs}"
        );

        info!("Running warmup runs.");
        for i in 0..warmup_runs {
            if let Err(err) = self.try_run() {
                panic!("warmup run {i} has failed: {err}");
            }
        }

        info!("Main runs.");
        let timer = Instant::now();
        for i in 0..main_runs {
            if let Err(err) = self.try_run() {
                panic!("main run {i} has failed: {err}");
            }
        }
        let millis = timer.elapsed().as_secs_f64() * 1000.0;
        let mean_total_ms = if main_runs > 0 {
            millis / main_runs as f64
        } else {
            0.0
        };
        if main_runs > 0 && millis > 0.0 {
            info!(
                "Main run finished. Milliseconds per iter: {mean_total_ms}. Iters per second: {}",
                1000.0 * main_runs as f64 / millis
            );
        }

        let mut result = vec![mean_total_ms as f32];
        if run_individual {
            let report = self.run_individual_phase(main_runs);
            report.log();
            result.extend(report.mean_time_per_op());
        }
        result
    }

    /// Per-operator detail phase: reset completion state each iteration, run
    /// and time instances individually, and gather cost estimates on the
    /// first iteration.
    fn run_individual_phase(&mut self, main_runs: i64) -> BenchmarkReport {
        let count = self.instances.len();
        let mut report = BenchmarkReport::new(main_runs.max(0) as u64);
        report.ops = self
            .instances
            .iter()
            .map(|instance| OpLine {
                name: instance.def().display_name().to_string(),
                op_type: instance.def().op_type.clone(),
            })
            .collect();
        report.time_per_op_ms = vec![0.0; count];
        report.cost_per_op = vec![None; count];

        for i in 0..main_runs {
            for instance in &mut self.instances {
                instance.reset_event();
            }
            for (idx, instance) in self.instances.iter_mut().enumerate() {
                let op_type = instance.def().op_type.clone();
                if i == 0 {
                    if let Some(cost_fn) = self.cost_models.cost_fn(&op_type) {
                        let shapes = match instance.input_shapes() {
                            Ok(shapes) => shapes,
                            Err(err) => panic!(
                                "fetching input shapes of operator '{}' ({op_type}) failed: {err}",
                                instance.def().display_name()
                            ),
                        };
                        let cost = cost_fn(instance.def(), &shapes);
                        report.cost_per_op[idx] = Some(cost);
                        report.flops_per_type.add(&op_type, cost.flops as f64);
                        report.memory_per_type.add(&op_type, cost.bytes_moved as f64);
                        report
                            .param_bytes_per_type
                            .add(&op_type, cost.params_bytes as f64);
                    }
                }
                let timer = Instant::now();
                if let Err(err) = instance.run() {
                    panic!("{err}");
                }
                let spent_ms = timer.elapsed().as_secs_f64() * 1000.0;
                report.time_per_op_ms[idx] += spent_ms;
                report.time_per_type.add(&op_type, spent_ms);
            }
        }
        report
    }
}

impl std::fmt::Debug for SequentialExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SequentialExecutor")
            .field("name", &self.name)
            .field("instances", &self.instances.len())
            .field("observers", &self.observers.len())
            .field("profiling", &self.profiling)
            .finish()
    }
}
