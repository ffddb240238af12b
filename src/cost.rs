//! Theoretical cost estimation per operator type
//!
//! A cost model maps an operator descriptor plus its current input shapes to
//! an estimated resource cost. Models are registered per operator type;
//! types without a model simply produce no estimate during benchmarking.

use std::collections::HashMap;

use serde::Serialize;

use crate::graph::OperatorDef;

/// Estimated resource cost of one operator invocation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CostEstimate {
    /// Estimated floating point operations
    pub flops: u64,
    /// Estimated bytes of feature data moved (inputs read + outputs written)
    pub bytes_moved: u64,
    /// Estimated bytes of parameter data read
    pub params_bytes: u64,
}

impl CostEstimate {
    pub fn accumulate(&mut self, other: &CostEstimate) {
        self.flops += other.flops;
        self.bytes_moved += other.bytes_moved;
        self.params_bytes += other.params_bytes;
    }
}

/// Cost function: descriptor plus current input shapes to an estimate
pub type CostFn = Box<dyn Fn(&OperatorDef, &[Vec<usize>]) -> CostEstimate + Send + Sync>;

/// Registry mapping operator type names to optional cost functions
#[derive(Default)]
pub struct CostModelRegistry {
    models: HashMap<String, CostFn>,
}

impl CostModelRegistry {
    pub fn new() -> Self {
        CostModelRegistry::default()
    }

    /// Registry pre-populated with models for the builtin operator types
    pub fn with_builtin_costs() -> Self {
        let mut registry = CostModelRegistry::new();
        crate::ops::register_builtin_costs(&mut registry);
        registry
    }

    /// Register a cost function for an operator type, replacing any previous
    /// registration.
    pub fn register<F>(&mut self, op_type: impl Into<String>, model: F)
    where
        F: Fn(&OperatorDef, &[Vec<usize>]) -> CostEstimate + Send + Sync + 'static,
    {
        self.models.insert(op_type.into(), Box::new(model));
    }

    /// Look up the cost function for an operator type
    pub fn cost_fn(&self, op_type: &str) -> Option<&CostFn> {
        self.models.get(op_type)
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

impl std::fmt::Debug for CostModelRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CostModelRegistry")
            .field("types", &self.models.keys().collect::<Vec<_>>())
            .finish()
    }
}
