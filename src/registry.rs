//! Operator factory registry
//!
//! Resolves an operator type tag to a factory that turns a descriptor into a
//! runnable kernel. An unknown type or invalid arguments at instantiation
//! time is fatal: a corrupt graph is never tolerated, and executor
//! construction fails outright.

use std::collections::HashMap;

use tracing::debug;

use crate::error::{NetError, NetResult};
use crate::graph::OperatorDef;
use crate::operator::OperatorKernel;
use crate::workspace::SharedWorkspace;

/// Factory signature: (descriptor, workspace, position index) → kernel
pub type KernelFactory =
    Box<dyn Fn(&OperatorDef, &SharedWorkspace, usize) -> NetResult<Box<dyn OperatorKernel>> + Send + Sync>;

/// Registry of operator factories, keyed by type tag
#[derive(Default)]
pub struct OperatorRegistry {
    factories: HashMap<String, KernelFactory>,
}

impl OperatorRegistry {
    pub fn new() -> Self {
        OperatorRegistry::default()
    }

    /// Registry pre-populated with the builtin CPU kernels
    pub fn with_builtin_ops() -> Self {
        let mut registry = OperatorRegistry::new();
        crate::ops::register_builtin_ops(&mut registry);
        registry
    }

    /// Register a factory for an operator type, replacing any previous
    /// registration.
    pub fn register<F>(&mut self, op_type: impl Into<String>, factory: F)
    where
        F: Fn(&OperatorDef, &SharedWorkspace, usize) -> NetResult<Box<dyn OperatorKernel>>
            + Send
            + Sync
            + 'static,
    {
        self.factories.insert(op_type.into(), Box::new(factory));
    }

    /// Instantiate a kernel for the given descriptor
    pub fn create_operator(
        &self,
        def: &OperatorDef,
        workspace: &SharedWorkspace,
        index: usize,
    ) -> NetResult<Box<dyn OperatorKernel>> {
        debug!(op = %def.display_name(), op_type = %def.op_type, index, "creating operator");
        let factory = self
            .factories
            .get(&def.op_type)
            .ok_or_else(|| NetError::UnknownOperatorType(def.op_type.clone()))?;
        factory(def, workspace, index)
    }

    pub fn has_type(&self, op_type: &str) -> bool {
        self.factories.contains_key(op_type)
    }

    /// Names of all registered operator types
    pub fn registered_types(&self) -> Vec<&str> {
        self.factories.keys().map(String::as_str).collect()
    }
}

impl std::fmt::Debug for OperatorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OperatorRegistry")
            .field("types", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}
