//! Runtime operator instances
//!
//! An [`OperatorInstance`] is one runnable unit bound to exactly one
//! [`OperatorDef`]. The binding is a [`DefRef`]: either an exclusively owned
//! copy (produced by device-placement synthesis at construction) or shared
//! ownership of the whole graph plus an index. The graph handle keeps the
//! descriptor alive for as long as any instance references it, so no bare
//! reference with an implicit lifetime contract exists anywhere.

use std::sync::Arc;

use crate::error::{NetError, NetResult};
use crate::graph::{NetDef, OperatorDef};
use crate::workspace::{SharedWorkspace, Workspace};

/// Executable kernel behind an operator instance
///
/// Kernels are produced by the operator registry. A kernel reads its inputs
/// from the workspace, writes its outputs back, and reports failure through
/// the ordinary error channel; the executor decides whether that failure is
/// recoverable or fatal.
pub trait OperatorKernel: Send {
    fn run(&mut self, def: &OperatorDef, ws: &mut Workspace) -> NetResult<()>;
}

impl std::fmt::Debug for dyn OperatorKernel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("OperatorKernel")
    }
}

/// Binding from an instance to its descriptor
#[derive(Debug, Clone)]
pub enum DefRef {
    /// Exclusively owned synthesized copy (placement inheritance occurred)
    Owned(Box<OperatorDef>),
    /// Back-reference into the graph the instance was built from
    Shared { net: Arc<NetDef>, index: usize },
}

impl DefRef {
    pub fn def(&self) -> &OperatorDef {
        match self {
            DefRef::Owned(def) => def,
            DefRef::Shared { net, index } => &net.ops[*index],
        }
    }

    /// Whether this binding owns a synthesized descriptor copy
    pub fn is_owned(&self) -> bool {
        matches!(self, DefRef::Owned(_))
    }
}

/// Runnable unit bound to one operator descriptor
pub struct OperatorInstance {
    kernel: Box<dyn OperatorKernel>,
    def: DefRef,
    workspace: SharedWorkspace,
    completed: bool,
}

impl OperatorInstance {
    pub fn new(kernel: Box<dyn OperatorKernel>, def: DefRef, workspace: SharedWorkspace) -> Self {
        OperatorInstance {
            kernel,
            def,
            workspace,
            completed: false,
        }
    }

    /// Execute the kernel once against the shared workspace.
    ///
    /// Kernel failures come back as [`NetError::OperatorFailed`] carrying the
    /// operator's name and type; a poisoned workspace lock is reported as-is.
    pub fn run(&mut self) -> NetResult<()> {
        let def = self.def.def();
        let mut ws = self.workspace.write()?;
        match self.kernel.run(def, &mut ws) {
            Ok(()) => {
                self.completed = true;
                Ok(())
            }
            Err(err) => Err(NetError::OperatorFailed {
                name: def.display_name().to_string(),
                op_type: def.op_type.clone(),
                reason: err.to_string(),
            }),
        }
    }

    /// Clear the completion state ahead of an individually timed run
    pub fn reset_event(&mut self) {
        self.completed = false;
    }

    /// Whether the last run since the last reset completed successfully
    pub fn has_completed(&self) -> bool {
        self.completed
    }

    /// Current shapes of the instance's input blobs, in declared order
    pub fn input_shapes(&self) -> NetResult<Vec<Vec<usize>>> {
        let def = self.def.def();
        let ws = self.workspace.read()?;
        def.inputs
            .iter()
            .map(|name| ws.shape_of(name))
            .collect()
    }

    /// Read access to the bound descriptor
    pub fn def(&self) -> &OperatorDef {
        self.def.def()
    }

    /// Whether this instance owns a synthesized descriptor copy
    pub fn owns_def(&self) -> bool {
        self.def.is_owned()
    }
}

impl std::fmt::Debug for OperatorInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OperatorInstance")
            .field("op_type", &self.def().op_type)
            .field("name", &self.def().name)
            .field("owned_def", &self.def.is_owned())
            .field("completed", &self.completed)
            .finish()
    }
}
