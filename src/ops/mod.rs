//! Builtin CPU operator kernels and their cost models
//!
//! A small working set of f32 kernels so graphs can actually run: blob
//! creation, elementwise math and matrix multiplication. Argument and arity
//! problems are caught when the factory instantiates the kernel; anything
//! depending on workspace contents is checked at run time.

mod elementwise;
mod fill;
mod matmul;

pub use elementwise::{AddKernel, CopyKernel, ReluKernel, ScaleKernel};
pub use fill::ConstantFillKernel;
pub use matmul::MatMulKernel;

use crate::cost::CostModelRegistry;
use crate::error::{NetError, NetResult};
use crate::graph::OperatorDef;
use crate::registry::OperatorRegistry;

/// Register every builtin kernel factory
pub fn register_builtin_ops(registry: &mut OperatorRegistry) {
    registry.register("ConstantFill", |def, _ws, _idx| {
        Ok(Box::new(ConstantFillKernel::from_def(def)?) as _)
    });
    registry.register("Add", |def, _ws, _idx| {
        check_arity(def, 2, 1)?;
        Ok(Box::new(AddKernel) as _)
    });
    registry.register("Scale", |def, _ws, _idx| {
        check_arity(def, 1, 1)?;
        Ok(Box::new(ScaleKernel::from_def(def)?) as _)
    });
    registry.register("Relu", |def, _ws, _idx| {
        check_arity(def, 1, 1)?;
        Ok(Box::new(ReluKernel) as _)
    });
    registry.register("Copy", |def, _ws, _idx| {
        check_arity(def, 1, 1)?;
        Ok(Box::new(CopyKernel) as _)
    });
    registry.register("MatMul", |def, _ws, _idx| {
        check_arity(def, 2, 1)?;
        Ok(Box::new(MatMulKernel) as _)
    });
}

/// Register cost models for the builtin operator types
pub fn register_builtin_costs(registry: &mut CostModelRegistry) {
    registry.register("Add", elementwise::add_cost);
    registry.register("Scale", elementwise::scale_cost);
    registry.register("Relu", elementwise::relu_cost);
    registry.register("Copy", elementwise::copy_cost);
    registry.register("MatMul", matmul::matmul_cost);
}

fn check_arity(def: &OperatorDef, inputs: usize, outputs: usize) -> NetResult<()> {
    if def.inputs.len() != inputs || def.outputs.len() != outputs {
        return Err(NetError::InvalidArgument {
            op: def.display_name().to_string(),
            reason: format!(
                "{} expects {} input(s) and {} output(s), got {} and {}",
                def.op_type,
                inputs,
                outputs,
                def.inputs.len(),
                def.outputs.len()
            ),
        });
    }
    Ok(())
}

pub(crate) fn element_count(shape: &[usize]) -> usize {
    shape.iter().product()
}

pub(crate) const F32_BYTES: u64 = std::mem::size_of::<f32>() as u64;
