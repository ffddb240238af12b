//! Blob creation kernel

use crate::error::{NetError, NetResult};
use crate::graph::OperatorDef;
use crate::operator::OperatorKernel;
use crate::workspace::{Blob, Workspace};

/// Creates (or replaces) its output blob with a constant-filled tensor.
///
/// Arguments: `shape` (int list), `value` (float, default 0).
#[derive(Debug)]
pub struct ConstantFillKernel {
    shape: Vec<usize>,
    value: f32,
}

impl ConstantFillKernel {
    pub fn from_def(def: &OperatorDef) -> NetResult<Self> {
        if def.outputs.len() != 1 {
            return Err(NetError::InvalidArgument {
                op: def.display_name().to_string(),
                reason: format!("ConstantFill expects 1 output, got {}", def.outputs.len()),
            });
        }
        let dims = def.arg_ints("shape").ok_or_else(|| NetError::InvalidArgument {
            op: def.display_name().to_string(),
            reason: "ConstantFill requires an int-list 'shape' argument".into(),
        })?;
        if dims.iter().any(|d| *d < 0) {
            return Err(NetError::InvalidArgument {
                op: def.display_name().to_string(),
                reason: format!("negative dimension in shape {dims:?}"),
            });
        }
        Ok(ConstantFillKernel {
            shape: dims.iter().map(|d| *d as usize).collect(),
            value: def.arg_float("value").unwrap_or(0.0),
        })
    }
}

impl OperatorKernel for ConstantFillKernel {
    fn run(&mut self, def: &OperatorDef, ws: &mut Workspace) -> NetResult<()> {
        ws.create_blob(&def.outputs[0], Blob::filled(self.shape.clone(), self.value));
        Ok(())
    }
}
