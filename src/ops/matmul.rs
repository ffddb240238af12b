//! Matrix multiplication kernel

use crate::cost::CostEstimate;
use crate::error::{NetError, NetResult};
use crate::graph::OperatorDef;
use crate::operator::OperatorKernel;
use crate::workspace::{Blob, Workspace};

use super::F32_BYTES;

/// c[m,n] = a[m,k] × b[k,n], row-major
#[derive(Debug)]
pub struct MatMulKernel;

impl OperatorKernel for MatMulKernel {
    fn run(&mut self, def: &OperatorDef, ws: &mut Workspace) -> NetResult<()> {
        let a = ws.blob(&def.inputs[0])?;
        let b = ws.blob(&def.inputs[1])?;

        let (m, k) = match a.shape() {
            [m, k] => (*m, *k),
            other => {
                return Err(NetError::ShapeMismatch(format!(
                    "MatMul input 0 must be rank 2, got {other:?}"
                )))
            }
        };
        let (k2, n) = match b.shape() {
            [k2, n] => (*k2, *n),
            other => {
                return Err(NetError::ShapeMismatch(format!(
                    "MatMul input 1 must be rank 2, got {other:?}"
                )))
            }
        };
        if k != k2 {
            return Err(NetError::ShapeMismatch(format!(
                "MatMul inner dimensions differ: {k} vs {k2}"
            )));
        }

        let lhs = a.data();
        let rhs = b.data();
        let mut out = vec![0.0f32; m * n];
        for i in 0..m {
            for l in 0..k {
                let x = lhs[i * k + l];
                for j in 0..n {
                    out[i * n + j] += x * rhs[l * n + j];
                }
            }
        }
        ws.create_blob(&def.outputs[0], Blob::new(vec![m, n], out)?);
        Ok(())
    }
}

/// 2·m·n·k FLOPs; features moved are the first input plus the output, the
/// second input counts as parameters.
pub(crate) fn matmul_cost(_def: &OperatorDef, shapes: &[Vec<usize>]) -> CostEstimate {
    let (m, k, n) = match shapes {
        [a, b] if a.len() == 2 && b.len() == 2 && a[1] == b[0] => (a[0], a[1], b[1]),
        _ => return CostEstimate::default(),
    };
    CostEstimate {
        flops: 2 * (m * n * k) as u64,
        bytes_moved: ((m * k + m * n) as u64) * F32_BYTES,
        params_bytes: ((k * n) as u64) * F32_BYTES,
    }
}
