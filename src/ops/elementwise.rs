//! Elementwise f32 kernels

use crate::cost::CostEstimate;
use crate::error::{NetError, NetResult};
use crate::graph::OperatorDef;
use crate::operator::OperatorKernel;
use crate::workspace::{Blob, Workspace};

use super::{element_count, F32_BYTES};

/// c = a + b, elementwise; shapes must match exactly
#[derive(Debug)]
pub struct AddKernel;

impl OperatorKernel for AddKernel {
    fn run(&mut self, def: &OperatorDef, ws: &mut Workspace) -> NetResult<()> {
        let a = ws.blob(&def.inputs[0])?;
        let b = ws.blob(&def.inputs[1])?;
        if a.shape() != b.shape() {
            return Err(NetError::ShapeMismatch(format!(
                "Add inputs differ: {:?} vs {:?}",
                a.shape(),
                b.shape()
            )));
        }
        let out: Vec<f32> = a
            .data()
            .iter()
            .zip(b.data().iter())
            .map(|(x, y)| x + y)
            .collect();
        let shape = a.shape().to_vec();
        ws.create_blob(&def.outputs[0], Blob::new(shape, out)?);
        Ok(())
    }
}

/// y = x * factor
///
/// Argument: `value` (float).
#[derive(Debug)]
pub struct ScaleKernel {
    factor: f32,
}

impl ScaleKernel {
    pub fn from_def(def: &OperatorDef) -> NetResult<Self> {
        let factor = def.arg_float("value").ok_or_else(|| NetError::InvalidArgument {
            op: def.display_name().to_string(),
            reason: "Scale requires a float 'value' argument".into(),
        })?;
        Ok(ScaleKernel { factor })
    }
}

impl OperatorKernel for ScaleKernel {
    fn run(&mut self, def: &OperatorDef, ws: &mut Workspace) -> NetResult<()> {
        let x = ws.blob(&def.inputs[0])?;
        let out: Vec<f32> = x.data().iter().map(|v| v * self.factor).collect();
        let shape = x.shape().to_vec();
        ws.create_blob(&def.outputs[0], Blob::new(shape, out)?);
        Ok(())
    }
}

/// y = max(x, 0)
#[derive(Debug)]
pub struct ReluKernel;

impl OperatorKernel for ReluKernel {
    fn run(&mut self, def: &OperatorDef, ws: &mut Workspace) -> NetResult<()> {
        let x = ws.blob(&def.inputs[0])?;
        let out: Vec<f32> = x.data().iter().map(|v| v.max(0.0)).collect();
        let shape = x.shape().to_vec();
        ws.create_blob(&def.outputs[0], Blob::new(shape, out)?);
        Ok(())
    }
}

/// y = x
#[derive(Debug)]
pub struct CopyKernel;

impl OperatorKernel for CopyKernel {
    fn run(&mut self, def: &OperatorDef, ws: &mut Workspace) -> NetResult<()> {
        let x = ws.blob(&def.inputs[0])?.clone();
        ws.create_blob(&def.outputs[0], x);
        Ok(())
    }
}

fn first_input_elems(shapes: &[Vec<usize>]) -> u64 {
    shapes.first().map(|s| element_count(s) as u64).unwrap_or(0)
}

pub(crate) fn add_cost(_def: &OperatorDef, shapes: &[Vec<usize>]) -> CostEstimate {
    let n = first_input_elems(shapes);
    CostEstimate {
        flops: n,
        bytes_moved: 3 * n * F32_BYTES,
        params_bytes: 0,
    }
}

pub(crate) fn scale_cost(_def: &OperatorDef, shapes: &[Vec<usize>]) -> CostEstimate {
    let n = first_input_elems(shapes);
    CostEstimate {
        flops: n,
        bytes_moved: 2 * n * F32_BYTES,
        params_bytes: 0,
    }
}

pub(crate) fn relu_cost(_def: &OperatorDef, shapes: &[Vec<usize>]) -> CostEstimate {
    let n = first_input_elems(shapes);
    CostEstimate {
        flops: n,
        bytes_moved: 2 * n * F32_BYTES,
        params_bytes: 0,
    }
}

pub(crate) fn copy_cost(_def: &OperatorDef, shapes: &[Vec<usize>]) -> CostEstimate {
    let n = first_input_elems(shapes);
    CostEstimate {
        flops: 0,
        bytes_moved: 2 * n * F32_BYTES,
        params_bytes: 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::ArgValue;

    fn ws_with(pairs: &[(&str, Vec<usize>, Vec<f32>)]) -> Workspace {
        let mut ws = Workspace::new();
        for (name, shape, data) in pairs {
            ws.create_blob(*name, Blob::new(shape.clone(), data.clone()).unwrap());
        }
        ws
    }

    #[test]
    fn test_add() {
        let def = OperatorDef::new("Add").with_inputs(["a", "b"]).with_outputs(["c"]);
        let mut ws = ws_with(&[
            ("a", vec![3], vec![1.0, 2.0, 3.0]),
            ("b", vec![3], vec![10.0, 20.0, 30.0]),
        ]);
        AddKernel.run(&def, &mut ws).unwrap();
        assert_eq!(ws.blob("c").unwrap().data(), &[11.0, 22.0, 33.0]);
    }

    #[test]
    fn test_add_shape_mismatch() {
        let def = OperatorDef::new("Add").with_inputs(["a", "b"]).with_outputs(["c"]);
        let mut ws = ws_with(&[
            ("a", vec![2], vec![1.0, 2.0]),
            ("b", vec![3], vec![1.0, 2.0, 3.0]),
        ]);
        assert!(matches!(
            AddKernel.run(&def, &mut ws),
            Err(NetError::ShapeMismatch(_))
        ));
    }

    #[test]
    fn test_add_missing_input() {
        let def = OperatorDef::new("Add").with_inputs(["a", "b"]).with_outputs(["c"]);
        let mut ws = ws_with(&[("a", vec![2], vec![1.0, 2.0])]);
        assert!(matches!(
            AddKernel.run(&def, &mut ws),
            Err(NetError::BlobNotFound(_))
        ));
    }

    #[test]
    fn test_scale() {
        let def = OperatorDef::new("Scale")
            .with_inputs(["x"])
            .with_outputs(["y"])
            .with_arg("value", ArgValue::Float(0.5));
        let mut kernel = ScaleKernel::from_def(&def).unwrap();
        let mut ws = ws_with(&[("x", vec![2], vec![2.0, 4.0])]);
        kernel.run(&def, &mut ws).unwrap();
        assert_eq!(ws.blob("y").unwrap().data(), &[1.0, 2.0]);
    }

    #[test]
    fn test_scale_requires_value() {
        let def = OperatorDef::new("Scale").with_inputs(["x"]).with_outputs(["y"]);
        assert!(matches!(
            ScaleKernel::from_def(&def),
            Err(NetError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_relu() {
        let def = OperatorDef::new("Relu").with_inputs(["x"]).with_outputs(["y"]);
        let mut ws = ws_with(&[("x", vec![4], vec![-1.0, 0.0, 2.0, -3.0])]);
        ReluKernel.run(&def, &mut ws).unwrap();
        assert_eq!(ws.blob("y").unwrap().data(), &[0.0, 0.0, 2.0, 0.0]);
    }

    #[test]
    fn test_copy() {
        let def = OperatorDef::new("Copy").with_inputs(["x"]).with_outputs(["y"]);
        let mut ws = ws_with(&[("x", vec![2], vec![5.0, 6.0])]);
        CopyKernel.run(&def, &mut ws).unwrap();
        assert_eq!(ws.blob("y").unwrap(), ws.blob("x").unwrap());
    }

    #[test]
    fn test_elementwise_costs() {
        let def = OperatorDef::new("Add");
        let shapes = vec![vec![2, 3], vec![2, 3]];

        let cost = add_cost(&def, &shapes);
        assert_eq!(cost.flops, 6);
        assert_eq!(cost.bytes_moved, 72);

        let cost = copy_cost(&def, &shapes);
        assert_eq!(cost.flops, 0);
        assert_eq!(cost.bytes_moved, 48);

        // no inputs yet: zero cost, no panic
        let cost = scale_cost(&def, &[]);
        assert_eq!(cost, CostEstimate::default());
    }
}
