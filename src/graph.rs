//! Graph and operator descriptors
//!
//! [`NetDef`] is a statically defined pipeline: an ordered sequence of
//! [`OperatorDef`]s plus an optional default device placement. The order is
//! assumed to already be a valid execution order; the executor neither
//! verifies nor reorders it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Execution backend an operator should run on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DeviceType {
    #[default]
    Cpu,
    Gpu,
}

/// Device placement for an operator or a whole net
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DeviceOption {
    pub device_type: DeviceType,
    /// Ordinal of the device within its type (always 0 for CPU)
    #[serde(default)]
    pub device_id: u32,
}

impl DeviceOption {
    pub fn cpu() -> Self {
        DeviceOption {
            device_type: DeviceType::Cpu,
            device_id: 0,
        }
    }

    pub fn gpu(device_id: u32) -> Self {
        DeviceOption {
            device_type: DeviceType::Gpu,
            device_id,
        }
    }
}

/// Type-specific operator argument value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArgValue {
    Int(i64),
    Float(f32),
    Str(String),
    Ints(Vec<i64>),
    Floats(Vec<f32>),
}

/// Immutable description of one operator in a net
///
/// The executor never mutates a descriptor. The only exception is placement
/// synthesis at construction time, which works on a clone; the original stays
/// untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatorDef {
    /// Operator name, may be empty
    #[serde(default)]
    pub name: String,
    /// Operator type tag, resolved against the operator registry
    pub op_type: String,
    /// Ordered input blob names
    #[serde(default)]
    pub inputs: Vec<String>,
    /// Ordered output blob names
    #[serde(default)]
    pub outputs: Vec<String>,
    /// Explicit device placement; absent means "inherit the net default"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device: Option<DeviceOption>,
    /// Type-specific arguments
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub args: BTreeMap<String, ArgValue>,
}

impl OperatorDef {
    pub fn new(op_type: impl Into<String>) -> Self {
        OperatorDef {
            name: String::new(),
            op_type: op_type.into(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            device: None,
            args: BTreeMap::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_inputs<I, S>(mut self, inputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inputs = inputs.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_outputs<I, S>(mut self, outputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.outputs = outputs.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_device(mut self, device: DeviceOption) -> Self {
        self.device = Some(device);
        self
    }

    pub fn with_arg(mut self, key: impl Into<String>, value: ArgValue) -> Self {
        self.args.insert(key.into(), value);
        self
    }

    /// Fetch an integer argument
    pub fn arg_int(&self, key: &str) -> Option<i64> {
        match self.args.get(key) {
            Some(ArgValue::Int(v)) => Some(*v),
            _ => None,
        }
    }

    /// Fetch a float argument, accepting an integer literal too
    pub fn arg_float(&self, key: &str) -> Option<f32> {
        match self.args.get(key) {
            Some(ArgValue::Float(v)) => Some(*v),
            Some(ArgValue::Int(v)) => Some(*v as f32),
            _ => None,
        }
    }

    /// Fetch a string argument
    pub fn arg_str(&self, key: &str) -> Option<&str> {
        match self.args.get(key) {
            Some(ArgValue::Str(v)) => Some(v.as_str()),
            _ => None,
        }
    }

    /// Fetch an integer-list argument
    pub fn arg_ints(&self, key: &str) -> Option<&[i64]> {
        match self.args.get(key) {
            Some(ArgValue::Ints(v)) => Some(v.as_slice()),
            _ => None,
        }
    }

    /// Display name used in diagnostics: the operator name, else its first
    /// output, else a fixed placeholder.
    pub fn display_name(&self) -> &str {
        if !self.name.is_empty() {
            &self.name
        } else if let Some(first) = self.outputs.first() {
            first
        } else {
            "NO_OUTPUT"
        }
    }
}

/// Statically defined operator graph
///
/// Precondition: `ops` is already a valid execution order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetDef {
    #[serde(default)]
    pub name: String,
    /// Default device placement inherited by operators lacking their own
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device: Option<DeviceOption>,
    #[serde(default)]
    pub ops: Vec<OperatorDef>,
}

impl NetDef {
    pub fn new(name: impl Into<String>) -> Self {
        NetDef {
            name: name.into(),
            device: None,
            ops: Vec::new(),
        }
    }

    pub fn with_device(mut self, device: DeviceOption) -> Self {
        self.device = Some(device);
        self
    }

    pub fn with_op(mut self, op: OperatorDef) -> Self {
        self.ops.push(op);
        self
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arg_accessors() {
        let op = OperatorDef::new("Scale")
            .with_arg("value", ArgValue::Float(2.5))
            .with_arg("axis", ArgValue::Int(1))
            .with_arg("mode", ArgValue::Str("wrap".into()))
            .with_arg("shape", ArgValue::Ints(vec![2, 3]));

        assert_eq!(op.arg_float("value"), Some(2.5));
        assert_eq!(op.arg_int("axis"), Some(1));
        assert_eq!(op.arg_str("mode"), Some("wrap"));
        assert_eq!(op.arg_ints("shape"), Some(&[2, 3][..]));
        assert_eq!(op.arg_int("missing"), None);
    }

    #[test]
    fn test_arg_float_accepts_int() {
        let op = OperatorDef::new("Scale").with_arg("value", ArgValue::Int(3));
        assert_eq!(op.arg_float("value"), Some(3.0));
    }

    #[test]
    fn test_display_name_fallbacks() {
        let named = OperatorDef::new("Add").with_name("sum");
        assert_eq!(named.display_name(), "sum");

        let unnamed = OperatorDef::new("Add").with_outputs(["c"]);
        assert_eq!(unnamed.display_name(), "c");

        let bare = OperatorDef::new("Add");
        assert_eq!(bare.display_name(), "NO_OUTPUT");
    }

    #[test]
    fn test_net_def_json_round_trip() {
        let net = NetDef::new("toy")
            .with_device(DeviceOption::cpu())
            .with_op(
                OperatorDef::new("ConstantFill")
                    .with_outputs(["a"])
                    .with_arg("shape", ArgValue::Ints(vec![2, 2]))
                    .with_arg("value", ArgValue::Float(1.0)),
            )
            .with_op(
                OperatorDef::new("Add")
                    .with_name("sum")
                    .with_inputs(["a", "a"])
                    .with_outputs(["b"])
                    .with_device(DeviceOption::gpu(1)),
            );

        let json = serde_json::to_string(&net).unwrap();
        let back: NetDef = serde_json::from_str(&json).unwrap();
        assert_eq!(back, net);
        assert_eq!(back.ops[1].device, Some(DeviceOption::gpu(1)));
    }

    #[test]
    fn test_net_def_from_minimal_json() {
        let json = r#"{
            "name": "mini",
            "ops": [{ "op_type": "Relu", "inputs": ["x"], "outputs": ["y"] }]
        }"#;
        let net: NetDef = serde_json::from_str(json).unwrap();
        assert_eq!(net.len(), 1);
        assert!(net.device.is_none());
        assert!(net.ops[0].args.is_empty());
    }
}
