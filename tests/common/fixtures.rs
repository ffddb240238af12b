//! Shared fixtures: instrumented kernels and observers for executor tests

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use seqnet::{
    ArgValue, NetDef, NetError, NetObserver, OperatorDef, OperatorKernel, OperatorRegistry,
    Workspace,
};

/// Shared log of operator invocations, by position index
pub type CallLog = Arc<Mutex<Vec<usize>>>;

pub fn call_log() -> CallLog {
    Arc::new(Mutex::new(Vec::new()))
}

/// Kernel that records its position index on every run
pub struct TrackingKernel {
    index: usize,
    log: CallLog,
}

impl OperatorKernel for TrackingKernel {
    fn run(&mut self, _def: &OperatorDef, _ws: &mut Workspace) -> seqnet::NetResult<()> {
        self.log.lock().unwrap().push(self.index);
        Ok(())
    }
}

/// Kernel that records its invocation, then fails
pub struct FailingKernel {
    index: usize,
    log: CallLog,
}

impl OperatorKernel for FailingKernel {
    fn run(&mut self, _def: &OperatorDef, _ws: &mut Workspace) -> seqnet::NetResult<()> {
        self.log.lock().unwrap().push(self.index);
        Err(NetError::Internal("instrumented failure".into()))
    }
}

/// Registry with two instrumented types: "Track" (succeeds) and "Fail".
///
/// Both record their construction-time position index into `log` on every
/// invocation.
pub fn tracking_registry(log: &CallLog) -> OperatorRegistry {
    let mut registry = OperatorRegistry::new();
    let track_log = log.clone();
    registry.register("Track", move |_def, _ws, idx| {
        Ok(Box::new(TrackingKernel {
            index: idx,
            log: track_log.clone(),
        }) as _)
    });
    let fail_log = log.clone();
    registry.register("Fail", move |_def, _ws, idx| {
        Ok(Box::new(FailingKernel {
            index: idx,
            log: fail_log.clone(),
        }) as _)
    });
    registry
}

/// Net of `n` tracking operators, with the `fail_at`-th one failing
pub fn tracking_net(n: usize, fail_at: Option<usize>) -> NetDef {
    let mut net = NetDef::new("tracked");
    for i in 0..n {
        let op_type = if fail_at == Some(i) { "Fail" } else { "Track" };
        net = net.with_op(OperatorDef::new(op_type).with_name(format!("op{i}")));
    }
    net
}

/// Observer that records start/stop notifications into a shared vec
pub struct RecordingObserver {
    pub events: Arc<Mutex<Vec<String>>>,
}

impl RecordingObserver {
    pub fn new() -> (Self, Arc<Mutex<Vec<String>>>) {
        let events = Arc::new(Mutex::new(Vec::new()));
        (
            RecordingObserver {
                events: events.clone(),
            },
            events,
        )
    }
}

impl NetObserver for RecordingObserver {
    fn on_net_start(&mut self, net_name: &str) {
        self.events.lock().unwrap().push(format!("start:{net_name}"));
    }

    fn on_net_stop(&mut self, net_name: &str) {
        self.events.lock().unwrap().push(format!("stop:{net_name}"));
    }
}

/// ConstantFill descriptor shorthand
pub fn fill_def(out: &str, shape: Vec<i64>, value: f32) -> OperatorDef {
    OperatorDef::new("ConstantFill")
        .with_outputs([out])
        .with_arg("shape", ArgValue::Ints(shape))
        .with_arg("value", ArgValue::Float(value))
}

/// A small arithmetic pipeline over the builtin ops:
/// fill a, fill b, c = a + b, d = c * 2, e = a × c (matmul)
pub fn arithmetic_net() -> NetDef {
    NetDef::new("arith")
        .with_op(fill_def("a", vec![4, 4], 1.0))
        .with_op(fill_def("b", vec![4, 4], 2.0))
        .with_op(
            OperatorDef::new("Add")
                .with_name("sum")
                .with_inputs(["a", "b"])
                .with_outputs(["c"]),
        )
        .with_op(
            OperatorDef::new("Scale")
                .with_name("double")
                .with_inputs(["c"])
                .with_outputs(["d"])
                .with_arg("value", ArgValue::Float(2.0)),
        )
        .with_op(
            OperatorDef::new("MatMul")
                .with_name("proj")
                .with_inputs(["a", "c"])
                .with_outputs(["e"]),
        )
}
