//! seqnet - Sequential Operator-Graph Execution Engine
//!
//! A strictly sequential execution engine for statically defined
//! computational graphs: an ordered pipeline of numeric operators run
//! against a shared mutable workspace, with lifecycle observers, scoped
//! profiling ranges and a benchmarking subsystem measuring wall-clock and
//! theoretical cost per operator and per operator type.
//!
//! The input order of a [`NetDef`] is assumed to already be a valid
//! execution order; the engine neither validates nor reorders it, and it
//! never mutates the graph except to synthesize device placements at
//! construction time.

pub mod benchmark;
pub mod cost;
pub mod error;
pub mod executor;
pub mod graph;
pub mod logging;
pub mod observer;
pub mod operator;
pub mod ops;
pub mod profiling;
pub mod registry;
pub mod workspace;

pub use benchmark::{BenchmarkReport, TypeTotals};
pub use cost::{CostEstimate, CostModelRegistry};
pub use error::{NetError, NetResult, Severity};
pub use executor::SequentialExecutor;
pub use graph::{ArgValue, DeviceOption, DeviceType, NetDef, OperatorDef};
pub use logging::{init_logging_default, init_with_config, LogFormat, LogLevel, LoggingConfig};
pub use observer::{LoggingObserver, NetObserver};
pub use operator::{DefRef, OperatorInstance, OperatorKernel};
pub use profiling::{Color, ProfiledRange, ProfilingConfig, RECORD_COLOR, RUN_COLOR, WAIT_COLOR};
pub use registry::OperatorRegistry;
pub use workspace::{shared_workspace, Blob, SharedWorkspace, Workspace};
