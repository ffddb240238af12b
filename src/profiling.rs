//! Scoped profiling ranges around operator execution
//!
//! A [`ProfiledRange`] brackets exactly one operator invocation: it opens a
//! named, colored tracing span on creation and closes it when dropped, on
//! every exit path, including an early return from a failing run. When the
//! toggle in [`ProfilingConfig`] is off the range is entirely inert.
//!
//! The toggle and colors are injected configuration, not ambient global
//! state, so executors remain independently testable.

use std::time::Instant;

use tracing::span::EnteredSpan;

use crate::graph::OperatorDef;

/// ARGB color tag for an instrumentation range
pub type Color = u32;

/// Range color for operator runs (blue)
pub const RUN_COLOR: Color = 0x0000_CCFF;
/// Range color for recording phases (red)
pub const RECORD_COLOR: Color = 0x00FF_3300;
/// Range color for wait phases (green)
pub const WAIT_COLOR: Color = 0x0066_FF33;

/// Process-wide instrumentation configuration, injected into the executor
#[derive(Debug, Clone, Copy, Default)]
pub struct ProfilingConfig {
    /// Master toggle for scoped ranges
    pub enabled: bool,
}

impl ProfilingConfig {
    pub fn enabled() -> Self {
        ProfilingConfig { enabled: true }
    }

    pub fn disabled() -> Self {
        ProfilingConfig { enabled: false }
    }
}

/// Scoped marker bracketing one operator's execution
///
/// One open/close pair maps to exactly one invocation; the type is neither
/// copyable nor reassignable.
pub struct ProfiledRange {
    span: Option<EnteredSpan>,
    started: Option<Instant>,
    op_type: Option<String>,
}

impl ProfiledRange {
    /// Open a range tagged with the operator's type; inert when the toggle
    /// is off.
    pub fn new(config: &ProfilingConfig, def: &OperatorDef, color: Color) -> Self {
        if !config.enabled {
            return ProfiledRange {
                span: None,
                started: None,
                op_type: None,
            };
        }
        let span =
            tracing::debug_span!("op_range", op_type = %def.op_type, color = color).entered();
        ProfiledRange {
            span: Some(span),
            started: Some(Instant::now()),
            op_type: Some(def.op_type.clone()),
        }
    }

    /// Whether this range actually opened a span
    pub fn is_active(&self) -> bool {
        self.span.is_some()
    }
}

impl Drop for ProfiledRange {
    fn drop(&mut self) {
        if let (Some(started), Some(op_type)) = (self.started, self.op_type.take()) {
            let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
            tracing::trace!(op_type = %op_type, elapsed_ms, "range closed");
        }
        // span exits and closes here
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_range_is_inert() {
        let def = OperatorDef::new("Add");
        let range = ProfiledRange::new(&ProfilingConfig::disabled(), &def, RUN_COLOR);
        assert!(!range.is_active());
    }

    #[test]
    fn test_enabled_range_opens_and_closes() {
        let def = OperatorDef::new("MatMul");
        {
            let range = ProfiledRange::new(&ProfilingConfig::enabled(), &def, RUN_COLOR);
            assert!(range.is_active());
        }
        // dropping must not panic even with no subscriber installed
    }

    #[test]
    fn test_range_closes_on_early_return() {
        fn failing_run(def: &OperatorDef) -> Result<(), ()> {
            let _range = ProfiledRange::new(&ProfilingConfig::enabled(), def, RUN_COLOR);
            Err(())
        }
        let def = OperatorDef::new("Add");
        assert!(failing_run(&def).is_err());
    }

    #[test]
    fn test_color_constants() {
        assert_eq!(RUN_COLOR, 0x0000CCFF);
        assert_eq!(RECORD_COLOR, 0x00FF3300);
        assert_eq!(WAIT_COLOR, 0x0066FF33);
    }
}
