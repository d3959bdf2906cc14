//! VM settings.

use std::env;

use tracing::warn;

use crate::vm::STACK_MAX;

/// Enables the per-instruction trace when set to `1`, `true`, `yes` or `on`.
pub const ENV_TRACE: &str = "JEZIK_TRACE";
/// Overrides the value stack capacity (positive integer).
pub const ENV_STACK_MAX: &str = "JEZIK_STACK_MAX";

/// Execution settings for a [`Vm`](crate::Vm).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VmConfig {
    /// Print the stack and the next instruction before every fetch.
    pub trace: bool,
    /// Maximum number of values on the stack.
    pub stack_capacity: usize,
}

impl Default for VmConfig {
    fn default() -> Self { Self { trace: false, stack_capacity: STACK_MAX } }
}

impl VmConfig {
    /// Defaults overridden by `JEZIK_TRACE` / `JEZIK_STACK_MAX`.
    pub fn from_env() -> Self { Self::from_lookup(|key| env::var(key).ok()) }

    /// Same as [`VmConfig::from_env`] with an arbitrary variable source.
    ///
    /// Unparseable values are ignored with a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_TRACE) {
            match parse_flag(&raw) {
                Some(flag) => config.trace = flag,
                None => warn!(var = ENV_TRACE, value = %raw, "ignoring unrecognised flag"),
            }
        }

        if let Some(raw) = lookup(ENV_STACK_MAX) {
            match raw.trim().parse::<usize>() {
                Ok(n) if n > 0 => config.stack_capacity = n,
                _ => warn!(var = ENV_STACK_MAX, value = %raw, "ignoring invalid stack capacity"),
            }
        }

        config
    }

    /// Builder-style toggle for the trace.
    #[must_use]
    pub const fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    /// Builder-style stack capacity.
    #[must_use]
    pub const fn with_stack_capacity(mut self, capacity: usize) -> Self {
        self.stack_capacity = capacity;
        self
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
