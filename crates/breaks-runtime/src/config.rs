use breaks_core::Mask;

use crate::error::RuntimeError;

/// Enables the `tracing` sink when set to `1` or `true`.
pub const TRACE_ENV: &str = "BREAKS_TRACE";
/// Overrides [`DriverConfig::cpu_divider`].
pub const CPU_DIVIDER_ENV: &str = "BREAKS_CPU_DIVIDER";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TraceMode {
    #[default]
    Off,
    /// Every step is reported through [`breaks_core::TracingSink`].
    Tracing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverConfig {
    /// Master half-cycles per CPU phase. 6 gives the NTSC ratio of one CPU
    /// cycle per twelve master cycles.
    pub cpu_divider: u32,
    /// Master half-cycles nRES is held low by [`crate::Driver::power_on_reset`].
    pub reset_half_cycles: u32,
    /// Initial `$2001` value.
    pub mask: Mask,
    pub trace: TraceMode,
    /// Keep a [`crate::ReplayLog`] of every step.
    pub record_replay: bool,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            cpu_divider: 6,
            reset_half_cycles: 16,
            mask: Mask::empty(),
            trace: TraceMode::Off,
            record_replay: false,
        }
    }
}

impl DriverConfig {
    /// Defaults overlaid with `BREAKS_TRACE` and `BREAKS_CPU_DIVIDER`.
    pub fn from_env() -> Result<Self, RuntimeError> {
        Self::default().with_overrides(|var| std::env::var(var).ok())
    }

    /// Applies overrides from `lookup`, which maps a variable name to its
    /// value.
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, RuntimeError> {
        if let Some(value) = lookup(TRACE_ENV) {
            let mode = match value.trim() {
                "1" => Some(TraceMode::Tracing),
                v if v.eq_ignore_ascii_case("true") => Some(TraceMode::Tracing),
                "" | "0" => Some(TraceMode::Off),
                v if v.eq_ignore_ascii_case("false") => Some(TraceMode::Off),
                _ => None,
            };
            self.trace = mode.ok_or_else(|| RuntimeError::InvalidConfig {
                var: TRACE_ENV,
                value: value.clone(),
            })?;
        }
        if let Some(value) = lookup(CPU_DIVIDER_ENV) {
            self.cpu_divider = value
                .trim()
                .parse()
                .map_err(|_| RuntimeError::InvalidConfig {
                    var: CPU_DIVIDER_ENV,
                    value: value.clone(),
                })?;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), RuntimeError> {
        if self.cpu_divider == 0 {
            return Err(RuntimeError::InvalidConfig {
                var: CPU_DIVIDER_ENV,
                value: self.cpu_divider.to_string(),
            });
        }
        Ok(())
    }
}
