use bitflags::bitflags;

use crate::error::{Result, TauError};
use crate::style::Color;

pub const DEFAULT_FRAMES_IN_FLIGHT: usize = 2;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ShaderDebugFlags: u8 {
        /// Log every generated fragment shader at debug level.
        const SOURCE = 1 << 0;
        /// Run naga's validator before handing a module to the device.
        const VALIDATE = 1 << 1;
    }
}

impl ShaderDebugFlags {
    /// Parses a comma separated list such as `source,validate`.
    pub fn parse(raw: &str) -> Result<Self> {
        raw.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .try_fold(Self::empty(), |flags, part| {
                let flag = match part.to_ascii_lowercase().as_str() {
                    "source" => Self::SOURCE,
                    "validate" => Self::VALIDATE,
                    "all" => Self::all(),
                    other => {
                        return Err(TauError::Config(format!(
                            "unknown shader debug flag `{other}`"
                        )));
                    }
                };
                Ok(flags | flag)
            })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeConfig {
    pub frames_in_flight: usize,
    pub clear_color: Color,
    pub shader_debug: ShaderDebugFlags,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            frames_in_flight: DEFAULT_FRAMES_IN_FLIGHT,
            clear_color: Color::BLACK,
            shader_debug: ShaderDebugFlags::empty(),
        }
    }
}

impl RuntimeConfig {
    /// Reads `TAU_FRAMES_IN_FLIGHT`, `TAU_CLEAR_COLOR` and `TAU_SHADER_DEBUG`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(raw) = lookup("TAU_FRAMES_IN_FLIGHT") {
            config.frames_in_flight = raw.trim().parse().map_err(|_| {
                TauError::Config(format!("TAU_FRAMES_IN_FLIGHT is not a number: `{raw}`"))
            })?;
        }
        if let Some(raw) = lookup("TAU_CLEAR_COLOR") {
            config.clear_color = Color::hex(raw.trim()).ok_or_else(|| {
                TauError::Config(format!("TAU_CLEAR_COLOR is not a hex color: `{raw}`"))
            })?;
        }
        if let Some(raw) = lookup("TAU_SHADER_DEBUG") {
            config.shader_debug = ShaderDebugFlags::parse(&raw)?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.frames_in_flight < 2 {
            return Err(TauError::Config(format!(
                "frames_in_flight must be at least 2, got {}",
                self.frames_in_flight
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = RuntimeConfig::from_lookup(lookup(&[])).expect("defaults are valid");
        assert_eq!(config, RuntimeConfig::default());
    }

    #[test]
    fn reads_every_variable() {
        let config = RuntimeConfig::from_lookup(lookup(&[
            ("TAU_FRAMES_IN_FLIGHT", "3"),
            ("TAU_CLEAR_COLOR", "#ffffff"),
            ("TAU_SHADER_DEBUG", "source, validate"),
        ]))
        .expect("valid config");
        assert_eq!(config.frames_in_flight, 3);
        assert_eq!(config.clear_color, Color::WHITE);
        assert_eq!(config.shader_debug, ShaderDebugFlags::all());
    }

    #[test]
    fn rejects_single_frame_in_flight() {
        let err = RuntimeConfig::from_lookup(lookup(&[("TAU_FRAMES_IN_FLIGHT", "1")]))
            .expect_err("one frame is not enough");
        assert!(matches!(err, TauError::Config(_)));
    }

    #[test]
    fn rejects_unknown_debug_flag() {
        assert!(ShaderDebugFlags::parse("source,wat").is_err());
    }
}
