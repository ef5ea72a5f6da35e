use std::time::Duration;

use crate::config::TimingConfig;

/// Scroll run parameters, in terminal rows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollConfig {
    /// Rows advanced per frame
    pub step: u16,
    /// Rows left above the command at the target position
    pub margin: u16,
    /// Minimum time between frames
    pub frame_interval: Duration,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self::from(&TimingConfig::default())
    }
}

impl From<&TimingConfig> for ScrollConfig {
    fn from(timing: &TimingConfig) -> Self {
        Self {
            step: timing.scroll_step_rows.max(1),
            margin: timing.scroll_margin_rows,
            frame_interval: timing.frame_interval(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_step_is_raised() {
        let timing = TimingConfig {
            scroll_step_rows: 0,
            ..Default::default()
        };
        assert_eq!(ScrollConfig::from(&timing).step, 1);
    }
}
