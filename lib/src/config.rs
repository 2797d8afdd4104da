use alloc::string::String;

use crate::klog::KlogLevel;

const DEFAULT_LOG_LEVEL: KlogLevel = KlogLevel::Info;
const DEFAULT_FPS: u32 = 60;
const DEFAULT_DATA_DIR: &str = ".raffle";
const DEFAULT_DEMO: bool = true;
const DEFAULT_ITEM_HEIGHT: f64 = 120.0;
const MAX_FPS: u32 = 240;

/// Host configuration, parsed from `key=value` tokens.
#[derive(Clone, Debug, PartialEq)]
pub struct RaffleConfig {
    pub log_level: KlogLevel,
    pub fps: u32,
    /// Directory holding the persisted documents.
    pub data_dir: String,
    /// Populate an empty store with demo participants.
    pub demo: bool,
    /// Height of one reel item, in pixels.
    pub item_height: f64,
}

impl Default for RaffleConfig {
    fn default() -> Self {
        Self {
            log_level: DEFAULT_LOG_LEVEL,
            fps: DEFAULT_FPS,
            data_dir: String::from(DEFAULT_DATA_DIR),
            demo: DEFAULT_DEMO,
            item_height: DEFAULT_ITEM_HEIGHT,
        }
    }
}

pub fn parse_bool(value: &str) -> Option<bool> {
    if value.eq_ignore_ascii_case("on")
        || value.eq_ignore_ascii_case("true")
        || value.eq_ignore_ascii_case("yes")
        || value.eq_ignore_ascii_case("enabled")
        || value == "1"
    {
        Some(true)
    } else if value.eq_ignore_ascii_case("off")
        || value.eq_ignore_ascii_case("false")
        || value.eq_ignore_ascii_case("no")
        || value.eq_ignore_ascii_case("disabled")
        || value == "0"
    {
        Some(false)
    } else {
        None
    }
}

/// Parse a whitespace-separated command line. Unknown tokens and malformed
/// values are ignored and leave the default in place.
pub fn config_from_cmdline(cmdline: Option<&str>) -> RaffleConfig {
    let mut cfg = RaffleConfig::default();
    if let Some(cmdline) = cmdline {
        for token in cmdline.split_whitespace() {
            if let Some(value) = token.strip_prefix("raffle.log=") {
                if let Some(level) = KlogLevel::parse(value) {
                    cfg.log_level = level;
                }
            } else if let Some(value) = token.strip_prefix("raffle.fps=") {
                if let Ok(parsed) = value.trim_end_matches("hz").parse::<u32>() {
                    cfg.fps = parsed.clamp(1, MAX_FPS);
                }
            } else if let Some(value) = token.strip_prefix("raffle.data=") {
                if !value.is_empty() {
                    cfg.data_dir = String::from(value);
                }
            } else if let Some(value) = token.strip_prefix("raffle.demo=") {
                if let Some(demo) = parse_bool(value) {
                    cfg.demo = demo;
                }
            } else if let Some(value) = token.strip_prefix("raffle.item_height=") {
                if let Ok(parsed) = value.trim_end_matches("px").parse::<f64>() {
                    if parsed.is_finite() && parsed > 0.0 {
                        cfg.item_height = parsed;
                    }
                }
            }
        }
    }
    cfg
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_cmdline_gives_defaults() {
        assert_eq!(config_from_cmdline(None), RaffleConfig::default());
        assert_eq!(config_from_cmdline(Some("")), RaffleConfig::default());
    }

    #[test]
    fn known_tokens_are_applied() {
        let cfg = config_from_cmdline(Some(
            "raffle.log=debug raffle.fps=30hz raffle.data=/tmp/r raffle.demo=off raffle.item_height=80px",
        ));
        assert_eq!(cfg.log_level, KlogLevel::Debug);
        assert_eq!(cfg.fps, 30);
        assert_eq!(cfg.data_dir, "/tmp/r");
        assert!(!cfg.demo);
        assert_eq!(cfg.item_height, 80.0);
    }

    #[test]
    fn bad_values_keep_defaults() {
        let cfg = config_from_cmdline(Some(
            "raffle.log=loud raffle.fps=fast raffle.demo=maybe raffle.item_height=-3 other=1",
        ));
        assert_eq!(cfg, RaffleConfig::default());
    }

    #[test]
    fn fps_is_clamped() {
        assert_eq!(config_from_cmdline(Some("raffle.fps=0")).fps, 1);
        assert_eq!(config_from_cmdline(Some("raffle.fps=1000")).fps, MAX_FPS);
    }
}
