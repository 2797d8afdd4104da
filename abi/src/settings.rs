use alloc::string::String;
use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// Which participant field the reel shows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayMode {
    #[default]
    Name,
    Phone,
}

bitflags! {
    /// Boolean toggles of the persisted settings bag.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct SettingsFlags: u32 {
        /// Unlimited-ticket participants are not depleted by wins.
        const ALLOW_RESELECT = 1 << 0;
        /// Play the per-item tick and the win sound.
        const SOUND          = 1 << 1;
    }
}

/// Page background behind the reel.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Background {
    #[default]
    Default,
    /// RGBA color, `0xRRGGBBAA`.
    Color(u32),
    /// Reference to an uploaded image, opaque to the engine.
    Image(String),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub display_mode: DisplayMode,
    pub flags: SettingsFlags,
    pub background: Background,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            display_mode: DisplayMode::Name,
            flags: SettingsFlags::SOUND,
            background: Background::Default,
        }
    }
}

impl Settings {
    #[inline]
    pub fn allow_reselect(&self) -> bool {
        self.flags.contains(SettingsFlags::ALLOW_RESELECT)
    }

    #[inline]
    pub fn sound_enabled(&self) -> bool {
        self.flags.contains(SettingsFlags::SOUND)
    }

    pub fn set_allow_reselect(&mut self, on: bool) {
        self.flags.set(SettingsFlags::ALLOW_RESELECT, on);
    }

    pub fn set_sound(&mut self, on: bool) {
        self.flags.set(SettingsFlags::SOUND, on);
    }
}
