//! User options of the goggle firmware
//!
//! The host firmware keeps 6 option bytes in its EEPROM. They are decoded once into
//! `Settings` when loaded, instead of indexing the raw array everywhere. The driver itself
//! only cares about the video standard.

use crate::registers::VideoStandard;

/// number of stored option bytes
pub const OPTION_COUNT: usize = 6;

/// Cell count of the flight battery
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BatteryType {
    ThreeCell,
    TwoCell,
}

/// Where the info line is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InfoLinePosition {
    Top,
    Bottom,
}

/// Decoded option bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Settings {
    pub battery_type: BatteryType,
    pub battery_alarm: bool,
    pub show_start_screen: bool,
    pub info_line: bool,
    pub info_line_position: InfoLinePosition,
    pub pal_video: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            battery_type: BatteryType::ThreeCell,
            battery_alarm: true,
            show_start_screen: true,
            info_line: true,
            info_line_position: InfoLinePosition::Top,
            pal_video: true,
        }
    }
}

impl Settings {
    /// Decode the stored option bytes, in the order battery type, battery alarm, start screen,
    /// info line, info line position, PAL video. Any non zero byte counts as "on".
    pub fn from_options(options: &[u8; OPTION_COUNT]) -> Settings {
        Settings {
            battery_type: if options[0] == 0 {
                BatteryType::ThreeCell
            } else {
                BatteryType::TwoCell
            },
            battery_alarm: options[1] != 0,
            show_start_screen: options[2] != 0,
            info_line: options[3] != 0,
            info_line_position: if options[4] == 0 {
                InfoLinePosition::Top
            } else {
                InfoLinePosition::Bottom
            },
            pal_video: options[5] != 0,
        }
    }

    /// Encode into option bytes, the inverse of `from_options`
    pub fn to_options(&self) -> [u8; OPTION_COUNT] {
        [
            (self.battery_type == BatteryType::TwoCell) as u8,
            self.battery_alarm as u8,
            self.show_start_screen as u8,
            self.info_line as u8,
            (self.info_line_position == InfoLinePosition::Bottom) as u8,
            self.pal_video as u8,
        ]
    }

    /// video standard the OSD should generate
    pub fn output_standard(&self) -> VideoStandard {
        if self.pal_video {
            VideoStandard::Pal
        } else {
            VideoStandard::Ntsc
        }
    }
}
