//! Start up configuration of the driver
//!
//! Everything `MAX7456::init()` writes to the chip, and the timing of the delays and polls of
//! the driver. The defaults are what the Cyclop/MinimOSD boards use: PAL, 90% white level and
//! generous margins on the data sheet timings.

use crate::registers::{
    BlackLevel, BlinkDutyCycle, BlinkTime, RiseFallTime, SwitchingTime, VideoStandard, WhiteLevel,
};

/// Configuration applied by `MAX7456::init()`
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// video standard generated by the chip
    pub video_standard: VideoStandard,
    /// time between power up and the first transaction, in ms
    pub power_up_delay_ms: u16,
    /// time to wait after a software reset, in ms. 10ms is typical.
    pub reset_delay_ms: u16,
    /// white level written to all 16 row brightness registers
    pub white_level: WhiteLevel,
    /// black level written to all 16 row brightness registers
    pub black_level: BlackLevel,
    /// OSD insertion mux switching time
    pub switching_time: SwitchingTime,
    /// OSD rise and fall time
    pub rise_fall_time: RiseFallTime,
    /// blinking time base
    pub blink_time: BlinkTime,
    /// blinking duty cycle
    pub blink_duty_cycle: BlinkDutyCycle,
    /// time between two reads of a register while polling, in µs
    pub poll_interval_us: u16,
    /// maximum time for a character memory write to finish, in ms. 12ms is typical.
    pub character_memory_timeout_ms: u16,
    /// maximum time for a display memory clear to finish, in ms. 20µs is typical.
    pub clear_timeout_ms: u16,
    /// some chip revisions drop automatic black level control when the OSD is switched off,
    /// set this to write OSDBL[4] = 0 again on every enable
    pub reassert_auto_black_level: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            video_standard: VideoStandard::Pal,
            power_up_delay_ms: 100,
            reset_delay_ms: 100,
            white_level: WhiteLevel::Percent90,
            black_level: BlackLevel::Percent0,
            switching_time: SwitchingTime::Ns75,
            rise_fall_time: RiseFallTime::Ns60,
            blink_time: BlinkTime::Fields4,
            blink_duty_cycle: BlinkDutyCycle::ThreeBtBt,
            poll_interval_us: 100,
            character_memory_timeout_ms: 100,
            clear_timeout_ms: 6,
            reassert_auto_black_level: false,
        }
    }
}

impl Config {
    /// number of register reads that fit into `timeout_ms`, at least one
    pub fn poll_attempts(&self, timeout_ms: u16) -> u32 {
        let interval = u32::from(self.poll_interval_us.max(1));
        (u32::from(timeout_ms) * 1000 / interval).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn poll_attempts() {
        let config = Config::default();
        assert_eq!(config.poll_attempts(100), 1000);
        assert_eq!(config.poll_attempts(0), 1);

        let config = Config {
            poll_interval_us: 0,
            ..Config::default()
        };
        assert_eq!(config.poll_attempts(2), 2000);
    }
}
