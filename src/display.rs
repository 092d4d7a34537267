//! # Main driver for the MAX7456
//!
//! This contains the state keeping of the chip (the shadow registers) and the raw bus
//! transactions. Rendering text lives in the `textmode` module and the character memory in the
//! `charmem` module, both as extension traits on the `MAX7456` struct.
//!
//! Every transaction is an address byte followed by a data byte, with chip select pulled low
//! before the address and released after the data. Operations that touch many bytes (text,
//! glyphs) repeat this bracket for every address/data pair instead of holding chip select low
//! for the whole burst.
//!
//! Typically you want to look into the following functions:
//!  - MAX7456::new() to create a new driver instance, this also resets the chip
//!  - MAX7456::set_osd_enabled() to show or hide the overlay
//!  - MAX7456::set_external_video() to overlay the camera picture or generate a gray one
//!  - MAX7456::clear_screen() to erase all text
use hal::blocking::delay::{DelayMs, DelayUs};
use hal::blocking::spi::{Transfer, Write as SpiWrite};
use hal::digital::v2::OutputPin;

use crate::{config::Config, error::OsdError, logging, registers::*};

#[derive(Debug)]
/// main struct for state keeping of the MAX7456 driver, and as a spine to hold all the traits
pub struct MAX7456<SPI, CS, DELAY> {
    spi: SPI,
    cs: CS,
    delay: DELAY,
    config: Config,
    registers: ShadowRegisters,
    /// column of the text cursor used by `core::fmt::Write`, 0..30
    pub(crate) text_col: u8,
    /// row of the text cursor used by `core::fmt::Write`
    pub(crate) text_row: u8,
}

impl<SPI, CS, DELAY, SpiErr, PinErr> MAX7456<SPI, CS, DELAY>
where
    SPI: Transfer<u8, Error = SpiErr> + SpiWrite<u8, Error = SpiErr>,
    CS: OutputPin<Error = PinErr>,
    DELAY: DelayMs<u16> + DelayUs<u16>,
{
    /// Create a new instance of the MAX7456 driver and initialize the chip
    ///
    /// Arguments:
    ///
    /// - spi: SPI bus in mode 0, implementing Transfer<u8> and Write<u8>
    /// - cs: Chip Select, a GPIO OutputPin connected to ~CS of the chip
    /// - delay: used for the power up and reset delays and while polling the chip
    /// - config: what to write to the chip during init()
    pub fn new(
        spi: SPI,
        cs: CS,
        delay: DELAY,
        config: Config,
    ) -> Result<MAX7456<SPI, CS, DELAY>, OsdError<SpiErr, PinErr>> {
        let mut osd = MAX7456 {
            spi,
            cs,
            delay,
            config,
            registers: ShadowRegisters::default(),
            text_col: 0,
            text_row: 0,
        };

        osd.init()?;

        Ok(osd)
    }

    /// Reset and configure the chip.
    ///
    /// Waits for the chip to power up, does a software reset, and writes the row brightness,
    /// insertion timing, blink parameters and video standard from the `Config`. The OSD is
    /// left disabled. Can be called again at any time to start from scratch.
    pub fn init(&mut self) -> Result<(), OsdError<SpiErr, PinErr>> {
        logging::debug!("max7456: init");

        OsdError::pin(self.cs.set_high())?;
        self.delay.delay_ms(self.config.power_up_delay_ms);

        // the reset also clears the display memory, the chip drops the reset bit when done
        let mut vm0 = Vm0::default();
        vm0.set_field(Vm0::VIDEO_STANDARD, self.config.video_standard as u8);
        vm0.set_flag(Vm0::SOFTWARE_RESET, true);
        self.write_register(vm0)?;
        self.delay.delay_ms(self.config.reset_delay_ms);

        self.registers = ShadowRegisters::default();
        self.text_col = 0;
        self.text_row = 0;

        let (white, black) = (self.config.white_level, self.config.black_level);
        for row in 0..Rb::COUNT as u8 {
            self.set_row_brightness(row, white, black)?;
        }

        let (switching, rise_fall) = (self.config.switching_time, self.config.rise_fall_time);
        self.set_insertion_timing(switching, rise_fall)?;

        let (time, duty_cycle) = (self.config.blink_time, self.config.blink_duty_cycle);
        self.set_blink_params(time, duty_cycle)?;

        // updates of the screen are synchronized with VSYNC to avoid flicker
        self.registers
            .vm0
            .set_field(Vm0::VIDEO_STANDARD, self.config.video_standard as u8);
        self.registers.vm0.set_flag(Vm0::VSYNC_ENABLE, true);
        self.write_vm0()
    }

    /// Give back the bus, the chip select pin and the delay
    pub fn release(self) -> (SPI, CS, DELAY) {
        (self.spi, self.cs, self.delay)
    }

    /// The configuration used by init()
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The shadow copies of the registers, as last written (or read) by the driver
    pub fn registers(&self) -> &ShadowRegisters {
        &self.registers
    }

    pub(crate) fn registers_mut(&mut self) -> &mut ShadowRegisters {
        &mut self.registers
    }

    /// Whether the OSD is switched on
    pub fn is_osd_enabled(&self) -> bool {
        self.registers.vm0.flag(Vm0::OSD_ENABLE)
    }

    /// Video standard generated by the chip, according to the shadow register
    pub fn video_standard(&self) -> VideoStandard {
        VideoStandard::from_bit(self.registers.vm0.field(Vm0::VIDEO_STANDARD))
    }

    /// Set the blink time base and duty cycle (VM1) used by blinking characters
    pub fn set_blink_params(
        &mut self,
        time: BlinkTime,
        duty_cycle: BlinkDutyCycle,
    ) -> Result<(), OsdError<SpiErr, PinErr>> {
        self.registers.vm1.set_field(Vm1::BLINK_TIME, time as u8);
        self.registers
            .vm1
            .set_field(Vm1::BLINK_DUTY_CYCLE, duty_cycle as u8);
        let vm1 = self.registers.vm1;
        self.write_register(vm1)
    }

    /// Set the background of the whole screen (VM1).
    ///
    /// With `gray` set, all background pixels are gray with the given brightness. Otherwise
    /// the local background bit of each character decides.
    pub fn set_background(
        &mut self,
        gray: bool,
        brightness: BackgroundBrightness,
    ) -> Result<(), OsdError<SpiErr, PinErr>> {
        self.registers.vm1.set_flag(Vm1::BACKGROUND_MODE, gray);
        self.registers
            .vm1
            .set_field(Vm1::BACKGROUND_BRIGHTNESS, brightness as u8);
        let vm1 = self.registers.vm1;
        self.write_register(vm1)
    }

    /// Move the whole OSD image.
    ///
    /// horizontal is in 0..64 with 32 being the center, vertical in 0..32 with 16 being the
    /// center. Larger values are cut to the width of the register fields.
    pub fn set_display_offsets(
        &mut self,
        horizontal: u8,
        vertical: u8,
    ) -> Result<(), OsdError<SpiErr, PinErr>> {
        self.registers.hos.set_field(Hos::OFFSET, horizontal);
        self.registers.vos.set_field(Vos::OFFSET, vertical);
        let (hos, vos) = (self.registers.hos, self.registers.vos);
        self.write_register(hos)?;
        self.write_register(vos)
    }

    /// Set the white and black level of the characters in one display row (RBn)
    pub fn set_row_brightness(
        &mut self,
        row: u8,
        white: WhiteLevel,
        black: BlackLevel,
    ) -> Result<(), OsdError<SpiErr, PinErr>> {
        let rb = &mut self.registers.rb[usize::from(row) % Rb::COUNT];
        rb.set_field(Rb::WHITE_LEVEL, white as u8);
        rb.set_field(Rb::BLACK_LEVEL, black as u8);
        let bits = rb.bits();
        self.write_byte(Rb::write_address(row), bits)
    }

    /// Set the switching and rise/fall time of the OSD insertion mux (OSDM)
    pub fn set_insertion_timing(
        &mut self,
        switching: SwitchingTime,
        rise_fall: RiseFallTime,
    ) -> Result<(), OsdError<SpiErr, PinErr>> {
        self.registers
            .osdm
            .set_field(Osdm::MUX_SWITCHING_TIME, switching as u8);
        self.registers
            .osdm
            .set_field(Osdm::RISE_FALL_TIME, rise_fall as u8);
        let osdm = self.registers.osdm;
        self.write_register(osdm)
    }

    /// Erase the display memory.
    ///
    /// The chip clears DMM[2] by itself when it's done. This polls DMM until that happened
    /// and gives up with `ClearTimeout` after `Config::clear_timeout_ms`.
    pub fn clear_screen(&mut self) -> Result<(), OsdError<SpiErr, PinErr>> {
        self.registers
            .dmm
            .set_flag(Dmm::CLEAR_DISPLAY_MEMORY, true);
        let dmm = self.registers.dmm;
        self.write_register(dmm)?;

        let timeout = self.config.clear_timeout_ms;
        match self.poll_until_clear::<Dmm>(Dmm::CLEAR_DISPLAY_MEMORY, timeout)? {
            Some(dmm) => {
                self.registers.dmm = dmm;
                Ok(())
            }
            None => {
                logging::warning!("max7456: display memory clear timed out");
                Err(OsdError::ClearTimeout)
            }
        }
    }

    /// Show or hide the OSD image.
    ///
    /// Nothing is sent if the OSD already is in the requested state. With
    /// `Config::reassert_auto_black_level` set, enabling also switches OSDBL back to
    /// automatic black level control.
    pub fn set_osd_enabled(&mut self, enabled: bool) -> Result<(), OsdError<SpiErr, PinErr>> {
        if self.is_osd_enabled() == enabled {
            return Ok(());
        }

        self.registers.vm0.set_flag(Vm0::OSD_ENABLE, enabled);
        self.write_vm0()?;

        if enabled && self.config.reassert_auto_black_level {
            // the lower bits are a factory preset, so they are taken from the chip
            let mut osdbl = self.read_register::<Osdbl>()?;
            osdbl.set_flag(Osdbl::MANUAL_BLACK_LEVEL, false);
            self.registers.osdbl = osdbl;
            self.write_register(osdbl)?;
        }
        Ok(())
    }

    /// Overlay the input video (`true`) or show the OSD on an internally generated picture.
    ///
    /// `true` selects `SyncMode::Auto` (0b00): the chip locks onto the input video and falls
    /// back to internal sync when the input is lost. `false` selects `SyncMode::Internal` (0b11).
    pub fn set_external_video(&mut self, enabled: bool) -> Result<(), OsdError<SpiErr, PinErr>> {
        let mode = if enabled {
            SyncMode::Auto
        } else {
            SyncMode::Internal
        };
        self.set_sync_mode(mode)
    }

    /// Select the sync source (VM0[5:4])
    pub fn set_sync_mode(&mut self, mode: SyncMode) -> Result<(), OsdError<SpiErr, PinErr>> {
        self.registers.vm0.set_field(Vm0::SYNC_SELECT, mode as u8);
        self.write_vm0()
    }

    /// Read the status register (STAT)
    pub fn status(&mut self) -> Result<Stat, OsdError<SpiErr, PinErr>> {
        let stat = self.read_register::<Stat>()?;
        self.registers.stat = stat;
        Ok(stat)
    }

    /// The video standard detected at the video input, `None` if nothing is detected
    pub fn input_video_standard(
        &mut self,
    ) -> Result<Option<VideoStandard>, OsdError<SpiErr, PinErr>> {
        let stat = self.status()?;
        if stat.flag(Stat::PAL_DETECTED) {
            Ok(Some(VideoStandard::Pal))
        } else if stat.flag(Stat::NTSC_DETECTED) {
            Ok(Some(VideoStandard::Ntsc))
        } else {
            Ok(None)
        }
    }

    /// Change the generated video standard.
    ///
    /// VM0 is read from the chip first and only written if the standard differs.
    pub fn set_output_video_standard(
        &mut self,
        standard: VideoStandard,
    ) -> Result<(), OsdError<SpiErr, PinErr>> {
        let current = self.read_register::<Vm0>()?;
        self.registers
            .vm0
            .set_field(Vm0::VIDEO_STANDARD, standard as u8);

        if VideoStandard::from_bit(current.field(Vm0::VIDEO_STANDARD)) == standard {
            return Ok(());
        }
        logging::debug!("max7456: switching video standard");
        self.write_vm0()
    }

    fn write_vm0(&mut self) -> Result<(), OsdError<SpiErr, PinErr>> {
        let vm0 = self.registers.vm0;
        self.write_register(vm0)
    }

    /// Read `R` until `field` is zero.
    ///
    /// Returns the last value read, or `None` if the field is still set after `timeout_ms`.
    pub(crate) fn poll_until_clear<R: Register>(
        &mut self,
        field: Field,
        timeout_ms: u16,
    ) -> Result<Option<R>, OsdError<SpiErr, PinErr>> {
        let attempts = self.config.poll_attempts(timeout_ms);
        let interval = self.config.poll_interval_us;

        for _ in 0..attempts {
            let register = self.read_register::<R>()?;
            if !register.flag(field) {
                return Ok(Some(register));
            }
            self.delay.delay_us(interval);
        }
        Ok(None)
    }

    /// Write a register to its write address. Read only registers are ignored.
    pub fn write_register<R: Register>(
        &mut self,
        register: R,
    ) -> Result<(), OsdError<SpiErr, PinErr>> {
        match R::WRITE_ADDRESS {
            Some(address) => self.write_byte(address, register.bits()),
            None => Ok(()),
        }
    }

    /// Read a register from the chip. The shadow copy is not touched.
    pub fn read_register<R: Register>(&mut self) -> Result<R, OsdError<SpiErr, PinErr>> {
        let bits = self.read_byte(R::READ_ADDRESS)?;
        Ok(R::from_bits(bits))
    }

    /// Send one address/data pair to the chip.
    // Chip Select "activates" the MAX7456 to listen to SPI if pin is low. It is released even
    // if the SPI write fails, so the next transaction starts clean.
    pub fn write_byte(&mut self, address: u8, value: u8) -> Result<(), OsdError<SpiErr, PinErr>> {
        OsdError::pin(self.cs.set_low())?;
        let result = self.spi.write(&[address & !READ_FLAG, value]);
        OsdError::pin(self.cs.set_high())?;
        OsdError::spi(result)
    }

    /// Read one byte from `address`. Bit 7 (read) is set automatically.
    // The chip shifts the data out while the second byte is clocked in.
    pub fn read_byte(&mut self, address: u8) -> Result<u8, OsdError<SpiErr, PinErr>> {
        let mut frame = [address | READ_FLAG, 0x00];
        OsdError::pin(self.cs.set_low())?;
        let result = self
            .spi
            .transfer(&mut frame)
            .map(|words| words.get(1).copied().unwrap_or_default());
        OsdError::pin(self.cs.set_high())?;
        OsdError::spi(result)
    }
}
