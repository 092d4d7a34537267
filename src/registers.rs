//! # Register map of the MAX7456
//!
//! Every register of the chip is an 8 bit value. Most of them are split up into named bit
//! fields, which are described here with a `Field` (shift and width) instead of overlapping
//! the byte with a struct of bitfields. Changing a field only touches the bits of that field,
//! all other bits of the byte are kept as they are.
//!
//! The source code follows the register tables of the data sheet:
//! <https://datasheets.maximintegrated.com/en/ds/MAX7456.pdf>
//!
//! Write addresses are 0x00..0x7F. Reading a register uses the same address with bit 7 set,
//! except for the status and data-out registers which only have a read address.

/// Bit 7 of an address byte selects a read transaction.
pub const READ_FLAG: u8 = 0x80;

/// A bit range inside an 8 bit register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Field {
    /// position of the lowest bit of the field
    pub shift: u8,
    /// number of bits, 1..=8
    pub width: u8,
}

impl Field {
    /// Describes the bits `shift..shift + width`
    pub const fn new(shift: u8, width: u8) -> Field {
        Field { shift, width }
    }

    /// The field bits, not shifted
    pub const fn value_mask(self) -> u8 {
        (0xFF_u16 >> (8 - self.width)) as u8
    }

    /// The field bits at their position in the register
    pub const fn mask(self) -> u8 {
        self.value_mask() << self.shift
    }

    /// Read the field out of a register byte
    pub const fn extract(self, byte: u8) -> u8 {
        (byte >> self.shift) & self.value_mask()
    }

    /// Replace the field in `byte` with `value`. Bits of `value` above the field width are
    /// dropped, just like the chip itself does not range check anything.
    pub const fn insert(self, byte: u8, value: u8) -> u8 {
        (byte & !self.mask()) | ((value & self.value_mask()) << self.shift)
    }
}

/// Common behaviour of all register types.
pub trait Register: Copy {
    /// Address used to write the register, `None` for read-only registers
    const WRITE_ADDRESS: Option<u8>;

    /// Address used to read the register
    const READ_ADDRESS: u8;

    /// Value of the register after power up or a software reset
    const RESET: u8;

    /// All named fields of this register
    const FIELDS: &'static [Field];

    /// The whole register as byte
    fn bits(&self) -> u8;

    /// Create the register from a whole byte, e.g. a value read from the chip
    fn from_bits(bits: u8) -> Self;

    /// Value of a single field
    fn field(&self, field: Field) -> u8 {
        field.extract(self.bits())
    }

    /// Change a single field in place, leaving all other bits untouched
    fn set_field(&mut self, field: Field, value: u8) {
        *self = Self::from_bits(field.insert(self.bits(), value));
    }

    /// Convenience for single bit fields
    fn flag(&self, field: Field) -> bool {
        self.field(field) != 0
    }

    /// Convenience for single bit fields
    fn set_flag(&mut self, field: Field, set: bool) {
        self.set_field(field, set as u8);
    }
}

macro_rules! register {
    (
        $(#[$meta:meta])*
        $name:ident {
            write: $write:expr,
            read: $read:expr,
            reset: $reset:expr,
            fields: {
                $( $(#[$fmeta:meta])* $field:ident = ($shift:expr, $width:expr), )*
            }
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        #[cfg_attr(feature = "defmt", derive(defmt::Format))]
        pub struct $name(pub u8);

        #[allow(missing_docs)]
        impl $name {
            $( $(#[$fmeta])* pub const $field: Field = Field::new($shift, $width); )*
        }

        impl Register for $name {
            const WRITE_ADDRESS: Option<u8> = $write;
            const READ_ADDRESS: u8 = $read;
            const RESET: u8 = $reset;
            const FIELDS: &'static [Field] = &[ $( $name::$field, )* ];

            fn bits(&self) -> u8 {
                self.0
            }

            fn from_bits(bits: u8) -> Self {
                $name(bits)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                $name(<$name as Register>::RESET)
            }
        }
    };
}

register! {
    /// Video Mode 0
    Vm0 {
        write: Some(0x00),
        read: 0x80,
        reset: 0x00,
        fields: {
            /// 1 = VOUT is high impedance
            VIDEO_BUFFER_DISABLE = (0, 1),
            /// all registers go to their defaults, cleared by the chip
            SOFTWARE_RESET = (1, 1),
            /// 1 = enable the OSD at the next ~VSYNC instead of immediately
            VSYNC_ENABLE = (2, 1),
            /// display the OSD image
            OSD_ENABLE = (3, 1),
            /// see `SyncMode`
            SYNC_SELECT = (4, 2),
            /// see `VideoStandard`
            VIDEO_STANDARD = (6, 1),
        }
    }
}

register! {
    /// Video Mode 1
    Vm1 {
        write: Some(0x01),
        read: 0x81,
        reset: 0x47,
        fields: {
            /// see `BlinkDutyCycle`
            BLINK_DUTY_CYCLE = (0, 2),
            /// see `BlinkTime`
            BLINK_TIME = (2, 2),
            /// see `BackgroundBrightness`
            BACKGROUND_BRIGHTNESS = (4, 3),
            /// 1 = all background pixels are gray
            BACKGROUND_MODE = (7, 1),
        }
    }
}

register! {
    /// Horizontal Offset. 32 is no offset, 0 is -32 pixels and 63 is +31 pixels.
    Hos {
        write: Some(0x02),
        read: 0x82,
        reset: 0x20,
        fields: {
            OFFSET = (0, 6),
        }
    }
}

register! {
    /// Vertical Offset. 16 is no offset, 0 is +16 pixels (up) and 31 is -15 pixels (down).
    Vos {
        write: Some(0x03),
        read: 0x83,
        reset: 0x10,
        fields: {
            OFFSET = (0, 5),
        }
    }
}

register! {
    /// Display Memory Mode
    Dmm {
        write: Some(0x04),
        read: 0x84,
        reset: 0x00,
        fields: {
            /// writes to DMDI increment the display memory address, ended by writing 0xFF
            AUTO_INCREMENT = (0, 1),
            /// apply `CLEAR_DISPLAY_MEMORY` at the next VSYNC
            VSYNC_CLEAR = (1, 1),
            /// fill the display memory with zeroes, cleared by the chip when done
            CLEAR_DISPLAY_MEMORY = (2, 1),
            /// attribute for characters written in 16 bit mode
            INVERT = (3, 1),
            /// attribute for characters written in 16 bit mode
            BLINK = (4, 1),
            /// local background control
            LOCAL_BACKGROUND = (5, 1),
            /// 1 = 8 bit operation mode
            OPERATION_MODE_8BIT = (6, 1),
        }
    }
}

register! {
    /// Display Memory Address High
    Dmah {
        write: Some(0x05),
        read: 0x85,
        reset: 0x00,
        fields: {
            /// bit 8 of the display memory address
            ADDRESS_BIT8 = (0, 1),
            /// 0 = character address byte, 1 = character attribute byte
            ATTRIBUTE_SELECT = (1, 1),
        }
    }
}

register! {
    /// Display Memory Address Low
    Dmal {
        write: Some(0x06),
        read: 0x86,
        reset: 0x00,
        fields: {}
    }
}

register! {
    /// Display Memory Data In
    Dmdi {
        write: Some(0x07),
        read: 0x87,
        reset: 0x00,
        fields: {}
    }
}

register! {
    /// Character Memory Mode, only whole byte commands
    Cmm {
        write: Some(0x08),
        read: 0x88,
        reset: 0x00,
        fields: {}
    }
}

impl Cmm {
    /// copy the character memory shadow RAM into the NVM slot in CMAH
    pub const WRITE_NVM: Cmm = Cmm(0b1010_0000);
    /// copy the NVM slot in CMAH into the character memory shadow RAM
    pub const READ_NVM: Cmm = Cmm(0b0101_0000);
}

register! {
    /// Character Memory Address High, the glyph slot
    Cmah {
        write: Some(0x09),
        read: 0x89,
        reset: 0x00,
        fields: {}
    }
}

register! {
    /// Character Memory Address Low, the byte inside the glyph (0..54)
    Cmal {
        write: Some(0x0A),
        read: 0x8A,
        reset: 0x00,
        fields: {}
    }
}

register! {
    /// Character Memory Data In, four pixels of a glyph row
    Cmdi {
        write: Some(0x0B),
        read: 0x8B,
        reset: 0x00,
        fields: {
            RIGHT_MOST = (0, 2),
            RIGHT_CENTER = (2, 2),
            LEFT_CENTER = (4, 2),
            LEFT_MOST = (6, 2),
        }
    }
}

register! {
    /// OSD Insertion Mux
    Osdm {
        write: Some(0x0C),
        read: 0x8C,
        reset: 0x1B,
        fields: {
            /// see `SwitchingTime`
            MUX_SWITCHING_TIME = (0, 3),
            /// see `RiseFallTime`
            RISE_FALL_TIME = (3, 3),
        }
    }
}

register! {
    /// Row Brightness, one register per display row 0..16.
    ///
    /// The addresses of the `Register` impl are those of row 0, see `Rb::write_address`.
    Rb {
        write: Some(0x10),
        read: 0x90,
        reset: 0x01,
        fields: {
            /// see `WhiteLevel`
            WHITE_LEVEL = (0, 2),
            /// see `BlackLevel`
            BLACK_LEVEL = (2, 2),
        }
    }
}

impl Rb {
    /// number of row brightness registers
    pub const COUNT: usize = 16;

    /// write address of the register for `row`, rows above 15 wrap
    pub fn write_address(row: u8) -> u8 {
        0x10 | (row & 0x0F)
    }

    /// read address of the register for `row`, rows above 15 wrap
    pub fn read_address(row: u8) -> u8 {
        Rb::write_address(row) | READ_FLAG
    }
}

register! {
    /// OSD Black Level
    Osdbl {
        write: Some(0x6C),
        read: 0xEC,
        reset: 0x00,
        fields: {
            /// factory preset, never change
            FACTORY = (0, 4),
            /// 0 = automatic black level control, 1 = manual
            MANUAL_BLACK_LEVEL = (4, 1),
        }
    }
}

register! {
    /// Status, read only
    Stat {
        write: None,
        read: 0xA0,
        reset: 0x00,
        fields: {
            PAL_DETECTED = (0, 1),
            NTSC_DETECTED = (1, 1),
            LOSS_OF_SYNC = (2, 1),
            /// 0 while in horizontal sync
            NOT_HSYNC = (3, 1),
            /// 0 while in vertical sync
            NOT_VSYNC = (4, 1),
            /// 1 while the character memory can't be accessed
            CHARACTER_MEMORY_BUSY = (5, 1),
            /// 1 while the power up reset is running
            RESET_MODE = (6, 1),
        }
    }
}

register! {
    /// Display Memory Data Out, read only
    Dmdo {
        write: None,
        read: 0xB0,
        reset: 0x00,
        fields: {}
    }
}

register! {
    /// Character Memory Data Out, read only. Same pixel layout as `Cmdi`.
    Cmdo {
        write: None,
        read: 0xC0,
        reset: 0x00,
        fields: {
            RIGHT_MOST = (0, 2),
            RIGHT_CENTER = (2, 2),
            LEFT_CENTER = (4, 2),
            LEFT_MOST = (6, 2),
        }
    }
}

/// Video standard of the generated or detected signal (VM0[6], STAT[1:0])
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum VideoStandard {
    /// 525 lines, 13 text rows
    Ntsc = 0,
    /// 625 lines, 16 text rows
    Pal = 1,
}

impl VideoStandard {
    /// number of visible text rows in this standard
    pub fn rows(self) -> u8 {
        match self {
            VideoStandard::Ntsc => crate::ROWS_NTSC,
            VideoStandard::Pal => crate::ROWS_PAL,
        }
    }

    pub(crate) fn from_bit(bit: u8) -> VideoStandard {
        if bit == 0 {
            VideoStandard::Ntsc
        } else {
            VideoStandard::Pal
        }
    }
}

/// Sync select mode (VM0[5:4])
///
/// `Auto` is the pass-through mode: the chip locks onto the input video and overlays it,
/// falling back to internal sync on loss of sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum SyncMode {
    /// external sync when input video is present, internal otherwise (0b00, 0b01 behaves
    /// the same)
    Auto = 0b00,
    /// always external
    External = 0b10,
    /// always internal, input video is not shown
    Internal = 0b11,
}

/// Blinking time base BT (VM1[3:2]), in video fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum BlinkTime {
    /// NTSC 33ms, PAL 40ms
    Fields2 = 0b00,
    /// NTSC 67ms, PAL 80ms
    Fields4 = 0b01,
    /// NTSC 100ms, PAL 120ms
    Fields6 = 0b10,
    /// NTSC 133ms, PAL 160ms
    Fields8 = 0b11,
}

/// Blinking duty cycle on:off (VM1[1:0])
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum BlinkDutyCycle {
    /// BT:BT
    BtBt = 0b00,
    /// BT:2BT
    Bt2Bt = 0b01,
    /// BT:3BT
    Bt3Bt = 0b10,
    /// 3BT:BT
    ThreeBtBt = 0b11,
}

/// Gray level of background pixels (VM1[6:4]), in percent of OSD white
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum BackgroundBrightness {
    Percent0 = 0,
    Percent7 = 1,
    Percent14 = 2,
    Percent21 = 3,
    Percent28 = 4,
    Percent35 = 5,
    Percent43 = 6,
    Percent49 = 7,
}

/// Character white level of a row (RBn[1:0])
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum WhiteLevel {
    Percent120 = 0b00,
    Percent100 = 0b01,
    Percent90 = 0b10,
    Percent80 = 0b11,
}

/// Character black level of a row (RBn[3:2])
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum BlackLevel {
    Percent0 = 0b00,
    Percent10 = 0b01,
    Percent20 = 0b10,
    Percent30 = 0b11,
}

/// OSD insertion mux switching time (OSDM[2:0]). Faster is sharper but gives more
/// cross-color artifacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum SwitchingTime {
    Ns30 = 0,
    Ns35 = 1,
    Ns50 = 2,
    Ns75 = 3,
    Ns100 = 4,
    Ns120 = 5,
}

/// OSD rise and fall time (OSDM[5:3])
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum RiseFallTime {
    Ns20 = 0,
    Ns30 = 1,
    Ns35 = 2,
    Ns60 = 3,
    Ns80 = 4,
    Ns110 = 5,
}

/// Shadow copies of all writable registers, plus the last status read.
///
/// The shadows are the source of truth for everything the driver controls. They are *not*
/// updated when the chip clears a bit on its own (software reset, clear display memory),
/// only when the driver reads such a register back.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ShadowRegisters {
    pub vm0: Vm0,
    pub vm1: Vm1,
    pub hos: Hos,
    pub vos: Vos,
    pub dmm: Dmm,
    pub dmah: Dmah,
    pub dmal: Dmal,
    pub dmdi: Dmdi,
    pub cmm: Cmm,
    pub cmah: Cmah,
    pub cmal: Cmal,
    pub cmdi: Cmdi,
    pub osdm: Osdm,
    pub rb: [Rb; Rb::COUNT],
    pub osdbl: Osdbl,
    pub stat: Stat,
}

impl Default for ShadowRegisters {
    // post reset values of the data sheet
    fn default() -> Self {
        ShadowRegisters {
            vm0: Vm0::default(),
            vm1: Vm1::default(),
            hos: Hos::default(),
            vos: Vos::default(),
            dmm: Dmm::default(),
            dmah: Dmah::default(),
            dmal: Dmal::default(),
            dmdi: Dmdi::default(),
            cmm: Cmm::default(),
            cmah: Cmah::default(),
            cmal: Cmal::default(),
            cmdi: Cmdi::default(),
            osdm: Osdm::default(),
            rb: [Rb::default(); Rb::COUNT],
            osdbl: Osdbl::default(),
            stat: Stat::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_masks() {
        assert_eq!(Vm0::SYNC_SELECT.mask(), 0b0011_0000);
        assert_eq!(Vm1::BACKGROUND_BRIGHTNESS.mask(), 0b0111_0000);
        assert_eq!(Hos::OFFSET.mask(), 0b0011_1111);
        assert_eq!(Vos::OFFSET.mask(), 0b0001_1111);
        assert_eq!(Field::new(0, 8).mask(), 0xFF);
    }

    #[test]
    fn set_field_keeps_siblings() {
        let mut vm1 = Vm1::default();
        vm1.set_field(Vm1::BLINK_TIME, BlinkTime::Fields8 as u8);
        assert_eq!(vm1.field(Vm1::BLINK_DUTY_CYCLE), 0b11);
        assert_eq!(vm1.field(Vm1::BACKGROUND_BRIGHTNESS), 0b100);
        assert_eq!(vm1.bits(), 0x4F);
    }

    #[test]
    fn oversized_values_are_truncated() {
        let mut hos = Hos(0b1100_0000);
        hos.set_field(Hos::OFFSET, 0xFF);
        assert_eq!(hos.bits(), 0xFF);
        hos.set_field(Hos::OFFSET, 64);
        assert_eq!(hos.bits(), 0b1100_0000);
    }

    #[test]
    fn addresses() {
        assert_eq!(Some(Vm0::READ_ADDRESS), Vm0::WRITE_ADDRESS.map(|a| a | READ_FLAG));
        assert_eq!(Osdbl::READ_ADDRESS, 0xEC);
        assert_eq!(Stat::WRITE_ADDRESS, None);
        assert_eq!(Rb::write_address(15), 0x1F);
        assert_eq!(Rb::read_address(3), 0x93);
    }

    #[test]
    fn reset_defaults() {
        let shadow = ShadowRegisters::default();
        assert_eq!(shadow.hos.field(Hos::OFFSET), 32);
        assert_eq!(shadow.vos.field(Vos::OFFSET), 16);
        assert_eq!(shadow.rb[7].field(Rb::WHITE_LEVEL), WhiteLevel::Percent100 as u8);
        assert_eq!(shadow.osdm.field(Osdm::RISE_FALL_TIME), RiseFallTime::Ns60 as u8);
    }
}
