//! Shows a small telemetry overlay on a video signal with a MAX7456 (MinimOSD and friends)
//! This example is for the Raspberry Pico with the rp2040 chip
//!
//! Pin layout and connection for this example
//!
//! MAX7456 | Pico pin |  Pico function       | purpose
//!  SCLK      pin 4      GP2 (gpio2)           Serial clock, up to 10 Mbit/s
//!  SDIN      pin 5      GP3 (gpio3)           Serial data into the chip
//!  SDOUT     pin 6      GP4 (gpio4)           Serial data out of the chip
//!  ~CS       pin 7      GP5 (gpio5)           Chip select: active low
//!  DVDD      pin 36     3V3(OUT)              The chip itself wants 5V, check your board!
//!  GND       pin 38     GND
//!
//! Camera into VIN, goggles or monitor on VOUT. Without a camera the chip generates a gray
//! picture of its own.

#![deny(unsafe_code)]
#![deny(warnings)]
#![no_std]
#![no_main]

// Imports

use panic_halt as _;                        // well. halt on panic..
use defmt_rtt as _;                         // defmt logging over RTT
use cortex_m_rt::entry;                     // the macro for our startup function
use embedded_hal::digital::v2::OutputPin;   // GPIO output pin trait
use embedded_time::rate::*;                 // Embed the `Hz` function/trait
use core::fmt::Write;                       // for writeln!() macro
use rp_pico as bsp;                         // Provide an alias for our BSP so we can switch targets quickly.
use bsp::hal::{
    prelude::*,                             // pull in any important traits
    pac,                                    // Peripheral Access Crate; low-level registers
    sio::Sio,                               // the SIO manages al the pins and their modes
    watchdog::Watchdog,                     // we need to regularly call the watchdog or it shuts down our Pico
};

use embedded_graphics::{
    prelude::*,
    pixelcolor::Gray2,
    primitives::{Circle, PrimitiveStyle},
};

// Even for examples it's necessary to import the library
extern crate max7456;
use max7456::{CharacterMemory, Config, Glyph, TextMode, MAX7456};

// a free slot at the end of the usual fonts
const DOT_SLOT: u8 = 0xF0;

#[entry]
fn main() -> ! {

 // --------------------------------------------------------------------------
 //  First part is "boilerplate" setup stuff for Raspberry Pico
 // --------------------------------------------------------------------------

    // basic Raspberry Pico boiler plate setup stuff
    let mut pac = pac::Peripherals::take().unwrap();   // grab singleton objects
    let core = pac::CorePeripherals::take().unwrap();
    let mut watchdog = Watchdog::new(pac.WATCHDOG);    // set up watchdog timer

    let clocks = bsp::hal::clocks::init_clocks_and_plls(   // configure clocks
        bsp::XOSC_CRYSTAL_FREQ,                            // default is 125mHz system clock
        pac.XOSC,
        pac.CLOCKS,
        pac.PLL_SYS,
        pac.PLL_USB,
        &mut pac.RESETS,
        &mut watchdog,
    )
    .ok()
    .unwrap();

    let sio = Sio::new(pac.SIO);       // the single-cycle I/O block (SIO) controls our GPIO pins
    let pins = bsp::Pins::new(         // first set up the pins to their default state
        pac.IO_BANK0,
        pac.PADS_BANK0,
        sio.gpio_bank0,
        &mut pac.RESETS,
    );

    // The spi driver picks up this pins automatically if they are in the correct mode
    let _spi_sclk = pins.gpio2.into_mode::<bsp::hal::gpio::FunctionSpi>();
    let _spi_mosi = pins.gpio3.into_mode::<bsp::hal::gpio::FunctionSpi>();
    let _spi_miso = pins.gpio4.into_mode::<bsp::hal::gpio::FunctionSpi>();
    let spi = bsp::hal::Spi::<_, _, 8>::new(pac.SPI0);

    // Exchange the uninitialised SPI driver for an initialised one
    // needs to be MODE_0
    let osd_spi = spi.init(
        &mut pac.RESETS,
        clocks.peripheral_clock.freq(),
        8_000_000u32.Hz(),
        &embedded_hal::spi::MODE_0,
    );

    let osd_cs = pins.gpio5.into_push_pull_output();

    // set led pin to output
    let mut pico_led = pins.led.into_push_pull_output();

    // the driver uses the delay for the reset and while waiting for the chip
    let delay = cortex_m::delay::Delay::new(core.SYST, clocks.system_clock.freq().integer());

 // --------------------------------------------------------------------------
 //  End Boilerplate and Setup, let's initialize the OSD
 // --------------------------------------------------------------------------

    let mut osd = MAX7456::new(osd_spi, osd_cs, delay, Config::default()).unwrap();

    // follow the camera, if there is one
    if let Some(standard) = osd.input_video_standard().unwrap() {
        osd.set_output_video_standard(standard).unwrap();
    }

    // draw a filled dot into a glyph and keep it in the character memory.
    // Only write it if it isn't there yet, the NVM doesn't like too many writes.
    let mut dot = Glyph::transparent();
    Circle::new(Point::new(1, 4), 10)
        .into_styled(PrimitiveStyle::with_fill(Gray2::WHITE))
        .draw(&mut dot)
        .unwrap();
    if osd.load_glyph(DOT_SLOT).unwrap() != dot {
        osd.store_glyph(&dot, DOT_SLOT).unwrap();
    }

    osd.clear_screen().unwrap();
    osd.set_external_video(true).unwrap();
    osd.print_str("RSSI", 1, 1, false, false).unwrap();
    osd.render_glyph(DOT_SLOT, 28, 1, true, false).unwrap();
    osd.set_position(1, 10);
    writeln!(osd, "max7456 demo").unwrap();
    osd.set_osd_enabled(true).unwrap();

    // Set onboard LED to on to show we are in business
    pico_led.set_high().unwrap();

 // --------------------------------------------------------------------------
 //  And loop forever, counting up a fake RSSI
 // --------------------------------------------------------------------------

    let mut rssi: f32 = 0.0;
    loop {
        osd.render_number(rssi, 6, 1, 3, 1, false, false).unwrap();
        cortex_m::asm::delay(12_500_000);    // about 100ms at 125Mhz
        rssi += 0.5;
        if rssi > 100.0 {
            rssi = 0.0;
        }
    }
}
