use max7456::{
    dummypins::{DummyDelay, DummyInputPin, DummyOutputPin},
    spi::BitBangSpi,
    CharacterMemory, Config, Glyph, Pixel, Settings, TextMode, MAX7456,
};
use std::fmt::Write;

fn main() {
    let osd_clk = DummyOutputPin;
    let osd_mosi = DummyOutputPin;
    let osd_miso = DummyInputPin;
    let osd_cs = DummyOutputPin;

    let settings = Settings::default();
    let config = Config {
        video_standard: settings.output_standard(),
        ..Config::default()
    };

    let spi = BitBangSpi::new(osd_clk, osd_mosi, osd_miso).expect("Infallible cannot fail");
    let mut osd = MAX7456::new(spi, osd_cs, DummyDelay, config).expect("Infallible cannot fail");

    // a small arrow as custom glyph in a free slot
    let mut arrow = Glyph::transparent();
    for i in 0..6 {
        arrow.set_pixel(6, 3 + i, Pixel::White);
        arrow.set_pixel(6 - i, 3 + i, Pixel::White);
        arrow.set_pixel(6 + i, 3 + i, Pixel::White);
    }
    println!("{}", arrow);
    osd.store_glyph(&arrow, 0xF0).expect("Infallible cannot fail");

    osd.clear_screen().expect("Infallible cannot fail");
    osd.set_external_video(true).expect("Infallible cannot fail");
    osd.print_str("RSSI", 1, 1, false, false)
        .expect("Infallible cannot fail");
    osd.render_number(87.5, 6, 1, 3, 1, false, false)
        .expect("Infallible cannot fail");
    osd.render_glyph(0xF0, 12, 1, true, false)
        .expect("Infallible cannot fail");

    osd.set_position(0, 10);
    writeln!(osd, "Hello World").unwrap();

    osd.set_osd_enabled(true).expect("Infallible cannot fail");
}
