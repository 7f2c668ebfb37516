mod console;
mod sd_volume;

use embedded_hal_bus::spi::ExclusiveDevice;
use embedded_sdmmc::{SdCard, VolumeManager};
use esp_hal::{
    delay::Delay,
    gpio::{Level, Output, OutputConfig},
    spi::{
        master::{Config as SpiConfig, Spi},
        Mode as SpiMode,
    },
    time::Rate,
};
use log::LevelFilter;
use winc_imager::App;

use self::{
    console::SerialConsole,
    sd_volume::{FixedClock, SdVolume},
};

pub(crate) fn run() -> ! {
    esp_println::logger::init_logger(LevelFilter::Info);
    let peripherals = esp_hal::init(esp_hal::Config::default());

    let sd_spi_cfg = SpiConfig::default()
        .with_frequency(Rate::from_khz(400))
        .with_mode(SpiMode::_0);
    let sd_spi = Spi::new(peripherals.SPI2, sd_spi_cfg)
        .expect("failed to init SPI2 for SD card")
        .with_sck(peripherals.GPIO14)
        .with_mosi(peripherals.GPIO13)
        .with_miso(peripherals.GPIO12);
    let sd_cs = Output::new(peripherals.GPIO15, Level::High, OutputConfig::default());
    let sd_device =
        ExclusiveDevice::new(sd_spi, sd_cs, Delay::new()).expect("failed to claim SD chip select");
    let card = SdCard::new(sd_device, Delay::new());
    let mut volume = SdVolume::new(VolumeManager::new(card, FixedClock));

    let mut console = SerialConsole;
    let mut app = App::default();
    app.start(&mut console);

    loop {
        app.tick(&mut volume, &mut console);
    }
}
