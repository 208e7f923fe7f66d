#![no_std]
#![no_main]

use core::cell::RefCell;

use defmt::{info, unwrap};
use embassy_executor::Spawner;
use embassy_nrf::gpio::Pin;
use embassy_nrf::twim::{self, Twim};
use embassy_nrf::{bind_interrupts, peripherals};
use embassy_time::{Delay, Duration, Instant, Ticker};
use embedded_hal_bus::i2c::RefCellDevice;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use pocketkey::config::POLL_INTERVAL_MS;
use pocketkey::storage::eeprom::EepromBytes;
use pocketkey::ui::buttons::ButtonPins;
use pocketkey::ui::display::{self, OledRenderer};
use pocketkey::{Controller, Request};

bind_interrupts!(struct Irqs {
    TWISPI0 => twim::InterruptHandler<peripherals::TWISPI0>;
});

type Bus = RefCell<Twim<'static, peripherals::TWISPI0>>;

static I2C_BUS: StaticCell<Bus> = StaticCell::new();
static TWIM_TX_BUFFER: StaticCell<[u8; 64]> = StaticCell::new();

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    let p = embassy_nrf::init(Default::default());
    info!("pocketkey starting");

    // Display and EEPROM share one I²C bus.
    let mut twim_config = twim::Config::default();
    twim_config.frequency = twim::Frequency::K400;
    let twim = Twim::new(
        p.TWISPI0,
        Irqs,
        p.P0_26,
        p.P0_27,
        twim_config,
        TWIM_TX_BUFFER.init([0; 64]),
    );
    let bus: &'static Bus = I2C_BUS.init(RefCell::new(twim));

    let oled = unwrap!(display::init(RefCellDevice::new(bus)));
    let mut screen = OledRenderer::new(oled);

    let eeprom = EepromBytes::new(RefCellDevice::new(bus), Delay);
    let mut controller = unwrap!(Controller::new(eeprom));

    let mut buttons = ButtonPins::new(
        p.P0_11.degrade(),
        p.P0_12.degrade(),
        p.P0_24.degrade(),
        p.P0_25.degrade(),
    );

    let filled = controller.start(&mut screen);
    info!("Ready: {} slots filled", filled);

    let mut ticker = Ticker::every(Duration::from_millis(POLL_INTERVAL_MS));
    loop {
        let now = Instant::now().as_millis() as u32;
        match controller.tick(now, &mut buttons, &mut screen) {
            Some(Request::Transmit { slot, signal }) => {
                info!("Transmit slot {}: {}", slot, signal);
            }
            Some(Request::Capture { slot }) => {
                info!("Capture into slot {}", slot);
            }
            None => {}
        }
        ticker.next().await;
    }
}
