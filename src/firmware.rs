// OLED Panel - Device Boot & Main Loop
//
// Boot sequence:
//   1. Drive the LED off and bring up the OLED.
//   2. Show "Connecting / WiFi..." and associate with the access point.
//      If that fails, show "WiFi FAIL / Check serial" and halt until reset.
//   3. Build the panel context, start the notifier and the web server.
//   4. Send the boot notice and take the first battery sample.
//   5. Run the control loop (marquee + battery cadence) forever.

use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use esp_idf_hal::gpio::{OutputPin, PinDriver};
use esp_idf_hal::i2c::{I2cConfig, I2cDriver};
use esp_idf_hal::prelude::*;
use esp_idf_svc::{eventloop::EspSystemEventLoop, nvs::EspDefaultNvsPartition};

use oled_panel::{
    alert::AlertPolicy,
    config::*,
    control::ControlLoop,
    hw::StatusLed,
    notify::{Notification, Notifier},
    panel::{BatteryMonitor, Panel},
};

use crate::drivers::{battery_adc::BatteryAdc, led::ActiveLowLed, oled::OledDisplay};
use crate::net;

// ---------------------------------------------------------------------------
// Utility: milliseconds since boot
// ---------------------------------------------------------------------------
pub fn now_ms() -> u64 {
    unsafe { (esp_idf_sys::esp_timer_get_time() / 1000) as u64 }
}

// ---------------------------------------------------------------------------
// Boot + loop
// ---------------------------------------------------------------------------
pub fn run() -> anyhow::Result<()> {
    // Link esp-idf-sys runtime patches and initialise logging.
    esp_idf_svc::sys::link_patches();
    esp_idf_svc::log::EspLogger::initialize_default();
    log::info!("OLED Panel firmware starting...");

    // ---- Peripherals ------------------------------------------------------
    let peripherals = Peripherals::take()?;
    let sysloop = EspSystemEventLoop::take()?;
    let nvs = EspDefaultNvsPartition::take()?;

    // LED off before anything else (active LOW).
    let mut led = ActiveLowLed::new(PinDriver::output(peripherals.pins.gpio8.downgrade_output())?);
    led.set_lit(false)?;

    // ---- OLED -------------------------------------------------------------
    let i2c_config = I2cConfig::new().baudrate(I2C_BAUDRATE_HZ.Hz().into());
    let i2c = I2cDriver::new(
        peripherals.i2c0,
        peripherals.pins.gpio5, // SDA
        peripherals.pins.gpio6, // SCL
        &i2c_config,
    )?;
    let mut display = OledDisplay::new(i2c);
    if !display.is_connected() {
        log::error!("No OLED at 0x{:02X} (SDA GPIO{}, SCL GPIO{})", I2C_ADDR_OLED, PIN_I2C_SDA, PIN_I2C_SCL);
    }
    // The panel stays usable over the web without a working screen.
    if let Err(e) = display.init() {
        log::warn!("OLED init failed: {:#}", e);
    }
    if let Err(e) = display.show_banner(["Connecting", "WiFi..."]) {
        log::warn!("Display error: {:#}", e);
    }

    // ---- Network bring-up -------------------------------------------------
    let (_wifi, address) =
        match net::wifi::connect(WIFI_SSID, WIFI_PASS, peripherals.modem, sysloop, Some(nvs)) {
            Ok(connection) => connection,
            Err(e) => {
                log::error!("WiFi FAILED: {:#}", e);
                if let Err(e) = display.show_banner(["WiFi FAIL", "Check serial"]) {
                    log::error!("Display error: {:#}", e);
                }
                halt();
            }
        };

    // ---- Panel context ----------------------------------------------------
    let monitor_battery = cfg!(feature = "battery-monitor");
    let battery = monitor_battery.then(|| BatteryMonitor::new(AlertPolicy::default(), ALERT_NOTIFY_URL));
    let panel = Arc::new(Mutex::new(Panel::new(led, display, &address, battery)?));

    let notifier = Notifier::spawn(net::ntfy::NtfySink)?;
    let _server = net::server::start(Arc::clone(&panel))?;
    log::info!("Control panel at http://{}/ (LED on GPIO{})", address, PIN_LED);

    let probe = if monitor_battery {
        notifier.notify(Notification::boot(BOOT_NOTIFY_URL, &address));
        match BatteryAdc::new() {
            Ok(adc) => Some(adc),
            Err(e) => {
                log::warn!("Battery ADC unavailable, sampling disabled: {:#}", e);
                None
            }
        }
    } else {
        None
    };

    // ---- Control loop -----------------------------------------------------
    let mut control = ControlLoop::new(probe, now_ms());
    if let Some(alert) = control.sample_battery(&panel, now_ms())? {
        notifier.notify(alert);
    }

    loop {
        match control.tick(&panel, now_ms()) {
            Ok(Some(alert)) => {
                notifier.notify(alert);
            }
            Ok(None) => {}
            Err(e) => log::warn!("Control loop pass failed: {:#}", e),
        }
        thread::sleep(Duration::from_millis(LOOP_POLL_INTERVAL_MS));
    }
}

/// Bring-up failed: idle forever, the device needs a physical reset.
fn halt() -> ! {
    loop {
        thread::sleep(Duration::from_millis(HALT_IDLE_MS));
    }
}

