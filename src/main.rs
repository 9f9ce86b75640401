// OLED Panel - Firmware Entry Point
//
// The panel logic is in the `oled_panel` library so it builds and tests on
// the host; the device boot sequence lives in `firmware.rs`.

#[cfg(target_os = "espidf")]
mod drivers;
#[cfg(target_os = "espidf")]
mod firmware;
#[cfg(target_os = "espidf")]
mod net;

#[cfg(target_os = "espidf")]
fn main() -> anyhow::Result<()> {
    firmware::run()
}

#[cfg(not(target_os = "espidf"))]
fn main() {
    println!("oled-panel is ESP32-C3 firmware; build it with `--target riscv32imc-esp-espidf`.");
    println!("The panel logic lives in the `oled_panel` library and is tested on the host.");
}
