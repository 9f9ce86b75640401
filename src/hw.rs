//! Hardware seams between the panel logic and the ESP32 drivers.
//!
//! The device binary implements these over `esp-idf-hal`; tests use fakes.

use crate::framebuffer::FrameBuffer;

/// The user-toggled status LED.
pub trait StatusLed {
    /// Drive the LED lit or dark.  Implementations handle pin polarity.
    fn set_lit(&mut self, lit: bool) -> anyhow::Result<()>;
}

/// A display that can show a complete frame.
pub trait FrameSink {
    fn show(&mut self, frame: &FrameBuffer) -> anyhow::Result<()>;
}

/// Source of raw battery-divider readings.
pub trait BatteryProbe {
    /// One raw 12-bit ADC sample.
    fn read_raw(&mut self) -> anyhow::Result<u16>;
}
