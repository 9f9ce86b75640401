// OLED Panel - Status LED Driver
//
// The on-board LED sinks current into the GPIO: LOW lights it.

use esp_idf_hal::gpio::{AnyOutputPin, Output, PinDriver};

use oled_panel::hw::StatusLed;

pub struct ActiveLowLed<'d> {
    pin: PinDriver<'d, AnyOutputPin, Output>,
}

impl<'d> ActiveLowLed<'d> {
    pub fn new(pin: PinDriver<'d, AnyOutputPin, Output>) -> Self {
        Self { pin }
    }
}

impl StatusLed for ActiveLowLed<'_> {
    fn set_lit(&mut self, lit: bool) -> anyhow::Result<()> {
        if lit {
            self.pin.set_low()?;
        } else {
            self.pin.set_high()?;
        }
        Ok(())
    }
}
