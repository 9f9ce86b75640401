pub mod battery_adc;
pub mod led;
pub mod oled;
