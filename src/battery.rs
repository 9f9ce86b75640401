// OLED Panel - Battery Voltage
//
// The cell sits behind a 1:2 resistor divider, so the ADC sees half of the
// real voltage.  Conversion mirrors the 12-bit / 11 dB oneshot setup used by
// the ADC driver.

use crate::config::*;

/// Convert a raw 12-bit ADC reading to the cell voltage.
pub fn volts_from_raw(raw: u16) -> f32 {
    (raw.min(ADC_FULL_SCALE as u16) as f32 / ADC_FULL_SCALE) * ADC_REFERENCE_VOLTS * BATTERY_DIVIDER_RATIO
}

/// Two-decimal rendering used by the display and the `/battery` endpoint.
pub fn format_volts(volts: f32) -> String {
    format!("{:.2}", volts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_scale_is_twice_reference() {
        assert!((volts_from_raw(4095) - 6.6).abs() < 1e-4);
    }

    #[test]
    fn zero_reading_is_zero_volts() {
        assert_eq!(volts_from_raw(0), 0.0);
    }

    #[test]
    fn out_of_range_reading_saturates() {
        assert_eq!(volts_from_raw(u16::MAX), volts_from_raw(4095));
    }

    #[test]
    fn mid_scale_lipo() {
        // 2482 / 4095 * 6.6 ~= 4.00 V
        assert_eq!(format_volts(volts_from_raw(2482)), "4.00");
    }

    #[test]
    fn formats_two_decimals() {
        assert_eq!(format_volts(3.2), "3.20");
        assert_eq!(format_volts(3.456), "3.46");
    }
}
