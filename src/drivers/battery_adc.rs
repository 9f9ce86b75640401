// OLED Panel - Battery ADC
//
// One-shot reads of the battery divider via raw ESP-IDF calls.
// GPIO2 / ADC1_CHANNEL_2 with 11 dB attenuation (0-3.3 V range), 12-bit.

use esp_idf_sys::esp;

use oled_panel::config::PIN_BATTERY_ADC;
use oled_panel::hw::BatteryProbe;

pub struct BatteryAdc {
    handle: esp_idf_sys::adc_oneshot_unit_handle_t,
    channel: esp_idf_sys::adc_channel_t,
}

impl BatteryAdc {
    pub fn new() -> anyhow::Result<Self> {
        // On the C3, GPIO0..=4 map one-to-one onto ADC1 channels.
        let channel = PIN_BATTERY_ADC as esp_idf_sys::adc_channel_t;
        let mut handle: esp_idf_sys::adc_oneshot_unit_handle_t = core::ptr::null_mut();

        // SAFETY: plain FFI setup of ADC1; the unit handle is owned by this
        // driver and released in `Drop`.
        unsafe {
            let unit_cfg = esp_idf_sys::adc_oneshot_unit_init_cfg_t {
                unit_id: esp_idf_sys::adc_unit_t_ADC_UNIT_1,
                ulp_mode: esp_idf_sys::adc_ulp_mode_t_ADC_ULP_MODE_DISABLE,
                ..core::mem::zeroed()
            };
            esp!(esp_idf_sys::adc_oneshot_new_unit(&unit_cfg, &mut handle))?;

            let chan_cfg = esp_idf_sys::adc_oneshot_chan_cfg_t {
                atten: esp_idf_sys::adc_atten_t_ADC_ATTEN_DB_11,
                bitwidth: esp_idf_sys::adc_bitwidth_t_ADC_BITWIDTH_12,
            };
            if let Err(e) = esp!(esp_idf_sys::adc_oneshot_config_channel(handle, channel, &chan_cfg)) {
                esp_idf_sys::adc_oneshot_del_unit(handle);
                return Err(e.into());
            }
        }

        log::info!("Battery ADC ready (ADC1 channel {})", channel);
        Ok(Self { handle, channel })
    }
}

impl BatteryProbe for BatteryAdc {
    fn read_raw(&mut self) -> anyhow::Result<u16> {
        let mut raw: i32 = 0;
        // SAFETY: `handle` was created in `new` and is still live.
        esp!(unsafe { esp_idf_sys::adc_oneshot_read(self.handle, self.channel, &mut raw) })?;
        Ok(raw.clamp(0, u16::MAX as i32) as u16)
    }
}

impl Drop for BatteryAdc {
    fn drop(&mut self) {
        // SAFETY: the handle is not used after this point.
        unsafe {
            esp_idf_sys::adc_oneshot_del_unit(self.handle);
        }
    }
}
