//! Wi-Fi station bring-up.
//!
//! Associates with the configured network, polling a bounded number of times
//! before giving up.  The caller treats failure as fatal.

use std::thread;
use std::time::Duration;

use anyhow::{anyhow, bail, Result};
use esp_idf_svc::{
    eventloop::EspSystemEventLoop,
    hal::peripheral,
    nvs::EspDefaultNvsPartition,
    sys::esp,
    wifi::{AuthMethod, BlockingWifi, ClientConfiguration, Configuration, EspWifi},
};
use log::info;

use oled_panel::config::{WIFI_CONNECT_ATTEMPTS, WIFI_MAX_TX_POWER, WIFI_RETRY_DELAY_MS};

/// Connect to `ssid` and wait for a DHCP lease.
///
/// Returns the driver, which must be kept alive for the connection to stay
/// up, and the station's IPv4 address as text.
pub fn connect(
    ssid: &str,
    password: &str,
    modem: impl peripheral::Peripheral<P = esp_idf_svc::hal::modem::Modem> + 'static,
    sysloop: EspSystemEventLoop,
    nvs: Option<EspDefaultNvsPartition>,
) -> Result<(Box<EspWifi<'static>>, String)> {
    if ssid.is_empty() {
        bail!("WiFi SSID cannot be empty");
    }

    let auth_method = if password.is_empty() {
        info!("WiFi password is empty, using open network");
        AuthMethod::None
    } else {
        AuthMethod::WPA2Personal
    };

    let mut esp_wifi = EspWifi::new(modem, sysloop.clone(), nvs)?;
    let mut wifi = BlockingWifi::wrap(&mut esp_wifi, sysloop)?;

    wifi.set_configuration(&Configuration::Client(ClientConfiguration {
        ssid: ssid.try_into().map_err(|_| anyhow!("SSID too long (max 32 chars)"))?,
        password: password
            .try_into()
            .map_err(|_| anyhow!("Password too long (max 64 chars)"))?,
        auth_method,
        ..Default::default()
    }))?;
    wifi.start()?;

    // Keep the radio awake for snappy HTTP replies, and cap TX power: the
    // C3 mini boards brown out or detune their antenna at full power.
    esp!(unsafe { esp_idf_svc::sys::esp_wifi_set_ps(esp_idf_svc::sys::wifi_ps_type_t_WIFI_PS_NONE) })?;
    esp!(unsafe { esp_idf_svc::sys::esp_wifi_set_max_tx_power(WIFI_MAX_TX_POWER) })?;

    let mac = wifi.wifi().sta_netif().get_mac()?;
    info!("MAC: {}", format_mac(&mac));
    info!("Connecting to '{}'", ssid);
    wifi.wifi_mut().connect()?;

    let mut attempts = 0;
    while !wifi.is_connected()? {
        if attempts >= WIFI_CONNECT_ATTEMPTS {
            bail!("no association with '{}' after {} attempts", ssid, attempts);
        }
        thread::sleep(Duration::from_millis(WIFI_RETRY_DELAY_MS));
        attempts += 1;
        info!("  not associated yet (attempt {}/{})", attempts, WIFI_CONNECT_ATTEMPTS);
    }

    info!("Waiting for DHCP lease...");
    wifi.wait_netif_up()?;

    let ip_info = wifi.wifi().sta_netif().get_ip_info()?;
    info!("Connected! IP: {}", ip_info.ip);
    info!("  Gateway: {}", ip_info.subnet.gateway);
    info!("  Netmask: {}", ip_info.subnet.mask);
    if let Some(dns) = ip_info.dns {
        info!("  DNS:     {}", dns);
    }
    log_access_point();

    drop(wifi);
    Ok((Box::new(esp_wifi), ip_info.ip.to_string()))
}

/// Channel, signal strength and BSSID of the associated access point.
fn log_access_point() {
    // SAFETY: `wifi_ap_record_t` is a plain C struct; all-zero is valid.
    let mut ap: esp_idf_svc::sys::wifi_ap_record_t = unsafe { core::mem::zeroed() };
    match esp!(unsafe { esp_idf_svc::sys::esp_wifi_sta_get_ap_info(&mut ap) }) {
        Ok(()) => {
            info!("  Channel: {}", ap.primary);
            info!("  RSSI:    {} dBm", ap.rssi);
            info!("  BSSID:   {}", format_mac(&ap.bssid));
        }
        Err(e) => log::warn!("AP info unavailable: {}", e),
    }
}

fn format_mac(mac: &[u8; 6]) -> String {
    mac.iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(":")
}
