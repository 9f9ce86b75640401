/// Build-time settings baked into the firmware with `env!`, with the
/// fallback used when neither the environment nor `.env` provides one.
const SETTINGS: &[(&str, &str)] = &[
    ("PANEL_WIFI_SSID", "your-ssid"),
    ("PANEL_WIFI_PASS", "your-password"),
    ("PANEL_BOOT_NOTIFY_URL", "https://ntfy.sh/oled-panel-boot"),
    ("PANEL_ALERT_NOTIFY_URL", "https://ntfy.sh/oled-panel-alert"),
];

fn main() {
    if std::env::var("CARGO_CFG_TARGET_OS").as_deref() == Ok("espidf") {
        embuild::espidf::sysenv::output();
    }

    // Credentials live in `.env` (see `.env.example`) so they stay out of git.
    let _ = dotenvy::dotenv();
    println!("cargo:rerun-if-changed=.env");

    for (key, fallback) in SETTINGS {
        let value = std::env::var(key).unwrap_or_else(|_| (*fallback).to_string());
        println!("cargo:rerun-if-env-changed={key}");
        println!("cargo:rustc-env={key}={value}");
    }
}
