//! ntfy-style HTTPS push delivery.

use std::time::Duration;

use anyhow::bail;
use embedded_svc::http::client::Client;
use embedded_svc::http::Status;
use embedded_svc::io::Write;
use esp_idf_svc::http::client::{Configuration, EspHttpConnection};

use oled_panel::notify::{Notification, NotifySink};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Posts each notification to its URL over a fresh connection.
pub struct NtfySink;

impl NotifySink for NtfySink {
    fn deliver(&mut self, notification: &Notification) -> anyhow::Result<()> {
        let connection = EspHttpConnection::new(&Configuration {
            crt_bundle_attach: Some(esp_idf_svc::sys::esp_crt_bundle_attach),
            timeout: Some(REQUEST_TIMEOUT),
            ..Default::default()
        })?;
        let mut client = Client::wrap(connection);

        let length = notification.body.len().to_string();
        let [title, priority, tags] = notification.headers();
        let headers = [
            title,
            priority,
            tags,
            ("Content-Type", "text/plain"),
            ("Content-Length", length.as_str()),
        ];

        let mut request = client.post(&notification.url, &headers)?;
        request.write_all(notification.body.as_bytes())?;
        request.flush()?;
        let response = request.submit()?;

        let status = response.status();
        if !(200..300).contains(&status) {
            bail!("{} answered HTTP {}", notification.url, status);
        }
        Ok(())
    }
}
