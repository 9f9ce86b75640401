//! esp-idf HTTP server glue.
//!
//! Registers one GET handler per enabled route; each locks the panel, runs
//! the platform-independent handler, releases the lock and writes the reply.
//! httpd runs handlers one at a time on its own task.

use std::sync::Arc;

use embedded_svc::http::Method;
use embedded_svc::io::Write;
use esp_idf_svc::http::server::{Configuration, EspHttpServer};
use log::info;

use oled_panel::config::{HTTP_PORT, STACK_HTTPD};
use oled_panel::hw::{FrameSink, StatusLed};
use oled_panel::panel::{self, SharedPanel};
use oled_panel::routes::{self, Route};

pub fn start<L, D>(panel: SharedPanel<L, D>) -> anyhow::Result<EspHttpServer<'static>>
where
    L: StatusLed + Send + 'static,
    D: FrameSink + Send + 'static,
{
    let battery = panel::lock(&panel)?.monitors_battery();

    let mut server = EspHttpServer::new(&Configuration {
        http_port: HTTP_PORT,
        stack_size: STACK_HTTPD,
        ..Default::default()
    })?;

    for &route in Route::enabled(battery) {
        let shared = Arc::clone(&panel);
        server.fn_handler::<anyhow::Error, _>(route.path(), Method::Get, move |req| {
            let uri = req.uri().to_string();
            let reply = {
                let mut guard = panel::lock(&shared)?;
                routes::handle(&mut *guard, route, &uri)?
            };
            req.into_response(reply.status, None, &reply.headers())?
                .write_all(reply.body.as_bytes())?;
            Ok(())
        })?;
    }

    info!("Web server started on port {}", HTTP_PORT);
    Ok(server)
}
