// OLED Panel - HTTP Control Surface
//
// Platform-independent request handlers.  Each takes the locked panel and
// the request URI and produces a `Reply`; the device binary only copies the
// reply onto the esp-idf HTTP connection.

use crate::battery::format_volts;
use crate::hw::{FrameSink, StatusLed};
use crate::page::{self, PageView};
use crate::panel::Panel;

pub const CONTENT_HTML: &str = "text/html";
pub const CONTENT_TEXT: &str = "text/plain";
pub const CONTENT_JSON: &str = "application/json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Root,
    Toggle,
    Status,
    Battery,
    Message,
    State,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Root => "/",
            Route::Toggle => "/led",
            Route::Status => "/status",
            Route::Battery => "/battery",
            Route::Message => "/msg",
            Route::State => "/api/state",
        }
    }

    /// Routes served by a build, depending on whether it monitors a battery.
    pub fn enabled(battery: bool) -> &'static [Route] {
        if battery {
            &[
                Route::Root,
                Route::Toggle,
                Route::Status,
                Route::Battery,
                Route::Message,
                Route::State,
            ]
        } else {
            &[Route::Root, Route::Toggle, Route::Message, Route::State]
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub content_type: &'static str,
    pub location: Option<&'static str>,
    pub body: String,
}

impl Reply {
    fn ok(content_type: &'static str, body: impl Into<String>) -> Self {
        Self {
            status: 200,
            content_type,
            location: None,
            body: body.into(),
        }
    }

    fn redirect(location: &'static str) -> Self {
        Self {
            status: 302,
            content_type: CONTENT_TEXT,
            location: Some(location),
            body: "OK".to_string(),
        }
    }

    /// Headers to send with the status line.
    pub fn headers(&self) -> Vec<(&'static str, &'static str)> {
        let mut headers = vec![("Content-Type", self.content_type)];
        if let Some(location) = self.location {
            headers.push(("Location", location));
        }
        headers
    }
}

fn on_off(on: bool) -> &'static str {
    if on {
        "ON"
    } else {
        "OFF"
    }
}

pub fn handle<L: StatusLed, D: FrameSink>(
    panel: &mut Panel<L, D>,
    route: Route,
    uri: &str,
) -> anyhow::Result<Reply> {
    log::debug!("GET {}", uri);
    let reply = match route {
        Route::Root => Reply::ok(
            CONTENT_HTML,
            page::render_index(&PageView {
                led_on: panel.led_on(),
                message: panel.message(),
                battery: panel.monitors_battery(),
            }),
        ),
        Route::Toggle => Reply::ok(CONTENT_TEXT, on_off(panel.toggle_led()?)),
        Route::Status => Reply::ok(CONTENT_TEXT, on_off(panel.led_on())),
        Route::Battery => Reply::ok(CONTENT_TEXT, format_volts(panel.battery_volts().unwrap_or(0.0))),
        Route::Message => {
            match query_param(uri, "t") {
                Some(text) => panel.set_message(&text),
                None => panel.redraw(),
            }
            Reply::redirect(Route::Root.path())
        }
        Route::State => Reply::ok(CONTENT_JSON, serde_json::to_string(&panel.snapshot())?),
    };
    Ok(reply)
}

/// Look up a query parameter, decoding `+` and `%XX` form escapes.
pub fn query_param(uri: &str, key: &str) -> Option<String> {
    let query = uri.split_once('?')?.1;
    query.split('&').find_map(|pair| {
        let (name, value) = pair.split_once('=').unwrap_or((pair, ""));
        (percent_decode(name) == key).then(|| percent_decode(value))
    })
}

fn percent_decode(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => out.push(b' '),
            b'%' => match bytes.get(i + 1..i + 3).and_then(|h| hex_pair(h[0], h[1])) {
                Some(decoded) => {
                    out.push(decoded);
                    i += 2;
                }
                None => out.push(b'%'),
            },
            b => out.push(b),
        }
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex_pair(hi: u8, lo: u8) -> Option<u8> {
    let digit = |c: u8| (c as char).to_digit(16).map(|d| d as u8);
    Some(digit(hi)? << 4 | digit(lo)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_plain_parameter() {
        assert_eq!(query_param("/msg?t=hi", "t").as_deref(), Some("hi"));
        assert_eq!(query_param("/msg?x=1&t=hi", "t").as_deref(), Some("hi"));
    }

    #[test]
    fn missing_parameter_or_query() {
        assert_eq!(query_param("/msg", "t"), None);
        assert_eq!(query_param("/msg?x=1", "t"), None);
    }

    #[test]
    fn empty_and_bare_parameters() {
        assert_eq!(query_param("/msg?t=", "t").as_deref(), Some(""));
        assert_eq!(query_param("/msg?t", "t").as_deref(), Some(""));
    }

    #[test]
    fn decodes_form_encoding() {
        assert_eq!(
            query_param("/msg?t=++hello+world%20test%21%21++", "t").as_deref(),
            Some("  hello world test!!  ")
        );
        assert_eq!(query_param("/msg?t=caf%C3%A9", "t").as_deref(), Some("café"));
    }

    #[test]
    fn malformed_escapes_pass_through() {
        assert_eq!(query_param("/msg?t=100%", "t").as_deref(), Some("100%"));
        assert_eq!(query_param("/msg?t=%zz", "t").as_deref(), Some("%zz"));
        assert_eq!(query_param("/msg?t=%4", "t").as_deref(), Some("%4"));
    }

    #[test]
    fn redirect_carries_location() {
        let reply = Reply::redirect("/");
        assert_eq!(reply.status, 302);
        assert_eq!(
            reply.headers(),
            vec![("Content-Type", CONTENT_TEXT), ("Location", "/")]
        );
    }

    #[test]
    fn simple_build_has_no_battery_routes() {
        let routes = Route::enabled(false);
        assert!(!routes.contains(&Route::Status));
        assert!(!routes.contains(&Route::Battery));
        assert!(Route::enabled(true).contains(&Route::Battery));
    }
}
