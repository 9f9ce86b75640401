//! The control page served on `/`.
//!
//! The simple build substitutes the LED state and message server-side; the
//! battery build ships a page that polls `/status` and `/battery` instead.

use crate::config::MESSAGE_MAX_CHARS;

const HEAD: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>OLED Panel</title>
<style>
  body { font-family: sans-serif; max-width: 400px; margin: 40px auto; padding: 0 20px; }
  h1 { font-size: 1.4em; }
  input[type=text] { width: 100%; padding: 8px; box-sizing: border-box; font-size: 1em; }
  button { padding: 10px 20px; font-size: 1em; margin-top: 10px; cursor: pointer; }
  .status { margin: 16px 0; padding: 10px; background: #f0f0f0; border-radius: 4px; }
</style>
</head>
<body>
<h1>OLED Panel</h1>
"#;

const TOGGLE: &str = r#"
<button onclick="fetch('/led').then(r=>r.text()).then(t=>{document.getElementById('ledstate').innerText=t})">
  Toggle LED
</button>
"#;

const POLL_SCRIPT: &str = r#"
<script>
function poll() {
  fetch('/status').then(r=>r.text()).then(t=>{document.getElementById('ledstate').innerText=t});
  fetch('/battery').then(r=>r.text()).then(t=>{document.getElementById('battery').innerText=t+' V'});
}
poll();
setInterval(poll, 5000);
</script>
"#;

/// What the page needs to know about the panel.
#[derive(Debug, Clone, Copy)]
pub struct PageView<'a> {
    pub led_on: bool,
    pub message: &'a str,
    pub battery: bool,
}

pub fn render_index(view: &PageView<'_>) -> String {
    let led = if view.led_on { "ON" } else { "OFF" };
    let mut page = String::with_capacity(2048);
    page.push_str(HEAD);

    page.push_str("\n<div class=\"status\">\n  LED is currently: <strong id=\"ledstate\">");
    // The battery page fills these in from the data endpoints after load.
    page.push_str(if view.battery { "..." } else { led });
    page.push_str("</strong>\n");
    if view.battery {
        page.push_str("  <br>Battery: <strong id=\"battery\">...</strong>\n");
    }
    page.push_str("</div>\n");

    page.push_str(TOGGLE);

    page.push_str("\n<h2>OLED Message</h2>\n<form action=\"/msg\" method=\"GET\">\n");
    page.push_str(&format!(
        "  <input type=\"text\" name=\"t\" maxlength=\"{}\" placeholder=\"Type a message...\" value=\"{}\">\n",
        MESSAGE_MAX_CHARS,
        escape_html(view.message.trim()),
    ));
    page.push_str("  <button type=\"submit\">Send to OLED</button>\n</form>\n");

    if view.battery {
        page.push_str(POLL_SCRIPT);
    }
    page.push_str("</body>\n</html>\n");
    page
}

/// Escape text for use inside element content or a quoted attribute.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_page_substitutes_state() {
        let html = render_index(&PageView {
            led_on: true,
            message: "Hello!",
            battery: false,
        });
        assert!(html.contains(r#"<strong id="ledstate">ON</strong>"#));
        assert!(html.contains(r#"value="Hello!""#));
        assert!(html.contains(r#"maxlength="24""#));
        assert!(!html.contains("/battery"));
    }

    #[test]
    fn battery_page_polls_endpoints() {
        let html = render_index(&PageView {
            led_on: false,
            message: "Hello!",
            battery: true,
        });
        assert!(html.contains("fetch('/status')"));
        assert!(html.contains("fetch('/battery')"));
        assert!(html.contains(r#"id="battery""#));
    }

    #[test]
    fn message_is_escaped() {
        let html = render_index(&PageView {
            led_on: false,
            message: r#""><script>x</script>"#,
            battery: false,
        });
        assert!(!html.contains("<script>x"));
        assert!(html.contains("&quot;&gt;&lt;script&gt;"));
    }

    #[test]
    fn placeholder_space_renders_empty_field() {
        let html = render_index(&PageView {
            led_on: false,
            message: " ",
            battery: false,
        });
        assert!(html.contains(r#"value="""#));
    }
}
