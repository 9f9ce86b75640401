//! OLED Panel firmware core.
//!
//! Everything here is platform-independent and runs on the host: the panel
//! state, the display renderer, the web control surface, the low-battery
//! alert policy and the notification queue.  The ESP32 binary (`main.rs`)
//! supplies the drivers behind the [`hw`] traits and the esp-idf network
//! plumbing.

pub mod alert;
pub mod battery;
pub mod config;
pub mod control;
pub mod framebuffer;
pub mod hw;
pub mod marquee;
pub mod message;
pub mod notify;
pub mod page;
pub mod panel;
pub mod routes;
pub mod screen;
