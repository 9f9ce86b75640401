// OLED Panel - Device Context
//
// All runtime state of the panel lives here: LED, message, address marquee,
// battery reading and alert policy, plus the LED/display drivers they drive.
// The web handlers and the control loop share one instance behind a mutex.

use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::anyhow;
use serde::Serialize;

use crate::alert::AlertPolicy;
use crate::config::DEFAULT_MESSAGE;
use crate::framebuffer::FrameBuffer;
use crate::hw::{FrameSink, StatusLed};
use crate::marquee::Marquee;
use crate::message;
use crate::notify::Notification;
use crate::screen::{self, ScreenState};

pub type SharedPanel<L, D> = Arc<Mutex<Panel<L, D>>>;

/// Lock the shared panel, turning a poisoned mutex into an error.
pub fn lock<L, D>(panel: &Mutex<Panel<L, D>>) -> anyhow::Result<MutexGuard<'_, Panel<L, D>>> {
    panel.lock().map_err(|_| anyhow!("panel state poisoned"))
}

/// Battery state, present only in the battery-monitoring build.
#[derive(Debug, Clone)]
pub struct BatteryMonitor {
    volts: Option<f32>,
    policy: AlertPolicy,
    alert_url: String,
}

impl BatteryMonitor {
    pub fn new(policy: AlertPolicy, alert_url: &str) -> Self {
        Self {
            volts: None,
            policy,
            alert_url: alert_url.to_string(),
        }
    }
}

/// JSON view served on `/api/state`.
#[derive(Debug, Serialize)]
pub struct Snapshot {
    pub led: bool,
    pub message: String,
    pub battery: Option<f32>,
    pub address: String,
}

pub struct Panel<L, D> {
    led: L,
    display: D,
    frame: FrameBuffer,
    led_on: bool,
    message: String,
    address: String,
    marquee: Marquee,
    battery: Option<BatteryMonitor>,
}

impl<L: StatusLed, D: FrameSink> Panel<L, D> {
    /// Build the panel with the LED off and the default message, and draw the
    /// first screen.  A dead display only costs the screen, not the panel.
    pub fn new(
        mut led: L,
        display: D,
        address: &str,
        battery: Option<BatteryMonitor>,
    ) -> anyhow::Result<Self> {
        led.set_lit(false)?;
        let mut panel = Self {
            led,
            display,
            frame: FrameBuffer::new(),
            led_on: false,
            message: DEFAULT_MESSAGE.to_string(),
            address: address.to_string(),
            marquee: Marquee::for_text(address),
            battery,
        };
        panel.redraw();
        Ok(panel)
    }

    pub fn led_on(&self) -> bool {
        self.led_on
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn scroll_offset(&self) -> u32 {
        self.marquee.offset()
    }

    pub fn monitors_battery(&self) -> bool {
        self.battery.is_some()
    }

    pub fn battery_volts(&self) -> Option<f32> {
        self.battery.as_ref().and_then(|b| b.volts)
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn led(&self) -> &L {
        &self.led
    }

    /// Flip the LED and return the new state.
    pub fn toggle_led(&mut self) -> anyhow::Result<bool> {
        let next = !self.led_on;
        self.led.set_lit(next)?;
        self.led_on = next;
        log::info!("LED {}", if next { "ON" } else { "OFF" });
        self.redraw();
        Ok(next)
    }

    /// Store a submitted message (normalized) and redraw.
    pub fn set_message(&mut self, raw: &str) {
        self.message = message::normalize(raw);
        log::info!("Message set to '{}'", self.message);
        self.redraw();
    }

    /// Advance the address scroll by one tick, redrawing if it moved.
    pub fn advance_scroll(&mut self) -> bool {
        if !self.marquee.advance() {
            return false;
        }
        self.redraw();
        true
    }

    /// Record a battery sample taken at `now_ms`, redraw, and run the alert
    /// policy.  Returns the alert to send, if any.
    pub fn record_battery(&mut self, volts: f32, now_ms: u64) -> Option<Notification> {
        let battery = self.battery.as_mut()?;
        battery.volts = Some(volts);
        log::debug!("Battery {:.2}V", volts);

        let alert = battery
            .policy
            .evaluate(volts, now_ms)
            .then(|| Notification::low_battery(&battery.alert_url, volts));
        if alert.is_some() {
            log::warn!("Low battery: {:.2}V", volts);
        }

        self.redraw();
        alert
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            led: self.led_on,
            message: self.message.clone(),
            battery: self.battery_volts(),
            address: self.address.clone(),
        }
    }

    /// Like [`refresh`](Self::refresh), but a display fault is only logged:
    /// state changes stand even if the panel could not be updated.
    pub fn redraw(&mut self) {
        if let Err(e) = self.refresh() {
            log::warn!("Display refresh failed: {:#}", e);
        }
    }

    /// Render the current state and commit it to the display.
    pub fn refresh(&mut self) -> anyhow::Result<()> {
        let state = ScreenState {
            address: &self.address,
            marquee: self.marquee,
            led_on: self.led_on,
            battery_volts: self.battery_volts(),
            message: &self.message,
        };
        screen::render(&mut self.frame, &state);
        self.display.show(&self.frame)
    }
}
