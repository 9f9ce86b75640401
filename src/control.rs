// OLED Panel - Control Loop
//
// One non-blocking pass of the main loop: advance the address marquee on its
// cadence, and sample the battery on its cadence.  Hardware faults are logged
// and the pass carries on; the loop must keep running.

use std::sync::Mutex;

use crate::battery::volts_from_raw;
use crate::config::{BATTERY_CHECK_INTERVAL_MS, SCROLL_INTERVAL_MS};
use crate::hw::{BatteryProbe, FrameSink, StatusLed};
use crate::notify::Notification;
use crate::panel::{self, Panel};

/// Fixed-period cadence on the millisecond uptime clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    period_ms: u64,
    last_ms: u64,
}

impl Interval {
    pub fn new(period_ms: u64, start_ms: u64) -> Self {
        Self {
            period_ms,
            last_ms: start_ms,
        }
    }

    /// True once more than `period_ms` has passed since the last firing.
    pub fn due(&mut self, now_ms: u64) -> bool {
        if now_ms.saturating_sub(self.last_ms) > self.period_ms {
            self.last_ms = now_ms;
            true
        } else {
            false
        }
    }
}

struct BatterySampler<B> {
    probe: B,
    cadence: Interval,
}

pub struct ControlLoop<B> {
    scroll: Interval,
    battery: Option<BatterySampler<B>>,
}

impl<B: BatteryProbe> ControlLoop<B> {
    /// `probe` is `None` in the build without battery monitoring.
    pub fn new(probe: Option<B>, now_ms: u64) -> Self {
        Self {
            scroll: Interval::new(SCROLL_INTERVAL_MS, now_ms),
            battery: probe.map(|probe| BatterySampler {
                probe,
                cadence: Interval::new(BATTERY_CHECK_INTERVAL_MS, now_ms),
            }),
        }
    }

    /// Take a battery sample right now, regardless of cadence.  Used once at
    /// boot so the voltage is known before the first interval elapses.
    pub fn sample_battery<L: StatusLed, D: FrameSink>(
        &mut self,
        panel: &Mutex<Panel<L, D>>,
        now_ms: u64,
    ) -> anyhow::Result<Option<Notification>> {
        let Some(sampler) = self.battery.as_mut() else {
            return Ok(None);
        };
        sampler.cadence = Interval::new(BATTERY_CHECK_INTERVAL_MS, now_ms);

        let raw = match sampler.probe.read_raw() {
            Ok(raw) => raw,
            Err(e) => {
                log::warn!("Battery read failed: {:#}", e);
                return Ok(None);
            }
        };
        let volts = volts_from_raw(raw);
        Ok(panel::lock(panel)?.record_battery(volts, now_ms))
    }

    /// One pass of the main loop.  Returns an alert for the notifier, if the
    /// battery sample taken in this pass calls for one.
    pub fn tick<L: StatusLed, D: FrameSink>(
        &mut self,
        panel: &Mutex<Panel<L, D>>,
        now_ms: u64,
    ) -> anyhow::Result<Option<Notification>> {
        if self.scroll.due(now_ms) {
            panel::lock(panel)?.advance_scroll();
        }

        let battery_due = self
            .battery
            .as_mut()
            .is_some_and(|sampler| sampler.cadence.due(now_ms));
        if battery_due {
            return self.sample_battery(panel, now_ms);
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_fires_strictly_after_period() {
        let mut every = Interval::new(300, 0);
        assert!(!every.due(299));
        assert!(!every.due(300));
        assert!(every.due(301));
        assert!(!every.due(601));
        assert!(every.due(602));
    }

    #[test]
    fn interval_tolerates_clock_behind_start() {
        let mut every = Interval::new(300, 1_000);
        assert!(!every.due(10));
    }
}
