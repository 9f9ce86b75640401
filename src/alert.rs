// OLED Panel - Low Battery Alert Policy
//
// Decides, per battery sample, whether a low-battery notification goes out.
// The very first qualifying sample always fires; after that at most one
// alert per cooldown window.

use crate::config::{BATTERY_NOISE_FLOOR_VOLTS, LOW_BATTERY_COOLDOWN_MS, LOW_BATTERY_VOLTS};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlertPolicy {
    threshold_volts: f32,
    noise_floor_volts: f32,
    cooldown_ms: u64,
    first_pending: bool,
    last_alert_ms: u64,
}

impl Default for AlertPolicy {
    fn default() -> Self {
        Self::new(LOW_BATTERY_VOLTS, BATTERY_NOISE_FLOOR_VOLTS, LOW_BATTERY_COOLDOWN_MS)
    }
}

impl AlertPolicy {
    pub fn new(threshold_volts: f32, noise_floor_volts: f32, cooldown_ms: u64) -> Self {
        Self {
            threshold_volts,
            noise_floor_volts,
            cooldown_ms,
            first_pending: true,
            last_alert_ms: 0,
        }
    }

    /// Voltage inside the band that counts as a genuine low reading.
    pub fn is_low(&self, volts: f32) -> bool {
        volts > self.noise_floor_volts && volts < self.threshold_volts
    }

    /// Feed one sample taken at `now_ms`.  Returns `true` when an alert
    /// should be sent; the policy then counts it as sent.
    pub fn evaluate(&mut self, volts: f32, now_ms: u64) -> bool {
        if !self.is_low(volts) {
            return false;
        }
        let cooled = now_ms.saturating_sub(self.last_alert_ms) >= self.cooldown_ms;
        if !(self.first_pending || cooled) {
            log::debug!(
                "Low battery {:.2}V suppressed ({} ms into cooldown)",
                volts,
                now_ms.saturating_sub(self.last_alert_ms)
            );
            return false;
        }
        self.first_pending = false;
        self.last_alert_ms = now_ms;
        true
    }

    #[cfg(test)]
    fn last_alert_ms(&self) -> Option<u64> {
        (!self.first_pending).then_some(self.last_alert_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_sample_fires_immediately() {
        let mut policy = AlertPolicy::new(3.4, 0.5, 300_000);
        assert!(policy.evaluate(3.2, 0));
        assert_eq!(policy.last_alert_ms(), Some(0));
    }

    #[test]
    fn cooldown_sequence() {
        let mut policy = AlertPolicy::new(3.4, 0.5, 300_000);
        let fired: Vec<u64> = [(0, 3.2), (10_000, 3.1), (310_001, 3.0)]
            .into_iter()
            .filter(|&(t, v)| policy.evaluate(v, t))
            .map(|(t, _)| t)
            .collect();
        assert_eq!(fired, vec![0, 310_001]);
    }

    #[test]
    fn first_alert_ignores_uptime() {
        // First low reading arrives long after boot; no cooldown applies.
        let mut policy = AlertPolicy::default();
        assert!(policy.evaluate(3.3, 5_000));
        assert!(!policy.evaluate(3.3, 6_000));
    }

    #[test]
    fn healthy_and_noise_readings_are_ignored() {
        let mut policy = AlertPolicy::default();
        assert!(!policy.evaluate(4.1, 0));
        assert!(!policy.evaluate(3.4, 0));
        assert!(!policy.evaluate(0.0, 0));
        assert!(!policy.evaluate(0.5, 0));
        assert_eq!(policy.last_alert_ms(), None);

        // Still armed for the first genuine low reading.
        assert!(policy.evaluate(3.39, 1_000));
    }

    #[test]
    fn exactly_at_cooldown_fires() {
        let mut policy = AlertPolicy::new(3.4, 0.5, 300_000);
        assert!(policy.evaluate(3.0, 1_000));
        assert!(!policy.evaluate(3.0, 300_999));
        assert!(policy.evaluate(3.0, 301_000));
    }
}
