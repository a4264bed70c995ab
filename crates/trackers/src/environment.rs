use std::collections::VecDeque;

use log::debug;
use pvtrack_core::{ChangeDetector, Measurement};

use crate::config::EnvironmentConfig;

/// Detects environment changes from rolling power averages and irradiance.
///
/// Power is averaged over a sliding window of samples. Once the window is
/// full every new sample appends its window average to a second rolling list;
/// when the newest average departs from the one `averages` samples earlier by
/// at least `power_change` (relative, either direction) a change is signaled.
/// Independently, an irradiance shift of more than `irradiance_change`
/// relative to the irradiance at lock-in (the first sample after a reset)
/// signals a change immediately.
#[derive(Debug, Clone)]
pub struct EnvironmentMonitor {
    window: usize,
    averages: usize,
    power_change: f64,
    irradiance_change: f64,
    samples: VecDeque<f64>,
    history: VecDeque<f64>,
    lock_irradiance: Option<f64>,
}

impl EnvironmentMonitor {
    #[must_use]
    pub fn new(config: &EnvironmentConfig) -> Self {
        Self {
            window: config.window.max(1),
            averages: config.averages.max(1),
            power_change: config.power_change,
            irradiance_change: config.irradiance_change,
            samples: VecDeque::with_capacity(config.window),
            history: VecDeque::with_capacity(config.averages + 1),
            lock_irradiance: None,
        }
    }

    fn irradiance_shifted(&mut self, irradiance: f64) -> bool {
        let lock = *self.lock_irradiance.get_or_insert(irradiance);
        if lock <= 0.0 {
            return false;
        }
        let shift = (irradiance - lock) / lock;
        if shift.abs() > self.irradiance_change {
            debug!("irradiance moved {shift:+.3} from {lock} W/m² at lock-in");
            return true;
        }
        false
    }

    fn power_shifted(&mut self, power: f64) -> bool {
        self.samples.push_back(power);
        if self.samples.len() > self.window {
            self.samples.pop_front();
        }
        if self.samples.len() < self.window {
            return false;
        }

        #[allow(clippy::cast_precision_loss)]
        let average = self.samples.iter().sum::<f64>() / self.window as f64;
        self.history.push_back(average);
        if self.history.len() <= self.averages {
            return false;
        }

        let Some(oldest) = self.history.pop_front() else {
            return false;
        };
        if oldest <= 0.0 {
            return false;
        }
        let change = (average - oldest) / oldest;
        if change.abs() >= self.power_change {
            debug!("average power moved {change:+.3} from {oldest:.3} W");
            return true;
        }
        false
    }
}

impl ChangeDetector for EnvironmentMonitor {
    fn observe(&mut self, measurement: &Measurement) -> bool {
        // Both histories advance on every sample.
        let irradiance = self.irradiance_shifted(measurement.irradiance);
        let power = self.power_shifted(measurement.power());
        irradiance || power
    }

    fn reset(&mut self) {
        self.samples.clear();
        self.history.clear();
        self.lock_irradiance = None;
    }
}
