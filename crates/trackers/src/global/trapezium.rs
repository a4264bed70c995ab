use pvtrack_core::{Measurement, SearchInterval, VoltageDomain};

use crate::config::TrapeziumConfig;

use super::{Exploration, Explorer, Handoff, explorer::Sample};

/// One sweep segment and its trapezoidal area.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Segment {
    left: Sample,
    right: Sample,
    area: f64,
}

/// Sweep that bounds the segment of largest trapezoidal area.
///
/// Probes `0, s, 2s, …` like [`VoltageSweep`](super::VoltageSweep), but
/// instead of peaks it integrates the curve segment by segment. The bound is
/// the largest-area segment widened by one stride on each side, and the VMPP
/// estimate is its higher-power endpoint.
#[derive(Debug, Clone)]
pub struct Trapezium {
    domain: VoltageDomain,
    stride: f64,
    cursor: Option<usize>,
    previous: Option<Sample>,
    largest: Option<Segment>,
    integral: f64,
}

impl Trapezium {
    #[must_use]
    pub fn new(domain: VoltageDomain, config: &TrapeziumConfig) -> Self {
        Self {
            domain,
            stride: config.stride,
            cursor: None,
            previous: None,
            largest: None,
            integral: 0.0,
        }
    }

    fn record(&mut self, sample: Sample) {
        if let Some(previous) = self.previous {
            let area = (sample.voltage - previous.voltage) / 2.0 * (sample.power + previous.power);
            self.integral += area;
            if self.largest.is_none_or(|largest| area > largest.area) {
                self.largest = Some(Segment {
                    left: previous,
                    right: sample,
                    area,
                });
            }
        }
        self.previous = Some(sample);
    }

    fn handoff(&self) -> Handoff {
        match self.largest {
            Some(segment) if segment.area > 0.0 => {
                let vmpp = if segment.right.power >= segment.left.power {
                    segment.right.voltage
                } else {
                    segment.left.voltage
                };
                let interval = SearchInterval::clamped(
                    segment.left.voltage - self.stride,
                    segment.right.voltage + self.stride,
                    &self.domain,
                );
                Handoff {
                    vmpp: interval.clamp(vmpp),
                    interval,
                }
            }
            _ => Handoff {
                vmpp: self.domain.max_voltage() / 2.0,
                interval: SearchInterval::full(&self.domain),
            },
        }
    }

    /// Running trapezoidal integral of power over voltage, in W·V.
    #[must_use]
    pub fn integral(&self) -> f64 {
        self.integral
    }
}

impl Explorer for Trapezium {
    fn explore(&mut self, measurement: &Measurement) -> Exploration {
        let Some(index) = self.cursor else {
            self.cursor = Some(0);
            return Exploration::Continue(0.0);
        };
        self.record(Sample::from(measurement));

        let next = index + 1;
        #[allow(clippy::cast_precision_loss)]
        let voltage = next as f64 * self.stride;
        if voltage > self.domain.max_voltage() {
            return Exploration::Complete(self.handoff());
        }
        self.cursor = Some(next);
        Exploration::Continue(voltage)
    }

    fn restart(&mut self) {
        self.cursor = None;
        self.previous = None;
        self.largest = None;
        self.integral = 0.0;
    }

    fn reset(&mut self) {
        self.restart();
    }
}
