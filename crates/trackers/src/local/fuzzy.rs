use pvtrack_core::{History, Measurement, SearchInterval, VoltageDomain};

use crate::config::FuzzyConfig;

use super::LocalSearch;

/// Linguistic terms for the percentage change in power.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PowerTerm {
    NegativeBig,
    NegativeSmall,
    Zero,
    PositiveSmall,
    PositiveBig,
}

/// Linguistic terms for the percentage change in current.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CurrentTerm {
    Negative,
    Zero,
    Positive,
}

/// Output terms; each maps to a fraction of the controller's voltage limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shift {
    NegativeSmall,
    Zero,
    PositiveSmall,
    PositiveBig,
}

impl PowerTerm {
    /// Classifies `percent` into `(lo, hi]` bins; values outside every bin
    /// are `Zero`.
    fn classify(percent: f64) -> Self {
        const BINS: [(f64, f64, PowerTerm); 5] = [
            (-100.0, -10.0, PowerTerm::NegativeBig),
            (-10.0, -3.0, PowerTerm::NegativeSmall),
            (-3.0, 3.0, PowerTerm::Zero),
            (3.0, 10.0, PowerTerm::PositiveSmall),
            (10.0, 100.0, PowerTerm::PositiveBig),
        ];
        BINS.iter()
            .find(|(lo, hi, _)| percent > *lo && percent <= *hi)
            .map_or(Self::Zero, |(_, _, term)| *term)
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl CurrentTerm {
    /// Classifies `percent` into `(lo, hi]` bins; values outside every bin
    /// are `Zero`.
    fn classify(percent: f64) -> Self {
        const BINS: [(f64, f64, CurrentTerm); 3] = [
            (-100.0, -1.0, CurrentTerm::Negative),
            (-1.0, 1.0, CurrentTerm::Zero),
            (1.0, 100.0, CurrentTerm::Positive),
        ];
        BINS.iter()
            .find(|(lo, hi, _)| percent > *lo && percent <= *hi)
            .map_or(Self::Zero, |(_, _, term)| *term)
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl Shift {
    fn fraction(self) -> f64 {
        match self {
            Self::NegativeSmall => -0.01,
            Self::Zero => 0.0,
            Self::PositiveSmall => 0.01,
            Self::PositiveBig => 0.05,
        }
    }
}

/// Rule table indexed by `[current term][power term]`.
const RULES: [[Shift; 5]; 3] = {
    use Shift::{NegativeSmall as NS, PositiveBig as PB, PositiveSmall as PS, Zero as ZE};
    [
        [NS, NS, NS, PS, PB],
        [PS, PS, ZE, PS, PB],
        [PB, PS, PS, NS, NS],
    ]
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cycle {
    /// No history yet; emit the probe voltage.
    Probe,
    Running,
}

/// Two-input fuzzy controller on the percentage changes in power and current.
///
/// The first cycle emits the configured probe voltage. Afterwards both
/// changes are normalized against rated maxima, classified into linguistic
/// terms, and the rule table selects a voltage shift. Outputs at or above the
/// controller's voltage limit are pulled just below it.
#[derive(Debug, Clone)]
pub struct FuzzyLogic {
    domain: VoltageDomain,
    interval: SearchInterval,
    history: History,
    cycle: Cycle,
    min_voltage: f64,
    max_voltage: f64,
    max_power: f64,
    max_current: f64,
}

impl FuzzyLogic {
    #[must_use]
    pub fn new(domain: VoltageDomain, config: &FuzzyConfig, num_cells: u32) -> Self {
        let cells = f64::from(num_cells);
        Self {
            domain,
            interval: SearchInterval::full(&domain),
            history: History::new(),
            cycle: Cycle::Probe,
            min_voltage: config.min_voltage,
            max_voltage: config.max_voltage_per_cell * cells,
            max_power: config.max_power_per_cell * cells,
            max_current: config.max_current,
        }
    }

    fn shift(&self, measurement: &Measurement) -> f64 {
        let delta = self.history.delta(measurement);
        let power = PowerTerm::classify(delta.power * 100.0 / self.max_power);
        let current = CurrentTerm::classify(delta.current * 100.0 / self.max_current);
        RULES[current.index()][power.index()].fraction() * self.max_voltage
    }
}

impl LocalSearch for FuzzyLogic {
    fn next_reference(&mut self, measurement: &Measurement) -> f64 {
        let v = match self.cycle {
            Cycle::Probe => {
                self.cycle = Cycle::Running;
                self.min_voltage
            }
            Cycle::Running => measurement.voltage + self.shift(measurement),
        };
        self.history.record(measurement);

        if v >= self.max_voltage {
            self.max_voltage - 0.01
        } else {
            v
        }
    }

    fn setup(&mut self, _vmpp: f64, interval: SearchInterval) {
        self.interval = interval;
    }

    fn prime(&mut self, measurement: &Measurement) {
        self.history.record(measurement);
        self.cycle = Cycle::Running;
    }

    fn reset(&mut self) {
        self.interval = SearchInterval::full(&self.domain);
        self.history = History::new();
        self.cycle = Cycle::Probe;
    }

    fn interval(&self) -> SearchInterval {
        self.interval
    }
}
