/// A single sample of the photovoltaic source, taken once per control cycle.
///
/// The driver is expected to let the array settle to the reference voltage
/// emitted on the previous cycle before sampling, so `voltage` is usually
/// close to (but not necessarily equal to) that reference.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(
    feature = "serde-derive",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct Measurement {
    /// Array voltage in V.
    pub voltage: f64,

    /// Array current in A.
    pub current: f64,

    /// Irradiance in W/m².
    pub irradiance: f64,

    /// Cell temperature in °C.
    pub temperature: f64,
}

impl Measurement {
    /// Creates a measurement from its four components.
    #[must_use]
    pub fn new(voltage: f64, current: f64, irradiance: f64, temperature: f64) -> Self {
        Self {
            voltage,
            current,
            irradiance,
            temperature,
        }
    }

    /// Returns the instantaneous array power, `voltage * current`, in W.
    #[must_use]
    pub fn power(&self) -> f64 {
        self.voltage * self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn power_is_voltage_times_current() {
        let m = Measurement::new(12.5, 4.0, 1000.0, 25.0);
        assert_relative_eq!(m.power(), 50.0);
    }

    #[test]
    fn default_is_all_zero() {
        let m = Measurement::default();
        assert_relative_eq!(m.voltage, 0.0);
        assert_relative_eq!(m.current, 0.0);
        assert_relative_eq!(m.power(), 0.0);
    }
}
