use super::Sample;

/// Peaks and troughs of a left-to-right sweep.
///
/// A peak is the sample before the first decrease of a rising run; a trough
/// is the sample before the first increase of a falling run. The sweep starts
/// out rising from `(0 V, 0 W)`.
#[derive(Debug, Clone)]
pub(super) struct Ledger {
    peaks: Vec<Sample>,
    troughs: Vec<Sample>,
    previous: Sample,
    increasing: bool,
    rose: bool,
    best: Option<Sample>,
}

impl Ledger {
    pub(super) fn new() -> Self {
        Self {
            peaks: Vec::new(),
            troughs: Vec::new(),
            previous: Sample::new(0.0, 0.0),
            increasing: true,
            rose: false,
            best: None,
        }
    }

    pub(super) fn record(&mut self, sample: Sample) {
        if self.increasing && sample.power < self.previous.power {
            self.peaks.push(self.previous);
            self.increasing = false;
        } else if !self.increasing && sample.power > self.previous.power {
            self.troughs.push(self.previous);
            self.increasing = true;
        }
        if self.increasing && sample.power > self.previous.power {
            self.rose = true;
        }
        if !self.increasing {
            self.rose = false;
        }

        self.best = super::brighter(self.best, sample);
        self.previous = sample;
    }

    /// Closes a run still rising at the end of the sweep as a boundary peak.
    pub(super) fn finish(&mut self) {
        if self.increasing && self.rose {
            self.peaks.push(self.previous);
            self.rose = false;
        }
    }

    pub(super) fn peaks(&self) -> &[Sample] {
        &self.peaks
    }

    pub(super) fn troughs(&self) -> &[Sample] {
        &self.troughs
    }

    pub(super) fn best(&self) -> Option<Sample> {
        self.best
    }

    /// Index of the highest peak; the earliest wins a tie.
    pub(super) fn highest_peak(&self) -> Option<usize> {
        self.peaks
            .iter()
            .enumerate()
            .fold(None, |best: Option<(usize, f64)>, (i, peak)| match best {
                Some((_, power)) if power >= peak.power => best,
                _ => Some((i, peak.power)),
            })
            .map(|(i, _)| i)
    }
}
