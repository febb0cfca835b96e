//! Butterworth high-pass design over biquad sections.

use std::f64::consts::PI;

use biquad::{Biquad, Coefficients, DirectForm2Transposed, Errors, Type};
use slideshow_common::error::{SlideshowError, SlideshowResult};

/// A digital Butterworth high-pass filter.
///
/// An order-`n` design is `n / 2` cascaded second-order sections sharing the
/// cutoff, each with the pole-pair Q of the analog prototype. At or above
/// Nyquist the design has no sections and passes samples through unchanged.
#[derive(Debug, Clone)]
pub struct HighPassFilter {
    cutoff_hz: f64,
    sample_rate: u32,
    order: usize,
    sections: Vec<Coefficients<f64>>,
}

/// Q of each second-order section of an order-`order` Butterworth filter.
pub fn section_qs(order: usize) -> Vec<f64> {
    let n = order as f64;
    (1..=order / 2)
        .map(|k| {
            let theta = PI * (2.0 * k as f64 - 1.0) / (2.0 * n);
            1.0 / (2.0 * theta.cos())
        })
        .collect()
}

impl HighPassFilter {
    pub fn design(cutoff_hz: f64, sample_rate: u32, order: usize) -> SlideshowResult<Self> {
        if order == 0 || order % 2 != 0 {
            return Err(SlideshowError::filter(format!(
                "Filter order must be a positive even number, got {order}"
            )));
        }

        if sample_rate == 0 {
            return Err(SlideshowError::filter("Sample rate must be positive"));
        }
        if !(cutoff_hz.is_finite() && cutoff_hz > 0.0) {
            return Err(SlideshowError::filter(format!(
                "Cutoff must be a positive frequency, got {cutoff_hz} Hz"
            )));
        }

        // Fraction of Nyquist; biquad rejects values at or above 1.
        let normalized = cutoff_hz / (f64::from(sample_rate) / 2.0);

        let mut sections = Vec::with_capacity(order / 2);
        for q in section_qs(order) {
            match Coefficients::<f64>::from_normalized_params(Type::HighPass, normalized, q) {
                Ok(coefficients) => sections.push(coefficients),
                Err(Errors::OutsideNyquist) => {
                    tracing::warn!(
                        cutoff_hz,
                        sample_rate,
                        "Cutoff is at or above Nyquist; audio will pass through unfiltered"
                    );
                    sections.clear();
                    break;
                }
                Err(e) => {
                    return Err(SlideshowError::filter(format!(
                        "Cannot design high-pass at {cutoff_hz} Hz: {e:?}"
                    )))
                }
            }
        }

        Ok(Self {
            cutoff_hz,
            sample_rate,
            order,
            sections,
        })
    }

    pub fn cutoff_hz(&self) -> f64 {
        self.cutoff_hz
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn order(&self) -> usize {
        self.order
    }

    pub fn sections(&self) -> &[Coefficients<f64>] {
        &self.sections
    }

    pub fn is_passthrough(&self) -> bool {
        self.sections.is_empty()
    }

    /// Cutoff as a fraction of Nyquist.
    pub fn normalized_cutoff(&self) -> f64 {
        self.cutoff_hz / (f64::from(self.sample_rate) / 2.0)
    }

    /// Expanded `(b, a)` polynomials of the whole cascade, `a[0] == 1`.
    pub fn transfer_function(&self) -> (Vec<f64>, Vec<f64>) {
        let mut b = vec![1.0];
        let mut a = vec![1.0];
        for s in &self.sections {
            b = convolve(&b, &[s.b0, s.b1, s.b2]);
            a = convolve(&a, &[1.0, s.a1, s.a2]);
        }
        (b, a)
    }

    /// Filter one channel from zero initial state.
    pub fn apply(&self, samples: &[f64]) -> Vec<f64> {
        let mut stages: Vec<DirectForm2Transposed<f64>> = self
            .sections
            .iter()
            .map(|coefficients| DirectForm2Transposed::<f64>::new(*coefficients))
            .collect();

        samples
            .iter()
            .map(|&x| stages.iter_mut().fold(x, |acc, stage| stage.run(acc)))
            .collect()
    }
}

fn convolve(x: &[f64], y: &[f64]) -> Vec<f64> {
    let mut out = vec![0.0; x.len() + y.len() - 1];
    for (i, xi) in x.iter().enumerate() {
        for (j, yj) in y.iter().enumerate() {
            out[i + j] += xi * yj;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use biquad::Q_BUTTERWORTH_F64;

    fn sine(freq: f64, sample_rate: u32, len: usize) -> Vec<f64> {
        let fs = f64::from(sample_rate);
        (0..len)
            .map(|n| (2.0 * PI * freq * n as f64 / fs).sin())
            .collect()
    }

    fn rms(samples: &[f64]) -> f64 {
        (samples.iter().map(|s| s * s).sum::<f64>() / samples.len() as f64).sqrt()
    }

    #[test]
    fn test_matches_reference_fourth_order_design() {
        let filter = HighPassFilter::design(300.0, 16000, 4).unwrap();
        assert!((filter.normalized_cutoff() - 0.0375).abs() < 1e-12);
        assert_eq!(filter.sections().len(), 2);

        let expected_b = [
            0.8572460847956744,
            -3.4289843391826977,
            5.143476508774047,
            -3.4289843391826977,
            0.8572460847956744,
        ];
        let expected_a = [
            1.0,
            -3.692234260584912,
            5.123180777314518,
            -3.1656514688263417,
            0.7348708500050211,
        ];

        let (b, a) = filter.transfer_function();
        assert_eq!(b.len(), 5);
        assert_eq!(a.len(), 5);
        for (got, want) in b.iter().zip(expected_b) {
            assert!((got - want).abs() < 1e-9, "b: {got} vs {want}");
        }
        for (got, want) in a.iter().zip(expected_a) {
            assert!((got - want).abs() < 1e-9, "a: {got} vs {want}");
        }
    }

    #[test]
    fn test_section_qs() {
        let q2 = section_qs(2);
        assert_eq!(q2.len(), 1);
        assert!((q2[0] - Q_BUTTERWORTH_F64).abs() < 1e-12);

        let q4 = section_qs(4);
        assert!((q4[0] - 0.541196100146197).abs() < 1e-12);
        assert!((q4[1] - 1.3065629648763766).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_low_frequencies_and_keeps_passband() {
        let filter = HighPassFilter::design(300.0, 16000, 4).unwrap();

        let rumble = filter.apply(&sine(50.0, 16000, 16000));
        let tail = &rumble[8000..];
        assert!(tail.iter().all(|s| s.abs() < 0.01));

        let voice = filter.apply(&sine(2000.0, 16000, 16000));
        let gain = rms(&voice[8000..]) / std::f64::consts::FRAC_1_SQRT_2;
        assert!((gain - 1.0).abs() < 0.02, "passband gain {gain}");
    }

    #[test]
    fn test_removes_dc_offset() {
        let filter = HighPassFilter::design(300.0, 48000, 4).unwrap();
        let out = filter.apply(&vec![0.5; 48000]);
        assert!(out[47999].abs() < 1e-6);
    }

    #[test]
    fn test_attenuates_one_octave_below_cutoff() {
        let filter = HighPassFilter::design(300.0, 16000, 4).unwrap();
        let out = filter.apply(&sine(100.0, 16000, 16000));
        let peak = out[8000..].iter().fold(0.0f64, |acc, s| acc.max(s.abs()));
        assert!(peak < 0.05, "100 Hz peak after filter {peak}");
    }

    #[test]
    fn test_at_or_above_nyquist_passes_through() {
        for cutoff in [8000.0, 9000.0, 12000.0, 31000.0] {
            let filter = HighPassFilter::design(cutoff, 16000, 4).unwrap();
            assert!(filter.is_passthrough(), "cutoff {cutoff}");
            assert_eq!(filter.transfer_function(), (vec![1.0], vec![1.0]));

            let input = sine(440.0, 16000, 64);
            assert_eq!(filter.apply(&input), input);
        }
    }

    #[test]
    fn test_just_below_nyquist_still_filters() {
        let filter = HighPassFilter::design(7900.0, 16000, 4).unwrap();
        assert!(!filter.is_passthrough());
    }

    #[test]
    fn test_rejects_non_positive_cutoff_and_sample_rate() {
        for (cutoff, rate) in [(0.0, 16000), (-50.0, 16000), (f64::NAN, 16000), (300.0, 0)] {
            let err = HighPassFilter::design(cutoff, rate, 4).unwrap_err();
            assert!(matches!(err, SlideshowError::Filter { .. }));
        }
    }

    #[test]
    fn test_odd_or_zero_order_is_rejected() {
        for order in [0, 3] {
            let err = HighPassFilter::design(300.0, 16000, order).unwrap_err();
            assert!(matches!(err, SlideshowError::Filter { .. }));
        }
    }

    #[test]
    fn test_empty_input() {
        let filter = HighPassFilter::design(300.0, 16000, 4).unwrap();
        assert!(filter.apply(&[]).is_empty());
    }
}
