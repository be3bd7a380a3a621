//! Spectral EEG synthesis
//!
//! Background EEG is shaped in the frequency domain: a pink-noise-like
//! decay, alpha and beta band bumps, a mains line at 60 Hz, uniform bin
//! noise, and a random phase per bin, inverted to the time domain with a
//! real inverse FFT.

use ess_core::{EssError, EssResult, SignalMatrix};
use num_complex::Complex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Uniform};
use realfft::{ComplexToReal, RealFftPlanner};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Mains interference frequency in Hz
const LINE_NOISE_HZ: f64 = 60.0;
/// Bins within this distance of the line frequency receive the spike
const LINE_NOISE_TOLERANCE_HZ: f64 = 0.01;

/// Synthesize `channels` x `num_samples` of EEG-like signal.
///
/// Each channel is drawn independently: its one-sided spectrum gets a fixed
/// magnitude profile plus per-bin noise, a uniformly random phase per bin,
/// purely real DC and Nyquist bins, and is then inverse-transformed.
/// Amplitudes come out in microvolt-like units.
pub fn synthesize_eeg(
    channels: usize,
    sample_rate: f64,
    num_samples: usize,
    rng: &mut impl Rng,
) -> EssResult<SignalMatrix> {
    if channels == 0 {
        return Err(EssError::InvalidArgument {
            reason: "channel count must be positive".to_string(),
        });
    }
    if num_samples == 0 {
        return Err(EssError::InvalidArgument {
            reason: "sample count must be positive".to_string(),
        });
    }
    if sample_rate <= 0.0 {
        return Err(EssError::InvalidArgument {
            reason: format!("sampling rate must be positive, got {}", sample_rate),
        });
    }

    // One-sided bin frequencies, 0 Hz up to Nyquist
    let bins = num_samples / 2 + 1;
    let freqs: Vec<f64> = (0..bins)
        .map(|k| k as f64 * sample_rate / num_samples as f64)
        .collect();

    let mut planner = RealFftPlanner::<f64>::new();
    let inverse = planner.plan_fft_inverse(num_samples);

    let bin_noise = Uniform::new(0.0, 0.1);
    let phase = Uniform::new(0.0, 2.0 * PI);

    let mut output = SignalMatrix::zeros(channels, num_samples);
    let mut spectrum = inverse.make_input_vec();
    let mut time_domain = inverse.make_output_vec();

    for ch in 0..channels {
        for (bin, &f) in freqs.iter().enumerate() {
            // Power falls off with frequency, 1/f-like
            let mut magnitude = (-0.1 * f).exp();
            // Alpha band bump around 10 Hz
            magnitude += 0.25 * (-0.5 * (f - 10.0).powi(2)).exp();
            // Beta band bump around 20 Hz
            magnitude += 0.15 * (-0.1 * (f - 20.0).powi(2)).exp();
            // Mains interference as a narrow line
            if (f - LINE_NOISE_HZ).abs() <= LINE_NOISE_TOLERANCE_HZ {
                magnitude += 2.0;
            }
            magnitude += bin_noise.sample(rng);
            // Microvolt-like amplitude scale
            magnitude *= 1e6;

            spectrum[bin] = Complex::from_polar(magnitude, phase.sample(rng));
        }

        // A real-valued inverse transform requires purely real DC and
        // Nyquist bins
        spectrum[0].im = 0.0;
        let last = spectrum.len() - 1;
        spectrum[last].im = 0.0;

        inverse
            .process(&mut spectrum, &mut time_domain)
            .map_err(|e| EssError::Processing {
                message: format!("inverse FFT failed: {}", e),
            })?;

        // realfft leaves the inverse unnormalized
        let scale = 1.0 / num_samples as f64;
        let row = output.channel_mut(ch)?;
        for (sample, &value) in row.iter_mut().zip(time_domain.iter()) {
            *sample = value * scale;
        }
    }

    Ok(output)
}

/// Configuration for the pre-generated background template
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateConfig {
    /// Number of channels to synthesize
    pub channel_count: usize,
    /// Samples handed out per epoch
    pub epoch_samples: usize,
    /// Sampling rate in Hz
    pub sampling_rate: f64,
    /// Epochs of signal generated up front and replayed circularly
    pub epochs: usize,
    /// Random seed for reproducibility
    pub seed: Option<u64>,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            channel_count: 8,
            epoch_samples: 32,
            sampling_rate: 256.0,
            epochs: 1000,
            seed: None,
        }
    }
}

/// Circular source of pre-generated background EEG.
///
/// The template matrix is synthesized once and never mutated afterwards;
/// `next_epoch` hands out consecutive epoch-wide slices, wrapping at the
/// end.
pub struct EegTemplate {
    matrix: SignalMatrix,
    epoch_samples: usize,
    epochs: usize,
    cursor: usize,
}

impl EegTemplate {
    /// Synthesize the full template in one pass
    pub fn generate(config: &TemplateConfig) -> EssResult<Self> {
        if config.epochs == 0 {
            return Err(EssError::InvalidArgument {
                reason: "template must hold at least one epoch".to_string(),
            });
        }

        let seed = config.seed.unwrap_or_else(|| {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_secs()
        });
        let mut rng = StdRng::seed_from_u64(seed);

        let matrix = synthesize_eeg(
            config.channel_count,
            config.sampling_rate,
            config.epochs * config.epoch_samples,
            &mut rng,
        )?;

        Ok(EegTemplate {
            matrix,
            epoch_samples: config.epoch_samples,
            epochs: config.epochs,
            cursor: 0,
        })
    }

    /// Next (channels x epoch_samples) slice, wrapping circularly
    pub fn next_epoch(&mut self) -> EssResult<SignalMatrix> {
        let start = self.cursor * self.epoch_samples;
        let epoch = self.matrix.slice_cols(start, start + self.epoch_samples)?;
        self.cursor = (self.cursor + 1) % self.epochs;
        Ok(epoch)
    }

    pub fn channel_count(&self) -> usize {
        self.matrix.channels()
    }

    pub fn epoch_samples(&self) -> usize {
        self.epoch_samples
    }

    pub fn epochs(&self) -> usize {
        self.epochs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use realfft::RealToComplex;

    #[test]
    fn test_output_shape_and_finiteness() {
        let mut rng = StdRng::seed_from_u64(7);

        for &(channels, rate, samples) in &[(1, 8.0, 4), (2, 128.0, 64), (5, 512.0, 257)] {
            let eeg = synthesize_eeg(channels, rate, samples, &mut rng).unwrap();
            assert_eq!(eeg.channels(), channels);
            assert_eq!(eeg.samples(), samples);
            assert!(eeg.as_flat().iter().all(|v| v.is_finite()));
        }
    }

    #[test]
    fn test_invalid_arguments_rejected() {
        let mut rng = StdRng::seed_from_u64(7);

        assert!(synthesize_eeg(0, 128.0, 64, &mut rng).is_err());
        assert!(synthesize_eeg(2, 128.0, 0, &mut rng).is_err());
        assert!(synthesize_eeg(2, 0.0, 64, &mut rng).is_err());
        assert!(synthesize_eeg(2, -1.0, 64, &mut rng).is_err());
    }

    #[test]
    fn test_seeded_determinism() {
        let mut rng1 = StdRng::seed_from_u64(42);
        let mut rng2 = StdRng::seed_from_u64(42);

        let a = synthesize_eeg(3, 256.0, 128, &mut rng1).unwrap();
        let b = synthesize_eeg(3, 256.0, 128, &mut rng2).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_channels_drawn_independently() {
        let mut rng = StdRng::seed_from_u64(42);
        let eeg = synthesize_eeg(2, 256.0, 128, &mut rng).unwrap();
        assert_ne!(eeg.channel(0).unwrap(), eeg.channel(1).unwrap());
    }

    #[test]
    fn test_line_noise_dominates_neighbour_bins() {
        // 64 samples at 960 Hz puts bin 4 exactly on 60 Hz
        let mut rng = StdRng::seed_from_u64(11);
        let eeg = synthesize_eeg(1, 960.0, 64, &mut rng).unwrap();

        let mut planner = RealFftPlanner::<f64>::new();
        let forward = planner.plan_fft_forward(64);
        let mut input = eeg.channel(0).unwrap().to_vec();
        let mut spectrum = forward.make_output_vec();
        forward.process(&mut input, &mut spectrum).unwrap();

        let line = spectrum[4].norm();
        assert!(line > 10.0 * spectrum[3].norm());
        assert!(line > 10.0 * spectrum[5].norm());
    }

    #[test]
    fn test_template_wraps_circularly() {
        let config = TemplateConfig {
            channel_count: 2,
            epoch_samples: 4,
            sampling_rate: 8.0,
            epochs: 3,
            seed: Some(5),
        };
        let mut template = EegTemplate::generate(&config).unwrap();

        let first = template.next_epoch().unwrap();
        let second = template.next_epoch().unwrap();
        assert_ne!(first, second);

        template.next_epoch().unwrap();
        let wrapped = template.next_epoch().unwrap();
        assert_eq!(first, wrapped);
    }

    #[test]
    fn test_template_is_reproducible() {
        let config = TemplateConfig {
            channel_count: 1,
            epoch_samples: 8,
            sampling_rate: 16.0,
            epochs: 2,
            seed: Some(99),
        };
        let mut a = EegTemplate::generate(&config).unwrap();
        let mut b = EegTemplate::generate(&config).unwrap();
        assert_eq!(a.next_epoch().unwrap(), b.next_epoch().unwrap());
    }
}
