//! Time-locked evoked-response injection
//!
//! An evoked response is modeled as three Gaussian components referenced to
//! the stimulus onset. Every channel receives the identical waveform; there
//! is no per-channel scaling or topology.

use ess_core::{EssError, EssResult, SignalMatrix};

/// Component coefficients for target events
pub const TARGET_COEFFICIENTS: [f64; 3] = [500.0, -700.0, 1250.0];
/// Non-target events carry no late third peak
pub const NON_TARGET_COEFFICIENTS: [f64; 3] = [500.0, -500.0, 0.0];

/// Add an evoked waveform, time-locked to `onset`, onto a copy of `signal`.
///
/// `time_axis` gives the time in seconds of each column of `signal`; its
/// length must match the sample count. The input matrix is left untouched.
pub fn inject_erp(
    time_axis: &[f64],
    signal: &SignalMatrix,
    onset: f64,
    coefs: [f64; 3],
) -> EssResult<SignalMatrix> {
    if signal.channels() == 0 {
        return Err(EssError::InvalidArgument {
            reason: "signal must have at least one channel".to_string(),
        });
    }
    if time_axis.len() != signal.samples() {
        return Err(EssError::InvalidArgument {
            reason: format!(
                "time axis has {} entries for {} samples",
                time_axis.len(),
                signal.samples()
            ),
        });
    }

    let waveform: Vec<f64> = time_axis
        .iter()
        .map(|&time| {
            // Elapsed milliseconds since stimulus onset
            let t = (time - onset) * 1000.0;
            coefs[0] * (-1.25e-3 * (t - 100.0).powi(2)).exp() // peak at 100 ms
                + coefs[1] * (-1.25e-3 * (t - 200.0).powi(2)).exp() // peak at 200 ms
                + coefs[2] * (-6.25e-4 * (t - 300.0).powi(2)).exp() // wider peak at 300 ms
        })
        .collect();

    let mut output = signal.clone();
    for ch in 0..output.channels() {
        let row = output.channel_mut(ch)?;
        for (sample, added) in row.iter_mut().zip(waveform.iter()) {
            *sample += added;
        }
    }

    Ok(output)
}
