//! SignalMatrix: channel-major container for multichannel sample data

use crate::error::{EssError, EssResult};
use serde::{Deserialize, Serialize};

/// Fixed-shape (channels x samples) matrix of real samples.
///
/// Storage is flat channel-major, `data[channel * samples + offset]`, which
/// is also the wire layout of streamed chunk payloads, so flattening and
/// reshaping are cheap. Channel count is fixed once the matrix exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalMatrix {
    channels: usize,
    samples: usize,
    data: Vec<f64>,
}

impl SignalMatrix {
    /// Create a zero-filled matrix of the given shape
    pub fn zeros(channels: usize, samples: usize) -> Self {
        SignalMatrix {
            channels,
            samples,
            data: vec![0.0; channels * samples],
        }
    }

    /// Create a zero-width matrix, the identity for horizontal concatenation
    pub fn empty(channels: usize) -> Self {
        SignalMatrix {
            channels,
            samples: 0,
            data: Vec::new(),
        }
    }

    /// Reshape a flat channel-major payload into a matrix
    pub fn from_flat(channels: usize, samples: usize, data: Vec<f64>) -> EssResult<Self> {
        if data.len() != channels * samples {
            return Err(EssError::InvalidArgument {
                reason: format!(
                    "payload of {} values cannot be reshaped to ({}, {})",
                    data.len(),
                    channels,
                    samples
                ),
            });
        }
        Ok(SignalMatrix {
            channels,
            samples,
            data,
        })
    }

    /// Number of channels (rows)
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Number of samples per channel (columns)
    pub fn samples(&self) -> usize {
        self.samples
    }

    /// Check if the matrix holds no samples
    pub fn is_empty(&self) -> bool {
        self.samples == 0
    }

    /// Borrow one channel's samples
    pub fn channel(&self, index: usize) -> EssResult<&[f64]> {
        if index >= self.channels {
            return Err(EssError::InvalidArgument {
                reason: format!(
                    "channel index {} out of bounds for {} channels",
                    index, self.channels
                ),
            });
        }
        Ok(&self.data[index * self.samples..(index + 1) * self.samples])
    }

    /// Mutably borrow one channel's samples
    pub fn channel_mut(&mut self, index: usize) -> EssResult<&mut [f64]> {
        if index >= self.channels {
            return Err(EssError::InvalidArgument {
                reason: format!(
                    "channel index {} out of bounds for {} channels",
                    index, self.channels
                ),
            });
        }
        Ok(&mut self.data[index * self.samples..(index + 1) * self.samples])
    }

    /// Append another matrix's columns after this one's
    pub fn hstack(&mut self, other: &SignalMatrix) -> EssResult<()> {
        if other.channels != self.channels {
            return Err(EssError::InvalidArgument {
                reason: format!(
                    "cannot concatenate {} channels onto {}",
                    other.channels, self.channels
                ),
            });
        }

        let merged_samples = self.samples + other.samples;
        let mut data = Vec::with_capacity(self.channels * merged_samples);
        for ch in 0..self.channels {
            data.extend_from_slice(&self.data[ch * self.samples..(ch + 1) * self.samples]);
            data.extend_from_slice(&other.data[ch * other.samples..(ch + 1) * other.samples]);
        }

        self.data = data;
        self.samples = merged_samples;
        Ok(())
    }

    /// Copy out the columns in `start..end` as a new matrix
    pub fn slice_cols(&self, start: usize, end: usize) -> EssResult<SignalMatrix> {
        if start > end || end > self.samples {
            return Err(EssError::InvalidArgument {
                reason: format!(
                    "column range {}..{} out of bounds for {} samples",
                    start, end, self.samples
                ),
            });
        }

        let width = end - start;
        let mut data = Vec::with_capacity(self.channels * width);
        for ch in 0..self.channels {
            let row = ch * self.samples;
            data.extend_from_slice(&self.data[row + start..row + end]);
        }

        Ok(SignalMatrix {
            channels: self.channels,
            samples: width,
            data,
        })
    }

    /// Flatten into the channel-major wire payload
    pub fn into_flat(self) -> Vec<f64> {
        self.data
    }

    /// Flat channel-major view of the sample data
    pub fn as_flat(&self) -> &[f64] {
        &self.data
    }

    /// Time axis for this matrix: one entry per column, spaced at the
    /// sampling interval, starting at `start`
    pub fn time_axis(&self, start: f64, sampling_rate: f64) -> Vec<f64> {
        (0..self.samples)
            .map(|i| start + i as f64 / sampling_rate)
            .collect()
    }

    /// Calculate basic statistics for a channel
    pub fn channel_stats(&self, index: usize) -> EssResult<ChannelStats> {
        Ok(ChannelStats::calculate(self.channel(index)?))
    }
}

/// Basic statistics for a signal channel
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelStats {
    pub mean: f64,
    pub rms: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub peak_to_peak: f64,
}

impl ChannelStats {
    pub fn calculate(data: &[f64]) -> Self {
        if data.is_empty() {
            return Self {
                mean: 0.0,
                rms: 0.0,
                std_dev: 0.0,
                min: 0.0,
                max: 0.0,
                peak_to_peak: 0.0,
            };
        }

        let sum: f64 = data.iter().sum();
        let mean = sum / data.len() as f64;

        let sum_sq: f64 = data.iter().map(|x| x * x).sum();
        let rms = (sum_sq / data.len() as f64).sqrt();

        let variance: f64 = data.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / data.len() as f64;
        let std_dev = variance.sqrt();

        let min = data.iter().fold(f64::INFINITY, |a, &b| a.min(b));
        let max = data.iter().fold(f64::NEG_INFINITY, |a, &b| a.max(b));
        let peak_to_peak = max - min;

        Self {
            mean,
            rms,
            std_dev,
            min,
            max,
            peak_to_peak,
        }
    }
}
