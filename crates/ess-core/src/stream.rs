//! Typed items exchanged with the host scheduler over stream ports
//!
//! A signal stream is a header, then data chunks, then an end marker; a
//! stimulus stream mirrors that with stimulation sets in the middle. All
//! items are plain value types copied between components.

use serde::{Deserialize, Serialize};

/// Leading descriptor of a signal stream. Must be the first item sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalHeader {
    pub start: f64,
    pub end: f64,
    /// Number of channels in every following chunk
    pub channel_count: usize,
    /// Number of samples per channel in every following chunk
    pub samples_per_chunk: usize,
    /// Sampling rate in Hz
    pub sampling_rate: f64,
    pub channel_labels: Vec<String>,
}

impl SignalHeader {
    /// Default channel labels: ch0, ch1, ...
    pub fn default_labels(channel_count: usize) -> Vec<String> {
        (0..channel_count).map(|i| format!("ch{}", i)).collect()
    }
}

/// One time-stamped piece of streamed signal.
///
/// The payload is flattened channel-major:
/// `samples[channel * samples_per_chunk + offset]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalChunk {
    pub start: f64,
    pub end: f64,
    pub samples: Vec<f64>,
}

/// Items carried by a signal port
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SignalItem {
    Header(SignalHeader),
    Data(SignalChunk),
    End { start: f64, end: f64 },
}

/// One discrete stimulation event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stimulation {
    /// Numeric stimulation code, resolved from a label at configure time
    pub code: u64,
    /// Time the stimulus occurred, in seconds
    pub onset: f64,
    pub duration: f64,
}

/// Zero or more stimulations covering a time span
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StimulationSet {
    pub start: f64,
    pub end: f64,
    pub stimulations: Vec<Stimulation>,
}

/// Items carried by a stimulus port
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StimulusItem {
    Header { start: f64, end: f64 },
    Set(StimulationSet),
    End { start: f64, end: f64 },
}
