//! Merges stimulation events into a continuous signal stream
//!
//! Per invocation the merger drains both ports completely, concatenates the
//! arrived signal chunks into one buffer, injects an evoked response at
//! every pending target/non-target stimulation, and re-chunks the result.
//! A short rolling window of recent stimulations is retained across
//! invocations so an event can still hit signal that arrives later.

use crate::processor::{StreamProcessor, Tick};
use ess_core::{
    EssError, EssResult, LabelTable, Settings, SignalChunk, SignalItem, SignalMatrix, Stimulation,
    StimulusItem,
};
use ess_synthesis::evoked::{inject_erp, NON_TARGET_COEFFICIENTS, TARGET_COEFFICIENTS};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};
use uuid::Uuid;

/// Stimulations older than this, relative to the merge window start, are
/// evicted after an injection pass
const EVENT_RETENTION_SECS: f64 = 2.0;

/// Configuration for the ERP merger
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergerConfig {
    pub code_target: u64,
    pub code_non_target: u64,
}

impl MergerConfig {
    pub fn from_settings(settings: &Settings, labels: &LabelTable) -> EssResult<Self> {
        settings.expect_len(2)?;
        Ok(MergerConfig {
            code_target: labels.resolve(settings.get_str("Target stimulation label")?)?,
            code_non_target: labels.resolve(settings.get_str("Non-Target stimulation label")?)?,
        })
    }
}

/// Inputs drained from the merger's two ports for one invocation
#[derive(Debug, Default)]
pub struct MergerInputs {
    pub signal: Vec<SignalItem>,
    pub stimuli: Vec<StimulusItem>,
}

/// Stream component that injects evoked responses at stimulation onsets
pub struct ErpMerger {
    id: Uuid,
    config: MergerConfig,
    channel_count: usize,
    samples_per_chunk: usize,
    sampling_rate: f64,
    /// End time of the last accepted chunk; the next chunk must start here
    last_time: f64,
    /// Rolling window of recent stimulations
    pending: Vec<Stimulation>,
}

impl ErpMerger {
    pub fn new(config: MergerConfig) -> Self {
        ErpMerger {
            id: Uuid::new_v4(),
            config,
            channel_count: 0,
            samples_per_chunk: 0,
            sampling_rate: 0.0,
            last_time: 0.0,
            pending: Vec::new(),
        }
    }

    pub fn from_settings(settings: &Settings, labels: &LabelTable) -> EssResult<Self> {
        Ok(Self::new(MergerConfig::from_settings(settings, labels)?))
    }

    /// Stimulations currently retained for later signal
    pub fn pending_events(&self) -> &[Stimulation] {
        &self.pending
    }
}

impl StreamProcessor for ErpMerger {
    type Inputs = MergerInputs;
    type Outputs = Vec<SignalItem>;

    fn initialize(&mut self, tick: &Tick) -> EssResult<Vec<SignalItem>> {
        self.last_time = tick.now;
        self.pending.clear();
        debug!(id = %self.id, "ERP merger initialized");
        Ok(Vec::new())
    }

    fn process(&mut self, _tick: &Tick, inputs: MergerInputs) -> EssResult<Vec<SignalItem>> {
        if inputs.signal.is_empty() && inputs.stimuli.is_empty() {
            return Ok(Vec::new());
        }

        let mut outputs = Vec::new();
        let merged_start = self.last_time;
        let mut merged: Option<SignalMatrix> = None;

        for item in inputs.signal {
            match item {
                SignalItem::Header(header) => {
                    // Downstream gets the same stream description
                    self.channel_count = header.channel_count;
                    self.samples_per_chunk = header.samples_per_chunk;
                    self.sampling_rate = header.sampling_rate;
                    outputs.push(SignalItem::Header(header));
                }
                SignalItem::Data(chunk) => {
                    if self.channel_count == 0 {
                        return Err(EssError::Processing {
                            message: "signal chunk received before stream header".to_string(),
                        });
                    }
                    if self.last_time != chunk.start {
                        return Err(EssError::ChunkDiscontinuity {
                            expected: self.last_time,
                            actual: chunk.start,
                        });
                    }

                    let matrix = SignalMatrix::from_flat(
                        self.channel_count,
                        self.samples_per_chunk,
                        chunk.samples,
                    )?;
                    match merged.as_mut() {
                        Some(buffer) => buffer.hstack(&matrix)?,
                        None => merged = Some(matrix),
                    }
                    self.last_time = chunk.end;
                }
                end @ SignalItem::End { .. } => outputs.push(end),
            }
        }

        // Working copy: retained window entries first, then this
        // invocation's arrivals, in order
        let mut events = self.pending.clone();
        for item in inputs.stimuli {
            if let StimulusItem::Set(set) = item {
                events.extend(set.stimulations);
            }
        }

        let mut injected = false;
        if let Some(buffer) = merged.as_mut() {
            if !events.is_empty() && !buffer.is_empty() {
                let time_axis = buffer.time_axis(merged_start, self.sampling_rate);

                let mut retained = Vec::new();
                for stimulation in &events {
                    if stimulation.code == self.config.code_target {
                        trace!(onset = stimulation.onset, "injecting target response");
                        let updated =
                            inject_erp(&time_axis, buffer, stimulation.onset, TARGET_COEFFICIENTS)?;
                        *buffer = updated;
                    } else if stimulation.code == self.config.code_non_target {
                        trace!(onset = stimulation.onset, "injecting non-target response");
                        let updated = inject_erp(
                            &time_axis,
                            buffer,
                            stimulation.onset,
                            NON_TARGET_COEFFICIENTS,
                        )?;
                        *buffer = updated;
                    }
                    // Other codes are not injected but still age out below
                    if merged_start - stimulation.onset <= EVENT_RETENTION_SECS {
                        retained.push(stimulation.clone());
                    }
                }
                self.pending = retained;
                injected = true;
            }
        }
        if !injected {
            // Without both signal and events this invocation, the working
            // list replaces the window as-is, skipping the horizon check
            self.pending = events;
        }

        if let Some(buffer) = merged {
            let total = buffer.samples();
            let mut offset = 0;
            while offset < total {
                let width = self.samples_per_chunk.min(total - offset);
                let piece = buffer.slice_cols(offset, offset + width)?;
                let start = merged_start + offset as f64 / self.sampling_rate;
                outputs.push(SignalItem::Data(SignalChunk {
                    start,
                    end: start + width as f64 / self.sampling_rate,
                    samples: piece.into_flat(),
                }));
                offset += width;
            }
        }

        Ok(outputs)
    }

    fn uninitialize(&mut self, _tick: &Tick) -> EssResult<Vec<SignalItem>> {
        debug!(id = %self.id, "ERP merger closed");
        Ok(Vec::new())
    }
}
