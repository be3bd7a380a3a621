//! Continuous synthetic EEG source
//!
//! Emits one data chunk per clock tick, sliced circularly from a template
//! pre-generated at initialize time. The sampling rate follows from the
//! host pacing: one chunk of `samples_per_chunk` samples per tick.

use crate::processor::{StreamProcessor, Tick};
use ess_core::{
    EssError, EssResult, Settings, SignalChunk, SignalHeader, SignalItem,
};
use ess_synthesis::spectral::{EegTemplate, TemplateConfig};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

/// Epochs of background signal pre-generated at initialize
const TEMPLATE_EPOCHS: usize = 1000;

/// Configuration for the EEG generator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    pub channel_count: usize,
    pub samples_per_chunk: usize,
    /// Epochs held by the circular template
    pub template_epochs: usize,
    /// Random seed for reproducibility
    pub seed: Option<u64>,
}

impl GeneratorConfig {
    pub fn from_settings(settings: &Settings) -> EssResult<Self> {
        settings.expect_len(2)?;

        let channel_count = settings.get_int("Number of channels")?;
        let samples_per_chunk = settings.get_int("Samples per epoch")?;
        if channel_count <= 0 {
            return Err(EssError::Configuration {
                message: format!("channel count must be positive, got {}", channel_count),
            });
        }
        if samples_per_chunk <= 0 {
            return Err(EssError::Configuration {
                message: format!("samples per epoch must be positive, got {}", samples_per_chunk),
            });
        }

        Ok(GeneratorConfig {
            channel_count: channel_count as usize,
            samples_per_chunk: samples_per_chunk as usize,
            template_epochs: TEMPLATE_EPOCHS,
            seed: None,
        })
    }
}

/// Signal-producing stream component backed by an [`EegTemplate`]
pub struct EegGenerator {
    id: Uuid,
    config: GeneratorConfig,
    sampling_rate: f64,
    template: Option<EegTemplate>,
}

impl EegGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        EegGenerator {
            id: Uuid::new_v4(),
            config,
            sampling_rate: 0.0,
            template: None,
        }
    }

    pub fn from_settings(settings: &Settings) -> EssResult<Self> {
        Ok(Self::new(GeneratorConfig::from_settings(settings)?))
    }

    /// Derived sampling rate; 0 until initialized
    pub fn sampling_rate(&self) -> f64 {
        self.sampling_rate
    }
}

impl StreamProcessor for EegGenerator {
    type Inputs = ();
    type Outputs = Vec<SignalItem>;

    fn initialize(&mut self, tick: &Tick) -> EssResult<Vec<SignalItem>> {
        // One chunk per tick fixes the rate
        self.sampling_rate = self.config.samples_per_chunk as f64 * tick.clock_hz;

        self.template = Some(EegTemplate::generate(&TemplateConfig {
            channel_count: self.config.channel_count,
            epoch_samples: self.config.samples_per_chunk,
            sampling_rate: self.sampling_rate,
            epochs: self.config.template_epochs,
            seed: self.config.seed,
        })?);

        debug!(
            id = %self.id,
            channels = self.config.channel_count,
            sampling_rate = self.sampling_rate,
            "EEG generator initialized"
        );

        Ok(vec![SignalItem::Header(SignalHeader {
            start: 0.0,
            end: 0.0,
            channel_count: self.config.channel_count,
            samples_per_chunk: self.config.samples_per_chunk,
            sampling_rate: self.sampling_rate,
            channel_labels: SignalHeader::default_labels(self.config.channel_count),
        })])
    }

    fn process(&mut self, tick: &Tick, _inputs: ()) -> EssResult<Vec<SignalItem>> {
        let template = self.template.as_mut().ok_or_else(|| EssError::Processing {
            message: "generator processed before initialize".to_string(),
        })?;

        let epoch = template.next_epoch()?;
        Ok(vec![SignalItem::Data(SignalChunk {
            start: tick.now,
            end: tick.next(),
            samples: epoch.into_flat(),
        })])
    }

    fn uninitialize(&mut self, tick: &Tick) -> EssResult<Vec<SignalItem>> {
        debug!(id = %self.id, "EEG generator closed");
        Ok(vec![SignalItem::End {
            start: tick.now,
            end: tick.now,
        }])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> GeneratorConfig {
        GeneratorConfig {
            channel_count: 2,
            samples_per_chunk: 4,
            template_epochs: 10,
            seed: Some(3),
        }
    }

    #[test]
    fn test_config_from_settings() {
        let settings = Settings::from_pairs(&[
            ("Number of channels", "2"),
            ("Samples per epoch", "4"),
        ]);
        let config = GeneratorConfig::from_settings(&settings).unwrap();
        assert_eq!(config.channel_count, 2);
        assert_eq!(config.samples_per_chunk, 4);
        assert_eq!(config.template_epochs, TEMPLATE_EPOCHS);
    }

    #[test]
    fn test_config_rejects_bad_settings() {
        let settings = Settings::from_pairs(&[
            ("Number of channels", "0"),
            ("Samples per epoch", "4"),
        ]);
        assert!(GeneratorConfig::from_settings(&settings).is_err());

        let settings = Settings::from_pairs(&[("Number of channels", "2")]);
        assert!(GeneratorConfig::from_settings(&settings).is_err());
    }

    #[test]
    fn test_header_then_chunks() {
        // 4 samples per chunk at a 2 Hz clock gives an 8 Hz stream
        let mut generator = EegGenerator::new(test_config());
        let tick = Tick::new(0.0, 2.0);

        let startup = generator.initialize(&tick).unwrap();
        assert_eq!(startup.len(), 1);
        match &startup[0] {
            SignalItem::Header(header) => {
                assert_eq!(header.channel_count, 2);
                assert_eq!(header.samples_per_chunk, 4);
                assert_eq!(header.sampling_rate, 8.0);
                assert_eq!(header.channel_labels, vec!["ch0", "ch1"]);
            }
            other => panic!("expected header, got {:?}", other),
        }

        let produced = generator.process(&tick, ()).unwrap();
        match &produced[0] {
            SignalItem::Data(chunk) => {
                assert_eq!(chunk.start, 0.0);
                assert_eq!(chunk.end, 0.5);
                assert_eq!(chunk.samples.len(), 8);
                assert!(chunk.samples.iter().all(|v| v.is_finite()));
            }
            other => panic!("expected data chunk, got {:?}", other),
        }
    }

    #[test]
    fn test_process_before_initialize_fails() {
        let mut generator = EegGenerator::new(test_config());
        let tick = Tick::new(0.0, 2.0);
        assert!(generator.process(&tick, ()).is_err());
    }

    #[test]
    fn test_end_marker_on_shutdown() {
        let mut generator = EegGenerator::new(test_config());
        let start = Tick::new(0.0, 2.0);
        generator.initialize(&start).unwrap();

        let stop = Tick::new(5.0, 2.0);
        let closing = generator.uninitialize(&stop).unwrap();
        assert_eq!(closing, vec![SignalItem::End { start: 5.0, end: 5.0 }]);
    }
}
