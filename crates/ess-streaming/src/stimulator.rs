//! Random stimulation source
//!
//! One stimulation set per clock tick, carrying a single randomly chosen
//! target or non-target stimulation stamped at the tick's start.

use crate::processor::{StreamProcessor, Tick};
use ess_core::{EssResult, LabelTable, Settings, StimulationSet, StimulusItem};
use ess_synthesis::sampler::{SamplerConfig, StimulusSampler};
use tracing::debug;
use uuid::Uuid;

/// Stimulus-producing stream component backed by a [`StimulusSampler`]
pub struct RandomStimulator {
    id: Uuid,
    sampler: StimulusSampler,
}

impl RandomStimulator {
    pub fn new(config: SamplerConfig) -> Self {
        RandomStimulator {
            id: Uuid::new_v4(),
            sampler: StimulusSampler::new(config),
        }
    }

    /// Resolve stimulation labels through the injected table
    pub fn from_settings(settings: &Settings, labels: &LabelTable) -> EssResult<Self> {
        settings.expect_len(3)?;

        let code_target = labels.resolve(settings.get_str("Target stimulation label")?)?;
        let code_non_target = labels.resolve(settings.get_str("Non-Target stimulation label")?)?;
        let target_probability = settings.get_float("Target probability")?;

        Ok(Self::new(SamplerConfig {
            code_target,
            code_non_target,
            target_probability,
            seed: None,
        }))
    }
}

impl StreamProcessor for RandomStimulator {
    type Inputs = ();
    type Outputs = Vec<StimulusItem>;

    fn initialize(&mut self, _tick: &Tick) -> EssResult<Vec<StimulusItem>> {
        debug!(
            id = %self.id,
            probability = self.sampler.probability(),
            "random stimulator initialized"
        );
        Ok(vec![StimulusItem::Header {
            start: 0.0,
            end: 0.0,
        }])
    }

    fn process(&mut self, tick: &Tick, _inputs: ()) -> EssResult<Vec<StimulusItem>> {
        // The tick spacing controls the distance between stimulations
        let stimulation = self.sampler.sample(tick.now);
        Ok(vec![StimulusItem::Set(StimulationSet {
            start: tick.now,
            end: tick.next(),
            stimulations: vec![stimulation],
        })])
    }

    fn uninitialize(&mut self, tick: &Tick) -> EssResult<Vec<StimulusItem>> {
        debug!(id = %self.id, "random stimulator closed");
        Ok(vec![StimulusItem::End {
            start: tick.now,
            end: tick.now,
        }])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stimulator(probability: f64) -> RandomStimulator {
        RandomStimulator::new(SamplerConfig {
            code_target: 1,
            code_non_target: 2,
            target_probability: probability,
            seed: Some(21),
        })
    }

    #[test]
    fn test_lifecycle_markers() {
        let mut s = stimulator(0.5);

        let startup = s.initialize(&Tick::new(0.0, 4.0)).unwrap();
        assert_eq!(startup, vec![StimulusItem::Header { start: 0.0, end: 0.0 }]);

        let closing = s.uninitialize(&Tick::new(3.0, 4.0)).unwrap();
        assert_eq!(closing, vec![StimulusItem::End { start: 3.0, end: 3.0 }]);
    }

    #[test]
    fn test_one_stimulation_per_tick() {
        let mut s = stimulator(1.0);
        s.initialize(&Tick::new(0.0, 4.0)).unwrap();

        let produced = s.process(&Tick::new(0.25, 4.0), ()).unwrap();
        assert_eq!(produced.len(), 1);
        match &produced[0] {
            StimulusItem::Set(set) => {
                assert_eq!(set.start, 0.25);
                assert_eq!(set.end, 0.5);
                assert_eq!(set.stimulations.len(), 1);
                assert_eq!(set.stimulations[0].code, 1);
                assert_eq!(set.stimulations[0].onset, 0.25);
            }
            other => panic!("expected stimulation set, got {:?}", other),
        }
    }

    #[test]
    fn test_from_settings_resolves_labels() {
        let labels = LabelTable::from_pairs(&[("target", 7), ("non-target", 8)]);
        let settings = Settings::from_pairs(&[
            ("Target stimulation label", "target"),
            ("Non-Target stimulation label", "non-target"),
            ("Target probability", "1.0"),
        ]);

        let mut s = RandomStimulator::from_settings(&settings, &labels).unwrap();
        let produced = s.process(&Tick::new(0.0, 1.0), ()).unwrap();
        match &produced[0] {
            StimulusItem::Set(set) => assert_eq!(set.stimulations[0].code, 7),
            other => panic!("expected stimulation set, got {:?}", other),
        }
    }

    #[test]
    fn test_from_settings_unknown_label() {
        let labels = LabelTable::from_pairs(&[("target", 7)]);
        let settings = Settings::from_pairs(&[
            ("Target stimulation label", "target"),
            ("Non-Target stimulation label", "distractor"),
            ("Target probability", "0.5"),
        ]);

        assert!(RandomStimulator::from_settings(&settings, &labels).is_err());
    }
}
