//! Random stimulus selection
//!
//! One stimulation per draw, target with probability p, like an unfair
//! coin toss.

use ess_core::stream::Stimulation;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Configuration for random stimulus selection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SamplerConfig {
    /// Code emitted for target stimulations
    pub code_target: u64,
    /// Code emitted for non-target stimulations
    pub code_non_target: u64,
    /// Probability of drawing a target; clamped into [0, 1]
    pub target_probability: f64,
    /// Random seed for reproducibility
    pub seed: Option<u64>,
}

/// Bernoulli stimulus source
pub struct StimulusSampler {
    code_target: u64,
    code_non_target: u64,
    probability: f64,
    rng: StdRng,
}

impl StimulusSampler {
    pub fn new(config: SamplerConfig) -> Self {
        let seed = config.seed.unwrap_or_else(|| {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_secs()
        });

        StimulusSampler {
            code_target: config.code_target,
            code_non_target: config.code_non_target,
            probability: config.target_probability.clamp(0.0, 1.0),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Draw exactly one stimulation stamped at `now`, independent per call
    pub fn sample(&mut self, now: f64) -> Stimulation {
        let code = if self.rng.gen::<f64>() < self.probability {
            self.code_target
        } else {
            self.code_non_target
        };

        Stimulation {
            code,
            onset: now,
            duration: 0.0,
        }
    }

    /// Effective (clamped) target probability
    pub fn probability(&self) -> f64 {
        self.probability
    }
}
