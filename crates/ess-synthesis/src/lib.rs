//! ESS-Synthesis: synthetic EEG and stimulus generation
//!
//! The three generator algorithms behind the stream components: spectrally
//! shaped background EEG, time-locked evoked-response injection, and random
//! stimulus selection.

pub mod evoked;
pub mod sampler;
pub mod spectral;

pub use evoked::*;
pub use sampler::*;
pub use spectral::*;
