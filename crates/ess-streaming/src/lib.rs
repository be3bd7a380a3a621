//! ESS-Streaming: host-driven stream components
//!
//! The generator, stimulator and merger as [`StreamProcessor`]s: thin,
//! synchronous adapters between the host scheduler's chunk lifecycle and
//! the synthesis algorithms in `ess-synthesis`.

pub mod generator;
pub mod merger;
pub mod processor;
pub mod stimulator;

pub use generator::{EegGenerator, GeneratorConfig};
pub use merger::{ErpMerger, MergerConfig, MergerInputs};
pub use processor::{StreamProcessor, Tick};
pub use stimulator::RandomStimulator;
