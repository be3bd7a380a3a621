//! ESS-Core: Foundation types for synthetic EEG streaming
//!
//! Shared containers and host-facing types for the generator, stimulator
//! and merger components.

pub mod error;
pub mod settings;
pub mod signal;
pub mod stream;

pub use error::{EssError, EssResult};
pub use settings::{LabelTable, Settings};
pub use signal::{ChannelStats, SignalMatrix};
pub use stream::*;
