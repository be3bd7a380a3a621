//! Host collaboration contract for stream components
//!
//! A host scheduler owns the clock and the port queues. It calls
//! `initialize` once, `process` once per clock tick with the fully drained
//! input queues, then `uninitialize` once. Components are plain structs
//! with no host inheritance; they never block, never spawn concurrency,
//! and return their output items instead of appending into shared buffers.

use ess_core::EssResult;

/// One tick of the host clock
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tick {
    /// Current host time in seconds
    pub now: f64,
    /// Host clock frequency in Hz
    pub clock_hz: f64,
}

impl Tick {
    pub fn new(now: f64, clock_hz: f64) -> Self {
        Tick { now, clock_hz }
    }

    /// Duration of one tick in seconds
    pub fn period(&self) -> f64 {
        1.0 / self.clock_hz
    }

    /// End of the interval this tick covers
    pub fn next(&self) -> f64 {
        self.now + self.period()
    }
}

/// Host-driven lifecycle of a stream component
pub trait StreamProcessor {
    /// Items drained from the component's input ports for one invocation
    type Inputs;
    /// Items to append to the component's output port, in emission order
    type Outputs;

    fn initialize(&mut self, tick: &Tick) -> EssResult<Self::Outputs>;

    fn process(&mut self, tick: &Tick, inputs: Self::Inputs) -> EssResult<Self::Outputs>;

    fn uninitialize(&mut self, tick: &Tick) -> EssResult<Self::Outputs>;
}
