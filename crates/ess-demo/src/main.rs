//! Synthetic EEG stream demo
//!
//! Wires the generator and stimulator into the ERP merger and drives the
//! whole graph the way a host scheduler would: one synchronous `process`
//! round per clock tick, paced in real time.

use anyhow::Result;
use ess_core::{ChannelStats, LabelTable, Settings, SignalItem};
use ess_streaming::{EegGenerator, ErpMerger, MergerInputs, RandomStimulator, StreamProcessor, Tick};
use tokio::time::{interval, Duration};
use tracing::info;

const CLOCK_HZ: f64 = 2.0;
const TICKS: usize = 20;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let mut labels = LabelTable::new();
    labels.insert("target", 1);
    labels.insert("non-target", 2);

    let mut generator_settings = Settings::new();
    generator_settings.set("Number of channels", "4");
    generator_settings.set("Samples per epoch", "16");

    let mut stimulator_settings = Settings::new();
    stimulator_settings.set("Target stimulation label", "target");
    stimulator_settings.set("Non-Target stimulation label", "non-target");
    stimulator_settings.set("Target probability", "0.3");

    let mut merger_settings = Settings::new();
    merger_settings.set("Target stimulation label", "target");
    merger_settings.set("Non-Target stimulation label", "non-target");

    let mut generator = EegGenerator::from_settings(&generator_settings)?;
    let mut stimulator = RandomStimulator::from_settings(&stimulator_settings, &labels)?;
    let mut merger = ErpMerger::from_settings(&merger_settings, &labels)?;

    info!(clock_hz = CLOCK_HZ, ticks = TICKS, "starting stream graph");

    let tick0 = Tick::new(0.0, CLOCK_HZ);
    let mut inputs = MergerInputs::default();
    inputs.signal.extend(generator.initialize(&tick0)?);
    inputs.stimuli.extend(stimulator.initialize(&tick0)?);
    merger.initialize(&tick0)?;

    let mut pacer = interval(Duration::from_secs_f64(1.0 / CLOCK_HZ));
    for step in 0..TICKS {
        pacer.tick().await;

        let tick = Tick::new(step as f64 / CLOCK_HZ, CLOCK_HZ);
        inputs.signal.extend(generator.process(&tick, ())?);
        inputs.stimuli.extend(stimulator.process(&tick, ())?);

        let outputs = merger.process(&tick, std::mem::take(&mut inputs))?;
        report(&outputs);
    }

    let stop = Tick::new(TICKS as f64 / CLOCK_HZ, CLOCK_HZ);
    let mut closing = MergerInputs::default();
    closing.signal.extend(generator.uninitialize(&stop)?);
    closing.stimuli.extend(stimulator.uninitialize(&stop)?);
    let outputs = merger.process(&stop, closing)?;
    report(&outputs);
    merger.uninitialize(&stop)?;

    info!("stream graph closed");
    Ok(())
}

fn report(outputs: &[SignalItem]) {
    for item in outputs {
        match item {
            SignalItem::Header(header) => info!(
                channels = header.channel_count,
                sampling_rate = header.sampling_rate,
                "stream header"
            ),
            SignalItem::Data(chunk) => {
                let stats = ChannelStats::calculate(&chunk.samples);
                info!(
                    start = chunk.start,
                    end = chunk.end,
                    "signal chunk: rms {:.1}, peak-to-peak {:.1}",
                    stats.rms,
                    stats.peak_to_peak
                );
            }
            SignalItem::End { end, .. } => info!(time = end, "stream end"),
        }
    }
}
