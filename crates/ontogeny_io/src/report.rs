//! Anatomical and functional report streams.
//!
//! The anatomical dump is a one-shot (N+1)x(N+1) per-mille strength
//! matrix. The functional dump is a header followed by one line of every
//! neuron's activation per recorded timestep, consumed downstream as a
//! matrix by complexity-analysis tooling. Both run outside the per-step
//! hot path and only when explicitly invoked.

use crate::error::Result;
use ontogeny_core::brain::NeuronModel;
use std::io::Write;

/// Write the anatomical matrix of a grown brain to a file.
pub fn write_anatomical_file(model: &dyn NeuronModel, path: &str) -> Result<()> {
    let file = std::fs::File::create(path)?;
    let mut writer = std::io::BufWriter::new(file);
    model.dump_anatomical(&mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Streams per-step activation snapshots behind a writer.
pub struct FunctionalRecorder<W: Write> {
    writer: W,
    steps: u64,
}

impl<W: Write> FunctionalRecorder<W> {
    /// Write the header line and return the recorder:
    /// `brainFunction <neurons> <inputs> <outputs> <synapses>`.
    pub fn new(mut writer: W, model: &dyn NeuronModel) -> Result<Self> {
        let dims = model.dimensions();
        writeln!(
            writer,
            "brainFunction {} {} {} {}",
            dims.neurons, dims.input_neurons, dims.output_neurons, dims.synapses
        )?;
        Ok(Self { writer, steps: 0 })
    }

    /// Record the current activations as one line.
    pub fn record(&mut self, model: &dyn NeuronModel) -> Result<()> {
        model.dump_functional(&mut self.writer)?;
        self.steps += 1;
        Ok(())
    }

    /// Number of recorded timesteps.
    #[must_use]
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Flush and hand back the writer.
    pub fn finish(mut self) -> Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}
