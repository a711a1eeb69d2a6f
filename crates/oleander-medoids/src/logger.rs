//! Fit logger: buffers per-phase summary records and writes the log file.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::KMedoidsError;
use crate::stats::SigmaSummary;

/// Observer for per-phase summary statistics.
///
/// Records are buffered during the fit; the log file is created eagerly at
/// construction (surfacing IO failures before any computation) and written in
/// one pass by [`FitLogger::write_profile`]. With `verbosity == 0` every
/// method is a deliberate no-op.
pub(crate) struct FitLogger {
    sink: Option<(PathBuf, BufWriter<File>)>,
    sigma_build: Vec<SigmaSummary>,
    sigma_swap: Vec<SigmaSummary>,
    loss_build: Vec<f64>,
    loss_swap: Vec<f64>,
}

impl FitLogger {
    /// Create a logger. Opens `path` for writing iff `verbosity > 0`.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`KMedoidsError::LogFile`] | `verbosity > 0` and the file cannot be created |
    pub(crate) fn create(verbosity: usize, path: &Path) -> Result<Self, KMedoidsError> {
        let sink = if verbosity > 0 {
            let file = File::create(path).map_err(|source| KMedoidsError::LogFile {
                path: path.to_path_buf(),
                source,
            })?;
            Some((path.to_path_buf(), BufWriter::new(file)))
        } else {
            None
        };
        Ok(Self {
            sink,
            sigma_build: Vec::new(),
            sigma_swap: Vec::new(),
            loss_build: Vec::new(),
            loss_swap: Vec::new(),
        })
    }

    pub(crate) fn record_sigma_build(&mut self, summary: SigmaSummary) {
        if self.sink.is_some() {
            self.sigma_build.push(summary);
        }
    }

    pub(crate) fn record_sigma_swap(&mut self, summary: SigmaSummary) {
        if self.sink.is_some() {
            self.sigma_swap.push(summary);
        }
    }

    pub(crate) fn record_loss_build(&mut self, loss: f64) {
        if self.sink.is_some() {
            self.loss_build.push(loss);
        }
    }

    pub(crate) fn record_loss_swap(&mut self, loss: f64) {
        if self.sink.is_some() {
            self.loss_swap.push(loss);
        }
    }

    /// Write the buffered BUILD and SWAP blocks plus the profile trailer,
    /// then flush and close the file.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`KMedoidsError::LogFile`] | The file cannot be written or flushed |
    pub(crate) fn write_profile(
        mut self,
        build_medoids: &[usize],
        final_medoids: &[usize],
        steps: usize,
        final_loss: f64,
    ) -> Result<(), KMedoidsError> {
        let Some((path, mut file)) = self.sink.take() else {
            return Ok(());
        };

        let result = (|| -> std::io::Result<()> {
            writeln!(file, "BUILD")?;
            for summary in &self.sigma_build {
                writeln!(file, "sigma: {summary}")?;
            }
            for loss in &self.loss_build {
                writeln!(file, "loss: {loss}")?;
            }

            writeln!(file, "SWAP")?;
            for summary in &self.sigma_swap {
                writeln!(file, "sigma: {summary}")?;
            }
            for loss in &self.loss_swap {
                writeln!(file, "loss: {loss}")?;
            }

            writeln!(file, "build medoids: {}", join_indices(build_medoids))?;
            writeln!(file, "final medoids: {}", join_indices(final_medoids))?;
            writeln!(file, "swap steps: {steps}")?;
            writeln!(file, "final loss: {final_loss}")?;
            file.flush()
        })();

        result.map_err(|source| KMedoidsError::LogFile {
            path: path.clone(),
            source,
        })?;

        debug!(path = %path.display(), "fit log written");
        Ok(())
    }
}

fn join_indices(indices: &[usize]) -> String {
    indices
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use crate::stats::SigmaSummary;

    use super::FitLogger;

    #[test]
    fn disabled_logger_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quiet.log");

        let mut logger = FitLogger::create(0, &path).unwrap();
        logger.record_loss_build(1.0);
        logger.write_profile(&[0], &[0], 0, 1.0).unwrap();

        assert!(!path.exists(), "verbosity 0 must not touch the filesystem");
    }

    #[test]
    fn enabled_logger_records_blocks_and_trailer() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fit.log");

        let mut logger = FitLogger::create(1, &path).unwrap();
        logger.record_sigma_build(SigmaSummary::from_samples(&[0.5, 1.0, 1.5]));
        logger.record_loss_build(10.0);
        logger.record_sigma_swap(SigmaSummary::from_samples(&[0.25]));
        logger.record_loss_swap(8.0);
        logger.write_profile(&[2, 7], &[2, 9], 1, 8.0).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("BUILD\n"));
        assert!(contents.contains("SWAP\n"));
        assert!(contents.contains("sigma: min: 0.5, 25th: 0.75, median: 1, 75th: 1.25, max: 1.5, mean: 1"));
        assert!(contents.contains("loss: 10\n"));
        assert!(contents.contains("build medoids: 2 7"));
        assert!(contents.contains("final medoids: 2 9"));
        assert!(contents.contains("swap steps: 1"));
        assert!(contents.contains("final loss: 8"));
    }

    #[test]
    fn unwritable_path_is_an_error() {
        let result = FitLogger::create(1, std::path::Path::new("/nonexistent-dir/fit.log"));
        assert!(result.is_err());
    }
}
