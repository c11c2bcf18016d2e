//! Run reporting: once the loop stops, the run can be saved in its own
//! directory as a human readable report, a tab separated evaluation log
//! and a tab separated log of the surrogate parameters.
use crate::errors::{RemboError, Result};
use crate::objective::ObjectiveFn;
use crate::rembo::Rembo;
use crate::types::{RemboStatus, TerminationReason};

use ndarray::{concatenate, Axis};
use ndarray_npy::write_npy;
use chrono::{DateTime, Duration as TimeDelta, Local};
use csv::WriterBuilder;
use std::fs::File;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Human readable run report
pub const REPORT_FILE: &str = "report.txt";
/// Evaluation log: iteration, objective value and subspace location
pub const EVALUATIONS_FILE: &str = "evaluation.csv";
/// Surrogate parameters at each refit
pub const MODELS_FILE: &str = "model.csv";
/// Subspace samples and objective values as a numpy array [X | Y]
pub const HISTORY_FILE: &str = "rembo_history.npy";
/// Configuration used by the run
pub const CONFIG_FILE: &str = "rembo_config.json";

/// Tab separated log writer
struct TsvWriter<W: Write> {
    out: csv::Writer<W>,
}

impl TsvWriter<File> {
    fn create(path: &Path) -> Result<Self> {
        let out = WriterBuilder::new()
            .delimiter(b'\t')
            .flexible(true)
            .from_path(path)?;
        Ok(TsvWriter { out })
    }
}

impl<W: Write> TsvWriter<W> {
    fn append_row<T: AsRef<[u8]>>(&mut self, fields: &[T]) -> Result<()> {
        self.out.write_record(fields)?;
        Ok(())
    }

    fn finish(mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }
}

fn format_duration(secs: f64) -> String {
    format!("{secs:.4} seconds")
}

impl<O: ObjectiveFn> Rembo<O> {
    /// Name of the run directory: start date, dimensions and subspace dimension
    fn run_name(&self, started: &DateTime<Local>) -> String {
        format!(
            "{} {}D REMBO_{}",
            started.format("%Y-%m-%d %H:%M:%S%.3f"),
            self.config.dim(),
            self.config.subspace_dim()
        )
    }

    /// Text report of the run
    pub fn report(&self) -> Result<String> {
        let best = self.get_best_point()?;
        let n_samples = self.x_data.nrows();
        let n_doe = n_samples - self.n_iters as usize;
        let maximize = self.config.maximize();
        let (eps, max_iter, max_time) = match self.settings.as_ref() {
            Some(s) => (
                s.eps.to_string(),
                s.max_iter.map_or("None".to_string(), |v| v.to_string()),
                s.max_time
                    .map_or("None".to_string(), |v| format_duration(v.as_secs_f64())),
            ),
            None => ("None".to_string(), "None".to_string(), "None".to_string()),
        };
        let evaluator = "sequential";
        let batch_size = 1;

        let mut r: Vec<String> = vec![];
        r.push("---------------------------------- REMBO Report ---------------------------------------".to_string());
        r.push(format!("Date: {}", Local::now().format("%c")));
        r.push(String::new());
        r.push("---------------------------------- Results ---------------------------------------".to_string());
        match self.termination.as_ref() {
            Some(TerminationReason::MaxItersReached) => r.push(format!(
                "Optimization completed: YES, {n_samples} samples collected."
            )),
            Some(reason) => r.push(format!(
                "Optimization completed: NO, {n_samples} samples collected (stopped early: {reason})."
            )),
            None => r.push(format!(
                "Optimization completed: NO, {n_samples} samples collected."
            )),
        }
        r.push(format!("Number initial samples: {n_doe}"));
        r.push(format!("Tolerance: {eps}"));
        r.push(format!("Maximum number of iterations: {max_iter}"));
        r.push(format!("Maximum optimization time: {max_time}"));
        r.push(format!("Optimization time: {}", format_duration(self.elapsed.as_secs_f64())));
        r.push(String::new());
        r.push("--------------------------------- Problem set up ------------------------------------".to_string());
        r.push(format!("Problem name: {}", self.objective.name()));
        r.push(format!("Problem dimension: {}", self.config.dim()));
        r.push(format!(
            "Number noiseless evaluations: {}",
            if self.surrogate_noiseless() { "True" } else { "False" }
        ));
        r.push(format!("Subspace dimension: {}", self.config.subspace_dim()));
        r.push(String::new());
        r.push("------------------------------ Optimization set up ---------------------------------".to_string());
        r.push(format!("Normalized outputs: {}", if self.config.normalize_y() { "stats" } else { "False" }));
        r.push(format!("Model type: {}", self.surrogate_name()));
        r.push(format!("Model update interval: {}", self.config.model_update_interval()));
        r.push(format!("Acquisition type: {}", self.config.acquisition()));
        r.push("Acquisition optimizer: lhs+cobyla".to_string());
        r.push(format!("Evaluator type (batch size): {evaluator} ({batch_size})"));
        r.push(format!("Initial design: {}", self.config.doe_kind()));
        r.push(format!("De-duplication: {}", self.config.de_duplication()));
        r.push(String::new());
        r.push("--------------------------------- Summary ------------------------------------------".to_string());
        r.push(format!("Initial X: {}", self.x_data.slice(ndarray::s![..n_doe, ..])));
        r.push(format!("Initial Y: {}", self.y_data.slice(ndarray::s![..n_doe]).mapv(|v| self.objective.to_caller(v))));
        let kind = if maximize { "maximum" } else { "minimum" };
        r.push(format!("Value at {kind}: {:.20}", best.y));
        r.push(format!("Best found {kind} location: {}", best.x_original));
        r.push(format!("Best found {kind} subspace location: {}", best.x));
        r.push("----------------------------------------------------------------------------------------------".to_string());
        r.push(String::new());
        Ok(r.join("\n"))
    }

    /// Write the evaluation log: one row per sample, minimization oriented values
    fn save_evaluations(&self, path: &Path) -> Result<()> {
        let mut tsv = TsvWriter::create(path)?;
        let mut header = vec!["Iteration".to_string(), "Y".to_string()];
        header.extend((1..=self.config.subspace_dim()).map(|i| format!("var_{i}")));
        tsv.append_row(&header)?;
        for (i, (x, y)) in self.x_data.rows().into_iter().zip(self.y_data.iter()).enumerate() {
            let mut row = vec![(i + 1).to_string(), y.to_string()];
            row.extend(x.iter().map(|v| v.to_string()));
            tsv.append_row(&row)?;
        }
        tsv.finish()
    }

    /// Write the surrogate parameters recorded at each refit
    fn save_models(&self, path: &Path) -> Result<()> {
        let mut tsv = TsvWriter::create(path)?;
        let mut header = vec!["Iteration".to_string()];
        if let Some(first) = self.model_records.first() {
            header.extend(first.names.iter().cloned());
        }
        tsv.append_row(&header)?;
        for record in self.model_records.iter() {
            let mut row = vec![record.iteration.to_string()];
            row.extend(record.values.iter().map(|v| v.to_string()));
            tsv.append_row(&row)?;
        }
        tsv.finish()
    }

    /// Save the stopped run under `<outdir>/<objective name>/<run name>`
    /// and returns the run directory.
    pub fn save(&self, outdir: &str) -> Result<PathBuf> {
        if self.status() != RemboStatus::Stopped {
            return Err(RemboError::InvalidValue(format!(
                "Only a stopped run can be saved, status is {:?}",
                self.status()
            )));
        }
        let parent = Path::new(outdir).join(self.objective.name());
        std::fs::create_dir_all(&parent)?;
        // runs saved within the same millisecond get the next free date
        let mut started = Local::now();
        let dir = loop {
            let dir = parent.join(self.run_name(&started));
            match std::fs::create_dir(&dir) {
                Ok(()) => break dir,
                Err(err) if err.kind() == ErrorKind::AlreadyExists => {
                    started += TimeDelta::milliseconds(1);
                }
                Err(err) => return Err(err.into()),
            }
        };

        std::fs::write(dir.join(REPORT_FILE), self.report()?)?;
        self.save_evaluations(&dir.join(EVALUATIONS_FILE))?;
        self.save_models(&dir.join(MODELS_FILE))?;

        let history = concatenate![
            Axis(1),
            self.x_data.view(),
            self.y_data.view().insert_axis(Axis(1))
        ];
        write_npy(dir.join(HISTORY_FILE), &history)?;
        let json = serde_json::to_string(&self.config)?;
        std::fs::write(dir.join(CONFIG_FILE), json)?;
        Ok(dir)
    }
}
