use crate::{
    gemini::ImageGenerator,
    models::{ImageJob, JobSet},
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, Clone, Serialize)]
pub struct JobOutcome {
    pub filename: String,
    pub path: PathBuf,
    /// Bytes written on success, the failure message otherwise.
    pub result: std::result::Result<usize, String>,
}

impl JobOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub set: String,
    pub outcomes: Vec<JobOutcome>,
}

impl RunReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    pub fn log_summary(&self) {
        log::info!(
            "📊 {}: {} generated, {} failed",
            self.set,
            self.succeeded(),
            self.failed()
        );
        for outcome in &self.outcomes {
            if let Err(message) = &outcome.result {
                log::warn!("   {} - {}", outcome.filename, message);
            }
        }
    }
}

/// Runs the jobs of a set one after another. A failed job never stops the run.
pub struct Runner {
    generator: Arc<dyn ImageGenerator>,
    output_root: PathBuf,
    model: Option<String>,
    only: Vec<String>,
}

impl Runner {
    pub fn new(generator: Arc<dyn ImageGenerator>, output_root: impl Into<PathBuf>) -> Self {
        Self {
            generator,
            output_root: output_root.into(),
            model: None,
            only: Vec::new(),
        }
    }

    /// Model for every job, taking precedence over the set's own model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_filter(mut self, filenames: Vec<String>) -> Self {
        self.only = filenames;
        self
    }

    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    pub async fn run(&self, set: &JobSet) -> RunReport {
        let model = self
            .model
            .as_deref()
            .or(set.model.as_deref())
            .unwrap_or_else(|| self.generator.default_model())
            .to_string();

        let jobs: Vec<&ImageJob> = set
            .jobs
            .iter()
            .filter(|job| self.only.is_empty() || self.only.contains(&job.filename))
            .collect();

        log::info!(
            "🎨 Running '{}' ({} job(s)) with {}",
            set.name,
            jobs.len(),
            model
        );

        let mut outcomes = Vec::with_capacity(jobs.len());
        for job in jobs {
            outcomes.push(self.run_job(set, job, &model).await);
        }

        RunReport {
            set: set.name.clone(),
            outcomes,
        }
    }

    async fn run_job(&self, set: &JobSet, job: &ImageJob, model: &str) -> JobOutcome {
        log::info!("Generating: {}", job.filename);
        let _timer = crate::logger::timer(&job.filename);

        let (path, result) = match set.resolve(job, &self.output_root) {
            Ok((request, path)) => {
                let result = self
                    .generator
                    .generate_to_file(&request, Some(model), &path)
                    .await
                    .map(|image| image.data.len());
                (path, result)
            }
            Err(e) => (set.target_path(job, &self.output_root), Err(e)),
        };

        if let Err(e) = &result {
            log::error!("❌ {} failed: {}", job.filename, e);
        }

        JobOutcome {
            filename: job.filename.clone(),
            path,
            result: result.map_err(|e| e.to_string()),
        }
    }
}
