use crate::{
    error::{GenerationError, Result},
    models::ImageRequest,
};
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};

/// One configuration record: a prompt and where its image goes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImageJob {
    pub filename: String,
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_size: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reference_images: Vec<PathBuf>,
}

impl ImageJob {
    pub fn new(filename: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            prompt: prompt.into(),
            aspect_ratio: None,
            image_size: None,
            reference_images: Vec::new(),
        }
    }

    pub fn with_aspect_ratio(mut self, aspect_ratio: impl Into<String>) -> Self {
        self.aspect_ratio = Some(aspect_ratio.into());
        self
    }

    pub fn with_reference(mut self, path: impl Into<PathBuf>) -> Self {
        self.reference_images.push(path.into());
        self
    }
}

/// A named list of jobs sharing an output directory and defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JobSet {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub output_dir: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_size: Option<String>,
    pub jobs: Vec<ImageJob>,
}

impl JobSet {
    pub fn new(name: impl Into<String>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            model: None,
            output_dir: output_dir.into(),
            aspect_ratio: None,
            image_size: None,
            jobs: Vec::new(),
        }
    }

    pub fn with_job(mut self, job: ImageJob) -> Self {
        self.jobs.push(job);
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| GenerationError::Manifest(e.to_string()))
    }

    /// Loads a manifest; relative reference paths are taken from the manifest's directory.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            GenerationError::Manifest(format!("cannot read {}: {}", path.display(), e))
        })?;
        let mut set = Self::from_json_str(&json)?;

        if let Some(base) = path.parent() {
            for job in &mut set.jobs {
                for reference in &mut job.reference_images {
                    if reference.is_relative() {
                        *reference = base.join(&*reference);
                    }
                }
            }
        }

        set.validate()?;
        Ok(set)
    }

    pub fn validate(&self) -> Result<()> {
        if !is_contained(&self.output_dir) {
            return Err(GenerationError::Manifest(format!(
                "output_dir '{}' must be a relative path inside the output root",
                self.output_dir.display()
            )));
        }

        if self.jobs.is_empty() {
            return Err(GenerationError::Manifest(format!(
                "job set '{}' has no jobs",
                self.name
            )));
        }

        for job in &self.jobs {
            if job.filename.trim().is_empty() {
                return Err(GenerationError::Manifest(format!(
                    "job set '{}' contains a job without a filename",
                    self.name
                )));
            }
            if job.prompt.trim().is_empty() {
                return Err(GenerationError::Manifest(format!(
                    "job '{}' has an empty prompt",
                    job.filename
                )));
            }
            if !is_contained(Path::new(&job.filename)) {
                return Err(GenerationError::Manifest(format!(
                    "filename '{}' must stay inside the output directory",
                    job.filename
                )));
            }
        }

        Ok(())
    }

    pub fn target_path(&self, job: &ImageJob, output_root: &Path) -> PathBuf {
        output_root.join(&self.output_dir).join(&job.filename)
    }

    /// Builds the request for `job`, applying set-level defaults and loading references.
    pub fn resolve(&self, job: &ImageJob, output_root: &Path) -> Result<(ImageRequest, PathBuf)> {
        let mut request = ImageRequest::new(job.prompt.trim());
        request.aspect_ratio = job.aspect_ratio.clone().or_else(|| self.aspect_ratio.clone());
        request.image_size = job.image_size.clone().or_else(|| self.image_size.clone());

        for reference in &job.reference_images {
            request = request.with_reference_path(reference)?;
        }

        Ok((request, self.target_path(job, output_root)))
    }
}

/// True when `path` only has plain name components: no root, prefix, `.` or `..`.
fn is_contained(path: &Path) -> bool {
    path.components().all(|c| matches!(c, Component::Normal(_)))
}
