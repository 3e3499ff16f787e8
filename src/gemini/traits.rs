use crate::{
    error::Result,
    models::{GeneratedImage, ImageRequest},
    output,
};
use async_trait::async_trait;
use std::path::Path;

#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Generates one image; `model` overrides the generator's default for this call.
    async fn generate_image(
        &self,
        request: &ImageRequest,
        model: Option<&str>,
    ) -> Result<GeneratedImage>;

    fn default_model(&self) -> &str;

    /// Generates and saves the image at `path`. Nothing is written when generation fails.
    async fn generate_to_file(
        &self,
        request: &ImageRequest,
        model: Option<&str>,
        path: &Path,
    ) -> Result<GeneratedImage> {
        let image = self.generate_image(request, model).await?;
        output::write_image(path, &image.data)?;
        log::info!("💾 Saved: {}", path.display());
        Ok(image)
    }
}
