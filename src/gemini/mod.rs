pub mod image_client;
pub mod traits;

use crate::{
    config::GeminiConfig,
    error::Result,
    models::{GeneratedImage, ImageRequest},
};
use async_trait::async_trait;

pub use image_client::{decode_inline_data, ImageClient};
pub use traits::ImageGenerator;

#[derive(Clone)]
pub struct GeminiClient {
    image_client: ImageClient,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        log::debug!(
            "Gemini client ready: {} (timeout {:?}, {} retries)",
            config.base_url,
            config.timeout,
            config.max_retries
        );

        Ok(Self {
            image_client: ImageClient::new(http, config)?,
        })
    }

    pub fn image(&self) -> &ImageClient {
        &self.image_client
    }
}

#[async_trait]
impl ImageGenerator for ImageClient {
    async fn generate_image(
        &self,
        request: &ImageRequest,
        model: Option<&str>,
    ) -> Result<GeneratedImage> {
        match model {
            Some(model) => self.generate_with_model(request, model).await,
            None => self.generate(request).await,
        }
    }

    fn default_model(&self) -> &str {
        self.model()
    }
}

#[async_trait]
impl ImageGenerator for GeminiClient {
    async fn generate_image(
        &self,
        request: &ImageRequest,
        model: Option<&str>,
    ) -> Result<GeneratedImage> {
        self.image_client.generate_image(request, model).await
    }

    fn default_model(&self) -> &str {
        self.image_client.model()
    }
}
