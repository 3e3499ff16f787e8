use crate::{
    config::GeminiConfig,
    error::{GenerationError, Result},
    models::{
        wire::{
            GenerateContentRequest, GenerateContentResponse, GenerationConfig, ImageConfig,
            RequestContent, RequestInlineData, RequestPart,
        },
        GeneratedImage, ImageFormat, ImageRequest,
    },
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::time::Instant;
use tokio_retry::{strategy::FixedInterval, RetryIf};

/// Longest slice of an error body kept in `GenerationError::Api`.
pub const ERROR_BODY_LIMIT: usize = 500;

#[derive(Clone)]
pub struct ImageClient {
    http: reqwest::Client,
    config: GeminiConfig,
}

impl ImageClient {
    pub fn new(http: reqwest::Client, config: GeminiConfig) -> Result<Self> {
        config.api_key()?;
        Ok(Self { http, config })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    pub fn build_payload(request: &ImageRequest) -> GenerateContentRequest {
        let mut parts = vec![RequestPart::Text {
            text: request.prompt.clone(),
        }];

        for image in &request.reference_images {
            parts.push(RequestPart::InlineData {
                inline_data: RequestInlineData {
                    mime_type: image.mime_type.clone(),
                    data: STANDARD.encode(&image.data),
                },
            });
        }

        let image_config = if request.aspect_ratio.is_some() || request.image_size.is_some() {
            Some(ImageConfig {
                aspect_ratio: request.aspect_ratio.clone(),
                image_size: request.image_size.clone(),
            })
        } else {
            None
        };

        GenerateContentRequest {
            contents: vec![RequestContent { parts }],
            generation_config: GenerationConfig {
                response_modalities: vec!["TEXT".to_string(), "IMAGE".to_string()],
                image_config,
            },
        }
    }

    pub async fn generate(&self, request: &ImageRequest) -> Result<GeneratedImage> {
        self.generate_with_model(request, &self.config.model).await
    }

    pub async fn generate_with_model(
        &self,
        request: &ImageRequest,
        model: &str,
    ) -> Result<GeneratedImage> {
        request.validate()?;

        let url = self.config.endpoint(model);
        let payload = Self::build_payload(request);
        let strategy = FixedInterval::new(self.config.retry_interval).take(self.config.max_retries);

        log::info!(
            "Generating image with model: {} ({} reference image(s))",
            model,
            request.reference_images.len()
        );
        let start = Instant::now();

        let response = RetryIf::spawn(
            strategy,
            || self.send(&url, &payload),
            |e: &GenerationError| {
                let retry = e.is_transient();
                if retry {
                    log::warn!("Transient failure, retrying: {}", e);
                }
                retry
            },
        )
        .await?;

        let inline = match response.first_inline_image() {
            Some(inline) => inline,
            None => {
                let reason = match (response.block_reason(), response.finish_reason()) {
                    (Some(block), _) => format!("prompt blocked ({})", block),
                    (None, Some(finish)) => format!("no inline image part (finish reason {})", finish),
                    (None, None) if response.candidates.is_empty() => "no candidates".to_string(),
                    (None, None) => "no inline image part".to_string(),
                };
                return Err(GenerationError::NoImage(reason));
            }
        };

        let data = decode_inline_data(&inline.data)?;
        let format = inline
            .mime_type
            .as_deref()
            .and_then(ImageFormat::from_mime_type)
            .or_else(|| ImageFormat::from_magic_bytes(&data))
            .unwrap_or(ImageFormat::Png);

        Ok(GeneratedImage {
            data,
            format,
            model: model.to_string(),
            duration_ms: start.elapsed().as_millis() as u64,
            text: response.text(),
        })
    }

    async fn send(
        &self,
        url: &str,
        payload: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        let response = self
            .http
            .post(url)
            .query(&[("key", self.config.api_key()?)])
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::Api {
                status: status.as_u16(),
                body: truncate(&body, ERROR_BODY_LIMIT),
            });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

/// Decodes an inline image payload. Whitespace inside the payload is ignored.
pub fn decode_inline_data(data: &str) -> Result<Vec<u8>> {
    let compact: String = data.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    STANDARD
        .decode(compact)
        .map_err(|e| GenerationError::Decode(e.to_string()))
}

fn truncate(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}
