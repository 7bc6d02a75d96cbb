//! Cloudinary uploader for rendered receipts
//!
//! Uses the unsigned upload API: the upload preset configured in the
//! Cloudinary console decides folder and access rules.

use crate::{ClientError, ClientResult};
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use shared::UploadedFile;

const CLOUDINARY_API: &str = "https://api.cloudinary.com/v1_1";

#[derive(Debug, Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub upload_preset: String,
    /// Optional folder for uploaded receipts
    pub folder: Option<String>,
    pub timeout: u64,
}

impl CloudinaryConfig {
    pub fn new(cloud_name: impl Into<String>, upload_preset: impl Into<String>) -> Self {
        Self {
            cloud_name: cloud_name.into(),
            upload_preset: upload_preset.into(),
            folder: None,
            timeout: 60,
        }
    }

    pub fn with_folder(mut self, folder: impl Into<String>) -> Self {
        self.folder = Some(folder.into());
        self
    }

    /// Raw upload endpoint (receipts are HTML or ESC/POS, not images)
    pub fn endpoint(&self) -> String {
        format!("{}/{}/raw/upload", CLOUDINARY_API, self.cloud_name)
    }
}

#[derive(serde::Deserialize)]
struct UploadResponse {
    secure_url: Option<String>,
    url: Option<String>,
    public_id: String,
}

#[derive(serde::Deserialize)]
struct CloudinaryErrorBody {
    error: CloudinaryErrorMessage,
}

#[derive(serde::Deserialize)]
struct CloudinaryErrorMessage {
    message: String,
}

#[derive(Debug, Clone)]
pub struct CloudinaryUploader {
    client: Client,
    config: CloudinaryConfig,
}

impl CloudinaryUploader {
    pub fn new(config: CloudinaryConfig) -> ClientResult<Self> {
        if config.cloud_name.trim().is_empty() || config.upload_preset.trim().is_empty() {
            return Err(ClientError::Config(
                "Cloudinary cloud name and upload preset are required".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &CloudinaryConfig {
        &self.config
    }

    /// Upload a file and return its public URL and storage id
    pub async fn upload(
        &self,
        data: Vec<u8>,
        file_name: &str,
        content_type: &str,
    ) -> ClientResult<UploadedFile> {
        let part = Part::bytes(data)
            .file_name(file_name.to_string())
            .mime_str(content_type)?;

        let mut form = Form::new()
            .part("file", part)
            .text("upload_preset", self.config.upload_preset.clone());
        if let Some(folder) = &self.config.folder {
            form = form.text("folder", folder.clone());
        }

        let response = self
            .client
            .post(self.config.endpoint())
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            let message = serde_json::from_str::<CloudinaryErrorBody>(&text)
                .map(|b| b.error.message)
                .unwrap_or(text);
            tracing::warn!(status = %status, error = %message, "Cloudinary upload rejected");
            return Err(ClientError::Server {
                status: status.as_u16(),
                message,
            });
        }

        let body: UploadResponse = serde_json::from_str(&text)?;
        let url = body
            .secure_url
            .or(body.url)
            .ok_or_else(|| ClientError::InvalidResponse("Upload response has no URL".into()))?;

        tracing::info!(public_id = %body.public_id, "Receipt uploaded");
        Ok(UploadedFile {
            url,
            public_id: body.public_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint() {
        let config = CloudinaryConfig::new("demo", "unsigned_bills").with_folder("bills");
        assert_eq!(
            config.endpoint(),
            "https://api.cloudinary.com/v1_1/demo/raw/upload"
        );
        assert_eq!(config.folder.as_deref(), Some("bills"));
    }

    #[test]
    fn test_requires_credentials() {
        let err = CloudinaryUploader::new(CloudinaryConfig::new("", "preset")).unwrap_err();
        assert!(matches!(err, ClientError::Config(_)));
        assert!(CloudinaryUploader::new(CloudinaryConfig::new("demo", "preset")).is_ok());
    }
}
