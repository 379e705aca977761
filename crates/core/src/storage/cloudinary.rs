//! Cloudinary blob store.
//!
//! Audio is filed under Cloudinary's `video` resource type. Uploads are
//! signed; listings use the search API with basic auth.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use serde_json::json;
use sha1::{Digest, Sha1};
use tracing::debug;
use uuid::Uuid;

use super::config::{StorageConfig, StorageProvider};
use super::error::StorageError;
use super::store::BlobStore;
use super::types::{AudioUpload, StoredAudioObject};

/// Default Cloudinary API endpoint.
pub const DEFAULT_API_BASE: &str = "https://api.cloudinary.com";
/// Default Cloudinary delivery endpoint.
pub const DEFAULT_DELIVERY_BASE: &str = "https://res.cloudinary.com";
/// Maximum number of objects a listing returns.
pub const MAX_LIST_RESULTS: u32 = 100;

const RESOURCE_TYPE: &str = "video";

/// Stores uploads in a Cloudinary folder.
pub struct CloudinaryStore {
    client: reqwest::Client,
    cloud_name: String,
    api_key: String,
    api_secret: String,
    folder: String,
    api_base: String,
    delivery_base: String,
    config: StorageConfig,
}

/// Subset of an upload or search resource we rely on.
#[derive(Debug, Deserialize)]
struct Resource {
    public_id: String,
    #[serde(default)]
    format: Option<String>,
    secure_url: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    resources: Vec<Resource>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl CloudinaryStore {
    /// Create the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider is not `Cloudinary` or the HTTP client
    /// cannot be built.
    pub fn from_config(config: StorageConfig) -> Result<Self, StorageError> {
        let StorageProvider::Cloudinary {
            cloud_name,
            api_key,
            api_secret,
            folder,
        } = &config.provider
        else {
            return Err(StorageError::configuration("expected a cloudinary provider"));
        };

        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| StorageError::configuration(e.to_string()))?;

        Ok(Self {
            client,
            cloud_name: cloud_name.clone(),
            api_key: api_key.clone(),
            api_secret: api_secret.clone(),
            folder: folder.trim_matches('/').to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            delivery_base: DEFAULT_DELIVERY_BASE.to_string(),
            config,
        })
    }

    /// Point API calls somewhere else (a proxy or a mock server).
    #[must_use]
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    /// Change the host used to build delivery URLs.
    #[must_use]
    pub fn with_delivery_base(mut self, delivery_base: impl Into<String>) -> Self {
        self.delivery_base = delivery_base.into().trim_end_matches('/').to_string();
        self
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/v1_1/{}/{path}", self.api_base, self.cloud_name)
    }

    fn describe(&self, resource: Resource) -> StoredAudioObject {
        let id = strip_folder(&resource.public_id, &self.folder).to_string();
        let filename = match resource.format.as_deref() {
            Some(format) if !format.is_empty() => format!("{id}.{format}"),
            _ => id.clone(),
        };

        StoredAudioObject {
            id,
            filename,
            retrieval_url: resource.secure_url,
            public_id: Some(resource.public_id),
        }
    }
}

#[async_trait]
impl BlobStore for CloudinaryStore {
    async fn store(&self, upload: AudioUpload) -> Result<StoredAudioObject, StorageError> {
        self.config.validate_upload(&upload)?;

        let public_id = Uuid::new_v4().to_string();
        let timestamp = Utc::now().timestamp().to_string();
        let allowed_formats = self.config.allowed_formats.join(",");
        let params = [
            ("allowed_formats", allowed_formats.as_str()),
            ("folder", self.folder.as_str()),
            ("public_id", public_id.as_str()),
            ("timestamp", timestamp.as_str()),
        ];
        let signature = sign_params(&params, &self.api_secret);

        let file = Part::bytes(upload.bytes.to_vec()).file_name(upload.original_name.clone());
        let mut form = Form::new()
            .part("file", file)
            .text("api_key", self.api_key.clone())
            .text("signature", signature);
        for (key, value) in params {
            form = form.text(key.to_string(), value.to_string());
        }

        let response = self
            .client
            .post(self.endpoint(&format!("{RESOURCE_TYPE}/upload")))
            .multipart(form)
            .send()
            .await?;
        let resource: Resource = parse_response(response).await?;

        debug!(public_id = %resource.public_id, size = upload.size(), "Uploaded to Cloudinary");
        Ok(self.describe(resource))
    }

    async fn list(&self) -> Result<Vec<StoredAudioObject>, StorageError> {
        let body = json!({
            "expression": format!("folder:{}", self.folder),
            "sort_by": [{ "created_at": "desc" }],
            "max_results": MAX_LIST_RESULTS,
        });

        let response = self
            .client
            .post(self.endpoint("resources/search"))
            .basic_auth(&self.api_key, Some(&self.api_secret))
            .json(&body)
            .send()
            .await?;
        let search: SearchResponse = parse_response(response).await?;

        Ok(search
            .resources
            .into_iter()
            .take(MAX_LIST_RESULTS as usize)
            .map(|resource| self.describe(resource))
            .collect())
    }

    fn retrieval_url(&self, id: &str) -> String {
        format!(
            "{}/{}/{RESOURCE_TYPE}/upload/{}/{id}",
            self.delivery_base, self.cloud_name, self.folder
        )
    }

    fn provider_name(&self) -> &'static str {
        self.config.provider.name()
    }
}

/// Decode a JSON body, turning non-2xx responses into `Provider` errors.
async fn parse_response<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, StorageError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json::<T>().await?);
    }

    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorEnvelope>(&text)
        .map(|envelope| envelope.error.message)
        .unwrap_or(text);

    Err(StorageError::Provider {
        status: status.as_u16(),
        message,
    })
}

/// Cloudinary request signature: SHA-1 over the sorted `key=value` pairs
/// joined with `&`, followed directly by the API secret.
fn sign_params(params: &[(&str, &str)], api_secret: &str) -> String {
    let mut sorted = params.to_vec();
    sorted.sort_by(|a, b| a.0.cmp(b.0));

    let to_sign = sorted
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha1::new();
    hasher.update(to_sign.as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}

fn strip_folder<'a>(public_id: &'a str, folder: &str) -> &'a str {
    public_id
        .strip_prefix(folder)
        .and_then(|rest| rest.strip_prefix('/'))
        .unwrap_or(public_id)
}
