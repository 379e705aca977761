//! Application configuration management.

use std::path::PathBuf;

use serde::Deserialize;

/// Application configuration.
///
/// Keys map one-to-one onto unprefixed environment variables (`PORT`,
/// `BASE_URL`, `CLOUDINARY_CLOUD_NAME`, ...).
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Address to bind to.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Public base URL used to build playback links.
    #[serde(default)]
    pub base_url: Option<String>,
    /// Directory holding uploads for the local storage variant.
    #[serde(default = "default_upload_dir")]
    pub upload_dir: PathBuf,
    /// Directory of static assets, including `audio.html`.
    #[serde(default = "default_public_dir")]
    pub public_dir: PathBuf,
    /// Directory containing `admin.html`.
    #[serde(default = "default_admin_dir")]
    pub admin_dir: PathBuf,
    /// Maximum accepted upload size in bytes.
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: u64,
    /// Cloudinary cloud name.
    #[serde(default)]
    pub cloudinary_cloud_name: Option<String>,
    /// Cloudinary API key.
    #[serde(default)]
    pub cloudinary_api_key: Option<String>,
    /// Cloudinary API secret.
    #[serde(default)]
    pub cloudinary_api_secret: Option<String>,
    /// Cloudinary folder uploads are filed under.
    #[serde(default = "default_cloudinary_folder")]
    pub cloudinary_folder: String,
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_upload_dir() -> PathBuf {
    PathBuf::from("uploads")
}

fn default_public_dir() -> PathBuf {
    PathBuf::from("public")
}

fn default_admin_dir() -> PathBuf {
    PathBuf::from("admin")
}

fn default_max_upload_bytes() -> u64 {
    20 * 1024 * 1024 // 20 MiB
}

fn default_cloudinary_folder() -> String {
    "audio-qr".to_string()
}

/// Cloudinary credentials, present only when every variable is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloudinaryConfig {
    /// Cloud name.
    pub cloud_name: String,
    /// API key.
    pub api_key: String,
    /// API secret.
    pub api_secret: String,
    /// Folder uploads are filed under.
    pub folder: String,
}

impl AppConfig {
    /// Loads configuration from config files and the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded or only part of
    /// the Cloudinary credentials are set.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::default())
            .build()?;

        let app: Self = config.try_deserialize()?;
        app.validate()?;
        Ok(app)
    }

    fn validate(&self) -> Result<(), config::ConfigError> {
        let set = [
            &self.cloudinary_cloud_name,
            &self.cloudinary_api_key,
            &self.cloudinary_api_secret,
        ]
        .into_iter()
        .filter(|v| non_blank(v.as_deref()).is_some())
        .count();

        if set != 0 && set != 3 {
            return Err(config::ConfigError::Message(
                "CLOUDINARY_CLOUD_NAME, CLOUDINARY_API_KEY and CLOUDINARY_API_SECRET must be set together"
                    .to_string(),
            ));
        }
        Ok(())
    }

    /// Public base URL without a trailing slash.
    ///
    /// Falls back to `http://localhost:{port}` when `BASE_URL` is unset or blank.
    #[must_use]
    pub fn base_url(&self) -> String {
        non_blank(self.base_url.as_deref()).map_or_else(
            || format!("http://localhost:{}", self.port),
            |url| url.trim_end_matches('/').to_string(),
        )
    }

    /// Socket address string to listen on.
    #[must_use]
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }

    /// Cloudinary settings, or `None` for the local storage variant.
    #[must_use]
    pub fn cloudinary(&self) -> Option<CloudinaryConfig> {
        Some(CloudinaryConfig {
            cloud_name: non_blank(self.cloudinary_cloud_name.as_deref())?.to_string(),
            api_key: non_blank(self.cloudinary_api_key.as_deref())?.to_string(),
            api_secret: non_blank(self.cloudinary_api_secret.as_deref())?.to_string(),
            folder: self.cloudinary_folder.clone(),
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
