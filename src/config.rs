use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Missing required environment variable: {0}")]
    MissingEnv(&'static str),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub log_level: String,
    pub log_dir: String,
    pub log_file: String,
    pub use_json: bool,
    pub rotation: String,
    pub gateway: GatewayConfig,
    pub payment: PaymentConfig,
    pub catalog: CatalogConfig,
    pub directory: DirectoryConfig,
    pub media: MediaConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_dir: "./logs".to_string(),
            log_file: "storefront.log".to_string(),
            use_json: false,
            rotation: "daily".to_string(),
            gateway: GatewayConfig::default(),
            payment: PaymentConfig::default(),
            catalog: CatalogConfig::default(),
            directory: DirectoryConfig::default(),
            media: MediaConfig::default(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
    /// Origins allowed by CORS. `*` allows any origin.
    pub cors_origins: Vec<String>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 10000,
            cors_origins: vec!["https://hyjain.netlify.app".to_string()],
        }
    }
}

impl GatewayConfig {
    /// Port precedence: `--port` argument, then `PORT` env var, then YAML.
    pub fn resolve_port(&self, cli_port: Option<u16>, env_port: Option<&str>) -> u16 {
        cli_port
            .or_else(|| env_port.and_then(|p| p.trim().parse().ok()))
            .unwrap_or(self.port)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct PaymentConfig {
    pub api_base: String,
    pub currency: String,
    pub receipt_prefix: String,
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.razorpay.com/v1".to_string(),
            currency: "INR".to_string(),
            receipt_prefix: "order_rcptid_".to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CatalogBackend {
    Firestore,
    Memory,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct CatalogConfig {
    pub backend: CatalogBackend,
    pub api_base: String,
    /// Overrides the project id of the service account key.
    pub project_id: Option<String>,
    pub database: String,
    pub collection: String,
    pub page_size: u32,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            backend: CatalogBackend::Firestore,
            api_base: "https://firestore.googleapis.com/v1".to_string(),
            project_id: None,
            database: "(default)".to_string(),
            collection: "products".to_string(),
            page_size: 300,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct DirectoryConfig {
    pub api_base: String,
    pub max_results: u32,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            api_base: "https://identitytoolkit.googleapis.com/v1".to_string(),
            max_results: 1000,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct MediaConfig {
    pub max_upload_bytes: usize,
    pub cloudinary: CloudinaryConfig,
    pub uploadcare: UploadcareConfig,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: 10 * 1024 * 1024,
            cloudinary: CloudinaryConfig::default(),
            uploadcare: UploadcareConfig::default(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct CloudinaryConfig {
    pub api_base: String,
    pub folder: String,
    pub allowed_formats: Vec<String>,
}

impl Default for CloudinaryConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.cloudinary.com/v1_1".to_string(),
            folder: "hyjain-products".to_string(),
            allowed_formats: ["jpeg", "png", "jpg", "webp"]
                .iter()
                .map(|f| f.to_string())
                .collect(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct UploadcareConfig {
    pub api_base: String,
    /// `UPLOADCARE_STORE` form value: "0", "1" or "auto".
    pub store: String,
}

impl Default for UploadcareConfig {
    fn default() -> Self {
        Self {
            api_base: "https://upload.uploadcare.com".to_string(),
            store: "auto".to_string(),
        }
    }
}

impl AppConfig {
    /// Load `config/{env}.yaml`.
    pub fn load(env: &str) -> Result<Self, ConfigError> {
        Self::load_from_path(format!("config/{}.yaml", env))
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }
}

// ============================================================================
// Credentials (environment only)
// ============================================================================

/// Credential string that never prints its value.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret([REDACTED])")
    }
}

pub mod env_keys {
    pub const RAZORPAY_KEY_ID: &str = "RAZORPAY_KEY_ID";
    pub const RAZORPAY_KEY_SECRET: &str = "RAZORPAY_KEY_SECRET";
    pub const FIREBASE_SERVICE_ACCOUNT_PATH: &str = "FIREBASE_SERVICE_ACCOUNT_PATH";
    pub const CLOUDINARY_CLOUD_NAME: &str = "CLOUDINARY_CLOUD_NAME";
    pub const CLOUDINARY_API_KEY: &str = "CLOUDINARY_API_KEY";
    pub const CLOUDINARY_API_SECRET: &str = "CLOUDINARY_API_SECRET";
    pub const UPLOADCARE_PUBLIC_KEY: &str = "UPLOADCARE_PUBLIC_KEY";
    pub const PORT: &str = "PORT";
}

const DEFAULT_SERVICE_ACCOUNT_PATH: &str = "serviceAccountKey.json";

/// Upstream credentials. Every field except the service account path is required.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub razorpay_key_id: String,
    pub razorpay_key_secret: Secret,
    pub service_account_path: String,
    pub cloudinary_cloud_name: String,
    pub cloudinary_api_key: String,
    pub cloudinary_api_secret: Secret,
    pub uploadcare_public_key: String,
}

impl Credentials {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build credentials from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| -> Result<String, ConfigError> {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::MissingEnv(key))
        };

        Ok(Self {
            razorpay_key_id: required(env_keys::RAZORPAY_KEY_ID)?,
            razorpay_key_secret: Secret::new(required(env_keys::RAZORPAY_KEY_SECRET)?),
            service_account_path: lookup(env_keys::FIREBASE_SERVICE_ACCOUNT_PATH)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_SERVICE_ACCOUNT_PATH.to_string()),
            cloudinary_cloud_name: required(env_keys::CLOUDINARY_CLOUD_NAME)?,
            cloudinary_api_key: required(env_keys::CLOUDINARY_API_KEY)?,
            cloudinary_api_secret: Secret::new(required(env_keys::CLOUDINARY_API_SECRET)?),
            uploadcare_public_key: required(env_keys::UPLOADCARE_PUBLIC_KEY)?,
        })
    }
}
