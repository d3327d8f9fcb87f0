use std::sync::Arc;

use tracing::info;

use crate::catalog::{CatalogStore, FirestoreCatalog, MemoryCatalog};
use crate::config::{AppConfig, CatalogBackend, ConfigError, Credentials, PaymentConfig};
use crate::directory::{FirebaseDirectory, UserDirectory};
use crate::google_auth::{
    CLOUD_PLATFORM_SCOPE, ServiceAccountKey, ServiceAccountTokenProvider, TokenSource,
};
use crate::media::{CloudinaryStore, FileStore, ImageStore, UploadcareStore};
use crate::payment::{OrderVerifier, PaymentGateway, RazorpayClient};

/// Shared gateway state: immutable upstream handles built once at startup.
#[derive(Clone)]
pub struct AppState {
    /// Order defaults (currency, receipt prefix)
    pub payment: PaymentConfig,
    pub payments: Arc<dyn PaymentGateway>,
    pub verifier: OrderVerifier,
    pub catalog: Arc<dyn CatalogStore>,
    pub directory: Arc<dyn UserDirectory>,
    pub images: Arc<dyn ImageStore>,
    pub files: Arc<dyn FileStore>,
}

impl AppState {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        payment: PaymentConfig,
        payments: Arc<dyn PaymentGateway>,
        verifier: OrderVerifier,
        catalog: Arc<dyn CatalogStore>,
        directory: Arc<dyn UserDirectory>,
        images: Arc<dyn ImageStore>,
        files: Arc<dyn FileStore>,
    ) -> Self {
        Self {
            payment,
            payments,
            verifier,
            catalog,
            directory,
            images,
            files,
        }
    }

    /// Build every upstream client from configuration and credentials.
    ///
    /// Fails on anything that would make a route unusable: empty payment
    /// secret, unreadable service account key, bad collection URL.
    pub fn from_config(
        config: &AppConfig,
        credentials: &Credentials,
        http: reqwest::Client,
    ) -> Result<Self, ConfigError> {
        let verifier = OrderVerifier::new(&credentials.razorpay_key_secret)?;
        let payments = Arc::new(RazorpayClient::new(
            http.clone(),
            &config.payment.api_base,
            &credentials.razorpay_key_id,
            credentials.razorpay_key_secret.clone(),
        ));

        let key = ServiceAccountKey::from_file(&credentials.service_account_path)?;
        let project_id = config
            .catalog
            .project_id
            .clone()
            .unwrap_or_else(|| key.project_id.clone());
        info!(
            "[gateway] Google project {} via {}",
            project_id, key.client_email
        );
        let tokens: Arc<dyn TokenSource> = Arc::new(ServiceAccountTokenProvider::new(
            http.clone(),
            key,
            CLOUD_PLATFORM_SCOPE,
        )?);

        let catalog: Arc<dyn CatalogStore> = match config.catalog.backend {
            CatalogBackend::Firestore => Arc::new(FirestoreCatalog::new(
                http.clone(),
                tokens.clone(),
                &config.catalog,
                &project_id,
            )?),
            CatalogBackend::Memory => Arc::new(MemoryCatalog::new()),
        };
        info!("[gateway] Catalog backend: {}", catalog.name());

        let directory = Arc::new(FirebaseDirectory::new(
            http.clone(),
            tokens,
            &config.directory,
            &project_id,
        ));

        let images = Arc::new(CloudinaryStore::new(
            http.clone(),
            &config.media.cloudinary,
            &credentials.cloudinary_cloud_name,
            &credentials.cloudinary_api_key,
            credentials.cloudinary_api_secret.clone(),
        ));
        let files = Arc::new(UploadcareStore::new(
            http,
            &config.media.uploadcare,
            &credentials.uploadcare_public_key,
        ));

        Ok(Self::new(
            config.payment.clone(),
            payments,
            verifier,
            catalog,
            directory,
            images,
            files,
        ))
    }
}
