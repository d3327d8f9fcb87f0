//! Storefront Gateway
//!
//! HTTP JSON backend for a storefront. Every route is a thin adapter over an
//! upstream service; payment signature verification is the one piece with
//! its own correctness contract.
//!
//! # Modules
//!
//! - [`payment`] - Razorpay order creation and signed-order verification
//! - [`catalog`] - Product CRUD (Firestore REST or in-memory)
//! - [`directory`] - User listing from the Firebase identity provider
//! - [`media`] - Image (Cloudinary) and file (Uploadcare) upload proxies
//! - [`google_auth`] - Service account OAuth2 tokens for Google APIs
//! - [`upstream`] - Shared upstream response handling
//! - [`gateway`] - axum router, shared state and error mapping
//! - [`config`] - YAML settings and environment credentials
//! - [`logging`] - tracing subscriber setup

// Configuration - must be first!
pub mod config;
pub mod logging;

// Upstream plumbing
pub mod google_auth;
pub mod upstream;

// Adapters
pub mod catalog;
pub mod directory;
pub mod media;
pub mod payment;

// HTTP surface
pub mod gateway;

// Convenient re-exports at crate root
pub use config::{AppConfig, ConfigError, Credentials, Secret};
pub use gateway::{ApiError, AppState, ErrorKind};
pub use payment::{OrderVerifier, SignedOrderAssertion, Verdict};
pub use upstream::UpstreamError;
