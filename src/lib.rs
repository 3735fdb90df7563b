//! Tideway Types - request data types for Axum handlers
//!
//! Query strings, form fields, cookies and uploads reach a handler as text
//! and blobs. Tideway Types describes them with schemas that accept that
//! wire form, decode it into typed values and encode it back.
//!
//! # Features
//!
//! - **Coercing types**: numeric strings, boolean strings, dates in ISO,
//!   verbose and short grammars, and JSON objects packed into one field
//! - **Uploads**: `File` and `Files` with size and MIME checks
//! - **Cookies**: object schemas carrying signing and cookie directives
//! - **Formats**: a registry of string formats, bootstrapped once per process
//! - **Errors**: validation failures render as `422` JSON responses
//!
//! # Quick Start
//!
//! ```rust
//! use tideway_types::{Value, http::parse_query, t};
//! use tideway_types::schema::{NumberOptions, ObjectOptions};
//!
//! let t = t();
//! let schema = t.object(
//!     [
//!         ("page", t.numeric(NumberOptions::default().minimum(1.0))),
//!         ("archived", t.maybe_empty(t.boolean_string())),
//!     ],
//!     ObjectOptions::default(),
//! );
//!
//! let query = parse_query("?page=3&archived=false").unwrap();
//! let decoded = t.decode(&schema, query).unwrap();
//! assert_eq!(decoded.get("page"), Some(&Value::Number(3.0)));
//! assert_eq!(decoded.get("archived"), Some(&Value::Bool(false)));
//! ```

mod config;
mod error;
pub mod formats;
pub mod http;
pub mod registry;
pub mod schema;
pub mod types;
pub mod utils;

pub use config::{LoggingConfig, TypesConfig, TypesConfigBuilder};
pub use error::{Result, TypesError, ValidationError};
pub use formats::DateOrder;
pub use registry::{FormatRegistry, TypeRegistry};
pub use schema::{FileBlob, Issue, Schema, Value};
pub use types::{
    CookieOptions, CookieSchemaOptions, FileOptions, FileSize, FilesOptions, TypeBuilder, t,
};

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing/logging with sensible defaults
///
/// # Environment Variables
///
/// - `RUST_LOG`: Set log level (e.g., "info", "tideway_types=debug")
/// - `TIDEWAY_LOG_JSON`: Set to "true" for JSON formatted logs
///
/// Does nothing if a global subscriber is already installed.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json_logs = utils::get_env_with_prefix("LOG_JSON")
        .map(|v| v.parse::<bool>().unwrap_or(false))
        .unwrap_or(false);

    install(env_filter, json_logs);
}

/// Initialize tracing from a [`TypesConfig`]
pub fn init_tracing_with_config(config: &TypesConfig) {
    install(EnvFilter::new(&config.logging.level), config.logging.json);
}

fn install(env_filter: EnvFilter, json: bool) {
    let result = if json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .try_init()
    };

    if let Err(e) = result {
        tracing::debug!(error = %e, "Tracing subscriber already installed");
    }
}
