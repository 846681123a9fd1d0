/// Default backend detect endpoint; history and image routes share its base.
pub const DEFAULT_BACKEND_API_URL: &str = "http://localhost:8386/api/v1/detect";

/// 50 MiB, the largest upload or image the gateway will buffer.
pub const DEFAULT_MAX_BODY_BYTES: usize = 50 * 1024 * 1024;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// Inbound request timeout in seconds (default: `60`).
    pub request_timeout_secs: u64,
    /// Backend detect endpoint (`BACKEND_API_URL`).
    pub backend_api_url: String,
    /// Timeout for every outbound backend call in seconds (default: `30`).
    pub backend_timeout_secs: u64,
    /// Base used to turn backend result paths into browser-loadable URLs.
    pub public_api_url: String,
    /// Largest accepted upload body.
    pub max_upload_bytes: usize,
    /// Largest backend image the proxy will buffer.
    pub max_image_bytes: usize,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                                 |
    /// |------------------------|-----------------------------------------|
    /// | `HOST`                 | `0.0.0.0`                               |
    /// | `PORT`                 | `3000`                                  |
    /// | `CORS_ORIGINS`         | `http://localhost:3000`                 |
    /// | `REQUEST_TIMEOUT_SECS` | `60`                                    |
    /// | `BACKEND_API_URL`      | `http://localhost:8386/api/v1/detect`   |
    /// | `BACKEND_TIMEOUT_SECS` | `30`                                    |
    /// | `PUBLIC_API_URL`       | `http://localhost:8386`                 |
    /// | `MAX_UPLOAD_BYTES`     | `52428800`                              |
    /// | `MAX_IMAGE_BYTES`      | `52428800`                              |
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    ///
    /// Panics on unparsable numeric values: misconfiguration should stop the
    /// server at startup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let host = var("HOST", "0.0.0.0");

        let port: u16 = var("PORT", "3000")
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = var("CORS_ORIGINS", "http://localhost:3000")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = var("REQUEST_TIMEOUT_SECS", "60")
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let backend_api_url = var("BACKEND_API_URL", DEFAULT_BACKEND_API_URL);

        let backend_timeout_secs: u64 = var("BACKEND_TIMEOUT_SECS", "30")
            .parse()
            .expect("BACKEND_TIMEOUT_SECS must be a valid u64");

        let public_api_url = var("PUBLIC_API_URL", "http://localhost:8386");

        let max_upload_bytes: usize = var("MAX_UPLOAD_BYTES", &DEFAULT_MAX_BODY_BYTES.to_string())
            .parse()
            .expect("MAX_UPLOAD_BYTES must be a valid usize");

        let max_image_bytes: usize = var("MAX_IMAGE_BYTES", &DEFAULT_MAX_BODY_BYTES.to_string())
            .parse()
            .expect("MAX_IMAGE_BYTES must be a valid usize");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            backend_api_url,
            backend_timeout_secs,
            public_api_url,
            max_upload_bytes,
            max_image_bytes,
        }
    }
}
