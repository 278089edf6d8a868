use std::time::Duration;

use vidqa_core::severity::UnknownSeverityPolicy;

/// Preset model identifiers offered in the selector. A free-text
/// override is always accepted alongside these.
pub const PRESET_MODELS: &[&str] = &[
    "gemini-1.5-flash",
    "gemini-1.5-pro",
    "gemini-2.0-flash",
];

/// Declared MIME type for uploaded videos. A configuration default, not
/// a validation rule: the remote service sniffs the actual container.
pub const DEFAULT_VIDEO_MIME: &str = "video/mp4";

/// File extensions offered in the video picker. A hint only.
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "avi"];

/// Server configuration loaded from environment variables.
///
/// All fields except the API key have defaults suitable for local
/// development. A missing API key is fatal at startup: no run is
/// possible without it.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// Timeout for ordinary (non-audit) requests in seconds.
    pub request_timeout_secs: u64,
    /// API credential for the remote analysis service.
    pub gemini_api_key: String,
    /// Base URL of the remote analysis service.
    pub gemini_base_url: String,
    /// Model used when the operator has not picked one.
    pub default_model: String,
    /// Pause between remote processing status checks.
    pub poll_interval: Duration,
    /// Upper bound on waiting for remote processing.
    pub poll_max_wait: Duration,
    /// Timeout for the single inference request.
    pub inference_timeout: Duration,
    /// Presentation policy for severity labels outside the vocabulary.
    pub unknown_severity_policy: UnknownSeverityPolicy,
    /// Directory for staged video temp files.
    pub staging_dir: String,
    /// Upper bound on the audit upload body, in bytes.
    pub max_video_bytes: usize,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                    | Default                                        |
    /// |----------------------------|------------------------------------------------|
    /// | `HOST`                     | `0.0.0.0`                                      |
    /// | `PORT`                     | `3000`                                         |
    /// | `CORS_ORIGINS`             | `http://localhost:5173`                        |
    /// | `REQUEST_TIMEOUT_SECS`     | `30`                                           |
    /// | `GEMINI_API_KEY`           | (required)                                     |
    /// | `GEMINI_BASE_URL`          | `https://generativelanguage.googleapis.com`    |
    /// | `DEFAULT_MODEL`            | `gemini-1.5-flash`                             |
    /// | `POLL_INTERVAL_SECS`       | `2`                                            |
    /// | `POLL_MAX_WAIT_SECS`       | `600`                                          |
    /// | `INFERENCE_TIMEOUT_SECS`   | `600`                                          |
    /// | `UNKNOWN_SEVERITY_POLICY`  | `keep` (`keep` \| `fold-into-minor`)           |
    /// | `STAGING_DIR`              | `/tmp/vidqa-staging`                           |
    /// | `MAX_VIDEO_BYTES`          | `536870912` (512 MiB)                          |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        // No run is possible without the credential, so fail fast.
        let gemini_api_key =
            std::env::var("GEMINI_API_KEY").expect("GEMINI_API_KEY must be set");

        let gemini_base_url = std::env::var("GEMINI_BASE_URL")
            .unwrap_or_else(|_| "https://generativelanguage.googleapis.com".into());

        let default_model =
            std::env::var("DEFAULT_MODEL").unwrap_or_else(|_| "gemini-1.5-flash".into());

        let poll_interval = Duration::from_secs(env_u64("POLL_INTERVAL_SECS", 2));
        let poll_max_wait = Duration::from_secs(env_u64("POLL_MAX_WAIT_SECS", 600));
        let inference_timeout = Duration::from_secs(env_u64("INFERENCE_TIMEOUT_SECS", 600));

        let unknown_severity_policy = std::env::var("UNKNOWN_SEVERITY_POLICY")
            .map(|s| {
                UnknownSeverityPolicy::parse(&s)
                    .expect("UNKNOWN_SEVERITY_POLICY must be 'keep' or 'fold-into-minor'")
            })
            .unwrap_or_default();

        let staging_dir =
            std::env::var("STAGING_DIR").unwrap_or_else(|_| "/tmp/vidqa-staging".into());

        let max_video_bytes = env_u64("MAX_VIDEO_BYTES", 512 * 1024 * 1024) as usize;

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            gemini_api_key,
            gemini_base_url,
            default_model,
            poll_interval,
            poll_max_wait,
            inference_timeout,
            unknown_severity_policy,
            staging_dir,
            max_video_bytes,
        }
    }

    /// Timeout for the audit run route: remote processing wait plus the
    /// inference timeout, with slack for upload and parsing.
    pub fn audit_timeout(&self) -> Duration {
        self.poll_max_wait + self.inference_timeout + Duration::from_secs(60)
    }
}

fn env_u64(var: &str, default: u64) -> u64 {
    std::env::var(var)
        .unwrap_or_else(|_| default.to_string())
        .parse()
        .unwrap_or_else(|_| panic!("{var} must be a valid u64"))
}
