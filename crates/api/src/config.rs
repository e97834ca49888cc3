use copypanda_events::registry::DEFAULT_RETENTION_SECS;
use copypanda_pipeline::coordinator::DEFAULT_SECTION_CONCURRENCY;
use copypanda_pipeline::{FailurePolicy, PipelineOptions};

use crate::auth::jwt::JwtConfig;

/// Default number of runs generating at the same time.
pub const DEFAULT_MAX_CONCURRENT_RUNS: usize = 8;

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// How long shutdown waits for in-flight runs, in seconds (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// Runs allowed to generate at once; further runs wait for a slot.
    pub max_concurrent_runs: usize,
    /// Body sections generated concurrently within one run.
    pub section_concurrency: usize,
    /// What a run does when one stage fails.
    pub failure_policy: FailurePolicy,
    /// Seconds a finished run channel stays attachable.
    pub run_retention_secs: u64,
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                    |
    /// |-------------------------|----------------------------|
    /// | `HOST`                  | `0.0.0.0`                  |
    /// | `PORT`                  | `3000`                     |
    /// | `CORS_ORIGINS`          | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`                       |
    /// | `SHUTDOWN_TIMEOUT_SECS` | `30`                       |
    /// | `MAX_CONCURRENT_RUNS`   | `8`                        |
    /// | `SECTION_CONCURRENCY`   | `1`                        |
    /// | `STAGE_FAILURE_POLICY`  | `abort`                    |
    /// | `RUN_RETENTION_SECS`    | `600`                      |
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

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let max_concurrent_runs: usize = std::env::var("MAX_CONCURRENT_RUNS")
            .unwrap_or_else(|_| DEFAULT_MAX_CONCURRENT_RUNS.to_string())
            .parse()
            .expect("MAX_CONCURRENT_RUNS must be a valid usize");
        assert!(max_concurrent_runs > 0, "MAX_CONCURRENT_RUNS must be at least 1");

        let section_concurrency: usize = std::env::var("SECTION_CONCURRENCY")
            .unwrap_or_else(|_| DEFAULT_SECTION_CONCURRENCY.to_string())
            .parse()
            .expect("SECTION_CONCURRENCY must be a valid usize");

        let failure_policy: FailurePolicy = std::env::var("STAGE_FAILURE_POLICY")
            .unwrap_or_else(|_| FailurePolicy::default().as_str().into())
            .parse()
            .unwrap_or_else(|e| panic!("STAGE_FAILURE_POLICY is invalid: {e}"));

        let run_retention_secs: u64 = std::env::var("RUN_RETENTION_SECS")
            .unwrap_or_else(|_| DEFAULT_RETENTION_SECS.to_string())
            .parse()
            .expect("RUN_RETENTION_SECS must be a valid u64");

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            max_concurrent_runs,
            section_concurrency,
            failure_policy,
            run_retention_secs,
            jwt,
        }
    }

    /// Options handed to every [`copypanda_pipeline::ArticlePipeline`].
    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            failure_policy: self.failure_policy,
            section_concurrency: self.section_concurrency,
        }
    }
}
