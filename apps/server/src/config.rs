use std::{net::SocketAddr, path::PathBuf, time::Duration};

use anyhow::Context;

use crate::auth::{decode_secret_key, AuthConfig};

pub struct Config {
    pub listen_addr: SocketAddr,
    pub db_path: String,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    pub auth: AuthConfig,
    /// Directory avatar uploads are written to and served from.
    pub upload_dir: PathBuf,
    /// Base URL placed in password reset links.
    pub public_url: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let listen_addr: SocketAddr = std::env::var("FB_LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:6789".to_string())
            .parse()
            .context("Invalid FB_LISTEN_ADDR")?;
        let db_path = std::env::var("FB_DB_PATH").unwrap_or_else(|_| "./db/app.db".into());
        let cors_allow = parse_origins(
            &std::env::var("FB_CORS_ALLOW_ORIGINS").unwrap_or_else(|_| "*".into()),
        );
        let timeout_ms: u64 = std::env::var("FB_REQUEST_TIMEOUT_MS")
            .unwrap_or_else(|_| "30000".into())
            .parse()
            .unwrap_or(30000);

        let secret = std::env::var("FB_JWT_SECRET").context("FB_JWT_SECRET must be set")?;
        let upload_dir = std::env::var("FB_UPLOAD_DIR").unwrap_or_else(|_| "./uploads".into());
        let public_url =
            std::env::var("FB_PUBLIC_URL").unwrap_or_else(|_| "http://localhost:6789".into());
        let ttl_secs: u64 = std::env::var("FB_TOKEN_TTL_SECS")
            .unwrap_or_else(|_| "3600".into())
            .parse()
            .unwrap_or(3600);

        Ok(Self {
            listen_addr,
            db_path,
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
            auth: AuthConfig {
                jwt_secret: decode_secret_key(&secret)?,
                access_token_ttl: Duration::from_secs(ttl_secs),
            },
            upload_dir: PathBuf::from(upload_dir),
            public_url: public_url.trim_end_matches('/').to_string(),
        })
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
