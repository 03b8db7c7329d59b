#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use finbook_core::users::Mailer;
use finbook_server::{api::app_router, auth::AuthConfig, build_state_with_mailer, config::Config};
use serde_json::{json, Value};
use tempfile::{tempdir, TempDir};
use tower::ServiceExt;

/// Keeps reset tokens instead of mailing them.
#[derive(Default)]
pub struct CapturingMailer {
    sent: Mutex<Vec<(String, String)>>,
}

impl CapturingMailer {
    pub fn last_token_for(&self, email: &str) -> Option<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(to, _)| to == email)
            .map(|(_, token)| token.clone())
    }
}

#[async_trait]
impl Mailer for CapturingMailer {
    async fn send_password_reset(&self, email: &str, token: &str) -> finbook_core::Result<()> {
        self.sent
            .lock()
            .unwrap()
            .push((email.to_string(), token.to_string()));
        Ok(())
    }
}

pub struct TestApp {
    pub router: Router,
    pub mailer: Arc<CapturingMailer>,
    // Keeps the database and upload directories alive for the whole test.
    _dir: TempDir,
}

pub async fn spawn_app() -> TestApp {
    let dir = tempdir().unwrap();
    let config = Config {
        listen_addr: "127.0.0.1:0".parse().unwrap(),
        db_path: dir.path().join("test.db").to_string_lossy().to_string(),
        cors_allow: vec!["*".to_string()],
        request_timeout: Duration::from_secs(30),
        auth: AuthConfig {
            jwt_secret: vec![42u8; 32],
            access_token_ttl: Duration::from_secs(3600),
        },
        upload_dir: dir.path().join("uploads"),
        public_url: "http://localhost:6789".to_string(),
    };
    let mailer = Arc::new(CapturingMailer::default());
    let state = build_state_with_mailer(&config, mailer.clone()).await.unwrap();
    TestApp {
        router: app_router(state, &config).unwrap(),
        mailer,
        _dir: dir,
    }
}

impl TestApp {
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let (status, bytes) = self.send_request(request).await;
        let value = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).to_string()));
        (status, value)
    }

    pub async fn send_request(&self, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec())
    }

    /// Posts one file as the `image` field of a multipart form.
    pub async fn upload(
        &self,
        uri: &str,
        token: Option<&str>,
        content_type: &str,
        file: &[u8],
    ) -> (StatusCode, Value) {
        let boundary = "finbook-test-boundary";
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"avatar\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(file);
        body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

        let mut builder = Request::builder().method(Method::POST).uri(uri).header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        );
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let (status, bytes) = self
            .send_request(builder.body(Body::from(body)).unwrap())
            .await;
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    /// Registers a user and returns a bearer token for it.
    pub async fn sign_up(&self, nickname: &str, email: &str, password: &str) -> String {
        let (status, _) = self
            .send(
                Method::POST,
                "/api/register",
                None,
                Some(json!({ "nickname": nickname, "email": email, "password": password })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = self
            .send(
                Method::POST,
                "/api/login",
                None,
                Some(json!({ "username": email, "password": password })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        body["token"].as_str().unwrap().to_string()
    }
}
