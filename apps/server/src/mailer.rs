use async_trait::async_trait;
use finbook_core::{users::Mailer, Result};

/// Writes password reset links to the log instead of sending e-mail.
pub struct LogMailer {
    public_url: String,
}

impl LogMailer {
    pub fn new(public_url: &str) -> Self {
        Self {
            public_url: public_url.to_string(),
        }
    }

    pub fn reset_link(&self, token: &str) -> String {
        format!("{}/reset-password/{}", self.public_url, token)
    }
}

#[async_trait]
impl Mailer for LogMailer {
    async fn send_password_reset(&self, email: &str, token: &str) -> Result<()> {
        tracing::info!(to = %email, link = %self.reset_link(token), "Password reset requested");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_reset_link_uses_public_url() {
        let mailer = LogMailer::new("https://finbook.test");
        assert_eq!(mailer.reset_link("abc"), "https://finbook.test/reset-password/abc");
        mailer
            .send_password_reset("ana@example.com", "abc")
            .await
            .unwrap();
    }
}
