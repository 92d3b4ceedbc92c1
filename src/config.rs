use crate::contact::ContactConfig;
use anyhow::{Context, Result};
use secrecy::SecretString;
use std::time::Duration;

/// Sender identity used when `CONTACT_EMAIL_FROM` is not set.
pub const DEFAULT_EMAIL_FROM: &str = "Portfolio Contact <onboarding@resend.dev>";

/// Inbox that receives submissions when no override is configured.
pub const DEFAULT_EMAIL_TO: &str = "alvesrafa.dev@gmail.com";

#[derive(Debug, Clone)]
pub struct Config {
    // Server
    pub port: u16,
    pub site_url: String,

    // Contact delivery (Resend)
    pub resend_api_key: Option<SecretString>,
    pub resend_api_url: String,
    pub contact_email_to: Option<String>,
    pub contact_email_from: String,
    pub email_timeout: Duration,

    // Locale routing
    pub geo_country_header: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            // Server
            port: std::env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8080),
            site_url: std::env::var("SITE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| "https://alvesrafa.dev".to_string()),

            // Contact delivery - absent key means "accept but don't send"
            resend_api_key: non_empty_var("RESEND_API_KEY").map(SecretString::from),
            resend_api_url: std::env::var("RESEND_API_URL")
                .unwrap_or_else(|_| "https://api.resend.com".to_string()),
            contact_email_to: non_empty_var("CONTACT_EMAIL_TO"),
            contact_email_from: std::env::var("CONTACT_EMAIL_FROM")
                .unwrap_or_else(|_| DEFAULT_EMAIL_FROM.to_string()),
            email_timeout: Duration::from_secs(
                std::env::var("EMAIL_TIMEOUT_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(10),
            ),

            // Locale routing
            geo_country_header: std::env::var("GEO_COUNTRY_HEADER")
                .map(|name| name.to_ascii_lowercase())
                .unwrap_or_else(|_| "x-vercel-ip-country".to_string()),
        })
    }

    /// Contact settings handed to the submission handler.
    pub fn contact(&self) -> ContactConfig {
        ContactConfig {
            credential: self.resend_api_key.clone(),
            recipient_override: self.contact_email_to.clone(),
            sender: self.contact_email_from.clone(),
        }
    }

    /// Socket address the server binds to.
    pub fn bind_addr(&self) -> Result<std::net::SocketAddr> {
        format!("0.0.0.0:{}", self.port)
            .parse()
            .context("Invalid bind address")
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
