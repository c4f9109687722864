use crate::ports::NotificationCatalog;
use anyhow::Context;
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use sdkbuilder_config::NotificationCredentials;
use sdkbuilder_types::notification::NotificationTopic;
use serde::Deserialize;
use tracing::{debug, info};

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct TopicListing {
    #[serde(default)]
    entities: Vec<NotificationTopic>,
}

/// Fetches available topics with their schemas from the platform API
/// using a client-credentials login.
#[derive(Debug, Clone)]
pub struct HttpNotificationCatalog {
    credentials: NotificationCredentials,
    client: Client,
}

impl HttpNotificationCatalog {
    pub fn new(credentials: NotificationCredentials) -> Self {
        Self {
            credentials,
            client: Client::new(),
        }
    }

    pub fn login_url(&self) -> String {
        format!("https://login.{}/oauth/token", self.credentials.environment)
    }

    pub fn topics_url(&self) -> String {
        format!(
            "https://api.{}/api/v2/notifications/availabletopics?expand=schema",
            self.credentials.environment
        )
    }

    fn login(&self) -> anyhow::Result<String> {
        let url = self.login_url();
        debug!(url = %url, "client credentials login");
        let response = self
            .client
            .post(&url)
            .basic_auth(
                &self.credentials.client_id,
                Some(&self.credentials.client_secret),
            )
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body("grant_type=client_credentials")
            .send()
            .with_context(|| format!("login at {}", url))?;
        if !response.status().is_success() {
            anyhow::bail!("login at {} failed with HTTP {}", url, response.status());
        }
        let token: TokenResponse = response.json().context("parse login response")?;
        Ok(token.access_token)
    }
}

impl NotificationCatalog for HttpNotificationCatalog {
    fn available_topics(&self) -> anyhow::Result<Vec<NotificationTopic>> {
        let token = self.login()?;
        let url = self.topics_url();
        info!("Fetching notification topics from {}", url);
        let response = self
            .client
            .get(&url)
            .bearer_auth(token)
            .send()
            .with_context(|| format!("fetch {}", url))?;
        if !response.status().is_success() {
            anyhow::bail!("fetch of {} failed with HTTP {}", url, response.status());
        }
        let listing: TopicListing = response.json().context("parse notification topics")?;
        Ok(listing.entities)
    }
}
