use indexmap::IndexMap;
use reqwest::{StatusCode, header::USER_AGENT};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use tracing::{debug, error, info, instrument};

use crate::error::ServiceError;
use crate::model::{ButtonWidget, Widget, WidgetCollection};
use crate::records::ButtonRecord;
use crate::service::WidgetService;

pub const DEFAULT_API_URL: &str = "https://oauth.reddit.com";
pub const DEFAULT_AUTH_URL: &str = "https://www.reddit.com";
pub const DEFAULT_USER_AGENT: &str =
    "button_updater/1.0 (by button_updater)";

/// Credentials of a Reddit "script" app acting as a moderator account.
#[derive(Debug, Clone, Deserialize)]
pub struct RedditCredentials {
    pub client_id: String,
    pub client_secret: redact::Secret<String>,
    pub username: String,
    pub password: redact::Secret<String>,
}

/// Where to reach Reddit and how to introduce ourselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedditSettings {
    pub api_url: String,
    pub auth_url: String,
    pub user_agent: String,
}

impl Default for RedditSettings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            auth_url: DEFAULT_AUTH_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

#[derive(Deserialize)]
struct AccessTokenResponse {
    access_token: Option<redact::Secret<String>>,
    // reddit answers bad credentials with a 200 and an error field
    error: Option<String>,
}

#[derive(Deserialize)]
struct WidgetsResponse {
    items: IndexMap<String, Widget>,
}

/// Body of a widget modification: the widget as it was read, with a new
/// button list.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ButtonWidgetPayload<'a> {
    kind: &'static str,
    short_name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    styles: Option<&'a JsonValue>,
    buttons: &'a [ButtonRecord],
}

/// A logged in session against the Reddit OAuth API.
#[derive(Debug, Clone)]
pub struct RedditClient {
    http: reqwest::Client,
    api_url: String,
    user_agent: String,
    access_token: redact::Secret<String>,
}

impl RedditClient {
    /// Obtain an access token with the password grant of a script app.
    ///
    /// # Errors
    /// `ServiceError::Auth` if Reddit refuses the credentials, or any
    /// transport error.
    #[instrument(skip_all, fields(username = %credentials.username))]
    pub async fn login(
        http: reqwest::Client,
        settings: &RedditSettings,
        credentials: &RedditCredentials,
    ) -> Result<Self, ServiceError> {
        let url = format!(
            "{}/api/v1/access_token",
            settings.auth_url.trim_end_matches('/')
        );

        let response = http
            .post(&url)
            .header(USER_AGENT, &settings.user_agent)
            .basic_auth(
                &credentials.client_id,
                Some(credentials.client_secret.expose_secret()),
            )
            .form(&[
                ("grant_type", "password"),
                ("username", credentials.username.as_str()),
                ("password", credentials.password.expose_secret().as_str()),
            ])
            .send()
            .await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            error!("reddit rejected the client id or secret");
            return Err(ServiceError::Auth(
                "invalid client credentials".to_string(),
            ));
        }

        let body: AccessTokenResponse =
            check_status(response).await?.json().await?;

        let Some(access_token) = body.access_token else {
            let reason = body
                .error
                .unwrap_or_else(|| "no access token in response".to_string());
            error!("failed to log in to reddit: {}", reason);
            return Err(ServiceError::Auth(reason));
        };

        info!("logged in to reddit");

        Ok(Self {
            http,
            api_url: settings.api_url.trim_end_matches('/').to_string(),
            user_agent: settings.user_agent.clone(),
            access_token,
        })
    }

    fn get(&self, url: &str) -> reqwest::RequestBuilder {
        self.http
            .get(url)
            .header(USER_AGENT, &self.user_agent)
            .bearer_auth(self.access_token.expose_secret())
            .query(&[("raw_json", "1")])
    }

    fn put(&self, url: &str) -> reqwest::RequestBuilder {
        self.http
            .put(url)
            .header(USER_AGENT, &self.user_agent)
            .bearer_auth(self.access_token.expose_secret())
            .query(&[("raw_json", "1")])
    }
}

impl WidgetService for RedditClient {
    #[instrument(skip(self))]
    async fn list_widgets(
        &self,
        subreddit: &str,
    ) -> Result<WidgetCollection, ServiceError> {
        let url = format!("{}/r/{subreddit}/api/widgets", self.api_url);

        let response = self.get(&url).send().await?;
        let body = check_status(response).await?.text().await?;

        let listing: WidgetsResponse = serde_json::from_str(&body)?;
        debug!("fetched {} widgets", listing.items.len());

        Ok(WidgetCollection::new(subreddit, listing.items))
    }

    #[instrument(skip(self, widget, buttons), fields(widget_id = %widget.id))]
    async fn replace_buttons(
        &self,
        subreddit: &str,
        widget: &ButtonWidget,
        buttons: &[ButtonRecord],
    ) -> Result<(), ServiceError> {
        let url =
            format!("{}/r/{subreddit}/api/widget/{}", self.api_url, widget.id);

        let payload = serde_json::to_string(&ButtonWidgetPayload {
            kind: "button",
            short_name: &widget.short_name,
            description: widget.description.as_deref(),
            styles: widget.styles.as_ref(),
            buttons,
        })?;

        let response = self
            .put(&url)
            .form(&[("json", payload.as_str())])
            .send()
            .await?;
        check_status(response).await?;

        info!("replaced {} buttons", buttons.len());

        Ok(())
    }
}

/// Turn a non-success response into the matching `ServiceError`.
async fn check_status(
    response: reqwest::Response,
) -> Result<reqwest::Response, ServiceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let url = response.url().to_string();

    if status == StatusCode::FORBIDDEN {
        error!("forbidden: {}", url);
        return Err(ServiceError::Forbidden { url });
    }

    let body = response.text().await.unwrap_or_default();
    error!("unexpected status {} from {}: {}", status, url, body);

    Err(ServiceError::Status { status, url, body })
}
