use aws_sdk_secretsmanager::client::Client as SecretsManagerClient;
use button_updater::{RedditCredentials, RedditSettings, reddit};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[allow(clippy::struct_field_names)]
pub struct Config {
    pub reddit_secret_arn: String,

    #[serde(default = "default_user_agent")]
    pub reddit_user_agent: String,

    #[serde(default = "default_api_url")]
    pub reddit_api_url: String,

    #[serde(default = "default_auth_url")]
    pub reddit_auth_url: String,
}

fn default_user_agent() -> String {
    reddit::DEFAULT_USER_AGENT.to_string()
}

fn default_api_url() -> String {
    reddit::DEFAULT_API_URL.to_string()
}

fn default_auth_url() -> String {
    reddit::DEFAULT_AUTH_URL.to_string()
}

impl Config {
    pub fn reddit_settings(&self) -> RedditSettings {
        RedditSettings {
            api_url: self.reddit_api_url.clone(),
            auth_url: self.reddit_auth_url.clone(),
            user_agent: self.reddit_user_agent.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppContext {
    pub http: reqwest::Client,
    pub reddit_settings: RedditSettings,
    pub reddit_credentials: RedditCredentials,
}

impl bu_app::ContextProvider<Config> for AppContext {
    async fn new(config: Config, aws_config: aws_config::SdkConfig) -> Self {
        let secrets_manager = SecretsManagerClient::new(&aws_config);

        let reddit_credentials = match secrets_manager
            .get_secret_value()
            .secret_id(&config.reddit_secret_arn)
            .send()
            .await
        {
            Ok(secret) => match serde_json::from_str::<RedditCredentials>(
                secret.secret_string.as_deref().unwrap_or("{}"),
            ) {
                Ok(credentials) => credentials,
                Err(e) => {
                    tracing::error!("failed to parse Reddit secret: {:?}", e);
                    panic!("failed to parse Reddit secret");
                }
            },
            Err(e) => {
                tracing::error!("failed to get Reddit secret: {:?}", e);
                panic!("failed to get Reddit secret");
            }
        };

        Self {
            http: reqwest::Client::new(),
            reddit_settings: config.reddit_settings(),
            reddit_credentials,
        }
    }
}
