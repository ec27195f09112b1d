use button_updater::{ButtonUpdate, RedditClient, update_button};
use lambda_runtime::{Error, LambdaEvent, run, service_fn};
use serde::Serialize;
use tracing::{error, info};

mod structs;
use structs::{AppContext, Config};

#[derive(Debug, Serialize)]
struct Response {
    subreddit: String,
    widget_name: String,
    button_name: String,
    updated: bool,
}

async fn function_handler(
    context: &AppContext,
    event: LambdaEvent<ButtonUpdate>,
) -> Result<Response, Error> {
    let update = event.payload;
    info!(
        "Updating button {} of widget {} in r/{}",
        update.button_name, update.widget_name, update.subreddit
    );

    // access tokens expire, so log in per invocation rather than per container
    let client = RedditClient::login(
        context.http.clone(),
        &context.reddit_settings,
        &context.reddit_credentials,
    )
    .await?;

    if let Err(e) = update_button(&client, &update).await {
        if e.is_forbidden() {
            error!(
                "not allowed to edit widgets of r/{}: {}",
                update.subreddit, e
            );
        } else {
            error!("failed to update button: {}", e);
        }
        return Err(e.into());
    }

    Ok(Response {
        subreddit: update.subreddit,
        widget_name: update.widget_name,
        button_name: update.button_name,
        updated: true,
    })
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let context = bu_app::create_app_context::<AppContext, Config>().await?;

    run(service_fn(|event| async {
        function_handler(&context, event).await
    }))
    .await
}
