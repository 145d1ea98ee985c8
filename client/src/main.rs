use anyhow::Context;
use chatline_client::{init_tracing, ChatThreadController, ClientConfig, HttpGateway};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = ClientConfig::from_env()?;
    let user_id = config
        .user_id
        .clone()
        .context("CHATLINE_USER_ID is not set")?;
    let recipient_id = config
        .recipient_id
        .clone()
        .context("CHATLINE_RECIPIENT_ID is not set")?;

    let gateway = Arc::new(HttpGateway::new(&config)?);
    info!(api_url = %gateway.base_url(), %user_id, %recipient_id, "opening conversation");

    let thread = ChatThreadController::new(user_id, recipient_id, gateway)
        .with_request_timeout(config.request_timeout);
    thread.open().await?;

    let snapshot = thread.snapshot();
    let recipient = snapshot
        .recipient()
        .map(|profile| profile.display_name().to_string())
        .unwrap_or_else(|| thread.recipient_id().to_string());
    for message in snapshot.messages() {
        info!(
            id = %message.id,
            kind = %message.kind(),
            at = %message.timestamp,
            mine = message.is_sent_by(thread.user_id()),
            "message"
        );
    }
    info!(%recipient, count = snapshot.messages().len(), "conversation loaded");
    Ok(())
}
