pub mod account;
pub mod config;
pub mod contacts;
pub mod gateway;
pub mod thread;

pub use account::{AccountError, AccountService};
pub use config::ClientConfig;
pub use contacts::{ContactsController, ContactsError};
pub use gateway::{BackendGateway, GatewayError, HttpGateway};
pub use thread::{ChatThreadController, ConversationState, ThreadError, ThreadEvent};

use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

pub fn init_tracing() {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
