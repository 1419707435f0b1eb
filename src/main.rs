use std::{borrow::Cow, error::Error, sync::Arc};

use sidechainquest::{
    config::Config,
    database::{connection::Connection, memory::MemoryStore, Storage},
    logging::setup_logging,
    schema::schema,
    state::BotState,
};
use teloxide::{
    dispatching::dialogue::InMemStorage,
    error_handlers::IgnoringErrorHandlerSafe,
    prelude::*,
    update_listeners::webhooks::{self, Options},
};

async fn open_storage(config: &Config) -> Result<Storage, Box<dyn Error>> {
    match &config.database_url {
        Some(url) => {
            let connection = Connection::connect(Cow::Borrowed(url.as_str())).await?;
            connection.perform_migrations().await?;
            tracing::info!("Progress is stored in Postgres");
            Ok(Storage::Postgres(connection))
        }
        None => {
            tracing::warn!("DATABASE_URL is not set, progress will be lost on restart");
            Ok(Storage::Memory(MemoryStore::default()))
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = Config::from_env()?;
    setup_logging(config.log_level)?;

    let storage = Arc::new(open_storage(&config).await?);

    let bot = Bot::new(config.teloxide_token.clone());
    tracing::info!("Starting bot...");

    let mut dispatcher = Dispatcher::builder(bot.clone(), schema())
        .dependencies(dptree::deps![InMemStorage::<BotState>::new(), storage])
        .enable_ctrlc_handler()
        .build();

    match config.webhook {
        Some(webhook) => {
            tracing::info!(url = %webhook.url, addr = %webhook.addr, "Listening for webhooks");
            let listener = webhooks::axum(bot, Options::new(webhook.addr, webhook.url)).await?;
            dispatcher
                .dispatch_with_listener(listener, Arc::new(IgnoringErrorHandlerSafe))
                .await
        }
        None => dispatcher.dispatch().await,
    }

    Ok(())
}
