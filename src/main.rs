//! RG Service Telegram Bot
//!
//! Main application entry point

use std::sync::Arc;

use anyhow::Context;
use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;
use tracing::{error, info, warn};

use rg_service_bot::{
    config::Settings,
    handlers::{handle_callback_query, handle_command, handle_message, Command},
    health,
    services::ServiceFactory,
    state::StateStorageManager,
    utils::logging,
};

type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Load configuration; a missing token stops the bot here
    let settings = Settings::new().context("failed to load configuration")?;
    settings.validate().context("invalid configuration")?;

    // Initialize logging
    let _log_guard = logging::init_logging(&settings.logging)?;

    info!("Starting {}...", rg_service_bot::info());

    // Initialize state management
    let mut state_manager = StateStorageManager::new(&settings.state);
    state_manager.start_cleanup();

    // Initialize bot
    let mut bot = Bot::new(&settings.bot.token);
    if let Some(api_url) = &settings.bot.api_url {
        let api_url = url::Url::parse(api_url).context("invalid Bot API URL")?;
        info!(api_url = %api_url, "Using custom Bot API server");
        bot = bot.set_api_url(api_url);
    }

    let services = Arc::new(ServiceFactory::new(
        bot.clone(),
        &settings,
        state_manager.storage().clone(),
    ));

    for issue in services.health_check().await.get_issues() {
        warn!("{}", issue);
    }

    if settings.health.enabled {
        let listener = health::bind(&settings.health)
            .await
            .with_context(|| format!("failed to bind health-check port {}", settings.health.port))?;
        let health_services = services.clone();
        tokio::spawn(async move {
            if let Err(e) = health::serve(listener, health_services).await {
                error!(error = %e, "Health-check listener stopped");
            }
        });
    }

    if let Err(e) = bot.set_my_commands(Command::bot_commands()).await {
        warn!(error = %e, "Failed to register bot commands");
    }

    let mut dispatcher = Dispatcher::builder(bot, create_handler())
        .dependencies(dptree::deps![services])
        .default_handler(|upd| async move {
            warn!("Unhandled update: {:?}", upd.id);
        })
        .enable_ctrlc_handler()
        .build();

    info!("Starting bot with polling mode...");
    dispatcher.dispatch().await;

    state_manager.stop_cleanup();
    info!("RG Service bot has been shut down.");

    Ok(())
}

/// Create the main update handler
fn create_handler() -> UpdateHandler<Box<dyn std::error::Error + Send + Sync + 'static>> {
    dptree::entry()
        .branch(
            Update::filter_message()
                .branch(
                    dptree::entry()
                        .filter_command::<Command>()
                        .endpoint(handle_commands),
                )
                .branch(dptree::endpoint(handle_messages)),
        )
        .branch(Update::filter_callback_query().endpoint(handle_callbacks))
}

/// Handle bot commands
async fn handle_commands(
    bot: Bot,
    msg: Message,
    cmd: Command,
    services: Arc<ServiceFactory>,
) -> HandlerResult {
    if let Err(e) = handle_command(bot, msg, cmd, &services).await {
        error!(error = %e, severity = %e.severity(), "Error handling command");
        return Err(e.into());
    }

    Ok(())
}

/// Handle regular messages
async fn handle_messages(
    bot: Bot,
    msg: Message,
    services: Arc<ServiceFactory>,
) -> HandlerResult {
    if let Err(e) = handle_message(bot, msg, &services).await {
        error!(error = %e, severity = %e.severity(), "Error handling message");
        return Err(e.into());
    }

    Ok(())
}

/// Handle callback queries
async fn handle_callbacks(
    bot: Bot,
    query: CallbackQuery,
    services: Arc<ServiceFactory>,
) -> HandlerResult {
    let user_id = query.from.id.0 as i64;

    if let Err(e) = handle_callback_query(bot, query, &services).await {
        error!(
            user_id = user_id,
            error = %e,
            severity = %e.severity(),
            "Error handling callback query"
        );
        return Err(e.into());
    }

    Ok(())
}
