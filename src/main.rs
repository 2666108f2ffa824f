//! Process entry point: wire configuration, storage, the poster loop, the
//! HTTP surface and the dispatcher together.

use anyhow::{Context, Result};
use log::{info, warn};
use rusqlite::Connection;
use std::net::SocketAddr;
use std::sync::Arc;
use teloxide::dispatching::dialogue::InMemStorage;
use teloxide::error_handlers::LoggingErrorHandler;
use teloxide::prelude::*;
use teloxide::update_listeners::webhooks;
use tokio::sync::Mutex;

use blinds_bot::bot::handler_tree;
use blinds_bot::config::Config;
use blinds_bot::context::AppContext;
use blinds_bot::db;
use blinds_bot::dialogue::LeadState;
use blinds_bot::llm::PostGenerator;
use blinds_bot::poster;
use blinds_bot::web;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let config = Config::from_env().context("Invalid configuration")?;
    info!("Starting blinds bot");

    let conn = Connection::open(&config.database_path)
        .with_context(|| format!("Failed to open database at {}", config.database_path))?;
    db::init_schema(&conn).context("Failed to initialize database schema")?;
    let seeded = db::seed_products(&conn).context("Failed to seed catalog")?;
    if seeded > 0 {
        info!("Seeded catalog with {} products", seeded);
    }
    let shared_conn = Arc::new(Mutex::new(conn));

    let generator = match &config.yandex {
        Some(yandex) => Some(
            PostGenerator::new(yandex.api_key.clone(), yandex.folder_id.clone())
                .context("Failed to build post generator")?,
        ),
        None => {
            warn!("YANDEX_API_KEY / FOLDER_ID not set, post generation disabled");
            None
        }
    };

    let bot = Bot::new(&config.bot_token);
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let webhook_url = config.webhook_url.clone();
    let bot_token = config.bot_token.clone();

    let ctx = Arc::new(AppContext {
        config,
        db: shared_conn,
        generator,
    });

    tokio::spawn(poster::run(bot.clone(), ctx.clone()));

    let mut dispatcher = Dispatcher::builder(bot.clone(), handler_tree())
        .dependencies(dptree::deps![ctx, InMemStorage::<LeadState>::new()])
        .enable_ctrlc_handler()
        .build();

    match webhook_url {
        Some(base) => {
            let url = blinds_bot::config::webhook_endpoint(&base, &bot_token)?;
            let (listener, stop_flag, bot_router) =
                webhooks::axum_to_router(bot, webhooks::Options::new(addr, url))
                    .await
                    .context("Failed to register webhook")?;
            let app = web::health_router().merge(bot_router);
            tokio::spawn(async move {
                if let Err(e) = web::serve(app, addr, stop_flag).await {
                    log::error!("HTTP server exited: {:#}", e);
                }
            });
            info!("Running in webhook mode on port {}", addr.port());
            dispatcher
                .dispatch_with_listener(
                    listener,
                    LoggingErrorHandler::with_custom_text("An error from the update listener"),
                )
                .await;
        }
        None => {
            // Health endpoint stays up even without a webhook
            tokio::spawn(async move {
                if let Err(e) = web::serve(web::health_router(), addr, std::future::pending()).await
                {
                    log::error!("HTTP server exited: {:#}", e);
                }
            });
            info!("Running in long-polling mode");
            dispatcher.dispatch().await;
        }
    }

    Ok(())
}
