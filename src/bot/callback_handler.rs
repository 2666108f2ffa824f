//! Callback handler: inline-button presses from catalog messages.

use anyhow::Result;
use log::{debug, warn};
use std::sync::Arc;
use teloxide::prelude::*;

use crate::context::AppContext;
use crate::db;
use crate::dialogue::LeadDialogue;
use crate::texts;

use super::catalog;
use super::lead_flow;

pub async fn callback_handler(
    bot: Bot,
    q: CallbackQuery,
    dialogue: LeadDialogue,
    ctx: Arc<AppContext>,
) -> Result<()> {
    let Some(chat_id) = q.message.as_ref().map(|m| m.chat().id) else {
        // Message too old for Telegram to carry it, nothing to answer into
        bot.answer_callback_query(q.id).await?;
        return Ok(());
    };

    let data = q.data.as_deref().unwrap_or_default();
    debug!("Callback '{}' from chat {}", data, chat_id);

    match data {
        "catalog" => {
            catalog::send_categories(&bot, chat_id, &ctx).await?;
        }
        "call" => {
            lead_flow::start_lead_capture(&bot, chat_id, dialogue, None).await?;
        }
        "portfolio" => {
            bot.send_message(chat_id, texts::PORTFOLIO).await?;
        }
        _ if data.starts_with("cat:") => {
            let category = &data["cat:".len()..];
            catalog::send_category_products(&bot, chat_id, &ctx, category).await?;
        }
        _ if data.starts_with("order:") => {
            let product = lookup_product_name(&ctx, &data["order:".len()..]).await;
            lead_flow::start_lead_capture(&bot, chat_id, dialogue, product).await?;
        }
        _ if data.starts_with("info:") => {
            match lookup_product_description(&ctx, &data["info:".len()..]).await {
                Some(description) => {
                    bot.send_message(chat_id, description).await?;
                }
                None => {
                    bot.send_message(chat_id, texts::NO_PRODUCTS).await?;
                }
            }
        }
        other => {
            warn!("Unknown callback data '{}' from chat {}", other, chat_id);
        }
    }

    bot.answer_callback_query(q.id).await?;
    Ok(())
}

async fn lookup_product_name(ctx: &AppContext, raw_id: &str) -> Option<String> {
    let id: i64 = raw_id.parse().ok()?;
    let conn = ctx.db.lock().await;
    match db::get_product(&conn, id) {
        Ok(product) => product.map(|p| p.name),
        Err(e) => {
            warn!("Product lookup for id {} failed: {:#}", id, e);
            None
        }
    }
}

async fn lookup_product_description(ctx: &AppContext, raw_id: &str) -> Option<String> {
    let id: i64 = raw_id.parse().ok()?;
    let conn = ctx.db.lock().await;
    match db::get_product(&conn, id) {
        Ok(product) => product.map(|p| format!("✨ {}\n\n{}", p.name, p.description)),
        Err(e) => {
            warn!("Product lookup for id {} failed: {:#}", id, e);
            None
        }
    }
}
