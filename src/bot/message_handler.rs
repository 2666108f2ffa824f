//! Message handler: dialogue-state routing, commands and menu labels.

use anyhow::Result;
use chrono::Utc;
use log::{debug, warn};
use std::sync::Arc;
use teloxide::prelude::*;

use crate::context::AppContext;
use crate::db;
use crate::dialogue::{prompt_expired, LeadDialogue, LeadState};
use crate::poster;
use crate::texts;

use super::catalog;
use super::lead_flow;
use super::ui_builder::main_menu_keyboard;

pub async fn message_handler(
    bot: Bot,
    msg: Message,
    dialogue: LeadDialogue,
    ctx: Arc<AppContext>,
) -> Result<()> {
    debug!("Received message from chat {}", msg.chat.id);

    log_inbound(&ctx, &msg).await;

    // The pending phone prompt consumes the next message, whatever it is
    if let Some(LeadState::AwaitingPhone {
        requested_at,
        product,
    }) = dialogue.get().await?
    {
        if prompt_expired(requested_at, Utc::now()) {
            debug!("Phone prompt for chat {} expired, dropping state", msg.chat.id);
            dialogue.exit().await?;
            // Fall through: handle the message as a normal menu message
        } else {
            return lead_flow::handle_phone_input(&bot, &msg, dialogue, &ctx, product).await;
        }
    }

    let Some(text) = msg.text() else {
        // Contact shares outside the flow, stickers, photos and the rest
        bot.send_message(msg.chat.id, texts::FALLBACK).await?;
        return Ok(());
    };

    match text {
        "/start" => {
            bot.send_message(msg.chat.id, texts::WELCOME)
                .reply_markup(main_menu_keyboard())
                .await?;
        }
        "/help" => {
            bot.send_message(msg.chat.id, texts::HELP).await?;
        }
        "/contact" => {
            bot.send_message(msg.chat.id, texts::CONTACTS).await?;
        }
        "/tip" => publish_and_confirm(&bot, &msg, poster::publish_random_tip(&bot, &ctx).await).await?,
        "/promo" => {
            publish_and_confirm(&bot, &msg, poster::publish_random_promo(&bot, &ctx).await).await?
        }
        "/work" => {
            publish_and_confirm(&bot, &msg, poster::publish_random_work(&bot, &ctx).await).await?
        }
        _ if is_post_command(text) => {
            handle_post_command(&bot, &msg, &ctx, post_topic(text)).await?;
        }
        _ if text == texts::BTN_CATALOG => {
            catalog::send_categories(&bot, msg.chat.id, &ctx).await?;
        }
        _ if text == texts::BTN_CALL => {
            lead_flow::start_lead_capture(&bot, msg.chat.id, dialogue, None).await?;
        }
        _ if text == texts::BTN_PORTFOLIO => {
            bot.send_message(msg.chat.id, texts::PORTFOLIO).await?;
        }
        _ if text == texts::BTN_CONTACTS => {
            bot.send_message(msg.chat.id, texts::CONTACTS).await?;
        }
        _ => {
            bot.send_message(msg.chat.id, texts::FALLBACK).await?;
        }
    }

    Ok(())
}

/// The `/post` command proper, not lookalikes such as `/poster`.
fn is_post_command(text: &str) -> bool {
    text == "/post" || text.starts_with("/post ")
}

/// Topic text after the `/post` command, empty when none was given.
fn post_topic(text: &str) -> &str {
    text.strip_prefix("/post").unwrap_or(text).trim()
}

/// `/post <тема>` — generate a post via the LLM and publish it to the
/// channel, reporting the outcome to the caller.
async fn handle_post_command(
    bot: &Bot,
    msg: &Message,
    ctx: &AppContext,
    topic: &str,
) -> Result<()> {
    if topic.is_empty() {
        bot.send_message(msg.chat.id, texts::POST_TOPIC_HINT).await?;
        return Ok(());
    }

    bot.send_message(msg.chat.id, texts::GENERATING).await?;
    publish_and_confirm(bot, msg, poster::publish_generated(bot, ctx, topic).await).await
}

/// Report a channel-publish outcome back to the requesting chat. The
/// publish error itself is logged, not shown.
async fn publish_and_confirm(bot: &Bot, msg: &Message, outcome: Result<()>) -> Result<()> {
    match outcome {
        Ok(()) => {
            bot.send_message(msg.chat.id, texts::POST_PUBLISHED).await?;
        }
        Err(e) => {
            warn!("Channel publish requested by {} failed: {:#}", msg.chat.id, e);
            bot.send_message(msg.chat.id, texts::POST_FAILED).await?;
        }
    }
    Ok(())
}

/// Best-effort append to the message audit trail.
async fn log_inbound(ctx: &AppContext, msg: &Message) {
    let Some(text) = msg.text() else { return };
    let conn = ctx.db.lock().await;
    if let Err(e) = db::log_message(&conn, msg.chat.id.0, "in", text) {
        warn!("Failed to log inbound message: {:#}", e);
    }
}
