//! Lead-capture transitions: prompt for a phone, capture it, notify the
//! manager, confirm to the user.

use anyhow::Result;
use chrono::Utc;
use log::{error, info, warn};
use teloxide::prelude::*;
use teloxide::types::ReplyMarkup;

use crate::context::AppContext;
use crate::db;
use crate::dialogue::{phone_from_parts, LeadDialogue, LeadState};
use crate::texts;

use super::ui_builder::contact_request_keyboard;

/// `Idle -> AwaitingPhone`: send the phone prompt and register the pending
/// state for this chat. `product` carries the product name when the request
/// came from an "order" button.
pub async fn start_lead_capture(
    bot: &Bot,
    chat_id: ChatId,
    dialogue: LeadDialogue,
    product: Option<String>,
) -> Result<()> {
    bot.send_message(chat_id, texts::PHONE_PROMPT)
        .reply_markup(contact_request_keyboard())
        .await?;

    dialogue
        .update(LeadState::AwaitingPhone {
            requested_at: Utc::now(),
            product,
        })
        .await?;
    Ok(())
}

/// `AwaitingPhone -> done`: extract the phone from the user's next message,
/// persist the lead, notify the manager (best-effort) and confirm.
pub async fn handle_phone_input(
    bot: &Bot,
    msg: &Message,
    dialogue: LeadDialogue,
    ctx: &AppContext,
    product: Option<String>,
) -> Result<()> {
    let contact_phone = msg.contact().map(|c| c.phone_number.as_str());
    let phone = phone_from_parts(contact_phone, msg.text());

    // Either way the one-shot state is consumed: no automatic retry loop,
    // the user re-triggers via the menu.
    dialogue.exit().await?;

    let Some(phone) = phone else {
        bot.send_message(msg.chat.id, texts::PHONE_FAILED)
            .reply_markup(ReplyMarkup::kb_remove())
            .await?;
        return Ok(());
    };

    let display_name = msg
        .from
        .as_ref()
        .map(|user| user.full_name())
        .unwrap_or_else(|| "—".to_string());
    let telegram_id = msg.chat.id.0;

    let saved = {
        let conn = ctx.db.lock().await;
        db::create_lead(&conn, telegram_id, &display_name, &phone)
    };
    if let Err(e) = saved {
        // The custom keyboard still has to go away, with an apology
        error!("Failed to save lead for telegram_id {}: {:#}", telegram_id, e);
        bot.send_message(msg.chat.id, texts::LEAD_SAVE_FAILED)
            .reply_markup(ReplyMarkup::kb_remove())
            .await?;
        return Ok(());
    }
    info!("Captured lead from telegram_id {}", telegram_id);

    notify_manager(bot, ctx, &display_name, telegram_id, &phone, product.as_deref()).await;

    let confirmation = texts::lead_confirmation(&phone);
    bot.send_message(msg.chat.id, &confirmation)
        .reply_markup(ReplyMarkup::kb_remove())
        .await?;

    // Audit trail is best-effort, like the notification
    let conn = ctx.db.lock().await;
    if let Err(e) = db::log_message(&conn, telegram_id, "out", &confirmation) {
        warn!("Failed to log confirmation message: {:#}", e);
    }

    Ok(())
}

/// Best-effort notification to the fixed manager chat. A failure here is
/// logged and never surfaced to the customer.
async fn notify_manager(
    bot: &Bot,
    ctx: &AppContext,
    display_name: &str,
    telegram_id: i64,
    phone: &str,
    product: Option<&str>,
) {
    let mut text = texts::manager_notification(display_name, telegram_id, phone);
    if let Some(product) = product {
        text.push_str(&format!("\nТовар: {product}"));
    }
    if let Err(e) = bot.send_message(ctx.config.manager_chat_id, text).await {
        error!("Failed to notify manager about lead: {}", e);
    }
}
