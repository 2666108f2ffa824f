//! Scheduled channel poster and channel publishing helpers.
//!
//! A single background task wakes every minute, matches local wall-clock
//! time against the configured slots and claims the slot in the database
//! before publishing, so at most one post goes out per slot per calendar
//! day — including across restarts. A failed publish is logged and skipped
//! for the day; the slot stays claimed.

use anyhow::{Context, Result};
use chrono::{Local, NaiveTime, Timelike};
use log::{error, info, warn};
use rand::seq::SliceRandom;
use std::sync::Arc;
use std::time::Duration;
use teloxide::prelude::*;
use teloxide::types::{InputFile, ParseMode};
use url::Url;

use crate::bot::ui_builder::format_product_caption;
use crate::config::PostSlot;
use crate::context::AppContext;
use crate::db::{self, Product};
use crate::texts;

const TICK_INTERVAL: Duration = Duration::from_secs(60);

/// Index of the configured slot matching the current wall-clock minute.
pub fn due_slot(now: NaiveTime, slots: &[PostSlot]) -> Option<usize> {
    slots
        .iter()
        .position(|slot| slot.hour == now.hour() && slot.minute == now.minute())
}

/// Background loop. Spawned once from `main`; never returns.
pub async fn run(bot: Bot, ctx: Arc<AppContext>) {
    info!(
        "Poster loop started with {} slot(s)",
        ctx.config.post_slots.len()
    );
    let mut interval = tokio::time::interval(TICK_INTERVAL);
    loop {
        interval.tick().await;
        if let Err(e) = tick(&bot, &ctx).await {
            error!("Poster tick failed: {:#}", e);
        }
    }
}

async fn tick(bot: &Bot, ctx: &AppContext) -> Result<()> {
    let now = Local::now();
    let Some(slot) = due_slot(now.time(), &ctx.config.post_slots) else {
        return Ok(());
    };

    let today = now.format("%Y-%m-%d").to_string();
    let claimed = {
        let conn = ctx.db.lock().await;
        db::try_claim_post_slot(&conn, &today, slot)?
    };
    if !claimed {
        return Ok(());
    }

    info!("Publishing scheduled post for {} slot {}", today, slot);
    if let Err(e) = publish_slot(bot, ctx, slot).await {
        // The slot stays claimed: no retry within the same day
        error!("Scheduled post for slot {} failed: {:#}", slot, e);
    }
    Ok(())
}

/// Content rotation: morning tip (generated when possible), afternoon work
/// photo, any extra slots get promos.
async fn publish_slot(bot: &Bot, ctx: &AppContext, slot: usize) -> Result<()> {
    match slot % 3 {
        0 => publish_daily_tip(bot, ctx).await,
        1 => publish_random_work(bot, ctx).await,
        _ => publish_random_promo(bot, ctx).await,
    }
}

/// Tip slot: generated post if the LLM is configured, canned tip otherwise.
/// Generation failure degrades to canned content rather than skipping.
async fn publish_daily_tip(bot: &Bot, ctx: &AppContext) -> Result<()> {
    if let Some(generator) = &ctx.generator {
        let topic = pick(texts::POST_TOPICS);
        match generator.generate_post(topic).await {
            Ok(text) => {
                bot.send_message(ctx.config.channel_id.clone(), text).await?;
                return Ok(());
            }
            Err(e) => {
                warn!("Post generation failed, falling back to canned tip: {:#}", e);
            }
        }
    }
    publish_random_tip(bot, ctx).await
}

/// Publish a random canned tip to the channel.
pub async fn publish_random_tip(bot: &Bot, ctx: &AppContext) -> Result<()> {
    let tip = pick(texts::TIPS);
    bot.send_message(ctx.config.channel_id.clone(), tip)
        .parse_mode(ParseMode::Html)
        .await
        .context("Failed to publish tip")?;
    Ok(())
}

/// Publish a random canned promo to the channel.
pub async fn publish_random_promo(bot: &Bot, ctx: &AppContext) -> Result<()> {
    let promo = pick(texts::PROMOS);
    bot.send_message(ctx.config.channel_id.clone(), promo)
        .parse_mode(ParseMode::Html)
        .await
        .context("Failed to publish promo")?;
    Ok(())
}

/// Publish a random product as a work photo with caption. Falls back to a
/// text-only post when the product has no photo or the photo send fails.
pub async fn publish_random_work(bot: &Bot, ctx: &AppContext) -> Result<()> {
    let product = {
        let conn = ctx.db.lock().await;
        db::random_product(&conn)?
    };
    let Some(product) = product else {
        warn!("No products in catalog, skipping work post");
        return Ok(());
    };

    let caption = format!("{}\n\nЗаказать замер → @yourmanager", format_product_caption(&product));
    send_product_photo_or_text(bot, ctx, &product, &caption).await
}

/// Publish an LLM-generated post on the given topic.
pub async fn publish_generated(bot: &Bot, ctx: &AppContext, topic: &str) -> Result<()> {
    let generator = ctx
        .generator
        .as_ref()
        .context("Post generator is not configured (YANDEX_API_KEY / FOLDER_ID)")?;
    let text = generator.generate_post(topic).await?;
    bot.send_message(ctx.config.channel_id.clone(), text)
        .await
        .context("Failed to publish generated post")?;
    Ok(())
}

async fn send_product_photo_or_text(
    bot: &Bot,
    ctx: &AppContext,
    product: &Product,
    caption: &str,
) -> Result<()> {
    if let Some(photo_url) = product.photo_url.as_deref() {
        if let Ok(url) = Url::parse(photo_url) {
            match bot
                .send_photo(ctx.config.channel_id.clone(), InputFile::url(url))
                .caption(caption)
                .await
            {
                Ok(_) => return Ok(()),
                Err(e) => {
                    warn!(
                        "Failed to send photo for product {}: {}, falling back to text",
                        product.id, e
                    );
                }
            }
        }
    }
    bot.send_message(ctx.config.channel_id.clone(), caption)
        .await
        .context("Failed to publish work post")?;
    Ok(())
}

fn pick(items: &[&'static str]) -> &'static str {
    let mut rng = rand::thread_rng();
    items.choose(&mut rng).copied().unwrap_or("")
}
