//! Catalog browsing: category drill-down and per-product messages.

use anyhow::Result;
use log::warn;
use teloxide::prelude::*;
use teloxide::types::InputFile;
use url::Url;

use crate::context::AppContext;
use crate::db::{self, Product};
use crate::texts;

use super::ui_builder::{categories_keyboard, format_product_caption, product_keyboard};

/// Send the top-level category keyboard.
pub async fn send_categories(bot: &Bot, chat_id: ChatId, ctx: &AppContext) -> Result<()> {
    let categories = {
        let conn = ctx.db.lock().await;
        db::list_categories(&conn)?
    };
    if categories.is_empty() {
        bot.send_message(chat_id, texts::NO_PRODUCTS).await?;
        return Ok(());
    }
    bot.send_message(chat_id, texts::CATALOG_INTRO)
        .reply_markup(categories_keyboard(&categories))
        .await?;
    Ok(())
}

/// Send every product of a category as a photo+caption message with order
/// buttons. One product's broken photo must not abort the batch.
pub async fn send_category_products(
    bot: &Bot,
    chat_id: ChatId,
    ctx: &AppContext,
    category: &str,
) -> Result<()> {
    let products = {
        let conn = ctx.db.lock().await;
        db::products_by_category(&conn, category)?
    };
    if products.is_empty() {
        bot.send_message(chat_id, texts::NO_PRODUCTS).await?;
        return Ok(());
    }

    for product in &products {
        send_product_card(bot, chat_id, product).await?;
    }
    Ok(())
}

/// One product message: photo with caption when possible, text otherwise.
pub async fn send_product_card(bot: &Bot, chat_id: ChatId, product: &Product) -> Result<()> {
    let caption = format_product_caption(product);
    let keyboard = product_keyboard(product.id);

    if let Some(photo_url) = product.photo_url.as_deref() {
        if let Ok(url) = Url::parse(photo_url) {
            match bot
                .send_photo(chat_id, InputFile::url(url))
                .caption(&caption)
                .reply_markup(keyboard.clone())
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

    bot.send_message(chat_id, caption)
        .reply_markup(keyboard)
        .await?;
    Ok(())
}
