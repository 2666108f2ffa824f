//! UI builder: keyboards and caption formatting.

use teloxide::types::{
    ButtonRequest, InlineKeyboardButton, InlineKeyboardMarkup, KeyboardButton,
    KeyboardMarkup,
};

use crate::db::Product;
use crate::texts;

/// Persistent main menu shown after /start.
pub fn main_menu_keyboard() -> KeyboardMarkup {
    KeyboardMarkup::new(vec![
        vec![
            KeyboardButton::new(texts::BTN_CATALOG),
            KeyboardButton::new(texts::BTN_CALL),
        ],
        vec![
            KeyboardButton::new(texts::BTN_PORTFOLIO),
            KeyboardButton::new(texts::BTN_CONTACTS),
        ],
    ])
    .resize_keyboard()
}

/// One-shot keyboard offering to share the user's contact during the
/// phone prompt.
pub fn contact_request_keyboard() -> KeyboardMarkup {
    KeyboardMarkup::new(vec![vec![
        KeyboardButton::new(texts::BTN_SHARE_PHONE).request(ButtonRequest::Contact),
    ]])
    .resize_keyboard()
    .one_time_keyboard()
}

/// Inline keyboard with one button per catalog category.
pub fn categories_keyboard(categories: &[String]) -> InlineKeyboardMarkup {
    let buttons: Vec<Vec<InlineKeyboardButton>> = categories
        .iter()
        .map(|category| {
            vec![InlineKeyboardButton::callback(
                category.clone(),
                format!("cat:{category}"),
            )]
        })
        .collect();
    InlineKeyboardMarkup::new(buttons)
}

/// Order/details buttons attached to a product message.
pub fn product_keyboard(product_id: i64) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![
        InlineKeyboardButton::callback("📞 Заказать", format!("order:{product_id}")),
        InlineKeyboardButton::callback("ℹ️ Подробнее", format!("info:{product_id}")),
    ]])
}

/// Product caption: name, description and the starting price when known.
pub fn format_product_caption(product: &Product) -> String {
    match product.price_from {
        Some(price) => format!(
            "✨ {}\n{}\n💰 от {} ₽/м²",
            product.name, product.description, price
        ),
        None => format!("✨ {}\n{}", product.name, product.description),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_product(price: Option<i64>) -> Product {
        Product {
            id: 7,
            name: "Рулонные шторы «День-ночь»".to_string(),
            description: "Двойная ткань.".to_string(),
            category: "Рулонные шторы".to_string(),
            price_from: price,
            photo_url: None,
        }
    }

    #[test]
    fn test_caption_with_price() {
        let caption = format_product_caption(&sample_product(Some(1500)));
        assert!(caption.contains("Рулонные шторы «День-ночь»"));
        assert!(caption.contains("от 1500 ₽/м²"));
    }

    #[test]
    fn test_caption_without_price() {
        let caption = format_product_caption(&sample_product(None));
        assert!(!caption.contains("₽/м²"));
    }

    #[test]
    fn test_categories_keyboard_one_button_per_category() {
        let categories = vec!["Рулонные шторы".to_string(), "Вертикальные жалюзи".to_string()];
        let keyboard = categories_keyboard(&categories);
        assert_eq!(keyboard.inline_keyboard.len(), 2);
        assert_eq!(keyboard.inline_keyboard[0][0].text, "Рулонные шторы");
    }

    #[test]
    fn test_product_keyboard_callback_data() {
        let keyboard = product_keyboard(42);
        let row = &keyboard.inline_keyboard[0];
        assert_eq!(row.len(), 2);
    }
}
