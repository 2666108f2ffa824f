//! User-visible strings and canned channel content.
//!
//! The bot serves a single Russian-speaking audience, so strings live here
//! as constants instead of behind a localization layer.

/// Main menu reply-keyboard labels. The message handler matches on these
/// verbatim, so keep them in sync with `ui_builder::main_menu_keyboard`.
pub const BTN_CATALOG: &str = "🪟 Каталог";
pub const BTN_CALL: &str = "📞 Заказать звонок";
pub const BTN_PORTFOLIO: &str = "🖼 Наши работы";
pub const BTN_CONTACTS: &str = "☎️ Контакты";

/// Label on the share-contact button in the phone prompt keyboard.
pub const BTN_SHARE_PHONE: &str = "📲 Отправить мой номер";

pub const WELCOME: &str = "👋 Здравствуйте!\n\
Мы делаем стильные рулонные шторы и жалюзи на заказ в Астрахани.\n\
Быстрая установка, гарантия, скидки!\n\n\
Выберите, что вас интересует:";

pub const HELP: &str = "📌 Доступные команды:\n\
/start — главное меню\n\
/help — эта справка\n\
/contact — как с нами связаться\n\n\
Команды для публикаций в канал:\n\
/tip — совет эксперта\n\
/promo — акция недели\n\
/work — фото работы\n\
/post <тема> — сгенерировать пост через ИИ";

pub const CONTACTS: &str = "📞 Свяжитесь с нами:\n\
Менеджер: @yourmanager\n\
Работаем ежедневно с 9:00 до 21:00\n\
Замер — бесплатно в черте города.";

pub const PORTFOLIO: &str = "📸 Наши последние работы:\n\n\
Посмотрите реальные фото установок:\n\
👉 https://t.me/your_portfolio_channel\n\n\
Подписывайтесь и вдохновляйтесь!";

pub const FALLBACK: &str = "Спасибо за сообщение! 🙏\n\
Я не понял запрос — воспользуйтесь меню или нажмите /start.\n\
Или напишите напрямую: @yourmanager";

pub const CATALOG_INTRO: &str = "📦 Каталог продукции\n\nВыберите категорию:";

pub const NO_PRODUCTS: &str =
    "В этой категории пока нет товаров. Загляните позже или напишите менеджеру: @yourmanager";

pub const PHONE_PROMPT: &str = "📞 Оставьте номер телефона, и менеджер перезвонит \
вам в течение 15 минут.\n\n\
Нажмите кнопку ниже, чтобы поделиться контактом, или просто напишите номер.";

pub const PHONE_FAILED: &str = "😔 Не удалось прочитать номер.\n\
Нажмите «Заказать звонок» ещё раз и отправьте контакт или напишите номер текстом.";

pub const LEAD_SAVE_FAILED: &str = "😔 Не получилось сохранить заявку.\n\
Попробуйте ещё раз или напишите менеджеру напрямую: @yourmanager";

pub const GENERATING: &str = "🧠 Генерирую пост, секунду...";
pub const POST_PUBLISHED: &str = "✅ Опубликовано в канале!";
pub const POST_FAILED: &str = "❌ Не получилось опубликовать, попробуйте позже.";
pub const POST_TOPIC_HINT: &str =
    "📌 Укажите тему, например:\n/post Как выбрать рулонные шторы?";

/// Confirmation sent to the user after a lead is saved.
pub fn lead_confirmation(phone: &str) -> String {
    format!(
        "✅ Спасибо! Ваш номер {phone} передан менеджеру.\n\
         Мы перезвоним в ближайшее время."
    )
}

/// Notification sent to the manager chat when a lead is captured.
pub fn manager_notification(display_name: &str, telegram_id: i64, phone: &str) -> String {
    format!(
        "🔔 Новая заявка на звонок!\n\
         Имя: {display_name}\n\
         Телефон: {phone}\n\
         Telegram ID: {telegram_id}"
    )
}

/// Canned expert tips for the channel.
pub const TIPS: &[&str] = &[
    "💡 <b>Совет эксперта:</b>\nКак выбрать блэкаут-ткань?\n— Плотность: от 300 г/м²\n— Цвет: тёмные оттенки лучше блокируют свет",
    "🔥 <b>Лайфхак:</b>\nЧистите жалюзи влажной губкой с каплей средства для посуды — легко и безопасно!",
    "✅ <b>Идея для маленьких окон:</b>\nРулонные шторы «день-ночь» визуально увеличат пространство!",
];

/// Canned promos for the channel.
pub const PROMOS: &[&str] = &[
    "🎉 <b>Акция недели!</b>\nСкидка 20% на вертикальные жалюзи!\nТолько до воскресенья.\n👉 Напишите «Хочу скидку» — пришлём замерщика!",
    "🚀 <b>Установка за 1 день!</b>\nЗакажите до пятницы — установим в субботу!\nЦена как на сайте + подарок!",
];

/// Topics fed to the generator for the daily tip slot.
pub const POST_TOPICS: &[&str] = &[
    "Как выбрать рулонные шторы для кухни",
    "Чем вертикальные жалюзи лучше горизонтальных",
    "Уход за тканевыми роллетами",
    "Шторы день-ночь: плюсы и минусы",
];
