//! SQLite repository: products, leads, message log and poster idempotency.
//!
//! Plain synchronous CRUD over a shared connection. The schema is created
//! idempotently at startup and the product catalog is seeded once when the
//! table is empty.

use anyhow::{Context, Result};
use log::info;
use rusqlite::{params, Connection};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Shared database handle passed around through the application context.
pub type SharedConn = Arc<Mutex<Connection>>;

/// A catalog product. Seeded at startup, read-only at runtime.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub category: String,
    /// Starting price in roubles per square meter, if known.
    pub price_from: Option<i64>,
    pub photo_url: Option<String>,
}

/// A captured lead: a customer's phone number awaiting manual follow-up.
#[derive(Debug, Clone, PartialEq)]
pub struct Lead {
    pub id: i64,
    pub telegram_id: i64,
    pub display_name: String,
    pub phone: String,
    pub status: String,
    pub created_at: String,
}

/// Initialize the database schema.
pub fn init_schema(conn: &Connection) -> Result<()> {
    info!("Initializing database schema...");

    conn.execute(
        "CREATE TABLE IF NOT EXISTS products (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            description TEXT NOT NULL,
            category TEXT NOT NULL,
            price_from INTEGER,
            photo_url TEXT
        )",
        [],
    )
    .context("Failed to create products table")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS leads (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            telegram_id INTEGER NOT NULL,
            display_name TEXT NOT NULL,
            phone TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'new',
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )
    .context("Failed to create leads table")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS messages (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            telegram_id INTEGER NOT NULL,
            direction TEXT NOT NULL,
            text TEXT NOT NULL,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )
    .context("Failed to create messages table")?;

    // One row per published slot per calendar day. The UNIQUE constraint is
    // what makes scheduled posting restart-safe.
    conn.execute(
        "CREATE TABLE IF NOT EXISTS channel_posts (
            post_date TEXT NOT NULL,
            slot INTEGER NOT NULL,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
            UNIQUE(post_date, slot)
        )",
        [],
    )
    .context("Failed to create channel_posts table")?;

    info!("Database schema initialized successfully");
    Ok(())
}

/// Seed the product catalog if it is empty. Returns the number of rows
/// inserted (0 when the catalog already exists).
pub fn seed_products(conn: &Connection) -> Result<usize> {
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM products", [], |row| row.get(0))
        .context("Failed to count products")?;
    if count > 0 {
        return Ok(0);
    }

    let seed: &[(&str, &str, &str, Option<i64>, Option<&str>)] = &[
        (
            "Рулонные шторы «День-ночь»",
            "Двойная ткань с чередованием полос: регулируйте свет одним движением.",
            "Рулонные шторы",
            Some(1500),
            Some("https://img.freepik.com/free-photo/modern-living-room-interior-design_1268-16720.jpg"),
        ),
        (
            "Тканевые роллеты блэкаут",
            "Полное затемнение для спальни: плотность от 300 г/м².",
            "Рулонные шторы",
            Some(1800),
            None,
        ),
        (
            "Вертикальные жалюзи",
            "Классика для офиса и дома, ламели 89 мм, управление цепочкой.",
            "Вертикальные жалюзи",
            Some(1200),
            Some("https://img.freepik.com/free-photo/vertical-blinds-window_1268-17953.jpg"),
        ),
        (
            "Горизонтальные алюминиевые",
            "Лёгкие и практичные, подходят для кухни и балкона.",
            "Горизонтальные жалюзи",
            Some(1000),
            None,
        ),
    ];

    let mut inserted = 0;
    for (name, description, category, price_from, photo_url) in seed {
        conn.execute(
            "INSERT INTO products (name, description, category, price_from, photo_url)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![name, description, category, price_from, photo_url],
        )
        .context("Failed to seed product")?;
        inserted += 1;
    }

    info!("Seeded {} products", inserted);
    Ok(inserted)
}

fn product_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Product> {
    Ok(Product {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        category: row.get(3)?,
        price_from: row.get(4)?,
        photo_url: row.get(5)?,
    })
}

/// List distinct product categories in insertion order.
pub fn list_categories(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn
        .prepare("SELECT DISTINCT category FROM products ORDER BY id")
        .context("Failed to prepare categories statement")?;
    let rows = stmt
        .query_map([], |row| row.get::<_, String>(0))
        .context("Failed to query categories")?;
    let mut categories = Vec::new();
    for row in rows {
        categories.push(row?);
    }
    Ok(categories)
}

/// Products tagged with exactly the given category.
pub fn products_by_category(conn: &Connection, category: &str) -> Result<Vec<Product>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, name, description, category, price_from, photo_url
             FROM products WHERE category = ?1 ORDER BY id",
        )
        .context("Failed to prepare products statement")?;
    let rows = stmt
        .query_map(params![category], product_from_row)
        .context("Failed to query products")?;
    let mut products = Vec::new();
    for row in rows {
        products.push(row?);
    }
    Ok(products)
}

/// Read a product by id.
pub fn get_product(conn: &Connection, product_id: i64) -> Result<Option<Product>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, name, description, category, price_from, photo_url
             FROM products WHERE id = ?1",
        )
        .context("Failed to prepare product statement")?;
    match stmt.query_row(params![product_id], product_from_row) {
        Ok(product) => Ok(Some(product)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e).context("Failed to read product"),
    }
}

/// A random product for the scheduled work-photo post.
pub fn random_product(conn: &Connection) -> Result<Option<Product>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, name, description, category, price_from, photo_url
             FROM products ORDER BY RANDOM() LIMIT 1",
        )
        .context("Failed to prepare random product statement")?;
    match stmt.query_row([], product_from_row) {
        Ok(product) => Ok(Some(product)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e).context("Failed to read random product"),
    }
}

/// Persist a captured lead. The phone must already be non-empty; the lead
/// flow guarantees it.
pub fn create_lead(
    conn: &Connection,
    telegram_id: i64,
    display_name: &str,
    phone: &str,
) -> Result<i64> {
    conn.execute(
        "INSERT INTO leads (telegram_id, display_name, phone, status)
         VALUES (?1, ?2, ?3, 'new')",
        params![telegram_id, display_name, phone],
    )
    .context("Failed to insert lead")?;

    let lead_id = conn.last_insert_rowid();
    info!("Lead created with ID: {} for telegram_id: {}", lead_id, telegram_id);
    Ok(lead_id)
}

/// Read a lead by id.
pub fn get_lead(conn: &Connection, lead_id: i64) -> Result<Option<Lead>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, telegram_id, display_name, phone, status, created_at
             FROM leads WHERE id = ?1",
        )
        .context("Failed to prepare lead statement")?;
    let lead = stmt.query_row(params![lead_id], |row| {
        Ok(Lead {
            id: row.get(0)?,
            telegram_id: row.get(1)?,
            display_name: row.get(2)?,
            phone: row.get(3)?,
            status: row.get(4)?,
            created_at: row.get(5)?,
        })
    });
    match lead {
        Ok(lead) => Ok(Some(lead)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e).context("Failed to read lead"),
    }
}

/// Count leads recorded for a user. Used by tests to assert the
/// exactly-one-lead-per-trigger property.
pub fn count_leads_for_user(conn: &Connection, telegram_id: i64) -> Result<i64> {
    conn.query_row(
        "SELECT COUNT(*) FROM leads WHERE telegram_id = ?1",
        params![telegram_id],
        |row| row.get(0),
    )
    .context("Failed to count leads")
}

/// Append to the write-only message audit trail.
pub fn log_message(
    conn: &Connection,
    telegram_id: i64,
    direction: &str,
    text: &str,
) -> Result<()> {
    conn.execute(
        "INSERT INTO messages (telegram_id, direction, text) VALUES (?1, ?2, ?3)",
        params![telegram_id, direction, text],
    )
    .context("Failed to log message")?;
    Ok(())
}

/// Claim a publishing slot for the given date. Returns `true` exactly once
/// per `(date, slot)` pair; subsequent calls (same tick, later ticks, or a
/// restarted process) return `false`.
pub fn try_claim_post_slot(conn: &Connection, post_date: &str, slot: usize) -> Result<bool> {
    let affected = conn
        .execute(
            "INSERT OR IGNORE INTO channel_posts (post_date, slot) VALUES (?1, ?2)",
            params![post_date, slot as i64],
        )
        .context("Failed to claim post slot")?;
    Ok(affected > 0)
}
