use anyhow::Result;
use rusqlite::Connection;
use tempfile::NamedTempFile;

use blinds_bot::db::{
    count_leads_for_user, create_lead, get_lead, get_product, init_schema, list_categories,
    log_message, products_by_category, seed_products, try_claim_post_slot,
};

fn setup_test_db() -> Result<(Connection, NamedTempFile)> {
    let temp_file = NamedTempFile::new()?;
    let conn = Connection::open(temp_file.path())?;
    init_schema(&conn)?;
    Ok((conn, temp_file))
}

/// The schema and the seed are both idempotent: a restarted process goes
/// through the same startup path without duplicating anything.
#[test]
fn test_startup_path_is_idempotent() -> Result<()> {
    let (conn, _temp_file) = setup_test_db()?;

    let first = seed_products(&conn)?;
    init_schema(&conn)?;
    let second = seed_products(&conn)?;

    assert!(first >= 1);
    assert_eq!(second, 0);
    Ok(())
}

#[test]
fn test_catalog_drill_down() -> Result<()> {
    let (conn, _temp_file) = setup_test_db()?;
    seed_products(&conn)?;

    let categories = list_categories(&conn)?;
    assert!(!categories.is_empty());

    // Every category resolves to at least one product, and filtering is exact
    for category in &categories {
        let products = products_by_category(&conn, category)?;
        assert!(!products.is_empty());
        for product in &products {
            assert_eq!(&product.category, category);
        }
    }

    // An unknown category yields an empty list, not an error
    assert!(products_by_category(&conn, "Натяжные потолки")?.is_empty());
    Ok(())
}

#[test]
fn test_lead_lifecycle() -> Result<()> {
    let (conn, _temp_file) = setup_test_db()?;

    let lead_id = create_lead(&conn, 555001, "Анна", "+79990000000")?;
    let lead = get_lead(&conn, lead_id)?.expect("lead must exist");

    assert_eq!(lead.telegram_id, 555001);
    assert_eq!(lead.phone, "+79990000000");
    assert_eq!(lead.status, "new");
    assert_eq!(count_leads_for_user(&conn, 555001)?, 1);
    assert_eq!(count_leads_for_user(&conn, 555002)?, 0);
    Ok(())
}

#[test]
fn test_message_audit_trail() -> Result<()> {
    let (conn, _temp_file) = setup_test_db()?;

    log_message(&conn, 777, "in", "📞 Заказать звонок")?;
    log_message(&conn, 777, "out", "✅ Спасибо!")?;

    let directions: Vec<String> = {
        let mut stmt = conn.prepare(
            "SELECT direction FROM messages WHERE telegram_id = 777 ORDER BY id",
        )?;
        let rows = stmt.query_map([], |row| row.get(0))?;
        rows.collect::<rusqlite::Result<_>>()?
    };
    assert_eq!(directions, vec!["in".to_string(), "out".to_string()]);
    Ok(())
}

/// The scheduler claims a (date, slot) pair exactly once, even across a
/// simulated restart with a fresh connection to the same file.
#[test]
fn test_post_slot_claim_is_persistent() -> Result<()> {
    let temp_file = NamedTempFile::new()?;

    {
        let conn = Connection::open(temp_file.path())?;
        init_schema(&conn)?;
        assert!(try_claim_post_slot(&conn, "2025-03-10", 0)?);
        assert!(!try_claim_post_slot(&conn, "2025-03-10", 0)?);
        assert!(try_claim_post_slot(&conn, "2025-03-10", 1)?);
    }

    let conn = Connection::open(temp_file.path())?;
    init_schema(&conn)?;
    assert!(!try_claim_post_slot(&conn, "2025-03-10", 0)?);
    assert!(!try_claim_post_slot(&conn, "2025-03-10", 1)?);
    assert!(try_claim_post_slot(&conn, "2025-03-11", 0)?);
    Ok(())
}

/// A failed save surfaces as `Err` so the lead flow can apologize to the
/// user instead of dropping the conversation.
#[test]
fn test_create_lead_without_schema_is_an_error() -> Result<()> {
    let temp_file = NamedTempFile::new()?;
    let conn = Connection::open(temp_file.path())?;

    assert!(create_lead(&conn, 555003, "Анна", "+79990000000").is_err());
    Ok(())
}

#[test]
fn test_get_product_unknown_id_is_none() -> Result<()> {
    let (conn, _temp_file) = setup_test_db()?;
    seed_products(&conn)?;

    assert!(get_product(&conn, 424242)?.is_none());
    Ok(())
}
