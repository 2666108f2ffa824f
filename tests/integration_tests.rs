//! Cross-module checks: configuration, scheduling, generation plumbing and
//! the HTTP status surface.

use anyhow::Result;
use chrono::NaiveTime;
use rusqlite::Connection;
use serde_json::json;
use tempfile::NamedTempFile;

use blinds_bot::config::{default_slots, parse_recipient, parse_slots};
use blinds_bot::db::{init_schema, random_product, seed_products, try_claim_post_slot};
use blinds_bot::llm::{completion_request, extract_completion_text, truncate_caption, CAPTION_LIMIT};
use blinds_bot::poster::due_slot;
use blinds_bot::texts;
use blinds_bot::web::status_payload;
use teloxide::types::{ChatId, Recipient};

/// A full day of minute ticks fires each configured slot exactly once, and
/// the persisted claim turns repeats into no-ops.
#[test]
fn test_schedule_fires_once_per_slot_per_day() -> Result<()> {
    let temp_file = NamedTempFile::new()?;
    let conn = Connection::open(temp_file.path())?;
    init_schema(&conn)?;

    let slots = parse_slots("10:00,15:00,19:30")?;
    let mut published = 0;

    for hour in 0..24 {
        for minute in 0..60 {
            let now = NaiveTime::from_hms_opt(hour, minute, 0).expect("valid time");
            if let Some(slot) = due_slot(now, &slots) {
                if try_claim_post_slot(&conn, "2025-03-10", slot)? {
                    published += 1;
                }
            }
        }
    }

    assert_eq!(published, slots.len());

    // The next day starts fresh
    assert!(try_claim_post_slot(&conn, "2025-03-11", 0)?);
    Ok(())
}

#[test]
fn test_default_slots_are_due_at_their_minute() {
    let slots = default_slots();
    for (index, slot) in slots.iter().enumerate() {
        let now = NaiveTime::from_hms_opt(slot.hour, slot.minute, 30).expect("valid time");
        assert_eq!(due_slot(now, &slots), Some(index));
    }
}

/// The work-photo slot needs a product to post; the seed guarantees one.
#[test]
fn test_seeded_catalog_feeds_the_work_slot() -> Result<()> {
    let temp_file = NamedTempFile::new()?;
    let conn = Connection::open(temp_file.path())?;
    init_schema(&conn)?;
    seed_products(&conn)?;

    let product = random_product(&conn)?.expect("seeded catalog must not be empty");
    assert!(!product.name.is_empty());
    Ok(())
}

#[test]
fn test_channel_recipient_forms() -> Result<()> {
    assert_eq!(
        parse_recipient("@blinds_channel")?,
        Recipient::ChannelUsername("@blinds_channel".to_string())
    );
    assert_eq!(
        parse_recipient("-1009876543210")?,
        Recipient::Id(ChatId(-1009876543210))
    );
    Ok(())
}

/// The generated-post pipeline: request body carries the topic, the response
/// text is extracted and capped to the caption limit.
#[test]
fn test_generation_pipeline_shapes() -> Result<()> {
    let topic = texts::POST_TOPICS[0];
    let body = completion_request("b1test", topic);
    assert!(body["messages"][1]["text"]
        .as_str()
        .expect("user message text")
        .contains(topic));

    let response = json!({
        "result": {
            "alternatives": [
                { "message": { "role": "assistant", "text": "я".repeat(3000) } }
            ]
        }
    });
    let text = extract_completion_text(&response)?;
    let capped = truncate_caption(&text, CAPTION_LIMIT);
    assert!(capped.chars().count() <= CAPTION_LIMIT);
    Ok(())
}

#[test]
fn test_health_payload_contract() {
    let payload = status_payload();
    assert_eq!(payload["status"].as_str(), Some("running"));
}
