use chrono::{Duration, Utc};

use blinds_bot::dialogue::{
    phone_from_parts, prompt_expired, LeadState, LEAD_PROMPT_TTL_MINUTES,
};

/// A shared contact always wins over whatever text came with the message.
#[test]
fn test_contact_share_beats_free_text() {
    let phone = phone_from_parts(Some("+79990000000"), Some("мой номер ниже"));
    assert_eq!(phone.as_deref(), Some("+79990000000"));
}

/// Free-text numbers are accepted verbatim after trimming: no format
/// validation is applied at capture time.
#[test]
fn test_free_text_phone_is_not_normalized() {
    let phone = phone_from_parts(None, Some("  8 (999) 000-00-00 "));
    assert_eq!(phone.as_deref(), Some("8 (999) 000-00-00"));
}

#[test]
fn test_nothing_usable_yields_no_phone() {
    assert!(phone_from_parts(None, None).is_none());
    assert!(phone_from_parts(Some("   "), Some("\t")).is_none());
}

/// The prompt expires strictly after the TTL, so a reply at exactly the
/// boundary still counts as a phone submission.
#[test]
fn test_prompt_ttl_boundary() {
    let now = Utc::now();
    let at_ttl = now - Duration::minutes(LEAD_PROMPT_TTL_MINUTES);
    let past_ttl = now - Duration::minutes(LEAD_PROMPT_TTL_MINUTES) - Duration::seconds(1);

    assert!(!prompt_expired(at_ttl, now));
    assert!(prompt_expired(past_ttl, now));
}

#[test]
fn test_fresh_dialogue_starts_idle() {
    assert!(matches!(LeadState::default(), LeadState::Idle));
}

/// The awaiting state carries the optional product name from "order" buttons.
#[test]
fn test_awaiting_state_carries_product() {
    let state = LeadState::AwaitingPhone {
        requested_at: Utc::now(),
        product: Some("Вертикальные жалюзи".to_string()),
    };
    match state {
        LeadState::AwaitingPhone { product, .. } => {
            assert_eq!(product.as_deref(), Some("Вертикальные жалюзи"));
        }
        LeadState::Idle => panic!("expected AwaitingPhone"),
    }
}
