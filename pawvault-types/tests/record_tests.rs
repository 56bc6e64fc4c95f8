use chrono::Utc;
use pawvault_types::{KeyRecord, PrincipalId, DEFAULT_KEY_STRENGTH};
use pretty_assertions::assert_eq;

fn sample_record() -> KeyRecord {
    let now = Utc::now();
    KeyRecord {
        principal_id: PrincipalId::new("user-1"),
        public_key: "aabb:ccdd".to_string(),
        private_key: "1122:3344".to_string(),
        key_strength: DEFAULT_KEY_STRENGTH,
        created_at: now,
        updated_at: now,
    }
}

#[test]
fn default_strength_is_2048() {
    assert_eq!(DEFAULT_KEY_STRENGTH, 2048);
}

#[test]
fn serde_round_trip_preserves_all_fields() {
    let record = sample_record();
    let json = serde_json::to_string(&record).unwrap();
    let back: KeyRecord = serde_json::from_str(&json).unwrap();
    assert_eq!(back, record);
}

#[test]
fn key_presence_reflects_wrapped_halves() {
    let mut record = sample_record();
    assert!(record.has_public_key());
    assert!(record.has_private_key());

    record.private_key.clear();
    assert!(record.has_public_key());
    assert!(!record.has_private_key());
}
