use pawvault_keystore::{KeyStore, NewKeyRecord, SqliteKeyStore, StoreError};
use pawvault_types::PrincipalId;

fn record_for(principal: &str) -> NewKeyRecord {
    NewKeyRecord {
        principal_id: PrincipalId::new(principal),
        public_key: format!("aabbcc:wrapped-public-{principal}"),
        private_key: format!("ddeeff:wrapped-private-{principal}"),
        key_strength: 2048,
    }
}

// ── Basic CRUD ───────────────────────────────────────────────────

#[tokio::test]
async fn insert_then_find_round_trips() {
    let store = SqliteKeyStore::open_in_memory().unwrap();
    let principal = PrincipalId::new("user-1");

    store.insert(record_for("user-1")).await.unwrap();

    let record = store.find_by_principal(&principal).await.unwrap().unwrap();
    assert_eq!(record.principal_id, principal);
    assert_eq!(record.public_key, "aabbcc:wrapped-public-user-1");
    assert_eq!(record.private_key, "ddeeff:wrapped-private-user-1");
    assert_eq!(record.key_strength, 2048);
    assert_eq!(record.created_at, record.updated_at);
}

#[tokio::test]
async fn find_missing_principal_returns_none() {
    let store = SqliteKeyStore::open_in_memory().unwrap();
    let found = store
        .find_by_principal(&PrincipalId::new("ghost"))
        .await
        .unwrap();
    assert!(found.is_none());
}

#[tokio::test]
async fn exists_tracks_insert_and_remove() {
    let store = SqliteKeyStore::open_in_memory().unwrap();
    let principal = PrincipalId::new("user-1");

    assert!(!store.exists(&principal).await.unwrap());
    store.insert(record_for("user-1")).await.unwrap();
    assert!(store.exists(&principal).await.unwrap());
    store.remove(&principal).await.unwrap();
    assert!(!store.exists(&principal).await.unwrap());
}

// ── Uniqueness ───────────────────────────────────────────────────

#[tokio::test]
async fn second_insert_for_same_principal_fails() {
    let store = SqliteKeyStore::open_in_memory().unwrap();
    store.insert(record_for("user-1")).await.unwrap();

    let err = store.insert(record_for("user-1")).await.unwrap_err();
    assert!(matches!(err, StoreError::DuplicatePrincipal(p) if p.as_str() == "user-1"));

    // The original record is untouched.
    let record = store
        .find_by_principal(&PrincipalId::new("user-1"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(record.public_key, "aabbcc:wrapped-public-user-1");
}

#[tokio::test]
async fn remove_then_insert_succeeds() {
    let store = SqliteKeyStore::open_in_memory().unwrap();
    let principal = PrincipalId::new("user-1");

    store.insert(record_for("user-1")).await.unwrap();
    store.remove(&principal).await.unwrap();
    store.insert(record_for("user-1")).await.unwrap();
    assert!(store.exists(&principal).await.unwrap());
}

#[tokio::test]
async fn remove_is_idempotent() {
    let store = SqliteKeyStore::open_in_memory().unwrap();
    let principal = PrincipalId::new("never-existed");

    store.remove(&principal).await.unwrap();
    store.remove(&principal).await.unwrap();
}

// ── Listing ──────────────────────────────────────────────────────

#[tokio::test]
async fn list_all_returns_every_record() {
    let store = SqliteKeyStore::open_in_memory().unwrap();

    assert!(store.list_all().await.unwrap().is_empty());

    store.insert(record_for("a")).await.unwrap();
    store.insert(record_for("c")).await.unwrap();
    store.insert(record_for("b")).await.unwrap();

    let records = store.list_all().await.unwrap();
    assert_eq!(records.len(), 3);
    let ids: Vec<&str> = records.iter().map(|r| r.principal_id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b", "c"]);
}

// ── File-backed persistence ──────────────────────────────────────

#[tokio::test]
async fn records_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("keys.db");
    let path = path.to_str().unwrap();

    {
        let store = SqliteKeyStore::open(path).unwrap();
        store.insert(record_for("user-1")).await.unwrap();
    }

    let store = SqliteKeyStore::open(path).unwrap();
    let record = store
        .find_by_principal(&PrincipalId::new("user-1"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(record.private_key, "ddeeff:wrapped-private-user-1");
}
