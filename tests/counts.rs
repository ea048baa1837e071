//! Tests for the dashboard count aggregation.

use std::sync::Arc;

use serde_json::json;

use mcl_licensing::counts::{
    CollectionCount, LicenseCounts, admin_counts, count_collection, license_counts,
};
use mcl_licensing::error::Error;
use mcl_licensing::store::{CollectionReader, MemoryStore, collections};

mod common;
use common::{FlakyStore, init_tracing, seed};

#[tokio::test]
async fn test_license_tally_invariant_across_mixed_encodings() {
    let store = MemoryStore::new();
    seed(
        &store,
        collections::LICENSES,
        &[
            json!({"licenseType": "trial"}),
            json!({"licenseType": "paid"}),
            json!({"isTrial": true}),
            json!({"isTrial": false}),
            json!({"plan": "trial"}),
            json!({"plan": "premium"}),
            json!({}),
        ],
    )
    .await;

    let reader = CollectionReader::new(Arc::new(store));
    let counts = license_counts(&reader).await;

    let tally = counts.tally().expect("licenses collection is readable");
    assert_eq!(tally.total, 7);
    assert_eq!(tally.trial, 3);
    assert_eq!(tally.paid, 2);
    assert_eq!(tally.unknown(), 2);
    assert_eq!(tally.trial + tally.paid + tally.unknown(), tally.total);
}

#[tokio::test]
async fn test_zero_is_distinguished_from_unavailable() {
    let store = FlakyStore::new(&[collections::IDEAS]);
    let reader = CollectionReader::new(Arc::new(store));

    let ideas = count_collection(&reader, collections::IDEAS).await;
    let messages = count_collection(&reader, collections::MESSAGES).await;

    assert!(ideas.is_unavailable());
    assert_eq!(ideas.to_string(), "—");
    assert_eq!(messages, CollectionCount::Available(0));
    assert_eq!(messages.to_string(), "0");
}

#[tokio::test]
async fn test_one_failed_read_downgrades_only_its_own_card() {
    init_tracing();
    let store = FlakyStore::new(&[collections::LICENSES]);
    seed(&store.inner, collections::IDEAS, &[json!({"idea": "mørk modus"})]).await;
    seed(
        &store.inner,
        collections::MESSAGES,
        &[json!({"message": "hei"}), json!({"message": "takk"})],
    )
    .await;

    let reader = CollectionReader::new(Arc::new(store));
    let counts = admin_counts(&reader).await;

    assert_eq!(counts.ideas, CollectionCount::Available(1));
    assert_eq!(counts.messages, CollectionCount::Available(2));
    assert_eq!(counts.licenses, LicenseCounts::Unavailable);

    let error = counts.partial_error().expect("one source failed");
    assert!(matches!(error, Error::PartialData(_)));
    assert!(error.to_string().contains("licenses"));
}

#[tokio::test]
async fn test_all_reads_ok_yields_no_partial_error() {
    let store = MemoryStore::new();
    seed(&store, collections::LICENSES, &[json!({"isTrial": true})]).await;

    let reader = CollectionReader::new(Arc::new(store));
    let counts = admin_counts(&reader).await;

    assert!(counts.partial_error().is_none());
    let tally = counts.licenses.tally().unwrap();
    assert_eq!((tally.total, tally.trial, tally.paid), (1, 1, 0));
}

#[tokio::test]
async fn test_reader_soft_read_renders_empty_on_failure() {
    let store = FlakyStore::new(&[collections::MESSAGES]);
    seed(&store.inner, collections::IDEAS, &[json!({"idea": "x"})]).await;

    let reader = CollectionReader::new(Arc::new(store));

    assert!(reader.read_or_empty(collections::MESSAGES, None).await.is_empty());
    assert_eq!(reader.read_newest(collections::IDEAS).await.len(), 1);
}

#[tokio::test]
async fn test_newest_first_ordering() {
    let store = MemoryStore::new();
    seed(
        &store,
        collections::MESSAGES,
        &[
            json!({"message": "eldst", "createdAt": 1_700_000_000}),
            json!({"message": "nyest", "createdAt": 1_700_000_200}),
            json!({"message": "midt", "createdAt": 1_700_000_100}),
        ],
    )
    .await;

    let reader = CollectionReader::new(Arc::new(store));
    let docs = reader.read_newest(collections::MESSAGES).await;

    let texts: Vec<Option<String>> = docs.iter().map(|d| d.str_field("message")).collect();
    assert_eq!(
        texts,
        vec![
            Some("nyest".to_string()),
            Some("midt".to_string()),
            Some("eldst".to_string())
        ]
    );
}
