//! Postgres-backed stores. Need Docker; run with `cargo test -- --ignored`.

mod common;

use std::sync::Arc;

use bytes::Bytes;
use chrono::{Duration, Utc};
use cms_core::domains::auth::JwtService;
use cms_core::domains::resources::Document;
use cms_core::kernel::{
    BaseBlobStore, BaseDocumentStore, DeleteOutcome, ListQuery, PostgresBlobStore, PostgresStore,
    ReferenceCheck, ServerDeps, SortKey, TextSearch,
};
use cms_core::server::AppOptions;
use common::{tender_body, SharedTestInfra, TestHarness, TEST_ISSUER, TEST_SECRET};
use serde_json::{json, Map, Value};
use uuid::Uuid;

/// Collection name unique to one test; the database is shared.
fn collection(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4().simple())
}

fn fields(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object, got {other}"),
    }
}

async fn store() -> PostgresStore {
    let infra = SharedTestInfra::get().await;
    PostgresStore::new(infra.pool().await.unwrap())
}

fn query(sort: SortKey) -> ListQuery {
    ListQuery {
        status: None,
        search: None,
        sort,
        limit: 100,
    }
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn insert_find_replace_round_trip() {
    let store = store().await;
    let coll = collection("faqs");

    let doc = Document::new(fields(json!({"question": "Q", "answer": "A"})), Utc::now());
    let stored = store.insert(&coll, &doc).await.unwrap();
    assert_eq!(stored.id, doc.id);

    let mut changed = stored.clone();
    changed.fields.insert("answer".into(), json!("B"));
    changed.updated_at = stored.updated_at + Duration::seconds(1);
    let replaced = store.replace(&coll, &changed, &[]).await.unwrap().unwrap();
    assert_eq!(replaced.fields["answer"], "B");
    assert_eq!(replaced.created_at, stored.created_at);

    let found = store.find(&coll, doc.id).await.unwrap().unwrap();
    assert_eq!(found.fields["answer"], "B");

    // Collections are isolated.
    assert!(store.find("other", doc.id).await.unwrap().is_none());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn list_filters_searches_and_orders() {
    let store = store().await;
    let coll = collection("projects");
    let base = Utc::now();

    for (i, (title, sno, status)) in [
        ("Solar 50%", 3, "ongoing"),
        ("Wind farm", 1, "ongoing"),
        ("Solar grid", 2, "completed"),
    ]
    .into_iter()
    .enumerate()
    {
        let doc = Document::new(
            fields(json!({"title": title, "sno": sno, "status": status})),
            base + Duration::seconds(i as i64),
        );
        store.insert(&coll, &doc).await.unwrap();
    }
    // No sno: sorts after every numbered item.
    let unnumbered = Document::new(
        fields(json!({"title": "Unnumbered", "status": "ongoing"})),
        base + Duration::seconds(10),
    );
    store.insert(&coll, &unnumbered).await.unwrap();

    let by_sno = store
        .list(
            &coll,
            &query(SortKey::Field {
                name: "sno",
                numeric: true,
                descending: false,
            }),
        )
        .await
        .unwrap();
    let titles: Vec<_> = by_sno.items.iter().map(|d| d.str_field("title").unwrap()).collect();
    assert_eq!(titles, ["Wind farm", "Solar grid", "Solar 50%", "Unnumbered"]);
    assert_eq!(by_sno.total, 4);

    let newest = store.list(&coll, &query(SortKey::NewestFirst)).await.unwrap();
    assert_eq!(newest.items[0].id, unnumbered.id);

    let mut filtered = query(SortKey::NewestFirst);
    filtered.status = Some("ongoing".into());
    filtered.search = Some(TextSearch {
        term: "SOLAR".into(),
        fields: vec!["title"],
    });
    let page = store.list(&coll, &filtered).await.unwrap();
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].str_field("title"), Some("Solar 50%"));

    // Wildcards are matched literally.
    let mut literal = query(SortKey::NewestFirst);
    literal.search = Some(TextSearch {
        term: "%".into(),
        fields: vec!["title"],
    });
    assert_eq!(store.list(&coll, &literal).await.unwrap().total, 1);

    let mut limited = query(SortKey::NewestFirst);
    limited.limit = 2;
    let page = store.list(&coll, &limited).await.unwrap();
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.total, 4);

    let mut empty = query(SortKey::NewestFirst);
    empty.status = Some("archived".into());
    let page = store.list(&coll, &empty).await.unwrap();
    assert!(page.items.is_empty());
    assert_eq!(page.total, 0);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn increments_are_atomic() {
    let store = Arc::new(store().await);
    let coll = collection("news");
    let doc = Document::new(fields(json!({"title": "t", "views": 0})), Utc::now());
    let stored = store.insert(&coll, &doc).await.unwrap();

    let mut tasks = tokio::task::JoinSet::new();
    for _ in 0..20 {
        let store = store.clone();
        let coll = coll.clone();
        tasks.spawn(async move { store.increment(&coll, doc.id, "views").await.unwrap() });
    }
    while let Some(result) = tasks.join_next().await {
        assert!(result.unwrap().is_some());
    }

    let found = store.find(&coll, doc.id).await.unwrap().unwrap();
    assert_eq!(found.fields["views"], json!(20));
    assert_eq!(found.updated_at, stored.updated_at);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn replace_keeps_counter_incremented_meanwhile() {
    let store = store().await;
    let coll = collection("blogs");
    let doc = Document::new(fields(json!({"title": "a", "views": 0})), Utc::now());
    let stored = store.insert(&coll, &doc).await.unwrap();

    store.increment(&coll, doc.id, "views").await.unwrap();

    let mut edited = stored.clone();
    edited.fields.insert("title".into(), json!("b"));
    edited.updated_at = stored.updated_at + Duration::seconds(1);
    let replaced = store
        .replace(&coll, &edited, &["views"])
        .await
        .unwrap()
        .unwrap();
    assert_eq!(replaced.fields["title"], "b");
    assert_eq!(replaced.fields["views"], json!(1));
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn sequences_skip_values_outside_the_counter_range() {
    let store = store().await;
    let coll = collection("ongoing-projects");
    for sno in [json!(1e19), json!(2.5)] {
        let doc = Document::new(fields(json!({"title": "t", "sno": sno})), Utc::now());
        store.insert(&coll, &doc).await.unwrap();
    }
    assert_eq!(store.next_sequence(&coll, "sno").await.unwrap(), 1);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn sequences_never_fall_below_stored_values() {
    let store = store().await;
    let coll = collection("ongoing-projects");

    assert_eq!(store.next_sequence(&coll, "sno").await.unwrap(), 1);
    assert_eq!(store.next_sequence(&coll, "sno").await.unwrap(), 2);

    let doc = Document::new(fields(json!({"title": "t", "sno": 40})), Utc::now());
    store.insert(&coll, &doc).await.unwrap();
    assert_eq!(store.next_sequence(&coll, "sno").await.unwrap(), 41);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn delete_is_refused_while_referenced() {
    let store = store().await;
    let parents = collection("categories");
    let children = "store-test-startups";
    let name = format!("AgriTech {}", Uuid::new_v4());

    let parent = Document::new(fields(json!({"name": name})), Utc::now());
    store.insert(&parents, &parent).await.unwrap();
    let child = Document::new(fields(json!({"name": "FarmIQ", "category": name})), Utc::now());
    store.insert(children, &child).await.unwrap();

    let checks = [ReferenceCheck {
        collection: children,
        field: "category",
        value: name.clone(),
    }];
    assert_eq!(store.count_matching(children, "category", &name).await.unwrap(), 1);
    assert_eq!(
        store.delete_unreferenced(&parents, parent.id, &checks).await.unwrap(),
        DeleteOutcome::Referenced(1)
    );

    store
        .delete_unreferenced(children, child.id, &[])
        .await
        .unwrap();
    assert_eq!(
        store.delete_unreferenced(&parents, parent.id, &checks).await.unwrap(),
        DeleteOutcome::Deleted
    );
    assert_eq!(
        store.delete_unreferenced(&parents, parent.id, &checks).await.unwrap(),
        DeleteOutcome::NotFound
    );
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn blobs_are_content_addressed() {
    let infra = SharedTestInfra::get().await;
    let blobs = PostgresBlobStore::new(infra.pool().await.unwrap());
    let bytes = Bytes::from(format!("%PDF-1.7 {}", Uuid::new_v4()));

    let first = blobs.put("application/pdf", bytes.clone()).await.unwrap();
    let second = blobs.put("application/pdf", bytes.clone()).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(first.size_bytes, bytes.len() as i64);

    let blob = blobs.get(&first.id).await.unwrap().unwrap();
    assert_eq!(blob.bytes, bytes);
    assert!(blobs.get(&"f".repeat(64)).await.unwrap().is_none());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn http_api_runs_on_postgres() {
    let infra = SharedTestInfra::get().await;
    let jwt = Arc::new(JwtService::new(TEST_SECRET, TEST_ISSUER.to_string()));
    let deps = Arc::new(ServerDeps::postgres(infra.pool().await.unwrap(), jwt));
    let h = TestHarness::with_deps(deps, AppOptions::default()).await.unwrap();

    let ref_no = format!("PG-{}", Uuid::new_v4().simple());
    let id = h.create("tenders", &tender_body(&ref_no)).await;

    let (status, item) = h.get(&format!("/api/tenders/{id}")).await;
    assert_eq!(status, 200);
    assert_eq!(item["data"]["refNo"], ref_no.as_str());

    let (_, found) = h.get(&format!("/api/tenders?status=all&search={ref_no}")).await;
    assert_eq!(found["total"], 1);

    let (status, _) = h.delete(&format!("/api/tenders/{id}")).await;
    assert_eq!(status, 200);
    assert_eq!(h.get(&format!("/api/tenders/{id}")).await.0, 404);
}
