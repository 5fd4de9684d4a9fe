//! List filtering, search, limits and ordering.

mod common;

use common::TestHarness;
use serde_json::{json, Value};

fn field_values(list: &Value, field: &str) -> Vec<Value> {
    list["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item[field].clone())
        .collect()
}

#[tokio::test]
async fn status_filter_matches_exactly_and_all_disables_it() {
    let h = TestHarness::new().await.unwrap();
    h.create("announcements", &json!({"title": "Live", "status": "active"}))
        .await;
    h.create("announcements", &json!({"title": "Old", "status": "inactive"}))
        .await;

    let (status, active) = h.get("/api/announcements?status=active").await;
    assert_eq!(status, 200);
    assert_eq!(active["count"], 1);
    assert!(field_values(&active, "status").iter().all(|s| s == "active"));

    let (_, all) = h.get("/api/announcements?status=all").await;
    assert_eq!(all["count"], 2);

    // Announcements have no default filter.
    let (_, unfiltered) = h.get("/api/announcements").await;
    assert_eq!(unfiltered["count"], 2);
}

#[tokio::test]
async fn editorial_lists_default_to_published() {
    let h = TestHarness::new().await.unwrap();
    h.create(
        "blogs",
        &json!({"title": "Draft post", "author": "A", "content": "<p>x</p>"}),
    )
    .await;
    h.create(
        "blogs",
        &json!({"title": "Live post", "author": "A", "content": "<p>x</p>", "status": "published"}),
    )
    .await;

    let (_, public) = h.get("/api/blogs").await;
    assert_eq!(field_values(&public, "title"), vec![json!("Live post")]);

    let (_, drafts) = h.get("/api/blogs?status=draft").await;
    assert_eq!(field_values(&drafts, "title"), vec![json!("Draft post")]);

    let (_, all) = h.get("/api/blogs?status=all").await;
    assert_eq!(all["count"], 2);
}

#[tokio::test]
async fn search_is_case_insensitive_over_designated_fields() {
    let h = TestHarness::new().await.unwrap();
    h.create(
        "careers",
        &json!({"title": "Research Associate", "department": "Energy", "description": "<p>x</p>", "lastDate": "2025-02-01"}),
    )
    .await;
    h.create(
        "careers",
        &json!({"title": "Accountant", "department": "FINANCE", "description": "<p>x</p>", "lastDate": "2025-02-01"}),
    )
    .await;
    // "finance" only appears in a field that is not searchable.
    h.create(
        "careers",
        &json!({"title": "Driver", "department": "Transport", "qualifications": "finance basics", "description": "<p>x</p>", "lastDate": "2025-02-01"}),
    )
    .await;

    let (_, found) = h.get("/api/careers?search=finance").await;
    assert_eq!(field_values(&found, "title"), vec![json!("Accountant")]);

    let (_, found) = h.get("/api/careers?search=ASSOC").await;
    assert_eq!(field_values(&found, "title"), vec![json!("Research Associate")]);

    let (_, none) = h.get("/api/careers?search=astronaut").await;
    assert_eq!(none["count"], 0);
}

#[tokio::test]
async fn search_terms_match_literally() {
    let h = TestHarness::new().await.unwrap();
    h.create("announcements", &json!({"title": "100% attendance"}))
        .await;
    h.create("announcements", &json!({"title": "Full attendance"}))
        .await;

    let (_, found) = h.get("/api/announcements?search=%25").await;
    assert_eq!(field_values(&found, "title"), vec![json!("100% attendance")]);
}

#[tokio::test]
async fn limit_caps_items_but_not_total() {
    let h = TestHarness::new().await.unwrap();
    for i in 0..5 {
        h.create("tenders", &common::tender_body(&format!("T-{i:03}")))
            .await;
    }

    let (status, page) = h.get("/api/tenders?limit=2").await;
    assert_eq!(status, 200);
    assert_eq!(page["count"], 2);
    assert_eq!(page["total"], 5);

    let (status, resp) = h.get("/api/tenders?limit=0").await;
    assert_eq!(status, 400);
    assert_eq!(resp["message"], "limit must be a positive integer");

    let (status, _) = h.get("/api/tenders?limit=abc").await;
    assert_eq!(status, 400);
}

#[tokio::test]
async fn total_is_only_reported_where_declared() {
    let h = TestHarness::new().await.unwrap();
    h.create("faqs", &json!({"question": "Q?", "answer": "<p>A</p>"}))
        .await;

    let (_, page) = h.get("/api/faqs").await;
    assert_eq!(page["count"], 1);
    assert!(page.get("total").is_none());
}

#[tokio::test]
async fn default_order_is_newest_first() {
    let h = TestHarness::new().await.unwrap();
    for title in ["first", "second", "third"] {
        h.create("announcements", &json!({ "title": title })).await;
    }

    let (_, list) = h.get("/api/announcements").await;
    assert_eq!(
        field_values(&list, "title"),
        vec![json!("third"), json!("second"), json!("first")]
    );
}

#[tokio::test]
async fn explicit_sort_fields_order_lists() {
    let h = TestHarness::new().await.unwrap();
    for sno in [3, 1, 2] {
        h.create(
            "ongoing-projects",
            &json!({"title": format!("Project {sno}"), "sno": sno}),
        )
        .await;
    }
    let (_, projects) = h.get("/api/ongoing-projects").await;
    assert_eq!(
        field_values(&projects, "sno"),
        vec![json!(1), json!(2), json!(3)]
    );

    for date in ["2025-01-10", "2025-03-01", "2024-12-31"] {
        h.create("events", &json!({"title": date, "date": date})).await;
    }
    let (_, events) = h.get("/api/events").await;
    assert_eq!(
        field_values(&events, "date"),
        vec![json!("2025-03-01"), json!("2025-01-10"), json!("2024-12-31")]
    );
}

#[tokio::test]
async fn listing_never_touches_view_counters() {
    let h = TestHarness::new().await.unwrap();
    h.create(
        "news",
        &json!({"title": "Grant awarded", "content": "<p>x</p>", "status": "published"}),
    )
    .await;

    for _ in 0..3 {
        h.get("/api/news").await;
    }
    let (_, list) = h.get("/api/news").await;
    assert_eq!(field_values(&list, "views"), vec![json!(0)]);
}
