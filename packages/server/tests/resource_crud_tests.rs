//! CRUD properties that hold for every catalog type, exercised over HTTP.

mod common;

use cms_core::domains::catalog;
use common::{title_field, valid_body, TestHarness};
use serde_json::json;

#[tokio::test]
async fn create_then_get_returns_input_plus_generated_fields() {
    let h = TestHarness::new().await.unwrap();

    for ty in catalog::all() {
        let body = valid_body(ty, "roundtrip");
        let (status, created) = h.post(&format!("/api/{}", ty.name), &body).await;
        assert_eq!(status, 201, "{}: {created}", ty.name);
        assert_eq!(created["success"], true);

        let id = created["data"]["id"].as_str().unwrap();
        let (status, fetched) = h.get(&format!("/api/{}/{}", ty.name, id)).await;
        assert_eq!(status, 200, "{}: {fetched}", ty.name);

        let item = &fetched["data"];
        for (key, value) in body.as_object().unwrap() {
            assert_eq!(&item[key], value, "{}.{key}", ty.name);
        }
        assert_eq!(item["id"], id);
        assert!(item["createdAt"].is_string(), "{} createdAt", ty.name);
        assert_eq!(item["createdAt"], created["data"]["createdAt"]);
        if let Some(status) = ty.status {
            assert_eq!(item["status"], status.initial, "{} initial status", ty.name);
        }
    }
}

#[tokio::test]
async fn create_without_required_field_fails_and_persists_nothing() {
    let h = TestHarness::new().await.unwrap();

    for ty in catalog::all() {
        let required = ty.fields.iter().find(|f| f.required).unwrap();
        let mut body = valid_body(ty, "missing");
        body.as_object_mut().unwrap().remove(required.name);

        let (status, resp) = h.post(&format!("/api/{}", ty.name), &body).await;
        assert_eq!(status, 400, "{}: {resp}", ty.name);
        assert_eq!(resp["success"], false);
        assert_eq!(resp["message"], format!("{} is required", required.name));

        let (_, list) = h.get(&format!("/api/{}?status=all", ty.name)).await;
        assert_eq!(list["count"], 0, "{} persisted an invalid item", ty.name);
    }
}

#[tokio::test]
async fn update_changes_only_the_supplied_field() {
    let h = TestHarness::new().await.unwrap();

    for ty in catalog::all() {
        let id = h.create(ty.name, &valid_body(ty, "before")).await;
        let (_, before) = h.get(&format!("/api/{}/{}", ty.name, id)).await;
        let before = before["data"].clone();

        let field = title_field(ty);
        let (status, updated) = h
            .put(&format!("/api/{}/{}", ty.name, id), &json!({ field: "Changed value" }))
            .await;
        assert_eq!(status, 200, "{}: {updated}", ty.name);

        let after = &updated["data"];
        assert_eq!(after[field], "Changed value");
        assert_eq!(after["createdAt"], before["createdAt"], "{} createdAt", ty.name);
        assert_ne!(after["updatedAt"], before["updatedAt"], "{} updatedAt", ty.name);

        for (key, value) in before.as_object().unwrap() {
            if key == field || key == "updatedAt" {
                continue;
            }
            assert_eq!(&after[key], value, "{}.{key} changed", ty.name);
        }
    }
}

#[tokio::test]
async fn deleted_items_are_gone() {
    let h = TestHarness::new().await.unwrap();

    for ty in catalog::all() {
        let id = h.create(ty.name, &valid_body(ty, "doomed")).await;

        let (status, resp) = h.delete(&format!("/api/{}/{}", ty.name, id)).await;
        assert_eq!(status, 200, "{}: {resp}", ty.name);
        assert_eq!(resp["success"], true);
        assert!(resp.get("data").is_none());

        let (status, resp) = h.get(&format!("/api/{}/{}", ty.name, id)).await;
        assert_eq!(status, 404, "{}: {resp}", ty.name);
        assert_eq!(resp["message"], format!("{} not found", ty.label));
    }
}

#[tokio::test]
async fn missing_and_malformed_ids_are_not_found() {
    let h = TestHarness::new().await.unwrap();
    let missing = uuid::Uuid::now_v7();

    for path in [
        format!("/api/blogs/{missing}"),
        "/api/blogs/not-an-id".to_string(),
    ] {
        let (status, resp) = h.get(&path).await;
        assert_eq!(status, 404, "{path}");
        assert_eq!(resp["success"], false);

        let (status, _) = h.put(&path, &json!({"title": "x"})).await;
        assert_eq!(status, 404, "{path}");

        let (status, _) = h.delete(&path).await;
        assert_eq!(status, 404, "{path}");
    }
}

#[tokio::test]
async fn system_keys_in_the_body_are_ignored() {
    let h = TestHarness::new().await.unwrap();

    let (status, resp) = h
        .post(
            "/api/faqs",
            &json!({
                "question": "Is there a fee?",
                "answer": "<p>No.</p>",
                "id": "client-chosen",
                "createdAt": "1999-01-01T00:00:00Z",
                "unknownField": true
            }),
        )
        .await;
    assert_eq!(status, 201, "{resp}");

    let item = &resp["data"];
    assert_ne!(item["id"], "client-chosen");
    assert_ne!(item["createdAt"], "1999-01-01T00:00:00Z");
    assert!(item.get("unknownField").is_none());
}

#[tokio::test]
async fn validation_reports_enum_url_and_number_errors() {
    let h = TestHarness::new().await.unwrap();

    let (status, resp) = h
        .post(
            "/api/announcements",
            &json!({"title": "Closed", "status": "archived"}),
        )
        .await;
    assert_eq!(status, 400);
    assert_eq!(resp["message"], "status must be one of: active, inactive");

    let (status, resp) = h
        .post(
            "/api/announcements",
            &json!({"title": "Bad link", "link": "not a url"}),
        )
        .await;
    assert_eq!(status, 400);
    assert_eq!(resp["message"], "link must be a valid URL");

    let (status, resp) = h
        .post(
            "/api/publications",
            &json!({"title": "Paper", "authors": "A. B.", "year": "2024"}),
        )
        .await;
    assert_eq!(status, 201, "{resp}");
    assert_eq!(resp["data"]["year"], 2024);
}

#[tokio::test]
async fn update_revalidates_the_merged_item() {
    let h = TestHarness::new().await.unwrap();
    let id = h
        .create("events", &json!({"title": "Demo Day", "date": "2025-03-20"}))
        .await;

    let (status, resp) = h
        .put(&format!("/api/events/{id}"), &json!({"date": "sometime"}))
        .await;
    assert_eq!(status, 400);
    assert_eq!(resp["message"], "date must be a valid date");

    let (status, resp) = h
        .put(&format!("/api/events/{id}"), &json!({"title": ""}))
        .await;
    assert_eq!(status, 400);
    assert_eq!(resp["message"], "title is required");

    let (_, resp) = h.get(&format!("/api/events/{id}")).await;
    assert_eq!(resp["data"]["date"], "2025-03-20");
    assert_eq!(resp["data"]["title"], "Demo Day");
}
