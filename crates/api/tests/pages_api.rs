//! HTTP-level tests for the page lifecycle routes.
//!
//! Requests go straight to the router through `tower::ServiceExt::oneshot`,
//! backed by the in-memory page store.

mod common;

use axum::http::StatusCode;
use common::{body_json, heading, paragraph, TestApp};
use page_builder_core::events::PageEvent;
use page_builder_core::persist::NavPosition;
use serde_json::json;

#[tokio::test]
async fn requests_without_token_are_unauthorized() {
    let app = TestApp::new();
    let response = app.get_anonymous("/v1/pages").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["error"]["type"], "unauthorized");
    assert_eq!(json["error"]["message"], "You must be logged in to continue.");
}

#[tokio::test]
async fn create_returns_201_draft() {
    let app = TestApp::new();
    let response = app
        .post("/v1/pages", json!({ "slug": "about", "title": "About" }))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["slug"], "about");
    assert_eq!(json["status"], "draft");
    assert_eq!(json["created_by"], app.actor.to_string());
    assert_eq!(json["has_unpublished_changes"], true);
    assert!(json["published_blocks"].is_null());
}

#[tokio::test]
async fn create_without_slug_derives_it_from_title() {
    let app = TestApp::new();
    let response = app
        .post("/v1/pages", json!({ "title": "Alumni & Friends" }))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(body_json(response).await["slug"], "alumni-friends");
}

#[tokio::test]
async fn duplicate_slug_is_a_conflict() {
    let app = TestApp::new();
    app.create_page("about", "About").await;
    let response = app
        .post("/v1/pages", json!({ "slug": "about", "title": "About again" }))
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["error"]["type"], "conflict");
    assert_eq!(
        json["error"]["message"],
        "The slug 'about' is already used by another page."
    );
}

#[tokio::test]
async fn save_renumbers_order_and_persists_blocks() {
    let app = TestApp::new();
    let id = app.create_page("about", "About").await;

    let response = app
        .put(
            &format!("/v1/pages/{id}"),
            json!({
                "blocks": [heading("heading_1", 4, "Welcome"), paragraph("paragraph_1", 9, "Hello")],
                "title": "About us"
            }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(app.get(&format!("/v1/pages/{id}")).await).await;
    assert_eq!(json["title"], "About us");
    assert_eq!(json["blocks"][0]["id"], "heading_1");
    assert_eq!(json["blocks"][0]["order"], 0);
    assert_eq!(json["blocks"][1]["order"], 1);
    assert!(json["last_saved_at"].is_string());
}

#[tokio::test]
async fn save_rejects_duplicate_block_ids() {
    let app = TestApp::new();
    let id = app.create_page("about", "About").await;
    let response = app
        .put(
            &format!("/v1/pages/{id}"),
            json!({ "blocks": [heading("dup", 0, "A"), paragraph("dup", 1, "B")] }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"]["type"], "badRequest");
}

#[tokio::test]
async fn save_to_taken_slug_is_a_conflict() {
    let app = TestApp::new();
    app.create_page("about", "About").await;
    let id = app.create_page("team", "Team").await;
    let response = app
        .put(
            &format!("/v1/pages/{id}"),
            json!({ "blocks": [], "slug": "about" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn autosave_stamps_auto_save_time() {
    let app = TestApp::new();
    let id = app.create_page("about", "About").await;
    let response = app
        .put(
            &format!("/v1/pages/{id}/autosave"),
            json!({ "blocks": [paragraph("paragraph_1", 0, "draft")] }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["saved"], true);
    assert!(json["last_auto_saved_at"].is_string());

    let page = body_json(app.get(&format!("/v1/pages/{id}")).await).await;
    assert_eq!(page["blocks"][0]["config"]["text"], "draft");
}

#[tokio::test]
async fn autosave_of_invalid_blocks_reports_not_saved() {
    let app = TestApp::new();
    let id = app.create_page("about", "About").await;
    let response = app
        .put(
            &format!("/v1/pages/{id}/autosave"),
            json!({ "blocks": [heading("", 0, "No id")] }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["saved"], false);
}

#[tokio::test]
async fn publish_copies_blocks_and_later_edits_stay_draft() {
    let app = TestApp::new();
    let id = app.create_page("about", "About").await;
    app.put(
        &format!("/v1/pages/{id}"),
        json!({ "blocks": [heading("heading_1", 0, "Version one")] }),
    )
    .await;

    let response = app.post(&format!("/v1/pages/{id}/publish"), json!({})).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["page"]["status"], "published");
    assert_eq!(json["page"]["published_blocks"], json["page"]["blocks"]);
    assert_eq!(json["page"]["has_unpublished_changes"], false);
    assert_eq!(json["navigation_added"], false);

    app.put(
        &format!("/v1/pages/{id}"),
        json!({ "blocks": [heading("heading_1", 0, "Version two")] }),
    )
    .await;
    let page = body_json(app.get(&format!("/v1/pages/{id}")).await).await;
    assert_eq!(page["has_unpublished_changes"], true);
    assert_eq!(
        page["published_blocks"][0]["config"]["text"],
        "Version one"
    );
    assert_eq!(page["blocks"][0]["config"]["text"], "Version two");
}

#[tokio::test]
async fn publish_with_blocks_saves_them_first() {
    let app = TestApp::new();
    let id = app.create_page("about", "About").await;
    let response = app
        .post(
            &format!("/v1/pages/{id}/publish"),
            json!({ "blocks": [paragraph("paragraph_1", 3, "Fresh")] }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["page"]["blocks"][0]["order"], 0);
    assert_eq!(
        json["page"]["published_blocks"][0]["config"]["text"],
        "Fresh"
    );
}

#[tokio::test]
async fn publish_adds_navigation_entry() {
    let app = TestApp::new();
    let first = app.create_page("home", "Home").await;
    let second = app.create_page("contact", "Contact").await;

    app.post(
        &format!("/v1/pages/{first}/publish"),
        json!({ "navigation": { "label": "Start" } }),
    )
    .await;
    let response = app
        .post(
            &format!("/v1/pages/{second}/publish"),
            json!({ "navigation": { "position": "first" } }),
        )
        .await;
    assert_eq!(body_json(response).await["navigation_added"], true);

    let entries = app.store.nav_entries().await;
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].slug, "contact");
    assert_eq!(entries[0].label, "Contact");
    assert_eq!(entries[0].position, NavPosition::First);
    assert_eq!(entries[1].label, "Start");
}

#[tokio::test]
async fn publish_rejects_blocks_missing_required_fields() {
    let app = TestApp::new();
    let id = app.create_page("about", "About").await;
    let response = app
        .post(
            &format!("/v1/pages/{id}/publish"),
            json!({ "blocks": [{ "id": "image_1", "type": "image", "order": 0, "config": { "src": "" } }] }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let page = body_json(app.get(&format!("/v1/pages/{id}")).await).await;
    assert_eq!(page["status"], "draft");
    assert!(page["published_blocks"].is_null());
}

#[tokio::test]
async fn publish_emits_event() {
    let app = TestApp::new();
    let id = app.create_page("about", "About").await;
    let mut rx = app.events.subscribe();
    app.post(&format!("/v1/pages/{id}/publish"), json!({})).await;

    let event = rx.recv().await.unwrap();
    match event {
        PageEvent::Published(published) => {
            assert_eq!(published.slug, "about");
            assert_eq!(published.actor, app.actor);
        }
        other => panic!("expected a publish event, got {other:?}"),
    }
}

#[tokio::test]
async fn unpublish_keeps_snapshot_and_returns_to_draft() {
    let app = TestApp::new();
    let id = app.create_page("about", "About").await;
    app.post(
        &format!("/v1/pages/{id}/publish"),
        json!({ "blocks": [heading("heading_1", 0, "Live")] }),
    )
    .await;
    let response = app
        .post(&format!("/v1/pages/{id}/unpublish"), json!({}))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "draft");
    assert_eq!(json["published_blocks"][0]["config"]["text"], "Live");
}

#[tokio::test]
async fn archived_pages_reject_writes() {
    let app = TestApp::new();
    let id = app.create_page("about", "About").await;
    let response = app.post(&format!("/v1/pages/{id}/archive"), json!({})).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "archived");

    let save = app
        .put(&format!("/v1/pages/{id}"), json!({ "blocks": [] }))
        .await;
    assert_eq!(save.status(), StatusCode::CONFLICT);
    let publish = app.post(&format!("/v1/pages/{id}/publish"), json!({})).await;
    assert_eq!(publish.status(), StatusCode::CONFLICT);
    let archive = app.post(&format!("/v1/pages/{id}/archive"), json!({})).await;
    assert_eq!(archive.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn delete_returns_204_then_404() {
    let app = TestApp::new();
    let id = app.create_page("about", "About").await;
    let response = app.delete(&format!("/v1/pages/{id}")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app.get(&format!("/v1/pages/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"]["type"], "notFound");
}

#[tokio::test]
async fn list_and_lookup_by_slug() {
    let app = TestApp::new();
    app.create_page("about", "About").await;
    app.create_page("team", "Team").await;

    let list = body_json(app.get("/v1/pages").await).await;
    assert_eq!(list.as_array().unwrap().len(), 2);

    let response = app.get("/v1/pages/by-slug/team").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["title"], "Team");

    let missing = app.get("/v1/pages/by-slug/nowhere").await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn slug_availability_honours_exclusion_and_format() {
    let app = TestApp::new();
    let id = app.create_page("about", "About").await;

    let taken = body_json(app.get("/v1/pages/slug-available?slug=about").await).await;
    assert_eq!(taken["available"], false);

    let own = body_json(
        app.get(&format!("/v1/pages/slug-available?slug=about&exclude={id}"))
            .await,
    )
    .await;
    assert_eq!(own["available"], true);

    let free = body_json(app.get("/v1/pages/slug-available?slug=contact").await).await;
    assert_eq!(free["available"], true);

    let invalid = app.get("/v1/pages/slug-available?slug=Not%20Valid").await;
    assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn malformed_page_id_is_rejected() {
    let app = TestApp::new();
    let response = app.get("/v1/pages/not-a-uuid").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
