mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{TestApp, request, token};

#[tokio::test]
async fn owners_only_see_their_own_posts() {
    let app = TestApp::new().await;
    let jack = token("jack");
    let john = token("john");

    let res = app
        .post("/api/v1/posts", Some(&jack), json!({"id": "p1", "title": "jack's"}))
        .await;
    assert_eq!(res.status, StatusCode::CREATED);
    assert_eq!(res.body["user"], "jack");
    assert!(res.body["_etag"].is_string());

    let res = app.get("/api/v1/posts", Some(&jack)).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.ids(), ["p1"]);
    assert_eq!(res.header("x-total"), Some("1"));

    let res = app.get("/api/v1/posts", Some(&john)).await;
    assert_eq!(res.status, StatusCode::OK);
    assert!(res.ids().is_empty());
    assert_eq!(res.header("x-total"), Some("0"));

    // a foreign item looks exactly like a missing one
    let foreign = app.get("/api/v1/posts/p1", Some(&john)).await;
    let missing = app.get("/api/v1/posts/nope", Some(&john)).await;
    assert_eq!(foreign.status, StatusCode::NOT_FOUND);
    assert_eq!(foreign.body, missing.body);

    let res = app.get("/api/v1/posts/p1", Some(&jack)).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["title"], "jack's");
}

#[tokio::test]
async fn foreign_writes_are_forbidden() {
    let app = TestApp::new().await;
    let jack = token("jack");
    let john = token("john");
    app.post("/api/v1/posts", Some(&jack), json!({"id": "p1", "title": "t"}))
        .await;

    let res = app
        .put("/api/v1/posts/p1", Some(&john), json!({"title": "mine", "user": "john"}))
        .await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);

    let res = app.delete("/api/v1/posts/p1", Some(&john)).await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);

    let res = app.get("/api/v1/posts/p1", Some(&jack)).await;
    assert_eq!(res.body["title"], "t");
}

#[tokio::test]
async fn ownership_cannot_be_handed_over() {
    let app = TestApp::new().await;
    let jack = token("jack");
    app.post("/api/v1/posts", Some(&jack), json!({"id": "p1", "title": "t"}))
        .await;

    let res = app
        .patch("/api/v1/posts/p1", Some(&jack), json!({"user": "john"}))
        .await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);

    // a full replace must keep naming the owner
    let res = app
        .put("/api/v1/posts/p1", Some(&jack), json!({"title": "no owner"}))
        .await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);

    let res = app
        .patch("/api/v1/posts/p1", Some(&jack), json!({"title": "edited"}))
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["title"], "edited");
    assert_eq!(res.body["user"], "jack");
}

#[tokio::test]
async fn creating_for_someone_else_rejects_the_batch() {
    let app = TestApp::new().await;
    let jack = token("jack");

    let res = app
        .post(
            "/api/v1/posts",
            Some(&jack),
            json!([{"id": "a", "title": "ok"}, {"id": "b", "user": "john"}]),
        )
        .await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);

    let res = app.get("/api/v1/posts", Some(&jack)).await;
    assert!(res.ids().is_empty());

    let res = app
        .post(
            "/api/v1/posts",
            Some(&jack),
            json!([{"id": "a"}, {"id": "b", "user": "jack"}]),
        )
        .await;
    assert_eq!(res.status, StatusCode::CREATED);
    assert_eq!(res.ids(), ["a", "b"]);
}

#[tokio::test]
async fn anonymous_callers_get_nothing_from_guarded_resources() {
    let app = TestApp::new().await;
    app.post("/api/v1/posts", Some(&token("jack")), json!({"id": "p1"}))
        .await;

    let res = app.get("/api/v1/posts", None).await;
    assert_eq!(res.status, StatusCode::OK);
    assert!(res.ids().is_empty());

    // existence is not revealed to anonymous callers
    let existing = app.get("/api/v1/posts/p1", None).await;
    let missing = app.get("/api/v1/posts/nope", None).await;
    assert_eq!(existing.status, StatusCode::NOT_FOUND);
    assert_eq!(existing.status, missing.status);
    assert_eq!(existing.body, missing.body);

    let res = app.post("/api/v1/posts", None, json!({"title": "x"})).await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);

    let res = app.delete("/api/v1/posts", None).await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn clear_only_removes_own_items() {
    let app = TestApp::new().await;
    let jack = token("jack");
    let john = token("john");
    app.post("/api/v1/posts", Some(&jack), json!([{"id": "j1"}, {"id": "j2"}]))
        .await;
    app.post("/api/v1/posts", Some(&john), json!({"id": "n1"}))
        .await;

    let res = app.delete("/api/v1/posts", Some(&john)).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body, json!({"deleted": 1}));

    let res = app.get("/api/v1/posts", Some(&jack)).await;
    assert_eq!(res.ids(), ["j1", "j2"]);
}

#[tokio::test]
async fn users_are_scoped_to_themselves() {
    let app = TestApp::new().await;
    let jack = token("jack");

    let res = app.get("/api/v1/users", Some(&jack)).await;
    assert_eq!(res.ids(), ["jack"]);

    let res = app.get("/api/v1/users/john", Some(&jack)).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn nested_posts_follow_the_parent() {
    let app = TestApp::new().await;
    let jack = token("jack");
    let john = token("john");

    let res = app
        .post("/api/v1/users/jack/posts", Some(&jack), json!({"id": "p1"}))
        .await;
    assert_eq!(res.status, StatusCode::CREATED);
    assert_eq!(res.body["user"], "jack");

    let res = app.get("/api/v1/users/jack/posts", Some(&jack)).await;
    assert_eq!(res.ids(), ["p1"]);
    let res = app.get("/api/v1/users/jack/posts/p1", Some(&jack)).await;
    assert_eq!(res.status, StatusCode::OK);

    // parent not visible to john
    let res = app.get("/api/v1/users/jack/posts", Some(&john)).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);

    // parent reference cannot point elsewhere
    let res = app
        .post(
            "/api/v1/users/jack/posts",
            Some(&jack),
            json!({"user": "john"}),
        )
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn public_resource_is_readable_but_read_only() {
    let app = TestApp::new().await;

    let res = app.get("/api/v1/announcements", None).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.ids(), ["welcome"]);

    let res = app.get("/api/v1/announcements/welcome", Some(&token("john"))).await;
    assert_eq!(res.status, StatusCode::OK);

    let res = app
        .post("/api/v1/announcements", Some(&token("jack")), json!({"title": "x"}))
        .await;
    assert_eq!(res.status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn if_match_guards_concurrent_updates() {
    let app = TestApp::new().await;
    let jack = token("jack");
    app.post("/api/v1/posts", Some(&jack), json!({"id": "p1", "title": "t"}))
        .await;

    let res = app.get("/api/v1/posts/p1", Some(&jack)).await;
    let etag = res.header("etag").unwrap().to_string();

    let mut stale = request("PATCH", "/api/v1/posts/p1", Some(&jack), Some(json!({"title": "x"})));
    stale
        .headers_mut()
        .insert("if-match", "\"stale\"".parse().unwrap());
    let res = app.send(stale).await;
    assert_eq!(res.status, StatusCode::PRECONDITION_FAILED);

    let mut fresh = request("PATCH", "/api/v1/posts/p1", Some(&jack), Some(json!({"title": "y"})));
    fresh.headers_mut().insert("if-match", etag.parse().unwrap());
    let res = app.send(fresh).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["title"], "y");
}

#[tokio::test]
async fn reserved_fields_are_rejected() {
    let app = TestApp::new().await;
    let res = app
        .post("/api/v1/posts", Some(&token("jack")), json!({"_etag": "x"}))
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_resource_is_not_found() {
    let app = TestApp::new().await;
    let res = app.get("/api/v1/comments", Some(&token("jack"))).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_filters_and_pages() {
    let app = TestApp::new().await;
    let jack = token("jack");
    app.post(
        "/api/v1/posts",
        Some(&jack),
        json!([
            {"id": "a", "tag": "rust"},
            {"id": "b", "tag": "go"},
            {"id": "c", "tag": "rust"}
        ]),
    )
    .await;

    let res = app.get("/api/v1/posts?tag=rust", Some(&jack)).await;
    assert_eq!(res.ids(), ["a", "c"]);

    let res = app.get("/api/v1/posts?page=2&per_page=2", Some(&jack)).await;
    assert_eq!(res.ids(), ["c"]);
    assert_eq!(res.header("x-total"), Some("3"));
}

#[tokio::test]
async fn repeated_reads_return_the_same_filtered_set() {
    let app = TestApp::new().await;
    let jack = token("jack");
    let john = token("john");
    app.post("/api/v1/posts", Some(&jack), json!([{"id": "j1"}, {"id": "j2"}]))
        .await;
    app.post("/api/v1/posts", Some(&john), json!({"id": "n1"}))
        .await;

    let first = app.get("/api/v1/posts", Some(&jack)).await;
    let second = app.get("/api/v1/posts", Some(&jack)).await;
    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(first.ids(), ["j1", "j2"]);
    assert_eq!(first.body, second.body);
    assert_eq!(first.header("x-total"), second.header("x-total"));

    let first = app.get("/api/v1/posts/j1", Some(&jack)).await;
    let second = app.get("/api/v1/posts/j1", Some(&jack)).await;
    assert_eq!(first.body, second.body);
    assert_eq!(first.header("etag"), second.header("etag"));
}
