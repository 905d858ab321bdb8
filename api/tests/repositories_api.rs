use api::{AppState, build_router};
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
    response::Response,
};
use infrastructure::InMemoryRepositoryStore;
use serde_json::{Value, json};
use std::collections::HashSet;
use std::sync::Arc;
use tower::ServiceExt;

fn app() -> Router {
    build_router(AppState::new(Arc::new(InMemoryRepositoryStore::new())))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> Response {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            request = request.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    app.clone().oneshot(request.body(body).unwrap()).await.unwrap()
}

async fn send_raw(app: &Router, method: Method, uri: &str, body: &'static str) -> Response {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

async fn body_bytes(response: Response) -> Vec<u8> {
    to_bytes(response.into_body(), usize::MAX).await.unwrap().to_vec()
}

async fn body_json(response: Response) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

async fn create(app: &Router, title: &str) -> Value {
    let response = send(
        app,
        Method::POST,
        "/repositories",
        Some(json!({
            "title": title,
            "url": format!("https://github.com/example/{title}"),
            "techs": ["Node.js", "ReactJS"],
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await
}

async fn list(app: &Router) -> Value {
    let response = send(app, Method::GET, "/repositories", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await
}

fn id_of(repository: &Value) -> &str {
    repository["id"].as_str().unwrap()
}

#[tokio::test]
async fn health_endpoint_responds() {
    let response = send(&app(), Method::GET, "/health", None).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn list_starts_empty() {
    assert_eq!(list(&app()).await, json!([]));
}

#[tokio::test]
async fn create_returns_record_with_generated_id_and_zero_likes() {
    let app = app();
    let created = create(&app, "Umbriel").await;

    assert!(!id_of(&created).is_empty());
    assert_eq!(
        created,
        json!({
            "id": id_of(&created),
            "title": "Umbriel",
            "url": "https://github.com/example/Umbriel",
            "techs": ["Node.js", "ReactJS"],
            "likes": 0,
        })
    );
    assert_eq!(list(&app).await, json!([created]));
}

#[tokio::test]
async fn create_accepts_incomplete_and_mistyped_bodies() {
    let app = app();

    let response = send(
        &app,
        Method::POST,
        "/repositories",
        Some(json!({ "title": 7, "techs": "rust" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let created = body_json(response).await;
    assert_eq!(created["title"], json!(7));
    assert_eq!(created["techs"], json!("rust"));
    assert!(created.get("url").is_none());
    assert_eq!(created["likes"], json!(0));

    let response = send(&app, Method::POST, "/repositories", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let empty = body_json(response).await;
    assert_eq!(empty, json!({ "id": id_of(&empty), "likes": 0 }));

    assert_eq!(list(&app).await.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn explicit_nulls_are_stored_and_returned() {
    let app = app();

    let response = send(
        &app,
        Method::POST,
        "/repositories",
        Some(json!({ "title": null, "url": "u", "techs": null })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let created = body_json(response).await;
    let id = id_of(&created).to_string();
    assert_eq!(
        created,
        json!({ "id": &id, "title": null, "url": "u", "techs": null, "likes": 0 })
    );

    let uri = format!("/repositories/{id}");
    let response = send(&app, Method::PUT, &uri, Some(json!({ "title": null }))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert_eq!(updated, json!({ "id": id, "title": null, "likes": 0 }));
    assert_eq!(list(&app).await, json!([updated]));
}

#[tokio::test]
async fn malformed_json_is_rejected_without_touching_store() {
    let app = app();
    let created = create(&app, "kept").await;

    let response = send_raw(&app, Method::POST, "/repositories", "{not json").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(response).await["error"].is_string());

    let uri = format!("/repositories/{}", id_of(&created));
    let response = send_raw(&app, Method::PUT, &uri, "{\"title\": ").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    assert_eq!(list(&app).await, json!([created]));
}

#[tokio::test]
async fn non_object_json_body_counts_as_empty() {
    let app = app();

    let response = send_raw(&app, Method::POST, "/repositories", "42").await;

    assert_eq!(response.status(), StatusCode::OK);
    let created = body_json(response).await;
    assert_eq!(created, json!({ "id": id_of(&created), "likes": 0 }));
}

#[tokio::test]
async fn listed_ids_are_unique_and_in_insertion_order() {
    let app = app();
    let titles = ["one", "two", "three", "four"];
    for title in titles {
        create(&app, title).await;
    }

    let listed = list(&app).await;
    let listed = listed.as_array().unwrap();
    let listed_titles: Vec<_> = listed.iter().map(|r| r["title"].as_str().unwrap()).collect();
    assert_eq!(listed_titles, titles);

    let ids: HashSet<_> = listed.iter().map(id_of).collect();
    assert_eq!(ids.len(), titles.len());
}

#[tokio::test]
async fn list_is_stable_without_mutation() {
    let app = app();
    create(&app, "a").await;
    create(&app, "b").await;

    assert_eq!(list(&app).await, list(&app).await);
}

#[tokio::test]
async fn update_replaces_fields_but_keeps_id_and_likes() {
    let app = app();
    let created = create(&app, "old").await;
    let id = id_of(&created).to_string();
    for _ in 0..5 {
        send(&app, Method::POST, &format!("/repositories/{id}/like"), None).await;
    }

    let response = send(
        &app,
        Method::PUT,
        &format!("/repositories/{id}"),
        Some(json!({ "title": "new", "url": "new-url", "techs": ["go"] })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let expected = json!({
        "id": id,
        "title": "new",
        "url": "new-url",
        "techs": ["go"],
        "likes": 5,
    });
    assert_eq!(body_json(response).await, expected);
    assert_eq!(list(&app).await, json!([expected]));
}

#[tokio::test]
async fn update_ignores_client_supplied_id_and_likes() {
    let app = app();
    let created = create(&app, "old").await;
    let id = id_of(&created).to_string();

    let response = send(
        &app,
        Method::PUT,
        &format!("/repositories/{id}"),
        Some(json!({ "id": "forged", "title": "new", "likes": 99 })),
    )
    .await;

    let updated = body_json(response).await;
    assert_eq!(updated, json!({ "id": id, "title": "new", "likes": 0 }));
}

#[tokio::test]
async fn update_unknown_id_is_rejected_and_store_unchanged() {
    let app = app();
    let created = create(&app, "kept").await;

    let response = send(
        &app,
        Method::PUT,
        "/repositories/123",
        Some(json!({ "title": "new", "url": "new-url", "techs": ["go"] })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await, json!({ "error": "Repository not found" }));
    assert_eq!(list(&app).await, json!([created]));
}

#[tokio::test]
async fn delete_removes_record_with_no_content() {
    let app = app();
    let first = create(&app, "first").await;
    let second = create(&app, "second").await;
    let third = create(&app, "third").await;

    let uri = format!("/repositories/{}", id_of(&second));
    let response = send(&app, Method::DELETE, &uri, None).await;

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(body_bytes(response).await.is_empty());
    assert_eq!(list(&app).await, json!([first, third]));
}

#[tokio::test]
async fn delete_unknown_id_is_rejected_and_store_unchanged() {
    let app = app();
    let created = create(&app, "kept").await;

    let response = send(&app, Method::DELETE, "/repositories/123", None).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await, json!({ "error": "Repository not found" }));
    assert_eq!(list(&app).await, json!([created]));
}

#[tokio::test]
async fn like_increments_cumulatively() {
    let app = app();
    let created = create(&app, "popular").await;
    let uri = format!("/repositories/{}/like", id_of(&created));

    let mut liked = Value::Null;
    for expected in 1..=3 {
        let response = send(&app, Method::POST, &uri, None).await;
        assert_eq!(response.status(), StatusCode::OK);
        liked = body_json(response).await;
        assert_eq!(liked["likes"], json!(expected));
    }

    let mut unchanged = created.clone();
    unchanged["likes"] = json!(3);
    assert_eq!(liked, unchanged);
}

#[tokio::test]
async fn like_unknown_id_is_rejected() {
    let app = app();

    let response = send(&app, Method::POST, "/repositories/123/like", None).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await, json!({ "error": "Repository not found" }));
    assert_eq!(list(&app).await, json!([]));
}

#[tokio::test]
async fn cross_origin_requests_are_allowed() {
    let request = Request::builder()
        .method(Method::GET)
        .uri("/repositories")
        .header(header::ORIGIN, "http://example.com")
        .body(Body::empty())
        .unwrap();

    let response = app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
}
