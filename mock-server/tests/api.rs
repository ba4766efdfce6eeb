use axum::http::{header::AUTHORIZATION, Request, StatusCode};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use http_body_util::BodyExt;
use mock_server::{app, BROKEN_GROUP_ID, PASSWORD, USERNAME};
use serde_json::Value;
use tower::ServiceExt;

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn authed(uri: &str) -> Request<String> {
    let token = STANDARD.encode(format!("{USERNAME}:{PASSWORD}"));
    Request::builder()
        .uri(uri)
        .header(AUTHORIZATION, format!("Basic {token}"))
        .body(String::new())
        .unwrap()
}

// --- auth ---

#[tokio::test]
async fn missing_credentials_return_401() {
    let resp = app()
        .oneshot(Request::builder().uri("/api/groups.json").body(String::new()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn wrong_password_returns_401() {
    let token = STANDARD.encode(format!("{USERNAME}:nope"));
    let req = Request::builder()
        .uri("/api/users/1.json")
        .header(AUTHORIZATION, format!("Basic {token}"))
        .body(String::new())
        .unwrap();
    let resp = app().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

// --- groups ---

#[tokio::test]
async fn user_groups_envelope() {
    let resp = app().oneshot(authed("/api/groups.json")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    let groups = body["groups"].as_array().unwrap();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0]["slug"], "rustaceans");
    assert!(groups[1].get("friend_list").is_none());
}

#[tokio::test]
async fn single_group_envelope() {
    let resp = app().oneshot(authed("/api/groups/1.json")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["group"]["id"], 1);
}

#[tokio::test]
async fn unknown_group_returns_404() {
    let resp = app().oneshot(authed("/api/groups/404.json")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn path_without_suffix_returns_404() {
    let resp = app().oneshot(authed("/api/groups/1")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn members_are_wrapped() {
    let resp = app().oneshot(authed("/api/groups/1/members.json")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    let members = body["members"].as_array().unwrap();
    assert_eq!(members.len(), 3);
    assert_eq!(members[0]["user"]["username"], "alice");
    assert_eq!(members[0]["admin"], true);
}

#[tokio::test]
async fn online_members_are_bare_users() {
    let resp = app().oneshot(authed("/api/groups/1/online.json")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["online"].as_array().unwrap().len(), 1);
    assert_eq!(body["online"][0]["username"], "bob");
}

#[tokio::test]
async fn broken_group_returns_500() {
    let uri = format!("/api/groups/{BROKEN_GROUP_ID}/topics.json");
    let resp = app().oneshot(authed(&uri)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

// --- topics ---

#[tokio::test]
async fn topic_messages_envelope() {
    let resp = app().oneshot(authed("/api/topics/10/messages.json")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    let messages = body["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0]["date_created"], 0);
}

#[tokio::test]
async fn unknown_topic_resource_returns_404() {
    let resp = app().oneshot(authed("/api/topics/10/votes.json")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- users ---

#[tokio::test]
async fn user_envelope() {
    let resp = app().oneshot(authed("/api/users/2.json")).await.unwrap();
    let body = body_json(resp).await;
    assert_eq!(body["user"]["username"], "bob");
}

// --- echo ---

#[tokio::test]
async fn echo_reports_query_string() {
    let resp = app().oneshot(authed("/api/echo.json?page=2&q=a%20b")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["echo"]["method"], "GET");
    assert_eq!(body["echo"]["query"], "page=2&q=a%20b");
    assert_eq!(body["echo"]["body"], "");
}

#[tokio::test]
async fn echo_reports_form_body() {
    let mut req = authed("/api/echo.json");
    *req.method_mut() = axum::http::Method::POST;
    *req.body_mut() = "name=rust".to_string();
    let resp = app().oneshot(req).await.unwrap();
    let body = body_json(resp).await;
    assert_eq!(body["echo"]["method"], "POST");
    assert!(body["echo"]["query"].is_null());
    assert_eq!(body["echo"]["body"], "name=rust");
}
