//! In-process fake of the Convore REST API.
//!
//! Serves a small fixed data set under `/api/...json` with HTTP Basic auth,
//! enough to drive the client end to end. Group 13 is wired to fail with a
//! 500 on its sub-resources and topic 66 is stored without `date_created`,
//! so error paths can be exercised over real HTTP.

use std::sync::Arc;

use axum::{
    extract::{Path, RawQuery, State},
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderMap, Method, StatusCode,
    },
    routing::get,
    Json, Router,
};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tracing::debug;

pub const USERNAME: &str = "alice";
pub const PASSWORD: &str = "wonderland";

/// Group whose members, online and topics endpoints answer 500.
pub const BROKEN_GROUP_ID: i64 = 13;
/// Topic stored without `date_created`.
pub const MALFORMED_TOPIC_ID: i64 = 66;

#[derive(Clone)]
pub struct AppState {
    authorization: Arc<str>,
    data: Arc<Fixtures>,
}

pub fn app() -> Router {
    let token = STANDARD.encode(format!("{USERNAME}:{PASSWORD}"));
    let state = AppState {
        authorization: format!("Basic {token}").into(),
        data: Arc::new(Fixtures::seed()),
    };
    let api = Router::new()
        .route("/groups.json", get(user_groups))
        .route("/groups/{id}", get(group))
        .route("/groups/{id}/{resource}", get(group_resource))
        .route("/topics/{id}", get(topic))
        .route("/topics/{id}/{resource}", get(topic_resource))
        .route("/users/{id}", get(user))
        .route("/echo.json", get(echo).post(echo));
    Router::new().nest("/api", api).with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

type Reply = Result<Json<Value>, StatusCode>;

fn authorize(state: &AppState, headers: &HeaderMap) -> Result<(), StatusCode> {
    let given = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok());
    if given == Some(&*state.authorization) {
        Ok(())
    } else {
        debug!("rejecting request with bad credentials");
        Err(StatusCode::UNAUTHORIZED)
    }
}

/// `"7.json"` -> `7`; anything else is a 404.
fn parse_file(file: &str) -> Result<i64, StatusCode> {
    file.strip_suffix(".json")
        .and_then(|id| id.parse().ok())
        .ok_or(StatusCode::NOT_FOUND)
}

async fn user_groups(State(state): State<AppState>, headers: HeaderMap) -> Reply {
    authorize(&state, &headers)?;
    let joined = state
        .data
        .groups
        .iter()
        .filter(|g| g.id != BROKEN_GROUP_ID)
        .map(|g| g.body.clone())
        .collect::<Vec<_>>();
    Ok(Json(json!({ "groups": joined })))
}

async fn group(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(file): Path<String>,
) -> Reply {
    authorize(&state, &headers)?;
    let group = state.data.group(parse_file(&file)?)?;
    Ok(Json(json!({ "group": group.body })))
}

async fn group_resource(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((id, resource)): Path<(i64, String)>,
) -> Reply {
    authorize(&state, &headers)?;
    let group = state.data.group(id)?;
    if group.id == BROKEN_GROUP_ID {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    let data = &state.data;
    let body = match resource.as_str() {
        "members.json" => {
            let members: Vec<Value> = group
                .members
                .iter()
                .filter_map(|uid| data.user(*uid).ok())
                .map(|user| {
                    let admin = user["id"] == group.body["creator"]["id"];
                    json!({ "user": user, "admin": admin })
                })
                .collect();
            json!({ "members": members })
        }
        "online.json" => {
            let online: Vec<Value> = group
                .online
                .iter()
                .filter_map(|uid| data.user(*uid).ok().cloned())
                .collect();
            json!({ "online": online })
        }
        "topics.json" => {
            let topics: Vec<Value> = data
                .topics
                .iter()
                .filter(|t| t.group_id == id)
                .map(|t| t.body.clone())
                .collect();
            json!({ "topics": topics })
        }
        _ => return Err(StatusCode::NOT_FOUND),
    };
    Ok(Json(body))
}

async fn topic(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(file): Path<String>,
) -> Reply {
    authorize(&state, &headers)?;
    let topic = state.data.topic(parse_file(&file)?)?;
    Ok(Json(json!({ "topic": topic.body })))
}

async fn topic_resource(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((id, resource)): Path<(i64, String)>,
) -> Reply {
    authorize(&state, &headers)?;
    let topic = state.data.topic(id)?;
    if resource != "messages.json" {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(Json(json!({ "messages": topic.messages })))
}

async fn user(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(file): Path<String>,
) -> Reply {
    authorize(&state, &headers)?;
    let user = state.data.user(parse_file(&file)?)?;
    Ok(Json(json!({ "user": user })))
}

/// Reports the method, raw query string and raw body it received.
async fn echo(
    State(state): State<AppState>,
    headers: HeaderMap,
    method: Method,
    RawQuery(query): RawQuery,
    body: String,
) -> Reply {
    authorize(&state, &headers)?;
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    Ok(Json(json!({
        "echo": {
            "method": method.as_str(),
            "query": query,
            "body": body,
            "content_type": content_type,
        }
    })))
}

struct GroupRecord {
    id: i64,
    body: Value,
    members: Vec<i64>,
    online: Vec<i64>,
}

struct TopicRecord {
    id: i64,
    group_id: i64,
    body: Value,
    messages: Vec<Value>,
}

struct Fixtures {
    users: Vec<Value>,
    groups: Vec<GroupRecord>,
    topics: Vec<TopicRecord>,
}

impl Fixtures {
    fn seed() -> Self {
        let users = vec![
            user_json(1, "alice"),
            user_json(2, "bob"),
            user_json(3, "carol"),
        ];
        let groups = vec![
            GroupRecord {
                id: 1,
                body: json!({
                    "id": 1,
                    "kind": "public",
                    "name": "Rustaceans",
                    "slug": "rustaceans",
                    "url": "/rustaceans/",
                    "members_count": 3,
                    "topics_count": 2,
                    "unread": 4,
                    "date_created": 1297891236,
                    "date_latest_message": 1297900000.25,
                    "creator": users[0],
                    "friend_list": [users[2], users[1]],
                }),
                members: vec![1, 2, 3],
                online: vec![2],
            },
            GroupRecord {
                id: 2,
                body: json!({
                    "id": 2,
                    "kind": "private",
                    "name": "Ferris Fans",
                    "slug": "ferris-fans",
                    "url": "/ferris-fans/",
                    "members_count": 1,
                    "topics_count": 1,
                    "unread": false,
                    "date_created": 1298000000,
                    "date_latest_message": 1298100000,
                    "creator": users[1],
                }),
                members: vec![2],
                online: vec![],
            },
            GroupRecord {
                id: BROKEN_GROUP_ID,
                body: json!({
                    "id": BROKEN_GROUP_ID,
                    "name": "Haunted",
                    "slug": "haunted",
                    "date_created": 1298000000,
                    "date_latest_message": 1298000000,
                    "creator": users[2],
                }),
                members: vec![],
                online: vec![],
            },
        ];
        let topics = vec![
            TopicRecord {
                id: 10,
                group_id: 1,
                body: topic_json(10, "Lifetimes", "lifetimes", &users[0]),
                messages: vec![
                    json!({"id": 100, "message": "what does 'a mean?", "date_created": 0, "user": users[1]}),
                    json!({"id": 101, "message": "it is a lifetime", "date_created": 1297900000.25, "user": users[0]}),
                ],
            },
            TopicRecord {
                id: 11,
                group_id: 1,
                body: topic_json(11, "Traits", "traits", &users[2]),
                messages: vec![],
            },
            TopicRecord {
                id: 20,
                group_id: 2,
                body: topic_json(20, "Plushies", "plushies", &users[1]),
                messages: vec![json!({"id": 200, "message": "🦀", "date_created": 1298100000, "user": users[1]})],
            },
            TopicRecord {
                id: MALFORMED_TOPIC_ID,
                group_id: 2,
                body: json!({
                    "id": MALFORMED_TOPIC_ID,
                    "name": "No date",
                    "slug": "no-date",
                    "date_latest_message": 1298100000,
                    "creator": users[1],
                }),
                messages: vec![json!({"id": 660, "message": "undated", "user": users[1]})],
            },
        ];
        Self {
            users,
            groups,
            topics,
        }
    }

    fn user(&self, id: i64) -> Result<&Value, StatusCode> {
        self.users
            .iter()
            .find(|u| u["id"] == id)
            .ok_or(StatusCode::NOT_FOUND)
    }

    fn group(&self, id: i64) -> Result<&GroupRecord, StatusCode> {
        self.groups
            .iter()
            .find(|g| g.id == id)
            .ok_or(StatusCode::NOT_FOUND)
    }

    fn topic(&self, id: i64) -> Result<&TopicRecord, StatusCode> {
        self.topics
            .iter()
            .find(|t| t.id == id)
            .ok_or(StatusCode::NOT_FOUND)
    }
}

fn user_json(id: i64, username: &str) -> Value {
    json!({
        "id": id,
        "username": username,
        "url": format!("/users/{username}/"),
        "img": format!("https://img.convore.test/{username}.png"),
    })
}

fn topic_json(id: i64, name: &str, slug: &str, creator: &Value) -> Value {
    json!({
        "id": id,
        "name": name,
        "slug": slug,
        "url": format!("/topics/{slug}/"),
        "message_count": 2,
        "unread": 0,
        "date_created": 1297891236,
        "date_latest_message": 1297900000,
        "creator": creator,
    })
}
