//! Domain entities of the Convore API.
//!
//! # Design
//! Entities are transient values built from one API response each. Nested
//! entities (`creator`, `user`, `friends`) are embedded copies owned by the
//! containing entity, never references resolved by id. Field decoding
//! policies are declared per field; see `crate::decode`.
//!
//! The traversal helpers (`Group::members`, `Topic::messages`, ...) take the
//! client explicitly and refetch on every call.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::ConvoreClient;
use crate::decode::{epoch_seconds, mapping, opaque_int, ApiEntity};
use crate::error::ApiError;
use crate::http::Transport;

/// A resource identifier; the API uses both integers and strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Id {
    Int(i64),
    Text(String),
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Id::Int(n) => write!(f, "{n}"),
            Id::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Id {
    fn from(n: i64) -> Self {
        Id::Int(n)
    }
}

impl From<i32> for Id {
    fn from(n: i32) -> Self {
        Id::Int(i64::from(n))
    }
}

impl From<&str> for Id {
    fn from(s: &str) -> Self {
        Id::Text(s.to_string())
    }
}

impl From<String> for Id {
    fn from(s: String) -> Self {
        Id::Text(s)
    }
}

impl From<&Id> for Id {
    fn from(id: &Id) -> Self {
        id.clone()
    }
}

/// A Convore user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: Option<String>,
    pub url: Option<String>,
    pub id: Option<Id>,
    pub img: Option<String>,
}

impl ApiEntity for User {
    const NAME: &'static str = "user";
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.username.as_deref().unwrap_or("?"))
    }
}

/// A Convore group.
///
/// `joined` is not part of the payload: it is `true` only on groups returned
/// by `Groups::get_user_groups`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: Option<Id>,
    pub kind: Option<String>,
    pub name: Option<String>,
    pub slug: Option<String>,
    pub url: Option<String>,
    pub members_count: Option<u64>,
    pub topics_count: Option<u64>,
    #[serde(default, deserialize_with = "opaque_int::deserialize")]
    pub unread: Option<i64>,
    #[serde(with = "epoch_seconds")]
    pub date_created: DateTime<Utc>,
    #[serde(with = "epoch_seconds")]
    pub date_latest_message: DateTime<Utc>,
    #[serde(deserialize_with = "mapping::deserialize")]
    pub creator: User,
    #[serde(rename = "friend_list", default, deserialize_with = "mapping::list")]
    pub friends: Vec<User>,
    #[serde(skip_deserializing)]
    pub joined: bool,
}

impl ApiEntity for Group {
    const NAME: &'static str = "group";

    /// Keeps `joined`, which is owned by the call that produced the group.
    fn import_from_api(&mut self, value: &Value) -> Result<(), ApiError> {
        let joined = self.joined;
        *self = Self::from_api(value)?;
        self.joined = joined;
        Ok(())
    }
}

impl Group {
    fn require_id(&self) -> Result<&Id, ApiError> {
        self.id.as_ref().ok_or(ApiError::MissingId(Self::NAME))
    }

    pub fn members<T: Transport>(&self, client: &ConvoreClient<T>) -> Result<Vec<User>, ApiError> {
        client.groups().get_group_members(self.require_id()?)
    }

    pub fn online_members<T: Transport>(
        &self,
        client: &ConvoreClient<T>,
    ) -> Result<Vec<User>, ApiError> {
        client.groups().get_group_online_members(self.require_id()?)
    }

    pub fn topics<T: Transport>(&self, client: &ConvoreClient<T>) -> Result<Vec<Topic>, ApiError> {
        client.groups().get_group_topics(self.require_id()?)
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug.as_deref().unwrap_or("?"))
    }
}

/// A discussion topic inside a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    pub id: Option<Id>,
    pub name: Option<String>,
    pub slug: Option<String>,
    pub url: Option<String>,
    pub message_count: Option<u64>,
    #[serde(default, deserialize_with = "opaque_int::deserialize")]
    pub unread: Option<i64>,
    #[serde(with = "epoch_seconds")]
    pub date_created: DateTime<Utc>,
    #[serde(with = "epoch_seconds")]
    pub date_latest_message: DateTime<Utc>,
    #[serde(deserialize_with = "mapping::deserialize")]
    pub creator: User,
}

impl ApiEntity for Topic {
    const NAME: &'static str = "topic";
}

impl Topic {
    pub fn messages<T: Transport>(&self, client: &ConvoreClient<T>) -> Result<Vec<Message>, ApiError> {
        let id = self.id.as_ref().ok_or(ApiError::MissingId(Self::NAME))?;
        client.topics().get_messages(id)
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug.as_deref().unwrap_or("?"))
    }
}

/// One message posted to a topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: Option<Id>,
    pub message: Option<String>,
    #[serde(with = "epoch_seconds")]
    pub date_created: DateTime<Utc>,
    #[serde(deserialize_with = "mapping::deserialize")]
    pub user: User,
}

impl ApiEntity for Message {
    const NAME: &'static str = "message";
}

/// A group category. No endpoint fills `groups`; it is always `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub groups_count: Option<u64>,
    pub slug: Option<String>,
    pub name: Option<String>,
    #[serde(skip)]
    pub groups: Option<Vec<Group>>,
}

impl ApiEntity for Category {
    const NAME: &'static str = "category";
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug.as_deref().unwrap_or("?"))
    }
}
