//! Synchronous client for the Convore chat-service REST API.
//!
//! # Overview
//! A `ConvoreClient` is opened with a username/password pair and issues
//! authenticated GET/POST requests against `<base>/<segment>/....json`.
//! Responses are JSON envelopes with one top-level key naming the resource
//! kind; the resource collections decode them into `User`, `Group`,
//! `Topic` and `Message` values.
//!
//! ```no_run
//! use convore_core::ConvoreClient;
//!
//! let client = ConvoreClient::login("alice", "wonderland");
//! for group in client.groups().get_user_groups()? {
//!     for topic in group.topics(&client)? {
//!         println!("{group}/{topic}: {} messages", topic.messages(&client)?.len());
//!     }
//! }
//! # Ok::<(), convore_core::ApiError>(())
//! ```
//!
//! # Design
//! - Credentials live in the client, not in process-wide state; several
//!   sessions can coexist.
//! - Every operation is split into `build_*` (produces an `HttpRequest`)
//!   and `parse_*` (consumes an `HttpResponse`); the `Transport` trait runs
//!   the round-trip in between. `UreqTransport` is the default.
//! - No caching, pagination or retries: each call is one live request.

pub mod auth;
pub mod client;
pub mod config;
pub mod decode;
pub mod error;
pub mod http;
pub mod path;
pub mod resources;
pub mod transport;
pub mod types;

#[cfg(test)]
mod testing;

pub use auth::Credentials;
pub use client::ConvoreClient;
pub use config::ClientConfig;
pub use decode::ApiEntity;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport};
pub use path::ResourcePath;
pub use resources::{Groups, Messages, Topics, Users};
pub use transport::UreqTransport;
pub use types::{Category, Group, Id, Message, Topic, User};
