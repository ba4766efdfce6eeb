//! Resource collections: one accessor per endpoint family.
//!
//! Each operation comes in three forms, mirroring the client's request
//! split: `build_*` returns the `HttpRequest`, `parse_*` turns the
//! `HttpResponse` into entities, and the bare name runs both through the
//! client's transport.

pub mod groups;
pub mod messages;
pub mod topics;
pub mod users;

pub use groups::Groups;
pub use messages::Messages;
pub use topics::Topics;
pub use users::Users;
