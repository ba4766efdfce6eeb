//! User endpoints.

use crate::client::{check_status, ConvoreClient};
use crate::decode::decode_one;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse, Transport};
use crate::path::ResourcePath;
use crate::types::{Id, User};

pub struct Users<'a, T> {
    client: &'a ConvoreClient<T>,
}

impl<'a, T: Transport> Users<'a, T> {
    pub(crate) fn new(client: &'a ConvoreClient<T>) -> Self {
        Self { client }
    }

    pub fn build_get_user(&self, user_id: impl Into<Id>) -> HttpRequest {
        let user_id: Id = user_id.into();
        self.client
            .build_get(&ResourcePath::new("users").push(user_id), &[])
    }

    pub fn parse_get_user(&self, response: HttpResponse) -> Result<User, ApiError> {
        let body = check_status(response, Some("could not fetch user"))?;
        decode_one(&body, "user")
    }

    pub fn get_user(&self, user_id: impl Into<Id>) -> Result<User, ApiError> {
        self.parse_get_user(self.client.send(&self.build_get_user(user_id))?)
    }
}
