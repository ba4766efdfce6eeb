//! Topic endpoints.

use crate::client::{check_status, ConvoreClient};
use crate::decode::decode_one;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse, Transport};
use crate::path::ResourcePath;
use crate::types::{Id, Message, Topic};

pub struct Topics<'a, T> {
    client: &'a ConvoreClient<T>,
}

impl<'a, T: Transport> Topics<'a, T> {
    pub(crate) fn new(client: &'a ConvoreClient<T>) -> Self {
        Self { client }
    }

    pub fn build_get_topic(&self, topic_id: impl Into<Id>) -> HttpRequest {
        let topic_id: Id = topic_id.into();
        self.client
            .build_get(&ResourcePath::new("topics").push(topic_id), &[])
    }

    pub fn parse_get_topic(&self, response: HttpResponse) -> Result<Topic, ApiError> {
        let body = check_status(response, Some("could not fetch topic"))?;
        decode_one(&body, "topic")
    }

    pub fn get_topic(&self, topic_id: impl Into<Id>) -> Result<Topic, ApiError> {
        self.parse_get_topic(self.client.send(&self.build_get_topic(topic_id))?)
    }

    /// Messages of a topic, oldest first as the API returns them.
    pub fn get_messages(&self, topic_id: impl Into<Id>) -> Result<Vec<Message>, ApiError> {
        self.client.messages().for_topic(topic_id)
    }
}
