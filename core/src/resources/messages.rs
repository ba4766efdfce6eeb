//! Message endpoints. Messages are only listed per topic.

use crate::client::{check_status, ConvoreClient};
use crate::decode::decode_list;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse, Transport};
use crate::path::ResourcePath;
use crate::types::{Id, Message};

pub struct Messages<'a, T> {
    client: &'a ConvoreClient<T>,
}

impl<'a, T: Transport> Messages<'a, T> {
    pub(crate) fn new(client: &'a ConvoreClient<T>) -> Self {
        Self { client }
    }

    pub fn build_for_topic(&self, topic_id: impl Into<Id>) -> HttpRequest {
        let topic_id: Id = topic_id.into();
        let path = ResourcePath::new("topics").push(topic_id).push("messages");
        self.client.build_get(&path, &[])
    }

    pub fn parse_for_topic(&self, response: HttpResponse) -> Result<Vec<Message>, ApiError> {
        let body = check_status(response, Some("could not list topic messages"))?;
        decode_list(&body, "messages")
    }

    pub fn for_topic(&self, topic_id: impl Into<Id>) -> Result<Vec<Message>, ApiError> {
        self.parse_for_topic(self.client.send(&self.build_for_topic(topic_id))?)
    }
}
