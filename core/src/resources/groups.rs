//! Group endpoints.

use crate::client::{check_status, ConvoreClient};
use crate::decode::{decode_list, decode_one, envelope, field, items, ApiEntity};
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse, Transport};
use crate::path::ResourcePath;
use crate::types::{Group, Id, Topic, User};

pub struct Groups<'a, T> {
    client: &'a ConvoreClient<T>,
}

impl<'a, T: Transport> Groups<'a, T> {
    pub(crate) fn new(client: &'a ConvoreClient<T>) -> Self {
        Self { client }
    }

    fn group_path(group_id: impl Into<Id>) -> ResourcePath {
        let group_id: Id = group_id.into();
        ResourcePath::new("groups").push(group_id)
    }

    pub fn build_get_user_groups(&self) -> HttpRequest {
        self.client.build_get(&ResourcePath::new("groups"), &[])
    }

    /// Every returned group is marked `joined`.
    pub fn parse_get_user_groups(&self, response: HttpResponse) -> Result<Vec<Group>, ApiError> {
        let body = check_status(response, Some("could not list your groups"))?;
        let mut groups: Vec<Group> = decode_list(&body, "groups")?;
        for group in &mut groups {
            group.joined = true;
        }
        Ok(groups)
    }

    /// Groups the logged-in user belongs to.
    pub fn get_user_groups(&self) -> Result<Vec<Group>, ApiError> {
        self.parse_get_user_groups(self.client.send(&self.build_get_user_groups())?)
    }

    pub fn build_get_group(&self, group_id: impl Into<Id>) -> HttpRequest {
        self.client.build_get(&Self::group_path(group_id), &[])
    }

    pub fn parse_get_group(&self, response: HttpResponse) -> Result<Group, ApiError> {
        let body = check_status(response, Some("could not fetch group"))?;
        decode_one(&body, "group")
    }

    pub fn get_group(&self, group_id: impl Into<Id>) -> Result<Group, ApiError> {
        self.parse_get_group(self.client.send(&self.build_get_group(group_id))?)
    }

    pub fn build_get_group_members(&self, group_id: impl Into<Id>) -> HttpRequest {
        self.client
            .build_get(&Self::group_path(group_id).push("members"), &[])
    }

    /// Members arrive wrapped as `{"user": {...}}`; a wrapper without `user`
    /// fails the whole list.
    pub fn parse_get_group_members(&self, response: HttpResponse) -> Result<Vec<User>, ApiError> {
        let body = check_status(response, Some("could not list group members"))?;
        let members = envelope(&body, "members")?;
        items(&members, "members")?
            .iter()
            .map(|member| User::from_api(field(member, "user")?))
            .collect()
    }

    pub fn get_group_members(&self, group_id: impl Into<Id>) -> Result<Vec<User>, ApiError> {
        self.parse_get_group_members(self.client.send(&self.build_get_group_members(group_id))?)
    }

    pub fn build_get_group_online_members(&self, group_id: impl Into<Id>) -> HttpRequest {
        self.client
            .build_get(&Self::group_path(group_id).push("online"), &[])
    }

    pub fn parse_get_group_online_members(
        &self,
        response: HttpResponse,
    ) -> Result<Vec<User>, ApiError> {
        let body = check_status(response, Some("could not list online group members"))?;
        decode_list(&body, "online")
    }

    pub fn get_group_online_members(&self, group_id: impl Into<Id>) -> Result<Vec<User>, ApiError> {
        let request = self.build_get_group_online_members(group_id);
        self.parse_get_group_online_members(self.client.send(&request)?)
    }

    pub fn build_get_group_topics(&self, group_id: impl Into<Id>) -> HttpRequest {
        self.client
            .build_get(&Self::group_path(group_id).push("topics"), &[])
    }

    pub fn parse_get_group_topics(&self, response: HttpResponse) -> Result<Vec<Topic>, ApiError> {
        let body = check_status(response, Some("could not list group topics"))?;
        decode_list(&body, "topics")
    }

    pub fn get_group_topics(&self, group_id: impl Into<Id>) -> Result<Vec<Topic>, ApiError> {
        self.parse_get_group_topics(self.client.send(&self.build_get_group_topics(group_id))?)
    }
}

#[cfg(test)]
mod tests {
    use crate::error::ApiError;
    use crate::http::HttpMethod;
    use crate::testing::{response, stub_client};
    use crate::types::Id;

    const GROUP: &str = r#"{
        "id": 7, "slug": "rustaceans", "name": "Rustaceans", "kind": "public",
        "members_count": 2, "topics_count": 1, "unread": 0,
        "date_created": 1297891236, "date_latest_message": 1297900000,
        "creator": {"id": 1, "username": "alice"}
    }"#;

    fn groups_body() -> String {
        format!(r#"{{"groups": [{GROUP}, {GROUP}]}}"#)
    }

    #[test]
    fn build_requests_use_group_paths() {
        let client = stub_client(Vec::new());
        let groups = client.groups();
        assert_eq!(groups.build_get_user_groups().url, "http://localhost:3000/api/groups.json");
        assert_eq!(groups.build_get_group(7).url, "http://localhost:3000/api/groups/7.json");
        assert_eq!(
            groups.build_get_group_members(7).url,
            "http://localhost:3000/api/groups/7/members.json"
        );
        assert_eq!(
            groups.build_get_group_online_members("7").url,
            "http://localhost:3000/api/groups/7/online.json"
        );
        let topics = groups.build_get_group_topics(7);
        assert_eq!(topics.method, HttpMethod::Get);
        assert_eq!(topics.url, "http://localhost:3000/api/groups/7/topics.json");
    }

    #[test]
    fn user_groups_are_joined() {
        let client = stub_client(vec![response(200, &groups_body())]);
        let groups = client.groups().get_user_groups().unwrap();
        assert_eq!(groups.len(), 2);
        assert!(groups.iter().all(|g| g.joined));
    }

    #[test]
    fn single_group_is_not_joined() {
        let body = format!(r#"{{"group": {GROUP}}}"#);
        let client = stub_client(vec![response(200, &body)]);
        let group = client.groups().get_group(7).unwrap();
        assert!(!group.joined);
        assert_eq!(group.id, Some(Id::Int(7)));
        assert_eq!(group.slug.as_deref(), Some("rustaceans"));
    }

    #[test]
    fn members_unwrap_user() {
        let body = r#"{"members": [{"user": {"id": 1, "username": "a"}}]}"#;
        let client = stub_client(vec![response(200, body)]);
        let members = client.groups().get_group_members(7).unwrap();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].id, Some(Id::Int(1)));
        assert_eq!(members[0].username.as_deref(), Some("a"));
    }

    #[test]
    fn member_without_user_fails() {
        let body = r#"{"members": [{"user": {"id": 1}}, {"joined": 1}]}"#;
        let client = stub_client(vec![response(200, body)]);
        let err = client.groups().get_group_members(7).unwrap_err();
        assert!(matches!(err, ApiError::MissingField(key) if key == "user"));
    }

    #[test]
    fn online_members_are_plain_users() {
        let body = r#"{"online": [{"id": 2, "username": "bob"}, {"id": 1, "username": "alice"}]}"#;
        let client = stub_client(vec![response(200, body)]);
        let online = client.groups().get_group_online_members(7).unwrap();
        let names: Vec<_> = online.iter().map(|u| u.username.as_deref().unwrap()).collect();
        assert_eq!(names, ["bob", "alice"]);
    }

    #[test]
    fn topics_decode_in_order() {
        let body = r#"{"topics": [
            {"id": 2, "slug": "second", "date_created": 5, "date_latest_message": 6, "creator": {}},
            {"id": 1, "slug": "first", "date_created": 1, "date_latest_message": 2, "creator": {}}
        ]}"#;
        let client = stub_client(vec![response(200, body)]);
        let topics = client.groups().get_group_topics(7).unwrap();
        assert_eq!(topics[0].slug.as_deref(), Some("second"));
        assert_eq!(topics[1].slug.as_deref(), Some("first"));
    }

    #[test]
    fn missing_envelope_is_an_error() {
        let client = stub_client(vec![response(200, r#"{"group": {}}"#)]);
        let err = client.groups().get_user_groups().unwrap_err();
        assert!(matches!(err, ApiError::MissingField(key) if key == "groups"));
    }

    #[test]
    fn unauthorized_and_server_errors() {
        let client = stub_client(vec![response(401, ""), response(500, "")]);
        let err = client.groups().get_group(7).unwrap_err();
        assert!(matches!(err, ApiError::AuthenticationFailed));
        let err = client.groups().get_group(7).unwrap_err();
        match err {
            ApiError::HttpError { status, message, .. } => {
                assert_eq!(status, 500);
                assert_eq!(message.as_deref(), Some("could not fetch group"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn group_convenience_methods_refetch() {
        let members = r#"{"members": [{"user": {"id": 1, "username": "alice"}}]}"#;
        let client = stub_client(vec![
            response(200, &format!(r#"{{"group": {GROUP}}}"#)),
            response(200, members),
            response(200, members),
            response(200, r#"{"online": []}"#),
            response(200, r#"{"topics": []}"#),
        ]);
        let group = client.groups().get_group(7).unwrap();
        assert_eq!(group.members(&client).unwrap().len(), 1);
        assert_eq!(group.members(&client).unwrap().len(), 1);
        assert!(group.online_members(&client).unwrap().is_empty());
        assert!(group.topics(&client).unwrap().is_empty());

        let urls: Vec<_> = client.transport().requests().into_iter().map(|r| r.url).collect();
        assert_eq!(
            urls,
            [
                "http://localhost:3000/api/groups/7.json",
                "http://localhost:3000/api/groups/7/members.json",
                "http://localhost:3000/api/groups/7/members.json",
                "http://localhost:3000/api/groups/7/online.json",
                "http://localhost:3000/api/groups/7/topics.json",
            ]
        );
    }
}
