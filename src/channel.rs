use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::{
    client::WebClient,
    error::{Error, Result},
    methods::{parse_timestamp, ApiObject, Arg, Methods},
    object::SlackObject,
    resolver::BatchResolver,
    user::User,
};

/// A public channel, as returned by `channels.info` and `channels.list`.
#[derive(Clone, Debug)]
pub struct Channel {
    client: WebClient,
    id: String,
    object: SlackObject,
}

impl ApiObject for Channel {
    const API_PREFIX: &'static str = "channels";
    const API_NAME: &'static str = "channel";
    const API_NAME_PLURAL: &'static str = "channels";

    fn from_object(client: &WebClient, object: SlackObject) -> Result<Self> {
        let id = object.str("id")?.to_owned();
        Ok(Self { client: client.clone(), id, object })
    }
}

impl Channel {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> Result<&str> {
        self.object.str("name")
    }

    pub fn created_at(&self) -> Result<DateTime<Utc>> {
        parse_timestamp("created", self.object.get("created")?)
    }

    pub fn creator_id(&self) -> Result<&str> {
        self.object.str("creator")
    }

    /// Fetches the user that created the channel.
    pub async fn creator(&self) -> Result<User> {
        self.client.get_user(self.creator_id()?).await
    }

    pub fn is_archived(&self) -> Result<bool> {
        self.object.bool("is_archived")
    }

    /// Whether this is the team's default channel. Teams may rename it, so prefer this over
    /// matching on "general".
    pub fn is_general(&self) -> Result<bool> {
        self.object.bool("is_general")
    }

    /// Whether the calling user is a member of the channel.
    pub fn is_member(&self) -> Result<bool> {
        self.object.bool("is_member")
    }

    /// Position of the calling user's read cursor.
    pub fn last_read(&self) -> Result<DateTime<Utc>> {
        parse_timestamp("last_read", self.object.get("last_read")?)
    }

    /// Number of messages posted after the calling user's read cursor.
    pub fn unread_count(&self) -> Result<i64> {
        self.object.i64("unread_count")
    }

    pub fn topic(&self) -> Result<&str> {
        self.object.path_str("topic.value")
    }

    pub fn purpose(&self) -> Result<&str> {
        self.object.path_str("purpose.value")
    }

    pub fn member_ids(&self) -> Result<Vec<&str>> {
        self.object
            .array("members")?
            .iter()
            .map(|member| {
                member.as_str().ok_or_else(|| Error::UnexpectedType {
                    field: "members".to_owned(),
                    expected: "an array of user IDs",
                })
            })
            .collect()
    }

    pub fn members_count(&self) -> Result<usize> {
        Ok(self.object.array("members")?.len())
    }

    /// Fetches every member of the channel as a [`User`], in the order Slack lists them.
    ///
    /// One `users.info` call is needed per member. At most
    /// [`WebClient::member_concurrency`] of them are in flight at any time, and the first
    /// failing lookup fails the whole listing.
    #[tracing::instrument(skip(self), fields(channel = %self.id), err)]
    pub async fn members(&self) -> Result<Vec<User>> {
        let ids = self.member_ids()?.into_iter().map(str::to_owned).collect::<Vec<_>>();
        let resolver = BatchResolver::new(self.client.users(), self.client.member_concurrency());
        Ok(resolver.resolve_all::<String, User>(&ids).await?)
    }

    pub async fn history(&self, criteria: &[(&str, Arg)]) -> Result<Vec<Value>> {
        self.client.channels().history(self, criteria).await
    }

    pub async fn archive(&self) -> Result<()> {
        self.client.channels().archive(self).await
    }

    pub async fn unarchive(&self) -> Result<()> {
        self.client.channels().unarchive(self).await
    }

    pub async fn invite(&self, user: impl Into<Arg>) -> Result<()> {
        self.client.channels().invite(self, user).await
    }

    /// Joins the channel by name.
    pub async fn join(&self) -> Result<()> {
        self.client.channels().join(self.name()?).await
    }

    pub async fn leave(&self) -> Result<()> {
        self.client.channels().leave(self).await
    }

    pub async fn kick(&self, user: impl Into<Arg>) -> Result<()> {
        self.client.channels().kick(self, user).await
    }

    /// Moves the read cursor, to now when `last_read` is `None`.
    pub async fn mark(&self, last_read: Option<DateTime<Utc>>) -> Result<()> {
        self.client.channels().mark(self, last_read.unwrap_or_else(Utc::now)).await
    }

    pub async fn rename(&self, name: &str) -> Result<String> {
        self.client.channels().rename(self, name).await
    }

    pub async fn set_purpose(&self, purpose: &str) -> Result<()> {
        self.client.channels().set_purpose(self, purpose).await
    }

    pub async fn set_topic(&self, topic: &str) -> Result<()> {
        self.client.channels().set_topic(self, topic).await
    }

    pub fn as_object(&self) -> &SlackObject {
        &self.object
    }
}

impl From<&Channel> for Arg {
    fn from(channel: &Channel) -> Self {
        Arg::from(channel.id())
    }
}

/// The `channels.*` method group.
#[derive(Clone)]
pub struct ChannelMethods {
    methods: Methods<Channel>,
}

impl ChannelMethods {
    pub(crate) fn new(client: WebClient) -> Self {
        Self { methods: Methods::new(client) }
    }

    pub async fn archive(&self, channel: impl Into<Arg>) -> Result<()> {
        self.methods.call("archive", Some(channel.into()), &[]).await.map(drop)
    }

    pub async fn create(&self, name: &str) -> Result<Channel> {
        self.methods.call_for_object("create", &[("name", name.into())]).await
    }

    /// Returns a page of message events. Results may be paged; see `has_more` in the Slack docs.
    pub async fn history(
        &self,
        channel: impl Into<Arg>,
        criteria: &[(&str, Arg)],
    ) -> Result<Vec<Value>> {
        let response = self.methods.call("history", Some(channel.into()), criteria).await?;
        Ok(response.array("messages")?.clone())
    }

    pub async fn info(&self, id: &str) -> Result<Channel> {
        self.methods.call_for_object("info", &[("channel", id.into())]).await
    }

    pub async fn invite(&self, channel: impl Into<Arg>, user: impl Into<Arg>) -> Result<()> {
        self.methods.call("invite", Some(channel.into()), &[("user", user.into())]).await.map(drop)
    }

    /// Joins a channel by name, creating it if it does not exist.
    pub async fn join(&self, name: &str) -> Result<()> {
        self.methods.call("join", None, &[("name", name.into())]).await.map(drop)
    }

    pub async fn kick(&self, channel: impl Into<Arg>, user: impl Into<Arg>) -> Result<()> {
        self.methods.call("kick", Some(channel.into()), &[("user", user.into())]).await.map(drop)
    }

    pub async fn leave(&self, channel: impl Into<Arg>) -> Result<()> {
        self.methods.call("leave", Some(channel.into()), &[]).await.map(drop)
    }

    pub async fn list(&self, options: &[(&str, Arg)]) -> Result<Vec<Channel>> {
        self.methods.call_for_collection("list", options).await
    }

    pub async fn mark(&self, channel: impl Into<Arg>, last_read: DateTime<Utc>) -> Result<()> {
        self.methods.call("mark", Some(channel.into()), &[("ts", last_read.into())]).await.map(drop)
    }

    /// Renames a channel and returns the name Slack settled on, which may have been normalised.
    pub async fn rename(&self, channel: impl Into<Arg>, name: &str) -> Result<String> {
        let response =
            self.methods.call("rename", Some(channel.into()), &[("name", name.into())]).await?;
        Ok(response.path_str("channel.name")?.to_owned())
    }

    pub async fn set_purpose(&self, channel: impl Into<Arg>, purpose: &str) -> Result<()> {
        self.methods
            .call("setPurpose", Some(channel.into()), &[("purpose", purpose.into())])
            .await
            .map(drop)
    }

    pub async fn set_topic(&self, channel: impl Into<Arg>, topic: &str) -> Result<()> {
        self.methods
            .call("setTopic", Some(channel.into()), &[("topic", topic.into())])
            .await
            .map(drop)
    }

    pub async fn unarchive(&self, channel: impl Into<Arg>) -> Result<()> {
        self.methods.call("unarchive", Some(channel.into()), &[]).await.map(drop)
    }
}
