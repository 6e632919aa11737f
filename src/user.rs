use async_trait::async_trait;

use crate::{
    client::WebClient,
    error::{Error, Result},
    fetcher::Fetcher,
    methods::{ApiObject, Arg, Methods},
    object::SlackObject,
};

/// Picture sizes Slack renders for every profile.
pub const PICTURE_SIZES: [u32; 6] = [24, 32, 48, 72, 192, 512];

/// A team member, as returned by `users.info` and `users.list`.
///
/// Profile fields the user never filled in come back as `None`.
#[derive(Clone, Debug)]
pub struct User {
    client: WebClient,
    id: String,
    object: SlackObject,
}

impl ApiObject for User {
    const API_PREFIX: &'static str = "users";
    const API_NAME: &'static str = "user";
    const API_NAME_PLURAL: &'static str = "members";

    fn from_object(client: &WebClient, object: SlackObject) -> Result<Self> {
        let id = object.str("id")?.to_owned();
        Ok(Self { client: client.clone(), id, object })
    }
}

impl User {
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The username.
    pub fn name(&self) -> Result<&str> {
        self.object.str("name")
    }

    pub fn is_deleted(&self) -> Result<bool> {
        self.object.bool("deleted")
    }

    /// A color graphical clients may use for this user.
    pub fn color(&self) -> Result<&str> {
        self.object.str("color")
    }

    pub fn first_name(&self) -> Result<Option<&str>> {
        self.object.opt_path_str("profile.first_name")
    }

    pub fn last_name(&self) -> Result<Option<&str>> {
        self.object.opt_path_str("profile.last_name")
    }

    pub fn real_name(&self) -> Result<Option<&str>> {
        self.object.opt_path_str("profile.real_name")
    }

    pub fn email(&self) -> Result<Option<&str>> {
        self.object.opt_path_str("profile.email")
    }

    pub fn skype(&self) -> Result<Option<&str>> {
        self.object.opt_path_str("profile.skype")
    }

    /// URL of the profile picture at `size` pixels, one of [`PICTURE_SIZES`].
    ///
    /// Users without an uploaded picture get Slack's default avatar.
    pub fn picture(&self, size: u32) -> Result<&str> {
        if !PICTURE_SIZES.contains(&size) {
            return Err(Error::InvalidArgument(format!(
                "no picture has a size of {size}px, choose one of {PICTURE_SIZES:?}"
            )));
        }
        self.object.path_str(&format!("profile.image_{size}"))
    }

    pub fn is_admin(&self) -> Result<bool> {
        self.object.bool("is_admin")
    }

    pub fn is_owner(&self) -> Result<bool> {
        self.object.bool("is_owner")
    }

    pub fn is_primary_owner(&self) -> Result<bool> {
        self.object.bool("is_primary_owner")
    }

    pub fn is_restricted(&self) -> Result<bool> {
        self.object.bool("is_restricted")
    }

    pub fn is_ultra_restricted(&self) -> Result<bool> {
        self.object.bool("is_ultra_restricted")
    }

    pub fn has_two_factor(&self) -> Result<bool> {
        self.object.bool("has_2fa")
    }

    /// `"app"` or `"sms"`, or `None` when two-step verification is off.
    pub fn two_factor_type(&self) -> Result<Option<&str>> {
        if !self.has_two_factor()? {
            return Ok(None);
        }
        self.object.str("two_factor_type").map(Some)
    }

    pub fn has_files(&self) -> Result<bool> {
        self.object.bool("has_files")
    }

    pub async fn presence(&self) -> Result<String> {
        self.client.users().get_presence(self).await
    }

    pub fn as_object(&self) -> &SlackObject {
        &self.object
    }
}

impl From<&User> for Arg {
    fn from(user: &User) -> Self {
        Arg::from(user.id())
    }
}

/// The `users.*` method group.
///
/// It doubles as the [`Fetcher`] behind [`Channel::members`](crate::Channel::members), resolving
/// user IDs through `users.info`.
#[derive(Clone)]
pub struct UserMethods {
    methods: Methods<User>,
}

impl UserMethods {
    pub(crate) fn new(client: WebClient) -> Self {
        Self { methods: Methods::new(client) }
    }

    /// Returns `"active"` or `"away"`.
    pub async fn get_presence(&self, user: impl Into<Arg>) -> Result<String> {
        let response = self.methods.call("getPresence", Some(user.into()), &[]).await?;
        Ok(response.str("presence")?.to_owned())
    }

    pub async fn info(&self, id: &str) -> Result<User> {
        self.methods.call_for_object("info", &[("user", id.into())]).await
    }

    /// Lists every user of the team, deactivated ones included.
    pub async fn list(&self, options: &[(&str, Arg)]) -> Result<Vec<User>> {
        self.methods.call_for_collection("list", options).await
    }

    /// Tells Slack the calling user is active.
    pub async fn set_active(&self) -> Result<()> {
        self.methods.call("setActive", None, &[]).await.map(drop)
    }

    /// Sets the calling user's manual presence, `"auto"` or `"away"`.
    pub async fn set_presence(&self, presence: &str) -> Result<()> {
        self.methods.call("setPresence", None, &[("presence", presence.into())]).await.map(drop)
    }

    pub fn client(&self) -> &WebClient {
        self.methods.client()
    }
}

#[async_trait]
impl Fetcher<String, User> for UserMethods {
    type Error = Error;

    async fn fetch(&self, id: &String) -> Result<User> {
        self.info(id).await
    }
}
