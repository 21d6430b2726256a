//! The Actor hierarchy: individual Agents and Groups of Agents.

use serde::de::Error as _;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::wire::one_or_many;

/// A user account on an existing system, one of the four Agent identifier
/// kinds.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Account {
    /// Canonical home page of the system the account lives on.
    #[serde(rename = "homePage", skip_serializing_if = "Option::is_none")]
    pub home_page: Option<String>,

    /// The account name, unique within the home page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Account {
    /// Creates an account identifier.
    pub fn new(home_page: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            home_page: Some(home_page.into()),
            name: Some(name.into()),
        }
    }
}

/// An individual Actor.
///
/// Exactly one of the identifier kinds (`mbox`, `mbox_sha1sum`, `openid`,
/// `account`) must be populated for the Agent to be valid; construction does
/// not enforce this, validation does. On the wire an Agent carries no
/// `objectType` discriminant — its absence is what distinguishes it from a
/// Group. A stray `objectType: "Agent"` is accepted and dropped on decode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Agent {
    /// Display name. Not an identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// `mailto` IRI identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mbox: Option<String>,

    /// SHA1 hex digest of a `mailto` IRI.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mbox_sha1sum: Option<String>,

    /// OpenID IRI identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub openid: Option<String>,

    /// Account identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<Account>,
}

impl Agent {
    /// Starts building an Agent.
    pub fn builder() -> AgentBuilder {
        AgentBuilder::default()
    }
}

/// Builder for [`Agent`].
#[derive(Debug, Default)]
pub struct AgentBuilder {
    agent: Agent,
}

impl AgentBuilder {
    /// Sets the display name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.agent.name = Some(name.into());
        self
    }

    /// Sets the `mailto` IRI identifier.
    pub fn mbox(mut self, mbox: impl Into<String>) -> Self {
        self.agent.mbox = Some(mbox.into());
        self
    }

    /// Sets the hashed-mailbox identifier.
    pub fn mbox_sha1sum(mut self, sha1sum: impl Into<String>) -> Self {
        self.agent.mbox_sha1sum = Some(sha1sum.into());
        self
    }

    /// Sets the OpenID identifier.
    pub fn openid(mut self, openid: impl Into<String>) -> Self {
        self.agent.openid = Some(openid.into());
        self
    }

    /// Sets the account identifier.
    pub fn account(mut self, account: Account) -> Self {
        self.agent.account = Some(account);
        self
    }

    /// Finishes the Agent.
    pub fn build(self) -> Agent {
        self.agent
    }
}

/// A collection of Agents.
///
/// With no identifier kind set the Group is *anonymous* and identified only
/// by its member list; with one set it is an *identified* Group. The wire
/// form always carries `objectType: "Group"`, and `member` always encodes as
/// an array even for a single member, while decoding also accepts a bare
/// object (some legacy producers emit one for single-member groups).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Deserialize)]
pub struct Group {
    /// Display name. Not an identifier.
    pub name: Option<String>,

    /// `mailto` IRI identifier.
    pub mbox: Option<String>,

    /// SHA1 hex digest of a `mailto` IRI.
    pub mbox_sha1sum: Option<String>,

    /// OpenID IRI identifier.
    pub openid: Option<String>,

    /// Account identifier.
    pub account: Option<Account>,

    /// The members of this Group, in insertion order.
    #[serde(default, deserialize_with = "one_or_many")]
    pub member: Option<Vec<Agent>>,
}

impl Group {
    /// Starts building a Group.
    pub fn builder() -> GroupBuilder {
        GroupBuilder::default()
    }

    /// Whether this Group carries no identifier of its own.
    pub fn is_anonymous(&self) -> bool {
        self.mbox.is_none()
            && self.mbox_sha1sum.is_none()
            && self.openid.is_none()
            && self.account.is_none()
    }
}

impl Serialize for Group {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("objectType", "Group")?;
        if let Some(name) = &self.name {
            map.serialize_entry("name", name)?;
        }
        if let Some(mbox) = &self.mbox {
            map.serialize_entry("mbox", mbox)?;
        }
        if let Some(sha1sum) = &self.mbox_sha1sum {
            map.serialize_entry("mbox_sha1sum", sha1sum)?;
        }
        if let Some(openid) = &self.openid {
            map.serialize_entry("openid", openid)?;
        }
        if let Some(account) = &self.account {
            map.serialize_entry("account", account)?;
        }
        if let Some(member) = &self.member {
            if !member.is_empty() {
                map.serialize_entry("member", member)?;
            }
        }
        map.end()
    }
}

/// Builder for [`Group`].
#[derive(Debug, Default)]
pub struct GroupBuilder {
    group: Group,
}

impl GroupBuilder {
    /// Sets the display name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.group.name = Some(name.into());
        self
    }

    /// Sets the `mailto` IRI identifier.
    pub fn mbox(mut self, mbox: impl Into<String>) -> Self {
        self.group.mbox = Some(mbox.into());
        self
    }

    /// Sets the hashed-mailbox identifier.
    pub fn mbox_sha1sum(mut self, sha1sum: impl Into<String>) -> Self {
        self.group.mbox_sha1sum = Some(sha1sum.into());
        self
    }

    /// Sets the OpenID identifier.
    pub fn openid(mut self, openid: impl Into<String>) -> Self {
        self.group.openid = Some(openid.into());
        self
    }

    /// Sets the account identifier.
    pub fn account(mut self, account: Account) -> Self {
        self.group.account = Some(account);
        self
    }

    /// Appends a member, preserving prior members in call order.
    ///
    /// Appending to an absent list creates a length-1 list. There is no
    /// de-duplication.
    pub fn member(mut self, agent: Agent) -> Self {
        self.group.member.get_or_insert_with(Vec::new).push(agent);
        self
    }

    /// Appends a member configured through a nested builder.
    pub fn member_with(self, f: impl FnOnce(AgentBuilder) -> AgentBuilder) -> Self {
        self.member(f(Agent::builder()).build())
    }

    /// Finishes the Group.
    pub fn build(self) -> Group {
        self.group
    }
}

/// Whom a statement is about: either an individual [`Agent`] or a [`Group`].
///
/// Decoding reads the `objectType` discriminant: `"Group"` selects Group,
/// an absent tag or `"Agent"` selects Agent, and anything else is a decode
/// error.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Actor {
    /// An individual.
    Agent(Agent),
    /// A named or anonymous collection of Agents.
    Group(Group),
}

impl Actor {
    /// Display name of the underlying Agent or Group.
    pub fn name(&self) -> Option<&str> {
        match self {
            Actor::Agent(agent) => agent.name.as_deref(),
            Actor::Group(group) => group.name.as_deref(),
        }
    }

    /// The underlying Group, if this Actor is one.
    pub fn as_group(&self) -> Option<&Group> {
        match self {
            Actor::Group(group) => Some(group),
            Actor::Agent(_) => None,
        }
    }
}

impl From<Agent> for Actor {
    fn from(agent: Agent) -> Self {
        Actor::Agent(agent)
    }
}

impl From<Group> for Actor {
    fn from(group: Group) -> Self {
        Actor::Group(group)
    }
}

impl Serialize for Actor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Actor::Agent(agent) => agent.serialize(serializer),
            Actor::Group(group) => group.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Actor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        match object_type_tag::<D>(&value)?.as_deref() {
            None | Some("Agent") => serde_json::from_value(value)
                .map(Actor::Agent)
                .map_err(D::Error::custom),
            Some("Group") => serde_json::from_value(value)
                .map(Actor::Group)
                .map_err(D::Error::custom),
            Some(other) => Err(D::Error::unknown_variant(other, &["Agent", "Group"])),
        }
    }
}

/// Reads the `objectType` discriminant out of a buffered JSON object.
pub(crate) fn object_type_tag<'de, D: Deserializer<'de>>(
    value: &serde_json::Value,
) -> Result<Option<String>, D::Error> {
    match value.get("objectType") {
        None => Ok(None),
        Some(serde_json::Value::String(tag)) => Ok(Some(tag.clone())),
        Some(_) => Err(D::Error::custom("objectType must be a string")),
    }
}
