//! The polymorphic object of a statement.

use serde::de::Error as _;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

use crate::activity::Activity;
use crate::actor::{object_type_tag, Agent, Group};
use crate::statement::SubStatement;

/// Wire discriminant for the polymorphic statement objects.
///
/// Serialized exactly as the variant name. A value outside this set is a
/// decode error, never a silently-defaulted Activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectType {
    /// An individual Actor.
    Agent,
    /// A collection of Agents.
    Group,
    /// A learning activity. On the wire the tag is normally absent; absence
    /// itself is the Activity discriminant.
    Activity,
    /// A reference to another statement.
    StatementRef,
    /// A nested statement.
    SubStatement,
}

/// A pointer to another statement, usually one being voided or annotated.
///
/// The wire form always carries `objectType: "StatementRef"`. The referenced
/// id is required by validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Deserialize)]
pub struct StatementReference {
    /// Id of the referenced statement.
    pub id: Option<Uuid>,
}

impl StatementReference {
    /// Creates a reference to the given statement id.
    pub fn new(id: Uuid) -> Self {
        Self { id: Some(id) }
    }

    /// Starts building a reference.
    pub fn builder() -> StatementReferenceBuilder {
        StatementReferenceBuilder {
            reference: StatementReference::default(),
        }
    }
}

impl Serialize for StatementReference {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("objectType", &ObjectType::StatementRef)?;
        if let Some(id) = &self.id {
            map.serialize_entry("id", id)?;
        }
        map.end()
    }
}

/// Builder for [`StatementReference`].
#[derive(Debug)]
pub struct StatementReferenceBuilder {
    reference: StatementReference,
}

impl StatementReferenceBuilder {
    /// Sets the referenced statement id.
    pub fn id(mut self, id: Uuid) -> Self {
        self.reference.id = Some(id);
        self
    }

    /// Finishes the reference.
    pub fn build(self) -> StatementReference {
        self.reference
    }
}

/// The target of a statement's verb.
///
/// Decoding inspects `objectType`: an absent tag means Activity, a present
/// tag dispatches to the matching variant, and a malformed or unrecognized
/// tag aborts the decode. Encoding tags every variant except Activity.
#[derive(Debug, Clone, PartialEq, Hash)]
pub enum StatementObject {
    /// A learning activity (the untagged default).
    Activity(Activity),
    /// An individual Actor.
    Agent(Agent),
    /// A collection of Agents.
    Group(Group),
    /// A reference to another statement.
    StatementRef(StatementReference),
    /// A nested statement. Only valid directly under a top-level Statement;
    /// validation rejects it one level further down.
    SubStatement(Box<SubStatement>),
}

impl StatementObject {
    /// The discriminant this object carries (or implies) on the wire.
    pub fn object_type(&self) -> ObjectType {
        match self {
            StatementObject::Activity(_) => ObjectType::Activity,
            StatementObject::Agent(_) => ObjectType::Agent,
            StatementObject::Group(_) => ObjectType::Group,
            StatementObject::StatementRef(_) => ObjectType::StatementRef,
            StatementObject::SubStatement(_) => ObjectType::SubStatement,
        }
    }
}

impl From<Activity> for StatementObject {
    fn from(activity: Activity) -> Self {
        StatementObject::Activity(activity)
    }
}

impl From<Agent> for StatementObject {
    fn from(agent: Agent) -> Self {
        StatementObject::Agent(agent)
    }
}

impl From<Group> for StatementObject {
    fn from(group: Group) -> Self {
        StatementObject::Group(group)
    }
}

impl From<StatementReference> for StatementObject {
    fn from(reference: StatementReference) -> Self {
        StatementObject::StatementRef(reference)
    }
}

impl From<SubStatement> for StatementObject {
    fn from(sub: SubStatement) -> Self {
        StatementObject::SubStatement(Box::new(sub))
    }
}

/// Wrapper that prefixes an Agent body with the discriminant it omits in
/// Actor position.
#[derive(Serialize)]
struct TaggedAgent<'a> {
    #[serde(rename = "objectType")]
    object_type: ObjectType,
    #[serde(flatten)]
    agent: &'a Agent,
}

impl Serialize for StatementObject {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            StatementObject::Activity(activity) => activity.serialize(serializer),
            StatementObject::Agent(agent) => TaggedAgent {
                object_type: ObjectType::Agent,
                agent,
            }
            .serialize(serializer),
            // Group, StatementRef and SubStatement emit their own tag.
            StatementObject::Group(group) => group.serialize(serializer),
            StatementObject::StatementRef(reference) => reference.serialize(serializer),
            StatementObject::SubStatement(sub) => sub.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for StatementObject {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        match object_type_tag::<D>(&value)?.as_deref() {
            None | Some("Activity") => serde_json::from_value(value)
                .map(StatementObject::Activity)
                .map_err(D::Error::custom),
            Some("Agent") => serde_json::from_value(value)
                .map(StatementObject::Agent)
                .map_err(D::Error::custom),
            Some("Group") => serde_json::from_value(value)
                .map(StatementObject::Group)
                .map_err(D::Error::custom),
            Some("StatementRef") => serde_json::from_value(value)
                .map(StatementObject::StatementRef)
                .map_err(D::Error::custom),
            Some("SubStatement") => serde_json::from_value(value)
                .map(|sub| StatementObject::SubStatement(Box::new(sub)))
                .map_err(D::Error::custom),
            Some(other) => Err(D::Error::unknown_variant(
                other,
                &["Agent", "Group", "Activity", "StatementRef", "SubStatement"],
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn untagged_object_defaults_to_activity() {
        let object: StatementObject =
            serde_json::from_value(json!({"id": "http://example.com/activity"})).unwrap();
        assert_eq!(object.object_type(), ObjectType::Activity);
    }

    #[test]
    fn tagged_variants_dispatch() {
        let agent: StatementObject = serde_json::from_value(json!({
            "objectType": "Agent",
            "mbox": "mailto:other@example.com"
        }))
        .unwrap();
        assert_eq!(agent.object_type(), ObjectType::Agent);

        let reference: StatementObject = serde_json::from_value(json!({
            "objectType": "StatementRef",
            "id": "9e13cefd-53d3-4eac-b5ed-2cf6693903bb"
        }))
        .unwrap();
        assert_eq!(reference.object_type(), ObjectType::StatementRef);
    }

    #[test]
    fn unrecognized_tag_is_a_decode_error_not_an_activity() {
        let result: Result<StatementObject, _> = serde_json::from_value(json!({
            "objectType": "Quiz",
            "id": "http://example.com/activity"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn agent_object_gains_its_tag_on_encode() {
        let object = StatementObject::from(
            Agent::builder().mbox("mailto:other@example.com").build(),
        );
        let json = serde_json::to_value(&object).unwrap();
        assert_eq!(json["objectType"], "Agent");
        assert_eq!(json["mbox"], "mailto:other@example.com");
    }

    #[test]
    fn activity_object_stays_untagged_on_encode() {
        let object = StatementObject::from(Activity::new("http://example.com/activity"));
        let json = serde_json::to_value(&object).unwrap();
        assert!(json.get("objectType").is_none());
    }

    #[test]
    fn statement_reference_encodes_tag_and_id() {
        let id = Uuid::new_v4();
        let json = serde_json::to_value(StatementReference::new(id)).unwrap();
        assert_eq!(json["objectType"], "StatementRef");
        assert_eq!(json["id"], json!(id.to_string()));
    }
}
