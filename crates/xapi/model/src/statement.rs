//! The Statement and SubStatement aggregates.

use std::hash::{Hash, Hasher};

use chrono::{DateTime, Utc};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use uuid::Uuid;

use crate::activity::{Activity, ActivityBuilder};
use crate::actor::{Actor, Agent, AgentBuilder, Group, GroupBuilder};
use crate::attachment::{Attachment, AttachmentBuilder};
use crate::context::{Context, ContextBuilder};
use crate::error::ModelError;
use crate::object::{ObjectType, StatementObject, StatementReference};
use crate::result::{StatementResult, StatementResultBuilder};
use crate::verb::{Verb, VerbBuilder};
use crate::wire::is_none_or_empty;

/// A statement nested as the object of another statement.
///
/// Structurally a statement without id or LRS bookkeeping fields. Its own
/// object may be anything a Statement's can, but a SubStatement inside a
/// SubStatement fails validation: nesting stops one level below the
/// top-level Statement, so traversal depth is bounded.
///
/// `actor`, `verb` and `object` are required by validation; decode accepts
/// their absence and reports it as a violation rather than failing.
///
/// Equality and hashing exclude `timestamp` and `attachments`, which are
/// volatile transport metadata.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubStatement {
    /// Whom the statement is about.
    pub actor: Option<Actor>,

    /// Action taken by the Actor.
    pub verb: Option<Verb>,

    /// Target of the verb.
    pub object: Option<StatementObject>,

    /// Measured outcome.
    pub result: Option<StatementResult>,

    /// Context giving the statement more meaning.
    pub context: Option<Context>,

    /// When the events described occurred. Excluded from equality.
    pub timestamp: Option<DateTime<Utc>>,

    /// Attachment headers. Excluded from equality.
    pub attachments: Option<Vec<Attachment>>,
}

impl SubStatement {
    /// Starts building a SubStatement.
    pub fn builder() -> SubStatementBuilder {
        SubStatementBuilder {
            sub: SubStatement::default(),
        }
    }
}

impl PartialEq for SubStatement {
    fn eq(&self, other: &Self) -> bool {
        self.actor == other.actor
            && self.verb == other.verb
            && self.object == other.object
            && self.result == other.result
            && self.context == other.context
    }
}

impl Hash for SubStatement {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.actor.hash(state);
        self.verb.hash(state);
        self.object.hash(state);
        self.result.hash(state);
        self.context.hash(state);
    }
}

impl Serialize for SubStatement {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("objectType", &ObjectType::SubStatement)?;
        if let Some(actor) = &self.actor {
            map.serialize_entry("actor", actor)?;
        }
        if let Some(verb) = &self.verb {
            map.serialize_entry("verb", verb)?;
        }
        if let Some(object) = &self.object {
            map.serialize_entry("object", object)?;
        }
        if let Some(result) = &self.result {
            map.serialize_entry("result", result)?;
        }
        if let Some(context) = &self.context {
            map.serialize_entry("context", context)?;
        }
        if let Some(timestamp) = &self.timestamp {
            map.serialize_entry("timestamp", timestamp)?;
        }
        if let Some(attachments) = &self.attachments {
            if !attachments.is_empty() {
                map.serialize_entry("attachments", attachments)?;
            }
        }
        map.end()
    }
}

/// An xAPI Statement: who did what to what, with optional outcome, context
/// and bookkeeping.
///
/// `stored`, `authority` and `version` are set by the receiving LRS;
/// together with `timestamp` and `attachments` they are volatile transport
/// metadata and are excluded from equality and hashing. Everything else —
/// including `id` — identifies the event and participates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Statement {
    /// Statement id, assigned by the producer or the LRS.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,

    /// Whom the statement is about. Required by validation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor: Option<Actor>,

    /// Action taken by the Actor. Required by validation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verb: Option<Verb>,

    /// Target of the verb. Required by validation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object: Option<StatementObject>,

    /// Measured outcome.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<StatementResult>,

    /// Context giving the statement more meaning.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Context>,

    /// When the events described occurred. Excluded from equality.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,

    /// When the statement was persisted by the LRS. Excluded from equality.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stored: Option<DateTime<Utc>>,

    /// Who asserts this statement is true. Excluded from equality.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authority: Option<Actor>,

    /// xAPI version the statement conforms to. Excluded from equality.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Attachment headers. Excluded from equality.
    #[serde(skip_serializing_if = "is_none_or_empty")]
    pub attachments: Option<Vec<Attachment>>,
}

impl Statement {
    /// Starts building a Statement.
    pub fn builder() -> StatementBuilder {
        StatementBuilder {
            statement: Statement::default(),
        }
    }

    /// Whether this statement retracts another: the reserved voiding verb
    /// aimed at a statement reference.
    pub fn is_voiding(&self) -> bool {
        self.verb.as_ref().is_some_and(Verb::is_voided)
            && matches!(self.object, Some(StatementObject::StatementRef(_)))
    }

    /// Decodes a Statement from JSON text. Any malformed field aborts the
    /// decode; no partial object is returned.
    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        serde_json::from_str(json).map_err(ModelError::Decode)
    }

    /// Encodes this Statement as JSON text in canonical field order.
    pub fn to_json(&self) -> Result<String, ModelError> {
        serde_json::to_string(self).map_err(ModelError::Encode)
    }
}

impl PartialEq for Statement {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.actor == other.actor
            && self.verb == other.verb
            && self.object == other.object
            && self.result == other.result
            && self.context == other.context
    }
}

impl Hash for Statement {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
        self.actor.hash(state);
        self.verb.hash(state);
        self.object.hash(state);
        self.result.hash(state);
        self.context.hash(state);
    }
}

/// Builder for [`SubStatement`].
#[derive(Debug)]
pub struct SubStatementBuilder {
    sub: SubStatement,
}

impl SubStatementBuilder {
    /// Sets the actor.
    pub fn actor(mut self, actor: impl Into<Actor>) -> Self {
        self.sub.actor = Some(actor.into());
        self
    }

    /// Sets an Agent actor through a nested builder.
    pub fn agent_actor(self, f: impl FnOnce(AgentBuilder) -> AgentBuilder) -> Self {
        self.actor(f(Agent::builder()).build())
    }

    /// Sets a Group actor through a nested builder.
    pub fn group_actor(self, f: impl FnOnce(GroupBuilder) -> GroupBuilder) -> Self {
        self.actor(f(Group::builder()).build())
    }

    /// Sets the verb.
    pub fn verb(mut self, verb: Verb) -> Self {
        self.sub.verb = Some(verb);
        self
    }

    /// Sets the verb through a nested builder for the given id.
    pub fn verb_with(
        self,
        id: impl Into<String>,
        f: impl FnOnce(VerbBuilder) -> VerbBuilder,
    ) -> Self {
        self.verb(f(Verb::builder(id)).build())
    }

    /// Sets the object.
    pub fn object(mut self, object: impl Into<StatementObject>) -> Self {
        self.sub.object = Some(object.into());
        self
    }

    /// Sets an Activity object for the given id.
    pub fn activity(self, id: impl Into<String>) -> Self {
        self.object(Activity::new(id))
    }

    /// Sets an Activity object through a nested builder for the given id.
    pub fn activity_with(
        self,
        id: impl Into<String>,
        f: impl FnOnce(ActivityBuilder) -> ActivityBuilder,
    ) -> Self {
        self.object(f(Activity::builder(id)).build())
    }

    /// Sets a statement-reference object.
    pub fn statement_ref(self, id: Uuid) -> Self {
        self.object(StatementReference::new(id))
    }

    /// Sets the result.
    pub fn result(mut self, result: StatementResult) -> Self {
        self.sub.result = Some(result);
        self
    }

    /// Sets the result through a nested builder.
    pub fn result_with(
        self,
        f: impl FnOnce(StatementResultBuilder) -> StatementResultBuilder,
    ) -> Self {
        self.result(f(StatementResult::builder()).build())
    }

    /// Sets the context.
    pub fn context(mut self, context: Context) -> Self {
        self.sub.context = Some(context);
        self
    }

    /// Sets the context through a nested builder.
    pub fn context_with(self, f: impl FnOnce(ContextBuilder) -> ContextBuilder) -> Self {
        self.context(f(Context::builder()).build())
    }

    /// Sets the timestamp.
    pub fn timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.sub.timestamp = Some(timestamp);
        self
    }

    /// Appends an attachment header, preserving prior entries in call order.
    pub fn attachment(mut self, attachment: Attachment) -> Self {
        self.sub
            .attachments
            .get_or_insert_with(Vec::new)
            .push(attachment);
        self
    }

    /// Appends an attachment configured through a nested builder.
    pub fn attachment_with(
        self,
        f: impl FnOnce(AttachmentBuilder) -> AttachmentBuilder,
    ) -> Self {
        self.attachment(f(Attachment::builder()).build())
    }

    /// Finishes the SubStatement.
    pub fn build(self) -> SubStatement {
        self.sub
    }
}

/// Builder for [`Statement`].
#[derive(Debug)]
pub struct StatementBuilder {
    statement: Statement,
}

impl StatementBuilder {
    /// Sets the statement id.
    pub fn id(mut self, id: Uuid) -> Self {
        self.statement.id = Some(id);
        self
    }

    /// Sets the actor.
    pub fn actor(mut self, actor: impl Into<Actor>) -> Self {
        self.statement.actor = Some(actor.into());
        self
    }

    /// Sets an Agent actor through a nested builder.
    pub fn agent_actor(self, f: impl FnOnce(AgentBuilder) -> AgentBuilder) -> Self {
        self.actor(f(Agent::builder()).build())
    }

    /// Sets a Group actor through a nested builder.
    pub fn group_actor(self, f: impl FnOnce(GroupBuilder) -> GroupBuilder) -> Self {
        self.actor(f(Group::builder()).build())
    }

    /// Sets the verb.
    pub fn verb(mut self, verb: Verb) -> Self {
        self.statement.verb = Some(verb);
        self
    }

    /// Sets the verb through a nested builder for the given id.
    pub fn verb_with(
        self,
        id: impl Into<String>,
        f: impl FnOnce(VerbBuilder) -> VerbBuilder,
    ) -> Self {
        self.verb(f(Verb::builder(id)).build())
    }

    /// Sets the object.
    pub fn object(mut self, object: impl Into<StatementObject>) -> Self {
        self.statement.object = Some(object.into());
        self
    }

    /// Sets an Activity object for the given id.
    pub fn activity(self, id: impl Into<String>) -> Self {
        self.object(Activity::new(id))
    }

    /// Sets an Activity object through a nested builder for the given id.
    pub fn activity_with(
        self,
        id: impl Into<String>,
        f: impl FnOnce(ActivityBuilder) -> ActivityBuilder,
    ) -> Self {
        self.object(f(Activity::builder(id)).build())
    }

    /// Sets a statement-reference object.
    pub fn statement_ref(self, id: Uuid) -> Self {
        self.object(StatementReference::new(id))
    }

    /// Sets a SubStatement object through a nested builder.
    pub fn sub_statement(
        self,
        f: impl FnOnce(SubStatementBuilder) -> SubStatementBuilder,
    ) -> Self {
        self.object(f(SubStatement::builder()).build())
    }

    /// Sets the result.
    pub fn result(mut self, result: StatementResult) -> Self {
        self.statement.result = Some(result);
        self
    }

    /// Sets the result through a nested builder.
    pub fn result_with(
        self,
        f: impl FnOnce(StatementResultBuilder) -> StatementResultBuilder,
    ) -> Self {
        self.result(f(StatementResult::builder()).build())
    }

    /// Sets the context.
    pub fn context(mut self, context: Context) -> Self {
        self.statement.context = Some(context);
        self
    }

    /// Sets the context through a nested builder.
    pub fn context_with(self, f: impl FnOnce(ContextBuilder) -> ContextBuilder) -> Self {
        self.context(f(Context::builder()).build())
    }

    /// Sets the timestamp.
    pub fn timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.statement.timestamp = Some(timestamp);
        self
    }

    /// Sets the stored time.
    pub fn stored(mut self, stored: DateTime<Utc>) -> Self {
        self.statement.stored = Some(stored);
        self
    }

    /// Sets the authority.
    pub fn authority(mut self, authority: impl Into<Actor>) -> Self {
        self.statement.authority = Some(authority.into());
        self
    }

    /// Sets the xAPI version text.
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.statement.version = Some(version.into());
        self
    }

    /// Appends an attachment header, preserving prior entries in call order.
    pub fn attachment(mut self, attachment: Attachment) -> Self {
        self.statement
            .attachments
            .get_or_insert_with(Vec::new)
            .push(attachment);
        self
    }

    /// Appends an attachment configured through a nested builder.
    pub fn attachment_with(
        self,
        f: impl FnOnce(AttachmentBuilder) -> AttachmentBuilder,
    ) -> Self {
        self.attachment(f(Attachment::builder()).build())
    }

    /// Finishes the Statement.
    pub fn build(self) -> Statement {
        self.statement
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn answered() -> Statement {
        Statement::builder()
            .agent_actor(|a| a.name("A N Other").mbox("mailto:another@example.com"))
            .verb_with("http://adlnet.gov/expapi/verbs/answered", |v| {
                v.display("en", "answered")
            })
            .activity("http://www.example.co.uk/exampleactivity")
            .build()
    }

    fn fixed_time(text: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(text).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn equality_excludes_timestamp_and_attachments() {
        let base = answered();

        let mut retransmitted = base.clone();
        retransmitted.timestamp = Some(fixed_time("2023-01-02T03:04:05Z"));
        retransmitted.attachments = Some(vec![Attachment::builder()
            .usage_type("http://adlnet.gov/expapi/attachments/signature")
            .build()]);

        assert_eq!(base, retransmitted);
    }

    #[test]
    fn equality_excludes_lrs_bookkeeping() {
        let base = answered();

        let mut stored = base.clone();
        stored.stored = Some(fixed_time("2023-01-02T03:04:05Z"));
        stored.authority = Some(Agent::builder().mbox("mailto:lrs@example.com").build().into());
        stored.version = Some("1.0.3".to_string());

        assert_eq!(base, stored);
    }

    #[test]
    fn equality_is_sensitive_to_identity_fields() {
        let base = answered();

        let mut other_verb = base.clone();
        other_verb.verb = Some(Verb::new("http://adlnet.gov/expapi/verbs/attempted"));
        assert_ne!(base, other_verb);

        let mut other_actor = base.clone();
        other_actor.actor =
            Some(Agent::builder().mbox("mailto:someoneelse@example.com").build().into());
        assert_ne!(base, other_actor);

        let mut other_id = base.clone();
        other_id.id = Some(Uuid::new_v4());
        assert_ne!(base, other_id);
    }

    #[test]
    fn equal_statements_hash_equally() {
        use std::collections::hash_map::DefaultHasher;

        let base = answered();
        let mut retransmitted = base.clone();
        retransmitted.timestamp = Some(fixed_time("2023-01-02T03:04:05Z"));

        let mut ha = DefaultHasher::new();
        let mut hb = DefaultHasher::new();
        base.hash(&mut ha);
        retransmitted.hash(&mut hb);
        assert_eq!(ha.finish(), hb.finish());
    }

    #[test]
    fn sub_statement_equality_excludes_volatile_fields() {
        let base = SubStatement::builder()
            .agent_actor(|a| a.mbox("mailto:test@example.com"))
            .verb(Verb::new("http://example.com/visited"))
            .activity("http://example.com/website")
            .build();

        let mut later = base.clone();
        later.timestamp = Some(fixed_time("2023-06-01T00:00:00Z"));
        assert_eq!(base, later);

        let mut other_object = base.clone();
        other_object.object = Some(Activity::new("http://example.com/other").into());
        assert_ne!(base, other_object);
    }

    #[test]
    fn encode_decode_encode_is_byte_stable() {
        let statement = Statement::builder()
            .id(Uuid::parse_str("12345678-1234-5678-1234-567812345678").unwrap())
            .agent_actor(|a| a.name("A N Other").mbox("mailto:another@example.com"))
            .verb_with("http://adlnet.gov/expapi/verbs/attended", |v| {
                v.display("en-GB", "attended").display("en-US", "attended")
            })
            .activity_with("http://www.example.co.uk/exampleactivity", |a| {
                a.definition_with(|d| {
                    d.name("en-GB", "example activity")
                        .description("en-GB", "An example of an activity")
                        .activity_type("http://adlnet.gov/expapi/activities/course")
                })
            })
            .result_with(|r| r.score_with(|s| s.scaled(0.8)).success(true))
            .context_with(|c| {
                c.registration(Uuid::parse_str("ec531277-b57b-4c15-8d91-d292c5b2b8f7").unwrap())
                    .platform("Example LMS")
                    .extension("http://example.com/ext/z", json!({"nested": [1, 2]}))
                    .extension("http://example.com/ext/a", json!("first-stays-first"))
            })
            .timestamp(fixed_time("2013-05-18T05:32:34.804Z"))
            .build();

        let first = statement.to_json().unwrap();
        let decoded = Statement::from_json(&first).unwrap();
        let second = decoded.to_json().unwrap();

        assert_eq!(first, second);
        assert_eq!(decoded, statement);
    }

    #[test]
    fn absent_fields_are_omitted_from_the_wire() {
        let json: serde_json::Value = serde_json::to_value(answered()).unwrap();
        let keys: Vec<&String> = json.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["actor", "verb", "object"]);
    }

    #[test]
    fn sub_statement_object_round_trips_with_tag() {
        let statement = Statement::builder()
            .agent_actor(|a| a.mbox("mailto:test@example.com"))
            .verb(Verb::new("http://example.com/planned"))
            .sub_statement(|s| {
                s.agent_actor(|a| a.mbox("mailto:test@example.com"))
                    .verb(Verb::new("http://example.com/visited"))
                    .activity_with("http://example.com/website", |a| {
                        a.definition_with(|d| d.name("en", "Some Awesome Website"))
                    })
            })
            .build();

        let json = serde_json::to_value(&statement).unwrap();
        assert_eq!(json["object"]["objectType"], "SubStatement");
        assert!(json["object"].get("id").is_none());

        let decoded: Statement = serde_json::from_value(json).unwrap();
        assert_eq!(decoded, statement);
    }

    #[test]
    fn voiding_statement_is_detected() {
        let voiding = Statement::builder()
            .agent_actor(|a| a.mbox("mailto:admin@example.com"))
            .verb(Verb::voided())
            .statement_ref(Uuid::new_v4())
            .build();
        assert!(voiding.is_voiding());

        let plain = answered();
        assert!(!plain.is_voiding());

        let voided_verb_wrong_object = Statement::builder()
            .agent_actor(|a| a.mbox("mailto:admin@example.com"))
            .verb(Verb::voided())
            .activity("http://example.com/activity")
            .build();
        assert!(!voided_verb_wrong_object.is_voiding());
    }

    #[test]
    fn attachment_accumulation_preserves_call_order() {
        let statement = answered();
        let with_attachments = Statement::builder()
            .actor(statement.actor.clone().unwrap())
            .attachment_with(|a| a.usage_type("http://example.com/first"))
            .attachment_with(|a| a.usage_type("http://example.com/second"))
            .build();

        let attachments = with_attachments.attachments.unwrap();
        assert_eq!(attachments.len(), 2);
        assert_eq!(
            attachments[0].usage_type.as_deref(),
            Some("http://example.com/first")
        );
    }

    #[test]
    fn malformed_json_aborts_decode() {
        assert!(Statement::from_json("{\"actor\": [").is_err());
        assert!(Statement::from_json(
            "{\"object\": {\"objectType\": \"Mystery\"}}"
        )
        .is_err());
    }
}
