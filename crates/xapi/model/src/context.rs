//! Context that gives a statement more meaning.

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::activity::{hash_extension_keys, Activity};
use crate::actor::{Actor, AgentBuilder, Group, GroupBuilder};
use crate::object::StatementReference;
use crate::wire::{is_none_or_empty, one_or_many};
use crate::Extensions;

/// Contextual information for a Statement or SubStatement.
///
/// Every field is optional; an empty Context serializes as an empty object
/// and is conventionally left off the statement entirely when nothing is
/// set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Context {
    /// Registration the statement is associated with.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration: Option<Uuid>,

    /// Instructor the statement relates to, if not the statement's Actor.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructor: Option<Actor>,

    /// Team the statement relates to, if not the statement's Actor.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team: Option<Group>,

    /// Kinds of learning-activity context this statement relates to.
    #[serde(rename = "contextActivities", skip_serializing_if = "Option::is_none")]
    pub context_activities: Option<ContextActivities>,

    /// Revision of the learning activity. Format free.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revision: Option<String>,

    /// Platform used in the experience.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,

    /// Language tag of the experience being recorded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    /// Another statement considered context for this one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statement: Option<StatementReference>,

    /// Domain-specific extension map, keyed by absolute IRI.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Extensions>,
}

impl Context {
    /// Starts building a Context.
    pub fn builder() -> ContextBuilder {
        ContextBuilder {
            context: Context::default(),
        }
    }
}

impl Hash for Context {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.registration.hash(state);
        self.instructor.hash(state);
        self.team.hash(state);
        self.context_activities.hash(state);
        self.revision.hash(state);
        self.platform.hash(state);
        self.language.hash(state);
        self.statement.hash(state);
        hash_extension_keys(&self.extensions, state);
    }
}

/// Builder for [`Context`].
#[derive(Debug)]
pub struct ContextBuilder {
    context: Context,
}

impl ContextBuilder {
    /// Sets the registration.
    pub fn registration(mut self, registration: Uuid) -> Self {
        self.context.registration = Some(registration);
        self
    }

    /// Sets the instructor.
    pub fn instructor(mut self, instructor: impl Into<Actor>) -> Self {
        self.context.instructor = Some(instructor.into());
        self
    }

    /// Sets an Agent instructor through a nested builder.
    pub fn agent_instructor(self, f: impl FnOnce(AgentBuilder) -> AgentBuilder) -> Self {
        self.instructor(f(crate::actor::Agent::builder()).build())
    }

    /// Sets a Group instructor through a nested builder.
    pub fn group_instructor(self, f: impl FnOnce(GroupBuilder) -> GroupBuilder) -> Self {
        self.instructor(f(Group::builder()).build())
    }

    /// Sets the team.
    pub fn team(mut self, team: Group) -> Self {
        self.context.team = Some(team);
        self
    }

    /// Sets the team through a nested builder.
    pub fn team_with(self, f: impl FnOnce(GroupBuilder) -> GroupBuilder) -> Self {
        self.team(f(Group::builder()).build())
    }

    /// Sets the context activities.
    pub fn context_activities(mut self, activities: ContextActivities) -> Self {
        self.context.context_activities = Some(activities);
        self
    }

    /// Sets the context activities through a nested builder.
    pub fn context_activities_with(
        self,
        f: impl FnOnce(ContextActivitiesBuilder) -> ContextActivitiesBuilder,
    ) -> Self {
        self.context_activities(f(ContextActivities::builder()).build())
    }

    /// Sets the revision text.
    pub fn revision(mut self, revision: impl Into<String>) -> Self {
        self.context.revision = Some(revision.into());
        self
    }

    /// Sets the platform text.
    pub fn platform(mut self, platform: impl Into<String>) -> Self {
        self.context.platform = Some(platform.into());
        self
    }

    /// Sets the language tag.
    pub fn language(mut self, tag: impl Into<String>) -> Self {
        self.context.language = Some(tag.into());
        self
    }

    /// Sets the context statement reference.
    pub fn statement(mut self, reference: StatementReference) -> Self {
        self.context.statement = Some(reference);
        self
    }

    /// Adds an extension entry, accumulating across calls.
    pub fn extension(mut self, iri: impl Into<String>, value: serde_json::Value) -> Self {
        self.context
            .extensions
            .get_or_insert_with(Extensions::new)
            .insert(iri.into(), value);
        self
    }

    /// Finishes the Context.
    pub fn build(self) -> Context {
        self.context
    }
}

/// Activity lists relating a statement to its wider learning context.
///
/// Each list decodes from a bare object or an array (the same normalization
/// Group membership gets) and always encodes as an array.
#[derive(Debug, Clone, Default, PartialEq, Hash, Serialize, Deserialize)]
pub struct ContextActivities {
    /// Activities with a direct relation to the statement's Activity.
    #[serde(default, deserialize_with = "one_or_many", skip_serializing_if = "is_none_or_empty")]
    pub parent: Option<Vec<Activity>>,

    /// Activities with an indirect relation.
    #[serde(default, deserialize_with = "one_or_many", skip_serializing_if = "is_none_or_empty")]
    pub grouping: Option<Vec<Activity>>,

    /// Activities used to categorize the statement.
    #[serde(default, deserialize_with = "one_or_many", skip_serializing_if = "is_none_or_empty")]
    pub category: Option<Vec<Activity>>,

    /// Contextually relevant activities outside the other kinds.
    #[serde(default, deserialize_with = "one_or_many", skip_serializing_if = "is_none_or_empty")]
    pub other: Option<Vec<Activity>>,
}

impl ContextActivities {
    /// Starts building context activities.
    pub fn builder() -> ContextActivitiesBuilder {
        ContextActivitiesBuilder {
            activities: ContextActivities::default(),
        }
    }
}

/// Builder for [`ContextActivities`]; each `add` appends in call order.
#[derive(Debug)]
pub struct ContextActivitiesBuilder {
    activities: ContextActivities,
}

impl ContextActivitiesBuilder {
    /// Appends a parent Activity.
    pub fn parent(mut self, activity: Activity) -> Self {
        self.activities.parent.get_or_insert_with(Vec::new).push(activity);
        self
    }

    /// Appends a grouping Activity.
    pub fn grouping(mut self, activity: Activity) -> Self {
        self.activities.grouping.get_or_insert_with(Vec::new).push(activity);
        self
    }

    /// Appends a category Activity.
    pub fn category(mut self, activity: Activity) -> Self {
        self.activities.category.get_or_insert_with(Vec::new).push(activity);
        self
    }

    /// Appends an other Activity.
    pub fn other(mut self, activity: Activity) -> Self {
        self.activities.other.get_or_insert_with(Vec::new).push(activity);
        self
    }

    /// Finishes the context activities.
    pub fn build(self) -> ContextActivities {
        self.activities
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_context_serializes_as_empty_object() {
        assert_eq!(serde_json::to_value(Context::default()).unwrap(), json!({}));
    }

    #[test]
    fn context_round_trips_with_wire_names() {
        let registration = Uuid::new_v4();
        let context = Context::builder()
            .registration(registration)
            .agent_instructor(|a| a.name("Irini Instructor").mbox("mailto:irini@example.com"))
            .team_with(|g| g.name("Team A").mbox("mailto:teama@example.com"))
            .context_activities_with(|c| c.parent(Activity::new("http://example.com/course")))
            .platform("Example LMS")
            .language("en-GB")
            .build();

        let json = serde_json::to_value(&context).unwrap();
        assert_eq!(json["registration"], json!(registration.to_string()));
        assert!(json.get("contextActivities").is_some());
        assert_eq!(json["team"]["objectType"], "Group");
        assert!(json.get("revision").is_none());

        let decoded: Context = serde_json::from_value(json).unwrap();
        assert_eq!(decoded, context);
    }

    #[test]
    fn context_activity_lists_accept_bare_object() {
        let bare: ContextActivities = serde_json::from_value(json!({
            "parent": {"id": "http://example.com/course"}
        }))
        .unwrap();
        let array: ContextActivities = serde_json::from_value(json!({
            "parent": [{"id": "http://example.com/course"}]
        }))
        .unwrap();

        assert_eq!(bare, array);
        assert!(serde_json::to_value(&bare).unwrap()["parent"].is_array());
    }

    #[test]
    fn extensions_preserve_insertion_order() {
        let context = Context::builder()
            .extension("http://example.com/ext/b", json!(2))
            .extension("http://example.com/ext/a", json!(1))
            .build();

        let json = serde_json::to_string(&context).unwrap();
        let b = json.find("http://example.com/ext/b").unwrap();
        let a = json.find("http://example.com/ext/a").unwrap();
        assert!(b < a);
    }
}
