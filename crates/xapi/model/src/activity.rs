//! Activities: the things an experience happens with.

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::language_map::LanguageMap;
use crate::Extensions;

/// A learning activity, identified by an absolute IRI.
///
/// An Activity is the untagged default of the statement-object polymorphism:
/// its wire form carries no `objectType` discriminant, and a stray
/// `objectType: "Activity"` is accepted and dropped on decode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    /// Absolute IRI identifying the Activity. Required on the wire.
    pub id: String,

    /// Metadata about the Activity.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub definition: Option<ActivityDefinition>,
}

impl Activity {
    /// Creates an Activity with no definition.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            definition: None,
        }
    }

    /// Starts building an Activity for the given id.
    pub fn builder(id: impl Into<String>) -> ActivityBuilder {
        ActivityBuilder {
            activity: Activity::new(id),
        }
    }
}

impl Hash for Activity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
        self.definition.hash(state);
    }
}

/// Builder for [`Activity`].
#[derive(Debug)]
pub struct ActivityBuilder {
    activity: Activity,
}

impl ActivityBuilder {
    /// Sets the definition.
    pub fn definition(mut self, definition: ActivityDefinition) -> Self {
        self.activity.definition = Some(definition);
        self
    }

    /// Sets the definition through a nested builder.
    pub fn definition_with(
        self,
        f: impl FnOnce(ActivityDefinitionBuilder) -> ActivityDefinitionBuilder,
    ) -> Self {
        self.definition(f(ActivityDefinition::builder()).build())
    }

    /// Finishes the Activity.
    pub fn build(self) -> Activity {
        self.activity
    }
}

/// Metadata describing an [`Activity`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivityDefinition {
    /// Display name translations.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<LanguageMap>,

    /// Description translations.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<LanguageMap>,

    /// IRI classifying the kind of Activity.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub activity_type: Option<String>,

    /// IRL of a document with human-readable information about the Activity.
    #[serde(rename = "moreInfo", skip_serializing_if = "Option::is_none")]
    pub more_info: Option<String>,

    /// Domain-specific extension map, keyed by absolute IRI.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Extensions>,
}

impl ActivityDefinition {
    /// Starts building a definition.
    pub fn builder() -> ActivityDefinitionBuilder {
        ActivityDefinitionBuilder {
            definition: ActivityDefinition::default(),
        }
    }
}

// Extension values are opaque JSON and not hashable; hashing covers the keys
// (sorted, since map equality ignores order) which is enough for the
// equal-values-hash-equally contract.
impl Hash for ActivityDefinition {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.description.hash(state);
        self.activity_type.hash(state);
        self.more_info.hash(state);
        hash_extension_keys(&self.extensions, state);
    }
}

pub(crate) fn hash_extension_keys<H: Hasher>(extensions: &Option<Extensions>, state: &mut H) {
    extensions.is_some().hash(state);
    if let Some(extensions) = extensions {
        let mut keys: Vec<_> = extensions.keys().collect();
        keys.sort();
        keys.hash(state);
    }
}

/// Builder for [`ActivityDefinition`].
#[derive(Debug)]
pub struct ActivityDefinitionBuilder {
    definition: ActivityDefinition,
}

impl ActivityDefinitionBuilder {
    /// Adds a name translation, accumulating across calls.
    pub fn name(mut self, tag: impl Into<String>, text: impl Into<String>) -> Self {
        self.definition
            .name
            .get_or_insert_with(LanguageMap::new)
            .set(tag, text);
        self
    }

    /// Adds a description translation, accumulating across calls.
    pub fn description(mut self, tag: impl Into<String>, text: impl Into<String>) -> Self {
        self.definition
            .description
            .get_or_insert_with(LanguageMap::new)
            .set(tag, text);
        self
    }

    /// Sets the Activity type IRI.
    pub fn activity_type(mut self, iri: impl Into<String>) -> Self {
        self.definition.activity_type = Some(iri.into());
        self
    }

    /// Sets the more-info IRL.
    pub fn more_info(mut self, irl: impl Into<String>) -> Self {
        self.definition.more_info = Some(irl.into());
        self
    }

    /// Adds an extension entry, accumulating across calls.
    pub fn extension(mut self, iri: impl Into<String>, value: serde_json::Value) -> Self {
        self.definition
            .extensions
            .get_or_insert_with(Extensions::new)
            .insert(iri.into(), value);
        self
    }

    /// Finishes the definition.
    pub fn build(self) -> ActivityDefinition {
        self.definition
    }
}
