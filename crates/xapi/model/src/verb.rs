//! The action of a statement.

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::language_map::LanguageMap;

/// The reserved verb IRI that marks a prior statement as retracted.
pub const VOIDED: &str = "http://adlnet.gov/expapi/verbs/voided";

/// The action taken by the Actor of a statement.
///
/// Two Verbs are equal iff their `id`s are equal: the display map carries
/// presentational translations of the same action and is deliberately
/// excluded from equality and hashing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Verb {
    /// Absolute IRI identifying the action. Required on the wire.
    pub id: String,

    /// Human-readable translations of the action.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<LanguageMap>,
}

impl Verb {
    /// Creates a Verb with no display text.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display: None,
        }
    }

    /// Creates a Verb whose display text has no known locale; the text is
    /// stored under the `und` tag.
    pub fn with_display(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display: Some(LanguageMap::of_undetermined(text)),
        }
    }

    /// The reserved voiding verb.
    pub fn voided() -> Self {
        Self::new(VOIDED)
    }

    /// Whether this is the reserved voiding verb. Pure function of `id`.
    pub fn is_voided(&self) -> bool {
        self.id == VOIDED
    }

    /// Starts building a Verb for the given id.
    pub fn builder(id: impl Into<String>) -> VerbBuilder {
        VerbBuilder {
            verb: Verb::new(id),
        }
    }
}

impl PartialEq for Verb {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Verb {}

impl Hash for Verb {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Builder for [`Verb`].
#[derive(Debug)]
pub struct VerbBuilder {
    verb: Verb,
}

impl VerbBuilder {
    /// Adds a display translation, accumulating across calls.
    pub fn display(mut self, tag: impl Into<String>, text: impl Into<String>) -> Self {
        self.verb
            .display
            .get_or_insert_with(LanguageMap::new)
            .set(tag, text);
        self
    }

    /// Finishes the Verb.
    pub fn build(self) -> Verb {
        self.verb
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn hash_of(verb: &Verb) -> u64 {
        use std::collections::hash_map::DefaultHasher;
        let mut hasher = DefaultHasher::new();
        verb.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn equality_ignores_display() {
        let bare = Verb::new("http://adlnet.gov/expapi/verbs/answered");
        let translated = Verb::builder("http://adlnet.gov/expapi/verbs/answered")
            .display("en", "answered")
            .display("de", "beantwortet")
            .build();

        assert_eq!(bare, translated);
        assert_eq!(hash_of(&bare), hash_of(&translated));
    }

    #[test]
    fn different_ids_are_different_verbs() {
        let answered = Verb::new("http://adlnet.gov/expapi/verbs/answered");
        let attempted = Verb::new("http://adlnet.gov/expapi/verbs/attempted");
        assert_ne!(answered, attempted);
    }

    #[test]
    fn voided_predicate_matches_reserved_iri_exactly() {
        assert!(Verb::voided().is_voided());
        assert!(Verb::new("http://adlnet.gov/expapi/verbs/voided").is_voided());
        assert!(!Verb::new("http://adlnet.gov/expapi/verbs/answered").is_voided());
        assert!(!Verb::new("http://adlnet.gov/expapi/verbs/voided/").is_voided());
    }

    #[test]
    fn bare_display_text_lands_under_und() {
        let verb = Verb::with_display("http://adlnet.gov/expapi/verbs/answered", "answered");

        let display = verb.display.as_ref().unwrap();
        assert_eq!(display.len(), 1);
        assert_eq!(display.get(LanguageMap::UNDETERMINED), Some("answered"));
    }

    #[test]
    fn display_accumulates_in_call_order() {
        let verb = Verb::builder("http://adlnet.gov/expapi/verbs/answered")
            .display("en", "answered")
            .display("de", "beantwortet")
            .build();

        let entries: Vec<_> = verb.display.as_ref().unwrap().iter().collect();
        assert_eq!(
            entries,
            vec![("en", "answered"), ("de", "beantwortet")]
        );
    }

    #[test]
    fn serializes_expected_wire_form() {
        let verb = Verb::builder("http://adlnet.gov/expapi/verbs/answered")
            .display("en", "answered")
            .build();

        assert_eq!(
            serde_json::to_value(&verb).unwrap(),
            json!({
                "id": "http://adlnet.gov/expapi/verbs/answered",
                "display": {"en": "answered"}
            })
        );

        let bare = Verb::new("http://adlnet.gov/expapi/verbs/answered");
        assert_eq!(
            serde_json::to_value(&bare).unwrap(),
            json!({"id": "http://adlnet.gov/expapi/verbs/answered"})
        );
    }

    #[test]
    fn decode_requires_id() {
        let result: Result<Verb, _> =
            serde_json::from_value(json!({"display": {"en": "answered"}}));
        assert!(result.is_err());
    }
}
