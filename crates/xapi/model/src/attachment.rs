//! Attachment headers carried by a statement.

use serde::{Deserialize, Serialize};

use crate::language_map::LanguageMap;

/// Header describing an attachment to a statement.
///
/// Attachments are transport metadata: they never participate in statement
/// equality or hashing. Required fields (`usageType`, `display`,
/// `contentType`, `length`, `sha2`) are enforced by validation, not by
/// construction or decode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    /// IRI describing how the attachment is used.
    #[serde(rename = "usageType", skip_serializing_if = "Option::is_none")]
    pub usage_type: Option<String>,

    /// Display name translations.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<LanguageMap>,

    /// Description translations.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<LanguageMap>,

    /// Internet media type of the attachment content.
    #[serde(rename = "contentType", skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,

    /// Length of the attachment content in octets.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<u64>,

    /// SHA-2 hex digest of the attachment content.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha2: Option<String>,

    /// IRL where the content may be retrieved.
    #[serde(rename = "fileUrl", skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
}

impl Attachment {
    /// Starts building an Attachment.
    pub fn builder() -> AttachmentBuilder {
        AttachmentBuilder {
            attachment: Attachment::default(),
        }
    }
}

/// Builder for [`Attachment`].
#[derive(Debug)]
pub struct AttachmentBuilder {
    attachment: Attachment,
}

impl AttachmentBuilder {
    /// Sets the usage type IRI.
    pub fn usage_type(mut self, iri: impl Into<String>) -> Self {
        self.attachment.usage_type = Some(iri.into());
        self
    }

    /// Adds a display translation, accumulating across calls.
    pub fn display(mut self, tag: impl Into<String>, text: impl Into<String>) -> Self {
        self.attachment
            .display
            .get_or_insert_with(LanguageMap::new)
            .set(tag, text);
        self
    }

    /// Adds a description translation, accumulating across calls.
    pub fn description(mut self, tag: impl Into<String>, text: impl Into<String>) -> Self {
        self.attachment
            .description
            .get_or_insert_with(LanguageMap::new)
            .set(tag, text);
        self
    }

    /// Sets the content media type.
    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.attachment.content_type = Some(content_type.into());
        self
    }

    /// Sets the content length in octets.
    pub fn length(mut self, length: u64) -> Self {
        self.attachment.length = Some(length);
        self
    }

    /// Sets the SHA-2 digest.
    pub fn sha2(mut self, sha2: impl Into<String>) -> Self {
        self.attachment.sha2 = Some(sha2.into());
        self
    }

    /// Sets the retrieval IRL.
    pub fn file_url(mut self, irl: impl Into<String>) -> Self {
        self.attachment.file_url = Some(irl.into());
        self
    }

    /// Finishes the Attachment.
    pub fn build(self) -> Attachment {
        self.attachment
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn round_trips_wire_field_names() {
        let attachment = Attachment::builder()
            .usage_type("http://adlnet.gov/expapi/attachments/signature")
            .display("en", "Signature")
            .content_type("application/octet-stream")
            .length(4235)
            .sha2("672fa5fa658017f1b72d65036f13379c6ab05d4ab3b6664908d8acf0b6a0c634")
            .build();

        let json = serde_json::to_value(&attachment).unwrap();
        assert_eq!(
            json["usageType"],
            "http://adlnet.gov/expapi/attachments/signature"
        );
        assert_eq!(json["contentType"], "application/octet-stream");
        assert!(json.get("fileUrl").is_none());

        let decoded: Attachment = serde_json::from_value(json).unwrap();
        assert_eq!(decoded, attachment);
    }
}
