use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// The editable part of a tone profile. Identity and timestamps are owned by
/// the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToneProfileFields {
    pub name: String,
    pub description: String,
    pub keywords: Vec<String>,
    pub sample_phrases: Vec<String>,
    pub personality_instructions: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToneProfile {
    pub id: String,
    pub name: String,
    pub description: String,
    pub keywords: Vec<String>,
    pub sample_phrases: Vec<String>,
    pub personality_instructions: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ToneProfile {
    pub fn from_fields(fields: ToneProfileFields, now: DateTime<Utc>) -> Self {
        Self {
            id: new_profile_id(),
            name: fields.name,
            description: fields.description,
            keywords: fields.keywords,
            sample_phrases: fields.sample_phrases,
            personality_instructions: fields.personality_instructions,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replaces every mutable field and bumps `updated_at`.
    pub fn apply(&mut self, fields: ToneProfileFields, now: DateTime<Utc>) {
        self.name = fields.name;
        self.description = fields.description;
        self.keywords = fields.keywords;
        self.sample_phrases = fields.sample_phrases;
        self.personality_instructions = fields.personality_instructions;
        self.updated_at = now;
    }

    pub fn fields(&self) -> ToneProfileFields {
        ToneProfileFields {
            name: self.name.clone(),
            description: self.description.clone(),
            keywords: self.keywords.clone(),
            sample_phrases: self.sample_phrases.clone(),
            personality_instructions: self.personality_instructions.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DraftStatus {
    Pending,
    Approved,
    Discarded,
}

impl DraftStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Discarded => "discarded",
        }
    }
}

impl fmt::Display for DraftStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DraftStatus {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "discarded" => Ok(Self::Discarded),
            other => Err(format!("unknown draft status `{other}`")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailDraft {
    pub id: String,
    pub original_email: String,
    /// Not cascaded: the profile may have been deleted since generation.
    pub tone_profile_id: String,
    /// Snapshot of the profile name at generation time.
    pub tone_profile_name: String,
    pub draft_content: String,
    pub status: DraftStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EmailDraft {
    pub fn pending(
        original_email: &str,
        tone: &ToneProfile,
        draft_content: String,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: new_draft_id(),
            original_email: original_email.to_string(),
            tone_profile_id: tone.id.clone(),
            tone_profile_name: tone.name.clone(),
            draft_content,
            status: DraftStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }
}

/// One of the three fixed instruction modifiers applied to a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variation {
    Balanced,
    Detailed,
    Brief,
}

impl Variation {
    /// Generation order of a batch.
    pub const ALL: [Variation; 3] = [Self::Balanced, Self::Detailed, Self::Brief];

    /// 1-based position inside a batch.
    pub fn index(self) -> u8 {
        match self {
            Self::Balanced => 1,
            Self::Detailed => 2,
            Self::Brief => 3,
        }
    }

    pub fn instruction(self) -> &'static str {
        match self {
            Self::Balanced => "Create a balanced response.",
            Self::Detailed => "Make the response slightly more detailed.",
            Self::Brief => "Keep the response brief and to the point.",
        }
    }
}

impl fmt::Display for Variation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "draft {}", self.index())
    }
}

/// Progress of a single generation batch, in the order a caller observes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "stage", content = "variation")]
pub enum GenerationStage {
    Idle,
    LoadingModel,
    Generating(Variation),
    Saving,
    Complete,
}

impl fmt::Display for GenerationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => f.write_str("idle"),
            Self::LoadingModel => f.write_str("checking model endpoint"),
            Self::Generating(variation) => write!(
                f,
                "generating draft {} of {}",
                variation.index(),
                Variation::ALL.len()
            ),
            Self::Saving => f.write_str("saving drafts"),
            Self::Complete => f.write_str("complete"),
        }
    }
}

pub fn new_profile_id() -> String {
    format!("profile-{}", Uuid::new_v4())
}

pub fn new_draft_id() -> String {
    format!("draft-{}", Uuid::new_v4())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn sample_tone() -> ToneProfile {
        ToneProfile::from_fields(
            ToneProfileFields {
                name: "Direct".to_string(),
                description: "Clear".to_string(),
                keywords: vec!["noted".to_string()],
                sample_phrases: vec!["Confirmed.".to_string()],
                personality_instructions: "Be brief.".to_string(),
            },
            Utc::now(),
        )
    }

    #[test]
    fn draft_serializes_with_camel_case_and_lowercase_status() {
        let draft = EmailDraft::pending("Hi", &sample_tone(), "Hello".to_string(), Utc::now());
        let json = serde_json::to_value(&draft).expect("serialize draft");

        assert_eq!(json["status"], "pending");
        assert_eq!(json["originalEmail"], "Hi");
        assert_eq!(json["toneProfileName"], "Direct");
        assert!(json["createdAt"].is_string());
    }

    #[test]
    fn pending_drafts_get_distinct_ids() {
        let tone = sample_tone();
        let now = Utc::now();
        let ids: HashSet<_> = (0..3)
            .map(|_| EmailDraft::pending("Hi", &tone, String::new(), now).id)
            .collect();
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn apply_replaces_fields_and_keeps_identity() {
        let mut tone = sample_tone();
        let id = tone.id.clone();
        let created = tone.created_at;
        let later = created + chrono::Duration::seconds(5);

        tone.apply(
            ToneProfileFields {
                name: "Blunt".to_string(),
                ..ToneProfileFields::default()
            },
            later,
        );

        assert_eq!(tone.id, id);
        assert_eq!(tone.created_at, created);
        assert_eq!(tone.updated_at, later);
        assert_eq!(tone.name, "Blunt");
        assert!(tone.keywords.is_empty());
    }

    #[test]
    fn variations_are_ordered_and_distinct() {
        let indices: Vec<_> = Variation::ALL.iter().map(|v| v.index()).collect();
        assert_eq!(indices, vec![1, 2, 3]);

        let instructions: HashSet<_> = Variation::ALL.iter().map(|v| v.instruction()).collect();
        assert_eq!(instructions.len(), 3);
    }

    #[test]
    fn status_parses_case_insensitively() {
        assert_eq!("Approved".parse::<DraftStatus>(), Ok(DraftStatus::Approved));
        assert!("archived".parse::<DraftStatus>().is_err());
    }
}
