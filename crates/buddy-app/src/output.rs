use buddy_core::{EmailDraft, ToneProfile};
use serde::Serialize;
use std::io::{self, Write};

const PREVIEW_CHARS: usize = 72;

/// Renders command results either as JSON or as plain text for a terminal.
#[derive(Debug, Clone, Copy)]
pub struct Output {
    json: bool,
}

impl Output {
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    pub fn tones(&self, profiles: &[ToneProfile]) -> io::Result<()> {
        if self.json {
            return self.json_value(&profiles);
        }
        let mut out = io::stdout().lock();
        for profile in profiles {
            writeln!(out, "{}  {}  {}", profile.id, profile.name, profile.description)?;
        }
        Ok(())
    }

    pub fn tone(&self, profile: &ToneProfile) -> io::Result<()> {
        if self.json {
            return self.json_value(profile);
        }
        let mut out = io::stdout().lock();
        writeln!(out, "id:           {}", profile.id)?;
        writeln!(out, "name:         {}", profile.name)?;
        writeln!(out, "description:  {}", profile.description)?;
        writeln!(out, "keywords:     {}", profile.keywords.join(", "))?;
        writeln!(out, "updated:      {}", profile.updated_at.to_rfc3339())?;
        writeln!(out, "instructions:\n  {}", profile.personality_instructions)?;
        if !profile.sample_phrases.is_empty() {
            writeln!(out, "sample phrases:")?;
            for phrase in &profile.sample_phrases {
                writeln!(out, "  - {phrase}")?;
            }
        }
        Ok(())
    }

    pub fn drafts(&self, drafts: &[EmailDraft]) -> io::Result<()> {
        if self.json {
            return self.json_value(&drafts);
        }
        let mut out = io::stdout().lock();
        for draft in drafts {
            writeln!(
                out,
                "{}  [{}]  {}  {}",
                draft.id,
                draft.status,
                draft.tone_profile_name,
                draft.created_at.format("%Y-%m-%d %H:%M")
            )?;
            writeln!(out, "    {}", preview(&draft.draft_content))?;
        }
        Ok(())
    }

    pub fn draft(&self, draft: &EmailDraft) -> io::Result<()> {
        if self.json {
            return self.json_value(draft);
        }
        let mut out = io::stdout().lock();
        writeln!(out, "id:      {}", draft.id)?;
        writeln!(out, "status:  {}", draft.status)?;
        writeln!(out, "tone:    {} ({})", draft.tone_profile_name, draft.tone_profile_id)?;
        writeln!(out, "created: {}", draft.created_at.to_rfc3339())?;
        writeln!(out, "updated: {}", draft.updated_at.to_rfc3339())?;
        writeln!(out, "\n--- original ---\n{}", draft.original_email)?;
        writeln!(out, "\n--- draft ---\n{}", draft.draft_content)?;
        Ok(())
    }

    pub fn report<T: Serialize>(&self, value: &T, text: &str) -> io::Result<()> {
        if self.json {
            return self.json_value(value);
        }
        writeln!(io::stdout().lock(), "{text}")
    }

    fn json_value<T: Serialize + ?Sized>(&self, value: &T) -> io::Result<()> {
        let rendered = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
        writeln!(io::stdout().lock(), "{rendered}")
    }
}

/// First line of `text`, cut to a fixed width on a char boundary.
pub fn preview(text: &str) -> String {
    let line = text.lines().find(|line| !line.trim().is_empty()).unwrap_or("");
    let mut cut: String = line.trim().chars().take(PREVIEW_CHARS).collect();
    if line.trim().chars().count() > PREVIEW_CHARS || text.trim().lines().count() > 1 {
        cut.push('…');
    }
    cut
}
