use buddy_core::{ToneProfile, Variation};

/// Builds the instruction sent to the model for one variation of a batch.
///
/// For a fixed email and tone the three variations produce prompts that differ
/// only in the variation instruction. Keywords and sample phrases are passed
/// through verbatim and their sections are left out when empty.
pub fn build_prompt(email_text: &str, tone: &ToneProfile, variation: Variation) -> String {
    let instruction = variation.instruction();
    let mut prompt = String::from(
        "You are an email draft assistant. Your job is to help users reply to emails \
         professionally, matching the requested tone.\n\n",
    );

    prompt.push_str(&format!(
        "**Tone Profile: {}**\n{}\n\n**Tone Instructions:**\n{}\n\n",
        tone.name, tone.description, tone.personality_instructions
    ));

    if !tone.keywords.is_empty() {
        prompt.push_str(&format!(
            "**Keywords to consider:** {}\n\n",
            tone.keywords.join(", ")
        ));
    }

    if !tone.sample_phrases.is_empty() {
        prompt.push_str("**Sample phrases (use similar style):**\n");
        for (i, phrase) in tone.sample_phrases.iter().enumerate() {
            prompt.push_str(&format!("{}. {phrase}\n", i + 1));
        }
        prompt.push('\n');
    }

    prompt.push_str(&format!(
        "**Variation Instruction:** {instruction}\n\n\
         **Original Email:**\n{email_text}\n\n\
         **Instructions:**\n\
         1. Read the original email carefully\n\
         2. Write a reply that matches the \"{name}\" tone\n\
         3. Address the main points from the original email\n\
         4. {instruction}\n\
         5. Keep it professional and appropriate\n\
         6. Do NOT include a subject line\n\
         7. Start directly with the email body\n\n\
         **Reply:**",
        name = tone.name,
    ));

    prompt
}
