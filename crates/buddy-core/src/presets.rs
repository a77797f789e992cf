use crate::ToneProfileFields;

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

/// The four built-in tones seeded into an empty catalog.
pub fn default_tone_profiles() -> Vec<ToneProfileFields> {
    vec![
        ToneProfileFields {
            name: "Friendly".to_string(),
            description: "Warm, approachable, and conversational".to_string(),
            keywords: strings(&["thanks", "appreciate", "happy to", "glad", "hope"]),
            sample_phrases: strings(&[
                "Thanks so much for reaching out!",
                "I really appreciate you bringing this to my attention.",
                "I'd be happy to help with that.",
                "Hope this helps!",
                "Looking forward to hearing from you!",
            ]),
            personality_instructions: "Write in a warm, friendly tone. Use casual but \
                professional language. Show enthusiasm and gratitude. Keep it conversational \
                and approachable."
                .to_string(),
        },
        ToneProfileFields {
            name: "Direct".to_string(),
            description: "Clear, concise, and to-the-point".to_string(),
            keywords: strings(&["regarding", "please", "will", "confirmed", "noted"]),
            sample_phrases: strings(&[
                "Regarding your request:",
                "Please find the information below.",
                "I will follow up by [date].",
                "Confirmed.",
                "This has been noted.",
            ]),
            personality_instructions: "Be clear and concise. Get straight to the point. Use \
                short sentences. Avoid unnecessary pleasantries. Focus on facts and action items."
                .to_string(),
        },
        ToneProfileFields {
            name: "Strict".to_string(),
            description: "Professional, firm, and authoritative".to_string(),
            keywords: strings(&["must", "required", "policy", "deadline", "important"]),
            sample_phrases: strings(&[
                "Please note that this is required.",
                "As per our policy,",
                "The deadline is non-negotiable.",
                "This is an important matter that requires immediate attention.",
                "I must emphasize the importance of",
            ]),
            personality_instructions: "Maintain a professional and firm tone. Be authoritative \
                but not rude. Set clear boundaries and expectations. Emphasize rules, policies, \
                and deadlines when relevant."
                .to_string(),
        },
        ToneProfileFields {
            name: "Casual".to_string(),
            description: "Relaxed, informal, and easy-going".to_string(),
            keywords: strings(&["hey", "sure", "no problem", "sounds good", "cool"]),
            sample_phrases: strings(&[
                "Hey! Thanks for getting in touch.",
                "Sure thing, no problem!",
                "Sounds good to me.",
                "Cool, I'll take a look at that.",
                "Let me know if you need anything else!",
            ]),
            personality_instructions: "Write in a relaxed, informal tone. Use contractions and \
                casual language. Be friendly and easy-going. Keep it brief and conversational."
                .to_string(),
        },
    ]
}
