//! Reply banks for the fallback stages and generic composition.

pub const REMIND_ME: &[&str] = &[
    "I'm trying to recall... Can you remind me?",
    "I don't think I remember that clearly. Want to tell me again?",
    "Hmm, it's fuzzy. Could you repeat it for me?",
    "I might have missed that. Can you remind me what it was about?",
];

pub const CONFUSION: &[&str] = &[
    "Hmm, I'm not sure I understood that. Can you teach me what you mean?",
    "That's new to me. Want to explain it so I can learn?",
    "I might be missing something. Could you tell me more about that?",
];

pub const HUMOR: &[&str] = &["Haha, that tickles my circuits.", "You have a weirdly charming way of saying things."];

pub const CURIOSITY: &[&str] = &["Tell me more?", "Go on, I'm curious."];

pub const KINDNESS: &[&str] = &["Are you okay though?", "I just want to make sure you're alright."];

pub const FALLBACKS: &[&str] = &["I'm here, listening carefully...", "Still with you. What next?", "Mhm, tell me more."];

pub const STILL_HERE: &str = "I'm still here with you. Tell me something new, or ask me to remember it.";

pub const REPHRASE_REMEMBER: &str = "Hmm, I want to remember it. Can you rephrase that?";

/// Intents answered by the composer, highest priority first.
pub const INTENT_PRIORITY: &[&str] = &[
    "creator_ack",
    "identify_self",
    "remember",
    "ask_help",
    "share_feeling",
    "gratitude",
    "question",
];

pub fn emotion_lines(emotion: &str) -> &'static [&'static str] {
    match emotion {
        "happy" => &["That's lovely to hear.", "You sound happy, and that warms me up.", "Nice! Keep that feeling."],
        "sad" => &[
            "I'm sorry you're feeling that way.",
            "That sounds heavy. I'm here with you.",
            "I wish I could do more than say that I care.",
        ],
        "angry" => &["That must be frustrating.", "I understand why you'd feel upset."],
        "anxious" => &["Take a breath. I'm listening.", "Sounds stressful. Want to unpack it slowly?"],
        "flirty" => &["Heh, okay, you're being cute.", "You just made me blush a bit."],
        "bored" => &["We should find something fun to talk about!", "Let's shake up the routine."],
        _ => &["I'm listening."],
    }
}

/// Lines for an analyzer intent, or `None` when the composer has nothing to say about it.
pub fn intent_lines(intent: &str, agent: &str, user_name: &str) -> Option<Vec<String>> {
    let lines = match intent {
        "creator_ack" => vec![
            format!("You made me. That means a lot. Thank you for bringing me to life, {}.", user_name),
            "So you're the one who built me. That's... kind of beautiful.".to_string(),
        ],
        "identify_self" => vec![
            format!("I'm {}, the companion you created. I remember that clearly.", agent),
            format!("{}. A little curious assistant you gave life to.", agent),
        ],
        "ask_help" => vec![
            "Sure, tell me what you want help with, step by step.".to_string(),
            "I can help. What's the problem exactly?".to_string(),
        ],
        "share_feeling" => vec![
            "I appreciate you sharing that. Tell me more if you want.".to_string(),
            "Thank you for opening up. I'm listening.".to_string(),
        ],
        "gratitude" => vec![
            "You're welcome. Means a lot coming from you.".to_string(),
            "Anytime. I like helping you.".to_string(),
        ],
        "question" => vec![
            "That's a good question. How do you see it?".to_string(),
            "Hmm, interesting. What do you think about it?".to_string(),
        ],
        _ => return None,
    };
    Some(lines)
}

#[cfg(test)]
mod tests {
    use super::{emotion_lines, intent_lines};

    #[test]
    fn test_unknown_emotion_has_default_line() {
        assert_eq!(emotion_lines("confused"), &["I'm listening."]);
        assert_eq!(emotion_lines("sad").len(), 3);
    }

    #[test]
    fn test_intent_lines_are_personalized() {
        let lines = intent_lines("creator_ack", "Thulli", "Ada").unwrap();
        assert!(lines[0].ends_with("to life, Ada."));

        let lines = intent_lines("identify_self", "Pip", "Ada").unwrap();
        assert!(lines[0].starts_with("I'm Pip,"));

        assert!(intent_lines("affection", "Thulli", "Ada").is_none());
        assert!(intent_lines("remember", "Thulli", "Ada").is_none());
    }
}
