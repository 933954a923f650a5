use crate::modules::analysis::oracle::{Analysis, CollaboratorError, TextAnalyzer};
use async_trait::async_trait;
use std::collections::HashMap;

pub const EMBEDDING_DIMENSIONS: usize = 256;

const EMOTION_LEXICON: [(&str, &[&str]); 6] = [
    ("happy", &["happy", "glad", "joy", "excited", "love", "smile", "yay", "fun", "grateful", "awesome"]),
    ("sad", &["sad", "cry", "unhappy", "hurt", "lonely", "down", "depressed", "miss"]),
    ("angry", &["angry", "mad", "furious", "rage", "annoyed", "pissed", "hate"]),
    ("anxious", &["anxious", "worried", "nervous", "scared", "afraid", "tense", "stress"]),
    ("bored", &["bored", "tired", "lazy", "meh"]),
    ("flirty", &["flirt", "cute", "crush", "love you", "handsome", "beautiful", "sweetheart"]),
];

const INTENT_PATTERNS: [(&str, &[&str]); 7] = [
    ("remember", &["remember", "note that", "store this", "keep in mind"]),
    ("ask_help", &["help", "advice", "how do i", "what should i", "can you"]),
    ("share_feeling", &["i feel", "i'm feeling", "i am feeling", "feels like"]),
    ("gratitude", &["thanks", "thank you", "appreciate", "grateful", "means a lot"]),
    ("creator_ack", &["i created you", "you are my creation", "i made you", "i built you"]),
    ("identify_self", &["who are you", "your name", "what is your name", "who am i", "what are you"]),
    ("affection", &["i love you", "miss you", "you mean", "i care about you"]),
];

const TOPIC_KEYWORDS: [&str; 16] = [
    "minecraft", "react", "youtube", "exam", "game", "studio", "money", "finance", "thulli", "cosmo",
    "endurance", "ai", "love", "life", "dream", "friday",
];

const QUESTION_STARTERS: [&str; 25] = [
    "what", "who", "why", "how", "when", "where", "do", "does", "did", "have", "has", "had", "is", "are",
    "was", "were", "can", "could", "will", "would", "should", "shall", "may", "might", "am",
];

const HIT_WEIGHT: f64 = 0.2;

/// Keyword-lexicon analyzer with a hashed bag-of-words embedding.
#[derive(Debug, Default, Clone)]
pub struct LexiconAnalyzer;

impl LexiconAnalyzer {
    pub fn new() -> Self {
        LexiconAnalyzer
    }

    fn tokens(lower: &str) -> Vec<String> {
        lower
            .split(|c: char| !(c.is_alphanumeric() || c == '\''))
            .filter(|token| !token.is_empty())
            .map(str::to_string)
            .collect()
    }

    fn score_emotions(lower: &str) -> (Vec<String>, HashMap<String, f64>) {
        let mut emotions = Vec::new();
        let mut scores = HashMap::new();

        for (emotion, words) in EMOTION_LEXICON {
            let hits = words.iter().filter(|word| lower.contains(*word)).count();
            if hits > 0 {
                emotions.push(emotion.to_string());
                scores.insert(emotion.to_string(), (hits as f64 * HIT_WEIGHT).min(1.0));
            }
        }

        (emotions, scores)
    }

    fn detect_intents(lower: &str) -> Vec<String> {
        INTENT_PATTERNS
            .iter()
            .filter(|(_, patterns)| patterns.iter().any(|pattern| starts_with_word(lower, pattern)))
            .map(|(intent, _)| intent.to_string())
            .collect()
    }

    /// Capitalized words past the first one, e.g. names and places.
    fn detect_entities(text: &str) -> Vec<String> {
        let mut entities = Vec::new();
        for word in text.split_whitespace().skip(1) {
            if word.starts_with("I'") || word.starts_with("I\u{2019}") {
                continue;
            }
            let cleaned: String = word.chars().filter(|c| c.is_alphanumeric()).collect();
            let is_capitalized = cleaned.chars().next().map(char::is_uppercase).unwrap_or(false);
            if is_capitalized && cleaned.chars().count() > 1 {
                let entity = cleaned.to_lowercase();
                if !entities.contains(&entity) {
                    entities.push(entity);
                }
            }
        }
        entities
    }

    fn is_question(text: &str, tokens: &[String], entities: &[String]) -> bool {
        let trimmed = text.trim_end();
        if trimmed.ends_with('?') || trimmed.contains("? ") {
            return true;
        }
        if tokens
            .first()
            .and_then(|first| first.split('\'').next())
            .map(|first| QUESTION_STARTERS.contains(&first))
            .unwrap_or(false)
        {
            return true;
        }
        tokens.len() == 1 && entities.is_empty()
    }

    fn sentiment(emotions: &[String], scores: &HashMap<String, f64>) -> f64 {
        let score = |emotion: &str| scores.get(emotion).copied().unwrap_or(0.0);
        let positive = match score("happy") {
            happy if happy > 0.0 => happy,
            _ if emotions.iter().any(|e| e == "flirty") => 0.7,
            _ => 0.0,
        };

        let raw = positive - score("sad") * 0.6 - score("angry") * 0.7 - score("anxious") * 0.4;
        (raw * 100.0).round() / 100.0
    }

    fn tone(emotions: &[String], sentiment: f64) -> &'static str {
        if emotions.iter().any(|e| e == "flirty") {
            "intimate"
        } else if sentiment > 0.5 {
            "friendly"
        } else if sentiment < -0.5 {
            "serious"
        } else {
            "neutral"
        }
    }

    pub fn analyze_text(&self, text: &str) -> Analysis {
        let lower = text.trim().to_lowercase();
        let tokens = Self::tokens(&lower);
        let entities = Self::detect_entities(text);

        let mut topics: Vec<String> = Vec::new();
        for candidate in tokens
            .iter()
            .filter(|token| TOPIC_KEYWORDS.contains(&token.as_str()))
            .chain(entities.iter())
        {
            if !topics.contains(candidate) {
                topics.push(candidate.clone());
            }
        }

        let (emotions, emotion_scores) = Self::score_emotions(&lower);
        let mut intents = Self::detect_intents(&lower);
        let is_question = Self::is_question(text, &tokens, &entities);
        if is_question {
            intents.push("question".to_string());
        }

        let sentiment = Self::sentiment(&emotions, &emotion_scores);
        let tone = Self::tone(&emotions, sentiment).to_string();

        Analysis {
            text: text.to_string(),
            emotions,
            emotion_scores,
            intents,
            topics,
            entities,
            sentiment,
            tone,
            is_question,
        }
    }

    pub fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; EMBEDDING_DIMENSIONS];
        for token in Self::tokens(&text.to_lowercase()) {
            let bucket = (fnv1a(&token) % EMBEDDING_DIMENSIONS as u64) as usize;
            vector[bucket] += 1.0;
        }

        let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            vector.iter_mut().for_each(|x| *x /= norm);
        }
        vector
    }
}

fn starts_with_word(lower: &str, pattern: &str) -> bool {
    lower.starts_with(pattern)
        && lower[pattern.len()..]
            .chars()
            .next()
            .map(|c| !(c.is_alphanumeric() || c == '_'))
            .unwrap_or(true)
}

fn fnv1a(token: &str) -> u64 {
    let mut hash: u64 = 0xcbf29ce484222325;
    for byte in token.bytes() {
        hash ^= byte as u64;
        hash = hash.wrapping_mul(0x100000001b3);
    }
    hash
}

#[async_trait]
impl TextAnalyzer for LexiconAnalyzer {
    async fn analyze(&self, text: &str) -> Result<Analysis, CollaboratorError> {
        Ok(self.analyze_text(text))
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, CollaboratorError> {
        Ok(self.embed_text(text))
    }
}

#[cfg(test)]
mod tests {
    use super::{LexiconAnalyzer, EMBEDDING_DIMENSIONS};
    use crate::modules::analysis::oracle::TextAnalyzer;

    #[test]
    fn test_emotions_follow_lexicon_order() {
        let analysis = LexiconAnalyzer::new().analyze_text("I'm so sad and worried, but glad you're here");
        assert_eq!(analysis.emotions, vec!["happy", "sad", "anxious"]);
        assert_eq!(analysis.emotion_score("sad"), Some(0.2));
        assert_eq!(analysis.top_emotion(), Some("happy"));
    }

    #[test]
    fn test_intents_match_at_start_only() {
        let analyzer = LexiconAnalyzer::new();
        assert!(analyzer.analyze_text("thanks for the help").has_intent("gratitude"));
        assert!(!analyzer.analyze_text("thanks for the help").has_intent("ask_help"));
        assert!(analyzer.analyze_text("I made you, remember?").has_intent("creator_ack"));
        assert!(!analyzer.analyze_text("helpful people exist").has_intent("ask_help"));
    }

    #[test]
    fn test_question_detection() {
        let analyzer = LexiconAnalyzer::new();
        assert!(analyzer.analyze_text("is it raining").is_question);
        assert!(analyzer.analyze_text("you like pizza?").has_intent("question"));
        assert!(analyzer.analyze_text("why").is_question);
        assert!(!analyzer.analyze_text("I like pizza").is_question);
    }

    #[test]
    fn test_topics_and_entities() {
        let analysis = LexiconAnalyzer::new().analyze_text("I played minecraft with Max in Paris");
        assert_eq!(analysis.topics, vec!["minecraft", "max", "paris"]);
        assert_eq!(analysis.entities, vec!["max", "paris"]);
    }

    #[test]
    fn test_sentiment_and_tone() {
        let analyzer = LexiconAnalyzer::new();

        let angry = analyzer.analyze_text("I hate this, I'm furious and mad");
        assert_eq!(angry.sentiment, -0.42);
        assert_eq!(angry.tone, "neutral");

        let flirty = analyzer.analyze_text("you are cute");
        assert_eq!(flirty.sentiment, 0.7);
        assert_eq!(flirty.tone, "intimate");

        let plain = analyzer.analyze_text("the bus is late");
        assert_eq!(plain.sentiment, 0.0);
        assert!(plain.emotions.is_empty());
    }

    #[tokio::test]
    async fn test_embedding_similarity() {
        let analyzer = LexiconAnalyzer::new();
        let a = analyzer.embed("my dog is named Max").await.unwrap();
        let b = analyzer.embed("My dog is named Max!").await.unwrap();
        let c = analyzer.embed("quantum chromodynamics").await.unwrap();

        assert_eq!(a.len(), EMBEDDING_DIMENSIONS);
        assert!(analyzer.cosine_similarity(&a, &b) > 0.99);
        assert!(analyzer.cosine_similarity(&a, &c) < 0.5);
    }
}
