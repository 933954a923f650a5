pub mod classifier;
pub mod corpus;

pub use classifier::{IntentClassifier, IntentScore, PhraseClassifier};
pub use corpus::{find_intent, IntentPhrases, BASIC_INTENTS};

#[cfg(test)]
pub use classifier::MockIntentClassifier;
