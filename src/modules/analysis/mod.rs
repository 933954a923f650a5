pub mod lexicon;
pub mod oracle;
pub mod similarity;

pub use lexicon::LexiconAnalyzer;
pub use oracle::{Analysis, CollaboratorError, TextAnalyzer};
pub use similarity::{cosine_similarity, dice_coefficient};

#[cfg(test)]
pub use oracle::MockTextAnalyzer;
