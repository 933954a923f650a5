pub mod keyed_lock;
pub mod random;
pub mod text;

pub use keyed_lock::KeyedLocks;
pub use random::{choose, RandomSource, ScriptedRandom, StdRandom};
pub use text::{fold_for_matching, mirror_sentence, normalize_phrase, strip_punctuation, truncate_chars};
