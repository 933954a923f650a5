const SMART_QUOTES: [char; 4] = ['\u{2018}', '\u{2019}', '\u{201C}', '\u{201D}'];
const TRAILING_PUNCTUATION: [char; 5] = ['.', ',', '!', '?', ';'];

pub const MIRROR_MAX_CHARS: usize = 60;

/// Trims, drops smart quotes and trailing punctuation, lowercases.
pub fn normalize_phrase(text: &str) -> String {
    let without_quotes: String = text.trim().chars().filter(|c| !SMART_QUOTES.contains(c)).collect();
    without_quotes
        .trim_end_matches(|c: char| TRAILING_PUNCTUATION.contains(&c))
        .trim()
        .to_lowercase()
}

/// Keeps only word characters and whitespace.
pub fn strip_punctuation(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace())
        .collect()
}

/// Lowercases, folds curly apostrophes, drops punctuation other than apostrophes
/// and collapses whitespace.
pub fn fold_for_matching(text: &str) -> String {
    let folded: String = text
        .to_lowercase()
        .chars()
        .map(|c| if c == '\u{2019}' || c == '\u{2018}' { '\'' } else { c })
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || *c == '\'')
        .collect();
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Cuts `text` to `max` characters, appending an ellipsis when cut.
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((byte_index, _)) => format!("{}...", &text[..byte_index]),
        None => text.to_string(),
    }
}

fn shift_pronoun(word: &str) -> Option<&'static str> {
    match word {
        "i" => Some("you"),
        "i'm" | "i\u{2019}m" => Some("you're"),
        "my" => Some("your"),
        "me" => Some("you"),
        "mine" => Some("yours"),
        "myself" => Some("yourself"),
        "i've" => Some("you've"),
        "i'll" => Some("you'll"),
        "i'd" => Some("you'd"),
        _ => None,
    }
}

/// Rephrases a user sentence from first to second person and clips it.
/// Sentences shorter than three words are not worth echoing.
pub fn mirror_sentence(text: &str) -> Option<String> {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() < 3 {
        return None;
    }

    let mut mirrored = Vec::with_capacity(words.len());
    let mut index = 0;
    while index < words.len() {
        let word = words[index];
        let core_end = word
            .char_indices()
            .rev()
            .find(|(_, c)| c.is_alphanumeric() || *c == '\'' || *c == '\u{2019}')
            .map(|(i, c)| i + c.len_utf8())
            .unwrap_or(0);
        let (core, suffix) = word.split_at(core_end);
        let lower = core.to_lowercase();

        let next_is_am = words
            .get(index + 1)
            .map(|next| next.trim_end_matches(|c: char| !c.is_alphanumeric()).eq_ignore_ascii_case("am"))
            .unwrap_or(false);

        if lower == "i" && next_is_am {
            let am_word = words[index + 1];
            let am_suffix = am_word.trim_start_matches(|c: char| c.is_alphanumeric());
            mirrored.push(format!("you are{}", am_suffix));
            index += 2;
            continue;
        }

        match shift_pronoun(&lower) {
            Some(shifted) => mirrored.push(format!("{}{}", shifted, suffix)),
            None => mirrored.push(word.to_string()),
        }
        index += 1;
    }

    Some(truncate_chars(mirrored.join(" ").trim(), MIRROR_MAX_CHARS))
}

#[cfg(test)]
mod tests {
    use super::{fold_for_matching, mirror_sentence, normalize_phrase, strip_punctuation, truncate_chars};

    #[test]
    fn test_normalize_phrase() {
        assert_eq!(normalize_phrase("  Ping!! "), "ping");
        assert_eq!(normalize_phrase("\u{201C}Good Morning\u{201D}."), "good morning");
        assert_eq!(normalize_phrase("what's up?"), "what's up");
    }

    #[test]
    fn test_strip_punctuation() {
        assert_eq!(strip_punctuation("my dog, Max?"), "my dog Max");
    }

    #[test]
    fn test_fold_for_matching() {
        assert_eq!(fold_for_matching("  What\u{2019}s   UP?! "), "what's up");
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("short", 60), "short");
        assert_eq!(truncate_chars("abcdef", 3), "abc...");
    }

    #[test]
    fn test_mirror_sentence_shifts_pronouns() {
        assert_eq!(
            mirror_sentence("I am tired of my homework").as_deref(),
            Some("you are tired of your homework")
        );
        assert_eq!(
            mirror_sentence("I'm going to call me later.").as_deref(),
            Some("you're going to call you later.")
        );
        assert_eq!(mirror_sentence("hello there"), None);
    }

    #[test]
    fn test_mirror_sentence_truncates() {
        let long = "I really want to talk about the amazing trip my family took last summer to the mountains";
        let mirrored = mirror_sentence(long).unwrap();
        assert!(mirrored.ends_with("..."));
        assert_eq!(mirrored.chars().count(), 63);
        assert!(mirrored.starts_with("you really want"));
    }
}
