//! Frequency-based keyword extraction and session title suggestion.

const STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "has", "he", "in", "is", "it",
    "its", "of", "on", "that", "the", "to", "was", "will", "with", "i", "you", "we", "they",
    "this", "but", "or", "not", "so", "if", "then", "what", "when", "where",
];

/// Minimum token length considered a keyword candidate.
const MIN_TOKEN_LENGTH: usize = 4;

/// Fallback title when a transcript yields no keywords at all.
const FALLBACK_TITLE: &str = "Untitled Conversation";

/// Stateless keyword ranker over transcript text. Tokens are lowercased
/// ASCII-alphanumeric words; ranking is by descending frequency with ties
/// broken by first appearance, so results are deterministic.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordExtractor;

impl KeywordExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Returns up to `top_n` keywords ranked by frequency.
    pub fn keywords(&self, text: &str, top_n: usize) -> Vec<String> {
        let mut counts: Vec<(String, usize)> = Vec::new();
        for token in tokenize(text) {
            match counts.iter_mut().find(|(word, _)| *word == token) {
                Some((_, count)) => *count += 1,
                None => counts.push((token, 1)),
            }
        }

        counts.sort_by(|a, b| b.1.cmp(&a.1));
        counts.truncate(top_n);
        counts.into_iter().map(|(word, _)| word).collect()
    }

    /// Ranks keywords across several texts at once, e.g. a whole transcript.
    pub fn keywords_from_all(&self, texts: &[String], top_n: usize) -> Vec<String> {
        self.keywords(&texts.join(" "), top_n)
    }

    /// Suggests a short session title from the three strongest keywords.
    pub fn suggest_title(&self, text: &str) -> String {
        let keywords = self.keywords(text, 3);
        if keywords.is_empty() {
            return FALLBACK_TITLE.to_string();
        }

        keywords
            .iter()
            .map(|word| title_case(word))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|token| token.len() >= MIN_TOKEN_LENGTH)
        .map(|token| token.to_ascii_lowercase())
        .filter(|token| !STOP_WORDS.contains(&token.as_str()))
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranks_by_frequency() {
        let extractor = KeywordExtractor::new();
        let keywords = extractor.keywords(
            "budget budget budget review review kickoff",
            2,
        );
        assert_eq!(keywords, vec!["budget".to_string(), "review".to_string()]);
    }

    #[test]
    fn short_tokens_and_stop_words_are_ignored() {
        let extractor = KeywordExtractor::new();
        let keywords = extractor.keywords("the cat sat on that mat with this roadmap", 5);
        assert_eq!(keywords, vec!["roadmap".to_string()]);
    }

    #[test]
    fn punctuation_splits_tokens() {
        let extractor = KeywordExtractor::new();
        let keywords = extractor.keywords("deadline, deadline; budget!", 5);
        assert_eq!(keywords[0], "deadline");
        assert!(keywords.contains(&"budget".to_string()));
    }

    #[test]
    fn title_from_keywords_is_title_cased() {
        let extractor = KeywordExtractor::new();
        let title = extractor.suggest_title("budget budget planning planning planning offsite");
        assert_eq!(title, "Planning Budget Offsite");
    }

    #[test]
    fn empty_text_falls_back_to_untitled() {
        let extractor = KeywordExtractor::new();
        assert_eq!(extractor.suggest_title("of the and to"), "Untitled Conversation");
        assert_eq!(extractor.suggest_title(""), "Untitled Conversation");
    }

    #[test]
    fn keywords_from_all_merges_texts() {
        let extractor = KeywordExtractor::new();
        let texts = vec!["launch launch".to_string(), "launch window".to_string()];
        let keywords = extractor.keywords_from_all(&texts, 2);
        assert_eq!(keywords, vec!["launch".to_string(), "window".to_string()]);
    }
}
