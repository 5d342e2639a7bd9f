//! Stop-word sets for the lexical/thematic analysis.
//!
//! One source of truth: English + Spanish structural words, generic
//! film/viewing vocabulary and social-comment noise. Sentiment-bearing
//! words (love, hate, great, bad...) are deliberately NOT listed here; the
//! thematic engine must keep them so "why positive / why negative" term
//! lists retain their signal. The sentiment engine never uses these sets.

use std::collections::HashSet;
use std::sync::OnceLock;

// English structural: articles, pronouns, prepositions, auxiliaries, fillers.
const EN_STRUCTURAL: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "if", "of", "in", "to", "for", "with",
    "on", "at", "by", "from", "as", "is", "are", "was", "were", "be", "been", "being",
    "have", "has", "had", "do", "does", "did", "will", "would", "could", "should",
    "this", "that", "these", "those", "it", "its", "i", "you", "he", "she", "we", "they",
    "me", "him", "her", "us", "them", "my", "your", "his", "our", "their",
    "what", "which", "who", "whom", "when", "where", "why", "how",
    "all", "each", "every", "both", "few", "more", "most", "some", "any",
    "other", "another", "same", "such", "only", "own", "just", "also",
    "not", "no", "yes", "so", "than", "too", "very", "into", "onto", "over",
    "about", "after", "before", "during", "through", "between", "under",
    "here", "there", "then", "now", "well", "back", "out", "up", "down",
    "get", "gets", "got", "getting", "make", "makes", "made", "making",
    "say", "says", "said", "saying", "tell", "tells", "told", "think", "thinks",
    "thought", "know", "knows", "knew", "known", "want", "wants", "wanted",
    "going", "way", "one", "ones", "thing", "things", "something", "anything",
    "everything", "nothing", "really", "even", "still", "already", "perhaps",
    "maybe", "actually", "basically", "literally", "though", "although",
    "however", "while", "because", "since", "mean", "means", "meant",
    "ask", "asked", "asking", "can", "probably",
];

// Spanish structural: articles, pronouns, prepositions, auxiliaries.
const ES_STRUCTURAL: &[&str] = &[
    "el", "la", "los", "las", "un", "una", "unos", "unas", "y", "o", "pero", "si",
    "que", "de", "en", "es", "se", "te", "le", "lo", "al", "del", "por", "con",
    "para", "su", "sus", "como", "mas", "más", "muy", "ya", "sin", "hay", "qué",
    "cuando", "donde", "quien", "cual", "cuales", "todo", "toda", "todos", "todas",
    "esta", "este", "estas", "estos", "esa", "ese", "esas", "esos", "otra", "otro",
    "otros", "otras", "nos", "mi", "tu", "ti", "aqui", "asi", "solo", "tambien",
    "entre", "desde", "hasta", "durante", "contra", "sobre", "tras", "ser", "era",
    "fue", "son", "han", "tiene", "tienen", "tengo", "tienes", "puede", "pueden",
    "creo", "porque", "aunque", "pues", "entonces", "ver", "vi", "visto", "veo",
    "mirar", "mirando", "película", "películas", "quién", "cómo", "cuándo",
    "dónde", "cuál",
];

// Film/viewing context: generic words that describe the medium, not the opinion.
const FILM_GENERIC: &[&str] = &[
    "movie", "movies", "film", "films", "cinema", "theater", "theatre",
    "watch", "watched", "watching", "watches", "see", "sees", "saw", "seen",
    "view", "views", "viewed", "viewing", "look", "looks", "looked", "looking",
    "video", "videos", "clip", "clips", "trailer", "trailers",
];

// Typical comment-section noise (Reddit, YouTube, Instagram).
const SOCIAL_NOISE: &[&str] = &[
    "https", "http", "www", "com", "org", "net", "html",
    "lol", "lols", "lmao", "haha", "hahaha", "xd", "omg", "wtf", "idk", "imo",
    "tbh", "btw", "etc", "hey", "oh", "uh", "um", "yeah", "nah", "ok", "okay",
    "right", "left", "first", "last", "new", "old", "long", "big", "small",
    "real", "like",
];

/// Combined multilingual stop set used by the thematic tokenizer only.
pub fn social_stop_words() -> &'static HashSet<&'static str> {
    static SET: OnceLock<HashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| {
        EN_STRUCTURAL
            .iter()
            .chain(ES_STRUCTURAL)
            .chain(FILM_GENERIC)
            .chain(SOCIAL_NOISE)
            .copied()
            .collect()
    })
}

/// Laughter/interjection tokens: a short comment made only of these carries
/// no analyzable opinion and is rejected by the validity filter.
pub const NOISE_WORDS: &[&str] = &[
    "lol", "lols", "lmao", "haha", "hahaha", "xd", "omg", "wtf", "idk", "imo", "tbh",
];

pub fn is_noise_word(word: &str) -> bool {
    NOISE_WORDS.contains(&word)
}

/// Bigrams that name the subject rather than an opinion about it (cast,
/// composer, sibling films). Excluded from per-label "why" bigram lists,
/// retained everywhere else.
pub const REFERENCE_BIGRAMS: &[(&str, &str)] = &[
    ("brad", "pitt"),
    ("hans", "zimmer"),
    ("top", "gun"),
    ("gun", "maverick"),
    ("lewis", "hamilton"),
    ("formula", "one"),
];

pub fn is_reference_bigram(a: &str, b: &str) -> bool {
    REFERENCE_BIGRAMS.iter().any(|&(x, y)| x == a && y == b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stop_set_has_both_languages() {
        let set = social_stop_words();
        assert!(set.contains("the"));
        assert!(set.contains("película"));
        assert!(set.contains("movie"));
        assert!(set.contains("lmao"));
    }

    #[test]
    fn stop_set_keeps_sentiment_words() {
        let set = social_stop_words();
        for w in ["love", "hate", "great", "bad", "amazing", "terrible"] {
            assert!(!set.contains(w), "{w} must stay available to theme lists");
        }
    }

    #[test]
    fn reference_bigrams_match() {
        assert!(is_reference_bigram("brad", "pitt"));
        assert!(!is_reference_bigram("pitt", "brad"));
    }
}
