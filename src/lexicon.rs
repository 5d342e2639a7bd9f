//! Valence lexicon for the sentiment engine.
//!
//! The base table is embedded in the binary so scoring works out of the box;
//! an alternate lexicon file (`word<TAB>valence` per line, `#` comments) can
//! replace it at runtime. The film-hype overlay is merged over whichever base
//! is active when the analyzer is constructed: generic lexicons read hype
//! vocabulary ("insane", "fire") as neutral or negative, which misclassifies
//! entertainment commentary.

use anyhow::{bail, Context, Result};
use std::collections::HashMap;
use std::path::Path;

/// Hype vocabulary overlay. 2.x ~ strongly positive, 1.x ~ mildly positive.
pub const HYPE_LEXICON: &[(&str, f64)] = &[
    ("insane", 2.2),
    ("crazy", 1.8),
    ("wild", 1.5),
    ("fire", 2.0),
    ("hype", 1.8),
    ("hypebeast", 1.0),
    ("goosebumps", 2.0),
    ("chills", 1.5),
    ("seated", 2.0),
    ("phenomenal", 2.5),
    ("incredible", 2.3),
    ("unreal", 2.0),
    ("mental", 1.5),
];

/// Words that flip the polarity of a following lexicon hit.
pub const NEGATIONS: &[&str] = &[
    "aint", "arent", "cannot", "cant", "couldnt", "darent", "didnt", "doesnt",
    "ain't", "aren't", "can't", "couldn't", "daren't", "didn't", "doesn't",
    "dont", "hadnt", "hasnt", "havent", "isnt", "mightnt", "mustnt", "neither",
    "don't", "hadn't", "hasn't", "haven't", "isn't", "mightn't", "mustn't",
    "neednt", "needn't", "never", "none", "nope", "nor", "not", "nothing",
    "nowhere", "oughtnt", "shant", "shouldnt", "uhuh", "wasnt", "werent",
    "oughtn't", "shan't", "shouldn't", "uh-uh", "wasn't", "weren't",
    "without", "wont", "wouldnt", "won't", "wouldn't", "rarely", "seldom",
    "despite",
];

/// Degree modifiers: positive values intensify, negative values dampen.
pub const BOOSTERS: &[(&str, f64)] = &[
    ("absolutely", 0.293),
    ("amazingly", 0.293),
    ("awfully", 0.293),
    ("completely", 0.293),
    ("considerably", 0.293),
    ("decidedly", 0.293),
    ("deeply", 0.293),
    ("enormously", 0.293),
    ("entirely", 0.293),
    ("especially", 0.293),
    ("exceptionally", 0.293),
    ("extremely", 0.293),
    ("fabulously", 0.293),
    ("fully", 0.293),
    ("greatly", 0.293),
    ("highly", 0.293),
    ("hugely", 0.293),
    ("incredibly", 0.293),
    ("intensely", 0.293),
    ("majorly", 0.293),
    ("more", 0.293),
    ("most", 0.293),
    ("particularly", 0.293),
    ("purely", 0.293),
    ("quite", 0.293),
    ("really", 0.293),
    ("remarkably", 0.293),
    ("so", 0.293),
    ("substantially", 0.293),
    ("thoroughly", 0.293),
    ("totally", 0.293),
    ("tremendously", 0.293),
    ("unbelievably", 0.293),
    ("unusually", 0.293),
    ("utterly", 0.293),
    ("very", 0.293),
    ("almost", -0.293),
    ("barely", -0.293),
    ("hardly", -0.293),
    ("kinda", -0.293),
    ("kindof", -0.293),
    ("less", -0.293),
    ("little", -0.293),
    ("marginally", -0.293),
    ("occasionally", -0.293),
    ("partly", -0.293),
    ("scarcely", -0.293),
    ("slightly", -0.293),
    ("somewhat", -0.293),
    ("sorta", -0.293),
    ("sortof", -0.293),
];

// Embedded base lexicon: the slice of a general-purpose valence dictionary
// that actually occurs in film/social commentary. Format mirrors the overlay.
const BASE_LEXICON: &[(&str, f64)] = &[
    // strong positive
    ("amazing", 2.8),
    ("awesome", 3.1),
    ("best", 3.2),
    ("breathtaking", 3.2),
    ("brilliant", 2.8),
    ("epic", 2.4),
    ("excellent", 2.7),
    ("exceptional", 2.7),
    ("extraordinary", 2.6),
    ("fantastic", 2.6),
    ("flawless", 2.7),
    ("glorious", 2.6),
    ("legendary", 2.5),
    ("love", 3.2),
    ("loved", 2.9),
    ("lovely", 2.8),
    ("loves", 2.7),
    ("loving", 2.9),
    ("magnificent", 2.9),
    ("masterful", 2.7),
    ("masterpiece", 3.1),
    ("outstanding", 3.1),
    ("perfect", 2.7),
    ("perfection", 2.7),
    ("spectacular", 2.6),
    ("stunning", 2.4),
    ("superb", 2.9),
    ("wonderful", 2.7),
    ("wow", 2.8),
    // positive
    ("admire", 2.1),
    ("adore", 2.9),
    ("beautiful", 2.9),
    ("beautifully", 2.6),
    ("better", 1.9),
    ("captivating", 2.2),
    ("charming", 2.2),
    ("cool", 1.3),
    ("delight", 2.6),
    ("delightful", 2.8),
    ("eager", 1.6),
    ("engaging", 1.8),
    ("enjoy", 1.9),
    ("enjoyable", 2.0),
    ("enjoyed", 2.3),
    ("entertaining", 1.9),
    ("excited", 2.2),
    ("excitement", 2.1),
    ("exciting", 2.2),
    ("favorite", 2.0),
    ("favourite", 2.0),
    ("fresh", 1.3),
    ("fun", 2.3),
    ("funny", 1.9),
    ("glad", 2.0),
    ("good", 1.9),
    ("gorgeous", 2.6),
    ("great", 3.1),
    ("happy", 2.7),
    ("hilarious", 1.7),
    ("hooked", 1.4),
    ("hope", 1.9),
    ("hoping", 1.6),
    ("immersive", 1.6),
    ("impressed", 2.1),
    ("impressive", 2.3),
    ("inspired", 2.2),
    ("inspiring", 2.4),
    ("interesting", 1.7),
    ("intriguing", 1.9),
    ("joy", 2.8),
    ("laugh", 2.2),
    ("laughed", 2.1),
    ("nice", 1.8),
    ("pleasant", 2.1),
    ("pleased", 2.0),
    ("promising", 1.5),
    ("recommend", 1.5),
    ("recommended", 1.6),
    ("refreshing", 1.9),
    ("rich", 1.6),
    ("satisfying", 1.9),
    ("smart", 1.6),
    ("solid", 1.5),
    ("strong", 1.5),
    ("stylish", 1.6),
    ("sweet", 2.0),
    ("thrilled", 2.7),
    ("thrilling", 2.2),
    ("win", 2.8),
    ("winner", 2.4),
    ("worth", 1.4),
    ("worthy", 1.9),
    // mild positive
    ("decent", 1.1),
    ("fine", 0.8),
    ("likable", 1.5),
    ("ok", 0.9),
    ("okay", 0.9),
    ("watchable", 0.9),
    // mild negative
    ("bland", -1.1),
    ("cheesy", -0.9),
    ("cliche", -1.0),
    ("flat", -0.8),
    ("forgettable", -1.3),
    ("long", -0.2),
    ("meh", -0.9),
    ("mediocre", -1.5),
    ("overrated", -1.5),
    ("predictable", -1.0),
    ("shallow", -1.4),
    ("slow", -0.7),
    ("weak", -1.6),
    // negative
    ("annoying", -1.7),
    ("avoid", -1.3),
    ("awful", -2.0),
    ("bad", -2.5),
    ("bored", -1.6),
    ("boring", -1.3),
    ("cringe", -1.6),
    ("disappoint", -1.9),
    ("disappointed", -2.1),
    ("disappointing", -2.2),
    ("disappointment", -2.2),
    ("dislike", -1.6),
    ("disliked", -1.7),
    ("dull", -1.7),
    ("fail", -2.3),
    ("failed", -2.0),
    ("failure", -2.4),
    ("fake", -1.8),
    ("flop", -1.9),
    ("hate", -2.7),
    ("hated", -2.6),
    ("hates", -2.3),
    ("lame", -1.6),
    ("lazy", -1.6),
    ("mess", -1.6),
    ("messy", -1.4),
    ("miss", -1.0),
    ("missed", -1.1),
    ("mistake", -1.7),
    ("overhyped", -1.7),
    ("pointless", -1.9),
    ("poor", -2.1),
    ("poorly", -2.0),
    ("ruin", -2.0),
    ("ruined", -2.2),
    ("sad", -2.1),
    ("sadly", -1.7),
    ("stupid", -2.4),
    ("tired", -1.4),
    ("ugly", -2.3),
    ("unfortunate", -1.9),
    ("unwatchable", -2.5),
    ("upset", -1.9),
    ("waste", -1.8),
    ("wasted", -2.0),
    ("wrong", -2.1),
    // strong negative
    ("abysmal", -2.9),
    ("atrocious", -2.8),
    ("disaster", -2.5),
    ("disgusting", -2.4),
    ("dreadful", -2.6),
    ("garbage", -2.2),
    ("horrendous", -2.6),
    ("horrible", -2.5),
    ("horrid", -2.6),
    ("pathetic", -2.6),
    ("terrible", -2.1),
    ("trash", -2.2),
    ("unbearable", -2.6),
    ("worst", -3.1),
    ("worthless", -2.7),
];

/// Word → valence table the analyzer scores against.
#[derive(Debug, Clone)]
pub struct Lexicon {
    entries: HashMap<String, f64>,
}

impl Lexicon {
    /// Embedded base table with the hype overlay already merged.
    pub fn builtin() -> Self {
        let mut entries: HashMap<String, f64> = BASE_LEXICON
            .iter()
            .map(|&(w, v)| (w.to_string(), v))
            .collect();
        for &(w, v) in HYPE_LEXICON {
            entries.insert(w.to_string(), v);
        }
        Lexicon { entries }
    }

    /// Load a replacement base lexicon from `word<TAB>valence` lines, then
    /// merge the hype overlay over it. Unreadable or empty files are errors
    /// so the caller can degrade to an "unavailable" sentiment capability.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading lexicon file {}", path.display()))?;
        let mut entries = HashMap::new();
        for line in raw.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut parts = line.split('\t');
            let (Some(word), Some(valence)) = (parts.next(), parts.next()) else {
                continue;
            };
            if let Ok(v) = valence.trim().parse::<f64>() {
                entries.insert(word.trim().to_lowercase(), v);
            }
        }
        if entries.is_empty() {
            bail!("lexicon file {} contains no entries", path.display());
        }
        for &(w, v) in HYPE_LEXICON {
            entries.insert(w.to_string(), v);
        }
        Ok(Lexicon { entries })
    }

    pub fn get(&self, word: &str) -> Option<f64> {
        self.entries.get(word).copied()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.entries.contains_key(word)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn builtin_includes_hype_overlay() {
        let lex = Lexicon::builtin();
        assert_eq!(lex.get("insane"), Some(2.2));
        assert_eq!(lex.get("goosebumps"), Some(2.0));
        assert!(lex.get("good").is_some());
        assert!(lex.get("worst").unwrap() < -2.0);
    }

    #[test]
    fn file_lexicon_overlay_still_applies() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "# comment line").unwrap();
        writeln!(f, "good\t1.0").unwrap();
        writeln!(f, "insane\t-1.5").unwrap();
        let lex = Lexicon::from_file(f.path()).unwrap();
        assert_eq!(lex.get("good"), Some(1.0));
        // overlay wins over the file entry
        assert_eq!(lex.get("insane"), Some(2.2));
    }

    #[test]
    fn empty_file_is_an_error() {
        let f = tempfile::NamedTempFile::new().unwrap();
        assert!(Lexicon::from_file(f.path()).is_err());
    }
}
