//! Language detection.
//!
//! Detection runs in tiers. A script table lookup comes first: scripts such as
//! kana, hangul or Devanagari identify a language almost certainly. A script
//! decides the result once it covers at least [`MIN_SCRIPT_SHARE`] of the
//! letters; among those, the lowest-ranked script wins. Latin script,
//! punctuation and symbol blocks are not in the table and fall through to a
//! statistical classifier, which is run on three samples of the cleaned text
//! and decided by majority vote. Anything that fails lands on
//! [`DEFAULT_LANGUAGE`].

use std::collections::{BTreeMap, HashMap};

use once_cell::sync::Lazy;
use regex::Regex;

/// Language code returned when nothing better is known.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Texts with fewer trimmed characters than this are not analyzed.
pub const MIN_TEXT_LEN: usize = 5;

/// Share of letters a script needs before it decides the language.
pub const MIN_SCRIPT_SHARE: f32 = 0.1;

/// Cleaned texts longer than this are sampled instead of classified whole.
const SAMPLING_THRESHOLD: usize = 50;

/// Characters per sample.
const SAMPLE_LEN: usize = 100;

/// Samples with this many trimmed characters or fewer are skipped.
const MIN_SAMPLE_LEN: usize = 10;

/// One contiguous script block.
struct ScriptRange {
    start: u32,
    end: u32,
    lang: &'static str,
    /// Lower rank wins when a text mixes scripts.
    rank: u16,
}

const fn script(start: u32, end: u32, lang: &'static str, rank: u16) -> ScriptRange {
    ScriptRange {
        start,
        end,
        lang,
        rank,
    }
}

/// Script blocks sorted by start code point.
///
/// Kana outranks ideographs so Japanese text that mixes kanji and kana is not
/// taken for Chinese; ideographs and hangul come next, then every other
/// script. CJK punctuation and fullwidth forms rank last among the CJK
/// blocks.
static SCRIPT_TABLE: &[ScriptRange] = &[
    script(0x0370, 0x03FF, "el", 91),
    script(0x0400, 0x04FF, "ru", 6),
    script(0x0530, 0x058F, "hy", 92),
    script(0x0590, 0x05FF, "he", 93),
    script(0x0600, 0x06FF, "ar", 3),
    script(0x0900, 0x097F, "hi", 5),
    script(0x0980, 0x09FF, "bn", 94),
    script(0x0A00, 0x0A7F, "pa", 95),
    script(0x0A80, 0x0AFF, "gu", 96),
    script(0x0B00, 0x0B7F, "or", 97),
    script(0x0B80, 0x0BFF, "ta", 7),
    script(0x0C00, 0x0C7F, "te", 98),
    script(0x0C80, 0x0CFF, "kn", 8),
    script(0x0D00, 0x0D7F, "ml", 9),
    script(0x0D80, 0x0DFF, "si", 10),
    script(0x0E00, 0x0E7F, "th", 4),
    script(0x0E80, 0x0EFF, "lo", 11),
    script(0x0F00, 0x0FFF, "bo", 12),
    script(0x1000, 0x109F, "my", 13),
    script(0x10A0, 0x10FF, "ka", 99),
    script(0x1100, 0x11FF, "ko", 14),
    script(0x1200, 0x137F, "am", 15),
    script(0x1400, 0x167F, "cr", 16),
    script(0x1680, 0x169F, "ga", 17),
    script(0x16A0, 0x16FF, "non", 18),
    script(0x1700, 0x171F, "tl", 19),
    script(0x1720, 0x173F, "hnn", 20),
    script(0x1740, 0x175F, "bku", 21),
    script(0x1760, 0x177F, "tbw", 22),
    script(0x1780, 0x17FF, "km", 23),
    script(0x1800, 0x18AF, "mn", 24),
    script(0x1900, 0x194F, "lif", 25),
    script(0x1950, 0x197F, "tdd", 26),
    script(0x1980, 0x19DF, "khb", 27),
    script(0x19E0, 0x19FF, "km", 28),
    script(0x1A00, 0x1A1F, "bug", 29),
    script(0x1A20, 0x1AAF, "nod", 30),
    script(0x1B00, 0x1B7F, "ban", 31),
    script(0x1B80, 0x1BBF, "su", 32),
    script(0x1BC0, 0x1BFF, "btk", 33),
    script(0x1C00, 0x1C4F, "lep", 34),
    script(0x1C50, 0x1C7F, "sat", 35),
    script(0x1C80, 0x1C8F, "ru", 36),
    script(0x1C90, 0x1CBF, "ka", 37),
    script(0x1CC0, 0x1CCF, "su", 38),
    script(0x1CD0, 0x1CFF, "sa", 39),
    script(0x1F00, 0x1FFF, "el", 40),
    script(0x2C00, 0x2C5F, "cu", 41),
    script(0x2C80, 0x2CFF, "cop", 42),
    script(0x2D00, 0x2D2F, "ka", 43),
    script(0x2D30, 0x2D7F, "ber", 44),
    script(0x2D80, 0x2DDF, "am", 45),
    script(0x2DE0, 0x2DFF, "ru", 46),
    script(0x2E80, 0x2EFF, "zh", 47),
    script(0x2F00, 0x2FDF, "zh", 48),
    script(0x2FF0, 0x2FFF, "zh", 49),
    script(0x3000, 0x303F, "zh", 50),
    script(0x3040, 0x309F, "ja", 0),
    script(0x30A0, 0x30FF, "ja", 0),
    script(0x3100, 0x312F, "zh", 51),
    script(0x3130, 0x318F, "ko", 52),
    script(0x3190, 0x319F, "ja", 53),
    script(0x31A0, 0x31BF, "zh", 54),
    script(0x31C0, 0x31EF, "zh", 55),
    script(0x31F0, 0x31FF, "ja", 56),
    script(0x3200, 0x32FF, "zh", 57),
    script(0x3300, 0x33FF, "zh", 58),
    script(0x3400, 0x4DBF, "zh", 59),
    script(0x4DC0, 0x4DFF, "zh", 60),
    script(0x4E00, 0x9FFF, "zh", 1),
    script(0xA000, 0xA48F, "ii", 61),
    script(0xA490, 0xA4CF, "ii", 62),
    script(0xA4D0, 0xA4FF, "lis", 63),
    script(0xA500, 0xA63F, "vai", 64),
    script(0xA640, 0xA69F, "ru", 65),
    script(0xA6A0, 0xA6FF, "bax", 66),
    script(0xA800, 0xA82F, "syl", 67),
    script(0xA840, 0xA87F, "xal", 68),
    script(0xA880, 0xA8DF, "saz", 69),
    script(0xA8E0, 0xA8FF, "hi", 70),
    script(0xA900, 0xA92F, "eky", 71),
    script(0xA930, 0xA95F, "rej", 72),
    script(0xA960, 0xA97F, "ko", 73),
    script(0xA980, 0xA9DF, "jv", 74),
    script(0xA9E0, 0xA9FF, "my", 75),
    script(0xAA00, 0xAA5F, "cja", 76),
    script(0xAA60, 0xAA7F, "my", 77),
    script(0xAA80, 0xAADF, "blt", 78),
    script(0xAAE0, 0xAAFF, "mni", 79),
    script(0xAB00, 0xAB2F, "am", 80),
    script(0xAB70, 0xABBF, "chr", 81),
    script(0xABC0, 0xABFF, "mni", 82),
    script(0xAC00, 0xD7AF, "ko", 2),
    script(0xD7B0, 0xD7FF, "ko", 83),
    script(0xF900, 0xFAFF, "zh", 84),
    script(0xFB50, 0xFDFF, "ar", 85),
    script(0xFE10, 0xFE1F, "zh", 86),
    script(0xFE30, 0xFE4F, "zh", 87),
    script(0xFE50, 0xFE6F, "zh", 88),
    script(0xFE70, 0xFEFF, "ar", 89),
    script(0xFF00, 0xFFEF, "zh", 90),
];

fn lookup_script(c: char) -> Option<&'static ScriptRange> {
    let cp = c as u32;
    // Index of the first range starting after `cp`; the candidate sits just before it.
    let idx = SCRIPT_TABLE.partition_point(|r| r.start <= cp);
    let range = SCRIPT_TABLE.get(idx.checked_sub(1)?)?;
    (cp <= range.end).then_some(range)
}

/// Language implied by the scripts present in `text`, if any.
///
/// Scripts below [`MIN_SCRIPT_SHARE`] of the letters are ignored, so a stray
/// symbol such as a Greek letter in English prose does not decide anything.
pub fn detect_script(text: &str) -> Option<&'static str> {
    // lang -> (hits, lowest rank)
    let mut hits: BTreeMap<&'static str, (usize, u16)> = BTreeMap::new();
    let mut letters = 0usize;
    for c in text.chars() {
        match lookup_script(c) {
            Some(range) => {
                letters += 1;
                let entry = hits.entry(range.lang).or_insert((0, range.rank));
                entry.0 += 1;
                entry.1 = entry.1.min(range.rank);
            }
            None if c.is_alphabetic() => letters += 1,
            None => {}
        }
    }

    hits.into_iter()
        .filter(|(_, (count, _))| *count as f32 >= letters as f32 * MIN_SCRIPT_SHARE)
        .min_by_key(|(_, (_, rank))| *rank)
        .map(|(lang, _)| lang)
}

/// A statistical language classifier.
///
/// Returns `None` when the classifier has no opinion; errors are the
/// implementation's to absorb.
pub trait LanguageClassifier: Send + Sync {
    /// Classify a text sample into a language code.
    fn classify(&self, text: &str) -> Option<String>;
}

/// Trigram classifier backed by `whatlang`.
///
/// Codes are ISO 639-1 for the languages listed in [`iso_639_1`]; others keep
/// whatlang's ISO 639-3 code.
#[derive(Debug, Default, Clone, Copy)]
pub struct WhatlangClassifier;

impl LanguageClassifier for WhatlangClassifier {
    fn classify(&self, text: &str) -> Option<String> {
        let info = whatlang::detect(text)?;
        Some(iso_639_1(info.lang()).to_string())
    }
}

/// Two-letter code of a whatlang language.
pub fn iso_639_1(lang: whatlang::Lang) -> &'static str {
    use whatlang::Lang;
    match lang {
        Lang::Eng => "en",
        Lang::Rus => "ru",
        Lang::Cmn => "zh",
        Lang::Spa => "es",
        Lang::Por => "pt",
        Lang::Ita => "it",
        Lang::Fra => "fr",
        Lang::Deu => "de",
        Lang::Ara => "ar",
        Lang::Hin => "hi",
        Lang::Jpn => "ja",
        Lang::Kor => "ko",
        Lang::Pol => "pl",
        Lang::Dan => "da",
        Lang::Swe => "sv",
        Lang::Fin => "fi",
        Lang::Tur => "tr",
        Lang::Nld => "nl",
        Lang::Vie => "vi",
        Lang::Tha => "th",
        Lang::Ukr => "uk",
        Lang::Ell => "el",
        Lang::Ces => "cs",
        Lang::Hun => "hu",
        Lang::Nob => "no",
        _ => lang.code(),
    }
}

static DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").unwrap());
static NON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s]").unwrap());
static SPACES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Strip digits and punctuation and collapse whitespace.
fn clean_text(text: &str) -> String {
    let text = DIGITS.replace_all(text, " ");
    let text = NON_WORD.replace_all(&text, " ");
    SPACES.replace_all(&text, " ").trim().to_string()
}

/// Start, middle and end windows of `chars`.
fn samples(chars: &[char]) -> [String; 3] {
    let n = chars.len();
    let mid = n / 2;
    let window = |from: usize, to: usize| -> String {
        chars[from.min(n)..to.min(n)].iter().collect()
    };
    [
        window(0, SAMPLE_LEN),
        window(mid, mid + SAMPLE_LEN),
        window(n.saturating_sub(SAMPLE_LEN), n),
    ]
}

fn is_valid_code(code: &str) -> bool {
    !code.is_empty() && code != "un" && code != "unknown"
}

/// Most frequent code; ties go to the code seen first.
fn majority(codes: &[String]) -> Option<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for code in codes {
        *counts.entry(code.as_str()).or_default() += 1;
    }
    let mut best: Option<(&str, usize)> = None;
    for code in codes {
        let count = counts[code.as_str()];
        if best.map_or(true, |(_, c)| count > c) {
            best = Some((code.as_str(), count));
        }
    }
    best.map(|(code, _)| code.to_string())
}

/// Language detector combining the script table with a statistical
/// classifier.
pub struct LanguageDetector {
    classifier: Box<dyn LanguageClassifier>,
}

impl LanguageDetector {
    /// Create a detector with the default classifier.
    pub fn new() -> Self {
        Self::with_classifier(WhatlangClassifier)
    }

    /// Create a detector with a custom classifier.
    pub fn with_classifier<C: LanguageClassifier + 'static>(classifier: C) -> Self {
        Self {
            classifier: Box::new(classifier),
        }
    }

    /// Detect the language of `text`. Never fails.
    pub fn detect(&self, text: &str) -> String {
        if text.trim().chars().count() < MIN_TEXT_LEN {
            return DEFAULT_LANGUAGE.to_string();
        }

        if let Some(lang) = detect_script(text) {
            log::debug!("Language {} from script", lang);
            return lang.to_string();
        }

        let cleaned = clean_text(text);
        let chars: Vec<char> = cleaned.chars().collect();

        if chars.len() > SAMPLING_THRESHOLD {
            let votes: Vec<String> = samples(&chars)
                .iter()
                .filter(|s| s.trim().chars().count() > MIN_SAMPLE_LEN)
                .filter_map(|s| self.classifier.classify(s))
                .filter(|code| is_valid_code(code))
                .collect();
            if let Some(lang) = majority(&votes) {
                log::debug!("Language {} from {} samples", lang, votes.len());
                return lang;
            }
        }

        if !cleaned.is_empty() {
            if let Some(lang) = self.classifier.classify(&cleaned) {
                if is_valid_code(&lang) {
                    log::debug!("Language {} from whole text", lang);
                    return lang;
                }
            }
        }

        log::warn!("Language detection failed, defaulting to {}", DEFAULT_LANGUAGE);
        DEFAULT_LANGUAGE.to_string()
    }
}

impl Default for LanguageDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for LanguageDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LanguageDetector").finish_non_exhaustive()
    }
}

/// Detect the language of `text` with the default detector.
///
/// # Example
/// ```
/// use docoutline::detect::detect_language;
///
/// assert_eq!(detect_language("第一章 概述"), "zh");
/// assert_eq!(detect_language("Hi"), "en");
/// ```
pub fn detect_language(text: &str) -> String {
    LanguageDetector::new().detect(text)
}
