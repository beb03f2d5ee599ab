//! Language-aware heading pattern matching.
//!
//! A line is recognized as a heading marker by structure first (numbering,
//! Roman numerals, list bullets), then by a per-language lexicon of section
//! words, and finally by universal shape tests: brevity, missing terminal
//! punctuation, typographic casing and trailing colons. Languages without a
//! lexicon entry still get the structural and shape tests.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

/// Numbered heading prefix: `1. `, `1.2. `, `1.2.3. `.
static NUMBERED: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+\.(\d+\.)*\s").unwrap());

/// Parenthesized numbering: `(1)`, `(1.2)`.
static PARENTHESIZED: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\(\d+(\.\d+)*\)").unwrap());

/// Roman numeral prefix with or without a trailing period.
static ROMAN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[IVXLCDM]+\.?\s").unwrap());

/// Bullet or list marker followed by whitespace.
static BULLET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[•※⚫⚪◦○●◉◎■□▪▫★☆♦♣♠♥➤➢➡⇒→\-]\s").unwrap());

/// Numbering with alternate separators: `1.1`, `1-1`, `1_1`.
static ALT_NUMBERING: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+[.\-_]\d+").unwrap());

/// Sentence-terminal punctuation across scripts.
const TERMINAL_PUNCTUATION: &[char] = &[
    '.', '!', '?', // Latin
    '。', '．', '！', '？', // CJK
    '؟', '۔', // Arabic, Urdu
    '।', '॥', // Devanagari
    '።', // Ethiopic
    '។', // Khmer
    '၊', '။', // Myanmar
];

/// Texts at least this long are never accepted on shape alone.
const SHORT_TEXT_CAP: usize = 50;
const COLON_TEXT_CAP: usize = 60;

/// Section vocabulary of one language.
struct Lexicon {
    /// Lowercase words a heading may start with
    words: &'static [&'static str],
    /// Marker pattern searched anywhere in the text
    marker: Option<Regex>,
}

impl Lexicon {
    fn words(words: &'static [&'static str]) -> Self {
        Self {
            words,
            marker: None,
        }
    }

    fn marker(pattern: &str) -> Self {
        Self {
            words: &[],
            marker: Some(Regex::new(pattern).unwrap()),
        }
    }

    fn with_marker(mut self, pattern: &str) -> Self {
        self.marker = Some(Regex::new(pattern).unwrap());
        self
    }

    fn matches(&self, text: &str) -> bool {
        if let Some(marker) = &self.marker {
            if marker.is_match(text) {
                return true;
            }
        }
        if self.words.is_empty() {
            return false;
        }
        let lower = text.to_lowercase();
        self.words.iter().any(|w| lower.starts_with(w))
    }
}

static LEXICONS: Lazy<HashMap<&'static str, Lexicon>> = Lazy::new(|| {
    let mut table = HashMap::new();
    table.insert(
        "en",
        Lexicon::words(&[
            "chapter",
            "section",
            "introduction",
            "conclusion",
            "appendix",
            "part",
            "summary",
            "abstract",
            "overview",
            "preface",
            "foreword",
            "glossary",
        ])
        .with_marker(r"^[A-Za-z]\.(\s|\d)"),
    );
    table.insert(
        "ja",
        Lexicon::marker(r"第\d+章|節|はじめに|まとめ|概要|要約"),
    );
    table.insert(
        "zh",
        Lexicon::marker(r"第[一二三四五六七八九十百千万\d]+[章节篇部分]|引言|简介|摘要|总结|附录|概述"),
    );
    table.insert(
        "ko",
        Lexicon::marker(r"제\s*\d+\s*장|서론|결론|요약|부록|개요|소개"),
    );
    table.insert(
        "ar",
        Lexicon::marker(r"الفصل|القسم|الجزء|المقدمة|الخاتمة|الملخص|الملحق|تمهيد|مقدمة|خلاصة"),
    );
    table.insert(
        "th",
        Lexicon::marker(r"บทที่|ส่วนที่|บทนำ|สรุป|ภาคผนวก|บทคัดย่อ"),
    );
    table.insert(
        "hi",
        Lexicon::words(&["अध्याय", "खंड", "भाग", "परिचय", "निष्कर्ष", "सारांश", "परिशिष्ट"]),
    );
    table.insert(
        "es",
        Lexicon::words(&[
            "capítulo",
            "sección",
            "parte",
            "introducción",
            "conclusión",
            "resumen",
            "apéndice",
            "prólogo",
            "prefacio",
            "glosario",
        ]),
    );
    table.insert(
        "fr",
        Lexicon::words(&[
            "chapitre",
            "section",
            "partie",
            "introduction",
            "conclusion",
            "résumé",
            "annexe",
            "préface",
            "avant-propos",
            "glossaire",
        ]),
    );
    table.insert(
        "de",
        Lexicon::words(&[
            "kapitel",
            "abschnitt",
            "teil",
            "einleitung",
            "zusammenfassung",
            "anhang",
            "vorwort",
            "glossar",
            "überblick",
            "einführung",
        ]),
    );
    table.insert(
        "ru",
        Lexicon::words(&[
            "глава",
            "раздел",
            "часть",
            "введение",
            "заключение",
            "аннотация",
            "приложение",
            "предисловие",
            "резюме",
            "обзор",
        ]),
    );
    table.insert(
        "pt",
        Lexicon::words(&[
            "capítulo",
            "seção",
            "parte",
            "introdução",
            "conclusão",
            "resumo",
            "apêndice",
            "prefácio",
            "glossário",
        ]),
    );
    table.insert(
        "it",
        Lexicon::words(&[
            "capitolo",
            "sezione",
            "parte",
            "introduzione",
            "conclusione",
            "riassunto",
            "appendice",
            "prefazione",
            "glossario",
        ]),
    );
    table.insert(
        "tr",
        Lexicon::words(&["bölüm", "kısım", "giriş", "sonuç", "özet", "ek", "önsöz"]),
    );
    table.insert(
        "vi",
        Lexicon::words(&[
            "chương",
            "phần",
            "mục",
            "giới thiệu",
            "kết luận",
            "tóm tắt",
            "phụ lục",
        ]),
    );
    table.insert(
        "nl",
        Lexicon::words(&[
            "hoofdstuk",
            "sectie",
            "deel",
            "inleiding",
            "conclusie",
            "samenvatting",
            "bijlage",
            "voorwoord",
            "overzicht",
        ]),
    );
    table.insert(
        "pl",
        Lexicon::words(&[
            "rozdział",
            "sekcja",
            "część",
            "wstęp",
            "wprowadzenie",
            "podsumowanie",
            "zakończenie",
            "załącznik",
            "streszczenie",
        ]),
    );
    table.insert(
        "sv",
        Lexicon::words(&[
            "kapitel",
            "avsnitt",
            "inledning",
            "sammanfattning",
            "slutsats",
            "bilaga",
            "förord",
            "översikt",
        ]),
    );
    table.insert(
        "da",
        Lexicon::words(&[
            "kapitel",
            "afsnit",
            "indledning",
            "konklusion",
            "resumé",
            "bilag",
            "forord",
            "oversigt",
        ]),
    );
    table.insert(
        "no",
        Lexicon::words(&[
            "kapittel",
            "avsnitt",
            "innledning",
            "konklusjon",
            "sammendrag",
            "vedlegg",
            "forord",
            "oversikt",
        ]),
    );
    table.insert(
        "fi",
        Lexicon::words(&[
            "luku",
            "johdanto",
            "yhteenveto",
            "tiivistelmä",
            "liite",
            "esipuhe",
            "katsaus",
        ]),
    );
    table
});

/// Primary subtag of a language code (`"en-US"` → `"en"`), with Norwegian
/// written-standard codes folded into `"no"`.
fn primary_subtag(language: &str) -> String {
    let primary = language
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
        .to_lowercase();
    match primary.as_str() {
        "nb" | "nn" => "no".to_string(),
        _ => primary,
    }
}

/// Whether the language has a section lexicon.
pub fn has_lexicon(language: &str) -> bool {
    LEXICONS.contains_key(primary_subtag(language).as_str())
}

/// Whether `text` starts with a numbered-heading prefix such as `2.1. `.
pub fn has_numbering_prefix(text: &str) -> bool {
    NUMBERED.is_match(text)
}

/// True when the text has at least one cased letter and no lowercase ones.
pub fn is_all_caps(text: &str) -> bool {
    let mut cased = false;
    for c in text.chars() {
        if c.is_lowercase() {
            return false;
        }
        if c.is_uppercase() {
            cased = true;
        }
    }
    cased
}

/// Title-case a string: the first cased letter of every run of cased letters
/// is uppercased, the rest lowercased. Digits and punctuation break runs.
pub fn to_title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut previous_cased = false;
    for c in text.chars() {
        if previous_cased {
            out.extend(c.to_lowercase());
        } else {
            out.extend(c.to_uppercase());
        }
        previous_cased = c.is_uppercase() || c.is_lowercase();
    }
    out
}

/// Whether the text is unchanged by [`to_title_case`].
pub fn is_title_case(text: &str) -> bool {
    to_title_case(text) == text
}

fn ends_with_terminal(text: &str) -> bool {
    text.trim_end()
        .chars()
        .last()
        .is_some_and(|c| TERMINAL_PUNCTUATION.contains(&c))
}

/// Heading-marker test over text and a language code.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeadingPatternMatcher;

impl HeadingPatternMatcher {
    /// Create a new matcher.
    pub fn new() -> Self {
        Self
    }

    /// Whether `text` looks like a heading in `language`.
    pub fn is_heading(&self, text: &str, language: &str) -> bool {
        if text.trim().chars().count() < 2 {
            return false;
        }

        if NUMBERED.is_match(text)
            || PARENTHESIZED.is_match(text)
            || ROMAN.is_match(text)
            || BULLET.is_match(text)
        {
            return true;
        }

        if let Some(lexicon) = LEXICONS.get(primary_subtag(language).as_str()) {
            if lexicon.matches(text) {
                return true;
            }
        }

        if ALT_NUMBERING.is_match(text) {
            return true;
        }

        let len = text.chars().count();
        if len < SHORT_TEXT_CAP && !ends_with_terminal(text) && Self::has_heading_shape(text, len)
        {
            return true;
        }

        text.trim_end().ends_with(':') && len < COLON_TEXT_CAP
    }

    fn has_heading_shape(text: &str, len: usize) -> bool {
        if is_all_caps(text) || is_title_case(text) {
            return true;
        }
        if len < 30 && text.chars().next().is_some_and(char::is_uppercase) {
            return true;
        }
        if text.starts_with(' ') && text.trim().chars().count() < 40 {
            return true;
        }
        text.matches(' ').count() < 2 && len < 25
    }
}

/// Shorthand for [`HeadingPatternMatcher::is_heading`].
pub fn is_heading(text: &str, language: &str) -> bool {
    HeadingPatternMatcher.is_heading(text, language)
}
