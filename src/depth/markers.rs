//! Registry of the marker alphabets used by regulation paragraphs
//!
//! Paragraphs are enumerated in a fixed set of styles: lowercase and
//! uppercase letters, arabic integers, lowercase roman numerals, the
//! emphasis-wrapped variants of the last two, star placeholders for elided
//! text, and a token for paragraphs carrying no marker at all. The
//! alphabets deliberately overlap ("i" is both a letter and a roman
//! numeral), which is what makes depth inference a search problem rather
//! than a lookup.
//!
//! These tables must stay consistent with the grammars of the upstream
//! tokenizer so both sides recognize the same strings.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Tag standing in for a block of text skipped over by the source document.
pub const STARS_TAG: &str = "STARS";

/// Inline star run. Unlike [`STARS_TAG`] it does not consume a position in
/// a sibling sequence.
pub const INLINE_STARS: &str = "* * *";

/// Token for a paragraph with no enumeration marker at all.
pub const MARKERLESS: &str = "MARKERLESS";

/// Upper bound on nesting. Regulation text never gets close in practice.
pub const MAX_DEPTH: usize = 10;

/// How many markers each enumerated alphabet carries.
const ALPHABET_SIZE: usize = 50;

static LOWER: Lazy<Vec<String>> = Lazy::new(|| ('a'..='z').map(String::from).collect());

static UPPER: Lazy<Vec<String>> = Lazy::new(|| ('A'..='Z').map(String::from).collect());

static ARABIC: Lazy<Vec<String>> =
    Lazy::new(|| (1..=ALPHABET_SIZE).map(|i| i.to_string()).collect());

static ROMAN: Lazy<Vec<String>> = Lazy::new(|| (1..=ALPHABET_SIZE).map(roman_numeral).collect());

static EM_ARABIC: Lazy<Vec<String>> =
    Lazy::new(|| ARABIC.iter().map(|m| emphasize(m)).collect());

static EM_ROMAN: Lazy<Vec<String>> = Lazy::new(|| ROMAN.iter().map(|m| emphasize(m)).collect());

static STARS: Lazy<Vec<String>> =
    Lazy::new(|| vec![STARS_TAG.to_string(), INLINE_STARS.to_string()]);

static MARKERLESS_TABLE: Lazy<Vec<String>> = Lazy::new(|| vec![MARKERLESS.to_string()]);

/// Lazy-compiled regex matching the emphasis tags wrapped around markers in
/// tagged source text, e.g. `<E T="03">1</E>`.
static EMPHASIS_TAGS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"</?E( T="03")?>"#).unwrap());

/// One of the fixed, ordered marker alphabets, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MarkerType {
    /// `a`, `b`, ... `z`
    Lower,
    /// `A`, `B`, ... `Z`
    Upper,
    /// `1`, `2`, ... `50`
    Arabic,
    /// `i`, `ii`, ... `l`
    Roman,
    /// Arabic integers wrapped in emphasis tags
    EmArabic,
    /// Roman numerals wrapped in emphasis tags
    EmRoman,
    /// Star placeholders; structurally transparent
    Stars,
    /// Paragraphs with no marker; depth inferred purely from neighbors
    Markerless,
}

impl MarkerType {
    /// Every alphabet, in priority order. Candidate enumeration and the
    /// solver's search order both follow this ordering.
    pub const ALL: [MarkerType; 8] = [
        MarkerType::Lower,
        MarkerType::Upper,
        MarkerType::Arabic,
        MarkerType::Roman,
        MarkerType::EmArabic,
        MarkerType::EmRoman,
        MarkerType::Stars,
        MarkerType::Markerless,
    ];

    /// The ordered marker strings of this alphabet.
    pub fn alphabet(self) -> &'static [String] {
        match self {
            MarkerType::Lower => &LOWER,
            MarkerType::Upper => &UPPER,
            MarkerType::Arabic => &ARABIC,
            MarkerType::Roman => &ROMAN,
            MarkerType::EmArabic => &EM_ARABIC,
            MarkerType::EmRoman => &EM_ROMAN,
            MarkerType::Stars => &STARS,
            MarkerType::Markerless => &MARKERLESS_TABLE,
        }
    }

    /// Position of `marker` within this alphabet, if it is a member.
    pub fn index_of(self, marker: &str) -> Option<usize> {
        self.alphabet().iter().position(|m| m == marker)
    }

    /// Stars do not establish a depth identity of their own.
    pub fn is_stars(self) -> bool {
        self == MarkerType::Stars
    }

    pub fn is_markerless(self) -> bool {
        self == MarkerType::Markerless
    }

    /// An alphabet that names a real enumeration sequence, as opposed to
    /// the transparent stars/markerless placeholders.
    pub fn is_enumerated(self) -> bool {
        !self.is_stars() && !self.is_markerless()
    }
}

/// Every `(type, index)` pair whose alphabet contains `marker`, in priority
/// order. Overlapping alphabets make this a set: `candidates("i")` yields
/// both the letter and the roman numeral reading.
pub fn candidates(marker: &str) -> Vec<(MarkerType, usize)> {
    MarkerType::ALL
        .iter()
        .filter_map(|&typ| typ.index_of(marker).map(|idx| (typ, idx)))
        .collect()
}

/// Strip emphasis tags from a marker: `<E T="03">1</E>` becomes `1`.
pub fn deemphasize(marker: &str) -> String {
    EMPHASIS_TAGS.replace_all(marker, "").into_owned()
}

fn emphasize(marker: &str) -> String {
    format!("<E T=\"03\">{}</E>", marker)
}

/// Lowercase roman numeral for `n` (1-based).
fn roman_numeral(n: usize) -> String {
    const TABLE: [(usize, &str); 13] = [
        (1000, "m"),
        (900, "cm"),
        (500, "d"),
        (400, "cd"),
        (100, "c"),
        (90, "xc"),
        (50, "l"),
        (40, "xl"),
        (10, "x"),
        (9, "ix"),
        (5, "v"),
        (4, "iv"),
        (1, "i"),
    ];
    let mut remaining = n;
    let mut out = String::new();
    for (amount, chars) in TABLE {
        while remaining >= amount {
            out.push_str(chars);
            remaining -= amount;
        }
    }
    out
}
