//! Locale-aware ordering of product names.
//!
//! Portuguese has no tailoring over the root collation order, so `PtBr`
//! compares in three levels: base letters (accents removed, case folded),
//! then accents, then case. Raw code-point order would put every accented
//! capital after `z`.

use core::cmp::Ordering;

use serde::{Deserialize, Serialize};
use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Collation {
    /// Brazilian Portuguese (root order).
    #[default]
    PtBr,
    /// Plain Unicode scalar value order.
    CodePoint,
}

impl Collation {
    /// Resolve a locale tag such as `pt-BR`, `pt_BR` or `C`.
    ///
    /// Unknown tags resolve to `PtBr`: for Latin-script names without
    /// tailoring the root order applies anyway.
    pub fn from_locale_tag(tag: &str) -> Self {
        let normalized = tag.trim().replace('_', "-").to_ascii_lowercase();
        match normalized.as_str() {
            "c" | "posix" | "codepoint" | "binary" => Collation::CodePoint,
            "pt" | "pt-br" | "pt-pt" | "" => Collation::PtBr,
            other => {
                tracing::warn!(locale = other, "no tailoring for locale; using root collation");
                Collation::PtBr
            }
        }
    }

    pub fn locale_tag(&self) -> &'static str {
        match self {
            Collation::PtBr => "pt-BR",
            Collation::CodePoint => "C",
        }
    }

    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        match self {
            Collation::CodePoint => a.cmp(b),
            Collation::PtBr => {
                let ka = CollationKey::new(a);
                let kb = CollationKey::new(b);
                ka.cmp_levels(&kb).then_with(|| a.cmp(b))
            }
        }
    }
}

/// Secondary weight of a combining mark, in root collation order.
///
/// Marks outside the table sort after every listed one, by code point.
fn secondary_weight(mark: char) -> u32 {
    match mark {
        '\u{0301}' => 1,  // acute
        '\u{0300}' => 2,  // grave
        '\u{0306}' => 3,  // breve
        '\u{0302}' => 4,  // circumflex
        '\u{030C}' => 5,  // caron
        '\u{030A}' => 6,  // ring above
        '\u{0308}' => 7,  // diaeresis
        '\u{030B}' => 8,  // double acute
        '\u{0303}' => 9,  // tilde
        '\u{0307}' => 10, // dot above
        '\u{0327}' => 11, // cedilla
        '\u{0328}' => 12, // ogonek
        '\u{0304}' => 13, // macron
        other => 0x1000 + other as u32,
    }
}

/// One base character plus the marks that decorate it.
#[derive(Debug)]
struct Element {
    primary: char,
    /// Secondary weights of the attached marks.
    marks: Vec<u32>,
    upper: bool,
}

#[derive(Debug)]
struct CollationKey {
    elements: Vec<Element>,
}

impl CollationKey {
    fn new(s: &str) -> Self {
        let mut elements: Vec<Element> = Vec::with_capacity(s.len());
        for c in s.nfd() {
            if is_combining_mark(c) {
                if let Some(last) = elements.last_mut() {
                    last.marks.push(secondary_weight(c));
                    continue;
                }
            }
            let upper = c.is_uppercase();
            // Multi-char lowercase expansions (e.g. U+0130) become extra elements.
            let mut lower = c.to_lowercase();
            let first = lower.next().unwrap_or(c);
            elements.push(Element {
                primary: first,
                marks: Vec::new(),
                upper,
            });
            for extra in lower {
                if is_combining_mark(extra) {
                    if let Some(last) = elements.last_mut() {
                        last.marks.push(secondary_weight(extra));
                    }
                } else {
                    elements.push(Element {
                        primary: extra,
                        marks: Vec::new(),
                        upper,
                    });
                }
            }
        }
        Self { elements }
    }

    fn cmp_levels(&self, other: &Self) -> Ordering {
        let primary = self
            .elements
            .iter()
            .map(|e| e.primary)
            .cmp(other.elements.iter().map(|e| e.primary));
        if primary != Ordering::Equal {
            return primary;
        }

        // Same base letters, so element counts match from here on.
        let secondary = self
            .elements
            .iter()
            .zip(&other.elements)
            .map(|(a, b)| a.marks.cmp(&b.marks))
            .find(|o| *o != Ordering::Equal)
            .unwrap_or(Ordering::Equal);
        if secondary != Ordering::Equal {
            return secondary;
        }

        self.elements
            .iter()
            .zip(&other.elements)
            .map(|(a, b)| a.upper.cmp(&b.upper))
            .find(|o| *o != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    }
}
