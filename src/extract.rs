//! Extraction of Hamza contexts and diacritic labels from cleaned text.
//!
//! A *Hamza context* is the three-character window around the first Hamza of a word:
//! the preceding character (absent at the start of the word), the Hamza variant itself
//! and the following character (absent at the end of the word). The diacritic written
//! directly after a Hamza, when present, is the training label for that context.

use serde::{Deserialize, Serialize};

use crate::arabic::{clean_text, is_diacritic, is_hamza};

/// Encoded context: the Unicode code points of (before, hamza, after), 0 standing for
/// an absent character. The middle element is never 0.
pub type FeatureVector = [u32; 3];

/// The local orthographic context of the first Hamza in a word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HamzaContext {
    pub before: Option<char>,
    pub hamza: char,
    pub after: Option<char>,
}

impl HamzaContext {
    pub fn encode(&self) -> FeatureVector {
        [
            self.before.map_or(0, |c| c as u32),
            self.hamza as u32,
            self.after.map_or(0, |c| c as u32),
        ]
    }
}

/// A Hamza context together with the diacritic observed after the Hamza.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabeledExample {
    pub context: HamzaContext,
    pub label: char,
}

/// The words of `text` containing at least one Hamza variant, in source order,
/// duplicates preserved.
pub fn hamza_words(text: &str) -> impl Iterator<Item = &str> {
    text.split_whitespace()
        .filter(|word| word.chars().any(is_hamza))
}

/// The context of the *first* Hamza in `word`, or `None` for words without a Hamza.
///
/// Words with more than one Hamza contribute only the first occurrence. This
/// under-representation is intentional; widening it would shift the label
/// distribution the model is trained on.
pub fn hamza_context(word: &str) -> Option<HamzaContext> {
    let chars: Vec<char> = word.chars().collect();
    let position = chars.iter().position(|c| is_hamza(*c))?;

    Some(HamzaContext {
        before: position.checked_sub(1).map(|i| chars[i]),
        hamza: chars[position],
        after: chars.get(position + 1).copied(),
    })
}

/// The first diacritic written directly after a Hamza in `word`, or `None` if no
/// Hamza is followed by one (covers both undiacritized words and a word-final Hamza).
pub fn diacritic_label(word: &str) -> Option<char> {
    let mut chars = word.chars().peekable();

    while let Some(c) = chars.next() {
        if is_hamza(c) {
            if let Some(next) = chars.peek().copied() {
                if is_diacritic(next) {
                    return Some(next);
                }
            }
        }
    }

    None
}

/// Turns one raw document into labeled examples: clean, locate Hamza words, extract
/// context and label, keep only words where both are present.
///
/// Pure over its input, so it can run on any worker without coordination.
pub fn process_document(text: &str) -> Vec<LabeledExample> {
    let cleaned = clean_text(text);

    hamza_words(&cleaned)
        .filter_map(|word| {
            let context = hamza_context(word)?;
            let label = diacritic_label(word)?;

            Some(LabeledExample { context, label })
        })
        .collect()
}
