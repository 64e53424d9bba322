//! Applying a trained model to a live phrase.

use itertools::Itertools;

use crate::extract::hamza_context;
use crate::model::DiacriticModel;

/// Restores Hamza diacritics in phrases using a model injected at construction,
/// so prediction without a trained or loaded model is unrepresentable.
pub struct Predictor {
    model: DiacriticModel,
}

impl Predictor {
    pub fn new(model: DiacriticModel) -> Self {
        Predictor { model }
    }

    /// For every word carrying a Hamza, emits the Hamza variant followed by the
    /// predicted diacritic; other words pass through unchanged. Tokens are joined
    /// with a double space, a visual-spacing choice kept for compatibility with
    /// the output format downstream shapers expect.
    ///
    /// The result is unshaped; right-to-left terminal display is the caller's
    /// concern.
    pub fn predict(&self, phrase: &str) -> String {
        phrase
            .split_whitespace()
            .map(|word| match hamza_context(word) {
                Some(context) => {
                    let label = self.model.predict(context.encode());
                    format!("{}{}", context.hamza, label)
                }
                None => word.to_string(),
            })
            .join("  ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::process_document;

    const FATHA: char = '\u{064E}';

    /// A model trained on fatha-only examples; it predicts fatha for any context.
    fn fatha_model() -> DiacriticModel {
        let document = "نبأَ سأَل بدأَ".split_whitespace().collect::<Vec<_>>().repeat(5).join(" ");
        DiacriticModel::train(&process_document(&document)).unwrap()
    }

    #[test]
    fn hamza_words_are_replaced_by_hamza_and_label() {
        let predictor = Predictor::new(fatha_model());
        assert_eq!(predictor.predict("النبإ"), format!("إ{}", FATHA));
    }

    #[test]
    fn words_without_hamza_pass_through_unchanged() {
        let predictor = Predictor::new(fatha_model());
        assert_eq!(predictor.predict("كتب"), "كتب");
    }

    #[test]
    fn tokens_are_joined_with_a_double_space() {
        let predictor = Predictor::new(fatha_model());
        assert_eq!(
            predictor.predict("كتب نبأ"),
            format!("كتب  أ{}", FATHA)
        );
    }

    #[test]
    fn empty_phrase_stays_empty() {
        let predictor = Predictor::new(fatha_model());
        assert_eq!(predictor.predict(""), "");
    }
}
