//! Restores the diacritic mark that follows a Hamza glyph in Arabic text.
//! # Overview
//!
//! hamzapoint has the following core abstractions:
//! - Extraction functions in [extract] to find Hamza-bearing words, their local orthographic
//!   context and the diacritic (if any) written after the Hamza.
//! - A [DiacriticModel][model::DiacriticModel], an ensemble classifier trained on contexts
//!   extracted from a diacritized corpus and persisted as a binary artifact.
//! - A [Predictor][predict::Predictor] applying the model to a live phrase.
//!
//! # Examples
//!
//! Train a model from a corpus directory (or load the persisted artifact if one exists) and
//! restore diacritics in a phrase:
//!
//! ```no_run
//! use hamzapoint::corpus;
//! use hamzapoint::model::DiacriticModel;
//! use hamzapoint::predict::Predictor;
//!
//! let texts = corpus::load_corpus("corpus/")?;
//! let dataset = corpus::extract_dataset(&texts);
//!
//! let model = DiacriticModel::load_or_train("hamza_model.bin", &dataset)?;
//! let predictor = Predictor::new(model);
//!
//! println!("{}", predictor.predict("النبإ"));
//! # Ok::<(), hamzapoint::Error>(())
//! ```
//!
//! Extract labeled examples from a single document:
//!
//! ```
//! use hamzapoint::extract::process_document;
//!
//! let examples = process_document("نبأَ كتب");
//! assert_eq!(examples.len(), 1);
//! assert_eq!(examples[0].label, '\u{064E}');
//! ```

use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub mod arabic;
pub mod corpus;
pub mod extract;
pub mod model;
pub mod predict;

#[derive(Error, Debug)]
#[allow(missing_docs)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] io::Error),
    /// (De)serialization error. Can have occured during deserialization or during serialization.
    #[error(transparent)]
    Serialization(#[from] bincode::Error),
    #[error("no text documents found in corpus directory '{}'", .0.display())]
    EmptyCorpus(PathBuf),
    #[error("corpus yielded no labeled Hamza examples; refusing to train an empty model")]
    EmptyDataset,
}
