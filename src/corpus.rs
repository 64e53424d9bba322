//! Loading a corpus of diacritized text files and running the extraction pass over it.

use std::path::Path;
use std::time::Instant;

use fs_err as fs;
use log::info;
use rayon::prelude::*;

use crate::extract::{process_document, LabeledExample};

/// Reads every `*.txt` file in `dir` as one UTF-8 document. Other files are ignored.
/// Entries are sorted by file name so the dataset order is stable across runs.
///
/// Fails if the directory is unreadable or contains no text documents.
pub fn load_corpus<P: AsRef<Path>>(dir: P) -> Result<Vec<String>, crate::Error> {
    let dir = dir.as_ref();

    let mut paths = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().map_or(false, |ext| ext == "txt") {
            paths.push(path);
        }
    }
    paths.sort();

    if paths.is_empty() {
        return Err(crate::Error::EmptyCorpus(dir.to_owned()));
    }

    paths
        .into_iter()
        .map(|path| Ok(fs::read_to_string(path)?))
        .collect()
}

/// Fans [process_document] out over a worker pool and flattens the per-document
/// batches into one dataset.
///
/// Batches line up positionally with the input documents and keep their internal
/// order; the workers share no mutable state. A panicking worker aborts the whole
/// pass instead of silently dropping its document.
pub fn extract_dataset(texts: &[String]) -> Vec<LabeledExample> {
    let start = Instant::now();

    let batches: Vec<Vec<LabeledExample>> = texts
        .par_iter()
        .map(|text| process_document(text))
        .collect();

    let dataset: Vec<LabeledExample> = batches.into_iter().flatten().collect();

    info!(
        "extracted {} labeled examples from {} documents in {:.2?}",
        dataset.len(),
        texts.len(),
        start.elapsed()
    );

    dataset
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_corpus(files: &[(&str, &str)]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for (name, content) in files {
            let mut file = std::fs::File::create(dir.path().join(name)).unwrap();
            file.write_all(content.as_bytes()).unwrap();
        }
        dir
    }

    #[test]
    fn empty_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_corpus(dir.path()),
            Err(crate::Error::EmptyCorpus(_))
        ));
    }

    #[test]
    fn missing_directory_is_an_error() {
        assert!(matches!(
            load_corpus("/nonexistent/corpus/dir"),
            Err(crate::Error::Io(_))
        ));
    }

    #[test]
    fn only_text_files_are_loaded() {
        let dir = write_corpus(&[("a.txt", "نبأَ"), ("b.bin", "ignored"), ("c.txt", "سأَل")]);
        let texts = load_corpus(dir.path()).unwrap();
        assert_eq!(texts, vec!["نبأَ".to_string(), "سأَل".to_string()]);
    }

    #[test]
    fn dataset_batches_line_up_with_documents() {
        let texts = vec!["نبأَ كتب".to_string(), "كتب".to_string(), "سأَل".to_string()];
        let dataset = extract_dataset(&texts);

        assert_eq!(dataset.len(), 2);
        // First document's example first, middle document contributes nothing.
        assert_eq!(dataset[0].context.before, Some('ب'));
        assert_eq!(dataset[1].context.before, Some('س'));
    }
}
