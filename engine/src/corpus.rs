use crate::index::DocId;
use anyhow::{bail, ensure, Context, Result};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Stopword list loaded from a whitespace-delimited file. Entries are kept
/// verbatim; they are compared against normalized terms, so a list meant for
/// a stemming pipeline must itself contain the stemmed forms.
#[derive(Debug, Clone, Default)]
pub struct StopwordSet {
    words: HashSet<String>,
}

impl StopwordSet {
    pub fn from_source(source: &str) -> Self {
        Self {
            words: source.split_whitespace().map(str::to_owned).collect(),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let source = fs::read_to_string(path)
            .with_context(|| format!("reading stopword file {}", path.display()))?;
        Ok(Self::from_source(&source))
    }

    pub fn contains(&self, term: &str) -> bool {
        self.words.contains(term)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusDocument {
    pub id: DocId,
    pub file_name: String,
    /// First line of the file, display-only.
    pub title: String,
    /// Everything after the first line; this is what gets indexed.
    pub body: String,
}

#[derive(Debug, Default)]
pub struct CorpusScan {
    pub documents: Vec<CorpusDocument>,
    /// Files that were skipped (undecodable, unnumbered, duplicate id).
    pub skipped: usize,
}

/// Extract the document id from a file name: the first run of ASCII digits,
/// parsed as u32. `speech_17.txt` -> 17, `notes.txt` -> None.
pub fn doc_id_from_name(name: &str) -> Option<DocId> {
    let start = name.find(|c: char| c.is_ascii_digit())?;
    let digits: String = name[start..]
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().ok()
}

/// Walk `dir` for `*.txt` files and load each one. Files that cannot be
/// loaded, carry no id, or collide with an already-seen id are skipped with
/// a warning rather than aborting the scan. Paths are visited in sorted
/// order, so duplicate-id resolution is deterministic.
pub fn scan_corpus(dir: &Path) -> Result<CorpusScan> {
    ensure!(dir.is_dir(), "corpus path {} is not a directory", dir.display());

    let mut paths: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry.file_type().is_file()
                && entry.path().extension().map_or(false, |ext| ext == "txt")
        })
        .map(|entry| entry.into_path())
        .collect();
    paths.sort();

    let mut scan = CorpusScan::default();
    let mut seen = HashSet::new();
    for path in paths {
        let document = match load_document(&path) {
            Ok(document) => document,
            Err(error) => {
                tracing::warn!(path = %path.display(), %error, "skipping corpus file");
                scan.skipped += 1;
                continue;
            }
        };
        if !seen.insert(document.id) {
            tracing::warn!(
                path = %path.display(),
                doc_id = document.id,
                "skipping corpus file, document id already taken"
            );
            scan.skipped += 1;
            continue;
        }
        scan.documents.push(document);
    }
    Ok(scan)
}

/// Load a single corpus file: id from the file name, title from the first
/// line, body from the rest. A file without a line break is all title.
pub fn load_document(path: &Path) -> Result<CorpusDocument> {
    let file_name = match path.file_name().and_then(|name| name.to_str()) {
        Some(name) => name.to_owned(),
        None => bail!("file name of {} is not valid UTF-8", path.display()),
    };
    let id = doc_id_from_name(&file_name)
        .with_context(|| format!("no document id in file name {file_name:?}"))?;

    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let text = String::from_utf8(bytes)
        .map_err(|_| anyhow::anyhow!("{} is not valid UTF-8", path.display()))?;

    let (title, body) = match text.split_once('\n') {
        Some((first, rest)) => (first, rest),
        None => (text.as_str(), ""),
    };
    Ok(CorpusDocument {
        id,
        file_name,
        title: title.trim_end_matches('\r').trim().to_owned(),
        body: body.to_owned(),
    })
}
