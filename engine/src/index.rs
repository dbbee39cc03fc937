use anyhow::{ensure, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

pub type DocId = u32;
pub type Position = u32;

/// Where a term occurs: document id -> set of token positions.
///
/// Positions are 0-based offsets into the document's token stream as it was
/// enumerated at build time, before stopword removal, so the distance
/// between two surviving terms always reflects the source text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostingList {
    docs: HashMap<DocId, BTreeSet<Position>>,
}

impl PostingList {
    pub fn doc_set(&self) -> HashSet<DocId> {
        self.docs.keys().copied().collect()
    }

    pub fn contains(&self, doc: DocId) -> bool {
        self.docs.contains_key(&doc)
    }

    pub fn positions(&self, doc: DocId) -> Option<&BTreeSet<Position>> {
        self.docs.get(&doc)
    }

    pub fn iter(&self) -> impl Iterator<Item = (DocId, &BTreeSet<Position>)> {
        self.docs.iter().map(|(doc, positions)| (*doc, positions))
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }
}

/// Positional inverted index: term -> posting list. Insert-only, so an
/// indexed term always owns at least one document and position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionalIndex {
    postings: HashMap<String, PostingList>,
}

impl PositionalIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, term: String, doc: DocId, position: Position) {
        self.postings
            .entry(term)
            .or_default()
            .docs
            .entry(doc)
            .or_default()
            .insert(position);
    }

    pub fn postings(&self, term: &str) -> Option<&PostingList> {
        self.postings.get(term)
    }

    pub fn contains_term(&self, term: &str) -> bool {
        self.postings.contains_key(term)
    }

    /// Empty when the term is unindexed.
    pub fn doc_set(&self, term: &str) -> HashSet<DocId> {
        self.postings
            .get(term)
            .map(PostingList::doc_set)
            .unwrap_or_default()
    }

    pub fn num_terms(&self) -> usize {
        self.postings.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentEntry {
    pub file_name: String,
    /// First line of the source file; carried for display, never indexed.
    pub title: String,
}

/// Document-id table, immutable once built. Its key set is the universe
/// that `NOT` complements against.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentTable {
    docs: BTreeMap<DocId, DocumentEntry>,
}

impl DocumentTable {
    pub fn insert(&mut self, doc: DocId, entry: DocumentEntry) {
        self.docs.insert(doc, entry);
    }

    pub fn get(&self, doc: DocId) -> Option<&DocumentEntry> {
        self.docs.get(&doc)
    }

    pub fn contains(&self, doc: DocId) -> bool {
        self.docs.contains_key(&doc)
    }

    pub fn ids(&self) -> HashSet<DocId> {
        self.docs.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }
}

/// The index and its document table, always moved as one unit so a reader
/// can never pair a fresh index with a stale table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub index: PositionalIndex,
    pub documents: DocumentTable,
}

impl Snapshot {
    pub fn new(index: PositionalIndex, documents: DocumentTable) -> Self {
        Self { index, documents }
    }

    /// Re-check the structural invariants after an untrusted load: no empty
    /// posting lists or position sets, and every posted document present in
    /// the table.
    pub fn validate(&self) -> Result<()> {
        for (term, list) in &self.index.postings {
            ensure!(!list.is_empty(), "term {term:?} has an empty posting list");
            for (doc, positions) in &list.docs {
                ensure!(
                    !positions.is_empty(),
                    "term {term:?} maps document {doc} to an empty position set"
                );
                ensure!(
                    self.documents.contains(*doc),
                    "term {term:?} posts to document {doc}, which the table does not know"
                );
            }
        }
        Ok(())
    }
}
