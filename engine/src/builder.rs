use crate::corpus::{CorpusDocument, StopwordSet};
use crate::index::{DocId, DocumentEntry, DocumentTable, Position, PositionalIndex, Snapshot};
use crate::normalize::TermNormalizer;
use crate::tokenize::tokenize;

/// Builds a positional index from document bodies. Tokens are numbered
/// before stopword filtering, so dropping a stopword leaves a gap in the
/// position sequence instead of shifting later terms.
pub struct IndexBuilder<N> {
    normalizer: N,
    stopwords: StopwordSet,
}

impl<N: TermNormalizer> IndexBuilder<N> {
    pub fn new(normalizer: N, stopwords: StopwordSet) -> Self {
        Self {
            normalizer,
            stopwords,
        }
    }

    /// Index an iterator of `(doc id, body)` pairs.
    pub fn build<I>(&self, corpus: I) -> PositionalIndex
    where
        I: IntoIterator<Item = (DocId, String)>,
    {
        let mut index = PositionalIndex::new();
        for (doc, body) in corpus {
            self.index_document(&mut index, doc, &body);
        }
        index
    }

    /// Index loaded corpus documents and pair the result with their table.
    /// Titles go into the table only; bodies are what gets indexed.
    pub fn build_snapshot(&self, documents: Vec<CorpusDocument>) -> Snapshot {
        let mut index = PositionalIndex::new();
        let mut table = DocumentTable::default();
        for document in documents {
            self.index_document(&mut index, document.id, &document.body);
            table.insert(
                document.id,
                DocumentEntry {
                    file_name: document.file_name,
                    title: document.title,
                },
            );
        }
        Snapshot::new(index, table)
    }

    fn index_document(&self, index: &mut PositionalIndex, doc: DocId, body: &str) {
        for (position, token) in tokenize(body).into_iter().enumerate() {
            let term = self.normalizer.normalize(token);
            if self.stopwords.contains(&term) {
                continue;
            }
            index.insert(term, doc, position as Position);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::CaseFolder;

    #[test]
    fn positions_survive_stopword_removal() {
        let builder = IndexBuilder::new(CaseFolder, StopwordSet::from_source("the"));
        let index = builder.build(vec![(1, "Alpha the beta".to_owned())]);

        assert!(!index.contains_term("the"));
        let alpha = index.postings("alpha").unwrap().positions(1).unwrap();
        let beta = index.postings("beta").unwrap().positions(1).unwrap();
        assert_eq!(alpha.iter().copied().collect::<Vec<_>>(), vec![0]);
        // "the" held position 1; beta keeps position 2.
        assert_eq!(beta.iter().copied().collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    fn repeated_terms_collect_all_positions() {
        let builder = IndexBuilder::new(CaseFolder, StopwordSet::default());
        let index = builder.build(vec![(7, "echo echo ECHO".to_owned())]);

        let echo = index.postings("echo").unwrap().positions(7).unwrap();
        assert_eq!(echo.iter().copied().collect::<Vec<_>>(), vec![0, 1, 2]);
    }

    #[test]
    fn snapshot_indexes_bodies_but_not_titles() {
        let builder = IndexBuilder::new(CaseFolder, StopwordSet::default());
        let snapshot = builder.build_snapshot(vec![CorpusDocument {
            id: 3,
            file_name: "speech_3.txt".to_owned(),
            title: "Unindexed Headline".to_owned(),
            body: "indexed words".to_owned(),
        }]);

        assert!(snapshot.index.contains_term("indexed"));
        assert!(!snapshot.index.contains_term("unindexed"));
        assert!(!snapshot.index.contains_term("headline"));
        assert_eq!(snapshot.documents.get(3).unwrap().title, "Unindexed Headline");
    }
}
