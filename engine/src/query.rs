use crate::boolean::{evaluate_postfix, parse_boolean};
use crate::error::QueryError;
use crate::index::{DocId, Snapshot};
use crate::normalize::TermNormalizer;
use crate::phrase::evaluate_phrase;
use crate::proximity::{evaluate_proximity, parse_proximity};
use crate::tokenize::tokenize;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

lazy_static! {
    static ref BOOLEAN: Regex = Regex::new(r"\b(AND|OR|NOT)\b").expect("valid regex");
    static ref PROXIMITY: Regex = Regex::new(r"/\d+").expect("valid regex");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryKind {
    Boolean,
    Proximity,
    Phrase,
}

/// Decide how to interpret `query`. A whole-word uppercase operator makes it
/// boolean, else a `/k` marker makes it proximity, else it is a phrase.
/// Boolean wins, so `alpha AND beta /3 gamma` is boolean.
pub fn classify(query: &str) -> QueryKind {
    if BOOLEAN.is_match(query) {
        QueryKind::Boolean
    } else if PROXIMITY.is_match(query) {
        QueryKind::Proximity
    } else {
        QueryKind::Phrase
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchedDocument {
    pub doc_id: DocId,
    pub file_name: String,
    pub title: String,
}

/// How the query was interpreted and what matched, in ascending id order.
#[derive(Debug, Clone, Serialize)]
pub struct QueryOutcome {
    pub kind: QueryKind,
    pub matches: Vec<MatchedDocument>,
}

impl QueryOutcome {
    pub fn doc_ids(&self) -> Vec<DocId> {
        self.matches.iter().map(|m| m.doc_id).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }
}

/// Classify and run one query against a snapshot.
pub fn execute(
    query: &str,
    snapshot: &Snapshot,
    normalizer: &dyn TermNormalizer,
) -> Result<QueryOutcome, QueryError> {
    let kind = classify(query);
    let doc_ids = match kind {
        QueryKind::Boolean => {
            let postfix = parse_boolean(query, normalizer)?;
            let universe = snapshot.documents.ids();
            evaluate_postfix(&postfix, &snapshot.index, &universe)?
        }
        QueryKind::Proximity => {
            let proximity = parse_proximity(query, normalizer)?;
            evaluate_proximity(&proximity, &snapshot.index)
        }
        QueryKind::Phrase => {
            let terms: Vec<String> = tokenize(query)
                .into_iter()
                .map(|token| normalizer.normalize(token))
                .collect();
            evaluate_phrase(&terms, &snapshot.index)
        }
    };

    let mut ids: Vec<DocId> = doc_ids.into_iter().collect();
    ids.sort_unstable();
    let matches = ids
        .into_iter()
        .filter_map(|doc_id| {
            snapshot.documents.get(doc_id).map(|entry| MatchedDocument {
                doc_id,
                file_name: entry.file_name.clone(),
                title: entry.title.clone(),
            })
        })
        .collect();
    Ok(QueryOutcome { kind, matches })
}
