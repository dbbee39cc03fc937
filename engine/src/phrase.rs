use crate::index::{DocId, Position, PositionalIndex, PostingList};
use std::collections::{BTreeSet, HashSet};

/// Find documents containing `terms` as consecutive tokens, in order.
///
/// Each term's positions are shifted back by the term's ordinal in the
/// phrase; intersecting the shifted sets leaves exactly the positions where
/// the whole phrase lines up. Removed stopwords leave gaps in the position
/// sequence, so a phrase does not match across one.
pub fn evaluate_phrase(terms: &[String], index: &PositionalIndex) -> HashSet<DocId> {
    let mut result = HashSet::new();
    if terms.is_empty() {
        return result;
    }

    let mut lists: Vec<&PostingList> = Vec::with_capacity(terms.len());
    for term in terms {
        match index.postings(term) {
            Some(list) => lists.push(list),
            // One unindexed term sinks the whole phrase.
            None => return result,
        }
    }

    let mut candidates = lists[0].doc_set();
    for list in &lists[1..] {
        candidates.retain(|doc| list.contains(*doc));
    }
    if candidates.is_empty() {
        return result;
    }

    'docs: for doc in candidates {
        let mut aligned: BTreeSet<Position> = match lists[0].positions(doc) {
            Some(positions) => positions.clone(),
            None => continue,
        };
        for (ordinal, list) in lists.iter().enumerate().skip(1) {
            let shifted: BTreeSet<Position> = match list.positions(doc) {
                Some(positions) => positions
                    .iter()
                    // A position smaller than the ordinal cannot start a
                    // phrase; drop it instead of wrapping.
                    .filter_map(|p| p.checked_sub(ordinal as Position))
                    .collect(),
                None => continue 'docs,
            };
            aligned = &aligned & &shifted;
            if aligned.is_empty() {
                continue 'docs;
            }
        }
        result.insert(doc);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::IndexBuilder;
    use crate::corpus::StopwordSet;
    use crate::normalize::CaseFolder;

    fn index(docs: Vec<(u32, &str)>) -> PositionalIndex {
        let builder = IndexBuilder::new(CaseFolder, StopwordSet::default());
        builder.build(docs.into_iter().map(|(id, body)| (id, body.to_owned())))
    }

    fn phrase(terms: &[&str]) -> Vec<String> {
        terms.iter().map(|t| (*t).to_owned()).collect()
    }

    #[test]
    fn matches_only_adjacent_in_order() {
        let index = index(vec![
            (1, "alpha beta gamma"),
            (2, "beta alpha"),
            (3, "alpha gamma beta"),
        ]);
        let hits = evaluate_phrase(&phrase(&["alpha", "beta"]), &index);
        assert_eq!(hits, HashSet::from([1]));
    }

    #[test]
    fn reversed_phrase_matches_reversed_text() {
        let index = index(vec![(1, "alpha beta"), (2, "beta alpha")]);
        let hits = evaluate_phrase(&phrase(&["beta", "alpha"]), &index);
        assert_eq!(hits, HashSet::from([2]));
    }

    #[test]
    fn repeated_word_phrase() {
        let index = index(vec![(1, "buffalo buffalo buffalo"), (2, "buffalo alone")]);
        let hits = evaluate_phrase(&phrase(&["buffalo", "buffalo"]), &index);
        assert_eq!(hits, HashSet::from([1]));
    }

    #[test]
    fn unindexed_term_empties_the_result() {
        let index = index(vec![(1, "alpha beta")]);
        assert!(evaluate_phrase(&phrase(&["alpha", "zeta"]), &index).is_empty());
        assert!(evaluate_phrase(&[], &index).is_empty());
    }

    #[test]
    fn single_term_phrase_is_the_doc_set() {
        let index = index(vec![(1, "alpha beta"), (2, "gamma"), (3, "alpha")]);
        let hits = evaluate_phrase(&phrase(&["alpha"]), &index);
        assert_eq!(hits, HashSet::from([1, 3]));
    }
}
