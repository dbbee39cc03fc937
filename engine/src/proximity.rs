use crate::error::QueryError;
use crate::index::{DocId, PositionalIndex};
use crate::normalize::TermNormalizer;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;

lazy_static! {
    static ref SHAPE: Regex =
        Regex::new(r"^\s*(\w+)\s+/(\d+)\s+(\w+)\s*$").expect("valid regex");
}

/// A parsed `term /k term` query. `distance` is the required position gap,
/// k + 1: `/0` means adjacent tokens, `/1` means exactly one token between.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProximityQuery {
    pub term1: String,
    pub term2: String,
    pub distance: u32,
}

/// Parse a proximity query. The shape is strict: exactly two word tokens
/// around a `/k` marker, nothing else.
pub fn parse_proximity(
    query: &str,
    normalizer: &dyn TermNormalizer,
) -> Result<ProximityQuery, QueryError> {
    let caps = SHAPE.captures(query).ok_or(QueryError::MalformedProximity)?;
    let k: u32 = caps[2].parse().map_err(|_| QueryError::MalformedProximity)?;
    let distance = k.checked_add(1).ok_or(QueryError::MalformedProximity)?;
    Ok(ProximityQuery {
        term1: normalizer.normalize(&caps[1]),
        term2: normalizer.normalize(&caps[3]),
        distance,
    })
}

/// Find documents where the two terms occur exactly `distance` positions
/// apart, in either order. Both terms must be indexed and co-occur in the
/// document.
pub fn evaluate_proximity(query: &ProximityQuery, index: &PositionalIndex) -> HashSet<DocId> {
    let mut result = HashSet::new();
    let list1 = match index.postings(&query.term1) {
        Some(list) => list,
        None => return result,
    };
    let list2 = match index.postings(&query.term2) {
        Some(list) => list,
        None => return result,
    };
    for (doc, positions1) in list1.iter() {
        let positions2 = match list2.positions(doc) {
            Some(positions) => positions,
            None => continue,
        };
        let hit = positions1
            .iter()
            .any(|&p1| positions2.iter().any(|&p2| p1.abs_diff(p2) == query.distance));
        if hit {
            result.insert(doc);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::IndexBuilder;
    use crate::corpus::StopwordSet;
    use crate::normalize::CaseFolder;

    fn parse(query: &str) -> Result<ProximityQuery, QueryError> {
        parse_proximity(query, &CaseFolder)
    }

    #[test]
    fn parses_strict_shape() {
        let query = parse("alpha /2 beta").unwrap();
        assert_eq!(query.term1, "alpha");
        assert_eq!(query.term2, "beta");
        assert_eq!(query.distance, 3);
    }

    #[test]
    fn normalizes_both_terms() {
        let query = parse("  Alpha /0 BETA ").unwrap();
        assert_eq!(query.term1, "alpha");
        assert_eq!(query.term2, "beta");
        assert_eq!(query.distance, 1);
    }

    #[test]
    fn rejects_off_shape_queries() {
        assert_eq!(parse("alpha /2"), Err(QueryError::MalformedProximity));
        assert_eq!(parse("/2 beta"), Err(QueryError::MalformedProximity));
        assert_eq!(parse("alpha / 2 beta"), Err(QueryError::MalformedProximity));
        assert_eq!(
            parse("alpha /2 beta gamma"),
            Err(QueryError::MalformedProximity)
        );
        assert_eq!(parse("alpha /x beta"), Err(QueryError::MalformedProximity));
    }

    #[test]
    fn rejects_unrepresentable_distance() {
        assert_eq!(
            parse("alpha /4294967295 beta"),
            Err(QueryError::MalformedProximity)
        );
    }

    #[test]
    fn matches_exact_distance_in_either_order() {
        let builder = IndexBuilder::new(CaseFolder, StopwordSet::default());
        let index = builder.build(vec![
            (1, "alpha x beta".to_owned()),
            (2, "beta x alpha".to_owned()),
            (3, "alpha beta".to_owned()),
            (4, "alpha x y beta".to_owned()),
        ]);
        let query = parse("alpha /1 beta").unwrap();
        // distance 2 exactly, both directions; adjacency and wider gaps miss.
        assert_eq!(evaluate_proximity(&query, &index), HashSet::from([1, 2]));
    }

    #[test]
    fn both_terms_must_share_the_document() {
        let builder = IndexBuilder::new(CaseFolder, StopwordSet::default());
        let index = builder.build(vec![
            (1, "alpha only here".to_owned()),
            (2, "beta only here".to_owned()),
        ]);
        let query = parse("alpha /1 beta").unwrap();
        assert!(evaluate_proximity(&query, &index).is_empty());
    }
}
