use thiserror::Error;

/// User-visible query failures. An unindexed term or an empty result is not
/// an error; these cover queries the engine cannot evaluate at all.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("malformed boolean expression: {0}")]
    MalformedExpression(&'static str),
    #[error("malformed proximity query: expected `term /k term`")]
    MalformedProximity,
}
