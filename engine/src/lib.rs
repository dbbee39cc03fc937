pub mod boolean;
pub mod builder;
pub mod corpus;
pub mod error;
pub mod index;
pub mod normalize;
pub mod persist;
pub mod phrase;
pub mod proximity;
pub mod query;
pub mod tokenize;

pub use builder::IndexBuilder;
pub use corpus::{scan_corpus, CorpusDocument, StopwordSet};
pub use error::QueryError;
pub use index::{DocId, DocumentEntry, DocumentTable, Position, PositionalIndex, Snapshot};
pub use normalize::{CaseFolder, EnglishNormalizer, TermNormalizer};
pub use persist::{load_snapshot, save_snapshot, IndexPaths, SnapshotMeta, SNAPSHOT_VERSION};
pub use query::{classify, execute, MatchedDocument, QueryKind, QueryOutcome};
