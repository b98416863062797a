pub mod conflict;
pub mod csv_import;
pub mod engine;
pub mod formatters;
pub mod importer;
pub mod matcher;
pub mod nickname;
pub mod similarity;

pub use crate::domain::model::{
    CandidateContact, Category, MatchResult, NormalizedContactCandidate, SearchFilters,
    SearchOutcome,
};
pub use crate::domain::ports::ContactStore;
pub use crate::utils::error::Result;
