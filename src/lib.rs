pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::AppConfig;

pub use adapters::InMemoryStore;
pub use core::{
    conflict::ConflictChecker, engine::ContactEngine, importer::Importer,
    nickname::NicknameExpander,
};
pub use domain::model::{
    CandidateContact, Category, ConflictReport, ImportReport, MatchResult,
    NormalizedContactCandidate, SearchFilters, SearchOutcome,
};
pub use utils::error::{CrmError, Result};
