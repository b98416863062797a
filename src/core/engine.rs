use crate::core::conflict::ConflictChecker;
use crate::core::csv_import;
use crate::core::importer::{ImportOptions, Importer};
use crate::core::matcher;
use crate::core::nickname::NicknameExpander;
use crate::domain::model::{
    ConflictReport, ImportReport, NormalizedContactCandidate, SearchFilters, SearchOutcome,
};
use crate::domain::ports::ContactStore;
use crate::utils::error::Result;

/// Ties the matching core to a contact store.
pub struct ContactEngine<S: ContactStore> {
    store: S,
    expander: NicknameExpander,
    import_options: ImportOptions,
}

impl<S: ContactStore> ContactEngine<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            expander: NicknameExpander::embedded(),
            import_options: ImportOptions::default(),
        }
    }

    pub fn with_expander(mut self, expander: NicknameExpander) -> Self {
        self.expander = expander;
        self
    }

    pub fn with_import_options(mut self, options: ImportOptions) -> Self {
        self.import_options = options;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn expander(&self) -> &NicknameExpander {
        &self.expander
    }

    /// Fuzzy search by category. Blank filters never touch the store.
    pub async fn search(&self, filters: &SearchFilters) -> Result<SearchOutcome> {
        if filters.is_empty() {
            return Ok(SearchOutcome::default());
        }
        let candidates = self.store.candidates().await?;
        Ok(matcher::search(filters, &candidates))
    }

    pub async fn conflict_check(&self, term: &str) -> Result<ConflictReport> {
        let checker = ConflictChecker::new(&self.expander);
        if term.trim().is_empty() {
            return Ok(checker.check(term, &[]));
        }
        let candidates = self.store.candidates().await?;
        Ok(checker.check(term, &candidates))
    }

    pub fn preview(&self, raw_csv: &str) -> Result<Vec<NormalizedContactCandidate>> {
        csv_import::preview(raw_csv)
    }

    pub async fn import(&self, rows: &[NormalizedContactCandidate]) -> Result<ImportReport> {
        Importer::new(&self.store)
            .with_options(self.import_options.clone())
            .run(rows)
            .await
    }
}
