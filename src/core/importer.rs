use crate::core::formatters::format_contact;
use crate::domain::model::{ContactFields, ImportReport, NormalizedContactCandidate};
use crate::domain::ports::ContactStore;
use crate::utils::error::{CrmError, Result};
use std::collections::HashMap;
use thiserror::Error;

/// Why a single import row was rejected.
#[derive(Error, Debug)]
pub enum RowError {
    #[error("Missing {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("Salesperson \"{0}\" not found")]
    SalespersonNotFound(String),

    #[error("{}", store_reason(.0))]
    Store(#[from] CrmError),
}

fn store_reason(err: &CrmError) -> String {
    match err {
        CrmError::StoreError { message } => message.clone(),
        other => other.to_string(),
    }
}

impl RowError {
    /// `Row <n> "<name>": <reason>`, or `Row <n>: <reason>` for nameless rows.
    pub fn describe(&self, row: &NormalizedContactCandidate) -> String {
        if row.name.is_empty() {
            format!("Row {}: {}", row.row_number, self)
        } else {
            format!("Row {} \"{}\": {}", row.row_number, row.name, self)
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    /// Capitalise names, companies, branches and addresses before writing.
    pub format_contacts: bool,
}

pub struct Importer<'a, S: ContactStore> {
    store: &'a S,
    options: ImportOptions,
}

impl<'a, S: ContactStore> Importer<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            options: ImportOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ImportOptions) -> Self {
        self.options = options;
        self
    }

    /// Imports every previewed row independently. Row failures are tallied, not returned.
    pub async fn run(&self, rows: &[NormalizedContactCandidate]) -> Result<ImportReport> {
        let started_at = chrono::Utc::now();

        let salespeople: HashMap<String, String> = self
            .store
            .active_salespeople()
            .await?
            .into_iter()
            .filter(|sp| sp.is_active)
            .map(|sp| (sp.name.trim().to_lowercase(), sp.id))
            .collect();

        let mut success = 0;
        let mut errors = Vec::new();

        for row in rows {
            match self.import_row(row, &salespeople).await {
                Ok(()) => success += 1,
                Err(e) => {
                    let message = e.describe(row);
                    tracing::warn!("{}", message);
                    errors.push(message);
                }
            }
        }

        let report = ImportReport {
            success,
            failed: errors.len(),
            errors,
            started_at,
            finished_at: chrono::Utc::now(),
        };
        tracing::info!(
            "Import finished: {} succeeded, {} failed",
            report.success,
            report.failed
        );
        Ok(report)
    }

    async fn import_row(
        &self,
        row: &NormalizedContactCandidate,
        salespeople: &HashMap<String, String>,
    ) -> std::result::Result<(), RowError> {
        let category = match row.category {
            Some(category) if !row.name.is_empty() => category,
            _ => return Err(RowError::MissingFields(row.missing_fields())),
        };

        let salesperson_id = match row.salesperson.as_deref() {
            Some(name) => match salespeople.get(&name.trim().to_lowercase()) {
                Some(id) => Some(id.as_str()),
                None => return Err(RowError::SalespersonNotFound(name.to_string())),
            },
            None => None,
        };

        let mut fields = ContactFields {
            name: row.name.clone(),
            category,
            email: row.email.clone(),
            phone: row.phone.clone(),
            company: row.company.clone(),
            branch: row.branch.clone(),
            address: row.address.clone(),
            drinks: row.drinks,
        };
        if self.options.format_contacts {
            format_contact(&mut fields);
        }

        let contact_id = match self.store.find_duplicate(&row.name).await? {
            Some(existing) => {
                tracing::debug!("Row {}: updating existing contact {}", row.row_number, existing);
                self.store.update_contact(&existing, &fields).await?;
                existing
            }
            None => {
                fields.drinks = Some(fields.drinks.unwrap_or(true));
                self.store.insert_contact(&fields).await?
            }
        };

        // The contact is already written; a failed assignment doesn't fail the row
        if let Some(salesperson_id) = salesperson_id {
            if let Err(e) = self.store.assign(&contact_id, salesperson_id).await {
                tracing::warn!(
                    "Row {} \"{}\": saved but not assigned: {}",
                    row.row_number,
                    row.name,
                    store_reason(&e)
                );
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{CandidateContact, Category, SalesPerson};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Rejects inserts for one name; optionally fails the salesperson fetch or assignments.
    #[derive(Default)]
    struct FlakyStore {
        reject_name: String,
        fail_salespeople: bool,
        fail_assign: bool,
        inserted: Mutex<Vec<String>>,
        assigned: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ContactStore for FlakyStore {
        async fn candidates(&self) -> Result<Vec<CandidateContact>> {
            Ok(Vec::new())
        }

        async fn active_salespeople(&self) -> Result<Vec<SalesPerson>> {
            if self.fail_salespeople {
                return Err(CrmError::store("salespeople unavailable"));
            }
            Ok(vec![SalesPerson {
                id: "s1".to_string(),
                name: "Dana".to_string(),
                is_active: true,
            }])
        }

        async fn find_duplicate(&self, _name: &str) -> Result<Option<String>> {
            Ok(None)
        }

        async fn update_contact(&self, _contact_id: &str, _fields: &ContactFields) -> Result<()> {
            Ok(())
        }

        async fn insert_contact(&self, fields: &ContactFields) -> Result<String> {
            if fields.name == self.reject_name {
                return Err(CrmError::store("duplicate key"));
            }
            self.inserted.lock().unwrap().push(fields.name.clone());
            Ok(fields.name.clone())
        }

        async fn assign(&self, contact_id: &str, _salesperson_id: &str) -> Result<()> {
            if self.fail_assign {
                return Err(CrmError::store("assign failed"));
            }
            self.assigned.lock().unwrap().push(contact_id.to_string());
            Ok(())
        }
    }

    fn row(number: usize, name: &str, category: Option<Category>) -> NormalizedContactCandidate {
        NormalizedContactCandidate {
            row_number: number,
            name: name.to_string(),
            raw_category: String::new(),
            category,
            email: None,
            phone: None,
            company: None,
            branch: None,
            address: None,
            salesperson: None,
            drinks: None,
        }
    }

    #[test]
    fn test_row_error_messages() {
        let nameless = row(4, "", None);
        let err = RowError::MissingFields(nameless.missing_fields());
        assert_eq!(
            err.describe(&nameless),
            "Row 4: Missing name, type (or invalid type value)"
        );

        let named = row(2, "Jane Doe", None);
        let err = RowError::MissingFields(named.missing_fields());
        assert_eq!(
            err.describe(&named),
            "Row 2 \"Jane Doe\": Missing type (or invalid type value)"
        );

        let err = RowError::SalespersonNotFound("Zed".to_string());
        assert_eq!(
            err.describe(&named),
            "Row 2 \"Jane Doe\": Salesperson \"Zed\" not found"
        );

        let err = RowError::from(CrmError::store("duplicate key"));
        assert_eq!(err.describe(&named), "Row 2 \"Jane Doe\": duplicate key");

        let err = RowError::from(CrmError::ValidationError {
            message: "bad row".to_string(),
        });
        assert_eq!(
            err.describe(&named),
            "Row 2 \"Jane Doe\": Validation error: bad row"
        );
    }

    #[tokio::test]
    async fn test_store_failure_is_isolated_to_its_row() {
        let store = FlakyStore {
            reject_name: "Bo Li".to_string(),
            ..Default::default()
        };
        let rows = vec![
            row(2, "Ann Roe", Some(Category::Buyer)),
            row(3, "Bo Li", Some(Category::Buyer)),
            row(4, "Cy Day", Some(Category::Lender)),
        ];

        let report = Importer::new(&store).run(&rows).await.unwrap();
        assert_eq!(report.success, 2);
        assert_eq!(report.failed, 1);
        assert_eq!(
            report.errors,
            vec!["Row 3 \"Bo Li\": duplicate key".to_string()]
        );
        assert_eq!(*store.inserted.lock().unwrap(), vec!["Ann Roe", "Cy Day"]);
    }

    #[tokio::test]
    async fn test_salespeople_fetch_failure_aborts_run() {
        let store = FlakyStore {
            fail_salespeople: true,
            ..Default::default()
        };
        let rows = vec![row(2, "Ann Roe", Some(Category::Buyer))];

        let result = Importer::new(&store).run(&rows).await;
        assert!(matches!(result, Err(CrmError::StoreError { .. })));
        assert!(store.inserted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_assignment_failure_still_counts_saved_row() {
        let store = FlakyStore {
            fail_assign: true,
            ..Default::default()
        };
        let mut jane = row(2, "Jane Doe", Some(Category::Buyer));
        jane.salesperson = Some(" dana ".to_string());

        let report = Importer::new(&store).run(&[jane]).await.unwrap();
        assert_eq!(report.success, 1);
        assert_eq!(report.failed, 0);
        assert!(report.errors.is_empty());
        assert_eq!(*store.inserted.lock().unwrap(), vec!["Jane Doe"]);
        assert!(store.assigned.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_resolved_salesperson_is_assigned() {
        let store = FlakyStore::default();
        let mut jane = row(2, "Jane Doe", Some(Category::Buyer));
        jane.salesperson = Some("DANA".to_string());

        let report = Importer::new(&store).run(&[jane]).await.unwrap();
        assert_eq!(report.success, 1);
        assert_eq!(*store.assigned.lock().unwrap(), vec!["Jane Doe"]);
    }
}
