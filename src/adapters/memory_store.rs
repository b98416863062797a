use crate::domain::model::{duplicate_key, CandidateContact, ContactFields, SalesPerson};
use crate::domain::ports::ContactStore;
use crate::utils::error::{CrmError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tokio::sync::RwLock;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredContact {
    pub id: String,
    #[serde(flatten)]
    pub fields: ContactFields,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub contact_id: String,
    pub salesperson_id: String,
}

/// Serializable contents of the store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub contacts: Vec<StoredContact>,
    #[serde(default)]
    pub salespeople: Vec<SalesPerson>,
    #[serde(default)]
    pub assignments: Vec<Assignment>,
}

/// A `ContactStore` held in memory and persisted as a JSON snapshot.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: RwLock<Snapshot>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        Self {
            state: RwLock::new(snapshot),
        }
    }

    /// Reads a snapshot file. A missing file yields an empty store.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = match fs::read(path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No snapshot at {}, starting empty", path.display());
                return Ok(Self::new());
            }
            Err(e) => return Err(e.into()),
        };
        let snapshot: Snapshot = serde_json::from_slice(&data)?;
        tracing::debug!(
            "Loaded snapshot: {} contacts, {} salespeople",
            snapshot.contacts.len(),
            snapshot.salespeople.len()
        );
        Ok(Self::from_snapshot(snapshot))
    }

    pub async fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let state = self.state.read().await;
        let json = serde_json::to_vec_pretty(&*state)?;

        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, json)?;
        Ok(())
    }

    pub async fn snapshot(&self) -> Snapshot {
        self.state.read().await.clone()
    }

    pub async fn add_salesperson(&self, name: impl Into<String>) -> String {
        let id = uuid::Uuid::new_v4().to_string();
        self.state.write().await.salespeople.push(SalesPerson {
            id: id.clone(),
            name: name.into(),
            is_active: true,
        });
        id
    }
}

#[async_trait]
impl ContactStore for InMemoryStore {
    async fn candidates(&self) -> Result<Vec<CandidateContact>> {
        let state = self.state.read().await;

        let candidates = state
            .contacts
            .iter()
            .map(|contact| {
                let salesperson = state
                    .assignments
                    .iter()
                    .find(|a| a.contact_id == contact.id)
                    .and_then(|a| state.salespeople.iter().find(|sp| sp.id == a.salesperson_id))
                    .map(|sp| sp.name.clone());

                CandidateContact {
                    id: contact.id.clone(),
                    name: contact.fields.name.clone(),
                    category: Some(contact.fields.category),
                    email: contact.fields.email.clone(),
                    phone: contact.fields.phone.clone(),
                    company: contact.fields.company.clone(),
                    branch: contact.fields.branch.clone(),
                    address: contact.fields.address.clone(),
                    salesperson,
                }
            })
            .collect();

        Ok(candidates)
    }

    async fn active_salespeople(&self) -> Result<Vec<SalesPerson>> {
        let state = self.state.read().await;
        Ok(state
            .salespeople
            .iter()
            .filter(|sp| sp.is_active)
            .cloned()
            .collect())
    }

    async fn find_duplicate(&self, name: &str) -> Result<Option<String>> {
        let wanted = duplicate_key(name);
        if wanted.is_empty() {
            return Ok(None);
        }
        let state = self.state.read().await;
        Ok(state
            .contacts
            .iter()
            .find(|c| duplicate_key(&c.fields.name) == wanted)
            .map(|c| c.id.clone()))
    }

    async fn update_contact(&self, contact_id: &str, fields: &ContactFields) -> Result<()> {
        let mut state = self.state.write().await;
        let contact = state
            .contacts
            .iter_mut()
            .find(|c| c.id == contact_id)
            .ok_or_else(|| CrmError::store(format!("contact {} does not exist", contact_id)))?;

        // The stored name is kept; only descriptive fields are replaced
        let drinks = fields.drinks.or(contact.fields.drinks);
        contact.fields = ContactFields {
            name: contact.fields.name.clone(),
            drinks,
            ..fields.clone()
        };
        Ok(())
    }

    async fn insert_contact(&self, fields: &ContactFields) -> Result<String> {
        let id = uuid::Uuid::new_v4().to_string();
        self.state.write().await.contacts.push(StoredContact {
            id: id.clone(),
            fields: fields.clone(),
        });
        Ok(id)
    }

    async fn assign(&self, contact_id: &str, salesperson_id: &str) -> Result<()> {
        let mut state = self.state.write().await;
        if let Some(existing) = state
            .assignments
            .iter_mut()
            .find(|a| a.contact_id == contact_id)
        {
            existing.salesperson_id = salesperson_id.to_string();
            return Ok(());
        }

        state.assignments.push(Assignment {
            contact_id: contact_id.to_string(),
            salesperson_id: salesperson_id.to_string(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Category;
    use tempfile::TempDir;

    fn fields(name: &str) -> ContactFields {
        ContactFields {
            name: name.to_string(),
            category: Category::Realtor,
            email: None,
            phone: None,
            company: None,
            branch: None,
            address: None,
            drinks: Some(true),
        }
    }

    #[tokio::test]
    async fn test_candidates_resolve_salesperson_names() {
        let store = InMemoryStore::new();
        let dana = store.add_salesperson("Dana").await;
        let id = store.insert_contact(&fields("Mary Jones")).await.unwrap();
        store.insert_contact(&fields("Tom Ray")).await.unwrap();
        store.assign(&id, &dana).await.unwrap();

        let candidates = store.candidates().await.unwrap();
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].salesperson.as_deref(), Some("Dana"));
        assert_eq!(candidates[1].salesperson, None);
    }

    #[tokio::test]
    async fn test_assign_replaces_existing_assignment() {
        let store = InMemoryStore::new();
        let a = store.add_salesperson("A").await;
        let b = store.add_salesperson("B").await;
        let id = store.insert_contact(&fields("X Y")).await.unwrap();
        store.assign(&id, &a).await.unwrap();
        store.assign(&id, &b).await.unwrap();

        let snapshot = store.snapshot().await;
        assert_eq!(snapshot.assignments.len(), 1);
        assert_eq!(snapshot.assignments[0].salesperson_id, b);
    }

    #[tokio::test]
    async fn test_update_keeps_drinks_when_unset() {
        let store = InMemoryStore::new();
        let id = store.insert_contact(&fields("Ann Roe")).await.unwrap();

        let mut update = fields("ann roe");
        update.drinks = None;
        update.category = Category::Lender;
        store.update_contact(&id, &update).await.unwrap();

        let snapshot = store.snapshot().await;
        assert_eq!(snapshot.contacts[0].fields.name, "Ann Roe");
        assert_eq!(snapshot.contacts[0].fields.category, Category::Lender);
        assert_eq!(snapshot.contacts[0].fields.drinks, Some(true));

        assert!(store.update_contact("missing", &update).await.is_err());
    }

    #[tokio::test]
    async fn test_load_missing_snapshot_starts_empty() {
        let dir = TempDir::new().unwrap();
        let store = InMemoryStore::load(dir.path().join("new.json")).unwrap();
        assert_eq!(store.snapshot().await, Snapshot::default());

        let garbage = dir.path().join("garbage.json");
        fs::write(&garbage, b"not json").unwrap();
        assert!(matches!(
            InMemoryStore::load(&garbage),
            Err(CrmError::SerializationError(_))
        ));
    }

    #[tokio::test]
    async fn test_find_duplicate_ignores_spacing_and_case() {
        let store = InMemoryStore::new();
        let id = store.insert_contact(&fields("John Smith")).await.unwrap();

        assert_eq!(store.find_duplicate("John  Smith").await.unwrap(), Some(id.clone()));
        assert_eq!(store.find_duplicate("  john\tSMITH ").await.unwrap(), Some(id));
        assert_eq!(store.find_duplicate("John Smithe").await.unwrap(), None);
        assert_eq!(store.find_duplicate("   ").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_snapshot_round_trip_through_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("contacts.json");

        let store = InMemoryStore::new();
        store.add_salesperson("Dana").await;
        store.insert_contact(&fields("Mary Jones")).await.unwrap();
        store.save(&path).await.unwrap();

        let reloaded = InMemoryStore::load(&path).unwrap();
        assert_eq!(reloaded.snapshot().await, store.snapshot().await);
        assert_eq!(
            reloaded.find_duplicate("MARY JONES").await.unwrap(),
            store.find_duplicate("mary jones").await.unwrap()
        );
    }
}
