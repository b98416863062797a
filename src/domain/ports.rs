use crate::domain::model::{CandidateContact, ContactFields, SalesPerson};
use crate::utils::error::Result;
use async_trait::async_trait;

/// The relational store holding contacts, salespeople and assignments.
#[async_trait]
pub trait ContactStore: Send + Sync {
    /// Every contact, with its assigned salesperson name resolved.
    async fn candidates(&self) -> Result<Vec<CandidateContact>>;

    async fn active_salespeople(&self) -> Result<Vec<SalesPerson>>;

    /// Id of the contact whose name has the same [`duplicate_key`] as `name`.
    ///
    /// [`duplicate_key`]: crate::domain::model::duplicate_key
    async fn find_duplicate(&self, name: &str) -> Result<Option<String>>;

    async fn update_contact(&self, contact_id: &str, fields: &ContactFields) -> Result<()>;

    /// Inserts a contact and returns its new id.
    async fn insert_contact(&self, fields: &ContactFields) -> Result<String>;

    /// Creates the contact's assignment or points the existing one at `salesperson_id`.
    async fn assign(&self, contact_id: &str, salesperson_id: &str) -> Result<()>;
}
