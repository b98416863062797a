use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// The four contact roles a title agency tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Buyer,
    Realtor,
    Attorney,
    Lender,
}

impl Category {
    /// Search and display order.
    pub const ALL: [Category; 4] = [
        Category::Buyer,
        Category::Realtor,
        Category::Attorney,
        Category::Lender,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Buyer => "buyer",
            Category::Realtor => "realtor",
            Category::Attorney => "attorney",
            Category::Lender => "lender",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::Buyer => "Buyer",
            Category::Realtor => "Realtor",
            Category::Attorney => "Attorney",
            Category::Lender => "Lender",
        }
    }

    pub fn priority(self) -> u32 {
        match self {
            Category::Buyer => 1,
            Category::Realtor => 2,
            Category::Attorney => 3,
            Category::Lender => 4,
        }
    }

    /// Exact (case-sensitive) stored label.
    pub fn from_label(label: &str) -> Option<Category> {
        Category::ALL.into_iter().find(|c| c.as_str() == label)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Priority used when sorting; unrecognised categories go last.
pub fn category_priority(category: Option<Category>) -> u32 {
    category.map(Category::priority).unwrap_or(999)
}

fn lenient_category<'de, D>(deserializer: D) -> Result<Option<Category>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(Category::from_label))
}

/// Name queries per category. Blank queries place no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchFilters {
    #[serde(default)]
    pub buyer: String,
    #[serde(default)]
    pub realtor: String,
    #[serde(default)]
    pub attorney: String,
    #[serde(default)]
    pub lender: String,
}

impl SearchFilters {
    pub fn with(mut self, category: Category, query: impl Into<String>) -> Self {
        *self.slot_mut(category) = query.into();
        self
    }

    pub fn get(&self, category: Category) -> &str {
        match category {
            Category::Buyer => &self.buyer,
            Category::Realtor => &self.realtor,
            Category::Attorney => &self.attorney,
            Category::Lender => &self.lender,
        }
    }

    fn slot_mut(&mut self, category: Category) -> &mut String {
        match category {
            Category::Buyer => &mut self.buyer,
            Category::Realtor => &mut self.realtor,
            Category::Attorney => &mut self.attorney,
            Category::Lender => &mut self.lender,
        }
    }

    /// Non-blank queries in category order, already trimmed.
    pub fn active(&self) -> impl Iterator<Item = (Category, &str)> + '_ {
        Category::ALL
            .into_iter()
            .map(move |c| (c, self.get(c).trim()))
            .filter(|(_, q)| !q.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.active().next().is_none()
    }

    pub fn active_count(&self) -> usize {
        self.active().count()
    }
}

pub const UNASSIGNED: &str = "Unassigned";

/// Key two names share when they refer to the same contact: trimmed,
/// lowercased, internal whitespace collapsed to single spaces.
pub fn duplicate_key(name: &str) -> String {
    name.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// An existing contact considered for matching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateContact {
    pub id: String,
    pub name: String,
    #[serde(rename = "type", deserialize_with = "lenient_category", default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub branch: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    /// Name of the assigned salesperson, if any.
    #[serde(default)]
    pub salesperson: Option<String>,
}

impl CandidateContact {
    pub fn new(id: impl Into<String>, name: impl Into<String>, category: Category) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: Some(category),
            email: None,
            phone: None,
            company: None,
            branch: None,
            address: None,
            salesperson: None,
        }
    }

    pub fn assigned_to(mut self, salesperson: impl Into<String>) -> Self {
        self.salesperson = Some(salesperson.into());
        self
    }

    pub fn salesperson_label(&self) -> &str {
        self.salesperson
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(UNASSIGNED)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    pub contact: CandidateContact,
    pub score: f64,
    pub matched_category: Category,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchOutcome {
    pub results: Vec<MatchResult>,
    /// Modal salesperson(s) when results span more than one salesperson.
    pub crossover: Option<String>,
}

impl SearchOutcome {
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConflictReport {
    pub term: String,
    pub variants: Vec<String>,
    pub matches: Vec<CandidateContact>,
}

impl ConflictReport {
    /// True when nothing in the system matches the prospect.
    pub fn is_clear(&self) -> bool {
        self.matches.is_empty()
    }
}

/// Output of the CSV parser: headers plus header-aligned rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedCsv {
    pub headers: Vec<String>,
    pub rows: Vec<CsvRow>,
}

impl ParsedCsv {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvRow {
    values: Vec<String>,
}

impl CsvRow {
    pub fn new(values: Vec<String>) -> Self {
        Self { values }
    }

    /// Value at a header position; missing trailing cells read as empty.
    pub fn value(&self, column: usize) -> &str {
        self.values.get(column).map(String::as_str).unwrap_or("")
    }
}

pub const MISSING_NAME: &str = "name";
pub const MISSING_TYPE: &str = "type (or invalid type value)";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedContactCandidate {
    pub row_number: usize,
    pub name: String,
    /// Category text exactly as it appeared in the file.
    pub raw_category: String,
    #[serde(rename = "type")]
    pub category: Option<Category>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub branch: Option<String>,
    pub address: Option<String>,
    pub salesperson: Option<String>,
    pub drinks: Option<bool>,
}

impl NormalizedContactCandidate {
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.name.is_empty() {
            missing.push(MISSING_NAME);
        }
        if self.category.is_none() {
            missing.push(MISSING_TYPE);
        }
        missing
    }

    pub fn is_valid(&self) -> bool {
        self.missing_fields().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesPerson {
    pub id: String,
    pub name: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

/// Writable contact fields sent to the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactFields {
    pub name: String,
    #[serde(rename = "type")]
    pub category: Category,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub branch: Option<String>,
    pub address: Option<String>,
    /// `None` on update leaves the stored flag untouched.
    pub drinks: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportReport {
    pub success: usize,
    pub failed: usize,
    pub errors: Vec<String>,
    pub started_at: chrono::DateTime<chrono::Utc>,
    pub finished_at: chrono::DateTime<chrono::Utc>,
}
