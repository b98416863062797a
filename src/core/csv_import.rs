//! CSV parsing and column inference for contact imports.
//!
//! Headers are free-form: each semantic field is bound to the first header
//! that matches one of its synonyms. Quoted newlines are not supported.

use crate::domain::model::{Category, CsvRow, NormalizedContactCandidate, ParsedCsv};
use crate::utils::error::{CrmError, Result};

const FIRST_NAME_HEADERS: &[&str] = &[
    "first name",
    "firstname",
    "first",
    "fname",
    "given name",
    "givenname",
];
const LAST_NAME_HEADERS: &[&str] = &[
    "last name",
    "lastname",
    "last",
    "lname",
    "surname",
    "family name",
    "familyname",
];
const FULL_NAME_HEADERS: &[&str] = &[
    "name",
    "full name",
    "fullname",
    "contact name",
    "contactname",
    "client name",
    "clientname",
];
const ADDRESS_HEADERS: &[&str] = &[
    "address",
    "street",
    "street address",
    "address line 1",
    "address1",
    "addr",
    "city",
    "town",
    "state",
    "province",
    "region",
    "zip",
    "zipcode",
    "zip code",
    "postal",
    "postal code",
    "postalcode",
];
const CATEGORY_HEADERS: &[&str] = &[
    "type",
    "contact type",
    "contacttype",
    "category",
    "client type",
];
const EMAIL_HEADERS: &[&str] = &["email", "e-mail", "email address", "emailaddress"];
const PHONE_HEADERS: &[&str] = &[
    "phone",
    "telephone",
    "phone number",
    "phonenumber",
    "cell",
    "mobile",
];
const COMPANY_HEADERS: &[&str] = &[
    "company",
    "company name",
    "companyname",
    "organization",
    "business",
    "firm",
    "employer",
];
const BRANCH_HEADERS: &[&str] = &["branch", "location", "office"];
const SALESPERSON_HEADERS: &[&str] = &[
    "salesperson",
    "sales person",
    "assigned",
    "assigned to",
    "assignedto",
    "rep",
    "agent",
];
const DRINKS_HEADERS: &[&str] = &["drinks", "drink", "alcohol", "alcoholic", "beverages"];

const TRUTHY: &[&str] = &["yes", "true", "1", "y"];
const FALSY: &[&str] = &["no", "false", "0", "n"];

/// Splits one line on commas outside double quotes. Quote characters are dropped.
pub fn split_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                fields.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    fields.push(current.trim().to_string());
    fields
}

/// Parses raw CSV text. Blank lines are skipped; the first line is the header.
pub fn parse(raw: &str) -> ParsedCsv {
    let mut lines = raw.split('\n').filter(|line| !line.trim().is_empty());

    let Some(header_line) = lines.next() else {
        return ParsedCsv::default();
    };

    let headers = split_line(header_line);
    let rows = lines.map(|line| CsvRow::new(split_line(line))).collect();

    ParsedCsv { headers, rows }
}

/// Header positions bound to each semantic field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMap {
    pub first_name: Option<usize>,
    pub last_name: Option<usize>,
    pub full_name: Option<usize>,
    pub address: Vec<usize>,
    pub category: Option<usize>,
    pub email: Option<usize>,
    pub phone: Option<usize>,
    pub company: Option<usize>,
    pub branch: Option<usize>,
    pub salesperson: Option<usize>,
    pub drinks: Option<usize>,
}

impl ColumnMap {
    pub fn infer(headers: &[String]) -> Self {
        let lower: Vec<String> = headers.iter().map(|h| h.trim().to_lowercase()).collect();
        let find = |synonyms: &[&str]| lower.iter().position(|h| synonyms.contains(&h.as_str()));

        Self {
            first_name: find(FIRST_NAME_HEADERS),
            last_name: find(LAST_NAME_HEADERS),
            full_name: find(FULL_NAME_HEADERS),
            address: lower
                .iter()
                .enumerate()
                .filter(|(_, h)| ADDRESS_HEADERS.contains(&h.as_str()))
                .map(|(i, _)| i)
                .collect(),
            category: find(CATEGORY_HEADERS),
            email: find(EMAIL_HEADERS),
            phone: find(PHONE_HEADERS),
            company: find(COMPANY_HEADERS),
            branch: find(BRANCH_HEADERS),
            salesperson: find(SALESPERSON_HEADERS),
            drinks: find(DRINKS_HEADERS),
        }
    }

    fn has_split_name(&self) -> bool {
        self.first_name.is_some() || self.last_name.is_some()
    }
}

/// Maps free-text category values onto the four contact roles by keyword stem.
pub fn normalize_category(value: &str) -> Option<Category> {
    let value = value.trim().to_lowercase();
    if value.contains("buy") {
        Some(Category::Buyer)
    } else if value.contains("real") {
        Some(Category::Realtor)
    } else if value.contains("attor") || value.contains("law") {
        Some(Category::Attorney)
    } else if value.contains("lend") || value.contains("bank") {
        Some(Category::Lender)
    } else {
        None
    }
}

pub fn parse_flag(value: &str) -> Option<bool> {
    let value = value.trim().to_lowercase();
    if TRUTHY.contains(&value.as_str()) {
        Some(true)
    } else if FALSY.contains(&value.as_str()) {
        Some(false)
    } else {
        None
    }
}

fn cell(row: &CsvRow, column: Option<usize>) -> &str {
    column.map(|c| row.value(c)).unwrap_or("")
}

fn optional(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn assemble_name(row: &CsvRow, columns: &ColumnMap) -> String {
    if columns.has_split_name() {
        format!(
            "{} {}",
            cell(row, columns.first_name),
            cell(row, columns.last_name)
        )
        .trim()
        .to_string()
    } else {
        cell(row, columns.full_name).to_string()
    }
}

fn assemble_address(row: &CsvRow, columns: &ColumnMap) -> Option<String> {
    let parts: Vec<&str> = columns
        .address
        .iter()
        .map(|&c| row.value(c))
        .filter(|part| !part.trim().is_empty())
        .collect();
    optional(&parts.join(", "))
}

/// Turns parsed rows into import candidates. Invalid rows are kept and flagged.
pub fn normalize(parsed: &ParsedCsv) -> Vec<NormalizedContactCandidate> {
    let columns = ColumnMap::infer(&parsed.headers);
    tracing::debug!("Inferred import columns: {:?}", columns);

    parsed
        .rows
        .iter()
        .enumerate()
        .map(|(index, row)| {
            let raw_category = cell(row, columns.category).to_string();
            NormalizedContactCandidate {
                row_number: index + 2,
                name: assemble_name(row, &columns),
                category: normalize_category(&raw_category),
                raw_category,
                email: optional(cell(row, columns.email)),
                phone: optional(cell(row, columns.phone)),
                company: optional(cell(row, columns.company)),
                branch: optional(cell(row, columns.branch)),
                address: assemble_address(row, &columns),
                salesperson: optional(cell(row, columns.salesperson)),
                drinks: parse_flag(cell(row, columns.drinks)),
            }
        })
        .collect()
}

/// Parses and normalizes in one step, failing when there are no data rows.
pub fn preview(raw: &str) -> Result<Vec<NormalizedContactCandidate>> {
    let parsed = parse(raw);
    if parsed.is_empty() {
        return Err(CrmError::EmptyCsv);
    }

    let candidates = normalize(&parsed);
    let invalid = candidates.iter().filter(|c| !c.is_valid()).count();
    tracing::info!(
        "Prepared {} contacts for preview ({} flagged invalid)",
        candidates.len(),
        invalid
    );
    Ok(candidates)
}
