use crate::domain::model::ContactFields;
use regex::{NoExpand, Regex, RegexBuilder};
use std::sync::OnceLock;

const STREET_SUFFIXES: &[(&str, &str)] = &[
    (" st ", " St "),
    (" st.", " St."),
    (" ave ", " Ave "),
    (" ave.", " Ave."),
    (" rd ", " Rd "),
    (" rd.", " Rd."),
    (" dr ", " Dr "),
    (" dr.", " Dr."),
    (" ln ", " Ln "),
    (" ln.", " Ln."),
    (" blvd ", " Blvd "),
    (" blvd.", " Blvd."),
    (" ct ", " Ct "),
    (" ct.", " Ct."),
    (" pl ", " Pl "),
    (" pl.", " Pl."),
    (" way ", " Way "),
    (" pkwy ", " Pkwy "),
    (" pkwy.", " Pkwy."),
    (" cir ", " Cir "),
    (" cir.", " Cir."),
];

static SUFFIX_PATTERNS: OnceLock<Vec<(Regex, &'static str)>> = OnceLock::new();

fn suffix_patterns() -> &'static [(Regex, &'static str)] {
    SUFFIX_PATTERNS.get_or_init(|| {
        STREET_SUFFIXES
            .iter()
            .map(|&(pattern, replacement)| {
                let re = RegexBuilder::new(&regex::escape(pattern))
                    .case_insensitive(true)
                    .build()
                    .expect("escaped street suffix is a valid regex");
                (re, replacement)
            })
            .collect()
    })
}

/// Lowercases, then uppercases the first letter of each space-separated word.
pub fn capitalize_words(text: &str) -> String {
    text.to_lowercase()
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

pub fn capitalize_address(address: &str) -> String {
    let mut formatted = capitalize_words(address);
    for (re, replacement) in suffix_patterns() {
        formatted = re.replace_all(&formatted, NoExpand(replacement)).into_owned();
    }
    formatted
}

/// Applies display capitalisation to the human-entered text fields.
pub fn format_contact(fields: &mut ContactFields) {
    fields.name = capitalize_words(&fields.name);
    for value in [&mut fields.company, &mut fields.branch].into_iter().flatten() {
        *value = capitalize_words(value);
    }
    if let Some(address) = fields.address.as_mut() {
        *address = capitalize_address(address);
    }
}
