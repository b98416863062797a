//! Nickname-aware phrase expansion.
//!
//! The table maps formal names to nicknames and back. It is parsed on first
//! use and cached inside the [`NicknameExpander`] that owns it.

use crate::utils::error::Result;
use std::borrow::Cow;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::OnceLock;

/// Table shipped with the crate.
pub const EMBEDDED_NICKNAMES: &str = include_str!("../../data/nicknames.csv");

/// Symmetric name-token lookup. Every alternative of `a` lists `a` back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NicknameTable {
    alternatives: HashMap<String, Vec<String>>,
}

impl NicknameTable {
    /// Parses `formal,nick1|nick2|...` rows after a header line.
    ///
    /// Rows missing either side are skipped; extra columns are ignored.
    pub fn parse(source: &str) -> Self {
        let mut table = Self::default();
        let mut skipped = 0usize;

        for line in source.lines().skip(1) {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let mut columns = line.split(',');
            let formal = columns.next().unwrap_or("").trim().to_lowercase();
            let nicknames: Vec<String> = columns
                .next()
                .unwrap_or("")
                .split('|')
                .map(|n| n.trim().to_lowercase())
                .filter(|n| !n.is_empty())
                .collect();

            if formal.is_empty() || nicknames.is_empty() {
                skipped += 1;
                tracing::debug!("Skipping malformed nickname row: {:?}", line);
                continue;
            }

            table.insert_group(&formal, &nicknames);
        }

        tracing::debug!(
            "Nickname table built: {} names, {} rows skipped",
            table.len(),
            skipped
        );
        table
    }

    /// Links a formal name with its nicknames in both directions.
    pub fn insert_group(&mut self, formal: &str, nicknames: &[String]) {
        for nickname in nicknames {
            self.link(formal, nickname);
            self.link(nickname, formal);
            for sibling in nicknames {
                self.link(nickname, sibling);
            }
        }
    }

    fn link(&mut self, from: &str, to: &str) {
        if from == to {
            return;
        }
        let entry = self.alternatives.entry(from.to_string()).or_default();
        if !entry.iter().any(|existing| existing == to) {
            entry.push(to.to_string());
        }
    }

    /// Alternatives for a lowercase token, in table order.
    pub fn alternatives(&self, token: &str) -> Option<&[String]> {
        self.alternatives
            .get(token)
            .map(Vec::as_slice)
            .filter(|alts| !alts.is_empty())
    }

    pub fn len(&self) -> usize {
        self.alternatives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alternatives.is_empty()
    }

    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.alternatives.keys().map(String::as_str)
    }
}

/// Expands search phrases with nickname substitutions.
pub struct NicknameExpander {
    source: Cow<'static, str>,
    table: OnceLock<NicknameTable>,
}

impl Default for NicknameExpander {
    fn default() -> Self {
        Self::embedded()
    }
}

impl NicknameExpander {
    pub fn embedded() -> Self {
        Self {
            source: Cow::Borrowed(EMBEDDED_NICKNAMES),
            table: OnceLock::new(),
        }
    }

    /// Uses `source` as the table text; it's parsed on first expansion.
    pub fn from_source(source: impl Into<String>) -> Self {
        Self {
            source: Cow::Owned(source.into()),
            table: OnceLock::new(),
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::from_source(content))
    }

    pub fn with_table(table: NicknameTable) -> Self {
        Self {
            source: Cow::Borrowed(""),
            table: OnceLock::from(table),
        }
    }

    pub fn table(&self) -> &NicknameTable {
        self.table.get_or_init(|| NicknameTable::parse(&self.source))
    }

    /// All variants of `phrase`, original (lowercased, whitespace collapsed) first.
    ///
    /// Each position is substituted using the alternatives of the word that
    /// was originally at that position, across every variant produced so far.
    pub fn expand(&self, phrase: &str) -> Vec<String> {
        let table = self.table();
        let words: Vec<String> = phrase.split_whitespace().map(str::to_lowercase).collect();
        let original = words.join(" ");

        let mut variants = vec![original.clone()];
        let mut seen: HashSet<String> = HashSet::from([original]);

        for (i, word) in words.iter().enumerate() {
            let Some(alternatives) = table.alternatives(word) else {
                continue;
            };

            let mut generated = Vec::new();
            for existing in &variants {
                let existing_words: Vec<&str> = existing.split(' ').collect();
                for alternative in alternatives {
                    let mut next = existing_words.clone();
                    if let Some(slot) = next.get_mut(i) {
                        *slot = alternative.as_str();
                    }
                    generated.push(next.join(" "));
                }
            }

            for variant in generated {
                if seen.insert(variant.clone()) {
                    variants.push(variant);
                }
            }
        }

        tracing::debug!("Expanded {:?} into {} variants", phrase, variants.len());
        variants
    }
}
