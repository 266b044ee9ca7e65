use serde::Serialize;
use shared::error::Rejection;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub added: usize,
    pub skipped: usize,
}

/// Ordered, duplicate-free participant names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    names: Vec<String>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a roster from stored names, dropping blanks and repeats.
    pub fn from_names(names: impl IntoIterator<Item = String>) -> Self {
        let mut roster = Self::new();
        for name in names {
            let _ = roster.insert(&name);
        }
        roster
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|existing| existing == name)
    }

    /// Trims, then rejects blanks and exact (case-sensitive) duplicates.
    pub fn insert(&mut self, raw: &str) -> Result<(), Rejection> {
        let name = raw.trim();
        if name.is_empty() {
            return Err(Rejection::EmptyName);
        }
        if self.contains(name) {
            return Err(Rejection::DuplicateName);
        }
        self.names.push(name.to_string());
        Ok(())
    }

    pub fn remove(&mut self, index: usize) -> Option<String> {
        (index < self.names.len()).then(|| self.names.remove(index))
    }

    pub fn import(&mut self, text: &str) -> ImportSummary {
        let mut summary = ImportSummary::default();
        for entry in split_bulk(text) {
            match self.insert(entry) {
                Ok(()) => summary.added += 1,
                Err(_) => summary.skipped += 1,
            }
        }
        summary
    }

    pub fn clear(&mut self) {
        self.names.clear();
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.names.clone()
    }
}

/// Splits pasted or imported text on newlines, commas and semicolons.
pub fn split_bulk(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| matches!(c, '\n' | '\r' | ',' | ';'))
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
}

#[cfg(test)]
#[path = "tests/roster_tests.rs"]
mod tests;
