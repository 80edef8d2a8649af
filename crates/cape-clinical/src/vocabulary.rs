//! Drug vocabulary and medication-list matching

use crate::tables::DEFAULT_DRUG_NAMES;
use indexmap::IndexSet;
use serde::Serialize;

/// Where a vocabulary's names came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum VocabularySource {
    BuiltIn,
    External,
}

/// Ordered set of known drug names
///
/// An external list replaces the built-in one only when it contributes at
/// least one non-blank name; calculators never see the difference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrugVocabulary {
    names: IndexSet<String>,
    source: VocabularySource,
}

impl Default for DrugVocabulary {
    fn default() -> Self {
        Self::built_in()
    }
}

impl DrugVocabulary {
    pub fn built_in() -> Self {
        Self {
            names: DEFAULT_DRUG_NAMES.iter().map(|s| s.to_string()).collect(),
            source: VocabularySource::BuiltIn,
        }
    }

    /// Names are trimmed, blanks dropped, duplicates removed and the result sorted
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut cleaned: Vec<String> = names
            .into_iter()
            .map(|n| n.as_ref().trim().to_string())
            .filter(|n| !n.is_empty())
            .collect();
        cleaned.sort();
        cleaned.dedup();

        if cleaned.is_empty() {
            log::warn!("external drug list is empty, using the built-in vocabulary");
            return Self::built_in();
        }
        log::info!("loaded {} drug names from an external list", cleaned.len());
        Self {
            names: cleaned.into_iter().collect(),
            source: VocabularySource::External,
        }
    }

    /// Reads a CSV drug list
    ///
    /// When the first row has a `drug_name` cell that column is used and the
    /// row is skipped as a header. Otherwise every row contributes its first
    /// column. Quoted cells may contain commas.
    pub fn from_lines(text: &str) -> Self {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(text.as_bytes());
        let mut rows = reader.records().filter_map(|row| match row {
            Ok(row) => Some(row),
            Err(e) => {
                log::warn!("skipping unreadable drug list row: {e}");
                None
            }
        });

        let Some(first) = rows.next() else {
            return Self::from_names(Vec::<String>::new());
        };
        let header_column = first
            .iter()
            .position(|cell| cell.eq_ignore_ascii_case("drug_name"));
        let column = header_column.unwrap_or(0);

        let mut names: Vec<String> = Vec::new();
        if header_column.is_none() {
            names.extend(first.get(0).map(str::to_string));
        }
        names.extend(rows.filter_map(|row| row.get(column).map(str::to_string)));
        Self::from_names(names)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn source(&self) -> VocabularySource {
        self.source
    }

    /// Case-insensitive exact match
    pub fn contains(&self, name: &str) -> bool {
        let name = name.trim();
        self.names.iter().any(|n| n.eq_ignore_ascii_case(name))
    }

    /// Medications not found in the vocabulary, in input order
    pub fn unlisted<'a>(&self, medications: &'a [String]) -> Vec<&'a str> {
        medications
            .iter()
            .map(String::as_str)
            .filter(|m| !self.contains(m))
            .collect()
    }
}

/// Whether any medication contains any of the lowercase `needles`
pub fn contains_any(medications: &[String], needles: &[&str]) -> bool {
    medications.iter().any(|m| {
        let m = m.to_lowercase();
        needles.iter().any(|n| m.contains(n))
    })
}
