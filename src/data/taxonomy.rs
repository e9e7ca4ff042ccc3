//! Static two-layer product taxonomy catalog.
//!
//! Catalog iteration order is significant: score ties during labeling go to
//! whichever category appears first in the file.

use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Result, ThemeError};

/// Keywords and description for one named category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonomyEntry {
    pub keywords: Vec<String>,
    pub description: String,
}

/// Order-preserving category catalog, loaded once per run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Taxonomy {
    entries: IndexMap<String, TaxonomyEntry>,
}

impl Taxonomy {
    /// Read and validate the catalog at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|source| ThemeError::TaxonomyIo {
            path: path.to_path_buf(),
            source,
        })?;
        let taxonomy = Self::from_json(&raw)?;
        info!(path = %path.display(), categories = taxonomy.len(), "loaded taxonomy");
        Ok(taxonomy)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let entries: IndexMap<String, TaxonomyEntry> = serde_json::from_str(raw)?;
        Self::from_entries(entries)
    }

    /// Build a catalog from `(name, entry)` pairs, keeping their order.
    pub fn from_entries<I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, TaxonomyEntry)>,
    {
        let entries: IndexMap<String, TaxonomyEntry> = entries.into_iter().collect();
        if entries.is_empty() {
            return Err(ThemeError::InvalidTaxonomy("catalog has no categories".into()));
        }
        for (name, entry) in &entries {
            if name.trim().is_empty() {
                return Err(ThemeError::InvalidTaxonomy("blank category name".into()));
            }
            if entry.keywords.is_empty() {
                return Err(ThemeError::InvalidTaxonomy(format!(
                    "category {name:?} has no keywords"
                )));
            }
            if entry.keywords.iter().any(|kw| kw.trim().is_empty()) {
                return Err(ThemeError::InvalidTaxonomy(format!(
                    "category {name:?} has a blank keyword"
                )));
            }
        }
        Ok(Self { entries })
    }

    /// Categories in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TaxonomyEntry)> {
        self.entries.iter().map(|(name, entry)| (name.as_str(), entry))
    }

    pub fn get(&self, name: &str) -> Option<&TaxonomyEntry> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
