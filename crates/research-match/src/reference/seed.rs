use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use super::{ReferenceCollection, ReferenceId, ReferenceOption};

/// Reference rows loaded from a `collection,id,label` CSV export.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceSeed {
    pub research_fields: Vec<ReferenceOption>,
    pub programming_languages: Vec<ReferenceOption>,
}

impl ReferenceSeed {
    pub fn rows(&self, collection: ReferenceCollection) -> &[ReferenceOption] {
        match collection {
            ReferenceCollection::ResearchFields => &self.research_fields,
            ReferenceCollection::ProgrammingLanguages => &self.programming_languages,
        }
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, SeedError> {
        let file = std::fs::File::open(path)?;
        load_reference_seed(file)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("failed to read reference seed: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid reference seed CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("line {line}: unknown reference collection '{value}'")]
    UnknownCollection { line: u64, value: String },
    #[error("line {line}: label must not be empty")]
    EmptyLabel { line: u64 },
    #[error("line {line}: duplicate id {id} in {collection}")]
    DuplicateId {
        line: u64,
        collection: &'static str,
        id: ReferenceId,
    },
}

#[derive(Debug, Deserialize)]
struct SeedRow {
    collection: String,
    id: i64,
    label: String,
}

/// Parses a reference seed, keeping file order within each collection.
pub fn load_reference_seed<R: Read>(reader: R) -> Result<ReferenceSeed, SeedError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut seed = ReferenceSeed::default();

    for result in csv_reader.deserialize::<SeedRow>() {
        let row = result?;
        // header occupies line 1
        let line = seed.research_fields.len() as u64 + seed.programming_languages.len() as u64 + 2;

        let collection = ReferenceCollection::from_slug(&row.collection).ok_or_else(|| {
            SeedError::UnknownCollection {
                line,
                value: row.collection.clone(),
            }
        })?;
        if row.label.is_empty() {
            return Err(SeedError::EmptyLabel { line });
        }

        let rows = match collection {
            ReferenceCollection::ResearchFields => &mut seed.research_fields,
            ReferenceCollection::ProgrammingLanguages => &mut seed.programming_languages,
        };
        let id = ReferenceId(row.id);
        if rows.iter().any(|existing| existing.id == id) {
            return Err(SeedError::DuplicateId {
                line,
                collection: collection.label(),
                id,
            });
        }
        rows.push(ReferenceOption {
            id,
            label: row.label,
        });
    }

    Ok(seed)
}
