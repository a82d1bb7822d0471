use metrics_exporter_prometheus::PrometheusHandle;
use research_match::forms::FormKind;
use research_match::reference::{
    ReferenceCatalog, ReferenceCollection, ReferenceError, ReferenceId, ReferenceOption,
    ReferenceSeed, SeedError,
};
use research_match::responder::{TransactionError, TransactionManager, UnitOfWork};
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, RwLock};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Rows served when no seed file is configured.
pub(crate) fn standard_seed() -> ReferenceSeed {
    let research_fields = [
        "Artificial Intelligence",
        "Computer Security",
        "Databases",
        "Distributed Systems",
        "Human-Computer Interaction",
        "Machine Learning",
    ];
    let programming_languages = ["C", "C++", "Java", "JavaScript", "Python", "Rust"];

    ReferenceSeed {
        research_fields: numbered(&research_fields),
        programming_languages: numbered(&programming_languages),
    }
}

fn numbered(labels: &[&str]) -> Vec<ReferenceOption> {
    labels
        .iter()
        .zip(1..)
        .map(|(label, id)| ReferenceOption::new(id, *label))
        .collect()
}

/// Reference tables held in process memory.
#[derive(Default, Clone)]
pub(crate) struct InMemoryReferenceStore {
    tables: Arc<RwLock<ReferenceSeed>>,
}

impl InMemoryReferenceStore {
    pub(crate) fn from_seed(seed: ReferenceSeed) -> Self {
        Self {
            tables: Arc::new(RwLock::new(seed)),
        }
    }

    /// Seeds from the CSV at `path`, or the standard rows when none is given.
    pub(crate) fn load(path: Option<&Path>) -> Result<Self, SeedError> {
        match path {
            Some(path) => ReferenceSeed::from_path(path).map(Self::from_seed),
            None => Ok(Self::from_seed(standard_seed())),
        }
    }

    fn rows(&self, collection: ReferenceCollection) -> Result<Vec<ReferenceOption>, ReferenceError> {
        let guard = self
            .tables
            .read()
            .map_err(|_| ReferenceError::Unavailable("reference store lock poisoned".to_string()))?;
        Ok(guard.rows(collection).to_vec())
    }

    fn contains_label(
        &self,
        collection: ReferenceCollection,
        label: &str,
    ) -> Result<bool, ReferenceError> {
        Ok(self
            .rows(collection)?
            .iter()
            .any(|row| row.label.eq_ignore_ascii_case(label)))
    }

    /// Appends every staged row or none of them. Ids continue from the
    /// highest id already in the collection.
    fn apply(&self, staged: &[StagedRow]) -> Result<Vec<ReferenceOption>, TransactionError> {
        let mut guard = self
            .tables
            .write()
            .map_err(|_| TransactionError::Commit("reference store lock poisoned".to_string()))?;
        let mut next = guard.clone();
        let mut inserted = Vec::with_capacity(staged.len());

        for row in staged {
            let rows = match row.collection {
                ReferenceCollection::ResearchFields => &mut next.research_fields,
                ReferenceCollection::ProgrammingLanguages => &mut next.programming_languages,
            };
            if rows
                .iter()
                .any(|existing| existing.label.eq_ignore_ascii_case(&row.label))
            {
                return Err(TransactionError::Commit(
                    ReferenceError::DuplicateLabel {
                        collection: row.collection.label(),
                        label: row.label.clone(),
                    }
                    .to_string(),
                ));
            }
            let id = rows
                .iter()
                .map(|existing| existing.id.0)
                .max()
                .unwrap_or(0)
                .checked_add(1)
                .ok_or_else(|| {
                    TransactionError::Commit(format!(
                        "no ids left in {}",
                        row.collection.label()
                    ))
                })?;
            let option = ReferenceOption {
                id: ReferenceId(id),
                label: row.label.clone(),
            };
            rows.push(option.clone());
            inserted.push(option);
        }

        *guard = next;
        Ok(inserted)
    }
}

impl ReferenceCatalog for InMemoryReferenceStore {
    fn research_fields(&self) -> Result<Vec<ReferenceOption>, ReferenceError> {
        self.rows(ReferenceCollection::ResearchFields)
    }

    fn programming_languages(&self) -> Result<Vec<ReferenceOption>, ReferenceError> {
        self.rows(ReferenceCollection::ProgrammingLanguages)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct StagedRow {
    collection: ReferenceCollection,
    label: String,
}

/// Opens a [`StagedReferenceUnit`] per request against one store.
#[derive(Clone)]
pub(crate) struct InMemoryTransactionManager {
    store: InMemoryReferenceStore,
}

impl InMemoryTransactionManager {
    pub(crate) fn new(store: InMemoryReferenceStore) -> Self {
        Self { store }
    }
}

impl TransactionManager for InMemoryTransactionManager {
    type Unit = StagedReferenceUnit;

    fn begin(&self) -> Arc<StagedReferenceUnit> {
        Arc::new(StagedReferenceUnit {
            store: self.store.clone(),
            pending: Mutex::new(Vec::new()),
        })
    }
}

/// Reference rows a request wants to add. Nothing reaches the store until commit.
pub(crate) struct StagedReferenceUnit {
    store: InMemoryReferenceStore,
    pending: Mutex<Vec<StagedRow>>,
}

impl StagedReferenceUnit {
    /// Stages a new row, refusing labels the collection or this unit already holds.
    pub(crate) fn stage(
        &self,
        collection: ReferenceCollection,
        label: &str,
    ) -> Result<(), ReferenceError> {
        let label = label.trim();
        let duplicate = || ReferenceError::DuplicateLabel {
            collection: collection.label(),
            label: label.to_string(),
        };
        if self.store.contains_label(collection, label)? {
            return Err(duplicate());
        }

        let mut pending = self
            .pending
            .lock()
            .map_err(|_| ReferenceError::Unavailable("unit of work lock poisoned".to_string()))?;
        if pending
            .iter()
            .any(|row| row.collection == collection && row.label.eq_ignore_ascii_case(label))
        {
            return Err(duplicate());
        }
        pending.push(StagedRow {
            collection,
            label: label.to_string(),
        });
        Ok(())
    }

    pub(crate) fn pending(&self) -> usize {
        self.pending.lock().map(|rows| rows.len()).unwrap_or(0)
    }
}

impl UnitOfWork for StagedReferenceUnit {
    fn commit(&self) -> Result<(), TransactionError> {
        let mut pending = self
            .pending
            .lock()
            .map_err(|_| TransactionError::Commit("unit of work lock poisoned".to_string()))?;
        if pending.is_empty() {
            return Ok(());
        }
        let inserted = self.store.apply(&pending)?;
        tracing::debug!(rows = inserted.len(), "committed staged reference rows");
        pending.clear();
        Ok(())
    }

    fn rollback(&self) -> Result<(), TransactionError> {
        let mut pending = self
            .pending
            .lock()
            .map_err(|_| TransactionError::Rollback("unit of work lock poisoned".to_string()))?;
        pending.clear();
        Ok(())
    }
}

pub(crate) fn parse_form(raw: &str) -> Result<FormKind, String> {
    FormKind::from_slug(raw).ok_or_else(|| {
        let known: Vec<&str> = FormKind::ordered().iter().map(|kind| kind.slug()).collect();
        format!("unknown form '{raw}' (expected one of: {})", known.join(", "))
    })
}

pub(crate) fn parse_collection(raw: &str) -> Result<ReferenceCollection, String> {
    ReferenceCollection::from_slug(raw).ok_or_else(|| {
        format!("unknown reference collection '{raw}' (expected research_field or programming_language)")
    })
}
