use std::sync::Arc;

use tracing::warn;

/// Pending persistence work for one request.
///
/// `rollback` on a unit with nothing pending must succeed as a no-op.
pub trait UnitOfWork: Send + Sync {
    fn commit(&self) -> Result<(), TransactionError>;
    fn rollback(&self) -> Result<(), TransactionError>;
}

pub type SharedUnitOfWork = Arc<dyn UnitOfWork>;

/// Opens a fresh unit of work per request.
///
/// Handlers see the unit as `Extension<Arc<Self::Unit>>`, so they can stage
/// writes through whatever API the concrete unit offers.
pub trait TransactionManager: Send + Sync {
    type Unit: UnitOfWork + 'static;

    fn begin(&self) -> Arc<Self::Unit>;
}

#[derive(Debug, thiserror::Error)]
pub enum TransactionError {
    #[error("commit failed: {0}")]
    Commit(String),
    #[error("rollback failed: {0}")]
    Rollback(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionState {
    Open,
    Committed,
    RolledBack,
}

/// Request-scoped guard around a [`UnitOfWork`].
///
/// The unit is settled at most once. A failed commit leaves it open so the
/// error path can still roll it back; dropping an open guard rolls back.
pub struct RequestTransaction {
    unit: SharedUnitOfWork,
    state: TransactionState,
}

impl RequestTransaction {
    pub fn begin<M: TransactionManager>(manager: &M) -> Self {
        Self::new(manager.begin())
    }

    pub fn new(unit: SharedUnitOfWork) -> Self {
        Self {
            unit,
            state: TransactionState::Open,
        }
    }

    pub fn state(&self) -> TransactionState {
        self.state
    }

    pub fn commit(&mut self) -> Result<(), TransactionError> {
        if self.state != TransactionState::Open {
            return Ok(());
        }
        self.unit.commit()?;
        self.state = TransactionState::Committed;
        Ok(())
    }

    /// Marks the unit rolled back even when the rollback itself fails.
    pub fn rollback(&mut self) -> Result<(), TransactionError> {
        if self.state != TransactionState::Open {
            return Ok(());
        }
        self.state = TransactionState::RolledBack;
        self.unit.rollback()
    }
}

impl Drop for RequestTransaction {
    fn drop(&mut self) {
        if self.state == TransactionState::Open {
            if let Err(err) = self.rollback() {
                warn!(error = %err, "rollback of abandoned unit of work failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingUnit {
        commits: AtomicUsize,
        rollbacks: AtomicUsize,
        fail_commit: bool,
    }

    impl UnitOfWork for CountingUnit {
        fn commit(&self) -> Result<(), TransactionError> {
            self.commits.fetch_add(1, Ordering::SeqCst);
            if self.fail_commit {
                Err(TransactionError::Commit("constraint violated".to_string()))
            } else {
                Ok(())
            }
        }

        fn rollback(&self) -> Result<(), TransactionError> {
            self.rollbacks.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[test]
    fn dropping_an_open_transaction_rolls_back_once() {
        let unit = Arc::new(CountingUnit::default());
        {
            let _transaction = RequestTransaction::new(unit.clone());
        }
        assert_eq!(unit.rollbacks.load(Ordering::SeqCst), 1);
        assert_eq!(unit.commits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn committed_transaction_is_not_rolled_back_on_drop() {
        let unit = Arc::new(CountingUnit::default());
        {
            let mut transaction = RequestTransaction::new(unit.clone());
            transaction.commit().expect("commit succeeds");
            transaction.commit().expect("second commit is a no-op");
        }
        assert_eq!(unit.commits.load(Ordering::SeqCst), 1);
        assert_eq!(unit.rollbacks.load(Ordering::SeqCst), 0);
    }

    struct OneShotManager;

    impl TransactionManager for OneShotManager {
        type Unit = CountingUnit;

        fn begin(&self) -> Arc<CountingUnit> {
            Arc::new(CountingUnit::default())
        }
    }

    #[test]
    fn begin_opens_an_open_transaction() {
        let transaction = RequestTransaction::begin(&OneShotManager);
        assert_eq!(transaction.state(), TransactionState::Open);
    }

    #[test]
    fn failed_commit_still_allows_one_rollback() {
        let unit = Arc::new(CountingUnit {
            fail_commit: true,
            ..CountingUnit::default()
        });
        {
            let mut transaction = RequestTransaction::new(unit.clone());
            assert!(transaction.commit().is_err());
            assert_eq!(transaction.state(), TransactionState::Open);
            transaction.rollback().expect("rollback succeeds");
            transaction.rollback().expect("second rollback is a no-op");
        }
        assert_eq!(unit.rollbacks.load(Ordering::SeqCst), 1);
    }
}
