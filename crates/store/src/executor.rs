//! Final, idempotent deactivation of the target entity.

use std::sync::Arc;

use offboard_core::deactivation::DeactivationError;
use offboard_shared::types::Subject;

use crate::repositories::entity::EntityRepository;

/// What the executor did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionOutcome {
    /// The subject's flags were flipped to inactive.
    Deactivated,
    /// The subject was already inactive; nothing changed.
    ///
    /// Callers skip the deactivation audit entry in this case, so a
    /// retried confirmation never double-logs.
    AlreadyInactive,
}

/// Applies the final state change to a driver or company account.
///
/// Dispatch is polymorphic over the subject variant: drivers lose both
/// their roster flag and their active status, companies only the latter.
#[derive(Debug)]
pub struct DeactivationExecutor {
    entities: Arc<EntityRepository>,
}

impl DeactivationExecutor {
    /// Creates an executor over the given entity repository.
    #[must_use]
    pub fn new(entities: Arc<EntityRepository>) -> Self {
        Self { entities }
    }

    /// Deactivates the subject. Idempotent: an already-inactive subject
    /// is a successful no-op.
    ///
    /// # Errors
    ///
    /// Returns `SubjectNotFound` if the subject is not registered.
    pub fn execute(&self, subject: Subject) -> Result<ExecutionOutcome, DeactivationError> {
        if self.entities.set_inactive(subject)? {
            tracing::info!(subject = %subject, "subject deactivated");
            Ok(ExecutionOutcome::Deactivated)
        } else {
            tracing::debug!(subject = %subject, "subject already inactive");
            Ok(ExecutionOutcome::AlreadyInactive)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{CompanyRecord, DriverRecord, EntityStatus};
    use offboard_shared::types::{CompanyId, DriverId};

    fn setup() -> (Arc<EntityRepository>, DeactivationExecutor) {
        let entities = Arc::new(EntityRepository::new());
        let executor = DeactivationExecutor::new(Arc::clone(&entities));
        (entities, executor)
    }

    #[test]
    fn test_driver_loses_both_flags() {
        let (entities, executor) = setup();
        let driver = DriverRecord::active("Ayo Bello");
        let id = driver.id;
        entities.insert_driver(driver);

        let outcome = executor.execute(Subject::Driver(id)).unwrap();
        assert_eq!(outcome, ExecutionOutcome::Deactivated);

        let stored = entities.driver(id).unwrap();
        assert_eq!(stored.status, EntityStatus::Inactive);
        assert!(!stored.is_current);
    }

    #[test]
    fn test_company_loses_status_only() {
        let (entities, executor) = setup();
        let company = CompanyRecord::active("Acme Logistics");
        let id = company.id;
        entities.insert_company(company);

        let outcome = executor.execute(Subject::Company(id)).unwrap();
        assert_eq!(outcome, ExecutionOutcome::Deactivated);
        assert_eq!(
            entities.company(id).unwrap().status,
            EntityStatus::Inactive
        );
    }

    #[test]
    fn test_repeat_execution_is_a_noop() {
        let (entities, executor) = setup();
        let driver = DriverRecord::active("Ayo Bello");
        let id = driver.id;
        entities.insert_driver(driver);

        let subject = Subject::Driver(id);
        assert_eq!(
            executor.execute(subject).unwrap(),
            ExecutionOutcome::Deactivated
        );
        assert_eq!(
            executor.execute(subject).unwrap(),
            ExecutionOutcome::AlreadyInactive
        );
    }

    #[test]
    fn test_unknown_subject_fails() {
        let (_entities, executor) = setup();
        let result = executor.execute(Subject::Driver(DriverId::new()));
        assert!(matches!(
            result,
            Err(DeactivationError::SubjectNotFound { .. })
        ));
    }

    #[test]
    fn test_unknown_company_fails() {
        let (_entities, executor) = setup();
        let result = executor.execute(Subject::Company(CompanyId::new()));
        assert!(matches!(
            result,
            Err(DeactivationError::SubjectNotFound { .. })
        ));
    }
}
