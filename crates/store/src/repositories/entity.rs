//! Entity repository for driver and company account flags.

use dashmap::DashMap;

use offboard_core::deactivation::DeactivationError;
use offboard_shared::types::{CompanyId, DriverId, Subject};

use crate::entities::{CompanyRecord, DriverRecord, EntityStatus};

/// In-memory registry of driver and company accounts.
#[derive(Debug, Default)]
pub struct EntityRepository {
    drivers: DashMap<DriverId, DriverRecord>,
    companies: DashMap<CompanyId, CompanyRecord>,
}

impl EntityRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a driver account.
    pub fn insert_driver(&self, record: DriverRecord) {
        self.drivers.insert(record.id, record);
    }

    /// Registers a company account.
    pub fn insert_company(&self, record: CompanyRecord) {
        self.companies.insert(record.id, record);
    }

    /// Returns a snapshot of a driver record.
    #[must_use]
    pub fn driver(&self, id: DriverId) -> Option<DriverRecord> {
        self.drivers.get(&id).map(|r| r.clone())
    }

    /// Returns a snapshot of a company record.
    #[must_use]
    pub fn company(&self, id: CompanyId) -> Option<CompanyRecord> {
        self.companies.get(&id).map(|r| r.clone())
    }

    /// Returns true if the subject is registered.
    #[must_use]
    pub fn exists(&self, subject: Subject) -> bool {
        match subject {
            Subject::Driver(id) => self.drivers.contains_key(&id),
            Subject::Company(id) => self.companies.contains_key(&id),
        }
    }

    /// Returns whether the subject is currently active.
    ///
    /// # Errors
    ///
    /// Returns `SubjectNotFound` if the subject is not registered.
    pub fn is_active(&self, subject: Subject) -> Result<bool, DeactivationError> {
        match subject {
            Subject::Driver(id) => self
                .drivers
                .get(&id)
                .map(|r| r.status == EntityStatus::Active)
                .ok_or(DeactivationError::SubjectNotFound { subject }),
            Subject::Company(id) => self
                .companies
                .get(&id)
                .map(|r| r.status == EntityStatus::Active)
                .ok_or(DeactivationError::SubjectNotFound { subject }),
        }
    }

    /// Flips the subject to inactive.
    ///
    /// Returns `Ok(true)` if the flags changed and `Ok(false)` if the
    /// subject was already inactive (idempotent no-op).
    ///
    /// # Errors
    ///
    /// Returns `SubjectNotFound` if the subject is not registered.
    pub fn set_inactive(&self, subject: Subject) -> Result<bool, DeactivationError> {
        match subject {
            Subject::Driver(id) => {
                let mut driver = self
                    .drivers
                    .get_mut(&id)
                    .ok_or(DeactivationError::SubjectNotFound { subject })?;
                if driver.status == EntityStatus::Inactive {
                    return Ok(false);
                }
                driver.status = EntityStatus::Inactive;
                driver.is_current = false;
                Ok(true)
            }
            Subject::Company(id) => {
                let mut company = self
                    .companies
                    .get_mut(&id)
                    .ok_or(DeactivationError::SubjectNotFound { subject })?;
                if company.status == EntityStatus::Inactive {
                    return Ok(false);
                }
                company.status = EntityStatus::Inactive;
                Ok(true)
            }
        }
    }

    /// Number of drivers currently inactive.
    #[must_use]
    pub fn inactive_drivers(&self) -> u64 {
        self.drivers
            .iter()
            .filter(|r| r.status == EntityStatus::Inactive)
            .count() as u64
    }

    /// Number of companies currently inactive.
    #[must_use]
    pub fn inactive_companies(&self) -> u64 {
        self.companies
            .iter()
            .filter(|r| r.status == EntityStatus::Inactive)
            .count() as u64
    }
}
