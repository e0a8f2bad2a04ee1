//! The deactivation approval workflow orchestrator.
//!
//! Each boundary operation follows the same shape: fetch a snapshot,
//! validate the transition through the stateless core services, commit
//! via compare-and-swap, and record an audit entry - success or denied -
//! before returning. Raw OTP codes are returned to the caller exactly
//! once for out-of-band delivery and never appear in audit metadata or
//! log output.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use offboard_core::audit::{AuditAction, AuditActor, AuditEntry};
use offboard_core::deactivation::{
    DeactivationError, DeactivationRequest, DeactivationService, RequestStatus,
};
use offboard_core::otp::{
    IssuedChallenge, OtpChallenge, OtpError, OtpIssuer, OtpPurpose, OtpVerifier,
};
use offboard_core::stats::DeactivationStats;
use offboard_shared::OtpConfig;
use offboard_shared::types::{Actor, ChallengeId, CompanyId, DriverId, RequestId, Subject};

use crate::executor::{DeactivationExecutor, ExecutionOutcome};
use crate::repositories::{
    AuditLog, ChallengeRepository, EntityRepository, RequestRepository, StatsRepository,
};

/// Caller context recorded with OTP verification attempts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientContext {
    /// IP address the submission arrived from.
    pub client_ip: String,
    /// User agent string of the submitting client.
    pub user_agent: String,
}

/// Drives deactivation requests through the two-admin approval chain.
pub struct ApprovalWorkflow {
    requests: Arc<RequestRepository>,
    challenges: Arc<ChallengeRepository>,
    entities: Arc<EntityRepository>,
    audit: Arc<AuditLog>,
    executor: DeactivationExecutor,
    stats: StatsRepository,
    otp: OtpConfig,
}

impl ApprovalWorkflow {
    /// Creates a workflow over the given entity registry and audit sink.
    #[must_use]
    pub fn new(entities: Arc<EntityRepository>, audit: Arc<AuditLog>, otp: OtpConfig) -> Self {
        let requests = Arc::new(RequestRepository::new());
        let challenges = Arc::new(ChallengeRepository::new());
        let executor = DeactivationExecutor::new(Arc::clone(&entities));
        let stats = StatsRepository::new(Arc::clone(&requests), Arc::clone(&entities));
        Self {
            requests,
            challenges,
            entities,
            audit,
            executor,
            stats,
            otp,
        }
    }

    /// Creates a deactivation request for a driver account.
    ///
    /// # Errors
    ///
    /// See [`Self::request_deactivation`].
    pub fn create_driver_deactivation(
        &self,
        driver: DriverId,
        reason: &str,
        requested_by: &Actor,
    ) -> Result<DeactivationRequest, DeactivationError> {
        self.request_deactivation(Subject::Driver(driver), reason, requested_by)
    }

    /// Creates a deactivation request for a company account.
    ///
    /// # Errors
    ///
    /// See [`Self::request_deactivation`].
    pub fn create_company_deactivation(
        &self,
        company: CompanyId,
        reason: &str,
        requested_by: &Actor,
    ) -> Result<DeactivationRequest, DeactivationError> {
        self.request_deactivation(Subject::Company(company), reason, requested_by)
    }

    /// Creates a pending deactivation request.
    ///
    /// # Errors
    ///
    /// * `Validation` if the reason is empty
    /// * `SubjectNotFound` if the subject is not registered
    /// * `SubjectInactive` if the subject is not currently active
    /// * `OpenRequestExists` if the subject already has an open request
    pub fn request_deactivation(
        &self,
        subject: Subject,
        reason: &str,
        requested_by: &Actor,
    ) -> Result<DeactivationRequest, DeactivationError> {
        let active = self.entities.is_active(subject)?;
        DeactivationService::request(subject, active, reason)?;

        let now = Utc::now();
        let request =
            DeactivationRequest::new(subject, reason.to_string(), requested_by.id, now);
        let request = self.requests.insert(request)?;

        self.audit.record(AuditEntry::success(
            AuditActor::Admin(requested_by.id),
            subject,
            AuditAction::DeactivationRequested,
            json!({ "request_id": request.id, "reason": reason }),
            now,
        ));
        tracing::info!(request_id = %request.id, subject = %subject, "deactivation requested");
        Ok(request)
    }

    /// Takes a pending request under review (Admin-II).
    ///
    /// # Errors
    ///
    /// * `RequestNotFound` if the request does not exist
    /// * `InvalidTransition` if the request is not pending
    /// * `RoleAuthorization` if the reviewer does not hold Admin-II
    /// * `ConcurrencyConflict` if a concurrent transition won the race
    pub fn review(
        &self,
        request_id: RequestId,
        reviewer: &Actor,
    ) -> Result<DeactivationRequest, DeactivationError> {
        let request = self.requests.get(request_id)?;
        let now = Utc::now();

        let action = match DeactivationService::review(request.status, reviewer) {
            Ok(action) => action,
            Err(err) => {
                self.audit_denied(
                    AuditActor::Admin(reviewer.id),
                    request.subject,
                    AuditAction::DeactivationReviewed,
                    &err,
                    json!({ "request_id": request_id }),
                );
                return Err(err);
            }
        };

        let updated = match self
            .requests
            .apply_transition(request_id, request.status, &action)
        {
            Ok(updated) => updated,
            Err(err) => {
                self.audit_denied(
                    AuditActor::Admin(reviewer.id),
                    request.subject,
                    AuditAction::DeactivationReviewed,
                    &err,
                    json!({ "request_id": request_id }),
                );
                return Err(err);
            }
        };

        self.audit.record(AuditEntry::success(
            AuditActor::Admin(reviewer.id),
            updated.subject,
            AuditAction::DeactivationReviewed,
            json!({ "request_id": request_id, "admin_level": "admin_ii" }),
            now,
        ));
        tracing::info!(request_id = %request_id, "deactivation request under review");
        Ok(updated)
    }

    /// Approves a reviewed request (Admin-I) and issues the confirmation
    /// OTP.
    ///
    /// The returned [`IssuedChallenge`] carries the human-readable code;
    /// delivering it through an out-of-band channel is the caller's
    /// responsibility.
    ///
    /// # Errors
    ///
    /// * `RequestNotFound` if the request does not exist
    /// * `InvalidTransition` if the request is not under review
    /// * `RoleAuthorization` if the approver does not hold Admin-I
    /// * `ConcurrencyConflict` if a concurrent transition won the race
    pub fn approve(
        &self,
        request_id: RequestId,
        approver: &Actor,
    ) -> Result<(DeactivationRequest, IssuedChallenge), DeactivationError> {
        let request = self.requests.get(request_id)?;
        let now = Utc::now();

        let action = match DeactivationService::approve(request.status, approver) {
            Ok(action) => action,
            Err(err) => {
                self.audit_denied(
                    AuditActor::Admin(approver.id),
                    request.subject,
                    AuditAction::DeactivationApproved,
                    &err,
                    json!({ "request_id": request_id }),
                );
                return Err(err);
            }
        };

        let updated = match self
            .requests
            .apply_transition(request_id, request.status, &action)
        {
            Ok(updated) => updated,
            Err(err) => {
                self.audit_denied(
                    AuditActor::Admin(approver.id),
                    request.subject,
                    AuditAction::DeactivationApproved,
                    &err,
                    json!({ "request_id": request_id }),
                );
                return Err(err);
            }
        };

        let issued = OtpIssuer::issue(
            updated.subject,
            OtpPurpose::DeactivationConfirmation,
            now,
            self.otp.code_ttl(),
        );
        self.challenges.insert_superseding(issued.challenge.clone());

        self.audit.record(AuditEntry::success(
            AuditActor::Admin(approver.id),
            updated.subject,
            AuditAction::DeactivationApproved,
            json!({
                "request_id": request_id,
                "admin_level": "admin_i",
                "challenge_id": issued.challenge.id,
                "expires_at": issued.challenge.expires_at,
            }),
            now,
        ));
        tracing::info!(
            request_id = %request_id,
            challenge_id = %issued.challenge.id,
            "deactivation approved, confirmation code issued"
        );
        Ok((updated, issued))
    }

    /// Rejects an open request.
    ///
    /// # Errors
    ///
    /// * `RequestNotFound` if the request does not exist
    /// * `Validation` if the reason is empty
    /// * `InvalidTransition` if the request already terminated
    /// * `RoleAuthorization` if the actor holds no admin role
    /// * `ConcurrencyConflict` if a concurrent transition won the race
    pub fn reject(
        &self,
        request_id: RequestId,
        actor: &Actor,
        reason: &str,
    ) -> Result<DeactivationRequest, DeactivationError> {
        let request = self.requests.get(request_id)?;
        let now = Utc::now();

        let action = DeactivationService::reject(request.status, actor, reason.to_string())?;
        let updated = self
            .requests
            .apply_transition(request_id, request.status, &action)?;

        self.audit.record(AuditEntry::success(
            AuditActor::Admin(actor.id),
            updated.subject,
            AuditAction::DeactivationRejected,
            json!({ "request_id": request_id, "reason": reason }),
            now,
        ));
        tracing::info!(request_id = %request_id, "deactivation request rejected");
        Ok(updated)
    }

    /// Verifies a deactivation confirmation code and, on success,
    /// deactivates the subject and confirms the owning request.
    ///
    /// On OTP failure the verifier's error propagates untouched and the
    /// request is not mutated - with one exception: a lapsed window
    /// moves the owning request from approved to expired (lazy expiry).
    ///
    /// # Errors
    ///
    /// * `ChallengeNotFound` if the challenge does not exist
    /// * `Validation` if the challenge is not a deactivation confirmation
    /// * `Otp` for expired, mismatched, or reused codes
    /// * `ApprovedRequestNotFound` if no approved request owns the
    ///   challenge anymore
    pub fn verify_and_execute(
        &self,
        challenge_id: ChallengeId,
        submitted_code: &str,
        client: &ClientContext,
    ) -> Result<DeactivationRequest, DeactivationError> {
        let challenge = self.challenges.get(challenge_id)?;
        if challenge.purpose != OtpPurpose::DeactivationConfirmation {
            return Err(DeactivationError::Validation(
                "challenge was not issued for deactivation confirmation".to_string(),
            ));
        }

        let now = Utc::now();
        let verdict = match OtpVerifier::verify(&challenge, submitted_code, now) {
            Ok(verdict) => verdict,
            Err(err) => {
                if matches!(err, OtpError::Expired) {
                    self.expire_challenge_and_request(&challenge);
                }
                self.audit_denied_verify(&challenge, &err, client);
                return Err(err.into());
            }
        };

        // Single-use commit; a concurrent verification may have won.
        if let Err(err) = self.challenges.commit_verified(challenge_id, verdict.consumed_at) {
            self.audit_denied_verify(&challenge, &err, client);
            return Err(err.into());
        }

        let owning = self.requests.approved_for(challenge.subject).ok_or(
            DeactivationError::ApprovedRequestNotFound {
                subject: challenge.subject,
            },
        )?;

        let outcome = self.executor.execute(challenge.subject)?;
        let action = DeactivationService::confirm(owning.status)?;
        let updated = self
            .requests
            .apply_transition(owning.id, RequestStatus::Approved, &action)?;

        if outcome == ExecutionOutcome::Deactivated {
            self.audit.record(AuditEntry::success(
                AuditActor::System,
                updated.subject,
                AuditAction::deactivated(updated.subject.kind()),
                json!({
                    "request_id": updated.id,
                    "challenge_id": challenge_id,
                    "client_ip": client.client_ip,
                    "user_agent": client.user_agent,
                }),
                now,
            ));
        }
        tracing::info!(
            request_id = %updated.id,
            subject = %updated.subject,
            "deactivation confirmed"
        );
        Ok(updated)
    }

    /// Issues an OTP for ad hoc identity re-verification, outside the
    /// approval chain.
    ///
    /// # Errors
    ///
    /// Returns `SubjectNotFound` if the subject is not registered.
    pub fn issue_security_challenge(
        &self,
        subject: Subject,
        reason: &str,
    ) -> Result<IssuedChallenge, DeactivationError> {
        if !self.entities.exists(subject) {
            return Err(DeactivationError::SubjectNotFound { subject });
        }

        let now = Utc::now();
        let issued = OtpIssuer::issue(
            subject,
            OtpPurpose::SecurityChallenge,
            now,
            self.otp.code_ttl(),
        );
        self.challenges.insert_superseding(issued.challenge.clone());

        self.audit.record(AuditEntry::success(
            AuditActor::System,
            subject,
            AuditAction::OtpChallengeSent,
            json!({
                "challenge_id": issued.challenge.id,
                "purpose": issued.challenge.purpose,
                "reason": reason,
            }),
            now,
        ));
        tracing::info!(
            challenge_id = %issued.challenge.id,
            subject = %subject,
            "security challenge issued"
        );
        Ok(issued)
    }

    /// Verifies a security challenge code.
    ///
    /// # Errors
    ///
    /// * `ChallengeNotFound` if the challenge does not exist
    /// * `Validation` if the challenge is not a security challenge
    /// * `Otp` for expired, mismatched, or reused codes
    pub fn verify_security_challenge(
        &self,
        challenge_id: ChallengeId,
        submitted_code: &str,
        client: &ClientContext,
    ) -> Result<OtpChallenge, DeactivationError> {
        let challenge = self.challenges.get(challenge_id)?;
        if challenge.purpose != OtpPurpose::SecurityChallenge {
            return Err(DeactivationError::Validation(
                "challenge was not issued as a security challenge".to_string(),
            ));
        }

        let now = Utc::now();
        let verdict = match OtpVerifier::verify(&challenge, submitted_code, now) {
            Ok(verdict) => verdict,
            Err(err) => {
                if matches!(err, OtpError::Expired) {
                    self.challenges.mark_expired(challenge_id);
                }
                self.audit_denied_verify(&challenge, &err, client);
                return Err(err.into());
            }
        };

        let updated = match self.challenges.commit_verified(challenge_id, verdict.consumed_at) {
            Ok(updated) => updated,
            Err(err) => {
                self.audit_denied_verify(&challenge, &err, client);
                return Err(err.into());
            }
        };

        self.audit.record(AuditEntry::success(
            AuditActor::System,
            updated.subject,
            AuditAction::OtpChallengeVerified,
            json!({
                "challenge_id": challenge_id,
                "purpose": updated.purpose,
                "client_ip": client.client_ip,
                "user_agent": client.user_agent,
            }),
            now,
        ));
        Ok(updated)
    }

    /// Computes dashboard rollups. `on_day` scopes the approved count
    /// and defaults to the current UTC day.
    #[must_use]
    pub fn stats(&self, on_day: Option<NaiveDate>) -> DeactivationStats {
        self.stats.compute(on_day)
    }

    /// Returns a snapshot of a request.
    ///
    /// # Errors
    ///
    /// Returns `RequestNotFound` if the request does not exist.
    pub fn request(&self, request_id: RequestId) -> Result<DeactivationRequest, DeactivationError> {
        self.requests.get(request_id)
    }

    /// Returns a snapshot of a challenge (digest only; the raw code is
    /// never stored).
    ///
    /// # Errors
    ///
    /// Returns `ChallengeNotFound` if the challenge does not exist.
    pub fn challenge(&self, challenge_id: ChallengeId) -> Result<OtpChallenge, DeactivationError> {
        Ok(self.challenges.get(challenge_id)?)
    }

    /// Lazily expires a lapsed confirmation challenge and its owning
    /// approved request.
    fn expire_challenge_and_request(&self, challenge: &OtpChallenge) {
        self.challenges.mark_expired(challenge.id);
        if let Some(owning) = self.requests.approved_for(challenge.subject)
            && let Ok(action) = DeactivationService::expire(owning.status)
        {
            // A concurrent reject may win this race; the request is
            // terminal either way, so the conflict is ignorable.
            if let Err(err) = self
                .requests
                .apply_transition(owning.id, RequestStatus::Approved, &action)
            {
                tracing::debug!(request_id = %owning.id, error = %err, "lazy expiry lost a race");
            } else {
                tracing::info!(request_id = %owning.id, "deactivation request expired");
            }
        }
    }

    fn audit_denied(
        &self,
        actor: AuditActor,
        subject: Subject,
        action: AuditAction,
        err: &DeactivationError,
        mut metadata: serde_json::Value,
    ) {
        if let Some(map) = metadata.as_object_mut() {
            map.insert("error".to_string(), json!(err.error_code()));
        }
        self.audit
            .record(AuditEntry::denied(actor, subject, action, metadata, Utc::now()));
        tracing::warn!(subject = %subject, error = err.error_code(), "workflow attempt denied");
    }

    fn audit_denied_verify(&self, challenge: &OtpChallenge, err: &OtpError, client: &ClientContext) {
        self.audit.record(AuditEntry::denied(
            AuditActor::System,
            challenge.subject,
            AuditAction::OtpChallengeVerified,
            json!({
                "challenge_id": challenge.id,
                "purpose": challenge.purpose,
                "error": err.error_code(),
                "client_ip": client.client_ip,
                "user_agent": client.user_agent,
            }),
            Utc::now(),
        ));
        tracing::warn!(
            challenge_id = %challenge.id,
            error = err.error_code(),
            "otp verification denied"
        );
    }
}
