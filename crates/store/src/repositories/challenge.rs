//! OTP challenge repository.
//!
//! At most one live challenge exists per `(subject, purpose)`: issuing a
//! new one supersedes any prior unconsumed challenge. Consuming a
//! challenge is a compare-and-swap, so concurrent verifications of the
//! same code cannot both succeed.

use chrono::{DateTime, Utc};
use dashmap::DashMap;

use offboard_core::otp::{OtpChallenge, OtpError, OtpPurpose, OtpStatus};
use offboard_shared::types::{ChallengeId, Subject};

/// In-memory store of OTP challenges.
#[derive(Debug, Default)]
pub struct ChallengeRepository {
    challenges: DashMap<ChallengeId, OtpChallenge>,
    live_index: DashMap<(Subject, OtpPurpose), ChallengeId>,
}

impl ChallengeRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a freshly issued challenge, expiring any prior live
    /// challenge for the same `(subject, purpose)` binding.
    pub fn insert_superseding(&self, challenge: OtpChallenge) {
        let key = (challenge.subject, challenge.purpose);
        let id = challenge.id;
        self.challenges.insert(id, challenge);
        let superseded = self.live_index.insert(key, id);
        if let Some(prev_id) = superseded
            && prev_id != id
            && let Some(mut prev) = self.challenges.get_mut(&prev_id)
            && prev.status == OtpStatus::Sent
        {
            prev.status = OtpStatus::Expired;
        }
    }

    /// Returns a snapshot of a challenge.
    ///
    /// # Errors
    ///
    /// Returns `ChallengeNotFound` if no challenge has the given ID.
    pub fn get(&self, id: ChallengeId) -> Result<OtpChallenge, OtpError> {
        self.challenges
            .get(&id)
            .map(|c| c.clone())
            .ok_or(OtpError::ChallengeNotFound(id))
    }

    /// Marks a lapsed challenge as expired (idempotent).
    pub fn mark_expired(&self, id: ChallengeId) {
        let key = {
            let Some(mut challenge) = self.challenges.get_mut(&id) else {
                return;
            };
            if challenge.status == OtpStatus::Sent {
                challenge.status = OtpStatus::Expired;
            }
            (challenge.subject, challenge.purpose)
        };
        self.live_index.remove_if(&key, |_, live_id| *live_id == id);
    }

    /// Consumes a challenge after a successful verification.
    ///
    /// # Errors
    ///
    /// * `ChallengeNotFound` if no challenge has the given ID
    /// * `AlreadyUsed` if a concurrent verification consumed it first
    /// * `Expired` if it lapsed or was superseded in the meantime
    pub fn commit_verified(
        &self,
        id: ChallengeId,
        consumed_at: DateTime<Utc>,
    ) -> Result<OtpChallenge, OtpError> {
        let (updated, key) = {
            let mut entry = self
                .challenges
                .get_mut(&id)
                .ok_or(OtpError::ChallengeNotFound(id))?;
            match entry.status {
                OtpStatus::Verified => return Err(OtpError::AlreadyUsed),
                OtpStatus::Expired => return Err(OtpError::Expired),
                OtpStatus::Sent => {}
            }
            entry.status = OtpStatus::Verified;
            entry.consumed_at = Some(consumed_at);
            (entry.clone(), (entry.subject, entry.purpose))
        };
        self.live_index.remove_if(&key, |_, live_id| *live_id == id);
        Ok(updated)
    }
}
