//! Property-based tests for DeactivationService.
//!
//! These tests validate the strictness of the approval state graph using
//! proptest for randomized input generation: no transition may skip a
//! state, and no actor may act outside its role.

use proptest::prelude::*;

use offboard_shared::types::{Actor, ActorId, AdminRole, CompanyId, DriverId, Subject};
use uuid::Uuid;

use crate::deactivation::error::DeactivationError;
use crate::deactivation::service::DeactivationService;
use crate::deactivation::types::RequestStatus;

/// Strategy for generating random RequestStatus values.
fn arb_status() -> impl Strategy<Value = RequestStatus> {
    prop_oneof![
        Just(RequestStatus::Pending),
        Just(RequestStatus::UnderReview),
        Just(RequestStatus::Approved),
        Just(RequestStatus::Confirmed),
        Just(RequestStatus::Rejected),
        Just(RequestStatus::Expired),
    ]
}

/// Strategy for generating actors with an arbitrary subset of roles.
fn arb_actor() -> impl Strategy<Value = Actor> {
    (any::<u128>(), any::<bool>(), any::<bool>()).prop_map(|(id, two, one)| {
        let mut roles = Vec::new();
        if two {
            roles.push(AdminRole::AdminTwo);
        }
        if one {
            roles.push(AdminRole::AdminOne);
        }
        Actor::new(ActorId::from_uuid(Uuid::from_u128(id)), roles)
    })
}

/// Strategy for generating random subjects of either kind.
fn arb_subject() -> impl Strategy<Value = Subject> {
    (any::<u128>(), any::<bool>()).prop_map(|(id, is_driver)| {
        if is_driver {
            Subject::Driver(DriverId::from_uuid(Uuid::from_u128(id)))
        } else {
            Subject::Company(CompanyId::from_uuid(Uuid::from_u128(id)))
        }
    })
}

/// Strategy for generating non-empty reasons.
fn arb_reason() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ]{1,80}".prop_map(|s| s.trim().to_string())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Every successful transition lands on a status reachable from the
    /// current one in the state graph - no transition skips a state.
    #[test]
    fn prop_actions_follow_the_graph(status in arb_status(), actor in arb_actor()) {
        for action in [
            DeactivationService::review(status, &actor),
            DeactivationService::approve(status, &actor),
            DeactivationService::confirm(status),
            DeactivationService::reject(status, &actor, "reason".into()),
            DeactivationService::expire(status),
        ]
        .into_iter()
        .flatten()
        {
            prop_assert!(
                DeactivationService::is_valid_transition(status, action.new_status()),
                "{:?} -> {:?} escaped the graph",
                status,
                action.new_status()
            );
        }
    }

    /// Review succeeds exactly when the request is pending and the actor
    /// holds Admin-II.
    #[test]
    fn prop_review_gated_by_status_and_role(status in arb_status(), actor in arb_actor()) {
        let result = DeactivationService::review(status, &actor);
        let expected_ok = status == RequestStatus::Pending && actor.has_role(AdminRole::AdminTwo);
        prop_assert_eq!(result.is_ok(), expected_ok);
    }

    /// Approve succeeds exactly when the request is under review and the
    /// actor holds Admin-I.
    #[test]
    fn prop_approve_gated_by_status_and_role(status in arb_status(), actor in arb_actor()) {
        let result = DeactivationService::approve(status, &actor);
        let expected_ok =
            status == RequestStatus::UnderReview && actor.has_role(AdminRole::AdminOne);
        prop_assert_eq!(result.is_ok(), expected_ok);
    }

    /// Status precondition failures are reported before role failures,
    /// and always as InvalidTransition.
    #[test]
    fn prop_wrong_status_reports_invalid_transition(status in arb_status(), actor in arb_actor()) {
        prop_assume!(status != RequestStatus::Pending);
        match DeactivationService::review(status, &actor) {
            Err(DeactivationError::InvalidTransition { from, to }) => {
                prop_assert_eq!(from, status);
                prop_assert_eq!(to, RequestStatus::UnderReview);
            }
            other => prop_assert!(false, "expected InvalidTransition, got {other:?}"),
        }
    }

    /// Terminal requests admit no transition at all.
    #[test]
    fn prop_terminal_states_are_absorbing(
        status in arb_status(),
        actor in arb_actor(),
        reason in arb_reason()
    ) {
        prop_assume!(status.is_terminal());
        prop_assume!(!reason.is_empty());
        prop_assert!(DeactivationService::review(status, &actor).is_err());
        prop_assert!(DeactivationService::approve(status, &actor).is_err());
        prop_assert!(DeactivationService::confirm(status).is_err());
        prop_assert!(DeactivationService::reject(status, &actor, reason).is_err());
        prop_assert!(DeactivationService::expire(status).is_err());
    }

    /// Creating a request for an inactive subject always fails and
    /// reports the subject, never a request.
    #[test]
    fn prop_inactive_subject_rejected_at_creation(
        subject in arb_subject(),
        reason in arb_reason()
    ) {
        prop_assume!(!reason.is_empty());
        match DeactivationService::request(subject, false, &reason) {
            Err(DeactivationError::SubjectInactive { subject: reported }) => {
                prop_assert_eq!(reported, subject);
            }
            other => prop_assert!(false, "expected SubjectInactive, got {:?}", other.is_ok()),
        }
    }
}
