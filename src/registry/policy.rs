//! Ownership arbitration policies.
//!
//! A policy only picks a winner among the current candidates of one touch;
//! the registry enforces exclusivity and notifies everyone else.

use serde::{Deserialize, Serialize};

use super::entry::TouchEntry;
use super::events::AreaId;

/// How the registry resolves competing ownership requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OwnershipPolicy {
    /// The first candidate to request ownership wins immediately
    #[default]
    FirstRequester,
    /// Candidates are served in registration order: a request is granted
    /// only once every candidate registered before it has withdrawn
    CandidateOrder,
}

impl OwnershipPolicy {
    /// Pick the winner for a touch, or `None` if the decision must wait
    pub fn winner(&self, entry: &TouchEntry) -> Option<AreaId> {
        match self {
            OwnershipPolicy::FirstRequester => entry
                .candidates
                .iter()
                .filter_map(|c| c.requested.map(|seq| (seq, c.area)))
                .min_by_key(|(seq, _)| *seq)
                .map(|(_, area)| area),
            OwnershipPolicy::CandidateOrder => entry
                .candidates
                .first()
                .filter(|c| c.requested.is_some())
                .map(|c| c.area),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::entry::Candidate;

    fn entry(candidates: &[(u32, Option<u64>)]) -> TouchEntry {
        TouchEntry {
            candidates: candidates
                .iter()
                .map(|(area, requested)| Candidate {
                    area: AreaId(*area),
                    requested: *requested,
                })
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_no_request_no_winner() {
        let e = entry(&[(1, None), (2, None)]);
        assert_eq!(OwnershipPolicy::FirstRequester.winner(&e), None);
        assert_eq!(OwnershipPolicy::CandidateOrder.winner(&e), None);
    }

    #[test]
    fn test_first_requester_ignores_registration_order() {
        let e = entry(&[(1, Some(7)), (2, Some(3))]);
        assert_eq!(OwnershipPolicy::FirstRequester.winner(&e), Some(AreaId(2)));
    }

    #[test]
    fn test_candidate_order_waits_for_earlier_candidate() {
        let e = entry(&[(1, None), (2, Some(3))]);
        assert_eq!(OwnershipPolicy::CandidateOrder.winner(&e), None);

        let e = entry(&[(2, Some(3))]);
        assert_eq!(OwnershipPolicy::CandidateOrder.winner(&e), Some(AreaId(2)));
    }

    #[test]
    fn test_policy_json_names() {
        let policy: OwnershipPolicy = serde_json::from_str("\"candidate_order\"").unwrap();
        assert_eq!(policy, OwnershipPolicy::CandidateOrder);
    }
}
