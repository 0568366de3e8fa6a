//! Outcome reports for permission operations.

use crate::types::Permission;

/// Outcome of a single permission grant.
#[derive(Debug)]
pub enum GrantStatus {
    /// The permission was created on the backend.
    Granted(Permission),
    /// The input failed local validation; no backend call was made.
    Rejected(GrantRejection),
}

impl GrantStatus {
    /// Returns true if the permission was created.
    pub fn is_granted(&self) -> bool {
        matches!(self, GrantStatus::Granted(_))
    }
}

/// Reason a grant was rejected before reaching the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrantRejection {
    /// The file id was empty.
    MissingFileId,
    /// The address is not covered by the domain allow-list.
    AddressNotAllowed,
}

/// A grant that reached the backend and failed there.
#[derive(Debug, Clone)]
pub struct GrantFailure {
    /// Address the grant was for.
    pub address: String,
    /// Error reported by the backend.
    pub error: String,
}

/// Per-address outcome of a batch grant.
#[derive(Debug, Default)]
pub struct GrantReport {
    /// Addresses whose permission was created.
    pub granted: Vec<String>,
    /// Addresses rejected by validation, without a backend call.
    pub rejected: Vec<String>,
    /// Addresses whose grant failed on the backend.
    pub failed: Vec<GrantFailure>,
}

impl GrantReport {
    /// Returns true when every address was granted.
    pub fn is_complete(&self) -> bool {
        self.rejected.is_empty() && self.failed.is_empty()
    }
}

/// A revocation that failed on the backend.
#[derive(Debug, Clone)]
pub struct RevokeFailure {
    /// Permission id the delete was for.
    pub permission_id: String,
    /// Error reported by the backend.
    pub error: String,
}

/// Outcome of a reader reconciliation.
#[derive(Debug, Default)]
pub struct ReconcileReport {
    /// Permission ids that were revoked.
    pub revoked: Vec<String>,
    /// Revocations that failed on the backend.
    pub revoke_failures: Vec<RevokeFailure>,
    /// Per-address outcome of the grant phase.
    pub grants: GrantReport,
}

impl ReconcileReport {
    /// Returns true when every revocation and every grant succeeded.
    pub fn is_complete(&self) -> bool {
        self.revoke_failures.is_empty() && self.grants.is_complete()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_reports_are_complete() {
        assert!(GrantReport::default().is_complete());
        assert!(ReconcileReport::default().is_complete());
    }

    #[test]
    fn test_rejection_marks_report_incomplete() {
        let report = GrantReport {
            granted: vec!["a@gmail.com".to_string()],
            rejected: vec!["b@example.com".to_string()],
            failed: vec![],
        };
        assert!(!report.is_complete());
    }

    #[test]
    fn test_revoke_failure_marks_reconcile_incomplete() {
        let report = ReconcileReport {
            revoked: vec!["perm1".to_string()],
            revoke_failures: vec![RevokeFailure {
                permission_id: "perm2".to_string(),
                error: "API error (status 500): boom".to_string(),
            }],
            grants: GrantReport::default(),
        };
        assert!(!report.is_complete());
    }
}
