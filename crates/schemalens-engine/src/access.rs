//! Access and ownership interpretation
//!
//! Compares granted privileges and table ownership against an expected
//! access profile and produces one pass/fail row per privilege plus a
//! narrative interpretation. The interpretation is composed only from
//! `ownership_ok`, `has_select` and `has_write`, so identical inputs
//! always produce the identical sentence.

use schemalens_core::TableMetadata;
use serde::{Deserialize, Serialize};

/// The fixed privilege set the interpreter checks, in report order
pub const CHECKED_PRIVILEGES: [&str; 4] = ["SELECT", "INSERT", "UPDATE", "DELETE"];

/// Expected access profile for a table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AccessProfile {
    /// Only SELECT is expected; missing write privileges are fine
    ReadOnly,

    /// All four privileges are expected
    ReadWrite,

    /// All four privileges plus ownership are expected
    Admin,
}

/// Pass/fail verdict for one privilege
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivilegeCheck {
    /// Privilege verb
    pub privilege: String,

    /// Whether the current user holds it
    pub granted: bool,

    /// Whether the absence (or presence) violates the expected profile
    pub mismatch: bool,
}

/// Full access interpretation for one table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessReport {
    /// One row per checked privilege, in SELECT/INSERT/UPDATE/DELETE order
    pub rows: Vec<PrivilegeCheck>,

    /// Whether the table owner is the connected identity
    pub ownership_ok: bool,

    /// Whether ownership violates the profile (Admin only)
    pub ownership_mismatch: bool,

    /// SELECT is granted
    pub has_select: bool,

    /// Any of INSERT/UPDATE/DELETE is granted
    pub has_write: bool,

    /// Total mismatches, including an Admin ownership mismatch
    pub mismatch_count: usize,

    /// Narrative interpretation of the three access booleans
    pub interpretation: String,
}

/// Interpret access for a table against an expected profile
///
/// Returns None when no privilege check result is attached; the section
/// is simply not computed rather than guessed at.
pub fn interpret_access(meta: &TableMetadata, profile: AccessProfile) -> Option<AccessReport> {
    let privileges = meta.privileges.as_ref()?;

    let rows: Vec<PrivilegeCheck> = CHECKED_PRIVILEGES
        .iter()
        .map(|&verb| {
            let granted = privileges.has(verb);
            let mismatch = match profile {
                AccessProfile::ReadOnly => verb == "SELECT" && !granted,
                AccessProfile::ReadWrite | AccessProfile::Admin => !granted,
            };
            PrivilegeCheck {
                privilege: verb.to_string(),
                granted,
                mismatch,
            }
        })
        .collect();

    let ownership_ok = privileges.owner == privileges.current_user;
    let ownership_mismatch = profile == AccessProfile::Admin && !ownership_ok;

    let has_select = rows[0].granted;
    let has_write = rows[1..].iter().any(|r| r.granted);

    let mismatch_count =
        rows.iter().filter(|r| r.mismatch).count() + usize::from(ownership_mismatch);

    Some(AccessReport {
        interpretation: compose_interpretation(ownership_ok, has_select, has_write),
        rows,
        ownership_ok,
        ownership_mismatch,
        has_select,
        has_write,
        mismatch_count,
    })
}

fn compose_interpretation(ownership_ok: bool, has_select: bool, has_write: bool) -> String {
    let access = match (has_select, has_write) {
        (true, true) => "The current user can read and modify this table",
        (true, false) => "The current user can read this table but cannot modify it",
        (false, true) => "The current user can modify this table but cannot read it back",
        (false, false) => "The current user has no effective access to this table",
    };
    let ownership = if ownership_ok {
        "and owns it"
    } else {
        "and does not own it"
    };
    format!("{} {}.", access, ownership)
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemalens_core::{PrivilegeSet, PrivilegeStatus, TableMetadata};

    fn table_with(granted: Vec<&str>, owner: &str, current_user: &str) -> TableMetadata {
        TableMetadata::new("public", "orders", owner, current_user).with_privileges(
            PrivilegeSet::new(
                granted.into_iter().map(String::from),
                vec![],
                owner,
                current_user,
                PrivilegeStatus::Pass,
            ),
        )
    }

    #[test]
    fn absent_privileges_skips_interpretation() {
        let meta = TableMetadata::new("public", "orders", "o", "u");
        assert!(interpret_access(&meta, AccessProfile::ReadOnly).is_none());
    }

    #[test]
    fn read_only_with_select_has_no_mismatches() {
        let meta = table_with(vec!["SELECT"], "app_owner", "report_user");
        let report = interpret_access(&meta, AccessProfile::ReadOnly).unwrap();
        assert_eq!(report.mismatch_count, 0);
        assert!(report.has_select);
        assert!(!report.has_write);
    }

    #[test]
    fn read_write_with_only_select_has_three_mismatches() {
        let meta = table_with(vec!["SELECT"], "app_owner", "report_user");
        let report = interpret_access(&meta, AccessProfile::ReadWrite).unwrap();
        assert_eq!(report.mismatch_count, 3);
        let mismatched: Vec<_> = report
            .rows
            .iter()
            .filter(|r| r.mismatch)
            .map(|r| r.privilege.as_str())
            .collect();
        assert_eq!(mismatched, vec!["INSERT", "UPDATE", "DELETE"]);
    }

    #[test]
    fn read_only_missing_select_is_a_mismatch() {
        let meta = table_with(vec!["INSERT"], "o", "u");
        let report = interpret_access(&meta, AccessProfile::ReadOnly).unwrap();
        assert_eq!(report.mismatch_count, 1);
        assert!(report.rows[0].mismatch);
        assert!(!report.rows[1].mismatch);
    }

    #[test]
    fn admin_requires_ownership() {
        let meta = table_with(
            vec!["SELECT", "INSERT", "UPDATE", "DELETE"],
            "app_owner",
            "deploy_user",
        );
        let report = interpret_access(&meta, AccessProfile::Admin).unwrap();
        assert!(report.ownership_mismatch);
        assert_eq!(report.mismatch_count, 1);

        let meta = table_with(
            vec!["SELECT", "INSERT", "UPDATE", "DELETE"],
            "deploy_user",
            "deploy_user",
        );
        let report = interpret_access(&meta, AccessProfile::Admin).unwrap();
        assert!(!report.ownership_mismatch);
        assert_eq!(report.mismatch_count, 0);
    }

    #[test]
    fn rows_keep_fixed_order() {
        let meta = table_with(vec!["DELETE", "SELECT"], "o", "u");
        let report = interpret_access(&meta, AccessProfile::ReadWrite).unwrap();
        let order: Vec<_> = report.rows.iter().map(|r| r.privilege.as_str()).collect();
        assert_eq!(order, vec!["SELECT", "INSERT", "UPDATE", "DELETE"]);
    }

    #[test]
    fn interpretation_is_deterministic() {
        let meta = table_with(vec!["SELECT"], "app_owner", "report_user");
        let a = interpret_access(&meta, AccessProfile::ReadOnly).unwrap();
        let b = interpret_access(&meta, AccessProfile::ReadOnly).unwrap();
        assert_eq!(a.interpretation, b.interpretation);
        assert_eq!(
            a.interpretation,
            "The current user can read this table but cannot modify it and does not own it."
        );
    }
}
