//! Report schema (stable v1)
//!
//! This schema is STABLE and VERSIONED.
//! Breaking changes require a new version.

use crate::finding::{DriftSection, Finding, Severity};
use serde::{Deserialize, Serialize};

/// Report schema version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportVersion {
    /// Major version (breaking changes)
    pub major: u32,

    /// Minor version (backward-compatible additions)
    pub minor: u32,
}

impl ReportVersion {
    /// Current report schema version
    pub const CURRENT: ReportVersion = ReportVersion { major: 1, minor: 0 };
}

impl std::fmt::Display for ReportVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Summary statistics for a diagnostic report
///
/// All counts cover the full population: drift totals come from section
/// counts, never from materialized item lists, and display filters never
/// change them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    /// Total number of findings
    pub total_findings: usize,

    /// Error-level findings
    pub errors: usize,

    /// Warning-level findings
    pub warnings: usize,

    /// Info-level findings
    pub info: usize,

    /// MATCH items across all drift sections (population counts)
    pub match_total: usize,

    /// DIFFER items across all drift sections
    pub differ_total: usize,

    /// UNKNOWN items across all drift sections
    pub unknown_total: usize,

    /// KPI: error-level drift items
    pub compatibility_errors: usize,

    /// KPI: migration provenance mismatches
    pub missing_migrations: usize,

    /// KPI: warning-level index drift items
    pub performance_warnings: usize,
}

/// Diagnostic report (report.json v1)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Schema version
    pub version: ReportVersion,

    /// Timestamp (ISO 8601)
    pub timestamp: String,

    /// Summary statistics
    pub summary: ReportSummary,

    /// Single-environment findings
    pub findings: Vec<Finding>,

    /// Cross-environment drift sections
    pub sections: Vec<DriftSection>,

    /// Metadata
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

impl Report {
    /// Create a new empty report
    pub fn new() -> Self {
        Self {
            version: ReportVersion::CURRENT,
            timestamp: chrono::Utc::now().to_rfc3339(),
            summary: ReportSummary::default(),
            findings: Vec::new(),
            sections: Vec::new(),
            metadata: None,
        }
    }

    /// Build a report from findings and drift sections
    ///
    /// Severity and drift totals are derived here; the three KPI fields
    /// are supplied by the aggregator because their category rules live
    /// there.
    pub fn from_parts(findings: Vec<Finding>, sections: Vec<DriftSection>) -> Self {
        let summary = ReportSummary {
            total_findings: findings.len(),
            errors: findings.iter().filter(|f| f.severity == Severity::Error).count(),
            warnings: findings.iter().filter(|f| f.severity == Severity::Warn).count(),
            info: findings.iter().filter(|f| f.severity == Severity::Info).count(),
            match_total: sections.iter().map(|s| s.match_count).sum(),
            differ_total: sections.iter().map(|s| s.differ_count).sum(),
            unknown_total: sections.iter().map(|s| s.unknown_count).sum(),
            ..ReportSummary::default()
        };

        Self {
            version: ReportVersion::CURRENT,
            timestamp: chrono::Utc::now().to_rfc3339(),
            summary,
            findings,
            sections,
            metadata: None,
        }
    }

    /// Set the KPI fields computed by the aggregator
    pub fn with_kpis(
        mut self,
        compatibility_errors: usize,
        missing_migrations: usize,
        performance_warnings: usize,
    ) -> Self {
        self.summary.compatibility_errors = compatibility_errors;
        self.summary.missing_migrations = missing_migrations;
        self.summary.performance_warnings = performance_warnings;
        self
    }

    /// Check if the report has any errors
    pub fn has_errors(&self) -> bool {
        self.summary.errors > 0 || self.summary.compatibility_errors > 0
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl Default for Report {
    fn default() -> Self {
        Self::new()
    }
}
