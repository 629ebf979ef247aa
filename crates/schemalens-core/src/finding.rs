//! Finding and drift value types
//!
//! IMPORTANT: finding codes and drift categories are versioned and stable.
//! NEVER rename or remove codes - they are part of the public API.
//! Add new codes with new names only.

use serde::{Deserialize, Serialize};

/// Finding severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational message
    Info,

    /// Warning - should be reviewed but not blocking
    Warn,

    /// Error - blocking issue
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Stable codes for single-environment findings (v1)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FindingCode {
    /// Self-referencing foreign key combined with cascading deletes
    RecursiveCascade,

    /// Unique constraint spanning three or more columns
    CompositeUnique,

    /// NOT NULL columns declared without a default
    NotNullNoDefault,

    /// CHECK constraints restricting column values
    CheckConstraints,

    /// Table has no primary key
    MissingPrimaryKey,

    /// Cascading foreign key fans out deletes to dependent rows
    CascadeFanout,

    /// Granted privileges do not match the expected access profile
    AccessMismatch,
}

impl FindingCode {
    /// Get the code as a stable string identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RecursiveCascade => "RECURSIVE_CASCADE",
            Self::CompositeUnique => "COMPOSITE_UNIQUE",
            Self::NotNullNoDefault => "NOT_NULL_NO_DEFAULT",
            Self::CheckConstraints => "CHECK_CONSTRAINTS",
            Self::MissingPrimaryKey => "MISSING_PRIMARY_KEY",
            Self::CascadeFanout => "CASCADE_FANOUT",
            Self::AccessMismatch => "ACCESS_MISMATCH",
        }
    }
}

impl std::fmt::Display for FindingCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A classified, severity-tagged statement about one diagnostic fact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// Severity level
    pub severity: Severity,

    /// Stable category code
    pub code: FindingCode,

    /// Short title
    pub title: String,

    /// Human-readable description naming the offending identifiers
    pub description: String,

    /// Suggested remediation, if any
    pub recommendation: Option<String>,

    /// Concrete identifiers backing the finding, in a stable order
    pub evidence: Vec<String>,
}

impl Finding {
    /// Create a finding with no recommendation or evidence
    pub fn new(
        severity: Severity,
        code: FindingCode,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            code,
            title: title.into(),
            description: description.into(),
            recommendation: None,
            evidence: Vec::new(),
        }
    }

    /// Set the recommendation
    pub fn with_recommendation(mut self, recommendation: impl Into<String>) -> Self {
        self.recommendation = Some(recommendation.into());
        self
    }

    /// Set the evidence list
    pub fn with_evidence(mut self, evidence: Vec<String>) -> Self {
        self.evidence = evidence;
        self
    }
}

/// Risk tier assigned to a foreign key
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    Low,
    Moderate,
    High,
    Critical,
}

impl std::fmt::Display for RiskTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Moderate => write!(f, "moderate"),
            Self::High => write!(f, "high"),
            Self::Critical => write!(f, "critical"),
        }
    }
}

/// Risk level attached to structural drift items
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "Low"),
            Self::Medium => write!(f, "Medium"),
            Self::High => write!(f, "High"),
        }
    }
}

/// Comparison status of one attribute across two environments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DriftStatus {
    /// Normalized values are equal
    Match,

    /// Both sides readable, values differ
    Differ,

    /// Either side could not be retrieved
    Unknown,
}

impl std::fmt::Display for DriftStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Match => write!(f, "MATCH"),
            Self::Differ => write!(f, "DIFFER"),
            Self::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// Stable drift categories (v1)
///
/// Each category carries a base severity for DIFFER items and, for the
/// structural ones, a risk level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DriftCategory {
    /// Table present in one environment only
    TablePresence,

    /// Column present in one environment only
    ColumnPresence,

    /// Column data type differs
    ColumnType,

    /// Column nullability differs
    ColumnNullability,

    /// Column default expression differs
    ColumnDefault,

    /// Index present in one environment only
    IndexPresence,

    /// Index definition (columns, uniqueness, access method) differs
    IndexDefinition,

    /// Constraint present in one environment only
    ConstraintPresence,

    /// Constraint definition differs
    ConstraintDefinition,

    /// Granted privileges differ
    Grant,

    /// Table ownership differs
    Ownership,

    /// Comment or description differs
    Comment,

    /// Migration provenance differs
    Migration,
}

impl DriftCategory {
    /// Stable string identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TablePresence => "TABLE_PRESENCE",
            Self::ColumnPresence => "COLUMN_PRESENCE",
            Self::ColumnType => "COLUMN_TYPE",
            Self::ColumnNullability => "COLUMN_NULLABILITY",
            Self::ColumnDefault => "COLUMN_DEFAULT",
            Self::IndexPresence => "INDEX_PRESENCE",
            Self::IndexDefinition => "INDEX_DEFINITION",
            Self::ConstraintPresence => "CONSTRAINT_PRESENCE",
            Self::ConstraintDefinition => "CONSTRAINT_DEFINITION",
            Self::Grant => "GRANT",
            Self::Ownership => "OWNERSHIP",
            Self::Comment => "COMMENT",
            Self::Migration => "MIGRATION",
        }
    }

    /// Base severity for a DIFFER item in this category
    ///
    /// MATCH items are always reported as Info regardless of category.
    pub fn base_severity(&self) -> Severity {
        match self {
            Self::TablePresence | Self::ColumnPresence | Self::ColumnType => Severity::Error,
            Self::ColumnNullability
            | Self::IndexPresence
            | Self::IndexDefinition
            | Self::ConstraintPresence
            | Self::ConstraintDefinition
            | Self::Grant
            | Self::Migration => Severity::Warn,
            Self::ColumnDefault | Self::Ownership | Self::Comment => Severity::Info,
        }
    }

    /// Risk level for a DIFFER item, where the category is structural
    pub fn risk_level(&self) -> Option<RiskLevel> {
        match self {
            Self::TablePresence | Self::ColumnPresence | Self::ColumnType | Self::ColumnNullability => {
                Some(RiskLevel::High)
            }
            Self::IndexPresence
            | Self::IndexDefinition
            | Self::ConstraintPresence
            | Self::ConstraintDefinition => Some(RiskLevel::Medium),
            Self::ColumnDefault | Self::Comment => Some(RiskLevel::Low),
            Self::Grant | Self::Ownership | Self::Migration => None,
        }
    }
}

impl std::fmt::Display for DriftCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One attribute compared across the two environments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriftItem {
    /// Logical object the attribute belongs to (table, column, index, grant)
    pub object_name: String,

    /// Attribute that was compared (e.g. "data_type", "presence")
    pub attribute: String,

    /// Value observed in the source environment, when retrievable
    pub source_value: Option<String>,

    /// Value observed in the target environment, when retrievable
    pub target_value: Option<String>,

    /// Comparison status
    pub status: DriftStatus,

    /// Severity (always Info for MATCH items)
    pub severity: Severity,

    /// Stable category code
    pub category: DriftCategory,

    /// Structural risk, only for DIFFER items in structural categories
    pub risk_level: Option<RiskLevel>,

    /// Human-readable comparison message
    pub message: String,
}

/// Whether a drift section could be computed at all
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionAvailability {
    /// Both sides provided the needed capability
    pub available: bool,

    /// Exactly one side provided it
    pub partial: bool,

    /// Why the capability was missing, when it was
    pub unavailability_reason: Option<String>,

    /// Privilege that would unlock the capability
    pub needed_privilege: Option<String>,

    /// What the caller loses without this section
    pub impact: Option<String>,
}

impl SectionAvailability {
    /// Fully available section
    pub fn available() -> Self {
        Self {
            available: true,
            partial: false,
            unavailability_reason: None,
            needed_privilege: None,
            impact: None,
        }
    }

    /// Unavailable section with a captured reason
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            available: false,
            partial: false,
            unavailability_reason: Some(reason.into()),
            needed_privilege: None,
            impact: None,
        }
    }

    /// Mark as partially available (one side only)
    pub fn partial(mut self) -> Self {
        self.partial = true;
        self
    }

    /// Set the privilege that would unlock the section
    pub fn with_needed_privilege(mut self, privilege: impl Into<String>) -> Self {
        self.needed_privilege = Some(privilege.into());
        self
    }

    /// Set the impact description
    pub fn with_impact(mut self, impact: impl Into<String>) -> Self {
        self.impact = Some(impact.into());
        self
    }
}

/// A logical comparison section (columns, indexes, grants, ...)
///
/// The counts cover the full compared population. The materialized
/// `drift_items` list may hold fewer MATCH items than `match_count` when
/// the builder caps matches; callers must never infer population size
/// from `drift_items.len()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriftSection {
    /// Section name (e.g. "Columns")
    pub section_name: String,

    /// Capability availability for this section
    pub availability: SectionAvailability,

    /// Materialized comparison items (MATCH items possibly capped)
    pub drift_items: Vec<DriftItem>,

    /// MATCH items in the full population
    pub match_count: usize,

    /// DIFFER items in the full population
    pub differ_count: usize,

    /// UNKNOWN items in the full population
    pub unknown_count: usize,
}

impl DriftSection {
    /// Create an empty, fully available section
    pub fn new(section_name: impl Into<String>) -> Self {
        Self {
            section_name: section_name.into(),
            availability: SectionAvailability::available(),
            drift_items: Vec::new(),
            match_count: 0,
            differ_count: 0,
            unknown_count: 0,
        }
    }

    /// Create a section that could not be computed
    pub fn unavailable(section_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            section_name: section_name.into(),
            availability: SectionAvailability::unavailable(reason),
            drift_items: Vec::new(),
            match_count: 0,
            differ_count: 0,
            unknown_count: 0,
        }
    }

    /// Total compared population
    pub fn population(&self) -> usize {
        self.match_count + self.differ_count + self.unknown_count
    }

    /// Whether any DIFFER or UNKNOWN item exists in the population
    pub fn has_drift(&self) -> bool {
        self.differ_count > 0 || self.unknown_count > 0
    }
}
