//! SchemaLens Core
//!
//! Core domain model with stable, versioned types.
//! Never rename finding codes or drift categories - they are part of the
//! public API.

pub mod config;
pub mod finding;
pub mod model;
pub mod report;

pub use config::{ConfigError, HeuristicsConfig};
pub use finding::{
    DriftCategory, DriftItem, DriftSection, DriftStatus, Finding, FindingCode, RiskLevel,
    RiskTier, SectionAvailability, Severity,
};
pub use model::{
    Column, Constraint, ConstraintType, Index, MigrationProvenance, PrivilegeSet,
    PrivilegeStatus, TableMetadata, ValidationError,
};
pub use report::{Report, ReportSummary, ReportVersion};
