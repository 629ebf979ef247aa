//! Provider trait for fetching table metadata
//!
//! The engine never performs I/O; callers fetch metadata through this
//! seam and hand the resulting value objects to the classifiers. A
//! `PermissionDenied` or `CapabilityUnavailable` error is a first-class
//! input state: drift classification turns it into UNKNOWN items rather
//! than failing.

use schemalens_core::{MigrationProvenance, PrivilegeSet, TableMetadata};
use std::fmt;

/// Identifies a table in one environment
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableIdentifier {
    /// Schema name
    pub schema: String,

    /// Table name
    pub table: String,
}

impl TableIdentifier {
    /// Create a new table identifier
    pub fn new(schema: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            table: table.into(),
        }
    }

    /// Get fully qualified name
    pub fn fqn(&self) -> String {
        format!("{}.{}", self.schema, self.table)
    }
}

impl fmt::Display for TableIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.fqn())
    }
}

/// Errors that can occur when fetching metadata
#[derive(Debug, Clone, thiserror::Error)]
pub enum FetchError {
    #[error("Table not found: {0}")]
    TableNotFound(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Capability unavailable: {0}")]
    CapabilityUnavailable(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),
}

impl FetchError {
    /// Whether the error means "this category of metadata is not
    /// retrievable here" rather than a hard fault; drift classification
    /// degrades these to UNKNOWN
    pub fn is_capability_gap(&self) -> bool {
        matches!(
            self,
            Self::PermissionDenied(_) | Self::CapabilityUnavailable(_)
        )
    }
}

/// Trait for metadata sources the engine's callers fetch through
///
/// Drift comparison uses two independent instances of this trait, one
/// per environment.
#[async_trait::async_trait]
pub trait MetadataSource: Send + Sync {
    /// Source name (e.g. "staging", "production")
    fn name(&self) -> &str;

    /// Fetch columns, constraints and indexes for a table
    async fn fetch_table(&self, table: &TableIdentifier) -> Result<TableMetadata, FetchError>;

    /// Fetch the privilege check result for a table
    async fn fetch_privileges(&self, table: &TableIdentifier) -> Result<PrivilegeSet, FetchError>;

    /// Fetch migration provenance for a table, when the history is readable
    async fn fetch_provenance(
        &self,
        table: &TableIdentifier,
    ) -> Result<MigrationProvenance, FetchError>;
}
