//! Canonical in-memory representation of relational-schema metadata
//!
//! All types here are immutable value objects: they are built once from
//! externally fetched metadata and never mutated by the engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A column as reported by the introspection provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Column name
    pub name: String,

    /// 1-based position within the table; unique per table
    pub ordinal_position: u32,

    /// Engine-specific type name (e.g. "integer", "character varying(255)")
    pub data_type: String,

    /// Whether NULL is accepted
    pub nullable: bool,

    /// Default expression, if any
    pub column_default: Option<String>,
}

impl Column {
    /// Create a column with no default
    pub fn new(name: impl Into<String>, ordinal_position: u32, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ordinal_position,
            data_type: data_type.into(),
            nullable: true,
            column_default: None,
        }
    }

    /// Set nullability
    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    /// Set the default expression
    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.column_default = Some(default.into());
        self
    }
}

/// Constraint kind
///
/// These codes are STABLE - they appear in findings and reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConstraintType {
    PrimaryKey,
    ForeignKey,
    Unique,
    Check,
    Other,
}

impl ConstraintType {
    /// Stable string identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PrimaryKey => "PRIMARY_KEY",
            Self::ForeignKey => "FOREIGN_KEY",
            Self::Unique => "UNIQUE",
            Self::Check => "CHECK",
            Self::Other => "OTHER",
        }
    }
}

impl std::fmt::Display for ConstraintType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A table constraint
///
/// `definition` is a free-text DDL fragment as reported by the source
/// engine; cascade and self-reference detection run substring heuristics
/// over it rather than parsing SQL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constraint {
    /// Constraint name; unnamed constraints are legal
    pub name: Option<String>,

    /// Constraint kind
    pub constraint_type: ConstraintType,

    /// Ordered column names; may be empty for CHECK constraints
    pub columns: Vec<String>,

    /// Engine-specific DDL fragment, if available
    pub definition: Option<String>,
}

impl Constraint {
    /// Create an unnamed constraint with no columns and no definition
    pub fn new(constraint_type: ConstraintType) -> Self {
        Self {
            name: None,
            constraint_type,
            columns: Vec::new(),
            definition: None,
        }
    }

    /// Set the constraint name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the constrained columns
    pub fn with_columns(mut self, columns: Vec<String>) -> Self {
        self.columns = columns;
        self
    }

    /// Set the DDL fragment
    pub fn with_definition(mut self, definition: impl Into<String>) -> Self {
        self.definition = Some(definition.into());
        self
    }

    /// Display name for findings ("unnamed" when the source gave none)
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("unnamed")
    }
}

/// An index as reported by the introspection provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Index {
    /// Index name
    pub name: String,

    /// Ordered indexed columns
    pub columns: Vec<String>,

    /// Whether this index backs the primary key
    pub primary: bool,

    /// Whether this index enforces uniqueness
    pub unique: bool,

    /// Access method (e.g. "btree", "hash", "gin")
    pub access_method: String,
}

impl Index {
    /// Create a non-unique secondary index
    pub fn new(name: impl Into<String>, columns: Vec<String>, access_method: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns,
            primary: false,
            unique: false,
            access_method: access_method.into(),
        }
    }

    /// Mark as unique
    pub fn with_unique(mut self, unique: bool) -> Self {
        self.unique = unique;
        self
    }

    /// Mark as the primary-key index (implies unique at validation time)
    pub fn with_primary(mut self, primary: bool) -> Self {
        self.primary = primary;
        self
    }
}

/// Outcome of the privilege check performed by the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PrivilegeStatus {
    Pass,
    Warning,
    Fail,
}

/// Granted and missing privileges for the connected identity on one table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivilegeSet {
    /// Privileges the current user holds (uppercase verbs, e.g. "SELECT")
    pub granted: BTreeSet<String>,

    /// Privileges checked but not held; disjoint from `granted`
    pub missing: BTreeSet<String>,

    /// Table owner
    pub owner: String,

    /// Identity the check ran as
    pub current_user: String,

    /// Overall status as reported by the check
    pub status: PrivilegeStatus,
}

impl PrivilegeSet {
    /// Build a privilege set from granted/missing verb lists
    pub fn new(
        granted: impl IntoIterator<Item = String>,
        missing: impl IntoIterator<Item = String>,
        owner: impl Into<String>,
        current_user: impl Into<String>,
        status: PrivilegeStatus,
    ) -> Self {
        Self {
            granted: granted.into_iter().collect(),
            missing: missing.into_iter().collect(),
            owner: owner.into(),
            current_user: current_user.into(),
            status,
        }
    }

    /// Whether a privilege verb is granted (case-insensitive)
    pub fn has(&self, privilege: &str) -> bool {
        let wanted = privilege.to_uppercase();
        self.granted.iter().any(|p| p.to_uppercase() == wanted)
    }
}

/// Migration-history facts for a table, when the history is readable
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationProvenance {
    /// Migration version string (e.g. "V42")
    pub version: String,

    /// Migration description
    pub description: String,

    /// Identity that applied the migration
    pub installed_by: String,

    /// When the migration was applied
    pub installed_on: DateTime<Utc>,
}

/// Everything the engine knows about one table in one environment
///
/// `privileges` and `provenance` are optional: when the corresponding
/// capability was unavailable the dependent classifiers simply skip that
/// section instead of failing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableMetadata {
    /// Schema the table lives in
    pub schema: String,

    /// Table name
    pub table: String,

    /// Table owner
    pub owner: String,

    /// Identity the metadata was fetched as
    pub current_user: String,

    /// Columns in ordinal order
    pub columns: Vec<Column>,

    /// Table constraints
    pub constraints: Vec<Constraint>,

    /// Indexes
    pub indexes: Vec<Index>,

    /// Privilege check result, when the capability was available
    pub privileges: Option<PrivilegeSet>,

    /// Migration provenance, when the history was readable
    pub provenance: Option<MigrationProvenance>,
}

impl TableMetadata {
    /// Create empty metadata for a table
    pub fn new(
        schema: impl Into<String>,
        table: impl Into<String>,
        owner: impl Into<String>,
        current_user: impl Into<String>,
    ) -> Self {
        Self {
            schema: schema.into(),
            table: table.into(),
            owner: owner.into(),
            current_user: current_user.into(),
            columns: Vec::new(),
            constraints: Vec::new(),
            indexes: Vec::new(),
            privileges: None,
            provenance: None,
        }
    }

    /// Set the columns
    pub fn with_columns(mut self, columns: Vec<Column>) -> Self {
        self.columns = columns;
        self
    }

    /// Set the constraints
    pub fn with_constraints(mut self, constraints: Vec<Constraint>) -> Self {
        self.constraints = constraints;
        self
    }

    /// Set the indexes
    pub fn with_indexes(mut self, indexes: Vec<Index>) -> Self {
        self.indexes = indexes;
        self
    }

    /// Attach a privilege check result
    pub fn with_privileges(mut self, privileges: PrivilegeSet) -> Self {
        self.privileges = Some(privileges);
        self
    }

    /// Attach migration provenance
    pub fn with_provenance(mut self, provenance: MigrationProvenance) -> Self {
        self.provenance = Some(provenance);
        self
    }

    /// Fully qualified table name
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.schema, self.table)
    }

    /// Constraints of a given type, in declaration order
    pub fn constraints_of(&self, constraint_type: ConstraintType) -> Vec<&Constraint> {
        self.constraints
            .iter()
            .filter(|c| c.constraint_type == constraint_type)
            .collect()
    }

    /// Find a column by name
    pub fn find_column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Reject structurally invalid metadata
    ///
    /// Missing optional data degrades gracefully elsewhere; this only
    /// catches shapes that would make a classification misleading.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut seen_positions = BTreeSet::new();
        for column in &self.columns {
            if !seen_positions.insert(column.ordinal_position) {
                return Err(ValidationError::DuplicateOrdinalPosition {
                    table: self.qualified_name(),
                    position: column.ordinal_position,
                });
            }
        }

        for constraint in &self.constraints {
            if constraint.constraint_type == ConstraintType::ForeignKey && constraint.columns.is_empty() {
                return Err(ValidationError::ForeignKeyWithoutColumns {
                    table: self.qualified_name(),
                    constraint: constraint.display_name().to_string(),
                });
            }
        }

        for index in &self.indexes {
            if index.primary && !index.unique {
                return Err(ValidationError::PrimaryIndexNotUnique {
                    table: self.qualified_name(),
                    index: index.name.clone(),
                });
            }
        }

        if let Some(privileges) = &self.privileges {
            if let Some(overlap) = privileges.granted.intersection(&privileges.missing).next() {
                return Err(ValidationError::PrivilegeOverlap {
                    table: self.qualified_name(),
                    privilege: overlap.clone(),
                });
            }
        }

        Ok(())
    }
}

/// Invalid-shape rejection at the engine boundary
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("table {table}: duplicate ordinal position {position}")]
    DuplicateOrdinalPosition { table: String, position: u32 },

    #[error("table {table}: foreign key constraint '{constraint}' has no columns")]
    ForeignKeyWithoutColumns { table: String, constraint: String },

    #[error("table {table}: index '{index}' is primary but not unique")]
    PrimaryIndexNotUnique { table: String, index: String },

    #[error("table {table}: privilege '{privilege}' is both granted and missing")]
    PrivilegeOverlap { table: String, privilege: String },
}
