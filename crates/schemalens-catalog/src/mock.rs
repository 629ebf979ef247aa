//! Mock metadata source for testing
//!
//! Returns predefined metadata without connecting to anything. Error
//! conditions can be injected per table and per capability, which is how
//! tests exercise the UNKNOWN drift path.

use crate::provider::{FetchError, MetadataSource, TableIdentifier};
use schemalens_core::{MigrationProvenance, PrivilegeSet, TableMetadata};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Which capability an injected error applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    Table,
    Privileges,
    Provenance,
}

#[derive(Default)]
struct MockState {
    tables: HashMap<String, TableMetadata>,
    privileges: HashMap<String, PrivilegeSet>,
    provenance: HashMap<String, MigrationProvenance>,
    errors: HashMap<(String, Capability), FetchError>,
}

/// In-memory metadata source
#[derive(Clone)]
pub struct MockSource {
    name: String,
    state: Arc<RwLock<MockState>>,
}

impl MockSource {
    /// Create an empty mock source with an environment name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: Arc::new(RwLock::new(MockState::default())),
        }
    }

    /// Store table metadata
    pub async fn add_table(&self, meta: TableMetadata) {
        let key = format!("{}.{}", meta.schema, meta.table);
        self.state.write().await.tables.insert(key, meta);
    }

    /// Store a privilege check result for a table
    pub async fn add_privileges(&self, table: &TableIdentifier, privileges: PrivilegeSet) {
        self.state
            .write()
            .await
            .privileges
            .insert(table.fqn(), privileges);
    }

    /// Store migration provenance for a table
    pub async fn add_provenance(&self, table: &TableIdentifier, provenance: MigrationProvenance) {
        self.state
            .write()
            .await
            .provenance
            .insert(table.fqn(), provenance);
    }

    /// Inject an error for one capability on one table
    pub async fn add_error(&self, table: &TableIdentifier, capability: Capability, error: FetchError) {
        self.state
            .write()
            .await
            .errors
            .insert((table.fqn(), capability), error);
    }

    async fn injected_error(&self, fqn: &str, capability: Capability) -> Option<FetchError> {
        self.state
            .read()
            .await
            .errors
            .get(&(fqn.to_string(), capability))
            .cloned()
    }
}

#[async_trait::async_trait]
impl MetadataSource for MockSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch_table(&self, table: &TableIdentifier) -> Result<TableMetadata, FetchError> {
        if let Some(error) = self.injected_error(&table.fqn(), Capability::Table).await {
            return Err(error);
        }
        self.state
            .read()
            .await
            .tables
            .get(&table.fqn())
            .cloned()
            .ok_or_else(|| FetchError::TableNotFound(table.fqn()))
    }

    async fn fetch_privileges(&self, table: &TableIdentifier) -> Result<PrivilegeSet, FetchError> {
        if let Some(error) = self.injected_error(&table.fqn(), Capability::Privileges).await {
            return Err(error);
        }
        self.state
            .read()
            .await
            .privileges
            .get(&table.fqn())
            .cloned()
            .ok_or_else(|| {
                FetchError::CapabilityUnavailable(format!(
                    "no privilege data for {}",
                    table.fqn()
                ))
            })
    }

    async fn fetch_provenance(
        &self,
        table: &TableIdentifier,
    ) -> Result<MigrationProvenance, FetchError> {
        if let Some(error) = self.injected_error(&table.fqn(), Capability::Provenance).await {
            return Err(error);
        }
        self.state
            .read()
            .await
            .provenance
            .get(&table.fqn())
            .cloned()
            .ok_or_else(|| {
                FetchError::CapabilityUnavailable(format!(
                    "no migration history for {}",
                    table.fqn()
                ))
            })
    }
}
