//! Foreign-key risk classification
//!
//! Assigns a risk tier to each foreign key from its cascade behavior and
//! topological role. Rules run in a fixed order, first match wins.

use crate::cascade::CascadeInspector;
use schemalens_core::{Constraint, ConstraintType, HeuristicsConfig, RiskTier, TableMetadata, ValidationError};
use serde::{Deserialize, Serialize};

/// Classification result for one foreign key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FkRiskAssessment {
    /// Constraint name ("unnamed" when the source gave none)
    pub constraint_name: String,

    /// Constrained columns
    pub columns: Vec<String>,

    /// Assigned risk tier
    pub tier: RiskTier,

    /// Whether the definition carries a cascade clause
    pub cascading: bool,

    /// Whether the definition references its own table
    pub self_referencing: bool,
}

/// Classify one foreign key
///
/// Evaluation order:
/// 1. no cascade clause -> Low (absent or empty definition counts as no cascade)
/// 2. self-reference -> Critical
/// 3. table and at least one FK column share a root-entity token -> High
/// 4. otherwise -> Moderate
pub fn classify_foreign_key_risk(
    constraint: &Constraint,
    schema: &str,
    table: &str,
    config: &HeuristicsConfig,
    inspector: &dyn CascadeInspector,
) -> RiskTier {
    let definition = constraint.definition.as_deref().unwrap_or("");

    if !inspector.detects_cascade(definition) {
        return RiskTier::Low;
    }

    if inspector.detects_self_reference(definition, schema, table) {
        return RiskTier::Critical;
    }

    // A table name may carry several vocabulary tokens; any one of them
    // shared with an FK column is enough.
    for entity in config.root_entities_in(table) {
        let entity_lower = entity.to_lowercase();
        let column_shares_entity = constraint
            .columns
            .iter()
            .any(|c| c.to_lowercase().contains(&entity_lower));
        if column_shares_entity {
            return RiskTier::High;
        }
    }

    RiskTier::Moderate
}

/// Classify every foreign key on a table
///
/// Rejects foreign keys with no columns before classifying; a columnless
/// FK would otherwise silently land in the Moderate tier.
pub fn assess_foreign_keys(
    meta: &TableMetadata,
    config: &HeuristicsConfig,
    inspector: &dyn CascadeInspector,
) -> Result<Vec<FkRiskAssessment>, ValidationError> {
    let mut assessments = Vec::new();

    for constraint in meta.constraints_of(ConstraintType::ForeignKey) {
        if constraint.columns.is_empty() {
            return Err(ValidationError::ForeignKeyWithoutColumns {
                table: meta.qualified_name(),
                constraint: constraint.display_name().to_string(),
            });
        }

        let definition = constraint.definition.as_deref().unwrap_or("");
        let cascading = inspector.detects_cascade(definition);
        let self_referencing =
            inspector.detects_self_reference(definition, &meta.schema, &meta.table);

        assessments.push(FkRiskAssessment {
            constraint_name: constraint.display_name().to_string(),
            columns: constraint.columns.clone(),
            tier: classify_foreign_key_risk(constraint, &meta.schema, &meta.table, config, inspector),
            cascading,
            self_referencing,
        });
    }

    Ok(assessments)
}
