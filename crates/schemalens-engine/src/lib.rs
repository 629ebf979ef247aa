//! SchemaLens engine - schema diagnostic reasoning
//!
//! Pure classifiers over fetched schema metadata:
//! - Foreign-key risk tiers
//! - Failure-pattern detection
//! - Access/ownership interpretation
//! - Impact summarization
//! - Cross-environment drift classification
//! - Aggregation and filtering
//!
//! Every function here is a synchronous, stateless transformation of its
//! inputs; fetching metadata is the caller's concern.

pub mod access;
pub mod aggregate;
pub mod cascade;
pub mod drift;
pub mod fk_risk;
pub mod impact;
pub mod patterns;

pub use access::{interpret_access, AccessProfile, AccessReport, PrivilegeCheck};
pub use aggregate::{compute_kpis, filter_drift_items, DriftFilter, Kpis, SeverityFilter};
pub use cascade::{CascadeInspector, SubstringInspector};
pub use drift::{classify_drift, compare_tables, AttrValue, DriftSectionBuilder};
pub use fk_risk::{assess_foreign_keys, classify_foreign_key_risk, FkRiskAssessment};
pub use impact::{summarize_impact, ImpactSeverity, ImpactStatement};
pub use patterns::detect_failure_patterns;

use schemalens_core::{Finding, HeuristicsConfig, TableMetadata, ValidationError};
use serde::{Deserialize, Serialize};

/// Output of one single-environment diagnostic pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableDiagnostics {
    /// Risk assessment for each foreign key
    pub fk_risks: Vec<FkRiskAssessment>,

    /// Failure-pattern findings, in fixed priority order
    pub patterns: Vec<Finding>,

    /// Access interpretation; None when no privilege data was supplied
    pub access: Option<AccessReport>,

    /// Plain-English consequences
    pub impacts: Vec<ImpactStatement>,
}

/// Run a full single-environment diagnostic pass over one table
///
/// Validates the metadata shape first, then runs every classifier with
/// the default substring cascade inspector.
pub fn diagnose(
    meta: &TableMetadata,
    profile: AccessProfile,
    config: &HeuristicsConfig,
) -> Result<TableDiagnostics, ValidationError> {
    meta.validate()?;

    let inspector = SubstringInspector;
    let fk_risks = assess_foreign_keys(meta, config, &inspector)?;
    let patterns = detect_failure_patterns(meta, &inspector);
    let access = interpret_access(meta, profile);
    let impacts = summarize_impact(meta, &fk_risks, &patterns, config);

    Ok(TableDiagnostics {
        fk_risks,
        patterns,
        access,
        impacts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemalens_core::{Column, Constraint, ConstraintType, Index};

    #[test]
    fn diagnose_rejects_invalid_shape() {
        let meta = TableMetadata::new("public", "t", "o", "u").with_indexes(vec![
            Index::new("t_pkey", vec!["id".into()], "btree").with_primary(true),
        ]);
        let result = diagnose(&meta, AccessProfile::ReadOnly, &HeuristicsConfig::default());
        assert!(result.is_err());
    }

    #[test]
    fn diagnose_runs_all_classifiers() {
        let meta = TableMetadata::new("public", "cart_item", "o", "u")
            .with_columns(vec![
                Column::new("id", 1, "integer").with_nullable(false),
                Column::new("cart_id", 2, "integer").with_nullable(false),
            ])
            .with_constraints(vec![
                Constraint::new(ConstraintType::PrimaryKey)
                    .with_name("cart_item_pkey")
                    .with_columns(vec!["id".into()]),
                Constraint::new(ConstraintType::ForeignKey)
                    .with_name("fk_cart")
                    .with_columns(vec!["cart_id".into()])
                    .with_definition(
                        "FOREIGN KEY (cart_id) REFERENCES public.cart(id) ON DELETE CASCADE",
                    ),
            ]);

        let diagnostics =
            diagnose(&meta, AccessProfile::ReadOnly, &HeuristicsConfig::default()).unwrap();

        assert_eq!(diagnostics.fk_risks.len(), 1);
        assert_eq!(diagnostics.fk_risks[0].tier, schemalens_core::RiskTier::High);
        // No privilege data supplied, so no access section
        assert!(diagnostics.access.is_none());
        assert_eq!(diagnostics.impacts.len(), 1);
    }
}
