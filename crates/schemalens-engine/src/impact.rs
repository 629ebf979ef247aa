//! Impact summarization
//!
//! Derives a short prioritized list of plain-English consequences from
//! the classifier outputs. Rules are evaluated independently; every
//! applicable rule contributes a statement.

use crate::fk_risk::FkRiskAssessment;
use schemalens_core::{ConstraintType, Finding, FindingCode, HeuristicsConfig, TableMetadata};
use serde::{Deserialize, Serialize};

/// Severity tag for an impact statement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImpactSeverity {
    Success,
    Warning,
    Error,
}

/// One plain-English consequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImpactStatement {
    /// Severity tag
    pub severity: ImpactSeverity,

    /// The consequence, phrased for an operator
    pub message: String,
}

impl ImpactStatement {
    fn new(severity: ImpactSeverity, message: String) -> Self {
        Self { severity, message }
    }
}

/// Summarize the operational impact of a table's classification results
pub fn summarize_impact(
    meta: &TableMetadata,
    fk_risks: &[FkRiskAssessment],
    patterns: &[Finding],
    config: &HeuristicsConfig,
) -> Vec<ImpactStatement> {
    let mut statements = Vec::new();

    if fk_risks.iter().any(|a| a.cascading) {
        let recursive = patterns.iter().any(|f| f.code == FindingCode::RecursiveCascade);
        if recursive {
            statements.push(ImpactStatement::new(
                ImpactSeverity::Warning,
                "Deleting a row can cascade through the table's own hierarchy, causing deep deletes and long-running transactions".to_string(),
            ));
        } else {
            let parent = config.parent_token(&meta.table);
            statements.push(ImpactStatement::new(
                ImpactSeverity::Warning,
                format!("Deleting a {} will cascade to {} records", parent, meta.table),
            ));
        }
    }

    let wide_unique = meta
        .constraints_of(ConstraintType::Unique)
        .into_iter()
        .find(|c| c.columns.len() > 2);
    if let Some(constraint) = wide_unique {
        let named: Vec<&str> = constraint
            .columns
            .iter()
            .take(3)
            .map(String::as_str)
            .collect();
        statements.push(ImpactStatement::new(
            ImpactSeverity::Success,
            format!(
                "Duplicate combinations of {} are rejected by the database",
                named.join(", ")
            ),
        ));
    }

    let has_primary_key = !meta.constraints_of(ConstraintType::PrimaryKey).is_empty();
    if !has_primary_key {
        statements.push(ImpactStatement::new(
            ImpactSeverity::Error,
            "Without a primary key, updates and deletes may affect multiple rows unintentionally".to_string(),
        ));
    }

    statements
}
