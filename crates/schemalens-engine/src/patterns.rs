//! Failure-pattern detection
//!
//! Scans constraints and columns for known failure-prone shapes and emits
//! findings in a fixed priority order. Descriptions are composed only from
//! the input metadata, so identical input reproduces identical output
//! byte for byte.

use crate::cascade::CascadeInspector;
use schemalens_core::{ConstraintType, Finding, FindingCode, Severity, TableMetadata};

/// Detect failure-prone shapes on one table
///
/// Patterns are emitted in this order, each at most once:
/// 1. recursive FK with cascade (Error)
/// 2. composite unique constraint of three or more columns (Warn)
/// 3. NOT NULL constraints without defaults (Info)
/// 4. CHECK constraints on values (Info)
pub fn detect_failure_patterns(
    meta: &TableMetadata,
    inspector: &dyn CascadeInspector,
) -> Vec<Finding> {
    let mut findings = Vec::new();

    let foreign_keys = meta.constraints_of(ConstraintType::ForeignKey);

    let mut cascading_names = Vec::new();
    let mut recursive_names = Vec::new();
    for fk in &foreign_keys {
        let definition = fk.definition.as_deref().unwrap_or("");
        if inspector.detects_cascade(definition) {
            cascading_names.push(fk.display_name().to_string());
            if inspector.detects_self_reference(definition, &meta.schema, &meta.table) {
                recursive_names.push(fk.display_name().to_string());
            }
        }
    }

    if !recursive_names.is_empty() && !cascading_names.is_empty() {
        findings.push(
            Finding::new(
                Severity::Error,
                FindingCode::RecursiveCascade,
                "Recursive FK with CASCADE",
                format!(
                    "Foreign key '{}' on {} references its own table with a cascade clause; a single delete can walk the whole hierarchy",
                    recursive_names[0],
                    meta.qualified_name()
                ),
            )
            .with_recommendation("Replace ON DELETE CASCADE with ON DELETE RESTRICT and delete hierarchies explicitly")
            .with_evidence(recursive_names),
        );
    }

    let composite_unique = meta
        .constraints_of(ConstraintType::Unique)
        .into_iter()
        .find(|c| c.columns.len() >= 3);
    if let Some(constraint) = composite_unique {
        findings.push(
            Finding::new(
                Severity::Warn,
                FindingCode::CompositeUnique,
                "Composite unique constraint",
                format!(
                    "Unique constraint '{}' spans {} columns ({}); inserts must supply a distinct combination of all of them",
                    constraint.display_name(),
                    constraint.columns.len(),
                    constraint.columns.join(", ")
                ),
            )
            .with_evidence(constraint.columns.clone()),
        );
    }

    // The constraint kind is an enum, so the source's raw type string is
    // gone by the time metadata reaches the engine; the textual NOT NULL
    // scan therefore runs over both the definition and the name.
    let not_null_count = meta
        .constraints_of(ConstraintType::Other)
        .into_iter()
        .filter(|c| {
            c.definition.as_deref().map(mentions_not_null).unwrap_or(false)
                || c.name.as_deref().map(mentions_not_null).unwrap_or(false)
        })
        .count();
    if not_null_count > 0 {
        findings.push(Finding::new(
            Severity::Info,
            FindingCode::NotNullNoDefault,
            "NOT NULL without default",
            format!(
                "Table declares {} NOT NULL constraint(s); inserts that omit these columns will fail",
                not_null_count
            ),
        ));
    }

    let check_count = meta.constraints_of(ConstraintType::Check).len();
    if check_count > 0 {
        findings.push(Finding::new(
            Severity::Info,
            FindingCode::CheckConstraints,
            "Check constraints on values",
            format!(
                "Table declares {} CHECK constraint(s) restricting column values",
                check_count
            ),
        ));
    }

    findings
}

fn mentions_not_null(text: &str) -> bool {
    let upper = text.to_uppercase();
    upper.contains("NOT NULL") || upper.contains("NOT_NULL")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cascade::SubstringInspector;
    use schemalens_core::{Column, Constraint};

    fn category_table() -> TableMetadata {
        TableMetadata::new("public", "category", "owner", "user")
            .with_columns(vec![
                Column::new("id", 1, "integer").with_nullable(false),
                Column::new("parent_id", 2, "integer"),
            ])
            .with_constraints(vec![
                Constraint::new(ConstraintType::ForeignKey)
                    .with_name("fk_parent")
                    .with_columns(vec!["parent_id".into()])
                    .with_definition(
                        "FOREIGN KEY (parent_id) REFERENCES public.category(id) ON DELETE CASCADE",
                    ),
            ])
    }

    #[test]
    fn recursive_cascade_fires_with_error() {
        let findings = detect_failure_patterns(&category_table(), &SubstringInspector);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].code, FindingCode::RecursiveCascade);
        assert_eq!(findings[0].severity, Severity::Error);
        assert_eq!(findings[0].title, "Recursive FK with CASCADE");
        assert!(findings[0].description.contains("fk_parent"));
        assert!(findings[0].description.contains("public.category"));
    }

    #[test]
    fn non_recursive_cascade_does_not_fire_pattern_one() {
        let meta = TableMetadata::new("public", "cart_item", "o", "u").with_constraints(vec![
            Constraint::new(ConstraintType::ForeignKey)
                .with_name("fk_cart")
                .with_columns(vec!["cart_id".into()])
                .with_definition("FOREIGN KEY (cart_id) REFERENCES public.cart(id) ON DELETE CASCADE"),
        ]);
        let findings = detect_failure_patterns(&meta, &SubstringInspector);
        assert!(findings.iter().all(|f| f.code != FindingCode::RecursiveCascade));
    }

    #[test]
    fn composite_unique_reports_first_offender() {
        let meta = TableMetadata::new("public", "t", "o", "u").with_constraints(vec![
            Constraint::new(ConstraintType::Unique)
                .with_name("uq_two")
                .with_columns(vec!["a".into(), "b".into()]),
            Constraint::new(ConstraintType::Unique)
                .with_name("uq_three")
                .with_columns(vec!["a".into(), "b".into(), "c".into()]),
            Constraint::new(ConstraintType::Unique)
                .with_name("uq_four")
                .with_columns(vec!["a".into(), "b".into(), "c".into(), "d".into()]),
        ]);
        let findings = detect_failure_patterns(&meta, &SubstringInspector);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].code, FindingCode::CompositeUnique);
        assert_eq!(findings[0].severity, Severity::Warn);
        assert!(findings[0].description.contains("uq_three"));
        assert!(findings[0].description.contains("3 columns"));
        assert!(findings[0].description.contains("a, b, c"));
    }

    #[test]
    fn not_null_and_check_counts_reported() {
        let meta = TableMetadata::new("public", "t", "o", "u").with_constraints(vec![
            Constraint::new(ConstraintType::Other)
                .with_name("nn_a")
                .with_definition("a IS NOT NULL"),
            Constraint::new(ConstraintType::Other)
                .with_name("nn_b")
                .with_definition("b is not null"),
            Constraint::new(ConstraintType::Check)
                .with_name("ck_total")
                .with_definition("CHECK (total >= 0)"),
        ]);
        let findings = detect_failure_patterns(&meta, &SubstringInspector);
        assert_eq!(findings.len(), 2);
        assert_eq!(findings[0].code, FindingCode::NotNullNoDefault);
        assert!(findings[0].description.contains("2 NOT NULL"));
        assert_eq!(findings[1].code, FindingCode::CheckConstraints);
        assert!(findings[1].description.contains("1 CHECK"));
    }

    #[test]
    fn not_null_mentioned_only_in_constraint_name_is_counted() {
        // Some catalogs expose NOT NULL constraints with a name but no
        // reconstructed definition.
        let meta = TableMetadata::new("public", "t", "o", "u").with_constraints(vec![
            Constraint::new(ConstraintType::Other).with_name("email_not_null"),
        ]);
        let findings = detect_failure_patterns(&meta, &SubstringInspector);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].code, FindingCode::NotNullNoDefault);
        assert!(findings[0].description.contains("1 NOT NULL"));
    }

    #[test]
    fn empty_table_yields_no_patterns() {
        let meta = TableMetadata::new("public", "t", "o", "u");
        assert!(detect_failure_patterns(&meta, &SubstringInspector).is_empty());
    }

    #[test]
    fn detection_is_idempotent_and_order_stable() {
        let meta = category_table().with_constraints(vec![
            Constraint::new(ConstraintType::ForeignKey)
                .with_name("fk_parent")
                .with_columns(vec!["parent_id".into()])
                .with_definition(
                    "FOREIGN KEY (parent_id) REFERENCES public.category(id) ON DELETE CASCADE",
                ),
            Constraint::new(ConstraintType::Unique)
                .with_name("uq_path")
                .with_columns(vec!["a".into(), "b".into(), "c".into()]),
            Constraint::new(ConstraintType::Check)
                .with_name("ck")
                .with_definition("CHECK (id > 0)"),
        ]);

        let first = detect_failure_patterns(&meta, &SubstringInspector);
        let second = detect_failure_patterns(&meta, &SubstringInspector);
        assert_eq!(first, second);

        let codes: Vec<_> = first.iter().map(|f| f.code).collect();
        assert_eq!(
            codes,
            vec![
                FindingCode::RecursiveCascade,
                FindingCode::CompositeUnique,
                FindingCode::CheckConstraints,
            ]
        );
    }
}
