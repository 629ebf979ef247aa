//! Finding aggregation and filtering
//!
//! Filters narrow the displayed drift items; KPIs are computed over the
//! full unfiltered population and never change with the filter settings.

use schemalens_core::{DriftCategory, DriftItem, DriftSection, DriftStatus, Severity};
use serde::{Deserialize, Serialize};

/// Severity filter choices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SeverityFilter {
    /// Keep every severity
    #[default]
    All,

    /// Keep only error items
    Error,

    /// Keep only warning items
    Warn,
}

/// Caller-owned display filter; never engine state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriftFilter {
    /// Drop MATCH items
    pub only_differences: bool,

    /// Keep only items of one severity
    pub severity_filter: SeverityFilter,

    /// Case-insensitive substring over object name and message
    pub search_query: String,
}

/// Filter drift items for display
///
/// Steps apply in order, each a pure narrowing: (1) drop MATCH items when
/// `only_differences`, (2) keep the selected severity, (3) keep items
/// whose object name or message contains the query. Passing the default
/// filter returns the input unchanged by value.
pub fn filter_drift_items(items: &[DriftItem], filter: &DriftFilter) -> Vec<DriftItem> {
    let mut result: Vec<DriftItem> = items.to_vec();

    if filter.only_differences {
        result.retain(|item| item.status != DriftStatus::Match);
    }

    match filter.severity_filter {
        SeverityFilter::All => {}
        SeverityFilter::Error => result.retain(|item| item.severity == Severity::Error),
        SeverityFilter::Warn => result.retain(|item| item.severity == Severity::Warn),
    }

    if !filter.search_query.is_empty() {
        let query = filter.search_query.to_lowercase();
        result.retain(|item| {
            item.object_name.to_lowercase().contains(&query)
                || item.message.to_lowercase().contains(&query)
        });
    }

    result
}

/// Summary KPIs over the full finding population
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Kpis {
    /// Error-level drift items
    pub compatibility_errors: usize,

    /// Migration provenance items that did not match
    pub missing_migrations: usize,

    /// Warning-level index drift items
    pub performance_warnings: usize,

    /// MATCH items in the full population (from section counts, not the
    /// materialized lists)
    pub match_total: usize,

    /// DIFFER items in the full population
    pub differ_total: usize,

    /// UNKNOWN items in the full population
    pub unknown_total: usize,
}

/// Compute KPIs over all sections
///
/// Population totals come from the section counts; per-category KPIs come
/// from the materialized items, which is exact because only MATCH items
/// are ever capped.
pub fn compute_kpis(sections: &[DriftSection]) -> Kpis {
    let mut kpis = Kpis::default();

    for section in sections {
        kpis.match_total += section.match_count;
        kpis.differ_total += section.differ_count;
        kpis.unknown_total += section.unknown_count;

        for item in &section.drift_items {
            if item.severity == Severity::Error {
                kpis.compatibility_errors += 1;
            }
            if item.category == DriftCategory::Migration && item.status != DriftStatus::Match {
                kpis.missing_migrations += 1;
            }
            if item.severity == Severity::Warn
                && matches!(
                    item.category,
                    DriftCategory::IndexPresence | DriftCategory::IndexDefinition
                )
            {
                kpis.performance_warnings += 1;
            }
        }
    }

    kpis
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drift::{classify_drift, AttrValue, DriftSectionBuilder};

    fn sample_items() -> Vec<DriftItem> {
        vec![
            classify_drift(
                "email",
                "data_type",
                &AttrValue::available("text"),
                &AttrValue::available("text"),
                DriftCategory::ColumnType,
            ),
            classify_drift(
                "email",
                "data_type",
                &AttrValue::available("text"),
                &AttrValue::available("varchar(100)"),
                DriftCategory::ColumnType,
            ),
            classify_drift(
                "idx_users_email",
                "presence",
                &AttrValue::available("present"),
                &AttrValue::available("absent"),
                DriftCategory::IndexPresence,
            ),
            classify_drift(
                "SELECT",
                "granted",
                &AttrValue::available("granted"),
                &AttrValue::unavailable("permission denied"),
                DriftCategory::Grant,
            ),
        ]
    }

    #[test]
    fn default_filter_returns_input_unchanged() {
        let items = sample_items();
        let filtered = filter_drift_items(&items, &DriftFilter::default());
        assert_eq!(filtered, items);
    }

    #[test]
    fn only_differences_drops_matches_but_keeps_unknown() {
        let items = sample_items();
        let filtered = filter_drift_items(
            &items,
            &DriftFilter {
                only_differences: true,
                ..DriftFilter::default()
            },
        );
        assert_eq!(filtered.len(), 3);
        assert!(filtered.iter().all(|i| i.status != DriftStatus::Match));
    }

    #[test]
    fn severity_filter_keeps_one_level() {
        let items = sample_items();
        let errors = filter_drift_items(
            &items,
            &DriftFilter {
                severity_filter: SeverityFilter::Error,
                ..DriftFilter::default()
            },
        );
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].category, DriftCategory::ColumnType);

        let warns = filter_drift_items(
            &items,
            &DriftFilter {
                severity_filter: SeverityFilter::Warn,
                ..DriftFilter::default()
            },
        );
        assert_eq!(warns.len(), 2);
    }

    #[test]
    fn search_matches_object_name_and_message() {
        let items = sample_items();
        let by_name = filter_drift_items(
            &items,
            &DriftFilter {
                search_query: "IDX_users".into(),
                ..DriftFilter::default()
            },
        );
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].object_name, "idx_users_email");

        let by_message = filter_drift_items(
            &items,
            &DriftFilter {
                search_query: "permission denied".into(),
                ..DriftFilter::default()
            },
        );
        assert_eq!(by_message.len(), 1);
        assert_eq!(by_message[0].object_name, "SELECT");
    }

    #[test]
    fn filters_compose_in_order() {
        let items = sample_items();
        let filtered = filter_drift_items(
            &items,
            &DriftFilter {
                only_differences: true,
                severity_filter: SeverityFilter::Warn,
                search_query: "email".into(),
            },
        );
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].object_name, "idx_users_email");
    }

    #[test]
    fn kpis_ignore_display_filters() {
        let mut builder = DriftSectionBuilder::new("Columns", None);
        for item in sample_items() {
            builder.push(item);
        }
        let sections = vec![builder.build()];

        let before = compute_kpis(&sections);
        // Filtering the materialized items has no effect on the KPI inputs
        let _ = filter_drift_items(
            &sections[0].drift_items,
            &DriftFilter {
                only_differences: true,
                severity_filter: SeverityFilter::Error,
                search_query: "email".into(),
            },
        );
        let after = compute_kpis(&sections);

        assert_eq!(before, after);
        assert_eq!(before.compatibility_errors, 1);
        assert_eq!(before.performance_warnings, 1);
    }

    #[test]
    fn population_totals_come_from_section_counts() {
        // A capped section keeps exact counts even though the MATCH items
        // were not all materialized.
        let mut builder = DriftSectionBuilder::new("Columns", Some(100));
        for i in 0..150 {
            builder.push(classify_drift(
                format!("col_{}", i),
                "data_type",
                &AttrValue::available("integer"),
                &AttrValue::available("integer"),
                DriftCategory::ColumnType,
            ));
        }
        let section = builder.build();
        assert_eq!(section.drift_items.len(), 100);

        let kpis = compute_kpis(&[section]);
        assert_eq!(kpis.match_total, 150);
    }

    #[test]
    fn missing_migration_kpi_counts_non_matches() {
        let mut builder = DriftSectionBuilder::new("Migration", None);
        builder.push(classify_drift(
            "public.users",
            "migration_version",
            &AttrValue::available("V42"),
            &AttrValue::available("V41"),
            DriftCategory::Migration,
        ));
        builder.push(classify_drift(
            "public.users",
            "migration_description",
            &AttrValue::available("add users"),
            &AttrValue::unavailable("history not readable"),
            DriftCategory::Migration,
        ));
        let kpis = compute_kpis(&[builder.build()]);
        assert_eq!(kpis.missing_migrations, 2);
    }
}
