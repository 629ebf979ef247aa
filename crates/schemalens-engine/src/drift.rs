//! Cross-environment drift classification
//!
//! Compares the same logical object in two environments (source/target)
//! attribute by attribute. Comparison never fails outright: an attribute
//! that could not be retrieved on either side degrades the item to
//! UNKNOWN with a captured reason instead of raising.

use schemalens_core::{
    DriftCategory, DriftItem, DriftSection, DriftStatus, HeuristicsConfig, SectionAvailability,
    Severity, TableMetadata, ValidationError,
};
use std::collections::BTreeSet;

/// An attribute value as observed in one environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrValue {
    /// The value was retrieved
    Available(String),

    /// The capability to retrieve it was unavailable or denied
    Unavailable {
        /// Why the value could not be read
        reason: String,
    },
}

impl AttrValue {
    /// Retrieved value
    pub fn available(value: impl Into<String>) -> Self {
        Self::Available(value.into())
    }

    /// Unreadable value with a captured reason
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }

    fn value(&self) -> Option<&str> {
        match self {
            Self::Available(v) => Some(v),
            Self::Unavailable { .. } => None,
        }
    }
}

/// Case-insensitive, trimmed comparison key
fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Classify one attribute compared across two environments
///
/// Status: UNKNOWN if either side is unavailable, MATCH if the normalized
/// values are equal, DIFFER otherwise. Severity is the category's base
/// severity for DIFFER, always Info for MATCH, and capped at Warn for
/// UNKNOWN. Risk level is attached only to DIFFER items in structural
/// categories.
pub fn classify_drift(
    object_name: impl Into<String>,
    attribute: impl Into<String>,
    source: &AttrValue,
    target: &AttrValue,
    category: DriftCategory,
) -> DriftItem {
    let object_name = object_name.into();
    let attribute = attribute.into();

    let (status, message) = match (source, target) {
        (AttrValue::Unavailable { reason }, _) => (
            DriftStatus::Unknown,
            format!(
                "{} {} could not be compared: source unavailable ({})",
                object_name, attribute, reason
            ),
        ),
        (_, AttrValue::Unavailable { reason }) => (
            DriftStatus::Unknown,
            format!(
                "{} {} could not be compared: target unavailable ({})",
                object_name, attribute, reason
            ),
        ),
        (AttrValue::Available(s), AttrValue::Available(t)) => {
            if normalize(s) == normalize(t) {
                (
                    DriftStatus::Match,
                    format!("{} {} matches ({})", object_name, attribute, s),
                )
            } else {
                (
                    DriftStatus::Differ,
                    format!(
                        "{} {} differs: source is {}, target is {}",
                        object_name, attribute, s, t
                    ),
                )
            }
        }
    };

    let severity = match status {
        DriftStatus::Match => Severity::Info,
        DriftStatus::Differ => category.base_severity(),
        DriftStatus::Unknown => match category.base_severity() {
            Severity::Info => Severity::Info,
            _ => Severity::Warn,
        },
    };

    let risk_level = if status == DriftStatus::Differ {
        category.risk_level()
    } else {
        None
    };

    DriftItem {
        object_name,
        attribute,
        source_value: source.value().map(String::from),
        target_value: target.value().map(String::from),
        status,
        severity,
        category,
        risk_level,
        message,
    }
}

/// Accumulates items into a section, keeping exact population counts
///
/// MATCH items beyond the configured cap are counted but not
/// materialized; DIFFER and UNKNOWN items are always materialized.
pub struct DriftSectionBuilder {
    section: DriftSection,
    match_item_cap: Option<usize>,
}

impl DriftSectionBuilder {
    /// Start a section with the given MATCH materialization cap
    pub fn new(section_name: impl Into<String>, match_item_cap: Option<usize>) -> Self {
        Self {
            section: DriftSection::new(section_name),
            match_item_cap,
        }
    }

    /// Set the section availability
    pub fn with_availability(mut self, availability: SectionAvailability) -> Self {
        self.section.availability = availability;
        self
    }

    /// Add an item, updating population counts
    pub fn push(&mut self, item: DriftItem) {
        match item.status {
            DriftStatus::Match => {
                self.section.match_count += 1;
                let capped = self
                    .match_item_cap
                    .map(|cap| self.materialized_matches() >= cap)
                    .unwrap_or(false);
                if !capped {
                    self.section.drift_items.push(item);
                }
            }
            DriftStatus::Differ => {
                self.section.differ_count += 1;
                self.section.drift_items.push(item);
            }
            DriftStatus::Unknown => {
                self.section.unknown_count += 1;
                self.section.drift_items.push(item);
            }
        }
    }

    fn materialized_matches(&self) -> usize {
        self.section
            .drift_items
            .iter()
            .filter(|i| i.status == DriftStatus::Match)
            .count()
    }

    /// Finish the section
    pub fn build(self) -> DriftSection {
        self.section
    }
}

/// Compare two same-named tables across environments
///
/// Produces one section per logical area: Columns, Constraints, Indexes,
/// Privileges and Migration. Sections whose capability is missing on one
/// or both sides are marked partial or unavailable instead of failing.
pub fn compare_tables(
    source: &TableMetadata,
    target: &TableMetadata,
    config: &HeuristicsConfig,
) -> Result<Vec<DriftSection>, ValidationError> {
    source.validate()?;
    target.validate()?;

    Ok(vec![
        compare_columns(source, target, config),
        compare_constraints(source, target, config),
        compare_indexes(source, target, config),
        compare_privileges(source, target, config),
        compare_migration(source, target, config),
    ])
}

/// Union of names, source order first, then target-only names
fn name_union(source_names: Vec<String>, target_names: Vec<String>) -> Vec<String> {
    let mut union = source_names.clone();
    let seen: BTreeSet<&String> = source_names.iter().collect();
    for name in &target_names {
        if !seen.contains(name) {
            union.push(name.clone());
        }
    }
    union
}

fn presence(value: bool) -> AttrValue {
    AttrValue::available(if value { "present" } else { "absent" })
}

fn compare_columns(
    source: &TableMetadata,
    target: &TableMetadata,
    config: &HeuristicsConfig,
) -> DriftSection {
    let mut builder = DriftSectionBuilder::new("Columns", config.match_item_cap);

    let names = name_union(
        source.columns.iter().map(|c| c.name.clone()).collect(),
        target.columns.iter().map(|c| c.name.clone()).collect(),
    );

    for name in names {
        let source_col = source.find_column(&name);
        let target_col = target.find_column(&name);

        match (source_col, target_col) {
            (Some(s), Some(t)) => {
                builder.push(classify_drift(
                    name.as_str(),
                    "data_type",
                    &AttrValue::available(&s.data_type),
                    &AttrValue::available(&t.data_type),
                    DriftCategory::ColumnType,
                ));
                builder.push(classify_drift(
                    name.as_str(),
                    "nullability",
                    &AttrValue::available(if s.nullable { "NULL" } else { "NOT NULL" }),
                    &AttrValue::available(if t.nullable { "NULL" } else { "NOT NULL" }),
                    DriftCategory::ColumnNullability,
                ));
                builder.push(classify_drift(
                    name.as_str(),
                    "default",
                    &AttrValue::available(s.column_default.as_deref().unwrap_or("none")),
                    &AttrValue::available(t.column_default.as_deref().unwrap_or("none")),
                    DriftCategory::ColumnDefault,
                ));
            }
            (source_side, target_side) => {
                builder.push(classify_drift(
                    name.as_str(),
                    "presence",
                    &presence(source_side.is_some()),
                    &presence(target_side.is_some()),
                    DriftCategory::ColumnPresence,
                ));
            }
        }
    }

    builder.build()
}

fn constraint_key(constraint: &schemalens_core::Constraint) -> String {
    match &constraint.name {
        Some(name) => name.clone(),
        None => format!("{}({})", constraint.constraint_type, constraint.columns.join(",")),
    }
}

fn compare_constraints(
    source: &TableMetadata,
    target: &TableMetadata,
    config: &HeuristicsConfig,
) -> DriftSection {
    let mut builder = DriftSectionBuilder::new("Constraints", config.match_item_cap);

    let keys = name_union(
        source.constraints.iter().map(constraint_key).collect(),
        target.constraints.iter().map(constraint_key).collect(),
    );

    for key in keys {
        let source_con = source.constraints.iter().find(|c| constraint_key(c) == key);
        let target_con = target.constraints.iter().find(|c| constraint_key(c) == key);

        match (source_con, target_con) {
            (Some(s), Some(t)) => {
                let source_def = match &s.definition {
                    Some(def) => AttrValue::available(def),
                    None => AttrValue::unavailable("definition not reported"),
                };
                let target_def = match &t.definition {
                    Some(def) => AttrValue::available(def),
                    None => AttrValue::unavailable("definition not reported"),
                };
                builder.push(classify_drift(
                    key.as_str(),
                    "definition",
                    &source_def,
                    &target_def,
                    DriftCategory::ConstraintDefinition,
                ));
            }
            (source_side, target_side) => {
                builder.push(classify_drift(
                    key.as_str(),
                    "presence",
                    &presence(source_side.is_some()),
                    &presence(target_side.is_some()),
                    DriftCategory::ConstraintPresence,
                ));
            }
        }
    }

    builder.build()
}

fn index_summary(index: &schemalens_core::Index) -> String {
    let uniqueness = if index.primary {
        "primary"
    } else if index.unique {
        "unique"
    } else {
        "non-unique"
    };
    format!(
        "{} ({}) using {}",
        uniqueness,
        index.columns.join(", "),
        index.access_method
    )
}

fn compare_indexes(
    source: &TableMetadata,
    target: &TableMetadata,
    config: &HeuristicsConfig,
) -> DriftSection {
    let mut builder = DriftSectionBuilder::new("Indexes", config.match_item_cap);

    let names = name_union(
        source.indexes.iter().map(|i| i.name.clone()).collect(),
        target.indexes.iter().map(|i| i.name.clone()).collect(),
    );

    for name in names {
        let source_idx = source.indexes.iter().find(|i| i.name == name);
        let target_idx = target.indexes.iter().find(|i| i.name == name);

        match (source_idx, target_idx) {
            (Some(s), Some(t)) => {
                builder.push(classify_drift(
                    name.as_str(),
                    "definition",
                    &AttrValue::available(index_summary(s)),
                    &AttrValue::available(index_summary(t)),
                    DriftCategory::IndexDefinition,
                ));
            }
            (source_side, target_side) => {
                builder.push(classify_drift(
                    name.as_str(),
                    "presence",
                    &presence(source_side.is_some()),
                    &presence(target_side.is_some()),
                    DriftCategory::IndexPresence,
                ));
            }
        }
    }

    builder.build()
}

fn compare_privileges(
    source: &TableMetadata,
    target: &TableMetadata,
    config: &HeuristicsConfig,
) -> DriftSection {
    match (&source.privileges, &target.privileges) {
        (None, None) => DriftSection::unavailable(
            "Privileges",
            "privilege check not available in either environment",
        )
        .into_section_with(|availability| {
            availability
                .with_needed_privilege("SELECT on the grants catalog")
                .with_impact("grant drift between environments cannot be verified")
        }),
        (Some(_), None) | (None, Some(_)) => {
            let (available_side, missing_side) = if source.privileges.is_some() {
                ("source", "target")
            } else {
                ("target", "source")
            };
            let availability = SectionAvailability::available()
                .partial()
                .with_needed_privilege("SELECT on the grants catalog")
                .with_impact("grant drift between environments cannot be verified");

            let mut builder = DriftSectionBuilder::new("Privileges", config.match_item_cap)
                .with_availability(availability);

            let known = source.privileges.as_ref().or(target.privileges.as_ref());
            if let Some(privileges) = known {
                let reason = format!("privilege check unavailable in {}", missing_side);
                for verb in &privileges.granted {
                    let known_value = AttrValue::available("granted");
                    let unknown_value = AttrValue::unavailable(reason.clone());
                    let (source_value, target_value) = if available_side == "source" {
                        (known_value, unknown_value)
                    } else {
                        (unknown_value, known_value)
                    };
                    builder.push(classify_drift(
                        verb.as_str(),
                        "granted",
                        &source_value,
                        &target_value,
                        DriftCategory::Grant,
                    ));
                }
            }
            builder.build()
        }
        (Some(s), Some(t)) => {
            let mut builder = DriftSectionBuilder::new("Privileges", config.match_item_cap);

            let verbs: BTreeSet<&String> = s.granted.union(&t.granted).collect();
            for verb in verbs {
                builder.push(classify_drift(
                    verb.as_str(),
                    "granted",
                    &presence(s.granted.contains(verb.as_str())),
                    &presence(t.granted.contains(verb.as_str())),
                    DriftCategory::Grant,
                ));
            }

            builder.push(classify_drift(
                source.qualified_name(),
                "owner",
                &AttrValue::available(&s.owner),
                &AttrValue::available(&t.owner),
                DriftCategory::Ownership,
            ));

            builder.build()
        }
    }
}

fn compare_migration(
    source: &TableMetadata,
    target: &TableMetadata,
    config: &HeuristicsConfig,
) -> DriftSection {
    match (&source.provenance, &target.provenance) {
        (None, None) => DriftSection::unavailable(
            "Migration",
            "migration history not readable in either environment",
        )
        .into_section_with(|availability| {
            availability.with_impact("cannot verify both environments ran the same migrations")
        }),
        (source_prov, target_prov) => {
            let partial = source_prov.is_none() || target_prov.is_none();
            let availability = if partial {
                SectionAvailability::available()
                    .partial()
                    .with_impact("cannot verify both environments ran the same migrations")
            } else {
                SectionAvailability::available()
            };

            let mut builder = DriftSectionBuilder::new("Migration", config.match_item_cap)
                .with_availability(availability);

            let attr = |prov: &Option<schemalens_core::MigrationProvenance>,
                        side: &str,
                        pick: fn(&schemalens_core::MigrationProvenance) -> String|
             -> AttrValue {
                match prov {
                    Some(p) => AttrValue::available(pick(p)),
                    None => AttrValue::unavailable(format!("migration history not readable in {}", side)),
                }
            };

            let object = source.qualified_name();
            builder.push(classify_drift(
                object.as_str(),
                "migration_version",
                &attr(source_prov, "source", |p| p.version.clone()),
                &attr(target_prov, "target", |p| p.version.clone()),
                DriftCategory::Migration,
            ));
            builder.push(classify_drift(
                object.as_str(),
                "migration_description",
                &attr(source_prov, "source", |p| p.description.clone()),
                &attr(target_prov, "target", |p| p.description.clone()),
                DriftCategory::Migration,
            ));

            builder.build()
        }
    }
}

/// Small helper for editing the availability of an unavailable section
trait SectionExt {
    fn into_section_with(
        self,
        edit: impl FnOnce(SectionAvailability) -> SectionAvailability,
    ) -> DriftSection;
}

impl SectionExt for DriftSection {
    fn into_section_with(
        mut self,
        edit: impl FnOnce(SectionAvailability) -> SectionAvailability,
    ) -> DriftSection {
        self.availability = edit(self.availability);
        self
    }
}
