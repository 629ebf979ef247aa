//! Cascade and self-reference detection over DDL fragments
//!
//! Detection runs case-insensitive substring heuristics over the
//! free-text `definition` a provider reports, not a SQL parser. That is a
//! known limitation inherited from the source system: a definition that
//! merely quotes the phrase would still match. The trait keeps the
//! classifiers decoupled from the heuristic so a real DDL parser can
//! replace it without touching them.

/// Capability for inspecting foreign-key DDL fragments
pub trait CascadeInspector {
    /// Whether the definition carries ON DELETE CASCADE or ON UPDATE CASCADE
    fn detects_cascade(&self, definition: &str) -> bool;

    /// Whether the definition references its own table
    fn detects_self_reference(&self, definition: &str, schema: &str, table: &str) -> bool;
}

/// Default substring-based inspector
#[derive(Debug, Clone, Copy, Default)]
pub struct SubstringInspector;

impl CascadeInspector for SubstringInspector {
    fn detects_cascade(&self, definition: &str) -> bool {
        let lowered = definition.to_lowercase();
        lowered.contains("on delete cascade") || lowered.contains("on update cascade")
    }

    fn detects_self_reference(&self, definition: &str, schema: &str, table: &str) -> bool {
        let lowered = definition.to_lowercase();
        let target = format!("references {}.{}", schema.to_lowercase(), table.to_lowercase());
        lowered.contains(&target)
    }
}
