//! Text report rendering for a schema diff.
//!
//! The formatter only reads the already-computed [`SchemaDiff`]; it never
//! re-runs any part of the comparison.

use std::fmt::Write;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::classify::{ClassifiedChange, DataLossRisk};
use crate::differ::ChangeKind;
use crate::engine::SchemaDiff;
use crate::impact::OperationType;

/// Renders a [`SchemaDiff`] as a structured text report.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportFormatter;

impl ReportFormatter {
    /// Create a new formatter.
    pub fn new() -> Self {
        Self
    }

    /// Render the report with the current time in the header.
    pub fn render(&self, diff: &SchemaDiff) -> String {
        self.render_at(diff, Utc::now())
    }

    /// Render the report with an explicit header timestamp.
    pub fn render_at(&self, diff: &SchemaDiff, timestamp: DateTime<Utc>) -> String {
        let mut out = String::new();

        // 1. Header
        let _ = writeln!(
            out,
            "Schema diff report: {} (table `{}`)",
            diff.schema_name, diff.table
        );
        let _ = writeln!(
            out,
            "Generated: {}",
            timestamp.to_rfc3339_opts(SecondsFormat::Secs, true)
        );
        out.push('\n');

        // 2. Summary
        let _ = writeln!(out, "Summary");
        let _ = writeln!(out, "  compatibility:      {}", diff.summary.compatibility);
        let _ = writeln!(out, "  impact level:       {}", diff.summary.impact_level);
        let _ = writeln!(
            out,
            "  requires migration: {}",
            diff.migration_impact.requires_migration
        );
        let _ = writeln!(
            out,
            "  data loss risk:     {}",
            diff.migration_impact.data_loss_risk
        );
        out.push('\n');

        // 3./4. Per-category changes
        self.write_changes(&mut out, "Field changes", &diff.field_changes);
        self.write_changes(&mut out, "Relationship changes", &diff.relationship_changes);

        // 5. Breaking changes
        let _ = writeln!(out, "Breaking changes ({})", diff.breaking_changes.len());
        if diff.breaking_changes.is_empty() {
            let _ = writeln!(out, "  (none)");
        }
        for change in &diff.breaking_changes {
            let _ = writeln!(
                out,
                "  - [risk: {}] {}",
                change.data_loss_risk, change.description
            );
        }
        out.push('\n');

        // 6. Migration impact
        let impact = &diff.migration_impact;
        let _ = writeln!(
            out,
            "Migration impact: {} operation(s), complexity {}",
            impact.operations.len(),
            impact.complexity
        );
        for op in &impact.operations {
            let _ = writeln!(
                out,
                "  - {} `{}` [risk: {}]",
                op.operation_type, op.name, op.risk_level
            );
        }
        for action in self.recommended_actions(diff) {
            let _ = writeln!(out, "  * {}", action);
        }

        out
    }

    fn write_changes(&self, out: &mut String, heading: &str, changes: &[ClassifiedChange]) {
        let _ = writeln!(out, "{} ({})", heading, changes.len());
        if changes.is_empty() {
            let _ = writeln!(out, "  (none)");
        }
        for classified in changes {
            match &classified.change {
                ChangeKind::FieldAdded { field } => {
                    let _ = writeln!(out, "  + {} [{}]", field, classified.severity);
                }
                ChangeKind::FieldRemoved { field } => {
                    let _ = writeln!(out, "  - {} [{}]", field, classified.severity);
                }
                ChangeKind::FieldModified { name, changes } => {
                    let _ = writeln!(out, "  ~ {} [{}]", name, classified.severity);
                    for change in changes {
                        let _ = writeln!(out, "      {}", change);
                    }
                }
                ChangeKind::RelationshipAdded { relationship } => {
                    let _ = writeln!(out, "  + {} [{}]", relationship, classified.severity);
                }
                ChangeKind::RelationshipRemoved { relationship } => {
                    let _ = writeln!(out, "  - {} [{}]", relationship, classified.severity);
                }
                ChangeKind::RelationshipModified { name, changes } => {
                    let _ = writeln!(out, "  ~ {} [{}]", name, classified.severity);
                    for change in changes {
                        let _ = writeln!(out, "      {}", change);
                    }
                }
            }
        }
        out.push('\n');
    }

    /// Free-text recommendations derived from the operation types and risk.
    fn recommended_actions(&self, diff: &SchemaDiff) -> Vec<&'static str> {
        let impact = &diff.migration_impact;
        let mut actions = Vec::new();

        if impact.data_loss_risk >= DataLossRisk::Medium {
            actions.push("backup data before migration");
        }

        let has = |op: OperationType| impact.operations.iter().any(|o| o.operation_type == op);

        if has(OperationType::DropColumn) {
            actions.push("archive or export data from dropped columns first");
        }
        if has(OperationType::AlterColumn) {
            actions.push("verify existing values convert cleanly to the new column definition");
        }
        if has(OperationType::DropPivotTable) {
            actions.push("export pivot associations before dropping the pivot table");
        }
        if has(OperationType::CreatePivotTable) {
            actions.push("backfill pivot rows for existing associations");
        }
        if has(OperationType::AddForeignKey) || has(OperationType::DropForeignKey) {
            actions.push("validate referential integrity before changing foreign keys");
        }
        if has(OperationType::AddColumn) {
            actions.push("review defaults for newly added columns");
        }

        actions
    }
}
