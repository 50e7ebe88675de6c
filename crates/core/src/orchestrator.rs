use tracing::info;

use crate::diff::{compare::diff, types::SchemaDiff};
use crate::emit::{DDLBackend, MigrationScript, emit};
use crate::error::Result;
use crate::introspect::handle::ConnectionHandle;
use crate::introspect::introspect;
use crate::ir::SchemaSet;

/// Composes the full pipeline: `(source_handle, target_handle, backend) ->
/// MigrationScript`. The three subsystems never share mutable state; this
/// struct only sequences the calls and carries the backend reference.
pub struct Orchestrator<'a> {
    backend: &'a dyn DDLBackend,
}

impl<'a> Orchestrator<'a> {
    #[must_use]
    pub fn new(backend: &'a dyn DDLBackend) -> Self {
        Self { backend }
    }

    /// Introspect both connections, diff the results, and emit a migration
    /// script. Each stage is independent; introspection of `source` and
    /// `target` could run concurrently from the caller's side, but this
    /// method keeps them sequential since the heavier concurrency already
    /// happens inside each `introspect` call.
    pub fn run(
        &self,
        source_handle: &dyn ConnectionHandle,
        target_handle: &dyn ConnectionHandle,
    ) -> Result<MigrationScript> {
        let source = introspect(source_handle)?;
        info!(schemas = source.schemas.len(), "introspected source");
        let target = introspect(target_handle)?;
        info!(schemas = target.schemas.len(), "introspected target");

        let schema_diff = self.diff_only(&source, &target);
        emit(self.backend, &schema_diff)
    }

    /// Diff two already-introspected snapshots without emitting DDL — used
    /// by callers that only want the structural delta (e.g. a `diff`
    /// subcommand that prints a summary instead of SQL).
    pub fn diff_only(&self, source: &SchemaSet, target: &SchemaSet) -> SchemaDiff {
        diff(source, target)
    }
}
