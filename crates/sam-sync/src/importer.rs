//! Batch upsert importer.
//!
//! Rows are filtered for expiry, deduplicated by natural key (last
//! occurrence wins), grouped per table by identical column set, and
//! written to the staging tables as multi-row upserts. A failing
//! batch degrades to row-at-a-time writes so one bad row cannot sink
//! its batch.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rusqlite::params_from_iter;
use sam_types::{tables, FieldValue, Record};
use tracing::{debug, warn};

use crate::error::SyncResult;
use crate::schema::{spec_for, staging_name};
use crate::store::SamStore;

/// SQLite's default bound-parameter limit.
const MAX_SQL_PARAMS: usize = 999;

/// Counters for one import call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportOutcome {
    /// Rows written per live table name.
    pub written: BTreeMap<String, usize>,
    /// Rows dropped because their validity window had closed.
    pub expired: usize,
    /// Rows shadowed by a later occurrence of the same natural key.
    pub deduplicated: usize,
    /// Rows rejected by the database even in row-at-a-time mode.
    pub failed: usize,
}

impl ImportOutcome {
    /// Total rows written across all tables.
    pub fn total_written(&self) -> usize {
        self.written.values().sum()
    }
}

/// Writes parsed records to the staging tables.
pub struct BatchImporter {
    batch_size: usize,
    dry_run: bool,
    today: NaiveDate,
}

impl BatchImporter {
    /// Creates an importer for a run dated `today`.
    pub fn new(batch_size: usize, dry_run: bool, today: NaiveDate) -> Self {
        BatchImporter {
            batch_size: batch_size.max(1),
            dry_run,
            today,
        }
    }

    /// Imports one file's records into the staging tables.
    ///
    /// In dry-run mode nothing is written; the outcome reports the
    /// rows that would have been.
    ///
    /// # Errors
    ///
    /// Returns an error on I/O-level database failures. Individual
    /// row rejections are logged and counted, not raised.
    pub fn import(&self, store: &mut SamStore, records: &[Record]) -> SyncResult<ImportOutcome> {
        let mut outcome = ImportOutcome::default();

        // Partition into per-table buckets, dropping closed rows.
        let mut buckets: BTreeMap<&'static str, Vec<&Record>> = BTreeMap::new();
        for record in records {
            let row = record.row();
            if !row.retain_expired() {
                if let Some(end) = row.end_date() {
                    if end <= self.today {
                        outcome.expired += 1;
                        continue;
                    }
                }
            }
            buckets.entry(record.table()).or_default().push(record);
        }

        for table in tables::ALL {
            let Some(bucket) = buckets.remove(table) else {
                continue;
            };
            self.import_table(store, table, bucket, &mut outcome)?;
        }
        Ok(outcome)
    }

    fn import_table(
        &self,
        store: &mut SamStore,
        table: &'static str,
        bucket: Vec<&Record>,
        outcome: &mut ImportOutcome,
    ) -> SyncResult<()> {
        // Last occurrence of a natural key wins, as in the source
        // files themselves.
        let mut by_key: BTreeMap<String, &Record> = BTreeMap::new();
        for record in bucket {
            if by_key
                .insert(record.row().natural_key(), record)
                .is_some()
            {
                outcome.deduplicated += 1;
            }
        }

        // Optional fields are omitted, not null-bound, so rows are
        // grouped by the exact column set they emit.
        let mut groups: BTreeMap<Vec<&'static str>, Vec<Vec<(&'static str, FieldValue)>>> =
            BTreeMap::new();
        for record in by_key.values() {
            let columns = record.row().columns();
            let names: Vec<&'static str> = columns.iter().map(|(name, _)| *name).collect();
            groups.entry(names).or_default().push(columns);
        }

        let spec = spec_for(table).unwrap_or_else(|| unreachable!("spec per table name"));
        for (names, rows) in groups {
            let per_batch = self.batch_size.min(MAX_SQL_PARAMS / names.len()).max(1);
            for chunk in rows.chunks(per_batch) {
                if self.dry_run {
                    *outcome.written.entry(table.to_string()).or_insert(0) += chunk.len();
                    continue;
                }
                self.write_batch(store, table, spec.key, &names, chunk, outcome)?;
            }
        }
        debug!(
            table,
            written = outcome.written.get(table).copied().unwrap_or(0),
            "imported table rows"
        );
        Ok(())
    }

    fn write_batch(
        &self,
        store: &mut SamStore,
        table: &str,
        key: &[&str],
        names: &[&'static str],
        chunk: &[Vec<(&'static str, FieldValue)>],
        outcome: &mut ImportOutcome,
    ) -> SyncResult<()> {
        let sql = upsert_sql(&staging_name(table), names, key, chunk.len());
        let batch_result = store.with_retry(|conn| {
            let values = chunk
                .iter()
                .flat_map(|row| row.iter().map(|(_, value)| sql_value(value)));
            conn.execute(&sql, params_from_iter(values))
        });

        match batch_result {
            Ok(_) => {
                *outcome.written.entry(table.to_string()).or_insert(0) += chunk.len();
                Ok(())
            }
            Err(batch_error) => {
                // One bad row poisons a multi-row statement; retry
                // each row alone and keep the rest.
                warn!(table, error = %batch_error, "batch rejected, retrying row by row");
                let row_sql = upsert_sql(&staging_name(table), names, key, 1);
                for row in chunk {
                    let result = store.with_retry(|conn| {
                        let values = row.iter().map(|(_, value)| sql_value(value));
                        conn.execute(&row_sql, params_from_iter(values))
                    });
                    match result {
                        Ok(_) => {
                            *outcome.written.entry(table.to_string()).or_insert(0) += 1;
                        }
                        Err(e) => {
                            outcome.failed += 1;
                            warn!(table, error = %e, "row rejected");
                        }
                    }
                }
                Ok(())
            }
        }
    }
}

/// Multi-row upsert statement for one column set.
fn upsert_sql(table: &str, names: &[&'static str], key: &[&str], rows: usize) -> String {
    let column_list: Vec<String> = names.iter().map(|n| format!("\"{n}\"")).collect();
    let placeholders: Vec<String> = (0..rows)
        .map(|row| {
            let row_params: Vec<String> = (0..names.len())
                .map(|col| format!("?{}", row * names.len() + col + 1))
                .collect();
            format!("({})", row_params.join(", "))
        })
        .collect();
    let key_list: Vec<String> = key.iter().map(|k| format!("\"{k}\"")).collect();

    let non_key: Vec<String> = names
        .iter()
        .filter(|&&name| !key.contains(&name))
        .map(|name| format!("\"{name}\" = excluded.\"{name}\""))
        .collect();
    let conflict = if non_key.is_empty() {
        "DO NOTHING".to_string()
    } else {
        format!("DO UPDATE SET {}", non_key.join(", "))
    };

    format!(
        "INSERT INTO \"{table}\" ({}) VALUES {} ON CONFLICT ({}) {conflict}",
        column_list.join(", "),
        placeholders.join(", "),
        key_list.join(", ")
    )
}

fn sql_value(value: &FieldValue) -> rusqlite::types::Value {
    use rusqlite::types::Value;
    match value {
        FieldValue::Text(s) => Value::Text(s.clone()),
        FieldValue::Integer(i) => Value::Integer(*i),
        FieldValue::Real(r) => Value::Real(*r),
        FieldValue::Bool(b) => Value::Integer(i64::from(*b)),
        FieldValue::Date(d) => Value::Text(d.format("%Y-%m-%d").to_string()),
    }
}
