//! Relational schema of the target store.
//!
//! One [`TableSpec`] per target table declares the full column set and
//! the natural key. Imports never write the live tables directly; each
//! run writes shadow tables (`stg_` prefix) that are renamed over the
//! live ones at finalization.

use sam_types::tables;

/// Declarative spec of one target table.
#[derive(Debug, Clone, Copy)]
pub struct TableSpec {
    /// Live table name.
    pub name: &'static str,
    /// `(column, SQLite type)` pairs; key columns are NOT NULL.
    pub columns: &'static [(&'static str, &'static str)],
    /// Natural key, a prefix-free subset of `columns`.
    pub key: &'static [&'static str],
}

impl TableSpec {
    /// Shadow table name for this table.
    pub fn staging_name(&self) -> String {
        staging_name(self.name)
    }

    /// `CREATE TABLE IF NOT EXISTS` statement.
    pub fn create_sql(&self, table_name: &str) -> String {
        let mut parts: Vec<String> = self
            .columns
            .iter()
            .map(|(column, sql_type)| {
                if self.key.contains(column) {
                    format!("\"{column}\" {sql_type} NOT NULL")
                } else {
                    format!("\"{column}\" {sql_type}")
                }
            })
            .collect();
        let key_list: Vec<String> = self.key.iter().map(|k| format!("\"{k}\"")).collect();
        parts.push(format!("PRIMARY KEY ({})", key_list.join(", ")));
        format!(
            "CREATE TABLE IF NOT EXISTS \"{}\" ({})",
            table_name,
            parts.join(", ")
        )
    }
}

/// Shadow table name for a live table name.
pub fn staging_name(table: &str) -> String {
    format!("stg_{table}")
}

/// Spec lookup by live table name.
pub fn spec_for(table: &str) -> Option<&'static TableSpec> {
    ALL_SPECS.iter().find(|spec| spec.name == table)
}

/// All table specs, parents before children.
pub const ALL_SPECS: [TableSpec; 18] = [
    TableSpec {
        name: tables::SUBSTANCE,
        columns: &[
            ("code", "TEXT"),
            ("name", "TEXT"),
            ("start_date", "TEXT"),
            ("end_date", "TEXT"),
        ],
        key: &["code"],
    },
    TableSpec {
        name: tables::ATC_CLASSIFICATION,
        columns: &[("code", "TEXT"), ("description", "TEXT")],
        key: &["code"],
    },
    TableSpec {
        name: tables::PHARMACEUTICAL_FORM,
        columns: &[
            ("code", "TEXT"),
            ("name", "TEXT"),
            ("start_date", "TEXT"),
            ("end_date", "TEXT"),
        ],
        key: &["code"],
    },
    TableSpec {
        name: tables::ROUTE_OF_ADMINISTRATION,
        columns: &[
            ("code", "TEXT"),
            ("name", "TEXT"),
            ("start_date", "TEXT"),
            ("end_date", "TEXT"),
        ],
        key: &["code"],
    },
    TableSpec {
        name: tables::COMPANY,
        columns: &[
            ("actor_nr", "TEXT"),
            ("name", "TEXT"),
            ("legal_form", "TEXT"),
            ("country_code", "TEXT"),
            ("vat_nr", "TEXT"),
            ("start_date", "TEXT"),
            ("end_date", "TEXT"),
        ],
        key: &["actor_nr"],
    },
    TableSpec {
        name: tables::LEGAL_BASIS,
        columns: &[
            ("key", "TEXT"),
            ("title", "TEXT"),
            ("basis_type", "TEXT"),
            ("effective_on", "TEXT"),
        ],
        key: &["key"],
    },
    TableSpec {
        name: tables::LEGAL_REFERENCE,
        columns: &[
            ("path", "TEXT"),
            ("legal_basis_key", "TEXT"),
            ("parent_path", "TEXT"),
            ("title", "TEXT"),
        ],
        key: &["path"],
    },
    TableSpec {
        name: tables::LEGAL_TEXT,
        columns: &[
            ("path", "TEXT"),
            ("legal_reference_path", "TEXT"),
            ("parent_path", "TEXT"),
            ("sequence_nr", "INTEGER"),
            ("content", "TEXT"),
            ("text_type", "TEXT"),
        ],
        key: &["path"],
    },
    TableSpec {
        name: tables::VTM,
        columns: &[
            ("code", "TEXT"),
            ("name", "TEXT"),
            ("start_date", "TEXT"),
            ("end_date", "TEXT"),
        ],
        key: &["code"],
    },
    TableSpec {
        name: tables::VMP_GROUP,
        columns: &[
            ("code", "TEXT"),
            ("name", "TEXT"),
            ("start_date", "TEXT"),
            ("end_date", "TEXT"),
        ],
        key: &["code"],
    },
    TableSpec {
        name: tables::VMP,
        columns: &[
            ("code", "TEXT"),
            ("name", "TEXT"),
            ("abbreviation", "TEXT"),
            ("vtm_code", "TEXT"),
            ("vmp_group_code", "TEXT"),
            ("start_date", "TEXT"),
            ("end_date", "TEXT"),
        ],
        key: &["code"],
    },
    TableSpec {
        name: tables::AMP,
        columns: &[
            ("code", "TEXT"),
            ("name", "TEXT"),
            ("black_triangle", "INTEGER"),
            ("official_name", "TEXT"),
            ("medicine_type", "TEXT"),
            ("company_actor_nr", "TEXT"),
            ("vmp_code", "TEXT"),
            ("status", "TEXT"),
            ("start_date", "TEXT"),
            ("end_date", "TEXT"),
        ],
        key: &["code"],
    },
    TableSpec {
        name: tables::AMP_COMPONENT,
        columns: &[
            ("amp_code", "TEXT"),
            ("sequence_nr", "INTEGER"),
            ("pharmaceutical_form_code", "TEXT"),
            ("route_of_administration_code", "TEXT"),
            ("start_date", "TEXT"),
            ("end_date", "TEXT"),
        ],
        key: &["amp_code", "sequence_nr"],
    },
    TableSpec {
        name: tables::AMP_INGREDIENT,
        columns: &[
            ("amp_code", "TEXT"),
            ("sequence_nr", "INTEGER"),
            ("rank", "INTEGER"),
            ("substance_code", "TEXT"),
            ("ingredient_type", "TEXT"),
            ("strength", "TEXT"),
            ("start_date", "TEXT"),
            ("end_date", "TEXT"),
        ],
        key: &["amp_code", "sequence_nr", "rank"],
    },
    TableSpec {
        name: tables::AMPP,
        columns: &[
            ("cti_extended", "TEXT"),
            ("amp_code", "TEXT"),
            ("delivery_modus", "TEXT"),
            ("authorization_nr", "TEXT"),
            ("pack_display_value", "TEXT"),
            ("status", "TEXT"),
            ("start_date", "TEXT"),
            ("end_date", "TEXT"),
        ],
        key: &["cti_extended"],
    },
    TableSpec {
        name: tables::DMPP,
        columns: &[
            ("code", "TEXT"),
            ("delivery_environment", "TEXT"),
            ("ampp_cti_extended", "TEXT"),
            ("price", "REAL"),
            ("reimbursable", "INTEGER"),
            ("start_date", "TEXT"),
            ("end_date", "TEXT"),
        ],
        key: &["code", "delivery_environment"],
    },
    TableSpec {
        name: tables::REIMBURSEMENT_CONTEXT,
        columns: &[
            ("dmpp_code", "TEXT"),
            ("delivery_environment", "TEXT"),
            ("legal_reference_path", "TEXT"),
            ("criterion_category", "TEXT"),
            ("reimbursement_rate", "REAL"),
            ("reference_base_price", "REAL"),
            ("flat_rate_system", "INTEGER"),
            ("start_date", "TEXT"),
            ("end_date", "TEXT"),
        ],
        key: &["dmpp_code", "delivery_environment", "legal_reference_path"],
    },
    TableSpec {
        name: tables::CHAPTER_IV_PARAGRAPH,
        columns: &[
            ("chapter_name", "TEXT"),
            ("paragraph_name", "TEXT"),
            ("key_string_nl", "TEXT"),
            ("key_string_fr", "TEXT"),
            ("process_type", "TEXT"),
            ("publication_status", "TEXT"),
            ("start_date", "TEXT"),
            ("end_date", "TEXT"),
        ],
        key: &["chapter_name", "paragraph_name"],
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_table_has_a_spec() {
        for table in tables::ALL {
            assert!(spec_for(table).is_some(), "no spec for {table}");
        }
        assert_eq!(ALL_SPECS.len(), tables::ALL.len());
    }

    #[test]
    fn test_keys_are_declared_columns() {
        for spec in &ALL_SPECS {
            for key in spec.key {
                assert!(
                    spec.columns.iter().any(|(column, _)| column == key),
                    "{}: key column {key} not declared",
                    spec.name
                );
            }
        }
    }

    #[test]
    fn test_create_sql_marks_keys_not_null() {
        let spec = spec_for(tables::DMPP).unwrap();
        let sql = spec.create_sql(&spec.staging_name());
        assert!(sql.starts_with("CREATE TABLE IF NOT EXISTS \"stg_dmpp\""));
        assert!(sql.contains("\"code\" TEXT NOT NULL"));
        assert!(sql.contains("\"price\" REAL,"));
        assert!(sql.contains("PRIMARY KEY (\"code\", \"delivery_environment\")"));
    }
}
