// Copyright (C) 2024-2025 Fred Clausen and the ratatui project contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! # xtask - Project Automation
//!
//! Wraps the cargo invocations used locally and in CI, plus a schema check
//! for the persistence migrations.
//!
//! - `cargo xtask ci` runs lint, deny, machete, build, test, and
//!   verify-migrations
//! - `cargo xtask verify-migrations` applies the `SQLite` migrations to an
//!   in-memory database, compares the result with the schema the
//!   persistence layer expects, and checks that the migrations revert
//!   cleanly

#![deny(
    clippy::pedantic,
    //clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

use std::{fmt::Debug, io, process::Output, vec};

use cargo_metadata::MetadataCommand;
use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use color_eyre::{eyre::Context, Result};
use diesel::sql_types::{Integer, Text};
use diesel::{QueryableByName, RunQueryDsl, SqliteConnection};
use diesel_migrations::{embed_migrations, EmbeddedMigrations};
use duct::cmd;
use std::collections::{BTreeMap, BTreeSet};
use tracing::level_filters::LevelFilter;
use tracing_log::AsTrace;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("../crates/persistence/migrations");

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(args.log_level())
        .without_time()
        .init();

    match args.run() {
        Ok(()) => (),
        Err(err) => {
            tracing::error!("{err}");
            std::process::exit(1);
        }
    }
    Ok(())
}

#[derive(Debug, Parser)]
#[command(bin_name = "cargo xtask", styles = clap_cargo::style::CLAP_STYLING)]
struct Args {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    verbosity: Verbosity<InfoLevel>,
}

impl Args {
    fn run(self) -> Result<()> {
        self.command.run()
    }

    fn log_level(&self) -> LevelFilter {
        self.verbosity.log_level_filter().as_trace()
    }
}

#[derive(Clone, Debug, Subcommand)]
enum Command {
    /// Run CI checks (lint, build, test, migrations)
    CI,

    /// Build the project
    #[command(visible_alias = "b")]
    Build,

    /// Run cargo check
    #[command(visible_alias = "c")]
    Check,

    /// Generate code coverage report
    #[command(visible_alias = "cov")]
    Coverage,

    /// Check dependencies
    #[command(visible_alias = "cd")]
    Deny,

    // Check unused dependencies
    #[command(visible_alias = "m")]
    Machete,

    /// Lint formatting, typos, clippy, and docs
    #[command(visible_alias = "l")]
    Lint,

    /// Run clippy on the project
    #[command(visible_alias = "cl")]
    LintClippy,

    /// Check documentation for errors and warnings
    #[command(visible_alias = "d")]
    LintDocs,

    /// Check for formatting issues in the project
    #[command(visible_alias = "lf")]
    LintFormatting,

    /// Lint markdown files
    #[command(visible_alias = "md")]
    LintMarkdown,

    /// Check for typos in the project
    #[command(visible_alias = "lt")]
    LintTypos,

    /// Fix clippy warnings in the project
    #[command(visible_alias = "fc")]
    FixClippy,

    /// Fix formatting issues in the project
    #[command(visible_alias = "fmt")]
    FixFormatting,

    /// Fix typos in the project
    #[command(visible_alias = "typos")]
    FixTypos,

    /// Run tests
    #[command(visible_alias = "t")]
    Test,

    /// Run doc tests
    #[command(visible_alias = "td")]
    TestDocs,

    /// Run lib tests
    #[command(visible_alias = "tl")]
    TestLibs,

    /// Verify the migrated schema and the down migrations
    #[command(visible_alias = "vm")]
    VerifyMigrations,
}

impl Command {
    fn run(self) -> Result<()> {
        match self {
            Self::CI => ci(),
            Self::Build => build(),
            Self::Check => check(),
            Self::Deny => deny(),
            Self::Machete => machete(),
            Self::Coverage => coverage(),
            Self::Lint => lint(),
            Self::LintClippy => lint_clippy(),
            Self::LintDocs => lint_docs(),
            Self::LintFormatting => lint_format(),
            Self::LintTypos => lint_typos(),
            Self::LintMarkdown => lint_markdown(),
            Self::FixClippy => fix_clippy(),
            Self::FixFormatting => fix_format(),
            Self::FixTypos => fix_typos(),
            Self::Test => test(),
            Self::TestDocs => test_docs(),
            Self::TestLibs => test_libs(),
            Self::VerifyMigrations => verify_migrations(),
        }
    }
}

/// Run CI checks (lint, build, test, migrations)
fn ci() -> Result<()> {
    lint()?;
    deny()?;
    machete()?;
    build()?;
    test()?;
    verify_migrations()?;
    Ok(())
}

/// Verify the persistence migrations
///
/// ## What This Command Does
///
/// 1. Applies every migration to an in-memory `SQLite` database
/// 2. Introspects the resulting schema (tables, columns, types, constraints)
/// 3. Compares it with the schema the persistence layer's queries rely on
/// 4. Reverts every migration and checks that no table is left behind
///
/// ## Usage
///
/// ```bash
/// cargo xtask verify-migrations
/// ```
fn verify_migrations() -> Result<()> {
    use diesel::Connection;
    use diesel_migrations::MigrationHarness;

    tracing::info!("Starting migration verification");

    let mut conn = SqliteConnection::establish(":memory:")
        .wrap_err("Failed to create SQLite in-memory database")?;

    diesel::sql_query("PRAGMA foreign_keys = ON")
        .execute(&mut conn)
        .wrap_err("Failed to enable foreign keys on SQLite")?;

    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to apply migrations: {}", e))?;
    tracing::info!("Migrations applied successfully");

    tracing::info!("Introspecting schema");
    let actual = introspect_sqlite_schema(&mut conn)?;

    tracing::info!("Comparing with expected schema");
    compare_schemas(&expected_schema(), &actual)?;

    tracing::info!("Reverting migrations");
    conn.revert_all_migrations(MIGRATIONS)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to revert migrations: {}", e))?;

    let leftover = introspect_sqlite_schema(&mut conn)?;
    if !leftover.tables.is_empty() {
        return Err(color_eyre::eyre::eyre!(
            "❌ Migration verification FAILED: tables left after revert: {:?}",
            leftover.tables.keys().collect::<Vec<_>>()
        ));
    }

    tracing::info!("✓ Migration verification passed");
    Ok(())
}

/// Normalized schema representation
#[derive(Debug, Clone, PartialEq, Eq)]
struct Schema {
    tables: BTreeMap<String, Table>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Table {
    columns: BTreeMap<String, Column>,
    primary_keys: BTreeSet<String>,
    foreign_keys: BTreeSet<ForeignKey>,
    unique_constraints: BTreeSet<UniqueConstraint>,
    indexes: BTreeSet<Index>,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct Column {
    name: String,
    normalized_type: String,
    nullable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct ForeignKey {
    from_column: String,
    to_table: String,
    to_column: String,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct UniqueConstraint {
    columns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct Index {
    name: String,
    columns: Vec<String>,
}

/// Introspect `SQLite` schema
#[allow(clippy::too_many_lines)]
fn introspect_sqlite_schema(conn: &mut SqliteConnection) -> Result<Schema> {
    use diesel::RunQueryDsl;

    #[derive(QueryableByName)]
    struct TableName {
        #[diesel(sql_type = Text)]
        name: String,
    }

    #[derive(QueryableByName)]
    struct ColumnInfo {
        #[diesel(sql_type = Integer)]
        #[allow(dead_code)]
        cid: i32,
        #[diesel(sql_type = Text)]
        name: String,
        #[diesel(sql_type = Text)]
        r#type: String,
        #[diesel(sql_type = Integer)]
        notnull: i32,
        #[diesel(sql_type = Integer)]
        pk: i32,
    }

    #[derive(QueryableByName)]
    struct ForeignKeyInfo {
        #[diesel(sql_type = Text)]
        table: String,
        #[diesel(sql_type = Text)]
        from: String,
        #[diesel(sql_type = Text)]
        to: String,
    }

    #[derive(QueryableByName)]
    struct IndexInfo {
        #[diesel(sql_type = Text)]
        name: String,
        #[diesel(sql_type = Integer)]
        #[allow(dead_code)]
        unique: i32,
        #[diesel(sql_type = Text)]
        origin: String,
    }

    #[derive(QueryableByName)]
    struct IndexColumnInfo {
        #[diesel(sql_type = Text)]
        name: String,
    }

    let mut schema = Schema {
        tables: BTreeMap::new(),
    };

    // Get all tables
    let tables: Vec<TableName> = diesel::sql_query(
        "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' AND name != '__diesel_schema_migrations' ORDER BY name"
    )
    .load(conn)
    .wrap_err("Failed to query SQLite tables")?;

    for table in tables {
        let mut table_info = Table {
            columns: BTreeMap::new(),
            primary_keys: BTreeSet::new(),
            foreign_keys: BTreeSet::new(),
            unique_constraints: BTreeSet::new(),
            indexes: BTreeSet::new(),
        };

        // Get columns
        let columns: Vec<ColumnInfo> =
            diesel::sql_query(format!("PRAGMA table_info({})", table.name))
                .load(conn)
                .wrap_err(format!("Failed to get columns for table {}", table.name))?;

        for col in columns {
            let normalized_type = normalize_sqlite_type(&col.r#type);
            table_info.columns.insert(
                col.name.clone(),
                Column {
                    name: col.name.clone(),
                    normalized_type,
                    nullable: col.notnull == 0,
                },
            );

            if col.pk > 0 {
                table_info.primary_keys.insert(col.name);
            }
        }

        // Get foreign keys
        let fks: Vec<ForeignKeyInfo> =
            diesel::sql_query(format!("PRAGMA foreign_key_list({})", table.name))
                .load(conn)
                .wrap_err(format!(
                    "Failed to get foreign keys for table {}",
                    table.name
                ))?;

        for fk in fks {
            table_info.foreign_keys.insert(ForeignKey {
                from_column: fk.from,
                to_table: fk.table,
                to_column: fk.to,
            });
        }

        // Get indexes and unique constraints
        let indexes: Vec<IndexInfo> =
            diesel::sql_query(format!("PRAGMA index_list({})", table.name))
                .load(conn)
                .wrap_err(format!("Failed to get indexes for table {}", table.name))?;

        for idx in indexes {
            let index_columns: Vec<IndexColumnInfo> =
                diesel::sql_query(format!("PRAGMA index_info({})", idx.name))
                    .load(conn)
                    .wrap_err(format!("Failed to get index columns for {}", idx.name))?;

            let column_names: Vec<String> = index_columns.into_iter().map(|c| c.name).collect();

            // If origin is 'u', it's a unique constraint (including sqlite_autoindex_*)
            if idx.origin == "u" {
                table_info.unique_constraints.insert(UniqueConstraint {
                    columns: column_names,
                });
            } else if !idx.name.starts_with("sqlite_autoindex_") {
                // Regular index (skip auto-generated indexes that aren't unique constraints)
                table_info.indexes.insert(Index {
                    name: idx.name,
                    columns: column_names,
                });
            }
        }

        schema.tables.insert(table.name, table_info);
    }

    Ok(schema)
}

/// Column layout as (name, normalized type, nullable)
type ColumnSpec<'a> = (&'a str, &'a str, bool);

fn table(
    columns: &[ColumnSpec<'_>],
    primary_keys: &[&str],
    foreign_keys: &[(&str, &str, &str)],
    unique_constraints: &[&[&str]],
    indexes: &[(&str, &[&str])],
) -> Table {
    Table {
        columns: columns
            .iter()
            .map(|(name, normalized_type, nullable)| {
                (
                    (*name).to_string(),
                    Column {
                        name: (*name).to_string(),
                        normalized_type: (*normalized_type).to_string(),
                        nullable: *nullable,
                    },
                )
            })
            .collect(),
        primary_keys: primary_keys.iter().map(|c| (*c).to_string()).collect(),
        foreign_keys: foreign_keys
            .iter()
            .map(|(from_column, to_table, to_column)| ForeignKey {
                from_column: (*from_column).to_string(),
                to_table: (*to_table).to_string(),
                to_column: (*to_column).to_string(),
            })
            .collect(),
        unique_constraints: unique_constraints
            .iter()
            .map(|columns| UniqueConstraint {
                columns: columns.iter().map(|c| (*c).to_string()).collect(),
            })
            .collect(),
        indexes: indexes
            .iter()
            .map(|(name, columns)| Index {
                name: (*name).to_string(),
                columns: columns.iter().map(|c| (*c).to_string()).collect(),
            })
            .collect(),
    }
}

/// The schema the persistence layer's `table!` definitions describe
fn expected_schema() -> Schema {
    let mut tables = BTreeMap::new();

    tables.insert(
        String::from("events"),
        table(
            &[
                ("event_id", "integer", true),
                ("title", "text", false),
                ("created_by", "text", false),
                ("enrollment_type", "text", false),
                ("capacity_limit", "integer", false),
                ("starts_at", "text", false),
                ("ends_at", "text", false),
                ("enrollment_deadline", "text", false),
                ("created_at", "text", false),
                ("next_enrollment_id", "integer", false),
                ("version", "integer", false),
            ],
            &["event_id"],
            &[],
            &[],
            &[],
        ),
    );

    tables.insert(
        String::from("enrollments"),
        table(
            &[
                ("event_id", "integer", false),
                ("enrollment_id", "integer", false),
                ("participant_id", "text", false),
                ("enrolled_at", "text", false),
                ("accepted", "integer", false),
                ("attended", "integer", false),
            ],
            &["event_id", "enrollment_id"],
            &[("event_id", "events", "event_id")],
            &[&["event_id", "participant_id"]],
            &[],
        ),
    );

    tables.insert(
        String::from("audit_events"),
        table(
            &[
                ("audit_id", "integer", true),
                ("event_id", "integer", false),
                ("actor_id", "text", false),
                ("actor_role", "text", false),
                ("cause_json", "text", false),
                ("action_json", "text", false),
                ("before_snapshot_json", "text", false),
                ("after_snapshot_json", "text", false),
                ("recorded_at", "text", false),
            ],
            &["audit_id"],
            &[("event_id", "events", "event_id")],
            &[],
            &[("idx_audit_events_event", &["event_id", "audit_id"])],
        ),
    );

    Schema { tables }
}

/// Normalize `SQLite` type to common representation
fn normalize_sqlite_type(sqlite_type: &str) -> String {
    let normalized = sqlite_type.to_uppercase();
    if normalized.contains("INT") {
        "integer".to_string()
    } else if normalized.contains("TEXT")
        || normalized.contains("CHAR")
        || normalized.contains("CLOB")
    {
        "text".to_string()
    } else if normalized.contains("REAL")
        || normalized.contains("FLOA")
        || normalized.contains("DOUB")
    {
        "real".to_string()
    } else if normalized.contains("BLOB") {
        "blob".to_string()
    } else {
        "text".to_string() // Default for SQLite
    }
}

/// Compare schemas and fail on mismatch
fn compare_schemas(expected: &Schema, actual: &Schema) -> Result<()> {
    let expected_tables: BTreeSet<_> = expected.tables.keys().collect();
    let actual_tables: BTreeSet<_> = actual.tables.keys().collect();

    if expected_tables != actual_tables {
        let mut errors = Vec::new();

        for table in expected_tables.difference(&actual_tables) {
            errors.push(format!("  - Table '{table}' is expected but was not created"));
        }

        for table in actual_tables.difference(&expected_tables) {
            errors.push(format!("  - Table '{table}' was created but is not expected"));
        }

        return Err(color_eyre::eyre::eyre!(
            "❌ Migration verification FAILED: Table mismatch\n{}",
            errors.join("\n")
        ));
    }

    for table_name in expected_tables {
        let expected_table = &expected.tables[table_name];
        let actual_table = &actual.tables[table_name];

        if expected_table.columns != actual_table.columns {
            return Err(color_eyre::eyre::eyre!(
                "❌ Migration verification FAILED: Column mismatch in table '{}'\n  Expected: {:?}\n  Actual: {:?}",
                table_name,
                expected_table.columns.values().collect::<Vec<_>>(),
                actual_table.columns.values().collect::<Vec<_>>()
            ));
        }

        if expected_table.primary_keys != actual_table.primary_keys {
            return Err(color_eyre::eyre::eyre!(
                "❌ Migration verification FAILED: Primary key mismatch in table '{}'\n  Expected: {:?}\n  Actual: {:?}",
                table_name,
                expected_table.primary_keys,
                actual_table.primary_keys
            ));
        }

        if expected_table.foreign_keys != actual_table.foreign_keys {
            return Err(color_eyre::eyre::eyre!(
                "❌ Migration verification FAILED: Foreign key mismatch in table '{}'\n  Expected: {:?}\n  Actual: {:?}",
                table_name,
                expected_table.foreign_keys,
                actual_table.foreign_keys
            ));
        }

        if expected_table.unique_constraints != actual_table.unique_constraints {
            return Err(color_eyre::eyre::eyre!(
                "❌ Migration verification FAILED: Unique constraint mismatch in table '{}'\n  Expected: {:?}\n  Actual: {:?}",
                table_name,
                expected_table.unique_constraints,
                actual_table.unique_constraints
            ));
        }

        if expected_table.indexes != actual_table.indexes {
            return Err(color_eyre::eyre::eyre!(
                "❌ Migration verification FAILED: Index mismatch in table '{}'\n  Expected: {:?}\n  Actual: {:?}",
                table_name,
                expected_table.indexes,
                actual_table.indexes
            ));
        }
    }

    Ok(())
}

/// An extension trait for `duct::Expression` that logs the command being run
/// before running it.
trait ExpressionExt {
    /// Run the command and log the command being run
    fn run_with_trace(&self) -> io::Result<Output>;
}

impl ExpressionExt for duct::Expression {
    fn run_with_trace(&self) -> io::Result<Output> {
        tracing::info!("running command: {:?}", self);
        self.run().inspect_err(|_| {
            // The command that was run may have scrolled off the screen, so repeat it here
            tracing::error!("failed to run command: {:?}", self);
        })
    }
}
