//! Database lifecycle helpers for the embedded PostgreSQL cluster.
//!
//! Database creation goes through `postgres` because `DROP DATABASE` cannot
//! run inside the transaction Diesel would open. Schema setup reuses the
//! crate's embedded migrations so tests never drift from production DDL.

use std::path::PathBuf;

use pg_embedded_setup_unpriv::TestCluster;
use postboard::outbound::persistence::run_pending_migrations;
use postgres::{Client, NoTls};

use super::format_postgres_error;

const ADMIN_DATABASE: &str = "postgres";

/// Drop and recreate `name` on `cluster`.
pub fn reset_database(cluster: &TestCluster, name: &str) -> Result<(), String> {
    let admin_url = cluster.connection().database_url(ADMIN_DATABASE);
    let mut client =
        Client::connect(&admin_url, NoTls).map_err(|err| format_postgres_error(&err))?;
    client
        .batch_execute(&format!("DROP DATABASE IF EXISTS \"{name}\" WITH (FORCE)"))
        .map_err(|err| format_postgres_error(&err))?;
    client
        .batch_execute(&format!("CREATE DATABASE \"{name}\""))
        .map_err(|err| format_postgres_error(&err))?;
    Ok(())
}

/// Apply every embedded migration to the database at `url`.
pub fn migrate_schema(url: &str) -> Result<(), String> {
    run_pending_migrations(url)
        .map(|_| ())
        .map_err(|err| err.to_string())
}

/// Execute `tests/fixtures/sql/<file>` against the database at `url`.
pub fn load_sql_fixture(url: &str, file: &str) -> Result<(), String> {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("sql")
        .join(file);
    let script = std::fs::read_to_string(&path)
        .map_err(|err| format!("read {}: {err}", path.display()))?;
    let mut client = Client::connect(url, NoTls).map_err(|err| format_postgres_error(&err))?;
    client
        .batch_execute(&script)
        .map_err(|err| format!("{file}: {}", format_postgres_error(&err)))
}
