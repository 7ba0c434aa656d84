// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! `SQLite` connection setup for the roster database.
//!
//! Every connection gets foreign keys switched on before the schema is
//! migrated; staff cascades and shift type protection rely on them.

use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Integer};
use diesel::{Connection, RunQueryDsl, SqliteConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info};

use crate::error::PersistenceError;

/// Embedded roster schema migrations.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// How long a writer waits for another writer's lock before failing.
const BUSY_TIMEOUT_MS: u32 = 5_000;

/// Where the roster database lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageMode {
    /// Shared-cache in-memory database; gone when the last connection closes.
    Memory,
    /// File on disk, journaled in WAL mode so analytics reads never block
    /// assignment writes.
    File,
}

#[derive(QueryableByName)]
struct ForeignKeysPragma {
    #[diesel(sql_type = Integer)]
    foreign_keys: i32,
}

/// Returns the row ID of the most recent insert on this connection.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn get_last_insert_rowid(conn: &mut SqliteConnection) -> Result<i64, PersistenceError> {
    Ok(diesel::select(sql::<BigInt>("last_insert_rowid()")).get_result(conn)?)
}

/// Fails unless `PRAGMA foreign_keys` reports enforcement.
///
/// # Errors
///
/// Returns `PersistenceError::ForeignKeyEnforcementNotEnabled` when it is off.
pub fn verify_foreign_key_enforcement(conn: &mut SqliteConnection) -> Result<(), PersistenceError> {
    let pragma: ForeignKeysPragma =
        diesel::sql_query("PRAGMA foreign_keys").get_result(conn)?;
    if pragma.foreign_keys == 0 {
        return Err(PersistenceError::ForeignKeyEnforcementNotEnabled);
    }
    debug!("Foreign key enforcement confirmed");
    Ok(())
}

fn pragma(conn: &mut SqliteConnection, statement: &str) -> Result<(), PersistenceError> {
    // Diesel has no PRAGMA DSL.
    diesel::sql_query(statement)
        .execute(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("{statement}: {e}")))?;
    Ok(())
}

/// Opens the roster database at `database_url`, ready for use.
///
/// Applies the connection pragmas for `mode`, runs pending migrations and
/// confirms foreign key enforcement.
///
/// # Errors
///
/// Returns an error if the connection, a pragma, a migration or the foreign
/// key check fails.
pub fn open(database_url: &str, mode: StorageMode) -> Result<SqliteConnection, PersistenceError> {
    info!(database_url, ?mode, "Opening roster database");

    let mut conn: SqliteConnection = SqliteConnection::establish(database_url)
        .map_err(|e| PersistenceError::DatabaseConnectionFailed(e.to_string()))?;

    pragma(&mut conn, "PRAGMA foreign_keys = ON")?;
    pragma(&mut conn, &format!("PRAGMA busy_timeout = {BUSY_TIMEOUT_MS}"))?;
    if mode == StorageMode::File {
        pragma(&mut conn, "PRAGMA journal_mode = WAL")?;
    }

    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| PersistenceError::MigrationFailed(e.to_string()))?;
    info!(applied = applied.len(), "Roster schema up to date");

    verify_foreign_key_enforcement(&mut conn)?;
    Ok(conn)
}
