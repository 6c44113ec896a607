//! MySQL storage implementation.
//!
//! Holds exactly one `MySqlConnection` for the whole run rather than a pool:
//! the benchmark measures one writer over one session. MariaDB and TiDB work
//! too, since they speak the MySQL wire protocol.

use async_trait::async_trait;
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection, MySqlDatabaseError};
use sqlx::{ConnectOptions, Connection, MySql, QueryBuilder};
use tracing::{debug, instrument};
use uuidbench_domain::EncodedIdentifier;

use crate::error::{StorageError, StorageResult};
use crate::traits::{validate_table_name, IdentifierStore, DEFAULT_TABLE_NAME};

/// MySQL error number for a duplicate key (ER_DUP_ENTRY).
const ER_DUP_ENTRY: u16 = 1062;

/// Rows per INSERT statement. MySQL caps a prepared statement at 65,535
/// placeholders and each row binds one.
pub(crate) const MAX_ROWS_PER_STATEMENT: usize = 65_535;

/// MySQL connection settings.
#[derive(Clone, PartialEq, Eq)]
pub struct MySqlConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub username: String,
    pub password: String,
    /// Benchmark table, dropped and recreated on every run.
    pub table: String,
}

// Custom Debug implementation to hide the password
impl std::fmt::Debug for MySqlConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MySqlConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("table", &self.table)
            .finish()
    }
}

impl Default for MySqlConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 3306,
            database: "testdb".to_string(),
            username: "testuser".to_string(),
            password: "testpassword".to_string(),
            table: DEFAULT_TABLE_NAME.to_string(),
        }
    }
}

impl MySqlConfig {
    /// `host:port/database`, safe to log.
    pub fn endpoint(&self) -> String {
        format!("{}:{}/{}", self.host, self.port, self.database)
    }

    pub fn connect_options(&self) -> MySqlConnectOptions {
        MySqlConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.username)
            .password(&self.password)
            .database(&self.database)
    }
}

/// MySQL implementation of IdentifierStore.
///
/// # Write units
///
/// A unit is a multi-row `INSERT INTO t (id) VALUES (?), (?), ...` with one
/// bound `BINARY(16)` parameter per row. A unit that fits in one statement
/// runs under autocommit; a larger one is split into statements of at most
/// `MAX_ROWS_PER_STATEMENT` rows inside a single transaction. Either way a
/// unit commits or fails as a whole, so units before a failing one stay
/// committed and the failing one leaves nothing behind.
///
/// # Connection lifetime
///
/// The connection is released by `close`, or by drop on any other path.
pub struct MySqlIdentifierStore {
    conn: MySqlConnection,
    table: String,
}

impl MySqlIdentifierStore {
    /// Opens a single connection with the given configuration.
    #[instrument(skip(config), fields(endpoint = %config.endpoint()))]
    pub async fn connect(config: &MySqlConfig) -> StorageResult<Self> {
        validate_table_name(&config.table)?;

        let conn = config
            .connect_options()
            .connect()
            .await
            .map_err(|e| StorageError::ConnectionError {
                message: e.to_string(),
            })?;

        Ok(Self {
            conn,
            table: config.table.clone(),
        })
    }

    /// Wraps an already-open connection.
    pub fn from_connection(conn: MySqlConnection, table: &str) -> StorageResult<Self> {
        validate_table_name(table)?;
        Ok(Self {
            conn,
            table: table.to_string(),
        })
    }

    pub fn table_name(&self) -> &str {
        &self.table
    }

    /// Returns the connection for testing or advanced usage.
    pub fn connection(&mut self) -> &mut MySqlConnection {
        &mut self.conn
    }

    /// Closes the connection, flushing the protocol-level goodbye.
    pub async fn close(self) -> StorageResult<()> {
        self.conn
            .close()
            .await
            .map_err(|e| StorageError::ConnectionError {
                message: format!("Failed to close connection: {}", e),
            })
    }
}

fn is_duplicate_entry(err: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(db_err) = err {
        db_err
            .try_downcast_ref::<MySqlDatabaseError>()
            .is_some_and(|mysql_err| mysql_err.number() == ER_DUP_ENTRY)
    } else {
        false
    }
}

async fn insert_statement(
    conn: &mut MySqlConnection,
    table: &str,
    rows: &[EncodedIdentifier],
) -> StorageResult<()> {
    let mut builder: QueryBuilder<MySql> =
        QueryBuilder::new(format!("INSERT INTO {} (id) ", table));
    builder.push_values(rows.iter(), |mut row_builder, row| {
        row_builder.push_bind(&row[..]);
    });

    builder.build().execute(conn).await.map_err(|e| {
        if is_duplicate_entry(&e) {
            StorageError::DuplicateIdentifier {
                message: e.to_string(),
            }
        } else {
            StorageError::QueryError {
                message: format!("Failed to insert {} rows: {}", rows.len(), e),
            }
        }
    })?;

    Ok(())
}

#[async_trait]
impl IdentifierStore for MySqlIdentifierStore {
    #[instrument(skip(self), fields(table = %self.table))]
    async fn reset_table(&mut self) -> StorageResult<()> {
        debug!("Recreating benchmark table");

        sqlx::query(&format!("DROP TABLE IF EXISTS {}", self.table))
            .execute(&mut self.conn)
            .await
            .map_err(|e| StorageError::SchemaError {
                message: format!("Failed to drop table {}: {}", self.table, e),
            })?;

        sqlx::query(&format!(
            "CREATE TABLE {} (id BINARY(16) PRIMARY KEY)",
            self.table
        ))
        .execute(&mut self.conn)
        .await
        .map_err(|e| StorageError::SchemaError {
            message: format!("Failed to create table {}: {}", self.table, e),
        })?;

        Ok(())
    }

    async fn insert_unit(&mut self, rows: &[EncodedIdentifier]) -> StorageResult<()> {
        if rows.is_empty() {
            return Ok(());
        }

        if rows.len() <= MAX_ROWS_PER_STATEMENT {
            return insert_statement(&mut self.conn, &self.table, rows).await;
        }

        let mut tx = self
            .conn
            .begin()
            .await
            .map_err(|e| StorageError::QueryError {
                message: format!("Failed to begin transaction: {}", e),
            })?;

        for chunk in rows.chunks(MAX_ROWS_PER_STATEMENT) {
            insert_statement(&mut *tx, &self.table, chunk).await?;
        }

        tx.commit().await.map_err(|e| StorageError::QueryError {
            message: format!("Failed to commit {} rows: {}", rows.len(), e),
        })?;

        Ok(())
    }

    #[instrument(skip(self), fields(table = %self.table))]
    async fn count_rows(&mut self) -> StorageResult<u64> {
        let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", self.table))
            .fetch_one(&mut self.conn)
            .await
            .map_err(|e| StorageError::ReadError {
                message: format!("Failed to count rows in {}: {}", self.table, e),
            })?;

        u64::try_from(count).map_err(|_| StorageError::ReadError {
            message: format!("negative row count: {}", count),
        })
    }
}

impl std::fmt::Debug for MySqlIdentifierStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MySqlIdentifierStore")
            .field("conn", &"MySqlConnection")
            .field("table", &self.table)
            .finish()
    }
}
