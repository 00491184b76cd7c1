//! Database actor service
//!
//! A single SQLite connection owned by a blocking worker task. Callers build a
//! [`Statement`] with positional parameters and await one of `first`, `all`
//! or `run`. Values are always bound, never spliced into the SQL text.

use std::path::Path;

use rusqlite::types::{Value as SqlValue, ValueRef};
use serde::Serialize;
use serde_json::{Map, Value};
use tokio::sync::{mpsc, oneshot};

use super::ServiceError;

const COMMAND_BUFFER: usize = 64;

/// A result row keyed by column name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Row(Map<String, Value>);

impl Row {
    /// Get a value by column name
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.0.get(column)
    }

    /// Get an integer column
    pub fn get_i64(&self, column: &str) -> Option<i64> {
        self.0.get(column).and_then(Value::as_i64)
    }

    pub fn into_json(self) -> Value {
        Value::Object(self.0)
    }
}

/// Commands sent to the database actor
enum DatabaseCommand {
    /// Run a query and return every row
    Query {
        sql: String,
        params: Vec<Value>,
        reply: oneshot::Sender<Result<Vec<Row>, ServiceError>>,
    },

    /// Run a statement and return the number of affected rows
    Execute {
        sql: String,
        params: Vec<Value>,
        reply: oneshot::Sender<Result<u64, ServiceError>>,
    },

    /// Run several parameterless statements
    Batch {
        sql: String,
        reply: oneshot::Sender<Result<(), ServiceError>>,
    },
}

/// Database handle - cheap to clone, sends commands to the actor
#[derive(Clone)]
pub struct Database {
    sender: mpsc::Sender<DatabaseCommand>,
}

impl Database {
    /// Open the database at `path` and start the actor.
    ///
    /// The parent directory is created if needed. `:memory:` opens a private
    /// in-memory database that lives as long as any handle does. Must be
    /// called from within a Tokio runtime.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ServiceError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| ServiceError::ConnectionFailed(format!("{}: {}", parent.display(), e)))?;
        }

        let conn = rusqlite::Connection::open(path)
            .map_err(|e| ServiceError::ConnectionFailed(e.to_string()))?;

        let (sender, rx) = mpsc::channel(COMMAND_BUFFER);
        let label = path.display().to_string();
        tokio::task::spawn_blocking(move || database_actor(conn, label, rx));

        Ok(Self { sender })
    }

    /// Start building a statement.
    ///
    /// # Example
    /// ```ignore
    /// let row = db.prepare("SELECT COUNT(*) AS c FROM suppliers WHERE status = ?")
    ///     .bind("pending")
    ///     .first()
    ///     .await?;
    /// ```
    pub fn prepare(&self, sql: impl Into<String>) -> Statement<'_> {
        Statement {
            db: self,
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    /// Run a batch of statements without parameters (schema setup, fixtures).
    pub async fn execute_batch(&self, sql: impl Into<String>) -> Result<(), ServiceError> {
        let (reply, rx) = oneshot::channel();
        self.send(DatabaseCommand::Batch { sql: sql.into(), reply }).await?;
        rx.await.map_err(|_| no_reply())?
    }

    /// Check if the actor is still running
    pub fn is_alive(&self) -> bool {
        !self.sender.is_closed()
    }

    async fn send(&self, cmd: DatabaseCommand) -> Result<(), ServiceError> {
        self.sender
            .send(cmd)
            .await
            .map_err(|_| ServiceError::Unavailable("database actor closed".into()))
    }
}

#[cfg(test)]
impl Database {
    /// A handle whose actor has already stopped.
    pub(crate) fn closed() -> Self {
        let (sender, _) = mpsc::channel(1);
        Self { sender }
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("alive", &self.is_alive())
            .finish()
    }
}

/// A SQL statement with positional parameters bound in order.
#[must_use]
pub struct Statement<'a> {
    db: &'a Database,
    sql: String,
    params: Vec<Value>,
}

impl Statement<'_> {
    /// Bind the next positional parameter.
    pub fn bind(mut self, value: impl Into<Value>) -> Self {
        self.params.push(value.into());
        self
    }

    /// First row of the result, if any.
    pub async fn first(self) -> Result<Option<Row>, ServiceError> {
        Ok(self.all().await?.into_iter().next())
    }

    /// Every row of the result.
    pub async fn all(self) -> Result<Vec<Row>, ServiceError> {
        let (reply, rx) = oneshot::channel();
        self.db
            .send(DatabaseCommand::Query {
                sql: self.sql,
                params: self.params,
                reply,
            })
            .await?;
        rx.await.map_err(|_| no_reply())?
    }

    /// Execute for side effects and return the affected row count.
    pub async fn run(self) -> Result<u64, ServiceError> {
        let (reply, rx) = oneshot::channel();
        self.db
            .send(DatabaseCommand::Execute {
                sql: self.sql,
                params: self.params,
                reply,
            })
            .await?;
        rx.await.map_err(|_| no_reply())?
    }
}

fn no_reply() -> ServiceError {
    ServiceError::Unavailable("no response from database actor".into())
}

/// The actor loop - owns the connection and processes commands until every
/// handle has been dropped.
fn database_actor(conn: rusqlite::Connection, label: String, mut rx: mpsc::Receiver<DatabaseCommand>) {
    tracing::info!(database = %label, "Database actor started");

    while let Some(cmd) = rx.blocking_recv() {
        match cmd {
            DatabaseCommand::Query { sql, params, reply } => {
                let _ = reply.send(query(&conn, &sql, &params));
            }
            DatabaseCommand::Execute { sql, params, reply } => {
                let _ = reply.send(execute(&conn, &sql, &params));
            }
            DatabaseCommand::Batch { sql, reply } => {
                let _ = reply.send(conn.execute_batch(&sql).map_err(classify));
            }
        }
    }

    tracing::info!(database = %label, "Database actor stopped");
}

fn query(conn: &rusqlite::Connection, sql: &str, params: &[Value]) -> Result<Vec<Row>, ServiceError> {
    let mut stmt = conn.prepare(sql).map_err(classify)?;
    let columns: Vec<String> = stmt.column_names().iter().map(|s| s.to_string()).collect();

    let bound: Vec<SqlValue> = params.iter().map(json_to_sql).collect();
    let mut rows = stmt
        .query(rusqlite::params_from_iter(bound.iter()))
        .map_err(classify)?;

    let mut result = Vec::new();
    while let Some(row) = rows.next().map_err(classify)? {
        let mut values = Map::new();
        for (i, column) in columns.iter().enumerate() {
            values.insert(column.clone(), sql_to_json(row.get_ref(i).map_err(classify)?));
        }
        result.push(Row(values));
    }

    Ok(result)
}

fn execute(conn: &rusqlite::Connection, sql: &str, params: &[Value]) -> Result<u64, ServiceError> {
    let bound: Vec<SqlValue> = params.iter().map(json_to_sql).collect();
    let affected = conn
        .execute(sql, rusqlite::params_from_iter(bound.iter()))
        .map_err(classify)?;
    Ok(affected as u64)
}

/// Map a driver error, singling out missing tables so callers can treat an
/// optional table as empty.
fn classify(err: rusqlite::Error) -> ServiceError {
    if let rusqlite::Error::SqliteFailure(_, Some(message)) = &err {
        if let Some(table) = message.strip_prefix("no such table: ") {
            return ServiceError::NoSuchTable(table.to_string());
        }
    }
    ServiceError::QueryFailed(err.to_string())
}

fn json_to_sql(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Bool(b) => SqlValue::Integer(i64::from(*b)),
        Value::Number(n) => match n.as_i64() {
            Some(i) => SqlValue::Integer(i),
            None => n.as_f64().map(SqlValue::Real).unwrap_or(SqlValue::Null),
        },
        Value::String(s) => SqlValue::Text(s.clone()),
        other => SqlValue::Text(other.to_string()),
    }
}

fn sql_to_json(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::from(i),
        ValueRef::Real(f) => serde_json::Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null),
        ValueRef::Text(s) => Value::String(String::from_utf8_lossy(s).into_owned()),
        ValueRef::Blob(b) => Value::String(format!(
            "0x{}",
            b.iter().map(|byte| format!("{:02x}", byte)).collect::<String>()
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_statement_round_trip() {
        let db = Database::open(":memory:").unwrap();
        db.execute_batch("CREATE TABLE test (id INTEGER PRIMARY KEY, name TEXT, score REAL)")
            .await
            .unwrap();

        let affected = db
            .prepare("INSERT INTO test (id, name, score) VALUES (?, ?, ?)")
            .bind(1)
            .bind("Alice")
            .bind(2.5)
            .run()
            .await
            .unwrap();
        assert_eq!(affected, 1);

        let rows = db.prepare("SELECT * FROM test").all().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].clone().into_json(), json!({"id": 1, "name": "Alice", "score": 2.5}));
    }

    #[tokio::test]
    async fn test_first_returns_none_for_empty_result() {
        let db = Database::open(":memory:").unwrap();
        let row = db.prepare("SELECT 1 AS ok WHERE 0").first().await.unwrap();
        assert!(row.is_none());

        let row = db.prepare("SELECT 1 AS ok").first().await.unwrap().unwrap();
        assert_eq!(row.get_i64("ok"), Some(1));
    }

    #[tokio::test]
    async fn test_parameters_are_bound_not_interpolated() {
        let db = Database::open(":memory:").unwrap();
        db.execute_batch("CREATE TABLE t (name TEXT)").await.unwrap();

        let hostile = "x'); DROP TABLE t; --";
        db.prepare("INSERT INTO t (name) VALUES (?)").bind(hostile).run().await.unwrap();

        let row = db.prepare("SELECT name FROM t").first().await.unwrap().unwrap();
        assert_eq!(row.get("name"), Some(&json!(hostile)));
    }

    #[tokio::test]
    async fn test_missing_table_is_classified() {
        let db = Database::open(":memory:").unwrap();
        let err = db.prepare("SELECT COUNT(*) AS c FROM early_access").first().await.unwrap_err();
        match err {
            ServiceError::NoSuchTable(table) => assert_eq!(table, "early_access"),
            other => panic!("unexpected error: {:?}", other),
        }

        let err = db.prepare("SELEKT nonsense").all().await.unwrap_err();
        assert!(matches!(err, ServiceError::QueryFailed(_)));
    }

    #[tokio::test]
    async fn test_closed_actor_is_unavailable() {
        let db = Database::closed();
        assert!(!db.is_alive());
        let err = db.prepare("SELECT 1 AS ok").first().await.unwrap_err();
        assert!(matches!(err, ServiceError::Unavailable(_)));
    }
}
