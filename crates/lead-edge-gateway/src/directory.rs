//! Supplier directory adapters
//!
//! Deployments store suppliers either in a flat `suppliers` table or as
//! `users` rows joined to `supplier_profiles`. Handlers talk to the
//! [`SupplierDirectory`] trait; the adapter is chosen once from configuration.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;

use crate::services::{Database, Row, ServiceError, Statement};

/// Columns returned for each supplier in a listing, in this order.
pub const SUPPLIER_COLUMNS: [&str; 8] = [
    "id",
    "company_name",
    "contact_name",
    "email",
    "phone",
    "status",
    "created_at",
    "approved_at",
];

/// Read-only access to supplier and buyer accounts.
#[async_trait]
pub trait SupplierDirectory: Send + Sync {
    fn schema(&self) -> SupplierSchema;

    /// Count suppliers, optionally only those with an exact `status`.
    async fn count_suppliers(&self, db: &Database, status: Option<&str>) -> Result<i64, ServiceError>;

    /// Suppliers ordered by id descending, optionally filtered by exact `status`.
    async fn list_suppliers(
        &self,
        db: &Database,
        status: Option<&str>,
        limit: u32,
    ) -> Result<Vec<Row>, ServiceError>;

    async fn count_buyers(&self, db: &Database) -> Result<i64, ServiceError>;
}

/// Supported table layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupplierSchema {
    /// One `suppliers` table and one `buyers` table
    Flat,
    /// `users` with a `role` column, suppliers joined to `supplier_profiles`
    Normalized,
}

impl SupplierSchema {
    /// Build the adapter for this layout.
    pub fn directory(self) -> Arc<dyn SupplierDirectory> {
        match self {
            SupplierSchema::Flat => Arc::new(FlatDirectory),
            SupplierSchema::Normalized => Arc::new(NormalizedDirectory),
        }
    }
}

impl fmt::Display for SupplierSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SupplierSchema::Flat => write!(f, "flat"),
            SupplierSchema::Normalized => write!(f, "normalized"),
        }
    }
}

impl FromStr for SupplierSchema {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "flat" => Ok(SupplierSchema::Flat),
            "normalized" => Ok(SupplierSchema::Normalized),
            _ => Err(format!("Unknown supplier schema: {}", s)),
        }
    }
}

/// Run a `SELECT COUNT(*) AS c ...` statement; no row counts as zero.
pub async fn count(statement: Statement<'_>) -> Result<i64, ServiceError> {
    Ok(statement
        .first()
        .await?
        .and_then(|row| row.get_i64("c"))
        .unwrap_or(0))
}

fn bind_status<'a>(statement: Statement<'a>, status: Option<&str>) -> Statement<'a> {
    match status {
        Some(status) => statement.bind(status),
        None => statement,
    }
}

/// `suppliers(id, company_name, contact_name, email, phone, status, created_at, approved_at)`
/// and `buyers(...)`.
#[derive(Debug, Default)]
pub struct FlatDirectory;

#[async_trait]
impl SupplierDirectory for FlatDirectory {
    fn schema(&self) -> SupplierSchema {
        SupplierSchema::Flat
    }

    async fn count_suppliers(&self, db: &Database, status: Option<&str>) -> Result<i64, ServiceError> {
        let sql = match status {
            Some(_) => "SELECT COUNT(*) AS c FROM suppliers WHERE status = ?",
            None => "SELECT COUNT(*) AS c FROM suppliers",
        };
        count(bind_status(db.prepare(sql), status)).await
    }

    async fn list_suppliers(
        &self,
        db: &Database,
        status: Option<&str>,
        limit: u32,
    ) -> Result<Vec<Row>, ServiceError> {
        let filter = if status.is_some() { " WHERE status = ?" } else { "" };
        let sql = format!(
            "SELECT {} FROM suppliers{} ORDER BY id DESC LIMIT ?",
            SUPPLIER_COLUMNS.join(", "),
            filter
        );
        bind_status(db.prepare(sql), status).bind(limit).all().await
    }

    async fn count_buyers(&self, db: &Database) -> Result<i64, ServiceError> {
        count(db.prepare("SELECT COUNT(*) AS c FROM buyers")).await
    }
}

/// `users(id, name, email, phone, role, created_at)` joined to
/// `supplier_profiles(user_id, company_name, status, approved_at)`.
#[derive(Debug, Default)]
pub struct NormalizedDirectory;

const NORMALIZED_SUPPLIERS: &str = "FROM users u JOIN supplier_profiles sp ON sp.user_id = u.id \
     WHERE u.role = 'supplier'";

#[async_trait]
impl SupplierDirectory for NormalizedDirectory {
    fn schema(&self) -> SupplierSchema {
        SupplierSchema::Normalized
    }

    async fn count_suppliers(&self, db: &Database, status: Option<&str>) -> Result<i64, ServiceError> {
        let filter = if status.is_some() { " AND sp.status = ?" } else { "" };
        let sql = format!("SELECT COUNT(*) AS c {}{}", NORMALIZED_SUPPLIERS, filter);
        count(bind_status(db.prepare(sql), status)).await
    }

    async fn list_suppliers(
        &self,
        db: &Database,
        status: Option<&str>,
        limit: u32,
    ) -> Result<Vec<Row>, ServiceError> {
        let filter = if status.is_some() { " AND sp.status = ?" } else { "" };
        let sql = format!(
            "SELECT u.id AS id, sp.company_name AS company_name, u.name AS contact_name, \
             u.email AS email, u.phone AS phone, sp.status AS status, \
             u.created_at AS created_at, sp.approved_at AS approved_at \
             {}{} ORDER BY u.id DESC LIMIT ?",
            NORMALIZED_SUPPLIERS, filter
        );
        bind_status(db.prepare(sql), status).bind(limit).all().await
    }

    async fn count_buyers(&self, db: &Database) -> Result<i64, ServiceError> {
        count(db.prepare("SELECT COUNT(*) AS c FROM users WHERE role = 'buyer'")).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    async fn flat_db() -> Database {
        let db = Database::open(":memory:").unwrap();
        db.execute_batch(
            "CREATE TABLE suppliers (id INTEGER PRIMARY KEY, company_name TEXT, contact_name TEXT,
                email TEXT, phone TEXT, status TEXT, created_at TEXT, approved_at TEXT);
             CREATE TABLE buyers (id INTEGER PRIMARY KEY, email TEXT);
             INSERT INTO suppliers (id, company_name, status) VALUES
                (1, 'Acme', 'pending'), (2, 'Globex', 'active'), (3, 'Initech', 'pending');
             INSERT INTO buyers (id, email) VALUES (1, 'b@example.com');",
        )
        .await
        .unwrap();
        db
    }

    async fn normalized_db() -> Database {
        let db = Database::open(":memory:").unwrap();
        db.execute_batch(
            "CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT, email TEXT, phone TEXT,
                role TEXT, created_at TEXT);
             CREATE TABLE supplier_profiles (id INTEGER PRIMARY KEY, user_id INTEGER,
                company_name TEXT, status TEXT, approved_at TEXT);
             INSERT INTO users (id, name, email, role) VALUES
                (1, 'Ann', 'ann@acme.test', 'supplier'),
                (2, 'Bob', 'bob@buyer.test', 'buyer'),
                (3, 'Cid', 'cid@globex.test', 'supplier'),
                (4, 'Dee', 'dee@buyer.test', 'buyer');
             INSERT INTO supplier_profiles (user_id, company_name, status, approved_at) VALUES
                (1, 'Acme', 'pending', NULL),
                (3, 'Globex', 'active', '2024-01-02');",
        )
        .await
        .unwrap();
        db
    }

    #[tokio::test]
    async fn test_flat_counts() {
        let db = flat_db().await;
        let dir = SupplierSchema::Flat.directory();

        assert_eq!(dir.count_suppliers(&db, None).await.unwrap(), 3);
        assert_eq!(dir.count_suppliers(&db, Some("pending")).await.unwrap(), 2);
        assert_eq!(dir.count_suppliers(&db, Some("active")).await.unwrap(), 1);
        assert_eq!(dir.count_buyers(&db).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_flat_listing_order_filter_and_limit() {
        let db = flat_db().await;
        let dir = FlatDirectory;

        let ids: Vec<i64> = dir
            .list_suppliers(&db, None, 200)
            .await
            .unwrap()
            .iter()
            .filter_map(|r| r.get_i64("id"))
            .collect();
        assert_eq!(ids, vec![3, 2, 1]);

        let pending = dir.list_suppliers(&db, Some("pending"), 200).await.unwrap();
        assert_eq!(pending.len(), 2);
        assert!(pending.iter().all(|r| r.get("status") == Some(&json!("pending"))));

        let limited = dir.list_suppliers(&db, None, 1).await.unwrap();
        assert_eq!(limited.len(), 1);
        assert_eq!(limited[0].get_i64("id"), Some(3));
    }

    #[tokio::test]
    async fn test_normalized_adapter() {
        let db = normalized_db().await;
        let dir = SupplierSchema::Normalized.directory();
        assert_eq!(dir.schema(), SupplierSchema::Normalized);

        assert_eq!(dir.count_suppliers(&db, None).await.unwrap(), 2);
        assert_eq!(dir.count_suppliers(&db, Some("active")).await.unwrap(), 1);
        assert_eq!(dir.count_buyers(&db).await.unwrap(), 2);

        let rows = dir.list_suppliers(&db, None, 200).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("company_name"), Some(&json!("Globex")));
        assert_eq!(rows[0].get("contact_name"), Some(&json!("Cid")));
        let keys: Vec<String> = match rows[0].clone().into_json() {
            serde_json::Value::Object(map) => map.keys().cloned().collect(),
            _ => unreachable!(),
        };
        let mut expected: Vec<String> = SUPPLIER_COLUMNS.iter().map(|c| c.to_string()).collect();
        let mut actual = keys;
        expected.sort();
        actual.sort();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_schema_parse() {
        assert_eq!("FLAT".parse::<SupplierSchema>().unwrap(), SupplierSchema::Flat);
        assert_eq!(" normalized ".parse::<SupplierSchema>().unwrap(), SupplierSchema::Normalized);
        assert!("users".parse::<SupplierSchema>().is_err());
        assert_eq!(SupplierSchema::Normalized.to_string(), "normalized");
    }
}
