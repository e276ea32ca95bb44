use std::sync::{Arc, Mutex};

use rusqlite::{params, Connection};

use crate::models::{Category, Poem};

use super::{schema, StoreError};

/// Shared handle to the open database.
/// Clone is cheap - every clone points at the same connection.
///
/// Each operation takes the connection lock on tokio's blocking pool, so a
/// single statement is atomic but a sequence of calls is not.
#[derive(Clone)]
pub struct StoreHandle {
    conn: Arc<Mutex<Connection>>,
}

impl StoreHandle {
    pub(crate) fn new(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// True when both handles wrap the same connection.
    pub fn same_connection(&self, other: &StoreHandle) -> bool {
        Arc::ptr_eq(&self.conn, &other.conn)
    }

    async fn with_conn<T, F>(&self, op: &'static str, f: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> rusqlite::Result<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let guard = conn.lock().map_err(|_| StoreError::Poisoned)?;
            f(&guard).map_err(|source| StoreError::Sqlite { op, source })
        })
        .await
        .map_err(|e| StoreError::Task(e.to_string()))?
    }

    pub async fn count_poems(&self) -> Result<u64, StoreError> {
        self.with_conn("count poems", |conn| {
            conn.query_row("SELECT COUNT(*) FROM poems", [], |row| row.get::<_, i64>(0))
        })
        .await
        .map(|count| count.max(0) as u64)
    }

    /// Insert one poem as its own atomic statement. A duplicate id is a
    /// constraint violation, not an upsert.
    pub async fn insert_poem(&self, poem: Poem) -> Result<(), StoreError> {
        self.with_conn("insert poem", move |conn| {
            conn.execute(
                "INSERT INTO poems (id, title, body, author) VALUES (?1, ?2, ?3, ?4)",
                params![poem.id, poem.title, poem.body, poem.author],
            )
            .map(|_| ())
        })
        .await
    }

    /// Every poem in primary-key order.
    pub async fn load_poems(&self) -> Result<Vec<Poem>, StoreError> {
        self.with_conn("load poems", |conn| {
            let mut stmt =
                conn.prepare("SELECT id, title, body, author FROM poems ORDER BY id")?;
            let poems = stmt
                .query_map([], |row| {
                    Ok(Poem {
                        id: row.get(0)?,
                        title: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                        body: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                        author: row.get(3)?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(poems)
        })
        .await
    }

    pub async fn count_categories(&self) -> Result<u64, StoreError> {
        self.with_conn("count categories", |conn| {
            conn.query_row("SELECT COUNT(*) FROM categories", [], |row| {
                row.get::<_, i64>(0)
            })
        })
        .await
        .map(|count| count.max(0) as u64)
    }

    pub async fn load_categories(&self) -> Result<Vec<Category>, StoreError> {
        self.with_conn("load categories", |conn| {
            let mut stmt =
                conn.prepare("SELECT id, name, description FROM categories ORDER BY id")?;
            let categories = stmt
                .query_map([], |row| {
                    Ok(Category {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        description: row.get(2)?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(categories)
        })
        .await
    }

    pub async fn table_names(&self) -> Result<Vec<String>, StoreError> {
        self.with_conn("list tables", |conn| schema::table_names(conn))
            .await
    }

    /// Re-run the schema DDL against the open connection.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        self.with_conn("create schema", |conn| schema::initialize(conn))
            .await
    }
}
