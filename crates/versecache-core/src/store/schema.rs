use rusqlite::Connection;

/// Schema DDL run on open. Every statement is `IF NOT EXISTS`, so running it
/// against an already initialized database is a no-op.
pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS poems (
    id INTEGER PRIMARY KEY NOT NULL,
    title TEXT,
    body TEXT,
    author TEXT
);

CREATE TABLE IF NOT EXISTS categories (
    id INTEGER PRIMARY KEY NOT NULL,
    name TEXT,
    description TEXT
);
";

pub fn initialize(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA)
}

/// User tables present in the database, sorted by name.
pub fn table_names(conn: &Connection) -> rusqlite::Result<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT name FROM sqlite_master
         WHERE type = 'table' AND name NOT LIKE 'sqlite_%'
         ORDER BY name",
    )?;
    let names = stmt
        .query_map([], |row| row.get(0))?
        .collect::<Result<Vec<String>, _>>()?;
    Ok(names)
}
