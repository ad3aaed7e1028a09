use rusqlite::Connection;

use crate::error::StorageError;

pub const SCHEMA_VERSION: i32 = 1;

pub fn init_schema(conn: &Connection) -> Result<(), StorageError> {
    conn.execute_batch(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        PRAGMA busy_timeout = 5000;
    ",
    )?;
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}

const SCHEMA_SQL: &str = "
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY,
    applied_at INTEGER NOT NULL
);
INSERT OR IGNORE INTO schema_version (version, applied_at) VALUES (1, unixepoch());

CREATE TABLE IF NOT EXISTS decorations (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    view TEXT NOT NULL,
    decoration_id BLOB NOT NULL CHECK (length(decoration_id) = 16),
    image_ref TEXT NOT NULL,
    position_x REAL NOT NULL,
    position_y REAL NOT NULL,
    width REAL NOT NULL CHECK (width > 0),
    height REAL NOT NULL CHECK (height > 0),
    rotation REAL NOT NULL DEFAULT 0,
    z_index INTEGER NOT NULL DEFAULT 0,
    anchor_date TEXT,
    day_offset_x REAL,
    day_offset_y REAL,
    UNIQUE (view, decoration_id)
);
CREATE INDEX IF NOT EXISTS idx_decorations_view ON decorations (view, seq);

CREATE TABLE IF NOT EXISTS layouts (
    layout_id BLOB PRIMARY KEY CHECK (length(layout_id) = 16),
    name TEXT NOT NULL,
    resolution_width INTEGER NOT NULL,
    resolution_height INTEGER NOT NULL,
    decorations TEXT NOT NULL,
    saved_at INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_layouts_saved_at ON layouts (saved_at DESC);
";
