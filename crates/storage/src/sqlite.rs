use rusqlite::{Connection, OptionalExtension};

use decor_core::{DecorationId, DecorationRecord, LayoutId, LayoutRecord, ViewId};

use crate::error::StorageError;
use crate::traits::DecorationStorage;

/// Convert Vec<u8> to fixed-size array with proper error handling.
fn to_array<const N: usize>(v: Vec<u8>, label: &str) -> Result<[u8; N], StorageError> {
    v.try_into()
        .map_err(|_| StorageError::Serialization(format!("invalid {label} length")))
}

const DECORATION_COLUMNS: &str = "decoration_id, image_ref, position_x, position_y, width, height, \
     rotation, z_index, anchor_date, day_offset_x, day_offset_y";

/// Structured decoration database. In a split-process host this lives on the
/// privileged side behind a [`crate::host::HostService`].
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    pub fn open(path: &str) -> Result<Self, StorageError> {
        let conn = Connection::open(path)?;
        crate::schema::init_schema(&conn)?;
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        crate::schema::init_schema(&conn)?;
        Ok(Self { conn })
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }
}

type RawDecorationRow = (
    Vec<u8>,
    String,
    f64,
    f64,
    f64,
    f64,
    f64,
    i64,
    Option<String>,
    Option<f64>,
    Option<f64>,
);

fn read_decoration_row(row: &rusqlite::Row) -> rusqlite::Result<RawDecorationRow> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
        row.get(7)?,
        row.get(8)?,
        row.get(9)?,
        row.get(10)?,
    ))
}

fn decoration_from_raw(raw: RawDecorationRow) -> Result<DecorationRecord, StorageError> {
    let (
        id_bytes,
        image_ref,
        position_x,
        position_y,
        width,
        height,
        rotation,
        z_index,
        date,
        day_offset_x,
        day_offset_y,
    ) = raw;
    Ok(DecorationRecord {
        id: DecorationId::from_bytes(to_array::<16>(id_bytes, "decoration_id")?),
        image_ref,
        position_x,
        position_y,
        width,
        height,
        rotation,
        z_index,
        date,
        day_offset_x,
        day_offset_y,
    })
}

type RawLayoutRow = (Vec<u8>, String, u32, u32, String, i64);

fn read_layout_row(row: &rusqlite::Row) -> rusqlite::Result<RawLayoutRow> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
    ))
}

fn layout_from_raw(raw: RawLayoutRow) -> Result<LayoutRecord, StorageError> {
    let (id_bytes, name, resolution_width, resolution_height, serialized_decorations, saved_at) =
        raw;
    Ok(LayoutRecord {
        id: LayoutId::from_bytes(to_array::<16>(id_bytes, "layout_id")?),
        name,
        resolution_width,
        resolution_height,
        serialized_decorations,
        saved_at,
    })
}

impl DecorationStorage for SqliteStorage {
    fn create_decoration(
        &mut self,
        view: ViewId,
        record: &DecorationRecord,
    ) -> Result<(), StorageError> {
        self.conn.execute(
            &format!(
                "INSERT INTO decorations (view, {DECORATION_COLUMNS})
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
                 ON CONFLICT(view, decoration_id) DO NOTHING"
            ),
            rusqlite::params![
                view.as_str(),
                record.id.as_bytes().as_slice(),
                record.image_ref,
                record.position_x,
                record.position_y,
                record.width,
                record.height,
                record.rotation,
                record.z_index,
                record.date,
                record.day_offset_x,
                record.day_offset_y,
            ],
        )?;
        Ok(())
    }

    fn update_decoration(
        &mut self,
        view: ViewId,
        record: &DecorationRecord,
    ) -> Result<(), StorageError> {
        let changed = self.conn.execute(
            "UPDATE decorations
             SET image_ref = ?3, position_x = ?4, position_y = ?5, width = ?6, height = ?7,
                 rotation = ?8, z_index = ?9, anchor_date = ?10, day_offset_x = ?11,
                 day_offset_y = ?12
             WHERE view = ?1 AND decoration_id = ?2",
            rusqlite::params![
                view.as_str(),
                record.id.as_bytes().as_slice(),
                record.image_ref,
                record.position_x,
                record.position_y,
                record.width,
                record.height,
                record.rotation,
                record.z_index,
                record.date,
                record.day_offset_x,
                record.day_offset_y,
            ],
        )?;
        if changed == 0 {
            return Err(StorageError::NotFound(format!("decoration {} in {view}", record.id)));
        }
        Ok(())
    }

    fn delete_decoration(&mut self, view: ViewId, id: DecorationId) -> Result<(), StorageError> {
        let changed = self.conn.execute(
            "DELETE FROM decorations WHERE view = ?1 AND decoration_id = ?2",
            rusqlite::params![view.as_str(), id.as_bytes().as_slice()],
        )?;
        if changed == 0 {
            return Err(StorageError::NotFound(format!("decoration {id} in {view}")));
        }
        Ok(())
    }

    fn list_decorations(&self, view: ViewId) -> Result<Vec<DecorationRecord>, StorageError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {DECORATION_COLUMNS} FROM decorations WHERE view = ?1 ORDER BY seq"
        ))?;
        let rows = stmt.query_map(rusqlite::params![view.as_str()], read_decoration_row)?;

        let mut result = Vec::new();
        for row in rows {
            result.push(decoration_from_raw(row?)?);
        }
        Ok(result)
    }

    fn create_layout(&mut self, record: &LayoutRecord) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT INTO layouts
                 (layout_id, name, resolution_width, resolution_height, decorations, saved_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(layout_id) DO NOTHING",
            rusqlite::params![
                record.id.as_bytes().as_slice(),
                record.name,
                record.resolution_width,
                record.resolution_height,
                record.serialized_decorations,
                record.saved_at,
            ],
        )?;
        Ok(())
    }

    fn list_layouts(&self) -> Result<Vec<LayoutRecord>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT layout_id, name, resolution_width, resolution_height, decorations, saved_at
             FROM layouts ORDER BY saved_at DESC, layout_id DESC",
        )?;
        let rows = stmt.query_map([], read_layout_row)?;

        let mut result = Vec::new();
        for row in rows {
            result.push(layout_from_raw(row?)?);
        }
        Ok(result)
    }

    fn get_layout(&self, id: LayoutId) -> Result<Option<LayoutRecord>, StorageError> {
        let raw = self
            .conn
            .query_row(
                "SELECT layout_id, name, resolution_width, resolution_height, decorations, saved_at
                 FROM layouts WHERE layout_id = ?1",
                rusqlite::params![id.as_bytes().as_slice()],
                read_layout_row,
            )
            .optional()?;
        raw.map(layout_from_raw).transpose()
    }

    fn delete_layout(&mut self, id: LayoutId) -> Result<(), StorageError> {
        let changed = self.conn.execute(
            "DELETE FROM layouts WHERE layout_id = ?1",
            rusqlite::params![id.as_bytes().as_slice()],
        )?;
        if changed == 0 {
            return Err(StorageError::NotFound(format!("layout {id}")));
        }
        Ok(())
    }
}
