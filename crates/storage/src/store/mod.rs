#![forbid(unsafe_code)]

mod error;
mod requests;

pub use error::StoreError;
pub use requests::*;

use ds_core::ids::UserId;
use ds_core::model::{PropertyMap, PropertyUpdate};
use ds_core::paths::DavPath;
use rusqlite::{Connection, OptionalExtension, Transaction, params};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

const DB_FILE: &str = "davstore.db";
const V1_SCHEMA_VERSION: i64 = 1;

/// Relational backing for per-user custom resource properties. One row per
/// `(userid, propertypath, propertyname)`; values are opaque text.
#[derive(Debug)]
pub struct PropertyStore {
    conn: Connection,
    storage_dir: PathBuf,
}

impl PropertyStore {
    pub fn open(storage_dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let storage_dir = storage_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&storage_dir)?;

        let db_path = storage_dir.join(DB_FILE);
        let conn = Connection::open(db_path)?;
        conn.busy_timeout(Duration::from_secs(5))?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;

        preflight_gate(&conn)?;
        install_schema(&conn)?;

        Ok(Self { conn, storage_dir })
    }

    pub fn storage_dir(&self) -> &Path {
        &self.storage_dir
    }

    /// Every stored property of one resource. An unknown `(user, path)` pair
    /// is an empty mapping, not an error.
    pub fn get_all(&self, user: &UserId, path: &DavPath) -> Result<PropertyMap, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT propertyname, propertyvalue FROM properties \
             WHERE userid=?1 AND propertypath=?2",
        )?;
        let mut rows = stmt.query(params![user.as_str(), path.as_str()])?;
        let mut out = PropertyMap::new();
        while let Some(row) = rows.next()? {
            out.insert(row.get::<_, String>(0)?, row.get::<_, String>(1)?);
        }
        Ok(out)
    }

    /// One query for a path plus everything below it, keyed by path. Descendant
    /// matching requires the separator boundary, so `foo` never picks up
    /// `foobar`.
    pub fn get_subtree(
        &self,
        user: &UserId,
        path: &DavPath,
    ) -> Result<BTreeMap<String, PropertyMap>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT propertypath, propertyname, propertyvalue \
             FROM properties \
             WHERE userid=?1 AND (propertypath=?2 \
                OR substr(propertypath, 1, length(?2)+1) = ?2 || '/')",
        )?;
        let mut rows = stmt.query(params![user.as_str(), path.as_str()])?;
        let mut out: BTreeMap<String, PropertyMap> = BTreeMap::new();
        while let Some(row) = rows.next()? {
            let row_path = row.get::<_, String>(0)?;
            out.entry(row_path)
                .or_default()
                .insert(row.get::<_, String>(1)?, row.get::<_, String>(2)?);
        }
        Ok(out)
    }

    /// Upsert: insert when absent, full value replacement when present.
    pub fn set(
        &mut self,
        user: &UserId,
        path: &DavPath,
        name: &str,
        value: &str,
    ) -> Result<(), StoreError> {
        let tx = self.conn.transaction()?;
        upsert_tx(&tx, user.as_str(), path.as_str(), name, value)?;
        tx.commit()?;
        Ok(())
    }

    /// Delete one property. Removing a name that was never stored is a no-op.
    pub fn remove(&mut self, user: &UserId, path: &DavPath, name: &str) -> Result<(), StoreError> {
        let tx = self.conn.transaction()?;
        remove_tx(&tx, user.as_str(), path.as_str(), name)?;
        tx.commit()?;
        Ok(())
    }

    /// Drop every row for the exact path (resource destroyed).
    pub fn delete_all(&mut self, user: &UserId, path: &DavPath) -> Result<(), StoreError> {
        let tx = self.conn.transaction()?;
        tx.execute(
            "DELETE FROM properties WHERE userid=?1 AND propertypath=?2",
            params![user.as_str(), path.as_str()],
        )?;
        tx.commit()?;
        Ok(())
    }

    /// Rewrite the row at `from` and every descendant row to live under `to`,
    /// so a moved collection carries its children's properties along.
    pub fn move_path(&mut self, user: &UserId, request: MovePathRequest) -> Result<(), StoreError> {
        let MovePathRequest { from, to } = request;
        if from == to {
            return Ok(());
        }
        if from.is_ancestor_of(&to) {
            return Err(StoreError::InvalidInput(
                "cannot move a path into its own subtree",
            ));
        }

        let tx = self.conn.transaction()?;
        tx.execute(
            "UPDATE properties \
             SET propertypath = ?3 || substr(propertypath, length(?2)+1) \
             WHERE userid=?1 AND (propertypath=?2 \
                OR substr(propertypath, 1, length(?2)+1) = ?2 || '/')",
            params![user.as_str(), from.as_str(), to.as_str()],
        )?;
        tx.commit()?;
        Ok(())
    }

    /// PROPPATCH commit body: apply the mutations in request order inside one
    /// transaction. Either all of them land or none do.
    pub fn apply_patch(
        &mut self,
        user: &UserId,
        request: PropertyPatchRequest,
    ) -> Result<(), StoreError> {
        let PropertyPatchRequest { path, mutations } = request;
        let tx = self.conn.transaction()?;
        for (name, update) in &mutations {
            match update {
                PropertyUpdate::Value(value) => {
                    upsert_tx(&tx, user.as_str(), path.as_str(), name, value)?;
                }
                PropertyUpdate::Remove => {
                    remove_tx(&tx, user.as_str(), path.as_str(), name)?;
                }
            }
        }
        tx.commit()?;
        Ok(())
    }
}

fn upsert_tx(
    tx: &Transaction<'_>,
    user: &str,
    path: &str,
    name: &str,
    value: &str,
) -> Result<(), StoreError> {
    if name.is_empty() {
        return Err(StoreError::InvalidInput("property name must not be empty"));
    }
    tx.execute(
        "INSERT INTO properties(userid, propertypath, propertyname, propertyvalue) \
         VALUES (?1, ?2, ?3, ?4) \
         ON CONFLICT(userid, propertypath, propertyname) \
         DO UPDATE SET propertyvalue=excluded.propertyvalue",
        params![user, path, name, value],
    )?;
    Ok(())
}

fn remove_tx(tx: &Transaction<'_>, user: &str, path: &str, name: &str) -> Result<(), StoreError> {
    tx.execute(
        "DELETE FROM properties WHERE userid=?1 AND propertypath=?2 AND propertyname=?3",
        params![user, path, name],
    )?;
    Ok(())
}

fn preflight_gate(conn: &Connection) -> Result<(), StoreError> {
    let has_state = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='properties_state'",
            [],
            |row| row.get::<_, i64>(0),
        )
        .optional()?
        .is_some();
    if !has_state {
        // Fresh database; install_schema seeds the state row.
        return Ok(());
    }

    let version = conn
        .query_row(
            "SELECT schema_version FROM properties_state WHERE singleton=1",
            [],
            |row| row.get::<_, i64>(0),
        )
        .optional()?;

    match version {
        Some(v) if v == V1_SCHEMA_VERSION => Ok(()),
        Some(_) => Err(StoreError::InvalidInput(
            "RESET_REQUIRED: schema version mismatch",
        )),
        None => Err(StoreError::InvalidInput(
            "RESET_REQUIRED: schema state row is missing",
        )),
    }
}

fn install_schema(conn: &Connection) -> Result<(), StoreError> {
    let now_ms = now_ms();

    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS properties_state (
          singleton INTEGER PRIMARY KEY CHECK(singleton = 1),
          schema_version INTEGER NOT NULL,
          created_at_ms INTEGER NOT NULL,
          updated_at_ms INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS properties (
          userid TEXT NOT NULL,
          propertypath TEXT NOT NULL,
          propertyname TEXT NOT NULL,
          propertyvalue TEXT NOT NULL,
          PRIMARY KEY(userid, propertypath, propertyname)
        );
        "#,
    )?;

    conn.execute(
        "INSERT INTO properties_state(singleton, schema_version, created_at_ms, updated_at_ms) \
         VALUES (1, ?1, ?2, ?2) \
         ON CONFLICT(singleton) DO UPDATE SET updated_at_ms=excluded.updated_at_ms",
        params![V1_SCHEMA_VERSION, now_ms],
    )?;

    Ok(())
}

fn now_ms() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};

    let now = match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(duration) => duration,
        Err(_) => return 0,
    };

    i64::try_from(now.as_millis()).unwrap_or(i64::MAX)
}
