//! SQLite-backed inventory repository (durable backend).
//!
//! # Responsibility
//! - Implement `InventoryRepository` over the migrated inventory schema.
//! - Keep SQL details, row decoding and snapshot hydration inside this module.
//!
//! # Invariants
//! - The connection is owned behind one mutex; the repository is `Send + Sync`.
//! - Every mutation is a single SQL statement followed by a read-back.
//! - Read paths reject invalid persisted state instead of masking it.
//! - Usage reads `LEFT JOIN` razors/blades; missing rows yield `None` snapshots.
//! - Usage writes check their references while holding the connection lock.

use crate::db::migrations::latest_version;
use crate::model::blade::Blade;
use crate::model::page::ListQuery;
use crate::model::razor::Razor;
use crate::model::usage::UsageRecord;
use crate::model::{EntityId, EntityKind};
use crate::repo::inventory_repo::{
    BackendKind, InventoryRepository, Listing, RepoError, RepoResult, StampClock,
};
use crate::stats::UsageStatistics;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Params, Row};
use std::sync::Mutex;

const RAZOR_SELECT_SQL: &str = "SELECT
    id,
    brand,
    model,
    purchase_date,
    price,
    notes,
    created_at,
    updated_at
FROM razors";

const BLADE_SELECT_SQL: &str = "SELECT
    id,
    brand,
    model,
    compatible_razors,
    purchase_date,
    unit_price,
    total_quantity,
    remaining_quantity,
    notes,
    created_at,
    updated_at
FROM blades";

const USAGE_SELECT_SQL: &str = "SELECT
    u.id AS id,
    u.usage_time AS usage_time,
    u.razor_id AS razor_id,
    u.blade_id AS blade_id,
    u.blade_usage_count AS blade_usage_count,
    u.rating AS rating,
    u.experience_text AS experience_text,
    u.need_blade_change AS need_blade_change,
    u.created_at AS created_at,
    u.updated_at AS updated_at,
    r.id AS r_id,
    r.brand AS r_brand,
    r.model AS r_model,
    r.purchase_date AS r_purchase_date,
    r.price AS r_price,
    r.notes AS r_notes,
    r.created_at AS r_created_at,
    r.updated_at AS r_updated_at,
    b.id AS b_id,
    b.brand AS b_brand,
    b.model AS b_model,
    b.compatible_razors AS b_compatible_razors,
    b.purchase_date AS b_purchase_date,
    b.unit_price AS b_unit_price,
    b.total_quantity AS b_total_quantity,
    b.remaining_quantity AS b_remaining_quantity,
    b.notes AS b_notes,
    b.created_at AS b_created_at,
    b.updated_at AS b_updated_at
FROM usage_records u
LEFT JOIN razors r ON r.id = u.razor_id
LEFT JOIN blades b ON b.id = u.blade_id";

const USAGE_RECENCY_ORDER: &str = "ORDER BY u.usage_time DESC, u.id DESC";

const REQUIRED_COLUMNS: &[(&str, &[&str])] = &[
    (
        "razors",
        &[
            "id",
            "brand",
            "model",
            "purchase_date",
            "price",
            "notes",
            "created_at",
            "updated_at",
        ],
    ),
    (
        "blades",
        &[
            "id",
            "brand",
            "model",
            "compatible_razors",
            "purchase_date",
            "unit_price",
            "total_quantity",
            "remaining_quantity",
            "notes",
            "created_at",
            "updated_at",
        ],
    ),
    (
        "usage_records",
        &[
            "id",
            "usage_time",
            "razor_id",
            "blade_id",
            "blade_usage_count",
            "rating",
            "experience_text",
            "need_blade_change",
            "created_at",
            "updated_at",
        ],
    ),
];

/// SQLite-backed inventory repository.
pub struct SqliteInventoryRepository {
    state: Mutex<SqliteState>,
}

struct SqliteState {
    conn: Connection,
    clock: StampClock,
}

impl SqliteInventoryRepository {
    /// Creates repository from a migrated connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when the schema version does not match.
    /// - `MissingRequiredTable` / `MissingRequiredColumn` for incomplete schemas.
    ///
    /// New stamps never fall below the newest stamp already persisted, even
    /// when the wall clock has stepped back since the previous run.
    pub fn try_new(conn: Connection) -> RepoResult<Self> {
        ensure_inventory_connection_ready(&conn)?;
        let clock = StampClock::resuming_from(latest_stamp(&conn)?);
        Ok(Self {
            state: Mutex::new(SqliteState { conn, clock }),
        })
    }

    fn with_state<T>(&self, op: impl FnOnce(&mut SqliteState) -> RepoResult<T>) -> RepoResult<T> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| RepoError::Unavailable("sqlite connection lock poisoned".to_string()))?;
        op(&mut state)
    }
}

impl InventoryRepository for SqliteInventoryRepository {
    fn backend_kind(&self) -> BackendKind {
        BackendKind::Durable
    }

    fn create_razor(&self, razor: &Razor) -> RepoResult<Razor> {
        razor.validate()?;

        self.with_state(|state| {
            let now = to_millis(state.clock.now());
            state.conn.execute(
                "INSERT INTO razors (
                    brand,
                    model,
                    purchase_date,
                    price,
                    notes,
                    created_at,
                    updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6);",
                params![
                    razor.brand.as_str(),
                    razor.model.as_str(),
                    razor.purchase_date.map(to_millis),
                    razor.price,
                    razor.notes.as_str(),
                    now,
                ],
            )?;
            let id = state.conn.last_insert_rowid();
            fetch_razor(&state.conn, id)
        })
    }

    fn get_razor(&self, id: EntityId) -> RepoResult<Razor> {
        self.with_state(|state| fetch_razor(&state.conn, id))
    }

    fn list_razors(&self, query: ListQuery) -> RepoResult<Listing<Razor>> {
        self.with_state(|state| {
            let total = count_rows(&state.conn, "razors")?;
            let items = query_all(
                &state.conn,
                &format!("{RAZOR_SELECT_SQL} ORDER BY id ASC LIMIT ?1 OFFSET ?2;"),
                params![i64::from(query.limit), offset_param(query.offset)],
                parse_razor_row,
            )?;
            Ok(Listing { items, total })
        })
    }

    fn update_razor(&self, razor: &Razor) -> RepoResult<Razor> {
        razor.validate()?;

        self.with_state(|state| {
            let now = to_millis(state.clock.now());
            let changed = state.conn.execute(
                "UPDATE razors
                 SET
                    brand = ?1,
                    model = ?2,
                    purchase_date = ?3,
                    price = ?4,
                    notes = ?5,
                    updated_at = ?6
                 WHERE id = ?7;",
                params![
                    razor.brand.as_str(),
                    razor.model.as_str(),
                    razor.purchase_date.map(to_millis),
                    razor.price,
                    razor.notes.as_str(),
                    now,
                    razor.id,
                ],
            )?;
            if changed == 0 {
                return Err(not_found(EntityKind::Razor, razor.id));
            }
            fetch_razor(&state.conn, razor.id)
        })
    }

    fn delete_razor(&self, id: EntityId) -> RepoResult<()> {
        self.with_state(|state| delete_row(&state.conn, "razors", EntityKind::Razor, id))
    }

    fn create_blade(&self, blade: &Blade) -> RepoResult<Blade> {
        blade.validate()?;

        self.with_state(|state| {
            let now = to_millis(state.clock.now());
            state.conn.execute(
                "INSERT INTO blades (
                    brand,
                    model,
                    compatible_razors,
                    purchase_date,
                    unit_price,
                    total_quantity,
                    remaining_quantity,
                    notes,
                    created_at,
                    updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9);",
                params![
                    blade.brand.as_str(),
                    blade.model.as_str(),
                    blade.compatible_razors.as_str(),
                    blade.purchase_date.map(to_millis),
                    blade.unit_price,
                    i64::from(blade.total_quantity),
                    i64::from(blade.remaining_quantity),
                    blade.notes.as_str(),
                    now,
                ],
            )?;
            let id = state.conn.last_insert_rowid();
            fetch_blade(&state.conn, id)
        })
    }

    fn get_blade(&self, id: EntityId) -> RepoResult<Blade> {
        self.with_state(|state| fetch_blade(&state.conn, id))
    }

    fn list_blades(&self, query: ListQuery) -> RepoResult<Listing<Blade>> {
        self.with_state(|state| {
            let total = count_rows(&state.conn, "blades")?;
            let items = query_all(
                &state.conn,
                &format!("{BLADE_SELECT_SQL} ORDER BY id ASC LIMIT ?1 OFFSET ?2;"),
                params![i64::from(query.limit), offset_param(query.offset)],
                parse_blade_row,
            )?;
            Ok(Listing { items, total })
        })
    }

    fn update_blade(&self, blade: &Blade) -> RepoResult<Blade> {
        blade.validate()?;

        self.with_state(|state| {
            let now = to_millis(state.clock.now());
            let changed = state.conn.execute(
                "UPDATE blades
                 SET
                    brand = ?1,
                    model = ?2,
                    compatible_razors = ?3,
                    purchase_date = ?4,
                    unit_price = ?5,
                    total_quantity = ?6,
                    remaining_quantity = ?7,
                    notes = ?8,
                    updated_at = ?9
                 WHERE id = ?10;",
                params![
                    blade.brand.as_str(),
                    blade.model.as_str(),
                    blade.compatible_razors.as_str(),
                    blade.purchase_date.map(to_millis),
                    blade.unit_price,
                    i64::from(blade.total_quantity),
                    i64::from(blade.remaining_quantity),
                    blade.notes.as_str(),
                    now,
                    blade.id,
                ],
            )?;
            if changed == 0 {
                return Err(not_found(EntityKind::Blade, blade.id));
            }
            fetch_blade(&state.conn, blade.id)
        })
    }

    fn delete_blade(&self, id: EntityId) -> RepoResult<()> {
        self.with_state(|state| delete_row(&state.conn, "blades", EntityKind::Blade, id))
    }

    fn create_usage_record(&self, record: &UsageRecord) -> RepoResult<UsageRecord> {
        self.with_state(|state| {
            ensure_references(&state.conn, record)?;
            let now = to_millis(state.clock.now());
            state.conn.execute(
                "INSERT INTO usage_records (
                    usage_time,
                    razor_id,
                    blade_id,
                    blade_usage_count,
                    rating,
                    experience_text,
                    need_blade_change,
                    created_at,
                    updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8);",
                params![
                    to_millis(record.usage_time),
                    record.razor_id,
                    record.blade_id,
                    i64::from(record.blade_usage_count),
                    record.rating,
                    record.experience_text.as_str(),
                    bool_to_int(record.need_blade_change),
                    now,
                ],
            )?;
            let id = state.conn.last_insert_rowid();
            fetch_usage_record(&state.conn, id)
        })
    }

    fn get_usage_record(&self, id: EntityId) -> RepoResult<UsageRecord> {
        self.with_state(|state| fetch_usage_record(&state.conn, id))
    }

    fn list_usage_records(&self, query: ListQuery) -> RepoResult<Listing<UsageRecord>> {
        self.with_state(|state| {
            let total = count_rows(&state.conn, "usage_records")?;
            let items = query_all(
                &state.conn,
                &format!("{USAGE_SELECT_SQL} {USAGE_RECENCY_ORDER} LIMIT ?1 OFFSET ?2;"),
                params![i64::from(query.limit), offset_param(query.offset)],
                parse_usage_row,
            )?;
            Ok(Listing { items, total })
        })
    }

    fn update_usage_record(&self, record: &UsageRecord) -> RepoResult<UsageRecord> {
        self.with_state(|state| {
            ensure_references(&state.conn, record)?;
            let now = to_millis(state.clock.now());
            let changed = state.conn.execute(
                "UPDATE usage_records
                 SET
                    usage_time = ?1,
                    razor_id = ?2,
                    blade_id = ?3,
                    blade_usage_count = ?4,
                    rating = ?5,
                    experience_text = ?6,
                    need_blade_change = ?7,
                    updated_at = ?8
                 WHERE id = ?9;",
                params![
                    to_millis(record.usage_time),
                    record.razor_id,
                    record.blade_id,
                    i64::from(record.blade_usage_count),
                    record.rating,
                    record.experience_text.as_str(),
                    bool_to_int(record.need_blade_change),
                    now,
                    record.id,
                ],
            )?;
            if changed == 0 {
                return Err(not_found(EntityKind::UsageRecord, record.id));
            }
            fetch_usage_record(&state.conn, record.id)
        })
    }

    fn delete_usage_record(&self, id: EntityId) -> RepoResult<()> {
        self.with_state(|state| {
            delete_row(&state.conn, "usage_records", EntityKind::UsageRecord, id)
        })
    }

    fn usage_statistics(&self) -> RepoResult<UsageStatistics> {
        self.with_state(|state| {
            let (total_usage, razor_count, blade_count, average): (i64, i64, i64, Option<f64>) =
                state.conn.query_row(
                    "SELECT
                        (SELECT COUNT(*) FROM usage_records),
                        (SELECT COUNT(*) FROM razors),
                        (SELECT COUNT(*) FROM blades),
                        (SELECT AVG(rating) FROM usage_records WHERE rating IS NOT NULL);",
                    [],
                    |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
                )?;

            Ok(UsageStatistics {
                total_usage: to_count(total_usage, "usage_records")?,
                razor_count: to_count(razor_count, "razors")?,
                blade_count: to_count(blade_count, "blades")?,
                average_rating: average.unwrap_or(0.0),
            })
        })
    }

    fn recent_usage_records(&self, limit: u32) -> RepoResult<Vec<UsageRecord>> {
        self.with_state(|state| {
            query_all(
                &state.conn,
                &format!("{USAGE_SELECT_SQL} {USAGE_RECENCY_ORDER} LIMIT ?1;"),
                params![i64::from(limit)],
                parse_usage_row,
            )
        })
    }
}

fn fetch_razor(conn: &Connection, id: EntityId) -> RepoResult<Razor> {
    query_one(
        conn,
        &format!("{RAZOR_SELECT_SQL} WHERE id = ?1;"),
        params![id],
        parse_razor_row,
    )?
    .ok_or_else(|| not_found(EntityKind::Razor, id))
}

fn fetch_blade(conn: &Connection, id: EntityId) -> RepoResult<Blade> {
    query_one(
        conn,
        &format!("{BLADE_SELECT_SQL} WHERE id = ?1;"),
        params![id],
        parse_blade_row,
    )?
    .ok_or_else(|| not_found(EntityKind::Blade, id))
}

fn fetch_usage_record(conn: &Connection, id: EntityId) -> RepoResult<UsageRecord> {
    query_one(
        conn,
        &format!("{USAGE_SELECT_SQL} WHERE u.id = ?1;"),
        params![id],
        parse_usage_row,
    )?
    .ok_or_else(|| not_found(EntityKind::UsageRecord, id))
}

fn ensure_references(conn: &Connection, record: &UsageRecord) -> RepoResult<()> {
    for (table, entity, id) in [
        ("razors", EntityKind::Razor, record.razor_id),
        ("blades", EntityKind::Blade, record.blade_id),
    ] {
        let exists: i64 = conn.query_row(
            &format!("SELECT EXISTS(SELECT 1 FROM {table} WHERE id = ?1);"),
            [id],
            |row| row.get(0),
        )?;
        if exists != 1 {
            return Err(RepoError::DanglingReference { entity, id });
        }
    }
    Ok(())
}

fn latest_stamp(conn: &Connection) -> RepoResult<i64> {
    let latest: Option<i64> = conn.query_row(
        "SELECT MAX(stamp) FROM (
            SELECT MAX(updated_at) AS stamp FROM razors
            UNION ALL SELECT MAX(updated_at) FROM blades
            UNION ALL SELECT MAX(updated_at) FROM usage_records
        );",
        [],
        |row| row.get(0),
    )?;
    Ok(latest.unwrap_or(0))
}

fn delete_row(
    conn: &Connection,
    table: &'static str,
    entity: EntityKind,
    id: EntityId,
) -> RepoResult<()> {
    let changed = conn.execute(&format!("DELETE FROM {table} WHERE id = ?1;"), [id])?;
    if changed == 0 {
        return Err(not_found(entity, id));
    }
    Ok(())
}

fn count_rows(conn: &Connection, table: &'static str) -> RepoResult<u64> {
    let count: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {table};"), [], |row| {
        row.get(0)
    })?;
    to_count(count, table)
}

fn query_one<T, P: Params>(
    conn: &Connection,
    sql: &str,
    params: P,
    parse: fn(&Row<'_>) -> RepoResult<T>,
) -> RepoResult<Option<T>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query(params)?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse(row)?));
    }
    Ok(None)
}

fn query_all<T, P: Params>(
    conn: &Connection,
    sql: &str,
    params: P,
    parse: fn(&Row<'_>) -> RepoResult<T>,
) -> RepoResult<Vec<T>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query(params)?;
    let mut items = Vec::new();
    while let Some(row) = rows.next()? {
        items.push(parse(row)?);
    }
    Ok(items)
}

fn parse_razor_row(row: &Row<'_>) -> RepoResult<Razor> {
    parse_razor(row, "")
}

fn parse_blade_row(row: &Row<'_>) -> RepoResult<Blade> {
    parse_blade(row, "")
}

fn parse_razor(row: &Row<'_>, prefix: &str) -> RepoResult<Razor> {
    let column = |name: &str| format!("{prefix}{name}");
    Ok(Razor {
        id: row.get(column("id").as_str())?,
        brand: row.get(column("brand").as_str())?,
        model: row.get(column("model").as_str())?,
        purchase_date: optional_from_millis(
            row.get(column("purchase_date").as_str())?,
            "razors.purchase_date",
        )?,
        price: row.get(column("price").as_str())?,
        notes: row.get(column("notes").as_str())?,
        created_at: from_millis(row.get(column("created_at").as_str())?, "razors.created_at")?,
        updated_at: from_millis(row.get(column("updated_at").as_str())?, "razors.updated_at")?,
    })
}

fn parse_blade(row: &Row<'_>, prefix: &str) -> RepoResult<Blade> {
    let column = |name: &str| format!("{prefix}{name}");
    Ok(Blade {
        id: row.get(column("id").as_str())?,
        brand: row.get(column("brand").as_str())?,
        model: row.get(column("model").as_str())?,
        compatible_razors: row.get(column("compatible_razors").as_str())?,
        purchase_date: optional_from_millis(
            row.get(column("purchase_date").as_str())?,
            "blades.purchase_date",
        )?,
        unit_price: row.get(column("unit_price").as_str())?,
        total_quantity: to_quantity(
            row.get(column("total_quantity").as_str())?,
            "blades.total_quantity",
        )?,
        remaining_quantity: to_quantity(
            row.get(column("remaining_quantity").as_str())?,
            "blades.remaining_quantity",
        )?,
        notes: row.get(column("notes").as_str())?,
        created_at: from_millis(row.get(column("created_at").as_str())?, "blades.created_at")?,
        updated_at: from_millis(row.get(column("updated_at").as_str())?, "blades.updated_at")?,
    })
}

fn parse_usage_row(row: &Row<'_>) -> RepoResult<UsageRecord> {
    let need_blade_change = match row.get::<_, i64>("need_blade_change")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid need_blade_change value `{other}` in usage_records.need_blade_change"
            )));
        }
    };

    let razor = match row.get::<_, Option<EntityId>>("r_id")? {
        Some(_) => Some(parse_razor(row, "r_")?),
        None => None,
    };
    let blade = match row.get::<_, Option<EntityId>>("b_id")? {
        Some(_) => Some(parse_blade(row, "b_")?),
        None => None,
    };

    Ok(UsageRecord {
        id: row.get("id")?,
        usage_time: from_millis(row.get("usage_time")?, "usage_records.usage_time")?,
        razor_id: row.get("razor_id")?,
        blade_id: row.get("blade_id")?,
        blade_usage_count: to_quantity(
            row.get("blade_usage_count")?,
            "usage_records.blade_usage_count",
        )?,
        rating: row.get("rating")?,
        experience_text: row.get("experience_text")?,
        need_blade_change,
        created_at: from_millis(row.get("created_at")?, "usage_records.created_at")?,
        updated_at: from_millis(row.get("updated_at")?, "usage_records.updated_at")?,
        razor,
        blade,
    })
}

fn ensure_inventory_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    for &(table, columns) in REQUIRED_COLUMNS {
        if !table_exists(conn, table)? {
            return Err(RepoError::MissingRequiredTable(table));
        }
        for &column in columns {
            if !table_has_column(conn, table, column)? {
                return Err(RepoError::MissingRequiredColumn { table, column });
            }
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}

fn not_found(entity: EntityKind, id: EntityId) -> RepoError {
    RepoError::NotFound { entity, id }
}

fn to_millis(value: DateTime<Utc>) -> i64 {
    value.timestamp_millis()
}

fn from_millis(value: i64, column: &str) -> RepoResult<DateTime<Utc>> {
    DateTime::from_timestamp_millis(value).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid timestamp `{value}` in {column}"))
    })
}

fn optional_from_millis(value: Option<i64>, column: &str) -> RepoResult<Option<DateTime<Utc>>> {
    value.map(|millis| from_millis(millis, column)).transpose()
}

fn to_quantity(value: i64, column: &str) -> RepoResult<u32> {
    u32::try_from(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid quantity `{value}` in {column}")))
}

fn to_count(value: i64, table: &str) -> RepoResult<u64> {
    u64::try_from(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid row count `{value}` for {table}")))
}

// SQLite binds integers as i64; offsets past that range select nothing anyway.
fn offset_param(offset: u64) -> i64 {
    i64::try_from(offset).unwrap_or(i64::MAX)
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
