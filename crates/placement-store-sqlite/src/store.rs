//! [`SqliteStore`], the SQLite implementation of [`StudentStore`].

use std::path::Path;

use chrono::Utc;
use placement_core::{
  store::{
    Bucket, HIGH_CGPA_THRESHOLD, SortField, SortOrder, StudentPage, StudentQuery,
    StudentStats, StudentStore,
  },
  student::{DedupKey, StoredStudent, StudentRecord},
};
use rusqlite::{OptionalExtension as _, types::Value};
use uuid::Uuid;

use crate::{
  Result,
  encode::{RawStudent, StudentColumns, decode_dt, encode_uuid},
  schema::SCHEMA,
};

const RECENT_LIMIT: usize = 10;

// ─── Store ───────────────────────────────────────────────────────────────────

/// A student store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run a `SELECT <RawStudent::COLUMNS> ...` and decode every row.
  async fn query_students(&self, sql: String, params: Vec<Value>) -> Result<Vec<StoredStudent>> {
    let raws: Vec<RawStudent> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(params), RawStudent::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawStudent::into_stored).collect()
  }
}

// ─── Filter building ─────────────────────────────────────────────────────────

/// Translate the filter half of a [`StudentQuery`] into a WHERE clause and
/// its positional parameters.
fn where_clause(query: &StudentQuery) -> (String, Vec<Value>) {
  let mut conds: Vec<String> = Vec::new();
  let mut params: Vec<Value> = Vec::new();

  if let Some(spec) = &query.specialization {
    conds.push("specialization LIKE ?".into());
    params.push(Value::Text(format!("%{spec}%")));
  }
  if let Some(branch) = &query.branch {
    conds.push("branch LIKE ?".into());
    params.push(Value::Text(format!("%{branch}%")));
  }
  if let Some(batch) = &query.batch {
    conds.push("batch = ?".into());
    params.push(Value::Text(batch.clone()));
  }
  if let Some(semester) = query.semester {
    conds.push("semester = ?".into());
    params.push(Value::Integer(semester.into()));
  }
  if let Some(min) = query.cgpa_gte {
    conds.push("cgpa >= ?".into());
    params.push(Value::Real(min));
  }
  if let Some(max) = query.cgpa_lte {
    conds.push("cgpa <= ?".into());
    params.push(Value::Real(max));
  }
  for (path, values) in [("$.tags", &query.tags), ("$.skills", &query.skills)] {
    if values.is_empty() {
      continue;
    }
    let placeholders = vec!["?"; values.len()].join(", ");
    conds.push(format!(
      "EXISTS (SELECT 1 FROM json_each(document, '{path}') WHERE json_each.value IN ({placeholders}))"
    ));
    params.extend(values.iter().cloned().map(Value::Text));
  }

  let clause = if conds.is_empty() {
    String::new()
  } else {
    format!("WHERE {}", conds.join(" AND "))
  };
  (clause, params)
}

fn order_clause(sort_by: SortField, order: SortOrder) -> String {
  let column = match sort_by {
    SortField::Cgpa => "cgpa",
    SortField::Name => "name",
    SortField::Batch => "batch",
    SortField::Semester => "semester",
    SortField::Specialization => "specialization",
    SortField::CreatedAt => "created_at",
  };
  let dir = match order {
    SortOrder::Asc => "ASC",
    SortOrder::Desc => "DESC",
  };
  format!("ORDER BY {column} {dir}, rowid ASC")
}

// ─── StudentStore impl ───────────────────────────────────────────────────────

impl StudentStore for SqliteStore {
  type Error = crate::Error;

  async fn find_match(&self, key: &DedupKey) -> Result<Option<StoredStudent>> {
    let sql = format!(
      "SELECT {} FROM students
       WHERE email = ?1 OR (name = ?2 AND batch = ?3)
       ORDER BY rowid ASC
       LIMIT 1",
      RawStudent::COLUMNS
    );
    let params = vec![
      Value::Text(key.email.clone()),
      Value::Text(key.name.clone()),
      Value::Text(key.batch.clone()),
    ];
    Ok(self.query_students(sql, params).await?.into_iter().next())
  }

  async fn create(&self, mut record: StudentRecord) -> Result<StoredStudent> {
    record.canonicalize_branch();
    record.check_schema()?;

    let now = Utc::now();
    let stored = StoredStudent {
      id: Uuid::new_v4(),
      created_at: now,
      updated_at: now,
      record,
    };
    let c = StudentColumns::from_stored(&stored)?;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO students (
             id, created_at, updated_at, name, branch, batch,
             semester, specialization, cgpa, email, document
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
          rusqlite::params![
            c.id,
            c.created_at,
            c.updated_at,
            c.name,
            c.branch,
            c.batch,
            c.semester,
            c.specialization,
            c.cgpa,
            c.email,
            c.document,
          ],
        )?;
        Ok(())
      })
      .await?;

    tracing::debug!(id = %stored.id, name = %stored.record.name, "student created");
    Ok(stored)
  }

  async fn update_by_id(
    &self,
    id: Uuid,
    mut record: StudentRecord,
  ) -> Result<Option<StoredStudent>> {
    record.canonicalize_branch();
    record.check_schema()?;

    let mut stored = StoredStudent {
      id,
      // Placeholder; the real creation time is read back below.
      created_at: Utc::now(),
      updated_at: Utc::now(),
      record,
    };
    let c = StudentColumns::from_stored(&stored)?;

    let created_at: Option<String> = self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          "UPDATE students SET
             updated_at = ?2, name = ?3, branch = ?4, batch = ?5,
             semester = ?6, specialization = ?7, cgpa = ?8, email = ?9,
             document = ?10
           WHERE id = ?1",
          rusqlite::params![
            c.id,
            c.updated_at,
            c.name,
            c.branch,
            c.batch,
            c.semester,
            c.specialization,
            c.cgpa,
            c.email,
            c.document,
          ],
        )?;
        if changed == 0 {
          return Ok(None);
        }
        Ok(
          conn
            .query_row(
              "SELECT created_at FROM students WHERE id = ?1",
              rusqlite::params![c.id],
              |row| row.get(0),
            )
            .optional()?,
        )
      })
      .await?;

    match created_at {
      Some(at) => {
        stored.created_at = decode_dt(&at)?;
        tracing::debug!(%id, "student updated");
        Ok(Some(stored))
      }
      None => Ok(None),
    }
  }

  async fn delete_all(&self) -> Result<u64> {
    let removed = self
      .conn
      .call(|conn| Ok(conn.execute("DELETE FROM students", [])?))
      .await?;
    tracing::info!(removed, "cleared student store");
    Ok(removed as u64)
  }

  async fn delete_by_id(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);
    let removed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute("DELETE FROM students WHERE id = ?1", rusqlite::params![id_str])?)
      })
      .await?;
    Ok(removed > 0)
  }

  async fn get(&self, id: Uuid) -> Result<Option<StoredStudent>> {
    let sql = format!("SELECT {} FROM students WHERE id = ?1", RawStudent::COLUMNS);
    let params = vec![Value::Text(encode_uuid(id))];
    Ok(self.query_students(sql, params).await?.into_iter().next())
  }

  async fn count(&self) -> Result<u64> {
    let n: i64 = self
      .conn
      .call(|conn| Ok(conn.query_row("SELECT COUNT(*) FROM students", [], |r| r.get(0))?))
      .await?;
    Ok(n as u64)
  }

  async fn list(&self, query: &StudentQuery) -> Result<StudentPage> {
    let (where_sql, params) = where_clause(query);

    let count_sql = format!("SELECT COUNT(*) FROM students {where_sql}");
    let count_params = params.clone();
    let total: i64 = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          &count_sql,
          rusqlite::params_from_iter(count_params),
          |r| r.get(0),
        )?)
      })
      .await?;

    let sql = format!(
      "SELECT {} FROM students {where_sql} {} LIMIT ? OFFSET ?",
      RawStudent::COLUMNS,
      order_clause(query.sort_by, query.sort_order),
    );
    let mut page_params = params;
    page_params.push(Value::Integer(i64::try_from(query.limit).unwrap_or(i64::MAX)));
    page_params.push(Value::Integer(i64::try_from(query.offset).unwrap_or(i64::MAX)));
    let students = self.query_students(sql, page_params).await?;

    Ok(StudentPage { students, total: total as u64 })
  }

  async fn search(&self, text: &str, limit: usize) -> Result<Vec<StoredStudent>> {
    // Phase 1: LIKE over the extracted columns and the JSON document.
    let sql = format!(
      "SELECT {} FROM students
       WHERE name LIKE ?1
          OR specialization LIKE ?1
          OR json_extract(document, '$.overview') LIKE ?1
          OR EXISTS (
               SELECT 1 FROM json_each(document, '$.skills')
               WHERE json_each.value LIKE ?1
             )
       ORDER BY cgpa DESC, rowid ASC
       LIMIT ?2",
      RawStudent::COLUMNS
    );
    let params = vec![
      Value::Text(format!("%{}%", text.trim())),
      Value::Integer(i64::try_from(limit).unwrap_or(i64::MAX)),
    ];
    self.query_students(sql, params).await
  }

  async fn stats(&self) -> Result<StudentStats> {
    let (total, average, high, by_branch, by_specialization) = self
      .conn
      .call(|conn| {
        let (total, average): (i64, Option<f64>) = conn.query_row(
          "SELECT COUNT(*), AVG(cgpa) FROM students",
          [],
          |r| Ok((r.get(0)?, r.get(1)?)),
        )?;
        let high: i64 = conn.query_row(
          "SELECT COUNT(*) FROM students WHERE cgpa >= ?1",
          rusqlite::params![HIGH_CGPA_THRESHOLD],
          |r| r.get(0),
        )?;

        let buckets = |column: &str| -> rusqlite::Result<Vec<Bucket>> {
          let mut stmt = conn.prepare(&format!(
            "SELECT {column}, COUNT(*) AS n FROM students
             GROUP BY {column} ORDER BY n DESC, {column} ASC"
          ))?;
          let rows = stmt
            .query_map([], |r| {
              Ok(Bucket { value: r.get(0)?, count: r.get::<_, i64>(1)? as u64 })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
          Ok(rows)
        };
        let by_branch = buckets("branch")?;
        let by_specialization = buckets("specialization")?;

        Ok((total, average, high, by_branch, by_specialization))
      })
      .await?;

    let recent_sql = format!(
      "SELECT {} FROM students ORDER BY created_at DESC, rowid DESC LIMIT ?1",
      RawStudent::COLUMNS
    );
    let recent = self
      .query_students(recent_sql, vec![Value::Integer(RECENT_LIMIT as i64)])
      .await?;

    Ok(StudentStats {
      total_students: total as u64,
      average_cgpa: average,
      high_cgpa_students: high as u64,
      by_branch,
      by_specialization,
      recent,
    })
  }
}
