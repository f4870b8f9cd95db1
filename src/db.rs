use crate::error::{Result, StrideError};
use crate::models::{Priority, Settings, Status, Task, TaskInput, format_time, parse_time};
use chrono::NaiveDate;
use rusqlite::types::ValueRef;
use rusqlite::{Connection, OptionalExtension, Row};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Default store file in the working directory
pub const DEFAULT_DB_PATH: &str = "stride.db";

const TASK_COLUMNS: &str =
    "id, title, subject, status, due_date, priority, time_needed, created_at";

/// Database handle
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open database connection
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;

        // Readers and one writer can share the file across request connections
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |_| Ok(()))?;

        Ok(Database { conn })
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Database { conn })
    }

    /// Close the connection, reporting any error from SQLite
    pub fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_, e)| StrideError::Db(e))
    }

    /// Create both tables and the settings row if they are missing.
    /// Safe to run any number of times.
    pub fn init(&mut self) -> Result<()> {
        let tx = self.conn.transaction()?;

        tx.execute(
            "CREATE TABLE IF NOT EXISTS tasks (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                subject TEXT,
                status TEXT DEFAULT 'Not Started',
                due_date DATE,
                priority TEXT DEFAULT 'Medium',
                time_needed REAL DEFAULT 1,
                created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
            )",
            [],
        )?;

        tx.execute(
            "CREATE TABLE IF NOT EXISTS settings (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                study_start_time TIME DEFAULT '09:00',
                study_end_time TIME DEFAULT '17:00',
                excluded_days TEXT DEFAULT ''
            )",
            [],
        )?;

        let inserted = tx.execute(
            "INSERT OR IGNORE INTO settings (id, study_start_time, study_end_time, excluded_days)
             VALUES (1, '09:00', '17:00', '')",
            [],
        )?;

        tx.commit()?;
        debug!(default_settings_created = inserted > 0, "schema ready");
        Ok(())
    }

    /// Check if database is initialized
    pub fn is_initialized(&self) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name IN ('tasks', 'settings')",
            [],
            |row| row.get(0),
        )?;
        Ok(count == 2)
    }

    // ==================== Task Operations ====================

    /// Insert a task exactly as given; callers apply any defaults first
    pub fn insert_task(&mut self, input: &TaskInput) -> Result<i64> {
        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO tasks (title, subject, status, due_date, priority, time_needed)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            (
                input.title.as_deref(),
                input.subject.as_deref(),
                input.status.as_ref().map(Status::as_str),
                input.due_date,
                input.priority.as_ref().map(Priority::as_str),
                input.time_needed,
            ),
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;
        Ok(id)
    }

    /// Overwrite every mutable column of a task. Returns the number of rows
    /// touched, which is zero for an unknown id.
    pub fn replace_task(&mut self, id: i64, input: &TaskInput) -> Result<usize> {
        let tx = self.conn.transaction()?;
        let rows = tx.execute(
            "UPDATE tasks
             SET title = ?1, subject = ?2, status = ?3, due_date = ?4, priority = ?5, time_needed = ?6
             WHERE id = ?7",
            (
                input.title.as_deref(),
                input.subject.as_deref(),
                input.status.as_ref().map(Status::as_str),
                input.due_date,
                input.priority.as_ref().map(Priority::as_str),
                input.time_needed,
                id,
            ),
        )?;
        tx.commit()?;
        Ok(rows)
    }

    pub fn delete_task(&mut self, id: i64) -> Result<usize> {
        let tx = self.conn.transaction()?;
        let rows = tx.execute("DELETE FROM tasks WHERE id = ?1", [id])?;
        tx.commit()?;
        Ok(rows)
    }

    pub fn get_task(&self, id: i64) -> Result<Option<Task>> {
        self.conn
            .query_row(
                &format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1"),
                [id],
                task_from_row,
            )
            .optional()
            .map_err(|e| e.into())
    }

    pub fn get_all_tasks(&self) -> Result<Vec<Task>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {TASK_COLUMNS} FROM tasks ORDER BY id"))?;

        let tasks = stmt.query_map([], task_from_row)?;
        tasks
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| e.into())
    }

    pub fn get_tasks_due_on(&self, date: NaiveDate) -> Result<Vec<Task>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE date(due_date) = date(?1) ORDER BY id"
        ))?;

        let tasks = stmt.query_map([date], task_from_row)?;
        tasks
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| e.into())
    }

    /// Tasks whose status is set and is not 'Completed'
    pub fn get_open_tasks(&self) -> Result<Vec<Task>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE status != 'Completed' ORDER BY id"
        ))?;

        let tasks = stmt.query_map([], task_from_row)?;
        tasks
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| e.into())
    }

    pub fn count_tasks(&self) -> Result<i64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM tasks", [], |row| row.get(0))?;
        Ok(count)
    }

    // ==================== Settings Operations ====================

    pub fn get_settings(&self) -> Result<Settings> {
        let settings = self
            .conn
            .query_row(
                "SELECT study_start_time, study_end_time, excluded_days FROM settings WHERE id = 1",
                [],
                settings_from_row,
            )
            .optional()?;
        Ok(settings.unwrap_or_default())
    }

    /// Write the singleton row, creating it if an older store lacks it
    pub fn put_settings(&mut self, settings: &Settings) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO settings (id, study_start_time, study_end_time, excluded_days)
             VALUES (1, ?1, ?2, ?3)
             ON CONFLICT(id) DO UPDATE SET
                study_start_time = excluded.study_start_time,
                study_end_time = excluded.study_end_time,
                excluded_days = excluded.excluded_days",
            (
                settings.study_start_time.as_ref().map(format_time),
                settings.study_end_time.as_ref().map(format_time),
                settings.excluded_days.as_deref(),
            ),
        )?;
        tx.commit()?;
        Ok(())
    }

    pub fn count_settings_rows(&self) -> Result<i64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM settings", [], |row| row.get(0))?;
        Ok(count)
    }
}

// ==================== Request-scoped connections ====================

/// Where the store lives. Cheap to clone into every request.
#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
}

impl Store {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A fresh session with no connection opened yet
    pub fn session(&self) -> Session {
        Session {
            store: self.clone(),
            db: None,
        }
    }

    /// Create the schema and the default settings row
    pub fn init(&self) -> Result<()> {
        let mut session = self.session();
        session.conn()?.init()?;
        session.release();
        Ok(())
    }

    /// `init` on the blocking pool, for callers already inside the runtime
    pub async fn init_async(&self) -> Result<()> {
        self.run(|session| session.conn()?.init()).await
    }

    /// Run `f` with its own session on the blocking pool. The connection is
    /// released when `f` returns, whether it failed or not.
    pub async fn run<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Session) -> Result<T> + Send + 'static,
    {
        let mut session = self.session();
        tokio::task::spawn_blocking(move || {
            let result = f(&mut session);
            session.release();
            result
        })
        .await?
    }
}

/// One logical unit of work against the store. The connection is opened on
/// first use and shared by every later call in the same session.
pub struct Session {
    store: Store,
    db: Option<Database>,
}

impl Session {
    pub fn conn(&mut self) -> Result<&mut Database> {
        let db = match self.db.take() {
            Some(db) => db,
            None => {
                debug!(path = %self.store.path.display(), "opening connection");
                Database::open(&self.store.path)?
            }
        };
        Ok(self.db.insert(db))
    }

    pub fn is_open(&self) -> bool {
        self.db.is_some()
    }

    /// Close and detach the connection. Does nothing if none is open.
    pub fn release(&mut self) {
        if let Some(db) = self.db.take() {
            debug!("releasing connection");
            if let Err(e) = db.close() {
                warn!(error = %e, "failed to close connection");
            }
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.release();
    }
}

// ==================== Row Parsers ====================

fn task_from_row(row: &Row) -> std::result::Result<Task, rusqlite::Error> {
    Ok(Task {
        id: row.get("id")?,
        title: row.get("title")?,
        subject: row.get("subject")?,
        status: row.get::<_, Option<String>>("status")?.map(Status::from),
        due_date: date_column(row, "due_date")?,
        priority: row.get::<_, Option<String>>("priority")?.map(Priority::from),
        time_needed: row.get("time_needed")?,
        created_at: row.get("created_at")?,
    })
}

/// Dates stored by other writers may be empty or malformed; those read as absent.
fn date_column(
    row: &Row,
    name: &str,
) -> std::result::Result<Option<NaiveDate>, rusqlite::Error> {
    let date = match row.get_ref(name)? {
        ValueRef::Text(text) => std::str::from_utf8(text)
            .ok()
            .and_then(|s| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()),
        _ => None,
    };
    Ok(date)
}

fn settings_from_row(row: &Row) -> std::result::Result<Settings, rusqlite::Error> {
    Ok(Settings {
        study_start_time: time_column(row, 0)?,
        study_end_time: time_column(row, 1)?,
        excluded_days: row.get(2)?,
    })
}

fn time_column(
    row: &Row,
    idx: usize,
) -> std::result::Result<Option<chrono::NaiveTime>, rusqlite::Error> {
    row.get::<_, Option<String>>(idx)?
        .map(|s| {
            parse_time(&s).map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(
                    idx,
                    rusqlite::types::Type::Text,
                    Box::new(std::io::Error::new(
                        std::io::ErrorKind::InvalidData,
                        e.to_string(),
                    )),
                )
            })
        })
        .transpose()
}
