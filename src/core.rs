use crate::db::Database;
use crate::error::{Result, StrideError};
use crate::models::{NewTask, Settings, SettingsUpdate, Task, TaskInput};
use crate::ordering;
use chrono::NaiveDate;
use serde::Serialize;
use tracing::info;

/// What the schedule view shows: open tasks plus the study window they fit into
#[derive(Debug, Clone, Serialize)]
pub struct Schedule {
    pub tasks: Vec<Task>,
    pub settings: Settings,
}

/// Task and settings operations over one connection
pub struct TaskTracker<'a> {
    db: &'a mut Database,
}

impl<'a> TaskTracker<'a> {
    pub fn new(db: &'a mut Database) -> Self {
        TaskTracker { db }
    }

    // ==================== Views ====================

    /// Tasks due on `today`, most important first
    pub fn home(&self, today: NaiveDate) -> Result<Vec<Task>> {
        let tasks = self.db.get_tasks_due_on(today)?;
        Ok(ordering::home(tasks, today))
    }

    /// Every task for the task table
    pub fn all_tasks(&self) -> Result<Vec<Task>> {
        let tasks = self.db.get_all_tasks()?;
        Ok(ordering::full(tasks))
    }

    /// Unfinished tasks by due date, alongside the current settings
    pub fn schedule(&self) -> Result<Schedule> {
        let tasks = ordering::schedule(self.db.get_open_tasks()?);
        let settings = self.db.get_settings()?;
        Ok(Schedule { tasks, settings })
    }

    pub fn settings(&self) -> Result<Settings> {
        self.db.get_settings()
    }

    pub fn get_task(&self, id: i64) -> Result<Task> {
        self.db.get_task(id)?.ok_or(StrideError::TaskNotFound(id))
    }

    // ==================== Writes ====================

    /// Create a task. Status, priority and time needed are defaulted only
    /// when the caller left them out; an explicit null is stored as NULL.
    pub fn create_task(&mut self, task: impl Into<NewTask>) -> Result<Task> {
        let input = task.into().into_input();
        let id = self.db.insert_task(&input)?;
        info!(id, title = ?input.title, "task created");
        self.get_task(id)
    }

    /// Replace every mutable field of a task. Fields missing from `input` are
    /// cleared. An unknown id is not an error.
    pub fn update_task(&mut self, id: i64, input: TaskInput) -> Result<()> {
        let rows = self.db.replace_task(id, &input)?;
        info!(id, rows, "task updated");
        Ok(())
    }

    /// Delete a task. An unknown id is not an error.
    pub fn delete_task(&mut self, id: i64) -> Result<()> {
        let rows = self.db.delete_task(id)?;
        info!(id, rows, "task deleted");
        Ok(())
    }

    pub fn update_settings(&mut self, update: SettingsUpdate) -> Result<Settings> {
        let settings = update.into_settings();
        self.db.put_settings(&settings)?;
        info!(
            start = ?settings.study_start_time,
            end = ?settings.study_end_time,
            excluded = ?settings.excluded_days,
            "settings updated"
        );
        Ok(settings)
    }
}
