use crate::cli::TaskArgs;
use crate::core::TaskTracker;
use crate::db::Database;
use crate::error::{Result, StrideError};
use crate::models::{
    Priority, SettingsUpdate, Status, Task, TaskInput, format_time, parse_date, parse_time,
};
use chrono::Utc;
use std::path::Path;

fn open(path: &Path) -> Result<Database> {
    if !path.exists() {
        return Err(StrideError::NotInitialized);
    }
    let db = Database::open(path)?;
    if !db.is_initialized()? {
        return Err(StrideError::NotInitialized);
    }
    Ok(db)
}

fn task_input(title: String, fields: TaskArgs) -> Result<TaskInput> {
    Ok(TaskInput {
        title: Some(title),
        subject: fields.subject,
        status: fields.status.map(Status::from),
        due_date: fields.due.as_deref().map(parse_date).transpose()?,
        priority: fields.priority.map(Priority::from),
        time_needed: fields.hours,
    })
}

fn print_rows(tasks: &[Task]) {
    if tasks.is_empty() {
        println!("No tasks found.");
        return;
    }

    for task in tasks {
        let icon = task.status.as_ref().map_or(" ", Status::icon);
        let priority = task.priority.as_ref().map_or("-", Priority::as_str);
        let due = task
            .due_date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "no date".to_string());
        let subject = task
            .subject
            .as_deref()
            .map(|s| format!(" [{s}]"))
            .unwrap_or_default();

        println!(
            "  [#{:>3}] {} {:<6} {:<10} {}{}",
            task.id, icon, priority, due, task.title, subject
        );
    }
}

/// Handle the init command
pub fn handle_init(path: &Path) -> Result<()> {
    let mut db = Database::open(path)?;
    db.init()?;

    println!("Initialized study tracker");
    println!("  - Store: {}", path.display());

    Ok(())
}

/// Handle the add command
pub fn handle_add(path: &Path, title: String, fields: TaskArgs) -> Result<()> {
    let mut db = open(path)?;
    let mut tracker = TaskTracker::new(&mut db);

    let task = tracker.create_task(task_input(title, fields)?)?;

    println!("Created task #{}: {}", task.id, task.title);

    Ok(())
}

/// Handle the edit command
pub fn handle_edit(path: &Path, id: i64, title: String, fields: TaskArgs) -> Result<()> {
    let mut db = open(path)?;
    let mut tracker = TaskTracker::new(&mut db);

    // Fail loudly here even though the API treats a missing id as a no-op
    tracker.get_task(id)?;
    tracker.update_task(id, task_input(title, fields)?)?;

    println!("Updated task #{id}");

    Ok(())
}

/// Handle the show command
pub fn handle_show(path: &Path, id: i64) -> Result<()> {
    let mut db = open(path)?;
    let tracker = TaskTracker::new(&mut db);

    let task = tracker.get_task(id)?;

    println!("[#{}] {}", task.id, task.title);
    println!(
        "Subject:      {}",
        task.subject.as_deref().unwrap_or("(none)")
    );
    println!(
        "Status:       {}",
        task.status.as_ref().map_or("(none)", Status::as_str)
    );
    println!(
        "Priority:     {}",
        task.priority.as_ref().map_or("(none)", Priority::as_str)
    );
    match task.due_date {
        Some(due) => println!("Due:          {}", due.format("%Y-%m-%d")),
        None => println!("Due:          (none)"),
    }
    match task.time_needed {
        Some(hours) => println!("Time needed:  {hours}h"),
        None => println!("Time needed:  (none)"),
    }
    println!("Created:      {}", task.created_at.format("%Y-%m-%d %H:%M"));

    Ok(())
}

/// Handle the today command
pub fn handle_today(path: &Path) -> Result<()> {
    let mut db = open(path)?;
    let tracker = TaskTracker::new(&mut db);

    let today = Utc::now().date_naive();
    println!("Due today ({}):", today.format("%Y-%m-%d"));
    print_rows(&tracker.home(today)?);

    Ok(())
}

/// Handle the list command
pub fn handle_list(path: &Path) -> Result<()> {
    let mut db = open(path)?;
    let tracker = TaskTracker::new(&mut db);

    print_rows(&tracker.all_tasks()?);

    println!();
    println!(
        "Legend: {} completed  {} in progress  {} not started",
        Status::Completed.icon(),
        Status::InProgress.icon(),
        Status::NotStarted.icon()
    );

    Ok(())
}

/// Handle the schedule command
pub fn handle_schedule(path: &Path) -> Result<()> {
    let mut db = open(path)?;
    let tracker = TaskTracker::new(&mut db);

    let schedule = tracker.schedule()?;
    print_settings_line(&schedule.settings);
    print_rows(&schedule.tasks);

    let total: f64 = schedule.tasks.iter().filter_map(|t| t.time_needed).sum();
    println!();
    println!("Total estimated: {total}h across {} tasks", schedule.tasks.len());

    Ok(())
}

/// Handle the rm command
pub fn handle_rm(path: &Path, id: i64) -> Result<()> {
    let mut db = open(path)?;
    let mut tracker = TaskTracker::new(&mut db);

    tracker.delete_task(id)?;
    println!("Deleted task #{id}");

    Ok(())
}

/// Handle the settings command
pub fn handle_settings(
    path: &Path,
    start: Option<&str>,
    end: Option<&str>,
    excluded: Option<&str>,
) -> Result<()> {
    let mut db = open(path)?;
    let mut tracker = TaskTracker::new(&mut db);

    if start.is_none() && end.is_none() && excluded.is_none() {
        print_settings_line(&tracker.settings()?);
        return Ok(());
    }

    let update = SettingsUpdate {
        study_start_time: start.map(parse_time).transpose()?,
        study_end_time: end.map(parse_time).transpose()?,
        excluded_days: excluded.map(|days| Some(days.to_string())),
    };
    let settings = tracker.update_settings(update)?;

    println!("Updated settings");
    print_settings_line(&settings);

    Ok(())
}

fn print_settings_line(settings: &crate::models::Settings) {
    let start = settings
        .study_start_time
        .as_ref()
        .map_or_else(|| "--:--".to_string(), format_time);
    let end = settings
        .study_end_time
        .as_ref()
        .map_or_else(|| "--:--".to_string(), format_time);
    let excluded = match settings.excluded_days.as_deref() {
        None | Some("") => "none",
        Some(days) => days,
    };
    println!("Study hours: {start}-{end}  Excluded days: {excluded}");
}
