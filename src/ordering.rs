//! Listing orders for the home, task table and schedule views.
//!
//! Ranks are categorical: a missing or unrecognised status/priority falls into
//! the last bucket. Absent due dates sort before any date. All sorts are
//! stable, so rows that tie on every key keep the order they came in.

use crate::models::{Priority, Status, Task};
use chrono::NaiveDate;
use std::cmp::Ordering;

pub fn priority_rank(priority: Option<&Priority>) -> u8 {
    priority.map_or(3, Priority::rank)
}

pub fn status_rank(status: Option<&Status>) -> u8 {
    status.map_or(3, Status::rank)
}

fn by_priority(a: &Task, b: &Task) -> Ordering {
    priority_rank(a.priority.as_ref()).cmp(&priority_rank(b.priority.as_ref()))
}

fn by_status(a: &Task, b: &Task) -> Ordering {
    status_rank(a.status.as_ref()).cmp(&status_rank(b.status.as_ref()))
}

fn by_due_date(a: &Task, b: &Task) -> Ordering {
    a.due_date.cmp(&b.due_date)
}

/// Tasks due on `today`, by priority then due date.
pub fn home(tasks: Vec<Task>, today: NaiveDate) -> Vec<Task> {
    let mut due_today: Vec<Task> = tasks
        .into_iter()
        .filter(|t| t.due_date == Some(today))
        .collect();
    due_today.sort_by(|a, b| by_priority(a, b).then_with(|| by_due_date(a, b)));
    due_today
}

/// Every task, by status then priority then due date.
pub fn full(mut tasks: Vec<Task>) -> Vec<Task> {
    tasks.sort_by(|a, b| {
        by_status(a, b)
            .then_with(|| by_priority(a, b))
            .then_with(|| by_due_date(a, b))
    });
    tasks
}

/// Tasks still to do, by due date then priority.
///
/// A task whose status was cleared by an update is left out along with the
/// completed ones.
pub fn schedule(tasks: Vec<Task>) -> Vec<Task> {
    let mut open: Vec<Task> = tasks
        .into_iter()
        .filter(|t| matches!(&t.status, Some(s) if *s != Status::Completed))
        .collect();
    open.sort_by(|a, b| by_due_date(a, b).then_with(|| by_priority(a, b)));
    open
}
