//! Task registry and display helpers.
//!
//! The `Registry` is the sole owner of the in-memory task collection: it
//! assigns ids, performs every mutation, and serializes the collection via
//! [`crate::store`]. Confirmations and recoverable conditions ("not found",
//! "file not found") are printed as notices; only I/O and parse failures
//! surface as errors.

use std::path::Path;

use anyhow::Result;
use chrono::{Duration, Local, NaiveDate, Utc};

use crate::store;
use crate::task::Task;

/// In-memory store of all tasks, in insertion (= id) order.
#[derive(Debug)]
pub struct Registry {
    tasks: Vec<Task>,
    next_id: u64,
}

impl Registry {
    pub fn new() -> Self {
        Registry {
            tasks: Vec::new(),
            next_id: 1,
        }
    }

    /// Create a task and return its id. Ids start at 1 and are never reused.
    pub fn add(
        &mut self,
        description: String,
        due: NaiveDate,
        priority: u8,
        platform: String,
        assignee: String,
        status: String,
    ) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        println!("Task '{}' for platform '{}' added.", description, platform);
        self.tasks.push(Task {
            id,
            description,
            is_completed: false,
            due,
            priority,
            platform,
            assignee,
            status,
            start_time: Utc::now(),
            end_time: None,
            total_time_spent: None,
            attachments: Vec::new(),
            comments: Vec::new(),
            test_cases: Vec::new(),
        });
        id
    }

    /// Mark a task completed and record its elapsed time.
    pub fn complete(&mut self, id: u64) {
        match self.get_mut(id) {
            Some(task) => {
                let end = Utc::now();
                task.is_completed = true;
                task.end_time = Some(end);
                task.total_time_spent = Some(end - task.start_time);
                println!("Task '{}' marked as completed.", task.description);
            }
            None => println!("Task with ID {id} not found."),
        }
    }

    pub fn add_attachment(&mut self, id: u64, path: String) {
        match self.get_mut(id) {
            Some(task) => {
                task.attachments.push(path);
                println!("Attachment added to Task ID {id}.");
            }
            None => println!("Task with ID {id} not found."),
        }
    }

    pub fn add_comment(&mut self, id: u64, comment: String) {
        match self.get_mut(id) {
            Some(task) => {
                task.comments.push(comment);
                println!("Comment added to Task ID {id}.");
            }
            None => println!("Task with ID {id} not found."),
        }
    }

    pub fn add_test_case(&mut self, id: u64, test_case: String) {
        match self.get_mut(id) {
            Some(task) => {
                task.test_cases.push(test_case);
                println!("Test case added to Task ID {id}.");
            }
            None => println!("Task with ID {id} not found."),
        }
    }

    /// Every task, in insertion order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Tasks not yet completed, in insertion order.
    pub fn incomplete(&self) -> Vec<&Task> {
        self.tasks.iter().filter(|t| !t.is_completed).collect()
    }

    /// Get a task by ID.
    pub fn get(&self, id: u64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    fn get_mut(&mut self, id: u64) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    /// Print every task, including completion state and time spent.
    pub fn list_all(&self) {
        println!("All Tasks:");
        print_table(&self.tasks.iter().collect::<Vec<_>>(), true);
    }

    /// Print pending tasks. Time spent is omitted; it is not meaningful yet.
    pub fn list_incomplete(&self) {
        println!("Incomplete Tasks:");
        print_table(&self.incomplete(), false);
    }

    /// Serialize the whole collection to `path`, replacing any existing file.
    pub fn save(&self, path: &Path) -> Result<()> {
        store::write_tasks(path, &self.tasks)?;
        println!("Tasks saved to file: {}", path.display());
        Ok(())
    }

    /// Replace the collection with the contents of `path`.
    ///
    /// A missing file is a notice, not an error, and leaves the registry
    /// untouched. A malformed file fails the load before any state changes.
    pub fn load(&mut self, path: &Path) -> Result<()> {
        if !path.exists() {
            println!("File not found: {}", path.display());
            return Ok(());
        }
        let tasks = store::read_tasks(path)?;
        // Ids assigned after a load continue past the highest loaded id.
        self.next_id = tasks.iter().map(|t| t.id).max().unwrap_or(0) + 1;
        self.tasks = tasks;
        println!("Tasks loaded from file: {}", path.display());
        Ok(())
    }
}

impl Default for Registry {
    fn default() -> Self {
        Registry::new()
    }
}

/// Print tasks in a formatted table.
pub fn print_table(tasks: &[&Task], with_time: bool) {
    if with_time {
        println!(
            "{:<5} {:<4} {:<10} {:<10} {:<12} {:<12} {:<5} {:<8} {}",
            "ID", "Pri", "Due", "Platform", "Assignee", "Status", "Done", "Time", "Description"
        );
    } else {
        println!(
            "{:<5} {:<4} {:<10} {:<10} {:<12} {:<12} {}",
            "ID", "Pri", "Due", "Platform", "Assignee", "Status", "Description"
        );
    }
    let today = Local::now().date_naive();
    for t in tasks {
        let due = format_due_relative(t.due, today);
        if with_time {
            println!(
                "{:<5} {:<4} {:<10} {:<10} {:<12} {:<12} {:<5} {:<8} {}",
                t.id,
                t.priority,
                due,
                truncate(&t.platform, 10),
                truncate(&t.assignee, 12),
                truncate(&t.status, 12),
                if t.is_completed { "yes" } else { "no" },
                format_time_spent(t.total_time_spent),
                t.description
            );
        } else {
            println!(
                "{:<5} {:<4} {:<10} {:<10} {:<12} {:<12} {}",
                t.id,
                t.priority,
                due,
                truncate(&t.platform, 10),
                truncate(&t.assignee, 12),
                truncate(&t.status, 12),
                t.description
            );
        }
    }
}

/// Format a due date relative to today ("today", "tomorrow", "in 3d", "2d late").
pub fn format_due_relative(due: NaiveDate, today: NaiveDate) -> String {
    let days = (due - today).num_days();
    match days {
        0 => "today".into(),
        1 => "tomorrow".into(),
        d if d > 1 => format!("in {d}d"),
        d => format!("{}d late", -d),
    }
}

/// Format elapsed time as a compact human-readable string, or "-" if absent.
pub fn format_time_spent(spent: Option<Duration>) -> String {
    let Some(spent) = spent else {
        return "-".into();
    };
    let secs = spent.num_seconds();
    let (h, m, s) = (secs / 3600, secs % 3600 / 60, secs % 60);
    if h > 0 {
        format!("{h}h{m:02}m")
    } else if m > 0 {
        format!("{m}m{s:02}s")
    } else {
        format!("{s}s")
    }
}

/// Truncate a string to a maximum width, adding ellipsis if needed.
fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut out = String::new();
        for (i, ch) in s.chars().enumerate() {
            if i + 1 >= width {
                out.push('…');
                break;
            }
            out.push(ch);
        }
        out
    }
}
