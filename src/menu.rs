//! Interactive menu shell.
//!
//! A numbered menu on stdin drives the registry. The menu selection itself is
//! forgiving (anything unrecognised redisplays the menu); the prompts behind
//! it trust their input, so an unparsable date or number aborts the run.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use chrono::{Duration, Local, NaiveDate};

use crate::registry::Registry;

/// Run the menu loop until the user exits or stdin closes.
///
/// `default_db`, when given, is offered whenever a save/load prompt is left
/// blank.
pub fn run(registry: &mut Registry, default_db: Option<&Path>) -> Result<()> {
    loop {
        print_menu();
        let Some(line) = read_line()? else {
            // stdin closed
            return Ok(());
        };
        let Ok(option) = line.trim().parse::<u32>() else {
            println!("Invalid option.");
            continue;
        };
        match option {
            1 => add_task(registry)?,
            2 => complete_task(registry)?,
            3 => registry.list_all(),
            4 => registry.list_incomplete(),
            5 => {
                let path = prompt_path("Enter file path to save tasks", default_db)?;
                registry.save(&path)?;
            }
            6 => {
                let path = prompt_path("Enter file path to load tasks", default_db)?;
                registry.load(&path)?;
            }
            7 => {
                let id = prompt_id("Enter task ID to add attachment: ")?;
                let attachment = prompt("Enter attachment file path: ")?;
                registry.add_attachment(id, attachment);
            }
            8 => {
                let id = prompt_id("Enter task ID to add comment: ")?;
                let comment = prompt("Enter comment: ")?;
                registry.add_comment(id, comment);
            }
            9 => {
                let id = prompt_id("Enter task ID to add test case: ")?;
                let test_case = prompt("Enter test case: ")?;
                registry.add_test_case(id, test_case);
            }
            10 => return Ok(()),
            _ => println!("Invalid option."),
        }
    }
}

fn print_menu() {
    println!();
    println!("Choose an option:");
    println!("1. Add Task");
    println!("2. Mark Task as Completed");
    println!("3. View All Tasks");
    println!("4. View Incomplete Tasks");
    println!("5. Save Tasks to File");
    println!("6. Load Tasks from File");
    println!("7. Add Attachment to Task");
    println!("8. Add Comment to Task");
    println!("9. Add Test Case to Task");
    println!("10. Exit");
}

fn add_task(registry: &mut Registry) -> Result<()> {
    let description = prompt("Enter task description: ")?;
    let due_raw = prompt("Enter task due date (YYYY-MM-DD): ")?;
    let due = parse_due_input(&due_raw)
        .ok_or_else(|| anyhow!("unrecognised due date '{due_raw}'"))?;
    let priority = prompt("Enter task priority (1 = low, 2 = medium, 3 = high): ")?
        .parse::<u8>()
        .context("invalid priority")?;
    let platform = prompt("Enter platform (e.g., Windows, Linux, macOS): ")?;
    let assignee = prompt("Enter assignee: ")?;
    let status = prompt("Enter status: ")?;
    registry.add(description, due, priority, platform, assignee, status);
    Ok(())
}

fn complete_task(registry: &mut Registry) -> Result<()> {
    let raw = prompt("Enter task ID to mark as completed: ")?;
    match raw.parse::<u64>() {
        Ok(id) => registry.complete(id),
        Err(_) => println!("Invalid task ID."),
    }
    Ok(())
}

fn prompt_id(label: &str) -> Result<u64> {
    prompt(label)?.parse().context("invalid task ID")
}

fn prompt_path(label: &str, default_db: Option<&Path>) -> Result<PathBuf> {
    let raw = match default_db {
        Some(default) => prompt(&format!("{label} [{}]: ", default.display()))?,
        None => prompt(&format!("{label}: "))?,
    };
    if raw.is_empty() {
        match default_db {
            Some(default) => Ok(default.to_path_buf()),
            None => bail!("no file path given"),
        }
    } else {
        Ok(PathBuf::from(raw))
    }
}

fn prompt(label: &str) -> Result<String> {
    print!("{label}");
    io::stdout().flush()?;
    match read_line()? {
        Some(line) => Ok(line.trim().to_string()),
        None => bail!("unexpected end of input"),
    }
}

/// Read one line from stdin; `None` once stdin is closed.
fn read_line() -> Result<Option<String>> {
    let mut buf = String::new();
    let n = io::stdin()
        .read_line(&mut buf)
        .context("failed to read stdin")?;
    if n == 0 {
        return Ok(None);
    }
    Ok(Some(buf.trim_end_matches(['\r', '\n']).to_string()))
}

/// Parse due date input: "today", "tomorrow", "in 3d", or `YYYY-MM-DD`.
pub fn parse_due_input(s: &str) -> Option<NaiveDate> {
    let s = s.trim().to_lowercase();
    let today = Local::now().date_naive();

    match s.as_str() {
        "today" => return Some(today),
        "tomorrow" => return Some(today + Duration::days(1)),
        _ => {}
    }

    if let Some(rest) = s.strip_prefix("in ") {
        if let Some(n) = rest.strip_suffix('d') {
            if let Ok(days) = n.trim().parse::<i64>() {
                return Some(today + Duration::days(days));
            }
        }
    }

    NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_iso_dates() {
        assert_eq!(
            parse_due_input("2024-03-15"),
            NaiveDate::from_ymd_opt(2024, 3, 15)
        );
    }

    #[test]
    fn parses_relative_forms() {
        let today = Local::now().date_naive();
        assert_eq!(parse_due_input("today"), Some(today));
        assert_eq!(parse_due_input("Tomorrow"), Some(today + Duration::days(1)));
        assert_eq!(parse_due_input("in 3d"), Some(today + Duration::days(3)));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_due_input("soonish"), None);
        assert_eq!(parse_due_input("15/03/2024"), None);
    }
}
