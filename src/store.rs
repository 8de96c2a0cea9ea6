//! Flat-file persistence for the task collection.
//!
//! Each task occupies four lines:
//!
//! ```text
//! id,description,is_completed,due,priority,platform,assignee,status,start,end,time_spent
//! attachment1;attachment2;...
//! comment1;comment2;...
//! test_case1;test_case2;...
//! ```
//!
//! Field encodings are fixed: due dates are `%Y-%m-%d`, timestamps are
//! RFC 3339 in UTC, elapsed time is integer seconds, and the end/elapsed
//! fields of an incomplete task are the placeholder `-`.
//!
//! Separators are not escaped: a `,` inside a text field or a `;` inside a
//! list entry corrupts the record, and the loader fails on the resulting
//! field-count mismatch. An empty list is written as a blank line and reads
//! back as a single empty entry.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::task::Task;

const HEADER_FIELDS: usize = 11;
const DATE_FORMAT: &str = "%Y-%m-%d";
const ABSENT: &str = "-";

/// Serialize every task to `path`, overwriting any existing file.
pub fn write_tasks(path: &Path, tasks: &[Task]) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    let mut w = BufWriter::new(file);
    for task in tasks {
        writeln!(w, "{}", encode_header(task))?;
        writeln!(w, "{}", task.attachments.join(";"))?;
        writeln!(w, "{}", task.comments.join(";"))?;
        writeln!(w, "{}", task.test_cases.join(";"))?;
    }
    w.flush()?;
    Ok(())
}

/// Parse the whole file back into tasks, in file order.
///
/// All-or-nothing: any malformed record fails the load and nothing is
/// returned.
pub fn read_tasks(path: &Path) -> Result<Vec<Task>> {
    let file = File::open(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    let lines: Vec<String> = BufReader::new(file)
        .lines()
        .collect::<std::io::Result<_>>()
        .with_context(|| format!("failed to read {}", path.display()))?;

    if lines.len() % 4 != 0 {
        bail!(
            "truncated task file {}: {} lines, expected a multiple of 4",
            path.display(),
            lines.len()
        );
    }

    let mut tasks = Vec::with_capacity(lines.len() / 4);
    for (record, chunk) in lines.chunks(4).enumerate() {
        let line_no = record * 4 + 1;
        let mut task = parse_header(&chunk[0])
            .with_context(|| format!("{}:{}", path.display(), line_no))?;
        task.attachments = parse_list(&chunk[1]);
        task.comments = parse_list(&chunk[2]);
        task.test_cases = parse_list(&chunk[3]);
        tasks.push(task);
    }
    Ok(tasks)
}

fn encode_header(task: &Task) -> String {
    format!(
        "{},{},{},{},{},{},{},{},{},{},{}",
        task.id,
        task.description,
        task.is_completed,
        task.due.format(DATE_FORMAT),
        task.priority,
        task.platform,
        task.assignee,
        task.status,
        task.start_time.to_rfc3339(),
        task.end_time
            .map(|t| t.to_rfc3339())
            .unwrap_or_else(|| ABSENT.to_string()),
        task.total_time_spent
            .map(|d| d.num_seconds().to_string())
            .unwrap_or_else(|| ABSENT.to_string()),
    )
}

fn parse_header(line: &str) -> Result<Task> {
    let fields: Vec<&str> = line.split(',').collect();
    if fields.len() != HEADER_FIELDS {
        bail!(
            "expected {} comma-separated fields, found {}",
            HEADER_FIELDS,
            fields.len()
        );
    }
    Ok(Task {
        id: fields[0]
            .parse()
            .with_context(|| format!("invalid task id '{}'", fields[0]))?,
        description: fields[1].to_string(),
        is_completed: fields[2]
            .parse()
            .with_context(|| format!("invalid completion flag '{}'", fields[2]))?,
        due: NaiveDate::parse_from_str(fields[3], DATE_FORMAT)
            .with_context(|| format!("invalid due date '{}'", fields[3]))?,
        priority: fields[4]
            .parse()
            .with_context(|| format!("invalid priority '{}'", fields[4]))?,
        platform: fields[5].to_string(),
        assignee: fields[6].to_string(),
        status: fields[7].to_string(),
        start_time: parse_timestamp(fields[8])?,
        end_time: match fields[9] {
            ABSENT => None,
            s => Some(parse_timestamp(s)?),
        },
        total_time_spent: match fields[10] {
            ABSENT => None,
            s => {
                let secs: i64 = s
                    .parse()
                    .with_context(|| format!("invalid time spent '{s}'"))?;
                Some(Duration::seconds(secs))
            }
        },
        attachments: Vec::new(),
        comments: Vec::new(),
        test_cases: Vec::new(),
    })
}

fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
    let t = DateTime::parse_from_rfc3339(s)
        .with_context(|| format!("invalid timestamp '{s}'"))?;
    Ok(t.with_timezone(&Utc))
}

fn parse_list(line: &str) -> Vec<String> {
    // Splitting a blank line yields one empty entry; existing files rely on
    // that round-trip, so it is kept as-is.
    line.split(';').map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_task(id: u64) -> Task {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
        Task {
            id,
            description: format!("Task {id}"),
            is_completed: false,
            due: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            priority: 2,
            platform: "Linux".to_string(),
            assignee: "alice".to_string(),
            status: "open".to_string(),
            start_time: start,
            end_time: None,
            total_time_spent: None,
            attachments: Vec::new(),
            comments: Vec::new(),
            test_cases: Vec::new(),
        }
    }

    #[test]
    fn round_trips_all_fields() {
        let mut completed = sample_task(1);
        completed.is_completed = true;
        completed.end_time = Some(completed.start_time + Duration::seconds(4500));
        completed.total_time_spent = Some(Duration::seconds(4500));
        completed.attachments = vec!["design.png".to_string(), "notes.txt".to_string()];
        completed.comments = vec!["looks good".to_string()];
        completed.test_cases = vec!["boots on arm64".to_string()];
        let pending = sample_task(2);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.txt");
        write_tasks(&path, &[completed.clone(), pending.clone()]).unwrap();
        let loaded = read_tasks(&path).unwrap();

        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].id, 1);
        assert_eq!(loaded[0].description, "Task 1");
        assert!(loaded[0].is_completed);
        assert_eq!(loaded[0].due, completed.due);
        assert_eq!(loaded[0].priority, 2);
        assert_eq!(loaded[0].platform, "Linux");
        assert_eq!(loaded[0].assignee, "alice");
        assert_eq!(loaded[0].status, "open");
        assert_eq!(loaded[0].start_time, completed.start_time);
        assert_eq!(loaded[0].end_time, completed.end_time);
        assert_eq!(loaded[0].total_time_spent, completed.total_time_spent);
        assert_eq!(loaded[0].attachments, completed.attachments);
        assert_eq!(loaded[0].comments, completed.comments);
        assert_eq!(loaded[0].test_cases, completed.test_cases);
        assert_eq!(loaded[1].id, 2);
        assert!(!loaded[1].is_completed);
        assert_eq!(loaded[1].end_time, None);
        assert_eq!(loaded[1].total_time_spent, None);
    }

    #[test]
    fn empty_lists_read_back_as_one_blank_entry() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.txt");
        write_tasks(&path, &[sample_task(1)]).unwrap();
        let loaded = read_tasks(&path).unwrap();
        assert_eq!(loaded[0].attachments, vec![String::new()]);
        assert_eq!(loaded[0].comments, vec![String::new()]);
        assert_eq!(loaded[0].test_cases, vec![String::new()]);
    }

    #[test]
    fn rejects_wrong_field_count() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.txt");
        std::fs::write(&path, "1,only,three\n\n\n\n").unwrap();
        let err = read_tasks(&path).unwrap_err();
        assert!(err.to_string().contains("tasks.txt:1"));
    }

    #[test]
    fn rejects_unparsable_date() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.txt");
        let mut task = sample_task(1);
        task.description = "ok".to_string();
        write_tasks(&path, &[task]).unwrap();
        let corrupted = std::fs::read_to_string(&path)
            .unwrap()
            .replace("2024-02-01", "02/01/2024");
        std::fs::write(&path, corrupted).unwrap();
        assert!(read_tasks(&path).is_err());
    }

    #[test]
    fn rejects_truncated_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.txt");
        write_tasks(&path, &[sample_task(1)]).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        let truncated: String = contents.lines().take(3).collect::<Vec<_>>().join("\n");
        std::fs::write(&path, truncated).unwrap();
        assert!(read_tasks(&path).is_err());
    }
}
