use chrono::prelude::*;
use directories::ProjectDirs;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

const HEADER: &str = "date,dataset,label,observations,mean,variance,passed";

/// outcome of one `check` run
#[derive(Clone, Debug, PartialEq)]
pub struct Entry {
    pub dataset: String,
    pub label: String,
    pub observations: usize,
    pub mean: f64,
    pub variance: f64,
    pub passed: bool,
}

pub fn log_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "pmfstats").map(|dirs| dirs.config_dir().join("log.csv"))
}

pub fn save_results(entry: &Entry) -> io::Result<()> {
    match log_path() {
        Some(path) => append(&path, entry),
        None => Ok(()),
    }
}

pub fn append(log_path: &Path, entry: &Entry) -> io::Result<()> {
    if let Some(dir) = log_path.parent() {
        std::fs::create_dir_all(dir)?;
    }

    // a fresh file needs a header
    let needs_header = !log_path.exists();

    let mut log_file = OpenOptions::new()
        .append(true)
        .create(true)
        .open(log_path)?;

    if needs_header {
        writeln!(log_file, "{}", HEADER)?;
    }

    let date = Local::now().format("%c").to_string();

    writeln!(log_file, "{}", format_entry(&date, entry))
}

// dataset names come from user files, so quote anything that would split a row
fn csv_field(text: &str) -> String {
    if text.contains(|c: char| matches!(c, ',' | '"' | '\n' | '\r')) {
        format!("\"{}\"", text.replace('"', "\"\""))
    } else {
        text.to_string()
    }
}

fn format_entry(date: &str, entry: &Entry) -> String {
    format!(
        "{},{},{},{},{},{},{}",
        date,
        csv_field(&entry.dataset),
        csv_field(&entry.label),
        entry.observations,
        entry.mean,
        entry.variance,
        entry.passed,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry() -> Entry {
        Entry {
            dataset: "nsfg-demo".to_string(),
            label: "live".to_string(),
            observations: 8,
            mean: 37.0,
            variance: 2.0,
            passed: true,
        }
    }

    #[test]
    fn test_format_entry() {
        assert_eq!(
            format_entry("today", &entry()),
            "today,nsfg-demo,live,8,37,2,true"
        );
    }

    #[test]
    fn test_format_entry_quotes_dataset() {
        let entry = Entry {
            dataset: "nsfg, \"cycle 6\"\nfemale".to_string(),
            ..entry()
        };

        assert_eq!(
            format_entry("today", &entry),
            "today,\"nsfg, \"\"cycle 6\"\"\nfemale\",live,8,37,2,true"
        );
        assert_eq!(csv_field("plain"), "plain");
    }

    #[test]
    fn test_append_writes_header_once() {
        let dir = std::env::temp_dir().join(format!("pmfstats-{}", std::process::id()));
        let path = dir.join("log.csv");
        let _ = std::fs::remove_file(&path);

        append(&path, &entry()).unwrap();
        append(&path, &entry()).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines = contents.lines().collect::<Vec<&str>>();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], HEADER);
        assert!(lines[1].ends_with(",nsfg-demo,live,8,37,2,true"));

        let _ = std::fs::remove_dir_all(&dir);
    }
}
