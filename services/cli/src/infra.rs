use harmony::assessment::ResponseEntry;
use harmony::error::AppError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::Path;

/// Response payloads are accepted bare or wrapped as `{ "responses": [...] }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ResponsesFile {
    Wrapped { responses: Vec<ResponseEntry> },
    Bare(Vec<ResponseEntry>),
}

impl ResponsesFile {
    pub(crate) fn into_entries(self) -> Vec<ResponseEntry> {
        match self {
            ResponsesFile::Wrapped { responses } | ResponsesFile::Bare(responses) => responses,
        }
    }
}

pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, AppError> {
    let file = File::open(path)?;
    let value = serde_json::from_reader(BufReader::new(file))?;
    Ok(value)
}

pub(crate) fn write_json<T: Serialize>(value: &T, pretty: bool) -> Result<(), AppError> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    if pretty {
        serde_json::to_writer_pretty(&mut handle, value)?;
    } else {
        serde_json::to_writer(&mut handle, value)?;
    }
    writeln!(handle)?;
    Ok(())
}

/// Parses one demo answer on the baseline -1 / 0 / +1 scale.
pub(crate) fn parse_answer_value(raw: &str) -> Result<i32, String> {
    let trimmed = raw.trim();
    let value = trimmed
        .trim_start_matches('+')
        .parse::<i32>()
        .map_err(|err| format!("failed to parse '{trimmed}' as an answer value ({err})"))?;
    if (-1..=1).contains(&value) {
        Ok(value)
    } else {
        Err(format!("answer value {value} is outside the -1..=1 scale"))
    }
}
