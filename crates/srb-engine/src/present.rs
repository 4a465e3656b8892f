//! Presentation adapter: query output as table rows.
//!
//! An empty result always renders as exactly one placeholder row.

use serde::Serialize;
use srb_common::{Result, SrbError};

use crate::mutation::{Added, Deleted, Updated};
use crate::query::QueryOutput;

pub const NO_DATA: &str = "No data found";
pub const NOT_FOUND: &str = "Not found";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DisplayRow {
    Cells { cells: Vec<String> },
    Placeholder { text: String, colspan: usize },
}

impl DisplayRow {
    fn cells(cells: Vec<String>) -> Self {
        DisplayRow::Cells { cells }
    }
}

/// Column headers of a query's result table.
pub fn headers(output: &QueryOutput) -> &'static [&'static str] {
    match output {
        QueryOutput::CountrySeries(_) => &["Year", "SRB"],
        QueryOutput::SubRegionRanking(_) => &["Rank", "Country", "SRB"],
        QueryOutput::RegionMax(_) => &["Sub-region", "Max SRB"],
        QueryOutput::NameSearch(_) => &["Country (Year)", "SRB"],
    }
}

pub fn rows(output: &QueryOutput) -> Vec<DisplayRow> {
    let rows: Vec<DisplayRow> = match output {
        QueryOutput::CountrySeries(rows) => rows
            .iter()
            .map(|r| DisplayRow::cells(vec![r.year.to_string(), r.value.to_string()]))
            .collect(),
        QueryOutput::SubRegionRanking(rows) => rows
            .iter()
            .map(|r| DisplayRow::cells(vec![r.rank.to_string(), r.country.clone(), r.value.to_string()]))
            .collect(),
        QueryOutput::RegionMax(rows) => rows
            .iter()
            .map(|r| DisplayRow::cells(vec![r.sub_region.clone(), r.max_value.to_string()]))
            .collect(),
        QueryOutput::NameSearch(rows) => rows
            .iter()
            .map(|r| DisplayRow::cells(vec![format!("{} ({})", r.name, r.year), r.value.to_string()]))
            .collect(),
    };

    if !rows.is_empty() {
        return rows;
    }
    let text = match output {
        QueryOutput::NameSearch(_) => NOT_FOUND,
        _ => NO_DATA,
    };
    vec![DisplayRow::Placeholder { text: text.to_string(), colspan: headers(output).len() }]
}

/// `<tr>` rows for a `<tbody>`.
pub fn to_html(rows: &[DisplayRow]) -> String {
    rows.iter()
        .map(|row| match row {
            DisplayRow::Cells { cells } => {
                let tds: String = cells.iter().map(|c| format!("<td>{}</td>", escape_html(c))).collect();
                format!("<tr>{}</tr>", tds)
            }
            DisplayRow::Placeholder { text, colspan } => {
                format!(r#"<tr><td colspan="{}">{}</td></tr>"#, colspan, escape_html(text))
            }
        })
        .collect()
}

/// Tab-separated lines, one per row.
pub fn to_text(rows: &[DisplayRow]) -> String {
    rows.iter()
        .map(|row| match row {
            DisplayRow::Cells { cells } => cells.join("\t"),
            DisplayRow::Placeholder { text, .. } => text.clone(),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

// ── Notices ──────────────────────────────────────────────────────────────────

/// The single user-visible notification an operation ends with.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notice {
    pub ok: bool,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self { ok: true, message: message.into() }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self { ok: false, message: message.into() }
    }

    pub fn from_error(err: &SrbError) -> Self {
        match err {
            SrbError::Load(_) => Self::failure("Error loading data from database. Check console for details."),
            SrbError::NotFound { .. } => Self::failure("Record not found."),
            SrbError::Validation(_) | SrbError::RemoteCall(_) => Self::failure(err.to_string()),
            _ => Self::failure("Error connecting to server."),
        }
    }

    pub fn added(result: &Result<Added>) -> Self {
        match result {
            Ok(a) => Self::success(format!(
                "Added successfully: {} - {}",
                a.country_name, a.observation.year
            )),
            Err(e) => Self::from_error(e),
        }
    }

    pub fn updated(result: &Result<Updated>) -> Self {
        match result {
            Ok(u) if u.mirror_patched => Self::success("Updated successfully"),
            Ok(_) => Self::success("Updated successfully. Local data is out of date, reload to refresh."),
            Err(e) => Self::from_error(e),
        }
    }

    pub fn deleted(result: &Result<Deleted>) -> Self {
        match result {
            Ok(d) => {
                let count = match d.affected_rows {
                    Some(n) if n > 0 => n.to_string(),
                    _ => "selected".to_string(),
                };
                Self::success(format!("Deleted {} record(s).", count))
            }
            Err(e) => Self::from_error(e),
        }
    }
}
