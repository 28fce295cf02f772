use std::collections::HashMap;
use std::path::Path;

use crate::survey::*;

pub fn simplify_file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or(path)
        .to_string()
}

pub fn make_default_id(path: &str) -> impl Fn(usize) -> String {
    let simplified_file_name = simplify_file_name(path);
    move |lineno| format!("{}-{:08}", simplified_file_name, lineno)
}

/// Given the header of a file (names of each of the columns), finds the position
/// of each of the required columns.
pub fn get_col_index_mapping(
    req_col_names: &[String],
    header: &[Option<String>],
) -> SResult<Vec<(usize, String)>> {
    let col_names = header_positions(header);
    debug!("get_col_index_mapping: col_names: {:?}", col_names);

    let mut col_indexes: Vec<(usize, String)> = Vec::new();
    for cname in req_col_names {
        let idx = col_names
            .get(cname.as_str())
            .context(MissingColumnSnafu { column_name: cname })?;
        col_indexes.push((*idx, cname.clone()));
    }
    Ok(col_indexes)
}

/// Same as get_col_index_mapping, but the columns are allowed to be absent.
pub fn get_optional_col_index_mapping(
    col_names: &[String],
    header: &[Option<String>],
) -> Vec<(Option<usize>, String)> {
    let positions = header_positions(header);
    col_names
        .iter()
        .map(|cname| (positions.get(cname.as_str()).cloned(), cname.clone()))
        .collect()
}

/// The column holding the submission time: the configured one, or one of the
/// usual names used by the form providers.
pub fn find_timestamp_column(
    configured: &Option<String>,
    header: &[Option<String>],
) -> SResult<Option<usize>> {
    let positions = header_positions(header);
    if let Some(name) = configured {
        let idx = positions
            .get(name.as_str())
            .context(MissingColumnSnafu { column_name: name })?;
        return Ok(Some(*idx));
    }
    Ok(["Timestamp", "Completion time"]
        .iter()
        .find_map(|name| positions.get(*name).cloned()))
}

fn header_positions(header: &[Option<String>]) -> HashMap<&str, usize> {
    // The first occurrence wins when a name is repeated.
    let mut res: HashMap<&str, usize> = HashMap::new();
    for (idx, x) in header.iter().enumerate() {
        if let Some(s) = x {
            res.entry(s.trim()).or_insert(idx);
        }
    }
    res
}

/// Turns the cells of a row into a response, using the column mappings.
pub fn assemble_response(
    id: String,
    cells: &[String],
    timestamp_idx: Option<usize>,
    demographic_cols: &[(Option<usize>, String)],
    item_cols: &[(usize, String)],
) -> ParsedResponse {
    let timestamp = timestamp_idx
        .and_then(|idx| cells.get(idx))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());
    let demographics: Vec<(String, String)> = demographic_cols
        .iter()
        .filter_map(|(idx_o, name)| {
            idx_o
                .and_then(|idx| cells.get(idx))
                .map(|s| (name.clone(), s.clone()))
        })
        .collect();
    // Blank cells are unanswered items.
    let answers: Vec<(String, String)> = item_cols
        .iter()
        .filter_map(|(idx, statement)| {
            cells
                .get(*idx)
                .filter(|s| !s.trim().is_empty())
                .map(|s| (statement.clone(), s.trim().to_string()))
        })
        .collect();
    ParsedResponse {
        id: Some(id),
        timestamp,
        demographics,
        answers,
    }
}
