// Primitives for reading responses exported as CSV files.

use crate::survey::{
    io_common::{
        assemble_response, find_timestamp_column, get_col_index_mapping,
        get_optional_col_index_mapping, make_default_id,
    },
    *,
};

/// Reads a CSV file whose first row names the columns.
///
/// Columns are found by name, so their order does not matter and extra columns
/// are ignored. Every statement of the catalog must have a column.
pub fn read_csv_responses(
    path: &str,
    cfs: &ResponseSource,
    survey: &Survey,
) -> SResult<Vec<ParsedResponse>> {
    let default_id = make_default_id(path);

    let rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .context(CsvOpenSnafu { path })?;
    let mut records = rdr.into_records();

    let header: Vec<Option<String>> = match records.next() {
        Some(line_r) => line_r
            .context(CsvLineParseSnafu { lineno: 1_usize })?
            .iter()
            .map(|s| Some(s.to_string()))
            .collect(),
        None => return Ok(Vec::new()),
    };
    debug!("read_csv_responses: header: {:?}", header);

    let item_cols = get_col_index_mapping(&survey.catalog.statements(), &header)?;
    let demographic_names: Vec<String> = survey
        .schema
        .demographics()
        .iter()
        .map(|f| f.name.clone())
        .collect();
    let demographic_cols = get_optional_col_index_mapping(&demographic_names, &header);
    let timestamp_idx = find_timestamp_column(&cfs.timestamp_column, &header)?;
    let id_idx = match &cfs.id_column {
        Some(name) => Some(
            get_col_index_mapping(&[name.clone()], &header)?
                .first()
                .map(|p| p.0)
                .context(MissingColumnSnafu { column_name: name })?,
        ),
        None => None,
    };

    let mut res: Vec<ParsedResponse> = Vec::new();
    for (idx, line_r) in records.enumerate() {
        // The header is the first line.
        let lineno = idx + 2;
        let line = line_r.context(CsvLineParseSnafu { lineno })?;
        let cells: Vec<String> = line.iter().map(|s| s.to_string()).collect();
        if cells.iter().all(|s| s.trim().is_empty()) {
            debug!("read_csv_responses: skipping empty line {}", lineno);
            continue;
        }
        let id = match id_idx {
            Some(i) => cells
                .get(i)
                .cloned()
                .context(CsvLineTooShortSnafu { lineno })?,
            None => default_id(lineno),
        };
        let pr = assemble_response(id, &cells, timestamp_idx, &demographic_cols, &item_cols);
        debug!("read_csv_responses: lineno: {} response: {:?}", lineno, pr);
        res.push(pr);
    }
    Ok(res)
}
