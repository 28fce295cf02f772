use calamine::DataType;

use crate::survey::{
    io_common::{
        assemble_response, find_timestamp_column, get_col_index_mapping,
        get_optional_col_index_mapping, make_default_id,
    },
    *,
};

/// Reads the responses downloaded from Microsoft Forms or Google Forms in the
/// Excel (.xlsx) format.
///
/// The first row holds the questions. Each item of the catalog is expected to be
/// a question of the form, with the statement as its title.
pub fn read_msforms_responses(
    path: &str,
    cfs: &ResponseSource,
    survey: &Survey,
) -> SResult<Vec<ParsedResponse>> {
    let default_id = make_default_id(path);

    let wrange = get_range(path, cfs)?;

    let mut iter = wrange.rows();
    let header: Vec<Option<String>> = iter
        .next()
        .context(EmptyExcelSnafu { path })?
        .iter()
        .map(|dt| match dt {
            DataType::String(s) => Some(s.clone()),
            _ => None,
        })
        .collect();
    debug!("read_msforms_responses: header: {:?}", header);

    let item_cols = get_col_index_mapping(&survey.catalog.statements(), &header)?;
    let demographic_names: Vec<String> = survey
        .schema
        .demographics()
        .iter()
        .map(|f| f.name.clone())
        .collect();
    let demographic_cols = get_optional_col_index_mapping(&demographic_names, &header);
    let timestamp_idx = find_timestamp_column(&cfs.timestamp_column, &header)?;
    // Microsoft Forms always exports an ID column.
    let id_name = cfs.id_column.clone().unwrap_or_else(|| "ID".to_string());
    let id_idx = get_optional_col_index_mapping(&[id_name], &header)
        .first()
        .and_then(|p| p.0);

    let mut res: Vec<ParsedResponse> = Vec::new();
    for (idx, row) in iter.enumerate() {
        let lineno = idx + 2;
        let mut cells: Vec<String> = Vec::with_capacity(row.len());
        for cell in row.iter() {
            cells.push(read_cell(cell, lineno)?);
        }
        if cells.iter().all(|s| s.trim().is_empty()) {
            continue;
        }
        let id = id_idx
            .and_then(|i| cells.get(i))
            .filter(|s| !s.is_empty())
            .cloned()
            .unwrap_or_else(|| default_id(lineno));
        let pr = assemble_response(id, &cells, timestamp_idx, &demographic_cols, &item_cols);
        debug!("read_msforms_responses: lineno: {} response: {:?}", lineno, pr);
        res.push(pr);
    }
    Ok(res)
}

fn read_cell(cell: &DataType, lineno: usize) -> SResult<String> {
    match cell {
        DataType::String(s) => Ok(s.clone()),
        DataType::Empty => Ok("".to_string()),
        DataType::Int(i) => Ok(i.to_string()),
        DataType::Float(f) => Ok(f.to_string()),
        DataType::Bool(b) => Ok(b.to_string()),
        DataType::Error(_) => ExcelWrongCellTypeSnafu {
            lineno,
            content: format!("{:?}", cell),
        }
        .fail(),
        // Dates are kept in their serial form.
        _ => Ok(cell.to_string()),
    }
}

fn get_range(path: &str, cfs: &ResponseSource) -> SResult<calamine::Range<DataType>> {
    let worksheet_name_o = cfs.excel_worksheet_name.clone();
    debug!(
        "get_range: path: {:?} worksheet: {:?}",
        path, &worksheet_name_o
    );
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;

    // A worksheet name was provided, use it.
    if let Some(worksheet_name) = worksheet_name_o {
        let wrange = workbook
            .worksheet_range(&worksheet_name)
            .context(MissingWorksheetSnafu {
                path,
                worksheet_name: worksheet_name.clone(),
            })?
            .context(OpeningExcelSnafu { path })?;
        Ok(wrange)
    } else {
        let all_worksheets = workbook.worksheets();
        match all_worksheets.as_slice() {
            [] => EmptyExcelSnafu { path }.fail(),
            [(worksheet_name, wrange)] => {
                debug!("get_range: path: {:?} worksheet: {:?}", path, worksheet_name);
                Ok(wrange.clone())
            }
            _ => whatever!(
                "{}: too many worksheets, the worksheet name must be provided",
                path
            ),
        }
    }
}
