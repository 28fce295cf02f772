use log::{debug, info, warn};

use likert_survey::builder::SubmissionBuilder;
use likert_survey::catalog::ItemCatalog;
use likert_survey::scale::ScaleDefinition;
use likert_survey::*;
use snafu::{prelude::*, Snafu};

use std::fs;
use std::path::{Path, PathBuf};

use calamine::{open_workbook, Reader, Xlsx};

use serde_json::json;
use serde_json::Map as JSMap;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::survey::config_reader::*;
use crate::survey::io_sheet::{CsvSheet, RowStore};

pub mod chart;
pub mod config_reader;
pub mod io_common;
pub mod io_csv;
pub mod io_json;
pub mod io_msforms;
pub mod io_sheet;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum SurveyError {
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON file {path}"))]
    ParsingJson {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("Error writing JSON"))]
    WritingJson { source: serde_json::Error },
    #[snafu(display("Error writing file {path}"))]
    WritingSummary {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error opening Excel file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("Excel file {path} has no content"))]
    EmptyExcel { path: String },
    #[snafu(display("Excel file {path} has no worksheet {worksheet_name}"))]
    MissingWorksheet {
        path: String,
        worksheet_name: String,
    },
    #[snafu(display("Line {lineno}: cannot read cell {content}"))]
    ExcelWrongCellType { lineno: usize, content: String },
    #[snafu(display("Error opening CSV file {path}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Line {lineno}: cannot parse CSV record"))]
    CsvLineParse { source: csv::Error, lineno: usize },
    #[snafu(display("Line {lineno}: line is too short"))]
    CsvLineTooShort { lineno: usize },
    #[snafu(display("Cannot find column {column_name:?} in the header"))]
    MissingColumn { column_name: String },
    #[snafu(display("The configuration file has no parent directory"))]
    MissingParentDir {},
    #[snafu(display("Invalid survey definition"))]
    InvalidDefinition { source: SurveyErrors },
    #[snafu(display("Response {response_id}: cannot be recorded"))]
    Response {
        source: SurveyErrors,
        response_id: String,
    },
    #[snafu(display(
        "The header of {path} differs at column {column}: expected {expected:?}, found {found:?}"
    ))]
    HeaderMismatch {
        path: String,
        column: usize,
        expected: Option<String>,
        found: Option<String>,
    },
    #[snafu(display("Error writing to the sheet {path}"))]
    SheetCsv { source: csv::Error, path: String },
    #[snafu(display("Could not append to {path} the row: {row}"))]
    AppendRow {
        source: csv::Error,
        path: String,
        row: String,
    },
    #[snafu(display("Error writing chart {path}"))]
    WritingChart {
        source: std::io::Error,
        path: String,
    },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type SResult<T> = Result<T, SurveyError>;

/// A response, as read from a form export.
/// This is before decoding the labels and checking for completeness.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ParsedResponse {
    pub id: Option<String>,
    pub timestamp: Option<String>,
    /// (field name, raw value)
    pub demographics: Vec<(String, String)>,
    /// (statement, selected label)
    pub answers: Vec<(String, String)>,
}

/// The options of one run, from the command line.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct RunSettings {
    pub config_path: String,
    pub reference_path: Option<String>,
    pub summary_path: Option<String>,
    pub sheet_path: Option<String>,
    pub input_path: Option<String>,
    pub input_type: Option<String>,
    pub chart_dir: Option<String>,
    pub excel_worksheet_name: Option<String>,
    pub dry_run: bool,
}

struct RecordedResponse {
    id: String,
    processed: ProcessedSubmission,
}

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn validate_scale(settings: &ScaleSettings) -> SResult<ScaleDefinition> {
    match (settings.preset.as_deref(), &settings.labels) {
        (Some(_), Some(_)) => {
            whatever!("scale: either a preset or labels must be given, not both")
        }
        (Some("agreement5"), None) => Ok(ScaleDefinition::agreement_five_points()),
        (Some("numeric7"), None) => Ok(ScaleDefinition::numeric_seven_points()),
        (Some(x), None) => whatever!("unknown scale preset: {}", x),
        (None, Some(labels)) => {
            ScaleDefinition::new(labels, settings.encoding()?).context(InvalidDefinitionSnafu {})
        }
        (None, None) => whatever!("scale: a preset or labels must be given"),
    }
}

fn validate_catalog(config: &SurveyConfig) -> SResult<ItemCatalog> {
    match (config.item_preset.as_deref(), &config.items) {
        (Some("nationalIdentity"), None) => Ok(ItemCatalog::national_identity()),
        (Some(x), None) => whatever!("unknown item preset: {}", x),
        (None, Some(items)) => {
            let items: Vec<LikertItem> = items
                .iter()
                .map(|i| LikertItem::new(i.trait_name.as_deref(), &i.statement))
                .collect();
            ItemCatalog::new(items).context(InvalidDefinitionSnafu {})
        }
        _ => whatever!("exactly one of itemPreset or items must be given"),
    }
}

fn validate_survey(config: &SurveyConfig) -> SResult<Survey> {
    let scale = validate_scale(&config.scale)?;
    let catalog = validate_catalog(config)?;
    let mut demographics: Vec<DemographicField> = Vec::new();
    for d in config.demographics.iter() {
        demographics.push(d.field()?);
    }
    Survey::new(catalog, scale, demographics).context(InvalidDefinitionSnafu {})
}

fn read_responses(
    root_path: &Path,
    cfs: &ResponseSource,
    survey: &Survey,
) -> SResult<Vec<ParsedResponse>> {
    let p: PathBuf = root_path.join(&cfs.file_path);
    let p2 = p.as_path().display().to_string();
    info!("Attempting to read responses file {:?}", p2);
    let responses = match cfs.provider.as_str() {
        "json" => io_json::read_json_responses(&p2)?,
        "csv" => io_csv::read_csv_responses(&p2, cfs, survey)?,
        "msforms" => io_msforms::read_msforms_responses(&p2, cfs, survey)?,
        x => whatever!("Provider not implemented {:?}", x),
    };
    info!("Read {} responses from {}", responses.len(), p2);
    Ok(responses)
}

/// Decodes a response into a submission. Responses without a timestamp are
/// stamped with the given default.
fn encode_response(
    survey: &Survey,
    pr: &ParsedResponse,
    default_timestamp: &str,
) -> Result<Submission, SurveyErrors> {
    let mut builder = SubmissionBuilder::new(&survey.catalog, &survey.scale);
    for field in survey.schema.demographics().iter() {
        let raw = pr
            .demographics
            .iter()
            .find(|(name, _)| *name == field.name)
            .map(|(_, v)| v.as_str());
        if raw.is_none() {
            debug!("encode_response: {:?}: no value for {}", pr.id, field.name);
        }
        builder.demographic(field, raw.unwrap_or(""))?;
    }
    for (statement, label) in pr.answers.iter() {
        if survey.catalog.position(statement).is_none() {
            warn!("response {:?}: ignoring unknown statement {:?}", pr.id, statement);
            continue;
        }
        builder.answer(statement, label)?;
    }
    let timestamp = pr.timestamp.as_deref().unwrap_or(default_timestamp);
    builder.build(timestamp)
}

/// Checks the header of the sheet, and writes it if the sheet is empty.
///
/// A headerless sheet (`writeHeader: false`) is never checked: its first row
/// is data, so the column order cannot be verified.
fn prepare_sheet(
    sheet: &mut dyn RowStore,
    sheet_name: &str,
    survey: &Survey,
    headerless: bool,
    dry_run: bool,
) -> SResult<()> {
    if headerless {
        warn!(
            "The sheet {} has no header, the column order cannot be verified",
            sheet_name
        );
        return Ok(());
    }
    let found = sheet.read_header()?;
    match survey.schema.check_header(&found) {
        HeaderCheck::Matches => {
            debug!("prepare_sheet: header of {} matches", sheet_name);
            Ok(())
        }
        HeaderCheck::Missing if dry_run => {
            info!("Dry run: the header would be written to {}", sheet_name);
            Ok(())
        }
        HeaderCheck::Missing => sheet.write_header(&survey.schema.header()),
        HeaderCheck::Mismatch {
            column,
            expected,
            found,
        } => HeaderMismatchSnafu {
            path: sheet_name,
            column,
            expected,
            found,
        }
        .fail(),
    }
}

fn cell_to_json(c: &CellValue) -> JSValue {
    match c {
        CellValue::Text(s) => json!(s),
        CellValue::Integer(i) => json!(i),
        CellValue::Decimal(x) => json!(x),
    }
}

fn traits_to_json(averages: &[TraitAverage]) -> Vec<JSValue> {
    averages
        .iter()
        .map(|ta| json!({"trait": ta.trait_name, "average": ta.average}))
        .collect()
}

// Angles are reported in degrees, rounded, for readability of the summary.
fn radar_to_json(polygon: &RadarPolygon) -> Vec<JSValue> {
    polygon
        .points
        .iter()
        .map(|p| {
            let degrees = (p.angle.to_degrees() * 1e6).round() / 1e6;
            json!({"angle": degrees, "radius": p.radius})
        })
        .collect()
}

fn build_summary_js(
    config: &SurveyConfig,
    survey: &Survey,
    recorded: &[RecordedResponse],
) -> JSValue {
    let c = OutputConfig {
        survey: config.output_settings.survey_name.clone(),
        respondents: recorded.len(),
        columns: survey.schema.header(),
    };
    let mut results: Vec<JSValue> = Vec::new();
    for r in recorded.iter() {
        let mut js: JSMap<String, JSValue> = JSMap::new();
        js.insert("id".to_string(), json!(r.id));
        js.insert(
            "row".to_string(),
            JSValue::Array(r.processed.row.iter().map(cell_to_json).collect()),
        );
        js.insert(
            "traits".to_string(),
            JSValue::Array(traits_to_json(&r.processed.trait_averages)),
        );
        if let Some(polygon) = &r.processed.radar {
            js.insert("radar".to_string(), JSValue::Array(radar_to_json(polygon)));
        }
        results.push(JSValue::Object(js));
    }
    let per_submission: Vec<Vec<TraitAverage>> = recorded
        .iter()
        .map(|r| r.processed.trait_averages.clone())
        .collect();
    json!({
        "config": c,
        "results": results,
        "traitAverages": traits_to_json(&aggregate::mean_trait_averages(&per_submission)),
    })
}

fn resolve(root_p: &Path, p: &str) -> String {
    root_p.join(p).display().to_string()
}

pub fn run_survey(settings: &RunSettings) -> SResult<JSValue> {
    run_survey_with_store(settings, |path: &str| -> Box<dyn RowStore> {
        Box::new(CsvSheet::new(path))
    })
}

/// Same as run_survey, with the store of the rows opened by `open_sheet` from
/// the resolved sheet path.
pub fn run_survey_with_store<F>(settings: &RunSettings, open_sheet: F) -> SResult<JSValue>
where
    F: Fn(&str) -> Box<dyn RowStore>,
{
    let config_p = Path::new(settings.config_path.as_str());
    let config = read_config(&settings.config_path)?;
    info!("config: {:?}", config);
    let root_p = config_p.parent().context(MissingParentDirSnafu {})?;

    let survey = validate_survey(&config)?;

    let sources: Vec<ResponseSource> = match &settings.input_path {
        Some(input) => vec![ResponseSource {
            provider: settings
                .input_type
                .clone()
                .unwrap_or_else(|| "json".to_string()),
            file_path: input.clone(),
            excel_worksheet_name: settings.excel_worksheet_name.clone(),
            timestamp_column: None,
            id_column: None,
        }],
        None => config.response_sources.clone(),
    };
    if sources.is_empty() {
        whatever!(
            "No response sources: use the --input option or responseSources in the configuration"
        );
    }

    // An input given on the command line is relative to the working directory.
    let input_root: PathBuf = if settings.input_path.is_some() {
        PathBuf::new()
    } else {
        root_p.to_path_buf()
    };
    let mut parsed: Vec<ParsedResponse> = Vec::new();
    for cfs in sources.iter() {
        parsed.append(&mut read_responses(&input_root, cfs, &survey)?);
    }

    // All the responses are encoded before anything is written, so that a bad
    // response does not leave half of a batch in the sheet.
    let run_timestamp = chrono::Local::now().format(TIMESTAMP_FORMAT).to_string();
    let mut recorded: Vec<RecordedResponse> = Vec::new();
    for (idx, pr) in parsed.iter().enumerate() {
        let id = pr.id.clone().unwrap_or_else(|| format!("response-{}", idx + 1));
        let processed = encode_response(&survey, pr, &run_timestamp)
            .and_then(|s| process_submission(&survey, &s))
            .context(ResponseSnafu {
                response_id: id.clone(),
            })?;
        debug!("run_survey: {}: {:?}", id, processed);
        recorded.push(RecordedResponse { id, processed });
    }

    let sheet_path: Option<String> = match &settings.sheet_path {
        Some(p) => Some(p.clone()),
        None => config
            .output_settings
            .sheet_path
            .as_ref()
            .map(|p| resolve(root_p, p)),
    };
    match sheet_path {
        Some(sheet_path) => {
            let mut sheet = open_sheet(&sheet_path);
            let headerless = !config.output_settings.write_header.unwrap_or(true);
            prepare_sheet(
                &mut *sheet,
                &sheet_path,
                &survey,
                headerless,
                settings.dry_run,
            )?;
            if settings.dry_run {
                info!("Dry run: {} rows not appended to {}", recorded.len(), sheet_path);
            } else {
                for r in recorded.iter() {
                    sheet.append_row(&r.processed.row)?;
                }
                info!("Appended {} rows to {}", recorded.len(), sheet_path);
            }
        }
        None => warn!("No sheet configured: the rows are only reported in the summary"),
    }

    let chart_dir: Option<String> = match &settings.chart_dir {
        Some(d) => Some(d.clone()),
        None => config
            .output_settings
            .chart_directory
            .as_ref()
            .map(|d| resolve(root_p, d)),
    };
    if let Some(chart_dir) = chart_dir {
        let title = config
            .output_settings
            .chart_title
            .clone()
            .unwrap_or_else(|| config.output_settings.survey_name.clone());
        let mut charts = chart::ChartWriter::new(&chart_dir, &title);
        for r in recorded.iter() {
            match &r.processed.radar {
                Some(polygon) => {
                    let path = charts.write(&r.id, polygon)?;
                    info!("Radar chart for {}: {}", r.id, path);
                }
                None => info!("{}: fewer than 3 traits, no radar chart", r.id),
            }
        }
    }

    // Assemble the final json
    let result_js = build_summary_js(&config, &survey, &recorded);
    let pretty_js_stats = serde_json::to_string_pretty(&result_js).context(WritingJsonSnafu {})?;
    match settings.summary_path.as_deref() {
        Some("stdout") => println!("{}", pretty_js_stats),
        Some(p) => fs::write(p, &pretty_js_stats).context(WritingSummarySnafu { path: p })?,
        None => debug!("summary: {}", pretty_js_stats),
    }

    // The reference summary, if provided for comparison
    if let Some(summary_p) = &settings.reference_path {
        let summary_ref = read_summary(summary_p)?;
        let pretty_js_summary_ref =
            serde_json::to_string_pretty(&summary_ref).context(WritingJsonSnafu {})?;
        if pretty_js_summary_ref != pretty_js_stats {
            warn!("Found differences with the reference summary");
            print_diff(
                pretty_js_summary_ref.as_str(),
                pretty_js_stats.as_ref(),
                "\n",
            );
            whatever!("Difference detected between calculated summary and reference summary")
        }
    }

    Ok(result_js)
}

#[cfg(test)]
pub fn test_wrapper(test_name: &str) {
    let _ = env_logger::builder().is_test(true).try_init();
    let test_dir = format!("tests/{}", test_name);
    let tmp = tempfile::tempdir().unwrap();
    let sheet_path = tmp.path().join("sheet.csv").display().to_string();
    let existing_sheet = format!("{}/initial_sheet.csv", test_dir);
    if Path::new(&existing_sheet).exists() {
        fs::copy(&existing_sheet, &sheet_path).unwrap();
    }
    let settings = RunSettings {
        config_path: format!("{}/config.json", test_dir),
        reference_path: Some(format!("{}/expected_summary.json", test_dir)),
        sheet_path: Some(sheet_path.clone()),
        ..RunSettings::default()
    };
    let res = run_survey(&settings);
    if let Err(e) = res {
        panic!("{}: run failed: {:?}", test_name, e);
    }
    let contents = fs::read_to_string(&sheet_path).unwrap();
    let expected = fs::read_to_string(format!("{}/expected_sheet.csv", test_dir)).unwrap();
    assert_eq!(contents, expected);
}
