use clap::Parser;

/// This program records Likert-scale survey responses as rows of a spreadsheet.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path) The file describing the survey: scale, items, demographic fields and response sources.
    /// For more information about the file format, read the documentation of the likert_survey::manual module.
    #[clap(short, long, value_parser)]
    pub config: String,

    /// (file path, optional) A reference file containing the expected summary in JSON format. If provided,
    /// likertsheet will check that the computed summary matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (file path or 'stdout') If specified, the summary of the run will be written in JSON format to the given
    /// location.
    #[clap(short, long, value_parser)]
    pub summary: Option<String>,

    /// (file path) The sheet (CSV file) the rows are appended to. Setting this option overrides the path that may
    /// be specified with the --config option.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path) A file of responses. Setting this option overrides the response sources of the --config option.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (default json) The type of the input: json, csv or msforms.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// (directory path) If specified, a radar chart (SVG) is written for each response in this directory.
    #[clap(long, value_parser)]
    pub chart_dir: Option<String>,

    /// When using an Excel file, indicates the name of the worksheet to use.
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    /// If passed as an argument, the rows are computed and checked but not appended to the sheet.
    #[clap(long, takes_value = false)]
    pub dry_run: bool,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
