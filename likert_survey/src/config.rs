// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

/// One statement of the questionnaire.
///
/// The trait, when present, is the domain under which the answer is averaged.
/// Items without a trait still produce a column in the stored row.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub struct LikertItem {
    pub trait_name: Option<String>,
    pub statement: String,
}

impl LikertItem {
    pub fn new(trait_name: Option<&str>, statement: &str) -> LikertItem {
        LikertItem {
            trait_name: trait_name.map(|s| s.to_string()),
            statement: statement.to_string(),
        }
    }

    pub fn flat(statement: &str) -> LikertItem {
        LikertItem::new(None, statement)
    }
}

/// A point of a Likert scale: the label shown to the respondent and its code.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub struct ScalePoint {
    pub label: String,
    pub value: u32,
}

/// How a displayed label is turned back into its numeric value.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum EncodingStrategy {
    /// The label must be one of the labels of the scale, verbatim.
    ExactLabel,
    /// The label starts with its value: "7 (Strongly agree)", "3".
    NumericPrefix,
}

/// The kind of a demographic field, which controls how raw form input is read.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum FieldKind {
    Text,
    Number,
}

/// A field asked before the statements.
///
/// Number fields may carry bounds. The default replaces a blank answer.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub struct DemographicField {
    pub name: String,
    pub kind: FieldKind,
    pub min: Option<i64>,
    pub max: Option<i64>,
    pub default: Option<String>,
}

impl DemographicField {
    pub fn text(name: &str) -> DemographicField {
        DemographicField {
            name: name.to_string(),
            kind: FieldKind::Text,
            min: None,
            max: None,
            default: None,
        }
    }

    pub fn number(name: &str) -> DemographicField {
        DemographicField {
            kind: FieldKind::Number,
            ..DemographicField::text(name)
        }
    }

    pub fn with_range(self, min: Option<i64>, max: Option<i64>) -> DemographicField {
        DemographicField { min, max, ..self }
    }

    pub fn with_default(self, default: &str) -> DemographicField {
        DemographicField {
            default: Some(default.to_string()),
            ..self
        }
    }
}

/// A single cell of a stored row.
#[derive(PartialEq, Debug, Clone)]
pub enum CellValue {
    Text(String),
    Integer(i64),
    Decimal(f64),
}

impl Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{}", s),
            CellValue::Integer(i) => write!(f, "{}", i),
            CellValue::Decimal(x) => write!(f, "{}", x),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> CellValue {
        CellValue::Text(s)
    }
}

impl From<i64> for CellValue {
    fn from(i: i64) -> CellValue {
        CellValue::Integer(i)
    }
}

impl From<u32> for CellValue {
    fn from(i: u32) -> CellValue {
        CellValue::Integer(i as i64)
    }
}

impl From<f64> for CellValue {
    fn from(x: f64) -> CellValue {
        CellValue::Decimal(x)
    }
}

/// A complete, encoded response.
///
/// Invariant: `item_values[i]` is the answer to the i-th item of the catalog
/// it was built against.
#[derive(PartialEq, Debug, Clone)]
pub struct Submission {
    pub timestamp: String,
    pub demographics: Vec<(String, CellValue)>,
    pub item_values: Vec<u32>,
}

// ******** Output data structures *********

#[derive(PartialEq, Debug, Clone)]
pub struct TraitAverage {
    pub trait_name: String,
    pub average: f64,
}

/// A vertex of the radar polygon, in polar coordinates.
#[derive(PartialEq, Debug, Clone, Copy)]
pub struct RadarPoint {
    pub angle: f64,
    pub radius: f64,
}

/// The closed polygon for a radar chart, with one axis per trait.
#[derive(PartialEq, Debug, Clone)]
pub struct RadarPolygon {
    /// The axis labels, in the order of the points.
    pub axes: Vec<String>,
    /// K + 1 points; the last point repeats the first one.
    pub points: Vec<RadarPoint>,
    /// The range of the radial axis, taken from the scale.
    pub radial_range: (f64, f64),
}

/// The outcome of a header verification against an existing store.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum HeaderCheck {
    /// The store has no header yet.
    Missing,
    Matches,
    Mismatch {
        column: usize,
        expected: Option<String>,
        found: Option<String>,
    },
}

/// Errors that prevent a submission from being encoded.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum SurveyErrors {
    /// The label is not part of the scale.
    UnknownLabel(String),
    /// The label does not start with an integer.
    UnparseableLabel(String),
    /// The label starts with an integer that is not a value of the scale.
    LabelOutOfRange(String, u32),
    InvalidScale(String),
    InvalidCatalog(String),
    /// Number of values and number of items differ: (expected, found).
    LengthMismatch(usize, usize),
    /// The statements that did not receive an answer.
    IncompleteSubmission(Vec<String>),
    MissingDemographic(String),
    InvalidDemographic(String, String),
    /// An item value outside of the scale: (statement, value).
    ValueOutOfRange(String, u32),
    TooFewTraits(usize),
    AverageOutOfRange(String, String),
}

impl SurveyErrors {
    /// Faults in the static definitions, as opposed to faults in the responses.
    pub fn is_configuration_fault(&self) -> bool {
        !matches!(
            self,
            SurveyErrors::IncompleteSubmission(_)
                | SurveyErrors::MissingDemographic(_)
                | SurveyErrors::InvalidDemographic(_, _)
        )
    }
}

impl Error for SurveyErrors {}

impl Display for SurveyErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SurveyErrors::UnknownLabel(l) => write!(f, "label {:?} is not part of the scale", l),
            SurveyErrors::UnparseableLabel(l) => {
                write!(f, "label {:?} does not start with a number", l)
            }
            SurveyErrors::LabelOutOfRange(l, v) => {
                write!(f, "label {:?} encodes {} which is outside the scale", l, v)
            }
            SurveyErrors::InvalidScale(msg) => write!(f, "invalid scale: {}", msg),
            SurveyErrors::InvalidCatalog(msg) => write!(f, "invalid item catalog: {}", msg),
            SurveyErrors::LengthMismatch(expected, found) => write!(
                f,
                "expected {} item values, found {}",
                expected, found
            ),
            SurveyErrors::IncompleteSubmission(missing) => {
                write!(f, "no answer for: {}", missing.join(" | "))
            }
            SurveyErrors::MissingDemographic(name) => {
                write!(f, "demographic field {:?} is missing", name)
            }
            SurveyErrors::InvalidDemographic(name, raw) => {
                write!(f, "demographic field {:?}: cannot read {:?}", name, raw)
            }
            SurveyErrors::ValueOutOfRange(statement, v) => {
                write!(f, "value {} for {:?} is outside the scale", v, statement)
            }
            SurveyErrors::TooFewTraits(k) => {
                write!(f, "a radar chart needs at least 3 traits, found {}", k)
            }
            SurveyErrors::AverageOutOfRange(t, avg) => {
                write!(f, "average {} for trait {:?} is outside the scale", avg, t)
            }
        }
    }
}
