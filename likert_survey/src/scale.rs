use log::debug;
use std::collections::HashSet;

pub use crate::config::*;

/// An ordered Likert scale and the strategy to decode its labels.
///
/// The values always form the range `1..=N`, in the order of the labels.
///
/// ```
/// use likert_survey::scale::ScaleDefinition;
/// # use likert_survey::SurveyErrors;
///
/// let scale = ScaleDefinition::numeric_seven_points();
/// assert_eq!(scale.decode("7 (Strongly Agree)")?, 7);
/// assert_eq!(scale.decode("3")?, 3);
/// # Ok::<(), SurveyErrors>(())
/// ```
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ScaleDefinition {
    points: Vec<ScalePoint>,
    encoding: EncodingStrategy,
}

impl ScaleDefinition {
    /// Builds a scale from its labels. The i-th label gets the value i + 1.
    pub fn new(
        labels: &[String],
        encoding: EncodingStrategy,
    ) -> Result<ScaleDefinition, SurveyErrors> {
        let points: Vec<ScalePoint> = labels
            .iter()
            .enumerate()
            .map(|(idx, label)| ScalePoint {
                label: label.clone(),
                value: (idx + 1) as u32,
            })
            .collect();
        ScaleDefinition::from_points(points, encoding)
    }

    pub fn from_points(
        points: Vec<ScalePoint>,
        encoding: EncodingStrategy,
    ) -> Result<ScaleDefinition, SurveyErrors> {
        if points.len() < 2 {
            return Err(SurveyErrors::InvalidScale(format!(
                "a scale needs at least 2 points, found {}",
                points.len()
            )));
        }
        let mut seen: HashSet<&str> = HashSet::new();
        for (idx, p) in points.iter().enumerate() {
            if !seen.insert(p.label.as_str()) {
                return Err(SurveyErrors::InvalidScale(format!(
                    "duplicate label {:?}",
                    p.label
                )));
            }
            if p.value != (idx + 1) as u32 {
                return Err(SurveyErrors::InvalidScale(format!(
                    "label {:?} has value {} at position {}",
                    p.label,
                    p.value,
                    idx + 1
                )));
            }
        }
        let scale = ScaleDefinition { points, encoding };
        // Every label shown to a respondent must decode to its own value.
        for p in scale.points.iter() {
            let v = scale.decode(&p.label)?;
            if v != p.value {
                return Err(SurveyErrors::InvalidScale(format!(
                    "label {:?} decodes to {} instead of {}",
                    p.label, v, p.value
                )));
            }
        }
        debug!("ScaleDefinition: {:?}", scale);
        Ok(scale)
    }

    /// "Strongly Disagree" ... "Strongly Agree", resolved by exact lookup.
    pub fn agreement_five_points() -> ScaleDefinition {
        ScaleDefinition {
            points: labels_to_points(&[
                "Strongly Disagree",
                "Disagree",
                "Neutral",
                "Agree",
                "Strongly Agree",
            ]),
            encoding: EncodingStrategy::ExactLabel,
        }
    }

    /// The 1 to 7 scale where only the ends and the middle carry a description.
    pub fn numeric_seven_points() -> ScaleDefinition {
        ScaleDefinition {
            points: labels_to_points(&[
                "1 (Strongly Disagree)",
                "2",
                "3",
                "4 (Neither)",
                "5",
                "6",
                "7 (Strongly Agree)",
            ]),
            encoding: EncodingStrategy::NumericPrefix,
        }
    }

    pub fn points(&self) -> &[ScalePoint] {
        &self.points
    }

    pub fn labels(&self) -> Vec<String> {
        self.points.iter().map(|p| p.label.clone()).collect()
    }

    pub fn encoding(&self) -> EncodingStrategy {
        self.encoding
    }

    pub fn min_value(&self) -> u32 {
        1
    }

    pub fn max_value(&self) -> u32 {
        self.points.len() as u32
    }

    /// Returns the numeric value of a displayed label.
    ///
    /// A failure means that the label set and the scale went out of sync, it is
    /// not a respondent error.
    pub fn decode(&self, label: &str) -> Result<u32, SurveyErrors> {
        match self.encoding {
            EncodingStrategy::ExactLabel => self
                .points
                .iter()
                .find(|p| p.label == label)
                .map(|p| p.value)
                .ok_or_else(|| SurveyErrors::UnknownLabel(label.to_string())),
            EncodingStrategy::NumericPrefix => {
                let v = leading_integer(label)
                    .ok_or_else(|| SurveyErrors::UnparseableLabel(label.to_string()))?;
                if v >= self.min_value() && v <= self.max_value() {
                    Ok(v)
                } else {
                    Err(SurveyErrors::LabelOutOfRange(label.to_string(), v))
                }
            }
        }
    }
}

fn labels_to_points(labels: &[&str]) -> Vec<ScalePoint> {
    labels
        .iter()
        .enumerate()
        .map(|(idx, l)| ScalePoint {
            label: l.to_string(),
            value: (idx + 1) as u32,
        })
        .collect()
}

// The run of digits that starts the label: "7 (Agree)", "7(Agree)" and "7.0" all give 7.
fn leading_integer(label: &str) -> Option<u32> {
    let label = label.trim_start();
    let end = label
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(label.len());
    label[..end].parse::<u32>().ok()
}
