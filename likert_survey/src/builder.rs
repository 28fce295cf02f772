use log::debug;

use crate::catalog::ItemCatalog;
pub use crate::config::*;
use crate::scale::ScaleDefinition;

/// A builder collecting the answers of one respondent.
///
/// Answers are given as the labels that were displayed; they are decoded when
/// the submission is built, once every item has an answer.
///
/// ```
/// use likert_survey::builder::SubmissionBuilder;
/// use likert_survey::catalog::ItemCatalog;
/// use likert_survey::scale::ScaleDefinition;
/// use likert_survey::{CellValue, DemographicField};
/// # use likert_survey::SurveyErrors;
///
/// let catalog = ItemCatalog::national_identity();
/// let scale = ScaleDefinition::numeric_seven_points();
/// let mut builder = SubmissionBuilder::new(&catalog, &scale);
/// builder.demographic(&DemographicField::number("age"), "25")?;
/// for statement in catalog.statements() {
///     builder.answer(&statement, "4 (Neither)")?;
/// }
/// let submission = builder.build("2024-01-01 00:00:00")?;
/// assert_eq!(submission.item_values, vec![4; 8]);
/// assert_eq!(submission.demographics[0].1, CellValue::Integer(25));
/// # Ok::<(), SurveyErrors>(())
/// ```
pub struct SubmissionBuilder<'a> {
    catalog: &'a ItemCatalog,
    scale: &'a ScaleDefinition,
    labels: Vec<Option<String>>,
    demographics: Vec<(String, CellValue)>,
}

impl<'a> SubmissionBuilder<'a> {
    pub fn new(catalog: &'a ItemCatalog, scale: &'a ScaleDefinition) -> SubmissionBuilder<'a> {
        SubmissionBuilder {
            catalog,
            scale,
            labels: vec![None; catalog.len()],
            demographics: Vec::new(),
        }
    }

    /// Records the label selected for a statement. A later answer replaces an
    /// earlier one.
    pub fn answer(&mut self, statement: &str, label: &str) -> Result<(), SurveyErrors> {
        let idx = self.catalog.position(statement).ok_or_else(|| {
            SurveyErrors::InvalidCatalog(format!("unknown statement {:?}", statement))
        })?;
        self.labels[idx] = Some(label.to_string());
        Ok(())
    }

    /// Records the raw value of a demographic field, read according to its kind.
    pub fn demographic(&mut self, field: &DemographicField, raw: &str) -> Result<(), SurveyErrors> {
        let value = read_demographic(field, raw)?;
        self.demographics.retain(|(name, _)| *name != field.name);
        self.demographics.push((field.name.clone(), value));
        Ok(())
    }

    /// The statements that do not have an answer yet, in catalog order.
    pub fn missing(&self) -> Vec<String> {
        self.catalog
            .items()
            .iter()
            .zip(self.labels.iter())
            .filter(|(_, l)| l.is_none())
            .map(|(item, _)| item.statement.clone())
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.labels.iter().all(|l| l.is_some())
    }

    /// Decodes all the answers. Fails if an item has no answer or if a label
    /// does not belong to the scale.
    pub fn build(self, timestamp: &str) -> Result<Submission, SurveyErrors> {
        let missing = self.missing();
        if !missing.is_empty() {
            return Err(SurveyErrors::IncompleteSubmission(missing));
        }
        let mut item_values: Vec<u32> = Vec::with_capacity(self.labels.len());
        for label in self.labels.iter().flatten() {
            item_values.push(self.scale.decode(label)?);
        }
        debug!("SubmissionBuilder::build: {:?}", item_values);
        Ok(Submission {
            timestamp: timestamp.to_string(),
            demographics: self.demographics,
            item_values,
        })
    }
}

/// Reads a raw form value for a demographic field.
///
/// A blank value takes the default of the field. Without a default, blank
/// stays blank: optional fields such as a name may be left empty.
pub fn read_demographic(field: &DemographicField, raw: &str) -> Result<CellValue, SurveyErrors> {
    let s = match (raw.trim(), &field.default) {
        ("", Some(d)) => d.trim(),
        (s, _) => s,
    };
    let invalid = || SurveyErrors::InvalidDemographic(field.name.clone(), s.to_string());
    let value = match field.kind {
        FieldKind::Text => CellValue::Text(s.to_string()),
        FieldKind::Number if s.is_empty() => return Ok(CellValue::Text("".to_string())),
        FieldKind::Number => match s.parse::<i64>() {
            Ok(i) => CellValue::Integer(i),
            Err(_) => match s.parse::<f64>() {
                // 2^63 is the first float past i64::MAX.
                Ok(x) if x.fract() == 0.0 && x >= i64::MIN as f64 && x < i64::MAX as f64 => {
                    CellValue::Integer(x as i64)
                }
                Ok(x) if x.is_finite() && x.fract() != 0.0 => CellValue::Decimal(x),
                _ => return Err(invalid()),
            },
        },
    };
    let x = match &value {
        CellValue::Integer(i) => *i as f64,
        CellValue::Decimal(x) => *x,
        CellValue::Text(_) => return Ok(value),
    };
    let below = field.min.map(|m| x < m as f64).unwrap_or(false);
    let above = field.max.map(|m| x > m as f64).unwrap_or(false);
    if below || above {
        return Err(invalid());
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> ItemCatalog {
        ItemCatalog::new(vec![
            LikertItem::new(Some("Extraversion"), "I am talkative."),
            LikertItem::new(Some("Extraversion"), "I am outgoing."),
            LikertItem::flat("I answered honestly."),
        ])
        .unwrap()
    }

    #[test]
    fn incomplete_submission() {
        let catalog = catalog();
        let scale = ScaleDefinition::agreement_five_points();
        let mut builder = SubmissionBuilder::new(&catalog, &scale);
        builder.answer("I am outgoing.", "Agree").unwrap();
        assert!(!builder.is_complete());
        assert_eq!(
            builder.build("now"),
            Err(SurveyErrors::IncompleteSubmission(vec![
                "I am talkative.".to_string(),
                "I answered honestly.".to_string()
            ]))
        );
    }

    #[test]
    fn values_follow_catalog_order() {
        let catalog = catalog();
        let scale = ScaleDefinition::agreement_five_points();
        // Every ordering of the answers gives the same values.
        let answers = [
            ("I answered honestly.", "Strongly Agree"),
            ("I am talkative.", "Disagree"),
            ("I am outgoing.", "Neutral"),
        ];
        let orders = [[0, 1, 2], [0, 2, 1], [1, 0, 2], [1, 2, 0], [2, 0, 1], [2, 1, 0]];
        for order in orders.iter() {
            let mut builder = SubmissionBuilder::new(&catalog, &scale);
            for idx in order.iter() {
                let (statement, label) = answers[*idx];
                builder.answer(statement, label).unwrap();
            }
            let s = builder.build("2024-01-01 00:00:00").unwrap();
            assert_eq!(s.item_values, vec![2, 3, 5]);
        }
    }

    #[test]
    fn unknown_label_and_statement() {
        let catalog = catalog();
        let scale = ScaleDefinition::agreement_five_points();
        let mut builder = SubmissionBuilder::new(&catalog, &scale);
        assert!(builder.answer("I am shy.", "Agree").is_err());
        for s in catalog.statements() {
            builder.answer(&s, "Somewhat agree").unwrap();
        }
        let err = builder.build("now").unwrap_err();
        assert_eq!(err, SurveyErrors::UnknownLabel("Somewhat agree".to_string()));
        assert!(err.is_configuration_fault());
    }

    #[test]
    fn demographics() {
        let age = DemographicField::number("age");
        assert_eq!(read_demographic(&age, " 25 "), Ok(CellValue::Integer(25)));
        assert_eq!(read_demographic(&age, "25.0"), Ok(CellValue::Integer(25)));
        assert_eq!(read_demographic(&age, "25.5"), Ok(CellValue::Decimal(25.5)));
        assert_eq!(read_demographic(&age, ""), Ok(CellValue::from("")));
        assert_eq!(
            read_demographic(&age, "1e30"),
            Err(SurveyErrors::InvalidDemographic("age".to_string(), "1e30".to_string()))
        );
        assert!(read_demographic(&age, "inf").is_err());
        let err = read_demographic(&age, "twenty").unwrap_err();
        assert!(!err.is_configuration_fault());
        let country = DemographicField::text("country");
        assert_eq!(read_demographic(&country, "USA"), Ok(CellValue::from("USA")));
    }

    #[test]
    fn demographic_bounds_and_defaults() {
        let age = DemographicField::number("Age")
            .with_range(Some(10), Some(100))
            .with_default("25");
        assert_eq!(read_demographic(&age, ""), Ok(CellValue::Integer(25)));
        assert_eq!(read_demographic(&age, "100"), Ok(CellValue::Integer(100)));
        assert_eq!(read_demographic(&age, "10.5"), Ok(CellValue::Decimal(10.5)));
        assert_eq!(
            read_demographic(&age, "500"),
            Err(SurveyErrors::InvalidDemographic("Age".to_string(), "500".to_string()))
        );
        assert!(read_demographic(&age, "9").is_err());

        let country = DemographicField::text("Country of Residence").with_default("USA");
        assert_eq!(read_demographic(&country, "  "), Ok(CellValue::from("USA")));
        assert_eq!(read_demographic(&country, "Italy"), Ok(CellValue::from("Italy")));
    }
}
