use log::debug;
use std::collections::HashSet;

use crate::builder::read_demographic;
use crate::catalog::ItemCatalog;
pub use crate::config::*;

/// The name of the first column of every stored row.
pub const TIMESTAMP_COLUMN: &str = "Timestamp";

/// The declared column layout of the store:
/// timestamp, then the demographic fields, then one column per item.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct RowSchema {
    demographics: Vec<DemographicField>,
    statements: Vec<String>,
}

impl RowSchema {
    pub fn new(
        demographics: Vec<DemographicField>,
        catalog: &ItemCatalog,
    ) -> Result<RowSchema, SurveyErrors> {
        let mut seen: HashSet<&str> = HashSet::new();
        seen.insert(TIMESTAMP_COLUMN);
        for f in demographics.iter() {
            let bad_name = f.name.trim().is_empty() || f.name.trim() != f.name;
            if bad_name || !seen.insert(f.name.as_str()) {
                return Err(SurveyErrors::InvalidCatalog(format!(
                    "invalid or duplicate demographic field {:?}",
                    f.name
                )));
            }
            if catalog.position(&f.name).is_some() {
                return Err(SurveyErrors::InvalidCatalog(format!(
                    "demographic field {:?} has the same name as a statement",
                    f.name
                )));
            }
            if let (Some(min), Some(max)) = (f.min, f.max) {
                if min > max {
                    return Err(SurveyErrors::InvalidCatalog(format!(
                        "demographic field {:?}: minimum {} above maximum {}",
                        f.name, min, max
                    )));
                }
            }
            if let Some(d) = &f.default {
                read_demographic(f, d)?;
            }
        }
        Ok(RowSchema {
            demographics,
            statements: catalog.statements(),
        })
    }

    pub fn demographics(&self) -> &[DemographicField] {
        &self.demographics
    }

    pub fn num_columns(&self) -> usize {
        1 + self.demographics.len() + self.statements.len()
    }

    /// The header row expected in the store.
    pub fn header(&self) -> Vec<String> {
        let mut res: Vec<String> = vec![TIMESTAMP_COLUMN.to_string()];
        res.extend(self.demographics.iter().map(|f| f.name.clone()));
        res.extend(self.statements.iter().cloned());
        res
    }

    /// Compares the header found in the store with the expected one.
    ///
    /// An empty header means that nothing was written to the store yet.
    pub fn check_header(&self, found: &[String]) -> HeaderCheck {
        if found.is_empty() {
            return HeaderCheck::Missing;
        }
        let expected = self.header();
        let width = expected.len().max(found.len());
        for column in 0..width {
            let e = expected.get(column).map(|s| s.trim());
            let f = found.get(column).map(|s| s.trim());
            if e != f {
                debug!(
                    "check_header: column {}: expected {:?} found {:?}",
                    column, e, f
                );
                return HeaderCheck::Mismatch {
                    column,
                    expected: e.map(|s| s.to_string()),
                    found: f.map(|s| s.to_string()),
                };
            }
        }
        HeaderCheck::Matches
    }

    /// Builds the stored record of a submission.
    ///
    /// The output only depends on the submission: the timestamp is part of it.
    pub fn assemble_row(&self, submission: &Submission) -> Result<Vec<CellValue>, SurveyErrors> {
        if submission.item_values.len() != self.statements.len() {
            return Err(SurveyErrors::LengthMismatch(
                self.statements.len(),
                submission.item_values.len(),
            ));
        }
        let mut row: Vec<CellValue> = Vec::with_capacity(self.num_columns());
        row.push(CellValue::Text(submission.timestamp.clone()));
        for field in self.demographics.iter() {
            let v = submission
                .demographics
                .iter()
                .find(|(name, _)| *name == field.name)
                .map(|(_, v)| v.clone())
                .ok_or_else(|| SurveyErrors::MissingDemographic(field.name.clone()))?;
            row.push(v);
        }
        row.extend(submission.item_values.iter().map(|v| CellValue::from(*v)));
        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> RowSchema {
        let catalog = ItemCatalog::new(vec![
            LikertItem::flat("I like maps."),
            LikertItem::flat("I like trains."),
            LikertItem::flat("I like boats."),
        ])
        .unwrap();
        RowSchema::new(
            vec![DemographicField::number("age"), DemographicField::text("country")],
            &catalog,
        )
        .unwrap()
    }

    fn submission() -> Submission {
        Submission {
            timestamp: "2024-01-01 00:00:00".to_string(),
            // Not in the declared order on purpose.
            demographics: vec![
                ("country".to_string(), CellValue::from("USA")),
                ("age".to_string(), CellValue::Integer(25)),
            ],
            item_values: vec![1, 2, 3],
        }
    }

    #[test]
    fn assembles_in_declared_order() {
        let row = schema().assemble_row(&submission()).unwrap();
        assert_eq!(
            row,
            vec![
                CellValue::from("2024-01-01 00:00:00"),
                CellValue::Integer(25),
                CellValue::from("USA"),
                CellValue::Integer(1),
                CellValue::Integer(2),
                CellValue::Integer(3),
            ]
        );
    }

    #[test]
    fn assembling_is_pure() {
        let s = schema();
        let sub = submission();
        assert_eq!(s.assemble_row(&sub), s.assemble_row(&sub));
    }

    #[test]
    fn rejects_wrong_lengths_and_missing_fields() {
        let mut sub = submission();
        sub.item_values.pop();
        assert_eq!(
            schema().assemble_row(&sub),
            Err(SurveyErrors::LengthMismatch(3, 2))
        );
        let mut sub = submission();
        sub.demographics.remove(0);
        assert_eq!(
            schema().assemble_row(&sub),
            Err(SurveyErrors::MissingDemographic("country".to_string()))
        );
    }

    #[test]
    fn header_checks() {
        let s = schema();
        let header = s.header();
        assert_eq!(
            header,
            vec![
                "Timestamp",
                "age",
                "country",
                "I like maps.",
                "I like trains.",
                "I like boats."
            ]
        );
        assert_eq!(s.check_header(&[]), HeaderCheck::Missing);
        assert_eq!(s.check_header(&header), HeaderCheck::Matches);

        let mut swapped = header.clone();
        swapped.swap(1, 2);
        assert_eq!(
            s.check_header(&swapped),
            HeaderCheck::Mismatch {
                column: 1,
                expected: Some("age".to_string()),
                found: Some("country".to_string()),
            }
        );

        let mut longer = header.clone();
        longer.push("I like planes.".to_string());
        assert_eq!(
            s.check_header(&longer),
            HeaderCheck::Mismatch {
                column: 6,
                expected: None,
                found: Some("I like planes.".to_string()),
            }
        );
    }

    #[test]
    fn rejects_clashing_field_names() {
        let catalog = ItemCatalog::new(vec![LikertItem::flat("age")]).unwrap();
        assert!(RowSchema::new(vec![DemographicField::number("age")], &catalog).is_err());
        assert!(RowSchema::new(
            vec![DemographicField::text(TIMESTAMP_COLUMN)],
            &ItemCatalog::national_identity()
        )
        .is_err());
    }

    #[test]
    fn rejects_invalid_field_definitions() {
        let catalog = ItemCatalog::national_identity();
        assert!(RowSchema::new(vec![DemographicField::text("age ")], &catalog).is_err());
        let reversed = DemographicField::number("age").with_range(Some(100), Some(10));
        assert!(RowSchema::new(vec![reversed], &catalog).is_err());
        let bad_default = DemographicField::number("age")
            .with_range(Some(10), Some(100))
            .with_default("5");
        assert_eq!(
            RowSchema::new(vec![bad_default], &catalog),
            Err(SurveyErrors::InvalidDemographic("age".to_string(), "5".to_string()))
        );
    }

    #[test]
    fn written_header_is_accepted_back() {
        let s = schema();
        let mut padded = s.header();
        padded[3] = format!(" {} ", padded[3]);
        assert_eq!(s.check_header(&padded), HeaderCheck::Matches);
    }
}
