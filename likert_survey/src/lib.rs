/*!
Encoding of Likert-scale questionnaires into spreadsheet rows.

A questionnaire is a list of statements ([`catalog::ItemCatalog`]), each answered
on the same scale ([`scale::ScaleDefinition`]). The answers of one respondent are
collected with a [`builder::SubmissionBuilder`], then [`process_submission`]
produces everything needed downstream:
- the row to append to the store, in the column order of the [`row::RowSchema`],
- the average of each trait,
- the radar polygon of these averages, when there are enough traits.

The library does not do any input or output. See the [`manual`] for the
command line program that reads responses and writes the rows.
*/
mod config;

pub mod aggregate;
pub mod builder;
pub mod catalog;
pub mod manual;
pub mod radar;
pub mod row;
pub mod scale;

use log::{debug, info};

pub use crate::config::*;

use crate::catalog::ItemCatalog;
use crate::row::RowSchema;
use crate::scale::ScaleDefinition;

/// The static definitions of a questionnaire.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Survey {
    pub catalog: ItemCatalog,
    pub scale: ScaleDefinition,
    pub schema: RowSchema,
}

impl Survey {
    pub fn new(
        catalog: ItemCatalog,
        scale: ScaleDefinition,
        demographics: Vec<DemographicField>,
    ) -> Result<Survey, SurveyErrors> {
        let schema = RowSchema::new(demographics, &catalog)?;
        info!(
            "Survey: {} items, {} traits, {} point scale, {} columns",
            catalog.len(),
            catalog.traits().len(),
            scale.max_value(),
            schema.num_columns()
        );
        Ok(Survey {
            catalog,
            scale,
            schema,
        })
    }
}

/// Everything derived from one submission.
#[derive(PartialEq, Debug, Clone)]
pub struct ProcessedSubmission {
    pub row: Vec<CellValue>,
    pub trait_averages: Vec<TraitAverage>,
    /// Only present when the catalog has at least 3 traits.
    pub radar: Option<RadarPolygon>,
}

/// Runs the whole pipeline for one submission.
///
/// Either everything is computed or an error is returned: a partial row is
/// never produced.
pub fn process_submission(
    survey: &Survey,
    submission: &Submission,
) -> Result<ProcessedSubmission, SurveyErrors> {
    let range = survey.scale.min_value()..=survey.scale.max_value();
    for (item, v) in survey.catalog.items().iter().zip(submission.item_values.iter()) {
        if !range.contains(v) {
            return Err(SurveyErrors::ValueOutOfRange(item.statement.clone(), *v));
        }
    }
    let row = survey.schema.assemble_row(submission)?;
    let trait_averages = aggregate::trait_averages(&survey.catalog, &submission.item_values)?;
    let radar = if trait_averages.len() >= 3 {
        Some(radar::project(&trait_averages, &survey.scale)?)
    } else {
        None
    };
    debug!(
        "process_submission: row: {:?} averages: {:?}",
        row, trait_averages
    );
    Ok(ProcessedSubmission {
        row,
        trait_averages,
        radar,
    })
}
