use std::f64::consts::PI;

pub use crate::config::*;
use crate::scale::ScaleDefinition;

/// Turns the trait averages into the closed polygon of a radar chart.
///
/// With K traits, point i sits at the angle 2πi/K and the (K+1)-th point
/// repeats the first one. The radii are the averages themselves: an average
/// outside of the scale is reported, not clamped.
pub fn project(
    averages: &[TraitAverage],
    scale: &ScaleDefinition,
) -> Result<RadarPolygon, SurveyErrors> {
    let k = averages.len();
    if k < 3 {
        return Err(SurveyErrors::TooFewTraits(k));
    }
    let min = scale.min_value() as f64;
    let max = scale.max_value() as f64;

    let mut points: Vec<RadarPoint> = Vec::with_capacity(k + 1);
    for (idx, ta) in averages.iter().enumerate() {
        if !ta.average.is_finite() || ta.average < min || ta.average > max {
            return Err(SurveyErrors::AverageOutOfRange(
                ta.trait_name.clone(),
                ta.average.to_string(),
            ));
        }
        points.push(RadarPoint {
            angle: 2.0 * PI * (idx as f64) / (k as f64),
            radius: ta.average,
        });
    }
    points.push(points[0]);

    Ok(RadarPolygon {
        axes: averages.iter().map(|ta| ta.trait_name.clone()).collect(),
        points,
        radial_range: (min, max),
    })
}

impl RadarPoint {
    /// Cartesian coordinates, with angle 0 pointing up and angles growing clockwise.
    pub fn to_cartesian(&self) -> (f64, f64) {
        (
            self.radius * self.angle.sin(),
            -self.radius * self.angle.cos(),
        )
    }
}
