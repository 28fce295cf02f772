// SVG rendering of the radar charts.

use std::collections::HashSet;
use std::path::PathBuf;

use likert_survey::RadarPolygon;

use crate::survey::*;

const SIZE: f64 = 400.0;
const MARGIN: f64 = 70.0;

/// Renders the polygon with one spoke per trait and a ring per scale value.
pub fn render_radar_svg(polygon: &RadarPolygon, title: &str) -> String {
    let center = SIZE / 2.0;
    let (min, max) = polygon.radial_range;
    let scale = (SIZE / 2.0 - MARGIN) / max;
    let to_xy = |p: &RadarPoint| {
        let (x, y) = p.to_cartesian();
        (center + x * scale, center + y * scale)
    };

    let mut svg = String::new();
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{0}\" height=\"{0}\" viewBox=\"0 0 {0} {0}\">\n",
        SIZE
    ));
    svg.push_str(&format!(
        "  <text x=\"{}\" y=\"24\" text-anchor=\"middle\" font-size=\"16\">{}</text>\n",
        center,
        escape(title)
    ));

    // Rings
    let mut level = min;
    while level <= max {
        svg.push_str(&format!(
            "  <circle cx=\"{:.2}\" cy=\"{:.2}\" r=\"{:.2}\" fill=\"none\" stroke=\"#dddddd\"/>\n",
            center,
            center,
            level * scale
        ));
        level += 1.0;
    }

    // Spokes and labels, one per trait
    for (p, name) in polygon.points.iter().zip(polygon.axes.iter()) {
        let (x, y) = to_xy(&RadarPoint {
            angle: p.angle,
            radius: max,
        });
        let (lx, ly) = to_xy(&RadarPoint {
            angle: p.angle,
            radius: max + 0.6,
        });
        svg.push_str(&format!(
            "  <line x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\" stroke=\"#bbbbbb\"/>\n",
            center, center, x, y
        ));
        svg.push_str(&format!(
            "  <text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" font-size=\"12\">{}</text>\n",
            lx,
            ly,
            escape(name)
        ));
    }

    let coords: Vec<String> = polygon
        .points
        .iter()
        .map(|p| {
            let (x, y) = to_xy(p);
            format!("{:.2},{:.2}", x, y)
        })
        .collect();
    svg.push_str(&format!(
        "  <polyline points=\"{}\" fill=\"#4c72b0\" fill-opacity=\"0.3\" stroke=\"#4c72b0\" stroke-width=\"2\"/>\n",
        coords.join(" ")
    ));
    svg.push_str("</svg>\n");
    svg
}

/// Writes one chart per response in a directory.
///
/// File names are derived from the response ids. Two ids that reduce to the
/// same name get numbered suffixes instead of overwriting each other.
pub struct ChartWriter {
    chart_dir: String,
    title: String,
    used_names: HashSet<String>,
}

impl ChartWriter {
    pub fn new(chart_dir: &str, title: &str) -> ChartWriter {
        ChartWriter {
            chart_dir: chart_dir.to_string(),
            title: title.to_string(),
            used_names: HashSet::new(),
        }
    }

    /// Writes the chart of one response and returns the path of the file.
    pub fn write(&mut self, response_id: &str, polygon: &RadarPolygon) -> SResult<String> {
        fs::create_dir_all(&self.chart_dir).context(WritingChartSnafu {
            path: self.chart_dir.clone(),
        })?;
        let stem: String = response_id
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        let mut file_name = format!("{}.svg", stem);
        let mut suffix = 1;
        while self.used_names.contains(&file_name) {
            suffix += 1;
            file_name = format!("{}-{}.svg", stem, suffix);
        }
        if suffix > 1 {
            warn!("Chart of {:?} written as {} to avoid a name clash", response_id, file_name);
        }
        let p: PathBuf = [self.chart_dir.as_str(), file_name.as_str()].iter().collect();
        let path = p.display().to_string();
        fs::write(&p, render_radar_svg(polygon, &self.title)).context(WritingChartSnafu {
            path: path.clone(),
        })?;
        self.used_names.insert(file_name);
        debug!("ChartWriter::write: {}", path);
        Ok(path)
    }
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use likert_survey::radar::project;
    use likert_survey::scale::ScaleDefinition;

    fn polygon() -> RadarPolygon {
        let traits = [("O", 6.0), ("C", 5.0), ("E", 7.0), ("A", 3.0), ("N & co", 4.0)];
        let averages: Vec<TraitAverage> = traits
            .iter()
            .map(|(n, v)| TraitAverage {
                trait_name: n.to_string(),
                average: *v,
            })
            .collect();
        project(&averages, &ScaleDefinition::numeric_seven_points()).unwrap()
    }

    #[test]
    fn svg_shape() {
        let svg = render_radar_svg(&polygon(), "Big <Five>");
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("Big &lt;Five&gt;"));
        assert!(svg.contains("N &amp; co"));
        assert_eq!(svg.matches("<circle").count(), 7);
        assert_eq!(svg.matches("<line").count(), 5);
        // First vertex: angle 0, radius 6, straight up from the center.
        assert!(svg.contains("points=\"200.00,88.57 "));
    }

    #[test]
    fn chart_file() {
        let dir = tempfile::tempdir().unwrap();
        let chart_dir = dir.path().display().to_string();
        let mut writer = ChartWriter::new(&chart_dir, "t");
        let path = writer.write("responses.csv-00000002", &polygon()).unwrap();
        assert!(path.ends_with("responses_csv-00000002.svg"));
        assert!(fs::read_to_string(&path).unwrap().contains("<polyline"));
    }

    #[test]
    fn clashing_ids_keep_both_charts() {
        let dir = tempfile::tempdir().unwrap();
        let chart_dir = dir.path().display().to_string();
        let mut writer = ChartWriter::new(&chart_dir, "t");
        let first = writer.write("a.b", &polygon()).unwrap();
        let second = writer.write("a_b", &polygon()).unwrap();
        let third = writer.write("a?b", &polygon()).unwrap();
        assert!(first.ends_with("a_b.svg"));
        assert!(second.ends_with("a_b-2.svg"));
        assert!(third.ends_with("a_b-3.svg"));
        assert_eq!(fs::read_dir(&chart_dir).unwrap().count(), 3);
    }
}
