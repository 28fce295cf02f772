use crate::survey::*;

use serde::{Deserialize, Serialize};

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(rename = "surveyName")]
    pub survey_name: String,
    #[serde(rename = "sheetPath")]
    pub sheet_path: Option<String>,
    #[serde(rename = "chartDirectory")]
    pub chart_directory: Option<String>,
    #[serde(rename = "chartTitle")]
    pub chart_title: Option<String>,
    #[serde(rename = "writeHeader")]
    pub write_header: Option<bool>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub survey: String,
    pub respondents: usize,
    pub columns: Vec<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ScaleSettings {
    pub preset: Option<String>,
    pub encoding: Option<String>,
    pub labels: Option<Vec<String>>,
}

impl ScaleSettings {
    pub fn encoding(&self) -> SResult<EncodingStrategy> {
        match self.encoding.as_deref() {
            Some("exact") | None => Ok(EncodingStrategy::ExactLabel),
            Some("numericPrefix") => Ok(EncodingStrategy::NumericPrefix),
            Some(x) => whatever!("unknown scale encoding: {}", x),
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct DemographicSettings {
    pub name: String,
    pub kind: Option<String>,
    pub min: Option<i64>,
    pub max: Option<i64>,
    /// A string or a number.
    pub default: Option<JSValue>,
}

impl DemographicSettings {
    pub fn field(&self) -> SResult<DemographicField> {
        let field = match self.kind.as_deref() {
            Some("text") | None => DemographicField::text(&self.name),
            Some("number") => DemographicField::number(&self.name),
            Some(x) => whatever!("unknown kind {} for demographic field {}", x, self.name),
        };
        if field.kind == FieldKind::Text && (self.min.is_some() || self.max.is_some()) {
            whatever!("demographic field {}: only numbers have bounds", self.name)
        }
        let field = field.with_range(self.min, self.max);
        match &self.default {
            None | Some(JSValue::Null) => Ok(field),
            Some(JSValue::String(s)) => Ok(field.with_default(s)),
            Some(JSValue::Number(n)) => Ok(field.with_default(&n.to_string())),
            Some(v) => whatever!("demographic field {}: invalid default {}", self.name, v),
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ItemSettings {
    #[serde(rename = "trait")]
    pub trait_name: Option<String>,
    pub statement: String,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ResponseSource {
    pub provider: String,
    #[serde(rename = "filePath")]
    pub file_path: String,
    #[serde(rename = "excelWorksheetName")]
    pub excel_worksheet_name: Option<String>,
    #[serde(rename = "timestampColumn")]
    pub timestamp_column: Option<String>,
    #[serde(rename = "idColumn")]
    pub id_column: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct SurveyConfig {
    #[serde(rename = "outputSettings")]
    pub output_settings: OutputSettings,
    pub scale: ScaleSettings,
    #[serde(default)]
    pub demographics: Vec<DemographicSettings>,
    #[serde(rename = "itemPreset")]
    pub item_preset: Option<String>,
    pub items: Option<Vec<ItemSettings>>,
    #[serde(rename = "responseSources", default)]
    pub response_sources: Vec<ResponseSource>,
}

pub fn read_config(path: &str) -> SResult<SurveyConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let config: SurveyConfig =
        serde_json::from_str(&contents).context(ParsingJsonSnafu { path })?;
    Ok(config)
}

pub fn read_summary(path: &str) -> SResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path })?;
    Ok(js)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_minimal_config() {
        let js = r#"{
            "outputSettings": {"surveyName": "Identity Survey"},
            "scale": {"preset": "numeric7"},
            "itemPreset": "nationalIdentity"
        }"#;
        let config: SurveyConfig = serde_json::from_str(js).unwrap();
        assert_eq!(config.output_settings.survey_name, "Identity Survey");
        assert!(config.demographics.is_empty());
        assert!(config.response_sources.is_empty());
        assert_eq!(config.scale.encoding().unwrap(), EncodingStrategy::ExactLabel);
    }

    #[test]
    fn demographic_bounds_and_defaults() {
        let js = r#"[
            {"name": "Age", "kind": "number", "min": 10, "max": 100, "default": 25},
            {"name": "Country of Residence", "default": "USA"}
        ]"#;
        let settings: Vec<DemographicSettings> = serde_json::from_str(js).unwrap();
        let age = settings[0].field().unwrap();
        assert_eq!(
            age,
            DemographicField::number("Age")
                .with_range(Some(10), Some(100))
                .with_default("25")
        );
        let country = settings[1].field().unwrap();
        assert_eq!(country, DemographicField::text("Country of Residence").with_default("USA"));
    }

    #[test]
    fn unknown_kinds() {
        let d = DemographicSettings {
            name: "age".to_string(),
            kind: Some("date".to_string()),
            min: None,
            max: None,
            default: None,
        };
        assert!(d.field().is_err());
        let d = DemographicSettings {
            name: "country".to_string(),
            kind: None,
            min: Some(1),
            max: None,
            default: None,
        };
        assert!(d.field().is_err());
        let s = ScaleSettings {
            preset: None,
            encoding: Some("fuzzy".to_string()),
            labels: None,
        };
        assert!(s.encoding().is_err());
    }
}
