use crate::survey::{io_common::make_default_id, *};

use serde::{Deserialize, Serialize};

/// One response, as written by a form surface that exports JSON.
#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct JsonResponse {
    pub id: Option<String>,
    pub timestamp: Option<String>,
    #[serde(default)]
    pub demographics: JSMap<String, JSValue>,
    #[serde(default)]
    pub answers: JSMap<String, JSValue>,
}

pub fn read_json_responses(path: &str) -> SResult<Vec<ParsedResponse>> {
    let default_id = make_default_id(path);
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let responses: Vec<JsonResponse> =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path })?;

    let mut res: Vec<ParsedResponse> = Vec::new();
    for (idx, jr) in responses.into_iter().enumerate() {
        let id = jr.id.unwrap_or_else(|| default_id(idx + 1));
        let mut demographics: Vec<(String, String)> = Vec::new();
        for (name, v) in jr.demographics.iter() {
            demographics.push((name.clone(), read_js_scalar(&id, name, v)?));
        }
        let mut answers: Vec<(String, String)> = Vec::new();
        for (statement, v) in jr.answers.iter() {
            let label = read_js_scalar(&id, statement, v)?;
            // Same as the CSV and Excel readers: trimmed, and blank is unanswered.
            let label = label.trim();
            if !label.is_empty() {
                answers.push((statement.clone(), label.to_string()));
            }
        }
        let pr = ParsedResponse {
            id: Some(id),
            timestamp: jr.timestamp,
            demographics,
            answers,
        };
        debug!("read_json_responses: {:?}", pr);
        res.push(pr);
    }
    Ok(res)
}

// Form values are text or numbers; null is an empty value.
fn read_js_scalar(id: &str, key: &str, v: &JSValue) -> SResult<String> {
    match v {
        JSValue::String(s) => Ok(s.clone()),
        JSValue::Number(n) => Ok(n.to_string()),
        JSValue::Null => Ok("".to_string()),
        _ => whatever!("response {}: cannot read value {} for {:?}", id, v, key),
    }
}
