use serde::{Deserialize, Deserializer, Serialize};

/// Partial item update; only present fields are applied. `age_days`
/// arrives as a number or a numeric string.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateItemRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub condition: Option<String>,
    pub zipcode: Option<String>,
    pub image: Option<String>,
    pub comments: Option<String>,
    #[serde(default, deserialize_with = "de_number_or_string")]
    pub age_days: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f64),
    String(String),
}

fn de_number_or_string<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<NumberOrString>::deserialize(deserializer)?;
    Ok(match value {
        None => None,
        Some(NumberOrString::Number(n)) => Some(n),
        Some(NumberOrString::String(s)) => s.trim().parse().ok(),
    })
}

/// Form-field coercion used by the multipart create path.
pub(crate) fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn age_days_accepts_number_and_string() {
        let req: UpdateItemRequest = serde_json::from_str(r#"{"age_days": 365}"#).unwrap();
        assert_eq!(req.age_days, Some(365.0));

        let req: UpdateItemRequest = serde_json::from_str(r#"{"age_days": "365"}"#).unwrap();
        assert_eq!(req.age_days, Some(365.0));
    }

    #[test]
    fn unparseable_age_days_is_treated_as_absent() {
        let req: UpdateItemRequest = serde_json::from_str(r#"{"age_days": "old"}"#).unwrap();
        assert_eq!(req.age_days, None);
    }

    #[test]
    fn all_fields_are_independently_optional() {
        let req: UpdateItemRequest = serde_json::from_str(r#"{"zipcode": "10001"}"#).unwrap();
        assert_eq!(req.zipcode.as_deref(), Some("10001"));
        assert!(req.name.is_none());
        assert!(req.age_days.is_none());
    }

    #[test]
    fn parse_number_trims_and_rejects_garbage() {
        assert_eq!(parse_number(" 730 "), Some(730.0));
        assert_eq!(parse_number("2.5"), Some(2.5));
        assert_eq!(parse_number("abc"), None);
    }
}
