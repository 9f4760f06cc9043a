use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

/// Marketplace item. The id is a decimal-integer string assigned by the
/// service, not by the database; `age_years` is derived from `age_days`
/// and kept consistent on every update.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Item {
    pub id: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub condition: Option<String>,
    pub zipcode: Option<String>,
    pub image: Option<String>,
    pub comments: Option<String>,
    pub age_days: Option<f64>,
    pub age_years: Option<f64>,
    pub date_added: i64, // unix seconds, set once at creation
    #[serde(rename = "updatedAt", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<OffsetDateTime>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Item {
        Item {
            id: "7".into(),
            name: Some("Chair".into()),
            description: None,
            category: Some("Furniture".into()),
            condition: Some("Good".into()),
            zipcode: None,
            image: None,
            comments: None,
            age_days: Some(730.0),
            age_years: Some(2.0),
            date_added: 1_700_000_000,
            updated_at: None,
        }
    }

    #[test]
    fn id_stays_a_decimal_string_on_the_wire() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["id"], "7");
        assert_eq!(json["age_years"], 2.0);
        assert_eq!(json["date_added"], 1_700_000_000_i64);
    }

    #[test]
    fn updated_at_is_omitted_until_first_update() {
        let json = serde_json::to_value(sample()).unwrap();
        assert!(json.get("updatedAt").is_none());

        let mut item = sample();
        item.updated_at = Some(OffsetDateTime::UNIX_EPOCH);
        let json = serde_json::to_value(item).unwrap();
        assert!(json.get("updatedAt").is_some());
    }
}
