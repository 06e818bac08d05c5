//! The business record, the only entity the directory persists.
//!
//! Records travel as flat JSON rows, the way the hosted table stores them:
//!
//! ```json
//! { "id": 7, "name": "Ana's Shop", "category": "Market", "lng": -13.23, "lat": 8.48,
//!   "powerType": "three-phase", "acceptsCardPayment": true, "photoUrl": null }
//! ```
//!
//! Deserialisation is lenient about the columns the store may leave empty
//! (`category`, `powerType`, `acceptsCardPayment`, `photoUrl`) and fills in
//! their defaults, so every record held in memory is already normalised.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Category given to records submitted without one.
pub const DEFAULT_CATEGORY: &str = "General";

/// Opaque identifier assigned by the store.
///
/// Hosted tables hand out either integer or UUID keys; both are kept as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Signed(i64),
            Unsigned(u64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(text) => RecordId(text),
            RawId::Signed(n) => RecordId(n.to_string()),
            RawId::Unsigned(n) => RecordId(n.to_string()),
        })
    }
}

/// A longitude/latitude pair in degrees (WGS84).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lng: f64,
    pub lat: f64,
}

impl Coordinates {
    pub fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }

    /// Both components finite and inside the WGS84 ranges.
    pub fn is_valid(&self) -> bool {
        self.lng.is_finite()
            && self.lat.is_finite()
            && (-180.0..=180.0).contains(&self.lng)
            && (-90.0..=90.0).contains(&self.lat)
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}, {:.4}", self.lng, self.lat)
    }
}

/// How a business is powered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PowerType {
    #[default]
    ThreePhase,
    SinglePhase,
    Generator,
}

impl PowerType {
    pub const ALL: [PowerType; 3] = [
        PowerType::ThreePhase,
        PowerType::SinglePhase,
        PowerType::Generator,
    ];

    /// The wire value, also used as the `<option>` value in forms.
    pub fn as_str(&self) -> &'static str {
        match self {
            PowerType::ThreePhase => "three-phase",
            PowerType::SinglePhase => "single-phase",
            PowerType::Generator => "generator",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PowerType::ThreePhase => "Three-phase",
            PowerType::SinglePhase => "Single-phase",
            PowerType::Generator => "Generator",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.as_str() == value)
    }
}

impl fmt::Display for PowerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A record as returned by the store, `id` included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessRecord {
    pub id: RecordId,
    pub name: String,
    #[serde(default = "default_category", deserialize_with = "category_or_default")]
    pub category: String,
    #[serde(flatten)]
    pub position: Coordinates,
    #[serde(default, deserialize_with = "null_as_default")]
    pub power_type: PowerType,
    #[serde(default, deserialize_with = "null_as_default")]
    pub accepts_card_payment: bool,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub photo_url: Option<String>,
}

impl BusinessRecord {
    /// True when every submitted field of `new` matches this record.
    pub fn matches(&self, new: &NewBusinessRecord) -> bool {
        self.name == new.name
            && self.category == new.category
            && self.position == new.position
            && self.power_type == new.power_type
            && self.accepts_card_payment == new.accepts_card_payment
            && self.photo_url == new.photo_url
    }
}

/// A record about to be inserted; the store assigns the `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBusinessRecord {
    pub name: String,
    #[serde(default = "default_category", deserialize_with = "category_or_default")]
    pub category: String,
    #[serde(flatten)]
    pub position: Coordinates,
    #[serde(default, deserialize_with = "null_as_default")]
    pub power_type: PowerType,
    #[serde(default, deserialize_with = "null_as_default")]
    pub accepts_card_payment: bool,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "blank_as_none")]
    pub photo_url: Option<String>,
}

impl NewBusinessRecord {
    /// Builds a record with the defaults applied: name trimmed, blank category
    /// replaced by [`DEFAULT_CATEGORY`], three-phase power, no card payment.
    pub fn new(name: &str, category: &str, position: Coordinates) -> Self {
        Self {
            name: name.trim().to_string(),
            category: normalize_category(category),
            position,
            power_type: PowerType::default(),
            accepts_card_payment: false,
            photo_url: None,
        }
    }

    pub fn with_power_type(mut self, power_type: PowerType) -> Self {
        self.power_type = power_type;
        self
    }

    pub fn with_card_payment(mut self, accepts: bool) -> Self {
        self.accepts_card_payment = accepts;
        self
    }

    pub fn with_photo_url(mut self, url: Option<&str>) -> Self {
        self.photo_url = url
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .map(str::to_string);
        self
    }

    /// The minimum the directory requires of a stored record.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("name must not be empty".to_string());
        }
        if !self.position.is_valid() {
            return Err(format!("invalid coordinates: {}", self.position));
        }
        Ok(())
    }

    pub fn into_record(self, id: RecordId) -> BusinessRecord {
        BusinessRecord {
            id,
            name: self.name,
            category: self.category,
            position: self.position,
            power_type: self.power_type,
            accepts_card_payment: self.accepts_card_payment,
            photo_url: self.photo_url,
        }
    }
}

pub fn normalize_category(category: &str) -> String {
    let trimmed = category.trim();
    if trimmed.is_empty() {
        DEFAULT_CATEGORY.to_string()
    } else {
        trimmed.to_string()
    }
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

fn category_or_default<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(normalize_category(raw.as_deref().unwrap_or_default()))
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn blank_as_none<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn store_row_with_numeric_id_and_nulls_gets_defaults() {
        let row = json!({
            "id": 42,
            "name": "Joe Bar",
            "category": null,
            "lng": -13,
            "lat": 8.5,
            "powerType": null,
            "photoUrl": "  "
        });
        let record: BusinessRecord = serde_json::from_value(row).unwrap();
        assert_eq!(record.id.as_str(), "42");
        assert_eq!(record.category, DEFAULT_CATEGORY);
        assert_eq!(record.position, Coordinates::new(-13.0, 8.5));
        assert_eq!(record.power_type, PowerType::ThreePhase);
        assert!(!record.accepts_card_payment);
        assert_eq!(record.photo_url, None);
    }

    #[test]
    fn uuid_ids_stay_opaque() {
        let row = json!({
            "id": "3f1c9a0e-8d7b-4c2f-9e55-1a2b3c4d5e6f",
            "name": "Ana's Shop",
            "category": "Market",
            "lng": -13.2,
            "lat": 8.48,
            "powerType": "generator",
            "acceptsCardPayment": true
        });
        let record: BusinessRecord = serde_json::from_value(row).unwrap();
        assert_eq!(record.id.as_str(), "3f1c9a0e-8d7b-4c2f-9e55-1a2b3c4d5e6f");
        assert_eq!(record.power_type, PowerType::Generator);
        assert!(record.accepts_card_payment);
    }

    #[test]
    fn new_record_serializes_flat_camel_case_row() {
        let new = NewBusinessRecord::new("  Ana's Shop ", "", Coordinates::new(-13.2, 8.5))
            .with_power_type(PowerType::SinglePhase)
            .with_card_payment(true);
        let value = serde_json::to_value(&new).unwrap();
        assert_eq!(
            value,
            json!({
                "name": "Ana's Shop",
                "category": "General",
                "lng": -13.2,
                "lat": 8.5,
                "powerType": "single-phase",
                "acceptsCardPayment": true
            })
        );
    }

    #[test]
    fn validate_rejects_blank_name_and_bad_coordinates() {
        let ok = NewBusinessRecord::new("Shop", "Market", Coordinates::new(-13.2, 8.5));
        assert!(ok.validate().is_ok());

        let mut blank = ok.clone();
        blank.name = "   ".to_string();
        assert!(blank.validate().is_err());

        let off_planet = NewBusinessRecord::new("Shop", "", Coordinates::new(200.0, 8.5));
        assert!(off_planet.validate().is_err());
        let nan = NewBusinessRecord::new("Shop", "", Coordinates::new(f64::NAN, 8.5));
        assert!(nan.validate().is_err());
    }

    #[test]
    fn power_type_parses_wire_values_only() {
        assert_eq!(PowerType::parse("three-phase"), Some(PowerType::ThreePhase));
        assert_eq!(PowerType::parse("generator"), Some(PowerType::Generator));
        assert_eq!(PowerType::parse("Generator"), None);
    }

    #[test]
    fn photo_url_is_trimmed_and_blank_dropped() {
        let base = NewBusinessRecord::new("Shop", "", Coordinates::new(0.0, 0.0));
        assert_eq!(base.clone().with_photo_url(Some("  ")).photo_url, None);
        assert_eq!(
            base.with_photo_url(Some(" https://img.example/a.jpg ")).photo_url.as_deref(),
            Some("https://img.example/a.jpg")
        );
    }
}
