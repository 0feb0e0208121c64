//! # Records
//!
//! The two resources served by the remote data store (tax records and
//! countries), plus the [`Draft`] an edit works on.
//!
//! Fields use `#[serde(default)]` for resilience against sparse mock data,
//! and any field not modeled here is kept in `extra` so that an update
//! round-trips the record faithfully. `serde(deny_unknown_fields)` is
//! intentionally NOT used.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::ValidationError;
use crate::identity::{CountryId, RecordId};

/// A customer tax record as served by the `tax-records` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxRecord {
    /// Identifier assigned by the remote store.
    pub id: RecordId,
    /// Display name of the entity. User-editable.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    /// Short categorical value used for tag styling. Not editable here.
    ///
    /// The outer `Option` records whether the key was sent at all, the inner
    /// one whether it was `null`; both survive a round trip.
    #[serde(
        default,
        deserialize_with = "keep_presence",
        skip_serializing_if = "Option::is_none"
    )]
    pub gender: Option<Option<String>>,
    /// Raw request date, usually an ISO-8601 string. Same presence rules as
    /// `gender`.
    #[serde(
        default,
        deserialize_with = "keep_presence",
        skip_serializing_if = "Option::is_none"
    )]
    pub request_date: Option<Option<String>>,
    /// Country name; matches a [`Country::name`] for filtering. User-editable.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub country: String,
    /// Fields returned by the API that this crate does not model.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TaxRecord {
    /// Gender value, if sent and not `null`.
    pub fn gender(&self) -> Option<&str> {
        self.gender.as_ref().and_then(|g| g.as_deref())
    }

    /// Raw request date, if sent and not `null`.
    pub fn request_date(&self) -> Option<&str> {
        self.request_date.as_ref().and_then(|d| d.as_deref())
    }

    /// Build the update payload for this record: every original field is
    /// kept, only `name` and `country` are taken from the draft.
    pub fn with_draft(&self, draft: &Draft) -> TaxRecord {
        TaxRecord {
            name: draft.name.clone(),
            country: draft.country.clone(),
            ..self.clone()
        }
    }
}

/// A country as served by the `countries` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Country {
    /// Identifier assigned by the remote store.
    pub id: CountryId,
    /// Display name; the only field the rest of the system reads.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    /// Fields returned by the API that this crate does not model.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The editable fields of a [`TaxRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DraftField {
    /// The record's display name.
    Name,
    /// The record's country.
    Country,
}

impl DraftField {
    /// Lowercase field name, as used in validation messages.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Country => "country",
        }
    }
}

impl fmt::Display for DraftField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Uncommitted copy of a record's editable fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    /// Working value of the name field.
    pub name: String,
    /// Working value of the country field.
    pub country: String,
}

impl Draft {
    /// Snapshot the editable fields of `record`.
    pub fn from_record(record: &TaxRecord) -> Self {
        Self {
            name: record.name.clone(),
            country: record.country.clone(),
        }
    }

    /// Read one field.
    pub fn get(&self, field: DraftField) -> &str {
        match field {
            DraftField::Name => &self.name,
            DraftField::Country => &self.country,
        }
    }

    /// Overwrite one field.
    pub fn set(&mut self, field: DraftField, value: impl Into<String>) {
        match field {
            DraftField::Name => self.name = value.into(),
            DraftField::Country => self.country = value.into(),
        }
    }

    /// Both fields must be non-empty after trimming whitespace.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for field in [DraftField::Name, DraftField::Country] {
            if self.get(field).trim().is_empty() {
                return Err(ValidationError::MissingRequiredField {
                    field: field.as_str(),
                });
            }
        }
        Ok(())
    }
}

fn keep_presence<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Option<String>>, D::Error> {
    Ok(Some(Option::<String>::deserialize(deserializer)?))
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> TaxRecord {
        serde_json::from_value(json!({
            "id": "1",
            "name": "Acme Ltd",
            "gender": "Female",
            "requestDate": "2024-01-05T10:00:00.000Z",
            "country": "Germany",
            "createdAt": 1717000000
        }))
        .unwrap()
    }

    #[test]
    fn tax_record_reads_camel_case_and_keeps_unknown_fields() {
        let record = sample();
        assert_eq!(record.id.as_str(), "1");
        assert_eq!(record.request_date(), Some("2024-01-05T10:00:00.000Z"));
        assert_eq!(record.extra.get("createdAt"), Some(&json!(1717000000)));
    }

    #[test]
    fn tax_record_defaults_missing_and_null_fields() {
        let record: TaxRecord =
            serde_json::from_value(json!({ "id": 3, "name": null })).unwrap();
        assert_eq!(record.name, "");
        assert_eq!(record.country, "");
        assert!(record.gender().is_none());
        assert!(record.request_date().is_none());
    }

    #[test]
    fn with_draft_replaces_only_editable_fields() {
        let record = sample();
        let draft = Draft {
            name: "Alice".into(),
            country: "Canada".into(),
        };
        let payload = record.with_draft(&draft);
        assert_eq!(payload.name, "Alice");
        assert_eq!(payload.country, "Canada");
        assert_eq!(payload.id, record.id);
        assert_eq!(payload.gender, record.gender);
        assert_eq!(payload.request_date, record.request_date);
        assert_eq!(payload.extra, record.extra);
    }

    #[test]
    fn payload_serializes_unknown_fields_back() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(value["createdAt"], json!(1717000000));
        assert_eq!(value["requestDate"], json!("2024-01-05T10:00:00.000Z"));
        assert_eq!(value["id"], json!("1"));
    }

    #[test]
    fn payload_keeps_null_fields_and_omits_absent_ones() {
        let with_nulls: TaxRecord = serde_json::from_value(json!({
            "id": "1",
            "name": "A",
            "gender": null,
            "requestDate": null,
            "country": "Peru"
        }))
        .unwrap();
        assert!(with_nulls.gender().is_none());

        let draft = Draft {
            name: "B".into(),
            country: "Peru".into(),
        };
        let value = serde_json::to_value(with_nulls.with_draft(&draft)).unwrap();
        assert_eq!(
            value,
            json!({
                "id": "1",
                "name": "B",
                "gender": null,
                "requestDate": null,
                "country": "Peru"
            })
        );

        let sparse: TaxRecord =
            serde_json::from_value(json!({ "id": "2", "name": "C", "country": "Chile" })).unwrap();
        let value = serde_json::to_value(&sparse).unwrap();
        assert!(value.get("gender").is_none());
        assert!(value.get("requestDate").is_none());
    }

    #[test]
    fn draft_validation_trims_whitespace() {
        let mut draft = Draft::from_record(&sample());
        assert!(draft.validate().is_ok());

        draft.set(DraftField::Name, "   ");
        assert_eq!(
            draft.validate(),
            Err(ValidationError::MissingRequiredField { field: "name" })
        );

        draft.set(DraftField::Name, "Bob");
        draft.set(DraftField::Country, "\t");
        assert_eq!(
            draft.validate(),
            Err(ValidationError::MissingRequiredField { field: "country" })
        );
    }

    #[test]
    fn country_keeps_extra_fields() {
        let country: Country =
            serde_json::from_value(json!({ "id": "9", "name": "Peru", "code": "PE" })).unwrap();
        assert_eq!(country.name, "Peru");
        assert_eq!(country.extra.get("code"), Some(&json!("PE")));
    }
}
