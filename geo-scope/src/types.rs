//! Entity records for the field audit warehouse.
//!
//! Records are plain data mirroring the upstream document store. Every field a
//! filter reads is optional and leniently deserialized: a missing or
//! wrongly-typed field reads as `None` and simply fails to match. Keys the
//! crate does not model, and raw values a typed field could not hold, are kept
//! in `extra` so records round-trip to the UI intact.
//!
//! With the `typescript` feature enabled, these types can be exported to
//! TypeScript using ts-rs for consistency with the field app.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[cfg(feature = "typescript")]
use ts_rs::TS;

use crate::lenient::passthrough;
use crate::timestamp::Timestamp;

/// Unmodelled keys carried through untouched.
pub type Extra = Map<String, Value>;

/// Anything addressable by a string identifier.
pub trait Record {
    /// The record identifier, if present and a string.
    fn id(&self) -> Option<&str>;
}

/// Ward display code; upstream stores it as a number or a numeric string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WardCode {
    Number(serde_json::Number),
    Text(String),
}

impl WardCode {
    /// Numeric value used for ordering. Non-numeric text counts as `0`.
    pub fn numeric(&self) -> f64 {
        match self {
            Self::Number(n) => n.as_f64().unwrap_or(0.0),
            Self::Text(text) => text.trim().parse::<f64>().unwrap_or(0.0),
        }
    }
}

/// Administrative subdivision at the top of the location hierarchy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase", remote = "Self")]
pub struct Ward {
    #[serde(default, deserialize_with = "crate::lenient::option", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Display ordering code
    #[serde(default, deserialize_with = "crate::lenient::option", skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "typescript", ts(type = "number | string | null"))]
    pub code: Option<WardCode>,
    /// Legacy identifier scheme
    #[serde(default, deserialize_with = "crate::lenient::option", skip_serializing_if = "Option::is_none")]
    pub pcode: Option<String>,
    #[serde(flatten)]
    #[cfg_attr(feature = "typescript", ts(skip))]
    pub extra: Extra,
}

impl Ward {
    /// Create a ward with an id and numeric code.
    pub fn new(id: impl Into<String>, code: i64) -> Self {
        Self {
            id: Some(id.into()),
            code: Some(WardCode::Number(code.into())),
            ..Default::default()
        }
    }

    /// Ordering key; a missing code sorts as `0`.
    pub fn sort_code(&self) -> f64 {
        self.code.as_ref().map(WardCode::numeric).unwrap_or(0.0)
    }
}

/// Ward reference held by an erf, in either identifier scheme.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase", remote = "Self")]
pub struct WardRef {
    #[serde(default, deserialize_with = "crate::lenient::option", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "crate::lenient::option", skip_serializing_if = "Option::is_none")]
    pub pcode: Option<String>,
    #[serde(flatten)]
    #[cfg_attr(feature = "typescript", ts(skip))]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase", remote = "Self")]
pub struct ErfAdmin {
    #[serde(default, deserialize_with = "crate::lenient::option", skip_serializing_if = "Option::is_none")]
    pub ward: Option<WardRef>,
    #[serde(flatten)]
    #[cfg_attr(feature = "typescript", ts(skip))]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase", remote = "Self")]
pub struct ErfMetadata {
    #[serde(default, deserialize_with = "crate::lenient::option", skip_serializing_if = "Option::is_none")]
    #[cfg_attr(
        feature = "typescript",
        ts(type = "number | { seconds: number, nanoseconds?: number } | string | null")
    )]
    pub updated_at: Option<Timestamp>,
    #[serde(flatten)]
    #[cfg_attr(feature = "typescript", ts(skip))]
    pub extra: Extra,
}

/// Cadastral land parcel belonging to one ward.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase", remote = "Self")]
pub struct Erf {
    #[serde(default, deserialize_with = "crate::lenient::option", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "crate::lenient::option", skip_serializing_if = "Option::is_none")]
    pub admin: Option<ErfAdmin>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<Value>,
    #[serde(default, deserialize_with = "crate::lenient::option", skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ErfMetadata>,
    #[serde(flatten)]
    #[cfg_attr(feature = "typescript", ts(skip))]
    pub extra: Extra,
}

impl Erf {
    /// Create an erf attached to a ward id.
    pub fn new(id: impl Into<String>, ward_id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            admin: Some(ErfAdmin {
                ward: Some(WardRef {
                    id: Some(ward_id.into()),
                    ..Default::default()
                }),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    /// Builder: set the last-updated timestamp.
    pub fn with_updated_at(mut self, updated_at: Timestamp) -> Self {
        let metadata = self.metadata.get_or_insert_with(ErfMetadata::default);
        metadata.extra.remove("updatedAt");
        metadata.updated_at = Some(updated_at);
        self
    }

    pub fn ward_ref(&self) -> Option<&WardRef> {
        self.admin.as_ref()?.ward.as_ref()
    }

    /// Last update in epoch milliseconds, `0` when unknown.
    pub fn updated_at_millis(&self) -> i64 {
        crate::timestamp::to_millis(self.metadata.as_ref().and_then(|m| m.updated_at.as_ref()))
    }
}

/// Pre-seeded erf geometry stub from the geometry index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase", remote = "Self")]
pub struct GeoEntry {
    #[serde(default, deserialize_with = "crate::lenient::option", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<Value>,
    #[serde(flatten)]
    #[cfg_attr(feature = "typescript", ts(skip))]
    pub extra: Extra,
}

/// Physical property located on an erf.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase", remote = "Self")]
pub struct Premise {
    #[serde(default, deserialize_with = "crate::lenient::option", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "crate::lenient::option", skip_serializing_if = "Option::is_none")]
    pub erf_id: Option<String>,
    #[serde(flatten)]
    #[cfg_attr(feature = "typescript", ts(skip))]
    pub extra: Extra,
}

impl Premise {
    pub fn new(id: impl Into<String>, erf_id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            erf_id: Some(erf_id.into()),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase", remote = "Self")]
pub struct PremiseRef {
    #[serde(default, deserialize_with = "crate::lenient::option", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(flatten)]
    #[cfg_attr(feature = "typescript", ts(skip))]
    pub extra: Extra,
}

/// Denormalized location references carried by a meter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase", remote = "Self")]
pub struct MeterAccessData {
    #[serde(default, deserialize_with = "crate::lenient::option", skip_serializing_if = "Option::is_none")]
    pub premise: Option<PremiseRef>,
    #[serde(default, deserialize_with = "crate::lenient::option", skip_serializing_if = "Option::is_none")]
    pub erf_id: Option<String>,
    #[serde(default, deserialize_with = "crate::lenient::option", skip_serializing_if = "Option::is_none")]
    pub ward_id: Option<String>,
    #[serde(flatten)]
    #[cfg_attr(feature = "typescript", ts(skip))]
    pub extra: Extra,
}

/// Utility measurement device tied to a premise.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase", remote = "Self")]
pub struct Meter {
    #[serde(default, deserialize_with = "crate::lenient::option", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "crate::lenient::option", skip_serializing_if = "Option::is_none")]
    pub access_data: Option<MeterAccessData>,
    #[serde(flatten)]
    #[cfg_attr(feature = "typescript", ts(skip))]
    pub extra: Extra,
}

impl Meter {
    /// Create a meter located at a premise / erf / ward.
    pub fn new(
        id: impl Into<String>,
        premise_id: impl Into<String>,
        erf_id: impl Into<String>,
        ward_id: impl Into<String>,
    ) -> Self {
        Self {
            id: Some(id.into()),
            access_data: Some(MeterAccessData {
                premise: Some(PremiseRef {
                    id: Some(premise_id.into()),
                    ..Default::default()
                }),
                erf_id: Some(erf_id.into()),
                ward_id: Some(ward_id.into()),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    pub fn premise_id(&self) -> Option<&str> {
        self.access_data.as_ref()?.premise.as_ref()?.id.as_deref()
    }

    pub fn erf_id(&self) -> Option<&str> {
        self.access_data.as_ref()?.erf_id.as_deref()
    }

    pub fn ward_id(&self) -> Option<&str> {
        self.access_data.as_ref()?.ward_id.as_deref()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase", remote = "Self")]
pub struct CreatedBy {
    #[serde(default, deserialize_with = "crate::lenient::option", skip_serializing_if = "Option::is_none")]
    pub by_uid: Option<String>,
    #[serde(flatten)]
    #[cfg_attr(feature = "typescript", ts(skip))]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase", remote = "Self")]
pub struct TransactionMetadata {
    #[serde(default, deserialize_with = "crate::lenient::option", skip_serializing_if = "Option::is_none")]
    pub created: Option<CreatedBy>,
    #[serde(flatten)]
    #[cfg_attr(feature = "typescript", ts(skip))]
    pub extra: Extra,
}

/// Location and actor references carried by a transaction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase", remote = "Self")]
pub struct TransactionAccessData {
    #[serde(default, deserialize_with = "crate::lenient::option", skip_serializing_if = "Option::is_none")]
    pub premise: Option<PremiseRef>,
    #[serde(default, deserialize_with = "crate::lenient::option", skip_serializing_if = "Option::is_none")]
    pub erf_id: Option<String>,
    #[serde(default, deserialize_with = "crate::lenient::option", skip_serializing_if = "Option::is_none")]
    pub ward_id: Option<String>,
    #[serde(default, deserialize_with = "crate::lenient::option", skip_serializing_if = "Option::is_none")]
    pub metadata: Option<TransactionMetadata>,
    #[serde(flatten)]
    #[cfg_attr(feature = "typescript", ts(skip))]
    pub extra: Extra,
}

/// Recorded field event (discovery, installation, inspection, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase", remote = "Self")]
pub struct Transaction {
    #[serde(default, deserialize_with = "crate::lenient::option", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "crate::lenient::option", skip_serializing_if = "Option::is_none")]
    pub access_data: Option<TransactionAccessData>,
    #[serde(flatten)]
    #[cfg_attr(feature = "typescript", ts(skip))]
    pub extra: Extra,
}

impl Transaction {
    /// Create a transaction located at a premise / erf / ward.
    pub fn new(
        id: impl Into<String>,
        premise_id: impl Into<String>,
        erf_id: impl Into<String>,
        ward_id: impl Into<String>,
    ) -> Self {
        Self {
            id: Some(id.into()),
            access_data: Some(TransactionAccessData {
                premise: Some(PremiseRef {
                    id: Some(premise_id.into()),
                    ..Default::default()
                }),
                erf_id: Some(erf_id.into()),
                ward_id: Some(ward_id.into()),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    /// Builder: record the acting user.
    pub fn with_actor(mut self, uid: impl Into<String>) -> Self {
        let access = self
            .access_data
            .get_or_insert_with(TransactionAccessData::default);
        let metadata = access
            .metadata
            .get_or_insert_with(TransactionMetadata::default);
        metadata.extra.remove("created");
        metadata.created = Some(CreatedBy {
            by_uid: Some(uid.into()),
            ..Default::default()
        });
        self
    }

    pub fn premise_id(&self) -> Option<&str> {
        self.access_data.as_ref()?.premise.as_ref()?.id.as_deref()
    }

    pub fn erf_id(&self) -> Option<&str> {
        self.access_data.as_ref()?.erf_id.as_deref()
    }

    pub fn ward_id(&self) -> Option<&str> {
        self.access_data.as_ref()?.ward_id.as_deref()
    }

    /// Uid of the user who created the transaction.
    pub fn actor_uid(&self) -> Option<&str> {
        self.access_data
            .as_ref()?
            .metadata
            .as_ref()?
            .created
            .as_ref()?
            .by_uid
            .as_deref()
    }
}

passthrough!(
    Ward,
    WardRef,
    ErfAdmin,
    ErfMetadata,
    Erf,
    GeoEntry,
    Premise,
    PremiseRef,
    MeterAccessData,
    Meter,
    CreatedBy,
    TransactionMetadata,
    TransactionAccessData,
    Transaction,
);

impl Record for Ward {
    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

impl Record for Erf {
    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

impl Record for Premise {
    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

impl Record for Meter {
    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

impl Record for Transaction {
    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_erf_reads_nested_fields() {
        let erf: Erf = serde_json::from_value(json!({
            "id": "e1",
            "admin": { "ward": { "id": "w1", "pcode": "ZA1048001" } },
            "metadata": { "updatedAt": { "seconds": 5 }, "updatedByUser": "kim" },
            "erfNo": "1234"
        }))
        .unwrap();

        let ward = erf.ward_ref().unwrap();
        assert_eq!(ward.id.as_deref(), Some("w1"));
        assert_eq!(ward.pcode.as_deref(), Some("ZA1048001"));
        assert_eq!(erf.updated_at_millis(), 5000);
        assert_eq!(erf.extra.get("erfNo"), Some(&json!("1234")));
    }

    #[test]
    fn test_malformed_nested_fields_read_as_none() {
        let meter: Meter = serde_json::from_value(json!({
            "id": "m1",
            "accessData": { "premise": "p1", "erfId": 7, "wardId": "w1" }
        }))
        .unwrap();

        assert_eq!(meter.premise_id(), None);
        assert_eq!(meter.erf_id(), None);
        assert_eq!(meter.ward_id(), Some("w1"));

        let trn: Transaction = serde_json::from_value(json!({ "id": "t1", "accessData": "nope" })).unwrap();
        assert!(trn.access_data.is_none());
        assert_eq!(trn.actor_uid(), None);
    }

    #[test]
    fn test_ward_code_ordering_key() {
        let numeric: Ward = serde_json::from_value(json!({ "id": "w", "code": 12 })).unwrap();
        let text: Ward = serde_json::from_value(json!({ "id": "w", "code": " 7 " })).unwrap();
        let junk: Ward = serde_json::from_value(json!({ "id": "w", "code": "x" })).unwrap();
        let missing: Ward = serde_json::from_value(json!({ "id": "w" })).unwrap();

        assert_eq!(numeric.sort_code(), 12.0);
        assert_eq!(text.sort_code(), 7.0);
        assert_eq!(junk.sort_code(), 0.0);
        assert_eq!(missing.sort_code(), 0.0);
    }

    #[test]
    fn test_record_round_trips_unmodelled_keys() {
        let input = json!({
            "id": "p1",
            "erfId": "e1",
            "address": { "street": "Main" },
            "occupancy": "vacant"
        });
        let premise: Premise = serde_json::from_value(input.clone()).unwrap();
        assert_eq!(serde_json::to_value(&premise).unwrap(), input);
    }

    #[test]
    fn test_transaction_actor_builder() {
        let trn = Transaction::new("t1", "p1", "e1", "w1").with_actor("u9");
        assert_eq!(trn.actor_uid(), Some("u9"));
        assert_eq!(trn.premise_id(), Some("p1"));

        let value = serde_json::to_value(&trn).unwrap();
        assert_eq!(value["accessData"]["metadata"]["created"]["byUid"], json!("u9"));
    }

    #[test]
    fn test_wrong_typed_fields_round_trip() {
        let premise_json = json!({ "id": "p1", "erfId": 7, "note": "x" });
        let ward_json = json!({ "id": 5, "code": 1, "name": "Ward 5" });

        let premise: Premise = serde_json::from_value(premise_json.clone()).unwrap();
        let ward: Ward = serde_json::from_value(ward_json.clone()).unwrap();

        assert_eq!(premise.erf_id, None);
        assert_eq!(ward.id, None);
        assert_eq!(serde_json::to_value(&premise).unwrap(), premise_json);
        assert_eq!(serde_json::to_value(&ward).unwrap(), ward_json);
    }

    #[test]
    fn test_nested_wrong_typed_fields_round_trip() {
        let input = json!({
            "id": "m1",
            "accessData": { "premise": "p1", "erfId": 7, "wardId": "w1" },
            "state": null
        });
        let meter: Meter = serde_json::from_value(input.clone()).unwrap();

        assert_eq!(meter.premise_id(), None);
        assert_eq!(meter.erf_id(), None);
        assert_eq!(serde_json::to_value(&meter).unwrap(), input);

        let trn_json = json!({ "id": "t1", "accessData": "nope" });
        let trn: Transaction = serde_json::from_value(trn_json.clone()).unwrap();
        assert!(trn.access_data.is_none());
        assert_eq!(serde_json::to_value(&trn).unwrap(), trn_json);
    }

    #[test]
    fn test_builder_replaces_restored_value() {
        let erf: Erf = serde_json::from_value(json!({
            "id": "e1",
            "metadata": { "updatedAt": true }
        }))
        .unwrap();
        assert_eq!(erf.updated_at_millis(), 0);

        let erf = erf.with_updated_at(Timestamp::Native { millis: 42 });
        let value = serde_json::to_value(&erf).unwrap();
        assert_eq!(value["metadata"], json!({ "updatedAt": 42 }));
    }
}
