//! Decoded payload of `GET /api/statistiche`.
//!
//! One [`StatsResponse`] is produced per refresh cycle and fully replaces
//! the previous one. Field names follow the backend's JSON.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Approval threshold applied to `ProbabilitaFinanziamentoApprovato`.
///
/// Strictly greater-than: a probability of exactly 0.5 is a rejection.
pub const APPROVAL_THRESHOLD: f64 = 0.5;

// ---------------------------------------------------------------------------
// Response
// ---------------------------------------------------------------------------

/// Aggregate statistics for the currently filtered loan requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsResponse {
    #[serde(rename = "totale_richieste")]
    pub total_requests: u64,
    #[serde(rename = "importo_totale")]
    pub total_amount: f64,
    #[serde(rename = "percentuale_approvate")]
    pub approval_pct: f64,
    #[serde(rename = "importo_medio")]
    pub average_amount: f64,

    /// Request count per sex.
    #[serde(rename = "sesso_counts")]
    pub count_by_sex: Breakdown,
    /// Requested amount summed per property situation.
    #[serde(rename = "immobile_importi")]
    pub amount_by_property: Breakdown,
    /// Requested amount summed per education level.
    #[serde(rename = "titolo_importi")]
    pub amount_by_education: Breakdown,
    /// Request count per financing purpose.
    #[serde(rename = "scopo_counts")]
    pub count_by_purpose: Breakdown,

    #[serde(rename = "importo_medio_sesso")]
    pub avg_requested_by_sex: Breakdown,
    #[serde(rename = "importo_medio_approvato_sesso")]
    pub avg_approved_by_sex: Breakdown,
    #[serde(rename = "importo_medio_titolo")]
    pub avg_requested_by_education: Breakdown,
    #[serde(rename = "importo_medio_approvato_titolo")]
    pub avg_approved_by_education: Breakdown,

    /// The ten largest requests, largest first.
    #[serde(rename = "top10_importi", default)]
    pub top10: Vec<RecordSummary>,
}

/// One row of the top-10 table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordSummary {
    #[serde(rename = "RichiestaFinanziamentoID")]
    pub id: u64,
    #[serde(rename = "ImportoRichiesto", default)]
    pub requested_amount: Option<f64>,
    #[serde(rename = "Sesso", default)]
    pub sex: Option<String>,
    #[serde(rename = "TitoloStudio", default)]
    pub education: Option<String>,
    #[serde(rename = "Eta", default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(
        rename = "InformazioniImmobile",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub property: Option<String>,
    #[serde(
        rename = "ScopoFinanziamento",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub purpose: Option<String>,
    /// `None` when the model has not scored the request yet.
    #[serde(rename = "ProbabilitaFinanziamentoApprovato", default)]
    pub approval_probability: Option<f64>,
}

impl RecordSummary {
    /// Derived at render time, never stored. Unscored requests are rejections.
    pub fn is_approved(&self) -> bool {
        self.approval_probability.is_some_and(|p| p > APPROVAL_THRESHOLD)
    }
}

// ---------------------------------------------------------------------------
// Breakdown
// ---------------------------------------------------------------------------

/// Category label → value, in the order the backend sent them.
///
/// Decoded from a JSON object; `null` values become `0.0`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Breakdown(Vec<(String, f64)>);

impl Breakdown {
    pub fn labels(&self) -> Vec<String> {
        self.0.iter().map(|(k, _)| k.clone()).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.0.iter().map(|(_, v)| *v).collect()
    }

    pub fn get(&self, label: &str) -> Option<f64> {
        self.0.iter().find(|(k, _)| k == label).map(|(_, v)| *v)
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for Breakdown {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl Serialize for Breakdown {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (k, v) in &self.0 {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Breakdown {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct BreakdownVisitor;

        impl<'de> Visitor<'de> for BreakdownVisitor {
            type Value = Breakdown;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object mapping category labels to numbers")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Breakdown, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((label, value)) = access.next_entry::<String, Option<f64>>()? {
                    entries.push((label, value.unwrap_or(0.0)));
                }
                Ok(Breakdown(entries))
            }
        }

        deserializer.deserialize_map(BreakdownVisitor)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
