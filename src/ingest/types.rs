// src/ingest/types.rs
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::DashboardError;

/// Date format used by the catalog for `Data da Compra`.
pub const PURCHASE_DATE_FORMAT: &str = "%d/%m/%Y";

/// One sale, typed and validated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SalesRecord {
    pub purchase_date: NaiveDate,
    pub price: f64,
    pub location: String, // state label, e.g. "SP"
    pub latitude: f64,
    pub longitude: f64,
    pub category: String,
    pub seller: String,

    // Carried through for the UI; aggregation ignores them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub freight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installments: Option<u32>,
}

/// Accepts any JSON value; one that does not fit `T` becomes `None`.
/// Carried-only columns never reject a row.
fn lenient<'de, D, T>(d: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let v = serde_json::Value::deserialize(d)?;
    Ok(serde_json::from_value(v).ok())
}

/// Row exactly as the catalog sends it.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct WireRecord {
    #[serde(rename = "Produto", default, deserialize_with = "lenient")]
    pub product: Option<String>,
    #[serde(rename = "Categoria do Produto")]
    pub category: String,
    #[serde(rename = "Preço")]
    pub price: f64,
    #[serde(rename = "Frete", default, deserialize_with = "lenient")]
    pub freight: Option<f64>,
    #[serde(rename = "Data da Compra")]
    pub purchase_date: String,
    #[serde(rename = "Vendedor")]
    pub seller: String,
    #[serde(rename = "Local da compra")]
    pub location: String,
    #[serde(rename = "Avaliação da compra", default, deserialize_with = "lenient")]
    pub rating: Option<u8>,
    #[serde(rename = "Tipo de pagamento", default, deserialize_with = "lenient")]
    pub payment_type: Option<String>,
    #[serde(rename = "Quantidade de parcelas", default, deserialize_with = "lenient")]
    pub installments: Option<u32>,
    pub lat: f64,
    pub lon: f64,
}

impl TryFrom<WireRecord> for SalesRecord {
    type Error = String;

    fn try_from(w: WireRecord) -> Result<Self, Self::Error> {
        let purchase_date = NaiveDate::parse_from_str(w.purchase_date.trim(), PURCHASE_DATE_FORMAT)
            .map_err(|e| format!("bad purchase date '{}': {e}", w.purchase_date))?;
        if !w.price.is_finite() || w.price < 0.0 {
            return Err(format!("price must be a non-negative number, got {}", w.price));
        }
        Ok(SalesRecord {
            purchase_date,
            price: w.price,
            location: w.location,
            latitude: w.lat,
            longitude: w.lon,
            category: w.category,
            seller: w.seller,
            product: w.product,
            freight: w.freight,
            rating: w.rating,
            payment_type: w.payment_type,
            installments: w.installments,
        })
    }
}

/// A row the loader had to exclude, with its position in the payload.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RejectedRow {
    pub index: usize,
    pub reason: String,
}

/// Parsed payload: accepted records plus everything that was dropped.
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub records: Vec<SalesRecord>,
    pub rejected: Vec<RejectedRow>,
}

/// Catalog query, already in wire form (`regiao`, `ano`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogQuery {
    pub regiao: String,
    pub ano: String,
}

#[async_trait::async_trait]
pub trait SalesSource: Send + Sync {
    async fn fetch(&self, query: &CatalogQuery) -> Result<LoadReport, DashboardError>;
    fn name(&self) -> &'static str;
}
