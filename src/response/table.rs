use serde::Deserialize;
use serde_json::Value;

use crate::response::HandlerError;

const DEFAULT_TEXT: &str = "N/A";
const DEFAULT_CARRIER: &str = "Nenhuma cotação";
const DEFAULT_MONEY: &str = "R$ 0,00";
const DEFAULT_RATE: &str = "0%";

/// One rendered results row. Every cell is already a display string with the
/// per-column fallback applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayRow {
    pub nota: String,
    pub descricao: String,
    pub transportadora: String,
    pub frete: String,
    pub prazo: String,
    pub imposto: String,
    pub aliquota: String,
}

#[derive(Debug, Deserialize)]
struct TablePayload {
    data: Option<Vec<RowRecord>>,
}

#[derive(Debug, Deserialize)]
struct RowRecord {
    #[serde(rename = "Nota")]
    nota: Option<Value>,
    #[serde(rename = "Descricao", alias = "Descrição")]
    descricao: Option<Value>,
    #[serde(rename = "Transportadora")]
    transportadora: Option<Value>,
    #[serde(rename = "Frete")]
    frete: Option<Value>,
    #[serde(rename = "Prazo")]
    prazo: Option<Value>,
    #[serde(rename = "Imposto")]
    imposto: Option<Value>,
    #[serde(rename = "Aliquota", alias = "Alíquota")]
    aliquota: Option<Value>,
}

/// Parses a `{"data": [...]}` payload into display rows. A missing or null
/// `data` key renders as zero rows rather than an error.
pub fn parse_rows(body: &[u8]) -> Result<Vec<DisplayRow>, HandlerError> {
    let payload: TablePayload = serde_json::from_slice(body)?;
    Ok(payload
        .data
        .unwrap_or_default()
        .iter()
        .map(DisplayRow::from_record)
        .collect())
}

impl DisplayRow {
    fn from_record(record: &RowRecord) -> Self {
        Self {
            nota: cell(record.nota.as_ref(), DEFAULT_TEXT),
            descricao: cell(record.descricao.as_ref(), DEFAULT_TEXT),
            transportadora: cell(record.transportadora.as_ref(), DEFAULT_CARRIER),
            frete: cell(record.frete.as_ref(), DEFAULT_MONEY),
            prazo: cell(record.prazo.as_ref(), DEFAULT_TEXT),
            imposto: cell(record.imposto.as_ref(), DEFAULT_MONEY),
            aliquota: cell(record.aliquota.as_ref(), DEFAULT_RATE),
        }
    }
}

// Absent, null and empty-string cells all take the column fallback. Other
// scalars keep their JSON text form.
fn cell(value: Option<&Value>, fallback: &str) -> String {
    match value {
        None => fallback.to_string(),
        Some(Value::String(text)) if text.is_empty() => fallback.to_string(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}
