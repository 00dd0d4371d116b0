use serde::Deserialize;
use std::collections::BTreeMap;

/// The body of a public exchange-rate endpoint, e.g. `GET /v6/latest/USD`.
///
/// Only `rates` is required. Providers that report a `result` field use
/// `"success"` for a usable answer.
#[derive(Debug, Clone, Deserialize)]
pub struct RatesResponse {
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default, alias = "base_code")]
    pub base: Option<String>,
    pub rates: BTreeMap<String, f64>,
}

impl RatesResponse {
    pub fn is_success(&self) -> bool {
        self.result.as_deref().is_none_or(|r| r.eq_ignore_ascii_case("success"))
    }
}
