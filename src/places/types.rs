//! Wire types for the Places API (New) `places:searchText` endpoint.

use serde::{Deserialize, Serialize};

/// Request body for `POST /v1/places:searchText`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchTextRequest {
    pub text_query: String,
    pub language_code: String,
    pub max_result_count: u32,
}

/// Response body for `places:searchText`.
///
/// The API omits the `places` array entirely when nothing matched.
#[derive(Debug, Deserialize)]
pub struct SearchTextResponse {
    #[serde(default)]
    pub places: Vec<PlaceCandidate>,
}

/// One candidate place, shaped by the request field mask.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceCandidate {
    pub id: String,
    pub display_name: Option<LocalizedText>,
    pub formatted_address: Option<String>,
    pub website_uri: Option<String>,
    pub rating: Option<f64>,
    pub primary_type_display_name: Option<LocalizedText>,
}

impl PlaceCandidate {
    /// The candidate's display name, empty when the API omitted it.
    pub fn name(&self) -> &str {
        self.display_name.as_ref().map(|t| t.text.as_str()).unwrap_or("")
    }
}

/// The API's localized-string wrapper (`{"text": ..., "languageCode": ...}`).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalizedText {
    pub text: String,
    #[serde(default)]
    pub language_code: Option<String>,
}
