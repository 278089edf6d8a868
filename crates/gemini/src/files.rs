//! Wire types for the Generative Language `v1beta` REST API.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Remote files
// ---------------------------------------------------------------------------

/// Processing state of an uploaded file on the remote service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FileState {
    Processing,
    Active,
    Failed,
    /// Forward compatibility with states this client does not act on.
    #[serde(other)]
    Unknown,
}

/// An uploaded file as reported by the remote service.
///
/// The `name` (e.g. `files/abc-123`) is the opaque handle used for
/// status polling, inference references, and deletion.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteFile {
    pub name: String,
    /// Download/reference URI used in `generateContent` requests.
    #[serde(default)]
    pub uri: String,
    #[serde(default)]
    pub mime_type: String,
    pub state: FileState,
}

/// Envelope returned by the upload endpoint.
#[derive(Debug, Deserialize)]
pub struct UploadResponse {
    pub file: RemoteFile,
}

// ---------------------------------------------------------------------------
// Models
// ---------------------------------------------------------------------------

/// One model as reported by the model-listing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelInfo {
    /// Fully qualified name, e.g. `models/gemini-1.5-flash`.
    pub name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub supported_generation_methods: Vec<String>,
}

impl ModelInfo {
    /// Whether this model can serve `generateContent` requests.
    pub fn supports_generation(&self) -> bool {
        self.supported_generation_methods
            .iter()
            .any(|m| m == "generateContent")
    }

    /// Bare model identifier without the `models/` prefix.
    pub fn id(&self) -> &str {
        self.name.strip_prefix("models/").unwrap_or(&self.name)
    }
}

/// Envelope returned by the model-listing endpoint.
#[derive(Debug, Deserialize)]
pub struct ListModelsResponse {
    #[serde(default)]
    pub models: Vec<ModelInfo>,
}

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

/// Response envelope of `generateContent`, reduced to what we read.
#[derive(Debug, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: CandidateContent,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
pub struct CandidatePart {
    #[serde(default)]
    pub text: String,
}

impl GenerateContentResponse {
    /// Concatenate all candidate text parts into the raw response body.
    pub fn text(&self) -> String {
        self.candidates
            .iter()
            .flat_map(|c| c.content.parts.iter())
            .map(|p| p.text.as_str())
            .collect()
    }
}
