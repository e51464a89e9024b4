//! Backend response models and their spoken renderings.

use serde::{Deserialize, Serialize};

/// Errors from the analysis backend.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP client error: {0}")]
    Client(String),

    #[error("Backend unreachable: {0}")]
    Offline(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Payload too large")]
    PayloadTooLarge,

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Backend returned status {0}")]
    Status(u16),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("IO error: {0}")]
    Io(String),
}

impl ApiError {
    /// Short message suitable for speaking to the user.
    pub fn spoken(&self) -> String {
        match self {
            ApiError::Offline(_) => {
                "Erro: erro de conexão. Verifique se o servidor está rodando.".to_string()
            }
            ApiError::Timeout => "Erro: tempo limite excedido. Tente novamente.".to_string(),
            ApiError::PayloadTooLarge => "Erro: arquivo muito grande. Escolha um menor.".to_string(),
            ApiError::Backend(message) => format!("Erro: {}", message),
            other => format!("Erro: {}", other),
        }
    }
}

/// One label from the vision model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisionLabel {
    pub objeto: String,
    pub confianca: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebEntity {
    pub descricao: String,
    #[serde(default)]
    pub score: f32,
}

/// Result of `/analisar`.
///
/// Variant order matters for untagged decoding: an `erro` body wins, then
/// the single-object answer, then the label list.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum AnalysisResponse {
    Error {
        erro: String,
    },
    Object {
        objeto: String,
        #[serde(default)]
        processing_time: Option<f64>,
    },
    Labels {
        #[serde(default)]
        labels: Vec<VisionLabel>,
        #[serde(default)]
        web_entities: Vec<WebEntity>,
        #[serde(default)]
        processing_time: Option<f64>,
    },
}

/// Labels read aloud for a label-list result.
const SPOKEN_LABEL_LIMIT: usize = 3;

impl AnalysisResponse {
    pub fn is_error(&self) -> bool {
        matches!(self, AnalysisResponse::Error { .. })
    }

    /// Full sentence handed to the speech controller.
    pub fn spoken_summary(&self) -> String {
        match self {
            AnalysisResponse::Error { erro } => format!("Erro: {}", erro),
            AnalysisResponse::Object { objeto, .. } => format!("Objeto detectado: {}", objeto),
            AnalysisResponse::Labels { labels, .. } => {
                if labels.is_empty() {
                    return "Nenhum objeto foi detectado na imagem.".to_string();
                }
                let parts: Vec<String> = labels
                    .iter()
                    .take(SPOKEN_LABEL_LIMIT)
                    .map(|l| {
                        format!(
                            "{} com {}% de confiança",
                            l.objeto,
                            (l.confianca * 100.0).round() as i32
                        )
                    })
                    .collect();
                format!("Objetos encontrados: {}", parts.join(", "))
            }
        }
    }

    /// One- or two-word title for result headers.
    pub fn short_summary(&self) -> String {
        match self {
            AnalysisResponse::Error { .. } => "Erro".to_string(),
            AnalysisResponse::Object { objeto, .. } => objeto.clone(),
            AnalysisResponse::Labels { labels, .. } => labels
                .first()
                .map(|l| l.objeto.clone())
                .unwrap_or_else(|| "Sem resultado".to_string()),
        }
    }

    pub fn processing_time(&self) -> Option<f64> {
        match self {
            AnalysisResponse::Error { .. } => None,
            AnalysisResponse::Object {
                processing_time, ..
            }
            | AnalysisResponse::Labels {
                processing_time, ..
            } => *processing_time,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Heading {
    pub text: String,
    #[serde(default)]
    pub level: u8,
    #[serde(default)]
    pub page: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    pub text: String,
    #[serde(default)]
    pub page: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    #[serde(default)]
    pub data: Vec<Vec<String>>,
    #[serde(default)]
    pub rows: u32,
    #[serde(default)]
    pub columns: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentStructure {
    #[serde(default)]
    pub headings: Vec<Heading>,
    #[serde(default)]
    pub paragraphs: Vec<Paragraph>,
    #[serde(default)]
    pub tables: Vec<Table>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentSummary {
    #[serde(default)]
    pub resumo: String,
    #[serde(default)]
    pub palavras_chave: Vec<String>,
}

/// Text and structure extracted from a document or photographed page.
///
/// The backend answers with Portuguese or English field names depending on
/// the endpoint; both are accepted.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ExtractedDocument {
    #[serde(default, alias = "texto_extraido", alias = "texto")]
    pub text_content: String,
    #[serde(default, alias = "estrutura")]
    pub structure: DocumentStructure,
    #[serde(default, alias = "metadados")]
    pub metadata: Option<DocumentMetadata>,
    #[serde(default)]
    pub confidence: Option<f32>,
    #[serde(default)]
    pub processing_time: Option<f64>,
    #[serde(default)]
    pub arquivo: Option<String>,
    #[serde(default)]
    pub tipo: Option<String>,
    #[serde(default)]
    pub total_caracteres: Option<u64>,
    #[serde(default)]
    pub total_palavras: Option<u64>,
    #[serde(default)]
    pub resumo: Option<DocumentSummary>,
    #[serde(default)]
    pub erro: Option<String>,
}

impl ExtractedDocument {
    /// Text to read aloud: the summary when present, otherwise the content.
    pub fn spoken_text(&self) -> String {
        if let Some(summary) = self.resumo.as_ref().filter(|s| !s.resumo.is_empty()) {
            return summary.resumo.clone();
        }
        if self.text_content.trim().is_empty() {
            return "Nenhum texto foi encontrado.".to_string();
        }
        self.text_content.clone()
    }
}

/// Body of `/documento/gerar-audio-documento`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpeechRequest {
    pub texto: String,
    pub voz: String,
    pub idioma: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SpeechAudio {
    /// Base64-encoded audio
    #[serde(default)]
    pub audio_content: Option<String>,
    #[serde(default)]
    pub processing_time: Option<f64>,
    #[serde(default)]
    pub erro: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendVoice {
    pub name: String,
    pub language_code: String,
    #[serde(default)]
    pub gender: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct VoicesResponse {
    #[serde(default)]
    pub vozes: Vec<BackendVoice>,
    #[serde(default)]
    pub erro: Option<String>,
}
