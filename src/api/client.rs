//! HTTP client for the image and document analysis backend.

use std::path::Path;
use std::time::Duration;

use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;

use super::types::{
    AnalysisResponse, ApiError, BackendVoice, ExtractedDocument, SpeechAudio, SpeechRequest,
    VoicesResponse,
};
use crate::storage::config::BackendSettings;

const ANALYZE_ENDPOINT: &str = "/analisar?modo=gemini";
const READ_TEXT_ENDPOINT: &str = "/ler-texto";
const DOCUMENT_ENDPOINT: &str = "/documento/processar-documento";
const SPEECH_ENDPOINT: &str = "/documento/gerar-audio-documento";
const VOICES_ENDPOINT: &str = "/documento/vozes-disponiveis";

/// Image extensions routed to the OCR endpoint instead of the document one.
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "tiff", "bmp"];

/// What to ask the backend about a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescribeMode {
    /// Describe the objects in a photo
    Image,
    /// Read a document (or the text in a photo)
    Document,
}

/// Backend analysis client.
pub struct BackendClient {
    /// HTTP client
    http: reqwest::Client,
    /// Base URL without trailing slash
    base_url: String,
}

impl BackendClient {
    pub fn new(settings: &BackendSettings) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| ApiError::Client(e.to_string()))?;

        Ok(Self {
            http,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// Describe the objects in a photo.
    pub async fn analyze_image(
        &self,
        image: Vec<u8>,
        file_name: &str,
    ) -> Result<AnalysisResponse, ApiError> {
        let form = Form::new().part("imagem", file_part(image, file_name, "image/jpeg")?);
        let response: AnalysisResponse = self.post_multipart(ANALYZE_ENDPOINT, form).await?;

        match response {
            AnalysisResponse::Error { erro } => Err(ApiError::Backend(erro)),
            other => Ok(other),
        }
    }

    /// Extract printed text from a photo.
    pub async fn read_text(
        &self,
        image: Vec<u8>,
        file_name: &str,
    ) -> Result<ExtractedDocument, ApiError> {
        let form = Form::new().part("imagem", file_part(image, file_name, "image/jpeg")?);
        let document: ExtractedDocument = self.post_multipart(READ_TEXT_ENDPOINT, form).await?;
        into_result(document)
    }

    /// Extract text, structure and a summary from a document file.
    pub async fn process_document(
        &self,
        content: Vec<u8>,
        file_name: &str,
    ) -> Result<ExtractedDocument, ApiError> {
        if is_image(file_name) {
            tracing::debug!("{} is an image, using OCR", file_name);
            return self.read_text(content, file_name).await;
        }

        let mime = mime_for(file_name);
        let form = Form::new()
            .part("arquivo", file_part(content, file_name, mime)?)
            .text("incluir_resumo", "true")
            .text("extrair_estrutura", "true");

        let document: ExtractedDocument = self.post_multipart(DOCUMENT_ENDPOINT, form).await?;
        into_result(document)
    }

    /// Read a file from disk and process it.
    pub async fn process_document_file(&self, path: &Path) -> Result<ExtractedDocument, ApiError> {
        let content = tokio::fs::read(path)
            .await
            .map_err(|e| ApiError::Io(e.to_string()))?;
        self.process_document(content, file_name(path)).await
    }

    /// Analyze a file and return the text to read aloud.
    pub async fn describe_file(&self, path: &Path, mode: DescribeMode) -> Result<String, ApiError> {
        match mode {
            DescribeMode::Image => {
                let content = tokio::fs::read(path)
                    .await
                    .map_err(|e| ApiError::Io(e.to_string()))?;
                let response = self.analyze_image(content, file_name(path)).await?;
                Ok(response.spoken_summary())
            }
            DescribeMode::Document => {
                let document = self.process_document_file(path).await?;
                Ok(document.spoken_text())
            }
        }
    }

    /// Synthesize speech on the backend; returns base64 audio.
    pub async fn generate_speech(
        &self,
        text: &str,
        voice: &str,
        language: &str,
    ) -> Result<String, ApiError> {
        let body = SpeechRequest {
            texto: text.to_string(),
            voz: voice.to_string(),
            idioma: language.to_string(),
        };

        let response = self
            .http
            .post(self.url(SPEECH_ENDPOINT))
            .json(&body)
            .send()
            .await
            .map_err(map_send_error)?;

        let audio: SpeechAudio = decode(response).await?;
        if let Some(erro) = audio.erro {
            return Err(ApiError::Backend(erro));
        }
        audio
            .audio_content
            .ok_or_else(|| ApiError::Backend("Backend returned no audio".to_string()))
    }

    /// Voices offered by the backend synthesizer.
    pub async fn available_voices(&self) -> Result<Vec<BackendVoice>, ApiError> {
        let response = self
            .http
            .get(self.url(VOICES_ENDPOINT))
            .send()
            .await
            .map_err(map_send_error)?;

        let voices: VoicesResponse = decode(response).await?;
        match voices.erro {
            Some(erro) => Err(ApiError::Backend(erro)),
            None => Ok(voices.vozes),
        }
    }

    async fn post_multipart<R: DeserializeOwned>(
        &self,
        endpoint: &str,
        form: Form,
    ) -> Result<R, ApiError> {
        let url = self.url(endpoint);
        tracing::debug!("POST {}", url);

        let response = self
            .http
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(map_send_error)?;

        decode(response).await
    }
}

/// Backend error bodies carry a single `erro` field.
#[derive(Debug, serde::Deserialize)]
struct ErrorBody {
    erro: String,
}

async fn decode<R: DeserializeOwned>(response: reqwest::Response) -> Result<R, ApiError> {
    let status = response.status().as_u16();
    tracing::debug!("Backend responded {} for {}", status, response.url());

    let body = response
        .text()
        .await
        .map_err(|e| ApiError::Client(e.to_string()))?;
    parse_response(status, &body)
}

/// Map a status code and body onto a decoded value or an [`ApiError`].
fn parse_response<R: DeserializeOwned>(status: u16, body: &str) -> Result<R, ApiError> {
    if (200..300).contains(&status) {
        return serde_json::from_str(body).map_err(|e| ApiError::SerializationError(e.to_string()));
    }

    if status == 413 {
        return Err(ApiError::PayloadTooLarge);
    }

    match serde_json::from_str::<ErrorBody>(body) {
        Ok(error) => Err(ApiError::Backend(error.erro)),
        Err(_) => {
            tracing::warn!("Backend returned status {}", status);
            Err(ApiError::Status(status))
        }
    }
}

fn map_send_error(e: reqwest::Error) -> ApiError {
    if e.is_timeout() {
        ApiError::Timeout
    } else if e.is_connect() {
        ApiError::Offline(e.to_string())
    } else {
        ApiError::Client(e.to_string())
    }
}

fn into_result(document: ExtractedDocument) -> Result<ExtractedDocument, ApiError> {
    match document.erro {
        Some(erro) => Err(ApiError::Backend(erro)),
        None => Ok(document),
    }
}

fn file_part(content: Vec<u8>, file_name: &str, mime: &str) -> Result<Part, ApiError> {
    Part::bytes(content)
        .file_name(file_name.to_string())
        .mime_str(mime)
        .map_err(|e| ApiError::Client(e.to_string()))
}

fn file_name(path: &Path) -> &str {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("documento")
}

fn extension(file_name: &str) -> Option<String> {
    Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

pub fn is_image(file_name: &str) -> bool {
    extension(file_name).is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

fn mime_for(file_name: &str) -> &'static str {
    match extension(file_name).as_deref() {
        Some("pdf") => "application/pdf",
        Some("docx") => {
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        }
        Some("txt") => "text/plain",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        _ => "application/octet-stream",
    }
}
