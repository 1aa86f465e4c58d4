// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! OCR.space client for product label text extraction.
//!
//! Best effort by policy: any failure, and any response without usable
//! text, resolves to the [`PARSE_FAILED`] sentinel instead of an error.

use anyhow::Context;
use serde::Deserialize;

/// Sentinel returned when no text could be extracted.
pub const PARSE_FAILED: &str = "Could not parse image text";

/// OCR.space API client.
#[derive(Clone)]
pub struct OcrClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl OcrClient {
    /// Create a new client against the given parse endpoint.
    pub fn new(endpoint: String, api_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint,
            api_key,
        }
    }

    /// Extract text from an uploaded label image. Infallible by policy.
    pub async fn extract_text(&self, image: Vec<u8>, filename: &str) -> String {
        match self.request_parse(image, filename).await {
            Ok(response) => best_text(response).unwrap_or_else(|| PARSE_FAILED.to_string()),
            Err(e) => {
                tracing::warn!(error = %e, "OCR request failed");
                PARSE_FAILED.to_string()
            }
        }
    }

    /// Multipart POST of the image plus API key and language.
    async fn request_parse(&self, image: Vec<u8>, filename: &str) -> anyhow::Result<OcrResponse> {
        let part = reqwest::multipart::Part::bytes(image).file_name(filename.to_string());
        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("apikey", self.api_key.clone())
            .text("language", "eng");

        let response = self
            .http
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .context("OCR request failed")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("OCR returned HTTP {}", status);
        }

        response.json().await.context("OCR response parse failed")
    }
}

/// First non-empty parsed text in the response, if any.
fn best_text(response: OcrResponse) -> Option<String> {
    if response.is_errored_on_processing {
        return None;
    }
    response
        .parsed_results
        .unwrap_or_default()
        .into_iter()
        .map(|r| r.parsed_text)
        .find(|t| !t.trim().is_empty())
}

/// Parse response envelope.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct OcrResponse {
    parsed_results: Option<Vec<ParsedResult>>,
    #[serde(default)]
    is_errored_on_processing: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ParsedResult {
    parsed_text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_best_text_takes_first_non_empty() {
        let response: OcrResponse = serde_json::from_str(
            r#"{"ParsedResults":[{"ParsedText":"  "},{"ParsedText":"Organic\nFair Trade"}],
                "IsErroredOnProcessing":false}"#,
        )
        .unwrap();

        assert_eq!(best_text(response).as_deref(), Some("Organic\nFair Trade"));
    }

    #[test]
    fn test_best_text_none_when_errored() {
        let response: OcrResponse = serde_json::from_str(
            r#"{"ParsedResults":[{"ParsedText":"text"}],"IsErroredOnProcessing":true}"#,
        )
        .unwrap();

        assert_eq!(best_text(response), None);
    }

    #[test]
    fn test_best_text_none_when_results_missing() {
        let response: OcrResponse = serde_json::from_str(r#"{"OCRExitCode":99}"#).unwrap();

        assert_eq!(best_text(response), None);
    }

    #[tokio::test]
    async fn test_extract_text_sentinel_when_unreachable() {
        let client = OcrClient::new("http://127.0.0.1:1".to_string(), "key".to_string());

        let text = client.extract_text(vec![0xFF, 0xD8], "label.jpg").await;

        assert_eq!(text, PARSE_FAILED);
    }
}
