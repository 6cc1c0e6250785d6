//! Optional third-party ATS scoring service. Its score is blended into the composite
//! at 30% when configured.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::compliance::CollaboratorError;
use crate::documents::DocumentFormat;

#[async_trait]
pub trait AtsScoringService: Send + Sync {
    /// External 0–100 score for `document`.
    async fn score(&self, document: &[u8], format: DocumentFormat) -> Result<u8, CollaboratorError>;
}

#[derive(Debug, Deserialize)]
struct AtsScoreResponse {
    score: f64,
}

/// Posts the raw document to `ATS_SCORING_URL` and reads `{"score": n}` back.
#[derive(Clone)]
pub struct HttpAtsScoringService {
    client: Client,
    url: String,
}

impl HttpAtsScoringService {
    pub fn new(url: String, timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_else(|_| Client::new()),
            url,
        }
    }
}

#[async_trait]
impl AtsScoringService for HttpAtsScoringService {
    async fn score(&self, document: &[u8], format: DocumentFormat) -> Result<u8, CollaboratorError> {
        let response = self
            .client
            .post(&self.url)
            .query(&[("format", format.as_str())])
            .header("content-type", format.mime_type())
            .body(document.to_vec())
            .send()
            .await
            .map_err(|e| CollaboratorError::AtsService(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CollaboratorError::AtsService(format!(
                "scoring service returned {status}"
            )));
        }

        let body: AtsScoreResponse = response
            .json()
            .await
            .map_err(|e| CollaboratorError::AtsService(e.to_string()))?;
        Ok(body.score.round().clamp(0.0, 100.0) as u8)
    }
}

/// `round(0.7 * internal + 0.3 * external)`.
pub fn blend_scores(internal: u8, external: u8) -> u8 {
    (0.7 * f64::from(internal) + 0.3 * f64::from(external))
        .round()
        .clamp(0.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blend_scores() {
        assert_eq!(blend_scores(100, 100), 100);
        assert_eq!(blend_scores(80, 50), 71);
        assert_eq!(blend_scores(0, 0), 0);
    }

    #[test]
    fn test_score_response_parses() {
        let body: AtsScoreResponse = serde_json::from_str(r#"{"score": 72.6}"#).unwrap();
        assert!((body.score - 72.6).abs() < f64::EPSILON);
    }
}
