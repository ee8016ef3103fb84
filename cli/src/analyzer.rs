use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::debug;

use nosh_core::analysis::FoodAnalyzer;
use nosh_core::error::CoreError;
use nosh_core::models::{NutritionFacts, ProfileInput, Targets};
use nosh_core::targets::TargetEstimator;

/// HTTP client for the recognition and target-estimation services.
///
/// Owns a small current-thread runtime so the synchronous core traits can be
/// served from blocking command code. Timeouts are generous because the
/// backend consults a language model, but expiry still surfaces as an
/// analysis failure rather than hanging the caller.
pub struct AnalysisClient {
    client: reqwest::Client,
    rt: tokio::runtime::Runtime,
    base_url: String,
}

impl AnalysisClient {
    pub fn new(base_url: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(format!(
                "nosh-cli/{} (nutrition tracker)",
                env!("CARGO_PKG_VERSION")
            ))
            .timeout(std::time::Duration::from_secs(30))
            .connect_timeout(std::time::Duration::from_secs(5))
            .build()
            .context("Failed to build HTTP client")?;
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .context("Failed to start async runtime")?;
        Ok(Self {
            client,
            rt,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn analyze_text_async(&self, text: &str) -> Result<NutritionFacts, CoreError> {
        let url = format!("{}/api/analyze-text", self.base_url);
        debug!("analyzing text via {url}");
        let resp = self
            .client
            .post(&url)
            .json(&serde_json::json!({ "text": text }))
            .send()
            .await
            .map_err(|err| CoreError::Analysis(format!("Failed to reach analysis service: {err}")))?;
        read_analysis_response(resp).await
    }

    async fn analyze_image_async(&self, image: Vec<u8>) -> Result<NutritionFacts, CoreError> {
        let url = format!("{}/api/analyze-image", self.base_url);
        debug!("analyzing {} byte image via {url}", image.len());
        let resp = self
            .client
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(image)
            .send()
            .await
            .map_err(|err| CoreError::Analysis(format!("Failed to reach analysis service: {err}")))?;
        read_analysis_response(resp).await
    }

    async fn estimate_async(&self, input: &ProfileInput) -> Result<Targets, CoreError> {
        let url = format!("{}/api/calculate-bmr", self.base_url);
        debug!("estimating targets via {url}");
        let resp = self
            .client
            .post(&url)
            .json(input)
            .send()
            .await
            .map_err(|err| {
                CoreError::Analysis(format!("Failed to reach estimation service: {err}"))
            })?;
        if !resp.status().is_success() {
            return Err(CoreError::Analysis(format!(
                "Estimation service returned {}",
                resp.status()
            )));
        }
        let data: EstimateResponse = resp.json().await.map_err(|err| {
            CoreError::Analysis(format!("Failed to parse estimation response: {err}"))
        })?;
        Ok(data.into_targets())
    }
}

impl FoodAnalyzer for AnalysisClient {
    fn analyze_text(&self, text: &str) -> Result<NutritionFacts, CoreError> {
        self.rt.block_on(self.analyze_text_async(text))
    }

    fn analyze_image(&self, image: &[u8]) -> Result<NutritionFacts, CoreError> {
        self.rt.block_on(self.analyze_image_async(image.to_vec()))
    }
}

impl TargetEstimator for AnalysisClient {
    fn estimate(&self, input: &ProfileInput) -> Result<Targets, CoreError> {
        self.rt.block_on(self.estimate_async(input))
    }
}

async fn read_analysis_response(resp: reqwest::Response) -> Result<NutritionFacts, CoreError> {
    if !resp.status().is_success() {
        return Err(CoreError::Analysis(format!(
            "Analysis service returned {}",
            resp.status()
        )));
    }
    let data: AnalysisResponse = resp
        .json()
        .await
        .map_err(|err| CoreError::Analysis(format!("Failed to parse analysis response: {err}")))?;
    data.into_facts()
}

/// Wire response of both analysis endpoints: either the recognized facts or
/// an `{"error": ...}` body.
#[derive(Debug, Deserialize)]
struct AnalysisResponse {
    error: Option<String>,
    #[serde(rename = "foodItem")]
    food_item: Option<String>,
    calories: Option<f64>,
    protein: Option<f64>,
    carbs: Option<f64>,
    fat: Option<f64>,
}

impl AnalysisResponse {
    fn into_facts(self) -> Result<NutritionFacts, CoreError> {
        if let Some(error) = self.error {
            return Err(CoreError::Analysis(error));
        }
        match (
            self.food_item,
            self.calories,
            self.protein,
            self.carbs,
            self.fat,
        ) {
            (Some(food_item), Some(calories), Some(protein), Some(carbs), Some(fat)) => {
                Ok(NutritionFacts {
                    food_item,
                    calories,
                    protein,
                    carbs,
                    fat,
                })
            }
            _ => Err(CoreError::Analysis(
                "Analysis response is missing nutrition fields".into(),
            )),
        }
    }
}

/// Wire response of the estimation endpoint. The backend may return
/// fractional numbers; targets are integral, so round here.
#[derive(Debug, Deserialize)]
struct EstimateResponse {
    bmr: f64,
    maintenance: f64,
    target: f64,
    protein: f64,
    carbs: f64,
    fat: f64,
}

impl EstimateResponse {
    #[allow(clippy::cast_possible_truncation)]
    fn into_targets(self) -> Targets {
        Targets {
            bmr: self.bmr.round() as i64,
            maintenance: self.maintenance.round() as i64,
            target: self.target.round() as i64,
            protein: self.protein.round() as i64,
            carbs: self.carbs.round() as i64,
            fat: self.fat.round() as i64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_facts_complete() {
        let resp = AnalysisResponse {
            error: None,
            food_item: Some("Sandwich".to_string()),
            calories: Some(250.0),
            protein: Some(15.0),
            carbs: Some(30.0),
            fat: Some(8.0),
        };
        let facts = resp.into_facts().unwrap();
        assert_eq!(facts.food_item, "Sandwich");
        assert!((facts.calories - 250.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_into_facts_error_body() {
        let resp: AnalysisResponse =
            serde_json::from_str(r#"{"error": "could not identify food"}"#).unwrap();
        let err = resp.into_facts().unwrap_err();
        assert!(matches!(err, CoreError::Analysis(msg) if msg == "could not identify food"));
    }

    #[test]
    fn test_into_facts_missing_fields() {
        let resp: AnalysisResponse =
            serde_json::from_str(r#"{"foodItem": "Sandwich", "calories": 250}"#).unwrap();
        assert!(resp.into_facts().is_err());
    }

    #[test]
    fn test_estimate_response_rounds() {
        let resp: EstimateResponse = serde_json::from_str(
            r#"{"bmr": 1648.75, "maintenance": 2555.56, "target": 2555.56,
                "protein": 140.0, "carbs": 287.5, "fat": 70.99}"#,
        )
        .unwrap();
        let targets = resp.into_targets();
        assert_eq!(targets.bmr, 1649);
        assert_eq!(targets.maintenance, 2556);
        assert_eq!(targets.carbs, 288);
        assert_eq!(targets.fat, 71);
    }
}
