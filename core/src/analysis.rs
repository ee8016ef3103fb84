use crate::error::CoreError;
use crate::models::NutritionFacts;

/// Food recognition collaborator.
///
/// The CLI implements this with reqwest over the analysis service's HTTP
/// API. Called synchronously from the engine — implementations own whatever
/// runtime they need, and should impose a timeout and report expiry as an
/// error so the engine can surface it as an analysis failure.
pub trait FoodAnalyzer: Send + Sync {
    /// Analyze a free-text description ("I ate a sandwich").
    fn analyze_text(&self, text: &str) -> Result<NutritionFacts, CoreError>;

    /// Analyze a raw image payload.
    fn analyze_image(&self, image: &[u8]) -> Result<NutritionFacts, CoreError>;
}
