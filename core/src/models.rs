use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::ledger::Ledger;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Gender {
    Male,
    Female,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActivityLevel {
    Sedentary,
    Light,
    Moderate,
    Active,
    VeryActive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Goal {
    Lose,
    Maintain,
    Gain,
}

/// Which path produced a profile's targets. Legacy profiles lack the field
/// and default to `Local`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TargetSource {
    #[default]
    Local,
    Remote,
}

impl FromStr for Gender {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "male" => Ok(Self::Male),
            "female" => Ok(Self::Female),
            _ => Err(CoreError::Validation(format!(
                "Invalid gender '{s}'. Must be one of: male, female"
            ))),
        }
    }
}

impl FromStr for ActivityLevel {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sedentary" => Ok(Self::Sedentary),
            "light" => Ok(Self::Light),
            "moderate" => Ok(Self::Moderate),
            "active" => Ok(Self::Active),
            "veryactive" | "very-active" | "very_active" => Ok(Self::VeryActive),
            _ => Err(CoreError::Validation(format!(
                "Invalid activity level '{s}'. Must be one of: sedentary, light, moderate, active, veryActive"
            ))),
        }
    }
}

impl FromStr for Goal {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lose" => Ok(Self::Lose),
            "maintain" => Ok(Self::Maintain),
            "gain" => Ok(Self::Gain),
            _ => Err(CoreError::Validation(format!(
                "Invalid goal '{s}'. Must be one of: lose, maintain, gain"
            ))),
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Male => "male",
            Self::Female => "female",
        })
    }
}

impl fmt::Display for ActivityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Sedentary => "sedentary",
            Self::Light => "light",
            Self::Moderate => "moderate",
            Self::Active => "active",
            Self::VeryActive => "veryActive",
        })
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Lose => "lose",
            Self::Maintain => "maintain",
            Self::Gain => "gain",
        })
    }
}

/// Biometric setup form, before any targets are derived.
///
/// Serialized camelCase with the short `height`/`weight` keys the
/// estimation service expects.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileInput {
    pub name: String,
    pub age: u32,
    pub gender: Gender,
    #[serde(rename = "height")]
    pub height_cm: f64,
    #[serde(rename = "weight")]
    pub weight_kg: f64,
    pub activity_level: ActivityLevel,
    pub goal: Goal,
}

/// Derived daily energy and macro targets. Calories in kcal, macros in grams,
/// all rounded to the nearest integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Targets {
    pub bmr: i64,
    pub maintenance: i64,
    pub target: i64,
    pub protein: i64,
    pub carbs: i64,
    pub fat: i64,
}

/// A completed profile: the setup form plus derived targets. Immutable once
/// computed except by re-running setup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub name: String,
    pub age: u32,
    pub gender: Gender,
    #[serde(rename = "heightCm", alias = "height")]
    pub height_cm: f64,
    #[serde(rename = "weightKg", alias = "weight")]
    pub weight_kg: f64,
    pub activity_level: ActivityLevel,
    pub goal: Goal,
    #[serde(flatten)]
    pub targets: Targets,
    #[serde(default)]
    pub target_source: TargetSource,
}

impl Profile {
    #[must_use]
    pub fn new(input: ProfileInput, targets: Targets, target_source: TargetSource) -> Self {
        Self {
            name: input.name,
            age: input.age,
            gender: input.gender,
            height_cm: input.height_cm,
            weight_kg: input.weight_kg,
            activity_level: input.activity_level,
            goal: input.goal,
            targets,
            target_source,
        }
    }
}

/// Response shape of the recognition collaborator: one recognized food with
/// its nutrition estimate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NutritionFacts {
    #[serde(rename = "foodItem")]
    pub food_item: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FoodSource {
    Text,
    Image,
    #[serde(alias = "test")]
    Manual,
}

impl fmt::Display for FoodSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Text => "text",
            Self::Image => "image",
            Self::Manual => "manual",
        })
    }
}

/// One logged food entry. Immutable after creation; owned by the `DayRecord`
/// it was added to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodItem {
    pub name: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    /// Human-readable local clock time the entry was logged.
    pub time: String,
    #[serde(alias = "type")]
    pub source: FoodSource,
}

impl FoodItem {
    #[must_use]
    pub fn from_facts(facts: NutritionFacts, source: FoodSource, time: String) -> Self {
        Self {
            name: facts.food_item,
            calories: facts.calories,
            protein: facts.protein,
            carbs: facts.carbs,
            fat: facts.fat,
            time,
            source,
        }
    }
}

/// Per-date aggregate: running sums plus the items they were summed from, in
/// insertion order. The sums always equal the item sums; the ledger is the
/// only writer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DayRecord {
    #[serde(default)]
    pub date: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub items: Vec<FoodItem>,
}

impl DayRecord {
    #[must_use]
    pub fn zero(date: &str) -> Self {
        Self {
            date: date.to_string(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// A complete, self-describing backup of the tracker's state.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub ledger: Ledger,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<Profile>,
    pub exported_at: String,
}

/// Incoming snapshot on import. The aliases accept the legacy backup key
/// spellings (`dailyData`/`userProfile`/`exportDate`).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotImport {
    #[serde(default, alias = "dailyData")]
    pub ledger: Option<Ledger>,
    #[serde(default, alias = "userProfile")]
    pub profile: Option<Profile>,
    #[serde(default, alias = "exportDate")]
    pub exported_at: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportOutcome {
    pub days_imported: usize,
    pub items_imported: usize,
    pub profile_imported: bool,
}

/// Validate a setup form: name must not be blank, all biometric numbers must
/// be positive and finite.
pub fn validate_profile_input(input: &ProfileInput) -> Result<(), CoreError> {
    if input.name.trim().is_empty() {
        return Err(CoreError::Validation("Name must not be empty".into()));
    }
    if input.age == 0 {
        return Err(CoreError::Validation("Age must be greater than 0".into()));
    }
    if !(input.height_cm > 0.0 && input.height_cm.is_finite()) {
        return Err(CoreError::Validation(
            "Height must be a positive number of centimeters".into(),
        ));
    }
    if !(input.weight_kg > 0.0 && input.weight_kg.is_finite()) {
        return Err(CoreError::Validation(
            "Weight must be a positive number of kilograms".into(),
        ));
    }
    Ok(())
}

/// Validate a recognition result before it becomes a ledger item: the name
/// must not be blank and no field may be negative or non-finite.
pub fn validate_facts(facts: &NutritionFacts) -> Result<(), CoreError> {
    if facts.food_item.trim().is_empty() {
        return Err(CoreError::Validation("Food name must not be empty".into()));
    }
    for (label, value) in [
        ("calories", facts.calories),
        ("protein", facts.protein),
        ("carbs", facts.carbs),
        ("fat", facts.fat),
    ] {
        if !(value >= 0.0 && value.is_finite()) {
            return Err(CoreError::Validation(format!(
                "{label} must be a non-negative number (got {value})"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_gender() {
        assert_eq!(Gender::from_str("male").unwrap(), Gender::Male);
        assert_eq!(Gender::from_str("Female").unwrap(), Gender::Female);
        assert!(Gender::from_str("other").is_err());
    }

    #[test]
    fn test_parse_activity_level() {
        assert_eq!(
            ActivityLevel::from_str("sedentary").unwrap(),
            ActivityLevel::Sedentary
        );
        assert_eq!(
            ActivityLevel::from_str("veryActive").unwrap(),
            ActivityLevel::VeryActive
        );
        assert_eq!(
            ActivityLevel::from_str("very-active").unwrap(),
            ActivityLevel::VeryActive
        );
        assert!(ActivityLevel::from_str("couch").is_err());
    }

    #[test]
    fn test_parse_goal() {
        assert_eq!(Goal::from_str("lose").unwrap(), Goal::Lose);
        assert_eq!(Goal::from_str("MAINTAIN").unwrap(), Goal::Maintain);
        assert!(Goal::from_str("bulk").is_err());
    }

    #[test]
    fn test_activity_level_wire_format() {
        let json = serde_json::to_string(&ActivityLevel::VeryActive).unwrap();
        assert_eq!(json, "\"veryActive\"");
        let parsed: ActivityLevel = serde_json::from_str("\"veryActive\"").unwrap();
        assert_eq!(parsed, ActivityLevel::VeryActive);
    }

    fn sample_input() -> ProfileInput {
        ProfileInput {
            name: "Alex".to_string(),
            age: 30,
            gender: Gender::Male,
            height_cm: 175.0,
            weight_kg: 70.0,
            activity_level: ActivityLevel::Moderate,
            goal: Goal::Maintain,
        }
    }

    #[test]
    fn test_validate_profile_input_ok() {
        assert!(validate_profile_input(&sample_input()).is_ok());
    }

    #[test]
    fn test_validate_profile_input_blank_name() {
        let mut input = sample_input();
        input.name = "   ".to_string();
        assert!(validate_profile_input(&input).is_err());
    }

    #[test]
    fn test_validate_profile_input_bad_numbers() {
        let mut input = sample_input();
        input.age = 0;
        assert!(validate_profile_input(&input).is_err());

        let mut input = sample_input();
        input.height_cm = 0.0;
        assert!(validate_profile_input(&input).is_err());

        let mut input = sample_input();
        input.weight_kg = -70.0;
        assert!(validate_profile_input(&input).is_err());

        let mut input = sample_input();
        input.weight_kg = f64::NAN;
        assert!(validate_profile_input(&input).is_err());
    }

    #[test]
    fn test_profile_input_wire_keys() {
        let value = serde_json::to_value(sample_input()).unwrap();
        // The estimation service expects the short keys.
        assert_eq!(value["height"], 175.0);
        assert_eq!(value["weight"], 70.0);
        assert_eq!(value["activityLevel"], "moderate");
    }

    #[test]
    fn test_profile_roundtrip_with_source_tag() {
        let targets = Targets {
            bmr: 1649,
            maintenance: 2556,
            target: 2556,
            protein: 140,
            carbs: 288,
            fat: 71,
        };
        let profile = Profile::new(sample_input(), targets, TargetSource::Remote);
        let json = serde_json::to_string(&profile).unwrap();
        let back: Profile = serde_json::from_str(&json).unwrap();
        assert_eq!(back.targets, targets);
        assert_eq!(back.target_source, TargetSource::Remote);
        assert!((back.height_cm - 175.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_profile_accepts_legacy_keys() {
        // Legacy profile shape: short height/weight keys, no target source.
        let json = r#"{
            "name": "Alex", "age": 30, "gender": "male",
            "height": 175.0, "weight": 70.0,
            "activityLevel": "moderate", "goal": "maintain",
            "bmr": 1649, "maintenance": 2556, "target": 2556,
            "protein": 140, "carbs": 288, "fat": 71
        }"#;
        let profile: Profile = serde_json::from_str(json).unwrap();
        assert!((profile.weight_kg - 70.0).abs() < f64::EPSILON);
        assert_eq!(profile.target_source, TargetSource::Local);
    }

    #[test]
    fn test_validate_facts() {
        let facts = NutritionFacts {
            food_item: "Sandwich".to_string(),
            calories: 250.0,
            protein: 15.0,
            carbs: 30.0,
            fat: 8.0,
        };
        assert!(validate_facts(&facts).is_ok());

        let mut bad = facts.clone();
        bad.food_item = String::new();
        assert!(validate_facts(&bad).is_err());

        let mut bad = facts.clone();
        bad.calories = -1.0;
        assert!(validate_facts(&bad).is_err());

        let mut bad = facts;
        bad.fat = f64::INFINITY;
        assert!(validate_facts(&bad).is_err());
    }

    #[test]
    fn test_food_item_accepts_legacy_type_key() {
        let json = r#"{
            "name": "Test Food Item", "calories": 250.0, "protein": 15.0,
            "carbs": 30.0, "fat": 8.0, "time": "10:15:00", "type": "test"
        }"#;
        let item: FoodItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.source, FoodSource::Manual);
    }

    #[test]
    fn test_day_record_zero() {
        let day = DayRecord::zero("2026-08-06");
        assert_eq!(day.date, "2026-08-06");
        assert!(day.is_empty());
        assert!(day.calories.abs() < f64::EPSILON);
    }
}
