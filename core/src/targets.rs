use tracing::debug;

use crate::error::CoreError;
use crate::models::{ActivityLevel, Gender, Goal, ProfileInput, TargetSource, Targets};

/// External estimation service. Given the same biometric inputs it returns
/// the same output schema as [`derive`]; the engine merges either result.
pub trait TargetEstimator: Send + Sync {
    fn estimate(&self, input: &ProfileInput) -> Result<Targets, CoreError>;
}

/// Daily deficit/surplus applied for the lose/gain goals. Roughly ±0.5 kg
/// per week at 7700 kcal/kg.
const GOAL_ADJUSTMENT_KCAL: f64 = 500.0;

/// Derive daily targets from a profile. Pure and deterministic.
///
/// BMR uses the Mifflin-St Jeor equation, maintenance applies the activity
/// multiplier, the goal shifts the target by ±500 kcal, and the macro split
/// is 2 g protein per kg bodyweight, 45% of calories from carbs (4 kcal/g),
/// 25% from fat (9 kcal/g). Rounding happens once, on output — carbs and
/// fat are computed from the unrounded target.
#[must_use]
pub fn derive(input: &ProfileInput) -> Targets {
    let offset = match input.gender {
        Gender::Male => 5.0,
        Gender::Female => -161.0,
    };
    let bmr = 10.0 * input.weight_kg + 6.25 * input.height_cm - 5.0 * f64::from(input.age) + offset;

    let maintenance = bmr * activity_multiplier(input.activity_level);

    let target = match input.goal {
        Goal::Lose => maintenance - GOAL_ADJUSTMENT_KCAL,
        Goal::Maintain => maintenance,
        Goal::Gain => maintenance + GOAL_ADJUSTMENT_KCAL,
    };

    #[allow(clippy::cast_possible_truncation)]
    Targets {
        bmr: bmr.round() as i64,
        maintenance: maintenance.round() as i64,
        target: target.round() as i64,
        protein: (2.0 * input.weight_kg).round() as i64,
        carbs: (target * 0.45 / 4.0).round() as i64,
        fat: (target * 0.25 / 9.0).round() as i64,
    }
}

fn activity_multiplier(level: ActivityLevel) -> f64 {
    match level {
        ActivityLevel::Sedentary => 1.2,
        ActivityLevel::Light => 1.375,
        ActivityLevel::Moderate => 1.55,
        ActivityLevel::Active => 1.725,
        ActivityLevel::VeryActive => 1.9,
    }
}

/// Resolve targets remote-first: ask the estimator when one is provided, and
/// on any failure substitute the local pure computation. The returned tag
/// records which path produced the numbers; estimator failure never
/// propagates.
pub fn resolve(
    input: &ProfileInput,
    estimator: Option<&dyn TargetEstimator>,
) -> (Targets, TargetSource) {
    if let Some(estimator) = estimator {
        match estimator.estimate(input) {
            Ok(targets) => return (targets, TargetSource::Remote),
            Err(err) => {
                debug!("target estimation failed, falling back to local derivation: {err}");
            }
        }
    }
    (derive(input), TargetSource::Local)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(gender: Gender, activity: ActivityLevel, goal: Goal) -> ProfileInput {
        ProfileInput {
            name: "Alex".to_string(),
            age: 30,
            gender,
            height_cm: 175.0,
            weight_kg: 70.0,
            activity_level: activity,
            goal,
        }
    }

    #[test]
    fn test_derive_worked_example() {
        // 10*70 + 6.25*175 - 5*30 + 5 = 1648.75
        let t = derive(&input(Gender::Male, ActivityLevel::Moderate, Goal::Maintain));
        assert_eq!(t.bmr, 1649);
        // 1648.75 * 1.55 = 2555.5625
        assert_eq!(t.maintenance, 2556);
        assert_eq!(t.target, 2556);
        assert_eq!(t.protein, 140);
        // carbs/fat from the unrounded target: 2555.5625 * 0.45 / 4 = 287.5
        assert_eq!(t.carbs, 288);
        assert_eq!(t.fat, 71);
    }

    #[test]
    fn test_derive_female_offset() {
        let male = derive(&input(Gender::Male, ActivityLevel::Sedentary, Goal::Maintain));
        let female = derive(&input(
            Gender::Female,
            ActivityLevel::Sedentary,
            Goal::Maintain,
        ));
        // The two branches differ by 166 kcal of BMR (+5 vs -161).
        assert_eq!(male.bmr - female.bmr, 166);
    }

    #[test]
    fn test_derive_goal_adjustment() {
        for activity in [
            ActivityLevel::Sedentary,
            ActivityLevel::Light,
            ActivityLevel::Moderate,
            ActivityLevel::Active,
            ActivityLevel::VeryActive,
        ] {
            let lose = derive(&input(Gender::Male, activity, Goal::Lose));
            let maintain = derive(&input(Gender::Male, activity, Goal::Maintain));
            let gain = derive(&input(Gender::Male, activity, Goal::Gain));
            assert_eq!(maintain.target, maintain.maintenance);
            assert_eq!(lose.target, maintain.maintenance - 500);
            assert_eq!(gain.target, maintain.maintenance + 500);
        }
    }

    #[test]
    fn test_derive_activity_multipliers() {
        let bmr: f64 = 1648.75;
        for (activity, multiplier) in [
            (ActivityLevel::Sedentary, 1.2),
            (ActivityLevel::Light, 1.375),
            (ActivityLevel::Moderate, 1.55),
            (ActivityLevel::Active, 1.725),
            (ActivityLevel::VeryActive, 1.9),
        ] {
            let t = derive(&input(Gender::Male, activity, Goal::Maintain));
            #[allow(clippy::cast_possible_truncation)]
            let expected = (bmr * multiplier).round() as i64;
            assert_eq!(t.maintenance, expected);
        }
    }

    #[test]
    fn test_derive_protein_tracks_weight() {
        let mut heavy = input(Gender::Male, ActivityLevel::Moderate, Goal::Maintain);
        heavy.weight_kg = 92.3;
        let t = derive(&heavy);
        // 2 g per kg, rounded.
        assert_eq!(t.protein, 185);
    }

    struct FixedEstimator(Targets);

    impl TargetEstimator for FixedEstimator {
        fn estimate(&self, _input: &ProfileInput) -> Result<Targets, CoreError> {
            Ok(self.0)
        }
    }

    struct FailingEstimator;

    impl TargetEstimator for FailingEstimator {
        fn estimate(&self, _input: &ProfileInput) -> Result<Targets, CoreError> {
            Err(CoreError::Analysis("service unreachable".into()))
        }
    }

    #[test]
    fn test_resolve_prefers_remote() {
        let remote = Targets {
            bmr: 1700,
            maintenance: 2600,
            target: 2600,
            protein: 150,
            carbs: 290,
            fat: 72,
        };
        let input = input(Gender::Male, ActivityLevel::Moderate, Goal::Maintain);
        let (targets, source) = resolve(&input, Some(&FixedEstimator(remote)));
        assert_eq!(targets, remote);
        assert_eq!(source, TargetSource::Remote);
    }

    #[test]
    fn test_resolve_falls_back_on_failure() {
        let input = input(Gender::Male, ActivityLevel::Moderate, Goal::Maintain);
        let (targets, source) = resolve(&input, Some(&FailingEstimator));
        assert_eq!(targets, derive(&input));
        assert_eq!(source, TargetSource::Local);
    }

    #[test]
    fn test_resolve_without_estimator_is_local() {
        let input = input(Gender::Female, ActivityLevel::Light, Goal::Lose);
        let (targets, source) = resolve(&input, None);
        assert_eq!(targets, derive(&input));
        assert_eq!(source, TargetSource::Local);
    }
}
