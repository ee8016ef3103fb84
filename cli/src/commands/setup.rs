use anyhow::Result;

use nosh_core::engine::Engine;
use nosh_core::models::{Profile, ProfileInput, TargetSource};
use nosh_core::targets::TargetEstimator;

#[allow(clippy::too_many_arguments)]
pub(crate) fn cmd_setup(
    engine: &Engine,
    estimator: Option<&dyn TargetEstimator>,
    name: &str,
    age: u32,
    gender: &str,
    height: f64,
    weight: f64,
    activity: &str,
    goal: &str,
    json: bool,
) -> Result<()> {
    let input = ProfileInput {
        name: name.to_string(),
        age,
        gender: gender.parse()?,
        height_cm: height,
        weight_kg: weight,
        activity_level: activity.parse()?,
        goal: goal.parse()?,
    };

    let profile = engine.complete_setup(input, estimator)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&profile)?);
        return Ok(());
    }

    print_targets(&profile);
    Ok(())
}

pub(crate) fn cmd_targets(engine: &Engine, json: bool) -> Result<()> {
    let Some(profile) = engine.profile() else {
        eprintln!("No profile found. Run `nosh setup` first.");
        std::process::exit(2);
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&profile)?);
        return Ok(());
    }

    print_targets(&profile);
    Ok(())
}

fn print_targets(profile: &Profile) {
    let name = &profile.name;
    let goal = profile.goal;
    let activity = profile.activity_level;
    println!("{name} — goal: {goal}, activity: {activity}\n");

    let t = profile.targets;
    let bmr = t.bmr;
    let maintenance = t.maintenance;
    let target = t.target;
    println!("  BMR:         {bmr} kcal");
    println!("  Maintenance: {maintenance} kcal");
    println!("  Target:      {target} kcal");
    let protein = t.protein;
    let carbs = t.carbs;
    let fat = t.fat;
    println!("  Macros:      P:{protein}g C:{carbs}g F:{fat}g");

    if profile.target_source == TargetSource::Remote {
        println!("\n  (targets estimated remotely)");
    }
}
