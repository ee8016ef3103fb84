use std::sync::Mutex;

use chrono::{Local, NaiveDate, Utc};
use tracing::{debug, warn};

use crate::analysis::FoodAnalyzer;
use crate::error::CoreError;
use crate::ledger::Ledger;
use crate::models::{
    DayRecord, FoodItem, FoodSource, ImportOutcome, NutritionFacts, Profile, ProfileInput,
    Snapshot, SnapshotImport, validate_facts, validate_profile_input,
};
use crate::store::{LEDGER_KEY, PROFILE_KEY, StateStore};
use crate::targets::{self, TargetEstimator};

const DATE_FORMAT: &str = "%Y-%m-%d";

fn date_key(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// The ledger engine: owns the ledger, the active profile, and the selected
/// date, and orchestrates recognition, import/export, and persistence.
///
/// All state lives behind one mutex; every mutation is applied as a single
/// atomic step under the lock, so interleaved calls from an event-driven
/// caller never observe sums inconsistent with the item list. Collaborator
/// calls run before the lock is taken.
pub struct Engine {
    state: Mutex<State>,
}

struct State {
    store: Box<dyn StateStore>,
    ledger: Ledger,
    profile: Option<Profile>,
    selected: NaiveDate,
}

impl Engine {
    /// Load engine state from the store. A malformed payload in either slot
    /// degrades to absent/empty with a warning; only store I/O itself is an
    /// error.
    pub fn new(store: Box<dyn StateStore>) -> Result<Self, CoreError> {
        let profile = match store.get(PROFILE_KEY)? {
            Some(raw) => match serde_json::from_str::<Profile>(&raw) {
                Ok(profile) => Some(profile),
                Err(err) => {
                    warn!("ignoring malformed stored profile: {err}");
                    None
                }
            },
            None => None,
        };

        let ledger = match store.get(LEDGER_KEY)? {
            Some(raw) => match serde_json::from_str::<Ledger>(&raw) {
                Ok(mut ledger) => {
                    ledger.normalize();
                    ledger
                }
                Err(err) => {
                    warn!("ignoring malformed stored ledger: {err}");
                    Ledger::new()
                }
            },
            None => Ledger::new(),
        };

        Ok(Self {
            state: Mutex::new(State {
                store,
                ledger,
                profile,
                selected: Local::now().date_naive(),
            }),
        })
    }

    #[must_use]
    pub fn profile(&self) -> Option<Profile> {
        self.lock().profile.clone()
    }

    #[must_use]
    pub fn has_profile(&self) -> bool {
        self.lock().profile.is_some()
    }

    /// Run setup: validate the form, resolve targets (remote when an
    /// estimator is given, local fallback on any estimator failure), store
    /// and persist the resulting profile.
    pub fn complete_setup(
        &self,
        input: ProfileInput,
        estimator: Option<&dyn TargetEstimator>,
    ) -> Result<Profile, CoreError> {
        validate_profile_input(&input)?;
        let (targets, source) = targets::resolve(&input, estimator);
        let profile = Profile::new(input, targets, source);

        let mut state = self.lock();
        state.profile = Some(profile.clone());
        persist_profile(&state);
        Ok(profile)
    }

    #[must_use]
    pub fn selected_date(&self) -> NaiveDate {
        self.lock().selected
    }

    /// Set the active date. Any past date is accepted; navigating forward
    /// past today is a no-op.
    pub fn select_date(&self, date: NaiveDate) {
        self.select_date_clamped(date, Local::now().date_naive());
    }

    fn select_date_clamped(&self, date: NaiveDate, today: NaiveDate) {
        if date > today {
            debug!("ignoring navigation past today ({date} > {today})");
            return;
        }
        self.lock().selected = date;
    }

    /// The record for `date`, zero-valued when nothing was logged.
    #[must_use]
    pub fn day(&self, date: NaiveDate) -> DayRecord {
        self.lock().ledger.day(&date_key(date))
    }

    #[must_use]
    pub fn selected_day(&self) -> DayRecord {
        let state = self.lock();
        state.ledger.day(&date_key(state.selected))
    }

    /// Analyze a free-text description and record the result on the selected
    /// date.
    pub fn record_from_text(
        &self,
        analyzer: &dyn FoodAnalyzer,
        text: &str,
    ) -> Result<FoodItem, CoreError> {
        if text.trim().is_empty() {
            return Err(CoreError::Validation(
                "Describe what you ate before logging".into(),
            ));
        }
        let facts = analyzer.analyze_text(text).map_err(as_analysis)?;
        validate_facts(&facts)
            .map_err(|err| CoreError::Analysis(format!("unusable analysis result: {err}")))?;
        self.record(facts, FoodSource::Text)
    }

    /// Analyze an image payload and record the result on the selected date.
    pub fn record_from_image(
        &self,
        analyzer: &dyn FoodAnalyzer,
        image: &[u8],
    ) -> Result<FoodItem, CoreError> {
        if image.is_empty() {
            return Err(CoreError::Validation("Image payload is empty".into()));
        }
        let facts = analyzer.analyze_image(image).map_err(as_analysis)?;
        validate_facts(&facts)
            .map_err(|err| CoreError::Analysis(format!("unusable analysis result: {err}")))?;
        self.record(facts, FoodSource::Image)
    }

    /// Record a manually entered item, no collaborator involved.
    pub fn record_manual(&self, facts: NutritionFacts) -> Result<FoodItem, CoreError> {
        validate_facts(&facts)?;
        self.record(facts, FoodSource::Manual)
    }

    fn record(&self, facts: NutritionFacts, source: FoodSource) -> Result<FoodItem, CoreError> {
        let item = FoodItem::from_facts(
            facts,
            source,
            Local::now().format("%H:%M:%S").to_string(),
        );

        let mut state = self.lock();
        let date = date_key(state.selected);
        state.ledger.add_item(&date, item.clone());
        persist_ledger(&state);
        Ok(item)
    }

    /// Remove the item at `index` on the selected date. An invalid index
    /// fails typed and leaves everything untouched.
    pub fn remove_item(&self, index: usize) -> Result<DayRecord, CoreError> {
        let mut state = self.lock();
        let date = date_key(state.selected);
        let record = state.ledger.remove_item(&date, index)?.clone();
        persist_ledger(&state);
        Ok(record)
    }

    /// A complete, self-describing backup of the current state.
    #[must_use]
    pub fn export_snapshot(&self) -> Snapshot {
        let state = self.lock();
        Snapshot {
            ledger: state.ledger.clone(),
            profile: state.profile.clone(),
            exported_at: Utc::now().to_rfc3339(),
        }
    }

    /// Replace the ledger (and profile, when present) from a snapshot and
    /// persist immediately. A payload that does not parse, or has no ledger,
    /// fails without touching the current state. A snapshot without a
    /// profile preserves the existing one.
    pub fn import_snapshot(&self, json: &str) -> Result<ImportOutcome, CoreError> {
        let parsed: SnapshotImport = serde_json::from_str(json)
            .map_err(|err| CoreError::Format(format!("Snapshot does not parse: {err}")))?;
        let mut ledger = parsed
            .ledger
            .ok_or_else(|| CoreError::Format("Snapshot has no ledger".into()))?;
        ledger.normalize();

        let outcome = ImportOutcome {
            days_imported: ledger.len(),
            items_imported: ledger.item_count(),
            profile_imported: parsed.profile.is_some(),
        };

        let mut state = self.lock();
        state.ledger = ledger;
        if let Some(profile) = parsed.profile {
            state.profile = Some(profile);
        }
        persist_ledger(&state);
        if outcome.profile_imported {
            persist_profile(&state);
        }
        Ok(outcome)
    }

    /// Clear both storage slots and the in-memory state. Unlike routine
    /// persistence, a store failure here is surfaced: the user asked for the
    /// data to be gone and must know when it is not.
    pub fn reset(&self) -> Result<(), CoreError> {
        let mut state = self.lock();
        state.store.remove(PROFILE_KEY)?;
        state.store.remove(LEDGER_KEY)?;
        state.ledger = Ledger::new();
        state.profile = None;
        Ok(())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().expect("engine mutex poisoned")
    }
}

fn as_analysis(err: CoreError) -> CoreError {
    match err {
        CoreError::Analysis(_) => err,
        other => CoreError::Analysis(other.to_string()),
    }
}

fn persist_ledger(state: &State) {
    match serde_json::to_string(&state.ledger) {
        Ok(payload) => {
            if let Err(err) = state.store.set(LEDGER_KEY, &payload) {
                warn!("ledger persistence failed, in-memory state remains authoritative: {err}");
            }
        }
        Err(err) => warn!("ledger serialization failed: {err}"),
    }
}

fn persist_profile(state: &State) {
    let Some(profile) = &state.profile else {
        return;
    };
    match serde_json::to_string(profile) {
        Ok(payload) => {
            if let Err(err) = state.store.set(PROFILE_KEY, &payload) {
                warn!("profile persistence failed, in-memory state remains authoritative: {err}");
            }
        }
        Err(err) => warn!("profile serialization failed: {err}"),
    }
}
