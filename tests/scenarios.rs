//! End-to-end cycles against a real state file.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use plant_hardening::core::{HourlyReading, PlantState, Policy};
use plant_hardening::effects::{CycleError, HardeningCycle, RunMode};
use plant_hardening::notify::{NotifyError, DEFAULT_TITLE};
use plant_hardening::store::{JsonFileStore, StoreError};
use plant_hardening::weather::{parse_forecast, WeatherError};
use plant_hardening::{Notifier, StateStore, WeatherSource};
use std::sync::{Arc, Mutex};

#[derive(Clone)]
struct ScenarioEnv {
    forecast_body: String,
    store: JsonFileStore,
    sent: Arc<Mutex<Vec<String>>>,
}

impl ScenarioEnv {
    fn new(dir: &tempfile::TempDir, forecast_body: String) -> Self {
        Self {
            forecast_body,
            store: JsonFileStore::new(dir.path().join("plant_status.json")),
            sent: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

impl WeatherSource for ScenarioEnv {
    fn hourly_temperatures(&self) -> Result<Vec<HourlyReading>, WeatherError> {
        parse_forecast(&self.forecast_body)
    }
}

impl StateStore for ScenarioEnv {
    fn get(&self) -> PlantState {
        self.store.get()
    }

    fn set(&self, state: PlantState) -> Result<(), StoreError> {
        self.store.set(state)
    }
}

impl Notifier for ScenarioEnv {
    fn send(&self, message: &str, _title: &str) -> Result<(), NotifyError> {
        self.sent.lock().unwrap().push(message.to_string());
        Ok(())
    }
}

fn at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 5, day)
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
}

/// Open-Meteo style body with one value per hour from `start`.
fn forecast_body(start: NaiveDateTime, values: &[f64]) -> String {
    let times: Vec<String> = (0..values.len())
        .map(|i| {
            (start + Duration::hours(i as i64))
                .format("%Y-%m-%dT%H:%M")
                .to_string()
        })
        .collect();
    serde_json::json!({
        "hourly_units": {"time": "iso8601", "temperature_2m": "°C"},
        "hourly": {"time": times, "temperature_2m": values}
    })
    .to_string()
}

fn cycle(now: NaiveDateTime) -> HardeningCycle {
    HardeningCycle::new(Policy::default(), DEFAULT_TITLE, now)
}

#[tokio::test]
async fn a_day_of_hardening() {
    let dir = tempfile::tempdir().unwrap();
    // 08:00 .. 07:00 next day
    let values = [
        12.0, 14.0, 16.0, 17.0, 18.0, 19.0, 20.0, 20.0, 19.0, 18.0, 16.0, 14.0, 12.0, 11.0, 10.0,
        10.0, 9.0, 9.0, 8.0, 8.0, 8.0, 9.0, 10.0, 12.0,
    ];
    let env = ScenarioEnv::new(&dir, forecast_body(at(10, 8, 0), &values));

    // Fresh install: plants start inside
    assert_eq!(env.get(), PlantState::Inside);

    // 08:30 looks at 09..11: 14, 16, 17, not all warm yet
    let early = cycle(at(10, 8, 30)).run(&env, RunMode::Live).await.unwrap();
    assert!(!early.committed);

    // 09:30 looks at 10..12: all warm
    let warm = cycle(at(10, 9, 30)).run(&env, RunMode::Live).await.unwrap();
    assert!(warm.committed);
    assert_eq!(env.get(), PlantState::Outside);

    // 18:30 looks at 19..21: 14, 12, 11, all cold
    let cold = cycle(at(10, 18, 30)).run(&env, RunMode::Live).await.unwrap();
    assert!(cold.committed);
    assert_eq!(env.get(), PlantState::Inside);

    let sent = env.sent();
    assert_eq!(sent.len(), 2);
    assert!(sent[0].contains("move the plants outside"));
    assert!(sent[1].contains("bring the plants inside"));
}

#[tokio::test]
async fn persisted_outside_state_survives_between_runs() {
    let dir = tempfile::tempdir().unwrap();
    let env = ScenarioEnv::new(&dir, forecast_body(at(10, 9, 0), &[16.0, 17.0, 18.0]));

    cycle(at(10, 9, 0)).run(&env, RunMode::Live).await.unwrap();

    let reopened = JsonFileStore::new(dir.path().join("plant_status.json"));
    assert_eq!(reopened.get(), PlantState::Outside);
}

#[tokio::test]
async fn cold_night_scenario_brings_plants_in() {
    let dir = tempfile::tempdir().unwrap();
    let env = ScenarioEnv::new(
        &dir,
        forecast_body(at(10, 23, 0), &[17.0, 16.0, 14.0, 15.0, 13.0]),
    );
    env.set(PlantState::Outside).unwrap();

    let outcome = cycle(at(10, 23, 30)).run(&env, RunMode::Live).await.unwrap();

    assert_eq!(
        outcome.observation.window.temperatures(),
        &[16.0, 14.0, 15.0, 13.0]
    );
    assert_eq!(outcome.decision.to, PlantState::Inside);
    assert!(env.sent()[0].contains("bring the plants inside"));
    assert_eq!(env.get(), PlantState::Inside);
}

#[tokio::test]
async fn malformed_forecast_aborts_without_writing() {
    let dir = tempfile::tempdir().unwrap();
    let env = ScenarioEnv::new(&dir, r#"{"hourly": {"time": ["2025-05-10T09:00"]}}"#.to_string());

    let result = cycle(at(10, 9, 0)).run(&env, RunMode::Live).await;

    match result {
        Err(CycleError::Weather(e)) => assert!(e.is_data_format()),
        other => panic!("Expected data format failure, got {other:?}"),
    }
    assert!(env.store.read().unwrap().is_none());
}

#[tokio::test]
async fn corrupt_state_file_is_treated_as_inside() {
    let dir = tempfile::tempdir().unwrap();
    let env = ScenarioEnv::new(&dir, forecast_body(at(10, 9, 0), &[16.0, 17.0, 18.0]));
    std::fs::write(env.store.path(), "outside").unwrap();

    let outcome = cycle(at(10, 9, 0)).run(&env, RunMode::Live).await.unwrap();

    assert_eq!(outcome.observation.current, PlantState::Inside);
    assert_eq!(outcome.decision.to, PlantState::Outside);
    assert_eq!(env.get(), PlantState::Outside);
}
