//! Mocked weather lookup.

use crate::{StatusSink, Tool};
use anyhow::Result;
use async_trait::async_trait;
use dcore::StatusKind;
use rand::Rng;
use schemars::{JsonSchema, Schema, schema_for};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// Simulated upstream lookup latency.
const LOOKUP_DELAY: Duration = Duration::from_millis(1000);
/// Simulated post-processing latency.
const PROCESS_DELAY: Duration = Duration::from_millis(500);

const CONDITIONS: [&str; 5] = ["Sunny", "Cloudy", "Light rain", "Overcast", "Thunderstorm"];

#[derive(Debug, Deserialize, JsonSchema)]
struct WeatherArgs {
    /// The location to look up, e.g. "Beijing", "Shanghai" or "New York"
    location: String,
}

/// A generated weather report.
#[derive(Debug, Serialize)]
pub struct WeatherReport {
    /// The location asked about
    pub location: String,
    /// Temperature in °C
    pub temperature: i32,
    /// Sky condition
    pub condition: &'static str,
    /// Relative humidity in percent
    pub humidity: u32,
    /// Wind speed in km/h
    pub wind_speed: u32,
    /// Local time of the report
    pub timestamp: String,
}

/// Mocked weather tool: random values behind simulated latency.
pub struct WeatherTool;

#[async_trait]
impl Tool for WeatherTool {
    fn name(&self) -> &'static str {
        "weather"
    }

    fn description(&self) -> &'static str {
        "Get detailed weather for a location: temperature, humidity, wind speed and conditions"
    }

    fn parameters(&self) -> Schema {
        schema_for!(WeatherArgs)
    }

    async fn execute(&self, args: Value, status: &StatusSink) -> Result<Value> {
        let args: WeatherArgs = match serde_json::from_value(args) {
            Ok(args) => args,
            Err(e) => {
                status.error("Weather lookup failed", e.to_string());
                return Err(e.into());
            }
        };
        let location = args.location;

        status.progress(
            StatusKind::Searching,
            format!("Looking up weather for {location}..."),
            20,
        );
        tokio::time::sleep(LOOKUP_DELAY).await;

        status.progress(StatusKind::Processing, "Processing weather data...", 70);
        tokio::time::sleep(PROCESS_DELAY).await;

        let mut rng = rand::rng();
        let report = WeatherReport {
            temperature: rng.random_range(5..=35),
            condition: CONDITIONS[rng.random_range(0..CONDITIONS.len())],
            humidity: rng.random_range(30..=80),
            wind_speed: rng.random_range(5..=25),
            timestamp: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            location,
        };

        status.completed(format!("Weather for {} ready", report.location));
        Ok(serde_json::to_value(report)?)
    }
}
