// Workout description - The JSON document a workout is authored in
// Every field is optional; normalization happens here, not in the player

use crate::playback::{PlayerError, PlayerResult};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::path::Path;

/// Built-in demo workout (used by the CLI when no file is given)
const SAMPLE_WORKOUT_JSON: &str = include_str!("../../data/full_body_hiit.json");

/// Effort level of a block item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intensity {
    Low,
    Medium,
    High,
}

impl Intensity {
    /// Parse a free-form intensity label (case-insensitive)
    /// Returns None for anything unrecognized
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Intensity::Low),
            "medium" | "moderate" => Some(Intensity::Medium),
            "high" => Some(Intensity::High),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Intensity::Low => "low",
            Intensity::Medium => "medium",
            Intensity::High => "high",
        }
    }
}

impl fmt::Display for Intensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Longest single segment accepted (24 h); longer durations are clamped
pub const MAX_SEGMENT_MS: u64 = 24 * 60 * 60 * 1000;

/// Most rounds a workout may expand to
pub const MAX_ROUNDS: u32 = 1_000;

fn lenient_intensity<'de, D>(deserializer: D) -> Result<Option<Intensity>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(match &raw {
        Value::Null => None,
        Value::String(label) => {
            let parsed = Intensity::parse(label);
            if parsed.is_none() {
                log::debug!("Ignoring unknown intensity {:?}", label);
            }
            parsed
        }
        other => {
            log::debug!("Ignoring non-text intensity {}", other);
            None
        }
    })
}

/// Any scalar becomes its text; null and containers become ""
fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => text,
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => {
            log::debug!("Ignoring non-text label {}", other);
            String::new()
        }
    })
}

/// Numbers and numeric strings; anything else reads as missing
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64(),
        Value::String(text) => text.trim().parse().ok(),
        Value::Null => None,
        other => {
            log::debug!("Ignoring non-numeric value {}", other);
            None
        }
    })
}

/// Like `lenient_number`, truncated toward zero
fn lenient_integer<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_number(deserializer)?
        .filter(|n| n.is_finite())
        .map(|n| n.trunc().clamp(i64::MIN as f64, i64::MAX as f64) as i64))
}

/// Convert a duration in seconds to whole milliseconds
/// Junk reads as 0 and anything above `MAX_SEGMENT_MS` is clamped
pub fn seconds_to_ms(seconds: Option<f64>) -> u64 {
    match seconds {
        Some(sec) if sec.is_finite() && sec > 0.0 => {
            ((sec * 1000.0).round() as u64).min(MAX_SEGMENT_MS)
        }
        _ => 0,
    }
}

/// One timed exercise (or rest) in the repeating block
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlockItem {
    #[serde(default, deserialize_with = "lenient_text")]
    pub exercise: String,
    #[serde(default, deserialize_with = "lenient_number")]
    pub duration_sec: Option<f64>,
    #[serde(default, deserialize_with = "lenient_intensity")]
    pub intensity: Option<Intensity>,
}

impl BlockItem {
    pub fn new(exercise: &str, duration_sec: f64, intensity: Option<Intensity>) -> Self {
        Self {
            exercise: exercise.to_string(),
            duration_sec: Some(duration_sec),
            intensity,
        }
    }

    pub fn duration_ms(&self) -> u64 {
        seconds_to_ms(self.duration_sec)
    }
}

/// One cooldown step (always played at low intensity)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CooldownItem {
    #[serde(default, deserialize_with = "lenient_text")]
    pub exercise: String,
    #[serde(default, deserialize_with = "lenient_number")]
    pub duration_sec: Option<f64>,
}

impl CooldownItem {
    pub fn new(exercise: &str, duration_sec: f64) -> Self {
        Self {
            exercise: exercise.to_string(),
            duration_sec: Some(duration_sec),
        }
    }

    pub fn duration_ms(&self) -> u64 {
        seconds_to_ms(self.duration_sec)
    }
}

/// A group of block items; only the first group is expanded into rounds
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IntervalGroup {
    #[serde(
        default,
        deserialize_with = "lenient_integer",
        skip_serializing_if = "Option::is_none"
    )]
    pub round: Option<i64>,
    #[serde(default)]
    pub block: Vec<BlockItem>,
}

/// Free-form workout metadata, passed through untouched to `meta` subscribers
///
/// Known keys with an unexpected shape stay in `extra` under their own name,
/// so a cosmetic field never fails a whole workout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value")]
pub struct WorkoutMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equipment: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub target_zones: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal: Option<String>,
    /// Any keys not modelled above
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl From<Value> for WorkoutMetadata {
    fn from(value: Value) -> Self {
        let mut extra = match value {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => {
                log::warn!("Ignoring non-object workout metadata {}", other);
                Map::new()
            }
        };

        let equipment = take_if(&mut extra, "equipment", |v| v.as_str().map(str::to_string));
        let goal = take_if(&mut extra, "goal", |v| v.as_str().map(str::to_string));
        let target_zones = take_if(&mut extra, "target_zones", |v| {
            v.as_array()?
                .iter()
                .map(|zone| zone.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default();

        Self {
            equipment,
            target_zones,
            goal,
            extra,
        }
    }
}

/// Remove `key` from `map` only if `convert` accepts its value
fn take_if<T>(
    map: &mut Map<String, Value>,
    key: &str,
    convert: impl FnOnce(&Value) -> Option<T>,
) -> Option<T> {
    let converted = convert(map.get(key)?)?;
    map.remove(key);
    Some(converted)
}

/// Declarative workout as authored (e.g. by a chat assistant)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkoutDescription {
    #[serde(default, deserialize_with = "lenient_text")]
    pub workout_type: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub title: String,
    #[serde(
        default,
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub duration_min: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient_integer",
        skip_serializing_if = "Option::is_none"
    )]
    pub rounds: Option<i64>,
    #[serde(default)]
    pub intervals: Vec<IntervalGroup>,
    #[serde(default)]
    pub cooldown: Vec<CooldownItem>,
    #[serde(default)]
    pub metadata: Option<WorkoutMetadata>,
}

impl WorkoutDescription {
    /// Build a description from a single block (convenience for code-authored workouts)
    pub fn new(title: &str, rounds: i64, block: Vec<BlockItem>, cooldown: Vec<CooldownItem>) -> Self {
        Self {
            title: title.to_string(),
            rounds: Some(rounds),
            intervals: vec![IntervalGroup { round: Some(1), block }],
            cooldown,
            ..Default::default()
        }
    }

    /// Parse a workout from JSON text
    ///
    /// The top level must be an object; everything inside is optional.
    pub fn from_json_str(json: &str) -> PlayerResult<Self> {
        let value: Value = serde_json::from_str(json)?;
        if !value.is_object() {
            return Err(PlayerError::InvalidWorkout(
                "expected a JSON object at the top level".to_string(),
            ));
        }

        let workout: Self = serde_json::from_value(value)?;
        if workout.intervals.len() > 1 {
            log::warn!(
                "Workout '{}' has {} interval groups; only the first is played",
                workout.title,
                workout.intervals.len()
            );
        }
        Ok(workout)
    }

    /// Load a workout JSON file
    pub fn from_path<P: AsRef<Path>>(path: P) -> PlayerResult<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        log::debug!("Loaded workout file {}", path.as_ref().display());
        Self::from_json_str(&text)
    }

    /// The bundled "Full Body HIIT Blast" workout
    pub fn sample() -> PlayerResult<Self> {
        Self::from_json_str(SAMPLE_WORKOUT_JSON)
    }

    /// Number of rounds to play, between 1 and `MAX_ROUNDS`
    pub fn round_count(&self) -> u32 {
        self.rounds.unwrap_or(1).clamp(1, MAX_ROUNDS as i64) as u32
    }

    /// The repeating block (empty when no interval group is present)
    pub fn block(&self) -> &[BlockItem] {
        self.intervals
            .first()
            .map(|group| group.block.as_slice())
            .unwrap_or(&[])
    }

    pub fn metadata_or_default(&self) -> WorkoutMetadata {
        self.metadata.clone().unwrap_or_default()
    }
}
