//! Workout configuration and input validation

use std::{collections::BTreeMap, fmt, num::IntErrorKind};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Upper bound shared by every numeric input
pub const MAX_INPUT_VALUE: u32 = 100;

/// The five numeric inputs a workout is configured from
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputField {
    Cycles,
    WorkSeconds,
    RestSeconds,
    WarmupSeconds,
    CooldownSeconds,
}

impl InputField {
    pub const ALL: [InputField; 5] = [
        InputField::Cycles,
        InputField::WorkSeconds,
        InputField::RestSeconds,
        InputField::WarmupSeconds,
        InputField::CooldownSeconds,
    ];

    /// Smallest accepted value. Warmup and cooldown may be skipped entirely.
    pub fn min(self) -> u32 {
        match self {
            InputField::Cycles | InputField::WorkSeconds | InputField::RestSeconds => 1,
            InputField::WarmupSeconds | InputField::CooldownSeconds => 0,
        }
    }

    pub fn max(self) -> u32 {
        MAX_INPUT_VALUE
    }

    pub fn name(self) -> &'static str {
        match self {
            InputField::Cycles => "cycles",
            InputField::WorkSeconds => "work_seconds",
            InputField::RestSeconds => "rest_seconds",
            InputField::WarmupSeconds => "warmup_seconds",
            InputField::CooldownSeconds => "cooldown_seconds",
        }
    }

    /// Parse and range-check a raw input for this field
    pub fn parse(self, raw: &str) -> Result<u32, FieldError> {
        let value: i64 = raw.trim().parse().map_err(|e: std::num::ParseIntError| {
            match e.kind() {
                IntErrorKind::PosOverflow => FieldError::TooLarge { max: self.max() },
                IntErrorKind::NegOverflow => FieldError::TooSmall { min: self.min() },
                _ => FieldError::InvalidNumber,
            }
        })?;

        if value < i64::from(self.min()) {
            return Err(FieldError::TooSmall { min: self.min() });
        }
        if value > i64::from(self.max()) {
            return Err(FieldError::TooLarge { max: self.max() });
        }
        Ok(value as u32)
    }
}

impl fmt::Display for InputField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Why a single input was rejected. The Display text is shown next to the field.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    #[error("Invalid number")]
    InvalidNumber,

    #[error("Must be at least {min}")]
    TooSmall { min: u32 },

    #[error("Must be at most {max}")]
    TooLarge { max: u32 },
}

/// Per-field validation failures, in field order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: BTreeMap<InputField, FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn get(&self, field: InputField) -> Option<FieldError> {
        self.errors.get(&field).copied()
    }

    pub fn insert(&mut self, field: InputField, error: FieldError) {
        self.errors.insert(field, error);
    }

    pub fn iter(&self) -> impl Iterator<Item = (InputField, FieldError)> + '_ {
        self.errors.iter().map(|(field, error)| (*field, *error))
    }

    /// Field name to message, for surfaces that render errors as text
    pub fn messages(&self) -> BTreeMap<String, String> {
        self.iter()
            .map(|(field, error)| (field.name().to_string(), error.to_string()))
            .collect()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, error) in self.iter() {
            if !first {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", field, error)?;
            first = false;
        }
        Ok(())
    }
}

/// Raw, unvalidated inputs as typed by the user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutInputs {
    pub cycles: String,
    pub work_seconds: String,
    pub rest_seconds: String,
    pub warmup_seconds: String,
    pub cooldown_seconds: String,
}

impl WorkoutInputs {
    pub fn new(cycles: &str, work: &str, rest: &str, warmup: &str, cooldown: &str) -> Self {
        Self {
            cycles: cycles.to_string(),
            work_seconds: work.to_string(),
            rest_seconds: rest.to_string(),
            warmup_seconds: warmup.to_string(),
            cooldown_seconds: cooldown.to_string(),
        }
    }

    pub fn raw(&self, field: InputField) -> &str {
        match field {
            InputField::Cycles => &self.cycles,
            InputField::WorkSeconds => &self.work_seconds,
            InputField::RestSeconds => &self.rest_seconds,
            InputField::WarmupSeconds => &self.warmup_seconds,
            InputField::CooldownSeconds => &self.cooldown_seconds,
        }
    }

    /// Validate every field independently. Any failure rejects the whole config.
    pub fn validate(&self) -> Result<WorkoutConfig, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let mut values = [0u32; 5];

        for (slot, field) in values.iter_mut().zip(InputField::ALL) {
            match field.parse(self.raw(field)) {
                Ok(value) => *slot = value,
                Err(e) => errors.insert(field, e),
            }
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        let [cycles, work_seconds, rest_seconds, warmup_seconds, cooldown_seconds] = values;
        Ok(WorkoutConfig {
            cycles,
            work_seconds,
            rest_seconds,
            warmup_seconds,
            cooldown_seconds,
        })
    }
}

/// Validated workout parameters, fixed for the lifetime of one run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WorkoutConfig {
    cycles: u32,
    work_seconds: u32,
    rest_seconds: u32,
    warmup_seconds: u32,
    cooldown_seconds: u32,
}

impl WorkoutConfig {
    /// Build a config from already-numeric values, applying the same range rules as the inputs
    pub fn new(
        cycles: u32,
        work_seconds: u32,
        rest_seconds: u32,
        warmup_seconds: u32,
        cooldown_seconds: u32,
    ) -> Result<Self, ValidationErrors> {
        WorkoutInputs {
            cycles: cycles.to_string(),
            work_seconds: work_seconds.to_string(),
            rest_seconds: rest_seconds.to_string(),
            warmup_seconds: warmup_seconds.to_string(),
            cooldown_seconds: cooldown_seconds.to_string(),
        }
        .validate()
    }

    pub fn cycles(&self) -> u32 {
        self.cycles
    }

    pub fn work_seconds(&self) -> u32 {
        self.work_seconds
    }

    pub fn rest_seconds(&self) -> u32 {
        self.rest_seconds
    }

    pub fn warmup_seconds(&self) -> u32 {
        self.warmup_seconds
    }

    pub fn cooldown_seconds(&self) -> u32 {
        self.cooldown_seconds
    }

    /// Warmup, every work/rest cycle and cooldown, in milliseconds
    pub fn total_duration_ms(&self) -> u64 {
        let per_cycle = u64::from(self.work_seconds) + u64::from(self.rest_seconds);
        let seconds = u64::from(self.warmup_seconds)
            + u64::from(self.cycles) * per_cycle
            + u64::from(self.cooldown_seconds);
        seconds * 1000
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs() -> WorkoutInputs {
        WorkoutInputs::new("8", "20", "10", "0", "0")
    }

    #[test]
    fn valid_inputs_produce_config() {
        let config = inputs().validate().unwrap();
        assert_eq!(config.cycles(), 8);
        assert_eq!(config.work_seconds(), 20);
        assert_eq!(config.rest_seconds(), 10);
        assert_eq!(config.total_duration_ms(), 240_000);
    }

    #[test]
    fn non_numeric_input_is_invalid_number() {
        let mut raw = inputs();
        raw.work_seconds = "abc".to_string();
        let errors = raw.validate().unwrap_err();
        assert_eq!(errors.get(InputField::WorkSeconds), Some(FieldError::InvalidNumber));
        assert_eq!(
            errors.get(InputField::WorkSeconds).unwrap().to_string(),
            "Invalid number"
        );
        assert_eq!(errors.get(InputField::Cycles), None);
    }

    #[test]
    fn value_above_hundred_is_rejected() {
        let mut raw = inputs();
        raw.rest_seconds = "101".to_string();
        let errors = raw.validate().unwrap_err();
        assert_eq!(
            errors.get(InputField::RestSeconds).unwrap().to_string(),
            "Must be at most 100"
        );
    }

    #[test]
    fn warmup_and_cooldown_accept_zero_but_work_does_not() {
        let raw = WorkoutInputs::new("1", "0", "1", "0", "0");
        let errors = raw.validate().unwrap_err();
        assert_eq!(errors.get(InputField::WorkSeconds), Some(FieldError::TooSmall { min: 1 }));
        assert_eq!(errors.get(InputField::WarmupSeconds), None);
        assert_eq!(errors.get(InputField::CooldownSeconds), None);
    }

    #[test]
    fn negative_and_overflowing_values() {
        assert_eq!(InputField::WarmupSeconds.parse("-1"), Err(FieldError::TooSmall { min: 0 }));
        assert_eq!(
            InputField::Cycles.parse("99999999999999999999"),
            Err(FieldError::TooLarge { max: 100 })
        );
        assert_eq!(InputField::Cycles.parse(""), Err(FieldError::InvalidNumber));
        assert_eq!(InputField::Cycles.parse(" 12 "), Ok(12));
    }

    #[test]
    fn every_failing_field_is_reported() {
        let raw = WorkoutInputs::new("x", "101", "0", "-3", "7");
        let errors = raw.validate().unwrap_err();
        assert_eq!(errors.iter().count(), 4);
        assert_eq!(
            errors.to_string(),
            "cycles: Invalid number, work_seconds: Must be at most 100, \
             rest_seconds: Must be at least 1, warmup_seconds: Must be at least 0"
        );
    }

    #[test]
    fn numeric_constructor_applies_same_rules() {
        assert!(WorkoutConfig::new(0, 20, 10, 0, 0).is_err());
        assert!(WorkoutConfig::new(100, 100, 100, 100, 100).is_ok());
    }
}
