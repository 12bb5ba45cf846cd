//! Effort estimation scale: RPE values and reps-in-reserve phrasing.
//!
//! The engine only ever emits RPE values on the 7.0-10.0 half-point scale,
//! so the value set is closed as an enum rather than a raw float. Each RPE
//! pairs with exactly one reps-in-reserve phrase.

use std::fmt;

use schemars::gen::SchemaGenerator;
use schemars::schema::{Schema, SchemaObject};
use schemars::JsonSchema;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Rate of perceived exertion on the 7.0-10.0 half-point scale.
///
/// Serializes as the numeric value (`8.5`), never a variant name, so JSON
/// consumers read the familiar scale directly.
///
/// # Examples
/// ```
/// use rlens_models::Rpe;
/// let rpe = Rpe::try_from(8.5).unwrap();
/// assert_eq!(rpe.reps_in_reserve(), "(Possibly 2-3 Reps in the Tank)");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Rpe {
    Seven,
    SevenFive,
    Eight,
    EightFive,
    Nine,
    NineFive,
    Ten,
}

impl Rpe {
    /// All values in ascending order.
    pub const ALL: [Rpe; 7] = [
        Rpe::Seven,
        Rpe::SevenFive,
        Rpe::Eight,
        Rpe::EightFive,
        Rpe::Nine,
        Rpe::NineFive,
        Rpe::Ten,
    ];

    /// Numeric value on the RPE scale.
    pub fn value(&self) -> f64 {
        match self {
            Self::Seven => 7.0,
            Self::SevenFive => 7.5,
            Self::Eight => 8.0,
            Self::EightFive => 8.5,
            Self::Nine => 9.0,
            Self::NineFive => 9.5,
            Self::Ten => 10.0,
        }
    }

    /// The reps-in-reserve phrase paired with this RPE.
    pub fn reps_in_reserve(&self) -> &'static str {
        match self {
            Self::Seven => "(Possibly 5+ Reps in the Tank)",
            Self::SevenFive => "(Possibly 4+ Reps in the Tank)",
            Self::Eight => "(Possibly 3-4 Reps in the Tank)",
            Self::EightFive => "(Possibly 2-3 Reps in the Tank)",
            Self::Nine => "(Possibly 1-2 Reps in the Tank)",
            Self::NineFive => "(Possibly 0-1 Reps in the Tank)",
            Self::Ten => "(Possibly 0 Reps in the Tank)",
        }
    }
}

impl fmt::Display for Rpe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}", self.value())
    }
}

impl TryFrom<f64> for Rpe {
    type Error = RpeError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|rpe| (rpe.value() - value).abs() < 1e-9)
            .ok_or(RpeError::OutOfScale(value))
    }
}

/// Error for RPE values outside the supported scale.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RpeError {
    #[error("RPE {0} is not on the 7.0-10.0 half-point scale")]
    OutOfScale(f64),
}

impl Serialize for Rpe {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.value())
    }
}

impl<'de> Deserialize<'de> for Rpe {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = f64::deserialize(deserializer)?;
        Rpe::try_from(value).map_err(D::Error::custom)
    }
}

impl JsonSchema for Rpe {
    fn schema_name() -> String {
        "Rpe".to_string()
    }

    fn json_schema(gen: &mut SchemaGenerator) -> Schema {
        let mut schema: SchemaObject = <f64>::json_schema(gen).into_object();
        schema.enum_values = Some(Self::ALL.iter().map(|rpe| rpe.value().into()).collect());
        Schema::Object(schema)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_and_phrase_are_bijective() {
        let mut phrases: Vec<&str> = Rpe::ALL.iter().map(|rpe| rpe.reps_in_reserve()).collect();
        phrases.sort_unstable();
        phrases.dedup();
        assert_eq!(phrases.len(), Rpe::ALL.len());

        for rpe in Rpe::ALL {
            assert_eq!(Rpe::try_from(rpe.value()).unwrap(), rpe);
        }
    }

    #[test]
    fn test_serializes_as_number() {
        assert_eq!(serde_json::to_string(&Rpe::Seven).unwrap(), "7.0");
        assert_eq!(serde_json::to_string(&Rpe::NineFive).unwrap(), "9.5");
    }

    #[test]
    fn test_deserializes_from_number() {
        let rpe: Rpe = serde_json::from_str("8.5").unwrap();
        assert_eq!(rpe, Rpe::EightFive);
        // Integers on the scale are accepted
        let rpe: Rpe = serde_json::from_str("10").unwrap();
        assert_eq!(rpe, Rpe::Ten);
    }

    #[test]
    fn test_rejects_off_scale_values() {
        assert!(Rpe::try_from(7.2).is_err());
        assert!(Rpe::try_from(10.5).is_err());
        assert!(serde_json::from_str::<Rpe>("6.5").is_err());
    }

    #[test]
    fn test_display_uses_one_decimal() {
        assert_eq!(Rpe::Ten.to_string(), "10.0");
        assert_eq!(Rpe::SevenFive.to_string(), "7.5");
    }
}
