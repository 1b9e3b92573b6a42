//! The declarative body description and its validation.
//!
//! A description is JSON, either a bare list of declarations or an object holding them under
//! `"Astronomical Objects"`:
//!
//! ```json
//! { "Astronomical Objects": [
//!     { "name": "Sun", "radius": 1, "self_rotation_period": 27, "solar_tilt": 0,
//!       "color": [255, 77, 0] },
//!     { "name": "Earth", "radius": 0.01, "orbital_period": 365, "parent": "Sun",
//!       "parent_distance": 1.0, "solar_tilt": 10, "color": [0, 0, 255],
//!       "self_rotation_period": 1, "texture": "assets/textures/earth.jpg" }
//! ] }
//! ```
//!
//! Validation is fail-fast: the first bad field rejects the whole description.

use super::body::Rgb;
use super::error::{LoadError, LoadResult};
use serde_json::{Map, Value};

const COLLECTION_KEY: &str = "Astronomical Objects";

/// One validated body record, still in description units.
#[derive(Clone, Debug, PartialEq)]
pub struct BodyDeclaration {
    pub name: String,
    pub radius: f32,
    /// `None` means "non-orbiting", which only roots may declare.
    pub orbital_period: Option<f32>,
    pub parent: Option<String>,
    pub parent_distance: Option<f32>,
    pub solar_tilt: f32,
    pub color: Rgb,
    pub self_rotation_period: f32,
    pub texture: Option<String>,
}

pub fn parse_description(text: &str) -> LoadResult<Vec<BodyDeclaration>> {
    let json: Value = serde_json::from_str(text)?;
    declarations_from_value(&json)
}

pub fn declarations_from_value(json: &Value) -> LoadResult<Vec<BodyDeclaration>> {
    let records = match json {
        Value::Array(records) => records,
        Value::Object(map) => match map.get(COLLECTION_KEY) {
            Some(Value::Array(records)) => records,
            _ => return Err(LoadError::NotAList),
        },
        _ => return Err(LoadError::NotAList),
    };

    records
        .iter()
        .enumerate()
        .map(|(index, record)| match record {
            Value::Object(fields) => RecordReader { index, fields, name: None }.read(),
            _ => Err(LoadError::NotARecord { index }),
        })
        .collect()
}

struct RecordReader<'a> {
    index: usize,
    fields: &'a Map<String, Value>,
    name: Option<String>,
}

impl RecordReader<'_> {
    fn read(mut self) -> LoadResult<BodyDeclaration> {
        let name = match self.fields.get("name").and_then(Value::as_str) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => return Err(self.invalid("name", "expected a non-empty string")),
        };
        self.name = Some(name.clone());

        let radius = self.number("radius")?;
        if radius <= 0.0 {
            return Err(self.invalid("radius", "must be positive"));
        }
        let self_rotation_period = self.number("self_rotation_period")?;
        self.not_negative("self_rotation_period", Some(self_rotation_period))?;
        let solar_tilt = self.number("solar_tilt")?;
        let color = self.color()?;

        let parent = match self.fields.get("parent") {
            None | Some(Value::Null) => None,
            Some(Value::String(parent)) => Some(parent.clone()),
            Some(_) => return Err(self.invalid("parent", "expected a body name or null")),
        };

        let (orbital_period, parent_distance) = if parent.is_some() {
            let required = "required when a parent is declared";
            let period = self.optional_number("orbital_period")?;
            let distance = self.optional_number("parent_distance")?;
            (
                Some(period.ok_or_else(|| self.invalid("orbital_period", required))?),
                Some(distance.ok_or_else(|| self.invalid("parent_distance", required))?),
            )
        } else {
            (
                self.optional_number("orbital_period")?,
                self.optional_number("parent_distance")?,
            )
        };

        self.not_negative("orbital_period", orbital_period)?;

        let texture = match self.fields.get("texture") {
            None | Some(Value::Null) => None,
            Some(Value::String(path)) => Some(path.clone()),
            Some(_) => return Err(self.invalid("texture", "expected a file reference or null")),
        };

        Ok(BodyDeclaration {
            name,
            radius,
            orbital_period,
            parent,
            parent_distance,
            solar_tilt,
            color,
            self_rotation_period,
            texture,
        })
    }

    fn number(&self, field: &'static str) -> LoadResult<f32> {
        self.optional_number(field)?
            .ok_or_else(|| self.invalid(field, "missing"))
    }

    fn optional_number(&self, field: &'static str) -> LoadResult<Option<f32>> {
        match self.fields.get(field) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => match value.as_f64() {
                Some(n) if n.is_finite() => Ok(Some(n as f32)),
                _ => Err(self.invalid(field, "expected a number")),
            },
        }
    }

    /// Periods of zero are allowed (and warned about later); negative ones would spin backwards.
    fn not_negative(&self, field: &'static str, value: Option<f32>) -> LoadResult<()> {
        match value {
            Some(v) if v < 0.0 => Err(self.invalid(field, "must not be negative")),
            _ => Ok(()),
        }
    }

    fn color(&self) -> LoadResult<Rgb> {
        let reason = "expected 3 integers in 0..=255";
        let components = match self.fields.get("color") {
            Some(Value::Array(components)) if components.len() == 3 => components,
            _ => return Err(self.invalid("color", reason)),
        };

        let mut rgb = [0u8; 3];
        for (slot, component) in rgb.iter_mut().zip(components) {
            *slot = component
                .as_u64()
                .and_then(|c| u8::try_from(c).ok())
                .ok_or_else(|| self.invalid("color", reason))?;
        }
        Ok(rgb)
    }

    fn invalid(&self, field: &'static str, reason: &'static str) -> LoadError {
        LoadError::InvalidField {
            index: self.index,
            name: self.name.clone(),
            field,
            reason,
        }
    }
}
