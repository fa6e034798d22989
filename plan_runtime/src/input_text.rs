use std::num::ParseFloatError;

use thiserror::Error;

use crate::{Coordinate, MomentCode, PlanLevel, ResourceNode, ResourceType, ScenarioCode};

#[derive(Debug, Error)]
pub enum InputParseError {
    #[error("empty {0}")]
    Empty(&'static str),
    #[error("unknown scenario code '{0}'")]
    UnknownScenario(String),
    #[error("unknown moment '{0}'")]
    UnknownMoment(String),
    #[error("unknown plan level '{0}'")]
    UnknownLevel(String),
    #[error("unknown resource type '{0}'")]
    UnknownResourceType(char),
    #[error("missing {field} in '{input}'")]
    MissingPart { field: &'static str, input: String },
    #[error("invalid float '{value}' for {context}: {source}")]
    InvalidFloat {
        value: String,
        context: &'static str,
        source: ParseFloatError,
    },
}

/// Parse a comma or whitespace separated list such as `nuk,air`.
///
/// An empty list is accepted; the compiler substitutes `UNK` for it.
pub fn parse_scenarios(input: &str) -> Result<Vec<ScenarioCode>, InputParseError> {
    input
        .split(|c: char| c == ',' || c == '+' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .map(|part| {
            ScenarioCode::from_code(part)
                .ok_or_else(|| InputParseError::UnknownScenario(part.to_string()))
        })
        .collect()
}

pub fn parse_moment(input: &str) -> Result<MomentCode, InputParseError> {
    if input.trim().is_empty() {
        return Err(InputParseError::Empty("moment"));
    }
    MomentCode::from_code(input).ok_or_else(|| InputParseError::UnknownMoment(input.to_string()))
}

pub fn parse_level(input: &str) -> Result<PlanLevel, InputParseError> {
    if input.trim().is_empty() {
        return Err(InputParseError::Empty("plan level"));
    }
    PlanLevel::from_code(input).ok_or_else(|| InputParseError::UnknownLevel(input.to_string()))
}

/// Parse `lat,lng` or `lat,lng,label`.
pub fn parse_coordinate(input: &str) -> Result<Coordinate, InputParseError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(InputParseError::Empty("coordinate"));
    }

    let mut parts = trimmed.splitn(3, ',');
    let lat_str = parts.next().ok_or_else(|| missing("latitude", trimmed))?;
    let lng_str = parts.next().ok_or_else(|| missing("longitude", trimmed))?;
    let lat = parse_f64(lat_str, "latitude")?;
    let lng = parse_f64(lng_str, "longitude")?;

    Ok(match parts.next().map(str::trim).filter(|label| !label.is_empty()) {
        Some(label) => Coordinate::labelled(lat, lng, label),
        None => Coordinate::new(lat, lng),
    })
}

/// Parse `label@lat,lng:TYPES`, e.g. `Clinic@41.40,2.18:DA`.
///
/// The node id is derived from its position: `N0`, `N1`, ...
pub fn parse_resource_node(input: &str, position: usize) -> Result<ResourceNode, InputParseError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(InputParseError::Empty("resource node"));
    }

    let (label, rest) = trimmed
        .split_once('@')
        .ok_or_else(|| missing("'@' location", trimmed))?;
    let (location, types_str) = rest
        .rsplit_once(':')
        .ok_or_else(|| missing("':' resource types", trimmed))?;
    let point = parse_coordinate(location)?;

    let mut types = Vec::new();
    for code in types_str.chars().filter(|c| !c.is_whitespace()) {
        let kind = ResourceType::from_code(code).ok_or(InputParseError::UnknownResourceType(code))?;
        if !types.contains(&kind) {
            types.push(kind);
        }
    }

    Ok(ResourceNode {
        id: format!("N{position}"),
        label: label.trim().to_string(),
        lat: point.lat,
        lng: point.lng,
        types,
    })
}

fn missing(field: &'static str, input: &str) -> InputParseError {
    InputParseError::MissingPart {
        field,
        input: input.to_string(),
    }
}

fn parse_f64(value: &str, context: &'static str) -> Result<f64, InputParseError> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|source| InputParseError::InvalidFloat {
            value: value.trim().to_string(),
            context,
            source,
        })
}
