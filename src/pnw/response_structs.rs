//! Response structures for the Politics and War v1 API.
//!
//! The v1 API is loose with types: the same field can be a JSON number on one
//! endpoint and a numeric string on another. The deserializers below accept
//! both.

use serde::{Deserialize, Deserializer, de::Error as _};
use serde_json::Value;

use crate::pnw::structs::Nation;

/// Nation as returned by `/api/nation/id={id}/` and, with fewer fields, by
/// `/api/alliance-members/`.
#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct NationResponse {
    #[serde(alias = "nationid", deserialize_with = "flexible_u64")]
    pub id: u64,
    #[serde(alias = "nation")]
    pub name: String,
    #[serde(alias = "leadername")]
    pub leader: String,
    pub alliance: String,
    #[serde(rename = "minutessinceactive", deserialize_with = "flexible_u64")]
    pub minutes_since_active: u64,
    #[serde(deserialize_with = "flexible_u64")]
    pub cities: u64,
    #[serde(
        rename = "totalinfrastructure",
        alias = "infrastructure",
        deserialize_with = "flexible_f64"
    )]
    pub infrastructure: f64,
    #[serde(rename = "landarea", deserialize_with = "flexible_f64")]
    pub land_area: f64,
    #[serde(deserialize_with = "flexible_f64")]
    pub score: f64,
    #[serde(rename = "offensivewars", deserialize_with = "flexible_u64")]
    pub offensive_wars: u64,
    #[serde(rename = "defensivewars", deserialize_with = "flexible_u64")]
    pub defensive_wars: u64,
    #[serde(rename = "offensivewar_ids", deserialize_with = "flexible_ids")]
    pub offensive_war_ids: Vec<u64>,
    #[serde(rename = "defensivewar_ids", deserialize_with = "flexible_ids")]
    pub defensive_war_ids: Vec<u64>,
    #[serde(deserialize_with = "flexible_u64")]
    pub soldiers: u64,
    #[serde(deserialize_with = "flexible_u64")]
    pub tanks: u64,
    #[serde(deserialize_with = "flexible_u64")]
    pub aircraft: u64,
    #[serde(deserialize_with = "flexible_u64")]
    pub ships: u64,
    pub domestic_policy: String,
    pub war_policy: String,
    #[serde(rename = "vmode", alias = "vacmode", deserialize_with = "flexible_u64")]
    pub vacation_turns: u64,
}

impl From<NationResponse> for Nation {
    fn from(response: NationResponse) -> Self {
        Nation {
            id: response.id,
            name: response.name,
            leader: response.leader,
            alliance: response.alliance,
            minutes_since_active: response.minutes_since_active,
            cities: saturating_u32(response.cities),
            infrastructure: response.infrastructure,
            land_area: response.land_area,
            score: response.score,
            offensive_wars: saturating_u32(response.offensive_wars),
            defensive_wars: saturating_u32(response.defensive_wars),
            offensive_war_ids: response.offensive_war_ids,
            defensive_war_ids: response.defensive_war_ids,
            soldiers: response.soldiers,
            tanks: response.tanks,
            aircraft: response.aircraft,
            ships: response.ships,
            domestic_policy: response.domestic_policy,
            war_policy: response.war_policy,
            vacation_turns: saturating_u32(response.vacation_turns),
        }
    }
}

/// Response from `/api/alliance-members/?allianceid={id}`.
#[derive(Deserialize, Debug, Default)]
pub struct AllianceMembersResponse {
    #[serde(default)]
    pub nations: Vec<NationResponse>,
}

/// Reads the `success` flag every v1 response carries.
///
/// Returns the upstream error message when the flag is `false`. A missing
/// flag counts as success.
pub fn upstream_failure(body: &Value) -> Option<String> {
    match body.get("success").and_then(Value::as_bool) {
        Some(false) => Some(
            body.get("error")
                .or_else(|| body.get("general_message"))
                .and_then(Value::as_str)
                .unwrap_or("unknown error")
                .to_owned(),
        ),
        _ => None,
    }
}

fn saturating_u32(value: u64) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(serde_json::Number),
    Text(String),
    Null(()),
}

fn to_f64<E: serde::de::Error>(value: NumberOrString) -> Result<f64, E> {
    match value {
        NumberOrString::Number(number) => number
            .as_f64()
            .ok_or_else(|| E::custom(format!("{} is not representable", number))),
        NumberOrString::Text(text) if text.trim().is_empty() => Ok(0.0),
        NumberOrString::Text(text) => text.trim().parse::<f64>().map_err(E::custom),
        NumberOrString::Null(()) => Ok(0.0),
    }
}

fn flexible_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    to_f64(NumberOrString::deserialize(deserializer)?)
}

fn flexible_u64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    let value = flexible_f64(deserializer)?;
    if value < 0.0 {
        return Err(D::Error::custom(format!("expected a positive number, got {}", value)));
    }
    Ok(value as u64)
}

fn flexible_ids<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u64>, D::Error> {
    let values = Option::<Vec<NumberOrString>>::deserialize(deserializer)?.unwrap_or_default();
    values
        .into_iter()
        .map(|value| to_f64::<D::Error>(value).map(|id| id as u64))
        .collect()
}
