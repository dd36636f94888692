//! Domain records returned by the gateway.
//!
//! These are request scoped: they are fetched for one command, rendered and
//! dropped. Nothing here is cached.

use std::fmt;

/// A nation with the stats the bot displays.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Nation {
    /// Unique identifier of the nation
    pub id: u64,
    /// Nation name
    pub name: String,
    /// Ruler name
    pub leader: String,
    /// Alliance name, `None` as text when the nation has no alliance
    pub alliance: String,
    /// Minutes since the ruler was last online
    pub minutes_since_active: u64,
    /// Number of cities
    pub cities: u32,
    /// Total infrastructure across all cities
    pub infrastructure: f64,
    /// Total land area
    pub land_area: f64,
    /// Nation score, drives the war range
    pub score: f64,
    /// Number of active offensive wars
    pub offensive_wars: u32,
    /// Number of active defensive wars
    pub defensive_wars: u32,
    /// Identifiers of the active offensive wars
    pub offensive_war_ids: Vec<u64>,
    /// Identifiers of the active defensive wars
    pub defensive_war_ids: Vec<u64>,
    pub soldiers: u64,
    pub tanks: u64,
    pub aircraft: u64,
    pub ships: u64,
    /// Domestic policy name
    pub domestic_policy: String,
    /// War policy name
    pub war_policy: String,
    /// Turns left in vacation mode, `0` when active
    pub vacation_turns: u32,
}

impl Nation {
    /// Hours since the ruler was last online, rounded down.
    pub fn hours_since_active(&self) -> u64 {
        self.minutes_since_active / 60
    }

    /// Whether the nation is currently in vacation mode and can't be attacked.
    pub fn in_vacation_mode(&self) -> bool {
        self.vacation_turns > 0
    }
}

impl fmt::Display for Nation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "id={}, name={}, alliance={}, cities={}, score={}",
            self.id, self.name, self.alliance, self.cities, self.score
        )
    }
}

/// Recommended stockpile for a given city count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warchest {
    /// City count the amounts were computed for
    pub city_count: u32,
    pub money: u64,
    pub food: u64,
    pub uranium: u64,
    pub gasoline: u64,
    pub munitions: u64,
    pub steel: u64,
    pub aluminum: u64,
}
