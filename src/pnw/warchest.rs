//! Recommended warchest table.
//!
//! The warchest grows linearly with the city count: every city adds the same
//! stockpile of money and resources.

use crate::pnw::structs::Warchest;

/// Smallest city count a warchest is computed for.
pub const MIN_CITIES: u32 = 2;
/// Largest city count a warchest is computed for.
pub const MAX_CITIES: u32 = 30;

const MONEY_PER_CITY: u64 = 1_000_000;
const FOOD_PER_CITY: u64 = 3_000;
const URANIUM_PER_CITY: u64 = 150;
const GASOLINE_PER_CITY: u64 = 1_500;
const MUNITIONS_PER_CITY: u64 = 1_500;
const STEEL_PER_CITY: u64 = 1_750;
const ALUMINUM_PER_CITY: u64 = 1_000;

/// Computes the recommended stockpile for `city_count` cities.
///
/// The range check is the caller's job, any count is accepted here.
pub fn required_warchest(city_count: u32) -> Warchest {
    let cities = u64::from(city_count);

    Warchest {
        city_count,
        money: MONEY_PER_CITY * cities,
        food: FOOD_PER_CITY * cities,
        uranium: URANIUM_PER_CITY * cities,
        gasoline: GASOLINE_PER_CITY * cities,
        munitions: MUNITIONS_PER_CITY * cities,
        steel: STEEL_PER_CITY * cities,
        aluminum: ALUMINUM_PER_CITY * cities,
    }
}
