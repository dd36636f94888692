//! Counter selection against an aggressor.
//!
//! A nation can only declare war on targets whose score sits between 75% and
//! 175% of its own score. A counter is an allied nation for which the
//! aggressor is in range and that still has an offensive slot free.

use std::cmp::Reverse;

use log::debug;

use crate::pnw::structs::Nation;

/// Lower bound of the war range, as a ratio of the attacker's score.
const WAR_RANGE_MIN: f64 = 0.75;
/// Upper bound of the war range, as a ratio of the attacker's score.
const WAR_RANGE_MAX: f64 = 1.75;
/// Offensive wars a nation can run at once.
const MAX_OFFENSIVE_WARS: u32 = 5;

/// Whether `attacker` is allowed to declare war on `target`.
pub fn in_war_range(attacker: &Nation, target: &Nation) -> bool {
    let min = attacker.score * WAR_RANGE_MIN;
    let max = attacker.score * WAR_RANGE_MAX;
    target.score >= min && target.score <= max
}

/// Picks the best counters to `aggressor` among `members`.
///
/// Candidates in vacation mode, without a free offensive slot or out of range
/// are dropped. The rest is ordered by air force, then tanks, then soldiers,
/// and truncated to `limit`.
pub fn select_counters(aggressor: &Nation, members: Vec<Nation>, limit: usize) -> Vec<Nation> {
    let total = members.len();

    let mut counters = members
        .into_iter()
        .filter(|member| member.id != aggressor.id)
        .filter(|member| !member.in_vacation_mode())
        .filter(|member| member.offensive_wars < MAX_OFFENSIVE_WARS)
        .filter(|member| in_war_range(member, aggressor))
        .collect::<Vec<_>>();

    counters.sort_by_key(|member| {
        (
            Reverse(member.aircraft),
            Reverse(member.tanks),
            Reverse(member.soldiers),
        )
    });
    counters.truncate(limit);

    debug!(
        "{} counters selected out of {} members against {}",
        counters.len(),
        total,
        aggressor.id
    );

    counters
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nation(id: u64, score: f64, aircraft: u64) -> Nation {
        Nation {
            id,
            name: format!("nation{}", id),
            score,
            aircraft,
            ..Default::default()
        }
    }

    #[test]
    fn test_in_war_range_bounds() {
        let attacker = nation(1, 1000.0, 0);

        assert!(in_war_range(&attacker, &nation(2, 750.0, 0)));
        assert!(in_war_range(&attacker, &nation(3, 1750.0, 0)));
        assert!(!in_war_range(&attacker, &nation(4, 749.0, 0)));
        assert!(!in_war_range(&attacker, &nation(5, 1751.0, 0)));
    }

    #[test]
    fn test_select_counters_filters_out_of_range() {
        let aggressor = nation(1, 1000.0, 0);
        // 1000 must be within [0.75 * s, 1.75 * s], so s in [~571.4, ~1333.3]
        let members = vec![
            nation(2, 500.0, 100),
            nation(3, 600.0, 100),
            nation(4, 1300.0, 100),
            nation(5, 1400.0, 100),
        ];

        let ids = select_counters(&aggressor, members, 10)
            .iter()
            .map(|n| n.id)
            .collect::<Vec<_>>();

        assert_eq!(ids.len(), 2);
        assert!(ids.contains(&3));
        assert!(ids.contains(&4));
    }

    #[test]
    fn test_select_counters_drops_unavailable_members() {
        let aggressor = nation(1, 1000.0, 0);

        let mut vacation = nation(2, 1000.0, 100);
        vacation.vacation_turns = 5;
        let mut busy = nation(3, 1000.0, 100);
        busy.offensive_wars = 5;
        let available = nation(4, 1000.0, 100);

        let counters = select_counters(
            &aggressor,
            vec![vacation, busy, available, aggressor.clone()],
            10,
        );

        assert_eq!(counters.len(), 1);
        assert_eq!(counters[0].id, 4);
    }

    #[test]
    fn test_select_counters_orders_and_truncates() {
        let aggressor = nation(1, 1000.0, 0);
        let mut tanky = nation(4, 1000.0, 500);
        tanky.tanks = 1000;
        let members = vec![
            nation(2, 1000.0, 100),
            nation(3, 1000.0, 900),
            tanky,
            nation(5, 1000.0, 500),
        ];

        let ids = select_counters(&aggressor, members, 3)
            .iter()
            .map(|n| n.id)
            .collect::<Vec<_>>();

        assert_eq!(ids, vec![3, 4, 5]);
    }
}
