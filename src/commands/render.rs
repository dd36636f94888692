//! Document builders for each command.
//!
//! Pure functions from domain records to [`Document`]s. They do no I/O and
//! can't fail; links are computed by the caller and passed in.

use crate::{
    commands::{document::Document, registry::CommandDescriptor},
    pnw::{Nation, Warchest},
};

/// Renders a nation: stats, military and policies.
pub fn render_nation(nation: &Nation, nation_url: String) -> Document {
    let stats = format!(
        "{} cities\n{} infra\n{} land\n{} nation score\n{} off wars\n{} def wars",
        nation.cities,
        nation.infrastructure,
        nation.land_area,
        nation.score,
        nation.offensive_wars,
        nation.defensive_wars
    );
    let military = format!(
        "🛡 {}\n🚍 {}\n🛩 {}\n🚢 {}",
        nation.soldiers, nation.tanks, nation.aircraft, nation.ships
    );
    let policies = format!("{}\n{}", nation.domestic_policy, nation.war_policy);

    Document::new()
        .with_author(&nation_heading(nation), Some(nation_url))
        .with_description(&format!("Led by {}", nation.leader))
        .with_field("Stats", &stats)
        .with_field("Military", &military)
        .with_field("Policies", &policies)
}

/// Renders the active wars of a nation, as links to their timeline.
pub fn render_wars(nation: &Nation, nation_url: String, war_url: impl Fn(u64) -> String) -> Document {
    let format_wars = |war_ids: &[u64]| {
        if war_ids.is_empty() {
            return "None".to_owned();
        }
        war_ids
            .iter()
            .map(|war_id| format!("[War #{}]({})", war_id, war_url(*war_id)))
            .collect::<Vec<String>>()
            .join("\n")
    };

    Document::new()
        .with_author(&nation_heading(nation), Some(nation_url))
        .with_title("Active wars")
        .with_field(
            &format!("Offensive ({})", nation.offensive_war_ids.len()),
            &format_wars(&nation.offensive_war_ids),
        )
        .with_field(
            &format!("Defensive ({})", nation.defensive_war_ids.len()),
            &format_wars(&nation.defensive_war_ids),
        )
}

/// Renders the recommended warchest.
pub fn render_warchest(warchest: &Warchest) -> Document {
    let resources = format!(
        "{} food\n{} uranium\n{} gasoline\n{} munitions\n{} steel\n{} aluminum",
        format_thousands(warchest.food),
        format_thousands(warchest.uranium),
        format_thousands(warchest.gasoline),
        format_thousands(warchest.munitions),
        format_thousands(warchest.steel),
        format_thousands(warchest.aluminum)
    );

    Document::new()
        .with_title(&format!("Warchest for {} cities", warchest.city_count))
        .with_field("Money", &format!("${}", format_thousands(warchest.money)))
        .with_field("Resources", &resources)
}

/// Renders an aggressor and the counters found against it.
///
/// `counters` pairs every counter with the link to its nation page.
pub fn render_counters(aggressor: &Nation, aggressor_url: String, counters: &[(Nation, String)]) -> Document {
    let target = format!(
        "{} cities, {} score\n🛡 {} 🚍 {} 🛩 {} 🚢 {}",
        aggressor.cities,
        aggressor.score,
        aggressor.soldiers,
        aggressor.tanks,
        aggressor.aircraft,
        aggressor.ships
    );

    let counters_value = if counters.is_empty() {
        "No counters found.".to_owned()
    } else {
        counters
            .iter()
            .map(|(counter, url)| {
                format!(
                    "[{}]({}) - {} cities, {} score, 🛩 {} 🚍 {}",
                    counter.name,
                    url,
                    counter.cities,
                    counter.score,
                    counter.aircraft,
                    counter.tanks
                )
            })
            .collect::<Vec<String>>()
            .join("\n")
    };

    Document::new()
        .with_author(&nation_heading(aggressor), Some(aggressor_url))
        .with_title("Counters")
        .with_field("Target", &target)
        .with_field(&format!("Counters ({})", counters.len()), &counters_value)
}

/// Renders a user-facing error.
pub fn render_error(message: &str) -> Document {
    Document::error(message)
}

/// Formats the help message listing every command.
pub fn format_help(prefix: char, descriptors: &[CommandDescriptor]) -> String {
    let commands = descriptors
        .iter()
        .map(|descriptor| {
            let aliases = match descriptor.aliases.is_empty() {
                true => String::new(),
                false => format!(
                    " (alias: {})",
                    descriptor
                        .aliases
                        .iter()
                        .map(|alias| format!("`{}{}`", prefix, alias))
                        .collect::<Vec<String>>()
                        .join(", ")
                ),
            };
            format!(
                "- `{}`{}: {}",
                descriptor.usage(prefix),
                aliases,
                descriptor.summary
            )
        })
        .collect::<Vec<String>>()
        .join("\n");

    format!("Commands:\n{}", commands)
}

/// `Atlantis (Rose) - Active 2hrs ago`
fn nation_heading(nation: &Nation) -> String {
    format!(
        "{} ({}) - Active {}hrs ago",
        nation.name,
        nation.alliance,
        nation.hours_since_active()
    )
}

/// Formats `1234567` as `1,234,567`.
fn format_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut formatted = String::with_capacity(digits.len() + digits.len() / 3);

    for (position, digit) in digits.chars().enumerate() {
        if position > 0 && (digits.len() - position) % 3 == 0 {
            formatted.push(',');
        }
        formatted.push(digit);
    }

    formatted
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::commands::{CommandContext, Reply, registry::HandlerFuture};

    use super::*;

    fn create_nation() -> Nation {
        Nation {
            id: 12345,
            name: "Atlantis".to_string(),
            leader: "Poseidon".to_string(),
            alliance: "Rose".to_string(),
            minutes_since_active: 130,
            cities: 10,
            infrastructure: 15000.5,
            land_area: 25000.0,
            score: 500.0,
            offensive_wars: 1,
            defensive_wars: 2,
            offensive_war_ids: vec![111],
            defensive_war_ids: vec![222, 333],
            soldiers: 150000,
            tanks: 12500,
            aircraft: 750,
            ships: 30,
            domestic_policy: "Manifest Destiny".to_string(),
            war_policy: "Pirate".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_render_nation() {
        let document = render_nation(&create_nation(), "http://pnw/nation/id=12345".to_string());

        let author = document.author.as_ref().unwrap();
        assert_eq!(author.name, "Atlantis (Rose) - Active 2hrs ago");
        assert_eq!(author.url.as_deref(), Some("http://pnw/nation/id=12345"));

        let stats = &document.field("Stats").unwrap().value;
        assert!(stats.contains("10 cities"));
        assert!(stats.contains("15000.5 infra"));
        assert!(stats.contains("25000 land"));
        assert!(stats.contains("500 nation score"));
        assert!(stats.contains("1 off wars"));
        assert!(stats.contains("2 def wars"));

        let military = &document.field("Military").unwrap().value;
        assert!(military.contains("🛡 150000"));
        assert!(military.contains("🛩 750"));

        let policies = &document.field("Policies").unwrap().value;
        assert_eq!(policies, "Manifest Destiny\nPirate");
        assert!(document.footer.is_none());
    }

    #[test]
    fn test_render_wars() {
        let document = render_wars(&create_nation(), "http://pnw/nation/id=12345".to_string(), |id| {
            format!("http://pnw/war={}", id)
        });

        assert_eq!(document.title.as_deref(), Some("Active wars"));
        assert_eq!(
            document.field("Offensive (1)").unwrap().value,
            "[War #111](http://pnw/war=111)"
        );
        assert_eq!(
            document.field("Defensive (2)").unwrap().value,
            "[War #222](http://pnw/war=222)\n[War #333](http://pnw/war=333)"
        );
    }

    #[test]
    fn test_render_wars_without_wars() {
        let nation = Nation::default();
        let document = render_wars(&nation, String::new(), |id| id.to_string());

        assert_eq!(document.field("Offensive (0)").unwrap().value, "None");
        assert_eq!(document.field("Defensive (0)").unwrap().value, "None");
    }

    #[test]
    fn test_render_warchest() {
        let warchest = Warchest {
            city_count: 10,
            money: 10_000_000,
            food: 30_000,
            uranium: 1_500,
            gasoline: 15_000,
            munitions: 15_000,
            steel: 17_500,
            aluminum: 10_000,
        };
        let document = render_warchest(&warchest);

        assert_eq!(document.title.as_deref(), Some("Warchest for 10 cities"));
        assert_eq!(document.field("Money").unwrap().value, "$10,000,000");
        assert!(document.field("Resources").unwrap().value.contains("17,500 steel"));
    }

    #[test]
    fn test_render_counters() {
        let aggressor = create_nation();
        let counter = Nation {
            id: 7,
            name: "Lemuria".to_string(),
            cities: 12,
            score: 640.5,
            aircraft: 900,
            tanks: 100,
            ..Default::default()
        };

        let document = render_counters(
            &aggressor,
            "http://pnw/nation/id=12345".to_string(),
            &[(counter, "http://pnw/nation/id=7".to_string())],
        );

        assert_eq!(document.title.as_deref(), Some("Counters"));
        assert!(document.field("Target").unwrap().value.contains("10 cities, 500 score"));
        assert_eq!(
            document.field("Counters (1)").unwrap().value,
            "[Lemuria](http://pnw/nation/id=7) - 12 cities, 640.5 score, 🛩 900 🚍 100"
        );
    }

    #[test]
    fn test_render_counters_empty() {
        let document = render_counters(&create_nation(), String::new(), &[]);
        assert_eq!(
            document.field("Counters (0)").unwrap().value,
            "No counters found."
        );
    }

    #[test]
    fn test_format_help() {
        fn noop(_: Arc<CommandContext>, _: Vec<String>) -> HandlerFuture {
            Box::pin(async { Ok(Reply::Text(String::new())) })
        }

        let descriptors = vec![
            CommandDescriptor::new("ping", "check the bot is alive", noop),
            CommandDescriptor::new("display_nation", "display a nation", noop)
                .alias("nation")
                .param(crate::commands::registry::ParamSpec::required("nation_id")),
        ];

        assert_eq!(
            format_help('=', &descriptors),
            "Commands:\n\
             - `=ping`: check the bot is alive\n\
             - `=display_nation <nation_id>` (alias: `=nation`): display a nation"
        );
    }

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(999), "999");
        assert_eq!(format_thousands(1000), "1,000");
        assert_eq!(format_thousands(17500), "17,500");
        assert_eq!(format_thousands(10000000), "10,000,000");
    }
}
