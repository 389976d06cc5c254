use crate::engine::DrawResult;
use crate::session::SessionSnapshot;
use crate::tier::{Tier, TierTable};

pub fn print_simple_header(title: &str) {
    println!("\n──── {} ────", title);
}

fn tier_icon(tier: Tier) -> &'static str {
    match tier {
        Tier::Common => "⚪",
        Tier::Rare => "🔵",
        Tier::Epic => "🟣",
        Tier::Legendary => "🌟",
    }
}

/// Icon plus the catalog's display name for `tier`.
pub fn tier_label(table: &TierTable, tier: Tier) -> String {
    format!("{} {}", tier_icon(tier), table.definition(tier).display_name)
}

pub fn print_reveal(result: &DrawResult, table: &TierTable) {
    print_simple_header("Reveal");
    println!("{}  {}", tier_label(table, result.tier), result.item.name);
    if !result.item.description.is_empty() {
        println!("   {}", result.item.description);
    }
    if result.pity_triggered {
        println!("✨ Guarantee reached!");
    }
    if result.fallback {
        println!(
            "⚠️  That tier was empty, you received a {} item instead.",
            table.definition(result.tier).display_name
        );
    }
}

pub fn print_status(snap: &SessionSnapshot) {
    println!(
        "🎟️  Tickets: {} (spent {})   🎯 Legendary guaranteed within {} pull(s)",
        snap.tickets.available, snap.tickets.total_spent, snap.draws_until_guarantee
    );
}

pub fn print_history<'a>(results: impl Iterator<Item = &'a DrawResult>, table: &TierTable) {
    print_simple_header("History");
    let mut any = false;
    for r in results {
        any = true;
        println!("  • {:<10} {:<14} {}", r.id.to_string(), tier_label(table, r.tier), r.item.name);
    }
    if !any {
        println!("No pulls yet.");
    }
}

/// Short label for a pull-menu entry.
pub fn pull_label(available: u32) -> String {
    match available {
        0 => "Pull (no tickets)".to_string(),
        1 => "Pull (1 ticket left)".to_string(),
        n => format!("Pull ({} tickets left)", n),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pull_label_pluralizes() {
        assert_eq!(pull_label(0), "Pull (no tickets)");
        assert_eq!(pull_label(1), "Pull (1 ticket left)");
        assert_eq!(pull_label(5), "Pull (5 tickets left)");
    }

    #[test]
    fn tier_label_uses_catalog_name() {
        let table = TierTable::from_json(
            r#"{
                "tiers": [
                    {"id": "common", "weight": 70, "display_name": "Common"},
                    {"id": "rare", "weight": 20, "display_name": "Rare"},
                    {"id": "epic", "weight": 8, "display_name": "Epic"},
                    {"id": "legendary", "weight": 2, "display_name": "Mythic Gold"}
                ],
                "items": [
                    {"name": "Chip", "tier": "common", "description": ""},
                    {"name": "Card", "tier": "rare", "description": ""},
                    {"name": "Gem", "tier": "epic", "description": ""},
                    {"name": "Crown", "tier": "legendary", "description": ""}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(tier_label(&table, Tier::Legendary), "🌟 Mythic Gold");
        assert_eq!(tier_label(&table, Tier::Common), "⚪ Common");
    }
}
