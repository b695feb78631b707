//! The `rules` command: prints the rule catalog as a table.

use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};

use ci_sanitizer_core::CompiledRules;

/// Renders `rules` in application order. Disabled rules appear only with `all`.
pub fn render_rules_table(rules: &CompiledRules, all: bool) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["ID", "Category", "Enabled", "Replacement"]);

    for compiled in rules.rules.iter().filter(|r| all || r.is_enabled()) {
        let rule = &compiled.rule;
        table.add_row(vec![
            Cell::new(&rule.id),
            Cell::new(rule.category.as_str()),
            Cell::new(if rule.enabled { "yes" } else { "no" }),
            Cell::new(&rule.replacement),
        ]);
    }
    table.to_string()
}

/// Prints the rules table to stdout.
pub fn run_rules(rules: &CompiledRules, all: bool) {
    println!("{}", render_rules_table(rules, all));
}
