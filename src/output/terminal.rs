// Colored terminal output for ranked terms and layouts.
//
// main.rs delegates all table formatting here.

use colored::Colorize;

use crate::pipeline::TermLayout;
use crate::scoring::selection::RankedTerm;

const TERM_WIDTH: usize = 24;

/// Display ranked terms (no coordinates) in the terminal.
pub fn display_ranked_terms(terms: &[RankedTerm]) {
    if terms.is_empty() {
        println!("No terms selected.");
        return;
    }

    println!(
        "\n{}",
        format!("=== Ranked Terms ({} terms) ===", terms.len()).bold()
    );
    println!();

    println!(
        "  {:>4}  {:<26} {:>8}  {:>8}  {:<6}",
        "Rank".dimmed(),
        "Term".dimmed(),
        "TF-ICF".dimmed(),
        "Share".dimmed(),
        "Tier".dimmed(),
    );
    println!("  {}", "-".repeat(60).dimmed());

    for (i, term) in terms.iter().enumerate() {
        println!(
            "  {:>4}. {:<26} {:>8.4}  {:>8.4}  {}",
            i + 1,
            super::truncate_chars(&term.term, TERM_WIDTH),
            term.raw_score,
            term.score,
            colorize_tier(term.tier),
        );
    }

    println!();
    display_tier_summary(terms.iter().map(|t| t.tier));
}

/// Display the positioned terms of a full pipeline run.
pub fn display_layout(layouts: &[TermLayout], missing: &[String]) {
    if layouts.is_empty() {
        println!("No terms laid out.");
        return;
    }

    println!(
        "\n{}",
        format!("=== Term Layout ({} terms) ===", layouts.len()).bold()
    );
    println!();

    println!(
        "  {:<26} {:>9}  {:>9}  {:>8}  {:<6}",
        "Term".dimmed(),
        "X".dimmed(),
        "Y".dimmed(),
        "Share".dimmed(),
        "Tier".dimmed(),
    );
    println!("  {}", "-".repeat(66).dimmed());

    for record in layouts {
        println!(
            "  {:<26} {:>9.1}  {:>9.1}  {:>8.4}  {}",
            super::truncate_chars(&record.term, TERM_WIDTH),
            record.x,
            record.y,
            record.score,
            colorize_tier(record.group),
        );
    }

    println!();
    display_tier_summary(layouts.iter().map(|l| l.group));

    if !missing.is_empty() {
        println!(
            "  {} {} terms had no word vector and were placed from a zero vector:",
            "~".yellow(),
            missing.len()
        );
        println!("    {}", missing.join(", ").dimmed());
    }
}

fn display_tier_summary(tiers: impl Iterator<Item = u32>) {
    let mut counts: Vec<usize> = Vec::new();
    for tier in tiers {
        let idx = tier.saturating_sub(1) as usize;
        if counts.len() <= idx {
            counts.resize(idx + 1, 0);
        }
        counts[idx] += 1;
    }

    let parts: Vec<String> = counts
        .iter()
        .enumerate()
        .filter(|(_, count)| **count > 0)
        .map(|(i, count)| format!("{}: {count}", colorize_tier(i as u32 + 1)))
        .collect();
    println!("  Tiers  {}", parts.join("  "));
    println!();
}

/// Colorize a tier number, most important first.
fn colorize_tier(tier: u32) -> colored::ColoredString {
    let label = format!("T{tier}");
    match tier {
        1 => label.red().bold(),
        2 => label.bright_red(),
        3 => label.yellow(),
        4 => label.green(),
        _ => label.dimmed(),
    }
}
