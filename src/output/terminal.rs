// Colored terminal output for the question catalog and profile vectors.
//
// main.rs delegates all terminal formatting here.

use colored::Colorize;

use crate::quiz::catalog::QuestionCatalog;
use crate::scoring::profile::ProfileVector;
use crate::scoring::topk::RankedVector;

const BAR_WIDTH: usize = 20;

/// List every question with its option labels.
pub fn display_catalog(catalog: &QuestionCatalog) {
    println!(
        "\n{}",
        format!("=== Style Quiz ({} questions) ===", catalog.len()).bold()
    );

    for (id, question) in catalog.iter() {
        println!();
        println!("  {}", question.prompt.bold());
        println!("  {}", id.dimmed());
        for label in question.options.keys() {
            println!("    - {label}");
        }
    }
    println!();
}

/// Display the full profile as a bar chart, then the top-K summary.
///
/// Scores are raw sums, so bars are scaled against the strongest signal.
pub fn display_profile(profile: &ProfileVector, top: &RankedVector) {
    if profile.is_empty() {
        println!("No recognised answers. Run `stylequiz questions` to see valid ids and labels.");
        return;
    }

    println!(
        "\n{}",
        format!(
            "=== Your Style Profile ({} signals, total weight {:.2}) ===",
            profile.len(),
            profile.total()
        )
        .bold()
    );
    println!();

    let ranked = profile.top_k(profile.len());
    let max = ranked.iter().map(|(_, s)| s).fold(0.0_f64, f64::max);

    for (key, score) in ranked.iter() {
        let bar = score_bar(score, max);
        let colored_bar = if max > 0.0 && score >= max * 0.75 {
            bar.bright_green()
        } else if max > 0.0 && score >= max * 0.4 {
            bar.bright_yellow()
        } else {
            bar.bright_blue()
        };
        println!("  {:<32} {} {:.2}", key, colored_bar, score);
    }

    println!();
    println!("{}", format!("Top {} signals:", top.len()).bold());
    for (i, (key, score)) in top.iter().enumerate() {
        println!("  {:>2}. {:<32} {:.2}", i + 1, key.bold(), score);
    }
    println!();
}

fn score_bar(score: f64, max: f64) -> String {
    let ratio = if max > 0.0 { (score / max).clamp(0.0, 1.0) } else { 0.0 };
    let filled = (ratio * BAR_WIDTH as f64).round() as usize;
    let empty = BAR_WIDTH.saturating_sub(filled);
    format!("[{}{}]", "=".repeat(filled), " ".repeat(empty))
}
