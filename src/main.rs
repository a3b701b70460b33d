use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use serde::Serialize;
use tracing::info;

use stylequiz::config::Config;
use stylequiz::output::terminal;
use stylequiz::quiz::answers::Answers;
use stylequiz::scoring::profile::{build_profile, ProfileVector};
use stylequiz::scoring::topk::RankedVector;

/// Style quiz: infer an aesthetic profile from questionnaire answers.
///
/// Each answered option adds weight to style attributes (Style, Color
/// Palette, Fabric, Fit, Occasion, Pattern). The strongest signals feed
/// downstream recommendations.
#[derive(Parser)]
#[command(name = "stylequiz", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the questions and their option labels
    Questions {
        /// Print the catalog as JSON instead of a listing
        #[arg(long)]
        json: bool,
    },

    /// Build a style profile from answers
    Profile {
        /// An answer as QUESTION_ID=LABEL. Repeat for more questions; repeat
        /// the same question id for a multi-select.
        #[arg(short = 'a', long = "answer", value_name = "QID=LABEL")]
        answer: Vec<String>,

        /// JSON file of answers: {"<qid>": "<label>" | ["<label>", ...]}
        #[arg(long, value_name = "FILE")]
        answers: Option<PathBuf>,

        /// How many top signals to keep (default: STYLEQUIZ_TOP_K or 3)
        #[arg(long)]
        top_k: Option<usize>,

        /// Print {"profile": ..., "top": ...} as JSON
        #[arg(long)]
        json: bool,
    },

    /// Serve the JSON API
    #[cfg(feature = "web")]
    Serve {
        /// Port to listen on (default: PORT or 3000)
        #[arg(long)]
        port: Option<u16>,

        /// Address to bind (default: STYLEQUIZ_BIND or 0.0.0.0)
        #[arg(long)]
        bind: Option<String>,
    },
}

#[derive(Serialize)]
struct ProfileOutput {
    profile: ProfileVector,
    top: RankedVector,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("stylequiz=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Questions { json } => {
            let catalog = config.load_catalog()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&catalog)?);
            } else {
                terminal::display_catalog(&catalog);
            }
        }

        Commands::Profile {
            answer,
            answers,
            top_k,
            json,
        } => {
            let catalog = config.load_catalog()?;
            let answers = collect_answers(answers, &answer)?;

            if answers.is_empty() {
                anyhow::bail!(
                    "No answers given. Pass -a QUESTION_ID=LABEL or --answers FILE.\n\
                     Run `stylequiz questions` to see the available questions."
                );
            }

            let profile = build_profile(&answers, &catalog);
            let top = profile.top_k(top_k.unwrap_or(config.top_k));

            info!(
                answers = answers.len(),
                signals = profile.len(),
                "Built style profile"
            );

            if json {
                let output = ProfileOutput { profile, top };
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                terminal::display_profile(&profile, &top);
                println!(
                    "{}",
                    "Scores are raw weighted sums across your answers.".dimmed()
                );
            }
        }

        #[cfg(feature = "web")]
        Commands::Serve { port, bind } => {
            let catalog = config.load_catalog()?;
            let state = stylequiz::web::AppState::new(catalog, config.top_k);
            let port = port.unwrap_or(config.port);
            let bind = bind.unwrap_or_else(|| config.bind.clone());
            stylequiz::web::run_server(state, port, &bind).await?;
        }
    }

    Ok(())
}

/// Merge answers from an optional JSON file with `-a QID=LABEL` flags.
///
/// Flags are applied after the file, so a flag for a question the file
/// already answers adds to that selection.
fn collect_answers(file: Option<PathBuf>, flags: &[String]) -> Result<Answers> {
    let mut answers = match file {
        Some(path) => {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read answers file {}", path.display()))?;
            serde_json::from_str::<Answers>(&text)
                .with_context(|| format!("answers file {} is not valid JSON", path.display()))?
        }
        None => Answers::new(),
    };

    for flag in flags {
        let Some((question_id, label)) = flag.split_once('=') else {
            anyhow::bail!("Invalid answer {flag:?}: expected QUESTION_ID=LABEL");
        };
        answers.select(question_id.trim(), label.trim());
    }

    Ok(answers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use stylequiz::quiz::answers::Selection;

    fn flags(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_repeated_flag_makes_multi_select_in_order() {
        let answers = collect_answers(
            None,
            &flags(&["Q1_go_to_outfit=Minimal & Clean", "Q1_go_to_outfit=Elevated Casual"]),
        )
        .unwrap();
        assert_eq!(
            answers.get("Q1_go_to_outfit"),
            Some(&Selection::Many(vec![
                "Minimal & Clean".to_string(),
                "Elevated Casual".to_string(),
            ]))
        );
    }

    #[test]
    fn test_flag_ids_and_labels_are_trimmed() {
        let answers = collect_answers(None, &flags(&[" Q2_preferred_palette = Cool & Icy "])).unwrap();
        assert_eq!(
            answers.get("Q2_preferred_palette"),
            Some(&Selection::One("Cool & Icy".to_string()))
        );
    }

    #[test]
    fn test_flag_without_equals_is_rejected() {
        let result = collect_answers(None, &flags(&["Q1_go_to_outfit"]));
        assert!(result.is_err());
    }

    #[test]
    fn test_label_containing_equals_splits_on_first() {
        let answers = collect_answers(None, &flags(&["Q_custom=Fit=Relaxed"])).unwrap();
        assert_eq!(
            answers.get("Q_custom"),
            Some(&Selection::One("Fit=Relaxed".to_string()))
        );
    }

    #[test]
    fn test_flags_add_to_file_answers() {
        let path = std::env::temp_dir().join(format!("stylequiz-answers-{}.json", std::process::id()));
        std::fs::write(
            &path,
            r#"{"Q1_go_to_outfit": "Boho/Romantic", "Q3_favorite_fabric": "Soft Wool"}"#,
        )
        .unwrap();

        let result = collect_answers(Some(path.clone()), &flags(&["Q1_go_to_outfit=Trend-forward/Edgy"]));
        std::fs::remove_file(&path).ok();
        let answers = result.unwrap();

        assert_eq!(
            answers.get("Q1_go_to_outfit"),
            Some(&Selection::Many(vec![
                "Boho/Romantic".to_string(),
                "Trend-forward/Edgy".to_string(),
            ]))
        );
        assert_eq!(
            answers.get("Q3_favorite_fabric"),
            Some(&Selection::One("Soft Wool".to_string()))
        );
    }

    #[test]
    fn test_missing_answers_file_is_an_error() {
        let result = collect_answers(Some(PathBuf::from("/nonexistent/stylequiz-answers.json")), &[]);
        assert!(result.is_err());
    }
}
