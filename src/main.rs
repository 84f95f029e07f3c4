use std::env;
use std::fs;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use dotenvy::dotenv;
use tracing::info;

use storybook_prompter::analysis::{apply_edits, AnalysisDocument, EditSet};
use storybook_prompter::config::CONFIG;
use storybook_prompter::prompt::{
    backfill_dominant_colors, estimate_dominant_hex, synthesize_prompt_with,
};
use storybook_prompter::utils::logging::init_logging;

struct CliArgs {
    analysis_path: PathBuf,
    edit_paths: Vec<PathBuf>,
    image_path: Option<PathBuf>,
    show_doc: bool,
}

fn usage() -> &'static str {
    "Usage: storybook_prompter --analysis <analysis.json> [--edits <edits.json>]... [--image <reference-image>] [--show-doc]"
}

fn parse_cli_args(args: &[String]) -> Result<CliArgs> {
    let mut analysis_path: Option<PathBuf> = None;
    let mut edit_paths: Vec<PathBuf> = Vec::new();
    let mut image_path: Option<PathBuf> = None;
    let mut show_doc = false;

    let mut index = 1;
    while index < args.len() {
        match args[index].as_str() {
            "--analysis" => {
                index += 1;
                let value = args
                    .get(index)
                    .ok_or_else(|| anyhow!("Missing value for --analysis"))?;
                analysis_path = Some(PathBuf::from(value));
            }
            "--edits" => {
                index += 1;
                let value = args
                    .get(index)
                    .ok_or_else(|| anyhow!("Missing value for --edits"))?;
                edit_paths.push(PathBuf::from(value));
            }
            "--image" => {
                index += 1;
                let value = args
                    .get(index)
                    .ok_or_else(|| anyhow!("Missing value for --image"))?;
                image_path = Some(PathBuf::from(value));
            }
            "--show-doc" => {
                show_doc = true;
            }
            "--help" | "-h" => {
                return Err(anyhow!(usage()));
            }
            other => {
                return Err(anyhow!("Unknown argument '{other}'. {}", usage()));
            }
        }
        index += 1;
    }

    Ok(CliArgs {
        analysis_path: analysis_path.ok_or_else(|| anyhow!("--analysis is required. {}", usage()))?,
        edit_paths,
        image_path,
        show_doc,
    })
}

fn main() -> Result<()> {
    dotenv().ok();
    let _logging_guards = init_logging();

    let args: Vec<String> = env::args().collect();
    let cli = parse_cli_args(&args)?;

    let raw = fs::read_to_string(&cli.analysis_path)
        .with_context(|| format!("reading {}", cli.analysis_path.display()))?;
    let mut document: AnalysisDocument = serde_json::from_str(&raw)
        .with_context(|| format!("parsing {}", cli.analysis_path.display()))?;
    info!(
        "loaded analysis document with {} object(s) from {}",
        document.objects.len(),
        cli.analysis_path.display()
    );

    if let Some(image_path) = &cli.image_path {
        let fallback_hex = estimate_dominant_hex(image_path)
            .with_context(|| format!("estimating dominant color of {}", image_path.display()))?;
        info!("estimated fallback dominant color {fallback_hex}");
        backfill_dominant_colors(&mut document, &fallback_hex);
    }

    for edit_path in &cli.edit_paths {
        let raw_edits = fs::read_to_string(edit_path)
            .with_context(|| format!("reading {}", edit_path.display()))?;
        let edit_set: EditSet = serde_json::from_str(&raw_edits)
            .with_context(|| format!("parsing {}", edit_path.display()))?;
        info!(
            "applying {} edit(s) from {}",
            edit_set.edits.len(),
            edit_path.display()
        );
        apply_edits(&mut document, &edit_set);
    }

    if cli.show_doc {
        eprintln!("{}", serde_json::to_string_pretty(&document)?);
    }

    let prompt_text = synthesize_prompt_with(&document, &CONFIG.prompt_options());
    println!("{prompt_text}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        std::iter::once("storybook_prompter")
            .chain(values.iter().copied())
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn analysis_flag_is_required() {
        assert!(parse_cli_args(&args(&[])).is_err());
    }

    #[test]
    fn edits_flag_repeats_in_order() {
        let cli =
            parse_cli_args(&args(&["--analysis", "a.json", "--edits", "e1.json", "--edits", "e2.json"]))
                .unwrap();
        assert_eq!(cli.analysis_path, PathBuf::from("a.json"));
        assert_eq!(
            cli.edit_paths,
            vec![PathBuf::from("e1.json"), PathBuf::from("e2.json")]
        );
        assert!(!cli.show_doc);
    }

    #[test]
    fn unknown_flags_are_rejected() {
        assert!(parse_cli_args(&args(&["--analysis", "a.json", "--bogus"])).is_err());
    }
}
