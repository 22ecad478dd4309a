//! `cogmesh score`: score a text directly.

use anyhow::{bail, Result};
use clap::Args;

use super::reputation_registry;
use crate::cli::output::{colorize_verdict, list_table, output, CommandOutput};
use crate::domain::models::{get_threshold, Citation, Config, ValidationScore};
use crate::services::{get_validation_feedback, is_validation_passing, ScoringEngine};

#[derive(Args, Debug)]
pub struct ScoreArgs {
    /// Text to score
    #[arg(short, long)]
    pub text: String,

    /// Query the text answers
    #[arg(short, long)]
    pub query: String,

    /// Hint the text should address (repeatable)
    #[arg(long = "hint")]
    pub hints: Vec<String>,

    /// Source kind of one supporting citation (repeatable)
    #[arg(long = "source")]
    pub sources: Vec<String>,

    /// Pass threshold (defaults to the strategy's configured threshold)
    #[arg(long)]
    pub threshold: Option<f64>,

    /// Strategy whose threshold applies
    #[arg(short, long)]
    pub strategy: Option<String>,
}

#[derive(Debug, serde::Serialize)]
pub struct ScoreOutput {
    pub score: ValidationScore,
    pub threshold: f64,
    pub passed: bool,
    pub feedback: String,
}

impl CommandOutput for ScoreOutput {
    fn to_human(&self) -> String {
        let s = &self.score.subscores;
        let mut table = list_table(&["subscore", "value"]);
        table.add_row(vec!["citation".to_string(), format!("{:.3}", s.citation)]);
        table.add_row(vec!["context".to_string(), format!("{:.3}", s.context)]);
        table.add_row(vec!["source".to_string(), format!("{:.3}", s.source)]);
        table.add_row(vec!["relevance".to_string(), format!("{:.3}", s.relevance)]);

        format!(
            "Score {:.3} (threshold {:.3}): {}\n\n{table}\n\n{}",
            self.score.final_score,
            self.threshold,
            colorize_verdict(self.passed),
            self.feedback
        )
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub fn score_text(args: &ScoreArgs, config: &Config) -> Result<ScoreOutput> {
    let engine = ScoringEngine::new(reputation_registry(config)?);

    let threshold = match args.threshold {
        Some(t) if !(0.0..=1.0).contains(&t) => bail!("Threshold {t} must be within [0, 1]"),
        Some(t) => t,
        None => get_threshold(
            &config.scoring.thresholds,
            args.strategy.as_deref().unwrap_or_default(),
        ),
    };

    let citations: Vec<Citation> = args
        .sources
        .iter()
        .enumerate()
        .map(|(i, kind)| Citation::new(format!("arg:{}", i + 1), 1.0, "").with_source(kind.as_str()))
        .collect();
    let hints = (!args.hints.is_empty()).then_some(args.hints.as_slice());

    let score = engine.score_validation(&args.text, &args.query, &citations, hints);
    Ok(ScoreOutput {
        passed: is_validation_passing(&score, threshold),
        feedback: get_validation_feedback(&score),
        threshold,
        score,
    })
}

pub fn execute(args: &ScoreArgs, config: &Config, json_mode: bool) -> Result<()> {
    output(&score_text(args, config)?, json_mode);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(text: &str, query: &str) -> ScoreArgs {
        ScoreArgs {
            text: text.to_string(),
            query: query.to_string(),
            hints: vec![],
            sources: vec![],
            threshold: None,
            strategy: None,
        }
    }

    #[test]
    fn test_uncited_text_uses_neutral_subscores() {
        let out = score_text(&args("tokio runtime", "tokio runtime"), &Config::default()).unwrap();
        assert!((out.score.subscores.citation - 0.0).abs() < 1e-9);
        assert!((out.score.subscores.context - 0.5).abs() < 1e-9);
        assert!((out.score.subscores.source - 0.3).abs() < 1e-9);
        assert!((out.threshold - 0.55).abs() < 1e-9);
    }

    #[test]
    fn test_sources_raise_source_subscore() {
        let mut a = args("tokio runtime", "tokio runtime");
        a.sources = vec!["kb".to_string(), "kb".to_string()];
        let out = score_text(&a, &Config::default()).unwrap();
        assert!((out.score.subscores.source - 0.8).abs() < 1e-9);
        assert!(out.score.subscores.citation > 0.3);
    }

    #[test]
    fn test_strategy_threshold_and_range_check() {
        let mut a = args("x", "y");
        a.strategy = Some("critic".to_string());
        let out = score_text(&a, &Config::default()).unwrap();
        assert!((out.threshold - 0.6).abs() < 1e-9);

        a.threshold = Some(1.5);
        assert!(score_text(&a, &Config::default()).is_err());
    }
}
