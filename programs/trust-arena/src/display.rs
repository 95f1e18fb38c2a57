//! Console rendering of played rounds

use std::io::{self, Write};

use clap::ValueEnum;
use trust_logic::{Dialect, RoundResult, RoundScores};

pub const SEPARATOR: &str = "###################################";

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// Human-readable lines
    Text,
    /// One JSON record per round
    Json,
}

pub fn render<W: Write>(
    out: &mut W,
    result: &RoundResult,
    format: Format,
    dialect: Dialect,
) -> io::Result<()> {
    match format {
        Format::Text => render_text(out, result, dialect)?,
        Format::Json => {
            serde_json::to_writer(&mut *out, result).map_err(io::Error::from)?;
            writeln!(out)?;
        }
    }
    out.flush()
}

fn render_text<W: Write>(out: &mut W, result: &RoundResult, dialect: Dialect) -> io::Result<()> {
    for play in &result.plays {
        writeln!(out, "{} chose: {}", play.agent, play.decision.label(dialect))?;
    }

    let scores: Vec<String> = match &result.scores {
        RoundScores::Pairwise { totals, .. } => {
            vec![totals.mine.to_string(), totals.yours.to_string()]
        }
        RoundScores::Normalized { scores } => scores.iter().map(|s| format!("{:.3}", s)).collect(),
    };
    let line: Vec<String> = result
        .plays
        .iter()
        .zip(&scores)
        .map(|(play, score)| format!("{} {}", play.agent, score))
        .collect();
    writeln!(out, "SCORES: {}", line.join(" "))?;
    writeln!(out, "{}", SEPARATOR)
}
