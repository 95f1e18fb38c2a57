//! Agent strategies and their construction

use std::fmt;
use std::io::{self, BufRead, StdinLock, Stdout, Write};
use std::str::FromStr;

use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::decision::{parse_decision, Decision, Dialect};
use crate::random::agent_rng;

/// Errors an agent can hit while deciding.
///
/// Invalid operator input is never one of them: the interactive agent
/// re-prompts until it gets a usable answer.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("operator input closed")]
    InputClosed,

    #[error("console I/O failed: {0}")]
    Io(#[from] io::Error),
}

/// Anything that can produce one decision per round
pub trait Agent {
    fn decide(&mut self) -> Result<Decision, AgentError>;

    fn name(&self) -> &str;
}

/// Strategy variant, as named in configuration
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AgentKind {
    /// Asks the operator every round.
    #[serde(alias = "human")]
    Interactive,
    /// Trust or betray with equal probability.
    #[serde(alias = "random")]
    UniformRandom,
    /// Always trusts.
    #[serde(alias = "fool")]
    AlwaysTrust,
    /// Always betrays.
    #[serde(alias = "traitor")]
    AlwaysBetray,
}

impl AgentKind {
    pub const ALL: [AgentKind; 4] = [
        AgentKind::Interactive,
        AgentKind::UniformRandom,
        AgentKind::AlwaysTrust,
        AgentKind::AlwaysBetray,
    ];

    /// Display name used in round output
    pub fn name(self) -> &'static str {
        match self {
            AgentKind::Interactive => "Human",
            AgentKind::UniformRandom => "Random",
            AgentKind::AlwaysTrust => "Fool",
            AgentKind::AlwaysBetray => "Traitor",
        }
    }

    /// Configuration key, the inverse of `from_str`
    pub fn key(self) -> &'static str {
        match self {
            AgentKind::Interactive => "interactive",
            AgentKind::UniformRandom => "uniform-random",
            AgentKind::AlwaysTrust => "always-trust",
            AgentKind::AlwaysBetray => "always-betray",
        }
    }

    /// Build the agent at position `index` of the line-up.
    ///
    /// Interactive agents are bound to the process's stdin and stdout.
    pub fn build(self, index: u32, dialect: Dialect, seed: Option<u64>) -> Box<dyn Agent> {
        match self {
            AgentKind::Interactive => Box::new(Interactive::stdio(dialect)),
            AgentKind::UniformRandom => Box::new(UniformRandom::new(agent_rng(seed, index))),
            AgentKind::AlwaysTrust => Box::new(AlwaysTrust),
            AgentKind::AlwaysBetray => Box::new(AlwaysBetray),
        }
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Error)]
#[error(
    "unknown agent kind `{0}` (expected interactive, uniform-random, always-trust or always-betray)"
)]
pub struct UnknownAgentKind(pub String);

impl FromStr for AgentKind {
    type Err = UnknownAgentKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "interactive" | "human" => Ok(AgentKind::Interactive),
            "uniform-random" | "random" => Ok(AgentKind::UniformRandom),
            "always-trust" | "fool" => Ok(AgentKind::AlwaysTrust),
            "always-betray" | "traitor" => Ok(AgentKind::AlwaysBetray),
            _ => Err(UnknownAgentKind(s.to_string())),
        }
    }
}

/// Operator-driven agent: prompts on `output`, reads answers from `input`
pub struct Interactive<R, W> {
    input: R,
    output: W,
    dialect: Dialect,
}

impl<R: BufRead, W: Write> Interactive<R, W> {
    pub fn new(input: R, output: W, dialect: Dialect) -> Self {
        Self { input, output, dialect }
    }

    pub fn into_parts(self) -> (R, W) {
        (self.input, self.output)
    }
}

impl Interactive<StdinLock<'static>, Stdout> {
    pub fn stdio(dialect: Dialect) -> Self {
        Self::new(io::stdin().lock(), io::stdout(), dialect)
    }
}

impl<R: BufRead, W: Write> Agent for Interactive<R, W> {
    fn decide(&mut self) -> Result<Decision, AgentError> {
        let mut buf = Vec::new();
        loop {
            write!(self.output, "{} ", self.dialect.prompt())?;
            self.output.flush()?;

            buf.clear();
            if self.input.read_until(b'\n', &mut buf)? == 0 {
                return Err(AgentError::InputClosed);
            }

            // Bytes that are not UTF-8 become U+FFFD and are rejected below
            let line = String::from_utf8_lossy(&buf);
            // Only the first character counts, as with a single-char read
            let Some(c) = line.trim_start().chars().next() else {
                continue;
            };
            match parse_decision(c, self.dialect) {
                Some(decision) => return Ok(decision),
                None => {
                    debug!(input = %c, "rejected operator input");
                    writeln!(
                        self.output,
                        "'{}' is not a choice, answer '{}' or 'b'.",
                        c,
                        self.dialect.trust_key()
                    )?;
                }
            }
        }
    }

    fn name(&self) -> &str {
        AgentKind::Interactive.name()
    }
}

/// Coin-flip agent
pub struct UniformRandom {
    rng: StdRng,
}

impl UniformRandom {
    pub fn new(rng: StdRng) -> Self {
        Self { rng }
    }
}

impl Agent for UniformRandom {
    fn decide(&mut self) -> Result<Decision, AgentError> {
        Ok(if self.rng.random_bool(0.5) {
            Decision::Trust
        } else {
            Decision::Betray
        })
    }

    fn name(&self) -> &str {
        AgentKind::UniformRandom.name()
    }
}

/// "Fool": never betrays
pub struct AlwaysTrust;

impl Agent for AlwaysTrust {
    fn decide(&mut self) -> Result<Decision, AgentError> {
        Ok(Decision::Trust)
    }

    fn name(&self) -> &str {
        AgentKind::AlwaysTrust.name()
    }
}

/// "Traitor": never trusts
pub struct AlwaysBetray;

impl Agent for AlwaysBetray {
    fn decide(&mut self) -> Result<Decision, AgentError> {
        Ok(Decision::Betray)
    }

    fn name(&self) -> &str {
        AgentKind::AlwaysBetray.name()
    }
}
