//! Session configuration
//!
//! Layered: built-in preset, then an optional TOML file, then command-line
//! flags. Later layers only override the keys they set.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use serde::Deserialize;
use tracing::info;
use trust_logic::{
    Agent, AgentKind, CurveKind, Dialect, Game, Interactive, PayoffModel, DEFAULT_CURVATURE,
};

use crate::display::Format;
use crate::error::ConfigError;

#[derive(Parser, Debug)]
#[command(name = "trust-arena", about = "Iterated trust-or-betray game against automated agents")]
pub struct Args {
    /// Built-in game to start from
    #[arg(long, value_enum)]
    pub preset: Option<Preset>,

    /// TOML file layered over the preset
    #[arg(long, env = "TRUST_ARENA_CONFIG")]
    pub config: Option<PathBuf>,

    /// Payoff model
    #[arg(long, value_enum)]
    pub model: Option<Model>,

    /// Punishment curve for the normalized model
    #[arg(long, value_enum)]
    pub curve: Option<CurveArg>,

    /// Curvature `a` of the quadratic curve
    #[arg(long, allow_negative_numbers = true)]
    pub curvature: Option<f64>,

    /// Comma-separated line-up, e.g. `interactive,random,fool,traitor`
    #[arg(long, value_delimiter = ',')]
    pub agents: Option<Vec<AgentKind>>,

    /// Letters the operator answers with
    #[arg(long, value_enum)]
    pub dialect: Option<DialectArg>,

    /// Seed for the random agents
    #[arg(long, env = "TRUST_ARENA_SEED")]
    pub seed: Option<u64>,

    /// Stop after this many rounds (default: play until interrupted)
    #[arg(long)]
    pub rounds: Option<u64>,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    pub format: Format,
}

/// The three shipped games
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    /// Two players, fixed table, running totals
    Classic,
    /// Four players, normalized payoff, linear curve
    Linear,
    /// Four players, normalized payoff, quadratic curve
    Quadratic,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Model {
    Pairwise,
    Normalized,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum CurveArg {
    Linear,
    Quadratic,
}

impl From<CurveArg> for CurveKind {
    fn from(arg: CurveArg) -> Self {
        match arg {
            CurveArg::Linear => CurveKind::Linear,
            CurveArg::Quadratic => CurveKind::Quadratic,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum DialectArg {
    Classic,
    Trust,
}

impl From<DialectArg> for Dialect {
    fn from(arg: DialectArg) -> Self {
        match arg {
            DialectArg::Classic => Dialect::Classic,
            DialectArg::Trust => Dialect::Trust,
        }
    }
}

/// Keys a config file may set. Unset keys keep the preset's value.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SettingsFile {
    pub preset: Option<Preset>,
    pub model: Option<Model>,
    pub curve: Option<CurveKind>,
    pub curvature: Option<f64>,
    pub agents: Option<Vec<AgentKind>>,
    pub dialect: Option<Dialect>,
    pub seed: Option<u64>,
}

impl SettingsFile {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Fully resolved session configuration
#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub model: Model,
    pub curve: CurveKind,
    pub curvature: f64,
    pub agents: Vec<AgentKind>,
    pub dialect: Dialect,
    pub seed: Option<u64>,
}

impl Settings {
    pub fn preset(preset: Preset) -> Self {
        let four = vec![
            AgentKind::Interactive,
            AgentKind::UniformRandom,
            AgentKind::AlwaysTrust,
            AgentKind::AlwaysBetray,
        ];
        match preset {
            // The computer plays first ("mine"), the operator second ("yours")
            Preset::Classic => Self {
                model: Model::Pairwise,
                curve: CurveKind::Linear,
                curvature: DEFAULT_CURVATURE,
                agents: vec![AgentKind::UniformRandom, AgentKind::Interactive],
                dialect: Dialect::Classic,
                seed: None,
            },
            Preset::Linear => Self {
                model: Model::Normalized,
                curve: CurveKind::Linear,
                curvature: DEFAULT_CURVATURE,
                agents: four,
                dialect: Dialect::Trust,
                seed: None,
            },
            Preset::Quadratic => Self {
                model: Model::Normalized,
                curve: CurveKind::Quadratic,
                curvature: DEFAULT_CURVATURE,
                agents: four,
                dialect: Dialect::Trust,
                seed: None,
            },
        }
    }

    /// Resolve preset, config file and flags into one configuration
    pub fn resolve(args: &Args) -> Result<Self, ConfigError> {
        let file = args.config.as_deref().map(SettingsFile::load).transpose()?;
        let preset = args
            .preset
            .or_else(|| file.as_ref().and_then(|f| f.preset))
            .unwrap_or(Preset::Classic);

        let mut settings = Self::preset(preset);
        if let Some(file) = file {
            settings.apply_file(file);
        }
        settings.apply_args(args);

        if settings.agents.is_empty() {
            return Err(ConfigError::NoAgents);
        }
        // Interactive agents share stdin
        let operators = settings
            .agents
            .iter()
            .filter(|kind| **kind == AgentKind::Interactive)
            .count();
        if operators > 1 {
            return Err(ConfigError::MultipleOperators(operators));
        }
        info!(?preset, settings = ?settings, "configuration resolved");
        Ok(settings)
    }

    fn apply_file(&mut self, file: SettingsFile) {
        if let Some(model) = file.model {
            self.model = model;
        }
        if let Some(curve) = file.curve {
            self.curve = curve;
        }
        if let Some(curvature) = file.curvature {
            self.curvature = curvature;
        }
        if let Some(agents) = file.agents {
            self.agents = agents;
        }
        if let Some(dialect) = file.dialect {
            self.dialect = dialect;
        }
        if file.seed.is_some() {
            self.seed = file.seed;
        }
    }

    fn apply_args(&mut self, args: &Args) {
        if let Some(model) = args.model {
            self.model = model;
        }
        if let Some(curve) = args.curve {
            self.curve = curve.into();
        }
        if let Some(curvature) = args.curvature {
            self.curvature = curvature;
        }
        if let Some(agents) = &args.agents {
            self.agents = agents.clone();
        }
        if let Some(dialect) = args.dialect {
            self.dialect = dialect.into();
        }
        if args.seed.is_some() {
            self.seed = args.seed;
        }
    }

    pub fn payoff_model(&self) -> PayoffModel {
        match self.model {
            Model::Pairwise => PayoffModel::Pairwise,
            Model::Normalized => PayoffModel::Normalized {
                curve: self.curve,
                curvature: self.curvature,
            },
        }
    }

    /// Build the agents and bind them to the payoff model.
    ///
    /// With JSON output the operator prompt goes to stderr so stdout stays
    /// one record per line.
    pub fn build_game(&self, format: Format) -> Result<Game, ConfigError> {
        let agents: Vec<Box<dyn Agent>> = self
            .agents
            .iter()
            .enumerate()
            .map(|(index, &kind)| match (kind, format) {
                (AgentKind::Interactive, Format::Json) => Box::new(Interactive::new(
                    io::stdin().lock(),
                    io::stderr(),
                    self.dialect,
                )) as Box<dyn Agent>,
                _ => kind.build(index as u32, self.dialect, self.seed),
            })
            .collect();

        Ok(Game::new(agents, self.payoff_model())?)
    }
}
