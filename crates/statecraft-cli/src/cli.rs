//! Command-line interface for the statecraft utility
//!
//! Reads transition tables in the text format, converts and minimizes the
//! automata they describe, and prints them as tables, diagrams or reports.

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde_json::json;
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use tracing::{info, warn};

use crate::colorizer::{paint_detail, paint_verdict};
use crate::report::{refinement_trace, subset_trace, transition_matrix, AnalysisReport};
use statecraft::automaton::{
    minimize, minimize_automaton, subset_construction, Automaton, Completion, Dfa, Nfa, Run,
};
use statecraft::core::logging::init_logging;
use statecraft::diagram::{
    DiagramConfig, Direction, DotRenderer, JsonRenderer, MermaidRenderer, ToDiagram,
};
use statecraft::table::TransitionTable;
use statecraft::{is_epsilon, parse_table, symbols_of, Symbol, EPSILON_LABEL};

/// Statecraft - Build, determinize and minimize finite automata
#[derive(Parser)]
#[command(name = "statecraft")]
#[command(about = "Determinize, minimize and diagram finite automata")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Set log level (trace|debug|info|warn|error)
    #[arg(long, value_enum, default_value_t = LogLevel::Warn)]
    pub log_level: LogLevel,

    /// Set log format (compact|pretty|json)
    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

/// Log level options
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Log format options
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Compact => "compact",
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
        }
    }
}

/// Where the table comes from and where the result goes
#[derive(Args, Debug, Clone, Default)]
pub struct IoArgs {
    /// Input file containing a transition table (use - for stdin)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Output file (use - for stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// How a resulting automaton is printed
#[derive(Args, Debug, Clone)]
pub struct RenderArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Diagram direction (LR, TD, RL, BT)
    #[arg(long, default_value = "LR")]
    pub direction: Direction,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert an NFA to a DFA by subset construction
    Determinize {
        #[command(flatten)]
        io: IoArgs,

        #[command(flatten)]
        render: RenderArgs,

        /// Print the construction steps to stderr
        #[arg(long)]
        trace: bool,
    },

    /// Minimize a DFA by partition refinement
    Minimize {
        #[command(flatten)]
        io: IoArgs,

        #[command(flatten)]
        render: RenderArgs,

        /// Allow missing transitions (they lead to an implicit dead state)
        #[arg(long)]
        partial: bool,

        /// Read the table as an NFA and determinize it first
        #[arg(long, conflicts_with = "partial")]
        nfa: bool,

        /// Print the refinement rounds to stderr
        #[arg(long)]
        trace: bool,
    },

    /// Render the input automaton as-is
    Diagram {
        #[command(flatten)]
        io: IoArgs,

        /// Diagram format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Dot)]
        format: OutputFormat,

        /// Diagram direction (LR, TD, RL, BT)
        #[arg(long, default_value = "LR")]
        direction: Direction,

        /// Read the table as a DFA
        #[arg(long)]
        dfa: bool,

        /// With --dfa, allow missing transitions
        #[arg(long, requires = "dfa")]
        partial: bool,
    },

    /// Simulate words on the automaton
    Accepts {
        /// Input file containing a transition table (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Words to run; single-character symbols, or comma separated (ε for the empty word)
        words: Vec<String>,

        /// Read the table as a DFA
        #[arg(long)]
        dfa: bool,

        /// With --dfa, allow missing transitions
        #[arg(long, requires = "dfa")]
        partial: bool,

        /// Also list every accepted word up to this length
        #[arg(long, value_name = "LEN")]
        list: Option<usize>,

        /// When to use colors in output
        #[arg(long, value_enum, default_value_t = ColorChoice::Auto)]
        color: ColorChoice,
    },

    /// Report emptiness, finiteness, cardinality and a regex for the language
    Analyze {
        /// Input file containing a transition table (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Read the table as a DFA
        #[arg(long)]
        dfa: bool,

        /// With --dfa, allow missing transitions
        #[arg(long, requires = "dfa")]
        partial: bool,

        /// Show in JSON format
        #[arg(long)]
        json: bool,
    },
}

/// Supported output formats
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    /// The transition table text format (re-readable)
    Table,
    /// Aligned state-by-symbol matrix (DFAs only)
    Matrix,
    /// Graphviz DOT
    Dot,
    /// Mermaid state diagram
    Mermaid,
    /// Diagram description as JSON
    Json,
}

/// When to colorize output
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq, Default)]
pub enum ColorChoice {
    /// Use colors if output is a terminal and NO_COLOR is not set
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

fn completion(partial: bool) -> Completion {
    if partial {
        Completion::Partial
    } else {
        Completion::Complete
    }
}

/// Split a command-line word into symbols
///
/// An epsilon spelling or the empty string is the empty word. Words with
/// commas are split on them; anything else is one symbol per character.
pub fn parse_word(text: &str) -> Vec<Symbol> {
    if text.is_empty() || is_epsilon(text) {
        Vec::new()
    } else if text.contains(',') {
        text.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(Symbol::new)
            .collect()
    } else {
        symbols_of(text)
    }
}

/// Inverse of [`parse_word`] for display
pub fn display_word(word: &[Symbol]) -> String {
    if word.is_empty() {
        return EPSILON_LABEL.to_string();
    }
    let separator = if word.iter().all(|s| s.as_str().chars().count() == 1) {
        ""
    } else {
        ","
    };
    word.iter()
        .map(Symbol::as_str)
        .collect::<Vec<_>>()
        .join(separator)
}

/// Main CLI application
pub struct StatecraftApp {
    config: DiagramConfig,
}

impl StatecraftApp {
    /// Create a new application instance with default settings
    pub fn new() -> Self {
        Self::with_config(DiagramConfig::default())
    }

    /// Create a new application instance with a diagram config
    pub fn with_config(config: DiagramConfig) -> Self {
        Self { config }
    }

    /// Run the application with the given CLI arguments
    pub fn run(&mut self, cli: Cli) -> Result<()> {
        // Environment variables take precedence over CLI flags
        let log_level_str = std::env::var("STATECRAFT_LOG_LEVEL")
            .ok()
            .or_else(|| std::env::var("RUST_LOG").ok())
            .or_else(|| Some(cli.log_level.as_str().to_string()));

        let log_format_str = std::env::var("STATECRAFT_LOG_FORMAT")
            .ok()
            .or_else(|| Some(cli.log_format.as_str().to_string()));

        if let Err(e) = init_logging(log_level_str.as_deref(), log_format_str.as_deref()) {
            eprintln!("Warning: Failed to initialize logging: {}", e);
        }

        if cli.verbose {
            eprintln!("Statecraft v{}", env!("CARGO_PKG_VERSION"));
        }

        self.execute(cli.command, cli.verbose)
    }

    fn execute(&mut self, command: Commands, verbose: bool) -> Result<()> {
        match command {
            Commands::Determinize { io, render, trace } => {
                self.determinize_command(io, render, trace, verbose)
            }
            Commands::Minimize {
                io,
                render,
                partial,
                nfa,
                trace,
            } => self.minimize_command(io, render, partial, nfa, trace, verbose),
            Commands::Diagram {
                io,
                format,
                direction,
                dfa,
                partial,
            } => self.diagram_command(io, RenderArgs { format, direction }, dfa, partial),
            Commands::Accepts {
                input,
                words,
                dfa,
                partial,
                list,
                color,
            } => self.accepts_command(input, &words, dfa, partial, list, color),
            Commands::Analyze {
                input,
                dfa,
                partial,
                json,
            } => self.analyze_command(input, dfa, partial, json),
        }
    }

    /// Load the table as an NFA, or as a DFA when `dfa` is set
    fn load_automaton(
        &self,
        input: Option<PathBuf>,
        dfa: bool,
        partial: bool,
    ) -> Result<Automaton> {
        let content = self.read_input(input)?;
        let table = parse_table(&content).context("Failed to parse transition table")?;
        let automaton = if dfa {
            Automaton::Dfa(Dfa::from_table(&table, completion(partial))?)
        } else {
            Automaton::Nfa(Nfa::from_table(&table)?)
        };
        info!(
            kind = %automaton.kind(),
            states = automaton.state_count(),
            "Loaded automaton"
        );
        Ok(automaton)
    }

    /// Handle the determinize command
    fn determinize_command(
        &mut self,
        io: IoArgs,
        render: RenderArgs,
        trace: bool,
        verbose: bool,
    ) -> Result<()> {
        let nfa = match self.load_automaton(io.input, false, false)? {
            Automaton::Nfa(nfa) => nfa,
            Automaton::Dfa(_) => return Err(anyhow!("expected an NFA")),
        };
        let construction = subset_construction(&nfa);

        if verbose {
            eprintln!(
                "Determinized {} NFA states into {} DFA states",
                nfa.states().len(),
                construction.dfa.states().len()
            );
        }
        if trace {
            eprint!("{}", subset_trace(&construction));
        }

        let automaton = Automaton::Dfa(construction.dfa);
        let output = self.render_automaton(&automaton, &render)?;
        self.write_output(io.output, &output)
    }

    /// Handle the minimize command
    fn minimize_command(
        &mut self,
        io: IoArgs,
        render: RenderArgs,
        partial: bool,
        nfa: bool,
        trace: bool,
        verbose: bool,
    ) -> Result<()> {
        let automaton = self.load_automaton(io.input, !nfa, partial)?;
        let minimization = match &automaton {
            // Determinize first so epsilon moves and choices are allowed
            Automaton::Nfa(nfa) => minimize(&subset_construction(nfa).dfa),
            Automaton::Dfa(_) => minimize_automaton(&automaton)?,
        };

        if verbose {
            eprintln!(
                "Minimized {} states to {} in {} split(s)",
                automaton.state_count(),
                minimization.dfa.states().len(),
                minimization.splits()
            );
        }
        if trace {
            eprint!("{}", refinement_trace(&minimization));
        }

        let output = if render.format == OutputFormat::Json && trace {
            let diagram = minimization.dfa.to_diagram();
            serde_json::to_string_pretty(&json!({
                "automaton": diagram,
                "symbols": minimization.symbols,
                "trace": minimization.trace,
                "splits": minimization.splits(),
            }))?
        } else {
            self.render_automaton(&Automaton::Dfa(minimization.dfa), &render)?
        };
        self.write_output(io.output, &output)
    }

    /// Handle the diagram command
    fn diagram_command(
        &mut self,
        io: IoArgs,
        render: RenderArgs,
        dfa: bool,
        partial: bool,
    ) -> Result<()> {
        let automaton = self.load_automaton(io.input, dfa, partial)?;
        let output = self.render_automaton(&automaton, &render)?;
        self.write_output(io.output, &output)
    }

    /// Handle the accepts command
    fn accepts_command(
        &self,
        input: Option<PathBuf>,
        words: &[String],
        dfa: bool,
        partial: bool,
        list: Option<usize>,
        color: ColorChoice,
    ) -> Result<()> {
        let automaton = self.load_automaton(input, dfa, partial)?;
        let colorize = self.should_colorize(&None, color);

        let mut out = String::new();
        for text in words {
            let word = parse_word(text);
            if let Some(symbol) = word.iter().find(|s| !automaton.alphabet().contains(*s)) {
                warn!(word = %text, symbol = %symbol, "Symbol is outside the alphabet");
            }
            out.push_str(&Self::verdict_line(&automaton, &word, colorize));
            out.push('\n');
        }

        if let Some(max_len) = list {
            let accepted = automaton.to_dfa().words_up_to(max_len);
            out.push_str(&format!(
                "{} accepted word(s) of length <= {}\n",
                accepted.len(),
                max_len
            ));
            for word in &accepted {
                out.push_str(&format!("  {}\n", display_word(word)));
            }
        }

        self.write_output(None, &out)
    }

    fn verdict_line(automaton: &Automaton, word: &[Symbol], colorize: bool) -> String {
        let shown = display_word(word);
        match automaton {
            Automaton::Dfa(dfa) => {
                let run = dfa.run(word);
                let detail = match &run {
                    Run::Accepted(state) | Run::Rejected(state) => format!("(in {})", state),
                    Run::Dead {
                        position,
                        state,
                        symbol,
                    } => format!(
                        "(no move from {} on '{}' at position {})",
                        state, symbol, position
                    ),
                };
                format!(
                    "{}: {} {}",
                    shown,
                    paint_verdict(run.is_accepted(), colorize),
                    paint_detail(&detail, colorize)
                )
            }
            Automaton::Nfa(nfa) => {
                format!("{}: {}", shown, paint_verdict(nfa.accepts(word), colorize))
            }
        }
    }

    /// Handle the analyze command
    fn analyze_command(
        &self,
        input: Option<PathBuf>,
        dfa: bool,
        partial: bool,
        json: bool,
    ) -> Result<()> {
        let automaton = self.load_automaton(input, dfa, partial)?;
        let report = AnalysisReport::analyze(&automaton);
        let output = if json {
            serde_json::to_string_pretty(&report)?
        } else {
            report.to_string()
        };
        self.write_output(None, &output)
    }

    /// Print an automaton in the requested format
    pub fn render_automaton(&self, automaton: &Automaton, render: &RenderArgs) -> Result<String> {
        let config = self.config.with_direction(render.direction);
        match render.format {
            OutputFormat::Table => Ok(match automaton {
                Automaton::Nfa(nfa) => TransitionTable::from(nfa).to_string(),
                Automaton::Dfa(dfa) => TransitionTable::from(dfa).to_string(),
            }),
            OutputFormat::Matrix => match automaton {
                Automaton::Dfa(dfa) => Ok(transition_matrix(dfa)),
                Automaton::Nfa(_) => Err(anyhow!(
                    "matrix format needs a DFA; use --dfa or the determinize command"
                )),
            },
            OutputFormat::Dot => DotRenderer::with_config(config).render(&automaton.to_diagram()),
            OutputFormat::Mermaid => {
                MermaidRenderer::with_config(config).render(&automaton.to_diagram())
            }
            OutputFormat::Json => JsonRenderer::pretty().render(&automaton.to_diagram()),
        }
    }

    /// Determine if we should colorize the output based on color choice and output destination
    fn should_colorize(&self, output: &Option<PathBuf>, color: ColorChoice) -> bool {
        match color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => {
                if std::env::var("NO_COLOR").is_ok() {
                    return false;
                }
                match output {
                    None => crossterm::tty::IsTty::is_tty(&std::io::stdout()),
                    Some(ref p) if p.to_str() == Some("-") => {
                        crossterm::tty::IsTty::is_tty(&std::io::stdout())
                    }
                    Some(_) => false,
                }
            }
        }
    }

    /// Read input from file or stdin
    pub fn read_input(&self, input: Option<PathBuf>) -> Result<String> {
        match input {
            Some(path) if path.to_string_lossy() != "-" => fs::read_to_string(&path)
                .map_err(|e| anyhow!("Failed to read input file '{}': {}", path.display(), e)),
            _ => {
                let mut content = String::new();
                io::stdin().read_to_string(&mut content)?;
                Ok(content)
            }
        }
    }

    /// Write output to file or stdout
    pub fn write_output(&self, output: Option<PathBuf>, content: &str) -> Result<()> {
        let stdout_content = if content.is_empty() || content.ends_with('\n') {
            content.to_string()
        } else {
            format!("{}\n", content)
        };

        match output {
            Some(path) if path.to_string_lossy() != "-" => {
                fs::write(&path, content).map_err(|e| {
                    anyhow!("Failed to write output file '{}': {}", path.display(), e)
                })?;
            }
            _ => {
                print!("{}", stdout_content);
                io::stdout().flush()?;
            }
        }
        Ok(())
    }
}

impl Default for StatecraftApp {
    fn default() -> Self {
        Self::new()
    }
}
