use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::json;

use exprbridge::completion::{CompletionEngine, FunctionRegistry};
use exprbridge::config::{self, Settings};
use exprbridge::diagnostics::lint_document;
use exprbridge::format::{FormatAction, FormatOutcome, changed_lines};
use exprbridge::hover::hover;
use exprbridge::syntax::{Bias, SyntaxTree, parse_document};
use exprbridge::{AnalyzerSession, BridgeError, BridgeResult};

/// Editor tooling for expression documents, backed by the analyzer library
#[derive(Parser)]
#[command(name = "exprbridge")]
#[command(version)]
#[command(about = "Editor tooling for expression documents, backed by the analyzer library")]
struct Cli {
    /// Configuration file layered over the user config
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Analyzer shared library (overrides `engine.library`)
    #[arg(long, global = true)]
    library: Option<PathBuf>,

    /// Log level filter (error, warn, info, debug, trace)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the analyzer's tokens and tokenize errors
    Tokens { input: PathBuf },
    /// Print the flattened syntax tree
    Tree { input: PathBuf },
    /// Print lint diagnostics
    Lint { input: PathBuf },
    /// Print the formatted document
    Format {
        input: PathBuf,

        /// Exit non-zero instead of printing when formatting would change the input
        #[arg(long)]
        check: bool,
    },
    /// Print hover documentation at a byte offset
    Hover { input: PathBuf, offset: usize },
    /// Print completions at a byte offset
    Complete {
        input: PathBuf,
        offset: usize,

        /// Behave as an explicitly invoked completion
        #[arg(long)]
        explicit: bool,
    },
    /// List the function catalog
    Functions,
}

struct Context {
    settings: Settings,
    session: AnalyzerSession,
    registry: FunctionRegistry,
}

fn read_input(path: &Path) -> BridgeResult<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text)?;
        return Ok(text);
    }
    Ok(std::fs::read_to_string(path)?)
}

fn print_json<T: Serialize>(value: &T) -> BridgeResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn tree_json(tree: &SyntaxTree, text: &str) -> serde_json::Value {
    let nodes: Vec<_> = tree
        .walk()
        .into_iter()
        .map(|(depth, node)| {
            json!({
                "depth": depth,
                "kind": node.kind.name(),
                "start": node.start,
                "end": node.end,
                "text": text.get(node.start..node.end).unwrap_or_default(),
            })
        })
        .collect();
    json!({ "buffer": tree.buffer().as_slice(), "nodes": nodes })
}

fn run(command: Commands, context: Context) -> BridgeResult<ExitCode> {
    let Context {
        settings,
        session,
        registry,
    } = context;

    match command {
        Commands::Tokens { input } => {
            let text = read_input(&input)?;
            let result = session.analyzer()?.tokenize(&text)?;
            print_json(&result)?;
        }
        Commands::Tree { input } => {
            let text = read_input(&input)?;
            session.analyzer()?;
            let tree = parse_document(&session, &text);
            print_json(&tree_json(&tree, &text))?;
        }
        Commands::Lint { input } => {
            let text = read_input(&input)?;
            session.analyzer()?;
            let diagnostics = lint_document(&session, &text);
            print_json(&diagnostics)?;
            if !diagnostics.is_empty() {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Format { input, check } => {
            let text = read_input(&input)?;
            session.analyzer()?;
            let action = FormatAction::new(settings.format.clone());
            let formatted = action.formatted(&session, &text);
            let outcome = match &formatted {
                Some(new) => FormatOutcome::Changed {
                    changed_lines: changed_lines(&text, new),
                },
                None => FormatOutcome::Unchanged,
            };
            if check {
                print_json(&outcome)?;
                if outcome != FormatOutcome::Unchanged {
                    return Ok(ExitCode::FAILURE);
                }
            } else {
                print!("{}", formatted.as_deref().unwrap_or(&text));
            }
        }
        Commands::Hover { input, offset } => {
            let text = read_input(&input)?;
            session.analyzer()?;
            let tree = parse_document(&session, &text);
            print_json(&hover(&tree, &text, &registry, offset, Bias::After))?;
        }
        Commands::Complete {
            input,
            offset,
            explicit,
        } => {
            let text = read_input(&input)?;
            let engine = CompletionEngine::new(Arc::new(registry))
                .with_keywords(settings.include_keywords());
            print_json(&engine.complete(&text, offset, explicit))?;
        }
        Commands::Functions => {
            let functions: Vec<_> = registry.iter().collect();
            print_json(&functions)?;
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config::SettingsLoadOutcome {
        mut settings,
        mut events,
    } = config::load_settings(cli.config.as_deref());
    if cli.library.is_some() {
        settings.engine.library = cli.library;
    }

    // RUST_LOG beats the config file; --log-level beats both.
    let default_level = settings.log_level.as_deref().unwrap_or("warn");
    let mut logger =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level));
    if let Some(level) = &cli.log_level {
        logger.parse_filters(level);
    }
    logger.format_timestamp(None).init();

    let registry = config::function_registry(&settings, &mut events);
    for event in &events {
        event.log();
    }

    let context = Context {
        session: AnalyzerSession::from_library(settings.engine.library.clone()),
        registry,
        settings,
    };

    match run(cli.command, context) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {}", err);
            if matches!(err, BridgeError::Unavailable { .. }) {
                eprintln!("Set engine.library in the config file or pass --library.");
            }
            ExitCode::FAILURE
        }
    }
}
