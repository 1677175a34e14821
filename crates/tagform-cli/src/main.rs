//! tagform CLI - compose and evaluate tag formulas

mod config;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use config::Config;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tagform::{
    admit_token, evaluate_formula, is_number_literal, restore_formula, save_formula,
    structure_error, Editor, Evaluation, FormulaStore, JsonFileStore, Operator, TagCatalog,
    TagResolver, Token,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tagform")]
#[command(author, version, about = "Compose and evaluate formulas over named tags")]
struct Cli {
    /// Config file (default: ./tagform.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a formula given one token per argument
    ///
    /// Operator symbols become operators, numbers become numbers and
    /// anything else is a tag name: `tagform eval "name 1" + 1`
    Eval {
        #[arg(required = true, allow_hyphen_values = true)]
        tokens: Vec<String>,
    },

    /// Check a formula's structure without evaluating it
    Check {
        #[arg(required = true, allow_hyphen_values = true)]
        tokens: Vec<String>,
    },

    /// List tags matching a query (all defaults when empty)
    Suggest {
        #[arg(default_value = "")]
        query: String,
    },

    /// Interactive line-based editing session
    ///
    /// Each line is an operator symbol, `:back`, `:clear`, `:find <text>`,
    /// `:pick <n>`, or text committed as a number or tag. The formula is
    /// restored from and saved to the state file.
    Edit {
        /// State file (default: from config)
        #[arg(short, long)]
        state: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;
    init_logging(cli.verbose, &config.log_level);

    let catalog = config.catalog().context("Failed to build tag catalog")?;
    tracing::debug!(tags = catalog.len(), "tag catalog ready");

    match cli.command {
        Commands::Eval { tokens } => eval(&tokens, &catalog),
        Commands::Check { tokens } => check(&tokens, &catalog),
        Commands::Suggest { query } => suggest(&query, &catalog),
        Commands::Edit { state } => edit(state.unwrap_or(config.state_file), catalog),
    }
}

fn init_logging(verbose: u8, configured: &str) {
    let level = match verbose {
        0 => configured,
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Classify a command-line argument as a token
fn parse_token(arg: &str) -> Token {
    let arg = arg.trim();
    if let Some(op) = Operator::from_symbol(arg) {
        Token::operator(op)
    } else if is_number_literal(arg) {
        Token::number(arg)
    } else {
        Token::tag(arg)
    }
}

/// Admit tokens one at a time, failing on the first rejection
fn build_formula(args: &[String]) -> Result<FormulaStore> {
    let mut store = FormulaStore::new();
    for (position, arg) in args.iter().enumerate() {
        let token = parse_token(arg);
        if let Err(e) = admit_token(store.formula(), &token) {
            bail!("token {} ('{}') rejected: {}", position + 1, token.value, e);
        }
        store.add_element(token);
    }
    Ok(store)
}

fn eval(args: &[String], catalog: &TagCatalog) -> Result<()> {
    let store = build_formula(args)?;
    match evaluate_formula(store.formula(), catalog) {
        Evaluation::Value(value) => {
            println!("{}", format_number(value));
            Ok(())
        }
        Evaluation::Invalid(reason) => bail!("invalid: {}", reason),
    }
}

fn check(args: &[String], catalog: &TagCatalog) -> Result<()> {
    let store = build_formula(args)?;
    match structure_error(store.formula(), catalog) {
        None => {
            println!("valid");
            Ok(())
        }
        Some(reason) => bail!("invalid: {}", reason),
    }
}

fn suggest(query: &str, catalog: &TagCatalog) -> Result<()> {
    let mut stdout = io::stdout().lock();
    for tag in catalog.lookup(query) {
        writeln!(
            stdout,
            "{}\t{}\t{}",
            tag.name,
            tag.category,
            format_number(tag.value)
        )
        .context("Failed to write to stdout")?;
    }
    Ok(())
}

fn edit(state_file: PathBuf, catalog: TagCatalog) -> Result<()> {
    let mut kv = JsonFileStore::new(&state_file);
    let store = restore_formula(&kv)
        .with_context(|| format!("Failed to restore '{}'", state_file.display()))?
        .unwrap_or_default();
    let mut editor = Editor::with_store(store, catalog);
    print_status(&editor);

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("Failed to read from stdin")?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let outcome = if let Some(op) = Operator::from_symbol(line) {
            editor.push_operator(op)
        } else if line == ":back" {
            editor.backspace();
            Ok(())
        } else if line == ":clear" {
            editor.clear();
            Ok(())
        } else if let Some(query) = line.strip_prefix(":find") {
            editor.set_input(query.trim());
            for (i, tag) in editor.suggestions().items().iter().enumerate() {
                println!("  [{}] {} ({})", i, tag.name, format_number(tag.value));
            }
            Ok(())
        } else if let Some(index) = line.strip_prefix(":pick") {
            match index.trim().parse::<usize>() {
                Ok(index) => editor.select_suggestion(index),
                Err(_) => {
                    eprintln!("usage: :pick <n>");
                    Ok(())
                }
            }
        } else {
            editor.set_input(line);
            editor.commit_input()
        };

        if let Err(e) = outcome {
            eprintln!("rejected: {}", e);
        }
        print_status(&editor);
    }

    let store = editor.into_store();
    save_formula(&mut kv, &store)
        .with_context(|| format!("Failed to save '{}'", state_file.display()))?;
    eprintln!("Saved {} tokens to '{}'", store.len(), state_file.display());
    Ok(())
}

fn print_status<R: TagResolver>(editor: &Editor<R>) {
    let formula = editor
        .formula()
        .iter()
        .map(|t| {
            if t.is_tag() {
                format!("[{}]", t.value)
            } else {
                t.value.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(" ");

    match (editor.result(), editor.error()) {
        (_, Some(e)) => println!("{}  => error: {}", formula, e),
        (Some(value), None) => println!("{}  => {}", formula, format_number(value)),
        (None, None) => println!("{}", formula),
    }
}

/// Integers print without a fractional part
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}
