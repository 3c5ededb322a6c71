use clap::{Parser as ClapParser, Subcommand};
use exprql::cli::{self, CliError, EvalOptions, RenderOptions};
use std::io::{self, Read};

#[derive(ClapParser)]
#[command(name = "exprql")]
#[command(about = "exprql - Render filter expressions as simplified SQL-compatible queries")]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render an expression as a client query string
    Render {
        /// The expression to render
        expression: String,

        /// JSON object of parameter bindings (reads from stdin if piped)
        #[arg(short, long)]
        params: Option<String>,

        /// chrono format used for time literals
        #[arg(short, long)]
        date_format: Option<String>,
    },

    /// Evaluate an expression and print the result as JSON
    Eval {
        /// The expression to evaluate
        expression: String,

        /// JSON object of parameter bindings (reads from stdin if piped)
        #[arg(short, long)]
        params: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let result = match cli.command {
        Commands::Render {
            expression,
            params,
            date_format,
        } => read_params(params).and_then(|parameters| {
            let options = RenderOptions {
                expression,
                parameters,
                date_format,
            };
            let output = cli::execute_render(&options)?;
            println!("{}", output);
            Ok(())
        }),
        Commands::Eval { expression, params } => read_params(params).and_then(|parameters| {
            let options = EvalOptions {
                expression,
                parameters,
            };
            let value = cli::execute_eval(&options)?;
            println!("{}", value);
            Ok(())
        }),
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn read_params(params: Option<String>) -> Result<Option<String>, CliError> {
    match params {
        Some(s) => Ok(Some(s)),
        None if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(Some(buffer).filter(|b| !b.trim().is_empty()))
        }
        None => Ok(None),
    }
}
