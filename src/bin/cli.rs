//! appgraph CLI - lookups over the application/function/variable graph.
//!
//! Usage:
//!   appgraph functions <APP>         # Functions of an application
//!   appgraph apps <FUNCTION>         # Applications using a function
//!   appgraph vars-fn <FUNCTION>      # Variables of a function
//!   appgraph vars-app <APP>          # Functions of an app with their variables
//!   appgraph funcs-var <VARIABLE>    # Functions using a variable
//!   appgraph list-apps               # Declared applications
//!   appgraph stats                   # Graph statistics
//!   appgraph serve                   # JSON requests on stdin, responses on stdout

use anyhow::{Context, Result};
use appgraph::config::{Config, CONFIG_FILE};
use appgraph::{service, GraphStore, Lookup, QueryEngine, QueryOptions};
use clap::{Parser, Subcommand};
use std::io;
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "appgraph")]
#[command(version)]
#[command(about = "appgraph - lookups over application/function/variable usage", long_about = None)]
struct Cli {
    /// Graph document, JSON or YAML (default: from the config file)
    #[arg(short, long, global = true)]
    data: Option<PathBuf>,

    /// Config file
    #[arg(short, long, global = true, default_value = CONFIG_FILE)]
    config: PathBuf,

    /// Print JSON responses instead of plain text
    #[arg(long, global = true)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Functions used by an application
    Functions {
        /// Application name (any casing or separator style)
        app: String,
    },

    /// Applications using a function
    Apps {
        /// Function name
        function: String,
    },

    /// Variables used by a function
    VarsFn {
        /// Function name
        function: String,
    },

    /// Functions of an application with the variables each one uses
    VarsApp {
        /// Application name
        app: String,
    },

    /// Functions using a variable
    FuncsVar {
        /// Variable name
        variable: String,
    },

    /// List declared applications
    ListApps,

    /// Show graph statistics
    Stats,

    /// Answer JSON requests from stdin, one per line
    Serve,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load(&cli.config)?;
    init_logging(cli.verbose, &config.log.level);

    let data = cli.data.unwrap_or_else(|| config.graph.path.clone());
    // A graph that fails to load never gets queried.
    let store = GraphStore::load(&data).context("graph not loaded")?;
    let engine = QueryEngine::with_options(store, QueryOptions::from(&config.query));
    debug!(stats = %engine.stats(), "graph ready");

    match cli.command {
        Commands::Functions { app } => {
            lookup_cli_mode(&engine, Lookup::FunctionsForApp, &app, cli.json)?
        }
        Commands::Apps { function } => {
            lookup_cli_mode(&engine, Lookup::AppsForFunction, &function, cli.json)?
        }
        Commands::VarsFn { function } => {
            lookup_cli_mode(&engine, Lookup::VariablesForFunction, &function, cli.json)?
        }
        Commands::FuncsVar { variable } => {
            lookup_cli_mode(&engine, Lookup::FunctionsForVariable, &variable, cli.json)?
        }
        Commands::VarsApp { app } => structure_cli_mode(&engine, &app, cli.json)?,
        Commands::ListApps => list_apps_cli_mode(&engine, cli.json)?,
        Commands::Stats => stats_cli_mode(&engine, cli.json)?,
        Commands::Serve => {
            info!(graph = %data.display(), "serving requests on stdin");
            let handled = service::serve(&engine, io::stdin().lock(), io::stdout().lock())?;
            info!(handled, "done");
        }
    }

    Ok(())
}

fn init_logging(verbose: bool, level: &str) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_target(false),
        )
        .with(filter)
        .init();
}

// CLI mode for the single-relation lookups
fn lookup_cli_mode(engine: &QueryEngine, lookup: Lookup, name: &str, json: bool) -> Result<()> {
    let response = engine.lookup(lookup, name);
    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    if !response.found {
        println!("No results for '{}'", name);
        if let Some(suggestion) = &response.suggestion {
            println!("Did you mean '{}'?", suggestion);
        }
        return Ok(());
    }

    for result in &response.results {
        println!("{}", result);
    }
    Ok(())
}

// CLI mode for vars-app
fn structure_cli_mode(engine: &QueryEngine, app: &str, json: bool) -> Result<()> {
    let response = engine.structure(app);
    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    if !response.found {
        println!("No results for '{}'", app);
        if let Some(suggestion) = &response.suggestion {
            println!("Did you mean '{}'?", suggestion);
        }
        return Ok(());
    }

    for (function, variables) in response.structure.iter() {
        if variables.is_empty() {
            println!("{}: -", function);
        } else {
            println!("{}: {}", function, variables.join(", "));
        }
    }
    Ok(())
}

// CLI mode for list-apps
fn list_apps_cli_mode(engine: &QueryEngine, json: bool) -> Result<()> {
    let apps = engine.applications();
    if json {
        println!("{}", serde_json::to_string_pretty(&apps)?);
        return Ok(());
    }
    for app in &apps {
        println!("{}", app);
    }
    Ok(())
}

// CLI mode for stats
fn stats_cli_mode(engine: &QueryEngine, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&engine.stats_response())?);
        return Ok(());
    }

    let stats = engine.stats();
    println!("Applications:            {}", stats.application_count);
    println!("Functions:               {}", stats.function_count);
    println!("Variables:               {}", stats.variable_count);
    println!("App-function edges:      {}", stats.app_function_edges);
    println!("Function-variable edges: {}", stats.function_variable_edges);
    if stats.skipped_entries > 0 {
        println!("Skipped entries:         {}", stats.skipped_entries);
    }
    Ok(())
}
