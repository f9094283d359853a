//! MFE Config CLI
//!
//! Entry point for the `mfe-config` command-line tool.

use clap::{Parser, Subcommand};
use mfe_config::apps::{self, APP_NAMES};
use mfe_config::config::{
    deep_merge, read_config_file, ConfigFetcher, DirFetcher, HttpFetcher, LoaderOptions, NoFetch,
};
use mfe_config::{ConfigLoader, Host, HostInjection};
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::time::Duration;
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "mfe-config")]
#[command(about = "Resolve and check micro-frontend app configuration", version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve an app's configuration through the full layer chain
    Resolve {
        /// App namespace (see `mfe-config apps`)
        #[arg(long, short = 'a')]
        app: String,

        /// Origin of the hosting page to fetch config files from
        #[arg(long, conflicts_with = "dir")]
        base_url: Option<String>,

        /// Local directory standing in for the page root
        #[arg(long)]
        dir: Option<PathBuf>,

        /// Host injection file (JSON or TOML, keyed by app namespace)
        #[arg(long, short = 'i')]
        inject: Option<PathBuf>,

        /// Explicit override as a JSON object
        #[arg(long = "override", short = 'o')]
        override_json: Option<String>,

        /// Fail instead of falling back to defaults when validation fails
        #[arg(long)]
        strict: bool,

        /// Include provenance (sources, outcome, fingerprint) in the output
        #[arg(long)]
        provenance: bool,

        /// Per-fetch timeout in milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,
    },

    /// Print an app's hardcoded defaults
    Defaults {
        #[arg(long, short = 'a')]
        app: String,
    },

    /// Print an app's schema
    Schema {
        #[arg(long, short = 'a')]
        app: String,
    },

    /// Validate a configuration file (JSON or TOML) against an app's schema
    Validate {
        #[arg(long, short = 'a')]
        app: String,

        /// File to check, merged over the app's defaults as the loader would
        file: PathBuf,
    },

    /// List known app namespaces
    Apps,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Resolve {
            app,
            base_url,
            dir,
            inject,
            override_json,
            strict,
            provenance,
            timeout_ms,
        } => {
            run_resolve(ResolveArgs {
                app,
                base_url,
                dir,
                inject,
                override_json,
                strict,
                provenance,
                timeout_ms,
            })
            .await;
        }
        Commands::Defaults { app } => run_defaults(&app),
        Commands::Schema { app } => run_schema(&app),
        Commands::Validate { app, file } => run_validate(&app, file),
        Commands::Apps => run_apps(),
    }
}

struct ResolveArgs {
    app: String,
    base_url: Option<String>,
    dir: Option<PathBuf>,
    inject: Option<PathBuf>,
    override_json: Option<String>,
    strict: bool,
    provenance: bool,
    timeout_ms: Option<u64>,
}

async fn run_resolve(args: ResolveArgs) {
    let mut loader = load_loader(&args.app);
    if let Some(ms) = args.timeout_ms {
        loader = loader.with_options(LoaderOptions {
            fetch_timeout: Some(Duration::from_millis(ms)),
            ..LoaderOptions::default()
        });
    }

    let fetcher: Arc<dyn ConfigFetcher> = match (args.base_url, args.dir) {
        (Some(url), _) => match HttpFetcher::new(&url) {
            Ok(f) => Arc::new(f),
            Err(e) => {
                eprintln!("Invalid base URL: {}", e);
                process::exit(1);
            }
        },
        (None, Some(dir)) => Arc::new(DirFetcher::new(dir)),
        (None, None) => Arc::new(NoFetch),
    };

    let injection = match args.inject {
        Some(path) => match HostInjection::from_file(&path) {
            Ok(inj) => inj,
            Err(e) => {
                eprintln!("Error loading host injection {}: {}", path.display(), e);
                process::exit(1);
            }
        },
        None => HostInjection::default(),
    };

    let explicit = match args.override_json {
        Some(raw) => match serde_json::from_str::<serde_json::Value>(&raw) {
            Ok(v) => Some(v),
            Err(e) => {
                eprintln!("Invalid --override JSON: {}", e);
                process::exit(1);
            }
        },
        None => None,
    };

    let host = Host::new(fetcher).with_injection(injection);

    let resolved = if args.strict {
        match loader.load_strict(&host, explicit).await {
            Ok(r) => r,
            Err(e) => {
                eprintln!("{}", e);
                process::exit(1);
            }
        }
    } else {
        loader.load(&host, explicit).await
    };

    let output = if args.provenance {
        resolved.to_json()
    } else {
        serde_json::to_string_pretty(&resolved.config)
    };

    match output {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error serializing output: {}", e);
            process::exit(1);
        }
    }
}

fn run_defaults(app: &str) {
    let loader = load_loader(app);
    print_json(loader.defaults());
}

fn run_schema(app: &str) {
    let loader = load_loader(app);
    print_json(&loader.schema().describe());
}

fn run_validate(app: &str, file: PathBuf) {
    let loader = load_loader(app);

    let candidate = match read_config_file(&file) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("Error reading {}: {}", file.display(), e);
            process::exit(1);
        }
    };

    let merged = deep_merge(loader.defaults().clone(), candidate);
    match loader.schema().validate(&merged) {
        Ok(_) => {
            println!("Configuration valid: {} ({})", file.display(), app);
        }
        Err(issues) => {
            eprintln!("Configuration invalid: {} ({})", file.display(), app);
            eprintln!();
            for issue in &issues {
                eprintln!("  {}", issue);
            }
            process::exit(1);
        }
    }
}

fn run_apps() {
    println!("Known apps ({} total):\n", APP_NAMES.len());
    for name in APP_NAMES {
        match apps::dev_port_for(name) {
            Some(port) => println!("  {} (dev port {})", name, port),
            None => println!("  {}", name),
        }
    }
}

fn load_loader(app: &str) -> ConfigLoader {
    match apps::loader_for(app) {
        Ok(loader) => loader,
        Err(e) => {
            eprintln!("{}", e);
            eprintln!("Known apps: {}", APP_NAMES.join(", "));
            process::exit(1);
        }
    }
}

fn print_json(value: &serde_json::Value) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error serializing output: {}", e);
            process::exit(1);
        }
    }
}

/// Initialize the tracing/logging subsystem (stderr, so stdout stays JSON)
fn init_tracing(verbosity: u8, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else {
        match verbosity {
            0 => Level::WARN,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    let mut filter = EnvFilter::from_default_env().add_directive(level.into());
    for directive in ["hyper=warn", "reqwest=warn"] {
        if let Ok(d) = directive.parse() {
            filter = filter.add_directive(d);
        }
    }

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter)
        .init();
}
