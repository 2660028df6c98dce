//! errtriage CLI
//!
//! Usage:
//!   errtriage analyze docker "COPY failed: file not found: package.json"
//!   kubectl apply -f app.yaml 2>&1 | errtriage analyze config
//!   errtriage analyze sql --file error.log --locale zh
//!   errtriage rules --domain shell
//!   errtriage explain swift nil_unwrap

use anyhow::{bail, Context as _, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use errtriage::config::{ColorMode, Config, OutputFormat};
use errtriage::output::{JsonFormatter, OutputFormatter, TextFormatter};
use errtriage::{Domain, Engine, Locale};
use std::io::{IsTerminal, Read};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "errtriage",
    version,
    about = "Classify error messages and suggest fixes",
    long_about = "Pattern-based triage of configuration, Docker, Kotlin, shell, SQL and Swift errors."
)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify an error message (reads stdin when no text or file is given)
    Analyze {
        /// Domain of the error (config, docker, kotlin, shell, sql, swift)
        domain: Domain,

        /// Error text
        text: Vec<String>,

        /// Read the error text from a file
        #[arg(short, long, conflicts_with = "text")]
        file: Option<PathBuf>,

        /// Report language (en, zh)
        #[arg(short, long)]
        locale: Option<Locale>,

        /// Output JSON
        #[arg(long)]
        json: bool,
    },

    /// List rules in match order
    Rules {
        /// Only list rules for this domain
        #[arg(short, long)]
        domain: Option<Domain>,

        /// Output JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a rule's explanation and suggestions
    Explain {
        /// Domain the rule belongs to
        domain: Domain,

        /// Rule ID (e.g. nil_unwrap)
        rule_id: String,

        /// Report language (en, zh)
        #[arg(short, long)]
        locale: Option<Locale>,
    },

    /// List supported domains
    Domains,
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::load_default().context("failed to load configuration")?;
    if let Some(path) = &cli.config {
        let explicit = Config::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?;
        config.merge(explicit);
    }
    Ok(config)
}

fn use_color(cli: &Cli, config: &Config) -> bool {
    if cli.no_color {
        return false;
    }
    match config.output.color {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => std::io::stdout().is_terminal(),
    }
}

fn read_input(text: &[String], file: Option<&PathBuf>) -> Result<String> {
    let input = if let Some(path) = file {
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?
    } else if !text.is_empty() {
        text.join(" ")
    } else {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read stdin")?;
        buf
    };
    Ok(input.trim_end_matches(['\r', '\n']).to_string())
}

fn text_formatter(locale: Locale, colored: bool) -> TextFormatter {
    let formatter = TextFormatter::new(locale);
    if colored {
        formatter
    } else {
        formatter.without_color()
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logger
    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let config = load_config(&cli)?;
    let color = use_color(&cli, &config);
    colored::control::set_override(color);

    let engine = Engine::from_config(&config).context("failed to build rule registry")?;
    log::debug!(
        "{} rules across {} domains",
        engine.registry().rule_count(),
        engine.registry().domains().count()
    );

    match &cli.command {
        Commands::Analyze {
            domain,
            text,
            file,
            locale,
            json,
        } => {
            let input = read_input(text, file.as_ref())?;
            let Some(record) = engine.analyze(*domain, &input) else {
                bail!("no error text given");
            };

            if *json || config.output.format == OutputFormat::Json {
                println!("{}", JsonFormatter::new().pretty().format(&record));
            } else {
                let locale = locale.unwrap_or(config.locale);
                print!("{}", text_formatter(locale, color).format(&record));
            }
        }

        Commands::Rules { domain, json } => {
            let registry = engine.registry();
            let domains: Vec<Domain> = match domain {
                Some(d) => vec![*d],
                None => registry.domains().collect(),
            };

            if *json || config.output.format == OutputFormat::Json {
                let rules: Vec<_> = domains
                    .iter()
                    .flat_map(|d| registry.rules_for(*d).iter().cloned())
                    .collect();
                println!("{}", JsonFormatter::new().pretty().format_rules(&rules));
            } else {
                let formatter = text_formatter(config.locale, color);
                for d in domains {
                    let rules = registry.rules_for(d);
                    println!(
                        "{} ({} rules)",
                        d.display_name(config.locale).bold(),
                        rules.len()
                    );
                    print!("{}", formatter.format_rules(rules));
                    println!();
                }
            }
        }

        Commands::Explain {
            domain,
            rule_id,
            locale,
        } => {
            let Some(rule) = engine.registry().find_rule(*domain, rule_id) else {
                eprintln!(
                    "{}: Rule '{}' not found in {}",
                    "error".red().bold(),
                    rule_id,
                    domain
                );
                eprintln!();
                eprintln!(
                    "Use {} to see all available rules",
                    format!("errtriage rules --domain {}", domain).cyan()
                );
                std::process::exit(1);
            };
            let locale = locale.unwrap_or(config.locale);
            print!("{}", text_formatter(locale, color).format_rule(rule));
        }

        Commands::Domains => {
            for domain in Domain::ALL {
                println!(
                    "  {:<8} {:<16} {:>3} rules",
                    domain.as_str().cyan(),
                    domain.display_name(config.locale),
                    engine.registry().rules_for(domain).len()
                );
            }
        }
    }

    Ok(())
}
