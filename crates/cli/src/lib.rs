pub mod adapter;
pub mod commands;
pub mod logging;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use toyshop_core::config::{AppConfig, ConfigOverrides, LoadOptions};

#[derive(Debug, Parser)]
#[command(
    name = "toyshop",
    about = "Toy store and cart in the terminal",
    long_about = "Browse the toy store, move items into the cart one unit at a time, and inspect configuration.",
    after_help = "Examples:\n  toyshop session\n  toyshop simulate cart:0,cart:0,store:0\n  toyshop config"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Path to a toyshop.toml configuration file")]
    config: Option<PathBuf>,
    #[arg(long, global = true, help = "Currency label shown next to totals")]
    currency: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Interactive store/cart session on the terminal")]
    Session,
    #[command(about = "Print the seeded store as JSON")]
    Inventory,
    #[command(about = "Apply a comma-separated script of `cart:<id>` / `store:<id>` moves")]
    Simulate { moves: String },
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(error) => {
            let result = commands::CommandResult::failure(
                "toyshop",
                "config_validation",
                format!("{error:#}"),
                2,
            );
            println!("{}", result.output);
            return ExitCode::from(result.exit_code);
        }
    };
    logging::init_logging(&config.logging);

    let result = match cli.command {
        Command::Session => commands::session::run(&config),
        Command::Inventory => commands::inventory::run(&config),
        Command::Simulate { moves } => commands::simulate::run(&config, &moves),
        Command::Config => commands::CommandResult {
            exit_code: 0,
            output: commands::config::run(&config, cli.config.as_deref()),
        },
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}

fn load_config(cli: &Cli) -> anyhow::Result<AppConfig> {
    let options = LoadOptions {
        config_path: cli.config.clone(),
        require_file: cli.config.is_some(),
        overrides: ConfigOverrides { currency: cli.currency.clone(), ..ConfigOverrides::default() },
    };
    AppConfig::load(options).context("loading toyshop configuration")
}
