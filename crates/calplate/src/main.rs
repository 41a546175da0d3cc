use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use env_logger::Env;

mod color;
mod config;
mod generate;
mod init;
mod plan;

#[derive(Parser)]
#[command(name = "calplate")]
#[command(about = "Calibration reticle plate generator", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(short = 'd', long = "debug", global = true, hide = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a plate drawing
    Generate(generate::GenerateArgs),

    /// Show the section layout and element counts without writing a drawing
    Plan(plan::PlanArgs),

    /// Write a starter plate configuration
    Init(init::InitArgs),
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {e}", "Error:".red());
        for cause in e.chain().skip(1) {
            eprintln!("  {cause}");
        }
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    color::init_color();

    // Warnings are printed by the commands themselves; the logger only
    // surfaces them with --debug or RUST_LOG.
    let env = if cli.debug {
        Env::default().default_filter_or("debug")
    } else {
        Env::default().default_filter_or("error")
    };
    env_logger::Builder::from_env(env).init();

    match cli.command {
        Commands::Generate(args) => generate::execute(args),
        Commands::Plan(args) => plan::execute(args),
        Commands::Init(args) => init::execute(args),
    }
}
