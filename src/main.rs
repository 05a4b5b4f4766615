use cipherforge::lang::LanguageModel;
use cipherforge::scorer::EnglishScorer;
use clap::{Parser, Subcommand};
use std::process;
use std::sync::Arc;

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Corpus directory (words.csv, optional 1grams.csv / 2grams.csv)
    #[arg(global = true, short, long)]
    corpus: Option<String>,

    #[arg(global = true, long, default_value_t = false)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    Crack(cmd::crack::CrackArgs),
    Encrypt(cmd::codec::CodecArgs),
    Decrypt(cmd::codec::CodecArgs),
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::WARN
        })
        .init();

    println!("\n🔓 Initializing CipherForge...");

    let model = match &cli.corpus {
        Some(dir) => {
            println!("📚 Loading corpus from: {}", dir);
            match LanguageModel::from_dir(dir) {
                Ok(m) => m,
                Err(e) => {
                    eprintln!("\n❌ FATAL ERROR LOADING LANGUAGE MODEL:");
                    eprintln!("   {}", e);
                    process::exit(1);
                }
            }
        }
        None => {
            println!("📚 Using embedded English model.");
            LanguageModel::builtin()
        }
    };
    let model = Arc::new(model);
    let scorer = EnglishScorer::new(model.clone());

    let outcome = match cli.command {
        Commands::Crack(args) => cmd::crack::run(args, &scorer, &model),
        Commands::Encrypt(args) => cmd::codec::run(args, cmd::codec::Direction::Encrypt),
        Commands::Decrypt(args) => cmd::codec::run(args, cmd::codec::Direction::Decrypt),
    };

    if let Err(e) = outcome {
        eprintln!("\n❌ {}", e);
        process::exit(1);
    }
}
