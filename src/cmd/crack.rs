use crate::reports;
use cipherforge::breaker::{self, BreakOptions, SearchStrategy};
use cipherforge::cipher::CipherKind;
use cipherforge::config::SearchParams;
use cipherforge::error::{CfResult, CipherForgeError};
use cipherforge::lang::LanguageModel;
use cipherforge::scorer::{NullOracle, TextScorer};
use clap::Args;
use std::fs;
use std::time::Duration;

#[derive(Args, Debug, Clone)]
pub struct CrackArgs {
    /// Cipher family to assume (permutation | substitution)
    #[arg(short, long)]
    pub kind: CipherKind,

    /// Ciphertext given inline
    #[arg(short, long, conflicts_with = "input")]
    pub text: Option<String>,

    /// Read the ciphertext from a file instead
    #[arg(short, long)]
    pub input: Option<String>,

    #[command(flatten)]
    pub params: SearchParams,

    /// Search strategy (auto | genetic | anneal)
    #[arg(long, default_value_t = SearchStrategy::Auto)]
    pub strategy: SearchStrategy,

    /// Permutation block size; estimated from periodicity when omitted
    #[arg(short = 'b', long)]
    pub block_size: Option<usize>,

    #[arg(short = 'S', long)]
    pub seed: Option<u64>,

    /// Wall-clock budget in seconds
    #[arg(short = 'T', long)]
    pub time: Option<u64>,

    /// Emit the result as JSON instead of tables
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

pub fn run(args: CrackArgs, scorer: &dyn TextScorer, model: &LanguageModel) -> CfResult<()> {
    let ciphertext = read_ciphertext(&args)?;
    let opts = BreakOptions {
        params: args.params.clone(),
        strategy: args.strategy,
        block_size: args.block_size,
        seed: args.seed,
        max_time: args.time.map(Duration::from_secs),
    };

    let oracle = NullOracle;
    let result = breaker::break_cipher(&ciphertext, args.kind, scorer, model, &oracle, &opts)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        reports::print_break_result(&result);
    }
    Ok(())
}

fn read_ciphertext(args: &CrackArgs) -> CfResult<String> {
    if let Some(text) = &args.text {
        return Ok(text.clone());
    }
    if let Some(path) = &args.input {
        return Ok(fs::read_to_string(path)?.trim_end().to_string());
    }
    Err(CipherForgeError::InvalidConfig(
        "provide the ciphertext via --text or --input".into(),
    ))
}
