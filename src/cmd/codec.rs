use cipherforge::cipher::{CipherKind, PermutationKey, SubstitutionKey};
use cipherforge::error::{CfResult, CipherForgeError};
use clap::Args;

#[derive(Args, Debug, Clone)]
pub struct CodecArgs {
    /// Cipher family (permutation | substitution)
    #[arg(short, long)]
    pub kind: CipherKind,

    /// Permutation: comma-separated targets, 0- or 1-indexed (e.g. "3,1,4,2").
    /// Substitution: the 26-letter cipher alphabet.
    #[arg(short = 'K', long)]
    pub key: String,

    #[arg(short, long)]
    pub text: String,
}

pub enum Direction {
    Encrypt,
    Decrypt,
}

pub fn run(args: CodecArgs, direction: Direction) -> CfResult<()> {
    let output = match args.kind {
        CipherKind::Permutation => {
            let targets: Vec<usize> = args
                .key
                .split(',')
                .map(|s| {
                    s.trim().parse::<usize>().map_err(|_| {
                        CipherForgeError::InvalidKey(format!(
                            "permutation target '{}' is not a number",
                            s.trim()
                        ))
                    })
                })
                .collect::<CfResult<_>>()?;
            let key = PermutationKey::new(&targets)?;
            match direction {
                Direction::Encrypt => key.encrypt(&args.text),
                Direction::Decrypt => key.decrypt(&args.text)?,
            }
        }
        CipherKind::Substitution => {
            let key = SubstitutionKey::from_cipher_alphabet(&args.key)?;
            match direction {
                Direction::Encrypt => key.encrypt(&args.text),
                Direction::Decrypt => key.decrypt(&args.text),
            }
        }
    };
    println!("{}", output);
    Ok(())
}
