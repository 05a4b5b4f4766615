// ===== cipherforge/src/reports.rs =====
use cipherforge::breaker::{BreakResult, RecoveredKey};
use cipherforge::cipher::{PermutationKey, SubstitutionKey};
use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, Table};

pub fn print_break_result(result: &BreakResult) {
    println!("\n=== 🏆 BEST CANDIDATE ===");
    println!("Cipher: {}", result.kind);
    println!("Score: {:.2}", result.score);
    if let Some(n) = result.block_size {
        println!("Block size: {}", n);
    }
    println!("Restarts: {}", result.restarts_run);
    println!("\nPlaintext candidate:\n{}", result.plaintext);

    match &result.key {
        RecoveredKey::Permutation(key) => print_permutation_key(key),
        RecoveredKey::Substitution(key) => print_substitution_table(key),
    }
}

fn print_permutation_key(key: &PermutationKey) {
    let mut table = Table::new();
    table.load_preset(ASCII_FULL);

    let positions: Vec<Cell> = (0..key.len())
        .map(|i| {
            Cell::new(i.to_string())
                .add_attribute(Attribute::Bold)
                .set_alignment(CellAlignment::Center)
        })
        .collect();
    let targets: Vec<Cell> = key
        .targets()
        .iter()
        .map(|t| {
            Cell::new(t.to_string())
                .fg(Color::Cyan)
                .set_alignment(CellAlignment::Center)
        })
        .collect();
    table.add_row(positions);
    table.add_row(targets);

    println!("\nKey (input position / output position):\n{}", table);
}

fn print_substitution_table(key: &SubstitutionKey) {
    let mut table = Table::new();
    table.load_preset(ASCII_FULL);

    let cipher_row: Vec<Cell> = (b'A'..=b'Z')
        .map(|c| {
            Cell::new((c as char).to_string())
                .add_attribute(Attribute::Bold)
                .set_alignment(CellAlignment::Center)
        })
        .collect();
    let plain_row: Vec<Cell> = (b'A'..=b'Z')
        .map(|c| {
            let plain = key.decrypt(&(c as char).to_string());
            Cell::new(plain)
                .fg(Color::Cyan)
                .set_alignment(CellAlignment::Center)
        })
        .collect();
    table.add_row(cipher_row);
    table.add_row(plain_row);

    println!("\nSubstitution table (CIPHER / PLAIN):\n{}", table);
}
