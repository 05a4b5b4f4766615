use crate::error::{CfResult, CipherForgeError};
use clap::Args;

/// Knobs shared by both search strategies. The clap defaults double as the
/// library defaults via `SearchParams::default()`.
#[derive(Args, Debug, Clone)]
pub struct SearchParams {
    /// Keys per genetic-algorithm generation
    #[arg(long, default_value_t = 50)]
    pub population_size: usize,

    /// Probability of a swap mutation per child key
    #[arg(long, default_value_t = 0.1)]
    pub mutation_rate: f64,

    /// Genetic-algorithm generation count
    #[arg(long, default_value_t = 200)]
    pub generations: usize,

    /// Independent search restarts
    #[arg(long, default_value_t = 8)]
    pub restarts: usize,

    /// Hill-climb iteration budget per restart
    #[arg(long, default_value_t = 10_000)]
    pub iterations: usize,

    /// Fraction of restarts seeded from letter frequencies (rest are random)
    #[arg(long, default_value_t = 0.5)]
    pub freq_init_ratio: f64,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            population_size: 50,
            mutation_rate: 0.1,
            generations: 200,
            restarts: 8,
            iterations: 10_000,
            freq_init_ratio: 0.5,
        }
    }
}

impl SearchParams {
    /// Rejects unusable settings before any search begins.
    pub fn validate(&self) -> CfResult<()> {
        if self.population_size == 0 {
            return Err(CipherForgeError::InvalidConfig(
                "population size must be positive".into(),
            ));
        }
        if self.generations == 0 {
            return Err(CipherForgeError::InvalidConfig(
                "generation count must be positive".into(),
            ));
        }
        if self.restarts == 0 {
            return Err(CipherForgeError::InvalidConfig(
                "restart count must be positive".into(),
            ));
        }
        if self.iterations == 0 {
            return Err(CipherForgeError::InvalidConfig(
                "iteration budget must be positive".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(CipherForgeError::InvalidConfig(format!(
                "mutation rate {} outside [0, 1]",
                self.mutation_rate
            )));
        }
        if !(0.0..=1.0).contains(&self.freq_init_ratio) {
            return Err(CipherForgeError::InvalidConfig(format!(
                "frequency init ratio {} outside [0, 1]",
                self.freq_init_ratio
            )));
        }
        Ok(())
    }
}
