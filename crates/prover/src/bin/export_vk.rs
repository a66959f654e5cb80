//! Load or create the membership keys and print the verifying key as JSON.
//!
//! Usage:
//!   export-vk [--depth N] [--dimension D] [--out DIR]

use std::sync::Arc;
use std::time::Instant;

use ark_bn254::Fr;
use knapsack_crh::KnapsackParameters;
use membership_prover::{
    config::init_tracing, export_verifying_key_json, load_or_setup, CliConfig, SetupError,
};

fn main() {
    init_tracing();

    let config = match CliConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(2);
        }
    };
    if config.help {
        println!("export-vk [--depth N] [--dimension D] [--out DIR]");
        return;
    }

    if let Err(e) = run(&config) {
        eprintln!("export-vk failed: {}", e);
        std::process::exit(1);
    }
}

fn run(config: &CliConfig) -> Result<(), SetupError> {
    let params = Arc::new(KnapsackParameters::<Fr>::for_two_to_one(config.dimension));

    let start = Instant::now();
    let keys = load_or_setup(
        &config.out_dir,
        params.clone(),
        config.depth,
        &mut rand::thread_rng(),
    )?;
    tracing::info!("Keys ready in {:?}", start.elapsed());

    println!("{}", export_verifying_key_json(&keys, params.digest_len())?);
    Ok(())
}
