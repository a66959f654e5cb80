//! Print constraint statistics for the membership circuit and run a self-test.
//!
//! Usage:
//!   circuit-stats [--depth N] [--dimension D]

use std::sync::Arc;

use ark_bn254::Fr;
use ark_std::rand::{rngs::StdRng, SeedableRng};
use knapsack_crh::{KnapsackCrhGadget, KnapsackParameters};
use membership_circuits::{run_self_test, KnapsackMembership, KnapsackMembershipCircuit};
use membership_prover::{config::init_tracing, CliConfig};

fn main() {
    init_tracing();

    let config = match CliConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            print_usage();
            std::process::exit(2);
        }
    };
    if config.help {
        print_usage();
        return;
    }

    let params = Arc::new(KnapsackParameters::<Fr>::for_two_to_one(config.dimension));

    let circuit = match KnapsackMembershipCircuit::<Fr>::new(params.clone(), config.depth) {
        Ok(circuit) => circuit,
        Err(e) => {
            eprintln!("Failed to build circuit: {}", e);
            std::process::exit(1);
        }
    };

    println!("Membership circuit");
    println!("==================");
    println!("Depth:               {}", config.depth);
    println!("Digest bits:         {}", params.digest_len());
    println!(
        "Gadget constraints:  {} (expected {})",
        circuit.gadget_constraints(),
        KnapsackMembership::<Fr>::expected_constraint_count(&params, config.depth)
    );
    println!();
    println!("{}", circuit.constraint_system().stats());
    println!();

    let mut rng = StdRng::seed_from_u64(0);
    match run_self_test::<Fr, KnapsackCrhGadget<Fr>, _>(params, config.depth, &mut rng) {
        Ok(report) => {
            println!("{}", report);
            if !report.passed() {
                std::process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("Self-test failed: {}", e);
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    println!("circuit-stats - constraint statistics for the membership circuit");
    println!();
    println!("USAGE:");
    println!("    circuit-stats [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    --depth N        Tree depth (default 16)");
    println!("    --dimension D    Field elements per digest (default 1)");
    println!("    --help           Print this help message");
}
