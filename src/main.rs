//! Deferred Acceptance - Binary Entry Point
//!
//! Generates a seeded random market, runs the engine and prints the stable
//! matching together with its receipt.
//!
//! ```bash
//! deferred-acceptance --proposers 4 --responders 3 --seed 7
//! RUST_LOG=deferred_acceptance=trace deferred-acceptance --trace-rounds
//! ```

use clap::Parser;
use tracing_subscriber::EnvFilter;

use deferred_acceptance::engine::{DeferredAcceptance, EngineConfig, NoopObserver, RoundObserver, TracingObserver};
use deferred_acceptance::generator::generate_market;
use deferred_acceptance::verify::is_stable;
use deferred_acceptance::{MatchError, MatchReceipt};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Opts {
    /// Number of agents on the proposing side
    #[arg(short, long, default_value_t = 5)]
    proposers: usize,

    /// Number of agents on the responding side
    #[arg(short, long, default_value_t = 5)]
    responders: usize,

    /// Seed for the preference generator
    #[arg(short, long, default_value_t = 42)]
    seed: u64,

    /// Let the responding side propose instead
    #[arg(long)]
    swap_sides: bool,

    /// Skip the per-round invariant checks
    #[arg(long)]
    no_invariant_checks: bool,

    /// Log a snapshot of the matching after every round (debug level)
    #[arg(long)]
    trace_rounds: bool,
}

fn main() -> Result<(), MatchError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let opts = Opts::parse();

    let mut market = generate_market(opts.seed, opts.proposers, opts.responders)?;
    if opts.swap_sides {
        market = market.transposed();
    }

    let config = EngineConfig::new().with_invariant_checks(!opts.no_invariant_checks);
    let engine = DeferredAcceptance::new(config);

    let mut observer: Box<dyn RoundObserver> = if opts.trace_rounds {
        Box::new(TracingObserver)
    } else {
        Box::new(NoopObserver)
    };
    let outcome = engine.run(&market, observer.as_mut())?;
    let receipt = MatchReceipt::from_outcome(&outcome);

    println!("===========================================");
    println!("  Deferred Acceptance");
    println!("===========================================");
    println!();
    println!(
        "Market: {} proposers x {} responders (seed {}{})",
        market.n_proposers(),
        market.n_responders(),
        opts.seed,
        if opts.swap_sides { ", sides swapped" } else { "" }
    );
    println!();

    println!("Preferences (most preferred first):");
    for p in market.proposers() {
        let list: Vec<String> = market
            .proposer_table()
            .list(p.index())
            .iter()
            .map(|&r| format!("r{}", r + 1))
            .collect();
        println!("  {p}: {}", list.join(" > "));
    }
    for r in market.responders() {
        let list: Vec<String> = market
            .responder_table()
            .list(r.index())
            .iter()
            .map(|&p| format!("p{}", p + 1))
            .collect();
        println!("  {r}: {}", list.join(" > "));
    }
    println!();

    println!("Matching after {} rounds:", outcome.rounds_used);
    for r in market.responders() {
        match outcome.holder(r) {
            Some(p) => println!("  {r} <- {p}"),
            None => println!("  {r} <- (unmatched)"),
        }
    }
    for p in &outcome.final_singles {
        println!("  {p} stays single");
    }
    println!();

    println!("Receipt:");
    println!("  Offers made:   {:>8}", receipt.offers_made);
    println!("  Matched pairs: {:>8}", receipt.matched_pairs);
    println!("  Final singles: {:>8}", receipt.final_singles);
    if let Some(rate) = receipt.match_rate() {
        println!("  Match rate:    {:>8.2}", rate);
    }
    println!("  Stable:        {:>8}", is_stable(&market, &outcome.matching));
    println!("  Digest:        {}", receipt.digest_hex());
    match ssz_rs::serialize(&receipt) {
        Ok(bytes) => println!("  SSZ size:      {:>8} bytes", bytes.len()),
        Err(e) => println!("  ERROR: Failed to serialize receipt: {:?}", e),
    }

    Ok(())
}
