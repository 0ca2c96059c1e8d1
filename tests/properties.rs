//! Property tests over seeded random markets.
//!
//! Every property is checked across a sweep of seeds and market shapes
//! (square, more proposers, more responders). Markets come from
//! [`generate_market`], so a failing seed reproduces exactly.
//!
//! ## Running
//!
//! ```bash
//! cargo test --release --test properties -- --nocapture
//! ```

use deferred_acceptance::engine::{DeferredAcceptance, EngineConfig, NoopObserver, RecordingObserver};
use deferred_acceptance::generator::{generate_common_market, generate_market};
use deferred_acceptance::types::{Market, MatchOutcome, MatchReceipt, ProposerStatus};
use deferred_acceptance::verify::{blocking_pairs, is_proposer_optimal};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

// ============================================================================
// TEST CONSTANTS
// ============================================================================

/// Seeds per market shape
const SEEDS: u64 = 40;

/// Market shapes (proposers, responders)
const SHAPES: [(usize, usize); 7] = [(1, 1), (2, 3), (3, 2), (5, 5), (8, 3), (3, 8), (12, 12)];

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

fn run_default(market: &Market) -> MatchOutcome {
    DeferredAcceptance::default()
        .run(market, &mut NoopObserver)
        .expect("engine run must succeed on a valid market")
}

/// Every (seed, market) pair of the sweep.
fn sweep() -> impl Iterator<Item = (u64, Market)> {
    SHAPES.into_iter().flat_map(|(n_p, n_r)| {
        (0..SEEDS).map(move |seed| {
            let market = generate_market(seed, n_p, n_r).expect("valid market");
            (seed, market)
        })
    })
}

// ============================================================================
// PROPERTIES
// ============================================================================

#[test]
fn stability() {
    for (seed, market) in sweep() {
        let outcome = run_default(&market);
        let blocking = blocking_pairs(&market, &outcome.matching);
        assert!(
            blocking.is_empty(),
            "seed {seed}, {}x{}: blocking pairs {blocking:?}",
            market.n_proposers(),
            market.n_responders()
        );
    }
}

#[test]
fn proposer_optimality_on_small_markets() {
    for &(n_p, n_r) in &[(2, 2), (3, 3), (4, 4), (3, 5), (5, 3)] {
        for seed in 0..SEEDS {
            let market = generate_market(seed, n_p, n_r).expect("valid market");
            let outcome = run_default(&market);
            assert!(
                is_proposer_optimal(&market, &outcome.matching).expect("small market"),
                "seed {seed}, {n_p}x{n_r}: not proposer-optimal"
            );
        }
    }
}

#[test]
fn conservation() {
    for (seed, market) in sweep() {
        let outcome = run_default(&market);
        let matched = outcome.matching.matched_pairs();
        let singles = outcome.final_singles.len();
        let unmatched = outcome.matching.unmatched_responders().count();

        assert_eq!(matched + singles, market.n_proposers(), "seed {seed}");
        assert_eq!(matched + unmatched, market.n_responders(), "seed {seed}");

        // With complete lists the short side is always fully matched.
        assert_eq!(matched, market.n_proposers().min(market.n_responders()), "seed {seed}");

        for p in &outcome.final_singles {
            assert_eq!(outcome.partner(*p), None);
            assert_eq!(outcome.cursors[p.index()], market.n_responders());
        }
    }
}

#[test]
fn monotonic_cursor_advance() {
    for (seed, market) in sweep() {
        let mut recorder = RecordingObserver::new();
        DeferredAcceptance::default()
            .run(&market, &mut recorder)
            .expect("run succeeds");

        let mut previous = vec![0; market.n_proposers()];
        for snapshot in &recorder.rounds {
            for (p, (&now, &before)) in snapshot.cursors.iter().zip(&previous).enumerate() {
                assert!(now >= before, "seed {seed}: cursor of proposer {p} moved back");
                assert!(now <= market.n_responders(), "seed {seed}: cursor out of bounds");
            }
            previous = snapshot.cursors.clone();
        }
    }
}

#[test]
fn held_cursors_are_frozen() {
    for (seed, market) in sweep() {
        let mut recorder = RecordingObserver::new();
        DeferredAcceptance::default()
            .run(&market, &mut recorder)
            .expect("run succeeds");

        for pair in recorder.rounds.windows(2) {
            let (before, after) = (&pair[0], &pair[1]);
            for (p, status) in before.statuses.iter().enumerate() {
                if matches!(status, ProposerStatus::Held(_)) && after.statuses[p] == *status {
                    assert_eq!(
                        before.cursors[p], after.cursors[p],
                        "seed {seed}: held proposer {p} advanced"
                    );
                }
            }
        }
    }
}

#[test]
fn responders_only_trade_up() {
    for (seed, market) in sweep() {
        let mut recorder = RecordingObserver::new();
        DeferredAcceptance::default()
            .run(&market, &mut recorder)
            .expect("run succeeds");

        for pair in recorder.rounds.windows(2) {
            for r in market.responders() {
                let before = pair[0].holders[r.index()];
                let after = pair[1].holders[r.index()];
                match (before, after) {
                    (Some(_), None) => panic!("seed {seed}: {r} lost her holder"),
                    (Some(b), Some(a)) => assert!(
                        market.responder_rank(r, a) <= market.responder_rank(r, b),
                        "seed {seed}: {r} traded down"
                    ),
                    _ => {}
                }
            }
        }
    }
}

#[test]
fn determinism() {
    for (seed, market) in sweep() {
        let first = run_default(&market);
        let second = run_default(&market);
        assert_eq!(first, second, "seed {seed}");

        // A freshly generated copy of the same market gives the same receipt.
        let regenerated =
            generate_market(seed, market.n_proposers(), market.n_responders()).expect("valid");
        let third = run_default(&regenerated);
        assert_eq!(
            MatchReceipt::from_outcome(&first),
            MatchReceipt::from_outcome(&third),
            "seed {seed}"
        );
    }
}

#[test]
fn termination_bound() {
    for (seed, market) in sweep() {
        let outcome = run_default(&market);
        assert!(
            outcome.rounds_used <= market.round_bound(),
            "seed {seed}: {} rounds > bound {}",
            outcome.rounds_used,
            market.round_bound()
        );
        assert_eq!(outcome.history.len() as u64, outcome.rounds_used);
    }
}

#[test]
fn common_preferences_take_one_round_per_responder() {
    for seed in 0..SEEDS {
        let market = generate_common_market(seed, 6, 6).expect("valid market");
        let outcome = run_default(&market);

        assert_eq!(outcome.rounds_used, 6, "seed {seed}");
        let offers: Vec<usize> = outcome.history.iter().map(|s| s.offers).collect();
        assert_eq!(offers, vec![6, 5, 4, 3, 2, 1], "seed {seed}");
    }
}

#[test]
fn invariant_checks_do_not_change_results() {
    let unchecked = DeferredAcceptance::new(EngineConfig::new().with_invariant_checks(false));
    for (seed, market) in sweep() {
        let outcome = unchecked
            .run(&market, &mut NoopObserver)
            .expect("run succeeds");
        assert_eq!(outcome, run_default(&market), "seed {seed}");
    }
}

/// Markets built from a raw RNG rather than the crate's generator.
#[test]
fn stability_with_external_preferences() {
    let mut rng = ChaCha8Rng::seed_from_u64(2024);
    let shuffled = |rng: &mut ChaCha8Rng, n: usize| {
        let mut list: Vec<u32> = (0..n as u32).collect();
        for i in (1..n).rev() {
            list.swap(i, rng.gen_range(0..=i));
        }
        list
    };

    for _ in 0..100 {
        let n_p: usize = rng.gen_range(1..=9);
        let n_r: usize = rng.gen_range(1..=9);
        let proposer_prefs: Vec<Vec<u32>> = (0..n_p).map(|_| shuffled(&mut rng, n_r)).collect();
        let responder_prefs: Vec<Vec<u32>> = (0..n_r).map(|_| shuffled(&mut rng, n_p)).collect();
        let market = Market::new(proposer_prefs.clone(), responder_prefs.clone()).expect("valid");

        let outcome = deferred_acceptance::run(n_p, n_r, proposer_prefs, responder_prefs)
            .expect("run succeeds");

        assert!(blocking_pairs(&market, &outcome.matching).is_empty(), "{n_p}x{n_r}");
        assert!(outcome.rounds_used <= (n_p * n_r) as u64);
        assert_eq!(outcome.final_singles.len(), n_p.saturating_sub(n_r), "{n_p}x{n_r}");
    }
}
