//! Concrete market scenarios, worked out by hand.
//!
//! Agents are written one-based here (`p1`, `r1`) to match the comments; the
//! API itself is 0-based, so `p1` is `ProposerId(0)`.

use std::collections::BTreeSet;

use deferred_acceptance::engine::{DeferredAcceptance, NoopObserver, RecordingObserver};
use deferred_acceptance::types::{Market, Matching, ProposerId, ProposerStatus, ResponderId};
use deferred_acceptance::verify::{is_proposer_optimal, is_stable, stable_matchings};
use deferred_acceptance::{run, ConfigError, MatchError};

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

fn p(one_based: u32) -> ProposerId {
    ProposerId(one_based - 1)
}

fn r(one_based: u32) -> ResponderId {
    ResponderId(one_based - 1)
}

/// 3x3 market with exactly two stable matchings.
///
/// p1: r1 > r2 > r3    r1: p2 > p1 > p3
/// p2: r2 > r1 > r3    r2: p1 > p2 > p3
/// p3: r1 > r2 > r3    r3: p1 > p2 > p3
fn three_by_three() -> Market {
    Market::from_one_based(
        &[vec![1, 2, 3], vec![2, 1, 3], vec![1, 2, 3]],
        &[vec![2, 1, 3], vec![1, 2, 3], vec![1, 2, 3]],
    )
    .expect("valid market")
}

// ============================================================================
// 3x3
// ============================================================================

/// Round 1: p1->r1, p2->r2, p3->r1. r1 keeps p1 over p3.
/// Round 2: p3->r2. r2 keeps p2 over p3.
/// Round 3: p3->r3. Accepted, nobody single.
#[test]
fn three_by_three_hand_executed() {
    let market = three_by_three();
    let mut recorder = RecordingObserver::new();

    let outcome = DeferredAcceptance::default()
        .run(&market, &mut recorder)
        .expect("run succeeds");

    assert_eq!(outcome.holder(r(1)), Some(p(1)));
    assert_eq!(outcome.holder(r(2)), Some(p(2)));
    assert_eq!(outcome.holder(r(3)), Some(p(3)));
    assert_eq!(outcome.rounds_used, 3);
    assert!(outcome.final_singles.is_empty());
    assert_eq!(outcome.cursors, vec![1, 1, 3]);

    let round1 = &recorder.rounds[0];
    assert_eq!(round1.holders, vec![Some(p(1)), Some(p(2)), None]);
    assert_eq!(round1.singles(), vec![p(3)]);

    let round2 = &recorder.rounds[1];
    assert_eq!(round2.holders, vec![Some(p(1)), Some(p(2)), None]);
    assert_eq!(round2.cursors, vec![1, 1, 2]);

    let offers: Vec<usize> = outcome.history.iter().map(|s| s.offers).collect();
    assert_eq!(offers, vec![3, 1, 1]);
}

/// The other stable matching of this market, {r1:p2, r2:p1, r3:p3}, is the
/// responder-optimal one: it is what the engine finds when responders propose.
#[test]
fn three_by_three_responder_optimal_when_sides_swap() {
    let market = three_by_three();
    let swapped = market.transposed();

    let outcome = DeferredAcceptance::default()
        .run(&swapped, &mut NoopObserver)
        .expect("run succeeds");

    // In the swapped market responders are the proposers: ProposerId(k) is r(k+1).
    assert_eq!(outcome.partner(ProposerId(0)), Some(ResponderId(1))); // r1 - p2
    assert_eq!(outcome.partner(ProposerId(1)), Some(ResponderId(0))); // r2 - p1
    assert_eq!(outcome.partner(ProposerId(2)), Some(ResponderId(2))); // r3 - p3

    let as_original = Matching::from_pairs(3, 3, [(p(2), r(1)), (p(1), r(2)), (p(3), r(3))])
        .expect("valid matching");
    assert!(is_stable(&market, &as_original));
    assert!(!is_proposer_optimal(&market, &as_original).expect("small market"));
}

#[test]
fn three_by_three_engine_result_is_proposer_optimal() {
    let market = three_by_three();
    let outcome = DeferredAcceptance::default()
        .run(&market, &mut NoopObserver)
        .expect("run succeeds");

    assert!(is_proposer_optimal(&market, &outcome.matching).expect("small market"));
    assert_eq!(stable_matchings(&market).expect("small market").len(), 2);
}

// ============================================================================
// Unequal markets
// ============================================================================

/// Four proposers, three responders: exactly one proposer ends single.
///
/// Everyone ranks r1 > r2 > r3; responders all rank p1 > p2 > p3 > p4.
/// p4 is turned away by r1, r2 and r3 in turn.
#[test]
fn four_proposers_three_responders() {
    let outcome = run(
        4,
        3,
        vec![vec![0, 1, 2]; 4],
        vec![vec![0, 1, 2, 3]; 3],
    )
    .expect("run succeeds");

    assert_eq!(outcome.final_singles, BTreeSet::from([p(4)]));
    assert_eq!(outcome.matching.matched_pairs(), 3);
    assert_eq!(outcome.matching.matched_pairs() + outcome.final_singles.len(), 4);
    assert_eq!(outcome.matching.unmatched_responders().count(), 0);
    assert_eq!(outcome.cursors[3], 3);
    assert_eq!(outcome.rounds_used, 3);
    assert!(outcome.rounds_used <= 12);
}

#[test]
fn four_proposers_three_responders_mixed_preferences() {
    let market = Market::from_one_based(
        &[vec![2, 1, 3], vec![1, 3, 2], vec![2, 3, 1], vec![1, 2, 3]],
        &[vec![4, 2, 1, 3], vec![3, 1, 4, 2], vec![2, 4, 3, 1]],
    )
    .expect("valid market");
    let outcome = DeferredAcceptance::default()
        .run(&market, &mut NoopObserver)
        .expect("run succeeds");

    assert_eq!(outcome.final_singles.len(), 1);
    assert_eq!(outcome.matching.matched_pairs(), 3);
    assert!(is_stable(&market, &outcome.matching));
    assert!(is_proposer_optimal(&market, &outcome.matching).expect("small market"));

    let single = *outcome.final_singles.iter().next().expect("one single");
    assert_eq!(outcome.partner(single), None);
    assert_eq!(outcome.cursors[single.index()], 3);
}

/// Two proposers, four responders: every proposer is matched, two responders are not.
#[test]
fn two_proposers_four_responders() {
    let market = Market::from_one_based(
        &[vec![3, 1, 2, 4], vec![3, 4, 1, 2]],
        &[vec![1, 2], vec![2, 1], vec![2, 1], vec![1, 2]],
    )
    .expect("valid market");
    let outcome = DeferredAcceptance::default()
        .run(&market, &mut NoopObserver)
        .expect("run succeeds");

    // Round 1: both offer to r3, who keeps p2. Round 2: p1 -> r1.
    assert_eq!(outcome.holder(r(3)), Some(p(2)));
    assert_eq!(outcome.holder(r(1)), Some(p(1)));
    assert_eq!(outcome.rounds_used, 2);
    assert!(outcome.final_singles.is_empty());
    assert_eq!(
        outcome.matching.unmatched_responders().collect::<Vec<_>>(),
        vec![r(2), r(4)]
    );
}

// ============================================================================
// Boundaries
// ============================================================================

#[test]
fn one_by_one() {
    let mut recorder = RecordingObserver::new();
    let market = Market::new(vec![vec![0]], vec![vec![0]]).expect("valid market");

    let outcome = DeferredAcceptance::default()
        .run(&market, &mut recorder)
        .expect("run succeeds");

    assert_eq!(outcome.rounds_used, 1);
    assert_eq!(outcome.holder(r(1)), Some(p(1)));
    assert_eq!(recorder.rounds.len(), 1);
    assert_eq!(recorder.rounds[0].statuses, vec![ProposerStatus::Held(r(1))]);
}

#[test]
fn one_responder_many_proposers() {
    // r1 ranks p3 first; everyone else exhausts in round 1.
    let outcome = run(3, 1, vec![vec![0]; 3], vec![vec![2, 0, 1]]).expect("run succeeds");

    assert_eq!(outcome.rounds_used, 1);
    assert_eq!(outcome.holder(r(1)), Some(p(3)));
    assert_eq!(outcome.final_singles, BTreeSet::from([p(1), p(2)]));
    assert_eq!(outcome.history[0].newly_exhausted, 2);
}

// ============================================================================
// Configuration errors
// ============================================================================

#[test]
fn malformed_lists_fail_before_round_zero() {
    let cases = [
        // wrong length
        (vec![vec![0], vec![1, 0]], vec![vec![0, 1], vec![1, 0]]),
        // duplicate
        (vec![vec![0, 0], vec![1, 0]], vec![vec![0, 1], vec![1, 0]]),
        // out of range
        (vec![vec![0, 1], vec![1, 0]], vec![vec![0, 2], vec![1, 0]]),
    ];

    for (proposer_prefs, responder_prefs) in cases {
        let err = run(2, 2, proposer_prefs, responder_prefs).expect_err("must fail");
        assert!(matches!(err, MatchError::Config(_)), "{err}");
        assert!(err.state().is_none(), "no partial state on config errors");
    }
}

#[test]
fn declared_sizes_must_match_lists() {
    let err = run(3, 2, vec![vec![0, 1]; 2], vec![vec![0, 1]; 2]).expect_err("must fail");
    assert!(matches!(err, MatchError::Config(ConfigError::RowCount { .. })));

    let err = run(2, 0, vec![vec![], vec![]], vec![]).expect_err("must fail");
    assert!(matches!(err, MatchError::Config(ConfigError::EmptyMarket { .. })));
}
