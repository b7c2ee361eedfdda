//! Stress tests for the stable-marriage engine.
//!
//! These tests verify:
//! 1. Deferred acceptance stays within N² proposals at large N
//! 2. Enumeration stays correct on many mid-size instances
//! 3. Determinism is preserved across runs
//!
//! ## Running Stress Tests
//!
//! ```bash
//! # Run all stress tests (release mode recommended)
//! cargo test --release --test stress_test -- --nocapture
//!
//! # Run specific test
//! cargo test --release --test stress_test stress_large_solve -- --nocapture
//! ```

use std::time::Instant;

use stable_marriage::{is_stable, Instance, MatchingEngine};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

// ============================================================================
// TEST CONSTANTS
// ============================================================================

/// Size of the large deferred-acceptance run
const LARGE_SIZE: usize = 500;

/// Instances enumerated by the batch test
const BATCH_COUNT: usize = 2_000;

/// Largest size used by the batch test
const BATCH_MAX_SIZE: usize = 10;

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

/// Generate deterministic instances for stress testing.
///
/// Sizes are drawn from `2..=max_size`. Same seed = same instances.
fn generate_deterministic_instances(count: usize, max_size: usize, seed: u64) -> Vec<Instance> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let size = rng.gen_range(2..=max_size);
            Instance::random_with(size, &mut rng)
        })
        .collect()
}

/// Enumerate every instance of a seeded batch and return all matching codes.
fn run_deterministic_sequence(seed: u64, count: usize) -> Vec<String> {
    generate_deterministic_instances(count, 8, seed)
        .iter()
        .flat_map(|instance| {
            let mut codes = vec![instance.encode()];
            for matching in MatchingEngine::new(instance).quick_all_stable() {
                codes.push(matching.encode().unwrap());
            }
            codes
        })
        .collect()
}

// ============================================================================
// STRESS TESTS
// ============================================================================

/// Deferred acceptance on one large instance.
#[test]
fn stress_large_solve() {
    println!("\n=== STRESS TEST: Deferred Acceptance, N = {} ===\n", LARGE_SIZE);

    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let gen_start = Instant::now();
    let instance = Instance::random_with(LARGE_SIZE, &mut rng);
    println!("  Generated in {:.2?}", gen_start.elapsed());

    let mut engine = MatchingEngine::new(&instance);
    let start = Instant::now();
    let matching = engine.solve();
    let elapsed = start.elapsed();

    println!("\n=== RESULTS ===");
    println!("  Proposals:         {:>12}", engine.proposals());
    println!("  Bound (N²):        {:>12}", LARGE_SIZE * LARGE_SIZE);
    println!("  Score A:           {:>12}", matching.score_a());
    println!("  Score B:           {:>12}", matching.score_b());
    println!("  Elapsed time:      {:>12.2?}", elapsed);

    assert!(matching.is_complete());
    assert!(engine.proposals() <= (LARGE_SIZE * LARGE_SIZE) as u64);
    assert!(is_stable(&instance, &matching));

    println!("\n=== STRESS TEST PASSED ===\n");
}

/// Enumerate all stable matchings of many random instances.
#[test]
fn stress_enumeration_batch() {
    println!("\n=== ENUMERATION BATCH ===\n");

    let instances = generate_deterministic_instances(BATCH_COUNT, BATCH_MAX_SIZE, 7);
    let start = Instant::now();

    let mut total = 0;
    let mut most = 0;
    let mut breaks = 0;
    for instance in &instances {
        let mut engine = MatchingEngine::new(instance);
        let all = engine.quick_all_stable();
        for matching in &all {
            assert!(is_stable(instance, matching), "instance {}", instance.encode());
        }
        total += all.len();
        most = most.max(all.len());
        breaks += engine.breaks_attempted();
    }

    let elapsed = start.elapsed();
    println!("  Instances:         {:>12}", BATCH_COUNT);
    println!("  Stable matchings:  {:>12}", total);
    println!("  Most per instance: {:>12}", most);
    println!("  Breaks attempted:  {:>12}", breaks);
    println!("  Elapsed time:      {:>12.2?}", elapsed);

    assert!(total >= BATCH_COUNT);
    assert!(most > 1, "expected some instance with several matchings");

    println!("\n=== ENUMERATION BATCH PASSED ===\n");
}

/// Verify determinism: the same seed produces identical instances and
/// matchings, in the same order.
#[test]
fn verify_determinism() {
    println!("\n=== DETERMINISM TEST ===\n");

    const TEST_COUNT: usize = 200;
    const SEED: u64 = 12345;

    let run1 = run_deterministic_sequence(SEED, TEST_COUNT);
    let run2 = run_deterministic_sequence(SEED, TEST_COUNT);
    println!("  Codes per run:     {:>12}", run1.len());
    assert_eq!(run1, run2, "Runs must produce identical codes");

    let run3 = run_deterministic_sequence(SEED + 1, TEST_COUNT);
    assert_ne!(run1, run3, "Different seeds should produce different instances");

    println!("\n=== DETERMINISM VERIFIED ===\n");
}

/// Deferred acceptance timing across sizes.
#[test]
fn stress_scaling() {
    println!("\n=== SCALING TEST ===\n");

    let test_sizes = [10, 50, 100, 250];

    println!("{:>12} {:>12} {:>12} {:>12}", "Size", "Time", "Proposals", "Per N²");
    println!("{:-<12} {:-<12} {:-<12} {:-<12}", "", "", "", "");

    for &size in &test_sizes {
        let mut rng = ChaCha8Rng::seed_from_u64(size as u64);
        let instance = Instance::random_with(size, &mut rng);
        let mut engine = MatchingEngine::new(&instance);

        let start = Instant::now();
        engine.solve();
        let elapsed = start.elapsed();

        let ratio = engine.proposals() as f64 / (size * size) as f64;
        println!(
            "{:>12} {:>12.2?} {:>12} {:>12.3}",
            size,
            elapsed,
            engine.proposals(),
            ratio
        );
        assert!(ratio <= 1.0);
    }

    println!("\n=== SCALING TEST COMPLETE ===\n");
}
