//! ```bash
//! RUSTFLAGS="-C target-cpu=native" cargo run --example load_test --release
//! ```

use std::sync::Arc;
use std::time::Instant;

use kdvox::{Ensemble, KdTree, Linear, MetricKind, SearchMethod, Voxel};
use rand::{rngs::StdRng, Rng, SeedableRng};

/// A representative low-to-moderate dimension for spatial point data.
const DIM: usize = 6;
/// Number of points to generate for the load test.
const N_POINTS: usize = 100_000;
/// Number of queries to run for verification.
const N_QUERIES: usize = 200;
/// `k` used for the k-nearest-neighbor queries.
const K: usize = 10;
/// Deterministic seed for reproducibility.
const SEED: u64 = 42;

fn random_point(rng: &mut StdRng, dim: usize) -> Vec<f64> {
    (0..dim).map(|_| rng.gen::<f64>() * 1000.0).collect()
}

fn divider() {
    println!("{}", "─".repeat(60));
}

fn main() -> anyhow::Result<()> {
    println!("╔══════════════════════════════════════════════════════════╗");
    println!("║        kdvox Load Test & Cross-Backend Verifier           ║");
    println!("╚══════════════════════════════════════════════════════════╝");
    println!();

    // ── Phase 1: Data Generation ─────────────────────────────────────────
    divider();
    println!("Phase 1 — Generating random points");
    println!("  Points:    {N_POINTS}");
    println!("  Dimension: {DIM}");

    let t0 = Instant::now();
    let mut rng = StdRng::seed_from_u64(SEED);
    let points: Vec<Vec<f64>> = (0..N_POINTS).map(|_| random_point(&mut rng, DIM)).collect();
    let payloads: Vec<usize> = (0..N_POINTS).collect();
    println!("  Generated in {:?}", t0.elapsed());

    // ── Phase 2: Index construction ───────────────────────────────────────
    divider();
    println!("Phase 2 — Building all three backends");

    let t0 = Instant::now();
    let kdtree = KdTree::build(points.clone(), payloads.clone(), MetricKind::L2, None, None)?;
    let kdtree_build_duration = t0.elapsed();
    println!("  KdTree build:  {kdtree_build_duration:?}");

    let t0 = Instant::now();
    let voxel = Voxel::build(points.clone(), payloads.clone(), MetricKind::L2)?;
    let voxel_build_duration = t0.elapsed();
    println!("  Voxel build:   {voxel_build_duration:?}");

    let t0 = Instant::now();
    let linear = Linear::build(points.clone(), payloads.clone(), MetricKind::L2)?;
    let linear_build_duration = t0.elapsed();
    println!("  Linear build:  {linear_build_duration:?}");

    let members: Vec<Arc<dyn SearchMethod<f64, usize>>> = vec![
        Arc::new(KdTree::build(points.clone(), payloads.clone(), MetricKind::L2, None, None)?),
        Arc::new(Voxel::build(points.clone(), payloads.clone(), MetricKind::L2)?),
        Arc::new(Linear::build(points.clone(), payloads.clone(), MetricKind::L2)?),
    ];
    let ensemble = Ensemble::new(MetricKind::L2, members);

    // ── Phase 3: Baseline queries ──────────────────────────────────────────
    divider();
    println!("Phase 3 — Running {N_QUERIES} k-NN queries (k={K}) per backend");

    let mut query_rng = StdRng::seed_from_u64(SEED + 1);
    let queries: Vec<Vec<f64>> = (0..N_QUERIES).map(|_| random_point(&mut query_rng, DIM)).collect();

    let t0 = Instant::now();
    let kdtree_results: Vec<_> = queries.iter().map(|q| kdtree.nearest_neighbors(q, K)).collect();
    let kdtree_query_duration = t0.elapsed();

    let t0 = Instant::now();
    let voxel_results: Vec<_> = queries.iter().map(|q| voxel.nearest_neighbors(q, K)).collect();
    let voxel_query_duration = t0.elapsed();

    let t0 = Instant::now();
    let linear_results: Vec<_> = queries.iter().map(|q| linear.nearest_neighbors(q, K)).collect();
    let linear_query_duration = t0.elapsed();

    println!(
        "  KdTree:  {:?} total, {:.2} µs/query",
        kdtree_query_duration,
        kdtree_query_duration.as_micros() as f64 / N_QUERIES as f64
    );
    println!(
        "  Voxel:   {:?} total, {:.2} µs/query",
        voxel_query_duration,
        voxel_query_duration.as_micros() as f64 / N_QUERIES as f64
    );
    println!(
        "  Linear:  {:?} total, {:.2} µs/query",
        linear_query_duration,
        linear_query_duration.as_micros() as f64 / N_QUERIES as f64
    );

    // ── Phase 4: Cross-backend agreement ──────────────────────────────────
    divider();
    println!("Phase 4 — Verifying every backend agrees with the linear oracle");

    let mut kdtree_mismatches = 0usize;
    let mut voxel_mismatches = 0usize;

    for i in 0..N_QUERIES {
        let mut oracle_ids: Vec<usize> = linear_results[i].iter().map(|(_, id)| *id).collect();
        oracle_ids.sort_unstable();

        let mut kdtree_ids: Vec<usize> = kdtree_results[i].iter().map(|(_, id)| *id).collect();
        kdtree_ids.sort_unstable();
        if kdtree_ids != oracle_ids {
            kdtree_mismatches += 1;
        }

        let mut voxel_ids: Vec<usize> = voxel_results[i].iter().map(|(_, id)| *id).collect();
        voxel_ids.sort_unstable();
        if voxel_ids != oracle_ids {
            voxel_mismatches += 1;
        }
    }

    println!("  KdTree vs linear mismatches: {kdtree_mismatches}/{N_QUERIES}");
    println!("  Voxel vs linear mismatches:  {voxel_mismatches}/{N_QUERIES}");

    // ── Phase 5: Ensemble race ─────────────────────────────────────────────
    divider();
    println!("Phase 5 — Running {N_QUERIES} queries through the ensemble");

    let t0 = Instant::now();
    for query in &queries {
        let _ = ensemble.nearest_neighbor(query);
    }
    let ensemble_duration = t0.elapsed();
    println!(
        "  Ensemble nearest-1: {:?} total, {:.2} µs/query",
        ensemble_duration,
        ensemble_duration.as_micros() as f64 / N_QUERIES as f64
    );

    // ── Phase 6: Summary ───────────────────────────────────────────────────
    divider();
    if kdtree_mismatches == 0 && voxel_mismatches == 0 {
        println!("✅ Cross-backend agreement: PASSED");
    } else {
        println!("❌ Cross-backend agreement: FAILED");
    }

    println!();
    println!("Performance Summary");
    println!("──────────────────────────────────────────────────");
    println!("  KdTree build:  {kdtree_build_duration:?}");
    println!("  Voxel build:   {voxel_build_duration:?}");
    println!("  Linear build:  {linear_build_duration:?}");
    println!(
        "  KdTree query:  {:.2} µs/query",
        kdtree_query_duration.as_micros() as f64 / N_QUERIES as f64
    );
    println!(
        "  Voxel query:   {:.2} µs/query",
        voxel_query_duration.as_micros() as f64 / N_QUERIES as f64
    );
    println!(
        "  Linear query:  {:.2} µs/query",
        linear_query_duration.as_micros() as f64 / N_QUERIES as f64
    );
    println!("──────────────────────────────────────────────────");

    Ok(())
}
