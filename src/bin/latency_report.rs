use hdrhistogram::Histogram;
use rackfill::{Command, Engine, PlaceRequest};
use std::time::Instant;

const PART_POOL: &[&str] = &["TSP", "TSA", "PDE", "PTD", "FTE", "QTD", "CBD", "CBE", "ZZZ"];

fn main() {
    println!("Preparing Allocation Latency Benchmark...");

    // Setup
    let mut engine = Engine::new();

    let mut histogram = Histogram::<u64>::new_with_bounds(1, 100_000, 3).unwrap();

    const ITERATIONS: u64 = 1_000_000;
    // Reset the overlay periodically so slots never run out and every
    // iteration measures a real selection, not a full-scan miss
    const BATCH_SIZE: u64 = 500;

    println!("Running {} iterations...", ITERATIONS);

    let mut total_duration = std::time::Duration::new(0, 0);

    for i in 0..ITERATIONS {
        if i % BATCH_SIZE == 0 {
            engine.begin_batch();
        }

        let part = PART_POOL[(i % PART_POOL.len() as u64) as usize];
        let cmd = Command::Place(PlaceRequest::new(part, "P-1").unwrap());

        // Critical measurement section
        let start = Instant::now();

        // Use black_box to prevent compiler optimization
        std::hint::black_box(engine.process_command(cmd));

        let elapsed = start.elapsed();

        // Record nanoseconds; drop outliers instead of panicking
        histogram.record(elapsed.as_nanos() as u64).unwrap_or(());
        total_duration += elapsed;
    }

    println!("\n=== Allocation Latency Report (ns) ===");
    println!("Total Ops:  {}", ITERATIONS);
    println!(
        "Throughput: {:.2} ops/sec",
        ITERATIONS as f64 / total_duration.as_secs_f64()
    );
    println!("---------------------------");
    println!("Min:    {:6} ns", histogram.min());
    println!("P50:    {:6} ns", histogram.value_at_quantile(0.50));
    println!("P90:    {:6} ns", histogram.value_at_quantile(0.90));
    println!("P99:    {:6} ns", histogram.value_at_quantile(0.99));
    println!("P99.9:  {:6} ns", histogram.value_at_quantile(0.999));
    println!("P99.99: {:6} ns", histogram.value_at_quantile(0.9999));
    println!("Max:    {:6} ns", histogram.max());
    println!("---------------------------");

    // Quick ASCII histogram
    println!("\nDistribution:");
    for v in histogram.iter_log(100_000, 2.0) {
        let count = v.count_at_value();
        if count > 0 {
            println!(
                "{:6} ns - {:6} ns: {:10} count",
                v.value_iterated_to(),
                v.value_iterated_to(),
                count
            );
        }
    }
}
