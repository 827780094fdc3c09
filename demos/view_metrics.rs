use fanpool::{
    log_metrics,
    metrics::{AtomicMetricsCollector, ThreadPoolMetrics},
    ThreadPoolBuilder,
};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

fn main() {
    // Create metrics and collector
    let metrics = Arc::new(ThreadPoolMetrics::new());
    let collector = Arc::new(AtomicMetricsCollector::new(metrics.clone()));

    // Create a thread pool with the metrics collector
    let mut pool = ThreadPoolBuilder::new()
        .participants(4)
        .with_metrics_collector(collector)
        .build()
        .expect("failed to spawn pool workers");

    // Run a few batches with simulated work
    for batch in 0..5 {
        pool.batch_run(64, |_| {
            thread::sleep(Duration::from_millis(1));
        })
        .expect("batch failed");
        println!("--- After batch {} ---", batch);
        log_metrics!(metrics);
    }

    pool.stop();

    println!("--- Final Metrics ---");
    log_metrics!(metrics);
}
