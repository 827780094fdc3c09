use std::sync::atomic::{AtomicUsize, Ordering};

fn main() {
    let mut pool = fanpool::ThreadPoolBuilder::new()
        .participants(4)
        .build()
        .expect("failed to spawn pool workers");

    let sum = AtomicUsize::new(0);
    pool.batch_run(10, |i| {
        sum.fetch_add(i, Ordering::Relaxed);
    })
    .expect("batch failed");
    println!("Sum over 10 indices: {}", sum.load(Ordering::Relaxed));

    pool.run(|i| {
        println!("One job on participant slot {}", i);
    })
    .expect("run failed");

    pool.stop();
}
