//! Stress tests for the slot pool

use slotpool::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

fn pool(n: usize) -> Arc<SlotPool> {
    let config = Config::builder()
        .num_threads(n)
        .panic_strategy(PanicStrategy::Isolate)
        .build()
        .unwrap();
    Arc::new(SlotPool::new(&config).unwrap())
}

#[test]
#[ignore] // Run with --ignored flag
fn stress_many_submission_cycles() {
    let pool = pool(4);
    let counter = Arc::new(AtomicUsize::new(0));

    for _ in 0..10_000 {
        let counter = counter.clone();
        // saturation is expected; retry with the handed-back routine
        let mut routine: Option<TaskFn> = Some(Box::new(move || {
            counter.fetch_add(1, Ordering::Relaxed);
        }));
        loop {
            match pool.submit(routine.take()) {
                Ok(_) => break,
                Err(NoFreeSlot(rejected)) => {
                    routine = rejected;
                    thread::yield_now();
                }
            }
        }
    }

    pool.wait_for_mine();
    assert_eq!(counter.load(Ordering::Relaxed), 10_000);
    assert_eq!(pool.ready_slots(), 4);
}

#[test]
#[ignore]
fn stress_concurrent_submitters() {
    let pool = pool(8);
    let counter = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let pool = pool.clone();
            let counter = counter.clone();
            thread::spawn(move || {
                let dispatcher = Dispatcher::new(pool.clone());
                for _ in 0..1_000 {
                    let counter = counter.clone();
                    dispatcher.fire_and_forget((), move |_| {
                        counter.fetch_add(1, Ordering::Relaxed);
                    });
                }
                pool.wait_for_mine();
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    // Every task either ran on a worker or fell back inline; either way
    // all of them completed.
    assert_eq!(counter.load(Ordering::Relaxed), 8_000);
    assert_eq!(pool.total_busy_slots(), 0);
}

#[test]
#[ignore]
fn stress_panic_storm() {
    let pool = pool(4);

    let mut submitted = 0;
    while submitted < 1_000 {
        if pool.execute(|| panic!("storm")).is_ok() {
            submitted += 1;
        } else {
            thread::yield_now();
        }
    }

    pool.wait_for_mine();
    assert_eq!(pool.panic_count(), 1_000);
    assert_eq!(pool.ready_slots(), 4);

    // still functional after the storm
    let counter = Arc::new(AtomicUsize::new(0));
    let counter2 = counter.clone();
    while pool.execute({
        let counter2 = counter2.clone();
        move || {
            counter2.fetch_add(1, Ordering::Relaxed);
        }
    })
    .is_err()
    {
        thread::yield_now();
    }
    pool.wait_for_mine();
    assert_eq!(counter.load(Ordering::Relaxed), 1);
}

#[test]
#[ignore]
fn stress_repeated_construct_and_drop() {
    for _ in 0..100 {
        let pool = pool(4);
        let dispatcher = Dispatcher::new(pool.clone());
        dispatcher.submit_and_wait((), |_| {});
        drop(dispatcher);
        drop(pool);
    }
}
