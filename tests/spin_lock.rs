use fanpool::SpinLock;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

#[test]
fn critical_sections_never_overlap() {
    let lock = Arc::new(SpinLock::new());
    let in_section = Arc::new(AtomicBool::new(false));
    let entries = Arc::new(AtomicUsize::new(0));

    let mut handles = Vec::new();
    for _ in 0..4 {
        let lock = Arc::clone(&lock);
        let in_section = Arc::clone(&in_section);
        let entries = Arc::clone(&entries);
        handles.push(thread::spawn(move || {
            for _ in 0..1_000 {
                lock.lock();
                assert!(
                    !in_section.swap(true, Ordering::SeqCst),
                    "two threads inside the critical section"
                );
                entries.fetch_add(1, Ordering::SeqCst);
                in_section.store(false, Ordering::SeqCst);
                lock.unlock();
            }
        }));
    }
    for h in handles {
        h.join().unwrap();
    }

    assert_eq!(entries.load(Ordering::SeqCst), 4_000);
    assert!(!lock.is_locked());
}

#[test]
fn try_lock_fails_while_held_and_succeeds_after_unlock() {
    let lock = Arc::new(SpinLock::new());
    lock.lock();

    let contender = Arc::clone(&lock);
    let held = thread::spawn(move || contender.try_lock()).join().unwrap();
    assert!(!held);

    lock.unlock();
    let contender = Arc::clone(&lock);
    let acquired = thread::spawn(move || contender.try_lock()).join().unwrap();
    assert!(acquired);
    lock.unlock();
}

#[test]
fn is_locked_tracks_the_flag() {
    let lock = SpinLock::new();
    assert!(!lock.is_locked());
    lock.lock();
    assert!(lock.is_locked());
    lock.unlock();
    assert!(!lock.is_locked());
}

#[test]
fn default_is_unheld() {
    let lock = SpinLock::default();
    assert!(!lock.is_locked());
    assert!(lock.try_lock());
    lock.unlock();
}
