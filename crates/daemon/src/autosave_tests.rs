// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn counter() -> (Arc<AtomicUsize>, impl Fn() -> std::pin::Pin<Box<dyn Future<Output = ()> + Send>> + Clone) {
    let count = Arc::new(AtomicUsize::new(0));
    let flushed = count.clone();
    let flush = move || {
        let flushed = flushed.clone();
        Box::pin(async move {
            flushed.fetch_add(1, Ordering::SeqCst);
        }) as std::pin::Pin<Box<dyn Future<Output = ()> + Send>>
    };
    (count, flush)
}

#[tokio::test(start_paused = true)]
async fn flushes_once_after_the_debounce_window() {
    let (count, flush) = counter();
    let scheduler =
        AutosaveScheduler::spawn(Duration::from_millis(50), Duration::from_millis(250), flush);

    scheduler.touch();
    tokio::time::sleep(Duration::from_millis(60)).await;
    assert_eq!(count.load(Ordering::SeqCst), 1);

    scheduler.stop().await;
}

#[tokio::test(start_paused = true)]
async fn repeated_touches_reset_the_debounce_window() {
    let (count, flush) = counter();
    let scheduler =
        AutosaveScheduler::spawn(Duration::from_millis(50), Duration::from_millis(250), flush);

    for _ in 0..4 {
        scheduler.touch();
        tokio::time::sleep(Duration::from_millis(30)).await;
    }
    assert_eq!(count.load(Ordering::SeqCst), 0, "debounce kept resetting, no flush yet");

    tokio::time::sleep(Duration::from_millis(60)).await;
    assert_eq!(count.load(Ordering::SeqCst), 1);

    scheduler.stop().await;
}

#[tokio::test(start_paused = true)]
async fn continuous_touches_still_flush_by_the_max_flush_deadline() {
    let (count, flush) = counter();
    let scheduler =
        AutosaveScheduler::spawn(Duration::from_millis(50), Duration::from_millis(250), flush);

    // Touch every 30ms, well inside the debounce window each time, for
    // longer than max_flush — the cap must still force a flush.
    for _ in 0..10 {
        scheduler.touch();
        tokio::time::sleep(Duration::from_millis(30)).await;
    }

    assert!(count.load(Ordering::SeqCst) >= 1, "max_flush cap should have forced a flush");

    scheduler.stop().await;
}

#[tokio::test(start_paused = true)]
async fn flush_now_flushes_immediately_and_clears_pending_state() {
    let (count, flush) = counter();
    let scheduler =
        AutosaveScheduler::spawn(Duration::from_millis(50), Duration::from_millis(250), flush);

    scheduler.touch();
    scheduler.flush_now().await;
    assert_eq!(count.load(Ordering::SeqCst), 1);

    // No further flush should fire from the touch that was just flushed.
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(count.load(Ordering::SeqCst), 1);

    scheduler.stop().await;
}

#[tokio::test(start_paused = true)]
async fn stop_flushes_a_still_pending_edit() {
    let (count, flush) = counter();
    let scheduler =
        AutosaveScheduler::spawn(Duration::from_millis(50), Duration::from_millis(250), flush);

    scheduler.touch();
    scheduler.stop().await;

    assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn idle_scheduler_never_flushes() {
    let (count, flush) = counter();
    let scheduler =
        AutosaveScheduler::spawn(Duration::from_millis(50), Duration::from_millis(250), flush);

    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(count.load(Ordering::SeqCst), 0);

    scheduler.stop().await;
}
