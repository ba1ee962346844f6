//! Integration test: shared documents under concurrent tasks on a multi-thread runtime.

mod common;

use chrono::{Duration, Utc};
use common::{harness, store_in};
use raki_core::{ConversationLog, Language, ReminderBook, ReminderSet};
use raki_voice::ScriptedVoice;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Barrier;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_adds_and_passes_lose_nothing_and_fire_once() {
    let dir = tempfile::tempdir().unwrap();
    let book = ReminderBook::open(store_in(dir.path()));
    let now = Utc::now();
    let writers = 8;
    let per_writer = 25;
    let barrier = Arc::new(Barrier::new(writers + 1));

    let mut adders = Vec::new();
    for w in 0..writers {
        let book = book.clone();
        let barrier = barrier.clone();
        adders.push(tokio::spawn(async move {
            barrier.wait().await;
            for i in 0..per_writer {
                // Every other reminder is already due.
                let due = if i % 2 == 0 { now - Duration::seconds(1) } else { now + Duration::hours(1) };
                book.add(format!("w{}-{}", w, i), due, now).await;
                tokio::task::yield_now().await;
            }
        }));
    }

    let scheduler = {
        let book = book.clone();
        let barrier = barrier.clone();
        tokio::spawn(async move {
            barrier.wait().await;
            let mut fired = Vec::new();
            for _ in 0..200 {
                fired.extend(book.take_due(now).await);
                tokio::task::yield_now().await;
            }
            fired
        })
    };

    for adder in adders {
        adder.await.unwrap();
    }
    let mut fired = scheduler.await.unwrap();
    fired.extend(book.take_due(now).await);
    let pending = book.snapshot().await;

    let total = writers * per_writer;
    assert_eq!(fired.len() + pending.len(), total);
    assert_eq!(fired.len(), writers * per_writer.div_ceil(2));
    let fired_texts: HashSet<_> = fired.iter().map(|r| r.text.clone()).collect();
    assert_eq!(fired_texts.len(), fired.len(), "a reminder fired twice");
    assert!(pending.0.iter().all(|r| !fired_texts.contains(&r.text)));

    // What is on disk matches memory once everything has settled.
    let reopened = ReminderBook::open(store_in(dir.path()));
    assert_eq!(reopened.snapshot().await, pending);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn wipe_during_scheduler_pass_stays_wiped() {
    for _ in 0..100 {
        let dir = tempfile::tempdir().unwrap();
        let h = harness(dir.path(), ScriptedVoice::new(Vec::<String>::new()));
        let now = Utc::now();
        h.ctx.reminders.add("due now", now - Duration::seconds(1), now).await;
        h.ctx.reminders.add("secret later", now + Duration::hours(1), now).await;
        h.ctx.conversation.record("my secret", "noted", Language::English).await;

        let barrier = Arc::new(Barrier::new(2));
        let pass = {
            let book = h.ctx.reminders.clone();
            let barrier = barrier.clone();
            tokio::spawn(async move {
                barrier.wait().await;
                book.take_due(now).await
            })
        };
        let wipe = {
            let ctx = h.ctx.clone();
            let barrier = barrier.clone();
            tokio::spawn(async move {
                barrier.wait().await;
                ctx.wipe_history().await
            })
        };
        pass.await.unwrap();
        wipe.await.unwrap().unwrap();

        assert!(!h.ctx.store.exists::<ReminderSet>(), "wiped reminders came back on disk");
        assert!(!h.ctx.store.exists::<ConversationLog>());
        assert_eq!(h.ctx.reminders.len().await, 0);
        assert_eq!(h.ctx.conversation.len().await, 0);
    }
}
