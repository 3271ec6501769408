//! Many jobs at once: results must match what each job produces on its own.

mod common;

use std::collections::HashMap;
use std::fs;
use std::sync::Arc;

use common::*;
use density_fanout::job::{JobId, JobStatus};
use density_fanout::scheduler::FanoutScheduler;
use tokio::sync::mpsc;

const JOBS: u32 = 12;

fn file_name(i: u32) -> String {
    if i % 4 == 0 {
        format!("frame_{i}.9.png")
    } else {
        format!("icon_{i}.png")
    }
}

fn fixture(i: u32) -> densify_scale::PixelBuffer {
    if i % 4 == 0 {
        nine_patch(14 + i, 10 + i)
    } else {
        gradient_icon(24 + i * 3, 16 + i * 2, i)
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_parallel_outputs_match_sequential_runs() {
    let parallel = tempfile::tempdir().unwrap();
    let sequential = tempfile::tempdir().unwrap();
    for i in 0..JOBS {
        write_png(parallel.path(), &file_name(i), &fixture(i));
        write_png(sequential.path(), &file_name(i), &fixture(i));
    }

    let (tx, _rx) = mpsc::unbounded_channel();
    let mut scheduler = FanoutScheduler::new(small_catalog(), 6, Arc::new(tx)).unwrap();
    scheduler.submit_batch((0..JOBS).map(|i| parallel.path().join(file_name(i))), &mdpi());
    assert!(scheduler.wait().await.is_success());

    for i in 0..JOBS {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut scheduler = FanoutScheduler::new(small_catalog(), 1, Arc::new(tx)).unwrap();
        scheduler.submit(sequential.path().join(file_name(i)), mdpi());
        assert!(scheduler.wait().await.is_success());
    }

    for i in 0..JOBS {
        for density in ["ldpi", "mdpi", "hdpi"] {
            let name = file_name(i);
            assert_eq!(
                fs::read(output(parallel.path(), density, &name)).unwrap(),
                fs::read(output(sequential.path(), density, &name)).unwrap(),
                "{density}/{name} differs"
            );
        }
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_every_job_publishes_an_ordered_history() {
    let dir = tempfile::tempdir().unwrap();
    for i in 0..JOBS {
        write_png(dir.path(), &file_name(i), &fixture(i));
    }
    fs::write(dir.path().join("corrupt.png"), b"nope").unwrap();

    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut scheduler = FanoutScheduler::new(small_catalog(), 3, Arc::new(tx)).unwrap();
    let mut ids = scheduler.submit_batch((0..JOBS).map(|i| dir.path().join(file_name(i))), &mdpi());
    let corrupt = scheduler.submit(dir.path().join("corrupt.png"), mdpi());
    ids.push(corrupt);
    let report = scheduler.wait().await;

    assert_eq!(report.jobs.len(), ids.len());
    assert_eq!(report.finished().count(), JOBS as usize);
    assert_eq!(report.failed().count(), 1);

    let updates = drain(&mut rx);
    for &id in &ids {
        let seen = history(&updates, id);
        if id == corrupt {
            assert_eq!(seen, vec!["pending", "error"]);
        } else {
            assert_eq!(seen, vec!["pending", "in progress", "finished"]);
        }
    }

    let last: HashMap<JobId, &JobStatus> = updates.iter().map(|u| (u.id, &u.status)).collect();
    assert!(last.values().all(|status| status.is_terminal()));
    assert!(is_error(last[&corrupt]));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_shared_output_folders_are_created_once() {
    let dir = tempfile::tempdir().unwrap();
    let icon = gradient_icon(32, 32, 7);
    let sources: Vec<_> = (0..16)
        .map(|i| write_png(dir.path(), &format!("same_{i}.png"), &icon))
        .collect();

    let (tx, _rx) = mpsc::unbounded_channel();
    let mut scheduler = FanoutScheduler::new(small_catalog(), 8, Arc::new(tx)).unwrap();
    scheduler.submit_batch(sources, &mdpi());
    assert!(scheduler.wait().await.is_success());

    for density in ["ldpi", "mdpi", "hdpi"] {
        let folder = dir.path().join(format!("drawable-{density}"));
        assert_eq!(fs::read_dir(&folder).unwrap().count(), 16);
    }
    let reference = fs::read(output(dir.path(), "hdpi", "same_0.png")).unwrap();
    for i in 1..16 {
        assert_eq!(fs::read(output(dir.path(), "hdpi", &format!("same_{i}.png"))).unwrap(), reference);
    }
}
