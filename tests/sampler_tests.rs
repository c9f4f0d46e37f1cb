use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};
use toolbelt::calltree::{Frame, RenderLimits, TreeState};
use toolbelt::commands::DemoWorkload;
use toolbelt::sampler::{enter, register_current, unregister, Sampler};
use toolbelt::utils::error::SamplerError;

#[test]
fn test_start_then_stop_yields_root_only() {
    let mut sampler = Sampler::new(1_000).unwrap();
    sampler.start_current_thread("main").unwrap();
    let tree = sampler.stop().unwrap();

    assert_eq!(tree.total_samples(), 0);
    assert_eq!(tree.node_count(), 1);
    assert_eq!(tree.state(), TreeState::Frozen);
    assert!(tree.root().frame().is_root());
}

#[test]
fn test_sample_count_tracks_elapsed_ticks() {
    let interval = 10;
    let ticks = 10;

    let mut sampler = Sampler::new(interval).unwrap();
    let started = Instant::now();
    let ((), tree) = sampler
        .profile("busy", || {
            let _frame = enter("Busy", "spin");
            while started.elapsed() < Duration::from_millis(interval as u64 * ticks) {
                std::hint::spin_loop();
            }
        })
        .unwrap();

    // Fixed-delay ticks can only fall behind, never run ahead
    let total = tree.total_samples();
    assert!(total >= 3, "too few samples: {}", total);
    assert!(total <= ticks + 1, "too many samples: {}", total);

    // Every sample saw the spinning frame or nothing at all
    let spin = tree.root().child(&Frame::new("Busy", "spin"));
    let observed = spin.map(|node| node.count()).unwrap_or(0);
    assert_eq!(observed + tree.root().self_count(), total);
}

#[test]
fn test_demo_workload_structure() {
    let workload = DemoWorkload::new(Duration::from_millis(400), 200);
    let mut sampler = Sampler::new(500).unwrap();

    let (_, tree) = sampler.profile("demo", || workload.run()).unwrap();

    // 0-1 samples expected; only the structure is asserted
    assert!(tree.root().frame().is_root());
    assert_eq!(tree.label(), "demo");
    assert!(tree.total_samples() <= 2);
    for child in tree.root().children().values() {
        assert!(child.count() <= tree.total_samples());
        assert_eq!(child.frame(), &Frame::new("DemoWorkload", "run"));
    }

    let text = tree.render_to_string(RenderLimits::default()).unwrap();
    assert!(text.starts_with(&format!("{} ", tree.total_samples())));
}

#[test]
fn test_sample_named_thread() {
    let label = "sampler-tests-worker";
    let (ready_tx, ready_rx) = mpsc::channel();
    let (done_tx, done_rx) = mpsc::channel::<()>();

    let worker = thread::spawn(move || {
        register_current(label);
        let _outer = enter("Worker", "serve");
        let _inner = enter("Worker", "wait");
        ready_tx.send(()).unwrap();
        done_rx.recv().unwrap();
    });

    ready_rx.recv().unwrap();

    let mut sampler = Sampler::new(2).unwrap();
    sampler.start_named(label).unwrap();
    thread::sleep(Duration::from_millis(40));
    let tree = sampler.stop().unwrap();

    done_tx.send(()).unwrap();
    worker.join().unwrap();
    unregister(label);

    assert!(tree.total_samples() > 0);
    assert_eq!(tree.missed_samples(), 0);
    let serve = tree.root().child(&Frame::new("Worker", "serve")).unwrap();
    let wait = serve.child(&Frame::new("Worker", "wait")).unwrap();
    assert_eq!(wait.count(), tree.total_samples());
}

#[test]
fn test_terminated_thread_counts_missed_samples() {
    let label = "sampler-tests-short-lived";
    let (ready_tx, ready_rx) = mpsc::channel();
    let (exit_tx, exit_rx) = mpsc::channel::<()>();

    let worker = thread::spawn(move || {
        register_current(label);
        ready_tx.send(()).unwrap();
        exit_rx.recv().unwrap();
    });
    ready_rx.recv().unwrap();

    let mut sampler = Sampler::new(2).unwrap();
    sampler.start_named(label).unwrap();
    exit_tx.send(()).unwrap();
    worker.join().unwrap();
    thread::sleep(Duration::from_millis(30));

    let tree = sampler.stop().unwrap();
    unregister(label);

    assert!(tree.missed_samples() > 0);
}

#[test]
fn test_stop_twice_fails() {
    let mut sampler = Sampler::new(5).unwrap();
    sampler.start_current_thread("main").unwrap();
    sampler.stop().unwrap();

    assert!(matches!(sampler.stop(), Err(SamplerError::NotStarted)));
}

#[test]
fn test_sampler_is_reusable_after_stop() {
    let mut sampler = Sampler::new(5).unwrap();

    sampler.start_current_thread("first").unwrap();
    let first = sampler.stop().unwrap();

    sampler.start_current_thread("second").unwrap();
    let second = sampler.stop().unwrap();

    assert_eq!(first.label(), "first");
    assert_eq!(second.label(), "second");
}
