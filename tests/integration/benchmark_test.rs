//! Integration tests for the benchmark runner.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use colviz::benchmark::{
    AbortSignal, BenchmarkProgress, BenchmarkRunner, BenchmarkStatus, HeadlessSurface,
    RenderSurface, SubTestResult, Workload, FAILED_SUBTEST_SCORE,
};

/// Headless surface that counts the uploads it receives.
struct CountingSurface {
    inner: HeadlessSurface,
    vertex_uploads: Arc<AtomicUsize>,
    uniform_uploads: Arc<AtomicUsize>,
}

impl CountingSurface {
    fn new() -> (Self, Arc<AtomicUsize>, Arc<AtomicUsize>) {
        let vertex_uploads = Arc::new(AtomicUsize::new(0));
        let uniform_uploads = Arc::new(AtomicUsize::new(0));
        let surface = Self {
            inner: HeadlessSurface::new(2048),
            vertex_uploads: Arc::clone(&vertex_uploads),
            uniform_uploads: Arc::clone(&uniform_uploads),
        };
        (surface, vertex_uploads, uniform_uploads)
    }
}

impl RenderSurface for CountingSurface {
    fn upload_vertices(&mut self, bytes: &[u8]) -> SubTestResult<()> {
        self.vertex_uploads.fetch_add(1, Ordering::SeqCst);
        self.inner.upload_vertices(bytes)
    }

    fn upload_uniforms(&mut self, bytes: &[u8]) -> SubTestResult<()> {
        self.uniform_uploads.fetch_add(1, Ordering::SeqCst);
        self.inner.upload_uniforms(bytes)
    }

    fn max_texture_size(&self) -> SubTestResult<u32> {
        self.inner.max_texture_size()
    }

    fn allocate_texture(&mut self, size: u32) -> SubTestResult<()> {
        self.inner.allocate_texture(size)
    }
}

fn recorder() -> (Arc<Mutex<Vec<BenchmarkProgress>>>, impl FnMut(BenchmarkProgress) + Send) {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    (events, move |p| sink.lock().unwrap().push(p))
}

#[tokio::test]
async fn test_full_run_reports_progress() {
    let runner = BenchmarkRunner::new(HeadlessSurface::new(4096));
    let (events, callback) = recorder();

    let result = runner.run(callback, &AbortSignal::new()).await;
    let events = events.lock().unwrap();

    assert_eq!(events.first().map(|e| e.status), Some(BenchmarkStatus::Starting));
    assert_eq!(events.last().map(|e| e.status), Some(BenchmarkStatus::Complete));
    assert_eq!(events.last().unwrap().result.as_ref(), Some(&result));
    assert!(events.windows(2).all(|w| w[1].progress >= w[0].progress));
    assert!(events.iter().any(|e| e.status == BenchmarkStatus::Rendering));
    assert!(events.iter().any(|e| e.status == BenchmarkStatus::Cpu));

    assert!(!result.partial);
    assert_eq!(result.subtests.len(), Workload::ALL.len());
    for score in [result.render_score, result.cpu_score, result.combined_score] {
        assert!((0.0..=100.0).contains(&score));
    }
}

#[tokio::test]
async fn test_result_is_memoized() {
    let runner = BenchmarkRunner::new(HeadlessSurface::new(2048));
    let first = runner.run(|_| {}, &AbortSignal::new()).await;

    let (events, callback) = recorder();
    let second = runner.run(callback, &AbortSignal::new()).await;

    assert_eq!(first, second);
    assert_eq!(events.lock().unwrap().len(), 1);

    runner.reset().await;
    assert!(runner.cached().await.is_none());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_runs_share_result() {
    let runner = Arc::new(BenchmarkRunner::new(HeadlessSurface::new(2048)));

    let tasks: Vec<_> = (0..4)
        .map(|_| {
            let runner = Arc::clone(&runner);
            tokio::spawn(async move { runner.run(|_| {}, &AbortSignal::new()).await })
        })
        .collect();

    let mut results = Vec::new();
    for task in tasks {
        results.push(task.await.unwrap());
    }
    assert!(results.windows(2).all(|w| w[0] == w[1]));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_runs_measure_once() {
    let (solo_surface, solo_vertices, solo_uniforms) = CountingSurface::new();
    BenchmarkRunner::new(solo_surface)
        .run(|_| {}, &AbortSignal::new())
        .await;
    let per_battery = (
        solo_vertices.load(Ordering::SeqCst),
        solo_uniforms.load(Ordering::SeqCst),
    );
    assert!(per_battery.0 > 0 && per_battery.1 > 0);

    let (surface, vertices, uniforms) = CountingSurface::new();
    let runner = Arc::new(BenchmarkRunner::new(surface));
    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let runner = Arc::clone(&runner);
            tokio::spawn(async move { runner.run(|_| {}, &AbortSignal::new()).await })
        })
        .collect();
    for task in tasks {
        task.await.unwrap();
    }

    assert_eq!(
        (vertices.load(Ordering::SeqCst), uniforms.load(Ordering::SeqCst)),
        per_battery
    );
}

#[tokio::test]
async fn test_abort_mid_run_returns_partial() {
    let runner = BenchmarkRunner::new(HeadlessSurface::new(2048));
    let abort = AbortSignal::new();
    let trigger = abort.clone();

    let result = runner
        .run(
            move |p| {
                if p.status == BenchmarkStatus::Cpu {
                    trigger.abort();
                }
            },
            &abort,
        )
        .await;

    assert!(result.partial);
    assert!(result.subtests.len() < Workload::ALL.len());
    assert_eq!(result.cpu_score, 0.0);
    assert!(runner.cached().await.is_none());
}

#[tokio::test]
async fn test_missing_context_scores_minimum_without_failing() {
    let runner = BenchmarkRunner::new(HeadlessSurface::unavailable());
    let result = runner.run(|_| {}, &AbortSignal::new()).await;

    let render: Vec<_> = result
        .subtests
        .iter()
        .filter(|s| s.workload.phase() == colviz::benchmark::Phase::Render)
        .collect();
    assert_eq!(render.len(), 3);
    assert!(render.iter().all(|s| s.score == FAILED_SUBTEST_SCORE && s.elapsed_ms.is_none()));
    assert!(!result.partial);
}
