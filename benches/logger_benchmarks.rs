//! Criterion benchmarks for flux_logger

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use flux_logger::prelude::*;
use std::sync::Arc;
use std::thread;

fn null_logger(batch_size: usize) -> Logger {
    Logger::builder()
        .batch_size(batch_size)
        .sink(WriterSink::named(std::io::sink(), "null"))
        .build()
        .expect("Failed to build logger")
}

// ============================================================================
// Formatting Benchmarks
// ============================================================================

fn bench_formatting(c: &mut Criterion) {
    let mut group = c.benchmark_group("formatting");
    group.throughput(Throughput::Elements(1));

    let location = SourceLocation::new("bench::format", "benches/logger_benchmarks.rs", 1);

    group.bench_function("static_message", |b| {
        b.iter(|| flux_logger::format(LogLevel::Info, location, format_args!("Info message")));
    });

    group.bench_function("with_arguments", |b| {
        b.iter(|| {
            flux_logger::format(
                LogLevel::Info,
                location,
                format_args!("Thread({}): {}L.", black_box(3), black_box(17)),
            )
        });
    });

    group.finish();
}

// ============================================================================
// Enqueue Benchmarks
// ============================================================================

fn bench_enqueue(c: &mut Criterion) {
    let mut group = c.benchmark_group("enqueue");
    group.throughput(Throughput::Elements(1));

    for batch_size in [64, 1024, 8192] {
        let logger = null_logger(batch_size);
        group.bench_function(format!("batch_{}", batch_size), |b| {
            b.iter(|| {
                flux_logger::info!(logger, "User {} performed action: {}", black_box(42), "login");
            });
        });
    }

    group.finish();
}

// ============================================================================
// Concurrent Benchmarks
// ============================================================================

fn bench_concurrent(c: &mut Criterion) {
    let mut group = c.benchmark_group("concurrent");
    const PER_THREAD: usize = 1_000;

    for threads in [2, 4, 8] {
        group.throughput(Throughput::Elements((threads * PER_THREAD) as u64));
        let logger = Arc::new(null_logger(1024));

        group.bench_function(format!("{}_threads", threads), |b| {
            b.iter(|| {
                let handles: Vec<_> = (0..threads)
                    .map(|t| {
                        let logger = Arc::clone(&logger);
                        thread::spawn(move || {
                            for j in 0..PER_THREAD {
                                flux_logger::info!(logger, "Thread({}): {}L.", t, j);
                            }
                        })
                    })
                    .collect();
                for handle in handles {
                    let _ = handle.join();
                }
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_formatting, bench_enqueue, bench_concurrent);
criterion_main!(benches);
