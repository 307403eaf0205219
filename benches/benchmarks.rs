//! Performance benchmarks for cycles-mcp.
//!
//! This module contains benchmarks for:
//! - Task record extraction from task documents
//! - Dependency grouping of wide and deep task graphs
//! - Progress recalculation of large cycle READMEs
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use cycles_mcp::workflow::{CycleReadme, DependencyGroups, ProgressState, TaskRecord};

// ============================================================================
// Mock Data Fixtures
// ============================================================================

mod fixtures {
    use super::TaskRecord;

    /// Tasks where each depends on the one before it.
    pub fn chain(len: usize) -> Vec<TaskRecord> {
        (1..=len)
            .map(|n| {
                let deps = if n == 1 { vec![] } else { vec![format!("{:03}", n - 1)] };
                record(n, deps)
            })
            .collect()
    }

    /// One root task that everything else depends on.
    pub fn fan_out(len: usize) -> Vec<TaskRecord> {
        (1..=len)
            .map(|n| record(n, if n == 1 { vec![] } else { vec!["001".to_string()] }))
            .collect()
    }

    /// Tasks listed in reverse dependency order, the worst case for layering.
    pub fn reversed_chain(len: usize) -> Vec<TaskRecord> {
        let mut tasks = chain(len);
        tasks.reverse();
        tasks
    }

    /// A task document with a dependency line.
    pub fn task_document(n: usize) -> String {
        format!(
            "# Task {n:03}: Generated task\n\n**Estimated Time**: 2h  \n\n## Dependencies\n\n\
             **Must complete first:** Task {:03}, Task {:03}  \n**Conflicts with:** None  \n\n\
             ## Overview\n\nGenerated.\n",
            n.saturating_sub(1).max(1),
            n.saturating_sub(2).max(1)
        )
    }

    /// A cycle README with `len` tasks, every third one complete.
    pub fn cycle_readme(len: usize) -> String {
        let mut tasks = String::new();
        for n in 1..=len {
            let check = if n % 3 == 0 { "x" } else { " " };
            tasks.push_str(&format!("- [{check}] **[{n:03}](./{n:03}-task.md)** - Task {n} (2h)\n"));
        }
        format!(
            "# Cycle 01: Bench\n\n**Estimated Hours**: 0 hours  \n\n## Tasks ({len} total)\n\n{tasks}\n\
             ## Progress Tracker\n\n**Completed**: 0/{len} tasks (0%)\n\n```\n[░░░░░░░░░░░░░░░░░░░░] 0%\n```\n"
        )
    }

    fn record(n: usize, dependencies: Vec<String>) -> TaskRecord {
        TaskRecord::new(format!("{n:03}"), format!("Task {n}"), dependencies, format!("{n:03}-task.md"))
    }
}

// ============================================================================
// Benchmarks
// ============================================================================

fn bench_record_extraction(c: &mut Criterion) {
    let mut group = c.benchmark_group("records");
    let document = fixtures::task_document(42);

    group.bench_function("parse_task_document", |b| {
        b.iter(|| TaskRecord::parse(black_box(&document), "042-task.md"));
    });

    group.finish();
}

fn bench_grouping(c: &mut Criterion) {
    let mut group = c.benchmark_group("grouping");

    for size in [10usize, 100, 500] {
        group.throughput(Throughput::Elements(size as u64));

        let shapes = [
            ("chain", fixtures::chain(size)),
            ("fan_out", fixtures::fan_out(size)),
            ("reversed_chain", fixtures::reversed_chain(size)),
        ];
        for (shape, tasks) in &shapes {
            group.bench_with_input(BenchmarkId::new(*shape, size), tasks, |b, tasks| {
                b.iter(|| DependencyGroups::build(black_box(tasks)));
            });
        }
    }

    group.finish();
}

fn bench_progress(c: &mut Criterion) {
    let mut group = c.benchmark_group("progress");

    for size in [10usize, 100, 999] {
        let readme = fixtures::cycle_readme(size);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("count_markers", size), &readme, |b, readme| {
            b.iter(|| ProgressState::from_markers(black_box(readme)));
        });

        group.bench_with_input(BenchmarkId::new("recalculate_readme", size), &readme, |b, readme| {
            b.iter(|| {
                let mut doc = CycleReadme::parse(black_box(readme));
                doc.recalculate_progress();
                doc.render()
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_record_extraction, bench_grouping, bench_progress);
criterion_main!(benches);
