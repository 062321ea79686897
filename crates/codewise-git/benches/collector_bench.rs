// Copyright (c) 2026 - present Codewise contributors
// SPDX-License-Identifier: MIT

use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use codewise_git::blame::parse_blame;
use codewise_git::parser::parse_log;
use codewise_git::truncate::truncate_chars;

fn sample_log(commits: usize) -> String {
    (0..commits)
        .map(|i| {
            format!(
                "\x1e{:040x}\x1fDev {i}\x1fdev{i}@example.com\x1f2026-01-{:02}T10:00:00+00:00\x1fcommit number {i}\n\n3\t1\tsrc/file_{i}.rs\n10\t0\tREADME.md\n",
                i,
                (i % 28) + 1
            )
        })
        .collect()
}

fn sample_blame(lines: usize) -> String {
    (0..lines)
        .map(|i| {
            let sha = if i % 3 == 0 { "a" } else { "b" }.repeat(40);
            let author = if i % 3 == 0 { "Ana" } else { "Bruno" };
            format!(
                "{sha} {n} {n} 1\nauthor {author}\nauthor-mail <{author}@example.com>\nsummary msg\nfilename f.rs\n\tline {i}\n",
                n = i + 1
            )
        })
        .collect()
}

fn collector_benchmark(c: &mut Criterion) {
    let log = sample_log(200);
    c.bench_function("parse_log_200_commits", |b| {
        b.iter(|| parse_log(black_box(&log)))
    });

    let patch = "+ let value = compute(ação);\n".repeat(2_000);
    c.bench_function("truncate_chars_3000", |b| {
        b.iter(|| truncate_chars(black_box(&patch), black_box(3000)).len())
    });

    let blame = sample_blame(1_000);
    c.bench_function("parse_blame_1000_lines", |b| {
        b.iter(|| parse_blame(black_box(&blame)))
    });
}

criterion_group!(benches, collector_benchmark);
criterion_main!(benches);
