// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{
    BatchSize, BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main,
};
use kurbo::Size;
use understory_section_layout::{
    IdAllocator, Item, ItemAlignment, ItemConfiguration, LayoutModel, LayoutSettings, Section,
};

fn settings() -> LayoutSettings {
    LayoutSettings {
        visible_width: 375.0,
        inter_item_spacing: 8.0,
        inter_section_spacing: 16.0,
        ..LayoutSettings::default()
    }
}

fn section(ids: &mut IdAllocator, len: usize) -> Section {
    let items = (0..len)
        .map(|n| {
            let height = if n % 3 == 0 { 64.0 } else { 40.0 };
            Item::new(
                ids.next_item_id(),
                ItemConfiguration::new(ItemAlignment::Leading, Size::new(240.0, height)),
            )
        })
        .collect();
    Section::new(ids.next_section_id(), None, None, items)
}

fn bench_full_vs_incremental(c: &mut Criterion) {
    let mut group = c.benchmark_group("section_layout/remeasure_one");
    let settings = settings();

    // Hypothesis: a single re-measurement through `set_and_assemble_item` costs
    // O(len - index), while reassembling costs O(len) regardless of position.
    for len in [128usize, 1_024, 8_192] {
        let mut ids = IdAllocator::new();
        let mut base = section(&mut ids, len);
        base.assemble_layout(&settings);
        group.throughput(Throughput::Elements(len as u64));

        group.bench_with_input(BenchmarkId::new("assemble_layout", len), &base, |b, base| {
            b.iter_batched(
                || base.clone(),
                |mut section| {
                    section.assemble_layout(&settings);
                    black_box(section);
                },
                BatchSize::LargeInput,
            );
        });

        // Chat-style updates land near the tail.
        let index = len - len / 16;
        let mut measured = base.items()[index].clone();
        measured.set_calculated_size(Size::new(240.0, 120.0));
        group.bench_with_input(
            BenchmarkId::new("set_and_assemble_item_near_tail", len),
            &base,
            |b, base| {
                b.iter_batched(
                    || (base.clone(), measured.clone()),
                    |(mut section, item)| {
                        section
                            .set_and_assemble_item(item, index, &settings)
                            .unwrap();
                        black_box(section);
                    },
                    BatchSize::LargeInput,
                );
            },
        );
    }

    group.finish();
}

fn bench_model_measurement(c: &mut Criterion) {
    let mut group = c.benchmark_group("section_layout/model_apply_calculated_size");
    let settings = settings();

    for sections in [16usize, 256] {
        let mut ids = IdAllocator::new();
        let mut model = LayoutModel::new((0..sections).map(|_| section(&mut ids, 64)).collect());
        model.assemble_layout(&settings);
        let target = model.sections()[sections / 2].items()[32].id();
        // Warm the id map so the batch setup does not include building it.
        model.item_path(target);
        group.throughput(Throughput::Elements(sections as u64));

        group.bench_with_input(BenchmarkId::new("by_id", sections), &model, |b, model| {
            b.iter_batched(
                || model.clone(),
                |mut model| {
                    model
                        .apply_calculated_size(target, Size::new(240.0, 90.0), &settings)
                        .unwrap();
                    black_box(model);
                },
                BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

fn bench_paths_in_range(c: &mut Criterion) {
    let mut group = c.benchmark_group("section_layout/paths_in_range");
    let settings = settings();

    let mut ids = IdAllocator::new();
    let mut model = LayoutModel::new((0..64).map(|_| section(&mut ids, 256)).collect());
    model.assemble_layout(&settings);
    let mid = model.height() * 0.5;

    group.bench_function("viewport_800", |b| {
        b.iter(|| black_box(model.paths_in_range(black_box(mid), black_box(mid + 800.0))));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_full_vs_incremental,
    bench_model_measurement,
    bench_paths_in_range
);
criterion_main!(benches);
