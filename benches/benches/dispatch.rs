// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::{Point, Rect};
use understory_dom::{Document, ElementSpec, NodeId};
use understory_tap::adapters::dom::DocumentPlatform;
use understory_tap::dispatcher::TapDispatcher;
use understory_tap::environment::Capabilities;
use understory_tap::registry::Registry;
use understory_tap::types::InputEvent;

/// A chain of nested `div`s, `depth` deep, each with its own id and class.
fn nested_document(depth: usize) -> (Document, NodeId) {
    let mut doc = Document::new();
    let bounds = Rect::new(0.0, 0.0, 100.0, 100.0);
    let mut node = doc.create_element(doc.root(), ElementSpec::new("html").bounds(bounds));
    for level in 0..depth {
        node = doc.create_element(
            node,
            ElementSpec::new("div")
                .id(&format!("n{level}"))
                .class(if level % 2 == 0 { "even" } else { "odd" })
                .bounds(bounds),
        );
    }
    (doc, node)
}

/// `count` handlers spread over the chain's ids, plus one that never matches.
fn dispatcher(depth: usize, count: usize) -> TapDispatcher<NodeId> {
    let mut taps = TapDispatcher::new();
    for i in 0..count {
        let selector = format!("#n{}", (i * 7) % depth.max(1));
        taps.on(format!("h{i}"), selector, |_, node, _| {
            black_box(node);
        });
    }
    taps.on("miss", "section.never > p", |_, _, _| {});
    taps
}

fn bench_click_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("click_dispatch");
    for &(depth, count) in &[(8_usize, 4_usize), (32, 16), (128, 64)] {
        let (doc, leaf) = nested_document(depth);
        let mut taps = dispatcher(depth, count);
        let ev = InputEvent::click(leaf);
        group.throughput(Throughput::Elements(depth as u64));
        group.bench_function(format!("depth{depth}_handlers{count}"), |b| {
            b.iter(|| black_box(taps.handle(&doc, black_box(&ev))));
        });
    }
    group.finish();
}

fn bench_stop_early(c: &mut Criterion) {
    let (doc, leaf) = nested_document(128);
    let mut taps = dispatcher(128, 64);
    taps.on("stop", "div.even, div.odd", |_, _, ev| ev.stop_propagation());
    let ev = InputEvent::click(leaf);
    c.bench_function("click_dispatch/stop_at_leaf", |b| {
        b.iter(|| black_box(taps.handle(&doc, black_box(&ev))));
    });
}

fn bench_touch_sequence(c: &mut Criterion) {
    let (mut doc, leaf) = nested_document(32);
    let mut taps = dispatcher(32, 16);
    {
        let mut platform = DocumentPlatform::new(&mut doc, Capabilities::TOUCH);
        taps.enchant(&mut platform, None)
            .expect("document platform matches selectors");
    }
    let start = InputEvent::touch_start(leaf, Point::new(10.0, 10.0));
    let end = InputEvent::touch_end(leaf, Point::new(12.0, 11.0));
    let click = InputEvent::click(leaf);
    c.bench_function("touch_sequence/tap_depth32", |b| {
        b.iter(|| {
            taps.handle(&doc, &start);
            black_box(taps.handle(&doc, &end));
            black_box(taps.handle(&doc, &click));
        });
    });
}

fn bench_registry_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("registry");
    for &n in &[16_usize, 256] {
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("on_suspend_off_{n}"), |b| {
            b.iter_batched(
                Registry::<u32>::new,
                |mut reg| {
                    for i in 0..n {
                        reg.on(i, "div", |_, _, _| {});
                    }
                    for i in (0..n).step_by(2) {
                        reg.suspend(i);
                    }
                    for i in 0..n {
                        reg.off(i);
                    }
                    black_box(reg.len())
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_click_dispatch,
    bench_stop_early,
    bench_touch_sequence,
    bench_registry_churn
);
criterion_main!(benches);
