// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Touch/click disambiguation on a touch platform without native click suppression.
//!
//! Feeds the primitive sequences a touch screen produces (touch start, touch
//! end, then the synthetic click) and shows which ones dispatch and which ones
//! the host should cancel.
//!
//! Run:
//! - `cargo run -p understory_tap_demos --example tap_touch`

use std::cell::Cell;
use std::rc::Rc;

use kurbo::{Point, Rect};
use understory_dom::{Document, ElementSpec, NodeId};
use understory_tap::adapters::dom::{DocumentPlatform, event_at};
use understory_tap::dispatcher::TapDispatcher;
use understory_tap::environment::Capabilities;
use understory_tap::types::{InputEvent, InputKind};

fn main() {
    let mut doc = Document::new();
    let page = Rect::new(0.0, 0.0, 320.0, 480.0);
    let html = doc.create_element(doc.root(), ElementSpec::new("html").bounds(page));
    doc.create_element(html, ElementSpec::new("head"));
    let body = doc.create_element(html, ElementSpec::new("body").bounds(page));
    let ok = doc.create_element(
        body,
        ElementSpec::new("button")
            .id("ok")
            .bounds(Rect::new(20.0, 20.0, 140.0, 60.0)),
    );
    let cancel = doc.create_element(
        body,
        ElementSpec::new("button")
            .id("cancel")
            .bounds(Rect::new(160.0, 20.0, 300.0, 60.0)),
    );

    let mut taps: TapDispatcher<NodeId> = TapDispatcher::new();
    {
        let mut platform = DocumentPlatform::new(&mut doc, Capabilities::TOUCH);
        if let Err(err) = taps.enchant(&mut platform, Some(body)) {
            eprintln!("setup failed: {err}");
            return;
        }
        println!("Bound: {:?}", platform.bound());
    }
    println!("Mode: {:?}, touchable: {}", taps.mode(), taps.is_touchable());
    if let Some(meta) = doc.query_selector("meta[name=viewport]") {
        let content = doc.element(meta).and_then(|e| e.attribute("content"));
        println!("Viewport meta: {content:?}");
    }

    let fired = Rc::new(Cell::new(0_u32));
    let f = fired.clone();
    taps.on("button", "button", move |_, node, _| {
        f.set(f.get() + 1);
        println!("    handler fired on {node:?}");
    });

    let feed = |taps: &mut TapDispatcher<NodeId>, kind: InputKind, pt: Point| {
        let Some(ev) = event_at(&doc, kind, pt) else {
            return;
        };
        let response = taps.handle(&doc, &ev);
        println!(
            "  {kind:?} @ ({:.0},{:.0}) → prevent default: {}, dispatched: {}",
            pt.x,
            pt.y,
            response.default_prevented,
            response.report.is_some()
        );
    };

    println!("\n== Tap on #ok ==");
    feed(&mut taps, InputKind::TouchStart, Point::new(50.0, 40.0));
    feed(&mut taps, InputKind::TouchEnd, Point::new(52.0, 41.0));
    feed(&mut taps, InputKind::Click, Point::new(52.0, 41.0));

    println!("\n== Drag across #ok ==");
    feed(&mut taps, InputKind::TouchStart, Point::new(50.0, 40.0));
    feed(&mut taps, InputKind::TouchEnd, Point::new(90.0, 40.0));
    feed(&mut taps, InputKind::Click, Point::new(90.0, 40.0));

    println!("\n== Tap on #ok, synthetic click lands on #cancel ==");
    feed(&mut taps, InputKind::TouchStart, Point::new(130.0, 40.0));
    feed(&mut taps, InputKind::TouchEnd, Point::new(133.0, 40.0));
    feed(&mut taps, InputKind::Click, Point::new(165.0, 40.0));

    println!("\n== Cancelled touch ==");
    feed(&mut taps, InputKind::TouchStart, Point::new(200.0, 40.0));
    let response = taps.handle(&doc, &InputEvent::touch_cancel(cancel));
    println!("  TouchCancel → {response:?}");

    println!("\n== Simulated tap on #ok ==");
    let response = taps.simulate(&doc, ok);
    println!("  {response:?}");

    println!("\nHandler invocations: {}", fired.get());
}
