// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Delegated click handling over a small document.
//!
//! Registers a few handlers at the document level, then clicks around and
//! prints which handlers fired and in what order.
//!
//! Run:
//! - `cargo run -p understory_tap_demos --example tap_basics`

use std::cell::RefCell;
use std::rc::Rc;

use kurbo::{Point, Rect};
use understory_dom::{Document, ElementSpec, NodeId};
use understory_tap::adapters::dom::event_at;
use understory_tap::dispatcher::TapDispatcher;
use understory_tap::types::InputKind;

type Log = Rc<RefCell<Vec<String>>>;

fn main() {
    let mut doc = Document::new();
    let page = Rect::new(0.0, 0.0, 400.0, 300.0);
    let html = doc.create_element(doc.root(), ElementSpec::new("html").bounds(page));
    let body = doc.create_element(html, ElementSpec::new("body").bounds(page));
    let list = doc.create_element(
        body,
        ElementSpec::new("ul")
            .id("todo")
            .bounds(Rect::new(20.0, 20.0, 380.0, 200.0)),
    );
    for (i, label) in ["milk", "bread", "eggs"].into_iter().enumerate() {
        let y = 30.0 + 50.0 * i as f64;
        let item = doc.create_element(
            list,
            ElementSpec::new("li")
                .class("item")
                .attr("data-label", label)
                .bounds(Rect::new(30.0, y, 370.0, y + 40.0)),
        );
        doc.create_element(
            item,
            ElementSpec::new("button")
                .class("remove")
                .bounds(Rect::new(330.0, y + 5.0, 365.0, y + 35.0)),
        );
    }

    println!("Document:");
    print_tree(&doc, doc.root(), "");

    let log = Log::default();
    let mut taps: TapDispatcher<NodeId> = TapDispatcher::new();
    let (l1, l2, l3) = (log.clone(), log.clone(), log.clone());
    taps.on("select", "#todo > li.item", move |_, node, _| {
        l1.borrow_mut().push(format!("select {node:?}"));
    })
    .on("remove", "li > button.remove", move |_, node, ev| {
        l2.borrow_mut().push(format!("remove {node:?}"));
        // Removing an item should not also select it.
        ev.stop_propagation();
    })
    .one("first-touch", "#todo", move |_, _, _| {
        l3.borrow_mut().push("first interaction with the list".to_string());
    });
    println!("\nRegistered: {:?}", taps.names(false));

    let click = |taps: &mut TapDispatcher<NodeId>, label: &str, pt: Point| {
        log.borrow_mut().clear();
        let Some(ev) = event_at(&doc, InputKind::Click, pt) else {
            println!("\n{label} @ ({:.0},{:.0}): nothing hit", pt.x, pt.y);
            return;
        };
        let response = taps.handle(&doc, &ev);
        println!(
            "\n{label} @ ({:.0},{:.0}) on {:?}: {:?}",
            pt.x, pt.y, ev.target, response
        );
        for line in log.borrow().iter() {
            println!("  {line}");
        }
    };

    click(&mut taps, "Click item", Point::new(60.0, 50.0));
    click(&mut taps, "Click remove button", Point::new(340.0, 100.0));

    taps.suspend("select");
    println!("\nSuspended: {:?}", taps.names(true));
    click(&mut taps, "Click item while suspended", Point::new(60.0, 150.0));

    taps.resume("select");
    click(&mut taps, "Click item after resume", Point::new(60.0, 150.0));
    click(&mut taps, "Click outside the list", Point::new(10.0, 280.0));

    println!("\nRegistered at exit: {:?}", taps.names(false));
}

fn print_tree(doc: &Document, id: NodeId, prefix: &str) {
    let kids = doc.children(id);
    for (i, &k) in kids.iter().enumerate() {
        let last = i + 1 == kids.len();
        let branch = if last { "└── " } else { "├── " };
        println!("{prefix}{branch}{}", describe(doc, k));
        let next = if last {
            format!("{prefix}    ")
        } else {
            format!("{prefix}│   ")
        };
        print_tree(doc, k, &next);
    }
}

fn describe(doc: &Document, id: NodeId) -> String {
    let Some(el) = doc.element(id) else {
        return format!("{id:?}");
    };
    let mut out = el.tag.clone();
    if let Some(i) = &el.id {
        out.push_str(&format!("#{i}"));
    }
    for c in &el.classes {
        out.push_str(&format!(".{c}"));
    }
    let b = el.bounds;
    out.push_str(&format!(
        "  rect=({:.0},{:.0})–({:.0},{:.0})",
        b.x0, b.y0, b.x1, b.y1
    ));
    out
}
