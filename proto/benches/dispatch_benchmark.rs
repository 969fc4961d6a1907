//! Run with:
//!   cargo bench --bench dispatch_benchmark

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use proto::{Output, OutputBuffer, Runtime, RuntimeCreateInfo, send, send_super, unary};

fn quiet_runtime() -> (Runtime, OutputBuffer) {
    let buffer = OutputBuffer::new();
    let runtime = Runtime::new(RuntimeCreateInfo {
        output: Output::Buffer(buffer.clone()),
        ..Default::default()
    });
    (runtime, buffer)
}

fn bench_send_depth(c: &mut Criterion) {
    let (rt, _) = quiet_runtime();
    let top = rt.root().clone_child();
    top.define("answer", |this, _| Some(this.clone()));

    for depth in [0usize, 8, 64] {
        let mut receiver = top.clone();
        for _ in 0..depth {
            receiver = receiver.clone_child();
        }
        c.bench_function(&format!("send through {depth} ancestors"), |b| {
            b.iter(|| send(black_box(&receiver), "answer", None));
        });
    }
}

fn bench_super(c: &mut Criterion) {
    let (rt, _) = quiet_runtime();
    let a = rt.root().clone_child();
    a.define("foo", |this, _| Some(this.clone()));
    let b = a.clone_child();
    b.define("foo", |this, _| Some(this.clone()));

    c.bench_function("super send", |bench| {
        bench.iter(|| send_super(black_box(&b), "foo", None));
    });
}

fn bench_unary(c: &mut Criterion) {
    let (rt, out) = quiet_runtime();
    let zero = unary::zero(&rt.root());

    c.bench_function("unary build and print 64", |b| {
        b.iter(|| {
            let number = unary::nth(&zero, black_box(64));
            send(number.as_ref(), "print", None);
            out.take()
        });
    });
}

fn bench_set(c: &mut Criterion) {
    let (rt, _) = quiet_runtime();
    let obj = rt.root().clone_child();

    c.bench_function("overwrite slot", |b| {
        b.iter(|| obj.define(black_box("slot"), |this, _| Some(this.clone())));
    });
}

criterion_group!(benches, bench_send_depth, bench_super, bench_unary, bench_set);
criterion_main!(benches);
