use std::{cell::RefCell, hint::black_box, rc::Rc};

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use herald::{alternatives, Broker, Subscription};

alternatives! {
    #[derive(Debug)]
    enum Event {
        Int(i64),
        Float(f64),
    }
    widen f64 => Float;
}

fn bench_subscribe(c: &mut Criterion) {
    c.bench_function("broker_subscribe", |b| {
        b.iter_batched_ref(
            Broker::<Event>::new,
            |broker| black_box(broker.subscribe(|x: &mut i64| *x += 1).unwrap()),
            BatchSize::SmallInput,
        )
    });
}

fn bench_publish_0_sub(c: &mut Criterion) {
    let broker = Broker::<Event>::new();
    c.bench_function("publish_0_subs", |b| {
        b.iter(|| broker.publish(black_box(1_i64)).unwrap())
    });
}

fn bench_publish_fanout(c: &mut Criterion) {
    for n in [1usize, 10, 100] {
        let broker = Broker::<Event>::new();
        let _subs: Vec<Subscription<Event>> = (0..n)
            .map(|_| broker.subscribe(|x: &mut i64| *x = x.wrapping_add(1)).unwrap())
            .collect();
        c.bench_function(&format!("publish_{n}_subs"), |b| {
            b.iter(|| broker.publish(black_box(1_i64)).unwrap())
        });
    }
}

fn bench_publish_filtered(c: &mut Criterion) {
    let broker = Broker::<Event>::new();
    let _ints: Vec<_> = (0..50)
        .map(|_| broker.subscribe(|x: &mut i64| *x += 1).unwrap())
        .collect();
    let _floats: Vec<_> = (0..50)
        .map(|_| broker.subscribe_value(|x: f64| { black_box(x); }).unwrap())
        .collect();
    c.bench_function("publish_100_subs_half_accepting", |b| {
        b.iter(|| broker.publish(black_box(0.5_f64)).unwrap())
    });
}

fn bench_compaction(c: &mut Criterion) {
    c.bench_function("publish_compacts_100_dead", |b| {
        b.iter_batched(
            || {
                let broker = Broker::<Event>::new();
                let keep: Vec<_> = (0..200)
                    .map(|_| broker.subscribe(|x: &mut i64| *x += 1).unwrap())
                    .enumerate()
                    .filter_map(|(i, s)| (i % 2 == 0).then_some(s))
                    .collect();
                (broker, keep)
            },
            |(broker, keep)| {
                broker.publish(1_i64).unwrap();
                black_box(keep);
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_cascade(c: &mut Criterion) {
    fn chain(
        broker: &Rc<Broker<Event>>,
        keep: &Rc<RefCell<Vec<Subscription<Event>>>>,
    ) -> Subscription<Event> {
        let weak = Rc::downgrade(broker);
        let keep_inner = keep.clone();
        broker
            .subscribe(move |x: &mut i64| {
                *x += 1;
                if *x > 32 {
                    return;
                }
                if let Some(broker) = weak.upgrade() {
                    let next = chain(&broker, &keep_inner);
                    keep_inner.borrow_mut().push(next);
                }
            })
            .unwrap()
    }

    c.bench_function("publish_cascade_32", |b| {
        b.iter_batched(
            || {
                let broker = Rc::new(Broker::<Event>::new());
                let keep = Rc::new(RefCell::new(Vec::new()));
                let seed = chain(&broker, &keep);
                keep.borrow_mut().push(seed);
                (broker, keep)
            },
            |(broker, keep)| {
                broker.publish(0_i64).unwrap();
                keep.borrow_mut().clear();
            },
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(
    benches,
    bench_subscribe,
    bench_publish_0_sub,
    bench_publish_fanout,
    bench_publish_filtered,
    bench_compaction,
    bench_cascade
);
criterion_main!(benches);
