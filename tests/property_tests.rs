//! Property-based тесты для порядка доставки и удаления подписок.
//!
//! Случайная последовательность операций над брокером сравнивается с
//! простой моделью: упорядоченным списком живых подписок.

use std::{cell::RefCell, rc::Rc};

use herald::{alternatives, Broker, Subscription};
use proptest::prelude::*;

const PROPTEST_CASES: u32 = 256;

alternatives! {
    #[derive(Debug)]
    enum Signal {
        Int(i32),
        Text(String),
    }
}

#[derive(Debug, Clone)]
enum Op {
    SubscribeInt,
    SubscribeText,
    Drop(usize),
    Clone(usize),
    PublishInt,
    PublishText,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => Just(Op::SubscribeInt),
        2 => Just(Op::SubscribeText),
        2 => any::<usize>().prop_map(Op::Drop),
        1 => any::<usize>().prop_map(Op::Clone),
        2 => Just(Op::PublishInt),
        1 => Just(Op::PublishText),
    ]
}

/// Живая подписка в модели: номер, принимаемая альтернатива и копии токена.
struct Live {
    tag: usize,
    int: bool,
    handles: Vec<Subscription<Signal>>,
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(PROPTEST_CASES))]

    /// Каждая публикация доставляется ровно один раз каждой живой подписке,
    /// принимающей альтернативу, в порядке подписки.
    #[test]
    fn prop_delivery_matches_model(ops in prop::collection::vec(op_strategy(), 1..64)) {
        let broker = Broker::<Signal>::new();
        let log: Rc<RefCell<Vec<usize>>> = Rc::default();
        let mut live: Vec<Live> = Vec::new();
        let mut next_tag = 0;

        for op in ops {
            match op {
                Op::SubscribeInt | Op::SubscribeText => {
                    let tag = next_tag;
                    next_tag += 1;
                    let sink = log.clone();
                    let int = matches!(op, Op::SubscribeInt);
                    let handle = if int {
                        broker.subscribe(move |_: &mut i32| sink.borrow_mut().push(tag))
                    } else {
                        broker.subscribe(move |_: &mut String| sink.borrow_mut().push(tag))
                    }
                    .unwrap();
                    live.push(Live { tag, int, handles: vec![handle] });
                }
                Op::Drop(i) if !live.is_empty() => {
                    let idx = i % live.len();
                    live[idx].handles.pop();
                    if live[idx].handles.is_empty() {
                        live.remove(idx);
                    }
                }
                Op::Clone(i) if !live.is_empty() => {
                    let idx = i % live.len();
                    let copy = live[idx].handles[0].clone();
                    live[idx].handles.push(copy);
                }
                Op::PublishInt | Op::PublishText => {
                    let int = matches!(op, Op::PublishInt);
                    log.borrow_mut().clear();
                    if int {
                        broker.publish(1).unwrap();
                    } else {
                        broker.publish(String::from("x")).unwrap();
                    }
                    let expected: Vec<usize> = live
                        .iter()
                        .filter(|l| l.int == int)
                        .map(|l| l.tag)
                        .collect();
                    prop_assert_eq!(&*log.borrow(), &expected);
                    prop_assert_eq!(broker.len(), live.len());
                }
                _ => {}
            }
        }
    }

    /// Мутации полезной нагрузки применяются строго в порядке подписки.
    #[test]
    fn prop_mutation_chain_follows_subscription_order(
        adds in prop::collection::vec(-100i32..100, 1..16),
        removed in any::<prop::sample::Index>(),
    ) {
        let broker = Broker::<Signal>::new();
        let mut handles: Vec<_> = adds
            .iter()
            .enumerate()
            .map(|(pos, &add)| {
                broker
                    .subscribe(move |x: &mut i32| *x = x.wrapping_mul(2).wrapping_add(add + pos as i32))
                    .unwrap()
            })
            .collect();
        let result = Rc::new(RefCell::new(None));
        let _sink = {
            let result = result.clone();
            broker.subscribe(move |x: &mut i32| *result.borrow_mut() = Some(*x)).unwrap()
        };

        let gone = removed.index(handles.len());
        drop(handles.remove(gone));

        let expected = adds
            .iter()
            .enumerate()
            .filter(|(pos, _)| *pos != gone)
            .fold(0i32, |x, (pos, &add)| x.wrapping_mul(2).wrapping_add(add + pos as i32));

        broker.publish(0).unwrap();
        prop_assert_eq!(*result.borrow(), Some(expected));
    }
}
