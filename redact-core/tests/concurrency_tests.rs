// redact-core/tests/concurrency_tests.rs
use std::thread;

use redact_core::{Redact, Redactor};

#[derive(Debug, Clone, PartialEq, Redact)]
struct Card {
    #[redact("~[admin,billing]=star(-4)")]
    number: String,
    #[redact(nested)]
    holder: Holder,
}

#[derive(Debug, Clone, PartialEq, Redact)]
struct Holder {
    #[redact("~admin=redact(*, )")]
    name: String,
}

fn cards() -> Vec<Card> {
    (0..16)
        .map(|i| Card {
            number: format!("4111-1111-1111-{:04}", i),
            holder: Holder {
                name: format!("Holder {}", i),
            },
        })
        .collect()
}

#[test]
fn test_concurrent_first_use_populates_cache_once() {
    let redactor = Redactor::new();
    let source = cards();
    assert!(redactor.cache().is_empty());

    let results: Vec<Vec<Card>> = thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| scope.spawn(|| redactor.redact(&source, &["support"]).unwrap()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(redactor.cache().len(), 2);
    for copy in &results {
        assert_eq!(copy, &results[0]);
    }
    assert_eq!(results[0][3].number, "***************0003");
    assert_eq!(results[0][3].holder.name, "****** *");
    assert_eq!(source, cards());
}

#[test]
fn test_concurrent_callers_with_different_groups() {
    let redactor = Redactor::new();
    let source = cards();

    thread::scope(|scope| {
        for group in ["admin", "billing", "support"] {
            let redactor = &redactor;
            let source = &source;
            scope.spawn(move || {
                for _ in 0..10 {
                    let copy = redactor.redact(source, &[group]).unwrap();
                    let number = &copy[0].number;
                    match group {
                        "admin" | "billing" => assert_eq!(number, "4111-1111-1111-0000"),
                        _ => assert_eq!(number, "***************0000"),
                    }
                }
            });
        }
    });
    assert_eq!(redactor.cache().len(), 2);
}
