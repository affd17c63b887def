//! Integration tests for the mapper's public surface.

use rhi_automap::{MapError, Mapper, MapperConfig, Profile, TypeKey};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, PartialEq)]
struct NegativeValue(i32);

impl fmt::Display for NegativeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "negative value not allowed: {}", self.0)
    }
}

impl std::error::Error for NegativeValue {}

fn value_of(n: i32) -> Result<String, NegativeValue> {
    if n < 0 {
        Err(NegativeValue(n))
    } else {
        Ok(format!("value-{}", n))
    }
}

fn checked_mapper() -> Mapper {
    let mut mapper = Mapper::new();
    mapper.add_mapper(value_of).unwrap();
    mapper
}

#[test]
fn test_map() {
    let mut mapper = Mapper::new();
    mapper.add_fn(|n: i32| format!("value-{}", n)).unwrap();

    let mut result = String::new();
    mapper.map(5, &mut result).unwrap();
    assert_eq!(result, "value-5");
}

#[test]
fn test_add_conflict_keeps_first_mapper() {
    let mut mapper = Mapper::new();
    mapper.add_fn(|_: i32| "value".to_string()).unwrap();

    let err = mapper.add_fn(|_: i32| "other".to_string()).unwrap_err();
    assert!(matches!(err, MapError::Conflict(_)));
    assert!(err.to_string().contains("mapper already registered"));
    assert!(err.to_string().contains("i32->alloc::string::String"));

    assert_eq!(mapper.convert::<i32, String>(1).unwrap(), "value");
    assert_eq!(mapper.len(), 1);
}

#[test]
fn test_conflict_across_registration_shapes() {
    let mut mapper = Mapper::new();
    mapper.add_fn(|n: i32| n.to_string()).unwrap();

    let err = mapper.add_mapper(value_of).unwrap_err();
    assert!(matches!(err, MapError::Conflict(_)));

    let err = mapper
        .add_optional(|_: i32| Ok::<Option<String>, NegativeValue>(None))
        .unwrap_err();
    assert!(matches!(err, MapError::Conflict(_)));
}

#[test]
fn test_invokes_mapper_exactly_once() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);

    let mut mapper = Mapper::new();
    mapper
        .add_fn(move |n: i32| {
            counter.fetch_add(1, Ordering::SeqCst);
            n * 10
        })
        .unwrap();

    let mut out = 0i32;
    mapper.map(4, &mut out).unwrap();
    assert_eq!(out, 40);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_not_found_leaves_dest() {
    let mapper = checked_mapper();

    let mut result = 7u64;
    let err = mapper.map(5i32, &mut result).unwrap_err();
    assert!(matches!(err, MapError::NotFound(key) if key == TypeKey::derive::<i32, u64>()));
    assert_eq!(err.to_string(), "no mapper found for type pair: i32->u64");
    assert_eq!(result, 7);
}

#[test]
fn test_source_type_selects_mapper() {
    let mut mapper = Mapper::new();
    mapper.add_fn(|n: i32| format!("i32:{}", n)).unwrap();
    mapper.add_fn(|n: i64| format!("i64:{}", n)).unwrap();

    assert_eq!(mapper.convert::<i32, String>(1).unwrap(), "i32:1");
    assert_eq!(mapper.convert::<i64, String>(1).unwrap(), "i64:1");
    assert!(mapper.convert::<u32, String>(1).is_err());
}

#[test]
fn test_mapper_error_propagates_unchanged() {
    let mapper = checked_mapper();

    let mut result = "before".to_string();
    let err = mapper.map(-5, &mut result).unwrap_err();
    assert!(err.to_string().contains("negative value not allowed"));
    assert_eq!(err.conversion_error::<NegativeValue>(), Some(&NegativeValue(-5)));
    assert_eq!(result, "before");

    mapper.map(5, &mut result).unwrap();
    assert_eq!(result, "value-5");
}

#[test]
fn test_map_with_absent_result() {
    let mut mapper = Mapper::new();
    mapper
        .add_optional(|n: i32| {
            if n == 0 {
                return Ok::<_, NegativeValue>(None);
            }
            Ok(Some(format!("value-{}", n)))
        })
        .unwrap();

    let mut result = "stale".to_string();
    mapper.map(0, &mut result).unwrap();
    assert_eq!(result, "");

    mapper.map(5, &mut result).unwrap();
    assert_eq!(result, "value-5");
}

#[test]
fn test_absent_result_in_list() {
    let mut mapper = Mapper::new();
    mapper
        .add_optional(|n: i32| Ok::<_, NegativeValue>((n % 2 == 0).then_some(n as u64)))
        .unwrap();

    let out: Vec<u64> = mapper.convert_list([2, 3, 4]).unwrap();
    assert_eq!(out, vec![2, 0, 4]);
}

#[test]
fn test_map_list() {
    let mapper = checked_mapper();

    let source = vec![1, 2, 3, 4, 5];
    let mut result: Vec<String> = Vec::new();
    mapper.map_list(source, &mut result).unwrap();
    assert_eq!(
        result,
        vec!["value-1", "value-2", "value-3", "value-4", "value-5"]
    );
}

#[test]
fn test_map_list_from_borrowed_values() {
    let mapper = checked_mapper();

    let source = [1, 2, 3, 4, 5];
    let mut result: Vec<String> = vec!["old".to_string()];
    mapper.map_list(source.iter().copied(), &mut result).unwrap();
    assert_eq!(result.len(), source.len());
    for (n, out) in source.iter().zip(&result) {
        assert_eq!(*out, mapper.convert::<i32, String>(*n).unwrap());
    }
}

#[test]
fn test_map_list_with_error() {
    let mapper = checked_mapper();

    let source = vec![1, 2, -3, 4, 5];
    let mut result = vec!["previous".to_string()];
    let err = mapper.map_list(source, &mut result).unwrap_err();
    assert!(err.to_string().contains("negative value not allowed"));
    assert_eq!(err.conversion_error::<NegativeValue>(), Some(&NegativeValue(-3)));
    assert_eq!(result, vec!["previous"]);
}

#[test]
fn test_configure() {
    let configure = |m: &mut Mapper| m.add_mapper(value_of);

    let mapper = Mapper::new().configure(configure).unwrap();

    let mut result = String::new();
    mapper.map(5, &mut result).unwrap();
    assert_eq!(result, "value-5");
}

#[test]
fn test_configure_error() {
    let configure = |m: &mut Mapper| -> Result<(), MapError> {
        m.add_fn(|_: i32| "value".to_string())?;
        m.add_fn(|_: i32| "other".to_string())
    };

    let result = Mapper::new().configure(configure);
    let err = result.unwrap_err();
    assert!(matches!(err, MapError::Conflict(_)));
    assert!(err.to_string().contains("mapper already registered"));
}

struct Pricing {
    currency: &'static str,
}

impl Profile for Pricing {
    fn configure(self, mapper: &mut Mapper) -> Result<(), MapError> {
        let currency = self.currency;
        mapper.add_fn(move |cents: u64| format!("{}.{:02} {}", cents / 100, cents % 100, currency))?;
        mapper.add_mapper(|text: String| text.trim().parse::<u64>())
    }
}

#[test]
fn test_profile() {
    let mapper = Mapper::with_config(MapperConfig::new().name("pricing"))
        .configure(Pricing { currency: "EUR" })
        .unwrap();

    assert_eq!(mapper.convert::<u64, String>(1999).unwrap(), "19.99 EUR");
    assert_eq!(mapper.convert::<String, u64>(" 42 ".into()).unwrap(), 42);

    let err = mapper.convert::<String, u64>("abc".into()).unwrap_err();
    assert!(err.conversion_error::<std::num::ParseIntError>().is_some());
    assert_eq!(mapper.config().name.as_deref(), Some("pricing"));
}

#[test]
fn test_type_pairs() {
    let mapper = Mapper::new()
        .configure(Pricing { currency: "USD" })
        .unwrap();

    let pairs: Vec<String> = mapper.type_pairs().map(|k| k.to_string()).collect();
    assert_eq!(
        pairs,
        vec!["u64->alloc::string::String", "alloc::string::String->u64"]
    );
}

#[test]
fn test_instances_are_independent() {
    let mut first = Mapper::new();
    first.add_fn(|n: i32| n.to_string()).unwrap();

    let second = Mapper::new();
    assert!(first.contains::<i32, String>());
    assert!(!second.contains::<i32, String>());
    assert!(second.is_empty());
}

#[test]
fn test_shared_across_threads() {
    let mapper = Arc::new(checked_mapper());

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let mapper = Arc::clone(&mapper);
            std::thread::spawn(move || mapper.convert::<i32, String>(i).unwrap())
        })
        .collect();

    let results: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(results, vec!["value-0", "value-1", "value-2", "value-3"]);
}
