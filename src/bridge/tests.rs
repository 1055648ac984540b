use super::*;
use crate::backend::BackendRegistry;
use crate::config::{MappingConfig, PartitionConfig, SearchConfig, Side, SortConfig};
use crate::container::{Container, KeyChainSelector, Value};
use crate::error::OrderingError;
use crate::types::{Array, ArrayKind, DType, Kth, KthArg};
use arrow::array::{Float64Array, Int64Array};
use ndarray::array;
use std::sync::Arc;

fn ints(values: &[i64]) -> Value {
    Value::Array(Array::from_vec(values.to_vec()))
}

fn floats(values: &[f64]) -> Value {
    Value::Array(Array::from_vec(values.to_vec()))
}

fn leaf<'v>(value: &'v Value, chain: &str) -> &'v Array {
    value
        .as_container()
        .and_then(|c| c.at_key_chain(chain))
        .and_then(Value::as_array)
        .unwrap_or_else(|| panic!("no array leaf at '{}'", chain))
}

fn sample() -> Container {
    Container::new()
        .with("a", ints(&[7, 2, 1]))
        .with("b", ints(&[3, 2]))
}

#[test]
fn test_descending_unstable_argsort_over_a_container() {
    let cfg = SortConfig {
        descending: true,
        stable: false,
        ..SortConfig::default()
    };
    let result = argsort(&sample(), &cfg, &MappingConfig::default(), None).unwrap();
    let expected = Value::Container(
        Container::new()
            .with("a", ints(&[0, 1, 2]))
            .with("b", ints(&[0, 1])),
    );
    assert_eq!(result, expected);
}

#[test]
fn test_searchsorted_with_matrix_probes() {
    let x = Array::from_vec(vec![0i64, 1, 2, 3, 4, 5]);
    let v = Value::Array(Array::from(array![[3i64, 1], [10, 3], [-2, -1]].into_dyn()));
    let result = searchsorted(
        &x,
        &v,
        None,
        &SearchConfig::default(),
        &MappingConfig::default(),
        None,
    )
    .unwrap();
    assert_eq!(
        result,
        Value::Array(Array::from(array![[3i64, 1], [6, 3], [0, 0]].into_dyn()))
    );
}

#[test]
fn test_instance_form_matches_static_form() {
    let input = sample().with("c", floats(&[0.5, -1.5, 2.0]));
    let sort_cfg = SortConfig::default();
    let mapping = MappingConfig {
        key_chains: Some(KeyChainSelector::chains(["a", "c"])),
        ..MappingConfig::default()
    };

    assert_eq!(
        input.sort(&sort_cfg, &mapping, None).unwrap(),
        sort(&input, &sort_cfg, &mapping, None).unwrap()
    );
    assert_eq!(
        input.argsort(&sort_cfg, &mapping, None).unwrap(),
        argsort(&input, &sort_cfg, &mapping, None).unwrap()
    );
    assert_eq!(
        input.msort(&mapping, None).unwrap(),
        msort(&input, &mapping, None).unwrap()
    );

    let v = floats(&[1.0]);
    let search_cfg = SearchConfig::default();
    assert_eq!(
        input.searchsorted(&v, None, &search_cfg, &mapping, None).unwrap(),
        searchsorted(&input, &v, None, &search_cfg, &mapping, None).unwrap()
    );

    let kth = KthArg::from(0isize);
    let part_cfg = PartitionConfig::default();
    assert_eq!(
        input.argpartition(&kth, &part_cfg, &mapping, None).unwrap(),
        argpartition(&input, &kth, &part_cfg, &mapping, None).unwrap()
    );
}

#[test]
fn test_static_form_accepts_bare_arrays_and_values() {
    let x = Array::from_vec(vec![3.0f64, 1.0, 2.0]);
    let from_array = sort(&x, &SortConfig::default(), &MappingConfig::default(), None).unwrap();
    let wrapped = Value::Array(x.clone());
    let from_value = sort(&wrapped, &SortConfig::default(), &MappingConfig::default(), None).unwrap();
    assert_eq!(from_array, floats(&[1.0, 2.0, 3.0]));
    assert_eq!(from_array, from_value);
}

#[test]
fn test_nested_probes_and_sorters_follow_the_leaf() {
    let x = Container::new()
        .with("a", ints(&[10, 20, 30]))
        .with("b", ints(&[5, 1, 3]));
    let v = Value::Container(
        Container::new()
            .with("a", ints(&[25]))
            .with("b", ints(&[4])),
    );
    let sorter = Value::Container(
        Container::new()
            .with("a", ints(&[0, 1, 2]))
            .with("b", ints(&[1, 2, 0])),
    );
    let result = searchsorted(
        &x,
        &v,
        Some(&sorter),
        &SearchConfig::default(),
        &MappingConfig::default(),
        None,
    )
    .unwrap();
    assert_eq!(leaf(&result, "a"), &Array::from_vec(vec![2i64]));
    assert_eq!(leaf(&result, "b"), &Array::from_vec(vec![2i64]));
}

#[test]
fn test_nested_probes_drive_a_bare_haystack() {
    let x = Array::from_vec(vec![0i64, 10, 20]);
    let v = Value::Container(
        Container::new()
            .with("lo", ints(&[-5, 5]))
            .with("hi", ints(&[20])),
    );
    let cfg = SearchConfig {
        side: Side::Right,
        ret_dtype: DType::Int32,
    };
    let result = searchsorted(&x, &v, None, &cfg, &MappingConfig::default(), None).unwrap();
    assert_eq!(leaf(&result, "lo"), &Array::from_vec(vec![0i32, 1]));
    assert_eq!(leaf(&result, "hi"), &Array::from_vec(vec![3i32]));
}

#[test]
fn test_nested_kth_per_leaf() {
    let x = Container::new()
        .with("a", ints(&[5, 4, 3, 2, 1]))
        .with("b", floats(&[0.5, 0.1]));
    let kth = KthArg::Nested(Value::Container(
        Container::new()
            .with("a", ints(&[4]))
            .with("b", ints(&[0])),
    ));
    let result = argpartition(
        &x,
        &kth,
        &PartitionConfig::default(),
        &MappingConfig::default(),
        None,
    )
    .unwrap();
    let a = leaf(&result, "a").as_nd().unwrap().index_values("a").unwrap();
    assert_eq!(a[4], 0);
    let b = leaf(&result, "b").as_nd().unwrap().index_values("b").unwrap();
    assert_eq!(b[0], 1);
}

#[test]
fn test_missing_key_chain_in_nested_argument() {
    let v = Value::Container(Container::new().with("a", ints(&[1])));
    let err = searchsorted(
        &sample(),
        &v,
        None,
        &SearchConfig::default(),
        &MappingConfig::default(),
        None,
    )
    .unwrap_err();
    assert!(matches!(err, OrderingError::KeyChainNotFound(chain) if chain == "b"));
}

#[test]
fn test_float_ret_dtype_fails_before_mapping() {
    let cfg = SearchConfig {
        ret_dtype: DType::Float64,
        ..SearchConfig::default()
    };
    let err = searchsorted(
        &Container::new(),
        &ints(&[0]),
        None,
        &cfg,
        &MappingConfig::default(),
        None,
    )
    .unwrap_err();
    assert!(matches!(err, OrderingError::InvalidDtype(_)));
}

#[test]
fn test_out_tree_is_written_and_returned() {
    let mut out = Value::Container(
        Container::new()
            .with("a", Value::Array(Array::from_vec(vec![0i32; 3])))
            .with("b", Value::Array(Array::from_vec(vec![0i32; 2]))),
    );
    let returned = argsort(
        &sample(),
        &SortConfig::default(),
        &MappingConfig::default(),
        Some(&mut out),
    )
    .unwrap();
    assert_eq!(returned, out);
    assert_eq!(leaf(&out, "a"), &Array::from_vec(vec![2i32, 1, 0]));
    assert_eq!(leaf(&out, "b"), &Array::from_vec(vec![1i32, 0]));
}

#[test]
fn test_mixed_backends_in_one_container() {
    let input = Container::new()
        .with("nd", floats(&[2.0, 1.0]))
        .with(
            "arrow",
            Value::Array(Array::Arrow(Arc::new(Float64Array::from(vec![9.0, -9.0])))),
        );
    let result = argsort(&input, &SortConfig::default(), &MappingConfig::default(), None).unwrap();
    assert_eq!(leaf(&result, "nd").kind(), ArrayKind::Ndarray);
    assert_eq!(leaf(&result, "nd"), &Array::from_vec(vec![1i64, 0]));
    assert_eq!(
        leaf(&result, "arrow"),
        &Array::Arrow(Arc::new(Int64Array::from(vec![1, 0])))
    );
}

#[test]
fn test_unregistered_backend_is_reported() {
    let registry = BackendRegistry::empty();
    let dispatcher = OrderingDispatcher::new(&registry);
    let err = dispatcher
        .sort(
            &sample(),
            &SortConfig::default(),
            &MappingConfig::default(),
            None,
        )
        .unwrap_err();
    assert!(matches!(err, OrderingError::BackendUnavailable(ArrayKind::Ndarray)));
}

#[test]
fn test_leaf_errors_propagate_unwrapped() {
    let cfg = SortConfig {
        axis: 1,
        ..SortConfig::default()
    };
    let err = sort(&sample(), &cfg, &MappingConfig::default(), None).unwrap_err();
    assert!(matches!(err, OrderingError::InvalidAxis { axis: 1, ndim: 1 }));

    let kth = KthArg::Fixed(Kth::Index(5));
    let err = argpartition(
        &sample(),
        &kth,
        &PartitionConfig::default(),
        &MappingConfig::default(),
        None,
    )
    .unwrap_err();
    assert!(matches!(err, OrderingError::InvalidKth { kth: 5, len: 3 }));
}

#[test]
fn test_renamed_selection_with_pruning() {
    let mapping = MappingConfig {
        key_chains: Some(KeyChainSelector::rename([("b", "sorted_b")])),
        prune_unapplied: true,
        ..MappingConfig::default()
    };
    let result = sort(&sample(), &SortConfig::default(), &mapping, None).unwrap();
    let container = result.as_container().unwrap();
    assert_eq!(container.leaf_key_chains(), vec!["sorted_b"]);
    assert_eq!(leaf(&result, "sorted_b"), &Array::from_vec(vec![2i64, 3]));
}
