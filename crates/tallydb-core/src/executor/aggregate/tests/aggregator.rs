use super::*;
use crate::{
    config::ExecutionConfig,
    error::ErrorClass,
    executor::aggregate::{
        AggregateOp, AggregateTarget, Aggregator, AggregatorSpec, NumericAggregator,
        TextAggregator,
    },
};

fn aggregator(aggregate_field: usize, group_field: Option<usize>, op: AggregateOp) -> Aggregator {
    let spec = AggregatorSpec::resolve(&staff_schema(), aggregate_field, group_field, op)
        .expect("staff spec should resolve");

    Aggregator::new(spec, ExecutionConfig::default()).expect("aggregator should build")
}

fn merge_all(aggregator: &mut Aggregator, tuples: &[Tuple]) {
    for tuple in tuples {
        aggregator
            .merge_tuple_into_group(tuple)
            .expect("merge should succeed");
    }
}

fn staff_tuples() -> Vec<Tuple> {
    vec![
        staff_tuple("ada", "eng", 100),
        staff_tuple("bo", "sales", 200),
        staff_tuple("cy", "eng", 300),
    ]
}

fn results(aggregator: &Aggregator) -> Vec<Vec<Value>> {
    let mut iter = aggregator.iterator().expect("snapshot should build");
    iter.open().expect("snapshot should open");

    rows_of(&mut iter)
}

#[test]
fn variant_is_selected_from_aggregate_field_type() {
    assert!(matches!(
        aggregator(SALARY, None, AggregateOp::Sum),
        Aggregator::Numeric(_)
    ));
    assert!(matches!(
        aggregator(NAME, Some(DEPT), AggregateOp::Count),
        Aggregator::Text(_)
    ));
}

#[test]
fn grouped_avg_per_department() {
    let mut agg = aggregator(SALARY, Some(DEPT), AggregateOp::Avg);
    merge_all(&mut agg, &staff_tuples());

    assert_eq!(
        results(&agg),
        vec![
            vec![text("eng"), Value::Int(200)],
            vec![text("sales"), Value::Int(200)],
        ]
    );
    assert_eq!(agg.group_count(), 2);
}

#[test]
fn grouped_min_max_and_sum() {
    let tuples = vec![
        staff_tuple("ada", "eng", -5),
        staff_tuple("bo", "ops", 7),
        staff_tuple("cy", "eng", 12),
        staff_tuple("di", "eng", 3),
    ];

    let expected = [
        (AggregateOp::Min, [-5, 7]),
        (AggregateOp::Max, [12, 7]),
        (AggregateOp::Sum, [10, 7]),
        (AggregateOp::Count, [3, 1]),
    ];
    for (op, [eng, ops]) in expected {
        let mut agg = aggregator(SALARY, Some(DEPT), op);
        merge_all(&mut agg, &tuples);

        assert_eq!(
            results(&agg),
            vec![
                vec![text("eng"), Value::Int(eng)],
                vec![text("ops"), Value::Int(ops)],
            ],
            "unexpected result for {op}"
        );
    }
}

#[test]
fn ungrouped_count_emits_single_row() {
    let mut agg = aggregator(SALARY, None, AggregateOp::Count);
    merge_all(&mut agg, &staff_tuples());

    assert_eq!(results(&agg), vec![vec![Value::Int(3)]]);
}

#[test]
fn text_field_count_groups_by_department() {
    let mut agg = aggregator(NAME, Some(DEPT), AggregateOp::Count);
    merge_all(&mut agg, &staff_tuples());

    assert_eq!(
        results(&agg),
        vec![
            vec![text("eng"), Value::Int(2)],
            vec![text("sales"), Value::Int(1)],
        ]
    );
}

#[test]
fn groups_are_emitted_in_ascending_key_order() {
    let mut agg = aggregator(SALARY, Some(DEPT), AggregateOp::Count);
    merge_all(
        &mut agg,
        &[
            staff_tuple("a", "zeta", 1),
            staff_tuple("b", "alpha", 1),
            staff_tuple("c", "mid", 1),
        ],
    );

    let keys = results(&agg)
        .into_iter()
        .map(|row| row[0].clone())
        .collect::<Vec<_>>();
    assert_eq!(keys, vec![text("alpha"), text("mid"), text("zeta")]);
}

#[test]
fn iterator_is_a_frozen_snapshot() {
    let mut agg = aggregator(SALARY, Some(DEPT), AggregateOp::Sum);
    merge_all(&mut agg, &staff_tuples());

    let mut snapshot = agg.iterator().expect("snapshot");
    agg.merge_tuple_into_group(&staff_tuple("di", "eng", 1_000))
        .expect("merge after snapshot");
    agg.merge_tuple_into_group(&staff_tuple("ed", "legal", 5))
        .expect("merge after snapshot");

    snapshot.open().expect("open snapshot");
    assert_eq!(
        rows_of(&mut snapshot),
        vec![
            vec![text("eng"), Value::Int(400)],
            vec![text("sales"), Value::Int(200)],
        ]
    );
    assert_eq!(results(&agg).len(), 3);
}

#[test]
fn empty_input_conventions() {
    for op in AggregateOp::ALL {
        let agg = aggregator(SALARY, None, op);
        let expected = if op == AggregateOp::Count {
            vec![vec![Value::Int(0)]]
        } else {
            Vec::new()
        };
        assert_eq!(results(&agg), expected, "ungrouped {op} over no input");

        let grouped = aggregator(SALARY, Some(DEPT), op);
        assert!(
            results(&grouped).is_empty(),
            "grouped {op} over no input should emit nothing"
        );
    }
}

#[test]
fn output_schema_names_and_types() {
    let grouped = aggregator(SALARY, Some(DEPT), AggregateOp::Avg);
    let schema = grouped.output_schema();
    assert_eq!(schema.len(), 2);
    assert_eq!(schema.field_name(0).expect("group column"), "dept");
    assert_eq!(schema.field_type(0).expect("group column"), FieldType::Text);
    assert_eq!(schema.field_name(1).expect("agg column"), "avg(salary)");
    assert_eq!(schema.field_type(1).expect("agg column"), FieldType::Int);

    let ungrouped = aggregator(NAME, None, AggregateOp::Count);
    assert_eq!(ungrouped.output_schema().len(), 1);
    assert_eq!(
        ungrouped.output_schema().field_name(0).expect("agg column"),
        "count(name)"
    );
}

#[test]
fn text_non_count_functions_are_rejected_at_construction() {
    for op in [
        AggregateOp::Sum,
        AggregateOp::Avg,
        AggregateOp::Min,
        AggregateOp::Max,
    ] {
        let err = AggregatorSpec::resolve(&staff_schema(), NAME, None, op)
            .expect_err("text aggregate must reject non-count functions");
        assert!(err.is_type_mismatch(), "{op} on text: {err}");

        // A hand-built spec bypassing resolution is rejected the same way.
        let spec = AggregatorSpec {
            group: None,
            target: AggregateTarget {
                field: NAME,
                field_type: FieldType::Text,
                name: "name".to_string(),
            },
            op,
        };
        let err = Aggregator::new(spec, ExecutionConfig::default())
            .expect_err("aggregator must reject non-count text spec");
        assert!(err.is_type_mismatch());
    }
}

#[test]
fn variant_rejects_foreign_field_type() {
    let text_spec = AggregatorSpec::resolve(&staff_schema(), NAME, None, AggregateOp::Count)
        .expect("text count resolves");
    let err = NumericAggregator::new(text_spec, ExecutionConfig::default())
        .expect_err("numeric variant must reject text target");
    assert!(err.is_type_mismatch());

    let int_spec = AggregatorSpec::resolve(&staff_schema(), SALARY, None, AggregateOp::Count)
        .expect("int count resolves");
    let err = TextAggregator::new(int_spec, ExecutionConfig::default())
        .expect_err("text variant must reject int target");
    assert!(err.is_type_mismatch());
}

#[test]
fn merge_rejects_group_value_of_wrong_type() {
    let mut agg = aggregator(SALARY, Some(DEPT), AggregateOp::Sum);
    let shifted = Arc::new(Schema::from_pairs([
        ("name", FieldType::Text),
        ("dept_id", FieldType::Int),
        ("salary", FieldType::Int),
    ]));
    let tuple = Tuple::new(shifted, vec![text("ada"), Value::Int(4), Value::Int(10)])
        .expect("valid tuple");

    let err = agg
        .merge_tuple_into_group(&tuple)
        .expect_err("int group value must be rejected for text group");
    assert!(err.is_type_mismatch());
    assert_eq!(agg.group_count(), 0);
}

#[test]
fn merge_rejects_aggregate_value_of_wrong_type() {
    let mut agg = aggregator(SALARY, None, AggregateOp::Sum);
    let shifted = Arc::new(Schema::from_pairs([
        ("name", FieldType::Text),
        ("dept", FieldType::Text),
        ("salary", FieldType::Text),
    ]));
    let tuple = Tuple::new(shifted, vec![text("ada"), text("eng"), text("lots")])
        .expect("valid tuple");

    let err = agg
        .merge_tuple_into_group(&tuple)
        .expect_err("text value must be rejected by numeric aggregator");
    assert!(err.is_type_mismatch());
}

#[test]
fn merge_rejects_short_tuple() {
    let mut agg = aggregator(SALARY, Some(DEPT), AggregateOp::Sum);
    let narrow = Arc::new(Schema::from_pairs([("name", FieldType::Text)]));
    let tuple = Tuple::new(narrow, vec![text("ada")]).expect("valid tuple");

    let err = agg
        .merge_tuple_into_group(&tuple)
        .expect_err("missing group field must fail");
    assert!(err.is_no_such_field());
}

#[test]
fn sum_overflow_is_reported() {
    let mut agg = aggregator(SALARY, None, AggregateOp::Sum);
    agg.merge_tuple_into_group(&staff_tuple("a", "x", i64::MAX))
        .expect("first value fits");

    let err = agg
        .merge_tuple_into_group(&staff_tuple("b", "x", 1))
        .expect_err("sum past i64::MAX must fail");
    assert_eq!(err.class, ErrorClass::Overflow);
}

#[test]
fn group_limit_rejects_new_group_without_charging() {
    let spec = AggregatorSpec::resolve(&staff_schema(), SALARY, Some(DEPT), AggregateOp::Sum)
        .expect("spec");
    let mut agg = Aggregator::new(spec, ExecutionConfig::with_hard_limits(1, u64::MAX))
        .expect("aggregator");

    agg.merge_tuple_into_group(&staff_tuple("a", "eng", 1))
        .expect("first group fits");
    agg.merge_tuple_into_group(&staff_tuple("b", "eng", 2))
        .expect("existing group is not charged again");

    let err = agg
        .merge_tuple_into_group(&staff_tuple("c", "sales", 3))
        .expect_err("second group exceeds limit");
    assert_eq!(err.class, ErrorClass::ResourceLimit);
    assert_eq!(agg.group_count(), 1);
    assert_eq!(agg.budget().groups(), 1);
}

#[test]
fn reset_clears_groups_and_budget() {
    let mut agg = aggregator(SALARY, Some(DEPT), AggregateOp::Count);
    merge_all(&mut agg, &staff_tuples());
    assert!(agg.budget().estimated_bytes() > 0);

    agg.reset();

    assert_eq!(agg.group_count(), 0);
    assert_eq!(agg.budget().groups(), 0);
    assert_eq!(agg.budget().estimated_bytes(), 0);
    assert!(results(&agg).is_empty());
}
