//! End-to-end requests against a small customer list.

use sifter::{
    FilterCondition, FilterError, FilterRequest, FilterResponse, Filterable, Operator,
    RuntimeValue, SortDirection,
};

#[derive(Debug, Clone, Default, PartialEq, Filterable)]
#[filter(rename_all = "PascalCase")]
struct Customer {
    id: i32,
    name: String,
    age: Option<i32>,
    address: String,
}

fn customer(id: i32, name: &str, age: i32, address: &str) -> Customer {
    Customer {
        id,
        name: name.to_string(),
        age: Some(age),
        address: address.to_string(),
    }
}

fn customers() -> Vec<Customer> {
    vec![
        customer(1, "John Doe", 30, "123 Main St"),
        customer(2, "Jane Smith", 25, "456 Elm St"),
        customer(3, "Mike Johnson", 40, "789 Oak St"),
        customer(4, "Alice Cooper", 30, "321 Pine St"),
    ]
}

fn run(request: FilterRequest) -> FilterResponse<Customer> {
    request.apply(&customers()).unwrap()
}

fn ids(response: &FilterResponse<Customer>) -> Vec<i32> {
    response.data.iter().map(|c| c.id).collect()
}

// ============================================================================
// Comparison operators
// ============================================================================

#[test]
fn equals_matches_both_thirty_year_olds() {
    let response = run(FilterRequest::new().and_eq(Customer::AGE, 30));
    assert_eq!(ids(&response), vec![1, 4]);
}

#[test]
fn not_equals_excludes_matches() {
    let response = run(FilterRequest::new().and_ne(Customer::AGE, 30));
    assert_eq!(ids(&response), vec![2, 3]);
}

#[test]
fn ordering_operators() {
    assert_eq!(ids(&run(FilterRequest::new().and_gt("Age", 30))), vec![3]);
    assert_eq!(ids(&run(FilterRequest::new().and_gte("Age", 30))), vec![1, 3, 4]);
    assert_eq!(ids(&run(FilterRequest::new().and_lt("Age", 30))), vec![2]);
    assert_eq!(ids(&run(FilterRequest::new().and_lte("Age", 30))), vec![1, 2, 4]);
}

#[test]
fn string_values_are_coerced_to_the_field_type() {
    let response = run(FilterRequest::new().and_eq("Age", "30"));
    assert_eq!(response.data.len(), 2);
}

#[test]
fn in_and_not_in() {
    let response = run(FilterRequest::new().and_in("Age", [25, 40]));
    assert_eq!(ids(&response), vec![2, 3]);

    let response = run(FilterRequest::new().and_not_in("Age", [25, 40]));
    assert_eq!(ids(&response), vec![1, 4]);
}

#[test]
fn in_accepts_a_single_value() {
    let response = run(FilterRequest::new().and("Age", Operator::In, 25));
    assert_eq!(ids(&response), vec![2]);
}

// ============================================================================
// String operators
// ============================================================================

#[test]
fn contains_is_case_sensitive() {
    assert_eq!(ids(&run(FilterRequest::new().and_contains("Address", "Main"))), vec![1]);
    assert!(run(FilterRequest::new().and_contains("Address", "main")).data.is_empty());
}

#[test]
fn starts_with_and_ends_with() {
    assert_eq!(ids(&run(FilterRequest::new().and_startswith("Name", "John"))), vec![1]);
    assert_eq!(ids(&run(FilterRequest::new().and_endswith("Name", "Smith"))), vec![2]);
}

#[test]
fn not_contains_can_exclude_everything() {
    let response = run(FilterRequest::new().and_not_contains("Address", "St"));
    assert!(response.data.is_empty());
}

#[test]
fn string_operator_on_number_field_is_rejected() {
    let err = FilterRequest::new()
        .and_contains("Age", "3")
        .apply(&customers())
        .unwrap_err();
    assert!(matches!(
        err,
        FilterError::UnsupportedOperator {
            op: Operator::Contains,
            ..
        }
    ));
}

// ============================================================================
// Conjunction and custom predicates
// ============================================================================

#[test]
fn conditions_are_anded() {
    let response = run(FilterRequest::new()
        .and_eq("Age", 30)
        .and_contains("Address", "Main"));
    assert_eq!(ids(&response), vec![1]);
}

#[test]
fn custom_predicate_filters_records() {
    let response = run(FilterRequest::new().custom(|c: &Customer| c.age.is_some_and(|a| a > 30)));
    assert_eq!(ids(&response), vec![3]);
}

#[test]
fn custom_predicate_combines_with_conditions() {
    let response = run(FilterRequest::new()
        .and_gte("Age", 30)
        .custom(|c: &Customer| c.name.contains('o')));
    assert_eq!(ids(&response), vec![1, 3, 4]);

    let response = run(FilterRequest::new()
        .and_eq("Age", 30)
        .custom(|c: &Customer| c.id > 1));
    assert_eq!(ids(&response), vec![4]);
}

#[test]
fn custom_predicate_for_another_type_is_rejected() {
    let err = FilterRequest::new()
        .custom(|n: &u32| *n > 1)
        .apply(&customers())
        .unwrap_err();
    assert!(matches!(err, FilterError::InvalidCustomPredicate { .. }));
}

#[test]
fn empty_request_returns_first_default_page() {
    let response = run(FilterRequest::new());
    assert_eq!(ids(&response), vec![1, 2, 3, 4]);
    assert_eq!(response.page, 1);
    assert_eq!(response.page_size, 10);
    assert_eq!(response.total_count, None);
}

// ============================================================================
// Sorting, selection and paging
// ============================================================================

#[test]
fn sort_ascending_and_descending() {
    let response = run(FilterRequest::new().sort_asc("Name"));
    assert_eq!(ids(&response), vec![4, 2, 1, 3]);

    let response = run(FilterRequest::new().sort("Age", SortDirection::Descending));
    assert_eq!(ids(&response), vec![3, 1, 4, 2]);
}

#[test]
fn sort_is_stable_for_equal_keys() {
    let response = run(FilterRequest::new().sort_asc("Age"));
    assert_eq!(ids(&response), vec![2, 1, 4, 3]);
}

#[test]
fn select_resets_other_fields() {
    let response = run(FilterRequest::new().and_eq("Id", 3).select(["Id", "Name"]));
    assert_eq!(
        response.data,
        vec![Customer {
            id: 3,
            name: "Mike Johnson".to_string(),
            age: None,
            address: String::new(),
        }]
    );
}

#[test]
fn paging_with_count() {
    let response = run(FilterRequest::new()
        .sort_asc("Id")
        .page(2)
        .page_size(2)
        .with_count());
    assert_eq!(ids(&response), vec![3, 4]);
    assert_eq!(response.total_count, Some(4));
    assert_eq!(response.page_count(), 2);
}

#[test]
fn page_past_the_end_is_empty() {
    let response = run(FilterRequest::new().page(5).page_size(2).with_count());
    assert!(response.data.is_empty());
    assert_eq!(response.total_count, Some(4));
}

// ============================================================================
// Field names
// ============================================================================

#[test]
fn field_names_ignore_case() {
    let response = run(FilterRequest::new().and_eq("age", 30).sort_desc("NAME"));
    assert_eq!(ids(&response), vec![1, 4]);
}

#[test]
fn unknown_field_is_rejected() {
    let err = FilterRequest::new()
        .and_eq("Foo", 1)
        .apply(&customers())
        .unwrap_err();
    assert_eq!(
        err,
        FilterError::UnknownField {
            name: "Foo".to_string()
        }
    );

    assert!(FilterRequest::new().sort_asc("Foo").apply(&customers()).is_err());
    assert!(FilterRequest::new().select(["Foo"]).apply(&customers()).is_err());
}

// ============================================================================
// JSON requests
// ============================================================================

#[test]
fn json_request_matches_builder_semantics() {
    let request: FilterRequest = serde_json::from_str(
        r#"{
            "filters": [
                { "name": "Age", "operator": "Equals", "value": 30 },
                { "name": "Address", "operator": "Contains", "value": "Main" }
            ],
            "sort": { "name": "Name", "direction": "Ascending" },
            "select": ["Id", "Name"],
            "page": 1,
            "pageSize": 10,
            "count": true
        }"#,
    )
    .unwrap();

    let response = request.apply(&customers()).unwrap();
    assert_eq!(response.total_count, Some(1));
    assert_eq!(response.data[0].name, "John Doe");
    assert_eq!(response.data[0].age, None);

    let json = serde_json::to_value(response.map(|c| c.id)).unwrap();
    assert_eq!(json["data"], serde_json::json!([1]));
    assert_eq!(json["pageCount"], 1);
}

#[test]
fn ordinal_operators_and_directions() {
    let request: FilterRequest = serde_json::from_str(
        r#"{
            "filters": [{ "field": "Age", "operator": 10, "value": [25, 40] }],
            "sort": { "field": "Age", "direction": 1 }
        }"#,
    )
    .unwrap();
    assert_eq!(request.filters[0].operator, Operator::In);
    assert_eq!(ids(&request.apply(&customers()).unwrap()), vec![3, 2]);
}

#[test]
fn null_value_compares_against_missing_age() {
    let mut people = customers();
    people[1].age = None;

    let request = FilterRequest {
        filters: vec![FilterCondition::new("Age", Operator::Equals, RuntimeValue::Null)],
        ..FilterRequest::default()
    };
    let response = request.apply(&people).unwrap();
    assert_eq!(ids(&response), vec![2]);
}

#[test]
fn requests_and_plans_are_thread_safe() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<FilterRequest>();
    assert_send_sync::<sifter::QueryPlan<Customer>>();
    assert_send_sync::<FilterResponse<Customer>>();
}

#[test]
fn compiled_plan_runs_repeatedly() {
    let plan = FilterRequest::new()
        .and_in("Age", [30, 40])
        .sort_desc("Id")
        .compile::<Customer>()
        .unwrap();
    let data = customers();

    let first = plan.run(&data);
    let second = plan.run(&data);
    assert_eq!(ids(&first), vec![4, 3, 1]);
    assert_eq!(first.data, second.data);
    assert_eq!(
        plan.filter().map(ToString::to_string).as_deref(),
        Some("Age IN [30, 40]")
    );
}
