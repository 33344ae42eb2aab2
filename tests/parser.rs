mod common;

use datagenesis::{
    data::{Dataset, Row, Value},
    error::DataError,
    export::to_csv_text,
    parser::{self, FileFormat},
};
use proptest::prelude::*;

use common::fixture_path;

fn row(pairs: &[(&str, Value)]) -> Row {
    pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.clone()))
        .collect()
}

#[test]
fn small_csv_parses_with_nulls_for_missing_values() {
    let dataset = parser::parse(b"name,age\nAlice,30\nBob,\n", "people.csv").unwrap();
    assert_eq!(
        dataset,
        Dataset::new(vec![
            row(&[("name", Value::from("Alice")), ("age", Value::from(30.0))]),
            row(&[("name", Value::from("Bob")), ("age", Value::Null)]),
        ])
    );
}

#[test]
fn quoted_commas_stay_in_one_field() {
    let dataset = parser::parse(b"id,city\n1,\"Portland, OR\"\n", "c.csv").unwrap();
    assert_eq!(dataset.len(), 1);
    assert_eq!(
        dataset.rows()[0].get("city"),
        Some(&Value::from("Portland, OR"))
    );
}

#[test]
fn fixture_skips_blank_lines_and_coerces_types() {
    let bytes = std::fs::read(fixture_path("customers.csv")).unwrap();
    let dataset = parser::parse(&bytes, "customers.csv").unwrap();
    assert_eq!(dataset.len(), 5);
    let dev = &dataset.rows()[3];
    assert_eq!(dev.get("is_active"), Some(&Value::Boolean(true)));
    assert_eq!(dev.get("signup_date"), Some(&Value::from("not recorded")));
    assert_eq!(dev.get("lifetime_value"), Some(&Value::from(980.25)));
    assert_eq!(
        dataset.columns(),
        vec![
            "customer_id",
            "name",
            "city",
            "signup_date",
            "lifetime_value",
            "is_active"
        ]
    );
}

#[test]
fn short_lines_fill_missing_columns_with_null() {
    let dataset = parser::parse(b"a,b,c\n1\n", "short.csv").unwrap();
    assert_eq!(dataset.rows()[0].get("c"), Some(&Value::Null));
    assert_eq!(dataset.rows()[0].len(), 3);
}

#[test]
fn csv_without_data_rows_is_a_parse_error() {
    for content in [&b"header_only\n"[..], b"a,b\n , \n,\n", b""] {
        let err = parser::parse(content, "empty.csv").unwrap_err();
        assert!(matches!(err, DataError::Parse { .. }), "{err}");
    }
}

#[test]
fn spreadsheets_are_unsupported_regardless_of_content() {
    let err = parser::parse(b"name,age\nAlice,30\n", "book.xlsx").unwrap_err();
    match err {
        DataError::UnsupportedFormat { extension, .. } => assert_eq!(extension, "xlsx"),
        other => panic!("unexpected error: {other}"),
    }
    assert!(FileFormat::from_file_name("notes").is_err());
    assert_eq!(FileFormat::from_file_name("DATA.JSON").unwrap(), FileFormat::Json);
}

#[test]
fn json_array_and_single_object_are_accepted() {
    let bytes = std::fs::read(fixture_path("orders.json")).unwrap();
    let orders = parser::parse(&bytes, "orders.json").unwrap();
    assert_eq!(orders.len(), 3);
    assert_eq!(
        orders.rows()[0].get("items"),
        Some(&Value::from(r#"["book","pen"]"#))
    );

    let single = parser::parse(br#"{"a": 1, "b": "x"}"#, "one.json").unwrap();
    assert_eq!(single.len(), 1);
    assert_eq!(single.rows()[0].keys().collect::<Vec<_>>(), vec!["a", "b"]);

    let empty = parser::parse(b"[]", "none.json").unwrap();
    assert!(empty.is_empty());
}

#[test]
fn json_scalars_are_rejected() {
    for content in [&b"42"[..], b"\"text\"", b"[1, 2]", b"{oops"] {
        let err = parser::parse(content, "bad.json").unwrap_err();
        assert!(matches!(err, DataError::Parse { .. }));
    }
}

#[test]
fn latin1_uploads_decode_with_explicit_encoding() {
    let bytes = b"name\nJos\xe9\n";
    let dataset =
        parser::parse_with_encoding(bytes, "latin.csv", encoding_rs::WINDOWS_1252).unwrap();
    assert_eq!(dataset.rows()[0].get("name"), Some(&Value::from("José")));
    assert!(parser::parse(bytes, "latin.csv").is_err());
}

fn cell() -> impl Strategy<Value = Value> {
    prop_oneof![
        (-100_000i64..100_000).prop_map(Value::from),
        "[a-z]{1,8}( [a-z]{1,8})?"
            .prop_filter("boolean words coerce", |s| s != "true" && s != "false")
            .prop_map(Value::String),
    ]
}

fn dataset_strategy() -> impl Strategy<Value = Vec<Row>> {
    (1usize..5).prop_flat_map(|columns| {
        prop::collection::vec(prop::collection::vec(cell(), columns), 1..12).prop_map(
            move |rows| {
                rows.into_iter()
                    .map(|values| {
                        values
                            .into_iter()
                            .enumerate()
                            .map(|(idx, value)| (format!("col{idx}"), value))
                            .collect()
                    })
                    .collect()
            },
        )
    })
}

proptest! {
    #[test]
    fn csv_text_round_trips(rows in dataset_strategy()) {
        let text = to_csv_text(&rows);
        let parsed = parser::parse(text.as_bytes(), "round.csv").unwrap();
        prop_assert_eq!(parsed.rows(), rows.as_slice());
    }

    #[test]
    fn quoted_values_with_commas_survive(left in "[a-z]{1,6}", right in "[a-z]{1,6}") {
        let value = format!("{left}, {right}");
        let text = format!("k,v\n1,\"{value}\"\n");
        let parsed = parser::parse(text.as_bytes(), "q.csv").unwrap();
        prop_assert_eq!(parsed.rows()[0].get("v"), Some(&Value::String(value)));
    }
}
