mod common;

use common::{SAMPLE_CSV, TestWorkspace};
use rust_decimal::dec;
use salescope::{
    aggregate::aggregate, clean::clean, io_utils::DEFAULT_CSV_DELIMITER, load::load_table,
};

#[test]
fn pipeline_produces_expected_aggregates() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("sales.csv", SAMPLE_CSV);

    let raw = load_table(&input, DEFAULT_CSV_DELIMITER, 0).expect("load sample");
    assert_eq!(raw.len(), 7);

    let (cleaned, report) = clean(raw).expect("clean sample");
    assert_eq!(report.imputed_rows, 1);
    assert_eq!(report.median_quantity, dec!(2));
    assert_eq!(report.duplicates_dropped, 1);
    assert_eq!(cleaned.len(), 6);
    assert_eq!(cleaned.total_revenue(), dec!(4130));

    let aggregates = aggregate(&cleaned);
    assert_eq!(
        aggregates.category_revenue,
        vec![
            ("Electronics".to_string(), dec!(2800)),
            ("Clothing".to_string(), dec!(1330)),
        ]
    );
    assert_eq!(
        aggregates.city_revenue,
        vec![
            ("Pune".to_string(), dec!(1450)),
            ("Mumbai".to_string(), dec!(1400)),
            ("Delhi".to_string(), dec!(1280)),
        ]
    );
    assert_eq!(
        aggregates.product_revenue,
        vec![
            ("Phone".to_string(), dec!(2000)),
            ("Shirt".to_string(), dec!(880)),
            ("Laptop".to_string(), dec!(800)),
            ("Jeans".to_string(), dec!(450)),
        ]
    );
    assert_eq!(
        aggregates.daily_revenue,
        vec![
            ("2024-01-01".parse().unwrap(), dec!(1000)),
            ("2024-01-02".parse().unwrap(), dec!(1200)),
            ("2024-01-03".parse().unwrap(), dec!(1450)),
            ("2024-01-04".parse().unwrap(), dec!(480)),
        ]
    );
    // Transaction counts tie at three apiece; first-seen order wins.
    assert_eq!(
        aggregates.category_transactions,
        vec![("Electronics".to_string(), 3), ("Clothing".to_string(), 3)]
    );
}

#[test]
fn pipeline_is_deterministic_across_runs() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("sales.csv", SAMPLE_CSV);

    let first = {
        let raw = load_table(&input, DEFAULT_CSV_DELIMITER, 0).expect("load");
        let (cleaned, _) = clean(raw).expect("clean");
        aggregate(&cleaned)
    };
    let second = {
        let raw = load_table(&input, DEFAULT_CSV_DELIMITER, 0).expect("load");
        let (cleaned, _) = clean(raw).expect("clean");
        aggregate(&cleaned)
    };
    assert_eq!(first, second);
}

#[test]
fn header_order_does_not_change_results() {
    let reordered = "\
unit_price,city,category,date,product,quantity
500,Pune,Electronics,2024-01-01,Phone,2
200,Mumbai,Clothing,2024-01-02,Shirt,2
";
    let workspace = TestWorkspace::new();
    let input = workspace.write("reordered.csv", reordered);

    let raw = load_table(&input, DEFAULT_CSV_DELIMITER, 0).expect("load reordered");
    let (cleaned, _) = clean(raw).expect("clean reordered");
    let aggregates = aggregate(&cleaned);

    assert_eq!(cleaned.total_revenue(), dec!(1400));
    assert_eq!(
        aggregates.category_revenue,
        vec![
            ("Electronics".to_string(), dec!(1000)),
            ("Clothing".to_string(), dec!(400)),
        ]
    );
}

#[test]
fn load_rejects_duplicated_header_column() {
    let duplicated = "\
date,date,category,city,product,quantity,unit_price
2024-01-01,2024-01-02,Electronics,Pune,Phone,2,500
";
    let workspace = TestWorkspace::new();
    let input = workspace.write("duplicated.csv", duplicated);

    let err = load_table(&input, DEFAULT_CSV_DELIMITER, 0).expect_err("duplicate column");
    assert!(
        err.to_string().contains("unexpected [date]"),
        "unexpected error: {err}"
    );
}

#[test]
fn load_rejects_ragged_rows() {
    let ragged = "\
date,category,city,product,quantity,unit_price
2024-01-01,Electronics,Pune,Phone,2,500
2024-01-02,Electronics,Pune,Phone,2
";
    let workspace = TestWorkspace::new();
    let input = workspace.write("ragged.csv", ragged);

    let err = load_table(&input, DEFAULT_CSV_DELIMITER, 0).expect_err("short row must fail");
    assert!(
        err.to_string().contains("failed to read"),
        "unexpected error: {err}"
    );
}

#[test]
fn load_limit_caps_rows_before_cleaning() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("sales.csv", SAMPLE_CSV);

    let raw = load_table(&input, DEFAULT_CSV_DELIMITER, 3).expect("load limited");
    assert_eq!(raw.len(), 3);

    // Rows 2-4 of the file: the duplicate collapses and the blank quantity
    // takes the median of the two present values.
    let (cleaned, report) = clean(raw).expect("clean limited");
    assert_eq!(cleaned.len(), 2);
    assert_eq!(report.median_quantity, dec!(2));
}
