#[cfg(test)]
mod tests {
    use sightline::model::{Frame, Record, Value};

    fn sample() -> Frame {
        let mut frame = Frame::from_columns(&["Owner", "Amount"]);
        for (owner, amount) in [("Ana", 10.0), ("Bob", 20.0), ("Ana", 5.0)] {
            let mut row = Record::new();
            row.set("Owner", Value::text(owner));
            row.set("Amount", Value::Number(amount));
            frame.push(row);
        }
        frame
    }

    #[test]
    fn test_empty_frame_keeps_schema() {
        let frame = sample();
        let empty = frame.empty_like();
        assert!(empty.is_empty());
        assert_eq!(empty.columns(), frame.columns());
    }

    #[test]
    fn test_filtered_preserves_schema_and_rows() {
        let frame = sample();
        let anas = frame.filtered(|r| r.text("Owner") == Some("Ana"));
        assert_eq!(anas.len(), 2);
        assert_eq!(anas.columns(), frame.columns());
    }

    #[test]
    fn test_select_renames_columns() {
        let frame = sample();
        let projected = frame.select(&[
            ("Owner".to_string(), "Deal Owner".to_string()),
            ("Amount".to_string(), "Value".to_string()),
        ]);
        assert_eq!(projected.columns(), ["Deal Owner", "Value"]);
        assert_eq!(projected.rows()[0].canonical("Deal Owner"), "Ana");
        assert_eq!(projected.rows()[0].number("Value"), Some(10.0));
    }

    #[test]
    fn test_distinct_values_sorted_and_deduped() {
        let frame = sample();
        assert_eq!(frame.distinct_values("Owner"), ["Ana", "Bob"]);
    }

    #[test]
    fn test_missing_field_reads_as_null() {
        let frame = sample();
        let row = &frame.rows()[0];
        assert_eq!(row.value("Nope"), Value::Null);
        assert!(row.is_blank("Nope"));
        assert_eq!(row.canonical("Nope"), "");
    }
}
