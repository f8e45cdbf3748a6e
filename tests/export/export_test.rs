#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use sightline::export::to_csv;
    use sightline::model::{Frame, Record, Value};

    fn frame() -> Frame {
        let mut frame = Frame::from_columns(&["MP", "Name", "Due Date", "Receivables"]);
        let mut first = Record::new();
        first.set("MP", Value::text("Alpha"));
        first.set("Name", Value::text("Acme, Inc."));
        first.set(
            "Due Date",
            Value::Date(NaiveDate::from_ymd_opt(2025, 7, 31).unwrap()),
        );
        first.set("Receivables", Value::Number(1500.0));
        frame.push(first);

        let mut second = Record::new();
        second.set("MP", Value::text("Beta"));
        second.set("Name", Value::Null);
        second.set("Due Date", Value::Null);
        second.set("Receivables", Value::Number(12.5));
        frame.push(second);
        frame
    }

    #[test]
    fn test_csv_shape() {
        let text = String::from_utf8(to_csv(&frame()).unwrap()).unwrap();
        let expected = "\
MP,Name,Due Date,Receivables
Alpha,\"Acme, Inc.\",2025-07-31,1500
Beta,,,12.5
";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_csv_snapshot() {
        let text = String::from_utf8(to_csv(&frame()).unwrap()).unwrap();
        insta::assert_snapshot!(text.trim_end(), @r#"
        MP,Name,Due Date,Receivables
        Alpha,"Acme, Inc.",2025-07-31,1500
        Beta,,,12.5
        "#);
    }

    #[test]
    fn test_empty_frame_exports_header_only() {
        let empty = Frame::from_columns(&["A", "B"]);
        let text = String::from_utf8(to_csv(&empty).unwrap()).unwrap();
        assert_eq!(text, "A,B\n");
    }
}
