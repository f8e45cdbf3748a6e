#[cfg(test)]
mod tests {
    use sightline::aggregate::{
        aggregate, format_percent, percent_of, AggregateSpec, Denominator, DerivedExpr,
        MeasureKind, OutputOrder, PercentStyle, TOTAL_LABEL,
    };
    use sightline::model::{Frame, Record, Value};

    fn deal(owner: &str, stage: &str, name: &str) -> Record {
        let mut row = Record::new();
        row.set("owner", Value::text(owner));
        row.set("stage", Value::text(stage));
        row.set("name", Value::text(name));
        let closed = if stage == "Closed-Won" { 1.0 } else { 0.0 };
        row.set("closed", Value::Number(closed));
        row
    }

    fn deals() -> Frame {
        Frame::with_rows(
            vec![
                "owner".to_string(),
                "stage".to_string(),
                "name".to_string(),
                "closed".to_string(),
            ],
            vec![
                deal("A", "Closed-Won", "D1"),
                deal("A", "Open", "D2"),
                deal("B", "Closed-Won", "D3"),
            ],
        )
    }

    fn closing_spec() -> AggregateSpec {
        AggregateSpec::new("owner")
            .measure(
                "entered",
                MeasureKind::CountDistinct {
                    field: "name".to_string(),
                    only_if: None,
                },
            )
            .measure(
                "closed",
                MeasureKind::CountDistinct {
                    field: "name".to_string(),
                    only_if: Some("closed".to_string()),
                },
            )
            .ratio(
                "pct",
                "closed",
                Denominator::Column("entered".to_string()),
                PercentStyle::Trimmed,
            )
            .with_total()
    }

    #[test]
    fn test_closed_rate_by_owner() {
        let out = aggregate(&deals(), &closing_spec());
        assert_eq!(out.len(), 3);

        let a = &out.rows()[0];
        assert_eq!(a.canonical("owner"), "A");
        assert_eq!(a.number("entered"), Some(2.0));
        assert_eq!(a.number("closed"), Some(1.0));
        assert_eq!(a.canonical("pct"), "50.0%");

        let b = &out.rows()[1];
        assert_eq!(b.canonical("owner"), "B");
        assert_eq!(b.number("entered"), Some(1.0));
        assert_eq!(b.canonical("pct"), "100.0%");

        let total = &out.rows()[2];
        assert_eq!(total.canonical("owner"), TOTAL_LABEL);
        assert_eq!(total.number("entered"), Some(3.0));
        assert_eq!(total.number("closed"), Some(2.0));
        // Recomputed from summed counts, not averaged from per-group ratios.
        assert_eq!(total.canonical("pct"), "66.67%");
    }

    #[test]
    fn test_total_row_is_columnwise_sum() {
        let out = aggregate(&deals(), &closing_spec());
        let (groups, total) = out.rows().split_at(out.len() - 1);
        let entered_sum: f64 = groups.iter().map(|r| r.number("entered").unwrap()).sum();
        assert_eq!(total[0].number("entered"), Some(entered_sum));
    }

    #[test]
    fn test_ratio_with_zero_denominator_is_zero() {
        assert_eq!(percent_of(5.0, 0.0), 0.0);
        let empty = Frame::from_columns(&["owner", "stage", "name", "closed"]);
        let out = aggregate(&empty, &closing_spec());
        assert_eq!(out.len(), 1);
        let total = &out.rows()[0];
        assert_eq!(total.canonical("owner"), TOTAL_LABEL);
        assert_eq!(total.number("entered"), Some(0.0));
        assert_eq!(total.canonical("pct"), "0.0%");
    }

    #[test]
    fn test_empty_input_without_total_row_is_empty() {
        let empty = Frame::from_columns(&["owner"]);
        let spec = AggregateSpec::new("owner").measure("n", MeasureKind::Count);
        let out = aggregate(&empty, &spec);
        assert!(out.is_empty());
        assert_eq!(out.columns(), ["owner", "n"]);
    }

    #[test]
    fn test_grand_total_ratio_sums_to_one_hundred() {
        let spec = AggregateSpec::new("stage")
            .measure("Deals_In_Pipeline", MeasureKind::Count)
            .ratio(
                "%GT Deals_In_Pipeline",
                "Deals_In_Pipeline",
                Denominator::ColumnTotal("Deals_In_Pipeline".to_string()),
                PercentStyle::TwoDecimal,
            )
            .with_total();
        let out = aggregate(&deals(), &spec);
        let total = out.rows().last().unwrap();
        assert_eq!(total.canonical("%GT Deals_In_Pipeline"), "100.00%");
        let won = &out.rows()[0];
        assert_eq!(won.canonical("stage"), "Closed-Won");
        assert_eq!(won.canonical("%GT Deals_In_Pipeline"), "66.67%");
    }

    #[test]
    fn test_null_group_keys_coalesce_to_unknown() {
        let mut frame = Frame::from_columns(&["owner"]);
        frame.push(Record::new());
        let mut named = Record::new();
        named.set("owner", Value::text("Ana"));
        frame.push(named);

        let spec = AggregateSpec::new("owner").measure("n", MeasureKind::Count);
        let out = aggregate(&frame, &spec);
        let keys: Vec<String> = out.rows().iter().map(|r| r.canonical("owner")).collect();
        assert_eq!(keys, ["Ana", "Unknown"]);
    }

    #[test]
    fn test_measure_ordering() {
        let mut frame = Frame::from_columns(&["owner"]);
        for owner in ["Ana", "Bob", "Bob", "Bob", "Cleo", "Cleo"] {
            let mut row = Record::new();
            row.set("owner", Value::text(owner));
            frame.push(row);
        }
        let desc = AggregateSpec::new("owner")
            .measure("n", MeasureKind::Count)
            .order(OutputOrder::MeasureDescending("n".to_string()));
        let out = aggregate(&frame, &desc);
        let keys: Vec<String> = out.rows().iter().map(|r| r.canonical("owner")).collect();
        assert_eq!(keys, ["Bob", "Cleo", "Ana"]);

        let asc = AggregateSpec::new("owner")
            .measure("n", MeasureKind::Count)
            .order(OutputOrder::MeasureAscending("n".to_string()));
        let out = aggregate(&frame, &asc);
        let keys: Vec<String> = out.rows().iter().map(|r| r.canonical("owner")).collect();
        assert_eq!(keys, ["Ana", "Cleo", "Bob"]);
    }

    #[test]
    fn test_derived_columns() {
        let mut frame = Frame::from_columns(&["entity", "amount", "outstanding"]);
        for (entity, amount, outstanding) in [("US", 1000.0, 400.0), ("UK", 500.0, 0.0)] {
            let mut row = Record::new();
            row.set("entity", Value::text(entity));
            row.set("amount", Value::Number(amount));
            row.set("outstanding", Value::Number(outstanding));
            frame.push(row);
        }
        let spec = AggregateSpec::new("entity")
            .measure("amount", MeasureKind::Sum("amount".to_string()))
            .measure("outstanding", MeasureKind::Sum("outstanding".to_string()))
            .derive(
                "paid",
                DerivedExpr::Sub("amount".to_string(), "outstanding".to_string()),
            )
            .derive("amount_share", DerivedExpr::DivByMax("amount".to_string()))
            .derive(
                "paid_ratio",
                DerivedExpr::Div("paid".to_string(), "amount".to_string()),
            )
            .with_total();
        let out = aggregate(&frame, &spec);

        let uk = &out.rows()[0];
        assert_eq!(uk.canonical("entity"), "UK");
        assert_eq!(uk.number("paid"), Some(500.0));
        assert_eq!(uk.number("amount_share"), Some(0.5));
        assert_eq!(uk.number("paid_ratio"), Some(1.0));

        // Total derived columns recompute from the summed measures.
        let total = out.rows().last().unwrap();
        assert_eq!(total.number("paid"), Some(1100.0));
        assert_eq!(total.number("paid_ratio"), Some(1100.0 / 1500.0));
    }

    #[test]
    fn test_percent_formatting() {
        assert_eq!(format_percent(50.0, PercentStyle::Trimmed), "50.0%");
        assert_eq!(format_percent(66.67, PercentStyle::Trimmed), "66.67%");
        assert_eq!(format_percent(66.7, PercentStyle::Trimmed), "66.7%");
        assert_eq!(format_percent(100.0, PercentStyle::TwoDecimal), "100.00%");
        assert_eq!(format_percent(0.0, PercentStyle::Trimmed), "0.0%");
    }

    #[test]
    fn test_custom_column_order() {
        let spec = AggregateSpec::new("owner")
            .measure("n", MeasureKind::Count)
            .ratio(
                "share",
                "n",
                Denominator::ColumnTotal("n".to_string()),
                PercentStyle::TwoDecimal,
            )
            .column_order(&["owner", "share", "n"]);
        let out = aggregate(&deals(), &spec);
        assert_eq!(out.columns(), ["owner", "share", "n"]);
    }
}
