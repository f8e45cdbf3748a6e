#[cfg(test)]
mod tests {
    use sightline::access;
    use sightline::model::{Frame, Record, Value};

    fn invoices() -> Frame {
        let mut frame = Frame::from_columns(&["MP", "Receivables"]);
        for (mp, amount) in [("Alpha", 100.0), ("Beta", 50.0), ("Alpha", 25.0)] {
            let mut row = Record::new();
            row.set("MP", Value::text(mp));
            row.set("Receivables", Value::Number(amount));
            frame.push(row);
        }
        frame
    }

    #[test]
    fn test_admin_bypasses_restriction() {
        let frame = invoices();
        let visible = access::apply(&frame, "MP", access::ADMIN);
        assert_eq!(visible, frame);
    }

    #[test]
    fn test_every_visible_row_belongs_to_identity() {
        let visible = access::apply(&invoices(), "MP", "Beta");
        assert_eq!(visible.len(), 1);
        assert!(visible.rows().iter().all(|r| r.text("MP") == Some("Beta")));
    }

    #[test]
    fn test_unknown_identity_sees_nothing() {
        assert!(access::apply(&invoices(), "MP", "Gamma").is_empty());
    }

    #[test]
    fn test_missing_ownership_field_is_empty_not_fatal() {
        let restricted = access::apply(&invoices(), "Owner", "Beta");
        assert!(restricted.is_empty());
        assert_eq!(restricted.columns(), invoices().columns());
    }
}
