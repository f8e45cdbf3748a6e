#[cfg(test)]
mod tests {
    use sightline::filter::{apply_facets, apply_scope, FacetDef, FacetSelection, Scope};
    use sightline::model::{Frame, Record, Value};

    fn deals() -> Frame {
        let mut frame = Frame::from_columns(&["Deal Owner Name", "Region", "Closing Bucket", "Year"]);
        let rows = [
            ("Ana", "APAC", "this_month", 2024.0),
            ("Ana", "EMEA", "next_month", 2025.0),
            ("Bob", "APAC", "other", 2025.0),
            ("Cleo", "AMER", "other", 2023.0),
        ];
        for (owner, region, bucket, year) in rows {
            let mut row = Record::new();
            row.set("Deal Owner Name", Value::text(owner));
            row.set("Region", Value::text(region));
            row.set("Closing Bucket", Value::text(bucket));
            row.set("Year", Value::Number(year));
            frame.push(row);
        }
        frame
    }

    fn facets() -> Vec<FacetDef> {
        vec![
            FacetDef::field("Deal Owner", "Deal Owner Name"),
            FacetDef::field("Region", "Region"),
            FacetDef::bucket("Closing Month", "Closing Bucket"),
            FacetDef::field("Year", "Year"),
        ]
    }

    #[test]
    fn test_empty_selection_is_no_restriction() {
        let out = apply_facets(&deals(), &facets(), &FacetSelection::new());
        assert_eq!(out.len(), 4);
    }

    #[test]
    fn test_facets_combine_with_and() {
        let selection = FacetSelection::new()
            .select("Deal Owner", &["Ana", "Bob"])
            .select("Region", &["APAC"]);
        let out = apply_facets(&deals(), &facets(), &selection);
        assert_eq!(out.len(), 2);
        assert!(out.rows().iter().all(|r| r.text("Region") == Some("APAC")));
    }

    #[test]
    fn test_all_sentinel_disables_facet_regardless_of_other_values() {
        let restricted = apply_facets(
            &deals(),
            &facets(),
            &FacetSelection::new().select("Region", &["APAC"]),
        );
        assert_eq!(restricted.len(), 2);

        // "All" wins no matter what else is selected in the same facet.
        let wildcard = apply_facets(
            &deals(),
            &facets(),
            &FacetSelection::new().select("Region", &["APAC", "All"]),
        );
        assert_eq!(wildcard.len(), 4);
        let wildcard_other = apply_facets(
            &deals(),
            &facets(),
            &FacetSelection::new().select("Region", &["EMEA", "All"]),
        );
        assert_eq!(wildcard_other, wildcard);
    }

    #[test]
    fn test_bucket_facet_is_an_or_within_the_facet() {
        let selection = FacetSelection::new().select("Closing Month", &["this_month", "next_month"]);
        let out = apply_facets(&deals(), &facets(), &selection);
        assert_eq!(out.len(), 2);
        assert!(out.rows().iter().all(|r| r.text("Deal Owner Name") == Some("Ana")));
    }

    #[test]
    fn test_bucket_facet_accepts_display_labels() {
        let tokens = apply_facets(
            &deals(),
            &facets(),
            &FacetSelection::new().select("Closing Month", &["this_month"]),
        );
        let labels = apply_facets(
            &deals(),
            &facets(),
            &FacetSelection::new().select("Closing Month", &["This Month"]),
        );
        assert_eq!(tokens, labels);
        assert_eq!(tokens.len(), 1);
    }

    #[test]
    fn test_numeric_facets_match_canonical_text() {
        let selection = FacetSelection::new().select("Year", &["2025"]);
        let out = apply_facets(&deals(), &facets(), &selection);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_field_in_scope() {
        let scoped = apply_scope(&deals(), &[Scope::field_in("Region", &["APAC", "EMEA"])]);
        assert_eq!(scoped.len(), 3);
    }

    #[test]
    fn test_require_fields_scope_drops_blank_rows() {
        let mut frame = deals();
        let mut incomplete = Record::new();
        incomplete.set("Deal Owner Name", Value::text("Dana"));
        incomplete.set("Region", Value::Null);
        frame.push(incomplete);

        let scoped = apply_scope(&frame, &[Scope::require(&["Region"])]);
        assert_eq!(scoped.len(), 4);
        assert!(scoped.rows().iter().all(|r| !r.is_blank("Region")));
    }
}
