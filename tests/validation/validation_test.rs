#[cfg(test)]
mod tests {
    use sightline::aggregate::{AggregateSpec, MeasureKind};
    use sightline::filter::FacetDef;
    use sightline::model::DatasetName;
    use sightline::pages::{self, Block, PageSpec};
    use sightline::validation::{validate, ValidationError};

    fn bare_page(name: &str) -> PageSpec {
        PageSpec {
            name: name.to_string(),
            title: name.to_string(),
            dataset: DatasetName::Deals,
            ownership_field: None,
            scope: Vec::new(),
            facets: Vec::new(),
            kpis: Vec::new(),
            blocks: Vec::new(),
            export: None,
        }
    }

    #[test]
    fn test_builtin_pages_validate_clean() {
        assert_eq!(validate(&pages::registry()), Ok(()));
    }

    #[test]
    fn test_duplicate_page_names() {
        let pages = vec![bare_page("p"), bare_page("p")];
        let errors = validate(&pages).unwrap_err();
        assert!(errors.contains(&ValidationError::DuplicatePage("p".to_string())));
    }

    #[test]
    fn test_unknown_facet_field() {
        let mut page = bare_page("p");
        page.facets.push(FacetDef::field("Owner", "No Such Field"));
        let errors = validate(&[page]).unwrap_err();
        assert!(matches!(
            &errors[0],
            ValidationError::UnknownField { field, .. } if field == "No Such Field"
        ));
    }

    #[test]
    fn test_unknown_measure_field_and_ratio_column() {
        let mut page = bare_page("p");
        page.blocks.push(Block::aggregate(
            "agg",
            AggregateSpec::new("Stage")
                .measure("total", MeasureKind::Sum("Bogus".to_string()))
                .ratio(
                    "pct",
                    "missing",
                    sightline::aggregate::Denominator::Column("total".to_string()),
                    sightline::aggregate::PercentStyle::Trimmed,
                ),
        ));
        let errors = validate(&[page]).unwrap_err();
        assert!(errors.iter().any(|e| matches!(
            e,
            ValidationError::UnknownField { field, .. } if field == "Bogus"
        )));
        assert!(errors.iter().any(|e| matches!(
            e,
            ValidationError::UnknownColumn { column, .. } if column == "missing"
        )));
    }

    #[test]
    fn test_unknown_export_block() {
        let mut page = bare_page("p");
        page.export = Some("ghost".to_string());
        let errors = validate(&[page]).unwrap_err();
        assert!(errors.contains(&ValidationError::UnknownExportBlock {
            page: "p".to_string(),
            block: "ghost".to_string(),
        }));
    }

    #[test]
    fn test_duplicate_block_names() {
        let mut page = bare_page("p");
        let spec = AggregateSpec::new("Stage").measure("n", MeasureKind::Count);
        page.blocks.push(Block::aggregate("b", spec.clone()));
        page.blocks.push(Block::aggregate("b", spec));
        let errors = validate(&[page]).unwrap_err();
        assert!(errors.contains(&ValidationError::DuplicateBlock {
            page: "p".to_string(),
            block: "b".to_string(),
        }));
    }
}
