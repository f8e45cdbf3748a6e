//! Validation of page specifications against dataset schemas.

use crate::aggregate::{Denominator, MeasureKind, OutputOrder};
use crate::filter::Scope;
use crate::normalize::normalized_columns;
use crate::pages::{KpiDef, PageSpec, View};
use std::collections::HashSet;

/// Validation error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Duplicate page name: '{0}'")]
    DuplicatePage(String),

    #[error("Page '{page}' has duplicate block name: '{block}'")]
    DuplicateBlock { page: String, block: String },

    #[error("Page '{page}' references unknown field '{field}' in {context}")]
    UnknownField {
        page: String,
        context: String,
        field: String,
    },

    #[error("Page '{page}' references unknown column '{column}' in {context}")]
    UnknownColumn {
        page: String,
        context: String,
        column: String,
    },

    #[error("Page '{page}' exports unknown block '{block}'")]
    UnknownExportBlock { page: String, block: String },
}

/// Validate a set of page specs.
pub fn validate(pages: &[PageSpec]) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let mut seen_pages = HashSet::new();
    for page in pages {
        if !seen_pages.insert(page.name.as_str()) {
            errors.push(ValidationError::DuplicatePage(page.name.clone()));
        }
        validate_page(page, &mut errors);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_page(page: &PageSpec, errors: &mut Vec<ValidationError>) {
    let schema: HashSet<&str> = normalized_columns(page.dataset).into_iter().collect();

    let mut check_field = |context: &str, field: &str, errors: &mut Vec<ValidationError>| {
        if !schema.contains(field) {
            errors.push(ValidationError::UnknownField {
                page: page.name.clone(),
                context: context.to_string(),
                field: field.to_string(),
            });
        }
    };

    if let Some(field) = &page.ownership_field {
        check_field("ownership field", field, errors);
    }
    for facet in &page.facets {
        check_field(&format!("facet '{}'", facet.name), facet.matched_field(), errors);
    }
    validate_scopes(page, "page scope", &page.scope, &schema, errors);
    for kpi in &page.kpis {
        validate_kpi(page, kpi, &schema, errors);
    }

    let mut seen_blocks = HashSet::new();
    for block in &page.blocks {
        if !seen_blocks.insert(block.name.as_str()) {
            errors.push(ValidationError::DuplicateBlock {
                page: page.name.clone(),
                block: block.name.clone(),
            });
        }
        let context = format!("block '{}'", block.name);
        validate_scopes(page, &context, &block.scope, &schema, errors);
        match &block.view {
            View::Detail(spec) => {
                for (field, _label) in &spec.columns {
                    check_field(&context, field, errors);
                }
            }
            View::Aggregate(spec) => {
                check_field(&context, &spec.key, errors);
                let mut produced: HashSet<&str> = HashSet::new();
                for measure in &spec.measures {
                    produced.insert(measure.name.as_str());
                    match &measure.kind {
                        MeasureKind::Count => {}
                        MeasureKind::Sum(field) => check_field(&context, field, errors),
                        MeasureKind::CountDistinct { field, only_if } => {
                            check_field(&context, field, errors);
                            if let Some(flag) = only_if {
                                check_field(&context, flag, errors);
                            }
                        }
                    }
                }
                for derived in &spec.derived {
                    match &derived.expr {
                        crate::aggregate::DerivedExpr::Sub(a, b)
                        | crate::aggregate::DerivedExpr::Div(a, b) => {
                            check_column(page, &context, &produced, a, errors);
                            check_column(page, &context, &produced, b, errors);
                        }
                        crate::aggregate::DerivedExpr::DivByMax(a) => {
                            check_column(page, &context, &produced, a, errors);
                        }
                    }
                    produced.insert(derived.name.as_str());
                }
                for ratio in &spec.ratios {
                    check_column(page, &context, &produced, &ratio.numerator, errors);
                    match &ratio.denominator {
                        Denominator::Column(name) | Denominator::ColumnTotal(name) => {
                            check_column(page, &context, &produced, name, errors);
                        }
                    }
                }
                match &spec.order {
                    OutputOrder::MeasureAscending(name) | OutputOrder::MeasureDescending(name) => {
                        check_column(page, &context, &produced, name, errors);
                    }
                    OutputOrder::KeyAscending | OutputOrder::FirstSeen => {}
                }
            }
            View::Crosstab(spec) => {
                check_field(&context, &spec.primary, errors);
                check_field(&context, &spec.secondary, errors);
            }
        }
    }

    if let Some(export) = &page.export {
        if page.block(export).is_none() {
            errors.push(ValidationError::UnknownExportBlock {
                page: page.name.clone(),
                block: export.clone(),
            });
        }
    }
}

/// A ratio, derived column, or ordering must reference a column the
/// aggregation has already produced.
fn check_column(
    page: &PageSpec,
    context: &str,
    produced: &HashSet<&str>,
    column: &str,
    errors: &mut Vec<ValidationError>,
) {
    if !produced.contains(column) {
        errors.push(ValidationError::UnknownColumn {
            page: page.name.clone(),
            context: context.to_string(),
            column: column.to_string(),
        });
    }
}

fn validate_scopes(
    page: &PageSpec,
    context: &str,
    scopes: &[Scope],
    schema: &HashSet<&str>,
    errors: &mut Vec<ValidationError>,
) {
    let mut push = |field: &str, errors: &mut Vec<ValidationError>| {
        if !schema.contains(field) {
            errors.push(ValidationError::UnknownField {
                page: page.name.clone(),
                context: context.to_string(),
                field: field.to_string(),
            });
        }
    };
    for scope in scopes {
        match scope {
            Scope::FieldIn { field, .. } => push(field, errors),
            Scope::RequireFields(fields) => {
                for field in fields {
                    push(field, errors);
                }
            }
        }
    }
}

fn validate_kpi(
    page: &PageSpec,
    kpi: &KpiDef,
    schema: &HashSet<&str>,
    errors: &mut Vec<ValidationError>,
) {
    for field in kpi.kind.fields() {
        if !schema.contains(field) {
            errors.push(ValidationError::UnknownField {
                page: page.name.clone(),
                context: format!("KPI '{}'", kpi.label),
                field: field.to_string(),
            });
        }
    }
}
