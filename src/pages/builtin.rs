// src/pages/builtin.rs
//! The nine built-in dashboard pages.

use crate::aggregate::{
    AggregateSpec, CrosstabSpec, Denominator, DerivedExpr, MeasureKind, OutputOrder, PercentStyle,
};
use crate::filter::{FacetDef, Scope};
use crate::model::DatasetName;
use crate::pages::{Block, KpiDef, KpiFormat, KpiKind, PageSpec};
use once_cell::sync::Lazy;

/// Stages a deal in the client pipeline can be in.
pub static CLIENT_STAGES: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        "Agreement Signed",
        "Awareness",
        "Closed (Future prospect)",
        "Closed (Lost)",
        "Did Not Proceed",
        "Discovery",
        "Engagement Completed",
        "Implementation",
        "Issue Agreement",
        "Needs Identified",
        "Ongoing Services",
        "Prospect",
    ]
});

/// Stages a deal in the franchise pipeline can be in.
pub static FRANCHISE_STAGES: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        "New Lead",
        "Introduction Meeting",
        "FDD Review",
        "Application Form & Background Verification",
    ]
});

pub static LEAD_SOURCES: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        "Existing Client",
        "Personal Network",
        "Conference or Event",
        "Email Campaign",
        "Client Referral",
        "Conference",
        "LinkedIn",
        "Advertisement",
        "Chat",
        "Social Media",
    ]
});

pub static BILLING_COMPANIES: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        "Valenta AU",
        "Valenta UK",
        "Valenta NZ",
        "Valenta DE",
        "Valenta US",
        "Valenta EU",
        "Valenta India",
        "Valenta LATAM",
        "Valenta TT",
    ]
});

pub static SERVICE_LINES: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        "Digital Transformation",
        "Staff Augmentation",
        "Consulting Milestone",
        "Consulting",
    ]
});

/// Early pipeline stages shown in the stage/service-line breakdown.
pub static PIPELINE_STAGES: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        "Agreement Signed",
        "Issue Agreement",
        "1st Meeting Complete",
        "Contact Made",
        "Proposal Sent",
    ]
});

pub static SCORE_BUCKET_LABELS: Lazy<Vec<&'static str>> =
    Lazy::new(|| vec!["Under 50", "50-100", "100-150", "Over 150"]);

/// All built-in pages.
pub fn registry() -> Vec<PageSpec> {
    vec![
        invoice_details(),
        receivables_details(),
        entity_breakdown(),
        client_pipeline(),
        franchise_pipeline(),
        service_lead(),
        accounts_score(),
        deals_closing(),
        sales_cycle(),
    ]
}

/// Look up a built-in page by name.
pub fn page(name: &str) -> Option<PageSpec> {
    registry().into_iter().find(|p| p.name == name)
}

pub fn invoice_details() -> PageSpec {
    PageSpec {
        name: "invoice_details".to_string(),
        title: "Invoice Details".to_string(),
        dataset: DatasetName::Invoices,
        ownership_field: Some("MP".to_string()),
        scope: Vec::new(),
        facets: vec![
            FacetDef::field("Year", "Year"),
            FacetDef::field("Month", "Month"),
            FacetDef::field("Entity", "Invoice_Entity"),
            FacetDef::field("MP", "MP"),
        ],
        kpis: vec![KpiDef::new(
            "Total Invoice Amount",
            KpiKind::Sum("Invoice_Amount_USD".to_string()),
            KpiFormat::Money0,
        )],
        blocks: vec![Block::detail(
            "invoices",
            &[
                ("MP", "MP"),
                ("Name", "Name"),
                ("Description", "Description"),
                ("Invoice Date", "Invoice Date"),
                ("Invoice_Amount_USD", "Invoice Amount"),
            ],
        )],
        export: Some("invoices".to_string()),
    }
}

pub fn receivables_details() -> PageSpec {
    PageSpec {
        name: "receivables_details".to_string(),
        title: "Receivables Details".to_string(),
        dataset: DatasetName::Invoices,
        ownership_field: Some("MP".to_string()),
        scope: Vec::new(),
        facets: vec![
            FacetDef::field("Year", "Year"),
            FacetDef::field("Month", "Month"),
            FacetDef::field("Entity", "Invoice_Entity"),
            FacetDef::field("MP", "MP"),
        ],
        kpis: vec![KpiDef::new(
            "Total Receivables",
            KpiKind::Sum("Receivables".to_string()),
            KpiFormat::Money0,
        )],
        blocks: vec![Block::detail(
            "receivables",
            &[
                ("MP", "MP"),
                ("Name", "Name"),
                ("Description", "Description"),
                ("Due Date", "Due Date"),
                ("Days Overdue", "Days Overdue"),
                ("Receivables", "Receivables"),
            ],
        )],
        export: Some("receivables".to_string()),
    }
}

pub fn entity_breakdown() -> PageSpec {
    let by_entity = AggregateSpec::new("Invoice_Entity")
        .measure("Invoice_Amount_USD", MeasureKind::Sum("Invoice_Amount_USD".to_string()))
        .measure("Receivables", MeasureKind::Sum("Quantity".to_string()))
        .derive(
            "Paid_Amount",
            DerivedExpr::Sub("Invoice_Amount_USD".to_string(), "Receivables".to_string()),
        )
        .ratio(
            "Paid %",
            "Paid_Amount",
            Denominator::Column("Invoice_Amount_USD".to_string()),
            PercentStyle::TwoDecimal,
        )
        .ratio(
            "Receivables %",
            "Receivables",
            Denominator::Column("Invoice_Amount_USD".to_string()),
            PercentStyle::TwoDecimal,
        )
        .column_order(&[
            "Invoice_Entity",
            "Invoice_Amount_USD",
            "Paid_Amount",
            "Paid %",
            "Receivables",
            "Receivables %",
        ])
        .with_total();

    let by_year = AggregateSpec::new("Year")
        .measure("Invoice Amount", MeasureKind::Sum("Invoice_Amount_USD".to_string()))
        .measure("Receivables", MeasureKind::Sum("Quantity".to_string()));

    PageSpec {
        name: "entity_breakdown".to_string(),
        title: "Entity Breakdown".to_string(),
        dataset: DatasetName::Invoices,
        ownership_field: Some("MP".to_string()),
        scope: Vec::new(),
        facets: vec![
            FacetDef::field("Year", "Year"),
            FacetDef::field("Quarter", "Quarter"),
            FacetDef::field("Month", "Month"),
        ],
        kpis: vec![
            KpiDef::new(
                "Invoice Amount",
                KpiKind::Sum("Invoice_Amount_USD".to_string()),
                KpiFormat::Money0,
            ),
            KpiDef::new(
                "Paid Amount",
                KpiKind::Sum("Paid Amount".to_string()),
                KpiFormat::Money0,
            ),
            KpiDef::new(
                "Paid %",
                KpiKind::Ratio {
                    numerator: Box::new(KpiKind::Sum("Paid Amount".to_string())),
                    denominator: Box::new(KpiKind::Sum("Invoice_Amount_USD".to_string())),
                },
                KpiFormat::Percent(PercentStyle::Trimmed),
            ),
            KpiDef::new(
                "Receivables",
                KpiKind::Sum("Quantity".to_string()),
                KpiFormat::Money0,
            ),
            KpiDef::new(
                "Receivables %",
                KpiKind::Ratio {
                    numerator: Box::new(KpiKind::Sum("Quantity".to_string())),
                    denominator: Box::new(KpiKind::Sum("Invoice_Amount_USD".to_string())),
                },
                KpiFormat::Percent(PercentStyle::Trimmed),
            ),
        ],
        blocks: vec![
            Block::aggregate("by_entity", by_entity),
            Block::aggregate("by_year", by_year),
        ],
        export: None,
    }
}

fn stage_summary_spec() -> AggregateSpec {
    AggregateSpec::new("Stage")
        .measure("Deals_In_Pipeline", MeasureKind::Count)
        .ratio(
            "%GT Deals_In_Pipeline",
            "Deals_In_Pipeline",
            Denominator::ColumnTotal("Deals_In_Pipeline".to_string()),
            PercentStyle::TwoDecimal,
        )
        .with_total()
}

pub fn client_pipeline() -> PageSpec {
    PageSpec {
        name: "client_pipeline".to_string(),
        title: "Deals in Client Pipeline".to_string(),
        dataset: DatasetName::Deals,
        ownership_field: None,
        scope: vec![Scope::field_in("Stage", &CLIENT_STAGES)],
        facets: vec![
            FacetDef::field("Deal Owner", "Deal Owner Name"),
            FacetDef::bucket("Closing Month", "Closing Bucket"),
        ],
        kpis: vec![
            KpiDef::new(
                "Ongoing Revenue",
                KpiKind::Sum("Amount".to_string()),
                KpiFormat::Money2,
            ),
            KpiDef::new(
                "One-Time Revenue",
                KpiKind::Sum("Consulting Fee".to_string()),
                KpiFormat::Money2,
            ),
            KpiDef::new("Deals Closing", KpiKind::RowCount, KpiFormat::Count),
        ],
        blocks: vec![
            Block::aggregate("stage_summary", stage_summary_spec()),
            Block::crosstab(
                "owner_stage",
                CrosstabSpec::new("Deal Owner Name", "Stage", "Deals_In_Pipeline"),
            ),
        ],
        export: None,
    }
}

pub fn franchise_pipeline() -> PageSpec {
    PageSpec {
        name: "franchise_pipeline".to_string(),
        title: "Deals in Franchise Pipeline".to_string(),
        dataset: DatasetName::Deals,
        ownership_field: None,
        scope: vec![Scope::field_in("Stage", &FRANCHISE_STAGES)],
        facets: vec![
            FacetDef::field("Deal Owner", "Deal Owner Name"),
            FacetDef::bucket("Closing Month", "Closing Bucket"),
            FacetDef::field("Region", "Region"),
        ],
        kpis: vec![
            KpiDef::new(
                "Ongoing Revenue",
                KpiKind::Sum("Amount".to_string()),
                KpiFormat::Money2,
            ),
            KpiDef::new("Deals Closing", KpiKind::RowCount, KpiFormat::Count),
        ],
        blocks: vec![
            Block::aggregate("stage_summary", stage_summary_spec()),
            Block::crosstab(
                "owner_stage",
                CrosstabSpec::new("Deal Owner Name", "Stage", "Deals_In_Pipeline"),
            ),
        ],
        export: None,
    }
}

pub fn service_lead() -> PageSpec {
    PageSpec {
        name: "service_lead".to_string(),
        title: "Pipeline by Service and Lead".to_string(),
        dataset: DatasetName::Deals,
        ownership_field: None,
        scope: Vec::new(),
        facets: vec![
            FacetDef::field("Deal Owner", "Deal Owner Name"),
            FacetDef::bucket("Closing Month", "Closing Bucket"),
        ],
        kpis: Vec::new(),
        blocks: vec![
            Block::aggregate(
                "lead_source",
                AggregateSpec::new("Lead Source")
                    .measure("Deals", MeasureKind::Count)
                    .order(OutputOrder::MeasureAscending("Deals".to_string())),
            )
            .scoped(Scope::field_in("Lead Source", &LEAD_SOURCES)),
            Block::aggregate(
                "billing_company",
                AggregateSpec::new("Billing Company")
                    .measure("Deals", MeasureKind::Count)
                    .order(OutputOrder::MeasureDescending("Deals".to_string())),
            )
            .scoped(Scope::field_in("Billing Company", &BILLING_COMPANIES)),
            Block::aggregate(
                "service_line",
                AggregateSpec::new("Service Line").measure("Deals", MeasureKind::Count),
            )
            .scoped(Scope::field_in("Service Line", &SERVICE_LINES)),
            Block::crosstab(
                "stage_service",
                CrosstabSpec::new("Stage", "Service Line", "Deals").with_shares("Percentage"),
            )
            .scoped(Scope::field_in("Stage", &PIPELINE_STAGES)),
        ],
        export: None,
    }
}

pub fn accounts_score() -> PageSpec {
    PageSpec {
        name: "accounts_score".to_string(),
        title: "Accounts Score".to_string(),
        dataset: DatasetName::Accounts,
        ownership_field: None,
        scope: Vec::new(),
        facets: vec![
            FacetDef::field("Account Owner Name", "Account Owner Name"),
            FacetDef::field("Score Bucket", "Score Bucket"),
        ],
        kpis: SCORE_BUCKET_LABELS
            .iter()
            .map(|bucket| {
                KpiDef::new(
                    bucket,
                    KpiKind::CountWhere {
                        field: "Score Bucket".to_string(),
                        value: bucket.to_string(),
                    },
                    KpiFormat::Count,
                )
            })
            .collect(),
        blocks: vec![Block::detail(
            "accounts",
            &[
                ("Account Name", "Account Name"),
                ("Account Owner Name", "Account Owner Name"),
                ("Existing Account", "Existing Account"),
                ("Score Bucket", "Score Bucket"),
            ],
        )],
        export: Some("accounts".to_string()),
    }
}

pub fn deals_closing() -> PageSpec {
    let entered = MeasureKind::CountDistinct {
        field: "Deal Name".to_string(),
        only_if: None,
    };
    let closed = MeasureKind::CountDistinct {
        field: "Deal Name".to_string(),
        only_if: Some("Is Closed".to_string()),
    };
    let summary = AggregateSpec::new("Deal Owner Name")
        .measure("# Deals Entered", entered.clone())
        .measure("# Deals Closed", closed.clone())
        .ratio(
            "% Deals Closed",
            "# Deals Closed",
            Denominator::Column("# Deals Entered".to_string()),
            PercentStyle::Trimmed,
        )
        .with_total();
    let chart = AggregateSpec::new("Deal Owner Name")
        .measure("# Deals Entered", entered)
        .measure("# Deals Closed", closed)
        .derive("Entered Share", DerivedExpr::DivByMax("# Deals Entered".to_string()))
        .derive(
            "Closed Share",
            DerivedExpr::Div("# Deals Closed".to_string(), "# Deals Entered".to_string()),
        );

    PageSpec {
        name: "deals_closing".to_string(),
        title: "Deals Closing Rate".to_string(),
        dataset: DatasetName::Deals,
        ownership_field: None,
        scope: Vec::new(),
        facets: vec![
            FacetDef::field("Service Line", "Service Line"),
            FacetDef::field("Deal Owner", "Deal Owner Name"),
        ],
        kpis: vec![
            KpiDef::new(
                "# Deals Entered",
                KpiKind::CountDistinct {
                    field: "Deal Name".to_string(),
                    only_if: None,
                },
                KpiFormat::Count,
            ),
            KpiDef::new(
                "# Deals Closed",
                KpiKind::CountDistinct {
                    field: "Deal Name".to_string(),
                    only_if: Some("Is Closed".to_string()),
                },
                KpiFormat::Count,
            ),
            KpiDef::new(
                "% Deals Closed",
                KpiKind::Ratio {
                    numerator: Box::new(KpiKind::CountDistinct {
                        field: "Deal Name".to_string(),
                        only_if: Some("Is Closed".to_string()),
                    }),
                    denominator: Box::new(KpiKind::CountDistinct {
                        field: "Deal Name".to_string(),
                        only_if: None,
                    }),
                },
                KpiFormat::Percent(PercentStyle::Trimmed),
            ),
        ],
        blocks: vec![
            Block::aggregate("summary", summary),
            Block::aggregate("chart", chart),
        ],
        export: Some("summary".to_string()),
    }
}

pub fn sales_cycle() -> PageSpec {
    PageSpec {
        name: "sales_cycle".to_string(),
        title: "Sales Cycle".to_string(),
        dataset: DatasetName::Deals,
        ownership_field: None,
        scope: vec![Scope::require(&[
            "Deal Owner Name",
            "Deal Name",
            "Stage",
            "Closing Date",
            "Sales Cycle Duration",
            "Billing Company",
        ])],
        facets: vec![
            FacetDef::field("Year", "Year"),
            FacetDef::field("Month", "Month"),
            FacetDef::field("Deal Owner", "Deal Owner Name"),
            FacetDef::field("Billing Company", "Billing Company"),
        ],
        kpis: vec![KpiDef::new(
            "Sales Cycle",
            KpiKind::Mean("Sales Cycle Duration".to_string()),
            KpiFormat::Number2,
        )],
        blocks: vec![Block::detail(
            "deals",
            &[
                ("Deal Owner Name", "Deal Owner Name"),
                ("Deal Name", "Deal Name"),
                ("Sales Cycle Duration", "Sales Cycle Duration"),
                ("Stage", "Stage"),
                ("Billing Company", "Billing Company"),
            ],
        )],
        export: Some("deals".to_string()),
    }
}
