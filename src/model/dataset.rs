// src/model/dataset.rs
use serde::{Deserialize, Serialize};

/// The logical datasets served by the row source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DatasetName {
    Deals,
    Invoices,
    Accounts,
}

impl DatasetName {
    pub fn all() -> [DatasetName; 3] {
        [
            DatasetName::Deals,
            DatasetName::Invoices,
            DatasetName::Accounts,
        ]
    }

    /// Backing table name at the row-source boundary.
    pub fn table(&self) -> &'static str {
        match self {
            DatasetName::Deals => "DEALS",
            DatasetName::Invoices => "INVOICES",
            DatasetName::Accounts => "ACCOUNTS",
        }
    }

    /// The fixed raw schema the row source is expected to return. A failed
    /// fetch degrades to an empty frame carrying these columns.
    pub fn raw_columns(&self) -> &'static [&'static str] {
        match self {
            DatasetName::Deals => &[
                "Deal Owner Name",
                "Deal Name",
                "Stage",
                "Amount",
                "Consulting Fee",
                "Closing Date",
                "Created Time",
                "Sales Cycle Duration",
                "Service Line",
                "Billing Company",
                "Region",
                "Lead Source",
            ],
            DatasetName::Invoices => &[
                "Location",
                "Client_Name",
                "Description",
                "Invoice_Date",
                "Invoice_DueDate",
                "Invoice_Amount_USD",
                "Quantity",
                "Status",
                "FullyPaidOnDate",
                "Invoice_Entity",
            ],
            DatasetName::Accounts => &[
                "Account Name",
                "Account Owner Name",
                "Existing Account",
            ],
        }
    }
}

impl std::fmt::Display for DatasetName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.table())
    }
}

impl std::str::FromStr for DatasetName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "DEALS" => Ok(DatasetName::Deals),
            "INVOICES" => Ok(DatasetName::Invoices),
            "ACCOUNTS" => Ok(DatasetName::Accounts),
            other => Err(format!("unknown dataset: {other}")),
        }
    }
}
