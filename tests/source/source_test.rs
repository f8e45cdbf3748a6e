#[cfg(test)]
mod tests {
    use sightline::model::DatasetName;
    use sightline::source::{fetch_or_empty, CsvSource, RowSource, SourceError, SqliteSource};
    use std::fs;
    use std::path::PathBuf;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("sightline-test-{name}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_csv_source_reads_dataset_files() {
        let dir = scratch_dir("csv");
        fs::write(
            dir.join("ACCOUNTS.csv"),
            "Account Name,Account Owner Name,Existing Account\nAcme,Ana,Yes\nGlobex,,No\n",
        )
        .unwrap();

        let source = CsvSource::new(&dir);
        let frame = source.fetch(DatasetName::Accounts).unwrap();
        assert_eq!(frame.len(), 2);
        assert_eq!(
            frame.columns(),
            ["Account Name", "Account Owner Name", "Existing Account"]
        );
        assert_eq!(frame.rows()[0].text("Account Owner Name"), Some("Ana"));
        // Blank cells load as null.
        assert!(frame.rows()[1].is_blank("Account Owner Name"));
    }

    #[test]
    fn test_csv_source_missing_file() {
        let dir = scratch_dir("csv-missing");
        let source = CsvSource::new(&dir);
        assert!(matches!(
            source.fetch(DatasetName::Deals),
            Err(SourceError::FileNotFound(_))
        ));
    }

    #[test]
    fn test_fetch_or_empty_degrades_with_schema() {
        let dir = scratch_dir("degrade");
        let source = CsvSource::new(&dir);
        let frame = fetch_or_empty(&source, DatasetName::Invoices);
        assert!(frame.is_empty());
        let expected: Vec<String> = DatasetName::Invoices
            .raw_columns()
            .iter()
            .map(|c| c.to_string())
            .collect();
        assert_eq!(frame.columns(), expected);
    }

    #[test]
    fn test_sqlite_source_maps_sql_types() {
        let dir = scratch_dir("sqlite");
        let db_path = dir.join("crm.db");
        {
            let conn = rusqlite::Connection::open(&db_path).unwrap();
            conn.execute_batch(
                r#"
                CREATE TABLE "ACCOUNTS" (
                    "Account Name" TEXT,
                    "Account Owner Name" TEXT,
                    "Existing Account" TEXT,
                    "Score" REAL
                );
                INSERT INTO "ACCOUNTS" VALUES ('Acme', 'Ana', 'Yes', 12.5);
                INSERT INTO "ACCOUNTS" VALUES ('Globex', NULL, 'No', 3);
                "#,
            )
            .unwrap();
        }

        let source = SqliteSource::new(&db_path);
        let frame = source.fetch(DatasetName::Accounts).unwrap();
        assert_eq!(frame.len(), 2);
        assert_eq!(frame.rows()[0].number("Score"), Some(12.5));
        assert_eq!(frame.rows()[1].number("Score"), Some(3.0));
        assert!(frame.rows()[1].is_blank("Account Owner Name"));
    }

    #[test]
    fn test_store_loads_once_and_reloads_on_request() {
        use chrono::NaiveDate;
        use sightline::store::DatasetStore;

        let dir = scratch_dir("store");
        let path = dir.join("ACCOUNTS.csv");
        fs::write(
            &path,
            "Account Name,Account Owner Name,Existing Account\nAcme,Ana,Yes\n",
        )
        .unwrap();

        let today = NaiveDate::from_ymd_opt(2025, 8, 5).unwrap();
        let mut store = DatasetStore::new(Box::new(CsvSource::new(&dir)), today);
        assert_eq!(store.get(DatasetName::Accounts).len(), 1);

        fs::write(
            &path,
            "Account Name,Account Owner Name,Existing Account\nAcme,Ana,Yes\nGlobex,Bob,No\n",
        )
        .unwrap();
        // Held for the process lifetime until an explicit reload.
        assert_eq!(store.get(DatasetName::Accounts).len(), 1);
        assert_eq!(store.reload(DatasetName::Accounts).len(), 2);
    }

    #[test]
    fn test_sqlite_source_missing_table_is_an_error() {
        let dir = scratch_dir("sqlite-missing");
        let db_path = dir.join("empty.db");
        rusqlite::Connection::open(&db_path).unwrap();

        let source = SqliteSource::new(&db_path);
        assert!(matches!(
            source.fetch(DatasetName::Deals),
            Err(SourceError::Query(_))
        ));
    }
}
