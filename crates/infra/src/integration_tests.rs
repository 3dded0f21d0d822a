//! Integration tests for the whole forecasting pipeline.
//!
//! Tests: CSV tables → preparation → forecaster → aggregation → decision / artifacts
//!
//! Verifies:
//! - Both drivers produce the same demand for the same product and policy
//! - Batch runs isolate skipped and failed products and write one artifact per success
//! - Configuration problems surface before any product is visited

#[cfg(test)]
mod tests {
    use std::fs;

    use stockcast_core::{PipelineError, PipelinePolicy, SeasonalityMode};
    use stockcast_forecast::SeasonalTrendForecaster;
    use stockcast_inventory::StockStatus;

    use crate::artifacts::{ARTIFACT_COLUMNS, CsvForecastWriter, InMemoryForecastSink};
    use crate::batch::{BatchConfig, BatchOrchestrator, ProductState};
    use crate::runner::{ProductSelector, SingleProductRunner, selectable_products};
    use crate::tables::{DataPaths, DataTables, read_catalog, read_inventory, read_sales};
    use crate::test_support::{FailOnSentinel, SENTINEL_UNITS, pid, temp_dir};

    const CATALOG: &str = "\
product_id,product_name,category
P1,Widget,tools
P2,Gadget,tools
P3,Sprocket,parts
";

    const INVENTORY: &str = "\
product_id,warehouse,stock_level
P1,north,12
P1,south,8
P2,north,15
";

    /// `days` rows per product starting 2024-01-01.
    fn sales_csv(products: &[(&str, u32, u32)]) -> String {
        let start = chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let mut out = String::from("product_id,date,units_sold\n");
        for (product, days, units) in products {
            for d in 0..*days {
                let date = start + chrono::Duration::days(i64::from(d));
                out.push_str(&format!("{product},{},{units}\n", date.format("%Y-%m-%d")));
            }
        }
        out
    }

    fn tables(sales: &str) -> DataTables {
        DataTables {
            sales: read_sales(sales.as_bytes()).unwrap(),
            catalog: read_catalog(CATALOG.as_bytes()).unwrap(),
            inventory: read_inventory(INVENTORY.as_bytes()).unwrap(),
        }
    }

    #[test]
    fn two_day_history_passes_interactively_and_is_skipped_in_batch() {
        let tables = tables(&sales_csv(&[("P1", 2, 10)]));

        let runner =
            SingleProductRunner::new(SeasonalTrendForecaster::new(), PipelinePolicy::interactive());
        let report = runner.run(&tables, &ProductSelector::Id(pid("P1"))).unwrap();
        assert_eq!(report.history_points, 2);
        assert_eq!(report.future().len(), 7);
        assert_eq!(report.decision.current_stock, 20);

        let orchestrator = BatchOrchestrator::new(
            SeasonalTrendForecaster::new(),
            InMemoryForecastSink::new(),
            BatchConfig::default(),
        );
        let batch = orchestrator.run(&tables.sales).unwrap();
        assert_eq!(
            batch.outcome(&pid("P1")),
            Some(&ProductState::SkippedInsufficientHistory { points: 2 })
        );
        assert!(orchestrator.sink().is_empty());
    }

    #[test]
    fn drivers_agree_on_demand_under_the_same_policy() {
        let tables = tables(&sales_csv(&[("P1", 40, 3), ("P2", 40, 1)]));
        let policy = PipelinePolicy::batch()
            .with_horizon_days(10)
            .with_seasonality(SeasonalityMode::none());

        let interactive = SingleProductRunner::new(SeasonalTrendForecaster::new(), policy)
            .run(&tables, &ProductSelector::Name("Widget".to_string()))
            .unwrap();
        assert_eq!(interactive.decision.forecasted_demand, 30);
        assert_eq!(interactive.decision.status, StockStatus::Shortage);
        assert_eq!(interactive.decision.shortage_amount, 10);

        let batch = BatchOrchestrator::new(
            SeasonalTrendForecaster::new(),
            InMemoryForecastSink::new(),
            BatchConfig::default().with_policy(policy),
        )
        .run(&tables.sales)
        .unwrap();
        match batch.outcome(&pid("P1")) {
            Some(ProductState::Succeeded { forecasted_demand, .. }) => {
                assert_eq!(*forecasted_demand, 30)
            }
            other => panic!("expected success, got {other:?}"),
        }
    }

    #[test]
    fn batch_writes_one_artifact_per_success() {
        let mut sales = sales_csv(&[("P1", 35, 4), ("P2", 35, 2), ("P3", 5, 9)]);
        sales.push_str(
            &sales_csv(&[("P4", 35, SENTINEL_UNITS)])["product_id,date,units_sold\n".len()..],
        );
        let tables = tables(&sales);

        let dir = temp_dir();
        let writer = CsvForecastWriter::create(dir.join("Multiforecasts")).unwrap();
        let orchestrator = BatchOrchestrator::new(
            FailOnSentinel::default(),
            writer,
            BatchConfig::default().with_max_concurrent(2),
        );
        let report = orchestrator.run(&tables.sales).unwrap();

        assert_eq!((report.succeeded, report.skipped, report.failed), (2, 1, 1));

        let mut written: Vec<String> = fs::read_dir(orchestrator.sink().dir())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        written.sort();
        assert_eq!(written, vec!["forecast_P1.csv", "forecast_P2.csv"]);

        let artifact = fs::read_to_string(orchestrator.sink().path_for(&pid("P1"))).unwrap();
        let mut lines = artifact.lines();
        assert_eq!(lines.next(), Some(ARTIFACT_COLUMNS.join(",").as_str()));
        let rows: Vec<&str> = lines.collect();
        assert_eq!(rows.len(), 60);
        assert!(rows[0].starts_with("2024-02-05,"));
        assert!(rows.iter().all(|row| row.ends_with(",P1")));

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn tables_load_from_a_data_directory() {
        let dir = temp_dir();
        fs::write(dir.join("sales_data.csv"), sales_csv(&[("P1", 3, 1), ("P2", 3, 1)])).unwrap();
        fs::write(dir.join("product_catalog.csv"), CATALOG).unwrap();
        fs::write(dir.join("stock.csv"), INVENTORY).unwrap();

        let paths = DataPaths::in_dir(&dir).with_inventory(dir.join("stock.csv"));
        let tables = DataTables::load(&paths).unwrap();

        assert_eq!(tables.sales.len(), 6);
        assert_eq!(tables.catalog.len(), 3);
        let names: Vec<String> = selectable_products(&tables)
            .into_iter()
            .map(|l| l.product_name)
            .collect();
        assert_eq!(names, vec!["Gadget", "Widget"]);

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn malformed_table_stops_the_run_before_forecasting() {
        let dir = temp_dir();
        let sales = "product_id,date,units_sold\nP1,2024-01-01,lots\n";
        fs::write(dir.join("sales_data.csv"), sales).unwrap();
        fs::write(dir.join("product_catalog.csv"), CATALOG).unwrap();
        fs::write(dir.join("inventory_data.csv"), INVENTORY).unwrap();

        match DataTables::load(&DataPaths::in_dir(&dir)) {
            Err(PipelineError::Configuration(msg)) => assert!(msg.contains("line 2"), "{msg}"),
            other => panic!("expected configuration error, got {other:?}"),
        }

        fs::remove_dir_all(dir).unwrap();
    }
}
