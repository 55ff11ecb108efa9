use saprecon_recon::config::SourcesConfig;
use saprecon_recon::model::RowStatus;
use saprecon_recon::{run, ReconConfig, ReconError, SourceTables, Table};

fn config() -> ReconConfig {
    ReconConfig::new("test", SourcesConfig::new("BSEG.csv", "BKPF.txt", "summary.xlsx"))
}

fn sources(line_items: Table, headers: Table, summary: Table) -> SourceTables {
    SourceTables {
        line_items,
        headers,
        summary,
        skipped_line_items: 0,
    }
}

// -------------------------------------------------------------------------
// End-to-end
// -------------------------------------------------------------------------

#[test]
fn two_line_items_balance_one_account() {
    let bseg = Table::from_text_rows(
        "BSEG",
        &["Belegnr", "Hauptbuch", "Betrag Hauswähr"],
        &[&["1", "100", "1.000,00"], &["2", "100", "500,00"]],
    );
    let bkpf = Table::from_text_rows("BKPF", &["belegnr"], &[&["1"], &["2"]]);
    let summary = Table::from_text_rows("summary", &["hauptbuch", "endsaldo"], &[&["000100", "1.500,00"]]);

    let result = run(&config(), &sources(bseg, bkpf, summary)).unwrap();

    assert_eq!(result.merged_rows, 2);
    assert!(result.validation.is_complete());
    assert_eq!(result.comparison.len(), 1);

    let row = &result.comparison[0];
    assert_eq!(row.account.as_deref(), Some("000100"));
    assert_eq!(row.computed, Some(1500.0));
    assert_eq!(row.reference, Some(1500.0));
    assert_eq!(row.difference, Some(0.0));
    assert_eq!(row.status(0.0), RowStatus::Balanced);
    assert!(result.summary.is_balanced());
}

#[test]
fn orphans_are_advisory_by_default() {
    let bseg = Table::from_text_rows(
        "BSEG",
        &["belegnr", "hauptbuch", "betrag hauswähr"],
        &[&["1", "100", "10,00"], &["7", "100", "99,00"]],
    );
    let bkpf = Table::from_text_rows("BKPF", &["belegnr"], &[&["1"], &["8"]]);
    let summary = Table::from_text_rows("summary", &["hauptbuch", "endsaldo"], &[&["100", "10,00"]]);

    let result = run(&config(), &sources(bseg, bkpf, summary)).unwrap();

    // Orphan line item 7 is reported and left out of the balance
    assert_eq!(result.validation.line_items_without_header, 1);
    assert_eq!(result.validation.headers_without_line_items, 1);
    assert_eq!(result.merged_rows, 1);
    assert_eq!(result.comparison[0].difference, Some(0.0));
}

#[test]
fn strict_fails_on_orphans() {
    let bseg = Table::from_text_rows("BSEG", &["belegnr", "hauptbuch", "betrag hauswähr"], &[&["1", "100", "1"]]);
    let bkpf = Table::from_text_rows("BKPF", &["belegnr"], &[&["2"]]);
    let summary = Table::from_text_rows("summary", &["hauptbuch", "endsaldo"], &[]);

    let mut config = config();
    config.strict = true;
    let err = run(&config, &sources(bseg, bkpf, summary)).unwrap_err();
    assert!(matches!(
        err,
        ReconError::Incomplete { line_items_without_header: 1, headers_without_line_items: 1 }
    ));
}

#[test]
fn comparison_follows_summary_cardinality_and_order() {
    let bseg = Table::from_text_rows(
        "BSEG",
        &["belegnr", "hauptbuch", "betrag hauswähr"],
        &[
            &["1", "400", "4,00"],
            &["2", "300", "3,00"],
            &["3", "200", "2,00"],
            &["4", "100", "1,00"],
        ],
    );
    let bkpf = Table::from_text_rows("BKPF", &["belegnr"], &[&["1"], &["2"], &["3"], &["4"]]);
    let summary = Table::from_text_rows(
        "summary",
        &["hauptbuch", "endsaldo"],
        &[&["300", "3,00"], &["500", "0,00"], &["100", "1,00"], &["300", "3,00"]],
    );

    let result = run(&config(), &sources(bseg, bkpf, summary)).unwrap();
    let accounts: Vec<_> = result.comparison.iter().map(|r| r.account.clone().unwrap()).collect();
    assert_eq!(accounts, vec!["000300", "000500", "000100", "000300"]);
    assert_eq!(result.summary.rows, 4);
    assert_eq!(result.summary.balanced, 3);
    assert_eq!(result.summary.missing_computed, 1);
}

#[test]
fn missing_key_column_is_fatal() {
    let bseg = Table::from_text_rows("BSEG", &["belnr", "hauptbuch", "betrag hauswähr"], &[]);
    let bkpf = Table::from_text_rows("BKPF", &["belegnr"], &[]);
    let summary = Table::from_text_rows("summary", &["hauptbuch", "endsaldo"], &[]);

    let err = run(&config(), &sources(bseg, bkpf, summary)).unwrap_err();
    assert_eq!(err.to_string(), "table 'BSEG': missing column 'belegnr'");
}

#[test]
fn result_serializes_without_merged_rows() {
    let bseg = Table::from_text_rows(
        "BSEG",
        &["belegnr", "hauptbuch", "betrag hauswähr"],
        &[&["1", "100", "1,00"]],
    );
    let bkpf = Table::from_text_rows("BKPF", &["belegnr"], &[&["1"]]);
    let summary = Table::from_text_rows("summary", &["hauptbuch", "endsaldo"], &[&["100", "2,00"], &["x", "1,00"]]);

    let result = run(&config(), &sources(bseg, bkpf, summary)).unwrap();
    let json: serde_json::Value = serde_json::from_str(&result.to_json_pretty().unwrap()).unwrap();

    assert_eq!(json["meta"]["config_name"], "test");
    assert_eq!(json["merged_rows"], 1);
    assert!(json.get("merged").is_none());
    assert_eq!(json["comparison"][0]["difference"], -1.0);
    assert!(json["comparison"][1]["account"].is_null());
    assert_eq!(json["summary"]["mismatched"], 1);
    assert_eq!(json["summary"]["unreadable"], 1);
}
