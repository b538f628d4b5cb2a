use super::*;

#[test]
fn parses_db_ping_command() {
    let cli = Cli::try_parse_from(["despensa", "db", "ping"]).expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Db {
            command: DbCommands::Ping
        })
    ));
}

#[test]
fn parses_db_migrate_command() {
    let cli = Cli::try_parse_from(["despensa", "db", "migrate"]).expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Db {
            command: DbCommands::Migrate
        })
    ));
}

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["despensa"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn scrape_defaults_to_all_vendors_into_db() {
    let cli = Cli::try_parse_from(["despensa", "scrape"]).unwrap();

    match cli.command {
        Some(Commands::Scrape {
            vendor,
            output,
            csv_path,
            on_product_error,
        }) => {
            assert!(vendor.is_none());
            assert_eq!(output, OutputSink::Db);
            assert_eq!(csv_path, PathBuf::from("catalog.csv"));
            assert!(on_product_error.is_none());
        }
        other => panic!("expected scrape command, got: {other:?}"),
    }
}

#[test]
fn scrape_with_vendor_csv_output_and_skip_policy() {
    let cli = Cli::try_parse_from([
        "despensa",
        "scrape",
        "--vendor",
        "Consum",
        "--output",
        "csv",
        "--csv-path",
        "/tmp/consum.csv",
        "--on-product-error",
        "skip",
    ])
    .unwrap();

    assert!(matches!(
        cli.command,
        Some(Commands::Scrape {
            vendor: Some(Vendor::Consum),
            output: OutputSink::Csv,
            ref csv_path,
            on_product_error: Some(ProductErrorPolicy::Skip),
        }) if csv_path == &PathBuf::from("/tmp/consum.csv")
    ));
}

#[test]
fn scrape_rejects_unknown_vendor() {
    let result = Cli::try_parse_from(["despensa", "scrape", "--vendor", "lidl"]);

    assert!(result.is_err());
}

#[test]
fn scrape_rejects_unknown_output() {
    let result = Cli::try_parse_from(["despensa", "scrape", "--output", "parquet"]);

    assert!(result.is_err());
}

#[test]
fn parses_import_csv_with_vendor_filter() {
    let cli = Cli::try_parse_from([
        "despensa",
        "import-csv",
        "emergency_save.csv",
        "--vendor",
        "mercadona",
    ])
    .unwrap();

    assert!(matches!(
        cli.command,
        Some(Commands::ImportCsv {
            ref path,
            vendor: Some(Vendor::Mercadona),
        }) if path == &PathBuf::from("emergency_save.csv")
    ));
}

#[test]
fn import_csv_requires_a_path() {
    let result = Cli::try_parse_from(["despensa", "import-csv"]);

    assert!(result.is_err());
}

#[test]
fn runs_limit_defaults_to_20() {
    let cli = Cli::try_parse_from(["despensa", "runs"]).unwrap();

    assert!(matches!(
        cli.command,
        Some(Commands::Runs {
            id: None,
            limit: 20
        })
    ));
}

#[test]
fn runs_accepts_a_single_run_id() {
    let cli = Cli::try_parse_from(["despensa", "runs", "--id", "42"]).unwrap();

    assert!(matches!(
        cli.command,
        Some(Commands::Runs { id: Some(42), .. })
    ));
}

#[test]
fn products_accepts_vendor_and_limit() {
    let cli = Cli::try_parse_from([
        "despensa", "products", "--vendor", "consum", "--limit", "5",
    ])
    .unwrap();

    assert!(matches!(
        cli.command,
        Some(Commands::Products {
            vendor: Some(Vendor::Consum),
            limit: 5
        })
    ));
}
