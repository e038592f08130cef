use bank_statement_text::{
    AmountSelection, Classifier, ClassifierMode, ExtractorBuilder, FormatRegistry, ProfileSpec,
};
use std::env;
use tracing_subscriber::EnvFilter;

/// Running balance comes after the transaction amount on this layout.
const STATEMENT: &str = "\
Example Credit Union  Member 0042-7  EXAMPLE-CU-REG
Date        Description            Amount     Balance
2024-04-01  BAKERY ON MAIN          4.50     995.50
2024-04-01  CITY BUS PASS          60.00     935.50
2024-04-03  UNIQLO                 39.90     895.60
";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut registry = FormatRegistry::builtin()?;
    registry.register(
        ProfileSpec::new(
            "Example Credit Union",
            &[r"\b\d{4}-\d{2}-\d{2}\b"],
            r"(?P<amount>\d[\d,]*\.\d{2})",
            &["%Y-%m-%d"],
            "EUR",
        )
        .detection_token("EXAMPLE-CU-REG")
        .amount_selection(AmountSelection::Leftmost),
    )?;

    let report = ExtractorBuilder::new()
        .content(STATEMENT)
        .registry(&registry)
        .extract()?;
    println!("Layout: {}\n", report.profile);

    let categories = env::args()
        .nth(1)
        .unwrap_or_else(|| "demos/categories.yaml".to_string());
    let classifier = Classifier::from_path(&categories)?;

    for item in classifier.apply(&report.transactions, ClassifierMode::Tag) {
        println!(
            "{}  {:<20} {:>8}  {} {}",
            item.transaction.date,
            item.transaction.description,
            item.transaction.amount,
            item.category,
            classifier.color_for(&item.category).unwrap_or("")
        );
    }

    Ok(())
}
