use bank_statement_text::records::{write_csv, StatementRecord};
use bank_statement_text::{Classifier, ClassifierConfig, ClassifierMode, ExtractorBuilder};
use std::env;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().collect();

    let file_path = if args.len() > 1 {
        &args[1]
    } else {
        println!("Using sample statement text from demos/sample_statement.txt\n");
        "demos/sample_statement.txt"
    };

    let report = ExtractorBuilder::new().filename(file_path).extract()?;

    if let Some(warning) = report.empty_warning() {
        println!("{warning}");
        return Ok(());
    }

    println!(
        "Layout: {} ({} transactions, {} lines skipped)\n",
        report.profile,
        report.transactions.len(),
        report.diagnostics.len()
    );

    for (i, tx) in report.transactions.iter().enumerate() {
        println!("Transaction {}:", i + 1);
        println!("  Date: {}", tx.date);
        println!("  Description: {}", tx.description);
        println!("  Amount: {} {}", tx.amount, tx.currency.as_deref().unwrap_or(""));
        if let Some(entry_type) = &tx.entry_type {
            println!("  Type: {}", entry_type);
        }
        if tx.needs_review {
            println!("  (flagged for review)");
        }
        println!();
    }

    for diagnostic in &report.diagnostics {
        println!("Skipped {}", diagnostic);
    }

    let classifier = Classifier::new(ClassifierConfig::food());
    let food = classifier.apply(&report.transactions, ClassifierMode::Filter);

    println!("Food spending:");
    for (category, total) in classifier.category_totals(&food) {
        println!("  {category}: {total}");
    }

    println!("\nFood transactions as CSV:");
    let records: Vec<StatementRecord> = food.iter().map(StatementRecord::from).collect();
    write_csv(&records, std::io::stdout())?;

    Ok(())
}
