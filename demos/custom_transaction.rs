use bank_statement_text::errors::StatementParseError;
use bank_statement_text::{ExtractorBuilder, Transaction};
use chrono::NaiveDate;
use std::env;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
struct MyTransaction {
    date: NaiveDate,
    amount: f64,
    merchant: String,
    direction: String,
}

impl TryFrom<Transaction> for MyTransaction {
    type Error = StatementParseError;

    fn try_from(txn: Transaction) -> Result<Self, Self::Error> {
        let direction = match txn.entry_type.as_deref() {
            Some("DB") => "Expense",
            Some("CR") => "Income",
            _ => "Unknown",
        };

        Ok(MyTransaction {
            date: txn.date,
            amount: txn.amount.to_string().parse().unwrap_or(0.0),
            merchant: txn.description,
            direction: direction.to_string(),
        })
    }
}

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

    let content = std::fs::read_to_string(file_path)?;

    let transactions: Vec<MyTransaction> = ExtractorBuilder::new()
        .content(&content)
        .filename(file_path)
        .extract_into()?;

    println!("Found {} custom transactions\n", transactions.len());

    for (i, tx) in transactions.iter().enumerate() {
        println!("Transaction {}:", i + 1);
        println!("  Date: {}", tx.date);
        println!("  Amount: ${:.2}", tx.amount);
        println!("  Merchant: {}", tx.merchant);
        println!("  Direction: {}", tx.direction);
        println!();
    }

    Ok(())
}
