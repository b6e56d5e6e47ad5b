//! fraud-engine CLI
//!
//! Run fraud detection over a transaction batch from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Analyze a batch of transactions from a JSON file
//! fraud-engine analyze --input transactions.json
//!
//! # Output the full envelope as JSON, plus the downstream export
//! fraud-engine analyze --input transactions.json --format json --export out.json
//!
//! # Generate a random transaction batch for testing
//! fraud-engine generate --accounts 20 --transactions 100
//! ```

use chrono::{DateTime, Utc};
use fraud_engine::core::account::AccountId;
use fraud_engine::core::config::DetectionConfig;
use fraud_engine::core::transaction::{Transaction, TransactionBatch};
use fraud_engine::pipeline::export::to_forensic_export;
use fraud_engine::pipeline::DetectionEngine;
use fraud_engine::simulation::generator::{generate_random_batch, BatchConfig};
use rust_decimal::Decimal;
use std::fs;
use std::process;

fn print_usage() {
    eprintln!(
        r#"fraud-engine — transaction-graph fraud ring detection and risk scoring

USAGE:
    fraud-engine <COMMAND> [OPTIONS]

COMMANDS:
    analyze     Run the detection pipeline on a transaction batch
    generate    Generate a random transaction batch (for testing)
    help        Show this message

OPTIONS (analyze):
    --input <FILE>      Path to JSON transactions file
    --format <FORMAT>   Output format: text (default) or json
    --export <FILE>     Also write the downstream forensic export

OPTIONS (generate):
    --accounts <N>      Number of accounts (default: 10)
    --transactions <N>  Number of transactions (default: 30)
    --output <FILE>     Write to file instead of stdout

EXAMPLES:
    fraud-engine analyze --input transactions.json
    fraud-engine analyze --input transactions.json --format json
    fraud-engine analyze --input transactions.json --export forensic.json
    fraud-engine generate --accounts 50 --transactions 400 --output test.json"#
    );
}

/// JSON schema for input transactions.
#[derive(serde::Deserialize)]
struct TransactionInput {
    transaction_id: String,
    sender_id: String,
    receiver_id: String,
    amount: String,
    timestamp: DateTime<Utc>,
}

#[derive(serde::Deserialize)]
struct TransactionsFile {
    transactions: Vec<TransactionInput>,
}

fn load_batch(path: &str) -> TransactionBatch {
    let content = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading file '{}': {}", path, e);
        process::exit(1);
    });

    let file: TransactionsFile = serde_json::from_str(&content).unwrap_or_else(|e| {
        eprintln!("Error parsing JSON: {}", e);
        eprintln!("Expected format:");
        eprintln!(
            r#"{{
  "transactions": [
    {{ "transaction_id": "TX-1", "sender_id": "ACC-A", "receiver_id": "ACC-B",
       "amount": "1000.00", "timestamp": "2025-03-01T09:00:00Z" }}
  ]
}}"#
        );
        process::exit(1);
    });

    let mut transactions = Vec::with_capacity(file.transactions.len());
    for tx in file.transactions {
        let amount: Decimal = tx.amount.parse().unwrap_or_else(|e| {
            eprintln!("Invalid amount '{}': {}", tx.amount, e);
            process::exit(1);
        });
        transactions.push(Transaction::new(
            tx.transaction_id,
            AccountId::new(tx.sender_id),
            AccountId::new(tx.receiver_id),
            amount,
            tx.timestamp,
        ));
    }

    TransactionBatch::new(transactions).unwrap_or_else(|e| {
        eprintln!("Invalid batch: {}", e);
        process::exit(1);
    })
}

fn cmd_analyze(args: &[String]) {
    let mut input_path = None;
    let mut format = "text".to_string();
    let mut export_path: Option<String> = None;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--input" => {
                i += 1;
                input_path = Some(args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--input requires a file path");
                    process::exit(1);
                }));
            }
            "--format" => {
                i += 1;
                format = args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--format requires 'text' or 'json'");
                    process::exit(1);
                });
            }
            "--export" => {
                i += 1;
                export_path = Some(args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--export requires a file path");
                    process::exit(1);
                }));
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    let path = input_path.unwrap_or_else(|| {
        eprintln!("Error: --input <FILE> is required");
        process::exit(1);
    });

    let batch = load_batch(&path);
    let config = DetectionConfig::default();
    let result = DetectionEngine::analyze(&batch, &config);

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&result).unwrap());
    } else {
        println!("=== Detection Result ===");
        println!("Batch:        {}", result.batch_id);
        println!("Transactions: {}", result.total_transactions);
        println!("Accounts:     {}", result.analyzed_accounts);
        println!("Suspects:     {}", result.suspicious_nodes.len());
        println!("Rings:        {}", result.rings.len());
        println!("Mules:        {}", result.summary.mule_count);
        println!("Flagged:      {}", result.summary.flagged_amount);

        if !result.suspicious_nodes.is_empty() {
            println!("\n--- Top suspects ---");
            for node in &result.suspicious_nodes {
                println!(
                    "  {:<16} score {:>5.1}  role {:?}  degree {}",
                    node.id.to_string(),
                    node.risk_score,
                    node.details.role,
                    node.details.degree
                );
            }
        }

        if !result.rings.is_empty() {
            println!("\n--- Rings ---");
            for ring in &result.rings {
                let nodes: Vec<String> = ring.nodes.iter().map(|n| n.to_string()).collect();
                println!(
                    "  {}  risk {:>5.1}  {:?}  volume {}  {}",
                    ring.ring_id,
                    ring.risk_score,
                    ring.pattern_type,
                    ring.total_volume,
                    nodes.join(" → ")
                );
            }
        }
    }

    if let Some(path) = export_path {
        let export = to_forensic_export(&result);
        let json = serde_json::to_string_pretty(&export).unwrap();
        fs::write(&path, &json).unwrap_or_else(|e| {
            eprintln!("Error writing to '{}': {}", path, e);
            process::exit(1);
        });
        eprintln!("Forensic export written → {}", path);
    }
}

fn cmd_generate(args: &[String]) {
    let mut accounts = 10usize;
    let mut transactions_count = 30usize;
    let mut output_path: Option<String> = None;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--accounts" => {
                i += 1;
                accounts = args
                    .get(i)
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(|| {
                        eprintln!("--accounts requires a number");
                        process::exit(1);
                    });
            }
            "--transactions" => {
                i += 1;
                transactions_count = args
                    .get(i)
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(|| {
                        eprintln!("--transactions requires a number");
                        process::exit(1);
                    });
            }
            "--output" => {
                i += 1;
                output_path = Some(args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--output requires a file path");
                    process::exit(1);
                }));
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    let config = BatchConfig {
        account_count: accounts,
        avg_transactions_per_account: transactions_count / accounts.max(1),
        ..Default::default()
    };

    let batch = generate_random_batch(&config);

    #[derive(serde::Serialize)]
    struct OutputTransaction {
        transaction_id: String,
        sender_id: String,
        receiver_id: String,
        amount: String,
        timestamp: DateTime<Utc>,
    }

    #[derive(serde::Serialize)]
    struct OutputFile {
        transactions: Vec<OutputTransaction>,
    }

    let output = OutputFile {
        transactions: batch
            .transactions()
            .iter()
            .map(|tx| OutputTransaction {
                transaction_id: tx.id().to_string(),
                sender_id: tx.sender().to_string(),
                receiver_id: tx.receiver().to_string(),
                amount: tx.amount().to_string(),
                timestamp: tx.timestamp(),
            })
            .collect(),
    };

    let json = serde_json::to_string_pretty(&output).unwrap();

    if let Some(path) = output_path {
        fs::write(&path, &json).unwrap_or_else(|e| {
            eprintln!("Error writing to '{}': {}", path, e);
            process::exit(1);
        });
        eprintln!(
            "Generated {} transactions across {} accounts → {}",
            batch.len(),
            accounts,
            path
        );
    } else {
        println!("{}", json);
    }
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let command = args[1].as_str();
    let rest = &args[2..];

    match command {
        "analyze" => cmd_analyze(rest),
        "generate" => cmd_generate(rest),
        "help" | "--help" | "-h" => print_usage(),
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            process::exit(1);
        }
    }
}
