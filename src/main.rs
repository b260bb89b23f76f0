// Lending Ledger - scripted walkthrough
//
// Usage: lending-ledger [config.json]
// Log verbosity follows RUST_LOG (default: info).

use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use std::env;
use tracing_subscriber::EnvFilter;

use lending_ledger::{Ledger, LedgerConfig, VERSION};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match env::args().nth(1) {
        Some(path) => LedgerConfig::from_file(&path)?,
        None => LedgerConfig::default(),
    };

    run_walkthrough(config)
}

fn run_walkthrough(config: LedgerConfig) -> Result<()> {
    println!("📚 Lending Ledger v{}", VERSION);
    println!(
        "Loan period: {} days | Fine: ${:.2}/day",
        config.loan_period_days, config.daily_fine_rate
    );
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let mut ledger = Ledger::with_config(config).context("Invalid ledger configuration")?;

    let dune = ledger.register_book("dune", "frank herbert", "978-0441013593", 2)?;
    let hobbit = ledger.register_book("the hobbit", "j.r.r. tolkien", "978-0547928227", 1)?;
    ledger.register_book("Dune", "Frank Herbert", "978-0441013593", 1)?;

    let ada = ledger.register_member("ada lovelace", "Ada@Example.com")?;
    let grace = ledger.register_member("grace hopper", "grace@example.com")?;

    let start = Utc::now();
    let loan = ledger.issue_book(dune, ada, start)?;
    ledger.issue_book(hobbit, grace, start)?;
    println!("\n✓ Issued book {} to {}, due {}", dune, loan.member_name, loan.due_at.format("%Y-%m-%d"));

    if let Err(e) = ledger.issue_book(hobbit, ada, start) {
        println!("✗ Cannot issue book: {}", e);
    }

    println!("\n📖 Available books:");
    for book in ledger.list_available_books() {
        println!("  {}", book);
    }

    let late = start + Duration::days(ledger.config().loan_period_days + 6);
    println!("\n⏰ Issued books as of {}:", late.format("%Y-%m-%d"));
    for loan in ledger.list_issued_books(late) {
        println!("  {}", loan);
    }

    let outcome = ledger.return_book(hobbit, grace, late)?;
    println!(
        "\n✓ Returned book {} after {} days (overdue: {} days, fine ${:.2})",
        hobbit, outcome.days_borrowed, outcome.overdue_days, outcome.fine
    );

    println!("\n👤 Member info:");
    println!("{}", ledger.get_member_info(grace, late)?);
    println!("{}", ledger.get_member_info(ada, late)?);

    ledger
        .verify_integrity()
        .context("Ledger invariants broken after walkthrough")?;

    println!("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("{}", ledger.catalog_stats());
    println!("✓ {} audit events recorded", ledger.event_count());
    for event in ledger.events() {
        println!("  #{} {}", event.sequence, event.event_type.as_str());
    }

    Ok(())
}
