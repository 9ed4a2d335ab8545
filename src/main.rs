// src/main.rs
use tiffin::adapter::OrderingShell;
use tiffin::application::usecase::HistoryOutcome;
use tiffin::config::Config;
use tiffin::domain::errors::{AppError, AppResult};
use tiffin::domain::models::{Catalog, PlacedOrder};

const USAGE: &str = "usage: tiffin [menu | history <phone>]";

#[tokio::main]
async fn main() -> AppResult<()> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    config.init_logging()?;

    log::info!("Starting tiffin v{}", env!("CARGO_PKG_VERSION"));

    let shell = OrderingShell::connect(&config.api)?;
    let args: Vec<String> = std::env::args().skip(1).collect();

    match args.iter().map(String::as_str).collect::<Vec<_>>().as_slice() {
        [] | ["menu"] => show_menu(&shell).await,
        ["history", phone] => show_history(&shell, phone).await,
        _ => Err(AppError::Config(USAGE.to_string())),
    }
}

async fn show_menu(shell: &OrderingShell) -> AppResult<()> {
    shell.open_menu().await?;

    match shell.catalog().catalog().await {
        Some(catalog) => print_catalog(&catalog),
        None => {
            let message = shell.catalog().error().await.unwrap_or_default();
            println!("{}", message);
        }
    }

    Ok(())
}

async fn show_history(shell: &OrderingShell, phone: &str) -> AppResult<()> {
    shell.find_orders(phone).await?;

    match shell.orders().history_outcome().await {
        HistoryOutcome::Orders(orders) => orders.iter().for_each(print_order),
        HistoryOutcome::NoOrders => println!("No orders found for this phone number."),
        HistoryOutcome::Failed(message) => println!("{}", message),
        HistoryOutcome::NotQueried | HistoryOutcome::Loading => {}
    }

    Ok(())
}

fn print_catalog(catalog: &Catalog) {
    for category in catalog.categories() {
        println!("{}", category.name);
        for item in &category.items {
            println!("  {:<24} {:>8}  [{}]", item.name, item.price, item.id);
        }
    }
}

fn print_order(order: &PlacedOrder) {
    let placed = order
        .created_at
        .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default();

    println!(
        "#{}  {}  {}  total {}",
        order.id,
        placed,
        order.status.label(),
        order.total_amount
    );
    for item in &order.items {
        println!("  {} x {}  {}", item.quantity, item.name, item.subtotal());
    }
}
