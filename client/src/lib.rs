use std::{sync::Arc, time::Duration};

use qkart::{Adjustment, CatalogItem, Credentials, Registration};
use signal::{
    ctrl_c,
    unix::{SignalKind, signal},
};
use tokio::{
    io::{AsyncBufReadExt, BufReader, stdin},
    signal,
};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod notifier;
pub mod session;
pub mod storefront;

use api::ApiClient;
use cli::{Cli, Command, Login};
use config::Config;
use error::AppError;
use notifier::TracingNotifier;
use storefront::{SearchBox, Storefront};

pub async fn start(cli: Cli) -> Result<(), AppError> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let mut config = Config::load()?;
    if let Some(endpoint) = cli.endpoint {
        config.endpoint = endpoint;
    }
    if let Some(millis) = cli.debounce_ms {
        config.debounce = Duration::from_millis(millis);
    }

    let api = ApiClient::new(config.endpoint.as_str(), config.timeout)?;
    info!("Using backend at {}", api.endpoint());
    let storefront = Arc::new(Storefront::new(api, Arc::new(TracingNotifier)));

    match cli.command {
        Command::Products => {
            storefront.load_products().await;
            print_catalog(&storefront.catalog());
        }
        Command::Search { query } => {
            storefront.search(&query).await;
            print_catalog(&storefront.catalog());
        }
        Command::Browse => browse(storefront, config.debounce).await?,
        Command::Cart(login) => {
            if sign_in(&storefront, login).await {
                print_cart(&storefront);
            }
        }
        Command::Add { product_id, login } => {
            if sign_in(&storefront, login).await {
                storefront.add_to_cart(&product_id).await;
                print_cart(&storefront);
            }
        }
        Command::Inc { product_id, login } => {
            if sign_in(&storefront, login).await {
                storefront.change_quantity(&product_id, Adjustment::Add).await;
                print_cart(&storefront);
            }
        }
        Command::Dec { product_id, login } => {
            if sign_in(&storefront, login).await {
                storefront.change_quantity(&product_id, Adjustment::Remove).await;
                print_cart(&storefront);
            }
        }
        Command::Register {
            username,
            password,
            confirm_password,
        } => {
            storefront
                .register(&Registration::new(username, password, confirm_password))
                .await;
        }
    }

    Ok(())
}

async fn sign_in(storefront: &Storefront, login: Login) -> bool {
    let credentials = Credentials::new(login.username, login.password);
    if storefront.login(&credentials).await.is_none() {
        return false;
    }

    storefront.load_products().await;
    storefront.fetch_cart().await
}

async fn browse(storefront: Arc<Storefront>, quiet_period: Duration) -> Result<(), AppError> {
    storefront.load_products().await;
    print_catalog(&storefront.catalog());

    let search_box = SearchBox::new(Arc::clone(&storefront), quiet_period);
    let mut updates = storefront.subscribe();
    let mut lines = BufReader::new(stdin()).lines();
    let mut awaiting = false;

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            line = lines.next_line() => match line? {
                Some(query) => {
                    search_box.input(query);
                    awaiting = true;
                }
                None => {
                    // input closed mid-typing, let the last query land
                    if awaiting && updates.changed().await.is_ok() {
                        print_catalog(&storefront.catalog());
                    }
                    break;
                }
            },
            Ok(()) = updates.changed() => {
                awaiting = search_box.is_pending();
                print_catalog(&storefront.catalog());
            }
            _ = &mut shutdown => break,
        }
    }

    Ok(())
}

fn print_catalog(catalog: &[CatalogItem]) {
    if catalog.is_empty() {
        println!("No products found");
        return;
    }

    for item in catalog {
        println!(
            "{:<18} {:<32} {:<12} ${:>8} {}",
            item.id,
            item.name,
            item.category,
            item.unit_cost,
            "*".repeat(usize::from(item.rating))
        );
    }
    println!();
}

fn print_cart(storefront: &Storefront) {
    let items = storefront.line_items();
    if items.is_empty() {
        println!("Cart is empty. Add more items to the cart to checkout.");
        return;
    }

    for line in &items {
        println!(
            "{:<18} {:<32} Qty: {:<4} ${}",
            line.item.id, line.item.name, line.quantity, line.item.unit_cost
        );
    }

    let summary = storefront.summary();
    println!("\nOrder details");
    println!("Products          {}", summary.products);
    println!("Subtotal          ${}", summary.subtotal);
    println!("Shipping charges  ${}", summary.shipping);
    println!("Total             ${}", summary.total);
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                warn!("Failed to install Ctrl+C handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                terminate.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                warn!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
