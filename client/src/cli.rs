use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Backend base URL, overrides QKART_ENDPOINT
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    /// Search quiet period, overrides QKART_DEBOUNCE_MS
    #[arg(long, global = true)]
    pub debounce_ms: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the whole catalog
    Products,

    /// Run one search right away
    Search { query: String },

    /// Treat every stdin line as the search box contents
    Browse,

    /// Show the cart and order summary
    Cart(Login),

    /// Add a product with quantity 1
    Add {
        product_id: String,

        #[command(flatten)]
        login: Login,
    },

    /// Increase a product's quantity by one
    Inc {
        product_id: String,

        #[command(flatten)]
        login: Login,
    },

    /// Decrease a product's quantity by one
    Dec {
        product_id: String,

        #[command(flatten)]
        login: Login,
    },

    Register {
        #[arg(long)]
        username: String,

        #[arg(long)]
        password: String,

        #[arg(long)]
        confirm_password: String,
    },
}

#[derive(Args, Debug)]
pub struct Login {
    #[arg(long)]
    pub username: String,

    #[arg(long)]
    pub password: String,
}
