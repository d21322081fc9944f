//! # Storefront
//!
//! Holds the catalog snapshot, the sparse cart and the session, and wires them to the API.
//!
//! ## Failures
//! - Catalog fetch failure: empty catalog, error notification, unless a newer search superseded it
//! - Search with no match (non-success status): empty catalog, no notification
//! - Cart fetch failure: cart unchanged, error notification
//! - Cart update failure: cart unchanged, error notification
//! - Quantities only change once the store answers, a line that drops to zero disappears when the
//!   store's cart says so
use std::{sync::Arc, time::Duration};

use parking_lot::Mutex;
use qkart::{
    Adjustment, CartEntry, CatalogItem, Credentials, Debouncer, LineItem, Notify, OrderSummary,
    Registration, Sequencer, Severity, TokioTimer, adjusted_quantity, is_in_cart, materialize,
};
use tokio::{runtime::Handle, sync::watch};
use tracing::{debug, info, warn};

use crate::{api::ApiClient, error::AppError, session::Session};

pub const PRODUCTS_FAILED: &str = "Failed to fetch products. Please try again later.";
pub const SEARCH_FAILED: &str = "Search failed. Check that the backend is running and reachable.";
pub const CART_FETCH_FAILED: &str = "Failed to fetch cart. Please try again.";
pub const LOGIN_TO_ADD: &str = "Login to add an item to the Cart.";
pub const ADDED: &str = "Product is added successfully to the cart.";
pub const ADD_FAILED: &str = "Failed to fetch data. Please try again.";
pub const ALREADY_IN_CART: &str =
    "Item already in cart. Use the cart sidebar to update quantity or remove item.";
pub const QUANTITY_FAILED: &str = "Failed to update quantity. Please try again.";
pub const LOGGED_IN: &str = "Logged in successfully";
pub const REGISTERED: &str = "Registered successfully";
pub const UNREACHABLE: &str =
    "Something went wrong. Check that the backend is running, reachable and returns valid JSON.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartUpdate {
    Applied,
    Conflict,
    LoginRequired,
    NotInCart,
    Failed,
}

#[derive(Default)]
struct State {
    catalog: Vec<CatalogItem>,
    cart: Vec<CartEntry>,
    session: Option<Session>,
}

pub struct Storefront {
    api: ApiClient,
    notifier: Arc<dyn Notify>,
    state: Mutex<State>,
    searches: Sequencer,
    catalog_version: watch::Sender<u64>,
}

impl Storefront {
    pub fn new(api: ApiClient, notifier: Arc<dyn Notify>) -> Self {
        Self {
            api,
            notifier,
            state: Mutex::new(State::default()),
            searches: Sequencer::new(),
            catalog_version: watch::Sender::new(0),
        }
    }

    pub fn catalog(&self) -> Vec<CatalogItem> {
        self.state.lock().catalog.clone()
    }

    pub fn cart(&self) -> Vec<CartEntry> {
        self.state.lock().cart.clone()
    }

    pub fn session(&self) -> Option<Session> {
        self.state.lock().session.clone()
    }

    pub fn line_items(&self) -> Vec<LineItem> {
        let state = self.state.lock();
        materialize(&state.cart, &state.catalog)
    }

    pub fn summary(&self) -> OrderSummary {
        OrderSummary::from_items(&self.line_items())
    }

    /// Bumped every time the catalog snapshot is replaced.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.catalog_version.subscribe()
    }

    pub async fn load_products(&self) {
        let tag = self.searches.issue();

        let catalog = self.api.products().await.unwrap_or_else(|e| {
            warn!("Failed to fetch products: {e}");
            // a newer search already owns the catalog
            if self.searches.is_latest(tag) {
                self.notify(PRODUCTS_FAILED, Severity::Error);
            }
            Vec::new()
        });

        self.replace_catalog(tag, catalog);
    }

    pub async fn search(&self, query: &str) {
        let tag = self.searches.issue();
        debug!("Searching {query:?} as #{tag}");

        let catalog = match self.api.search(query).await {
            Ok(items) => items,
            Err(AppError::Status { status, .. }) => {
                debug!("No products for {query:?} ({status})");
                Vec::new()
            }
            Err(e) => {
                warn!("Search for {query:?} failed: {e}");
                self.notify(SEARCH_FAILED, Severity::Error);
                Vec::new()
            }
        };

        self.replace_catalog(tag, catalog);
    }

    fn replace_catalog(&self, tag: u64, catalog: Vec<CatalogItem>) {
        let mut state = self.state.lock();

        if !self.searches.is_latest(tag) {
            debug!("Discarding stale catalog #{tag}");
            return;
        }

        info!("Catalog replaced with {} products", catalog.len());
        state.catalog = catalog;
        drop(state);

        self.catalog_version.send_modify(|version| *version += 1);
    }

    /// Returns false when there is no session or the fetch failed.
    pub async fn fetch_cart(&self) -> bool {
        let Some(session) = self.session() else {
            return false;
        };

        match self.api.cart(&session).await {
            Ok(cart) => {
                self.state.lock().cart = cart;
                true
            }
            Err(e) => {
                warn!("Failed to fetch cart: {e}");
                self.notify(CART_FETCH_FAILED, Severity::Error);
                false
            }
        }
    }

    pub async fn add_to_cart(&self, product_id: &str) -> CartUpdate {
        let (session, cart) = {
            let state = self.state.lock();
            (state.session.clone(), state.cart.clone())
        };

        let Some(session) = session else {
            self.notify(LOGIN_TO_ADD, Severity::Warning);
            return CartUpdate::LoginRequired;
        };

        if is_in_cart(&cart, product_id) {
            self.notify(ALREADY_IN_CART, Severity::Warning);
            return CartUpdate::Conflict;
        }

        match self.api.update_cart(&session, &CartEntry::new(product_id, 1)).await {
            Ok(cart) => {
                self.state.lock().cart = cart;
                self.notify(ADDED, Severity::Success);
                CartUpdate::Applied
            }
            Err(e) => {
                warn!("Failed to add {product_id}: {e}");
                self.notify(ADD_FAILED, Severity::Error);
                CartUpdate::Failed
            }
        }
    }

    pub async fn change_quantity(&self, product_id: &str, adjustment: Adjustment) -> CartUpdate {
        let (session, quantity) = {
            let state = self.state.lock();
            (
                state.session.clone(),
                adjusted_quantity(&state.cart, product_id, adjustment),
            )
        };

        let Some(session) = session else {
            self.notify(LOGIN_TO_ADD, Severity::Warning);
            return CartUpdate::LoginRequired;
        };

        let Some(quantity) = quantity else {
            debug!("{product_id} is not in the cart, nothing to adjust");
            return CartUpdate::NotInCart;
        };

        match self.api.update_cart(&session, &CartEntry::new(product_id, quantity)).await {
            Ok(cart) => {
                self.state.lock().cart = cart;
                CartUpdate::Applied
            }
            Err(e) => {
                warn!("Failed to set {product_id} to {quantity}: {e}");
                self.notify(QUANTITY_FAILED, Severity::Error);
                CartUpdate::Failed
            }
        }
    }

    pub async fn login(&self, credentials: &Credentials) -> Option<Session> {
        if let Err(e) = credentials.validate() {
            self.notify(&e.to_string(), Severity::Warning);
            return None;
        }

        match self.api.login(credentials).await {
            Ok(session) => {
                info!("Logged in as {}", session.username);
                self.state.lock().session = Some(session.clone());
                self.notify(LOGGED_IN, Severity::Success);
                Some(session)
            }
            Err(e) => {
                self.notify_auth_failure(e);
                None
            }
        }
    }

    pub async fn register(&self, registration: &Registration) -> bool {
        if let Err(e) = registration.validate() {
            self.notify(&e.to_string(), Severity::Warning);
            return false;
        }

        match self.api.register(&registration.credentials).await {
            Ok(()) => {
                self.notify(REGISTERED, Severity::Success);
                true
            }
            Err(e) => {
                self.notify_auth_failure(e);
                false
            }
        }
    }

    pub fn logout(&self) {
        let mut state = self.state.lock();
        state.session = None;
        state.cart.clear();
    }

    fn notify_auth_failure(&self, error: AppError) {
        warn!("Auth request failed: {error}");

        match error {
            AppError::Status { message, .. } => self.notify(&message, Severity::Error),
            _ => self.notify(UNREACHABLE, Severity::Error),
        }
    }

    fn notify(&self, message: &str, severity: Severity) {
        self.notifier.notify(message, severity);
    }
}

/// Search input that re-queries the catalog once typing settles.
pub struct SearchBox {
    debouncer: Debouncer<TokioTimer>,
}

impl SearchBox {
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    pub fn new(storefront: Arc<Storefront>, quiet_period: Duration) -> Self {
        let runtime = Handle::current();

        let timer = TokioTimer::from(runtime.clone());
        let debouncer = Debouncer::new(timer, quiet_period, move |query| {
            let storefront = Arc::clone(&storefront);
            runtime.spawn(async move { storefront.search(&query).await });
        });

        Self { debouncer }
    }

    pub fn input(&self, query: impl Into<String>) {
        self.debouncer.push(query);
    }

    pub fn is_pending(&self) -> bool {
        self.debouncer.is_pending()
    }
}
