//! Shared application state.

use std::sync::Arc;

use crate::services::customer_service::CustomerService;

/// State handed to every handler through `State<AppState>`.
#[derive(Clone)]
pub struct AppState {
    pub customers: Arc<dyn CustomerService>,
}

impl AppState {
    pub fn new(customers: Arc<dyn CustomerService>) -> Self {
        Self { customers }
    }
}
