//! Business logic services

pub mod bootstrap;
pub mod mutations;
pub mod queries;
pub mod seed;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::{
    error::{AppError, AppResult},
    repository::BookStore,
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub queries: queries::QueryService,
    pub mutations: mutations::MutationService,
}

impl Services {
    /// Create all services over the given collection.
    ///
    /// `deadline` bounds every store call made on behalf of a request.
    pub fn new(store: Arc<dyn BookStore>, deadline: Duration) -> Self {
        Self {
            queries: queries::QueryService::new(store.clone(), deadline),
            mutations: mutations::MutationService::new(store, deadline),
        }
    }
}

/// Run a store call, failing with [`AppError::Timeout`] past the deadline
pub(crate) async fn with_deadline<T, F>(deadline: Duration, call: F) -> AppResult<T>
where
    F: Future<Output = AppResult<T>>,
{
    match tokio::time::timeout(deadline, call).await {
        Ok(result) => result,
        Err(_) => Err(AppError::Timeout(deadline.as_millis())),
    }
}
