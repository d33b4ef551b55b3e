use std::future::Future;

use anyhow::Context as _;
use sea_orm::DatabaseConnection;

use crate::health::DependencyProbe;

impl DependencyProbe for DatabaseConnection {
    fn ping(&self) -> impl Future<Output = anyhow::Result<()>> + Send {
        async move { DatabaseConnection::ping(self).await.context("database ping") }
    }
}
