use super::require_admin;
use crate::error::Result;
use aurum_api::ApiClient;
use aurum_auth::User;
use aurum_commerce::stats::DashboardStats;

/// Figures for the back-office home page.
#[derive(Debug, Clone)]
pub struct DashboardService {
    api: ApiClient,
}

impl DashboardService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn stats(&self, acting: &User) -> Result<DashboardStats> {
        require_admin(acting)?;
        let (products, categories, collections, customers, contacts) = (
            self.api.products(),
            self.api.categories(),
            self.api.collections(),
            self.api.customers(),
            self.api.contacts(),
        );
        let (products, categories, collections, customers, messages) = futures::try_join!(
            products.list(),
            categories.list(),
            collections.list(),
            customers.list(),
            contacts.list()
        )?;
        Ok(DashboardStats::compute(
            &products,
            &categories,
            &collections,
            &customers,
            &messages,
        )?)
    }
}
