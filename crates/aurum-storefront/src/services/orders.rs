use super::require_admin;
use crate::error::Result;
use aurum_api::ApiClient;
use aurum_auth::User;
use aurum_commerce::checkout::{Order, OrderStatus};
use aurum_commerce::{CustomerId, OrderId};

/// Orders with the given status, or all of them.
pub fn filter_by_status(orders: Vec<Order>, status: Option<OrderStatus>) -> Vec<Order> {
    match status {
        Some(status) => orders.into_iter().filter(|o| o.status == status).collect(),
        None => orders,
    }
}

#[derive(Debug, Clone)]
pub struct OrderService {
    api: ApiClient,
}

impl OrderService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Back-office listing, newest first.
    pub async fn list(&self, acting: &User, status: Option<OrderStatus>) -> Result<Vec<Order>> {
        require_admin(acting)?;
        let mut orders = filter_by_status(self.api.orders().list().await?, status);
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }

    /// Purchase history shown on the profile page.
    pub async fn history(&self, customer: &CustomerId) -> Result<Vec<Order>> {
        let mut orders = self.api.orders().for_customer(customer).await?;
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }

    pub async fn get(&self, id: &OrderId) -> Result<Order> {
        Ok(self.api.orders().get(id).await?)
    }

    pub async fn update_status(&self, acting: &User, id: &OrderId, status: OrderStatus) -> Result<Order> {
        require_admin(acting)?;
        let order = self.api.orders().update_status(id, status).await?;
        tracing::info!(order = %id, status = %status, "order status changed");
        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aurum_commerce::Money;

    fn order(id: &str, status: OrderStatus) -> Order {
        Order {
            id: OrderId::new(id),
            customer_id: None,
            status,
            items: Vec::new(),
            total: Money::clp(10_000),
            shipping_address: None,
            created_at: None,
        }
    }

    #[test]
    fn test_filter_by_status() {
        let orders = vec![
            order("1", OrderStatus::Pending),
            order("2", OrderStatus::Shipped),
            order("3", OrderStatus::Pending),
        ];
        assert_eq!(filter_by_status(orders.clone(), None).len(), 3);
        let pending = filter_by_status(orders, Some(OrderStatus::Pending));
        assert_eq!(pending.len(), 2);
        assert!(pending.iter().all(|o| o.status == OrderStatus::Pending));
    }
}
