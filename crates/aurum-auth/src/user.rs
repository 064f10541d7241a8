//! User types.

use crate::SessionId;
use aurum_commerce::customer::{Customer, Role};
use aurum_commerce::ids::CustomerId;
use serde::{Deserialize, Serialize};

/// The person using the storefront.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum User {
    /// Guest, tracked by a session id.
    Anonymous {
        session_id: SessionId,
    },
    /// Logged-in customer or admin.
    Authenticated {
        id: CustomerId,
        email: String,
        name: String,
        role: Role,
    },
}

impl User {
    /// Create a new anonymous user with a fresh session id.
    pub fn anonymous() -> Self {
        User::Anonymous {
            session_id: SessionId::generate(),
        }
    }

    pub fn from_customer(customer: &Customer) -> Self {
        User::Authenticated {
            id: customer.id.clone(),
            email: customer.email.clone(),
            name: customer.name.clone(),
            role: customer.role,
        }
    }

    /// Check if user is authenticated.
    pub fn is_authenticated(&self) -> bool {
        matches!(self, User::Authenticated { .. })
    }

    /// Check if user is anonymous.
    pub fn is_anonymous(&self) -> bool {
        matches!(self, User::Anonymous { .. })
    }

    pub fn is_admin(&self) -> bool {
        self.role() == Some(Role::Admin)
    }

    /// Get the customer id if authenticated.
    pub fn customer_id(&self) -> Option<&CustomerId> {
        match self {
            User::Authenticated { id, .. } => Some(id),
            User::Anonymous { .. } => None,
        }
    }

    /// Get email if authenticated.
    pub fn email(&self) -> Option<&str> {
        match self {
            User::Authenticated { email, .. } => Some(email),
            User::Anonymous { .. } => None,
        }
    }

    pub fn role(&self) -> Option<Role> {
        match self {
            User::Authenticated { role, .. } => Some(*role),
            User::Anonymous { .. } => None,
        }
    }

    /// Get display name.
    pub fn display_name(&self) -> &str {
        match self {
            User::Authenticated { name, email, .. } if name.trim().is_empty() => email.as_str(),
            User::Authenticated { name, .. } => name.as_str(),
            User::Anonymous { .. } => "Invitado",
        }
    }

    /// Check if user has at least the given permission level.
    pub fn has_permission(&self, required: Role) -> bool {
        self.role().is_some_and(|role| role.has_permission(required))
    }
}
