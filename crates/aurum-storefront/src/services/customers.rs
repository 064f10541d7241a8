use super::require_admin;
use crate::error::{Result, StorefrontError};
use aurum_api::ApiClient;
use aurum_auth::User;
use aurum_commerce::customer::{Customer, CustomerUpdate, RegistrationForm, Role};
use aurum_commerce::CustomerId;

#[derive(Debug, Clone)]
pub struct CustomerService {
    api: ApiClient,
}

impl CustomerService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Normalize and validate a sign-up form before it is submitted.
    pub fn prepare_registration(form: RegistrationForm) -> Result<RegistrationForm> {
        let form = form.normalized();
        form.validate()?;
        Ok(form)
    }

    pub async fn list(&self, acting: &User) -> Result<Vec<Customer>> {
        require_admin(acting)?;
        Ok(self.api.customers().list().await?)
    }

    pub async fn get(&self, id: &CustomerId) -> Result<Customer> {
        Ok(self.api.customers().get(id).await?)
    }

    /// Profile edit: trims values and drops empty ones before validating.
    pub async fn update_profile(&self, id: &CustomerId, update: CustomerUpdate) -> Result<Customer> {
        let update = CustomerUpdate {
            name: update.name.map(|n| n.trim().to_string()),
            phone: update
                .phone
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty()),
        };
        update.validate()?;
        Ok(self.api.customers().update(id, &update).await?)
    }

    /// Change another account's role. An admin cannot demote themselves.
    pub async fn change_role(&self, acting: &User, target: &CustomerId, role: Role) -> Result<Customer> {
        ensure_role_change_allowed(acting, target, role)?;
        let customer = self.api.customers().update_role(target, role).await?;
        tracing::info!(customer = %target, role = %role, "role changed");
        Ok(customer)
    }

    /// Delete another account. Admins cannot delete their own.
    pub async fn delete(&self, acting: &User, target: &CustomerId) -> Result<()> {
        require_admin(acting)?;
        if acting.customer_id() == Some(target) {
            return Err(StorefrontError::SelfModification);
        }
        self.api.customers().delete(target).await?;
        Ok(())
    }
}

fn ensure_role_change_allowed(acting: &User, target: &CustomerId, role: Role) -> Result<()> {
    require_admin(acting)?;
    if acting.customer_id() == Some(target) && role != Role::Admin {
        return Err(StorefrontError::SelfModification);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use aurum_auth::AuthError;

    fn user(id: &str, role: Role) -> User {
        User::Authenticated {
            id: CustomerId::new(id),
            email: format!("{id}@aurum.cl"),
            name: id.to_string(),
            role,
        }
    }

    #[test]
    fn test_admin_cannot_demote_self() {
        let admin = user("1", Role::Admin);
        let err = ensure_role_change_allowed(&admin, &CustomerId::new("1"), Role::Customer).unwrap_err();
        assert!(matches!(err, StorefrontError::SelfModification));
        assert!(ensure_role_change_allowed(&admin, &CustomerId::new("1"), Role::Admin).is_ok());
        assert!(ensure_role_change_allowed(&admin, &CustomerId::new("2"), Role::Customer).is_ok());
    }

    #[test]
    fn test_customers_cannot_change_roles() {
        let customer = user("2", Role::Customer);
        let err = ensure_role_change_allowed(&customer, &CustomerId::new("3"), Role::Admin).unwrap_err();
        assert!(matches!(err, StorefrontError::Auth(AuthError::InsufficientPermissions)));

        let guest = User::anonymous();
        let err = ensure_role_change_allowed(&guest, &CustomerId::new("3"), Role::Admin).unwrap_err();
        assert!(matches!(err, StorefrontError::Auth(AuthError::NotAuthenticated)));
    }

    #[test]
    fn test_registration_is_normalized() {
        let form = RegistrationForm {
            name: " Ana ".to_string(),
            email: " ANA@correo.cl".to_string(),
            password: "secreto".to_string(),
            password_confirmation: "secreto".to_string(),
            phone: Some("".to_string()),
        };
        let form = CustomerService::prepare_registration(form).unwrap();
        assert_eq!(form.email, "ana@correo.cl");
        assert_eq!(form.phone, None);
    }
}
