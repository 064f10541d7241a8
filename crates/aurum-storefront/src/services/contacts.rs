use super::require_admin;
use crate::error::Result;
use aurum_api::ApiClient;
use aurum_auth::User;
use aurum_commerce::contact::{unread_count, ContactForm, ContactMessage};
use aurum_commerce::ContactId;

#[derive(Debug, Clone)]
pub struct ContactService {
    api: ApiClient,
}

impl ContactService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Send the contact page form.
    pub async fn submit(&self, form: ContactForm) -> Result<ContactMessage> {
        let form = form.normalized();
        form.validate()?;
        Ok(self.api.contacts().create(&form).await?)
    }

    /// Inbox for the back-office: unread first, then newest first.
    pub async fn inbox(&self, acting: &User) -> Result<Vec<ContactMessage>> {
        require_admin(acting)?;
        let mut messages = self.api.contacts().list().await?;
        sort_inbox(&mut messages);
        Ok(messages)
    }

    pub async fn unread(&self, acting: &User) -> Result<usize> {
        require_admin(acting)?;
        let messages = self.api.contacts().list().await?;
        Ok(unread_count(&messages))
    }

    pub async fn mark_read(&self, acting: &User, id: &ContactId) -> Result<ContactMessage> {
        require_admin(acting)?;
        Ok(self.api.contacts().mark_read(id).await?)
    }

    pub async fn delete(&self, acting: &User, id: &ContactId) -> Result<()> {
        require_admin(acting)?;
        Ok(self.api.contacts().delete(id).await?)
    }
}

fn sort_inbox(messages: &mut [ContactMessage]) {
    messages.sort_by(|a, b| {
        a.read
            .cmp(&b.read)
            .then_with(|| b.created_at.cmp(&a.created_at))
    });
}
