//! Contact form and the messages it produces.

use crate::ids::ContactId;
use crate::validation::{self, FieldErrors};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Minimum length of a contact message body.
pub const MIN_MESSAGE_LEN: usize = 10;

/// A message received through the contact page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContactMessage {
    pub id: ContactId,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub subject: String,
    pub message: String,
    /// Marked as read in the back-office.
    #[serde(default)]
    pub read: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl ContactMessage {
    /// First characters of the message for listings.
    pub fn preview(&self, max_chars: usize) -> String {
        let message = self.message.trim();
        if message.chars().count() <= max_chars {
            return message.to_string();
        }
        let cut: String = message.chars().take(max_chars).collect();
        format!("{}…", cut.trim_end())
    }
}

/// Contact page form.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

impl ContactForm {
    pub fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_lowercase(),
            subject: self.subject.trim().to_string(),
            message: self.message.trim().to_string(),
        }
    }

    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.check("name", validation::required(&self.name, "El nombre"));
        if self.email.trim().is_empty() {
            errors.add("email", "El email es obligatorio");
        } else {
            errors.check("email", validation::email(&self.email));
        }
        errors.check("subject", validation::required(&self.subject, "El asunto"));
        errors.check(
            "message",
            validation::min_len(&self.message, MIN_MESSAGE_LEN, "El mensaje"),
        );
        errors.into_result()
    }
}

/// Number of messages not yet read.
pub fn unread_count(messages: &[ContactMessage]) -> usize {
    messages.iter().filter(|m| !m.read).count()
}
