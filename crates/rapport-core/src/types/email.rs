//! Email templates and the outbound email log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::ids::UserId;

/// A reusable email template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailTemplate {
    /// Primary key.
    pub id: Uuid,
    /// Template name.
    pub name: String,
    /// Subject line.
    pub subject: String,
    /// HTML body.
    pub body_html: String,
    /// Plain-text body.
    #[serde(default)]
    pub body_text: Option<String>,
    /// Available template variables.
    #[serde(default = "empty_array")]
    pub variables: Value,
    /// Template category.
    #[serde(default)]
    pub category: Option<String>,
    /// Inactive templates are hidden from listings.
    pub is_active: bool,
    /// User who created the template.
    pub created_by: UserId,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

fn empty_array() -> Value {
    Value::Array(Vec::new())
}

/// Payload for creating a template.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewEmailTemplate {
    /// Template name (required).
    pub name: String,
    /// Subject line (required).
    pub subject: String,
    /// HTML body (required).
    pub body_html: String,
    /// Plain-text body.
    #[serde(default)]
    pub body_text: Option<String>,
    /// Available template variables.
    #[serde(default)]
    pub variables: Option<Value>,
    /// Template category.
    #[serde(default)]
    pub category: Option<String>,
}

impl EmailTemplate {
    /// Builds a template created by `creator`.
    pub fn from_new(new: NewEmailTemplate, creator: UserId) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: new.name,
            subject: new.subject,
            body_html: new.body_html,
            body_text: new.body_text,
            variables: new.variables.unwrap_or_else(empty_array),
            category: new.category,
            is_active: true,
            created_by: creator,
            created_at: now,
            updated_at: now,
        }
    }
}

/// One outbound email, queued or already dispatched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailLog {
    /// Primary key.
    pub id: Uuid,
    /// Template the email was rendered from, if any.
    #[serde(default)]
    pub template_id: Option<Uuid>,
    /// Sender address.
    pub from_email: String,
    /// Recipient address.
    pub to_email: String,
    /// CC addresses.
    #[serde(default)]
    pub cc: Vec<String>,
    /// BCC addresses.
    #[serde(default)]
    pub bcc: Vec<String>,
    /// Subject line.
    pub subject: String,
    /// HTML body.
    #[serde(default)]
    pub body_html: Option<String>,
    /// Plain-text body.
    #[serde(default)]
    pub body_text: Option<String>,
    /// "pending", "sent", "failed" or "bounced".
    pub status: String,
    /// When the email was dispatched.
    #[serde(default)]
    pub sent_at: Option<DateTime<Utc>>,
    /// Delivery error, if any.
    #[serde(default)]
    pub error_message: Option<String>,
    /// User who sent the email.
    #[serde(default)]
    pub sent_by: Option<UserId>,
    /// Kind of record this email relates to.
    #[serde(default)]
    pub related_to_type: Option<String>,
    /// ID of the related record.
    #[serde(default)]
    pub related_to_id: Option<Uuid>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Payload for queuing an outbound email.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewEmailLog {
    /// Template to render from.
    #[serde(default)]
    pub template_id: Option<Uuid>,
    /// Sender address (required).
    pub from_email: String,
    /// Recipient address (required).
    pub to_email: String,
    /// CC addresses.
    #[serde(default)]
    pub cc: Vec<String>,
    /// BCC addresses.
    #[serde(default)]
    pub bcc: Vec<String>,
    /// Subject line (required).
    pub subject: String,
    /// HTML body.
    #[serde(default)]
    pub body_html: Option<String>,
    /// Plain-text body.
    #[serde(default)]
    pub body_text: Option<String>,
    /// Kind of record this email relates to.
    #[serde(default)]
    pub related_to_type: Option<String>,
    /// ID of the related record.
    #[serde(default)]
    pub related_to_id: Option<Uuid>,
}

impl EmailLog {
    /// Queues an email sent by `sender`. Status starts as "pending";
    /// actual delivery is out of scope.
    pub fn queued(new: NewEmailLog, sender: UserId) -> Self {
        Self {
            id: Uuid::new_v4(),
            template_id: new.template_id,
            from_email: new.from_email,
            to_email: new.to_email,
            cc: new.cc,
            bcc: new.bcc,
            subject: new.subject,
            body_html: new.body_html,
            body_text: new.body_text,
            status: "pending".to_string(),
            sent_at: None,
            error_message: None,
            sent_by: Some(sender),
            related_to_type: new.related_to_type,
            related_to_id: new.related_to_id,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queued_email_is_pending() {
        let log = EmailLog::queued(
            NewEmailLog {
                from_email: "noreply@rapport-crm.org".to_string(),
                to_email: "dana@acme.test".to_string(),
                subject: "Quote".to_string(),
                ..Default::default()
            },
            UserId::new(),
        );
        assert_eq!(log.status, "pending");
        assert!(log.sent_at.is_none());
        assert!(log.sent_by.is_some());
    }

    #[test]
    fn test_new_template_is_active() {
        let template = EmailTemplate::from_new(
            NewEmailTemplate {
                name: "Welcome".to_string(),
                subject: "Hello".to_string(),
                body_html: "<p>Hi {{first_name}}</p>".to_string(),
                ..Default::default()
            },
            UserId::new(),
        );
        assert!(template.is_active);
        assert!(template.variables.is_array());
    }
}
