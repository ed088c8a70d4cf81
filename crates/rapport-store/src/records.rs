//! CRM record queries: contacts, deals, tasks, activities, workflows,
//! email templates/logs, and the audit trail.

use chrono::Utc;
use uuid::Uuid;

use rapport_core::types::{
    Activity, AuditLog, Contact, ContactPatch, Deal, DealPatch, EmailLog, EmailTemplate, Task,
    TaskPatch, Workflow,
};
use rapport_core::{Error, Result};

use crate::query::{
    ActivityFilter, AuditFilter, ContactFilter, DealFilter, OwnerScope, Page, Paged, TaskFilter,
};
use crate::store::Store;

fn page_of<T: Clone>(matches: Vec<T>, page: Page) -> Paged<T> {
    let total = matches.len();
    let items = matches
        .into_iter()
        .skip(page.offset())
        .take(page.limit as usize)
        .collect();
    Paged { items, total }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

impl Store {
    // ========================================================================
    // Contacts
    // ========================================================================

    /// Inserts a contact.
    pub async fn insert_contact(&self, contact: Contact) -> Result<Contact> {
        let mut tables = self.tables.write().await;
        tables.contacts.insert(contact.id, contact.clone());
        Ok(contact)
    }

    /// Looks up a contact by ID.
    pub async fn find_contact(&self, id: Uuid) -> Option<Contact> {
        self.tables.read().await.contacts.get(&id).cloned()
    }

    /// Contacts visible in `scope`, filtered and paginated, newest first.
    pub async fn list_contacts(
        &self,
        scope: OwnerScope,
        filter: &ContactFilter,
        page: Page,
    ) -> Paged<Contact> {
        let tables = self.tables.read().await;
        let needle = filter.search.as_deref().map(str::to_lowercase);
        let mut matches: Vec<Contact> = tables
            .contacts
            .values()
            .filter(|c| scope.allows(c.owner_id))
            .filter(|c| {
                filter
                    .status
                    .as_deref()
                    .is_none_or(|status| c.status == status)
            })
            .filter(|c| {
                needle.as_deref().is_none_or(|needle| {
                    contains_ci(&c.first_name, needle)
                        || contains_ci(&c.last_name, needle)
                        || c.email.as_deref().is_some_and(|e| contains_ci(e, needle))
                        || c.company
                            .as_deref()
                            .is_some_and(|co| contains_ci(co, needle))
                })
            })
            .cloned()
            .collect();
        matches.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        page_of(matches, page)
    }

    /// Applies a patch to a contact.
    pub async fn update_contact(&self, id: Uuid, patch: ContactPatch) -> Result<Contact> {
        let mut tables = self.tables.write().await;
        let contact = tables
            .contacts
            .get_mut(&id)
            .ok_or_else(|| Error::not_found("Contact", id))?;
        contact.apply(patch);
        Ok(contact.clone())
    }

    /// Deletes a contact, returning the removed record.
    pub async fn delete_contact(&self, id: Uuid) -> Result<Contact> {
        let mut tables = self.tables.write().await;
        tables
            .contacts
            .remove(&id)
            .ok_or_else(|| Error::not_found("Contact", id))
    }

    // ========================================================================
    // Deals
    // ========================================================================

    /// Inserts a deal.
    pub async fn insert_deal(&self, deal: Deal) -> Result<Deal> {
        let mut tables = self.tables.write().await;
        tables.deals.insert(deal.id, deal.clone());
        Ok(deal)
    }

    /// Looks up a deal by ID.
    pub async fn find_deal(&self, id: Uuid) -> Option<Deal> {
        self.tables.read().await.deals.get(&id).cloned()
    }

    /// Deals visible in `scope`, filtered and paginated, newest first.
    pub async fn list_deals(
        &self,
        scope: OwnerScope,
        filter: &DealFilter,
        page: Page,
    ) -> Paged<Deal> {
        let tables = self.tables.read().await;
        let mut matches: Vec<Deal> = tables
            .deals
            .values()
            .filter(|d| scope.allows(d.owner_id))
            .filter(|d| filter.stage.as_deref().is_none_or(|stage| d.stage == stage))
            .filter(|d| {
                filter
                    .priority
                    .as_deref()
                    .is_none_or(|priority| d.priority == priority)
            })
            .cloned()
            .collect();
        matches.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        page_of(matches, page)
    }

    /// Deals attached to a contact, newest first.
    pub async fn deals_for_contact(&self, contact_id: Uuid) -> Vec<Deal> {
        let tables = self.tables.read().await;
        let mut matches: Vec<Deal> = tables
            .deals
            .values()
            .filter(|d| d.contact_id == Some(contact_id))
            .cloned()
            .collect();
        matches.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        matches
    }

    /// Applies a patch to a deal.
    pub async fn update_deal(&self, id: Uuid, patch: DealPatch) -> Result<Deal> {
        let mut tables = self.tables.write().await;
        let deal = tables
            .deals
            .get_mut(&id)
            .ok_or_else(|| Error::not_found("Deal", id))?;
        deal.apply(patch);
        Ok(deal.clone())
    }

    /// Deletes a deal, returning the removed record.
    pub async fn delete_deal(&self, id: Uuid) -> Result<Deal> {
        let mut tables = self.tables.write().await;
        tables
            .deals
            .remove(&id)
            .ok_or_else(|| Error::not_found("Deal", id))
    }

    // ========================================================================
    // Tasks
    // ========================================================================

    /// Inserts a task.
    pub async fn insert_task(&self, task: Task) -> Result<Task> {
        let mut tables = self.tables.write().await;
        tables.tasks.insert(task.id, task.clone());
        Ok(task)
    }

    /// Looks up a task by ID.
    pub async fn find_task(&self, id: Uuid) -> Option<Task> {
        self.tables.read().await.tasks.get(&id).cloned()
    }

    /// Tasks visible in `scope` (scoped by assignee), filtered and
    /// paginated, soonest due date first; undated tasks sort last.
    pub async fn list_tasks(
        &self,
        scope: OwnerScope,
        filter: &TaskFilter,
        page: Page,
    ) -> Paged<Task> {
        let tables = self.tables.read().await;
        let mut matches: Vec<Task> = tables
            .tasks
            .values()
            .filter(|t| scope.allows(t.assigned_to))
            .filter(|t| {
                filter
                    .status
                    .as_deref()
                    .is_none_or(|status| t.status == status)
            })
            .filter(|t| {
                filter
                    .priority
                    .as_deref()
                    .is_none_or(|priority| t.priority == priority)
            })
            .cloned()
            .collect();
        matches.sort_by(|a, b| match (a.due_date, b.due_date) {
            (Some(a_due), Some(b_due)) => a_due.cmp(&b_due),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => a.created_at.cmp(&b.created_at),
        });
        page_of(matches, page)
    }

    /// Applies a patch to a task.
    pub async fn update_task(&self, id: Uuid, patch: TaskPatch) -> Result<Task> {
        let mut tables = self.tables.write().await;
        let task = tables
            .tasks
            .get_mut(&id)
            .ok_or_else(|| Error::not_found("Task", id))?;
        task.apply(patch);
        Ok(task.clone())
    }

    /// Deletes a task, returning the removed record.
    pub async fn delete_task(&self, id: Uuid) -> Result<Task> {
        let mut tables = self.tables.write().await;
        tables
            .tasks
            .remove(&id)
            .ok_or_else(|| Error::not_found("Task", id))
    }

    // ========================================================================
    // Activities
    // ========================================================================

    /// Appends an activity to the feed.
    pub async fn record_activity(&self, activity: Activity) -> Activity {
        let mut tables = self.tables.write().await;
        tables.activities.push(activity.clone());
        activity
    }

    /// Activities, filtered and paginated, newest first.
    pub async fn list_activities(&self, filter: &ActivityFilter, page: Page) -> Paged<Activity> {
        let tables = self.tables.read().await;
        let mut matches: Vec<Activity> = tables
            .activities
            .iter()
            .filter(|a| filter.kind.as_deref().is_none_or(|kind| a.r#type == kind))
            .filter(|a| filter.user_id.is_none_or(|user| a.user_id == user))
            .cloned()
            .collect();
        matches.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        page_of(matches, page)
    }

    // ========================================================================
    // Workflows
    // ========================================================================

    /// Inserts a workflow.
    pub async fn insert_workflow(&self, workflow: Workflow) -> Result<Workflow> {
        let mut tables = self.tables.write().await;
        tables.workflows.insert(workflow.id, workflow.clone());
        Ok(workflow)
    }

    /// Looks up a workflow by ID.
    pub async fn find_workflow(&self, id: Uuid) -> Option<Workflow> {
        self.tables.read().await.workflows.get(&id).cloned()
    }

    /// All workflows, newest first.
    pub async fn list_workflows(&self) -> Vec<Workflow> {
        let tables = self.tables.read().await;
        let mut workflows: Vec<Workflow> = tables.workflows.values().cloned().collect();
        workflows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        workflows
    }

    /// Switches a workflow on or off.
    pub async fn set_workflow_active(&self, id: Uuid, active: bool) -> Result<Workflow> {
        let mut tables = self.tables.write().await;
        let workflow = tables
            .workflows
            .get_mut(&id)
            .ok_or_else(|| Error::not_found("Workflow", id))?;
        workflow.is_active = active;
        workflow.updated_at = Utc::now();
        Ok(workflow.clone())
    }

    // ========================================================================
    // Email templates and logs
    // ========================================================================

    /// Inserts an email template.
    pub async fn insert_email_template(&self, template: EmailTemplate) -> Result<EmailTemplate> {
        let mut tables = self.tables.write().await;
        tables.email_templates.insert(template.id, template.clone());
        Ok(template)
    }

    /// Active email templates, name order.
    pub async fn list_active_email_templates(&self) -> Vec<EmailTemplate> {
        let tables = self.tables.read().await;
        let mut templates: Vec<EmailTemplate> = tables
            .email_templates
            .values()
            .filter(|t| t.is_active)
            .cloned()
            .collect();
        templates.sort_by(|a, b| a.name.cmp(&b.name));
        templates
    }

    /// Appends an outbound email record.
    pub async fn record_email(&self, log: EmailLog) -> EmailLog {
        let mut tables = self.tables.write().await;
        tables.email_logs.push(log.clone());
        log
    }

    /// The most recent `limit` email log entries, newest first.
    pub async fn list_email_logs(&self, limit: usize) -> Vec<EmailLog> {
        let tables = self.tables.read().await;
        let mut logs: Vec<EmailLog> = tables.email_logs.clone();
        logs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        logs.truncate(limit);
        logs
    }

    // ========================================================================
    // Audit trail
    // ========================================================================

    /// Appends an audit entry.
    pub async fn record_audit(&self, entry: AuditLog) -> AuditLog {
        let mut tables = self.tables.write().await;
        tables.audit_logs.push(entry.clone());
        entry
    }

    /// Audit entries, filtered and paginated, newest first.
    pub async fn list_audit_logs(&self, filter: &AuditFilter, page: Page) -> Paged<AuditLog> {
        let tables = self.tables.read().await;
        let mut matches: Vec<AuditLog> = tables
            .audit_logs
            .iter()
            .filter(|entry| filter.user_id.is_none_or(|user| entry.user_id == Some(user)))
            .filter(|entry| {
                filter
                    .action
                    .as_deref()
                    .is_none_or(|action| entry.action == action)
            })
            .filter(|entry| {
                filter
                    .resource_type
                    .as_deref()
                    .is_none_or(|rt| entry.resource_type == rt)
            })
            .cloned()
            .collect();
        matches.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        page_of(matches, page)
    }

    /// Looks up one audit entry.
    pub async fn find_audit_log(&self, id: Uuid) -> Option<AuditLog> {
        self.tables
            .read()
            .await
            .audit_logs
            .iter()
            .find(|entry| entry.id == id)
            .cloned()
    }
}
