//! Seed data: the permission catalog, the system roles, and the default
//! admin account.
//!
//! Seeding is idempotent — every record is find-or-create — so it can run
//! on every startup.

use rapport_core::types::{NewUser, PermissionEntry, Role, User};
use rapport_core::Result;

use crate::store::Store;

/// Email of the seeded admin account.
pub const DEFAULT_ADMIN_EMAIL: &str = "admin@crm.com";
/// Initial password of the seeded admin account.
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

/// The full permission catalog: (resource, action, description).
pub const PERMISSION_CATALOG: &[(&str, &str, &str)] = &[
    // Contact permissions
    ("contacts", "create", "Create contacts"),
    ("contacts", "read", "View contacts"),
    ("contacts", "update", "Update contacts"),
    ("contacts", "delete", "Delete contacts"),
    // Deal permissions
    ("deals", "create", "Create deals"),
    ("deals", "read", "View deals"),
    ("deals", "update", "Update deals"),
    ("deals", "delete", "Delete deals"),
    // Task permissions
    ("tasks", "create", "Create tasks"),
    ("tasks", "read", "View tasks"),
    ("tasks", "update", "Update tasks"),
    ("tasks", "delete", "Delete tasks"),
    // Activity permissions
    ("activities", "create", "Create activities"),
    ("activities", "read", "View activities"),
    // User permissions
    ("users", "create", "Create users"),
    ("users", "read", "View users"),
    ("users", "update", "Update users"),
    ("users", "delete", "Delete users"),
    // Role permissions
    ("roles", "create", "Create roles"),
    ("roles", "read", "View roles"),
    ("roles", "update", "Update roles"),
    ("roles", "delete", "Delete roles"),
    // Team permissions
    ("teams", "create", "Create teams"),
    ("teams", "read", "View teams"),
    ("teams", "update", "Update teams"),
    ("teams", "delete", "Delete teams"),
    // Workflow permissions
    ("workflows", "create", "Create workflows"),
    ("workflows", "read", "View workflows"),
    ("workflows", "update", "Update workflows"),
    ("workflows", "delete", "Delete workflows"),
    // Email permissions
    ("emails", "create", "Create email templates"),
    ("emails", "read", "View emails"),
    ("emails", "send", "Send emails"),
    // Report permissions
    ("reports", "read", "View reports"),
];

/// Which permissions a seeded role receives.
enum Grant {
    /// Every permission in the catalog.
    All,
    /// The listed tokens.
    Tokens(&'static [&'static str]),
}

struct RoleSpec {
    name: &'static str,
    description: &'static str,
    grant: Grant,
}

const SYSTEM_ROLES: &[RoleSpec] = &[
    RoleSpec {
        name: "Admin",
        description: "Full system access with all permissions",
        grant: Grant::All,
    },
    RoleSpec {
        name: "Sales Manager",
        description: "Manage sales team, deals, and contacts",
        grant: Grant::Tokens(&[
            "contacts:create",
            "contacts:read",
            "contacts:update",
            "contacts:delete",
            "deals:create",
            "deals:read",
            "deals:update",
            "deals:delete",
            "tasks:create",
            "tasks:read",
            "tasks:update",
            "tasks:delete",
            "activities:create",
            "activities:read",
            "teams:read",
            "reports:read",
        ]),
    },
    RoleSpec {
        name: "Salesperson",
        description: "Manage own deals and contacts",
        grant: Grant::Tokens(&[
            "contacts:create",
            "contacts:read",
            "contacts:update",
            "deals:create",
            "deals:read",
            "deals:update",
            "tasks:create",
            "tasks:read",
            "tasks:update",
            "activities:create",
            "activities:read",
        ]),
    },
    RoleSpec {
        name: "Marketing",
        description: "Manage marketing campaigns and contacts",
        grant: Grant::Tokens(&[
            "contacts:create",
            "contacts:read",
            "contacts:update",
            "emails:create",
            "emails:read",
            "emails:send",
            "activities:create",
            "activities:read",
            "reports:read",
        ]),
    },
    RoleSpec {
        name: "Support",
        description: "View contacts and create tasks",
        grant: Grant::Tokens(&[
            "contacts:read",
            "tasks:create",
            "tasks:read",
            "tasks:update",
            "activities:create",
            "activities:read",
        ]),
    },
];

/// Seeds the permission catalog, the system roles, and the default admin
/// user. Safe to run repeatedly.
pub async fn seed(store: &Store, bcrypt_cost: u32) -> Result<()> {
    log::info!("Seeding permission catalog and system roles");

    // Permissions: find-or-create by token.
    for (resource, action, description) in PERMISSION_CATALOG {
        let token = format!("{resource}:{action}");
        if store.find_permission_by_name(&token).await.is_none() {
            store
                .insert_permission(PermissionEntry::new(resource, action, description))
                .await?;
        }
    }

    // Roles: find-or-create by name, then (re)grant their permissions.
    for spec in SYSTEM_ROLES {
        let role = match store.find_role_by_name(spec.name).await {
            Some(role) => role,
            None => {
                let mut role = Role::from_new(rapport_core::types::NewRole {
                    name: spec.name.to_string(),
                    description: Some(spec.description.to_string()),
                });
                role.is_system = true;
                store.insert_role(role).await?
            }
        };

        let grant_ids = match &spec.grant {
            Grant::All => store
                .list_permissions()
                .await
                .into_iter()
                .map(|entry| entry.id)
                .collect(),
            Grant::Tokens(tokens) => {
                let mut ids = Vec::with_capacity(tokens.len());
                for token in *tokens {
                    if let Some(entry) = store.find_permission_by_name(token).await {
                        ids.push(entry.id);
                    } else {
                        log::warn!("Seed role '{}' names unknown permission '{token}'", spec.name);
                    }
                }
                ids
            }
        };
        store.set_role_permissions(role.id, grant_ids).await?;
    }

    // Default admin: find-or-create by email.
    if store.find_user_by_email(DEFAULT_ADMIN_EMAIL).await.is_none() {
        let hash = rapport_auth::password::hash_password(DEFAULT_ADMIN_PASSWORD, bcrypt_cost)
            .map_err(|e| rapport_core::Error::config(format!("seed admin hash: {e}")))?;
        let admin = store
            .insert_user(User::from_new(
                NewUser {
                    email: DEFAULT_ADMIN_EMAIL.to_string(),
                    password: String::new(),
                    first_name: "Admin".to_string(),
                    last_name: "User".to_string(),
                    phone: None,
                    manager_id: None,
                },
                hash,
            ))
            .await?;
        if let Some(admin_role) = store.find_role_by_name("Admin").await {
            store.set_user_roles(admin.id, vec![admin_role.id]).await?;
        }
        log::info!("Created admin user: {DEFAULT_ADMIN_EMAIL}");
    }

    Ok(())
}
