//! Static translation table shared with every module.

use serde_json::{json, Value};
use std::collections::HashMap;

/// The only locale shipped, and the fallback for every lookup.
pub const FALLBACK_LOCALE: &str = "en";

/// Dotted-key lookup over a flattened message tree.
#[derive(Debug, Clone)]
pub struct Translator {
    locale: String,
    messages: HashMap<String, HashMap<String, String>>,
}

impl Translator {
    /// Builds a translator from `{locale: {nested: {keys: "text"}}}`.
    pub fn from_json(locale: impl Into<String>, tree: &Value) -> Self {
        let messages = tree
            .as_object()
            .map(|locales| {
                locales
                    .iter()
                    .map(|(locale, subtree)| {
                        let mut table = HashMap::new();
                        flatten("", subtree, &mut table);
                        (locale.clone(), table)
                    })
                    .collect()
            })
            .unwrap_or_default();
        Self {
            locale: locale.into(),
            messages,
        }
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Looks `key` up in the active locale, then the fallback locale.
    /// Unknown keys come back unchanged.
    pub fn t(&self, key: &str) -> String {
        [self.locale.as_str(), FALLBACK_LOCALE]
            .iter()
            .find_map(|locale| self.messages.get(*locale)?.get(key))
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }
}

impl Default for Translator {
    fn default() -> Self {
        Self::from_json(FALLBACK_LOCALE, &default_messages())
    }
}

fn flatten(prefix: &str, value: &Value, out: &mut HashMap<String, String>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                flatten(&path, child, out);
            }
        }
        Value::String(text) => {
            out.insert(prefix.to_string(), text.clone());
        }
        other => {
            out.insert(prefix.to_string(), other.to_string());
        }
    }
}

fn default_messages() -> Value {
    json!({
        "en": {
            "nav": {
                "home": "Home",
                "users": "Users",
                "editUser": "Edit User"
            },
            "users": {
                "title": "User Management",
                "table": {
                    "name": "Name",
                    "email": "Email",
                    "role": "Role",
                    "actions": "Actions"
                },
                "actions": {
                    "edit": "Edit",
                    "delete": "Delete",
                    "create": "Create User"
                },
                "roles": {
                    "admin": "Administrator",
                    "user": "User"
                }
            },
            "editUser": {
                "title": "Edit User",
                "createTitle": "Create User",
                "form": {
                    "name": "Name",
                    "email": "Email",
                    "role": "Role",
                    "submit": "Save Changes",
                    "create": "Create User",
                    "cancel": "Cancel"
                },
                "validation": {
                    "nameRequired": "Name is required",
                    "emailRequired": "Email is required",
                    "emailInvalid": "Please enter a valid email address",
                    "roleRequired": "Role is required"
                }
            },
            "common": {
                "loading": "Loading...",
                "error": "An error occurred",
                "success": "Operation completed successfully",
                "confirm": "Are you sure?",
                "yes": "Yes",
                "no": "No",
                "back": "Back"
            },
            "messages": {
                "userUpdated": "User updated successfully",
                "userCreated": "User created successfully",
                "userDeleted": "User deleted successfully",
                "confirmDelete": "Are you sure you want to delete this user?",
                "noUsers": "No users found",
                "loadingUsers": "Loading users..."
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_keys() {
        let i18n = Translator::default();
        assert_eq!(i18n.locale(), "en");
        assert_eq!(i18n.t("messages.userUpdated"), "User updated successfully");
        assert_eq!(i18n.t("users.table.email"), "Email");
        assert_eq!(
            i18n.t("editUser.validation.emailInvalid"),
            "Please enter a valid email address"
        );
    }

    #[test]
    fn test_missing_key_returns_key() {
        let i18n = Translator::default();
        assert_eq!(i18n.t("messages.nope"), "messages.nope");
        assert_eq!(i18n.t("messages"), "messages");
    }

    #[test]
    fn test_falls_back_to_english() {
        let tree = json!({
            "en": {"nav": {"home": "Home", "users": "Users"}},
            "de": {"nav": {"home": "Start"}}
        });
        let i18n = Translator::from_json("de", &tree);
        assert_eq!(i18n.t("nav.home"), "Start");
        assert_eq!(i18n.t("nav.users"), "Users");
    }
}
