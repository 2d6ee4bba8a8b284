use serde::Serialize;
use serde_json::{Map, Value};

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SettingType {
    Text,
    Number,
    Boolean,
    Password,
}

#[derive(Serialize, Debug, Clone)]
pub struct SettingItem {
    pub key: &'static str,
    pub label: &'static str,
    #[serde(rename = "type")]
    pub kind: SettingType,
    pub default: &'static str,
    pub description: &'static str,
    /// Required items are never blanked out by a save
    pub required: bool,
}

#[derive(Serialize, Debug, Clone)]
pub struct SettingGroup {
    #[serde(skip)]
    pub key: &'static str,
    pub title: &'static str,
    pub icon: &'static str,
    pub order: u32,
    pub items: &'static [SettingItem],
}

const fn item(
    key: &'static str,
    label: &'static str,
    kind: SettingType,
    default: &'static str,
    description: &'static str,
    required: bool,
) -> SettingItem {
    SettingItem {
        key,
        label,
        kind,
        default,
        description,
        required,
    }
}

pub const SETTINGS_SCHEMA: &[SettingGroup] = &[
    SettingGroup {
        key: "server",
        title: "Server Configuration",
        icon: "cloud-server",
        order: 1,
        items: &[
            item("PORT", "Port", SettingType::Number, "6969", "HTTP listen port", true),
            item(
                "RUST_LOG",
                "Log Filter",
                SettingType::Text,
                "info",
                "tracing filter directive, e.g. info or quant_back_end=debug",
                false,
            ),
        ],
    },
    SettingGroup {
        key: "auth",
        title: "Security & Authentication",
        icon: "lock",
        order: 2,
        items: &[
            item(
                "SECRET_KEY",
                "Secret Key",
                SettingType::Password,
                crate::auth::config::DEFAULT_SECRET_KEY,
                "JWT signing secret. Change it in production",
                true,
            ),
            item("ADMIN_USER", "Admin Username", SettingType::Text, "admin", "Administrator login name", true),
            item(
                "ADMIN_PASSWORD",
                "Admin Password",
                SettingType::Password,
                "admin123",
                "Administrator password. Change it in production",
                true,
            ),
            item(
                "SINGLE_USER_MODE",
                "Single User Mode",
                SettingType::Boolean,
                "false",
                "Authenticate only the configured administrator, without a database",
                false,
            ),
            item(
                "IS_DEMO_MODE",
                "Demo Mode",
                SettingType::Boolean,
                "false",
                "Mark every session as a demo session",
                false,
            ),
            item(
                "TOKEN_TTL_HOURS",
                "Token Lifetime (hours)",
                SettingType::Number,
                "24",
                "How long an issued login token stays valid",
                false,
            ),
        ],
    },
    SettingGroup {
        key: "database",
        title: "Database",
        icon: "database",
        order: 3,
        items: &[item(
            "DATABASE_URL",
            "Database URL",
            SettingType::Password,
            "",
            "Postgres connection string. Required in multi-user mode",
            false,
        )],
    },
    SettingGroup {
        key: "data_source",
        title: "Data Source",
        icon: "api",
        order: 4,
        items: &[
            item(
                "TIINGO_API_KEY",
                "Tiingo API Key",
                SettingType::Password,
                "",
                "API token for Tiingo forex prices",
                false,
            ),
            item(
                "TIINGO_BASE_URL",
                "Tiingo Base URL",
                SettingType::Text,
                "https://api.tiingo.com/tiingo",
                "Root of the Tiingo REST API",
                false,
            ),
            item(
                "TIINGO_TIMEOUT",
                "Tiingo Timeout (s)",
                SettingType::Number,
                "10",
                "Request timeout in seconds",
                false,
            ),
        ],
    },
    SettingGroup {
        key: "forex",
        title: "Forex Candles",
        icon: "line-chart",
        order: 5,
        items: &[
            item(
                "FOREX_MAX_HISTORY_DAYS",
                "Max History (days)",
                SettingType::Number,
                "1095",
                "Longest history window requested from the provider",
                false,
            ),
            item(
                "FOREX_MAX_WEEKLY_PERIODS",
                "Max Weekly Candles",
                SettingType::Number,
                "100",
                "Most weekly candles returned per request",
                false,
            ),
            item(
                "FOREX_MAX_MONTHLY_PERIODS",
                "Max Monthly Candles",
                SettingType::Number,
                "36",
                "Most monthly candles returned per request",
                false,
            ),
        ],
    },
];

pub fn find_group(key: &str) -> Option<&'static SettingGroup> {
    SETTINGS_SCHEMA.iter().find(|g| g.key == key)
}

/// Schema keyed by group name, in display order.
pub fn schema_json() -> Value {
    let mut groups = Map::new();
    for group in SETTINGS_SCHEMA {
        groups.insert(
            group.key.to_string(),
            serde_json::to_value(group).unwrap_or(Value::Null),
        );
    }
    Value::Object(groups)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_keys_are_unique() {
        let mut seen = HashSet::new();
        for group in SETTINGS_SCHEMA {
            for item in group.items {
                assert!(seen.insert(item.key), "duplicate key {}", item.key);
            }
        }
    }

    #[test]
    fn test_schema_json_shape() {
        let json = schema_json();
        let groups: Vec<&String> = json.as_object().unwrap().keys().collect();
        assert_eq!(groups, ["server", "auth", "database", "data_source", "forex"]);

        let secret = &json["auth"]["items"][0];
        assert_eq!(secret["key"], "SECRET_KEY");
        assert_eq!(secret["type"], "password");
        assert_eq!(secret["required"], true);
        assert!(json["auth"].get("key").is_none());
    }

    #[test]
    fn test_find_group() {
        assert_eq!(find_group("forex").unwrap().items.len(), 3);
        assert!(find_group("ai").is_none());
    }
}
