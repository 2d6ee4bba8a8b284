use serde_json::Value;

use crate::settings::store::SaveOutcome;

pub enum SettingsProcessorInput {
    GetSchema,
    GetValues,
    /// Grouped `{ group: { KEY: value } }` payload
    Save(Value),
}

pub enum SettingsProcessorOutput {
    GetSchema(Value),
    GetValues(Value),
    Save(SaveOutcome),
}
