use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Rendering hint for the settings UI; the value itself is always a string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SettingType {
    String,
    Number,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Setting {
    pub id: i64,
    pub key: String,
    pub value: String,
    pub value_type: SettingType,
}
