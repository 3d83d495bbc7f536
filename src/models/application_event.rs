use crate::error::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;

pub const REQUIRED_FIELDS: [&str; 9] = [
    "name", "email", "phone", "label", "location", "salary", "url", "profiles", "summary",
];

/// A "new resume" event published by the resume builder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationEvent {
    pub name: String,
    pub email: String,
    pub phone: String,
    /// Job title.
    pub label: String,
    pub location: Location,
    pub salary: Salary,
    /// Resume link.
    pub url: String,
    /// The resume builder marshals an empty profile list as `null`.
    #[serde(deserialize_with = "deserialize_null_as_empty")]
    pub profiles: Vec<Profile>,
    pub summary: String,
}

fn deserialize_null_as_empty<'de, D>(deserializer: D) -> std::result::Result<Vec<Profile>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Profile>>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Salary {
    Number(serde_json::Number),
    Text(String),
}

impl fmt::Display for Salary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Salary::Number(n) => write!(f, "{}", n),
            Salary::Text(s) => f.write_str(s),
        }
    }
}

/// The producer sends either a plain string or the resume's address object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Location {
    Text(String),
    Address {
        #[serde(default)]
        city: Option<String>,
        #[serde(default)]
        region: Option<String>,
        #[serde(default, rename = "countryCode")]
        country_code: Option<String>,
    },
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Text(s) => f.write_str(s),
            Location::Address {
                city,
                region,
                country_code,
            } => {
                let parts: Vec<&str> = [city, region, country_code]
                    .into_iter()
                    .filter_map(|p| p.as_deref())
                    .map(str::trim)
                    .filter(|p| !p.is_empty())
                    .collect();
                f.write_str(&parts.join(", "))
            }
        }
    }
}

impl ApplicationEvent {
    /// Decodes a raw message body. A body that is not JSON fails with
    /// [`Error::Json`]; a JSON body lacking a required key fails with
    /// [`Error::MissingField`] naming that key.
    pub fn from_slice(body: &[u8]) -> Result<Self> {
        let value: JsonValue = serde_json::from_slice(body)?;
        Self::from_value(value)
    }

    pub fn from_value(value: JsonValue) -> Result<Self> {
        let Some(object) = value.as_object() else {
            return Err(Error::Json(serde::de::Error::custom(
                "expected a JSON object",
            )));
        };

        if let Some(missing) = REQUIRED_FIELDS.iter().find(|f| !object.contains_key(**f)) {
            return Err(Error::MissingField(missing.to_string()));
        }

        if let Some(profiles) = object.get("profiles").and_then(|p| p.as_array()) {
            for (idx, profile) in profiles.iter().enumerate() {
                if profile.get("url").is_none() {
                    return Err(Error::MissingField(format!("profiles[{}].url", idx)));
                }
            }
        }

        Ok(serde_json::from_value(value)?)
    }

    /// Profile links in their original order, comma-space separated.
    pub fn profile_urls(&self) -> String {
        self.profiles
            .iter()
            .map(|p| p.url.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}
