//! Flat invocation parameters, from flags and/or a JSON params file.

use anyhow::{Context, Result};
use defaultskit::{DesiredState, Domain, Request, TypeTag};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use std::fs;
use std::path::Path;

/// The flat parameter set: `name`, `key`, `value`, `type`, `state`.
///
/// Every field is optional here; [`Params::into_request`] enforces the rules.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Params {
    #[serde(default, alias = "domain")]
    pub name: Option<String>,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default, deserialize_with = "scalar_as_string")]
    pub value: Option<String>,
    #[serde(default, rename = "type")]
    pub type_hint: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
}

impl Params {
    /// Load a params file, e.g. `{"name": "NSGlobalDomain", "key": "KeyRepeat", "value": 2}`
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Could not read {}", path.display()))?;
        Self::from_json(&content).with_context(|| format!("Invalid params file {}", path.display()))
    }

    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Overlay `overrides` on top of `self`; set fields in `overrides` win.
    pub fn merge(self, overrides: Params) -> Params {
        Params {
            name: overrides.name.or(self.name),
            key: overrides.key.or(self.key),
            value: overrides.value.or(self.value),
            type_hint: overrides.type_hint.or(self.type_hint),
            state: overrides.state.or(self.state),
        }
    }

    /// Validate into a [`Request`]. No command runs if this fails.
    pub fn into_request(self) -> defaultskit::Result<Request> {
        let domain = Domain::new(self.name.unwrap_or_default())?;
        let type_hint = self
            .type_hint
            .as_deref()
            .map(str::parse::<TypeTag>)
            .transpose()?;
        let state = self
            .state
            .as_deref()
            .map(str::parse::<DesiredState>)
            .transpose()?
            .unwrap_or_default();

        Ok(Request {
            domain,
            key: self.key,
            value: self.value,
            type_hint,
            state,
        })
    }
}

/// Accept `"2"`, `2` or `true` for values: they are always sent as text.
fn scalar_as_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) => Ok(Some(s)),
        Some(serde_json::Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(serde_json::Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(D::Error::custom(format!(
            "value must be a string, number or boolean, got {other}"
        ))),
    }
}
