//! Typed view of the legacy Terraform state document.
//!
//! Every field is optional on the wire. Missing keys (and explicit `null`s)
//! decode to zero values, unknown keys are ignored, and the free-form
//! `config`, `outputs` and `resources` payloads are kept as raw JSON values.
//! The document, its backend and each module must be JSON objects.

use std::fmt;
use std::marker::PhantomData;

use serde::de::value::MapAccessDeserializer;
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as JsonValue;

use crate::errors::StateError;

pub mod file;

pub type JsonMap = serde_json::Map<String, JsonValue>;

pub const ROOT_MODULE_NAME: &str = "root";

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TerraformState {
    #[serde(default, deserialize_with = "null_as_default")]
    pub version: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub serial: u64,
    #[serde(
        default,
        deserialize_with = "object_or_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub backend: Option<TerraformBackend>,
    #[serde(default, deserialize_with = "objects_or_null")]
    pub modules: Vec<TerraformStateModule>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TerraformBackend {
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub backend_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub config: JsonMap,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TerraformStateModule {
    #[serde(default, deserialize_with = "null_as_default")]
    pub path: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub outputs: JsonMap,
    #[serde(default, deserialize_with = "null_as_default")]
    pub resources: JsonMap,
}

/// Decode a state document.
///
/// Fails with [`StateError::Syntax`] when `bytes` is not JSON at all, and with
/// [`StateError::Decode`] when the document is not an object, when a known
/// field holds the wrong kind of value, or when a known field is repeated.
pub fn parse_terraform_state(bytes: &[u8]) -> Result<TerraformState, StateError> {
    let Object(state) = serde_json::from_slice::<Object<TerraformState>>(bytes)?;
    Ok(state)
}

impl TerraformState {
    /// Whether the state lives in a backend rather than on local disk.
    pub fn is_remote(&self) -> bool {
        self.backend.is_some()
    }

    pub fn module<S: AsRef<str>>(&self, path: &[S]) -> Option<&TerraformStateModule> {
        self.modules.iter().find(|module| module.has_path(path))
    }

    pub fn root_module(&self) -> Option<&TerraformStateModule> {
        self.module(&[ROOT_MODULE_NAME])
    }
}

impl TerraformStateModule {
    pub fn has_path<S: AsRef<str>>(&self, path: &[S]) -> bool {
        self.path.len() == path.len()
            && self.path.iter().zip(path.iter()).all(|(a, b)| a == b.as_ref())
    }

    pub fn is_root(&self) -> bool {
        self.has_path(&[ROOT_MODULE_NAME])
    }

    /// Dotted rendering of the module path, e.g. `root.network.vpc`.
    pub fn display_path(&self) -> String {
        self.path.join(".")
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Derived struct impls also accept a positional sequence; this wrapper only
/// accepts a map.
struct Object<T>(T);

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Object<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ObjectVisitor<T>(PhantomData<T>);

        impl<'de, T: Deserialize<'de>> Visitor<'de> for ObjectVisitor<T> {
            type Value = Object<T>;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a JSON object")
            }

            fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<Self::Value, A::Error> {
                T::deserialize(MapAccessDeserializer::new(map)).map(Object)
            }
        }

        deserializer.deserialize_map(ObjectVisitor(PhantomData))
    }
}

fn object_or_null<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Object<T>>::deserialize(deserializer)?.map(|Object(value)| value))
}

fn objects_or_null<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let objects = Option::<Vec<Object<T>>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(objects.into_iter().map(|Object(value)| value).collect())
}
