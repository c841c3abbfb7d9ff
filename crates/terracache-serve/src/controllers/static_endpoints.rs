use serde_json::Value as JsonValue;
use terracache_core::JsonMap;

use crate::errors::EndpointError;

use super::EndpointProvider;

/// Fixed set of service descriptors, typically read from configuration.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StaticEndpoints {
    endpoints: JsonMap,
}

impl StaticEndpoints {
    pub fn new(endpoints: JsonMap) -> Self {
        StaticEndpoints { endpoints }
    }

    pub fn with_endpoint(mut self, service: impl Into<String>, descriptor: impl Into<JsonValue>) -> Self {
        self.endpoints.insert(service.into(), descriptor.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }
}

impl EndpointProvider for StaticEndpoints {
    fn endpoints(&self) -> Result<JsonMap, EndpointError> {
        Ok(self.endpoints.clone())
    }
}

impl FromIterator<(String, JsonValue)> for StaticEndpoints {
    fn from_iter<I: IntoIterator<Item = (String, JsonValue)>>(iter: I) -> Self {
        StaticEndpoints { endpoints: iter.into_iter().collect() }
    }
}
