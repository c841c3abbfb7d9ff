/// Raised by an [`EndpointProvider`](crate::EndpointProvider) that cannot
/// describe its services.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct EndpointError {
    message: String,
}

impl EndpointError {
    pub fn new(message: impl Into<String>) -> Self {
        EndpointError { message: message.into() }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    #[error("endpoint provider failed: {0}")]
    Provider(#[from] EndpointError),

    #[error("unable to serialize response body: {0}")]
    Serialization(#[source] serde_json::Error),

    #[error("handler for {0} returned without writing a response")]
    MissingResponse(String),

    #[error("request worker is unavailable")]
    WorkerUnavailable,
}

#[derive(Debug, thiserror::Error)]
pub enum ServeError {
    #[error("failed to bind to {binding}: {source}")]
    Bind {
        binding: String,
        #[source]
        source: std::io::Error,
    },
}
