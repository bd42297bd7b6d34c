use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Error type for fetching cluster data
#[derive(Error, Debug, Diagnostic)]
pub enum ClientError {
    /// Subject pod not found
    #[error("Pod not found: {namespace}/{name}")]
    #[diagnostic(
        code(podwhy::client::pod_not_found),
        help("Check the pod name and pass the namespace it lives in with -n/--namespace")
    )]
    PodNotFound {
        #[allow(unused)]
        namespace: String,
        #[allow(unused)]
        name: String,
    },

    /// The API server refused the credentials
    #[error("Authentication failed ({status}) while fetching {resource}")]
    #[diagnostic(
        code(podwhy::client::authentication_failed),
        help("Verify the kubeconfig user and that it may get pods and list nodes")
    )]
    AuthenticationFailed {
        #[allow(unused)]
        resource: String,
        #[allow(unused)]
        status: u16,
    },

    /// Request could not be sent or the response could not be read
    #[error("Fetching {resource} failed: {message}")]
    #[diagnostic(
        code(podwhy::client::request_failed),
        help("Check that the API server is reachable. Use --insecure-skip-tls-verify only for clusters with self-signed certificates you trust")
    )]
    RequestFailed {
        #[allow(unused)]
        resource: String,
        #[allow(unused)]
        message: String,
    },

    /// Non-success HTTP status
    #[error("Fetching {resource} returned status {status}: {message}")]
    #[diagnostic(code(podwhy::client::api_error), help("The API server rejected the request"))]
    ApiError {
        #[allow(unused)]
        resource: String,
        #[allow(unused)]
        status: u16,
        #[allow(unused)]
        message: String,
    },

    /// Kubeconfig could not be read or used
    #[error("Invalid kubeconfig {path}: {message}")]
    #[diagnostic(
        code(podwhy::client::kubeconfig_error),
        help("Point --kubeconfig (or KUBECONFIG) at a valid file, or pick a context with --context")
    )]
    KubeconfigError {
        #[allow(unused)]
        path: PathBuf,
        #[allow(unused)]
        message: String,
    },

    /// Invalid configuration
    #[error("Invalid configuration: {message}")]
    #[diagnostic(code(podwhy::client::invalid_config), help("{suggestion}"))]
    InvalidConfig {
        #[allow(unused)]
        message: String,
        #[allow(unused)]
        suggestion: String,
    },

    /// Snapshot file could not be read
    #[error("Failed to read snapshot file {path}")]
    #[diagnostic(
        code(podwhy::client::snapshot_file),
        help("The file should hold pods and nodes, e.g. the output of `kubectl get pods,nodes -o yaml`")
    )]
    SnapshotFile {
        #[allow(unused)]
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Snapshot capture exceeded its deadline
    #[error("Timed out after {seconds}s while fetching the cluster snapshot")]
    #[diagnostic(
        code(podwhy::client::timeout),
        help("Increase --timeout or check connectivity to the API server")
    )]
    Timeout {
        #[allow(unused)]
        seconds: u64,
    },

    /// Core library error
    #[error(transparent)]
    #[diagnostic(transparent)]
    CoreError(#[from] podwhy_core::CoreError),
}

/// Result type for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

impl ClientError {
    pub fn pod_not_found(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self::PodNotFound {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    pub fn request_failed(resource: impl Into<String>, message: impl Into<String>) -> Self {
        Self::RequestFailed {
            resource: resource.into(),
            message: message.into(),
        }
    }

    pub fn kubeconfig_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::KubeconfigError {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn invalid_config(message: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
            suggestion: suggestion.into(),
        }
    }
}
