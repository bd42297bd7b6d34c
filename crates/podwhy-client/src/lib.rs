//! Podwhy Client - Fetching the cluster snapshot
//!
//! This crate provides:
//! - The `ClusterDataProvider` contract the explainer's input comes from
//! - A Kubernetes API client, configured from a kubeconfig
//! - Offline (file) and in-memory providers
//! - Snapshot capture bounded by a deadline

// Allow unused assignments for diagnostic fields - they're used by the thiserror/miette macros
#![allow(unused_assignments)]

pub mod api_client;
pub mod error;
pub mod file;
pub mod kubeconfig;
pub mod mock;
pub mod snapshot;
pub mod traits;

// Re-export primary types
pub use api_client::ApiClient;
pub use error::{ClientError, Result};
pub use file::FileProvider;
pub use kubeconfig::{kubeconfig_paths, load_client_config};
pub use mock::InMemoryProvider;
pub use snapshot::capture_snapshot;
pub use traits::ClusterDataProvider;
