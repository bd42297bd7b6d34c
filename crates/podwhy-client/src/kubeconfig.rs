//! Kubeconfig resolution.
//!
//! Files are located here (flag, `KUBECONFIG` list, or `~/.kube/config`) and
//! handed to `kube` for parsing, so credential plugins (`exec`,
//! `auth-provider`), token files and client certificates behave as they do
//! for kubectl.

use crate::error::{ClientError, Result};
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::Config;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default kubeconfig location: ~/.kube/config
pub fn default_kubeconfig_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".kube")
        .join("config")
}

/// Kubeconfig files named by an explicit value (flag or `KUBECONFIG`).
///
/// The value may be a path list; entries that do not exist are dropped unless
/// none exist, so the error names the file the user asked for.
pub fn kubeconfig_paths(explicit: Option<&str>) -> Vec<PathBuf> {
    match explicit.filter(|s| !s.is_empty()) {
        Some(value) => {
            let candidates: Vec<PathBuf> = std::env::split_paths(value)
                .filter(|p| !p.as_os_str().is_empty())
                .collect();
            let existing: Vec<PathBuf> =
                candidates.iter().filter(|p| p.exists()).cloned().collect();
            if existing.is_empty() {
                candidates
            } else {
                existing
            }
        }
        None => vec![default_kubeconfig_path()],
    }
}

/// Read and merge kubeconfig files; the first file that sets a value wins
pub fn load_kubeconfig(paths: &[PathBuf]) -> Result<Kubeconfig> {
    let mut merged: Option<Kubeconfig> = None;

    for path in paths {
        debug!("Reading kubeconfig {}", path.display());
        let next = Kubeconfig::read_from(path)
            .map_err(|e| ClientError::kubeconfig_error(path, e.to_string()))?;
        merged = Some(match merged {
            None => next,
            Some(acc) => acc
                .merge(next)
                .map_err(|e| ClientError::kubeconfig_error(path, e.to_string()))?,
        });
    }

    merged.ok_or_else(|| ClientError::kubeconfig_error(PathBuf::new(), "no kubeconfig file given"))
}

/// Build the client configuration for a context (the current one when
/// `context` is `None`).
///
/// `insecure_skip_tls_verify` forces certificate verification off regardless
/// of what the kubeconfig says.
pub async fn client_config(
    kubeconfig: Kubeconfig,
    context: Option<&str>,
    insecure_skip_tls_verify: bool,
    source: &Path,
) -> Result<Config> {
    let options = KubeConfigOptions {
        context: context.map(str::to_string),
        ..Default::default()
    };

    let mut config = Config::from_custom_kubeconfig(kubeconfig, &options)
        .await
        .map_err(|e| ClientError::kubeconfig_error(source, e.to_string()))?;

    if insecure_skip_tls_verify {
        config.accept_invalid_certs = true;
    }

    debug!("Using API server {}", config.cluster_url);
    Ok(config)
}

/// Locate, read and resolve the kubeconfig into a client configuration
pub async fn load_client_config(
    explicit: Option<&str>,
    context: Option<&str>,
    insecure_skip_tls_verify: bool,
) -> Result<Config> {
    let paths = kubeconfig_paths(explicit);
    let kubeconfig = load_kubeconfig(&paths)?;
    let source = paths.first().cloned().unwrap_or_default();
    client_config(kubeconfig, context, insecure_skip_tls_verify, &source).await
}

#[cfg(test)]
mod tests {
    use super::*;

    const KUBECONFIG: &str = r#"
apiVersion: v1
kind: Config
current-context: dev
clusters:
  - name: dev-cluster
    cluster:
      server: https://10.0.0.1:6443
contexts:
  - name: dev
    context:
      cluster: dev-cluster
      user: dev-user
      namespace: shop
users:
  - name: dev-user
    user:
      token: abc123
"#;

    const EKS_KUBECONFIG: &str = r#"
apiVersion: v1
kind: Config
clusters:
  - name: lab-cluster
    cluster:
      server: https://lab.example:443
      insecure-skip-tls-verify: true
contexts:
  - name: lab
    context:
      cluster: lab-cluster
      user: eks-user
users:
  - name: eks-user
    user:
      exec:
        apiVersion: client.authentication.k8s.io/v1beta1
        command: aws
        args: [eks, get-token, --cluster-name, lab]
"#;

    fn write_config(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[tokio::test]
    async fn test_current_context() {
        let kubeconfig = Kubeconfig::from_yaml(KUBECONFIG).unwrap();
        let config = client_config(kubeconfig, None, false, Path::new("test"))
            .await
            .unwrap();

        assert_eq!(config.cluster_url.host(), Some("10.0.0.1"));
        assert_eq!(config.cluster_url.port_u16(), Some(6443));
        assert_eq!(config.default_namespace, "shop");
        assert!(config.auth_info.token.is_some());
        assert!(!config.accept_invalid_certs);
    }

    #[tokio::test]
    async fn test_exec_credentials_are_kept() {
        let kubeconfig = Kubeconfig::from_yaml(EKS_KUBECONFIG).unwrap();
        let config = client_config(kubeconfig, Some("lab"), false, Path::new("test"))
            .await
            .unwrap();

        // the plugin runs when the client authenticates, not at load time
        assert!(config.auth_info.exec.is_some());
        assert!(config.auth_info.token.is_none());
        assert!(config.accept_invalid_certs);
    }

    #[tokio::test]
    async fn test_insecure_override() {
        let kubeconfig = Kubeconfig::from_yaml(KUBECONFIG).unwrap();
        let config = client_config(kubeconfig, None, true, Path::new("test"))
            .await
            .unwrap();
        assert!(config.accept_invalid_certs);
    }

    #[tokio::test]
    async fn test_missing_context() {
        let kubeconfig = Kubeconfig::from_yaml(KUBECONFIG).unwrap();
        let err = client_config(kubeconfig, Some("nope"), false, Path::new("test"))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::KubeconfigError { .. }));
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), "config", KUBECONFIG);

        let config = load_client_config(path.to_str(), None, false).await.unwrap();
        assert_eq!(config.cluster_url.host(), Some("10.0.0.1"));
    }

    #[tokio::test]
    async fn test_path_list_is_merged() {
        let dir = tempfile::tempdir().unwrap();
        let dev = write_config(dir.path(), "dev", KUBECONFIG);
        let lab = write_config(dir.path(), "lab", EKS_KUBECONFIG);
        let missing = dir.path().join("missing");

        let list = std::env::join_paths([&missing, &dev, &lab]).unwrap();
        let list = list.to_str().unwrap();
        assert_eq!(kubeconfig_paths(Some(list)), vec![dev, lab]);

        let config = load_client_config(Some(list), Some("lab"), false)
            .await
            .unwrap();
        assert_eq!(config.cluster_url.host(), Some("lab.example"));

        // current-context comes from the first file
        let config = load_client_config(Some(list), None, false).await.unwrap();
        assert_eq!(config.cluster_url.host(), Some("10.0.0.1"));
    }

    #[tokio::test]
    async fn test_missing_file() {
        let err = load_client_config(Some("/nonexistent/kubeconfig"), None, false)
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::KubeconfigError { .. }));
    }

    #[test]
    fn test_paths() {
        assert_eq!(kubeconfig_paths(None), vec![default_kubeconfig_path()]);
        assert_eq!(kubeconfig_paths(Some("")), vec![default_kubeconfig_path()]);
        assert_eq!(
            kubeconfig_paths(Some("/tmp/definitely-missing-kubeconfig")),
            vec![PathBuf::from("/tmp/definitely-missing-kubeconfig")]
        );
    }
}
