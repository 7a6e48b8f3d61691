//! Current kubeconfig cluster and context names

use kube::config::Kubeconfig;

const UNKNOWN: &str = "unknown";

/// Names used to pick config layers and benchmark directories
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KubeContext {
    pub cluster: String,
    pub context: String,
}

impl KubeContext {
    /// Read the current context from KUBECONFIG or ~/.kube/config
    pub fn current() -> Self {
        match Kubeconfig::read() {
            Ok(kubeconfig) => Self::from_kubeconfig(&kubeconfig),
            Err(e) => {
                tracing::debug!("No kubeconfig available: {}", e);
                Self::unknown()
            }
        }
    }

    pub fn from_kubeconfig(kubeconfig: &Kubeconfig) -> Self {
        let Some(context) = kubeconfig.current_context.clone() else {
            return Self::unknown();
        };
        let cluster = kubeconfig
            .contexts
            .iter()
            .find(|c| c.name == context)
            .and_then(|c| c.context.as_ref())
            .map(|c| c.cluster.clone())
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| UNKNOWN.to_string());

        Self { cluster, context }
    }

    fn unknown() -> Self {
        Self {
            cluster: UNKNOWN.to_string(),
            context: UNKNOWN.to_string(),
        }
    }
}
