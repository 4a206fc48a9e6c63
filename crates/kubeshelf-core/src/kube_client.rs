use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use k8s_openapi::api::core::v1::Namespace;
use kube::api::ListParams;
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Api, Client, Config};

use crate::namespace_cache::NamespaceCache;

/// Client bound to one context of one kubeconfig file.
#[derive(Clone)]
pub struct KubeClient {
    client: Client,
}

impl KubeClient {
    pub async fn from_config(path: &Path, context: &str) -> Result<Self> {
        let kubeconfig = Kubeconfig::read_from(path)?;
        let opts = KubeConfigOptions { context: Some(context.to_string()), ..Default::default() };
        let config = Config::from_custom_kubeconfig(kubeconfig, &opts).await?;
        Ok(Self { client: Client::try_from(config)? })
    }

    pub async fn list_namespaces(&self) -> Result<Vec<String>> {
        let api: Api<Namespace> = Api::all(self.client.clone());
        let list = api.list(&ListParams::default()).await?;
        Ok(list.items.iter().filter_map(|ns| ns.metadata.name.clone()).collect())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamespaceSource {
    Live,
    Cache,
}

#[derive(Debug, Clone)]
pub struct NamespaceListing {
    pub names: Vec<String>,
    pub source: NamespaceSource,
}

/// Lists namespaces from the cluster, falling back to the cache when the
/// cluster is unreachable, denies the list, or does not answer in time.
pub async fn namespaces_for(cache: &NamespaceCache, file: &Path, context: &str, timeout: Duration) -> NamespaceListing {
    let live = tokio::time::timeout(timeout, async {
        let client = KubeClient::from_config(file, context).await?;
        Ok::<_, anyhow::Error>(client.list_namespaces().await?)
    })
    .await;

    match live {
        Ok(Ok(names)) => return NamespaceListing { names, source: NamespaceSource::Live },
        Ok(Err(e)) => tracing::warn!("Listing namespaces for {context} failed, using cache: {e}"),
        Err(_) => tracing::warn!("Listing namespaces for {context} timed out, using cache"),
    }

    let names = cache.list(context).unwrap_or_else(|e| {
        tracing::warn!("Could not read namespace cache for {context}: {e}");
        Vec::new()
    });
    NamespaceListing { names, source: NamespaceSource::Cache }
}
