use std::{collections::BTreeMap, future::Future};

use async_trait::async_trait;
use kube::{
    api::{DeleteParams, ListParams, PostParams, PropagationPolicy},
    Api, Client,
};

use crate::{
    config::{KubernetesConfig, RetryConfig},
    error::{Error, Result},
    logger,
};

use super::{
    apis::skatteetaten::v1::{ApplicationDeployment, ApplicationDeploymentList},
    resource::HasMetadata,
    token::TokenFetcher,
    uri::label_selector,
};

/// Client errors other than a server error come from the request itself and are not
/// retried. Everything without a response is.
fn is_retryable(err: &kube::Error) -> bool {
    match err {
        kube::Error::Api(response) => response.code >= 500,
        kube::Error::SerdeError(_) => false,
        _ => true,
    }
}

fn not_found_as_empty<T>(result: Result<T, kube::Error>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(kube::Error::Api(response)) if response.code == 404 => {
            logger!(debug, "Resource not found, {}", response.message);
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

#[derive(Clone)]
pub struct KubeClient {
    client: Client,
    server_url: String,
    retry: RetryConfig,
}

impl KubeClient {
    pub fn new(client: Client, server_url: impl Into<String>) -> Self {
        let url: String = server_url.into();
        let server_url = if let Some(url) = url.strip_suffix('/') {
            url.to_string()
        } else {
            url
        };
        Self {
            client,
            server_url,
            retry: RetryConfig::default(),
        }
    }

    /// Builds the underlying `kube::Client`, so it has to run inside a Tokio runtime.
    pub fn try_from_config(config: &KubernetesConfig, fetcher: &dyn TokenFetcher) -> Result<Self> {
        let client = Client::try_from(config.kube_config(fetcher)?)?;

        logger!(info, "Kubernetes client for {}", config.url);

        Ok(Self::new(client, &config.url).with_retry(config.retry.clone()))
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn as_server_url(&self) -> &str {
        &self.server_url
    }

    fn api(&self, namespace: Option<&str>) -> Api<ApplicationDeployment> {
        match namespace {
            Some(ns) => Api::namespaced(self.client.clone(), ns),
            None => Api::default_namespaced(self.client.clone()),
        }
    }

    /// Runs `request` until it succeeds, fails with an error that is not retryable, or
    /// `retry.times` retries are used up. The delay starts at `retry.min` and doubles up
    /// to `retry.max`.
    async fn retry_request<T, F, Fut>(&self, context: &str, mut request: F) -> Result<T, kube::Error>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, kube::Error>>,
    {
        let mut backoff = self.retry.min();
        let mut attempt = 0;

        loop {
            match request().await {
                Err(e) if attempt < self.retry.times && is_retryable(&e) => {
                    attempt += 1;

                    logger!(
                        debug,
                        "Retrying failed request times={} context={} error={}",
                        attempt,
                        context,
                        e
                    );

                    tokio::time::sleep(backoff).await;
                    backoff = (backoff * 2).min(self.retry.max());
                }
                ret => return ret,
            }
        }
    }
}

/// Operations on ApplicationDeployments. Resources are addressed by their own metadata,
/// falling back to the client's default namespace.
#[async_trait]
pub trait KubeClientRequest: Send + Sync {
    /// `None` when the server answers 404.
    async fn get(&self, resource: &ApplicationDeployment) -> Result<Option<ApplicationDeployment>>;

    /// Lists the collection `resource` belongs to, across all namespaces when it has none.
    /// `labels` defaults to the resource's own labels.
    async fn list(
        &self,
        resource: &ApplicationDeployment,
        labels: Option<&BTreeMap<String, String>>,
    ) -> Result<ApplicationDeploymentList>;

    async fn create(&self, resource: &ApplicationDeployment) -> Result<ApplicationDeployment>;

    async fn replace(&self, resource: &ApplicationDeployment) -> Result<ApplicationDeployment>;

    /// The deleted object while deletion is pending, otherwise `None`. A missing object
    /// is also `None`.
    async fn delete(
        &self,
        resource: &ApplicationDeployment,
        policy: PropagationPolicy,
    ) -> Result<Option<ApplicationDeployment>>;

    fn client(&self) -> &Client;
}

#[async_trait]
impl KubeClientRequest for KubeClient {
    async fn get(&self, resource: &ApplicationDeployment) -> Result<Option<ApplicationDeployment>> {
        let name = resource.name().ok_or(Error::MissingMetadata("name"))?;
        let api = self.api(resource.namespace());

        logger!(debug, "get {}", api.resource_url());

        not_found_as_empty(self.retry_request("get", || api.get(name)).await)
    }

    async fn list(
        &self,
        resource: &ApplicationDeployment,
        labels: Option<&BTreeMap<String, String>>,
    ) -> Result<ApplicationDeploymentList> {
        let api: Api<ApplicationDeployment> = match resource.namespace() {
            Some(ns) => Api::namespaced(self.client.clone(), ns),
            None => Api::all(self.client.clone()),
        };

        let mut params = ListParams::default();

        match labels.or_else(|| resource.metadata().and_then(|m| m.labels.as_ref())) {
            Some(labels) if !labels.is_empty() => {
                params = params.labels(&label_selector(labels));
            }
            _ => {}
        }

        logger!(debug, "list {} {:?}", api.resource_url(), params.label_selector);

        let list = self.retry_request("list", || api.list(&params)).await?;

        Ok(ApplicationDeploymentList {
            metadata: Some(list.metadata),
            items: list.items,
            ..Default::default()
        })
    }

    async fn create(&self, resource: &ApplicationDeployment) -> Result<ApplicationDeployment> {
        let api = self.api(resource.namespace());
        let params = PostParams::default();

        logger!(debug, "create {}", api.resource_url());

        let created = self
            .retry_request("create", || api.create(&params, resource))
            .await?;

        Ok(created)
    }

    async fn replace(&self, resource: &ApplicationDeployment) -> Result<ApplicationDeployment> {
        let name = resource.name().ok_or(Error::MissingMetadata("name"))?;
        let api = self.api(resource.namespace());
        let params = PostParams::default();

        logger!(debug, "replace {}", api.resource_url());

        let replaced = self
            .retry_request("replace", || api.replace(name, &params, resource))
            .await?;

        Ok(replaced)
    }

    async fn delete(
        &self,
        resource: &ApplicationDeployment,
        policy: PropagationPolicy,
    ) -> Result<Option<ApplicationDeployment>> {
        let name = resource.name().ok_or(Error::MissingMetadata("name"))?;
        let api = self.api(resource.namespace());

        logger!(debug, "delete {} propagationPolicy={:?}", api.resource_url(), policy);

        let params = DeleteParams {
            propagation_policy: Some(policy),
            ..DeleteParams::default()
        };

        let deleted = self
            .retry_request("delete", || api.delete(name, &params))
            .await;

        Ok(not_found_as_empty(deleted)?.and_then(|either| either.left()))
    }

    fn client(&self) -> &Client {
        &self.client
    }
}
