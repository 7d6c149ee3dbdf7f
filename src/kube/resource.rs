use std::collections::BTreeMap;

use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

use super::uri::{label_selector, pluralize, ResourceUri};

/// Identity and metadata of an API object, enough for generic tooling to address it
/// without knowing the shape of its spec.
pub trait HasMetadata {
    fn api_version(&self) -> &str;

    fn kind(&self) -> &str;

    fn metadata(&self) -> Option<&ObjectMeta>;

    fn set_metadata(&mut self, metadata: Option<ObjectMeta>);

    fn set_api_version(&mut self, api_version: String);

    fn name(&self) -> Option<&str> {
        self.metadata().and_then(|m| m.name.as_deref())
    }

    fn namespace(&self) -> Option<&str> {
        self.metadata().and_then(|m| m.namespace.as_deref())
    }

    /// Core objects live under `/api`, everything else under `/apis`.
    fn context_root(&self) -> &'static str {
        if self.api_version() == "v1" {
            "/api"
        } else {
            "/apis"
        }
    }

    fn kind_uri(&self) -> String {
        pluralize(&self.kind().to_lowercase())
    }

    fn uri_variables(&self) -> BTreeMap<String, Option<String>> {
        BTreeMap::from([
            ("namespace".to_string(), self.namespace().map(str::to_string)),
            ("name".to_string(), self.name().map(str::to_string)),
        ])
    }

    /// Path of this object. Without a name this is the path of its collection.
    fn uri(&self) -> ResourceUri {
        let prefix = format!("{}/{}", self.context_root(), self.api_version());
        let kinds = self.kind_uri();

        let mut template = match self.namespace() {
            Some(_) => format!("{}/namespaces/{{namespace}}/{}", prefix, kinds),
            None => format!("{}/{}", prefix, kinds),
        };

        if self.name().is_some() {
            template.push_str("/{name}");
        }

        ResourceUri::new(template, self.uri_variables())
    }

    /// Path of the collection this object belongs to. `labels` defaults to the object's
    /// own labels.
    fn list_uri(&self, labels: Option<&BTreeMap<String, String>>) -> ResourceUri {
        let prefix = format!("{}/{}", self.context_root(), self.api_version());
        let kinds = self.kind_uri();

        let template = match self.namespace() {
            Some(_) => format!("{}/namespaces/{{namespace}}/{}", prefix, kinds),
            None => format!("{}/{}", prefix, kinds),
        };

        let uri = ResourceUri::new(template, self.uri_variables());

        match labels.or_else(|| self.metadata().and_then(|m| m.labels.as_ref())) {
            Some(labels) if !labels.is_empty() => {
                uri.with_query("labelSelector", label_selector(labels))
            }
            _ => uri,
        }
    }
}
