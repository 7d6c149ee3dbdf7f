use std::collections::BTreeMap;

use crate::{
    error::{Error, Result},
    logger,
};

/// A request path with `{name}` placeholders and the values to fill them with.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResourceUri {
    template: String,
    variables: BTreeMap<String, Option<String>>,
    query: Vec<(String, String)>,
}

impl ResourceUri {
    pub fn new(
        template: impl Into<String>,
        variables: BTreeMap<String, Option<String>>,
    ) -> Self {
        Self {
            template: template.into(),
            variables,
            query: Vec::new(),
        }
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn variables(&self) -> &BTreeMap<String, Option<String>> {
        &self.variables
    }

    /// Substitutes every placeholder with its percent-encoded value and appends the query.
    pub fn expand(&self) -> Result<String> {
        let mut path = String::with_capacity(self.template.len());
        let mut rest = self.template.as_str();

        while let Some(start) = rest.find('{') {
            let Some(end) = rest[start..].find('}').map(|i| start + i) else {
                break;
            };

            path.push_str(&rest[..start]);

            let name = &rest[start + 1..end];
            let value = self
                .variables
                .get(name)
                .and_then(Option::as_deref)
                .ok_or_else(|| Error::MissingUriVariable(name.to_string()))?;

            path.push_str(&urlencoding::encode(value));

            rest = &rest[end + 1..];
        }
        path.push_str(rest);

        if !self.query.is_empty() {
            let query = self
                .query
                .iter()
                .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
                .collect::<Vec<_>>()
                .join("&");

            path.push('?');
            path.push_str(&query);
        }

        logger!(
            debug,
            "uri template={} variables={:?} expanded={}",
            self.template,
            self.variables,
            path
        );

        Ok(path)
    }

    /// Joins the expanded path onto a server url.
    pub fn url(&self, server_url: &str) -> Result<String> {
        let base = server_url.strip_suffix('/').unwrap_or(server_url);

        Ok(format!("{}{}", base, self.expand()?))
    }
}

/// `kind` is expected to be lowercase already.
pub fn pluralize(kind: &str) -> String {
    if kind.ends_with('s') {
        format!("{}es", kind)
    } else {
        format!("{}s", kind)
    }
}

/// Renders labels as a `labelSelector` value. Labels with an empty value select on key
/// existence only.
pub fn label_selector(labels: &BTreeMap<String, String>) -> String {
    labels
        .iter()
        .map(|(key, value)| {
            if value.is_empty() {
                key.to_string()
            } else {
                format!("{}={}", key, value)
            }
        })
        .collect::<Vec<_>>()
        .join(",")
}
