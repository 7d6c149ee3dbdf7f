use k8s_openapi::apimachinery::pkg::apis::meta::v1::ListMeta;
use serde::{Deserialize, Serialize};

use super::{ApplicationDeployment, API_VERSION};

pub const LIST_KIND: &str = "ApplicationDeploymentList";

fn default_api_version() -> String {
    API_VERSION.to_string()
}

fn default_kind() -> String {
    LIST_KIND.to_string()
}

/// Collection envelope returned when listing ApplicationDeployments.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationDeploymentList {
    #[serde(default = "default_api_version")]
    pub api_version: String,

    #[serde(default = "default_kind")]
    pub kind: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ListMeta>,

    #[serde(default)]
    pub items: Vec<ApplicationDeployment>,
}

impl Default for ApplicationDeploymentList {
    fn default() -> Self {
        Self {
            api_version: default_api_version(),
            kind: default_kind(),
            metadata: None,
            items: Vec::new(),
        }
    }
}

impl ApplicationDeploymentList {
    pub fn iter(&self) -> std::slice::Iter<'_, ApplicationDeployment> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl FromIterator<ApplicationDeployment> for ApplicationDeploymentList {
    fn from_iter<I: IntoIterator<Item = ApplicationDeployment>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
            ..Default::default()
        }
    }
}

impl IntoIterator for ApplicationDeploymentList {
    type Item = ApplicationDeployment;
    type IntoIter = std::vec::IntoIter<ApplicationDeployment>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a ApplicationDeploymentList {
    type Item = &'a ApplicationDeployment;
    type IntoIter = std::slice::Iter<'a, ApplicationDeployment>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
