use std::collections::BTreeMap;

use k8s_openapi::DeepMerge;
use serde::{Deserialize, Serialize};

use super::ApplicationDeploymentCommand;

/// Desired state of an ApplicationDeployment as written by the Aurora deploy pipeline.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationDeploymentSpec {
    pub application_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_deployment_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_deployment_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub databases: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub splunk_index: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub management_path: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_to: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deploy_tag: Option<String>,

    /// Pod labels selecting the workload owned by this deployment.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub selector: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<ApplicationDeploymentCommand>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl DeepMerge for ApplicationDeploymentSpec {
    fn merge_from(&mut self, other: Self) {
        DeepMerge::merge_from(&mut self.application_id, other.application_id);
        DeepMerge::merge_from(&mut self.application_name, other.application_name);
        DeepMerge::merge_from(
            &mut self.application_deployment_id,
            other.application_deployment_id,
        );
        DeepMerge::merge_from(
            &mut self.application_deployment_name,
            other.application_deployment_name,
        );
        if other.databases.is_some() {
            self.databases = other.databases;
        }
        DeepMerge::merge_from(&mut self.splunk_index, other.splunk_index);
        DeepMerge::merge_from(&mut self.management_path, other.management_path);
        DeepMerge::merge_from(&mut self.release_to, other.release_to);
        DeepMerge::merge_from(&mut self.deploy_tag, other.deploy_tag);
        self.selector.extend(other.selector);
        DeepMerge::merge_from(&mut self.command, other.command);
        DeepMerge::merge_from(&mut self.message, other.message);
    }
}
