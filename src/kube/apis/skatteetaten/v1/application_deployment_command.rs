use std::collections::BTreeMap;

use k8s_openapi::DeepMerge;
use serde::{Deserialize, Serialize};

use super::{ApplicationDeploymentRef, AuroraConfigRef};

/// The deploy command that produced an ApplicationDeployment: which AuroraConfig was
/// used, at which ref, and which file overrides were applied on top.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationDeploymentCommand {
    #[serde(default)]
    pub override_files: BTreeMap<String, String>,

    pub application_deployment_ref: ApplicationDeploymentRef,

    pub aurora_config: AuroraConfigRef,
}

impl DeepMerge for ApplicationDeploymentCommand {
    fn merge_from(&mut self, other: Self) {
        self.override_files.extend(other.override_files);
        DeepMerge::merge_from(
            &mut self.application_deployment_ref,
            other.application_deployment_ref,
        );
        DeepMerge::merge_from(&mut self.aurora_config, other.aurora_config);
    }
}
