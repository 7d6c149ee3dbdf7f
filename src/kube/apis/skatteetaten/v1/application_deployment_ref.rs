use k8s_openapi::DeepMerge;
use serde::{Deserialize, Serialize};

/// Points at one application in one environment of an AuroraConfig.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApplicationDeploymentRef {
    pub environment: String,
    pub application: String,
}

impl DeepMerge for ApplicationDeploymentRef {
    fn merge_from(&mut self, other: Self) {
        DeepMerge::merge_from(&mut self.environment, other.environment);
        DeepMerge::merge_from(&mut self.application, other.application);
    }
}
