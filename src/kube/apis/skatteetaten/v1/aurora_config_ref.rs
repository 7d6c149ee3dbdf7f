use k8s_openapi::DeepMerge;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuroraConfigRef {
    pub name: String,

    pub ref_name: String,

    /// Commit the ref resolved to at deploy time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_ref: Option<String>,
}

impl DeepMerge for AuroraConfigRef {
    fn merge_from(&mut self, other: Self) {
        DeepMerge::merge_from(&mut self.name, other.name);
        DeepMerge::merge_from(&mut self.ref_name, other.ref_name);
        DeepMerge::merge_from(&mut self.resolved_ref, other.resolved_ref);
    }
}
