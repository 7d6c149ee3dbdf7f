pub mod skatteetaten;

pub use k8s_openapi::{apimachinery, DeepMerge, NamespaceResourceScope};
