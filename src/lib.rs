//! Client-side model of the Skatteetaten `ApplicationDeployment` custom resource
//! (`skatteetaten.no/v1`), with the addressing, configuration and client needed to talk
//! to the API server about it.

pub mod codec;
pub mod config;
pub mod error;
pub mod kube;
pub mod logging;

pub use crate::kube::apis::skatteetaten::v1::{
    ApplicationDeployment, ApplicationDeploymentCommand, ApplicationDeploymentList,
    ApplicationDeploymentRef, ApplicationDeploymentSpec, AuroraConfigRef,
};
pub use crate::kube::{HasMetadata, KubeClient, KubeClientRequest};
