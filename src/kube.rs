pub mod apis;
pub mod client;
pub mod resource;
pub mod token;
pub mod uri;

pub use client::{KubeClient, KubeClientRequest};
pub use resource::HasMetadata;
pub use token::{
    bearer_header, FileTokenFetcher, NoopTokenFetcher, PsatTokenFetcher, StringTokenFetcher,
    TokenFetcher,
};
pub use uri::{label_selector, ResourceUri};
