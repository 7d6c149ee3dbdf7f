pub const GROUP: &str = "skatteetaten.no";

pub const VERSION: &str = "v1";

pub const API_VERSION: &str = "skatteetaten.no/v1";

mod application_deployment;
pub use self::application_deployment::{ApplicationDeployment, KIND, PLURAL};

mod application_deployment_command;
pub use self::application_deployment_command::ApplicationDeploymentCommand;

mod application_deployment_list;
pub use self::application_deployment_list::{ApplicationDeploymentList, LIST_KIND};

mod application_deployment_ref;
pub use self::application_deployment_ref::ApplicationDeploymentRef;

mod application_deployment_spec;
pub use self::application_deployment_spec::ApplicationDeploymentSpec;

mod aurora_config_ref;
pub use self::aurora_config_ref::AuroraConfigRef;
