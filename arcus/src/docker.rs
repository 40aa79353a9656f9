use crate::error::ClusterError;
use bollard::Docker;
use bollard::container::{InspectContainerOptions, UpdateContainerOptions};
use bollard::errors::Error as DockerError;
use bollard::models::{ContainerState, HealthStatusEnum, RestartPolicy, RestartPolicyNameEnum};
use log::debug;

/// direct access to the docker daemon for what testcontainers doesn't expose:
/// restart policies and container state
#[derive(Clone)]
pub struct DockerProbe {
  docker: Docker,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerStatus {
  pub created: bool,
  pub running: bool,
  pub healthy: bool,
}

impl ContainerStatus {
  pub const MISSING: ContainerStatus = ContainerStatus { created: false, running: false, healthy: false };

  /// a running container without a configured healthcheck counts as healthy
  pub fn from_state(state: Option<&ContainerState>) -> ContainerStatus {
    let Some(state) = state else {
      return ContainerStatus { created: true, running: false, healthy: false };
    };

    let running = state.running.unwrap_or(false);
    let health = state.health.as_ref().and_then(|h| h.status.as_ref());
    let healthy = running
      && matches!(
        health,
        None | Some(HealthStatusEnum::EMPTY | HealthStatusEnum::NONE | HealthStatusEnum::HEALTHY)
      );

    ContainerStatus { created: true, running, healthy }
  }
}

impl DockerProbe {
  pub fn connect() -> Result<DockerProbe, ClusterError> {
    Ok(DockerProbe { docker: Docker::connect_with_local_defaults()? })
  }

  /// makes the daemon restart the container whenever it exits
  pub async fn always_restart(
    &self,
    container_id: &str,
  ) -> Result<(), ClusterError> {
    let options = UpdateContainerOptions::<String> {
      restart_policy: Some(RestartPolicy { name: Some(RestartPolicyNameEnum::ALWAYS), maximum_retry_count: None }),
      ..Default::default()
    };
    self.docker.update_container(container_id, options).await?;
    debug!("restart policy 'always' set on {container_id}");
    Ok(())
  }

  pub async fn status(
    &self,
    container_id: &str,
  ) -> Result<ContainerStatus, ClusterError> {
    match self.docker.inspect_container(container_id, None::<InspectContainerOptions>).await {
      Ok(response) => Ok(ContainerStatus::from_state(response.state.as_ref())),
      Err(DockerError::DockerResponseServerError { status_code: 404, .. }) => Ok(ContainerStatus::MISSING),
      Err(e) => Err(e.into()),
    }
  }
}
