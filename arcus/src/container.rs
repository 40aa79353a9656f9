use crate::docker::DockerProbe;
use crate::error::{ClusterError, PropsError};
use crate::image::ImageName;
use crate::props::ArcusContainerProps;
use common::port_allocator::free_port;
use common::probe::LineProbe;
use log::info;
use testcontainers::{
  ContainerAsync, ContainerRequest, GenericImage, ImageExt, core::IntoContainerPort, runners::AsyncRunner,
};

pub const ARCUS_IMAGE_NAME: &str = "jam2in/arcus-memcached";
pub const ARCUS_IMAGE_TAG: &str = "latest";
pub const PUBLIC_IP_ENV: &str = "ARCUS_CACHE_PUBLIC_IP";
pub const DEFAULT_PUBLIC_IP: &str = "127.0.0.1";

const READY_ATTEMPTS: usize = 10;

pub fn default_image() -> ImageName {
  ImageName::new(ARCUS_IMAGE_NAME, ARCUS_IMAGE_TAG)
}

/// present when the node belongs to a cluster
#[derive(Debug, Clone)]
struct Membership {
  hostname: String,
  network: String,
  container_name: String,
  coordination_address: String,
  public_ip: String,
}

/// launch description of a single arcus memcached node
///
/// the listen port is published 1:1 on the host, so whatever the node registers
/// in zookeeper (`public_ip:port`) is reachable from the test process
#[derive(Debug, Clone)]
pub struct ArcusContainer {
  image: ImageName,
  port: u16,
  memory_size: u32,
  membership: Option<Membership>,
}

impl ArcusContainer {
  /// standalone node on `props.port()`
  pub fn new(props: &ArcusContainerProps) -> ArcusContainer {
    ArcusContainer::with_image(default_image(), props)
  }

  pub fn with_image(
    image: ImageName,
    props: &ArcusContainerProps,
  ) -> ArcusContainer {
    ArcusContainer { image, port: props.port(), memory_size: props.memory_size(), membership: None }
  }

  /// standalone node with default settings on a free ephemeral port
  pub fn create() -> Result<ArcusContainer, PropsError> {
    let port = free_port().map_err(PropsError::PortAllocation)?;
    Ok(ArcusContainer { image: default_image(), port, memory_size: crate::props::DEFAULT_MEMORY_SIZE, membership: None })
  }

  pub(crate) fn cluster_member(
    image: ImageName,
    hostname: &str,
    port: u16,
    memory_size: u32,
    network: &str,
    coordination_address: String,
  ) -> ArcusContainer {
    ArcusContainer {
      image,
      port,
      memory_size,
      membership: Some(Membership {
        hostname: hostname.to_string(),
        network: network.to_string(),
        container_name: format!("{network}-{hostname}"),
        coordination_address,
        public_ip: DEFAULT_PUBLIC_IP.to_string(),
      }),
    }
  }

  /// address the node announces to clients, only used inside a cluster
  pub fn with_public_ip(
    mut self,
    public_ip: impl Into<String>,
  ) -> ArcusContainer {
    if let Some(m) = self.membership.as_mut() {
      m.public_ip = public_ip.into();
    }
    self
  }

  pub fn image(&self) -> &ImageName {
    &self.image
  }

  pub fn port(&self) -> u16 {
    self.port
  }

  pub fn hostname(&self) -> Option<&str> {
    self.membership.as_ref().map(|m| m.hostname.as_str())
  }

  pub fn network(&self) -> Option<&str> {
    self.membership.as_ref().map(|m| m.network.as_str())
  }

  /// `-m <memory> -p <port>` plus `-z <zookeeper>` for cluster members
  pub fn command(&self) -> Vec<String> {
    let mut cmd = vec!["-m".to_string(), self.memory_size.to_string(), "-p".to_string(), self.port.to_string()];
    if let Some(m) = &self.membership {
      cmd.push("-z".to_string());
      cmd.push(m.coordination_address.clone());
    }
    cmd
  }

  pub fn env(&self) -> Vec<(String, String)> {
    match &self.membership {
      Some(m) => vec![(PUBLIC_IP_ENV.to_string(), m.public_ip.clone())],
      None => vec![],
    }
  }

  fn request(&self) -> ContainerRequest<GenericImage> {
    let mut request = GenericImage::new(self.image.name.as_str(), self.image.tag.as_str())
      .with_exposed_port(self.port.tcp())
      .with_cmd(self.command())
      .with_mapped_port(self.port, self.port.tcp());

    for (key, value) in self.env() {
      request = request.with_env_var(key, value);
    }

    if let Some(m) = &self.membership {
      request = request
        .with_network(m.network.as_str())
        .with_container_name(m.container_name.as_str())
        .with_hostname(m.hostname.as_str());
    }

    request
  }

  /// starts the node, switches it to the 'always' restart policy and waits for `version` to answer
  pub async fn start(
    &self,
    docker: &DockerProbe,
  ) -> Result<ContainerAsync<GenericImage>, ClusterError> {
    info!("starting arcus node {} with {:?}", self.image, self.command());
    let container = self.request().start().await?;
    docker.always_restart(container.id()).await?;

    let host = container.get_host().await?;
    let endpoint = format!("{host}:{}", self.port);
    if !LineProbe::new("version\r\n", "VERSION ").wait_ready(&endpoint, READY_ATTEMPTS).await {
      return Err(ClusterError::NotReady { endpoint });
    }
    Ok(container)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_standalone_command() {
    let props = ArcusContainerProps::builder().memory_size(512).port(21211).build().unwrap();
    let container = ArcusContainer::new(&props);

    assert_eq!(container.command(), vec!["-m", "512", "-p", "21211"]);
    assert!(container.env().is_empty());
    assert_eq!(container.port(), 21211);
    assert_eq!(container.hostname(), None);
    assert_eq!(container.network(), None);
    assert_eq!(container.image().to_string(), "jam2in/arcus-memcached:latest");
  }

  #[test]
  fn test_cluster_member_command() {
    let container = ArcusContainer::cluster_member(default_image(), "cache2", 11212, 64, "arcus-net", "arcus-net-zoo1:2181".into());

    assert_eq!(container.command(), vec!["-m", "64", "-p", "11212", "-z", "arcus-net-zoo1:2181"]);
    assert_eq!(container.env(), vec![(PUBLIC_IP_ENV.to_string(), "127.0.0.1".to_string())]);
    assert_eq!(container.hostname(), Some("cache2"));
    assert_eq!(container.network(), Some("arcus-net"));
  }

  #[test]
  fn test_public_ip_override() {
    let member = ArcusContainer::cluster_member(default_image(), "cache1", 11211, 64, "net", "net-zoo1:2181".into())
      .with_public_ip("10.0.0.7");
    assert_eq!(member.env(), vec![(PUBLIC_IP_ENV.to_string(), "10.0.0.7".to_string())]);

    let standalone = ArcusContainer::new(&ArcusContainerProps::default()).with_public_ip("10.0.0.7");
    assert!(standalone.env().is_empty());
  }

  #[test]
  fn test_create_uses_free_port() {
    let container = ArcusContainer::create().unwrap();

    assert_ne!(container.port(), 0);
    assert_eq!(container.command()[..2], ["-m".to_string(), "64".to_string()]);
  }

  #[test]
  fn test_custom_image() {
    let image: ImageName = "jam2in/arcus-memcached:develop".parse().unwrap();
    let container = ArcusContainer::with_image(image.clone(), &ArcusContainerProps::default());

    assert_eq!(container.image(), &image);
  }
}
