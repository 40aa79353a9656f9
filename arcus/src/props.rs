use crate::error::PropsError;
use common::port_allocator::free_port;

pub const DEFAULT_SERVICE_CODE: &str = "test";
pub const DEFAULT_CLUSTER_SIZE: usize = 3;
/// megabytes, passed to memcached as `-m`
pub const DEFAULT_MEMORY_SIZE: u32 = 64;
pub const DEFAULT_PORT: u16 = 11211;
pub const DEFAULT_ZK_PORT: u16 = 2181;

/// validated configuration of a cache node or a whole cluster
///
/// for a cluster `port` is the port of the first node, node `i` listens on `port + i`.
/// `zk_port` is the host port the coordination service is published on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArcusContainerProps {
  service_code: String,
  cluster_size: usize,
  memory_size: u32,
  port: u16,
  zk_port: u16,
}

impl ArcusContainerProps {
  pub fn builder() -> ArcusContainerPropsBuilder {
    ArcusContainerPropsBuilder::default()
  }

  pub fn service_code(&self) -> &str {
    &self.service_code
  }

  pub fn cluster_size(&self) -> usize {
    self.cluster_size
  }

  pub fn memory_size(&self) -> u32 {
    self.memory_size
  }

  pub fn port(&self) -> u16 {
    self.port
  }

  pub fn zk_port(&self) -> u16 {
    self.zk_port
  }
}

impl Default for ArcusContainerProps {
  fn default() -> ArcusContainerProps {
    ArcusContainerProps {
      service_code: DEFAULT_SERVICE_CODE.to_string(),
      cluster_size: DEFAULT_CLUSTER_SIZE,
      memory_size: DEFAULT_MEMORY_SIZE,
      port: DEFAULT_PORT,
      zk_port: DEFAULT_ZK_PORT,
    }
  }
}

/// setters validate eagerly, the first error wins and is reported by `build`
/// port `0` means "pick a free ephemeral port" and is resolved in `build`
#[derive(Debug)]
pub struct ArcusContainerPropsBuilder {
  props: ArcusContainerProps,
  error: Option<PropsError>,
}

impl Default for ArcusContainerPropsBuilder {
  fn default() -> ArcusContainerPropsBuilder {
    ArcusContainerPropsBuilder { props: ArcusContainerProps::default(), error: None }
  }
}

impl ArcusContainerPropsBuilder {
  /// must be non-empty and can't contain `/` since it becomes a znode name
  pub fn service_code(
    mut self,
    service_code: impl Into<String>,
  ) -> ArcusContainerPropsBuilder {
    let service_code = service_code.into();
    if service_code.is_empty() || service_code.contains('/') {
      return self.fail(PropsError::InvalidServiceCode);
    }
    self.props.service_code = service_code;
    self
  }

  pub fn cluster_size(
    mut self,
    cluster_size: usize,
  ) -> ArcusContainerPropsBuilder {
    if cluster_size == 0 {
      return self.fail(PropsError::InvalidClusterSize);
    }
    self.props.cluster_size = cluster_size;
    self
  }

  pub fn memory_size(
    mut self,
    memory_size: u32,
  ) -> ArcusContainerPropsBuilder {
    if memory_size == 0 {
      return self.fail(PropsError::InvalidMemorySize);
    }
    self.props.memory_size = memory_size;
    self
  }

  pub fn port(
    mut self,
    port: i32,
  ) -> ArcusContainerPropsBuilder {
    match u16::try_from(port) {
      Ok(p) => self.props.port = p,
      Err(_) => return self.fail(PropsError::InvalidPort(port)),
    }
    self
  }

  pub fn zk_port(
    mut self,
    zk_port: i32,
  ) -> ArcusContainerPropsBuilder {
    match u16::try_from(zk_port) {
      Ok(p) => self.props.zk_port = p,
      Err(_) => return self.fail(PropsError::InvalidPort(zk_port)),
    }
    self
  }

  pub fn build(self) -> Result<ArcusContainerProps, PropsError> {
    if let Some(e) = self.error {
      return Err(e);
    }

    let mut props = self.props;
    if props.port == 0 {
      props.port = free_port().map_err(PropsError::PortAllocation)?;
    }
    if props.zk_port == 0 {
      props.zk_port = free_port().map_err(PropsError::PortAllocation)?;
    }
    Ok(props)
  }

  fn fail(
    mut self,
    error: PropsError,
  ) -> ArcusContainerPropsBuilder {
    if self.error.is_none() {
      self.error = Some(error);
    }
    self
  }
}
