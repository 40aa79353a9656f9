use derive_more::From;
use std::{fmt, io};
use testcontainers::TestcontainersError;

/// invalid builder input, returned by `ArcusContainerPropsBuilder::build`
#[derive(Debug)]
pub enum PropsError {
  InvalidServiceCode,
  InvalidClusterSize,
  InvalidMemorySize,
  InvalidPort(i32),
  PortAllocation(io::Error),
}

impl fmt::Display for PropsError {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>,
  ) -> fmt::Result {
    match self {
      PropsError::InvalidServiceCode => write!(f, "Invalid service code."),
      PropsError::InvalidClusterSize => write!(f, "Invalid cluster size."),
      PropsError::InvalidMemorySize => write!(f, "Invalid memory size."),
      PropsError::InvalidPort(port) => write!(f, "Invalid port: {port}."),
      PropsError::PortAllocation(e) => write!(f, "Failed to allocate a free port: {e}"),
    }
  }
}

impl std::error::Error for PropsError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      PropsError::PortAllocation(e) => Some(e),
      _ => None,
    }
  }
}

/// image reference that couldn't be parsed into `ImageName`
#[derive(Debug, PartialEq, Eq)]
pub struct ImageParseError(pub String);

impl fmt::Display for ImageParseError {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>,
  ) -> fmt::Result {
    write!(f, "invalid image reference (expected name[:tag]): {:?}", self.0)
  }
}

impl std::error::Error for ImageParseError {}

/// `host:port` string that couldn't be parsed into `CacheNodeAddress`
#[derive(Debug, PartialEq, Eq)]
pub struct AddressParseError(pub String);

impl fmt::Display for AddressParseError {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>,
  ) -> fmt::Result {
    write!(f, "invalid cache node address: {:?}", self.0)
  }
}

impl std::error::Error for AddressParseError {}

/// everything that can abort bringing a cluster (or a single node) up
#[derive(Debug, From)]
pub enum ClusterError {
  #[from]
  Container(TestcontainersError),
  #[from]
  Docker(bollard::errors::Error),
  ZnodeCreation {
    path: String,
    exit_code: Option<i64>,
    output: String,
  },
  ZnodeRead {
    path: String,
    output: String,
  },
  NotReady {
    endpoint: String,
  },
  AddressOverflow {
    base_port: u16,
    index: usize,
  },
  AlreadyStarted,
}

impl fmt::Display for ClusterError {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>,
  ) -> fmt::Result {
    match self {
      ClusterError::Container(e) => write!(f, "container error: {e}"),
      ClusterError::Docker(e) => write!(f, "docker api error: {e}"),
      ClusterError::ZnodeCreation { path, exit_code, output } => {
        write!(f, "failed to create znode {path} (exit code: {exit_code:?}): {output}")
      }
      ClusterError::ZnodeRead { path, output } => write!(f, "failed to read znode {path}: {output}"),
      ClusterError::NotReady { endpoint } => write!(f, "{endpoint} did not become ready"),
      ClusterError::AddressOverflow { base_port, index } => {
        write!(f, "cache node #{index} port overflows u16 (base port {base_port})")
      }
      ClusterError::AlreadyStarted => write!(f, "cluster is already started"),
    }
  }
}

impl std::error::Error for ClusterError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      ClusterError::Container(e) => Some(e),
      ClusterError::Docker(e) => Some(e),
      _ => None,
    }
  }
}
