use crate::error::{AddressParseError, ClusterError};
use derive_more::Display;
use std::str::FromStr;

const HOST_PREFIX: &str = "cache";

/// `host:port` of one cache node as seen inside the cluster network
/// also the key under `/arcus/cache_server_mapping`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display)]
#[display("{host}:{port}")]
pub struct CacheNodeAddress {
  pub host: String,
  pub port: u16,
}

impl CacheNodeAddress {
  pub fn new(
    host: impl Into<String>,
    port: u16,
  ) -> CacheNodeAddress {
    CacheNodeAddress { host: host.into(), port }
  }
}

impl FromStr for CacheNodeAddress {
  type Err = AddressParseError;

  fn from_str(s: &str) -> Result<CacheNodeAddress, AddressParseError> {
    let (host, port) = s.rsplit_once(':').ok_or_else(|| AddressParseError(s.to_string()))?;
    if host.is_empty() {
      return Err(AddressParseError(s.to_string()));
    }
    let port = port.parse::<u16>().map_err(|_| AddressParseError(s.to_string()))?;
    Ok(CacheNodeAddress::new(host, port))
  }
}

/// `cache1:base_port`, `cache2:base_port+1`, ...
pub fn cluster_addresses(
  cluster_size: usize,
  base_port: u16,
) -> Result<Vec<CacheNodeAddress>, ClusterError> {
  (0..cluster_size)
    .map(|i| {
      let port = u16::try_from(i)
        .ok()
        .and_then(|offset| base_port.checked_add(offset))
        .ok_or(ClusterError::AddressOverflow { base_port, index: i })?;
      Ok(CacheNodeAddress::new(format!("{HOST_PREFIX}{}", i + 1), port))
    })
    .collect()
}
