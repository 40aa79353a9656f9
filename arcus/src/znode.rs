use crate::address::CacheNodeAddress;

pub const ZPATH_ARCUS: &str = "/arcus";
pub const ZPATH_CACHE_LIST: &str = "/arcus/cache_list";
pub const ZPATH_CLIENT_LIST: &str = "/arcus/client_list";
pub const ZPATH_CACHE_SERVER_MAPPING: &str = "/arcus/cache_server_mapping";

/// every znode a cluster needs before the first cache node starts, in creation order
///
/// /arcus
///   /cache_list
///     /<service_code>
///   /client_list
///     /<service_code>
///   /cache_server_mapping
///     /<host:port>
///       /<service_code>
///     ...
///
/// parents always precede children, zookeeper won't create a node without its parent
pub fn cluster_znodes(
  service_code: &str,
  nodes: &[CacheNodeAddress],
) -> Vec<String> {
  let mut paths = vec![
    ZPATH_ARCUS.to_string(),
    ZPATH_CACHE_LIST.to_string(),
    format!("{ZPATH_CACHE_LIST}/{service_code}"),
    ZPATH_CLIENT_LIST.to_string(),
    format!("{ZPATH_CLIENT_LIST}/{service_code}"),
    ZPATH_CACHE_SERVER_MAPPING.to_string(),
  ];

  for node in nodes {
    paths.push(format!("{ZPATH_CACHE_SERVER_MAPPING}/{node}"));
    paths.push(format!("{ZPATH_CACHE_SERVER_MAPPING}/{node}/{service_code}"));
  }

  paths
}
