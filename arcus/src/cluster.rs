use crate::address::{CacheNodeAddress, cluster_addresses};
use crate::container::{ArcusContainer, default_image};
use crate::docker::{ContainerStatus, DockerProbe};
use crate::error::ClusterError;
use crate::image::ImageName;
use crate::props::ArcusContainerProps;
use crate::znode::cluster_znodes;
use crate::zookeeper::{RunningZookeeper, ZookeeperContainer};
use log::{info, warn};
use testcontainers::{ContainerAsync, GenericImage};

const NETWORK_PREFIX: &str = "arcus";

/// arcus cache cluster: one zookeeper plus `cluster_size` memcached nodes on a private network
///
/// `start` brings things up in a fixed order:
///   1. zookeeper, waits until its client port answers
///   2. the znode tree from `znode::cluster_znodes`, any failure aborts the start
///   3. every cache node
///
/// a failed start leaves whatever was already started in place, call `stop` to clean up.
/// Dropping the cluster removes the containers
pub struct ArcusCluster {
  service_code: String,
  network: String,
  nodes: Vec<CacheNodeAddress>,
  zookeeper: ZookeeperContainer,
  containers: Vec<ArcusContainer>,
  started: Option<Started>,
}

struct Started {
  docker: DockerProbe,
  zookeeper: Option<RunningZookeeper>,
  nodes: Vec<ContainerAsync<GenericImage>>,
}

impl ArcusCluster {
  pub fn create() -> Result<ArcusCluster, ClusterError> {
    ArcusCluster::new(&ArcusContainerProps::default())
  }

  pub fn new(props: &ArcusContainerProps) -> Result<ArcusCluster, ClusterError> {
    ArcusCluster::with_image(default_image(), props)
  }

  pub fn with_image(
    image: ImageName,
    props: &ArcusContainerProps,
  ) -> Result<ArcusCluster, ClusterError> {
    let network = format!("{NETWORK_PREFIX}-{:08x}", rand::random::<u32>());
    let zookeeper = ZookeeperContainer::new(&network, props.zk_port());
    let nodes = cluster_addresses(props.cluster_size(), props.port())?;

    let containers = nodes
      .iter()
      .map(|address| {
        ArcusContainer::cluster_member(
          image.clone(),
          &address.host,
          address.port,
          props.memory_size(),
          &network,
          zookeeper.coordination_address(),
        )
      })
      .collect();

    Ok(ArcusCluster {
      service_code: props.service_code().to_string(),
      network,
      nodes,
      zookeeper,
      containers,
      started: None,
    })
  }

  /// address every node announces to clients instead of `127.0.0.1`
  pub fn with_public_ip(
    mut self,
    public_ip: &str,
  ) -> ArcusCluster {
    self.containers = self.containers.into_iter().map(|c| c.with_public_ip(public_ip)).collect();
    self
  }

  pub fn service_code(&self) -> &str {
    &self.service_code
  }

  pub fn network(&self) -> &str {
    &self.network
  }

  pub fn cache_nodes(&self) -> &[CacheNodeAddress] {
    &self.nodes
  }

  pub fn containers(&self) -> &[ArcusContainer] {
    &self.containers
  }

  /// running zookeeper, `None` before `start` got that far
  pub fn zookeeper(&self) -> Option<&RunningZookeeper> {
    self.started.as_ref().and_then(|s| s.zookeeper.as_ref())
  }

  /// docker ids of the cache node containers started so far
  pub fn node_ids(&self) -> Vec<&str> {
    self.started.as_ref().map(|s| s.nodes.iter().map(|n| n.id()).collect()).unwrap_or_default()
  }

  pub async fn start(&mut self) -> Result<(), ClusterError> {
    if self.started.is_some() {
      return Err(ClusterError::AlreadyStarted);
    }
    info!("starting arcus cluster {} on network {}", self.service_code, self.network);

    let started = self.started.insert(Started { docker: DockerProbe::connect()?, zookeeper: None, nodes: vec![] });

    let zookeeper = started.zookeeper.insert(self.zookeeper.start().await?);
    for path in cluster_znodes(&self.service_code, &self.nodes) {
      zookeeper.create_znode(&path).await?;
    }
    info!("znodes for {} created", self.service_code);

    for container in &self.containers {
      let node = container.start(&started.docker).await?;
      started.nodes.push(node);
    }

    info!("arcus cluster {} started with {} nodes", self.service_code, self.nodes.len());
    Ok(())
  }

  /// cache nodes first, zookeeper last. No-op on a cluster that was never started
  ///
  /// every member gets a stop attempt even if an earlier one failed, the first error is returned
  pub async fn stop(&self) -> Result<(), ClusterError> {
    let Some(started) = &self.started else {
      warn!("stop called on a cluster that was never started");
      return Ok(());
    };

    let nodes = run_all(started.nodes.iter().map(|node| async move {
      info!("stopping arcus node {}", node.id());
      node.stop().await.map_err(ClusterError::from)
    }))
    .await;

    let zookeeper = match &started.zookeeper {
      Some(zookeeper) => zookeeper.stop().await,
      None => Ok(()),
    };

    nodes.and(zookeeper)
  }

  pub async fn is_running(&self) -> Result<bool, ClusterError> {
    self.all_members(|s| s.running).await
  }

  pub async fn is_created(&self) -> Result<bool, ClusterError> {
    self.all_members(|s| s.created).await
  }

  pub async fn is_healthy(&self) -> Result<bool, ClusterError> {
    self.all_members(|s| s.healthy).await
  }

  /// zookeeper `host:port` for arcus clients
  pub async fn host_ports(&self) -> Result<String, ClusterError> {
    match self.zookeeper() {
      Some(zookeeper) => zookeeper.endpoint().await,
      None => Err(ClusterError::NotReady { endpoint: self.zookeeper.coordination_address() }),
    }
  }

  /// false until every node and zookeeper exist and satisfy `check`
  async fn all_members(
    &self,
    check: impl Fn(ContainerStatus) -> bool,
  ) -> Result<bool, ClusterError> {
    let Some(started) = &self.started else {
      return Ok(false);
    };
    let Some(zookeeper) = &started.zookeeper else {
      return Ok(false);
    };
    if started.nodes.len() != self.containers.len() {
      return Ok(false);
    }

    for node in &started.nodes {
      if !check(started.docker.status(node.id()).await?) {
        return Ok(false);
      }
    }
    Ok(check(started.docker.status(zookeeper.id()).await?))
  }
}

/// awaits every step in order, keeps going after failures and returns the first error
async fn run_all<I, Fut>(steps: I) -> Result<(), ClusterError>
where
  I: IntoIterator<Item = Fut>,
  Fut: Future<Output = Result<(), ClusterError>>,
{
  let mut first_error = None;
  for step in steps {
    if let Err(e) = step.await {
      warn!("stop failed: {e}");
      first_error.get_or_insert(e);
    }
  }

  match first_error {
    Some(e) => Err(e),
    None => Ok(()),
  }
}
