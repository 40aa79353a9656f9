use crate::helpers::set_value;
use arcus::docker::DockerProbe;
use arcus::znode::{ZPATH_CACHE_LIST, cluster_znodes};
use arcus::{ArcusCluster, ArcusContainerProps, ClusterError};
use bollard::Docker;
use bollard::container::RemoveContainerOptions;
use common::retrier::{exp_intervals, retry};
use std::time::Duration;

#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires a docker daemon"]
async fn default_cluster_starts_and_stops() {
  _ = env_logger::try_init();

  let mut cluster = ArcusCluster::create().unwrap();
  cluster.start().await.expect("failed to start cluster");

  assert!(cluster.is_created().await.unwrap());
  assert!(cluster.is_running().await.unwrap());
  assert!(cluster.is_healthy().await.unwrap());

  for node in cluster.cache_nodes() {
    let endpoint = format!("127.0.0.1:{}", node.port);
    assert!(set_value(&endpoint, "test", "testValue").await, "node {node}");
  }

  assert!(matches!(cluster.start().await, Err(ClusterError::AlreadyStarted)));

  cluster.stop().await.unwrap();
  assert!(!cluster.is_running().await.unwrap());
}

#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires a docker daemon"]
async fn nodes_register_in_zookeeper() {
  _ = env_logger::try_init();

  let props = ArcusContainerProps::builder().service_code("discovery").cluster_size(3).build().unwrap();
  let mut cluster = ArcusCluster::new(&props).unwrap();
  cluster.start().await.expect("failed to start cluster");

  let zookeeper = cluster.zookeeper().expect("zookeeper is running");
  for path in cluster_znodes(cluster.service_code(), cluster.cache_nodes()) {
    let output = zookeeper.cli(&["stat", path.as_str()]).await.unwrap();
    assert!(!output.failed(), "{path}: {output:?}");
  }

  // nodes announce themselves as ephemeral children of cache_list/<service_code> after they connect
  let cache_list = format!("{ZPATH_CACHE_LIST}/discovery");
  let registered = retry(exp_intervals(6, Duration::from_millis(250)), || async {
    match zookeeper.children(&cache_list).await {
      Ok(children) => children.len() == cluster.cache_nodes().len(),
      Err(_) => false,
    }
  })
  .await;

  let children = zookeeper.children(&cache_list).await.unwrap();
  assert!(registered, "registered nodes: {children:?}");
  for node in cluster.cache_nodes() {
    let suffix = format!(":{}", node.port);
    assert!(children.iter().any(|c| c.contains(&suffix)), "{node} missing in {children:?}");
  }

  cluster.stop().await.unwrap();
}

#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires a docker daemon"]
async fn stop_reaches_every_member_after_one_fails() {
  _ = env_logger::try_init();

  let props = ArcusContainerProps::builder().service_code("teardown").port(31211).zk_port(2192).build().unwrap();
  let mut cluster = ArcusCluster::new(&props).unwrap();
  cluster.start().await.expect("failed to start cluster");

  let ids: Vec<String> = cluster.node_ids().into_iter().map(String::from).collect();
  let zookeeper_id = cluster.zookeeper().expect("zookeeper is running").id().to_string();

  let docker = Docker::connect_with_local_defaults().unwrap();
  docker
    .remove_container(&ids[0], Some(RemoveContainerOptions { force: true, ..Default::default() }))
    .await
    .expect("remove first cache node");

  let result = cluster.stop().await;
  log::info!("stop with a removed node: {result:?}");

  let probe = DockerProbe::connect().unwrap();
  for id in ids.iter().skip(1).chain(std::iter::once(&zookeeper_id)) {
    assert!(!probe.status(id).await.unwrap().running, "{id} is still running");
  }
  assert!(!cluster.is_running().await.unwrap());
}

#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires a docker daemon"]
async fn custom_ports_are_published() {
  _ = env_logger::try_init();

  let props = ArcusContainerProps::builder().service_code("ports").cluster_size(2).port(21211).zk_port(2191).build().unwrap();
  let mut cluster = ArcusCluster::new(&props).unwrap();
  cluster.start().await.expect("failed to start cluster");

  assert!(cluster.host_ports().await.unwrap().ends_with(":2191"));
  assert!(set_value("127.0.0.1:21211", "test", "testValue").await);
  assert!(set_value("127.0.0.1:21212", "test", "testValue").await);

  cluster.stop().await.unwrap();
}
