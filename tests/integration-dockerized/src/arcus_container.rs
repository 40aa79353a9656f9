use crate::helpers::{get_value, set_value};
use arcus::ArcusContainer;
use arcus::docker::DockerProbe;

#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires a docker daemon"]
async fn standalone_node_serves_requests() {
  _ = env_logger::try_init();

  let docker = DockerProbe::connect().unwrap();
  let arcus = ArcusContainer::create().unwrap();
  let container = arcus.start(&docker).await.expect("failed to start arcus");

  let endpoint = format!("127.0.0.1:{}", arcus.port());
  assert!(set_value(&endpoint, "test", "singleTestValue").await);
  assert!(get_value(&endpoint, "test", "singleTestValue").await);

  let status = docker.status(container.id()).await.unwrap();
  assert!(status.created);
  assert!(status.running);
}
