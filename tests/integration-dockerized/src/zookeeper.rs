use arcus::ClusterError;
use arcus::zookeeper::ZookeeperContainer;
use common::port_allocator::free_port;

#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires a docker daemon"]
async fn create_znode_without_parent_fails() {
  _ = env_logger::try_init();

  let zk = ZookeeperContainer::new("arcus-znode-test", free_port().unwrap());
  let running = zk.start().await.expect("failed to start zookeeper");

  running.create_znode("/arcus").await.expect("root znode");
  assert_eq!(running.children("/arcus").await.unwrap(), Vec::<String>::new());

  let err = running.create_znode("/missing/parent/child").await.unwrap_err();
  match err {
    ClusterError::ZnodeCreation { path, output, .. } => {
      assert_eq!(path, "/missing/parent/child");
      // zkCli 3.5 may exit with 0 here, the printed keeper error is what marks the failure
      assert!(output.contains("Node does not exist") || output.contains("KeeperErrorCode"), "output: {output}");
    }
    e => panic!("unexpected error: {e}"),
  }

  let err = running.create_znode("/arcus").await.unwrap_err();
  assert!(matches!(err, ClusterError::ZnodeCreation { .. }), "got: {err}");
}
