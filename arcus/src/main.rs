use arcus::{ArcusCluster, ArcusContainerProps, ImageName};
use clap::Parser;
use log::{error, info};

/// starts an arcus cluster and keeps it up until Ctrl-C
#[derive(Parser)]
struct Args {
  #[arg(long, default_value = "test")]
  service_code: String,
  #[arg(long, default_value = "3")]
  cluster_size: usize,
  /// megabytes per node
  #[arg(long, default_value = "64")]
  memory_size: u32,
  /// port of the first cache node, 0 picks a free one
  #[arg(long, default_value = "11211", allow_negative_numbers = true)]
  port: i32,
  #[arg(long, default_value = "2181", allow_negative_numbers = true)]
  zk_port: i32,
  #[arg(long, default_value = "jam2in/arcus-memcached:latest")]
  image: ImageName,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  env_logger::init();
  let args = Args::parse();

  let props = ArcusContainerProps::builder()
    .service_code(args.service_code)
    .cluster_size(args.cluster_size)
    .memory_size(args.memory_size)
    .port(args.port)
    .zk_port(args.zk_port)
    .build()?;

  let mut cluster = ArcusCluster::with_image(args.image, &props)?;
  if let Err(e) = cluster.start().await {
    error!("cluster start failed: {e}");
    cluster.stop().await?;
    return Err(e.into());
  }

  println!("zookeeper: {}", cluster.host_ports().await?);
  for node in cluster.cache_nodes() {
    println!("cache node: {node}");
  }

  tokio::signal::ctrl_c().await?;
  info!("shutting down");
  cluster.stop().await?;

  Ok(())
}
