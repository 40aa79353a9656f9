use crate::error::ClusterError;
use common::probe::LineProbe;
use log::{debug, info};
use testcontainers::{
  ContainerAsync, ContainerRequest, GenericImage, ImageExt,
  core::{CmdWaitFor, ExecCommand, IntoContainerPort, WaitFor},
  runners::AsyncRunner,
};

pub const ZK_IMAGE_NAME: &str = "zookeeper";
pub const ZK_IMAGE_TAG: &str = "3.5.9";
pub const ZK_CONTAINER_PORT: u16 = 2181;
pub const ZK_HOSTNAME: &str = "zoo1";

const ZK_CLI_PATH: &str = "./bin/zkCli.sh";
const CREATE_CMD: &str = "create";
const LS_CMD: &str = "ls";
/// zkCli 3.5 prints keeper errors and may still exit with 0
const FAILURE_MARKERS: [&str; 3] = ["Node does not exist", "Node already exists", "KeeperErrorCode"];
const READY_ATTEMPTS: usize = 10;

/// single zookeeper server attached to the cluster network
/// container port 2181 is published on `host_port`
#[derive(Debug, Clone)]
pub struct ZookeeperContainer {
  network: String,
  host_port: u16,
}

impl ZookeeperContainer {
  pub fn new(
    network: impl Into<String>,
    host_port: u16,
  ) -> ZookeeperContainer {
    ZookeeperContainer { network: network.into(), host_port }
  }

  /// docker resolves container names inside a user defined network, hostnames it doesn't
  pub fn container_name(&self) -> String {
    format!("{}-{ZK_HOSTNAME}", self.network)
  }

  /// what cache nodes pass to `-z`
  pub fn coordination_address(&self) -> String {
    format!("{}:{ZK_CONTAINER_PORT}", self.container_name())
  }

  pub fn host_port(&self) -> u16 {
    self.host_port
  }

  fn request(&self) -> ContainerRequest<GenericImage> {
    GenericImage::new(ZK_IMAGE_NAME, ZK_IMAGE_TAG)
      .with_exposed_port(ZK_CONTAINER_PORT.tcp())
      .with_wait_for(WaitFor::message_on_stdout("binding to port"))
      .with_network(&self.network)
      .with_container_name(self.container_name())
      .with_hostname(ZK_HOSTNAME)
      .with_env_var("ZOO_MY_ID", "1")
      .with_mapped_port(self.host_port, ZK_CONTAINER_PORT.tcp())
  }

  /// starts the container and waits until the client port answers `srvr`
  pub async fn start(&self) -> Result<RunningZookeeper, ClusterError> {
    info!("starting zookeeper {} on host port {}", self.container_name(), self.host_port);
    let container = self.request().start().await?;

    let running = RunningZookeeper { container };
    let endpoint = running.endpoint().await?;
    if !LineProbe::new("srvr", "Zookeeper version").wait_ready(&endpoint, READY_ATTEMPTS).await {
      return Err(ClusterError::NotReady { endpoint });
    }
    Ok(running)
  }
}

pub struct RunningZookeeper {
  container: ContainerAsync<GenericImage>,
}

impl RunningZookeeper {
  pub fn id(&self) -> &str {
    self.container.id()
  }

  /// `host:port` reachable from the test process
  pub async fn endpoint(&self) -> Result<String, ClusterError> {
    let host = self.container.get_host().await?;
    let port = self.container.get_host_port_ipv4(ZK_CONTAINER_PORT).await?;
    Ok(format!("{host}:{port}"))
  }

  /// runs `zkCli.sh <args>` inside the container and collects its output
  pub async fn cli(
    &self,
    args: &[&str],
  ) -> Result<CliOutput, ClusterError> {
    let cmd: Vec<&str> = std::iter::once(ZK_CLI_PATH).chain(args.iter().copied()).collect();
    let mut result = self.container.exec(ExecCommand::new(cmd).with_cmd_ready_condition(CmdWaitFor::exit())).await?;

    let exit_code = result.exit_code().await?;
    let stdout = String::from_utf8_lossy(&result.stdout_to_vec().await?).into_owned();
    let stderr = String::from_utf8_lossy(&result.stderr_to_vec().await?).into_owned();
    Ok(CliOutput { exit_code, stdout, stderr })
  }

  /// `zkCli.sh create <path>`, fails when the cli reports an error. Not retried
  pub async fn create_znode(
    &self,
    path: &str,
  ) -> Result<(), ClusterError> {
    let output = self.cli(&[CREATE_CMD, path]).await?;
    if output.failed() {
      return Err(ClusterError::ZnodeCreation {
        path: path.to_string(),
        exit_code: output.exit_code,
        output: format!("{}{}", output.stdout, output.stderr),
      });
    }
    debug!("znode {path} created");
    Ok(())
  }

  /// `zkCli.sh ls <path>`
  pub async fn children(
    &self,
    path: &str,
  ) -> Result<Vec<String>, ClusterError> {
    let output = self.cli(&[LS_CMD, path]).await?;
    if output.failed() {
      return Err(ClusterError::ZnodeRead { path: path.to_string(), output: format!("{}{}", output.stdout, output.stderr) });
    }
    Ok(parse_children(&output.stdout))
  }

  pub async fn stop(&self) -> Result<(), ClusterError> {
    info!("stopping zookeeper {}", self.id());
    self.container.stop().await?;
    Ok(())
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliOutput {
  pub exit_code: Option<i64>,
  pub stdout: String,
  pub stderr: String,
}

impl CliOutput {
  pub fn failed(&self) -> bool {
    self.exit_code != Some(0)
      || FAILURE_MARKERS.iter().any(|m| self.stdout.contains(m) || self.stderr.contains(m))
  }
}

/// `ls` prints connection logs first, the children come as the last `[a, b]` line
fn parse_children(stdout: &str) -> Vec<String> {
  stdout
    .lines()
    .map(str::trim)
    .filter(|l| l.starts_with('[') && l.ends_with(']'))
    .last()
    .map(|l| {
      l[1..l.len() - 1].split(',').map(str::trim).filter(|c| !c.is_empty()).map(String::from).collect()
    })
    .unwrap_or_default()
}
