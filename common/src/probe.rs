use crate::retrier::{capped_exp_intervals, retry};
use log::{debug, info};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

const READ_TIMEOUT: Duration = Duration::from_secs(2);

/// text request/response check against a TCP endpoint
/// ex: zookeeper `srvr` or memcached `version`
#[derive(Debug, Clone)]
pub struct LineProbe {
  pub request: String,
  pub expected_prefix: String,
}

impl LineProbe {
  pub fn new(
    request: impl Into<String>,
    expected_prefix: impl Into<String>,
  ) -> LineProbe {
    LineProbe { request: request.into(), expected_prefix: expected_prefix.into() }
  }

  /// one attempt: connect, write the request, read until the peer closes or the buffer has enough bytes
  pub async fn check(
    &self,
    endpoint: &str,
  ) -> bool {
    let mut stream = match TcpStream::connect(endpoint).await {
      Ok(s) => s,
      Err(e) => {
        debug!("probe {endpoint}: connect: {e}");
        return false;
      }
    };

    if let Err(e) = stream.write_all(self.request.as_bytes()).await {
      debug!("probe {endpoint}: write: {e}");
      return false;
    }

    let expected = self.expected_prefix.as_bytes();
    let mut received = Vec::with_capacity(expected.len());
    let mut buf = [0u8; 256];

    while received.len() < expected.len() {
      match tokio::time::timeout(READ_TIMEOUT, stream.read(&mut buf)).await {
        Ok(Ok(0)) => break,
        Ok(Ok(n)) => received.extend_from_slice(&buf[..n]),
        Ok(Err(e)) => {
          debug!("probe {endpoint}: read: {e}");
          return false;
        }
        Err(_) => {
          debug!("probe {endpoint}: read timed out");
          return false;
        }
      }
    }

    received.starts_with(expected)
  }

  /// retries `check` with exponential backoff until `attempts` are used up
  pub async fn wait_ready(
    &self,
    endpoint: &str,
    attempts: usize,
  ) -> bool {
    let intervals = capped_exp_intervals(attempts, Duration::from_millis(100), Duration::from_secs(2));
    let ready = retry(intervals, || self.check(endpoint)).await;
    if ready {
      info!("{endpoint} is ready");
    }
    ready
  }
}
