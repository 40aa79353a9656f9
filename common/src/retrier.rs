use std::future::Future;
use std::time::Duration;

/// calls `f` until it returns `true` or intervals are exhausted
/// sleeps for the next interval between attempts
/// returns the last outcome of `f`
pub async fn retry<F, Fut>(
  intervals: Vec<Duration>,
  mut f: F,
) -> bool
where
  F: FnMut() -> Fut,
  Fut: Future<Output = bool>,
{
  if f().await {
    return true;
  }

  for i in intervals {
    tokio::time::sleep(i).await;
    if f().await {
      return true;
    }
  }

  false
}

pub fn exp_intervals(
  count: usize,
  start_interval: Duration,
) -> Vec<Duration> {
  (0..count).map(|i| start_interval * 2_u32.pow(i as u32)).collect()
}

/// like `exp_intervals` but no single interval grows above `cap`
pub fn capped_exp_intervals(
  count: usize,
  start_interval: Duration,
  cap: Duration,
) -> Vec<Duration> {
  exp_intervals(count, start_interval).into_iter().map(|i| i.min(cap)).collect()
}
