use common::probe::LineProbe;

/// memcached text protocol `set`, true when the node answers `STORED`
pub async fn set_value(
  endpoint: &str,
  key: &str,
  value: &str,
) -> bool {
  let request = format!("set {key} 0 10 {}\r\n{value}\r\n", value.len());
  LineProbe::new(request, "STORED").check(endpoint).await
}

pub async fn get_value(
  endpoint: &str,
  key: &str,
  value: &str,
) -> bool {
  let expected = format!("VALUE {key} 0 {}\r\n{value}\r\n", value.len());
  LineProbe::new(format!("get {key}\r\n"), expected).check(endpoint).await
}
