use log::debug;
use std::io;
use std::net::TcpListener;

/// asks the OS for a free ephemeral port on the loopback interface
///
/// the listener is dropped before returning, so nothing reserves the port afterwards.
/// Whoever binds it later can lose the race against another process, fine for test fixtures
pub fn free_port() -> io::Result<u16> {
  let listener = TcpListener::bind("127.0.0.1:0")?;
  let port = listener.local_addr()?.port();
  debug!("allocated free port {port}");
  Ok(port)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_free_port_is_bindable() {
    let port = free_port().unwrap();
    assert_ne!(port, 0);

    let listener = TcpListener::bind(("127.0.0.1", port));
    assert!(listener.is_ok(), "port {port} should be free right after allocation");
  }
}
