// Integration tests that start real containers through the local Docker daemon.
// They are ignored by default.

/// Run them with: `cargo test -p integration-dockerized -- --ignored --test-threads=1`
/// Clusters publish fixed host ports, so parallel runs would collide.
#[cfg(test)]
mod arcus_cluster;
#[cfg(test)]
mod arcus_container;
#[cfg(test)]
mod helpers;
#[cfg(test)]
mod zookeeper;
