//! Docker backed test fixtures for Arcus memcached.
//!
//! `ArcusContainer` runs a single cache node, `ArcusCluster` runs a zookeeper plus
//! several cache nodes registered under one service code.

pub mod address;
pub mod cluster;
pub mod container;
pub mod docker;
pub mod error;
pub mod image;
pub mod props;
pub mod znode;
pub mod zookeeper;

pub use address::CacheNodeAddress;
pub use cluster::ArcusCluster;
pub use container::ArcusContainer;
pub use error::{AddressParseError, ClusterError, ImageParseError, PropsError};
pub use image::ImageName;
pub use props::{ArcusContainerProps, ArcusContainerPropsBuilder};
