//! # Eagle Bridge Core
//!
//! Core of a local gateway between web clients and an Eagle media-library
//! host application running on the same machine.
//!
//! ## Overview
//!
//! - [`library`]: discovers `*.library` directories under a search root
//! - [`session`]: the host's active library, and pass-through calls to its API
//! - [`image`]: resolves an item id to an image file (original, falling back
//!   to the thumbnail) and prepares it for delivery
//! - [`host`]: the [`HostApi`] port and its HTTP implementation
//!
//! Nothing here depends on the HTTP server; `eagle-bridge-server` maps these
//! types onto routes.

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod error;
pub mod host;
pub mod image;
pub mod library;
pub mod session;
pub mod types;

pub use error::{GatewayError, Result};
pub use host::{EagleClient, HostApi};
pub use image::{
    ContentDelivery, DeliveryBody, DeliveryPolicy, DeliveryStrategy,
    ImageDelivery, ImageResolver, ResolvedImage,
};
pub use library::LibraryRegistry;
pub use session::ActiveLibrarySession;
pub use types::{FolderSummary, ItemMetadata, ItemSummary, Library};
