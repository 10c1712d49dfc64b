//! Item id to image file, and image file to response.

pub mod delivery;
pub mod resolver;

pub use delivery::{
    ContentDelivery, DEFAULT_STREAM_THRESHOLD_BYTES, DeliveryBody,
    DeliveryPolicy, DeliveryStrategy, IMAGE_CACHE_CONTROL, IMAGE_DATA_HEADER,
    ImageDelivery,
};
pub use resolver::{ImageResolver, ResolvedImage};
