pub mod folder;
pub mod image;
pub mod item;
pub mod library;
pub mod system;
