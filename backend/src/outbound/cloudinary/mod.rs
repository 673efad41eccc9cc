//! Cloudinary adapter for the image store port.

mod dto;
mod http_image_store;
mod signing;

pub use http_image_store::{CloudinaryCredentials, CloudinaryImageStore, DEFAULT_CLOUDINARY_ENDPOINT};
pub use signing::{SignatureAlgorithm, UnknownSignatureAlgorithm};
