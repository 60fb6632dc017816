#![forbid(unsafe_code)]
#![cfg_attr(docs_rs, feature(doc_cfg))]

//! Decode PNG data into an owned pixel buffer, edit regions of it, and encode
//! it again.
//!
//! The central type is [`PngImage`]. It owns its pixel bytes plus the header
//! data of the PNG it came from, and offers typed pixel access ([`Color`]) and
//! region operations:
//!
//! * [`fill`](PngImage::fill) and [`set`](PngImage::set) write colors.
//! * [`copy_from`](PngImage::copy_from) copies a rectangle from another image.
//! * [`resize_canvas`](PngImage::resize_canvas) and [`crop`](PngImage::crop)
//!   change the canvas.
//!
//! ```
//! use pngimage::{Color, EncodeOptions, Point, Rect};
//!
//! let orange = [255_u8, 128, 64].repeat(32 * 16);
//! let bytes = pngimage::encode(&orange, &EncodeOptions::new().width(32).height(16)).unwrap();
//! let mut image = pngimage::decode(&bytes).unwrap();
//! image.fill(Color::rgb(0, 0, 128), Some(Rect::new(0, 0, 4, 4))).unwrap();
//! image.set(Color::rgb(1, 2, 3), Point::new(31, 15)).unwrap();
//! assert_eq!(image.at(2, 2).unwrap(), Some(Color::rgb(0, 0, 128)));
//! assert_eq!(image.at(5, 5).unwrap(), Some(Color::rgb(255, 128, 64)));
//! ```
//!
//! Files can be read and written blocking, with a callback on a new thread,
//! or (with the `tokio` feature) as futures. All three forms run the same
//! code.
//!
//! The [`png`] module holds the codec itself, and [`raw`] the region
//! operations on bare buffers.

extern crate alloc;

pub mod codec;
pub use codec::*;

pub mod color;
pub use color::*;

pub mod error;
pub use error::*;

mod image;
pub use image::*;

pub mod pixel_formats;
pub use pixel_formats::*;

pub mod png;
pub use png::{InterlaceMode, PngTime};

pub mod point;
pub use point::*;

pub mod raw;

pub mod rect;
pub use rect::*;

mod region;
pub use region::*;
