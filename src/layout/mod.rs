//! Masonry layout for the gallery: breakpoints, aspect-ratio estimates and the
//! column balancer.

pub mod aspect;
pub mod balancer;

pub use balancer::{ColumnBalancer, ColumnSnapshot};

pub const TABLET_MIN_WIDTH: u32 = 768;
pub const DESKTOP_MIN_WIDTH: u32 = 1024;

/// Maps a viewport width in CSS pixels to the number of gallery columns.
pub fn columns_for_width(width: u32) -> usize {
    if width >= DESKTOP_MIN_WIDTH {
        3
    } else if width >= TABLET_MIN_WIDTH {
        2
    } else {
        1
    }
}
