//! URL handling module for Garimpo
//!
//! This module provides the pagination-parameter manipulation used to walk
//! a site's result pages when no usable "next page" link is present in the
//! markup.

mod pagination;

pub use pagination::{next_offset_url, offset_value, with_offset};
