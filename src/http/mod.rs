//! HTTP helper modules: MIME detection, CORS headers, response builders.

pub mod cors;
pub mod mime;
pub mod response;

pub use response::{
    build_404_response, build_file_response, build_listing_response, build_redirect_response,
};
