//! wn-inp: serialization to the hydraulic solver's sectioned text format.

pub mod writer;

pub use writer::write_inp;

pub type InpResult<T> = Result<T, InpError>;

#[derive(thiserror::Error, Debug)]
pub enum InpError {
    /// A link endpoint does not resolve; no file is emitted.
    #[error("Incomplete network: link '{link_id}' references missing node '{node_id}'")]
    IncompleteNetwork { link_id: String, node_id: String },

    #[error("Projection error: {0}")]
    Projection(#[from] wn_geo::GeoError),
}
