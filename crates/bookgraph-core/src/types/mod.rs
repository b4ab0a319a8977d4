//! Domain types shared by the build and query phases

mod bundle;
mod record;
mod triplet;

pub use bundle::ContextBundle;
pub use record::Record;
pub use triplet::{GraphNode, Triplet, TripletId};
