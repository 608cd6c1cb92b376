pub mod aspect;
pub mod embedding;
pub mod ids;
pub mod property;

pub use aspect::{AspectKind, AspectMap};
pub use embedding::{AspectEmbedding, CompositeEmbedding, Neighbour};
pub use ids::PropertyId;
pub use property::{ListingStatus, RawProperty, STATUS_FIELD};
