use super::{AggregateId, EntityMetadata};

/// Root of a stored record.
///
/// Implemented by every type kept in a record store: the store reads the id,
/// assigns a fresh one on add and maintains the lifecycle metadata.
pub trait AggregateRoot: Clone + Send + Sync {
    type Id: AggregateId;

    fn id(&self) -> &Self::Id;

    /// Set the identifier; called by the store only
    fn assign_id(&mut self, id: Self::Id);

    fn metadata(&self) -> &EntityMetadata;

    fn metadata_mut(&mut self) -> &mut EntityMetadata;

    /// Collection name used in logs (e.g. "transformers")
    fn collection_name() -> &'static str;

    /// UI name of one element, used in user-facing messages
    fn element_name() -> &'static str;
}
