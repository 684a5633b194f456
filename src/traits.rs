use crate::store::DocumentStore;

pub trait StoreProvider {
    /// Returns the document store handlers operate on.
    fn store(&self) -> &dyn DocumentStore;
}
