//! # Event
//! Events are the basic unit of the store. The state is simply the result of applying the log of events, in order.
//! Events must be versionable: what gets exported is a tagged JSON rendition (`"v1.Something"`), so the in-memory
//! type can evolve without breaking logs that were already written out.

pub trait Event: Sized + Clone + std::fmt::Debug {
    /// Versioned name, e.g. `v1.ItemCreated`. Used for logging.
    fn name(&self) -> &'static str;

    fn to_json(&self) -> Result<serde_json::Value, serde_json::Error>;
    fn from_json(json: &serde_json::Value) -> Result<Self, serde_json::Error>;
}
