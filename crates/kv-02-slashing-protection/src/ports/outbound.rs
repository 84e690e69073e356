//! Outbound port (Driven Port)

use crate::domain::VoteRecord;
use crate::error::SlashingResult;
use shared_types::BlsPublicKey;

/// Persistence for vote records.
///
/// `save` must be durable when it returns `Ok`. Implementations serialize
/// their own raw access; the engine serializes validation per key.
pub trait SlashingStore: Send + Sync {
    fn load(&self, public_key: &BlsPublicKey) -> SlashingResult<Option<VoteRecord>>;

    fn save(&self, public_key: &BlsPublicKey, record: &VoteRecord) -> SlashingResult<()>;

    /// All stored records, sorted by public key.
    fn load_all(&self) -> SlashingResult<Vec<(BlsPublicKey, VoteRecord)>>;
}
