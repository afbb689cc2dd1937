use crate::model::diet::DietState;
use anyhow::Result;

/// Opaque blob store holding the whole state tree under one root key.
pub trait DietRepository {
    /// `None` when nothing has been saved yet.
    fn load(&self) -> Result<Option<DietState>>;
    fn save(&self, state: &DietState) -> Result<()>;
}
