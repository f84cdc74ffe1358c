use crate::effect::EffectDefinition;
use crate::state::EffectId;

pub trait EffectOracle: Send + Sync {
    fn effect(&self, id: EffectId) -> Option<&EffectDefinition>;
}
