use crate::env::{GameEnv, ItemDrop, OracleError};
use crate::state::OpponentTemplateId;

/// Spoils of a won encounter, summed over every opponent template.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rewards {
    pub experience: u32,
    /// One entry per item id, in first-seen order.
    pub items: Vec<ItemDrop>,
    /// Progress flags to set.
    pub flags: Vec<String>,
}

impl Rewards {
    pub fn from_templates(
        templates: impl IntoIterator<Item = OpponentTemplateId>,
        env: &GameEnv<'_>,
    ) -> Result<Self, OracleError> {
        let mut rewards = Self::default();
        for id in templates {
            let template = env.opponent(id)?;
            rewards.experience = rewards.experience.saturating_add(template.experience);
            for drop in &template.drops {
                rewards.add_item(*drop);
            }
            for flag in &template.grants_flags {
                if !rewards.flags.contains(flag) {
                    rewards.flags.push(flag.clone());
                }
            }
        }
        Ok(rewards)
    }

    fn add_item(&mut self, drop: ItemDrop) {
        match self.items.iter_mut().find(|d| d.item == drop.item) {
            Some(existing) => existing.count = existing.count.saturating_add(drop.count),
            None => self.items.push(drop),
        }
    }
}
