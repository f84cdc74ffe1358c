use std::fmt;

/// Unique identifier for a participant tracked in the game or an encounter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityId(pub u32);

impl EntityId {
    /// Reserved identifier for the controllable player character.
    pub const PLAYER: Self = Self(0);

    /// Identifier of the `index`-th opponent of an encounter (0-based).
    #[inline]
    pub const fn opponent(index: usize) -> Self {
        Self(index as u32 + 1)
    }

    /// Returns true if this entity represents the player.
    #[inline]
    pub const fn is_player(self) -> bool {
        self.0 == Self::PLAYER.0
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::PLAYER
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Discrete board position expressed in tile coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoardPosition {
    pub x: i32,
    pub y: i32,
}

impl BoardPosition {
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl Default for BoardPosition {
    fn default() -> Self {
        Self::ORIGIN
    }
}

impl fmt::Display for BoardPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

macro_rules! content_id {
    ($(#[$meta:meta])* $name:ident($inner:ty), $prefix:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        pub struct $name(pub $inner);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, ":{}"), self.0)
            }
        }
    };
}

content_id!(
    /// Reference to a skill definition stored outside the state (lookup via Env).
    SkillId(u32),
    "skill"
);
content_id!(
    /// Reference to an item definition stored outside the state (lookup via Env).
    ItemId(u32),
    "item"
);
content_id!(
    /// Reference to an effect definition.
    EffectId(u32),
    "effect"
);
content_id!(
    /// Reference to a status effect template.
    StatusId(u16),
    "status"
);
content_id!(
    /// Reference to an opponent template.
    OpponentTemplateId(u16),
    "opponent"
);

/// Integer resource meter (health, mana/stamina) kept within `[0, maximum]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourceMeter {
    pub current: u32,
    pub maximum: u32,
}

impl ResourceMeter {
    pub fn new(current: u32, maximum: u32) -> Self {
        Self { current, maximum }
    }

    /// Meter filled to its maximum.
    pub fn full(maximum: u32) -> Self {
        Self::new(maximum, maximum)
    }

    /// Returns the change that `amount` would actually produce after clamping.
    pub fn clamped_change(&self, amount: i64) -> i32 {
        let target = (i64::from(self.current) + amount).clamp(0, i64::from(self.maximum));
        (target - i64::from(self.current)) as i32
    }

    /// Applies a signed change, clamping to `[0, maximum]`. Returns the applied change.
    pub fn apply(&mut self, amount: i64) -> i32 {
        let change = self.clamped_change(amount);
        self.current = (i64::from(self.current) + i64::from(change)) as u32;
        change
    }

    pub fn fill(&mut self) {
        self.current = self.maximum;
    }

    /// Raises the maximum, keeping the current value unchanged.
    pub fn grow(&mut self, amount: u32) {
        self.maximum = self.maximum.saturating_add(amount);
    }

    #[inline]
    pub fn is_depleted(&self) -> bool {
        self.current == 0
    }

    #[inline]
    pub fn is_within_bounds(&self) -> bool {
        self.current <= self.maximum
    }

    /// Current value as a percentage of the maximum (0 when the maximum is 0).
    pub fn percent(&self) -> u32 {
        if self.maximum == 0 {
            return 0;
        }
        ((u64::from(self.current) * 100) / u64::from(self.maximum)) as u32
    }
}

impl fmt::Display for ResourceMeter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.current, self.maximum)
    }
}
