use serde::{Deserialize, Serialize};

/// Capabilities a particle can hold.
///
/// The last three kinds are carried in the table and inherited like the others
/// but have no executing behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AbilityKind {
    Eating,
    Splitting,
    Reproduction,
    Phasing,
    Chase,
    Flee,
    SpeedBurst,
    CustomAttraction,
    EnergyTransfer,
    Camouflage,
}

pub const ABILITY_COUNT: usize = 10;

pub const ALL_ABILITIES: [AbilityKind; ABILITY_COUNT] = [
    AbilityKind::Eating,
    AbilityKind::Splitting,
    AbilityKind::Reproduction,
    AbilityKind::Phasing,
    AbilityKind::Chase,
    AbilityKind::Flee,
    AbilityKind::SpeedBurst,
    AbilityKind::CustomAttraction,
    AbilityKind::EnergyTransfer,
    AbilityKind::Camouflage,
];

impl AbilityKind {
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Continuous abilities run every tick they are selected and never cool down.
    pub const fn is_continuous(self) -> bool {
        matches!(self, AbilityKind::Chase | AbilityKind::Flee)
    }
}

/// One slot of the ability table.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, Default, PartialEq)]
pub struct AbilitySlot {
    pub held: bool,
    pub cooldown_remaining: f64,
    pub cooldown_duration: f64,
}

impl AbilitySlot {
    #[inline]
    pub fn is_ready(&self) -> bool {
        self.held && self.cooldown_remaining <= 0.0
    }
}

/// Fixed-size ability table indexed by [`AbilityKind`].
#[derive(Clone, Copy, Debug, Serialize, Deserialize, Default, PartialEq)]
pub struct AbilityTable {
    slots: [AbilitySlot; ABILITY_COUNT],
}

impl AbilityTable {
    pub fn from_kinds(kinds: &[AbilityKind]) -> Self {
        let mut table = Self::default();
        for &kind in kinds {
            table.grant(kind);
        }
        table
    }

    #[inline]
    pub fn has(&self, kind: AbilityKind) -> bool {
        self.slots[kind.index()].held
    }

    pub fn grant(&mut self, kind: AbilityKind) {
        let slot = &mut self.slots[kind.index()];
        slot.held = true;
    }

    /// Held and off cooldown.
    #[inline]
    pub fn is_ready(&self, kind: AbilityKind) -> bool {
        self.slots[kind.index()].is_ready()
    }

    pub fn trigger_cooldown(&mut self, kind: AbilityKind, duration: f64) {
        let slot = &mut self.slots[kind.index()];
        slot.cooldown_duration = duration.max(0.0);
        slot.cooldown_remaining = slot.cooldown_duration;
    }

    /// Counts every running cooldown down by `dt`.
    pub fn tick_cooldowns(&mut self, dt: f64) {
        for slot in self.slots.iter_mut().filter(|s| s.cooldown_remaining > 0.0) {
            slot.cooldown_remaining = (slot.cooldown_remaining - dt).max(0.0);
        }
    }

    pub fn held(&self) -> impl Iterator<Item = AbilityKind> + '_ {
        ALL_ABILITIES.into_iter().filter(|k| self.has(*k))
    }

    pub fn count(&self) -> usize {
        self.slots.iter().filter(|s| s.held).count()
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }
}
