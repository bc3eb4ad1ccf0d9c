//! Stateful world-object components: the task producers of the world.

use serde::{Deserialize, Serialize};

/// Storage hut - accepts carried resources while it has spare capacity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Storage {
    pub food: u32,
    pub wood: u32,
    pub capacity: u32,
}

impl Storage {
    pub fn new(capacity: u32) -> Self {
        Self {
            food: 0,
            wood: 0,
            capacity,
        }
    }

    pub fn stored(&self) -> u32 {
        self.food + self.wood
    }

    pub fn free_space(&self) -> u32 {
        self.capacity.saturating_sub(self.stored())
    }
}

/// Bonfire - consumes fuel over time; asks for refueling below a threshold
/// and offers warmth slots while lit.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Bonfire {
    pub fuel: f32,
    pub max_fuel: f32,
    /// Fraction of max_fuel below which a FuelBonfire task is produced
    pub refuel_below: f32,
    /// How many entities can warm themselves at once
    pub warmth_slots: usize,
    /// Radius within which warmth is felt
    pub warmth_radius: f32,
}

impl Bonfire {
    pub fn new(max_fuel: f32) -> Self {
        Self {
            fuel: max_fuel,
            max_fuel,
            refuel_below: 0.3,
            warmth_slots: 4,
            warmth_radius: 3.0,
        }
    }

    pub fn is_lit(&self) -> bool {
        self.fuel > 0.0
    }

    pub fn needs_fuel(&self) -> bool {
        self.fuel < self.refuel_below * self.max_fuel
    }

    /// Burn down over time.
    pub fn burn(&mut self, hours: f32) {
        self.fuel = (self.fuel - hours).max(0.0);
    }

    /// One log of wood buys this much fuel.
    pub fn add_fuel(&mut self, logs: u32) {
        self.fuel = (self.fuel + logs as f32 * 2.0).min(self.max_fuel);
    }
}

/// Berry bush - holds a regrowing food stock.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Bush {
    pub stock: u32,
    pub max_stock: u32,
    pub regrow_per_hour: f32,
    /// Fractional regrowth accumulator
    pub regrowth: f32,
}

impl Bush {
    pub fn new(stock: u32, max_stock: u32) -> Self {
        Self {
            stock,
            max_stock,
            regrow_per_hour: 0.25,
            regrowth: 0.0,
        }
    }

    pub fn has_stock(&self) -> bool {
        self.stock > 0
    }

    pub fn regrow(&mut self, hours: f32) {
        self.regrowth += self.regrow_per_hour * hours;
        while self.regrowth >= 1.0 && self.stock < self.max_stock {
            self.stock += 1;
            self.regrowth -= 1.0;
        }
        if self.stock >= self.max_stock {
            self.regrowth = 0.0;
        }
    }

    /// Take up to `amount` berries, returning how many came off.
    pub fn take(&mut self, amount: u32) -> u32 {
        let taken = amount.min(self.stock);
        self.stock -= taken;
        taken
    }
}

/// Tree - standing until chopped; felled trees hold loose wood.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Tree {
    pub standing: bool,
    pub wood: u32,
    /// Accumulated felling work, 0.0..=1.0
    pub fell_progress: f32,
}

impl Tree {
    pub fn new(wood: u32) -> Self {
        Self {
            standing: true,
            wood,
            fell_progress: 0.0,
        }
    }

    /// Apply one tick of chopping; returns true once the tree comes down.
    pub fn chop(&mut self, work: f32) -> bool {
        if !self.standing {
            return true;
        }
        self.fell_progress += work;
        if self.fell_progress >= 1.0 {
            self.standing = false;
        }
        !self.standing
    }

    pub fn take_wood(&mut self, amount: u32) -> u32 {
        let taken = amount.min(self.wood);
        self.wood -= taken;
        taken
    }
}

/// Corpse - decays until buried or gone.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Corpse {
    /// 0.0 fresh .. 1.0 fully decayed
    pub decay: f32,
}

impl Corpse {
    pub fn new() -> Self {
        Self { decay: 0.0 }
    }

    pub fn rot(&mut self, hours: f32) {
        self.decay = (self.decay + hours / 72.0).clamp(0.0, 1.0);
    }
}

impl Default for Corpse {
    fn default() -> Self {
        Self::new()
    }
}
