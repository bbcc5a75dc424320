//! Weapon catalog and ammunition bookkeeping
//!
//! Every weapon is described by the same immutable [`WeaponProfile`]; the
//! multi-pellet shotgun is just a profile with `pellets > 1`.

use serde::{Deserialize, Serialize};

/// Weapon slots, in key order (1, 2, 3)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WeaponKind {
    /// Primary: unlimited ammo, fast and light
    Smg,
    /// Secondary: finite ammo, medium
    Rifle,
    /// Tertiary: finite ammo, multi-pellet spread
    Shotgun,
}

impl WeaponKind {
    pub const ALL: [WeaponKind; 3] = [WeaponKind::Smg, WeaponKind::Rifle, WeaponKind::Shotgun];

    /// Zero-based index used for per-weapon tables
    pub const fn index(self) -> usize {
        match self {
            WeaponKind::Smg => 0,
            WeaponKind::Rifle => 1,
            WeaponKind::Shotgun => 2,
        }
    }

    /// Keyboard slot (1-based)
    pub const fn slot(self) -> u8 {
        self.index() as u8 + 1
    }

    pub fn from_slot(slot: u8) -> Option<Self> {
        match slot {
            1 => Some(WeaponKind::Smg),
            2 => Some(WeaponKind::Rifle),
            3 => Some(WeaponKind::Shotgun),
            _ => None,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            WeaponKind::Smg => "SMG",
            WeaponKind::Rifle => "Assault Rifle",
            WeaponKind::Shotgun => "Shotgun",
        }
    }
}

/// Rounds held for one weapon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ammo {
    Unlimited,
    Rounds(u32),
}

impl Ammo {
    pub fn is_unlimited(self) -> bool {
        matches!(self, Ammo::Unlimited)
    }

    /// True if at least one trigger pull is available
    pub fn can_fire(self) -> bool {
        match self {
            Ammo::Unlimited => true,
            Ammo::Rounds(n) => n > 0,
        }
    }

    /// Spend one round. Returns false (and changes nothing) when empty.
    pub fn consume(&mut self) -> bool {
        match self {
            Ammo::Unlimited => true,
            Ammo::Rounds(0) => false,
            Ammo::Rounds(n) => {
                *n -= 1;
                true
            }
        }
    }

    /// Add rounds, never exceeding `capacity`
    pub fn refill(&mut self, amount: u32, capacity: Ammo) {
        if let Ammo::Rounds(n) = self {
            *n = match capacity {
                Ammo::Unlimited => n.saturating_add(amount),
                Ammo::Rounds(cap) => n.saturating_add(amount).min(cap.max(*n)),
            };
        }
    }

    /// HUD text ("∞" for unlimited)
    pub fn label(self) -> String {
        match self {
            Ammo::Unlimited => "∞".to_string(),
            Ammo::Rounds(n) => n.to_string(),
        }
    }
}

/// Immutable combat parameters for one weapon
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeaponProfile {
    /// Damage per projectile
    pub damage: f64,
    /// Minimum milliseconds between trigger pulls
    pub fire_interval_ms: f64,
    /// Full width of the uniform angular jitter (radians); each shot gets +-spread/2
    pub spread: f64,
    /// Projectile speed (field units per step)
    pub projectile_speed: f64,
    /// Projectiles per firing direction
    #[serde(default = "default_pellets")]
    pub pellets: u32,
    /// Display color as 0xRRGGBB
    pub color: u32,
    /// Maximum rounds the weapon can hold
    pub ammo_capacity: Ammo,
    /// Rounds at session start
    pub starting_ammo: Ammo,
}

fn default_pellets() -> u32 {
    1
}

impl WeaponProfile {
    /// Built-in balance for each weapon
    pub const fn standard(kind: WeaponKind) -> Self {
        match kind {
            WeaponKind::Smg => Self {
                damage: 28.0,
                fire_interval_ms: 30.0,
                spread: 0.15,
                projectile_speed: 14.0,
                pellets: 1,
                color: 0xfbbf24, // amber
                ammo_capacity: Ammo::Unlimited,
                starting_ammo: Ammo::Unlimited,
            },
            WeaponKind::Rifle => Self {
                damage: 30.0,
                fire_interval_ms: 25.0,
                spread: 0.1,
                projectile_speed: 15.0,
                pellets: 1,
                color: 0x60a5fa, // blue
                ammo_capacity: Ammo::Rounds(300),
                starting_ammo: Ammo::Rounds(120),
            },
            WeaponKind::Shotgun => Self {
                damage: 22.0,
                fire_interval_ms: 200.0,
                spread: 0.4,
                projectile_speed: 12.0,
                pellets: 6,
                color: 0xf87171, // red
                ammo_capacity: Ammo::Rounds(50),
                starting_ammo: Ammo::Rounds(24),
            },
        }
    }

    /// Color as linear-ish RGBA floats for the renderer
    pub fn rgba(&self) -> [f32; 4] {
        hex_to_rgba(self.color)
    }

    /// Color as a CSS hex string
    pub fn css_color(&self) -> String {
        format!("#{:06x}", self.color & 0xff_ffff)
    }
}

/// Convert 0xRRGGBB to `[r, g, b, 1.0]`
pub fn hex_to_rgba(color: u32) -> [f32; 4] {
    let r = ((color >> 16) & 0xff) as f32 / 255.0;
    let g = ((color >> 8) & 0xff) as f32 / 255.0;
    let b = (color & 0xff) as f32 / 255.0;
    [r, g, b, 1.0]
}

/// One profile per weapon kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeaponCatalog {
    pub smg: WeaponProfile,
    pub rifle: WeaponProfile,
    pub shotgun: WeaponProfile,
}

impl Default for WeaponCatalog {
    fn default() -> Self {
        Self {
            smg: WeaponProfile::standard(WeaponKind::Smg),
            rifle: WeaponProfile::standard(WeaponKind::Rifle),
            shotgun: WeaponProfile::standard(WeaponKind::Shotgun),
        }
    }
}

impl WeaponCatalog {
    pub fn get(&self, kind: WeaponKind) -> &WeaponProfile {
        match kind {
            WeaponKind::Smg => &self.smg,
            WeaponKind::Rifle => &self.rifle,
            WeaponKind::Shotgun => &self.shotgun,
        }
    }
}

/// Ammunition for every weapon the player carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Arsenal {
    rounds: [Ammo; 3],
}

impl Arsenal {
    /// Starting loadout from the catalog
    pub fn new(catalog: &WeaponCatalog) -> Self {
        let mut rounds = [Ammo::Rounds(0); 3];
        for kind in WeaponKind::ALL {
            rounds[kind.index()] = catalog.get(kind).starting_ammo;
        }
        Self { rounds }
    }

    pub fn get(&self, kind: WeaponKind) -> Ammo {
        self.rounds[kind.index()]
    }

    pub fn set(&mut self, kind: WeaponKind, ammo: Ammo) {
        self.rounds[kind.index()] = ammo;
    }

    pub fn consume(&mut self, kind: WeaponKind) -> bool {
        self.rounds[kind.index()].consume()
    }

    pub fn refill(&mut self, kind: WeaponKind, amount: u32, capacity: Ammo) {
        self.rounds[kind.index()].refill(amount, capacity);
    }

    /// `(kind, ammo)` pairs in slot order
    pub fn iter(&self) -> impl Iterator<Item = (WeaponKind, Ammo)> + '_ {
        WeaponKind::ALL.into_iter().map(|k| (k, self.get(k)))
    }
}
