use bimap::BiMap;
use num_enum::{IntoPrimitive, TryFromPrimitive};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Registers and status flags that are always in scope.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    IntoPrimitive,
    TryFromPrimitive,
    EnumString,
    Display,
)]
#[repr(u8)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Builtin {
    A,
    X,
    Y,
    S,
    P,
    Carry,
    Interrupt,
    Decimal,
    Overflow,
    Zero,
    Negative,
}

pub static BUILTINS: Lazy<BiMap<&'static str, Builtin>> = Lazy::new(|| {
    let mut map = BiMap::new();
    map.insert("a", Builtin::A);
    map.insert("x", Builtin::X);
    map.insert("y", Builtin::Y);
    map.insert("s", Builtin::S);
    map.insert("p", Builtin::P);
    map.insert("carry", Builtin::Carry);
    map.insert("interrupt", Builtin::Interrupt);
    map.insert("decimal", Builtin::Decimal);
    map.insert("overflow", Builtin::Overflow);
    map.insert("zero", Builtin::Zero);
    map.insert("negative", Builtin::Negative);
    map
});

impl Builtin {
    pub fn lookup(name: &str) -> Option<Self> {
        BUILTINS.get_by_left(name).copied()
    }

    pub fn name(self) -> &'static str {
        BUILTINS.get_by_right(&self).copied().unwrap_or_default()
    }

    pub fn all() -> impl Iterator<Item = Builtin> {
        (0u8..).map_while(|n| Builtin::try_from(n).ok())
    }
}
