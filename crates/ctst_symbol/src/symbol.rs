//! A single entry of an artifact's symbol table.

use core::fmt::{Display, Formatter, Result};

/// Section classification of a symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Code,
    Data,
}

/// Linkage visibility reported by the symbol table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Linkage {
    Global,
    Local,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SymbolClass {
    pub kind: SymbolKind,
    pub linkage: Linkage,
}

impl SymbolClass {
    pub const CODE_GLOBAL: Self = Self::new(SymbolKind::Code, Linkage::Global);
    pub const CODE_LOCAL: Self = Self::new(SymbolKind::Code, Linkage::Local);
    pub const DATA_GLOBAL: Self = Self::new(SymbolKind::Data, Linkage::Global);
    pub const DATA_LOCAL: Self = Self::new(SymbolKind::Data, Linkage::Local);

    pub const fn new(kind: SymbolKind, linkage: Linkage) -> Self {
        Self { kind, linkage }
    }

    /// Maps an `nm` type letter onto a class. Upper case letters are
    /// global, lower case local; anything other than text, data or bss
    /// has no meaning for the harness.
    pub fn from_nm_letter(letter: char) -> Option<Self> {
        let kind = match letter.to_ascii_uppercase() {
            'T' => SymbolKind::Code,
            'D' | 'B' => SymbolKind::Data,
            _ => return None,
        };
        let linkage = if letter.is_ascii_uppercase() {
            Linkage::Global
        } else {
            Linkage::Local
        };
        Some(Self::new(kind, linkage))
    }
}

impl Display for SymbolClass {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let kind = match self.kind {
            SymbolKind::Code => "code",
            SymbolKind::Data => "data",
        };
        let linkage = match self.linkage {
            Linkage::Global => "global",
            Linkage::Local => "local",
        };
        write!(f, "{kind}-{linkage}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SymbolRecord {
    pub name: String,
    pub class: SymbolClass,
}

impl SymbolRecord {
    pub fn new(name: impl Into<String>, class: SymbolClass) -> Self {
        Self {
            name: name.into(),
            class,
        }
    }
}

impl Display for SymbolRecord {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "{} ({})", self.name, self.class)
    }
}
