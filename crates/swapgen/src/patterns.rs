//! Les trois formes de ligne reconnues dans le header.
//!
//! ```text
//! ouverture : ^\s*struct\s+(<struct_prefix>(\w+))\s*\{\s*$
//! fermeture : ^\s*\}\s*;\s*$
//! champ     : ^\s*__le(\d+)\s+(\w+)\s*;\s*$
//! ```
//!
//! Les classes `\s`, `\w` et `\d` sont ASCII (`(?-u)`) : `struct squashfs_été {`
//! n'est pas une ouverture.
//!
//! Seul le motif d'ouverture dépend de la configuration (préfixe des
//! structures) ; les deux autres sont compilés une fois pour toutes.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::{BitWidth, Naming};
use crate::error::{Error, Result};

static CLOSE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?-u)^\s*\}\s*;\s*$").expect("motif de fermeture"));
static FIELD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?-u)^\s*__le(\d+)\s+(\w+)\s*;\s*$").expect("motif de champ"));

/// Ouverture de structure reconnue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordOpen<'a> {
    /// Nom complet, ex. `squashfs_super_block`.
    pub record: &'a str,
    /// Partie distinctive, ex. `super_block`.
    pub suffix: &'a str,
}

/// Champ `__leN nom;` dont la largeur est connue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDecl<'a> {
    pub width: BitWidth,
    pub name: &'a str,
}

/// Classification d'une ligne.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    Open(RecordOpen<'a>),
    Close,
    Field(FieldDecl<'a>),
    /// `__leN nom;` avec une largeur sans primitive connue (`__le128`, `__le12`…).
    UnknownWidth { bits: &'a str, name: &'a str },
    Other,
}

/// Motifs compilés pour une convention de nommage donnée.
#[derive(Debug, Clone)]
pub struct Patterns {
    open: Regex,
}

impl Patterns {
    pub fn new(naming: &Naming) -> Result<Self> {
        let src = format!(
            r"(?-u)^\s*struct\s+({}(\w+))\s*\{{\s*$",
            regex::escape(&naming.struct_prefix)
        );
        let open = Regex::new(&src).map_err(|e| Error::Config(format!("motif d'ouverture: {e}")))?;
        Ok(Self { open })
    }

    /// Hors structure, seule l'ouverture est testée. Dans une structure : la
    /// fermeture d'abord, puis le champ, puis l'ouverture (imbrication).
    pub fn classify<'a>(&self, line: &'a str, inside: bool) -> LineKind<'a> {
        if !inside {
            return self.match_open(line).map_or(LineKind::Other, LineKind::Open);
        }
        if CLOSE_RE.is_match(line) {
            return LineKind::Close;
        }
        if let Some(kind) = match_field(line) {
            return kind;
        }
        self.match_open(line).map_or(LineKind::Other, LineKind::Open)
    }

    fn match_open<'a>(&self, line: &'a str) -> Option<RecordOpen<'a>> {
        let caps = self.open.captures(line)?;
        Some(RecordOpen { record: caps.get(1)?.as_str(), suffix: caps.get(2)?.as_str() })
    }
}

fn match_field(line: &str) -> Option<LineKind<'_>> {
    let caps = FIELD_RE.captures(line)?;
    let bits = caps.get(1)?.as_str();
    let name = caps.get(2)?.as_str();
    let width = bits.parse::<u32>().ok().and_then(BitWidth::from_bits);
    Some(match width {
        Some(width) => LineKind::Field(FieldDecl { width, name }),
        None => LineKind::UnknownWidth { bits, name },
    })
}
