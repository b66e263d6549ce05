//! config.rs — Convention de nommage et largeurs prises en charge.
//!
//! Couches appliquées dans l'ordre (la dernière a le dernier mot) :
//! - Defaults sûrs (`Config::default()`) : la convention SquashFS
//! - Fichier TOML (`swapgen.toml`) via `Config::load`
//! - Lecture **ENV** (préfixe `SWAPGEN_...`) via `Config::apply_env()`
//! - **Overrides CLI** via `CliOverrides` (appliqués avec `apply_cli_overrides`)
//!
//! ENV supportés (tous facultatifs) :
//!   SWAPGEN_STRUCT_PREFIX=squashfs_
//!   SWAPGEN_FUNCTION_PREFIX=sqfs_swapin_
//!   SWAPGEN_PRIMITIVE_PREFIX=sqfs_swapin
//!   SWAPGEN_PARAM=s
//!   SWAPGEN_WIDTHS=16,32,64
//!
//! Exemple de `swapgen.toml` :
//! ```toml
//! widths = [16, 32, 64]
//!
//! [naming]
//! struct_prefix = "squashfs_"
//! function_prefix = "sqfs_swapin_"
//! primitive_prefix = "sqfs_swapin"
//! param = "s"
//! ```

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use camino::Utf8Path;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Nom du fichier de configuration cherché dans le répertoire courant.
pub const DEFAULT_CONFIG_FILE: &str = "swapgen.toml";

/* ─────────────────────────── Types publics ─────────────────────────── */

/// Largeur d'un champ `__leN` (et de la primitive de swap associée).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum BitWidth {
    W8,
    W16,
    W32,
    W64,
}

impl BitWidth {
    pub const ALL: [Self; 4] = [Self::W8, Self::W16, Self::W32, Self::W64];

    pub const fn bits(self) -> u32 {
        match self {
            Self::W8 => 8,
            Self::W16 => 16,
            Self::W32 => 32,
            Self::W64 => 64,
        }
    }

    pub const fn from_bits(bits: u32) -> Option<Self> {
        match bits {
            8 => Some(Self::W8),
            16 => Some(Self::W16),
            32 => Some(Self::W32),
            64 => Some(Self::W64),
            _ => None,
        }
    }
}

impl fmt::Display for BitWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.bits())
    }
}

impl TryFrom<u32> for BitWidth {
    type Error = String;

    fn try_from(bits: u32) -> std::result::Result<Self, Self::Error> {
        Self::from_bits(bits).ok_or_else(|| format!("largeur inconnue: {bits} (attendu 8, 16, 32 ou 64)"))
    }
}

impl From<BitWidth> for u32 {
    fn from(w: BitWidth) -> Self {
        w.bits()
    }
}

impl FromStr for BitWidth {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let bits = s
            .trim()
            .parse::<u32>()
            .map_err(|_| format!("largeur invalide: `{s}`"))?;
        Self::try_from(bits)
    }
}

/// Convention de nommage : d'où viennent les noms de structures, de fonctions
/// générées et de primitives.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Naming {
    /// Préfixe commun des structures reconnues (`struct <prefix><suffixe> {`).
    pub struct_prefix: String,
    /// Préfixe des fonctions générées (`<prefix><suffixe>`).
    pub function_prefix: String,
    /// Préfixe des primitives de swap (`<prefix><N>`).
    pub primitive_prefix: String,
    /// Nom du paramètre pointeur des fonctions générées.
    pub param: String,
}

impl Default for Naming {
    fn default() -> Self {
        Self {
            struct_prefix: "squashfs_".into(),
            function_prefix: "sqfs_swapin_".into(),
            primitive_prefix: "sqfs_swapin".into(),
            param: "s".into(),
        }
    }
}

/// Configuration complète du générateur.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub naming: Naming,
    /// Largeurs converties ; un `__leN` hors de cet ensemble est ignoré.
    pub widths: BTreeSet<BitWidth>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            naming: Naming::default(),
            widths: [BitWidth::W16, BitWidth::W32, BitWidth::W64].into_iter().collect(),
        }
    }
}

/* ─────────────────────── Overrides (CLI / couches) ─────────────────────── */

/// Overrides typiques fournis par une CLI en amont.
/// Toutes les valeurs sont optionnelles — applique-les avec `apply_cli_overrides`.
#[derive(Default, Clone, Debug)]
pub struct CliOverrides {
    pub struct_prefix: Option<String>,
    pub function_prefix: Option<String>,
    pub primitive_prefix: Option<String>,
    pub param: Option<String>,
    pub widths: Option<Vec<BitWidth>>,
}

impl Config {
    /// Parse un document TOML ; les clés absentes gardent leur valeur par défaut.
    pub fn from_toml_str(s: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Charge un fichier `swapgen.toml`.
    pub fn load(path: &Utf8Path) -> Result<Self> {
        let s = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::from_toml_str(&s).map_err(|source| Error::ConfigFile { path: path.to_owned(), source })
    }

    /// Applique les variables d'environnement `SWAPGEN_*`.
    pub fn apply_env(&mut self) {
        if let Some(v) = read_env("SWAPGEN_STRUCT_PREFIX")    { self.naming.struct_prefix = v; }
        if let Some(v) = read_env("SWAPGEN_FUNCTION_PREFIX")  { self.naming.function_prefix = v; }
        if let Some(v) = read_env("SWAPGEN_PRIMITIVE_PREFIX") { self.naming.primitive_prefix = v; }
        if let Some(v) = read_env("SWAPGEN_PARAM")            { self.naming.param = v; }
        if let Some(v) = read_env("SWAPGEN_WIDTHS") {
            match parse_widths(&v) {
                Some(w) => self.widths = w,
                None => log::warn!("SWAPGEN_WIDTHS ignoré: `{v}` n'est pas une liste de largeurs"),
            }
        }
    }

    /// Applique des overrides “dernier mot” typiquement issus d'une CLI.
    pub fn apply_cli_overrides(&mut self, o: &CliOverrides) {
        if let Some(x) = &o.struct_prefix    { self.naming.struct_prefix = x.clone(); }
        if let Some(x) = &o.function_prefix  { self.naming.function_prefix = x.clone(); }
        if let Some(x) = &o.primitive_prefix { self.naming.primitive_prefix = x.clone(); }
        if let Some(x) = &o.param            { self.naming.param = x.clone(); }
        if let Some(x) = &o.widths           { self.widths = x.iter().copied().collect(); }
    }

    /// Les noms générés doivent rester des identifiants C.
    pub fn validate(&self) -> Result<()> {
        let n = &self.naming;
        check_ident_part("struct_prefix", &n.struct_prefix)?;
        check_ident_part("function_prefix", &n.function_prefix)?;
        check_ident_part("primitive_prefix", &n.primitive_prefix)?;
        check_ident_part("param", &n.param)?;
        if self.widths.is_empty() {
            return Err(Error::Config("aucune largeur prise en charge (widths est vide)".into()));
        }
        Ok(())
    }

    pub fn supports(&self, width: BitWidth) -> bool {
        self.widths.contains(&width)
    }

    /// `sqfs_swapin_` + `super_block`.
    pub fn function_name(&self, suffix: &str) -> String {
        format!("{}{}", self.naming.function_prefix, suffix)
    }

    /// `sqfs_swapin` + `32`.
    pub fn primitive_name(&self, width: BitWidth) -> String {
        format!("{}{}", self.naming.primitive_prefix, width)
    }
}

/* ────────────────────────── Parsing d'ENV ────────────────────────── */

fn read_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

fn parse_widths(s: &str) -> Option<BTreeSet<BitWidth>> {
    s.split(',')
        .filter(|p| !p.trim().is_empty())
        .map(|p| p.parse::<BitWidth>().ok())
        .collect()
}

fn check_ident_part(key: &str, v: &str) -> Result<()> {
    let Some(first) = v.chars().next() else {
        return Err(Error::Config(format!("`{key}` ne peut pas être vide")));
    };
    if first.is_ascii_digit() {
        return Err(Error::Config(format!("`{key}` ne peut pas commencer par un chiffre: `{v}`")));
    }
    if !v.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(Error::Config(format!("`{key}` doit être un identifiant C: `{v}`")));
    }
    Ok(())
}

/* ───────────────────────────── Tests ───────────────────────────── */
