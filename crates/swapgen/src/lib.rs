//! swapgen — générateur des conversions little-endian → hôte pour SquashFS.
//! - Lit un header C (`squashfs_fs.h`) ligne à ligne, sans backtracking.
//! - Reconnaît trois formes : `struct squashfs_xxx {`, `};` et `__leN champ;`.
//! - Émet deux fragments : prototypes (`swap.h.inc`) et corps (`swap.c.inc`).
//! - Tout le reste du header est ignoré tel quel : ce n'est **pas** un parseur C.
//!
//! ```
//! use swapgen::{generate_str, Config};
//!
//! let src = "struct squashfs_super_block {\n\t__le32 inodes;\n\tchar pad[4];\n};\n";
//! let out = generate_str(&Config::default(), src).unwrap();
//! assert_eq!(
//!     out.declarations,
//!     "void sqfs_swapin_super_block(struct squashfs_super_block *s);\n",
//! );
//! assert_eq!(
//!     out.definitions,
//!     "void sqfs_swapin_super_block(struct squashfs_super_block *s) {\nsqfs_swapin32(&s->inodes);\n}\n",
//! );
//! ```

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms, unused_must_use)]

pub mod config;
pub mod diagnostics;
pub mod emit;
pub mod error;
pub mod patterns;
pub mod pipeline;
pub mod primitives;
pub mod scanner;
mod util;

pub use config::{BitWidth, CliOverrides, Config, Naming};
pub use diagnostics::{Diagnostic, Severity};
pub use emit::Sinks;
pub use error::{Error, Result};
pub use pipeline::{Paths, Pipeline};
pub use scanner::{
    generate_str, scan, Generated, RecordHeader, RecordSummary, ScanReport, ScanState, Scanner,
};
