//! Erreurs du générateur.
//!
//! Seules les fautes d'E/S et les imbrications mal formées sont fatales ; une
//! ligne non reconnue ou un champ non pris en charge ne sont jamais des erreurs.

use std::io;

use camino::Utf8PathBuf;
use thiserror::Error;

use crate::diagnostics::Diagnostic;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Ouverture/création d'un fichier impossible.
    #[error("{path}: {source}")]
    Io {
        path: Utf8PathBuf,
        #[source]
        source: io::Error,
    },

    /// Lecture du header interrompue (E/S ou UTF-8 invalide).
    #[error("lecture du header (ligne {line}): {source}")]
    Read {
        line: usize,
        #[source]
        source: io::Error,
    },

    /// Écriture d'un fragment impossible.
    #[error("écriture d'un fragment: {0}")]
    Write(#[from] io::Error),

    /// `struct squashfs_*` ouverte alors qu'une autre n'est pas refermée.
    #[error(
        "ligne {line}: `struct {inner}` ouverte dans `struct {outer}` (ligne {outer_line}) ; \
         les structures imbriquées ne sont pas prises en charge"
    )]
    NestedRecord {
        line: usize,
        inner: String,
        outer: String,
        outer_line: usize,
    },

    /// Fin d'entrée atteinte à l'intérieur d'une structure.
    #[error("`struct {record}` ouverte ligne {line} jamais refermée par `}};`")]
    UnterminatedRecord { record: String, line: usize },

    #[error("configuration invalide: {0}")]
    Config(String),

    #[error("{path}: configuration TOML invalide: {source}")]
    ConfigFile {
        path: Utf8PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl Error {
    pub(crate) fn io(path: impl Into<Utf8PathBuf>, source: io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }

    /// Forme diagnostic des erreurs de structure, pour `swapgen check`.
    pub fn diagnostic(&self) -> Option<Diagnostic> {
        match self {
            Self::NestedRecord { line, inner, outer, .. } => Some(
                Diagnostic::error(format!("`struct {inner}` ouverte avant `}};`"))
                    .at_line(*line)
                    .in_record(outer.as_str()),
            ),
            Self::UnterminatedRecord { record, line } => Some(
                Diagnostic::error("jamais refermée par `};`")
                    .at_line(*line)
                    .in_record(record.as_str()),
            ),
            _ => None,
        }
    }
}
