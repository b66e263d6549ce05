//! Forme textuelle exacte des lignes émises, et la paire de sorties.
//!
//! ```text
//! swap.h.inc : void sqfs_swapin_super_block(struct squashfs_super_block *s);
//! swap.c.inc : void sqfs_swapin_super_block(struct squashfs_super_block *s) {
//!              sqfs_swapin32(&s->inodes);
//!              }
//! ```

use std::io::{self, Write};

use crate::config::{BitWidth, Config};

/// Les deux fragments : déclarations et définitions.
#[derive(Debug)]
pub struct Sinks<D, F> {
    pub decls: D,
    pub defs: F,
}

impl<D: Write, F: Write> Sinks<D, F> {
    pub const fn new(decls: D, defs: F) -> Self {
        Self { decls, defs }
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.decls.flush()?;
        self.defs.flush()
    }

    pub fn into_inner(self) -> (D, F) {
        (self.decls, self.defs)
    }
}

/// Rend les lignes pour une configuration donnée.
#[derive(Debug, Clone, Copy)]
pub struct Emitter<'c> {
    cfg: &'c Config,
}

impl<'c> Emitter<'c> {
    pub const fn new(cfg: &'c Config) -> Self {
        Self { cfg }
    }

    /// `void <fn>(struct <record> *<param>)`
    pub fn signature(&self, function: &str, record: &str) -> String {
        format!("void {function}(struct {record} *{})", self.cfg.naming.param)
    }

    /// `<primitive><N>(&<param>-><field>);`
    pub fn call(&self, width: BitWidth, field: &str) -> String {
        format!("{}(&{}->{field});", self.cfg.primitive_name(width), self.cfg.naming.param)
    }

    /// Prototype dans les déclarations, ouverture du corps dans les définitions.
    pub fn begin_record<D: Write, F: Write>(
        &self,
        sinks: &mut Sinks<D, F>,
        function: &str,
        record: &str,
    ) -> io::Result<()> {
        let sig = self.signature(function, record);
        writeln!(sinks.decls, "{sig};")?;
        writeln!(sinks.defs, "{sig} {{")
    }

    pub fn field<D: Write, F: Write>(
        &self,
        sinks: &mut Sinks<D, F>,
        width: BitWidth,
        field: &str,
    ) -> io::Result<()> {
        writeln!(sinks.defs, "{}", self.call(width, field))
    }

    pub fn end_record<D: Write, F: Write>(&self, sinks: &mut Sinks<D, F>) -> io::Result<()> {
        writeln!(sinks.defs, "}}")
    }
}
