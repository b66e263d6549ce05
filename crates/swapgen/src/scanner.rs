//! Scanner ligne à ligne : une passe, sans retour arrière, sans récursion.
//!
//! L'état est `Outside` ou `InsideRecord` ; chaque ligne produit zéro ou
//! quelques lignes dans les deux fragments, écrites au fil de l'eau.
//!
//! Politique sur les entrées mal formées :
//! - `struct squashfs_*` ouverte dans une autre → [`Error::NestedRecord`] ;
//! - fin d'entrée dans une structure → [`Error::UnterminatedRecord`] ;
//! - `};` hors structure → inerte (unions, enums et autres structs ferment ainsi).

use std::collections::HashSet;
use std::io::{self, BufRead, Write};

use crate::config::Config;
use crate::diagnostics::{Diagnostic, Severity};
use crate::emit::{Emitter, Sinks};
use crate::error::{Error, Result};
use crate::patterns::{LineKind, Patterns};

/* ─────────────────────────── Types publics ─────────────────────────── */

/// Structure en cours de conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordHeader {
    pub record_name: String,
    pub function_name: String,
    /// Ligne (1-based) de l'ouverture.
    pub line: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ScanState {
    #[default]
    Outside,
    InsideRecord(RecordHeader),
}

impl ScanState {
    pub const fn is_inside(&self) -> bool {
        matches!(self, Self::InsideRecord(_))
    }
}

/// Bilan d'une structure reconnue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSummary {
    pub record_name: String,
    pub function_name: String,
    pub line: usize,
    /// Appels de swap émis.
    pub fields_converted: usize,
    /// Lignes non vides du corps restées sans effet.
    pub lines_skipped: usize,
}

/// Bilan d'une passe complète. N'influe jamais sur le texte émis.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanReport {
    pub records: Vec<RecordSummary>,
    pub diagnostics: Vec<Diagnostic>,
    /// Nombre de lignes lues.
    pub lines: usize,
}

impl ScanReport {
    pub fn fields_converted(&self) -> usize {
        self.records.iter().map(|r| r.fields_converted).sum()
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.severity != Severity::Info)
    }
}

/// Résultat en mémoire de [`generate_str`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generated {
    pub declarations: String,
    pub definitions: String,
    pub report: ScanReport,
}

/* ───────────────────────────── Scanner ───────────────────────────── */

#[derive(Debug)]
pub struct Scanner<'c> {
    cfg: &'c Config,
    patterns: Patterns,
    state: ScanState,
    line_no: usize,
    records: Vec<RecordSummary>,
    diagnostics: Vec<Diagnostic>,
    seen_functions: HashSet<String>,
}

impl<'c> Scanner<'c> {
    pub fn new(cfg: &'c Config) -> Result<Self> {
        cfg.validate()?;
        Ok(Self {
            cfg,
            patterns: Patterns::new(&cfg.naming)?,
            state: ScanState::Outside,
            line_no: 0,
            records: Vec::new(),
            diagnostics: Vec::new(),
            seen_functions: HashSet::new(),
        })
    }

    pub const fn state(&self) -> &ScanState {
        &self.state
    }

    /// Traite une ligne (fin de ligne `\n` ou `\r\n` tolérée).
    pub fn feed_line<D: Write, F: Write>(&mut self, line: &str, sinks: &mut Sinks<D, F>) -> Result<()> {
        self.line_no += 1;
        let line = line.strip_suffix('\n').unwrap_or(line);
        let line = line.strip_suffix('\r').unwrap_or(line);

        let emitter = Emitter::new(self.cfg);
        let kind = self.patterns.classify(line, self.state.is_inside());
        self.state = match (std::mem::take(&mut self.state), kind) {
            (ScanState::Outside, LineKind::Open(open)) => {
                let header = RecordHeader {
                    record_name: open.record.to_owned(),
                    function_name: self.cfg.function_name(open.suffix),
                    line: self.line_no,
                };
                log::debug!("ligne {}: struct {} → {}", self.line_no, header.record_name, header.function_name);
                if !self.seen_functions.insert(header.function_name.clone()) {
                    self.diagnostics.push(
                        Diagnostic::warning(format!("fonction `{}` déjà générée", header.function_name))
                            .at_line(self.line_no)
                            .in_record(&header.record_name),
                    );
                }
                emitter.begin_record(sinks, &header.function_name, &header.record_name)?;
                self.records.push(RecordSummary {
                    record_name: header.record_name.clone(),
                    function_name: header.function_name.clone(),
                    line: header.line,
                    fields_converted: 0,
                    lines_skipped: 0,
                });
                ScanState::InsideRecord(header)
            }
            (ScanState::Outside, _) => ScanState::Outside,
            (ScanState::InsideRecord(_), LineKind::Close) => {
                emitter.end_record(sinks)?;
                ScanState::Outside
            }
            (ScanState::InsideRecord(header), LineKind::Field(field)) if self.cfg.supports(field.width) => {
                log::trace!("  {} {}", field.width, field.name);
                emitter.field(sinks, field.width, field.name)?;
                if let Some(r) = self.records.last_mut() {
                    r.fields_converted += 1;
                }
                ScanState::InsideRecord(header)
            }
            (ScanState::InsideRecord(header), LineKind::Field(field)) => {
                let d = Diagnostic::warning(format!(
                    "`{}` ignoré: largeur {} hors configuration",
                    field.name, field.width
                ));
                self.skip(&header, d);
                ScanState::InsideRecord(header)
            }
            (ScanState::InsideRecord(header), LineKind::UnknownWidth { bits, name }) => {
                let d = Diagnostic::warning(format!("`{name}` ignoré: pas de primitive pour __le{bits}"));
                self.skip(&header, d);
                ScanState::InsideRecord(header)
            }
            (ScanState::InsideRecord(header), LineKind::Open(open)) => {
                return Err(Error::NestedRecord {
                    line: self.line_no,
                    inner: open.record.to_owned(),
                    outer: header.record_name,
                    outer_line: header.line,
                });
            }
            (ScanState::InsideRecord(header), LineKind::Other) => {
                let text = line.trim();
                if !text.is_empty() {
                    self.skip(&header, Diagnostic::info(format!("ligne ignorée: `{text}`")));
                }
                ScanState::InsideRecord(header)
            }
        };
        Ok(())
    }

    fn skip(&mut self, header: &RecordHeader, d: Diagnostic) {
        if let Some(r) = self.records.last_mut() {
            r.lines_skipped += 1;
        }
        self.diagnostics.push(d.at_line(self.line_no).in_record(&header.record_name));
    }

    /// Clôt la passe ; échoue si une structure reste ouverte.
    pub fn finish(self) -> Result<ScanReport> {
        if let ScanState::InsideRecord(header) = self.state {
            return Err(Error::UnterminatedRecord { record: header.record_name, line: header.line });
        }
        Ok(ScanReport { records: self.records, diagnostics: self.diagnostics, lines: self.line_no })
    }
}

/* ───────────────────────────── Entrées ───────────────────────────── */

/// Passe complète : lit `input` jusqu'au bout, écrit dans `decls` et `defs`.
pub fn scan<R: BufRead, D: Write, F: Write>(
    cfg: &Config,
    mut input: R,
    decls: D,
    defs: F,
) -> Result<ScanReport> {
    let mut scanner = Scanner::new(cfg)?;
    let mut sinks = Sinks::new(decls, defs);
    let mut buf = String::new();
    loop {
        buf.clear();
        let n = input
            .read_line(&mut buf)
            .map_err(|source| Error::Read { line: scanner.line_no + 1, source })?;
        if n == 0 {
            break;
        }
        scanner.feed_line(&buf, &mut sinks)?;
    }
    sinks.flush()?;
    scanner.finish()
}

/// Variante en mémoire de [`scan`].
pub fn generate_str(cfg: &Config, src: &str) -> Result<Generated> {
    let mut decls = Vec::new();
    let mut defs = Vec::new();
    let report = scan(cfg, io::Cursor::new(src), &mut decls, &mut defs)?;
    Ok(Generated {
        declarations: String::from_utf8_lossy(&decls).into_owned(),
        definitions: String::from_utf8_lossy(&defs).into_owned(),
        report,
    })
}

/* ───────────────────────────── Tests ───────────────────────────── */

#[cfg(test)]
mod tests {
    use super::*;

    const SUPER_BLOCK: &str = "struct squashfs_super_block {\n\
                               \t__le32 inodes;\n\
                               \tchar pad[4];\n\
                               \t__le64 bytes_used;\n\
                               };\n";

    fn gen(src: &str) -> Generated {
        generate_str(&Config::default(), src).unwrap()
    }

    #[test]
    fn super_block_scenario() {
        let out = gen(SUPER_BLOCK);
        assert_eq!(out.declarations, "void sqfs_swapin_super_block(struct squashfs_super_block *s);\n");
        assert_eq!(
            out.definitions,
            "void sqfs_swapin_super_block(struct squashfs_super_block *s) {\n\
             sqfs_swapin32(&s->inodes);\n\
             sqfs_swapin64(&s->bytes_used);\n\
             }\n"
        );
        let r = &out.report.records[0];
        assert_eq!((r.fields_converted, r.lines_skipped, r.line), (2, 1, 1));
    }

    #[test]
    fn no_records_no_output() {
        let out = gen("#ifndef SQUASHFS_FS\n#define SQUASHFS_FS\n__le32 stray;\n};\n#endif\n");
        assert!(out.declarations.is_empty());
        assert!(out.definitions.is_empty());
        assert!(out.report.records.is_empty());
        assert_eq!(out.report.lines, 5);
    }

    #[test]
    fn non_ascii_names_are_not_records() {
        let out = gen("struct squashfs_été {\n\t__le32 café;\n};\n");
        assert!(out.declarations.is_empty());
        assert!(out.definitions.is_empty());
        assert!(out.report.records.is_empty());
    }

    #[test]
    fn two_records_in_order() {
        let src = "struct squashfs_base_inode {\n\
                   \t__le16 inode_type;\n\
                   \t__le16 mode;\n\
                   };\n\
                   \n\
                   struct squashfs_dir_entry {\n\
                   \t__le16 offset;\n\
                   \t__s16 inode_number;\n\
                   \t__le16 type;\n\
                   };\n";
        let out = gen(src);
        assert_eq!(
            out.declarations,
            "void sqfs_swapin_base_inode(struct squashfs_base_inode *s);\n\
             void sqfs_swapin_dir_entry(struct squashfs_dir_entry *s);\n"
        );
        assert_eq!(
            out.definitions,
            "void sqfs_swapin_base_inode(struct squashfs_base_inode *s) {\n\
             sqfs_swapin16(&s->inode_type);\n\
             sqfs_swapin16(&s->mode);\n\
             }\n\
             void sqfs_swapin_dir_entry(struct squashfs_dir_entry *s) {\n\
             sqfs_swapin16(&s->offset);\n\
             sqfs_swapin16(&s->type);\n\
             }\n"
        );
    }

    #[test]
    fn only_unsupported_fields_gives_empty_body() {
        let out = gen("struct squashfs_xattr_val {\n\tchar value[0];\n};\n");
        assert_eq!(
            out.definitions,
            "void sqfs_swapin_xattr_val(struct squashfs_xattr_val *s) {\n}\n"
        );
    }

    #[test]
    fn unsupported_width_is_skipped_not_fatal() {
        let out = gen("struct squashfs_x {\n__le8 tiny;\n__le128 huge;\n__le16 ok;\n};\n");
        assert_eq!(out.definitions.lines().nth(1), Some("sqfs_swapin16(&s->ok);"));
        assert_eq!(out.report.warnings().count(), 2);
    }

    #[test]
    fn crlf_matches_lf() {
        let crlf = SUPER_BLOCK.replace('\n', "\r\n");
        assert_eq!(gen(&crlf).definitions, gen(SUPER_BLOCK).definitions);
    }

    #[test]
    fn missing_final_newline() {
        let out = gen("struct squashfs_id {\n__le32 id;\n};");
        assert!(out.definitions.ends_with("}\n"));
    }

    #[test]
    fn foreign_struct_closing_is_inert() {
        let src = "struct other {\n__le32 x;\n};\nstruct squashfs_y {\n__le32 y;\n};\n";
        let out = gen(src);
        assert_eq!(out.report.records.len(), 1);
        assert!(!out.definitions.contains("->x"));
    }

    #[test]
    fn nested_record_is_rejected() {
        let src = "struct squashfs_a {\n__le32 x;\nstruct squashfs_b {\n};\n};\n";
        match generate_str(&Config::default(), src) {
            Err(Error::NestedRecord { line, inner, outer, outer_line }) => {
                assert_eq!((line, outer_line), (3, 1));
                assert_eq!(inner, "squashfs_b");
                assert_eq!(outer, "squashfs_a");
            }
            other => panic!("attendu NestedRecord, obtenu {other:?}"),
        }
    }

    #[test]
    fn unterminated_record_is_rejected() {
        let err = generate_str(&Config::default(), "\nstruct squashfs_a {\n__le32 x;\n").unwrap_err();
        assert!(matches!(err, Error::UnterminatedRecord { ref record, line: 2 } if record == "squashfs_a"));
    }

    #[test]
    fn duplicate_function_is_reported_not_enforced() {
        let src = "struct squashfs_a {\n};\nstruct squashfs_a {\n};\n";
        let out = gen(src);
        assert_eq!(out.declarations.lines().count(), 2);
        assert_eq!(out.report.warnings().count(), 1);
    }

    #[test]
    fn state_returns_outside_between_records() {
        let cfg = Config::default();
        let mut s = Scanner::new(&cfg).unwrap();
        let mut sinks = Sinks::new(io::sink(), io::sink());
        s.feed_line("struct squashfs_a {", &mut sinks).unwrap();
        assert!(matches!(s.state(), ScanState::InsideRecord(h) if h.function_name == "sqfs_swapin_a"));
        s.feed_line("};", &mut sinks).unwrap();
        assert_eq!(s.state(), &ScanState::Outside);
    }

    #[test]
    fn invalid_config_is_refused() {
        let mut cfg = Config::default();
        cfg.naming.function_prefix.clear();
        assert!(matches!(Scanner::new(&cfg), Err(Error::Config(_))));
    }
}
