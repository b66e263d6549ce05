use camino::{Utf8Path, Utf8PathBuf};
use swapgen::{generate_str, Config, Error, Paths, Pipeline};

const HEADER: &str = r"#ifndef SQUASHFS_FS_H
#define SQUASHFS_FS_H

#define SQUASHFS_MAGIC 0x73717368

struct squashfs_super_block {
	__le32			s_magic;
	__le32			inodes;
	__le32			mkfs_time;
	__le32			block_size;
	__le32			fragments;
	__le16			compression;
	__le16			block_log;
	__le16			flags;
	__le16			no_ids;
	__le16			s_major;
	__le16			s_minor;
	__le64			root_inode;
	__le64			bytes_used;
	__le64			id_table_start;
	__le64			xattr_id_table_start;
	__le64			inode_table_start;
	__le64			directory_table_start;
	__le64			fragment_table_start;
	__le64			lookup_table_start;
};

struct squashfs_dir_index {
	__le32			index;
	__le32			start_block;
	__le32			size;
	unsigned char		name[0];
};

union squashfs_inode {
	struct squashfs_base_inode		base;
	struct squashfs_dev_inode		dev;
};

struct squashfs_fragment_entry {
	__le64			start_block;
	__le32			size;
	unsigned int		unused;
};

#endif
";

fn utf8(dir: &tempfile::TempDir) -> Utf8PathBuf {
    Utf8Path::from_path(dir.path()).expect("tempdir UTF-8").to_owned()
}

#[test]
fn run_writes_both_fragments() {
    let dir = tempfile::tempdir().unwrap();
    let root = utf8(&dir);
    let paths = Paths {
        input: root.join("squashfs_fs.h"),
        declarations: root.join("gen/swap.h.inc"),
        definitions: root.join("gen/swap.c.inc"),
    };
    std::fs::write(&paths.input, HEADER).unwrap();

    let report = Pipeline::new(Config::default()).run(&paths).unwrap();
    assert_eq!(report.records.len(), 3);
    assert_eq!(report.fields_converted(), 19 + 3 + 2);

    let decls = std::fs::read_to_string(&paths.declarations).unwrap();
    let defs = std::fs::read_to_string(&paths.definitions).unwrap();
    let mem = generate_str(&Config::default(), HEADER).unwrap();
    assert_eq!(decls, mem.declarations);
    assert_eq!(defs, mem.definitions);

    assert_eq!(
        decls,
        "void sqfs_swapin_super_block(struct squashfs_super_block *s);\n\
         void sqfs_swapin_dir_index(struct squashfs_dir_index *s);\n\
         void sqfs_swapin_fragment_entry(struct squashfs_fragment_entry *s);\n"
    );
    assert!(defs.contains(
        "void sqfs_swapin_fragment_entry(struct squashfs_fragment_entry *s) {\n\
         sqfs_swapin64(&s->start_block);\n\
         sqfs_swapin32(&s->size);\n\
         }\n"
    ));
    assert!(!defs.contains("base"));
    assert!(!defs.contains("unused"));
}

#[test]
fn run_twice_is_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    let root = utf8(&dir);
    let paths = Paths {
        input: root.join("squashfs_fs.h"),
        declarations: root.join("swap.h.inc"),
        definitions: root.join("swap.c.inc"),
    };
    std::fs::write(&paths.input, HEADER).unwrap();
    let p = Pipeline::default();

    p.run(&paths).unwrap();
    let first = (
        std::fs::read(&paths.declarations).unwrap(),
        std::fs::read(&paths.definitions).unwrap(),
    );
    std::fs::remove_file(&paths.declarations).unwrap();
    std::fs::remove_file(&paths.definitions).unwrap();
    p.run(&paths).unwrap();
    let second = (
        std::fs::read(&paths.declarations).unwrap(),
        std::fs::read(&paths.definitions).unwrap(),
    );
    assert_eq!(first, second);
}

#[test]
fn missing_input_is_fatal_and_names_the_path() {
    let dir = tempfile::tempdir().unwrap();
    let root = utf8(&dir);
    let paths = Paths {
        input: root.join("absent.h"),
        declarations: root.join("swap.h.inc"),
        definitions: root.join("swap.c.inc"),
    };
    let err = Pipeline::default().run(&paths).unwrap_err();
    assert!(matches!(&err, Error::Io { path, .. } if path == &paths.input));
    assert!(!paths.declarations.exists());
}

#[test]
fn failed_scan_leaves_no_fragments() {
    let dir = tempfile::tempdir().unwrap();
    let root = utf8(&dir);
    let paths = Paths {
        input: root.join("nested.h"),
        declarations: root.join("swap.h.inc"),
        definitions: root.join("swap.c.inc"),
    };
    std::fs::write(&paths.input, "struct squashfs_a {\nstruct squashfs_b {\n};\n};\n").unwrap();
    let err = Pipeline::default().run(&paths).unwrap_err();
    assert!(matches!(err, Error::NestedRecord { line: 2, .. }));
    assert!(!paths.declarations.exists());
    assert!(!paths.definitions.exists());
}

#[test]
fn check_reports_without_writing() {
    let dir = tempfile::tempdir().unwrap();
    let root = utf8(&dir);
    let input = root.join("squashfs_fs.h");
    std::fs::write(&input, HEADER).unwrap();

    let report = Pipeline::default().check(&input).unwrap();
    let names: Vec<_> = report.records.iter().map(|r| r.function_name.as_str()).collect();
    assert_eq!(names, ["sqfs_swapin_super_block", "sqfs_swapin_dir_index", "sqfs_swapin_fragment_entry"]);
    assert_eq!(report.records[1].lines_skipped, 1);
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test]
fn invalid_utf8_input_is_a_read_error() {
    let dir = tempfile::tempdir().unwrap();
    let root = utf8(&dir);
    let input = root.join("bad.h");
    std::fs::write(&input, b"struct squashfs_a {\n\xff\xfe\n};\n").unwrap();
    let err = Pipeline::default().check(&input).unwrap_err();
    assert!(matches!(err, Error::Read { line: 2, .. }));
}

#[test]
fn custom_naming_from_toml() {
    let cfg = Config::from_toml_str(
        "widths = [32]\n\
         [naming]\n\
         struct_prefix = \"ext2_\"\n\
         function_prefix = \"ext2_le_\"\n\
         primitive_prefix = \"le_to_cpu\"\n\
         param = \"p\"\n",
    )
    .unwrap();
    let out = generate_str(&cfg, "struct ext2_inode {\n__le16 i_mode;\n__le32 i_size;\n};\n").unwrap();
    assert_eq!(out.declarations, "void ext2_le_inode(struct ext2_inode *p);\n");
    assert_eq!(
        out.definitions,
        "void ext2_le_inode(struct ext2_inode *p) {\nle_to_cpu32(&p->i_size);\n}\n"
    );
}
