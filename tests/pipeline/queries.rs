use crate::common::fixtures::{self, ElfBuilder, SectionSpec, SymbolSpec};
use crate::common::{column_ints, column_text, firmware_store};
use elfquery::config::Config;
use elfquery::store::{Store, Value};

#[test]
fn symbols_in_id_order() {
    let store = firmware_store();
    let rs = store.query("SELECT * FROM symbols ORDER BY ID ASC").unwrap();
    assert_eq!(rs.len(), fixtures::FIRMWARE_SYMBOLS);
    let ids = column_ints(&rs, "ID");
    let expected: Vec<i64> = (1..=fixtures::FIRMWARE_SYMBOLS as i64).collect();
    assert_eq!(ids, expected);

    // The null symbol is loaded first
    assert_eq!(rs.rows[0][rs.column_index("Name").unwrap()], Value::Text(String::new()));
}

#[test]
fn ten_largest_bss_symbols() {
    let store = firmware_store();
    let rs = store
        .query("SELECT Name, Size FROM symbols WHERE Section = 'bss' ORDER BY Size DESC LIMIT 10")
        .unwrap();
    assert!(rs.len() <= 10);
    let sizes = column_ints(&rs, "Size");
    let mut sorted = sizes.clone();
    sorted.sort_by(|a, b| b.cmp(a));
    assert_eq!(sizes, sorted);
    assert_eq!(
        column_text(&rs, "Name"),
        vec!["rx_buf", "tx_buf", "z_idle_stack", "heap_ptr"]
    );

    let check = store
        .query("SELECT DISTINCT Section FROM symbols WHERE Section = 'bss'")
        .unwrap();
    assert_eq!(check.len(), 1);
}

#[test]
fn section_ids_are_contiguous() {
    let store = firmware_store();
    let rs = store.query("SELECT ID FROM sections ORDER BY ID").unwrap();
    let expected: Vec<i64> = (0..fixtures::FIRMWARE_SECTIONS as i64).collect();
    assert_eq!(column_ints(&rs, "ID"), expected);
}

#[test]
fn reserved_indices_resolve_to_unknown() {
    let store = firmware_store();
    let rs = store
        .query("SELECT DISTINCT Section FROM symbols WHERE SectionIndex >= 65280")
        .unwrap();
    assert_eq!(column_text(&rs, "Section"), vec!["<Unknown>"]);
}

#[test]
fn builtin_aliases_all_run() {
    let store = firmware_store();
    for (name, query) in Config::default().aliases() {
        let rs = store
            .query(&query)
            .unwrap_or_else(|e| panic!("alias {} failed: {}", name, e));
        assert!(!rs.columns.is_empty(), "{}", name);
    }

    let weak = store.query(&Config::default().resolve_alias("weak").unwrap()).unwrap();
    assert_eq!(column_text(&weak, "Name"), vec!["z_impl_weak"]);

    let sections = store
        .query(&Config::default().resolve_alias("sections").unwrap())
        .unwrap();
    let text_row = sections
        .rows
        .iter()
        .find(|r| r[0] == Value::Text("text".into()))
        .unwrap();
    assert_eq!(text_row[1], Value::Text("0x1000".into()));
    assert_eq!(text_row[2], Value::Integer(0x400));
}

#[test]
fn layouts_agree_across_class_and_byte_order() {
    let le64 = Store::load(&fixtures::firmware_image(true, true)).unwrap();
    let be32 = Store::load(&fixtures::firmware_image(false, false)).unwrap();
    let le32 = Store::load(&fixtures::firmware_image(false, true)).unwrap();

    let symbols = "SELECT ID, Value, Size, Type, Binding, Visibility, SectionIndex, Name, Section \
                   FROM symbols ORDER BY ID";
    let sections = "SELECT ID, Name, Type, Flags, Address, Size, LinkedIndex, Info \
                    FROM sections ORDER BY ID";
    for query in [symbols, sections] {
        let expected = le64.query(query).unwrap();
        assert_eq!(be32.query(query).unwrap(), expected);
        assert_eq!(le32.query(query).unwrap(), expected);
    }
    assert_eq!(le64.sizes(), be32.sizes());
}

#[test]
fn extended_section_numbering() {
    let mut b = ElfBuilder::new(true, true).extended_numbering();
    for i in 0..4 {
        b.section(SectionSpec::new(
            &format!("sec{}", i),
            fixtures::SHT_PROGBITS,
            fixtures::SHF_ALLOC,
            0x1000 * (i + 1),
            0x10,
        ));
    }
    b.symtab(&[SymbolSpec::new("in_sec2", 0x3000, 4, 1, 1, 3)]);
    let store = Store::load(&b.build()).unwrap();

    // Null, four sections, .symtab, .strtab, .shstrtab
    assert_eq!(store.section_count(), 8);
    let rs = store
        .query("SELECT Section FROM symbols WHERE Name = 'in_sec2'")
        .unwrap();
    assert_eq!(column_text(&rs, "Section"), vec!["sec2"]);
}

#[test]
fn dynamic_symbols_follow_static_ones() {
    let mut b = ElfBuilder::new(true, true);
    let text = b.section(SectionSpec::new(
        ".text",
        fixtures::SHT_PROGBITS,
        fixtures::SHF_ALLOC | fixtures::SHF_EXECINSTR,
        0x1000,
        0x100,
    ));
    b.symtab(&[SymbolSpec::new("local_fn", 0x1000, 8, 0, 2, text)]);
    b.symbol_table(
        ".dynsym",
        fixtures::SHT_DYNSYM,
        &[SymbolSpec::new("exported_fn", 0x1010, 8, 1, 2, text)],
    );
    let store = Store::load(&b.build()).unwrap();

    let rs = store.query("SELECT ID, Name FROM symbols ORDER BY ID").unwrap();
    assert_eq!(column_text(&rs, "Name"), vec!["", "local_fn", "", "exported_fn"]);
    assert_eq!(column_ints(&rs, "ID"), vec![1, 2, 3, 4]);
}

#[test]
fn demangle_in_queries() {
    let mut b = ElfBuilder::new(true, true);
    let text = b.section(SectionSpec::new(".text", fixtures::SHT_PROGBITS, 6, 0, 0x40));
    b.symtab(&[
        SymbolSpec::new("_ZN4core3fmt5write17h0123456789abcdefE", 0, 8, 1, 2, text),
        SymbolSpec::new("_Z3foov", 8, 8, 1, 2, text),
        SymbolSpec::new("k_sem_take", 16, 8, 1, 2, text),
    ]);
    let store = Store::load(&b.build()).unwrap();
    let rs = store
        .query("SELECT demangle(Name) AS Pretty FROM symbols WHERE ID > 1 ORDER BY ID")
        .unwrap();
    assert_eq!(
        column_text(&rs, "Pretty"),
        vec!["core::fmt::write", "foo()", "k_sem_take"]
    );
}
