use indoc::indoc;
use std::fs;
use std::path::Path;
use stringsheet::formats::{AndroidStringsFormat, Sheet, read_first_sheet, write_sheets};
use stringsheet::traits::TextFormat;
use stringsheet::{Cell, Config, ImportOptions, StringItem, Table, export, import};
use tempfile::TempDir;

fn write(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn grid(rows: &[&[&str]]) -> Vec<Vec<Cell>> {
    rows.iter()
        .map(|row| row.iter().map(|value| Cell::text(*value)).collect())
        .collect()
}

fn read_items(path: &Path) -> Vec<StringItem> {
    AndroidStringsFormat::read_file(path).unwrap().items
}

fn seed_project(root: &Path) {
    write(
        &root.join("app/src/main/res/values/strings.xml"),
        indoc! {r#"
            <?xml version="1.0" encoding="utf-8"?>
            <resources>
                <string name="app_name">Demo</string>
                <string name="greeting">Hello</string>
                <plurals name="songs">
                    <item quantity="other">%d songs</item>
                </plurals>
            </resources>
        "#},
    );
    write(
        &root.join("app/src/main/res/values-zh-rCN/strings.xml"),
        indoc! {r#"
            <resources>
                <string name="app_name">演示</string>
            </resources>
        "#},
    );
    write(
        &root.join("lib/src/main/res/values/strings.xml"),
        r#"<resources><string name="lib_title">Library</string></resources>"#,
    );
    write(&root.join("docs/readme.md"), "not a module");
}

#[test]
fn test_export_writes_one_sheet_per_module() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    seed_project(root);
    let output = root.join("localize/output.xlsx");
    let config = Config::new()
        .with_project_root(root)
        .with_output_sheet(&output);

    let report = export(&config, &config.module_filter()).unwrap();
    assert_eq!(report.files, vec![output.clone()]);
    let modules: Vec<&str> = report.modules.iter().map(|m| m.module.as_str()).collect();
    assert_eq!(modules, vec!["app", "lib"]);

    let table = Table::from_grid(&read_first_sheet(&output).unwrap()).unwrap();
    assert_eq!(
        table.to_grid(),
        vec![
            vec!["strings-name", "default", "zh-rCN"],
            vec!["app_name", "Demo", "演示"],
            vec!["greeting", "Hello", ""],
        ]
    );
}

#[test]
fn test_import_merges_sheet_into_every_module() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    seed_project(root);
    let input = root.join("localize/input.xlsx");
    let sheet = Table::from_grid(&grid(&[
        &["strings-name", "default", "zh-rCN", "ja"],
        &["greeting", "Hi there", "你好", "こんにちは"],
        &["quote", r#"Say "cheese""#, "", ""],
    ]))
    .unwrap();
    write_sheets(&input, &[Sheet::new("translations", sheet)]).unwrap();

    let config = Config::new().with_project_root(root).with_input_sheet(&input);
    let report = import(&config, &config.module_filter(), ImportOptions::new()).unwrap();
    assert_eq!(report.sheet_locales, vec!["default", "zh-rCN", "ja"]);
    assert_eq!(report.failures().count(), 0);

    let res = root.join("app/src/main/res");
    assert_eq!(
        read_items(&res.join("values/strings.xml")),
        vec![
            StringItem::new("app_name", "Demo"),
            StringItem::new("greeting", "Hi there"),
            StringItem::new("quote", r#"Say \"cheese\""#),
        ]
    );
    assert_eq!(
        read_items(&res.join("values-zh-rCN/strings.xml")),
        vec![
            StringItem::new("app_name", "演示"),
            StringItem::new("greeting", "你好"),
            StringItem::new("quote", ""),
        ]
    );
    assert_eq!(
        read_items(&res.join("values-ja/strings.xml")),
        vec![
            StringItem::new("greeting", "こんにちは"),
            StringItem::new("quote", ""),
        ]
    );

    // Non-string nodes survive the rewrite.
    let base = fs::read_to_string(res.join("values/strings.xml")).unwrap();
    assert!(base.contains(r#"<plurals name="songs">"#));

    // The second module receives the same columns.
    let lib = read_items(&root.join("lib/src/main/res/values/strings.xml"));
    assert_eq!(lib[0], StringItem::new("lib_title", "Library"));
    assert_eq!(lib.len(), 3);
}

#[test]
fn test_export_then_import_is_stable() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    seed_project(root);
    let sheet = root.join("localize/roundtrip.xlsx");
    let config = Config::new()
        .with_project_root(root)
        .with_output_sheet(&sheet)
        .with_input_sheet(&sheet);
    let base = root.join("app/src/main/res/values/strings.xml");

    export(&config, &config.module_filter()).unwrap();
    let before = read_items(&base);
    import(&config, &config.module_filter(), ImportOptions::new()).unwrap();
    assert_eq!(read_items(&base), before);

    // Importing twice changes nothing either.
    let first = fs::read_to_string(&base).unwrap();
    import(&config, &config.module_filter(), ImportOptions::new()).unwrap();
    assert_eq!(fs::read_to_string(&base).unwrap(), first);
}

#[test]
fn test_import_rejects_headerless_sheet() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    seed_project(root);
    let input = root.join("input.csv");
    write(&input, "");
    let config = Config::new().with_project_root(root).with_input_sheet(&input);

    let err = import(&config, &config.module_filter(), ImportOptions::new()).unwrap_err();
    assert!(matches!(err, stringsheet::Error::MalformedTable { row: 0, .. }));
    assert_eq!(
        read_items(&root.join("lib/src/main/res/values/strings.xml")),
        vec![StringItem::new("lib_title", "Library")]
    );
}

#[test]
fn test_import_leaves_unlisted_strings_untouched() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    let base = root.join("app/src/main/res/values/strings.xml");
    write(
        &base,
        indoc! {r#"
            <resources>
                <string name="a">a</string>
                <string name="rich">Hello <b>World</b>  </string>
            </resources>
        "#},
    );
    let input = root.join("input.csv");
    write(&input, "strings-name,default\na,AA\n");
    let config = Config::new().with_project_root(root).with_input_sheet(&input);

    import(&config, &config.module_filter(), ImportOptions::new()).unwrap();

    let written = fs::read_to_string(&base).unwrap();
    assert!(written.contains(r#"<string name="rich">Hello <b>World</b>  </string>"#));
    assert!(written.contains(r#"<string name="a">AA</string>"#));
    assert_eq!(
        read_items(&base),
        vec![
            StringItem::new("a", "AA"),
            StringItem::new("rich", "Hello <b>World</b>  "),
        ]
    );
}

#[test]
fn test_import_accepts_trailing_comma_in_csv_header() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    seed_project(root);
    let input = root.join("input.csv");
    write(&input, "strings-name,default,\nlib_title,Library v2,\n");
    let config = Config::new().with_project_root(root).with_input_sheet(&input);

    let report = import(&config, &config.module_filter(), ImportOptions::new()).unwrap();
    assert_eq!(report.sheet_locales, vec!["default"]);
    assert_eq!(report.failures().count(), 0);
    assert!(
        read_items(&root.join("lib/src/main/res/values/strings.xml"))
            .contains(&StringItem::new("lib_title", "Library v2"))
    );
}
