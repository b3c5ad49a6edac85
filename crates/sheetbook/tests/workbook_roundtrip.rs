//! End-to-end tests for the workbook part (build -> save -> load -> verify)

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use sheetbook::prelude::*;

/// Hidden sheets, both kinds of defined names and the 1904 epoch survive a round trip
#[test]
fn test_roundtrip_sheets_names_and_epoch() {
    let mut wb = Workbook::new();
    wb.add_worksheet_with_name("Inputs").unwrap();
    wb.add_worksheet_with_name("Scratch").unwrap();
    wb.add_worksheet_with_name("Report").unwrap();
    wb.worksheet_mut(2).unwrap().set_hidden(true);
    wb.set_date_1904(true);
    wb.define_name("Rate", "=Inputs!$B$2", "annual rate", "");
    wb.define_name("Lines", "Inputs!$A$5:$A$40", "", "Inputs");

    let xml = wb.to_workbook_xml().unwrap();
    let loaded = Workbook::from_workbook_xml(&xml).unwrap();

    assert_eq!(loaded.sheet_names(), vec!["Sheet1", "Inputs", "Scratch", "Report"]);
    let hidden: Vec<bool> = loaded.worksheets().map(|ws| ws.is_hidden()).collect();
    assert_eq!(hidden, vec![false, false, true, false]);
    assert!(loaded.is_date_1904());

    let names: Vec<&DefinedName> = loaded.defined_names().iter().collect();
    assert_eq!(names.len(), 2);

    assert_eq!(names[0].name, "Rate");
    assert_eq!(names[0].formula, "Inputs!$B$2");
    assert_eq!(names[0].comment.as_deref(), Some("annual rate"));
    assert_eq!(names[0].scope, NameScope::Workbook);

    assert_eq!(names[1].name, "Lines");
    let inputs = loaded.worksheet_by_name("Inputs").unwrap();
    assert_eq!(names[1].scope, NameScope::Sheet(inputs.sheet_id()));
    assert_eq!(loaded.local_sheet_index(&names[1].scope), Some(1));
}

#[test]
fn test_sheet_ids_survive_deletes_and_keep_growing() {
    let mut wb = Workbook::new();
    for _ in 0..4 {
        wb.add_worksheet().unwrap();
    }
    wb.delete_worksheet(1).unwrap();
    wb.delete_worksheet(3).unwrap();

    let xml = wb.to_workbook_xml().unwrap();
    let mut loaded = Workbook::from_workbook_xml(&xml).unwrap();

    let ids: Vec<u32> = loaded.worksheets().map(|ws| ws.sheet_id()).collect();
    assert_eq!(ids, vec![1, 3, 4]);

    let index = loaded.copy_worksheet(0, "").unwrap();
    let copy = loaded.worksheet(index).unwrap();
    assert_eq!(copy.name(), "Sheet1(2)");
    assert_eq!(copy.sheet_id(), 5);
}

#[test]
fn test_loaded_epoch_drives_date_serials() {
    let date = NaiveDate::from_ymd_opt(2013, 8, 25)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();

    let mut wb = Workbook::new();
    assert_eq!(wb.datetime_to_serial(date), 41511.0);

    wb.set_date_1904(true);
    let loaded = Workbook::from_workbook_xml(&wb.to_workbook_xml().unwrap()).unwrap();
    assert_eq!(loaded.datetime_to_serial(date), 40049.0);
    assert_eq!(loaded.datetime_from_serial(40049.0), Some(date));
}

#[test]
fn test_workbook_parts_paths() {
    let mut wb = Workbook::new();
    let parts = XlsxWriter::workbook_parts(&mut wb).unwrap();
    let paths: Vec<&str> = parts.iter().map(|(path, _)| path.as_str()).collect();
    assert_eq!(paths, vec!["xl/workbook.xml", "xl/_rels/workbook.xml.rels"]);
}
