//! Workbook part writer

use std::io::{Cursor, Write};

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::error::XlsxResult;
use crate::path::relationships_path;
use crate::{PACKAGE_RELATIONSHIPS_NS, SPREADSHEETML_NS, WORKBOOK_PART};
use sheetbook_core::relationships::OFFICE_DOCUMENT_RELATIONSHIPS;
use sheetbook_core::{Relationships, SheetState, Workbook};

/// Writer for `xl/workbook.xml` and its relationship part
pub struct XlsxWriter;

impl XlsxWriter {
    /// Serialize the workbook part and its relationships
    ///
    /// Returns `(package path, bytes)` pairs, workbook part first.
    pub fn workbook_parts(workbook: &mut Workbook) -> XlsxResult<Vec<(String, Vec<u8>)>> {
        let workbook_xml = Self::workbook_xml(workbook)?;
        let rels_xml = Self::relationships_xml(workbook.relationships())?;
        Ok(vec![
            (WORKBOOK_PART.to_string(), workbook_xml),
            (relationships_path(WORKBOOK_PART), rels_xml),
        ])
    }

    /// Serialize the workbook part into a byte buffer
    pub fn workbook_xml(workbook: &mut Workbook) -> XlsxResult<Vec<u8>> {
        let mut out = Vec::new();
        Self::write_workbook_xml(workbook, &mut out)?;
        Ok(out)
    }

    /// Write the workbook part
    ///
    /// The relationship table is rebuilt first so that the `r:id` written for
    /// each sheet matches [`Workbook::relationships`].
    pub fn write_workbook_xml<W: Write>(workbook: &mut Workbook, out: W) -> XlsxResult<()> {
        workbook.rebuild_relationships();

        let mut writer = Writer::new(out);
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;

        let mut root = BytesStart::new("workbook");
        root.push_attribute(("xmlns", SPREADSHEETML_NS));
        root.push_attribute(("xmlns:r", OFFICE_DOCUMENT_RELATIONSHIPS));
        writer.write_event(Event::Start(root))?;

        let mut file_version = BytesStart::new("fileVersion");
        file_version.push_attribute(("appName", "xl"));
        file_version.push_attribute(("lastEdited", "4"));
        file_version.push_attribute(("lowestEdited", "4"));
        file_version.push_attribute(("rupBuild", "4505"));
        writer.write_event(Event::Empty(file_version))?;

        let mut workbook_pr = BytesStart::new("workbookPr");
        if workbook.is_date_1904() {
            workbook_pr.push_attribute(("date1904", "1"));
        }
        workbook_pr.push_attribute(("defaultThemeVersion", "124226"));
        writer.write_event(Event::Empty(workbook_pr))?;

        Self::write_book_views(&mut writer, workbook)?;
        Self::write_sheets(&mut writer, workbook)?;
        Self::write_defined_names(&mut writer, workbook)?;

        let mut calc_pr = BytesStart::new("calcPr");
        calc_pr.push_attribute(("calcId", "124519"));
        writer.write_event(Event::Empty(calc_pr))?;

        writer.write_event(Event::End(BytesEnd::new("workbook")))?;

        log::debug!(
            "wrote workbook part: {} sheets, {} defined names",
            workbook.sheet_count(),
            workbook.defined_names().len()
        );
        Ok(())
    }

    /// Serialize a relationship table as a package relationship part
    pub fn relationships_xml(relationships: &Relationships) -> XlsxResult<Vec<u8>> {
        let mut writer = Writer::new(Cursor::new(Vec::new()));
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;

        let mut root = BytesStart::new("Relationships");
        root.push_attribute(("xmlns", PACKAGE_RELATIONSHIPS_NS));
        writer.write_event(Event::Start(root))?;

        for rel in relationships.iter() {
            let mut elem = BytesStart::new("Relationship");
            elem.push_attribute(("Id", rel.id.as_str()));
            elem.push_attribute(("Type", rel.rel_type.as_str()));
            elem.push_attribute(("Target", rel.target.as_str()));
            writer.write_event(Event::Empty(elem))?;
        }

        writer.write_event(Event::End(BytesEnd::new("Relationships")))?;
        Ok(writer.into_inner().into_inner())
    }

    fn write_book_views<W: Write>(writer: &mut Writer<W>, workbook: &Workbook) -> XlsxResult<()> {
        let settings = workbook.settings();
        let window = settings.window;

        writer.write_event(Event::Start(BytesStart::new("bookViews")))?;

        let mut view = BytesStart::new("workbookView");
        view.push_attribute(("xWindow", window.x.to_string().as_str()));
        view.push_attribute(("yWindow", window.y.to_string().as_str()));
        view.push_attribute(("windowWidth", window.width.to_string().as_str()));
        view.push_attribute(("windowHeight", window.height.to_string().as_str()));
        if settings.first_sheet > 0 {
            view.push_attribute(("firstSheet", settings.first_sheet.to_string().as_str()));
        }
        if workbook.active_sheet() > 0 {
            view.push_attribute(("activeTab", workbook.active_sheet().to_string().as_str()));
        }
        writer.write_event(Event::Empty(view))?;

        writer.write_event(Event::End(BytesEnd::new("bookViews")))?;
        Ok(())
    }

    fn write_sheets<W: Write>(writer: &mut Writer<W>, workbook: &Workbook) -> XlsxResult<()> {
        writer.write_event(Event::Start(BytesStart::new("sheets")))?;

        for (i, sheet) in workbook.worksheets().enumerate() {
            let mut elem = BytesStart::new("sheet");
            elem.push_attribute(("name", sheet.name()));
            elem.push_attribute(("sheetId", sheet.sheet_id().to_string().as_str()));
            if sheet.state() != SheetState::Visible {
                elem.push_attribute(("state", sheet.state().as_str()));
            }
            elem.push_attribute(("r:id", format!("rId{}", i + 1).as_str()));
            writer.write_event(Event::Empty(elem))?;
        }

        writer.write_event(Event::End(BytesEnd::new("sheets")))?;
        Ok(())
    }

    fn write_defined_names<W: Write>(writer: &mut Writer<W>, workbook: &Workbook) -> XlsxResult<()> {
        if workbook.defined_names().is_empty() {
            return Ok(());
        }

        writer.write_event(Event::Start(BytesStart::new("definedNames")))?;

        for defined in workbook.defined_names().iter() {
            let mut elem = BytesStart::new("definedName");
            elem.push_attribute(("name", defined.name.as_str()));
            if let Some(comment) = &defined.comment {
                elem.push_attribute(("comment", comment.as_str()));
            }
            // A scope whose sheet was deleted is written as a global name
            if let Some(index) = workbook.local_sheet_index(&defined.scope) {
                elem.push_attribute(("localSheetId", index.to_string().as_str()));
            }
            writer.write_event(Event::Start(elem))?;
            writer.write_event(Event::Text(BytesText::new(&defined.formula)))?;
            writer.write_event(Event::End(BytesEnd::new("definedName")))?;
        }

        writer.write_event(Event::End(BytesEnd::new("definedNames")))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sheetbook_core::WindowGeometry;

    fn xml_of(wb: &mut Workbook) -> String {
        String::from_utf8(XlsxWriter::workbook_xml(wb).unwrap()).unwrap()
    }

    #[test]
    fn test_default_workbook_xml() {
        let mut wb = Workbook::new();
        let xml = xml_of(&mut wb);

        assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#));
        assert!(xml.contains(
            r#"<fileVersion appName="xl" lastEdited="4" lowestEdited="4" rupBuild="4505"/>"#
        ));
        assert!(xml.contains(r#"<workbookPr defaultThemeVersion="124226"/>"#));
        assert!(xml.contains(
            r#"<workbookView xWindow="240" yWindow="15" windowWidth="16095" windowHeight="9660"/>"#
        ));
        assert!(xml.contains(r#"<sheet name="Sheet1" sheetId="1" r:id="rId1"/>"#));
        assert!(!xml.contains("definedNames"));
        assert!(xml.ends_with(r#"<calcPr calcId="124519"/></workbook>"#));
    }

    #[test]
    fn test_optional_attributes() {
        let mut wb = Workbook::new();
        wb.add_worksheet_with_name("Hidden").unwrap();
        wb.add_worksheet_with_name("Secret").unwrap();
        wb.worksheet_mut(1).unwrap().set_hidden(true);
        wb.worksheet_mut(2)
            .unwrap()
            .set_state(SheetState::VeryHidden);
        wb.set_active_sheet(2).unwrap();
        wb.settings_mut().first_sheet = 1;
        wb.settings_mut().window = WindowGeometry {
            x: 0,
            y: 0,
            width: 100,
            height: 50,
        };
        wb.set_date_1904(true);

        let xml = xml_of(&mut wb);
        assert!(xml.contains(r#"<workbookPr date1904="1" defaultThemeVersion="124226"/>"#));
        assert!(xml.contains(
            r#"<workbookView xWindow="0" yWindow="0" windowWidth="100" windowHeight="50" firstSheet="1" activeTab="2"/>"#
        ));
        assert!(xml.contains(r#"<sheet name="Hidden" sheetId="2" state="hidden" r:id="rId2"/>"#));
        assert!(xml.contains(r#"<sheet name="Secret" sheetId="3" state="veryHidden" r:id="rId3"/>"#));
    }

    #[test]
    fn test_defined_names() {
        let mut wb = Workbook::new();
        wb.add_worksheet_with_name("Data").unwrap();
        wb.add_worksheet_with_name("Gone").unwrap();
        wb.define_name("Total", "=Sheet1!$A$1", "sum & more", "");
        wb.define_name("Local", "Data!$B$2:$B$9", "", "Data");
        wb.define_name("Orphan", "Gone!$A$1", "", "Gone");
        wb.delete_worksheet(2).unwrap();

        let xml = xml_of(&mut wb);
        assert!(xml.contains(
            r#"<definedName name="Total" comment="sum &amp; more">Sheet1!$A$1</definedName>"#
        ));
        assert!(xml.contains(r#"<definedName name="Local" localSheetId="1">Data!$B$2:$B$9</definedName>"#));
        // Scope of a deleted sheet is dropped
        assert!(xml.contains(r#"<definedName name="Orphan">Gone!$A$1</definedName>"#));
    }

    #[test]
    fn test_local_sheet_id_follows_moves() {
        let mut wb = Workbook::new();
        wb.add_worksheet_with_name("Data").unwrap();
        wb.define_name("Local", "Data!$A$1", "", "Data");
        wb.move_worksheet(1, 0).unwrap();

        let xml = xml_of(&mut wb);
        assert!(xml.contains(r#"localSheetId="0""#));
    }

    #[test]
    fn test_relationships_match_sheet_rids() {
        let mut wb = Workbook::new();
        wb.add_worksheet().unwrap();
        wb.shared_strings_mut().add("hello");

        let parts = XlsxWriter::workbook_parts(&mut wb).unwrap();
        assert_eq!(parts[0].0, "xl/workbook.xml");
        assert_eq!(parts[1].0, "xl/_rels/workbook.xml.rels");

        let rels = String::from_utf8(parts[1].1.clone()).unwrap();
        assert!(rels.contains(
            r#"<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet2.xml"/>"#
        ));
        assert!(rels.contains(r#"Id="rId5" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/sharedStrings""#));
        assert_eq!(wb.relationships().len(), 5);
    }

    #[test]
    fn test_save_rebuilds_relationships_each_time() {
        let mut wb = Workbook::new();
        wb.add_worksheet().unwrap();
        xml_of(&mut wb);
        assert_eq!(wb.relationships().len(), 4);

        wb.delete_worksheet(1).unwrap();
        xml_of(&mut wb);
        assert_eq!(wb.relationships().len(), 3);
    }
}
