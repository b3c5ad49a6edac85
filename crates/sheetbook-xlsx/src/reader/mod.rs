//! Workbook part reader

use std::io::BufRead;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::error::XlsxResult;
use crate::xml::{attr_parse, attr_string, has_attr, read_element_text, read_subtree};
use sheetbook_core::{DefinedName, NameScope, SheetState, Workbook};

/// A `<sheet>` entry as found in the workbook part
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetItemInfo {
    /// Sheet name
    pub name: String,
    /// Durable sheet ID (`sheetId`), 0 when missing or malformed
    pub sheet_id: u32,
    /// Relationship ID pointing at the worksheet part
    pub r_id: String,
    /// Raw `state` attribute
    pub state: Option<String>,
}

/// What a pass over the workbook part leaves for worksheet construction
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkbookPart {
    /// Sheets in tab order
    pub sheets: Vec<SheetItemInfo>,
    /// `activeTab` of the first book view
    pub active_tab: Option<usize>,
    /// Sheet-scoped defined names as `(name index, position in sheets)`
    ///
    /// Scopes are bound to real sheet IDs once the sheets exist, since a
    /// sheet may not keep the ID stored in the file.
    pub local_scopes: Vec<(usize, usize)>,
}

/// Reader for `xl/workbook.xml`
pub struct XlsxReader;

impl XlsxReader {
    /// Load a workbook from the bytes of a workbook part
    ///
    /// Worksheets are created from the `<sheets>` list with their stored sheet
    /// IDs and visibility. A part without sheets yields a workbook with one
    /// generated sheet.
    pub fn read_workbook_part(xml: &[u8]) -> XlsxResult<Workbook> {
        let mut workbook = Workbook::empty();
        let part = Self::read_workbook_xml(&mut workbook, xml)?;
        Self::materialize_worksheets(&mut workbook, &part)?;

        if workbook.is_empty() {
            log::warn!("workbook part lists no sheets, adding a default one");
            workbook.add_worksheet()?;
        }

        Ok(workbook)
    }

    /// Read the workbook part into `workbook`
    ///
    /// Book settings and defined names are applied directly. Sheets are
    /// returned so the caller can build them (see
    /// [`XlsxReader::materialize_worksheets`]). Until then a sheet-scoped name
    /// carries the sheet ID found in the file.
    ///
    /// Whitespace between elements is skipped; defined-name formulas keep
    /// theirs.
    pub fn read_workbook_xml<R: BufRead>(
        workbook: &mut Workbook,
        source: R,
    ) -> XlsxResult<WorkbookPart> {
        let mut reader = Reader::from_reader(source);
        reader.trim_text(true);

        let mut buf = Vec::new();
        let mut part = WorkbookPart::default();

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(e) if e.name().as_ref() == b"bookViews" => {
                    Self::read_book_views(&mut reader, workbook, &mut part)?;
                }
                Event::Start(e) if e.name().as_ref() == b"definedName" => {
                    let mut defined = Self::defined_name_from(workbook, &e, &mut part);
                    reader.trim_text(false);
                    let formula = read_element_text(&mut reader, b"definedName")?;
                    reader.trim_text(true);
                    defined.formula = formula
                        .strip_prefix('=')
                        .map(str::to_string)
                        .unwrap_or(formula);
                    workbook.defined_names_mut().push(defined);
                }
                Event::Empty(e) if e.name().as_ref() == b"definedName" => {
                    let defined = Self::defined_name_from(workbook, &e, &mut part);
                    workbook.defined_names_mut().push(defined);
                }
                Event::Start(e) | Event::Empty(e) => match e.name().as_ref() {
                    b"sheet" => part.sheets.push(Self::sheet_item_from(&e)),
                    b"workbookPr" => {
                        if has_attr(&e, b"date1904") {
                            workbook.set_date_1904(true);
                        }
                    }
                    _ => {}
                },
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        log::debug!(
            "read workbook part: {} sheets, {} defined names",
            part.sheets.len(),
            workbook.defined_names().len()
        );

        Ok(part)
    }

    /// Create the worksheets listed in a workbook part
    ///
    /// Sheets are appended in tab order with their states. Stored sheet IDs
    /// are kept when usable; missing, zero and repeated ones are replaced by
    /// IDs above every stored one. Unusable names are replaced as well. Then
    /// sheet-scoped names are bound to the sheets they point at, and the
    /// active and first visible sheet are checked against the result.
    pub fn materialize_worksheets(workbook: &mut Workbook, part: &WorkbookPart) -> XlsxResult<()> {
        let sheet_ids = Self::assign_sheet_ids(workbook, part);

        let mut positions = Vec::with_capacity(part.sheets.len());
        for (info, &sheet_id) in part.sheets.iter().zip(&sheet_ids) {
            if sheet_id != info.sheet_id {
                log::warn!(
                    "sheet '{}' has unusable sheet ID {}, using {}",
                    info.name,
                    info.sheet_id,
                    sheet_id
                );
            }
            let index = workbook.add_worksheet_with_id(&info.name, sheet_id);
            if let Some(state) = &info.state {
                if let Some(sheet) = workbook.worksheet_mut(index) {
                    sheet.set_state(SheetState::from_ooxml(state));
                }
            }
            positions.push(index);
        }

        for &(name_index, position) in &part.local_scopes {
            let sheet_id = positions
                .get(position)
                .and_then(|&index| workbook.worksheet(index))
                .map(|ws| ws.sheet_id());
            if let (Some(sheet_id), Some(defined)) =
                (sheet_id, workbook.defined_names_mut().get_mut(name_index))
            {
                defined.scope = NameScope::Sheet(sheet_id);
            }
        }

        if let Some(tab) = part.active_tab {
            if workbook.set_active_sheet(tab).is_err() {
                log::warn!(
                    "activeTab {} out of range for {} sheets, keeping {}",
                    tab,
                    workbook.sheet_count(),
                    workbook.active_sheet()
                );
            }
        }

        let first_sheet = workbook.settings().first_sheet;
        if first_sheet > 0 && first_sheet >= workbook.sheet_count() {
            log::warn!("firstSheet {} out of range, resetting to 0", first_sheet);
            workbook.settings_mut().first_sheet = 0;
        }

        Ok(())
    }

    /// Final sheet ID for each listed sheet
    ///
    /// The first sheet to claim a stored ID keeps it. Fresh IDs start above
    /// every stored ID and every ID the workbook has handed out.
    fn assign_sheet_ids(workbook: &Workbook, part: &WorkbookPart) -> Vec<u32> {
        let mut taken: Vec<u32> = workbook.worksheets().map(|ws| ws.sheet_id()).collect();
        let mut kept = Vec::with_capacity(part.sheets.len());
        for info in &part.sheets {
            if info.sheet_id != 0 && !taken.contains(&info.sheet_id) {
                taken.push(info.sheet_id);
                kept.push(Some(info.sheet_id));
            } else {
                kept.push(None);
            }
        }

        let mut next = taken
            .iter()
            .copied()
            .max()
            .unwrap_or(0)
            .max(workbook.last_sheet_id());
        kept.into_iter()
            .map(|id| {
                id.unwrap_or_else(|| {
                    next += 1;
                    next
                })
            })
            .collect()
    }

    fn sheet_item_from(e: &BytesStart<'_>) -> SheetItemInfo {
        SheetItemInfo {
            name: attr_string(e, b"name").unwrap_or_default(),
            sheet_id: attr_parse(e, b"sheetId").unwrap_or(0),
            r_id: attr_string(e, b"r:id").unwrap_or_default(),
            state: attr_string(e, b"state"),
        }
    }

    /// Attributes of a `<definedName>`; the formula is filled in by the caller
    fn defined_name_from(
        workbook: &Workbook,
        e: &BytesStart<'_>,
        part: &mut WorkbookPart,
    ) -> DefinedName {
        let name = attr_string(e, b"name").unwrap_or_default();

        // localSheetId indexes the <sheets> list, which precedes <definedNames>
        let scope = match attr_parse::<usize>(e, b"localSheetId") {
            None => NameScope::Workbook,
            Some(idx) => match part.sheets.get(idx) {
                Some(info) => {
                    part.local_scopes.push((workbook.defined_names().len(), idx));
                    NameScope::Sheet(info.sheet_id)
                }
                None => {
                    log::warn!(
                        "defined name '{}' has localSheetId {} but only {} sheets, using workbook scope",
                        name,
                        idx,
                        part.sheets.len()
                    );
                    NameScope::Workbook
                }
            },
        };

        let mut defined = DefinedName::new(name, "", scope);
        defined.comment = attr_string(e, b"comment").filter(|c| !c.is_empty());
        defined
    }

    fn read_book_views<R: BufRead>(
        reader: &mut Reader<R>,
        workbook: &mut Workbook,
        part: &mut WorkbookPart,
    ) -> XlsxResult<()> {
        let mut seen_view = false;

        read_subtree(reader, b"bookViews", |event| {
            let e = match event {
                Event::Start(e) | Event::Empty(e) if e.name().as_ref() == b"workbookView" => e,
                _ => return Ok(()),
            };
            // Only the first view drives the window
            if seen_view {
                return Ok(());
            }
            seen_view = true;

            let settings = workbook.settings_mut();
            if let Some(x) = attr_parse(e, b"xWindow") {
                settings.window.x = x;
            }
            if let Some(y) = attr_parse(e, b"yWindow") {
                settings.window.y = y;
            }
            if let Some(width) = attr_parse(e, b"windowWidth") {
                settings.window.width = width;
            }
            if let Some(height) = attr_parse(e, b"windowHeight") {
                settings.window.height = height;
            }
            if let Some(first) = attr_parse(e, b"firstSheet") {
                settings.first_sheet = first;
            }
            if let Some(tab) = attr_parse(e, b"activeTab") {
                part.active_tab = Some(tab);
            }
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sheetbook_core::WindowGeometry;

    const BOOK: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
  <fileVersion appName="xl" lastEdited="4" lowestEdited="4" rupBuild="4505"/>
  <workbookPr date1904="1" defaultThemeVersion="124226"/>
  <bookViews>
    <workbookView xWindow="120" yWindow="45" windowWidth="20000" windowHeight="8000" firstSheet="1" activeTab="2"/>
  </bookViews>
  <sheets>
    <sheet name="Summary" sheetId="4" r:id="rId1"/>
    <sheet name="Raw" sheetId="2" state="hidden" r:id="rId2"/>
    <sheet name="Notes" sheetId="7" r:id="rId3"/>
  </sheets>
  <definedNames>
    <definedName name="Total" comment="grand total">Summary!$B$10</definedName>
    <definedName name="Rows" localSheetId="1">Raw!$A$1:$A$50</definedName>
    <definedName name="Stray" localSheetId="9">Notes!$A$1</definedName>
  </definedNames>
  <calcPr calcId="124519"/>
</workbook>"#;

    #[test]
    fn test_read_workbook_xml() {
        let mut wb = Workbook::empty();
        let part = XlsxReader::read_workbook_xml(&mut wb, BOOK.as_bytes()).unwrap();

        assert_eq!(
            part.sheets[1],
            SheetItemInfo {
                name: "Raw".into(),
                sheet_id: 2,
                r_id: "rId2".into(),
                state: Some("hidden".into()),
            }
        );
        assert_eq!(part.sheets.len(), 3);
        assert_eq!(part.active_tab, Some(2));

        assert!(wb.is_date_1904());
        let window = wb.settings().window;
        assert_eq!((window.x, window.y, window.width, window.height), (120, 45, 20000, 8000));
        assert_eq!(wb.settings().first_sheet, 1);

        let names: Vec<_> = wb.defined_names().iter().collect();
        assert_eq!(names.len(), 3);
        assert_eq!(names[0].formula, "Summary!$B$10");
        assert_eq!(names[0].comment.as_deref(), Some("grand total"));
        assert_eq!(names[0].scope, NameScope::Workbook);
        assert_eq!(names[1].scope, NameScope::Sheet(2));
        assert_eq!(names[2].scope, NameScope::Workbook);
        assert_eq!(part.local_scopes, vec![(1, 1)]);

        // Nothing is built until materialization
        assert!(wb.is_empty());
    }

    #[test]
    fn test_read_workbook_part() {
        let wb = XlsxReader::read_workbook_part(BOOK.as_bytes()).unwrap();

        assert_eq!(wb.sheet_names(), vec!["Summary", "Raw", "Notes"]);
        let ids: Vec<_> = wb.worksheets().map(|ws| ws.sheet_id()).collect();
        assert_eq!(ids, vec![4, 2, 7]);
        assert_eq!(wb.worksheet(1).unwrap().state(), SheetState::Hidden);
        assert_eq!(wb.active_sheet(), 2);

        let rows = wb.defined_names().iter().find(|n| n.name == "Rows").unwrap();
        assert_eq!(wb.local_sheet_index(&rows.scope), Some(1));
    }

    #[test]
    fn test_later_sheets_get_ids_above_loaded_ones() {
        let mut wb = XlsxReader::read_workbook_part(BOOK.as_bytes()).unwrap();
        let index = wb.add_worksheet().unwrap();
        assert_eq!(wb.worksheet(index).unwrap().sheet_id(), 8);
        assert_eq!(wb.worksheet(index).unwrap().name(), "Sheet1");
    }

    #[test]
    fn test_defaults_without_optional_elements() {
        let xml = r#"<workbook><sheets><sheet name="Only" sheetId="1" r:id="rId1"/></sheets></workbook>"#;
        let wb = XlsxReader::read_workbook_part(xml.as_bytes()).unwrap();

        assert!(!wb.is_date_1904());
        assert_eq!(wb.settings().window, WindowGeometry::default());
        assert_eq!(wb.settings().first_sheet, 0);
        assert_eq!(wb.active_sheet(), 0);
        assert!(wb.defined_names().is_empty());
    }

    #[test]
    fn test_date1904_is_set_by_presence() {
        let xml = r#"<workbook><workbookPr date1904="false"/><sheets/></workbook>"#;
        let mut wb = Workbook::empty();
        XlsxReader::read_workbook_xml(&mut wb, xml.as_bytes()).unwrap();
        assert!(wb.is_date_1904());
    }

    #[test]
    fn test_malformed_attributes_keep_defaults() {
        let xml = r#"<workbook>
            <bookViews><workbookView xWindow="left" yWindow="30" activeTab="-1"/></bookViews>
            <sheets><sheet name="A" sheetId="x" r:id="rId1"/><sheet name="B" sheetId="1" r:id="rId2"/></sheets>
        </workbook>"#;
        let wb = XlsxReader::read_workbook_part(xml.as_bytes()).unwrap();

        assert_eq!(wb.settings().window.x, 240);
        assert_eq!(wb.settings().window.y, 30);
        assert_eq!(wb.active_sheet(), 0);

        // A missing sheetId is replaced by one above every stored ID
        let ids: Vec<_> = wb.worksheets().map(|ws| ws.sheet_id()).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn test_local_scope_survives_replaced_sheet_ids() {
        let xml = r#"<workbook><sheets>
            <sheet name="A" sheetId="0" r:id="rId1"/>
            <sheet name="B" sheetId="1" r:id="rId2"/>
            <sheet name="C" sheetId="1" r:id="rId3"/>
        </sheets><definedNames>
            <definedName name="OnB" localSheetId="1">B!$A$1</definedName>
            <definedName name="OnC" localSheetId="2">C!$A$1</definedName>
            <definedName name="OnA" localSheetId="0">A!$A$1</definedName>
        </definedNames></workbook>"#;
        let wb = XlsxReader::read_workbook_part(xml.as_bytes()).unwrap();

        let ids: Vec<_> = wb.worksheets().map(|ws| ws.sheet_id()).collect();
        assert_eq!(ids, vec![2, 1, 3]);

        let positions: Vec<_> = wb
            .defined_names()
            .iter()
            .map(|n| (n.name.as_str(), wb.local_sheet_index(&n.scope)))
            .collect();
        assert_eq!(
            positions,
            vec![("OnB", Some(1)), ("OnC", Some(2)), ("OnA", Some(0))]
        );
    }

    #[test]
    fn test_unusable_sheet_names_are_replaced() {
        let xml = r#"<workbook><sheets>
            <sheet sheetId="1" r:id="rId1"/>
            <sheet name="Ok" sheetId="2" r:id="rId2"/>
            <sheet name="OK" sheetId="3" r:id="rId3"/>
            <sheet name="in/out" sheetId="4" r:id="rId4"/>
            <sheet name="ThisSheetNameIsFarTooLongForExcel" sheetId="5" r:id="rId5"/>
        </sheets></workbook>"#;
        let wb = XlsxReader::read_workbook_part(xml.as_bytes()).unwrap();

        assert_eq!(
            wb.sheet_names(),
            vec!["Sheet1", "Ok", "OK(2)", "Sheet2", "Sheet3"]
        );
        let ids: Vec<_> = wb.worksheets().map(|ws| ws.sheet_id()).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_formula_whitespace_is_kept() {
        let xml = "<workbook><sheets><sheet name=\"A\" sheetId=\"1\" r:id=\"rId1\"/></sheets>\n\
            <definedNames>\n  <definedName name=\"Padded\"> A!$A$1 + 1 </definedName>\n</definedNames></workbook>";
        let wb = XlsxReader::read_workbook_part(xml.as_bytes()).unwrap();
        let padded = wb.defined_names().iter().next().unwrap();
        assert_eq!(padded.formula, " A!$A$1 + 1 ");
    }

    #[test]
    fn test_out_of_range_view_indices_are_clamped() {
        let xml = r#"<workbook>
            <bookViews><workbookView firstSheet="5" activeTab="3"/></bookViews>
            <sheets><sheet name="A" sheetId="1" r:id="rId1"/></sheets>
        </workbook>"#;
        let wb = XlsxReader::read_workbook_part(xml.as_bytes()).unwrap();
        assert_eq!(wb.active_sheet(), 0);
        assert_eq!(wb.settings().first_sheet, 0);
    }

    #[test]
    fn test_empty_defined_name_and_prefixed_formula() {
        let xml = r#"<workbook><sheets><sheet name="A" sheetId="1" r:id="rId1"/></sheets>
            <definedNames><definedName name="Blank"/><definedName name="Eq" localSheetId="0">=A!$C$3</definedName></definedNames>
        </workbook>"#;
        let wb = XlsxReader::read_workbook_part(xml.as_bytes()).unwrap();
        let names: Vec<_> = wb.defined_names().iter().collect();
        assert_eq!(names[0].formula, "");
        assert_eq!(names[1].formula, "A!$C$3");
        assert_eq!(names[1].scope, NameScope::Sheet(1));
    }

    #[test]
    fn test_no_sheets_yields_default_sheet() {
        let wb = XlsxReader::read_workbook_part(b"<workbook/>").unwrap();
        assert_eq!(wb.sheet_names(), vec!["Sheet1"]);
    }

    #[test]
    fn test_syntax_error_is_reported() {
        let xml = r#"<workbook><sheets><sheet name="A" sheetId="1"></workbook>"#;
        assert!(XlsxReader::read_workbook_part(xml.as_bytes()).is_err());
    }
}
