use claim_audit_rust::report::{
    Block, Cell, ColumnSpec, ReportDocument, ReportLayoutEngine, Section, SectionKind, SectionRow,
};
use claim_audit_rust::{AuditError, LayoutConfig};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

// title 18 + header row 16
const BAND: f32 = 34.0;
const ROW: f32 = 16.0;

fn config_for(rows_per_page: usize) -> LayoutConfig {
    let base = LayoutConfig::default();
    LayoutConfig {
        page_height: base.margin_top + BAND + rows_per_page as f32 * ROW + base.safe_margin,
        ..base
    }
}

fn table(id: &str, rows: usize) -> Section {
    Section {
        id: id.to_string(),
        kind: SectionKind::CategoryTable,
        title: format!("{} | {} line(s)", id.to_uppercase(), rows),
        columns: vec![ColumnSpec::left(60.0), ColumnSpec::left(280.0), ColumnSpec::right(80.0)],
        header: vec!["Status".to_string(), "Description".to_string(), "Total".to_string()],
        rows: (0..rows)
            .map(|i| {
                SectionRow::new(vec![
                    Cell::plain("SAME"),
                    Cell::plain(format!("Line {i}")),
                    Cell::plain("$10.00"),
                ])
            })
            .collect(),
    }
}

fn wrapped_table(id: &str, descriptions: &[String]) -> Section {
    Section {
        rows: descriptions
            .iter()
            .map(|d| SectionRow::new(vec![Cell::plain("NEW"), Cell::plain(d.clone()), Cell::plain("$1.00")]))
            .collect(),
        ..table(id, 0)
    }
}

fn first_block_is_header(doc: &ReportDocument, section: &str) -> bool {
    doc.pages_for_section(section).all(|page| match page.blocks.first() {
        Some(Block::Header(band)) => band.section == section,
        _ => false,
    })
}

#[test]
fn scenario_d_hundred_twenty_rows_make_six_pages() {
    let doc = ReportLayoutEngine::new(config_for(20))
        .layout(&[table("parts", 120)])
        .unwrap();

    assert_eq!(doc.page_count(), 6);
    for page in &doc.pages {
        assert_eq!(page.headers().count(), 1);
        assert_eq!(page.rows().count(), 20);
    }
    assert!(first_block_is_header(&doc, "parts"));
}

#[test]
fn repeated_headers_match_the_first_one() {
    let doc = ReportLayoutEngine::new(config_for(7))
        .layout(&[table("labor", 30)])
        .unwrap();

    let headers: Vec<Vec<String>> = doc
        .pages
        .iter()
        .flat_map(|p| p.headers().map(|h| h.text()).collect::<Vec<_>>())
        .collect();
    assert_eq!(headers.len(), doc.page_count());
    assert!(headers.iter().all(|h| h == &headers[0]));
    assert_eq!(headers[0], vec!["LABOR | 30 line(s)", "Status", "Description", "Total"]);
}

#[test]
fn following_section_starts_after_a_gap_or_on_a_new_page() {
    let doc = ReportLayoutEngine::new(config_for(12))
        .layout(&[table("parts", 4), table("labor", 4)])
        .unwrap();

    // 98 + gap 14 + 98 fits in the 226pt left by a twelve-row page
    assert_eq!(doc.page_count(), 1);
    let headers: Vec<&str> = doc.pages[0].headers().map(|h| h.section.as_str()).collect();
    assert_eq!(headers, vec!["parts", "labor"]);

    let doc = ReportLayoutEngine::new(config_for(10))
        .layout(&[table("parts", 9), table("labor", 4)])
        .unwrap();
    assert_eq!(doc.page_count(), 2);
    assert!(!doc.pages[0].holds_section("labor"));
    assert!(first_block_is_header(&doc, "labor"));
}

#[test]
fn every_page_gets_a_numbered_footer() {
    let doc = ReportLayoutEngine::new(config_for(5))
        .with_footer_label("Claim CLM-7")
        .layout(&[table("parts", 12)])
        .unwrap();

    assert_eq!(doc.page_count(), 3);
    let footers: Vec<String> = doc
        .pages
        .iter()
        .filter_map(|p| p.footer())
        .map(|f| f.page_text())
        .collect();
    assert_eq!(footers, vec!["Page 1 of 3", "Page 2 of 3", "Page 3 of 3"]);
}

#[test]
fn a_row_taller_than_the_page_is_an_overflow() {
    let config = config_for(2);
    let long = "word ".repeat(400);
    let err = ReportLayoutEngine::new(config)
        .layout(&[wrapped_table("parts", &[long])])
        .unwrap_err();

    match err {
        AuditError::LayoutOverflow { section, row_index, required, available } => {
            assert_eq!(section, "parts");
            assert_eq!(row_index, 0);
            assert!(required > available);
        }
        other => panic!("unexpected error: {other}"),
    }
}

fn description() -> impl Strategy<Value = String> {
    prop::collection::vec("[a-z]{1,12}", 1..20).prop_map(|words| words.join(" "))
}

proptest! {
    #[test]
    fn rows_never_cross_the_safe_margin(
        descriptions in prop::collection::vec(description(), 1..60),
        rows_per_page in 4usize..25,
    ) {
        let config = config_for(rows_per_page);
        let doc = ReportLayoutEngine::new(config)
            .layout(&[wrapped_table("parts", &descriptions)])
            .unwrap();

        let limit = config.page_height - config.safe_margin;
        let mut seen = Vec::new();
        for page in &doc.pages {
            for row in page.rows() {
                prop_assert!(row.y >= config.margin_top);
                prop_assert!(row.y + row.height <= limit);
                seen.push(row.row_index);
            }
        }
        prop_assert_eq!(seen, (0..descriptions.len()).collect::<Vec<_>>());
        prop_assert!(first_block_is_header(&doc, "parts"));
    }

    #[test]
    fn taller_pages_never_need_more_pages(
        rows in 1usize..150,
        rows_per_page in 2usize..30,
        extra in 1usize..20,
    ) {
        let section = table("parts", rows);
        let short = ReportLayoutEngine::new(config_for(rows_per_page))
            .layout(std::slice::from_ref(&section))
            .unwrap();
        let tall = ReportLayoutEngine::new(config_for(rows_per_page + extra))
            .layout(std::slice::from_ref(&section))
            .unwrap();
        prop_assert!(tall.page_count() <= short.page_count());
    }
}
