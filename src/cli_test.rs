use super::*;

const PROJECT: &str = r##"{
    "name": "Brochure",
    "canvasWidth": 800,
    "canvasHeight": 1200,
    "canvasBackground": "#ffffff",
    "elements": [
        {"id": "d1", "type": "div", "x": 10, "y": 20, "width": 100, "height": 50, "zIndex": 1,
         "styles": {"backgroundColor": "#3b82f6"}}
    ],
    "pages": [
        {"id": "p2", "name": "Page 1", "canvasWidth": 400, "canvasHeight": 600, "canvasBackground": "#000000",
         "elements": []}
    ]
}"##;

// =============================================================
// Export
// =============================================================

#[test]
fn export_defaults_to_current_page() {
    let html = render_export(PROJECT, ExportFormat::Html, None).unwrap();
    assert!(html.contains("left: 10px; top: 20px"));
}

#[test]
fn export_selects_requested_page() {
    let css = render_export(PROJECT, ExportFormat::Css, Some("p2")).unwrap();
    assert!(css.contains("  width: 400px;\n"));
    assert!(!css.contains(".element-1"));

    let css = render_export(PROJECT, ExportFormat::Css, Some("main")).unwrap();
    assert!(css.contains(".element-1 {"));
}

#[test]
fn export_rejects_unknown_page() {
    let err = render_export(PROJECT, ExportFormat::Html, Some("nope")).unwrap_err();
    assert!(matches!(err, CliError::UnknownPage(ref p) if p == "nope"));
}

#[test]
fn export_rejects_malformed_project() {
    let err = render_export("[]", ExportFormat::Html, None).unwrap_err();
    assert!(matches!(err, CliError::Project(ProjectError::Decode(_))));
    assert!(err.to_string().starts_with("invalid project JSON: "));
}

#[test]
fn format_arg_maps_to_export_format() {
    assert_eq!(ExportFormat::from(FormatArg::Html), ExportFormat::Html);
    assert_eq!(ExportFormat::from(FormatArg::Css), ExportFormat::Css);
}

// =============================================================
// Polygon
// =============================================================

#[test]
fn polygon_requires_three_sides() {
    assert!(matches!(polygon(2), Err(CliError::TooFewSides(2))));
    assert!(polygon(3).unwrap().starts_with("polygon(50% 0%, "));
}

// =============================================================
// Info
// =============================================================

#[test]
fn summary_lists_main_and_pages() {
    let project = Project::from_json(PROJECT).unwrap();
    let summary = summarize(&project);
    assert_eq!(summary.current_page, "main");
    assert_eq!(summary.pages.len(), 2);
    assert_eq!(summary.pages[0].id, "main");
    assert_eq!(summary.pages[0].elements, 1);
    assert_eq!(summary.pages[1].id, "p2");
    assert_eq!(summary.pages[1].elements, 0);
}

// =============================================================
// Argument parsing
// =============================================================

#[test]
fn parses_export_arguments() {
    let cli = Cli::try_parse_from(["pagesmith", "export", "--input", "p.json", "--format", "css", "--page", "p2"]).unwrap();
    match cli.command {
        Command::Export(args) => {
            assert_eq!(args.input, "p.json");
            assert_eq!(args.format, FormatArg::Css);
            assert_eq!(args.page.as_deref(), Some("p2"));
            assert_eq!(args.output, "-");
        }
        other => panic!("expected export, got {other:?}"),
    }
}
