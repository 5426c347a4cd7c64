use super::*;

#[test]
fn export_json_decodes_and_exports() {
    let json = r##"{
        "name": "Demo",
        "canvasWidth": 640,
        "canvasHeight": 480,
        "canvasBackground": "#fafafa",
        "elements": [
            {"id": "t1", "type": "text", "x": 0, "y": 0, "width": 100, "height": 40, "zIndex": 1,
             "content": "Hi", "styles": {}}
        ]
    }"##;
    let html = export_json(json, ExportFormat::Html).unwrap();
    assert!(html.starts_with("<div style=\"position: relative; width: 640px; min-height: 480px; background: #fafafa;"));
    assert!(html.contains(">Hi</div>"));

    let css = export_json(json, ExportFormat::Css).unwrap();
    assert!(css.contains(".element-1 {"));
}

#[test]
fn export_json_rejects_malformed_documents() {
    let err = export_json("{not json", ExportFormat::Html).unwrap_err();
    assert!(matches!(err, ProjectError::Decode(_)));
}

#[test]
fn polygon_binding_matches_geometry() {
    assert_eq!(polygon_clip_path_js(6), polygon_clip_path(6));
}
