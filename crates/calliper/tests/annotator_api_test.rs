//! Integration tests for the Annotator API

use calliper::{
    Annotator, CalliperError,
    config::{AppConfig, TerminatorStyle},
    draw::{LineRole, RenderedAnnotation},
    host::HostDocument,
    identifier::SourceId,
};

const PLATE: &str = r#"
[[element]]
id = "plate"
kind = "rect"
x = 0.0
y = 0.0
width = 100.0
height = 50.0
"#;

fn px_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.options.use_document_units = false;
    config.options.show_unit = false;
    config
}

fn labels(annotation: &RenderedAnnotation) -> Vec<&str> {
    annotation.labels().iter().map(|l| l.text()).collect()
}

#[test]
fn test_rectangle_end_to_end() {
    let mut config = px_config();
    config.options.precision = 2;
    config.options.x_offset = 50.0;
    config.options.y_offset = 50.0;
    config.options.annotation_distance = 30.0;

    let annotator = Annotator::new(config);
    let mut scene = annotator.parse(PLATE).expect("Failed to parse scene");
    let report = annotator.annotate(&mut scene).expect("Failed to annotate");
    assert_eq!(report.annotated().count(), 1);

    let annotation = &scene.annotations()[0];
    let mut texts = labels(annotation);
    texts.sort();
    assert_eq!(texts, vec!["100", "50"]);

    let leaders: Vec<_> = annotation.lines_with_role(LineRole::Leader).collect();
    assert_eq!(leaders.len(), 2);

    let horizontal = leaders
        .iter()
        .find(|l| l.start().y() == l.end().y())
        .expect("horizontal leader");
    assert_eq!(horizontal.start().y(), 50.0 + 50.0 + 30.0);
    assert_eq!(horizontal.length(), 100.0);

    let vertical = leaders
        .iter()
        .find(|l| l.start().x() == l.end().x())
        .expect("vertical leader");
    assert_eq!(vertical.start().x(), 100.0 + 50.0 + 30.0);
    assert_eq!(vertical.length(), 50.0);
}

#[test]
fn test_perpendicular_chord() {
    let source = r#"
[[element]]
id = "bracket"
kind = "path"
d = "M 0 0 L 10 0 L 10 10"
"#;
    let mut config = px_config();
    config.options.perpendicular = true;

    let annotator = Annotator::new(config);
    let mut scene = annotator.parse(source).expect("Failed to parse scene");
    annotator.annotate(&mut scene).expect("Failed to annotate");

    assert_eq!(labels(&scene.annotations()[0]), vec!["14.14"]);
}

#[test]
fn test_document_units_in_labels() {
    let source = format!("[document]\nunit = \"mm\"\nscale = 0.5\n{PLATE}");

    let annotator = Annotator::default();
    let mut scene = annotator.parse(&source).expect("Failed to parse scene");
    annotator.annotate(&mut scene).expect("Failed to annotate");

    let mut texts = labels(&scene.annotations()[0]);
    texts.sort();
    assert_eq!(texts, vec!["25mm", "50mm"]);
}

#[test]
fn test_hide_sources() {
    let source = format!("{PLATE}\n[[element]]\nid = \"caption\"\nkind = \"text\"\n");

    let annotator = Annotator::default();
    let mut scene = annotator.parse(&source).expect("Failed to parse scene");
    let report = annotator.annotate(&mut scene).expect("Failed to annotate");

    assert_eq!(report.skipped().count(), 1);
    assert!(scene.is_hidden(SourceId::new("plate")));
    assert!(!scene.is_hidden(SourceId::new("caption")));

    let mut config = AppConfig::default();
    config.options.hide = false;
    let annotator = Annotator::new(config);
    let mut scene = annotator.parse(&source).expect("Failed to parse scene");
    annotator.annotate(&mut scene).expect("Failed to annotate");
    assert!(!scene.is_hidden(SourceId::new("plate")));
}

#[test]
fn test_skipped_element_never_hidden() {
    let source = format!("{PLATE}\n[[element]]\nkind = \"path\"\nd = \"M 3 3 L 3 3\"\n");

    let annotator = Annotator::default();
    let mut scene = annotator.parse(&source).expect("Failed to parse scene");
    let report = annotator.annotate(&mut scene).expect("Failed to annotate");

    assert_eq!(report.skipped().count(), 1);
    assert!(scene.is_hidden(SourceId::new("plate")));
    assert!(!scene.is_hidden(SourceId::from_index(1)));

    let svg = annotator.render_svg(&scene).expect("Failed to render");
    assert_eq!(svg.matches(r#"display="none""#).count(), 1);

    // An explicit id may not impersonate the unnamed path
    let forged = source.replace("id = \"plate\"", "id = \"__1\"");
    assert!(matches!(
        annotator.parse(&forged),
        Err(CalliperError::Scene(_))
    ));
}

#[test]
fn test_line_cap_from_config() {
    let config: AppConfig =
        toml::from_str("[style]\nline_cap = \"round\"\n").expect("Failed to parse config");

    let annotator = Annotator::new(config);
    let mut scene = annotator.parse(PLATE).expect("Failed to parse scene");
    annotator.annotate(&mut scene).expect("Failed to annotate");

    let svg = annotator.render_svg(&scene).expect("Failed to render");
    assert!(svg.contains(r#"stroke-linecap="round""#));
    assert!(!svg.contains(r#"stroke-linecap="butt""#));
}

#[test]
fn test_invalid_config_leaves_host_untouched() {
    let mut config = AppConfig::default();
    config.options.font_size = 0;

    let annotator = Annotator::new(config);
    let mut scene = annotator.parse(PLATE).expect("Failed to parse scene");
    let result = annotator.annotate(&mut scene);

    assert!(matches!(result, Err(CalliperError::Config(_))));
    assert!(scene.annotations().is_empty());
    assert!(!scene.is_hidden(SourceId::new("plate")));
}

#[test]
fn test_parse_invalid_path_returns_error() {
    let source = "[[element]]\nkind = \"path\"\nd = \"M 0 0 L x\"\n";
    let result = Annotator::default().parse(source);
    assert!(matches!(result, Err(CalliperError::Parse { .. })));
}

#[test]
fn test_render_svg() {
    let mut config = AppConfig::default();
    config.style = config.style.with_terminator(TerminatorStyle::Arrow);

    let annotator = Annotator::new(config);
    let mut scene = annotator.parse(PLATE).expect("Failed to parse scene");
    annotator.annotate(&mut scene).expect("Failed to annotate");

    let svg = annotator.render_svg(&scene).expect("Failed to render");
    assert!(svg.contains("<svg"), "Output should contain SVG tag");
    assert!(svg.contains("</svg>"), "Output should be complete SVG");
    assert!(svg.contains(r#"class="dimension""#));
    assert!(svg.contains("100px"));
    assert!(svg.contains(r#"display="none""#));
}

#[test]
fn test_write_svg() {
    let annotator = Annotator::default();
    let mut scene = annotator.parse(PLATE).expect("Failed to parse scene");
    annotator.annotate(&mut scene).expect("Failed to annotate");

    let path = std::env::temp_dir().join(format!("calliper-api-{}.svg", std::process::id()));
    annotator.write_svg(&scene, &path).expect("Failed to write");

    let written = std::fs::read_to_string(&path).expect("Failed to read back");
    assert!(written.contains(r#"id="plate-dimension""#));
    let _ = std::fs::remove_file(&path);
}

#[test]
fn test_annotator_reusability() {
    let annotator = Annotator::new(px_config());

    for width in [40.0, 75.5] {
        let source = format!(
            "[[element]]\nkind = \"rect\"\nx = 0\ny = 0\nwidth = {width}\nheight = 10\n"
        );
        let mut scene = annotator.parse(&source).expect("Failed to parse scene");
        annotator.annotate(&mut scene).expect("Failed to annotate");
        assert!(labels(&scene.annotations()[0]).contains(&width.to_string().as_str()));
        assert_eq!(scene.selection().len(), 1);
    }
}
