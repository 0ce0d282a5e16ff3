//! # Label Flow Tests
//!
//! End-to-end checks of the preview and print flows through the public API,
//! using the built-in Spleen face so every measurement is deterministic
//! (a glyph at size `n` is `n/2` wide and `n` tall).

use etiqueta::encoder::{FLAG_CUT, HEADER_LEN, MAGIC, MonoRasterEncoder};
use etiqueta::fonts::{BUILTIN_FAMILY, BUILTIN_STYLE, FontCatalog, FontChoice, FontResource};
use etiqueta::geometry::Dimensions;
use etiqueta::label::LabelCatalog;
use etiqueta::orchestrator::{Orchestrator, PrinterSettings, ReturnFormat};
use etiqueta::request::{Defaults, Flow, LabelForm, Resolver};
use etiqueta::transport::Backends;
use pretty_assertions::assert_eq;
use std::io::Read;
use std::net::TcpListener;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

// ============================================================================
// HELPERS
// ============================================================================

fn defaults() -> Defaults {
    Defaults::new(FontChoice::new(BUILTIN_FAMILY, BUILTIN_STYLE))
}

fn orchestrator(settings: PrinterSettings) -> Orchestrator {
    let labels = Arc::new(LabelCatalog::builtin());
    Orchestrator::new(
        Arc::new(FontCatalog::with_builtin()),
        labels.clone(),
        defaults(),
        Arc::new(MonoRasterEncoder::new(labels)),
        Arc::new(Backends::default()),
        settings,
    )
}

fn dry_run() -> Orchestrator {
    let mut settings = PrinterSettings::new("tcp://127.0.0.1:9");
    settings.dry_run = true;
    orchestrator(settings)
}

fn form(text: &str, label_size: &str, orientation: &str) -> LabelForm {
    LabelForm {
        label_size: Some(label_size.to_string()),
        orientation: Some(orientation.to_string()),
        ..LabelForm::with_text(text)
    }
}

fn rendered_dims(orchestrator: &Orchestrator, form: &LabelForm) -> Dimensions {
    let label = orchestrator.render(form, Flow::Preview).unwrap();
    Dimensions::new(label.image.width(), label.image.height())
}

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("etiqueta-{}-{}", std::process::id(), name))
}

// ============================================================================
// REQUEST RESOLUTION
// ============================================================================

#[test]
fn test_endless_label_height_follows_text() {
    let orchestrator = dry_run();
    // 100 text + round(24) top + round(45) bottom
    assert_eq!(
        rendered_dims(&orchestrator, &form("A", "62", "standard")),
        Dimensions::new(696, 169)
    );
}

#[test]
fn test_font_family_lookup() {
    let mut fonts = FontCatalog::with_builtin();
    fonts.insert("Arial", "Bold", FontResource::File("/fonts/arial-bold.ttf".into()));
    let labels = LabelCatalog::builtin();
    let defaults = defaults();
    let resolver = Resolver::new(&fonts, &labels, &defaults);

    let bold = LabelForm {
        font_family: Some("Arial (Bold)".into()),
        ..LabelForm::with_text("Hi")
    };
    let request = resolver.resolve(&bold, Flow::Print).unwrap();
    assert_eq!(request.font, FontChoice::new("Arial", "Bold"));

    let italic = LabelForm {
        font_family: Some("Arial (Italic)".into()),
        ..LabelForm::with_text("Hi")
    };
    let err = resolver.resolve(&italic, Flow::Print).unwrap_err();
    assert_eq!(err.kind(), "UnknownFont");
}

#[test]
fn test_missing_text_only_fails_print() {
    let orchestrator = dry_run();

    let result = orchestrator.print(&LabelForm::default());
    assert!(!result.success);
    assert_eq!(result.error_kind.as_deref(), Some("MissingText"));

    let preview = orchestrator
        .preview(&LabelForm::default(), ReturnFormat::Png)
        .unwrap();
    assert_eq!(preview.content_type, "image/png");
}

#[test]
fn test_unknown_label_size_fails_both_flows() {
    let orchestrator = dry_run();
    let form = LabelForm {
        label_size: Some("unknown99".into()),
        ..LabelForm::with_text("Hi")
    };

    let result = orchestrator.print(&form);
    assert_eq!(result.error_kind.as_deref(), Some("UnknownLabelSize"));

    let err = orchestrator.preview(&form, ReturnFormat::Png).unwrap_err();
    assert_eq!(err.kind(), "UnknownLabelSize");
}

#[test]
fn test_oversized_font_is_rejected() {
    let orchestrator = dry_run();
    let form = LabelForm {
        font_size: Some("4000000000".into()),
        ..LabelForm::with_text("ABC")
    };

    let err = orchestrator.preview(&form, ReturnFormat::Png).unwrap_err();
    assert_eq!(err.kind(), "InvalidParameter");

    let result = orchestrator.print(&form);
    assert_eq!(result.error_kind.as_deref(), Some("InvalidParameter"));
}

#[test]
fn test_largest_font_on_die_cut_label() {
    let orchestrator = dry_run();
    let form = LabelForm {
        font_size: Some("2000".into()),
        ..form("AB", "29x90", "standard")
    };
    assert_eq!(rendered_dims(&orchestrator, &form), Dimensions::new(991, 306));
}

// ============================================================================
// GEOMETRY PROPERTIES
// ============================================================================

#[test]
fn test_endless_growth_is_monotonic() {
    let orchestrator = dry_run();

    let mut previous = 0;
    for lines in 1..=4 {
        let text = vec!["Line"; lines].join("\n");
        let dims = rendered_dims(&orchestrator, &form(&text, "62", "standard"));
        assert_eq!(dims.width, 696);
        assert!(dims.height > previous);
        previous = dims.height;
    }

    let mut previous = 0;
    for len in 1..=4 {
        let text = "W".repeat(len);
        let dims = rendered_dims(&orchestrator, &form(&text, "62", "rotated"));
        assert_eq!(dims.height, 696);
        assert!(dims.width > previous);
        previous = dims.width;
    }
}

#[test]
fn test_die_cut_canvas_is_fixed() {
    let orchestrator = dry_run();
    for orientation in ["standard", "rotated"] {
        let short = rendered_dims(&orchestrator, &form("A", "29x90", orientation));
        let long = rendered_dims(
            &orchestrator,
            &form("Much longer text\nover\nseveral lines", "29x90", orientation),
        );
        assert_eq!(short, long);
    }
}

#[test]
fn test_die_cut_rotation_swaps_canvas() {
    let orchestrator = dry_run();
    let standard = rendered_dims(&orchestrator, &form("A", "29x90", "standard"));
    let rotated = rendered_dims(&orchestrator, &form("A", "29x90", "rotated"));

    assert_eq!(standard, Dimensions::new(991, 306));
    assert_eq!(rotated, standard.swapped());
}

#[test]
fn test_blank_lines_keep_their_height() {
    let orchestrator = dry_run();
    let blank = rendered_dims(&orchestrator, &form("A\n\nB", "62", "standard"));
    let filled = rendered_dims(&orchestrator, &form("A\nX\nB", "62", "standard"));
    assert_eq!(blank, filled);
}

// ============================================================================
// PRINT FLOW
// ============================================================================

#[test]
fn test_dry_run_reports_encoded_job() {
    let result = dry_run().print(&form("Hi", "29x90", "standard"));
    assert!(result.success);

    let data = result.raw_encoded_preview.unwrap();
    assert!(data.starts_with("ETQR"));
}

#[test]
fn test_print_over_tcp() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    let receiver = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut received = Vec::new();
        stream.read_to_end(&mut received).unwrap();
        received
    });

    let orchestrator = orchestrator(PrinterSettings::new(format!("tcp://{}", addr)));
    let label = LabelForm {
        font_size: Some("40".into()),
        ..form("Hi", "62", "rotated")
    };
    let result = orchestrator.print(&label);
    assert!(result.success, "{:?}", result);
    assert_eq!(result.raw_encoded_preview, None);

    let received = receiver.join().unwrap();
    assert_eq!(&received[..4], MAGIC);
    // Rotated endless labels are turned so the printable width comes first
    assert_eq!(u32::from_le_bytes(received[4..8].try_into().unwrap()), 696);
    assert_eq!(received[12], FLAG_CUT);
    assert!(received.len() > HEADER_LEN);
}

#[test]
fn test_print_to_device_file() {
    let path = temp_path("device.bin");
    let orchestrator = orchestrator(PrinterSettings::new(format!("file://{}", path.display())));

    let result = orchestrator.print(&form("Hi", "d24", "standard"));
    assert!(result.success, "{:?}", result);

    let written = std::fs::read(&path).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert_eq!(&written[..4], MAGIC);
    assert_eq!(u32::from_le_bytes(written[4..8].try_into().unwrap()), 236);
    assert_eq!(u32::from_le_bytes(written[8..12].try_into().unwrap()), 236);
}

#[test]
fn test_unreachable_device_reports_transport_error() {
    let path = temp_path("missing-dir").join("lp0");
    let orchestrator = orchestrator(PrinterSettings::new(format!("file://{}", path.display())));

    let result = orchestrator.print(&LabelForm::with_text("Hi"));
    assert!(!result.success);
    assert_eq!(result.error_kind.as_deref(), Some("TransportError"));
    assert!(result.message.is_some());
}
