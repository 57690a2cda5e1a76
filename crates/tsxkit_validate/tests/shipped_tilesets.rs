use std::path::Path;
use tsxkit_validate::{validate_tileset, IssueKind, ValidationOptions};

const TILESETS: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../assets/tilesets");

fn validate(file: &str, options: &ValidationOptions) -> tsxkit_validate::ValidationReport {
    let dir = Path::new(TILESETS);
    let tileset = tsxkit_format::load_tileset(dir.join(file)).unwrap();
    validate_tileset(&tileset, options, Some(dir))
}

#[test]
fn shipped_tilesets_have_no_errors() {
    let no_images = ValidationOptions {
        check_images: false,
        strict: true,
    };

    for file in ["interior.tsx", "water.tsx"] {
        let report = validate(file, &no_images);
        assert!(report.is_clean(), "{file}: {:?}", report.issues);
        assert!(report.into_result(no_images.strict).is_ok());
    }
}

#[test]
fn atlas_images_are_not_shipped() {
    let report = validate("water.tsx", &ValidationOptions::default());

    assert!(!report.has_errors());
    let missing: Vec<_> = report.of_kind(IssueKind::MissingImage).collect();
    assert_eq!(missing.len(), 1);
    assert_eq!(
        missing[0].message,
        "atlas image '../image/water.png' not found"
    );
    assert!(report.into_result(true).is_err());
}
