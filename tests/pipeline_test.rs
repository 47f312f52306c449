mod common;

use docscan::pipeline::Outcome;
use docscan::preprocessing::steps::threshold::{binarize, BINARY_THRESHOLD};
use docscan::{DetectorConfig, PageExtractor, PipelineConfig, PreprocessStep, ScanError};
use image::{DynamicImage, GrayImage, Luma};

fn page_config() -> PipelineConfig {
    PipelineConfig {
        steps: vec![
            PreprocessStep::Resize { height: 400 },
            PreprocessStep::Denoise { strength: 5 },
        ],
        detector: DetectorConfig {
            rho_resolution: 2.0,
            theta_resolution: 180,
            vote_threshold: 60,
            ..DetectorConfig::default()
        },
        debug_dir: None,
    }
}

#[test]
fn test_rotated_page_is_rectified() {
    let (img, _) = common::rotated_page(480, 400, 240.0, 160.0, 15.0);
    let extractor = PageExtractor::new(page_config()).unwrap();

    let extraction = extractor.extract(&DynamicImage::ImageRgb8(img)).unwrap();

    assert!(
        matches!(extraction.outcome, Outcome::Rectified { .. }),
        "expected rectification, got {:?}",
        extraction.outcome
    );

    let aspect = extraction.width as f32 / extraction.height as f32;
    assert!(
        (aspect - 1.5).abs() / 1.5 < 0.05,
        "aspect {} from {}x{}",
        aspect,
        extraction.width,
        extraction.height
    );
    assert!(extraction.width >= 225 && extraction.width <= 255, "width {}", extraction.width);

    let binary = &extraction.image;
    assert!(binary.pixels().all(|p| p.0[0] == 0 || p.0[0] == 255));
    assert!(
        common::white_fraction(binary) > 0.85,
        "white fraction {}",
        common::white_fraction(binary)
    );

    // interior is clean page
    let (w, h) = binary.dimensions();
    let interior = image::imageops::crop_imm(binary, w / 10, h / 10, w * 8 / 10, h * 8 / 10).to_image();
    assert!(common::white_fraction(&interior) > 0.99);
}

#[test]
fn test_detected_corners_sit_on_page_corners() {
    let (img, truth) = common::rotated_page(480, 400, 240.0, 160.0, 15.0);
    let extractor = PageExtractor::new(page_config()).unwrap();

    let extraction = extractor.extract(&DynamicImage::ImageRgb8(img)).unwrap();

    let Outcome::Rectified { corners } = &extraction.outcome else {
        panic!("expected rectification, got {:?}", extraction.outcome);
    };
    for (tx, ty) in truth {
        assert!(
            corners
                .points()
                .iter()
                .any(|p| (p.x - tx).abs() <= 5.0 && (p.y - ty).abs() <= 5.0),
            "no corner near ({:.1}, {:.1}) in {:?}",
            tx,
            ty,
            corners
        );
    }
}

#[test]
fn test_featureless_image_falls_back_to_original() {
    let raw = DynamicImage::ImageLuma8(common::faint_noise(300, 200, 7));
    let extractor = PageExtractor::new(PipelineConfig {
        steps: vec![
            PreprocessStep::Resize { height: 150 },
            PreprocessStep::Denoise { strength: 9 },
        ],
        ..PipelineConfig::default()
    })
    .unwrap();

    let extraction = extractor.extract(&raw).unwrap();

    assert_eq!(extraction.outcome, Outcome::Fallback);
    assert_eq!((extraction.width, extraction.height), (300, 200));
    assert_eq!(extraction.image, binarize(&raw.to_luma8(), BINARY_THRESHOLD));
}

#[test]
fn test_full_range_noise_has_no_page() {
    let raw = DynamicImage::ImageLuma8(common::noise(640, 480, 11));
    let extractor = PageExtractor::new(PipelineConfig::default()).unwrap();

    let extraction = extractor.extract(&raw).unwrap();

    assert_eq!(extraction.outcome, Outcome::Fallback);
    assert_eq!((extraction.width, extraction.height), (640, 480));
    assert_eq!(extraction.image, binarize(&raw.to_luma8(), BINARY_THRESHOLD));
}

#[test]
fn test_noisy_background_does_not_hide_the_page() {
    // Page on a speckled desk: the page edges must still stand out
    let (mut img, truth) = common::rotated_page(480, 400, 240.0, 160.0, 15.0);
    let speckle = common::noise(480, 400, 5);
    for (x, y, pixel) in img.enumerate_pixels_mut() {
        if pixel.0 == [0, 0, 0] {
            let v = speckle.get_pixel(x, y).0[0] / 8;
            *pixel = image::Rgb([v, v, v]);
        }
    }
    let extractor = PageExtractor::new(page_config()).unwrap();

    let extraction = extractor.extract(&DynamicImage::ImageRgb8(img)).unwrap();

    let Outcome::Rectified { corners } = &extraction.outcome else {
        panic!("expected rectification, got {:?}", extraction.outcome);
    };
    for (tx, ty) in truth {
        assert!(
            corners
                .points()
                .iter()
                .any(|p| (p.x - tx).abs() <= 6.0 && (p.y - ty).abs() <= 6.0),
            "no corner near ({:.1}, {:.1}) in {:?}",
            tx,
            ty,
            corners
        );
    }
}

#[test]
fn test_binarized_output_is_stable_under_rebinarization() {
    let (img, _) = common::rotated_page(480, 400, 240.0, 160.0, 15.0);
    let extraction = PageExtractor::new(page_config())
        .unwrap()
        .extract(&DynamicImage::ImageRgb8(img))
        .unwrap();

    assert_eq!(binarize(&extraction.image, BINARY_THRESHOLD), extraction.image);
}

#[test]
fn test_concurrent_extractions_are_independent() {
    let extractor = PageExtractor::new(page_config()).unwrap();
    let (page, _) = common::rotated_page(480, 400, 240.0, 160.0, 15.0);
    let page = DynamicImage::ImageRgb8(page);
    let blank = DynamicImage::ImageLuma8(GrayImage::from_pixel(300, 200, Luma([200])));

    let expected_page = extractor.extract(&page).unwrap().image;
    let expected_blank = extractor.extract(&blank).unwrap().image;

    std::thread::scope(|scope| {
        let a = scope.spawn(|| extractor.extract(&page).unwrap().image);
        let b = scope.spawn(|| extractor.extract(&blank).unwrap().image);
        assert_eq!(a.join().unwrap(), expected_page);
        assert_eq!(b.join().unwrap(), expected_blank);
    });
}

#[test]
fn test_invalid_configuration_fails_before_processing() {
    let config = PipelineConfig {
        detector: DetectorConfig {
            vote_threshold: 0,
            ..DetectorConfig::default()
        },
        ..PipelineConfig::default()
    };
    let err = PageExtractor::new(config).unwrap_err();
    assert!(matches!(err, ScanError::Configuration(_)));
    assert!(!err.is_recoverable());
}
