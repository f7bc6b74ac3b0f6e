mod common;

use common::{write_jpeg, write_png};
use contactsheet::config::Config;
use contactsheet::thumbs::{ThumbOptions, generate};
use tempfile::TempDir;

fn config() -> Config {
    let mut config = Config::default();
    config.thumbnails.sizes = vec![[300, 200]];
    config.thumbnails.icon_size = 32;
    config
}

fn both(recursive: bool) -> ThumbOptions {
    ThumbOptions {
        recursive,
        icons: true,
        thumbnails: true,
    }
}

#[test]
fn writes_thumbnails_and_icons_next_to_folder() {
    let tmp = TempDir::new().unwrap();
    let trip = tmp.path().join("Trip");
    write_jpeg(&trip.join("wide.jpg"), 400, 300);
    write_png(&trip.join("tall.png"), 300, 400);

    let report = generate(&[trip], &config(), &both(false), None);
    assert_eq!(report.written, 4);
    assert_eq!(report.failed, 0);

    let thumbs = tmp.path().join("Trip-300x200");
    let icons = tmp.path().join("Trip-32");
    assert_eq!(image::image_dimensions(thumbs.join("wide-300x200.jpg")).unwrap(), (267, 200));
    assert_eq!(image::image_dimensions(thumbs.join("tall-300x200.jpg")).unwrap(), (150, 200));
    assert_eq!(image::image_dimensions(icons.join("wide-32.jpg")).unwrap(), (32, 32));
    assert_eq!(image::image_dimensions(icons.join("tall-32.jpg")).unwrap(), (32, 32));
}

#[test]
fn second_run_writes_nothing() {
    let tmp = TempDir::new().unwrap();
    let trip = tmp.path().join("Trip");
    write_jpeg(&trip.join("a.jpg"), 120, 80);
    write_jpeg(&trip.join("b.jpg"), 80, 120);

    let first = generate(&[trip.clone()], &config(), &both(false), None);
    assert_eq!(first.written, 4);

    let second = generate(&[trip], &config(), &both(false), None);
    assert_eq!(second.written, 0);
    assert_eq!(second.skipped, 4);
}

#[test]
fn recursive_run_ignores_previous_outputs() {
    let tmp = TempDir::new().unwrap();
    let trip = tmp.path().join("Trip");
    write_jpeg(&trip.join("a.jpg"), 120, 80);
    write_jpeg(&trip.join("Day2").join("b.jpg"), 120, 80);

    let options = ThumbOptions {
        recursive: true,
        icons: true,
        thumbnails: false,
    };
    let first = generate(&[trip.clone()], &config(), &options, None);
    assert_eq!(first.folders, 2);
    assert_eq!(first.written, 2);
    assert!(trip.join("Day2-32").join("b-32.jpg").is_file());

    // Day2-32 now sits inside Trip; it must not be treated as a source.
    let second = generate(&[trip.clone()], &config(), &options, None);
    assert_eq!(second.folders, 2);
    assert_eq!(second.written, 0);
    assert!(!trip.join("Day2-32-32").exists());
}

#[test]
fn broken_source_fails_alone() {
    let tmp = TempDir::new().unwrap();
    let trip = tmp.path().join("Trip");
    write_jpeg(&trip.join("good.jpg"), 100, 100);
    std::fs::write(trip.join("bad.jpg"), b"nope").unwrap();

    let options = ThumbOptions {
        icons: true,
        ..ThumbOptions::default()
    };
    let report = generate(&[trip], &config(), &options, None);
    assert_eq!(report.written, 1);
    assert_eq!(report.failed, 1);
    assert!(tmp.path().join("Trip-32").join("good-32.jpg").is_file());
}
