use std::fs;
use std::path::PathBuf;

use rbm_parser::{decode, DecodeError, RawImage};

fn scratch_file(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("rbm-parser-{}-{}", std::process::id(), name))
}

#[test]
fn save_then_decode_file() {
    let data: Vec<[f32; 4]> = (0..4)
        .map(|i| [i as f32 * 0.1, 0.5, 1.0 - i as f32 * 0.1, 1.0])
        .collect();
    let image = RawImage::new(2, 2, data);

    let path = scratch_file("roundtrip.rbm");
    image.save(&path).unwrap();

    let bytes = fs::read(&path).unwrap();
    assert_eq!(bytes.len(), 8 + 2 * 2 * 16);

    let decoded = decode(&bytes).unwrap();
    assert_eq!(decoded.width, 2);
    assert_eq!(decoded.height, 2);
    assert_eq!(decoded.data, image.data);

    fs::remove_file(&path).unwrap();
}

#[test]
fn short_file_fails_before_pixels() {
    let image = RawImage::new(2, 1, vec![[1.0, 0.0, 0.0, 1.0], [0.0, 1.0, 0.0, 1.0]]);
    let mut bytes = rbm_parser::encode(&image);
    bytes.truncate(bytes.len() - 1);

    let path = scratch_file("short.rbm");
    fs::write(&path, &bytes).unwrap();

    let read_back = fs::read(&path).unwrap();
    assert!(matches!(
        decode(&read_back),
        Err(DecodeError::TruncatedPayload {
            needed: 32,
            found: 31
        })
    ));

    fs::remove_file(&path).unwrap();
}
