//! Unit tests for the payload codec

use image_gen_gateway::error::AppError;
use image_gen_gateway::payload::{base64, decode_images, ImageAsset, PNG_MIME};

const PNG_10X10: &str = "iVBORw0KGgoAAAANSUhEUgAAAAoAAAAKCAIAAAACUFjqAAAAEklEQVR4nGP4z8CAB+GTG8HSALfKY52fTcuYAAAAAElFTkSuQmCC";

#[test]
fn test_decode_is_left_inverse_of_encode() {
    let samples: Vec<Vec<u8>> = vec![
        vec![0],
        vec![0xff; 3],
        (0u8..=255).collect(),
        b"Hello, World!".to_vec(),
        vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A],
    ];

    for bytes in samples {
        let encoded = base64::encode(&bytes);
        assert_eq!(base64::decode(&encoded).unwrap(), bytes);

        for subtype in ["png", "jpeg", "webp"] {
            let data_uri = format!("data:image/{};base64,{}", subtype, encoded);
            assert_eq!(base64::decode(&data_uri).unwrap(), bytes);
        }
    }
}

#[test]
fn test_png_asset_from_data_uri() {
    let data_uri = format!("data:image/png;base64,{}", PNG_10X10);
    let asset = ImageAsset::decode(&data_uri, "images[0]", "image.png").unwrap();

    assert!(asset.bytes.starts_with(&[0x89, 0x50, 0x4E, 0x47]));
    assert_eq!(asset.mime_type, PNG_MIME);
    assert_eq!(asset.filename, "image.png");
}

#[test]
fn test_mask_asset_name() {
    let asset = ImageAsset::decode_mask(PNG_10X10).unwrap();
    assert_eq!(asset.filename, "mask.png");
    assert_eq!(asset.mime_type, "image/png");
}

#[test]
fn test_malformed_mask_is_validation_error() {
    let err = ImageAsset::decode_mask("data:image/png;base64,@@not-base64@@").unwrap_err();
    match err {
        AppError::Validation(message) => assert!(message.contains("mask")),
        other => panic!("expected validation error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_fan_out_keeps_caller_order() {
    let images = vec![
        base64::encode(b"first"),
        format!("data:image/jpeg;base64,{}", base64::encode(b"second")),
        base64::encode(b"third"),
    ];

    let assets = decode_images(images).await.unwrap();
    let contents: Vec<&[u8]> = assets.iter().map(|a| a.bytes.as_slice()).collect();
    assert_eq!(contents, vec![&b"first"[..], &b"second"[..], &b"third"[..]]);

    let names: Vec<&str> = assets.iter().map(|a| a.filename.as_str()).collect();
    assert_eq!(names, vec!["image_0.png", "image_1.png", "image_2.png"]);
}

#[tokio::test]
async fn test_empty_image_list() {
    assert!(decode_images(Vec::new()).await.unwrap().is_empty());
}
