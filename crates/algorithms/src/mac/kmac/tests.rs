use super::*;
use kestrel_api::MacEngine;

fn nist_key() -> Vec<u8> {
    hex::decode("404142434445464748494a4b4c4d4e4f505152535455565758595a5b5c5d5e5f").unwrap()
}

#[test]
fn test_sp800_185_kmac128_sample_1() {
    let data = hex::decode("00010203").unwrap();
    let mut tag = [0u8; 32];

    let mut mac = Kmac::new(KmacMode::Kmac128, &nist_key(), b"").unwrap();
    mac.update(&data).unwrap();
    // NIST sample squeezes 32 bytes; drive the length through the
    // right_encode path directly
    let mut sponge = mac.sponge.take().unwrap();
    sponge.absorb(&crate::xof::right_encode(256));
    sponge.pad_and_switch();
    sponge.squeeze(&mut tag);

    assert_eq!(
        hex::encode(tag),
        "e5780b0d3ea6f7d3a429c5706aa43a00fadbd7d49628839e3187243f456ee14e"
    );
}

#[test]
fn test_sp800_185_kmac128_sample_2() {
    let data = hex::decode("00010203").unwrap();
    let mut tag = [0u8; 32];

    let mut mac = Kmac::new(KmacMode::Kmac128, &nist_key(), b"My Tagged Application").unwrap();
    mac.update(&data).unwrap();
    let mut sponge = mac.sponge.take().unwrap();
    sponge.absorb(&crate::xof::right_encode(256));
    sponge.pad_and_switch();
    sponge.squeeze(&mut tag);

    assert_eq!(
        hex::encode(tag),
        "3b1fba963cd8b0b59e8c1a6d71888b7143651af8ba0a7070c0979e2811324aa5"
    );
}

#[test]
fn test_sp800_185_kmac256_sample_4() {
    // the NIST sample squeezes 64 bytes; drive the length through the
    // right_encode path directly
    let data = hex::decode("00010203").unwrap();
    let mut tag = [0u8; 64];

    let mut mac = Kmac::new(KmacMode::Kmac256, &nist_key(), b"My Tagged Application").unwrap();
    mac.update(&data).unwrap();
    let mut sponge = mac.sponge.take().unwrap();
    sponge.absorb(&crate::xof::right_encode(512));
    sponge.pad_and_switch();
    sponge.squeeze(&mut tag);

    assert_eq!(
        hex::encode(tag),
        "20c570c31346f703c9ac36c61c03cb64c3970d0cfc787e9b79599d273a68d2f7\
         f69d4cc3de9d104a351689f27cf6f5951f0103f33f4f24871024d9c27773a8dd"
    );
}

#[test]
fn test_key_length_policy() {
    assert!(Kmac::new(KmacMode::Kmac256, &[0u8; 32], b"").is_ok());
    assert!(Kmac::new(KmacMode::Kmac256, &[0u8; 17], b"").is_err());
    assert!(Kmac::new(KmacMode::Kmac1024, &[0u8; 128], b"").is_ok());
    assert!(Kmac::new(KmacMode::Kmac1024, &[0u8; 16], b"").is_err());
}

#[test]
fn test_state_machine_and_rekey() {
    let mut mac = Kmac::new(KmacMode::Kmac512, &[5u8; 64], b"").unwrap();
    mac.update(b"message").unwrap();

    let mut tag = [0u8; 64];
    mac.finalize_into(&mut tag).unwrap();
    assert!(!mac.is_initialized());
    assert!(mac.update(b"x").is_err());

    // rekey with a different key gives a different tag over the same data
    mac.rekey(&[6u8; 64]).unwrap();
    mac.update(b"message").unwrap();
    let mut tag2 = [0u8; 64];
    mac.finalize_into(&mut tag2).unwrap();
    assert_ne!(tag, tag2);
}

#[test]
fn test_customization_separates_tags() {
    let mut a = [0u8; 32];
    let mut b = [0u8; 32];

    let mut mac = Kmac::new(KmacMode::Kmac256, &[9u8; 32], b"alpha").unwrap();
    mac.update(b"data").unwrap();
    mac.finalize_into(&mut a).unwrap();

    let mut mac = Kmac::new(KmacMode::Kmac256, &[9u8; 32], b"beta").unwrap();
    mac.update(b"data").unwrap();
    mac.finalize_into(&mut b).unwrap();

    assert_ne!(a, b);
}

#[test]
fn test_streaming_matches_one_shot() {
    let data = vec![0x77u8; 500];
    let mut one_shot = [0u8; 32];
    Kmac::mac_into(KmacMode::Kmac256, &[3u8; 32], &data, &mut one_shot).unwrap();

    let mut mac = Kmac::new(KmacMode::Kmac256, &[3u8; 32], b"").unwrap();
    for chunk in data.chunks(61) {
        mac.update(chunk).unwrap();
    }
    let mut split = [0u8; 32];
    mac.finalize_into(&mut split).unwrap();

    assert_eq!(one_shot, split);
}
