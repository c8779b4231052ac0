use super::*;

fn sha256_hex(data: &[u8]) -> String {
    let mut h = Sha256::new();
    h.update(data);
    let mut out = [0u8; 32];
    h.finalize_into(&mut out);
    hex::encode(out)
}

fn sha512_hex(data: &[u8]) -> String {
    let mut h = Sha512::new();
    h.update(data);
    let mut out = [0u8; 64];
    h.finalize_into(&mut out);
    hex::encode(out)
}

#[test]
fn test_sha256_fips_vectors() {
    assert_eq!(
        sha256_hex(b""),
        "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
    );
    assert_eq!(
        sha256_hex(b"abc"),
        "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
    );
    assert_eq!(
        sha256_hex(b"abcdbcdecdefdefgefghfghighijhijkijkljklmklmnlmnomnopnopq"),
        "248d6a61d20638b8e5c026930c3e6039a33ce45964ff2167f6ecedd419db06c1"
    );
}

#[test]
fn test_sha512_fips_vectors() {
    assert_eq!(
        sha512_hex(b"abc"),
        "ddaf35a193617abacc417349ae20413112e6fa4e89a97ea20a9eeee64b55d39a\
         2192992a274fc1a836ba3c23a3feebbd454d4423643ce80e2a9ac94fa54ca49f"
    );
    assert_eq!(
        sha512_hex(b""),
        "cf83e1357eefb8bdf1542850d66d8007d620e4050b5715dc83f4a921d36ce9ce\
         47d0d13c5d85f2b0ff8318d2877eec2f63b931bd47417a81a538327af927da3e"
    );
}

#[test]
fn test_streaming_split_matches_one_shot() {
    let data = vec![0x5au8; 300];

    let mut split = Sha256::new();
    split.update(&data[..1]);
    split.update(&data[1..64]);
    split.update(&data[64..200]);
    split.update(&data[200..]);
    let mut a = [0u8; 32];
    split.finalize_into(&mut a);

    let mut whole = Sha256::new();
    whole.update(&data);
    let mut b = [0u8; 32];
    whole.finalize_into(&mut b);

    assert_eq!(a, b);
}

#[test]
fn test_block_boundary_lengths() {
    // lengths straddling the padding boundary exercise both pad branches
    for len in [55usize, 56, 63, 64, 111, 112, 119, 120, 127, 128] {
        let data = vec![0x24u8; len];
        // results must be stable across the streaming split
        let mut h1 = Sha512::new();
        h1.update(&data);
        let mut a = [0u8; 64];
        h1.finalize_into(&mut a);

        let mut h2 = Sha512::new();
        for chunk in data.chunks(13) {
            h2.update(chunk);
        }
        let mut b = [0u8; 64];
        h2.finalize_into(&mut b);

        assert_eq!(a, b, "length {}", len);
    }
}
