use logpacker::compress::{compress_all, decompress_all};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Both,
    PackOnly,
}

#[derive(Debug)]
struct Vector {
    name: String,
    direction: Direction,
    plain: Vec<u8>,
    packed: Vec<u8>,
}

fn unescape(s: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            let mut buf = [0u8; 4];
            out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            continue;
        }
        match chars.next() {
            Some('n') => out.push(b'\n'),
            Some('r') => out.push(b'\r'),
            Some('t') => out.push(b'\t'),
            Some('\\') => out.push(b'\\'),
            other => panic!("bad escape \\{other:?} in {s:?}"),
        }
    }
    out
}

fn load_vectors() -> Vec<Vector> {
    let manifest = include_str!("vectors/manifest.tsv");
    manifest
        .lines()
        .filter(|line| !line.trim().is_empty() && !line.starts_with('#'))
        .map(|line| {
            let parts: Vec<_> = line.split('|').collect();
            assert_eq!(parts.len(), 4, "invalid vector row: {line}");
            let direction = match parts[1] {
                "both" => Direction::Both,
                "pack" => Direction::PackOnly,
                other => panic!("unknown direction {other:?} in row: {line}"),
            };
            Vector {
                name: parts[0].to_string(),
                direction,
                plain: unescape(parts[2]),
                packed: unescape(parts[3]),
            }
        })
        .collect()
}

#[test]
fn vector_database_is_non_empty() {
    let vectors = load_vectors();
    assert!(!vectors.is_empty());
    assert!(vectors.iter().any(|v| v.direction == Direction::PackOnly));
}

#[test]
fn pack_all_vectors() {
    for v in load_vectors() {
        let packed = compress_all(&v.plain).unwrap();
        assert_eq!(
            String::from_utf8_lossy(&packed),
            String::from_utf8_lossy(&v.packed),
            "vector {}",
            v.name
        );
    }
}

#[test]
fn unpack_all_vectors() {
    for v in load_vectors().into_iter().filter(|v| v.direction == Direction::Both) {
        let plain = decompress_all(&v.packed).unwrap();
        assert_eq!(
            String::from_utf8_lossy(&plain),
            String::from_utf8_lossy(&v.plain),
            "vector {}",
            v.name
        );
    }
}

#[test]
fn pack_only_vectors_unpack_to_canonical_form() {
    for v in load_vectors()
        .into_iter()
        .filter(|v| v.direction == Direction::PackOnly)
    {
        let restored = decompress_all(&v.packed).unwrap();
        assert_ne!(restored, v.plain, "vector {} is already canonical", v.name);
        // Canonical text is a fixed point of the round trip.
        let again = decompress_all(&compress_all(&restored).unwrap()).unwrap();
        assert_eq!(again, restored, "vector {}", v.name);
    }
}
