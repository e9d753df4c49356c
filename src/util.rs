use std::fmt::Write;
use std::net::Ipv4Addr;

/// Dumps out the slice in a pretty way, 16 bytes per row.
pub fn hexdump(slice: &[u8]) -> String {
    const WIDTH: usize = 16;
    let mut out = String::new();

    for (i, row) in slice.chunks(WIDTH).enumerate() {
        let row_hex: String = row.iter().map(|x| format!("{0:02X} ", x)).collect();

        // For each byte on this row, only print out the ascii printable ones.
        let row_str: String = row
            .iter()
            .map(|x| {
                if x.is_ascii_graphic() || *x == b' ' {
                    *x as char
                } else {
                    '.'
                }
            })
            .collect();

        // Writing to a String never fails.
        let _ = writeln!(out, "{0:>08x}: {1:<48} {2:}", i * WIDTH, row_hex, row_str);
    }

    out
}

/// Returns the name used to look up the PTR record for `addr`.
///
/// ```rust
/// use rootwalk::util::reverse_name;
///
/// assert_eq!(reverse_name("192.0.2.1".parse().unwrap()), "1.2.0.192.in-addr.arpa");
/// ```
pub fn reverse_name(addr: Ipv4Addr) -> String {
    let [a, b, c, d] = addr.octets();
    format!("{}.{}.{}.{}.in-addr.arpa", d, c, b, a)
}

/// Compares two domain names, ignoring case and any trailing dot.
pub fn names_eq(a: &str, b: &str) -> bool {
    trim_dot(a).eq_ignore_ascii_case(trim_dot(b))
}

fn trim_dot(name: &str) -> &str {
    match name {
        "." => name,
        _ => name.strip_suffix('.').unwrap_or(name),
    }
}

#[test]
fn test_names_eq() {
    assert!(names_eq("www.Example.COM", "www.example.com"));
    assert!(names_eq("www.example.com.", "WWW.example.com"));
    assert!(names_eq(".", "."));
    assert!(!names_eq("example.com", "www.example.com"));
    assert!(!names_eq("", "."));
}

#[test]
fn test_hexdump() {
    let dump = hexdump(b"\x00\x01www");
    assert_eq!(
        dump,
        format!("00000000: {:<48} ..www\n", "00 01 77 77 77 ")
    );
}
