//! Loading of the seed nameservers the resolver starts from.
use crate::errors::Error;
use crate::types::NameServer;
use std::fs;
use std::path::Path;

/// Parses a list of nameserver addresses, one per line.
///
/// Blank lines, and anything after a `#`, are ignored. Only the first word
/// of each line is used, so a line may carry a trailing comment such as the
/// server's name.
///
/// ```rust
/// use rootwalk::seed;
///
/// let seeds = seed::parse("198.41.0.4 a.root-servers.net\n\n# b\n170.247.170.2\n");
/// assert_eq!(seeds.len(), 2);
/// assert_eq!(seeds[1].address.as_deref(), Some("170.247.170.2"));
/// ```
pub fn parse(text: &str) -> Vec<NameServer> {
    text.lines()
        .map(|line| line.split('#').next().unwrap_or(""))
        .filter_map(|line| line.split_whitespace().next())
        .map(NameServer::from_address)
        .collect()
}

/// Reads the seed nameservers from `path`.
///
/// # Errors
///
/// Returns [`Error::Seed`] if the file can't be read, or lists no nameservers.
pub fn load<P: AsRef<Path>>(path: P) -> Result<Vec<NameServer>, Error> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .map_err(|e| Error::Seed(format!("{}: {}", path.display(), e)))?;

    let seeds = parse(&text);
    if seeds.is_empty() {
        return Err(Error::Seed(format!("{}: no nameservers listed", path.display())));
    }

    Ok(seeds)
}
