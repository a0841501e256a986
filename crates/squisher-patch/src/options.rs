/// How [`process`](crate::process) treats a cache file.
#[derive(Debug, Clone, Default)]
pub struct PatchOptions {
    /// Keep the stored checksum by rewriting the tag data checksum field
    /// instead of storing a new checksum.
    pub preserve_checksum: bool,
    /// Skip the corruption audit.
    pub relaxed: bool,
    /// Mark the file as processed by rewriting its build number.
    pub stamp_build: bool,
    /// Tag paths of the stock bitmaps.map, in resource order. Enables
    /// remapping of bitmaps whose pixels live there.
    pub bitmap_resources: Option<Vec<Vec<u8>>>,
    /// Report repairs without writing anything back. [`process`](crate::process)
    /// always repairs the buffer; callers check this before saving.
    pub dry_run: bool,
}

impl PatchOptions {
    /// Parse a bitmap resource list: one tag path per line, blank lines ignored.
    ///
    /// Paths are kept as raw bytes so lists saved in a legacy code page match
    /// the tag paths stored in the map.
    pub fn parse_resource_list(text: &[u8]) -> Vec<Vec<u8>> {
        text.split(|&b| b == b'\n')
            .map(trim_ascii)
            .filter(|line| !line.is_empty())
            .map(<[u8]>::to_vec)
            .collect()
    }
}

fn trim_ascii(mut line: &[u8]) -> &[u8] {
    while let [first, rest @ ..] = line {
        if !first.is_ascii_whitespace() {
            break;
        }
        line = rest;
    }
    while let [rest @ .., last] = line {
        if !last.is_ascii_whitespace() {
            break;
        }
        line = rest;
    }
    line
}
